use super::{open_desk, Options};
use crate::output::print_reply;
use orderdesk_core::types::MemberId;
use std::io::BufRead;
use std::path::Path;

/// Split an optional `<member>: ` speaker tag off a chat line.
fn speaker(line: &str) -> (Option<MemberId>, &str) {
    if let Some((who, text)) = line.split_once(": ") {
        if let Ok(id) = who.parse::<MemberId>() {
            return (Some(id), text);
        }
    }
    (None, line)
}

/// Answer chat lines from stdin until EOF. Lines may carry a `<member>: `
/// speaker tag; otherwise `--as` is the speaker. Rejected commands are
/// answered and the loop keeps going.
pub fn run(root: &Path, opts: &Options) -> anyhow::Result<()> {
    let desk = open_desk(root, opts)?;
    tracing::info!(root = %root.display(), prefix = desk.prefix(), "listening for commands");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let (tagged, text) = speaker(&line);
        let actor = tagged.or(opts.actor);
        let Some(reply) = desk.handle_message(actor, text) else {
            continue;
        };
        print_reply(&reply, opts.json)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_tag_is_optional() {
        assert_eq!(speaker("111: !!mypage"), (Some(MemberId(111)), "!!mypage"));
        assert_eq!(speaker("<@7>: !!team"), (Some(MemberId(7)), "!!team"));
        assert_eq!(speaker("!!addnote A1 todo: call"), (None, "!!addnote A1 todo: call"));
    }
}
