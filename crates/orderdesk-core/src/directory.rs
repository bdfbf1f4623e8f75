//! Live membership lookup.
//!
//! The chat platform owns member identities. A stored [`MemberId`] may stop
//! resolving at any time (the member left); callers degrade the display and
//! never treat that as an error.

use crate::types::MemberId;
use std::collections::{BTreeMap, HashMap};

pub trait Directory: Send + Sync {
    /// Display name for `id`, or `None` when the id no longer resolves.
    fn display_name(&self, id: MemberId) -> Option<String>;
}

/// A directory that resolves nobody.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyDirectory;

impl Directory for EmptyDirectory {
    fn display_name(&self, _id: MemberId) -> Option<String> {
        None
    }
}

impl Directory for BTreeMap<MemberId, String> {
    fn display_name(&self, id: MemberId) -> Option<String> {
        self.get(&id).cloned()
    }
}

impl Directory for HashMap<MemberId, String> {
    fn display_name(&self, id: MemberId) -> Option<String> {
        self.get(&id).cloned()
    }
}

/// Display label for a member: the resolved name, or "Unknown member (<id>)".
pub fn label(directory: &dyn Directory, id: MemberId) -> String {
    directory
        .display_name(id)
        .unwrap_or_else(|| format!("Unknown member ({id})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_falls_back_to_unknown() {
        let mut members = BTreeMap::new();
        members.insert(MemberId(1), "alice".to_string());
        assert_eq!(label(&members, MemberId(1)), "alice");
        assert_eq!(label(&members, MemberId(2)), "Unknown member (2)");
        assert_eq!(label(&EmptyDirectory, MemberId(1)), "Unknown member (1)");
    }
}
