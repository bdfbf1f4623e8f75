use orderdesk_core::desk::Reply;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a desk reply: the whole `Reply` as JSON, or just its text.
pub fn print_reply(reply: &Reply, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(reply);
    }
    println!("{}", reply.text.trim_end());
    Ok(())
}

/// Plain-text table for `team` and `whoisworking`. Columns are padded to
/// the widest cell, counted in chars so display names with accents line up.
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&'static str]) -> Self {
        Self {
            headers: headers.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = render_line(self.headers.iter().copied(), &widths);
        let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
        out.push_str(&format!("{}\n", rule.join("  ")));
        for row in &self.rows {
            out.push_str(&render_line(row.iter().map(String::as_str), &widths));
        }
        out
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:w$}"))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_pads_to_widest_cell() {
        let mut table = Table::new(&["ID", "MEMBER", "ROLE"]);
        table.row(["111", "alice", "Senior Designer"]);
        table.row(["7", "Unknown member (7)", "QA"]);
        assert_eq!(
            table.render(),
            "ID   MEMBER              ROLE\n\
             ---  ------------------  ---------------\n\
             111  alice               Senior Designer\n\
             7    Unknown member (7)  QA\n"
        );
    }

    #[test]
    fn table_counts_chars_not_bytes() {
        let mut table = Table::new(&["MEMBER", "ORDER"]);
        table.row(["José", "A1"]);
        table.row(["bob", "B22"]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[2], "José    A1");
        assert_eq!(lines[3], "bob     B22");
    }

    #[test]
    fn empty_trailing_cells_are_trimmed() {
        let mut table = Table::new(&["MEMBER", "ORDER", "DEADLINE"]);
        table.row(["alice".to_string(), "A1".to_string(), String::new()]);
        assert_eq!(table.render().lines().last(), Some("alice   A1"));
    }
}
