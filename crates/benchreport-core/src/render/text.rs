//! Plain text summaries.

use super::table::Table;

pub fn table(t: &Table) -> String {
    let widths = t.column_widths();
    let mut out = String::new();
    out.push_str(&t.title);
    out.push('\n');
    out.push_str(&"=".repeat(t.title.chars().count()));
    out.push('\n');

    let mut header = format!("{:<w$}", t.name_column, w = widths[0]);
    for (h, w) in t.headers.iter().zip(&widths[1..]) {
        header.push_str(&format!("  {:>w$}", h, w = w));
    }
    out.push_str(header.trim_end());
    out.push('\n');

    for row in &t.rows {
        let mut line = format!("{:<w$}", row.label, w = widths[0]);
        for (v, w) in row.values.iter().zip(&widths[1..]) {
            line.push_str(&format!("  {:>w$}", v, w = w));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
