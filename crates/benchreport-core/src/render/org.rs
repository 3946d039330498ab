//! Org-mode tables.

use super::table::Table;

fn escape(cell: &str) -> String {
    cell.replace('|', "\\vert{}")
}

pub fn table(t: &Table) -> String {
    let header: Vec<String> = std::iter::once(&t.name_column)
        .chain(&t.headers)
        .map(|h| escape(h))
        .collect();
    let body: Vec<Vec<String>> = t
        .rows
        .iter()
        .map(|r| {
            std::iter::once(&r.label)
                .chain(&r.values)
                .map(|c| escape(c))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format!("#+CAPTION: {}\n", t.title));
    out.push_str(&format!("#+NAME: {}\n", t.data_ref));
    out.push_str(&line(&header, &widths, false));
    out.push('|');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    out.push_str(&rule.join("+"));
    out.push_str("|\n");
    for row in &body {
        out.push_str(&line(row, &widths, true));
    }
    out
}

/// Label cell left-aligned; value cells right-aligned when `numeric`.
fn line(cells: &[String], widths: &[usize], numeric: bool) -> String {
    let mut out = String::from("|");
    for (i, (cell, w)) in cells.iter().zip(widths).enumerate() {
        if numeric && i > 0 {
            out.push_str(&format!(" {:>w$} |", cell, w = w));
        } else {
            out.push_str(&format!(" {:<w$} |", cell, w = w));
        }
    }
    out.push('\n');
    out
}
