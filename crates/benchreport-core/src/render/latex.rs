//! LaTeX tables.

use super::table::Table;

/// Escape LaTeX special characters in plain text.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

pub fn table(t: &Table) -> String {
    let mut out = String::new();
    out.push_str("\\begin{table}[ht]\n\\centering\n");
    out.push_str(&format!("\\caption{{{}}}\n", escape(&t.title)));
    out.push_str(&format!("\\label{{tab:{}}}\n", escape(&t.data_ref)));
    out.push_str(&format!("\\begin{{tabular}}{{l{}}}\n", "r".repeat(t.headers.len())));
    out.push_str("\\hline\n");

    let header: Vec<String> = std::iter::once(&t.name_column)
        .chain(&t.headers)
        .map(|h| escape(h))
        .collect();
    out.push_str(&header.join(" & "));
    out.push_str(" \\\\\n\\hline\n");

    for row in &t.rows {
        let cells: Vec<String> = std::iter::once(&row.label)
            .chain(&row.values)
            .map(|c| escape(c))
            .collect();
        out.push_str(&cells.join(" & "));
        out.push_str(" \\\\\n");
    }

    out.push_str("\\hline\n\\end{tabular}\n\\end{table}\n");
    out
}
