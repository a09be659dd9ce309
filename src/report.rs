use anyhow::Result;

use crate::config::Category;
use crate::reddit::Comment;
use crate::store::Store;

/// Separator between per-thread tables in the final report.
pub const TABLE_SEPARATOR: &str = "\n\n---\n\n";

/// Render one category's nomination table from its thread's comments.
pub fn render_thread(category: &Category, comments: &[Comment], store: &Store) -> Result<String> {
    let headers: Vec<&str> = category.columns.iter().map(|c| c.header()).collect();
    let columns: Vec<Vec<String>> = category
        .columns
        .iter()
        .map(|c| c.render(comments, store))
        .collect::<Result<_>>()?;
    let rows = transpose(&columns, comments.len());
    Ok(render_table(&category.header, &headers, &rows))
}

/// Column-major extractor output, flipped to row-major table cells.
fn transpose(columns: &[Vec<String>], rows: usize) -> Vec<Vec<String>> {
    (0..rows)
        .map(|i| columns.iter().map(|column| column[i].clone()).collect())
        .collect()
}

fn render_table(header: &str, column_headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = format!("###{header}\n\n");
    out.push_str(&column_headers.join(" | "));
    out.push('\n');
    out.push_str(&vec!["---"; column_headers.len()].join("|"));
    out.push('\n');
    out.push_str(
        &rows
            .iter()
            .map(|row| row.join(" | "))
            .collect::<Vec<_>>()
            .join("\n"),
    );
    out
}

// ── Tests ──
