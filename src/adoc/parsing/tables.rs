//! Tables
//!
//!     |===
//!     | Name | Value      one line per row, or one cell per line
//!
//!     | a    | 1
//!     |===
//!
//! Cells are separated by `|` (`\|` is a literal bar). The column count comes from the
//! `cols` attribute when given, else from the number of cells on the first line. The first
//! row is a header when the `header` option is set, or implicitly when the first line holds
//! a whole row and is followed by a blank line (unless `noheader` is set).

use crate::adoc::ast::attributes::ElementAttributes;
use crate::adoc::ast::elements::{Table, TableRow};
use crate::adoc::inlines::parse_inline_text;
use crate::adoc::lexing::SourceLine;

pub fn parse_table(lines: &[SourceLine], attributes: ElementAttributes) -> Table {
    let mut cells: Vec<String> = Vec::new();
    let mut first_line: Option<(usize, usize)> = None;
    for (index, line) in lines.iter().enumerate() {
        let text = line.text.trim();
        if text.is_empty() {
            continue;
        }
        if !text.starts_with('|') {
            // Continuation of the previous cell.
            match cells.last_mut() {
                Some(cell) => {
                    cell.push(' ');
                    cell.push_str(text);
                }
                None => cells.push(text.to_string()),
            }
            continue;
        }
        let row = split_cells(text);
        first_line.get_or_insert((index, row.len()));
        cells.extend(row);
    }

    let columns = attributes
        .get("cols")
        .map(column_count)
        .filter(|n| *n > 0)
        .or(first_line.map(|(_, n)| n))
        .unwrap_or(1)
        .max(1);

    let implicit_header = first_line.is_some_and(|(index, count)| {
        count == columns && lines.get(index + 1).is_some_and(|next| next.kind.is_blank())
    });
    let header = !attributes.has_option("noheader")
        && (attributes.has_option("header") || implicit_header);

    let mut rows: Vec<TableRow> = cells
        .chunks(columns)
        .map(|chunk| TableRow {
            cells: chunk.iter().map(|cell| parse_inline_text(cell)).collect(),
        })
        .collect();

    let mut table = Table::new(columns);
    if header && !rows.is_empty() {
        table.header = Some(rows.remove(0));
    }
    table.rows = rows;
    table.attributes = attributes;
    table
}

fn split_cells(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current: Option<String> = None;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                chars.next();
                current.get_or_insert_with(String::new).push('|');
            }
            '|' => {
                if let Some(cell) = current.take() {
                    cells.push(cell.trim().to_string());
                }
                current = Some(String::new());
            }
            c => current.get_or_insert_with(String::new).push(c),
        }
    }
    if let Some(cell) = current {
        cells.push(cell.trim().to_string());
    }
    cells
}

/// Number of columns in a `cols` spec: `"1,2,1"`, `"3*"`, `"2*,1"`.
fn column_count(cols: &str) -> usize {
    cols.split([',', ';'])
        .map(str::trim)
        .filter(|spec| !spec.is_empty())
        .map(|spec| match spec.split_once('*') {
            Some((n, _)) => n.trim().parse().unwrap_or(1),
            None => 1,
        })
        .sum()
}
