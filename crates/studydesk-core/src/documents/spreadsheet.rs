//! Spreadsheet extraction (xlsx, xls, xlsm, ods)

use crate::error::Result;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use std::io::Cursor;

const CELL_SEPARATOR: &str = " | ";

/// One text block per sheet, headed by the sheet name
pub fn extract_spreadsheet(bytes: &[u8]) -> Result<String> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let mut blocks = Vec::new();

    for name in workbook.sheet_names() {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let body = format_range(&range);
                if !body.is_empty() {
                    blocks.push(format!("[{}]\n{}", name, body));
                }
            }
            Err(e) => tracing::warn!("Skipping unreadable sheet '{}': {}", name, e),
        }
    }

    Ok(blocks.join("\n\n"))
}

/// Non-empty rows, cells joined by the separator
pub fn format_range(range: &Range<Data>) -> String {
    range
        .rows()
        .filter_map(|row| {
            let cells: Vec<String> = row
                .iter()
                .filter(|cell| !matches!(cell, Data::Empty))
                .map(|cell| cell.to_string())
                .collect();
            if cells.is_empty() {
                None
            } else {
                Some(cells.join(CELL_SEPARATOR))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
