//! Plain text tables for command output

use crate::core::bulk::BulkSummary;
use crate::utils::format_amount;

/// Render rows under `headers` as a boxed, left aligned table
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };
    let format_row = |cells: Vec<&str>| {
        let mut line = String::from("|");
        for (i, width) in widths.iter().enumerate() {
            let cell = cells.get(i).copied().unwrap_or_default();
            let pad = width - cell.chars().count();
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad + 1));
            line.push('|');
        }
        line
    };

    let mut out = vec![border.clone(), format_row(headers.to_vec()), border.clone()];
    for row in rows {
        let cells: Vec<&str> = row.iter().take(columns).map(String::as_str).collect();
        out.push(format_row(cells));
    }
    out.push(border);
    out.join("\n")
}

/// Two-column `field | value` table
pub fn render_pairs(pairs: &[(&str, String)]) -> String {
    let rows: Vec<Vec<String>> = pairs
        .iter()
        .map(|(field, value)| vec![field.to_string(), value.clone()])
        .collect();
    render(&["field", "value"], &rows)
}

/// Status table of a bulk job
pub fn render_summary(summary: &BulkSummary) -> String {
    let mut pairs = vec![
        ("ledger", summary.ledger_path.display().to_string()),
        ("total records", summary.total.to_string()),
        ("unsent", summary.unsent.to_string()),
        ("failed", summary.failed.to_string()),
        ("unfinalized", summary.unfinalized.to_string()),
        ("total finalized", summary.finalized.to_string()),
    ];
    if let Some(amounts) = &summary.amounts {
        pairs.push(("total amount", format_amount(amounts.total, 4)));
        pairs.push(("transferred", format_amount(amounts.transferred, 4)));
        pairs.push(("left to transfer", format_amount(amounts.outstanding, 4)));
    }
    render_pairs(&pairs)
}
