use cleanup_core::decision::{Decision, PassResult};
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Compact UTC rendering for table cells, e.g. `2020-03-05 13:00Z`.
pub fn short_time(t: &chrono::DateTime<chrono::Utc>) -> String {
    t.format("%Y-%m-%d %H:%MZ").to_string()
}

// ---------------------------------------------------------------------------
// Decision table
// ---------------------------------------------------------------------------

const COLUMNS: [&str; 8] = [
    "VISIT",
    "TESTER",
    "STARTED",
    "LAST ACTION",
    "ACTION",
    "REASON",
    "STATUS",
    "ERROR",
];

fn decision_cells(result: &PassResult, d: &Decision) -> [String; 8] {
    [
        d.visit_id.clone(),
        d.tester_staff_id.clone(),
        short_time(&d.visit_start_time),
        d.last_action_time
            .as_ref()
            .map_or_else(|| "-".to_string(), short_time),
        d.action.to_string(),
        d.reason.description(&result.thresholds),
        d.status_label().to_string(),
        d.error.clone().unwrap_or_default(),
    ]
}

/// One line per decision, in log order. Columns are padded to the widest
/// cell and the trailing ERROR column is left ragged.
pub fn render_decisions(result: &PassResult) -> Vec<String> {
    let rows: Vec<[String; 8]> = result
        .decisions
        .iter()
        .map(|d| decision_cells(result, d))
        .collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(&COLUMNS.map(String::from)));
    lines.push(line(&widths.map(|w| "-".repeat(w))));
    lines.extend(rows.iter().map(|row| line(row)));
    lines
}
