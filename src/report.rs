//! Demonstration summary
//!
//! A table with one row per demonstration: the issue class, what the unsafe
//! variant does, how the safe variant mitigates it, and what each variant
//! actually produced when run with the configured demo inputs.

use crate::config::LabConfig;
use crate::ops::{self, OpError, OpKind, OpResult, Request, Variant};
use serde::Serialize;

/// One summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub example: &'static str,
    pub issue: &'static str,
    pub unsafe_behavior: &'static str,
    pub safe_mitigation: &'static str,
    /// Verdict of the unsafe variant, `None` when there is no unsafe variant
    pub unsafe_result: Option<&'static str>,
    pub safe_result: &'static str,
}

fn describe(kind: OpKind) -> (&'static str, &'static str, &'static str) {
    match kind {
        OpKind::Int => (
            "Out-of-bounds write",
            "writes past a 2-slot buffer at a fixed index",
            "index checked against [0, capacity) before writing",
        ),
        OpKind::String => (
            "Unchecked string copy",
            "strcpy-style copy overruns a 10-byte buffer",
            "copies capacity-1 bytes and always terminates",
        ),
        OpKind::Array => (
            "Unchecked array copy",
            "loop bound taken from the source length only",
            "copies min(source length, capacity) elements",
        ),
        OpKind::Read => (
            "Out-of-bounds read",
            "reads past the logical length without a check",
            "length-checked access on a growable container",
        ),
        OpKind::Alloc => (
            "Unbounded allocation",
            "(no unsafe variant)",
            "size validated; scoped ownership releases on every path",
        ),
    }
}

/// Verdict for a demonstration input the harness would not hand to the operation.
pub const REFUSED: &str = "refused";

fn run_verdict(request: &Request, config: &LabConfig) -> OpResult<&'static str> {
    match ops::execute(request, config) {
        Ok(outcome) => Ok(outcome.verdict()),
        Err(e @ (OpError::Buffer(_) | OpError::InvalidInput { .. })) => {
            log::warn!("{} demonstration refused: {}", request.kind, e);
            Ok(REFUSED)
        }
        Err(e) => Err(e),
    }
}

/// Run every demonstration with its configured input and collect the rows.
///
/// Refused inputs are recorded as [`REFUSED`]. Only allocation failure
/// aborts the summary.
pub fn build_summary(config: &LabConfig) -> OpResult<Vec<SummaryRow>> {
    OpKind::ALL
        .iter()
        .map(|&kind| {
            let (issue, unsafe_behavior, safe_mitigation) = describe(kind);
            let unsafe_result = if kind.has_unsafe_variant() {
                let request = Request::demo(kind, Variant::Unsafe, config);
                Some(run_verdict(&request, config)?)
            } else {
                None
            };
            let safe_result = run_verdict(&Request::demo(kind, Variant::Safe, config), config)?;
            Ok(SummaryRow {
                example: kind.title(),
                issue,
                unsafe_behavior,
                safe_mitigation,
                unsafe_result,
                safe_result,
            })
        })
        .collect()
}

/// Render rows as a fixed-width text table.
pub fn render_table(rows: &[SummaryRow]) -> Vec<String> {
    let header = [
        "Example",
        "Issue",
        "Unsafe behavior",
        "Safe mitigation",
        "Unsafe",
        "Safe",
    ];
    let cells: Vec<[&str; 6]> = rows
        .iter()
        .map(|r| {
            [
                r.example,
                r.issue,
                r.unsafe_behavior,
                r.safe_mitigation,
                r.unsafe_result.unwrap_or("-"),
                r.safe_result,
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let format_row = |row: &[&str; 6]| {
        row.iter()
            .zip(widths)
            .map(|(cell, w)| format!("{:<w$}", cell, w = w))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(cells.len() + 2);
    lines.push(format_row(&header));
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(cells.iter().map(format_row));
    lines
}

/// Render rows as pretty-printed JSON.
pub fn render_json(rows: &[SummaryRow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}
