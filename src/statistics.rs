//! Class-confusion statistics: parsing the reference TSV table into class and
//! land-cover summaries, and the tiered percentage formatting shown next to every count.
//!
//! Table layout (rows separated by `\r\n`, cells by `\t`):
//!
//! ```text
//! <ignored>  <ignored>    <class 0>   <class 1>  ...
//! <ignored>  <total>      <count 0>   <count 1>  ...
//! <lc label> <lc total>   <count>     <count>    ...
//! ```

use crate::error::MalformedTableError;
use serde::Serialize;

/// Shown in place of a percentage whose denominator is zero.
pub const UNDEFINED_PERCENT: &str = "n/a";

/// Index of the first per-class column in every row.
const FIRST_CLASS_COLUMN: usize = 2;

/// Caller-supplied reference indices to highlight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Highlight {
    /// Output class, 0-based in column order.
    pub class_idx: Option<usize>,
    /// Land-cover class, 0-based among the rows with a non-zero total, in table order.
    pub lc_class_idx: Option<usize>,
}

/// One output class (table column).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSummary {
    pub label: String,
    pub count: u64,
    pub highlighted: bool,
    /// Share of the grand total.
    pub formatted: String,
}

/// One cell of a land-cover row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellValue {
    pub value: u64,
    pub highlighted: bool,
    /// Share of the corresponding output class count.
    pub formatted: String,
}

/// One reference land-cover class (table row) with a non-zero total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LandCoverRow {
    pub label: String,
    pub count: u64,
    pub highlighted: bool,
    /// Share of the grand total.
    pub formatted: String,
    pub counts: Vec<CellValue>,
}

/// Parsed table, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedStatistics {
    pub total: u64,
    pub classes: Vec<ClassSummary>,
    /// Sorted by count, largest first; ties keep table order.
    pub lc_classes: Vec<LandCoverRow>,
}

/// The fetched body split into records and cells. Cells borrow from the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable<'a> {
    rows: Vec<Vec<&'a str>>,
}

impl<'a> RawTable<'a> {
    /// Split on `\r\n` (bare `\n` accepted too) and then on tabs.
    /// Only the empty records after a final separator are dropped; interior
    /// blank records keep their position.
    pub fn from_body(body: &'a str) -> Self {
        let mut lines: Vec<&str> = body
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        let rows = lines
            .into_iter()
            .map(|line| line.split('\t').collect())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<&'a str>] {
        &self.rows
    }

    fn row(&self, row: usize) -> Result<&[&'a str], MalformedTableError> {
        self.rows
            .get(row)
            .map(Vec::as_slice)
            .ok_or(MalformedTableError::MissingRow { row })
    }

    /// Build the summaries described in the module docs.
    pub fn summarize(&self, highlight: Highlight) -> Result<ParsedStatistics, MalformedTableError> {
        let header = self.row(0)?;
        let totals = self.row(1)?;
        if header.len() < FIRST_CLASS_COLUMN {
            return Err(MalformedTableError::MissingCell { row: 0, column: 1 });
        }
        let total = parse_count(totals, 1, 1)?;

        let width = header.len();
        check_width(totals, 1, width)?;

        let mut classes = header[FIRST_CLASS_COLUMN..]
            .iter()
            .enumerate()
            .map(|(idx, label)| {
                Ok(ClassSummary {
                    label: label.to_string(),
                    count: parse_count(totals, 1, idx + FIRST_CLASS_COLUMN)?,
                    highlighted: highlight.class_idx == Some(idx),
                    formatted: String::new(),
                })
            })
            .collect::<Result<Vec<_>, MalformedTableError>>()?;

        let mut lc_classes: Vec<LandCoverRow> = Vec::new();
        for (row_idx, row) in self.rows.iter().enumerate().skip(2) {
            check_width(row, row_idx, width)?;
            let count = parse_count(row, row_idx, 1)?;
            let counts = (FIRST_CLASS_COLUMN..width)
                .map(|column| parse_count(row, row_idx, column))
                .collect::<Result<Vec<_>, _>>()?;
            if count == 0 {
                continue;
            }

            // Position among kept rows, fixed before sorting.
            let lc_idx = lc_classes.len();
            let row_highlighted = highlight.lc_class_idx == Some(lc_idx);
            lc_classes.push(LandCoverRow {
                label: row[0].to_string(),
                count,
                highlighted: row_highlighted,
                formatted: String::new(),
                counts: counts
                    .into_iter()
                    .enumerate()
                    .map(|(idx, value)| CellValue {
                        value,
                        highlighted: row_highlighted || highlight.class_idx == Some(idx),
                        formatted: String::new(),
                    })
                    .collect(),
            });
        }

        lc_classes.sort_by(|a, b| b.count.cmp(&a.count));

        // The trailing "others" column only matters when it holds pixels.
        if classes.last().is_some_and(|class| class.count == 0) {
            classes.pop();
            for row in &mut lc_classes {
                row.counts.pop();
            }
        }

        for class in &mut classes {
            class.formatted = format_share(class.count, total);
        }
        for row in &mut lc_classes {
            row.formatted = format_share(row.count, total);
            for (cell, class) in row.counts.iter_mut().zip(&classes) {
                cell.formatted = format_share(cell.value, class.count);
            }
        }

        Ok(ParsedStatistics {
            total,
            classes,
            lc_classes,
        })
    }
}

/// Parse a statistics body. All-or-nothing: any malformed cell fails the whole table.
pub fn parse_statistics(
    body: &str,
    highlight: Highlight,
) -> Result<ParsedStatistics, MalformedTableError> {
    RawTable::from_body(body).summarize(highlight)
}

fn check_width(row: &[&str], row_idx: usize, expected: usize) -> Result<(), MalformedTableError> {
    if row.len() != expected {
        return Err(MalformedTableError::InconsistentWidth {
            row: row_idx,
            expected,
            found: row.len(),
        });
    }
    Ok(())
}

fn parse_count(row: &[&str], row_idx: usize, column: usize) -> Result<u64, MalformedTableError> {
    let raw = row.get(column).ok_or(MalformedTableError::MissingCell {
        row: row_idx,
        column,
    })?;
    raw.trim()
        .parse::<u64>()
        .map_err(|_| MalformedTableError::NotANumber {
            row: row_idx,
            column,
            value: raw.to_string(),
        })
}

/// `numerator / denominator` as a percentage, or [`UNDEFINED_PERCENT`] when the denominator is zero.
pub fn format_share(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return UNDEFINED_PERCENT.to_string();
    }
    format_percent(numerator as f64 / denominator as f64)
}

/// Format a ratio as a percentage with precision tiered by the ratio's magnitude:
/// 3 decimals below 0.01, 2 below 0.1, 1 below 1, none from 1 up.
/// Rounds half away from zero. Exactly zero renders as `0%`, and a NaN or
/// infinite ratio as [`UNDEFINED_PERCENT`].
pub fn format_percent(ratio: f64) -> String {
    if !ratio.is_finite() {
        return UNDEFINED_PERCENT.to_string();
    }
    if ratio == 0.0 {
        return "0%".to_string();
    }
    let magnitude = ratio.abs();
    let decimals: i32 = if magnitude < 0.01 {
        3
    } else if magnitude < 0.1 {
        2
    } else if magnitude < 1.0 {
        1
    } else {
        0
    };
    let scale = 10f64.powi(decimals);
    // `+ 0.0` turns a rounded -0.0 into 0.0
    let rounded = (ratio * 100.0 * scale).round() / scale + 0.0;
    format!("{rounded:.prec$}%", prec = decimals as usize)
}
