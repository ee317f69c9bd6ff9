//! User-facing error message formatting.
//!
//! Uses typed error matching (FetchError / MalformedTableError variants, io::ErrorKind)
//! rather than string parsing to produce short, actionable messages.

use crate::error::{FetchError, MalformedTableError, StatisticsError};
use std::io;

/// Format a FetchError as a user-facing message by matching on its variant.
pub fn user_message_from_fetch(err: &FetchError) -> String {
    match err {
        FetchError::Transport { message, .. } => format!(
            "Could not reach the statistics server: {}. Check the URL and your connection.",
            message
        ),
        FetchError::Status {
            status,
            status_text,
            ..
        } => match status {
            401 | 403 => format!("Access denied ({} {}).", status, status_text),
            404 => "Statistics not found on the server (404). The job output may have been removed.".to_string(),
            500..=599 => format!("The server failed to produce the statistics ({} {}).", status, status_text),
            _ => format!("Server returned {} {}.", status, status_text),
        },
        FetchError::Io { path, source } => format!(
            "Failed to load {}: {}",
            path.display(),
            user_message_from_io(source, None)
        ),
        FetchError::Unsupported { .. } => {
            "HTTP references need a build with the `http` feature.".to_string()
        }
    }
}

/// Format a MalformedTableError; rows and columns are reported 1-based as a spreadsheet would.
pub fn user_message_from_table(err: &MalformedTableError) -> String {
    let detail = match err {
        MalformedTableError::MissingRow { row } => match row {
            0 => "the header row is missing".to_string(),
            1 => "the totals row is missing".to_string(),
            _ => format!("row {} is missing", row + 1),
        },
        MalformedTableError::MissingCell { row, column } => {
            format!("row {} has no column {}", row + 1, column + 1)
        }
        MalformedTableError::NotANumber { row, column, value } => format!(
            "row {}, column {} holds '{}' where a pixel count was expected",
            row + 1,
            column + 1,
            value
        ),
        MalformedTableError::InconsistentWidth {
            row,
            expected,
            found,
        } => format!(
            "row {} has {} columns but the header has {}",
            row + 1,
            found,
            expected
        ),
    };
    format!("Invalid statistics table: {}.", detail)
}

pub fn user_message_from_statistics(err: &StatisticsError) -> String {
    match err {
        StatisticsError::Fetch(e) => user_message_from_fetch(e),
        StatisticsError::Malformed(e) => user_message_from_table(e),
    }
}

/// Format an io::Error as a user-facing message by matching on ErrorKind.
pub fn user_message_from_io(err: &io::Error, context: Option<&str>) -> String {
    use std::io::ErrorKind;

    let base: String = match err.kind() {
        ErrorKind::NotFound => "File or directory not found.".to_string(),
        ErrorKind::PermissionDenied => "Permission denied. Check read access.".to_string(),
        ErrorKind::InvalidData => "File is not valid UTF-8 text.".to_string(),
        ErrorKind::UnexpectedEof => "Unexpected end of file.".to_string(),
        ErrorKind::Interrupted => "Operation interrupted.".to_string(),
        _ => err.to_string(),
    };

    match context {
        Some(ctx) if !ctx.is_empty() => format!("{} {}", base, ctx),
        _ => base,
    }
}

/// Format a color_eyre Report by downcasting to known error types.
/// Walks the cause chain to find StatisticsError, FetchError, MalformedTableError or io::Error.
pub fn user_message_from_report(report: &color_eyre::eyre::Report) -> String {
    for cause in report.chain() {
        if let Some(e) = cause.downcast_ref::<StatisticsError>() {
            return user_message_from_statistics(e);
        }
        if let Some(e) = cause.downcast_ref::<FetchError>() {
            return user_message_from_fetch(e);
        }
        if let Some(e) = cause.downcast_ref::<MalformedTableError>() {
            return user_message_from_table(e);
        }
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return user_message_from_io(io_err, None);
        }
    }

    // Fallback: use first line of display to avoid long tracebacks
    let display = report.to_string();
    display
        .lines()
        .next()
        .unwrap_or("An error occurred")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_user_message_from_fetch_not_found() {
        let err = FetchError::Status {
            url: "http://host/stats.tsv".into(),
            status: 404,
            status_text: "Not Found".into(),
        };
        let msg = user_message_from_fetch(&err);
        assert!(msg.contains("404"), "expected status, got: {}", msg);
    }

    #[test]
    fn test_user_message_from_fetch_io() {
        let err = FetchError::Io {
            path: PathBuf::from("/tmp/missing.tsv"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file"),
        };
        let msg = user_message_from_fetch(&err);
        assert!(msg.contains("/tmp/missing.tsv"), "got: {}", msg);
        assert!(msg.contains("not found"), "got: {}", msg);
    }

    #[test]
    fn test_user_message_from_table_is_one_based() {
        let err = MalformedTableError::NotANumber {
            row: 2,
            column: 3,
            value: "x".into(),
        };
        let msg = user_message_from_table(&err);
        assert!(msg.contains("row 3, column 4"), "got: {}", msg);

        let msg = user_message_from_table(&MalformedTableError::MissingRow { row: 1 });
        assert!(msg.contains("totals row"), "got: {}", msg);
    }

    #[test]
    fn test_user_message_from_report_downcasts() {
        let report = color_eyre::eyre::Report::new(StatisticsError::from(
            MalformedTableError::MissingRow { row: 0 },
        ));
        let msg = user_message_from_report(&report);
        assert!(msg.contains("header row"), "got: {}", msg);

        let report = color_eyre::eyre::eyre!("first line\nsecond line");
        assert_eq!(user_message_from_report(&report), "first line");
    }
}
