//! Class statistics dialog: lifecycle, fetch state and scroll position.
//!
//! A dialog moves `Created → Shown → Closed` and never goes back. Within the
//! shown state each fetch cycle runs `Idle → Fetching → Success | Failure`;
//! only the result carrying the latest issued [`RequestToken`] is applied.

use crate::error::{FetchError, StatisticsError};
use crate::error_display::user_message_from_statistics;
use crate::output::{ProcessOutput, StatisticsRequest};
use crate::statistics::{parse_statistics, ClassSummary, Highlight, LandCoverRow, ParsedStatistics};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DialogLifecycle {
    #[default]
    Created,
    Shown,
    Closed,
}

#[derive(Debug, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching,
    Success(ParsedStatistics),
    Failure(StatisticsError),
}

impl FetchStatus {
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::Fetching)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Success and failure end a fetch cycle; only an explicit refetch starts another.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Failure(_))
    }
}

/// Identifies one fetch. Tokens only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(pub u64);

/// Issues request tokens. Shared by every dialog of one controller so a token
/// is never reused, even across dialogs.
#[derive(Debug, Default)]
pub struct RequestTokens {
    last: u64,
}

impl RequestTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestToken {
        self.last += 1;
        RequestToken(self.last)
    }
}

/// Everything the fetch worker needs; handed out by [`ClassStatisticsModal::begin_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub token: RequestToken,
    pub url: String,
    pub mime_type: String,
}

/// What happened to a fetch result handed to [`ClassStatisticsModal::complete_fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer fetch was started, or the cycle already ended.
    Stale,
    /// The dialog is gone.
    Closed,
}

/// View-facing snapshot of a dialog.
#[derive(Debug, Serialize)]
pub struct ClassStatisticsTemplate<'a> {
    pub is_fetching: bool,
    pub fetch_failed: bool,
    pub classes: &'a [ClassSummary],
    pub lc_classes: &'a [LandCoverRow],
    pub output: &'a ProcessOutput,
}

#[derive(Debug)]
pub struct ClassStatisticsModal {
    output: ProcessOutput,
    highlight: Highlight,
    lifecycle: DialogLifecycle,
    status: FetchStatus,
    latest_token: Option<RequestToken>,
    /// First visible land-cover row
    pub scroll: usize,
    pub show_help: bool,
    pub help_scroll: usize,
}

impl ClassStatisticsModal {
    pub fn new(request: StatisticsRequest) -> Self {
        let (output, highlight) = request.into_parts();
        Self {
            output,
            highlight,
            lifecycle: DialogLifecycle::Created,
            status: FetchStatus::Idle,
            latest_token: None,
            scroll: 0,
            show_help: false,
            help_scroll: 0,
        }
    }

    pub fn lifecycle(&self) -> DialogLifecycle {
        self.lifecycle
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn output(&self) -> &ProcessOutput {
        &self.output
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn latest_token(&self) -> Option<RequestToken> {
        self.latest_token
    }

    pub fn statistics(&self) -> Option<&ParsedStatistics> {
        match &self.status {
            FetchStatus::Success(stats) => Some(stats),
            _ => None,
        }
    }

    /// Created → Shown. Returns false when the dialog was already shown or closed.
    pub fn show(&mut self) -> bool {
        if self.lifecycle != DialogLifecycle::Created {
            return false;
        }
        self.lifecycle = DialogLifecycle::Shown;
        debug!(output = %self.output.identifier, "statistics dialog shown");
        true
    }

    /// Start a fetch cycle. Any fetch still in flight becomes stale.
    /// Returns None unless the dialog is shown.
    pub fn begin_fetch(&mut self, tokens: &mut RequestTokens) -> Option<FetchTicket> {
        if self.lifecycle != DialogLifecycle::Shown {
            return None;
        }
        let token = tokens.issue();
        self.latest_token = Some(token);
        self.status = FetchStatus::Fetching;
        self.scroll = 0;
        info!(
            token = token.0,
            url = %self.output.reference.url,
            "fetching class statistics"
        );
        Some(FetchTicket {
            token,
            url: self.output.reference.url.clone(),
            mime_type: self.output.reference.mime_type.clone(),
        })
    }

    /// Start a new cycle after the previous one ended. Ignored while a fetch is running.
    pub fn refetch(&mut self, tokens: &mut RequestTokens) -> Option<FetchTicket> {
        if !self.status.is_terminal() {
            return None;
        }
        self.begin_fetch(tokens)
    }

    /// Apply a fetch result. The body is parsed only when the fetch succeeded
    /// and `token` is the latest one issued for this dialog.
    pub fn complete_fetch(
        &mut self,
        token: RequestToken,
        result: Result<String, FetchError>,
    ) -> FetchOutcome {
        if self.lifecycle == DialogLifecycle::Closed {
            debug!(token = token.0, "discarding result for closed dialog");
            return FetchOutcome::Closed;
        }
        if self.latest_token != Some(token) || !self.status.is_fetching() {
            debug!(
                token = token.0,
                latest = ?self.latest_token,
                "discarding stale statistics result"
            );
            return FetchOutcome::Stale;
        }

        self.status = match result {
            Err(e) => {
                warn!(token = token.0, error = %e, "statistics fetch failed");
                FetchStatus::Failure(e.into())
            }
            Ok(body) => match parse_statistics(&body, self.highlight) {
                Ok(stats) => {
                    info!(
                        token = token.0,
                        total = stats.total,
                        classes = stats.classes.len(),
                        rows = stats.lc_classes.len(),
                        "statistics parsed"
                    );
                    FetchStatus::Success(stats)
                }
                Err(e) => {
                    warn!(token = token.0, error = %e, "statistics table rejected");
                    FetchStatus::Failure(e.into())
                }
            },
        };
        FetchOutcome::Applied
    }

    /// Created|Shown → Closed. Outstanding fetches are discarded from here on.
    pub fn close(&mut self) -> bool {
        if self.lifecycle == DialogLifecycle::Closed {
            return false;
        }
        self.lifecycle = DialogLifecycle::Closed;
        self.latest_token = None;
        debug!(output = %self.output.identifier, "statistics dialog closed");
        true
    }

    pub fn template(&self) -> ClassStatisticsTemplate<'_> {
        let (classes, lc_classes): (&[ClassSummary], &[LandCoverRow]) = match &self.status {
            FetchStatus::Success(stats) => (&stats.classes, &stats.lc_classes),
            _ => (&[], &[]),
        };
        ClassStatisticsTemplate {
            is_fetching: self.status.is_fetching(),
            fetch_failed: self.status.is_failure(),
            classes,
            lc_classes,
            output: &self.output,
        }
    }

    pub fn failure_message(&self) -> Option<String> {
        match &self.status {
            FetchStatus::Failure(e) => Some(user_message_from_statistics(e)),
            _ => None,
        }
    }

    fn row_count(&self) -> usize {
        self.statistics().map_or(0, |s| s.lc_classes.len())
    }

    fn max_scroll(&self) -> usize {
        self.row_count().saturating_sub(1)
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_add(rows).min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.scroll = self.scroll.saturating_sub(rows);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = self.max_scroll();
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        self.help_scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::DEFAULT_MIME_TYPE;

    const BODY: &str = "\t\tA\tB\r\n\t100\t60\t40\r\nforest\t70\t50\t20\r\nwater\t30\t10\t20";

    fn modal() -> ClassStatisticsModal {
        let output = ProcessOutput::from_reference("http://host/stats.tsv", DEFAULT_MIME_TYPE);
        let request = StatisticsRequest::new(
            output,
            Highlight {
                class_idx: Some(1),
                lc_class_idx: None,
            },
        )
        .unwrap();
        ClassStatisticsModal::new(request)
    }

    fn shown() -> ClassStatisticsModal {
        let mut m = modal();
        assert!(m.show());
        m
    }

    #[test]
    fn test_lifecycle_transitions_are_guarded() {
        let mut m = modal();
        assert_eq!(m.lifecycle(), DialogLifecycle::Created);
        assert!(m.show());
        assert!(!m.show());
        assert!(m.close());
        assert!(!m.close());
        assert!(!m.show());
        assert_eq!(m.lifecycle(), DialogLifecycle::Closed);
    }

    #[test]
    fn test_begin_fetch_requires_shown_dialog() {
        let mut tokens = RequestTokens::new();
        let mut m = modal();
        assert!(m.begin_fetch(&mut tokens).is_none());
        m.show();
        let ticket = m.begin_fetch(&mut tokens).unwrap();
        assert_eq!(ticket.url, "http://host/stats.tsv");
        assert_eq!(ticket.mime_type, DEFAULT_MIME_TYPE);
        assert!(m.status().is_fetching());
        assert!(m.template().is_fetching);
    }

    #[test]
    fn test_complete_fetch_success_parses_body() {
        let mut tokens = RequestTokens::new();
        let mut m = shown();
        let ticket = m.begin_fetch(&mut tokens).unwrap();
        assert_eq!(
            m.complete_fetch(ticket.token, Ok(BODY.to_string())),
            FetchOutcome::Applied
        );
        let template = m.template();
        assert!(!template.is_fetching);
        assert!(!template.fetch_failed);
        assert_eq!(template.classes.len(), 2);
        assert!(template.classes[1].highlighted);
        assert_eq!(template.lc_classes[0].label, "forest");
    }

    #[test]
    fn test_complete_fetch_failure_does_not_parse() {
        let mut tokens = RequestTokens::new();
        let mut m = shown();
        let ticket = m.begin_fetch(&mut tokens).unwrap();
        let err = FetchError::Status {
            url: ticket.url.clone(),
            status: 503,
            status_text: "Service Unavailable".into(),
        };
        assert_eq!(m.complete_fetch(ticket.token, Err(err)), FetchOutcome::Applied);
        assert!(matches!(
            m.status(),
            FetchStatus::Failure(StatisticsError::Fetch(_))
        ));
        let template = m.template();
        assert!(template.fetch_failed);
        assert!(template.classes.is_empty());
        assert!(m.failure_message().unwrap().contains("503"));
    }

    #[test]
    fn test_malformed_body_is_failure() {
        let mut tokens = RequestTokens::new();
        let mut m = shown();
        let ticket = m.begin_fetch(&mut tokens).unwrap();
        m.complete_fetch(ticket.token, Ok("just one line".to_string()));
        assert!(matches!(
            m.status(),
            FetchStatus::Failure(StatisticsError::Malformed(_))
        ));
    }

    #[test]
    fn test_older_token_is_stale() {
        let mut tokens = RequestTokens::new();
        let mut m = shown();
        let first = m.begin_fetch(&mut tokens).unwrap();
        let second = m.begin_fetch(&mut tokens).unwrap();
        assert!(second.token > first.token);

        assert_eq!(
            m.complete_fetch(first.token, Ok(BODY.to_string())),
            FetchOutcome::Stale
        );
        assert!(m.status().is_fetching());
        assert_eq!(
            m.complete_fetch(second.token, Ok(BODY.to_string())),
            FetchOutcome::Applied
        );
        // Same token delivered twice: the cycle already ended
        assert_eq!(
            m.complete_fetch(second.token, Ok(String::new())),
            FetchOutcome::Stale
        );
        assert!(m.statistics().is_some());
    }

    #[test]
    fn test_result_after_close_is_discarded() {
        let mut tokens = RequestTokens::new();
        let mut m = shown();
        let ticket = m.begin_fetch(&mut tokens).unwrap();
        m.close();
        assert_eq!(
            m.complete_fetch(ticket.token, Ok(BODY.to_string())),
            FetchOutcome::Closed
        );
        assert!(m.statistics().is_none());
    }

    #[test]
    fn test_refetch_only_after_cycle_ends() {
        let mut tokens = RequestTokens::new();
        let mut m = shown();
        let ticket = m.begin_fetch(&mut tokens).unwrap();
        assert!(m.refetch(&mut tokens).is_none());
        m.complete_fetch(ticket.token, Ok(BODY.to_string()));
        let again = m.refetch(&mut tokens).unwrap();
        assert!(again.token > ticket.token);
        assert!(m.status().is_fetching());
    }

    #[test]
    fn test_scroll_is_clamped_to_rows() {
        let mut tokens = RequestTokens::new();
        let mut m = shown();
        let ticket = m.begin_fetch(&mut tokens).unwrap();
        m.complete_fetch(ticket.token, Ok(BODY.to_string()));

        m.scroll_down(10);
        assert_eq!(m.scroll, 1);
        m.scroll_up(5);
        assert_eq!(m.scroll, 0);
        m.scroll_to_bottom();
        assert_eq!(m.scroll, 1);
        m.scroll_to_top();
        assert_eq!(m.scroll, 0);
    }

    #[test]
    fn test_template_serializes_passthrough_output() {
        let m = shown();
        let json = serde_json::to_value(m.template()).unwrap();
        assert_eq!(json["is_fetching"], false);
        assert_eq!(json["fetch_failed"], false);
        assert_eq!(json["output"]["identifier"], "stats.tsv");
        assert_eq!(json["classes"], serde_json::json!([]));
    }
}
