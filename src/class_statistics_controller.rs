//! Opens and closes statistics dialogs in response to app events.

use crate::class_statistics_modal::{
    ClassStatisticsModal, FetchOutcome, RequestToken, RequestTokens,
};
use crate::error::FetchError;
use crate::output::StatisticsRequest;
use crate::AppEvent;

/// Owns at most one dialog at a time.
#[derive(Debug, Default)]
pub struct ClassStatisticsController {
    dialog: Option<ClassStatisticsModal>,
    tokens: RequestTokens,
}

impl ClassStatisticsController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any open dialog with one for `request` and start its fetch.
    /// Returns the event that performs the fetch.
    pub fn on_request(&mut self, request: StatisticsRequest) -> Option<AppEvent> {
        self.on_close();
        let mut dialog = ClassStatisticsModal::new(request);
        dialog.show();
        let ticket = dialog.begin_fetch(&mut self.tokens);
        self.dialog = Some(dialog);
        ticket.map(AppEvent::DoFetchStatistics)
    }

    /// Close and drop the current dialog. Returns false when none was open.
    pub fn on_close(&mut self) -> bool {
        match self.dialog.take() {
            Some(mut dialog) => {
                dialog.close();
                true
            }
            None => false,
        }
    }

    pub fn on_fetched(
        &mut self,
        token: RequestToken,
        result: Result<String, FetchError>,
    ) -> FetchOutcome {
        match self.dialog.as_mut() {
            Some(dialog) => dialog.complete_fetch(token, result),
            None => FetchOutcome::Closed,
        }
    }

    pub fn refetch(&mut self) -> Option<AppEvent> {
        let dialog = self.dialog.as_mut()?;
        dialog
            .refetch(&mut self.tokens)
            .map(AppEvent::DoFetchStatistics)
    }

    pub fn dialog(&self) -> Option<&ClassStatisticsModal> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut ClassStatisticsModal> {
        self.dialog.as_mut()
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class_statistics_modal::{DialogLifecycle, FetchTicket};
    use crate::output::{ProcessOutput, DEFAULT_MIME_TYPE};
    use crate::statistics::Highlight;

    fn request(url: &str) -> StatisticsRequest {
        StatisticsRequest::new(
            ProcessOutput::from_reference(url, DEFAULT_MIME_TYPE),
            Highlight::default(),
        )
        .unwrap()
    }

    fn ticket(event: Option<AppEvent>) -> FetchTicket {
        match event {
            Some(AppEvent::DoFetchStatistics(ticket)) => ticket,
            other => panic!("expected DoFetchStatistics, got {:?}", other),
        }
    }

    #[test]
    fn test_request_opens_shown_dialog_and_fetches() {
        let mut controller = ClassStatisticsController::new();
        let t = ticket(controller.on_request(request("http://host/a.tsv")));
        assert_eq!(t.url, "http://host/a.tsv");
        let dialog = controller.dialog().unwrap();
        assert_eq!(dialog.lifecycle(), DialogLifecycle::Shown);
        assert_eq!(dialog.latest_token(), Some(t.token));
    }

    #[test]
    fn test_new_request_replaces_dialog_and_ignores_old_result() {
        let mut controller = ClassStatisticsController::new();
        let first = ticket(controller.on_request(request("http://host/a.tsv")));
        let second = ticket(controller.on_request(request("http://host/b.tsv")));
        assert_ne!(first.token, second.token);
        assert_eq!(controller.dialog().unwrap().output().identifier, "b.tsv");

        let outcome = controller.on_fetched(first.token, Ok("\t\tA\r\n\t1\t1".into()));
        assert_eq!(outcome, FetchOutcome::Stale);
        assert!(controller.dialog().unwrap().status().is_fetching());
    }

    #[test]
    fn test_close_drops_dialog() {
        let mut controller = ClassStatisticsController::new();
        let t = ticket(controller.on_request(request("http://host/a.tsv")));
        assert!(controller.on_close());
        assert!(!controller.is_open());
        assert!(!controller.on_close());
        assert_eq!(
            controller.on_fetched(t.token, Ok(String::new())),
            FetchOutcome::Closed
        );
        assert!(controller.refetch().is_none());
    }
}
