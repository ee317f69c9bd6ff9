mod common;

use common::{display, request, transport_error, ScriptedFetch, STATS_BODY};
use damats::{
    App, AppEvent, ClassStatisticsController, FetchOutcome, FetchStatus, Highlight,
    StatisticsError,
};
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::time::Duration;

fn app(fetch: Arc<ScriptedFetch>) -> (App, Receiver<AppEvent>) {
    let (tx, rx) = channel();
    (App::new(tx, fetch), rx)
}

/// Run `event` and its follow-ups to completion.
fn dispatch(app: &mut App, event: AppEvent) {
    let mut next = Some(event);
    while let Some(event) = next {
        next = app.event(event);
    }
}

fn next_fetched(rx: &Receiver<AppEvent>) -> AppEvent {
    let event = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("fetch result");
    assert!(matches!(event, AppEvent::StatisticsFetched(..)), "got {:?}", event);
    event
}

#[test]
fn test_successful_fetch_reaches_success_state() {
    let fetch = Arc::new(ScriptedFetch::new(vec![Ok(STATS_BODY.to_string())]));
    let (mut app, rx) = app(Arc::clone(&fetch));

    dispatch(&mut app, display("http://host/jobs/7/stats.tsv"));
    assert!(app.is_busy());
    dispatch(&mut app, next_fetched(&rx));

    let dialog = app.statistics().dialog().unwrap();
    let template = dialog.template();
    assert!(!template.is_fetching);
    assert!(!template.fetch_failed);
    assert_eq!(template.classes.len(), 2);
    assert_eq!(template.lc_classes[0].label, "forest");
    assert_eq!(
        fetch.calls(),
        vec![(
            "http://host/jobs/7/stats.tsv".to_string(),
            damats::output::DEFAULT_MIME_TYPE.to_string()
        )]
    );
}

#[test]
fn test_transport_error_is_failure_without_parsing() {
    let url = "http://host/stats.tsv";
    let fetch = Arc::new(ScriptedFetch::new(vec![Err(transport_error(url))]));
    let (mut app, rx) = app(Arc::clone(&fetch));

    dispatch(&mut app, display(url));
    dispatch(&mut app, next_fetched(&rx));

    let dialog = app.statistics().dialog().unwrap();
    // A parse attempt would have produced a Malformed error instead
    assert!(matches!(
        dialog.status(),
        FetchStatus::Failure(StatisticsError::Fetch(_))
    ));
    assert!(dialog.template().fetch_failed);
    assert!(dialog.template().classes.is_empty());
    assert_eq!(fetch.call_count(), 1);
}

#[test]
fn test_result_of_replaced_dialog_is_discarded() {
    let fetch = Arc::new(ScriptedFetch::new(vec![
        Ok(STATS_BODY.to_string()),
        Err(transport_error("http://host/b.tsv")),
    ]));
    let (mut app, rx) = app(Arc::clone(&fetch));

    dispatch(&mut app, display("http://host/a.tsv"));
    let first = next_fetched(&rx);
    dispatch(&mut app, display("http://host/b.tsv"));
    let second = next_fetched(&rx);

    // First dialog's result arrives after the second dialog opened
    dispatch(&mut app, first);
    assert_eq!(app.debug_state().stale_results, 1);
    let dialog = app.statistics().dialog().unwrap();
    assert_eq!(dialog.output().identifier, "b.tsv");
    assert!(dialog.status().is_fetching());

    dispatch(&mut app, second);
    assert!(app.statistics().dialog().unwrap().status().is_failure());
}

#[test]
fn test_result_after_close_is_discarded() {
    let mut controller = ClassStatisticsController::new();
    let ticket = match controller.on_request(request("http://host/a.tsv", Highlight::default())) {
        Some(AppEvent::DoFetchStatistics(ticket)) => ticket,
        other => panic!("expected fetch, got {:?}", other),
    };
    assert!(controller.on_close());
    assert_eq!(
        controller.on_fetched(ticket.token, Ok(STATS_BODY.to_string())),
        FetchOutcome::Closed
    );
    assert!(controller.dialog().is_none());
}

#[test]
fn test_refetch_after_failure_recovers() {
    let url = "http://host/stats.tsv";
    let fetch = Arc::new(ScriptedFetch::new(vec![
        Err(transport_error(url)),
        Ok(STATS_BODY.to_string()),
    ]));
    let (mut app, rx) = app(Arc::clone(&fetch));

    dispatch(&mut app, display(url));
    dispatch(&mut app, next_fetched(&rx));
    assert!(app.statistics().dialog().unwrap().status().is_failure());

    dispatch(&mut app, AppEvent::Refetch);
    dispatch(&mut app, next_fetched(&rx));
    assert!(app.statistics().dialog().unwrap().statistics().is_some());
    assert_eq!(fetch.call_count(), 2);
}

#[test]
fn test_highlight_flows_from_request_to_template() {
    let fetch = Arc::new(ScriptedFetch::new(vec![Ok(STATS_BODY.to_string())]));
    let (mut app, rx) = app(fetch);
    let highlight = Highlight {
        class_idx: Some(1),
        lc_class_idx: Some(1),
    };
    dispatch(
        &mut app,
        AppEvent::DisplayClassStatistics(Box::new(request("http://host/s.tsv", highlight))),
    );
    dispatch(&mut app, next_fetched(&rx));

    let template = app.statistics().dialog().unwrap().template();
    assert!(template.classes[1].highlighted);
    assert!(!template.classes[0].highlighted);
    // lc index 1 is "water", the second kept row in table order
    let water = template.lc_classes.iter().find(|r| r.label == "water").unwrap();
    assert!(water.highlighted);
    assert!(water.counts.iter().all(|c| c.highlighted));
    let forest = template.lc_classes.iter().find(|r| r.label == "forest").unwrap();
    assert!(!forest.counts[0].highlighted);
    assert!(forest.counts[1].highlighted);
}
