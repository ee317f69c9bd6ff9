#![allow(dead_code)]

use damats::{
    AppEvent, Fetch, FetchError, Highlight, ProcessOutput, StatisticsRequest,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Header, totals and two land-cover rows. Class C is the empty "others" column.
pub const STATS_BODY: &str = "\t\tA\tB\tC\r\n\
                              \t100\t60\t40\t0\r\n\
                              forest\t70\t50\t20\t0\r\n\
                              water\t30\t10\t20\t0\r\n";

pub fn request(url: &str, highlight: Highlight) -> StatisticsRequest {
    StatisticsRequest::new(
        ProcessOutput::from_reference(url, damats::output::DEFAULT_MIME_TYPE),
        highlight,
    )
    .expect("valid request")
}

pub fn display(url: &str) -> AppEvent {
    AppEvent::DisplayClassStatistics(Box::new(request(url, Highlight::default())))
}

/// Hands out canned responses in order and records every call.
#[derive(Default)]
pub struct ScriptedFetch {
    responses: Mutex<VecDeque<Result<String, FetchError>>>,
    calls: Mutex<Vec<(String, String)>>,
    count: AtomicUsize,
}

impl ScriptedFetch {
    pub fn new(responses: Vec<Result<String, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Fetch for ScriptedFetch {
    fn fetch(&self, url: &str, mime_type: &str) -> Result<String, FetchError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), mime_type.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(FetchError::Transport {
                    url: url.to_string(),
                    message: "no scripted response left".to_string(),
                })
            })
    }
}

pub fn transport_error(url: &str) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        message: "connection refused".to_string(),
    }
}
