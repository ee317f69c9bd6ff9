//! Command-line arguments. Defined in the `damats-cli` crate so the build script
//! and the docs generator can share them without depending on this crate.

use crate::config::AppConfig;
use crate::source::{HttpFetcher, SourceFetcher};
use crate::statistics::Highlight;
use std::time::Duration;

pub use damats_cli::{render_options_markdown, Args, PrintFormat, DEFAULT_MIME_TYPE};

impl From<&Args> for Highlight {
    fn from(args: &Args) -> Self {
        Highlight {
            class_idx: args.class_idx,
            lc_class_idx: args.lc_class_idx,
        }
    }
}

/// MIME type for a bare reference: CLI arg over config.
pub fn mime_type_from_args_and_config(args: &Args, config: &AppConfig) -> String {
    args.mime_type
        .clone()
        .unwrap_or_else(|| config.http.default_mime_type.clone())
}

/// Build the fetcher from CLI args and config, with CLI args taking precedence.
pub fn fetcher_from_args_and_config(args: &Args, config: &AppConfig) -> SourceFetcher {
    SourceFetcher::new(HttpFetcher {
        timeout: Duration::from_secs(args.timeout.unwrap_or(config.http.timeout_secs)),
        user_agent: config.http.user_agent.clone(),
    })
}
