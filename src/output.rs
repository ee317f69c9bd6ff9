//! Process output descriptors: the job output object a statistics dialog is opened for.
//!
//! Only `reference` is interpreted; everything else is carried through to the
//! rendering layer untouched.

use crate::error::RequestError;
use crate::statistics::Highlight;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

pub use damats_cli::DEFAULT_MIME_TYPE;

fn default_mime_type() -> String {
    DEFAULT_MIME_TYPE.to_string()
}

/// Where the statistics table lives and how to ask for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDescriptor {
    pub url: String,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessOutput {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub reference: ReferenceDescriptor,
    /// Passthrough metadata (job id, process name, timestamps, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessOutput {
    /// Descriptor for a bare reference given on the command line.
    pub fn from_reference(reference: &str, mime_type: &str) -> Self {
        let identifier = reference
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(reference)
            .to_string();
        Self {
            identifier,
            title: None,
            reference: ReferenceDescriptor {
                url: reference.to_string(),
                mime_type: mime_type.to_string(),
            },
            extra: Map::new(),
        }
    }

    /// Read a JSON descriptor from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre!("Failed to read process output at {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| eyre!("Failed to parse process output at {}: {}", path.display(), e))
    }

    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.identifier)
    }
}

/// Payload of a request to display class statistics. Construct with [`StatisticsRequest::new`],
/// which rejects outputs that could never be fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsRequest {
    output: ProcessOutput,
    highlight: Highlight,
}

impl StatisticsRequest {
    pub fn new(output: ProcessOutput, highlight: Highlight) -> Result<Self, RequestError> {
        if output.reference.url.trim().is_empty() {
            return Err(RequestError::EmptyReference {
                identifier: output.identifier,
            });
        }
        if output.reference.mime_type.trim().is_empty() {
            return Err(RequestError::EmptyMimeType {
                identifier: output.identifier,
            });
        }
        Ok(Self { output, highlight })
    }

    pub fn output(&self) -> &ProcessOutput {
        &self.output
    }

    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn into_parts(self) -> (ProcessOutput, Highlight) {
        (self.output, self.highlight)
    }
}
