use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{FrameError, FrameResult};

/// Settings consulted during ingestion and grouping.
///
/// The value is passed explicitly to the calls that need it; nothing in the crate reads
/// process-wide state. Missing fields fall back to [`FrameConfig::default`] when deserializing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Text values treated as null on ingestion. Matching is exact: no trimming, no case folding.
    pub null_tokens: BTreeSet<String>,
    /// Separator placed between label texts when building multi-column group keys.
    pub key_delimiter: String,
    /// `chrono` format strings tried in order when coercing text to a timestamp.
    ///
    /// The special entry `"rfc3339"` selects [`chrono::DateTime::parse_from_rfc3339`].
    pub datetime_formats: Vec<String>,
}

pub const RFC3339: &str = "rfc3339";

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            null_tokens: ["", "NaN", "N/A", "n/a", "nil"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            key_delimiter: "|".to_owned(),
            datetime_formats: vec![
                RFC3339.to_owned(),
                "%Y-%m-%dT%H:%M:%S%.f".to_owned(),
                "%Y-%m-%d %H:%M:%S%.f".to_owned(),
                "%Y-%m-%d".to_owned(),
                "%m/%d/%Y".to_owned(),
            ],
        }
    }
}

impl FrameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_null_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_key_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.key_delimiter = delimiter.into();
        self
    }

    pub fn with_datetime_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datetime_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_null_token(&self, text: &str) -> bool {
        self.null_tokens.contains(text)
    }

    /// Reject settings that would make grouping ambiguous.
    pub fn validate(&self) -> FrameResult<()> {
        if self.key_delimiter.is_empty() {
            return Err(FrameError::InvalidConfig(
                "key_delimiter must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}
