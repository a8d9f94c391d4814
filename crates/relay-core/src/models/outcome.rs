//! Tool outcome model.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::OutcomeSource;

/// Note attached to synthetic fallback data.
pub const FALLBACK_NOTE: &str = "Using fallback data (API unavailable)";

/// Result of invoking a tool for one step.
///
/// Constructors uphold the invariant that a failed outcome has an error and
/// no data, and a successful one has data and no error. Deserialization
/// checks the same invariant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "RawOutcome")]
pub struct ToolOutcome {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    source: OutcomeSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

/// Wire form of [`ToolOutcome`] before the invariant is checked.
#[derive(Deserialize)]
struct RawOutcome {
    success: bool,
    #[serde(default, deserialize_with = "present")]
    data: Option<Value>,
    #[serde(default)]
    error: Option<String>,
    source: OutcomeSource,
    #[serde(default)]
    note: Option<String>,
}

/// Keeps an explicit `null` payload as `Some(Value::Null)`.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<RawOutcome> for ToolOutcome {
    type Error = String;

    fn try_from(raw: RawOutcome) -> Result<Self, Self::Error> {
        match (raw.success, &raw.data, &raw.error) {
            (true, None, _) => return Err("successful outcome without data".to_string()),
            (true, _, Some(_)) => return Err("successful outcome with an error".to_string()),
            (false, Some(_), _) => return Err("failed outcome with data".to_string()),
            (false, _, None) => return Err("failed outcome without an error".to_string()),
            _ => {}
        }
        Ok(Self {
            success: raw.success,
            data: raw.data,
            error: raw.error,
            source: raw.source,
            note: raw.note,
        })
    }
}

impl ToolOutcome {
    /// Data freshly fetched from the provider.
    pub fn live(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            source: OutcomeSource::Live,
            note: None,
        }
    }

    /// Synthetic, non-authoritative data.
    pub fn fallback(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            source: OutcomeSource::Fallback,
            note: Some(FALLBACK_NOTE.to_string()),
        }
    }

    /// A failed step.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            source: OutcomeSource::Live,
            note: None,
        }
    }

    /// The same outcome re-tagged as served from the cache.
    pub fn into_cached(mut self) -> Self {
        if self.success {
            self.source = OutcomeSource::Cached;
        }
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn source(&self) -> OutcomeSource {
        self.source
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}
