extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::weather::WeatherError;

#[derive(Clone, Debug, PartialEq)]
pub struct ErrorRecord {
    pub message: String,
    pub cause: Option<String>,
}

impl ErrorRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }
}

impl From<WeatherError> for ErrorRecord {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::Message(message) => ErrorRecord::new(message),
            other => ErrorRecord::new(other.to_string()),
        }
    }
}

/// Append-only failure collection, drained when the errors view paints it.
/// Records arrive from any render or refresh path and are never dropped.
#[derive(Default)]
pub struct ErrorSink {
    records: Vec<ErrorRecord>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: ErrorRecord) {
        self.records.push(record);
    }

    /// All records in arrival order; the sink is empty afterwards.
    pub fn drain(&mut self) -> Vec<ErrorRecord> {
        core::mem::take(&mut self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
