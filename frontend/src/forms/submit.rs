use serde::Serialize;
use thiserror::Error;

use crate::dom::FieldMap;

use super::FormKind;

pub const SENDING_LABEL: &str = "Wird gesendet...";
pub const SEND_FAILED: &str = "Senden fehlgeschlagen. Bitte versuchen Sie es später erneut.";

/// A validated form ready to leave the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub form: FormKind,
    pub fields: FieldMap,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmitError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server answered with status {0}")]
    Status(u16),
    #[error("could not encode submission: {0}")]
    Encode(String),
}

/// How the controller learns that a delivery finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Done after this many milliseconds; always succeeds.
    After(u64),
    /// The host reports the result through `PageController::finish_submission`.
    Pending,
}

pub trait Submitter {
    fn submit(&mut self, submission: &Submission) -> Delivery;
}

/// Sends nothing. Stands in for network latency with a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    latency_ms: u64,
    sent: Vec<Submission>,
}

impl SimulatedSubmitter {
    pub fn new(latency_ms: u64) -> Self {
        Self {
            latency_ms,
            sent: Vec::new(),
        }
    }

    /// Everything handed over so far.
    pub fn sent(&self) -> &[Submission] {
        &self.sent
    }
}

impl Submitter for SimulatedSubmitter {
    fn submit(&mut self, submission: &Submission) -> Delivery {
        self.sent.push(submission.clone());
        Delivery::After(self.latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_serializes_with_form_slug() {
        let mut fields = FieldMap::new();
        fields.insert("challenge".to_string(), "time".to_string());
        let submission = Submission {
            form: FormKind::Poll,
            fields,
        };

        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["form"], "poll");
        assert_eq!(json["fields"]["challenge"], "time");
    }

    #[test]
    fn simulated_submitter_records_and_delays() {
        let mut submitter = SimulatedSubmitter::new(1500);
        let submission = Submission {
            form: FormKind::Contact,
            fields: FieldMap::new(),
        };
        assert_eq!(submitter.submit(&submission), Delivery::After(1500));
        assert_eq!(submitter.sent(), &[submission]);
    }
}
