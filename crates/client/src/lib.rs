//! Client side of the Meet-Kant question-answering service.
//!
//! The backend exposes `POST /qa/rag` plus a couple of auxiliary endpoints.
//! Everything that talks to it goes through [`AnswerService`], so the form
//! logic can be exercised against [`mock::ScriptedService`] without a server.

pub mod config;
pub mod error;
pub mod http;
pub mod language;
pub mod mock;
pub mod service;
pub mod types;

pub use config::{ApiConfig, AppConfig, FormConfig, ResubmitPolicy};
pub use error::QaError;
pub use http::HttpAnswerService;
pub use language::Language;
pub use service::AnswerService;
pub use types::{EvidenceItem, GraphHit, Health, Neighbors, QaRequest, QaResponse};

/// Reject questions that are empty once surrounding whitespace is removed.
///
/// Only the emptiness check trims; callers send the question as typed.
pub fn validate_question(question: &str) -> Result<(), QaError> {
    if question.trim().is_empty() {
        return Err(QaError::EmptyQuestion);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_questions_are_rejected() {
        for q in ["", " ", "\t\n  "] {
            let err = validate_question(q).unwrap_err();
            assert_eq!(err.to_string(), "Please enter a question");
        }
    }

    #[test]
    fn padded_question_passes() {
        assert!(validate_question("  What is the categorical imperative? ").is_ok());
    }
}
