use client::{EvidenceItem, GraphHit, Language};
use serde::Serialize;

/// Everything the query form shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    pub question: String,
    pub language: Language,
    pub answer: String,
    pub evidence: Vec<EvidenceItem>,
    pub graph_hits: Vec<GraphHit>,
    pub loading: bool,
    pub error: String,
}

/// What a presentation layer should show for a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Idle,
    Loading,
    Error,
    Result,
}

impl FormState {
    pub fn with_language(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    pub fn view(&self) -> View {
        if self.loading {
            View::Loading
        } else if !self.error.is_empty() {
            View::Error
        } else if !self.answer.is_empty() || !self.evidence.is_empty() || !self.graph_hits.is_empty() {
            View::Result
        } else {
            View::Idle
        }
    }

    /// Drop the previous outcome ahead of a new request.
    pub(crate) fn clear_outcome(&mut self) {
        self.error.clear();
        self.answer.clear();
        self.evidence.clear();
        self.graph_hits.clear();
    }
}
