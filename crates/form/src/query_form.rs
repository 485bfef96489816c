use client::{AnswerService, FormConfig, Language, QaRequest, ResubmitPolicy};
use tokio::sync::watch;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::state::FormState;

/// Holds the form state and sends questions to an [`AnswerService`].
///
/// State lives in a `watch` channel: every write is visible to the next read
/// and wakes every subscriber. `submit_query` takes `&self`, so a second
/// submission can start while one is in flight; what happens then is decided
/// by the configured [`ResubmitPolicy`].
pub struct QueryForm<S> {
    service: S,
    state: watch::Sender<FormState>,
    policy: ResubmitPolicy,
}

enum Start {
    Rejected,
    Ignored,
    Sent(QaRequest),
}

/// Releases the in-flight flag however the submission ends.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<FormState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            let was_loading = s.loading;
            s.loading = false;
            was_loading
        });
    }
}

impl<S: AnswerService> QueryForm<S> {
    pub fn new(service: S, config: &FormConfig) -> Self {
        let (state, _) = watch::channel(FormState::with_language(config.default_language));
        Self {
            service,
            state,
            policy: config.resubmit,
        }
    }

    pub fn set_question(&self, question: impl Into<String>) {
        let question = question.into();
        self.state.send_modify(|s| s.question = question);
    }

    pub fn set_language(&self, language: Language) {
        self.state.send_modify(|s| s.language = language);
    }

    pub fn snapshot(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    /// Send the current question and store the outcome in the form state.
    ///
    /// Never fails: every error ends up as the `error` text, and `loading`
    /// is false again once this returns or is dropped.
    pub async fn submit_query(&self) {
        let mut start = Start::Ignored;

        self.state.send_if_modified(|s| {
            // An ignored submission leaves the state alone, blank or not.
            if s.loading && self.policy == ResubmitPolicy::IgnoreWhileLoading {
                return false;
            }
            if let Err(e) = client::validate_question(&s.question) {
                s.error = e.to_string();
                start = Start::Rejected;
                return true;
            }

            s.loading = true;
            s.clear_outcome();
            start = Start::Sent(QaRequest::new(s.question.clone(), s.language));
            true
        });

        let request = match start {
            Start::Sent(request) => request,
            Start::Rejected => {
                debug!("Rejected blank question");
                return;
            }
            Start::Ignored => {
                debug!("Ignored submission while a request is in flight");
                return;
            }
        };

        let _guard = LoadingGuard { state: &self.state };
        let request_id = Uuid::new_v4();
        info!(request_id = %request_id, lang = %request.lang, "Submitting question");

        let outcome = self.service.answer(&request).await;

        if let Err(e) = &outcome {
            error!(request_id = %request_id, error = ?e, "Error getting answer");
        }

        self.state.send_modify(|s| {
            match outcome {
                Ok(resp) => {
                    s.answer = resp.answer;
                    s.evidence = resp.evidence;
                    s.graph_hits = resp.graph_hits;
                }
                Err(e) => s.error = e.to_string(),
            }
            s.loading = false;
        });
    }
}
