//! In-memory [`AnswerService`] for tests and offline demos.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::error::QaError;
use crate::service::AnswerService;
use crate::types::{QaRequest, QaResponse};

/// Replays scripted outcomes in order, then repeats the fallback.
pub struct ScriptedService {
    script: Mutex<VecDeque<Result<QaResponse, QaError>>>,
    fallback: Result<QaResponse, QaError>,
    requests: Mutex<Vec<QaRequest>>,
    calls: AtomicUsize,
}

impl ScriptedService {
    /// Always answers with `response`.
    pub fn answering(response: QaResponse) -> Self {
        Self::with_fallback(Ok(response))
    }

    /// Always fails with `error`.
    pub fn failing(error: QaError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<QaResponse, QaError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue an outcome ahead of the fallback.
    pub fn then(mut self, outcome: Result<QaResponse, QaError>) -> Self {
        self.script.get_mut().push_back(outcome);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn requests(&self) -> Vec<QaRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl AnswerService for ScriptedService {
    async fn answer(&self, request: &QaRequest) -> Result<QaResponse, QaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        let next = self.script.lock().await.pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}
