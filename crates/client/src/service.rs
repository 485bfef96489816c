use async_trait::async_trait;
use std::sync::Arc;

use crate::error::QaError;
use crate::types::{QaRequest, QaResponse};

/// Anything that can turn a question into an answer.
#[async_trait]
pub trait AnswerService: Send + Sync {
    async fn answer(&self, request: &QaRequest) -> Result<QaResponse, QaError>;
}

#[async_trait]
impl<T: AnswerService + ?Sized> AnswerService for Arc<T> {
    async fn answer(&self, request: &QaRequest) -> Result<QaResponse, QaError> {
        (**self).answer(request).await
    }
}
