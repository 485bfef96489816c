use anyhow::Result;
use client::{AnswerService, HttpAnswerService};
use form::QueryForm;
use std::io::Write;
use std::process::ExitCode;
use tracing::warn;

use crate::render;

/// Ask one question. Fails when the form ends up showing an error.
pub async fn ask<S, W>(form: &QueryForm<S>, question: String, json: bool, out: &mut W) -> Result<ExitCode>
where
    S: AnswerService,
    W: Write,
{
    form.set_question(question);
    form.submit_query().await;

    let state = form.snapshot();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&state)?)?;
    } else {
        write!(out, "{}", render::render_state(&state))?;
    }

    Ok(if state.error.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// An unhealthy status fails just like an unreachable service.
pub async fn health<W, E>(service: &HttpAnswerService, out: &mut W, err: &mut E) -> Result<ExitCode>
where
    W: Write,
    E: Write,
{
    match service.health().await {
        Ok(health) => {
            write!(out, "{}", render::render_health(&health))?;
            Ok(if health.is_healthy() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Err(e) => {
            warn!(error = ?e, "Health check failed");
            writeln!(err, "{}", e)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

pub async fn neighbors<W, E>(
    service: &HttpAnswerService,
    entity_id: &str,
    k: usize,
    out: &mut W,
    err: &mut E,
) -> Result<ExitCode>
where
    W: Write,
    E: Write,
{
    match service.graph_neighbors(entity_id, k).await {
        Ok(neighbors) => {
            write!(out, "{}", render::render_neighbors(&neighbors))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            warn!(error = ?e, entity_id = %entity_id, "Neighbor lookup failed");
            writeln!(err, "{}", e)?;
            Ok(ExitCode::FAILURE)
        }
    }
}
