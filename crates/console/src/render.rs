use client::{Health, Neighbors};
use form::{FormState, View};
use serde_json::Value;
use std::fmt::Write;

pub fn render_state(state: &FormState) -> String {
    match state.view() {
        View::Idle => String::new(),
        View::Loading => "Loading...\n".to_string(),
        View::Error => format!("{}\n", state.error),
        View::Result => {
            let mut out = String::new();
            let _ = writeln!(out, "Answer:\n{}\n", state.answer);
            out.push_str(&render_records("Evidence", &state.evidence));
            out.push('\n');
            out.push_str(&render_records("Graph hits", &state.graph_hits));
            out
        }
    }
}

pub fn render_records(title: &str, records: &[Value]) -> String {
    let mut out = format!("{} ({}):\n", title, records.len());
    for (i, record) in records.iter().enumerate() {
        let marker = format!("{:>3}. ", i + 1);
        let pad = " ".repeat(marker.len());
        for (line_no, line) in record_lines(record).iter().enumerate() {
            let prefix = if line_no == 0 { &marker } else { &pad };
            let _ = writeln!(out, "{}{}", prefix, line);
        }
    }
    out
}

/// Objects become `key: value` lines; anything else is one line.
pub fn record_lines(record: &Value) -> Vec<String> {
    match record {
        Value::Object(fields) if !fields.is_empty() => fields
            .iter()
            .map(|(key, value)| format!("{}: {}", key, scalar(value)))
            .collect(),
        other => vec![scalar(other)],
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn render_health(health: &Health) -> String {
    let service = if health.service.is_empty() {
        "unknown service"
    } else {
        health.service.as_str()
    };
    format!("{}: {}\n", service, health.status)
}

pub fn render_neighbors(neighbors: &Neighbors) -> String {
    let title = format!("Neighbors of {}", neighbors.entity_id);
    render_records(&title, &neighbors.neighbors)
}
