//! The question form: observable state plus the one submit operation.

pub mod query_form;
pub mod state;

pub use query_form::QueryForm;
pub use state::{FormState, View};
