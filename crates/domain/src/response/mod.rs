//! HTTP Response domain types

mod json_path;
mod spec;

pub use json_path::{JsonView, query};
pub use spec::ResponseSpec;
