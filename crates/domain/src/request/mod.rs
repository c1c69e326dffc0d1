//! HTTP Request domain types

mod body;
mod method;
mod query;
mod spec;

pub use body::{RequestBody, RequestBodyKind};
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
pub use spec::RequestSpec;
