//! Petstore Domain - Core contract types
//!
//! This crate defines the domain model for the pet-store lifecycle
//! contract harness: seed values, wire records, request and response
//! specifications, declarative assertions and the cross-step state.
//! All types here are pure Rust with no I/O dependencies.

pub mod config;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod lifecycle;
pub mod record;
pub mod request;
pub mod response;
pub mod seed;
pub mod testing;

pub use config::{HarnessConfig, WaitPolicy};
pub use endpoints::ApiEndpoints;
pub use envelope::{AckEnvelope, ErrorEnvelope, session_token_from_message};
pub use error::{DomainError, DomainResult};
pub use lifecycle::{LifecycleState, ScenarioStep, Session, SessionToken};
pub use record::{Category, OrderRecord, PetRecord, Tag, UserRecord};
pub use seed::SeedConfig;
pub use testing::{Assertion, AssertionResult, ComparisonOperator, TestResults, TestSuite};
