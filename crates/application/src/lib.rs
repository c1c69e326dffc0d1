//! Petstore Application - Scenario orchestration
//!
//! This crate holds the lifecycle scenario and the components it drives:
//! fixture construction, the step executor, session handling and the
//! eventual-consistency waiter. External systems are reached only through
//! the ports in [`ports`].

pub mod error;
pub mod executor;
pub mod fixtures;
pub mod ports;
pub mod runner;
pub mod scenario;
pub mod session;
pub mod waiter;

pub use error::{AssertionViolation, ScenarioError, ScenarioResult, StepError, StepResult};
pub use executor::{ParsedResponse, StepExecutor};
pub use fixtures::{FixtureBuilder, Fixtures};
pub use ports::{Clock, HttpClient, HttpClientError};
pub use runner::TestRunner;
pub use scenario::{Scenario, ScenarioReport, StepReport, order_for_pet};
pub use session::SessionManager;
pub use waiter::Waiter;
