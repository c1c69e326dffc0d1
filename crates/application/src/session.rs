//! Login and logout.

use petstore_domain::envelope::{ACK_OK, ACK_TYPE, LOGIN_MARKER};
use petstore_domain::request::RequestSpec;
use petstore_domain::{ApiEndpoints, Session, SessionToken, TestSuite, session_token_from_message};
use tracing::{debug, info};

use crate::error::{AssertionViolation, StepError, StepResult};
use crate::executor::StepExecutor;
use crate::fixtures::logout_request;
use crate::ports::HttpClient;

/// Opens and closes authenticated sessions.
#[derive(Debug)]
pub struct SessionManager<C: ?Sized> {
    executor: StepExecutor<C>,
    endpoints: ApiEndpoints,
}

impl<C: HttpClient + ?Sized> SessionManager<C> {
    /// Creates a manager that talks through `executor`.
    #[must_use]
    pub const fn new(executor: StepExecutor<C>, endpoints: ApiEndpoints) -> Self {
        Self {
            executor,
            endpoints,
        }
    }

    /// Sends a prepared login request and captures the session token.
    ///
    /// The username recorded on the session is taken from the request's
    /// `username` query parameter.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` if the acknowledgement is malformed or carries
    /// no token, `StepError::Transport` if the call fails,
    /// `StepError::Precondition` if the request names no user.
    pub async fn login_with(&self, request: &RequestSpec) -> StepResult<Session> {
        let username = request
            .query
            .get("username")
            .ok_or_else(|| StepError::precondition("login request carries no username"))?
            .to_string();

        let response = self.executor.execute(request, &TestSuite::ok()).await?;
        response
            .expect_str("type", ACK_TYPE)?
            .expect_contains("message", LOGIN_MARKER)?;
        let message = response.str_at("message")?;
        let token = session_token_from_message(message)
            .and_then(SessionToken::new)
            .ok_or_else(|| {
                StepError::from(AssertionViolation::new(
                    response.request(),
                    "login message carries a session token",
                    format!("{LOGIN_MARKER}:<token>"),
                    Some(message.to_string()),
                ))
            })?;

        info!(user = %username, "logged in");
        debug!(token = ?token, "session token captured");
        Ok(Session::new(username, token))
    }

    /// Ends `session`.
    ///
    /// The session is consumed; the service does not read the token here.
    ///
    /// # Errors
    ///
    /// `StepError::Assertion` if the acknowledgement is not `ok`.
    pub async fn logout(&self, session: Session) -> StepResult<()> {
        self.executor
            .execute_as(&session, &logout_request(&self.endpoints), &TestSuite::ok())
            .await?
            .expect_ack(Some(ACK_OK))?;
        info!(user = %session.username, "logged out");
        Ok(())
    }
}
