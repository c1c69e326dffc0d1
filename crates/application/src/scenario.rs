//! Scenario orchestrator.
//!
//! Drives the six lifecycle steps in their fixed order, threading the ids
//! and tokens one step discovers into the steps that need them. The first
//! failure halts the run.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use petstore_domain::envelope::{ACK_OK, NOT_FOUND_CODE, USER_NOT_FOUND};
use petstore_domain::request::RequestSpec;
use petstore_domain::{
    DomainError, HarnessConfig, LifecycleState, OrderRecord, PetRecord, ScenarioStep, Session,
    TestSuite, UserRecord,
};
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{AssertionViolation, ScenarioError, ScenarioResult, StepError, StepResult};
use crate::executor::{ParsedResponse, StepExecutor};
use crate::fixtures::{FixtureBuilder, Fixtures};
use crate::ports::{Clock, HttpClient};
use crate::session::SessionManager;
use crate::waiter::Waiter;

/// Outcome of one completed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// The step.
    pub step: ScenarioStep,
    /// Wall time spent in it, waits included.
    pub elapsed: Duration,
}

/// Summary of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Identifier of this run.
    pub run_id: Uuid,
    /// When the first step started.
    pub started_at: DateTime<Utc>,
    /// When the report was taken.
    pub finished_at: DateTime<Utc>,
    /// Completed steps in order.
    pub steps: Vec<StepReport>,
    /// Lifecycle state at the time of the report.
    pub state: LifecycleState,
}

impl ScenarioReport {
    /// True once every step has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.steps.len() == ScenarioStep::ALL.len()
    }

    /// Sum of the step durations.
    #[must_use]
    pub fn total_elapsed(&self) -> Duration {
        self.steps.iter().map(|s| s.elapsed).sum()
    }
}

/// Runs the lifecycle against one service.
pub struct Scenario<C: ?Sized, K> {
    run_id: Uuid,
    fixtures: Fixtures,
    executor: StepExecutor<C>,
    sessions: SessionManager<C>,
    waiter: Waiter,
    clock: K,
    state: LifecycleState,
    next: Option<ScenarioStep>,
    halted: Option<ScenarioStep>,
    started_at: Option<DateTime<Utc>>,
    completed: Vec<StepReport>,
}

impl<C: HttpClient + ?Sized, K: Clock> Scenario<C, K> {
    /// Builds the fixtures and wires the components.
    ///
    /// # Errors
    ///
    /// `ScenarioError::Setup` if the seed or endpoints are unusable.
    pub fn new(config: &HarnessConfig, client: Arc<C>, clock: K) -> ScenarioResult<Self> {
        let fixtures = FixtureBuilder::new(config).build()?;
        let executor = StepExecutor::new(client);
        let sessions = SessionManager::new(executor.clone(), fixtures.endpoints().clone());

        Ok(Self {
            run_id: Uuid::now_v7(),
            fixtures,
            executor,
            sessions,
            waiter: Waiter::new(config.wait_policy),
            clock,
            state: LifecycleState::new(),
            next: Some(ScenarioStep::first()),
            halted: None,
            started_at: None,
            completed: Vec::new(),
        })
    }

    /// Identifier of this run.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Ids and token discovered so far.
    #[must_use]
    pub const fn state(&self) -> &LifecycleState {
        &self.state
    }

    /// The step `run_step` accepts next, `None` once finished or halted.
    #[must_use]
    pub const fn next_step(&self) -> Option<ScenarioStep> {
        self.next
    }

    /// Fixtures built for this run.
    #[must_use]
    pub const fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// Runs every remaining step.
    ///
    /// # Errors
    ///
    /// The first step failure, naming the step.
    pub async fn run(&mut self) -> ScenarioResult<ScenarioReport> {
        info!(
            run_id = %self.run_id,
            wait = self.waiter.policy().mode(),
            "scenario started"
        );
        if let Some(failed) = self.halted {
            return Err(halted_error(failed, failed));
        }
        while let Some(step) = self.next {
            self.run_step(step).await?;
        }
        let report = self.report();
        info!(
            run_id = %self.run_id,
            steps = report.steps.len(),
            elapsed_ms = millis(report.total_elapsed()),
            "scenario passed"
        );
        Ok(report)
    }

    /// Runs `step`, which must be the next one in order.
    ///
    /// # Errors
    ///
    /// `StepError::Precondition` if `step` is out of order or the run has
    /// halted; otherwise whatever the step itself fails with.
    pub async fn run_step(&mut self, step: ScenarioStep) -> ScenarioResult<StepReport> {
        if let Some(failed) = self.halted {
            return Err(halted_error(step, failed));
        }
        match self.next {
            Some(expected) if expected == step => {}
            Some(expected) => {
                return Err(ScenarioError::Step {
                    step,
                    source: StepError::precondition(format!(
                        "{step} requested but {expected} is next"
                    )),
                });
            }
            None => {
                return Err(ScenarioError::Step {
                    step,
                    source: StepError::precondition("scenario already complete"),
                });
            }
        }

        if self.started_at.is_none() {
            self.started_at = Some(self.clock.now());
        }
        info!(run_id = %self.run_id, step = %step, "step started");
        let begun = Instant::now();

        let outcome = match step {
            ScenarioStep::CreateAndLoginUser => self.create_and_login_user().await,
            ScenarioStep::UpdateUser => self.update_user().await,
            ScenarioStep::CreatePet => self.create_pet().await,
            ScenarioStep::CreateOrder => self.create_order().await,
            ScenarioStep::DeletePetAndOrder => self.delete_pet_and_order().await,
            ScenarioStep::DeleteUser => self.delete_user().await,
        };

        let elapsed = begun.elapsed();
        match outcome {
            Ok(()) => {
                info!(step = %step, elapsed_ms = millis(elapsed), "step passed");
                let report = StepReport { step, elapsed };
                self.completed.push(report.clone());
                self.next = step.next();
                Ok(report)
            }
            Err(source) => {
                warn!(step = %step, error = %source, "step failed");
                self.halted = Some(step);
                self.next = None;
                Err(ScenarioError::Step { step, source })
            }
        }
    }

    /// Snapshot of the run so far.
    #[must_use]
    pub fn report(&self) -> ScenarioReport {
        let finished_at = self.clock.now();
        ScenarioReport {
            run_id: self.run_id,
            started_at: self.started_at.unwrap_or(finished_at),
            finished_at,
            steps: self.completed.clone(),
            state: self.state.clone(),
        }
    }

    async fn create_and_login_user(&mut self) -> StepResult<()> {
        let ok = self.fixtures.ok();
        self.executor
            .execute(&self.fixtures.create_users(), &ok)
            .await?
            .expect_ack(Some(ACK_OK))?;

        let expected = self.fixtures.seed().user.clone();
        let read = self
            .read_back("user read-back", &self.fixtures.get_user(), &ok, |r| {
                expect_user(r, &expected)
            })
            .await?;
        let user_id = read.id_at("id")?;
        self.state.assign_user_id(user_id).map_err(reassigned)?;
        info!(user_id, "user created");

        let session = self.open_session().await?;
        self.sessions.logout(session).await
    }

    async fn update_user(&mut self) -> StepResult<()> {
        let ok = self.fixtures.ok();
        let updated = self.fixtures.seed().updated_user();
        self.executor
            .execute(&self.fixtures.update_user(&updated)?, &ok)
            .await?
            .expect_ack(None)?;

        self.read_back("updated user read-back", &self.fixtures.get_user(), &ok, |r| {
            expect_user(r, &updated)
        })
        .await?;
        info!(phone = %updated.phone, "user updated");
        Ok(())
    }

    async fn create_pet(&mut self) -> StepResult<()> {
        let ok = self.fixtures.ok();
        let session = self.open_session().await?;

        let created = self
            .executor
            .execute_as(&session, &self.fixtures.create_pet(), &ok)
            .await?;
        let pet_id = created.id_at("id")?;
        self.state.assign_pet_id(pet_id).map_err(reassigned)?;
        info!(pet_id, "pet created");

        let expected = self.fixtures.seed().pet.clone();
        self.read_back("pet read-back", &self.fixtures.get_pet(pet_id), &ok, |r| {
            expect_pet(r, pet_id, &expected)
        })
        .await?;

        self.sessions.logout(session).await
    }

    async fn create_order(&mut self) -> StepResult<()> {
        let ok = self.fixtures.ok();
        let order = order_for_pet(self.fixtures.order_template(), self.state.pet_id())?;
        let prefix = self
            .fixtures
            .seed()
            .ship_date_prefix()
            .ok_or_else(|| StepError::precondition("shipDate is shorter than the compared prefix"))?
            .to_string();
        let session = self.open_session().await?;

        let created = self
            .executor
            .execute_as(&session, &self.fixtures.create_order(&order)?, &ok)
            .await?;
        let order_id = created.id_at("id")?;
        self.state.assign_order_id(order_id).map_err(reassigned)?;
        info!(order_id, pet_id = order.pet_id, "order created");

        self.read_back("order read-back", &self.fixtures.get_order(order_id), &ok, |r| {
            expect_order(r, order_id, &order, &prefix)
        })
        .await?;

        self.sessions.logout(session).await
    }

    async fn delete_pet_and_order(&mut self) -> StepResult<()> {
        let ok = self.fixtures.ok();
        let order_id = require_id(self.state.order_id(), "orderId", ScenarioStep::CreateOrder)?;
        let pet_id = require_id(self.state.pet_id(), "petId", ScenarioStep::CreatePet)?;

        self.executor
            .execute(&self.fixtures.delete_order(order_id), &ok)
            .await?
            .expect_ack(None)?;
        self.executor
            .execute(&self.fixtures.delete_pet(pet_id), &ok)
            .await?
            .expect_ack(None)?;

        let not_found = self.fixtures.not_found();
        self.read_back(
            "order absence",
            &self.fixtures.get_order(order_id),
            &not_found,
            |r| r.expect_error(None, None).map(drop),
        )
        .await?;
        self.read_back(
            "pet absence",
            &self.fixtures.get_pet(pet_id),
            &not_found,
            |r| r.expect_error(None, None).map(drop),
        )
        .await?;
        info!(order_id, pet_id, "pet and order deleted");
        Ok(())
    }

    async fn delete_user(&mut self) -> StepResult<()> {
        let ok = self.fixtures.ok();
        let username = self.fixtures.seed().user.username.clone();
        self.executor
            .execute(&self.fixtures.delete_user(), &ok)
            .await?
            .expect_ack(Some(&username))?;

        self.read_back(
            "user absence",
            &self.fixtures.get_user(),
            &self.fixtures.not_found(),
            |r| {
                r.expect_error(Some(NOT_FOUND_CODE), Some(USER_NOT_FOUND))
                    .map(drop)
            },
        )
        .await?;
        info!(user = %username, "user deleted");
        Ok(())
    }

    /// Logs in with the seeded credentials. Every login must yield a token
    /// different from the one before it.
    async fn open_session(&mut self) -> StepResult<Session> {
        let session = self.sessions.login_with(&self.fixtures.login()).await?;
        if self.state.previous_token() == Some(&session.token) {
            return Err(AssertionViolation::new(
                "login",
                "session token differs from the previous login",
                "a fresh token",
                Some(format!("{:?}", session.token)),
            )
            .into());
        }
        self.state.record_token(session.token.clone());
        Ok(session)
    }

    async fn read_back<F>(
        &self,
        what: &str,
        request: &RequestSpec,
        expectation: &TestSuite,
        check: F,
    ) -> StepResult<ParsedResponse>
    where
        F: Fn(&ParsedResponse) -> StepResult<()>,
    {
        let executor = &self.executor;
        let check = &check;
        self.waiter
            .settle(what, move || async move {
                let response = executor.execute(request, expectation).await?;
                check(&response)?;
                Ok(response)
            })
            .await
    }
}

/// Attaches `pet_id` to the order template.
///
/// # Errors
///
/// `StepError::Precondition` while the pet id is still unknown.
pub fn order_for_pet(template: &OrderRecord, pet_id: i64) -> StepResult<OrderRecord> {
    if pet_id == 0 {
        return Err(StepError::precondition(
            "petId is unknown; create_pet must succeed before create_order",
        ));
    }
    Ok(template.for_pet(pet_id))
}

fn expect_user(response: &ParsedResponse, user: &UserRecord) -> StepResult<()> {
    response
        .expect_str("username", &user.username)?
        .expect_str("firstName", &user.first_name)?
        .expect_str("lastName", &user.last_name)?
        .expect_str("email", &user.email)?
        .expect_str("password", &user.password)?
        .expect_str("phone", &user.phone)?
        .expect_i64("userStatus", i64::from(user.user_status))?;
    Ok(())
}

fn expect_pet(response: &ParsedResponse, id: i64, pet: &PetRecord) -> StepResult<()> {
    response
        .expect_i64("id", id)?
        .expect_i64("category.id", pet.category.id)?
        .expect_str("category.name", &pet.category.name)?
        .expect_str("name", &pet.name)?
        .expect_str("status", &pet.status)?;
    if let Some(url) = pet.photo_urls.first() {
        response.expect_str("photoUrls[0]", url)?;
    }
    if let Some(tag) = pet.tags.first() {
        response
            .expect_i64("tags[0].id", tag.id)?
            .expect_str("tags[0].name", &tag.name)?;
    }
    Ok(())
}

fn expect_order(
    response: &ParsedResponse,
    id: i64,
    order: &OrderRecord,
    ship_date_prefix: &str,
) -> StepResult<()> {
    response
        .expect_i64("id", id)?
        .expect_i64("petId", order.pet_id)?
        .expect_i64("quantity", i64::from(order.quantity))?
        .expect_prefix("shipDate", ship_date_prefix)?
        .expect_str("status", &order.status)?
        .expect_bool("complete", order.complete)?;
    Ok(())
}

fn require_id(id: i64, field: &str, producer: ScenarioStep) -> StepResult<i64> {
    if id == 0 {
        Err(StepError::precondition(format!(
            "{field} is unknown; {producer} must succeed first"
        )))
    } else {
        Ok(id)
    }
}

fn reassigned(error: DomainError) -> StepError {
    StepError::precondition(error.to_string())
}

fn halted_error(step: ScenarioStep, failed: ScenarioStep) -> ScenarioError {
    ScenarioError::Step {
        step,
        source: StepError::precondition(format!("scenario halted after {failed} failed")),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
