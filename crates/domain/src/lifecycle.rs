//! Cross-step lifecycle state and the ordered step list.

use std::fmt;

use crate::error::{DomainError, DomainResult};

/// Opaque credential returned by login. Never empty.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a token, rejecting empty values.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        if token.is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens only ever show up redacted in logs and panics.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} chars>)", self.0.chars().count())
    }
}

/// Authenticated session capability, required by every authenticated call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// User the session belongs to.
    pub username: String,
    /// Token captured at login.
    pub token: SessionToken,
}

impl Session {
    /// Creates a session for `username`.
    #[must_use]
    pub fn new(username: impl Into<String>, token: SessionToken) -> Self {
        Self {
            username: username.into(),
            token,
        }
    }
}

/// Values discovered by one step and consumed by later ones.
///
/// Each id is written once by the step that learns it; `0` means unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleState {
    user_id: i64,
    pet_id: i64,
    order_id: i64,
    previous_token: Option<SessionToken>,
}

impl LifecycleState {
    /// Empty state at scenario start.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Server-assigned user id, `0` until read back.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Server-assigned pet id, `0` until created.
    #[must_use]
    pub const fn pet_id(&self) -> i64 {
        self.pet_id
    }

    /// Server-assigned order id, `0` until created.
    #[must_use]
    pub const fn order_id(&self) -> i64 {
        self.order_id
    }

    /// Token issued by the previous login, if any.
    ///
    /// Kept after that session logs out. It is never sent again; the next
    /// login only compares its own token against it.
    #[must_use]
    pub const fn previous_token(&self) -> Option<&SessionToken> {
        self.previous_token.as_ref()
    }

    /// Records the user id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyAssigned` if it was already recorded.
    pub fn assign_user_id(&mut self, id: i64) -> DomainResult<()> {
        assign_once(&mut self.user_id, "userId", id)
    }

    /// Records the pet id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyAssigned` if it was already recorded.
    pub fn assign_pet_id(&mut self, id: i64) -> DomainResult<()> {
        assign_once(&mut self.pet_id, "petId", id)
    }

    /// Records the order id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyAssigned` if it was already recorded.
    pub fn assign_order_id(&mut self, id: i64) -> DomainResult<()> {
        assign_once(&mut self.order_id, "orderId", id)
    }

    /// Remembers a login's token for the next distinctness check.
    pub fn record_token(&mut self, token: SessionToken) {
        self.previous_token = Some(token);
    }
}

fn assign_once(slot: &mut i64, field: &'static str, id: i64) -> DomainResult<()> {
    if *slot != 0 {
        return Err(DomainError::AlreadyAssigned {
            field,
            current: *slot,
        });
    }
    *slot = id;
    Ok(())
}

/// The lifecycle steps, in the only order they may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScenarioStep {
    /// Create the user, read it back, log in and out.
    CreateAndLoginUser,
    /// Change the phone and read the user back.
    UpdateUser,
    /// Create a pet and read it back.
    CreatePet,
    /// Order the pet and read the order back.
    CreateOrder,
    /// Delete order and pet, confirm both are gone.
    DeletePetAndOrder,
    /// Delete the user, confirm it is gone.
    DeleteUser,
}

impl ScenarioStep {
    /// All steps in execution order.
    pub const ALL: [Self; 6] = [
        Self::CreateAndLoginUser,
        Self::UpdateUser,
        Self::CreatePet,
        Self::CreateOrder,
        Self::DeletePetAndOrder,
        Self::DeleteUser,
    ];

    /// The first step.
    #[must_use]
    pub const fn first() -> Self {
        Self::CreateAndLoginUser
    }

    /// The step that follows this one, `None` after the last.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::CreateAndLoginUser => Some(Self::UpdateUser),
            Self::UpdateUser => Some(Self::CreatePet),
            Self::CreatePet => Some(Self::CreateOrder),
            Self::CreateOrder => Some(Self::DeletePetAndOrder),
            Self::DeletePetAndOrder => Some(Self::DeleteUser),
            Self::DeleteUser => None,
        }
    }

    /// Stable snake-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateAndLoginUser => "create_and_login_user",
            Self::UpdateUser => "update_user",
            Self::CreatePet => "create_pet",
            Self::CreateOrder => "create_order",
            Self::DeletePetAndOrder => "delete_pet_and_order",
            Self::DeleteUser => "delete_user",
        }
    }
}

impl fmt::Display for ScenarioStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ids_are_write_once() {
        let mut state = LifecycleState::new();
        assert_eq!(state.assign_pet_id(10), Ok(()));
        assert_eq!(state.pet_id(), 10);
        assert_eq!(
            state.assign_pet_id(11),
            Err(DomainError::AlreadyAssigned {
                field: "petId",
                current: 10
            })
        );
        assert_eq!(state.pet_id(), 10);
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(SessionToken::new("").is_none());
        let token = SessionToken::new("123").map(|t| t.as_str().to_string());
        assert_eq!(token.as_deref(), Some("123"));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = SessionToken::new("secret-token").unwrap();
        assert_eq!(format!("{token:?}"), "SessionToken(<12 chars>)");
    }

    #[test]
    fn test_step_order() {
        let mut walked = vec![ScenarioStep::first()];
        while let Some(next) = walked.last().and_then(|s| s.next()) {
            walked.push(next);
        }
        assert_eq!(walked, ScenarioStep::ALL);
        assert!(ScenarioStep::CreatePet < ScenarioStep::CreateOrder);
        assert_eq!(ScenarioStep::DeleteUser.to_string(), "delete_user");
    }
}
