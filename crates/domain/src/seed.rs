//! Seed values the lifecycle scenario submits and expects back.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::record::{Category, OrderRecord, PetRecord, Tag, UserRecord};

/// Number of leading `shipDate` characters that must survive the round trip.
pub const DEFAULT_SHIP_DATE_PREFIX: usize = 23;

/// Every value the scenario seeds, built once and passed down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedConfig {
    /// User to create.
    pub user: UserRecord,
    /// Phone the update step writes.
    pub updated_phone: String,
    /// Pet to create.
    pub pet: PetRecord,
    /// Order template; `petId` is attached at order time.
    pub order: OrderRecord,
    /// How much of `shipDate` is compared after the round trip.
    pub ship_date_prefix_len: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            user: UserRecord {
                id: 0,
                username: "test_user_name".to_string(),
                first_name: "test_user_first_name".to_string(),
                last_name: "test_user_last_name".to_string(),
                email: "test_user_email@gmail.com".to_string(),
                password: "test_user_password".to_string(),
                phone: "+7(987)65-43-21".to_string(),
                user_status: 0,
            },
            updated_phone: "+7(123)45-67-89".to_string(),
            pet: PetRecord {
                id: 0,
                category: Category {
                    id: 0,
                    name: "test_pet_category_name".to_string(),
                },
                name: "test_pet_name".to_string(),
                photo_urls: vec!["test_pet_photo_url.com".to_string()],
                tags: vec![Tag {
                    id: 0,
                    name: "test_pet_tag_name".to_string(),
                }],
                status: "test_pet_status".to_string(),
            },
            order: OrderRecord {
                id: 0,
                pet_id: 0,
                quantity: 1,
                ship_date: "2022-06-11T08:01:50.696Z".to_string(),
                status: "placed".to_string(),
                complete: true,
            },
            ship_date_prefix_len: DEFAULT_SHIP_DATE_PREFIX,
        }
    }
}

impl SeedConfig {
    /// Checks the seed can drive the scenario.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSeed` naming the first unusable field.
    pub fn validate(&self) -> DomainResult<()> {
        let invalid = |field: &'static str, reason: &str| {
            Err(DomainError::InvalidSeed {
                field,
                reason: reason.to_string(),
            })
        };

        if self.user.username.trim().is_empty() {
            return invalid("user.username", "must not be empty");
        }
        if self.user.username.contains('/') {
            return invalid("user.username", "must not contain '/'");
        }
        if self.user.password.is_empty() {
            return invalid("user.password", "must not be empty");
        }
        if self.updated_phone == self.user.phone {
            return invalid("updatedPhone", "must differ from user.phone");
        }
        if self.pet.photo_urls.is_empty() {
            return invalid("pet.photoUrls", "needs at least one URL");
        }
        if self.pet.tags.is_empty() {
            return invalid("pet.tags", "needs at least one tag");
        }
        if self.order.pet_id != 0 {
            return invalid("order.petId", "is attached at order time and must be 0");
        }
        if self.ship_date_prefix().is_none() {
            return invalid("order.shipDate", "shorter than the compared prefix");
        }
        Ok(())
    }

    /// The leading part of `shipDate` the service must echo back.
    #[must_use]
    pub fn ship_date_prefix(&self) -> Option<&str> {
        if self.ship_date_prefix_len == 0 {
            return None;
        }
        self.order.ship_date.get(..self.ship_date_prefix_len)
    }

    /// The user as it should read back after the update step.
    #[must_use]
    pub fn updated_user(&self) -> UserRecord {
        UserRecord {
            phone: self.updated_phone.clone(),
            ..self.user.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_seed_is_valid() {
        let seed = SeedConfig::default();
        assert_eq!(seed.validate(), Ok(()));
        assert_eq!(seed.ship_date_prefix(), Some("2022-06-11T08:01:50.696"));
    }

    #[test]
    fn test_updated_user_changes_only_phone() {
        let seed = SeedConfig::default();
        let updated = seed.updated_user();
        assert_eq!(updated.phone, "+7(123)45-67-89");
        assert_eq!(
            UserRecord {
                phone: seed.user.phone.clone(),
                ..updated
            },
            seed.user
        );
    }

    #[test]
    fn test_rejects_unusable_seeds() {
        let mut seed = SeedConfig::default();
        seed.pet.tags.clear();
        assert!(matches!(
            seed.validate(),
            Err(DomainError::InvalidSeed { field: "pet.tags", .. })
        ));

        let mut seed = SeedConfig::default();
        seed.updated_phone = seed.user.phone.clone();
        assert!(seed.validate().is_err());

        let mut seed = SeedConfig::default();
        seed.ship_date_prefix_len = 64;
        assert!(matches!(
            seed.validate(),
            Err(DomainError::InvalidSeed { field: "order.shipDate", .. })
        ));
    }
}
