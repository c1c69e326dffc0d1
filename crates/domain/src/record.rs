//! Wire records for the user, pet and order resources.

use serde::{Deserialize, Serialize};

/// A user as accepted by `createWithArray` and returned by user lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Server-assigned id, `0` until known.
    pub id: i64,
    /// Login name, also the resource key.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Plain-text password sent at login.
    pub password: String,
    /// Contact phone, the one field the update step changes.
    pub phone: String,
    /// Account status code.
    pub user_status: i32,
}

/// Pet category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: i64,
    /// Category name.
    pub name: String,
}

/// Pet tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag id.
    pub id: i64,
    /// Tag name.
    pub name: String,
}

/// A pet as posted to the pet resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    /// Server-assigned id, `0` until known.
    pub id: i64,
    /// Category.
    pub category: Category,
    /// Pet name.
    pub name: String,
    /// Photo URLs in order.
    pub photo_urls: Vec<String>,
    /// Tags in order.
    pub tags: Vec<Tag>,
    /// Free-form status.
    pub status: String,
}

/// A store order.
///
/// `pet_id` stays `0` in the template and is attached at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Server-assigned id, `0` until known.
    pub id: i64,
    /// Ordered pet.
    pub pet_id: i64,
    /// Quantity.
    pub quantity: i32,
    /// Ship date as an ISO-8601 literal.
    pub ship_date: String,
    /// Order status (`placed`, `approved`, `delivered`).
    pub status: String,
    /// Whether the order is complete.
    pub complete: bool,
}

impl OrderRecord {
    /// Returns a copy of this order referencing `pet_id`.
    #[must_use]
    pub fn for_pet(&self, pet_id: i64) -> Self {
        Self {
            pet_id,
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_user_uses_camel_case_keys() {
        let user = UserRecord {
            id: 0,
            username: "u".to_string(),
            first_name: "f".to_string(),
            last_name: "l".to_string(),
            email: "e".to_string(),
            password: "p".to_string(),
            phone: "1".to_string(),
            user_status: 0,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["firstName"], json!("f"));
        assert_eq!(value["userStatus"], json!(0));
    }

    #[test]
    fn test_order_for_pet_keeps_other_fields() {
        let template = OrderRecord {
            id: 0,
            pet_id: 0,
            quantity: 1,
            ship_date: "2022-06-11T08:01:50.696Z".to_string(),
            status: "placed".to_string(),
            complete: true,
        };
        let order = template.for_pet(42);
        assert_eq!(order.pet_id, 42);
        assert_eq!(order.ship_date, template.ship_date);
        assert_eq!(serde_json::to_value(&order).unwrap()["petId"], json!(42));
    }
}
