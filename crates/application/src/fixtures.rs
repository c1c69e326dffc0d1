//! Fixture construction.
//!
//! Turns the seed into wire payloads and the request specs every step
//! sends. Built once per run; nothing here touches the network.

use petstore_domain::request::{RequestBody, RequestSpec};
use petstore_domain::{
    ApiEndpoints, DomainError, DomainResult, HarnessConfig, OrderRecord, SeedConfig, TestSuite,
    UserRecord,
};
use serde::Serialize;
use serde_json::Value;

/// Builds [`Fixtures`] from a harness configuration.
#[derive(Debug, Clone)]
pub struct FixtureBuilder {
    endpoints: ApiEndpoints,
    seed: SeedConfig,
}

impl FixtureBuilder {
    /// Starts from the configured seed and endpoints.
    #[must_use]
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            endpoints: config.endpoints(),
            seed: config.seed.clone(),
        }
    }

    /// Validates the seed and serializes the payloads.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSeed` for an unusable seed and
    /// `DomainError::InvalidUrl` when the endpoints do not form a URL.
    pub fn build(self) -> DomainResult<Fixtures> {
        self.seed.validate()?;

        // The user endpoint takes an array even for a single user.
        let users_payload = Value::Array(vec![to_payload("user", &self.seed.user)?]);
        let pet_payload = to_payload("pet", &self.seed.pet)?;

        let fixtures = Fixtures {
            users_payload,
            pet_payload,
            order_template: self.seed.order.clone(),
            endpoints: self.endpoints,
            seed: self.seed,
        };
        fixtures.create_users().full_url()?;
        Ok(fixtures)
    }
}

fn to_payload<T: Serialize>(field: &'static str, record: &T) -> DomainResult<Value> {
    serde_json::to_value(record).map_err(|e| DomainError::InvalidSeed {
        field,
        reason: e.to_string(),
    })
}

/// Payloads and request specs for one scenario run.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixtures {
    endpoints: ApiEndpoints,
    seed: SeedConfig,
    users_payload: Value,
    pet_payload: Value,
    order_template: OrderRecord,
}

impl Fixtures {
    /// The seed the fixtures were built from.
    #[must_use]
    pub const fn seed(&self) -> &SeedConfig {
        &self.seed
    }

    /// Resource URLs.
    #[must_use]
    pub const fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    /// Single-element user array.
    #[must_use]
    pub const fn users_payload(&self) -> &Value {
        &self.users_payload
    }

    /// Pet payload.
    #[must_use]
    pub const fn pet_payload(&self) -> &Value {
        &self.pet_payload
    }

    /// Order with `petId` still unset.
    #[must_use]
    pub const fn order_template(&self) -> &OrderRecord {
        &self.order_template
    }

    /// `POST /user/createWithArray`
    #[must_use]
    pub fn create_users(&self) -> RequestSpec {
        RequestSpec::post("create users", self.endpoints.create_users())
            .with_json(self.users_payload.clone())
    }

    /// `GET /user/{username}`
    #[must_use]
    pub fn get_user(&self) -> RequestSpec {
        RequestSpec::get("get user", self.endpoints.user(&self.seed.user.username))
    }

    /// `PUT /user/{username}` with the full replacement record.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSeed` if the record cannot be serialized.
    pub fn update_user(&self, user: &UserRecord) -> DomainResult<RequestSpec> {
        Ok(
            RequestSpec::put("update user", self.endpoints.user(&self.seed.user.username))
                .with_json(to_payload("user", user)?),
        )
    }

    /// `DELETE /user/{username}`
    #[must_use]
    pub fn delete_user(&self) -> RequestSpec {
        RequestSpec::delete("delete user", self.endpoints.user(&self.seed.user.username))
    }

    /// `GET /user/login` with the seeded credentials.
    #[must_use]
    pub fn login(&self) -> RequestSpec {
        login_request(
            &self.endpoints,
            &self.seed.user.username,
            &self.seed.user.password,
        )
    }

    /// `POST /pet`
    #[must_use]
    pub fn create_pet(&self) -> RequestSpec {
        RequestSpec::post("create pet", self.endpoints.pets()).with_json(self.pet_payload.clone())
    }

    /// `GET /pet/{id}`
    #[must_use]
    pub fn get_pet(&self, id: i64) -> RequestSpec {
        RequestSpec::get("get pet", self.endpoints.pet(id))
    }

    /// `DELETE /pet/{id}`
    #[must_use]
    pub fn delete_pet(&self, id: i64) -> RequestSpec {
        RequestSpec::delete("delete pet", self.endpoints.pet(id))
    }

    /// `POST /store/order` with a JSON body still to be attached.
    #[must_use]
    pub fn create_order_template(&self) -> RequestSpec {
        RequestSpec::post("create order", self.endpoints.orders())
            .with_body(RequestBody::json_template())
    }

    /// `POST /store/order` carrying `order`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSeed` if the order cannot be serialized.
    pub fn create_order(&self, order: &OrderRecord) -> DomainResult<RequestSpec> {
        Ok(self
            .create_order_template()
            .with_json(to_payload("order", order)?))
    }

    /// `GET /store/order/{id}`
    #[must_use]
    pub fn get_order(&self, id: i64) -> RequestSpec {
        RequestSpec::get("get order", self.endpoints.order(id))
    }

    /// `DELETE /store/order/{id}`
    #[must_use]
    pub fn delete_order(&self, id: i64) -> RequestSpec {
        RequestSpec::delete("delete order", self.endpoints.order(id))
    }

    /// Status 200 with a JSON content type.
    #[must_use]
    pub fn ok(&self) -> TestSuite {
        TestSuite::ok()
    }

    /// Status 404 with a JSON content type.
    #[must_use]
    pub fn not_found(&self) -> TestSuite {
        TestSuite::not_found()
    }
}

pub(crate) fn login_request(
    endpoints: &ApiEndpoints,
    username: &str,
    password: &str,
) -> RequestSpec {
    RequestSpec::get("login", endpoints.login())
        .with_query("username", username)
        .with_query("password", password)
}

pub(crate) fn logout_request(endpoints: &ApiEndpoints) -> RequestSpec {
    RequestSpec::get("logout", endpoints.logout())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use petstore_domain::request::{HttpMethod, RequestBodyKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixtures() -> Fixtures {
        FixtureBuilder::new(&HarnessConfig::default()).build().unwrap()
    }

    #[test]
    fn test_users_payload_is_single_element_array() {
        let fixtures = fixtures();
        let payload = fixtures.users_payload();

        assert_eq!(payload.as_array().map(Vec::len), Some(1));
        assert_eq!(payload[0]["username"], json!("test_user_name"));
        assert_eq!(payload[0]["firstName"], json!("test_user_first_name"));
        assert_eq!(payload[0]["userStatus"], json!(0));
        assert_eq!(payload[0]["phone"], json!("+7(987)65-43-21"));
    }

    #[test]
    fn test_pet_payload_uses_wire_names() {
        let fixtures = fixtures();
        let pet = fixtures.pet_payload();

        assert_eq!(pet["category"]["name"], json!("test_pet_category_name"));
        assert_eq!(pet["photoUrls"], json!(["test_pet_photo_url.com"]));
        assert_eq!(pet["tags"][0]["name"], json!("test_pet_tag_name"));
        assert_eq!(pet["status"], json!("test_pet_status"));
    }

    #[test]
    fn test_order_template_has_no_pet_yet() {
        let fixtures = fixtures();
        assert_eq!(fixtures.order_template().pet_id, 0);

        let template = fixtures.create_order_template();
        assert_eq!(template.body.kind, RequestBodyKind::Json);
        assert!(template.body.content.is_none());

        let request = fixtures
            .create_order(&fixtures.order_template().for_pet(42))
            .unwrap();
        let body = request.body.content.unwrap();
        assert_eq!(body["petId"], json!(42));
        assert_eq!(body["shipDate"], json!("2022-06-11T08:01:50.696Z"));
        assert_eq!(body["complete"], json!(true));
    }

    #[test]
    fn test_request_specs_target_resources() {
        let fixtures = fixtures();

        let create = fixtures.create_users();
        assert_eq!(create.method, HttpMethod::Post);
        assert_eq!(
            create.url,
            "https://petstore.swagger.io/v2/user/createWithArray"
        );

        let login = fixtures.login().full_url().unwrap();
        assert_eq!(
            login.as_str(),
            "https://petstore.swagger.io/v2/user/login?username=test_user_name&password=test_user_password"
        );

        assert_eq!(fixtures.delete_pet(7).method, HttpMethod::Delete);
        assert_eq!(
            fixtures.get_order(9).url,
            "https://petstore.swagger.io/v2/store/order/9"
        );
    }

    #[test]
    fn test_update_user_carries_full_record() {
        let fixtures = fixtures();
        let updated = fixtures.seed().updated_user();
        let request = fixtures.update_user(&updated).unwrap();

        assert_eq!(request.method, HttpMethod::Put);
        let body = request.body.content.unwrap();
        assert_eq!(body["phone"], json!("+7(123)45-67-89"));
        assert_eq!(body["email"], json!("test_user_email@gmail.com"));
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        let mut config = HarnessConfig::default();
        config.seed.pet.tags.clear();

        let error = FixtureBuilder::new(&config).build().unwrap_err();
        assert!(matches!(
            error,
            DomainError::InvalidSeed {
                field: "pet.tags",
                ..
            }
        ));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let config = HarnessConfig {
            base_url: "not a url".to_string(),
            ..HarnessConfig::default()
        };
        let error = FixtureBuilder::new(&config).build().unwrap_err();
        assert!(matches!(error, DomainError::InvalidUrl(_)));
    }
}
