//! Resource URLs of the remote service.

/// Builds absolute URLs for the user, pet and store resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    root: String,
}

impl ApiEndpoints {
    /// Roots all URLs at `base_url` joined with `base_path`.
    #[must_use]
    pub fn new(base_url: &str, base_path: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let base_path = base_path.trim_matches('/');
        let root = if base_path.is_empty() {
            base_url.to_string()
        } else {
            format!("{base_url}/{base_path}")
        };
        Self { root }
    }

    /// The API root.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// `POST /user/createWithArray`
    #[must_use]
    pub fn create_users(&self) -> String {
        format!("{}/user/createWithArray", self.root)
    }

    /// `GET|PUT|DELETE /user/{username}`
    #[must_use]
    pub fn user(&self, username: &str) -> String {
        format!("{}/user/{username}", self.root)
    }

    /// `GET /user/login`
    #[must_use]
    pub fn login(&self) -> String {
        format!("{}/user/login", self.root)
    }

    /// `GET /user/logout`
    #[must_use]
    pub fn logout(&self) -> String {
        format!("{}/user/logout", self.root)
    }

    /// `POST /pet`
    #[must_use]
    pub fn pets(&self) -> String {
        format!("{}/pet", self.root)
    }

    /// `GET|DELETE /pet/{id}`
    #[must_use]
    pub fn pet(&self, id: i64) -> String {
        format!("{}/pet/{id}", self.root)
    }

    /// `POST /store/order`
    #[must_use]
    pub fn orders(&self) -> String {
        format!("{}/store/order", self.root)
    }

    /// `GET|DELETE /store/order/{id}`
    #[must_use]
    pub fn order(&self, id: i64) -> String {
        format!("{}/store/order/{id}", self.root)
    }
}
