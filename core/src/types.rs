//! Value types shared by the adapter and the endpoint facade.
//!
//! # Design
//! Response payloads are kept as `serde_json::Value`: the client passes the
//! server's JSON through without validating it against a schema. Callers that
//! want typed data decode it with `ApiResponse::json`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{AdapterError, AdapterResult};

/// Query-string parameters, passed through verbatim.
pub type Parameters = BTreeMap<String, String>;

/// JSON object sent as a request body.
pub type Payload = Map<String, Value>;

/// Outcome of a call that returned a 2xx status with a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status_code: u16,
    message: String,
    data: Value,
}

impl ApiResponse {
    pub fn new(status_code: u16, message: impl Into<String>, data: Value) -> Self {
        Self {
            status_code,
            message: message.into(),
            data,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Reason phrase of the response status.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn into_data(self) -> Value {
        self.data
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status_code)
    }

    /// Decode `data` into a concrete type.
    pub fn json<T: DeserializeOwned>(&self) -> AdapterResult<T> {
        T::deserialize(&self.data).map_err(AdapterError::Decode)
    }
}

/// Account status accepted by `users/{user_id}/status/{status}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Enabled,
    Disabled,
    Deleted,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enabled" => Ok(Self::Enabled),
            "disabled" => Ok(Self::Disabled),
            "deleted" => Ok(Self::Deleted),
            other => Err(AdapterError::invalid_argument(format!(
                "Status must be either 'enabled', 'disabled' or 'deleted' but was: {other}"
            ))),
        }
    }
}

/// Request body for `POST users`.
///
/// `permissions` is sent only when non-empty. Fields in `extra` are merged
/// last and replace any fixed field with the same key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub permissions: Vec<String>,
    pub extra: Payload,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = permissions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn into_payload(self) -> Payload {
        let mut body = Payload::new();
        body.insert("username".into(), self.username.into());
        body.insert("first_name".into(), self.first_name.into());
        body.insert("last_name".into(), self.last_name.into());
        body.insert("email".into(), self.email.into());
        body.insert("password".into(), self.password.into());
        if !self.permissions.is_empty() {
            body.insert("permissions".into(), self.permissions.into());
        }
        body.extend(self.extra);
        body
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    fn jane() -> NewUser {
        NewUser::new("jdoe", "Jane", "Doe", "jane@example.org", "hunter22")
    }

    #[test]
    fn empty_permissions_are_omitted() {
        let body = jane().with_permissions(Vec::<String>::new()).into_payload();
        assert!(!body.contains_key("permissions"));
        assert_eq!(body["username"], "jdoe");
        assert_eq!(body.len(), 5);
    }

    #[test]
    fn permissions_are_included_when_present() {
        let body = jane().with_permissions(["streams:read"]).into_payload();
        assert_eq!(body["permissions"], json!(["streams:read"]));
    }

    #[test]
    fn extra_fields_override_fixed_fields() {
        let body = jane()
            .with_extra("email", "override@example.org")
            .with_extra("timezone", "Europe/Berlin")
            .into_payload();
        assert_eq!(body["email"], "override@example.org");
        assert_eq!(body["timezone"], "Europe/Berlin");
    }

    #[test]
    fn extra_fields_override_permissions() {
        let body = jane()
            .with_permissions(["streams:read"])
            .with_extra("permissions", json!(["*"]))
            .into_payload();
        assert_eq!(body["permissions"], json!(["*"]));
    }

    #[test]
    fn user_status_parses_accepted_values() {
        assert_eq!("enabled".parse::<UserStatus>().unwrap(), UserStatus::Enabled);
        assert_eq!("disabled".parse::<UserStatus>().unwrap(), UserStatus::Disabled);
        assert_eq!("deleted".parse::<UserStatus>().unwrap(), UserStatus::Deleted);
    }

    #[test]
    fn user_status_rejects_other_values() {
        let err = "Enabled".parse::<UserStatus>().unwrap_err();
        assert!(matches!(err, AdapterError::InvalidArgument(_)));
        assert!(err.to_string().ends_with("but was: Enabled"));
    }

    #[test]
    fn response_decodes_typed_data() {
        #[derive(Deserialize)]
        struct Cluster {
            cluster_id: String,
        }

        let response = ApiResponse::new(200, "OK", json!({"cluster_id": "abc"}));
        let cluster: Cluster = response.json().unwrap();
        assert_eq!(cluster.cluster_id, "abc");
        assert!(response.is_success());

        let err = response.json::<Vec<String>>().unwrap_err();
        assert!(err.is_decode());
    }
}
