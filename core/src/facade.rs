//! Named operations over the Graylog REST API.
//!
//! Every method renders one `Route` from `crate::routes` and forwards it to
//! `GraylogApi::dispatch`; results and errors come back from the adapter
//! unchanged. Endpoints outside the catalog are reachable through
//! `GraylogApi::adapter`.

use crate::adapter::RestAdapter;
use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult};
use crate::http::{HttpMethod, Transport};
use crate::routes::{self, Route};
use crate::transport::UreqTransport;
use crate::types::{ApiResponse, NewUser, Parameters, Payload, UserStatus};

/// Graylog API client.
#[derive(Debug)]
pub struct GraylogApi<T = UreqTransport> {
    adapter: RestAdapter<T>,
}

impl GraylogApi<UreqTransport> {
    pub fn new(config: AdapterConfig) -> Self {
        Self {
            adapter: RestAdapter::new(config),
        }
    }
}

impl<T: Transport> GraylogApi<T> {
    pub fn with_adapter(adapter: RestAdapter<T>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &RestAdapter<T> {
        &self.adapter
    }

    /// Render `route` with `args` and send it through the adapter.
    pub fn dispatch(
        &self,
        route: &Route,
        args: &[&str],
        query: Option<&Parameters>,
        body: Option<&Payload>,
    ) -> AdapterResult<ApiResponse> {
        if query.is_some() && !route.accepts_query {
            return Err(AdapterError::invalid_argument(format!(
                "route {} does not take query parameters",
                route.name
            )));
        }
        let path = route.render(args)?;
        match route.method {
            HttpMethod::Get => self.adapter.get(&path, query),
            HttpMethod::Post => self.adapter.post(&path, query, body),
            HttpMethod::Put => self.adapter.put(&path, query, body),
            HttpMethod::Delete => self.adapter.delete(&path, query, body),
        }
    }

    fn call(&self, route: &Route, args: &[&str]) -> AdapterResult<ApiResponse> {
        self.dispatch(route, args, None, None)
    }

    fn query(
        &self,
        route: &Route,
        args: &[&str],
        query: Option<&Parameters>,
    ) -> AdapterResult<ApiResponse> {
        self.dispatch(route, args, query, None)
    }

    // /authz
    pub fn auth_grants_overview(&self) -> AdapterResult<ApiResponse> {
        self.call(&routes::AUTH_GRANTS_OVERVIEW, &[])
    }

    pub fn auth_roles(&self, query: Option<&Parameters>) -> AdapterResult<ApiResponse> {
        self.query(&routes::AUTH_ROLES, &[], query)
    }

    pub fn auth_roles_of_user(
        &self,
        username: &str,
        query: Option<&Parameters>,
    ) -> AdapterResult<ApiResponse> {
        self.query(&routes::AUTH_ROLES_OF_USER, &[username], query)
    }

    pub fn auth_role_by_id(&self, role_id: &str) -> AdapterResult<ApiResponse> {
        self.call(&routes::AUTH_ROLE_BY_ID, &[role_id])
    }

    pub fn auth_assignees_of_role(
        &self,
        role_id: &str,
        query: Option<&Parameters>,
    ) -> AdapterResult<ApiResponse> {
        self.query(&routes::AUTH_ASSIGNEES_OF_ROLE, &[role_id], query)
    }

    // /ca, /certificates
    pub fn ca(&self) -> AdapterResult<ApiResponse> {
        self.call(&routes::CA, &[])
    }

    pub fn certificates(&self) -> AdapterResult<ApiResponse> {
        self.call(&routes::CERTIFICATES, &[])
    }

    // /cluster
    pub fn cluster(&self) -> AdapterResult<ApiResponse> {
        self.call(&routes::CLUSTER, &[])
    }

    /// Process buffer dump of one node, or of the node serving the request
    /// when `node_id` is `None` or empty.
    pub fn process_buffer_dump(&self, node_id: Option<&str>) -> AdapterResult<ApiResponse> {
        self.call(&routes::PROCESS_BUFFER_DUMP, &[node_id.unwrap_or_default()])
    }

    pub fn jvm_info(&self, node_id: &str) -> AdapterResult<ApiResponse> {
        self.call(&routes::JVM_INFO, &[node_id])
    }

    // /streams
    pub fn streams(&self) -> AdapterResult<ApiResponse> {
        self.call(&routes::STREAMS, &[])
    }

    // /users
    pub fn create_user(&self, user: NewUser) -> AdapterResult<ApiResponse> {
        let body = user.into_payload();
        self.dispatch(&routes::CREATE_USER, &[], None, Some(&body))
    }

    pub fn users(&self, query: Option<&Parameters>) -> AdapterResult<ApiResponse> {
        self.query(&routes::USERS, &[], query)
    }

    pub fn users_paginated(&self, query: Option<&Parameters>) -> AdapterResult<ApiResponse> {
        self.query(&routes::USERS_PAGINATED, &[], query)
    }

    pub fn user_by_id(&self, user_id: &str) -> AdapterResult<ApiResponse> {
        self.call(&routes::USER_BY_ID, &[user_id])
    }

    pub fn user_by_username(&self, username: &str) -> AdapterResult<ApiResponse> {
        self.call(&routes::USER_BY_USERNAME, &[username])
    }

    pub fn user_tokens_by_id(&self, user_id: &str) -> AdapterResult<ApiResponse> {
        self.call(&routes::USER_TOKENS_BY_ID, &[user_id])
    }

    pub fn delete_user_by_id(&self, user_id: &str) -> AdapterResult<ApiResponse> {
        self.call(&routes::DELETE_USER_BY_ID, &[user_id])
    }

    pub fn delete_user_by_username(&self, username: &str) -> AdapterResult<ApiResponse> {
        self.call(&routes::DELETE_USER_BY_USERNAME, &[username])
    }

    /// Set a user's account status.
    ///
    /// `status` must be `enabled`, `disabled` or `deleted`; anything else is
    /// rejected with `AdapterError::InvalidArgument` before a request is sent.
    pub fn change_user_status(
        &self,
        user_id: &str,
        status: &str,
    ) -> AdapterResult<ApiResponse> {
        let status: UserStatus = status.parse()?;
        self.set_user_status(user_id, status)
    }

    pub fn set_user_status(
        &self,
        user_id: &str,
        status: UserStatus,
    ) -> AdapterResult<ApiResponse> {
        self.call(&routes::CHANGE_USER_STATUS, &[user_id, status.as_str()])
    }

    // /views
    pub fn views(&self, query: Option<&Parameters>) -> AdapterResult<ApiResponse> {
        self.query(&routes::VIEWS, &[], query)
    }

    pub fn view_by_id(&self, view_id: &str) -> AdapterResult<ApiResponse> {
        self.call(&routes::VIEW_BY_ID, &[view_id])
    }
}
