//! Declarative descriptors for the API's endpoint catalog.
//!
//! # Design
//! A `Route` is a verb plus a path template. Templates are `/`-separated
//! segments where `{name}` is filled from an argument and `{name?}` is an
//! optional segment that disappears when its argument is empty, so no doubled
//! separator is produced. Arguments are percent-encoded as path segments, so
//! a value containing `/`, `?` or a space stays inside its own segment. The
//! facade renders a route and hands the path to the adapter; nothing else
//! varies between endpoints.

use std::borrow::Cow;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::{AdapterError, AdapterResult};
use crate::http::HttpMethod;

/// Bytes escaped inside one path segment: the URL path set plus `/` and `%`.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

fn encode_segment(value: &str) -> Cow<'_, str> {
    utf8_percent_encode(value, PATH_SEGMENT).into()
}

/// One endpoint of the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub method: HttpMethod,
    pub template: &'static str,
    /// Whether callers may attach query parameters.
    pub accepts_query: bool,
}

enum Segment<'a> {
    Literal(&'a str),
    Required(&'a str),
    Optional(&'a str),
}

fn parse_segment(segment: &str) -> Segment<'_> {
    match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(name) => match name.strip_suffix('?') {
            Some(name) => Segment::Optional(name),
            None => Segment::Required(name),
        },
        None => Segment::Literal(segment),
    }
}

impl Route {
    const fn new(
        name: &'static str,
        method: HttpMethod,
        template: &'static str,
        accepts_query: bool,
    ) -> Self {
        Self {
            name,
            method,
            template,
            accepts_query,
        }
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        self.template
            .split('/')
            .filter_map(|segment| match parse_segment(segment) {
                Segment::Required(name) | Segment::Optional(name) => Some(name),
                Segment::Literal(_) => None,
            })
    }

    /// Fill the template's placeholders with `args`, in order.
    pub fn render(&self, args: &[&str]) -> AdapterResult<String> {
        let expected = self.placeholders().count();
        if args.len() != expected {
            return Err(AdapterError::invalid_argument(format!(
                "route {} takes {expected} argument(s) but got {}",
                self.name,
                args.len()
            )));
        }

        let mut args = args.iter();
        let mut segments: Vec<Cow<'_, str>> = Vec::new();
        for segment in self.template.split('/') {
            match parse_segment(segment) {
                Segment::Literal(literal) => segments.push(Cow::Borrowed(literal)),
                Segment::Required(_) => segments.extend(args.next().map(|v| encode_segment(v))),
                Segment::Optional(_) => {
                    if let Some(value) = args.next().filter(|v| !v.is_empty()) {
                        segments.push(encode_segment(value));
                    }
                }
            }
        }
        Ok(segments.join("/"))
    }
}

// /authz
pub const AUTH_GRANTS_OVERVIEW: Route =
    Route::new("auth_grants_overview", HttpMethod::Get, "authz/grants-overview", false);
pub const AUTH_ROLES: Route = Route::new("auth_roles", HttpMethod::Get, "authz/roles", true);
pub const AUTH_ROLES_OF_USER: Route = Route::new(
    "auth_roles_of_user",
    HttpMethod::Get,
    "authz/roles/user/{username}",
    true,
);
pub const AUTH_ROLE_BY_ID: Route =
    Route::new("auth_role_by_id", HttpMethod::Get, "authz/roles/{role_id}", false);
pub const AUTH_ASSIGNEES_OF_ROLE: Route = Route::new(
    "auth_assignees_of_role",
    HttpMethod::Get,
    "authz/roles/{role_id}/assignees",
    true,
);

// /ca, /certificates
pub const CA: Route = Route::new("ca", HttpMethod::Get, "ca", false);
pub const CERTIFICATES: Route = Route::new("certificates", HttpMethod::Get, "certificates", false);

// /cluster
pub const CLUSTER: Route = Route::new("cluster", HttpMethod::Get, "cluster", false);
pub const PROCESS_BUFFER_DUMP: Route = Route::new(
    "process_buffer_dump",
    HttpMethod::Get,
    "cluster/{node_id?}/processbufferdump",
    false,
);
pub const JVM_INFO: Route = Route::new("jvm_info", HttpMethod::Get, "cluster/{node_id}/jvm", false);

// /streams
pub const STREAMS: Route = Route::new("streams", HttpMethod::Get, "streams", false);

// /users
pub const CREATE_USER: Route = Route::new("create_user", HttpMethod::Post, "users", false);
pub const USERS: Route = Route::new("users", HttpMethod::Get, "users", true);
pub const USERS_PAGINATED: Route =
    Route::new("users_paginated", HttpMethod::Get, "users/paginated", true);
pub const USER_BY_ID: Route = Route::new("user_by_id", HttpMethod::Get, "users/id/{user_id}", false);
pub const USER_BY_USERNAME: Route =
    Route::new("user_by_username", HttpMethod::Get, "users/{username}", false);
pub const USER_TOKENS_BY_ID: Route =
    Route::new("user_tokens_by_id", HttpMethod::Get, "users/{user_id}/tokens", false);
pub const DELETE_USER_BY_ID: Route =
    Route::new("delete_user_by_id", HttpMethod::Delete, "users/id/{user_id}", false);
pub const DELETE_USER_BY_USERNAME: Route = Route::new(
    "delete_user_by_username",
    HttpMethod::Delete,
    "users/{username}",
    false,
);
pub const CHANGE_USER_STATUS: Route = Route::new(
    "change_user_status",
    HttpMethod::Put,
    "users/{user_id}/status/{status}",
    false,
);

// /views
pub const VIEWS: Route = Route::new("views", HttpMethod::Get, "views", true);
pub const VIEW_BY_ID: Route = Route::new("view_by_id", HttpMethod::Get, "views/{view_id}", false);

/// Every route the facade exposes.
pub const CATALOG: &[Route] = &[
    AUTH_GRANTS_OVERVIEW,
    AUTH_ROLES,
    AUTH_ROLES_OF_USER,
    AUTH_ROLE_BY_ID,
    AUTH_ASSIGNEES_OF_ROLE,
    CA,
    CERTIFICATES,
    CLUSTER,
    PROCESS_BUFFER_DUMP,
    JVM_INFO,
    STREAMS,
    CREATE_USER,
    USERS,
    USERS_PAGINATED,
    USER_BY_ID,
    USER_BY_USERNAME,
    USER_TOKENS_BY_ID,
    DELETE_USER_BY_ID,
    DELETE_USER_BY_USERNAME,
    CHANGE_USER_STATUS,
    VIEWS,
    VIEW_BY_ID,
];

/// Look up a route by name.
pub fn find(name: &str) -> Option<&'static Route> {
    CATALOG.iter().find(|route| route.name == name)
}
