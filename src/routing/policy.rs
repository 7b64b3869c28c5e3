use axum::http::Method;

use crate::database::models::{Role, User};
use crate::error::ApiError;
use crate::routing::matcher::{CollectionRoute, Resource, Route};

/// Methods the API understands. Anything else is answered with 405 on a
/// known route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl ApiMethod {
    pub fn from_http(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(ApiMethod::Get),
            Method::POST => Some(ApiMethod::Post),
            Method::PUT => Some(ApiMethod::Put),
            Method::DELETE => Some(ApiMethod::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMethod::Get => "GET",
            ApiMethod::Post => "POST",
            ApiMethod::Put => "PUT",
            ApiMethod::Delete => "DELETE",
        }
    }

    /// POST and PUT carry a JSON payload
    pub fn has_body(&self) -> bool {
        matches!(self, ApiMethod::Post | ApiMethod::Put)
    }
}

/// Who may call a route/method pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// No credentials needed
    Public,
    /// Basic credentials required (token issuance)
    BasicOnly,
    /// Any authenticated user; operations may scope results by role
    Authenticated,
    AdminOnly,
    CustomerOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKey {
    Collection(CollectionRoute),
    Item(Resource),
}

impl RouteKey {
    pub fn of(route: &Route) -> Self {
        match route {
            Route::Collection(route) => RouteKey::Collection(*route),
            Route::Item(resource, _) => RouteKey::Item(*resource),
        }
    }
}

/// One row of the route table: allowed methods, in advertised order, with
/// the rule applied to each
#[derive(Debug)]
pub struct RouteEntry {
    pub key: RouteKey,
    pub methods: &'static [(ApiMethod, Rule)],
}

impl RouteEntry {
    pub fn rule(&self, method: ApiMethod) -> Option<Rule> {
        self.methods
            .iter()
            .find(|(allowed, _)| *allowed == method)
            .map(|(_, rule)| *rule)
    }

    /// Value of `Access-Control-Allow-Methods`
    pub fn allow_header(&self) -> String {
        self.methods
            .iter()
            .map(|(method, _)| method.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

use ApiMethod::{Delete, Get, Post, Put};

pub static ROUTE_TABLE: &[RouteEntry] = &[
    RouteEntry {
        key: RouteKey::Collection(CollectionRoute::Register),
        methods: &[(Post, Rule::Public)],
    },
    RouteEntry {
        key: RouteKey::Collection(CollectionRoute::Login),
        methods: &[(Get, Rule::BasicOnly)],
    },
    RouteEntry {
        key: RouteKey::Collection(CollectionRoute::Authorize),
        methods: &[(Get, Rule::Authenticated)],
    },
    RouteEntry {
        key: RouteKey::Collection(CollectionRoute::Users),
        methods: &[(Get, Rule::AdminOnly)],
    },
    RouteEntry {
        key: RouteKey::Collection(CollectionRoute::Products),
        methods: &[(Get, Rule::Authenticated), (Post, Rule::AdminOnly)],
    },
    RouteEntry {
        key: RouteKey::Collection(CollectionRoute::Cart),
        methods: &[(Get, Rule::Authenticated)],
    },
    RouteEntry {
        key: RouteKey::Collection(CollectionRoute::Orders),
        methods: &[(Get, Rule::Authenticated), (Post, Rule::CustomerOnly)],
    },
    RouteEntry {
        key: RouteKey::Item(Resource::Users),
        methods: &[
            (Get, Rule::AdminOnly),
            (Put, Rule::AdminOnly),
            (Delete, Rule::AdminOnly),
        ],
    },
    RouteEntry {
        key: RouteKey::Item(Resource::Products),
        methods: &[
            (Get, Rule::Authenticated),
            (Put, Rule::AdminOnly),
            (Delete, Rule::AdminOnly),
        ],
    },
    RouteEntry {
        key: RouteKey::Item(Resource::Orders),
        methods: &[(Get, Rule::Authenticated)],
    },
];

pub fn lookup(route: &Route) -> Option<&'static RouteEntry> {
    let key = RouteKey::of(route);
    ROUTE_TABLE.iter().find(|entry| entry.key == key)
}

/// Check the caller's role against a rule
pub fn authorize(rule: Rule, user: &User) -> Result<(), ApiError> {
    let allowed = match rule {
        Rule::Public | Rule::BasicOnly | Rule::Authenticated => true,
        Rule::AdminOnly => user.role == Role::Admin,
        Rule::CustomerOnly => user.role == Role::Customer,
    };

    if allowed {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Admins may not modify or delete their own account
pub fn self_target_guard(route: &Route, method: ApiMethod, user: &User) -> Result<(), ApiError> {
    let Route::Item(Resource::Users, id) = route else {
        return Ok(());
    };
    if *id != user.id {
        return Ok(());
    }

    match method {
        ApiMethod::Put => Err(ApiError::bad_request("Updating own data is not allowed")),
        ApiMethod::Delete => Err(ApiError::bad_request("Deleting own data is not allowed")),
        ApiMethod::Get | ApiMethod::Post => Ok(()),
    }
}
