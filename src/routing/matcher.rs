/// Prefix separating the JSON API from static assets
pub const API_PREFIX: &str = "/api";

const ID_MIN_LENGTH: usize = 8;
const ID_MAX_LENGTH: usize = 24;

/// Resources addressable by identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Products,
    Orders,
}

impl Resource {
    pub fn segment(&self) -> &'static str {
        match self {
            Resource::Users => "users",
            Resource::Products => "products",
            Resource::Orders => "orders",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "users" => Some(Resource::Users),
            "products" => Some(Resource::Products),
            "orders" => Some(Resource::Orders),
            _ => None,
        }
    }
}

/// Fixed, identifier-free API paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionRoute {
    Register,
    Login,
    Authorize,
    Users,
    Products,
    Cart,
    Orders,
}

impl CollectionRoute {
    pub fn path(&self) -> &'static str {
        match self {
            CollectionRoute::Register => "/api/register",
            CollectionRoute::Login => "/api/login",
            CollectionRoute::Authorize => "/api/authorize",
            CollectionRoute::Users => "/api/users",
            CollectionRoute::Products => "/api/products",
            CollectionRoute::Cart => "/api/cart",
            CollectionRoute::Orders => "/api/orders",
        }
    }

    fn from_path(path: &str) -> Option<Self> {
        match path {
            "/api/register" => Some(CollectionRoute::Register),
            "/api/login" => Some(CollectionRoute::Login),
            "/api/authorize" => Some(CollectionRoute::Authorize),
            "/api/users" => Some(CollectionRoute::Users),
            "/api/products" => Some(CollectionRoute::Products),
            "/api/cart" => Some(CollectionRoute::Cart),
            "/api/orders" => Some(CollectionRoute::Orders),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Collection(CollectionRoute),
    Item(Resource, String),
}

impl Route {
    /// Route pattern with the identifier replaced by `{id}`
    pub fn pattern(&self) -> String {
        match self {
            Route::Collection(route) => route.path().to_string(),
            Route::Item(resource, _) => format!("{}/{}/{{id}}", API_PREFIX, resource.segment()),
        }
    }
}

/// Paths outside the API prefix are static assets
pub fn is_api_path(path: &str) -> bool {
    path.starts_with(API_PREFIX)
}

/// Classify an API path. Matching is exact and case-sensitive; anything that
/// is not a declared collection path or `/api/<resource>/<id>` is unmatched.
pub fn classify(path: &str) -> Option<Route> {
    if let Some(route) = CollectionRoute::from_path(path) {
        return Some(Route::Collection(route));
    }

    let rest = path.strip_prefix(API_PREFIX)?.strip_prefix('/')?;
    let (segment, id) = rest.split_once('/')?;
    let resource = Resource::from_segment(segment)?;

    is_valid_id(id).then(|| Route::Item(resource, id.to_string()))
}

/// `[0-9a-z]{8,24}`
fn is_valid_id(id: &str) -> bool {
    (ID_MIN_LENGTH..=ID_MAX_LENGTH).contains(&id.len())
        && id.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_routes_match_exactly() {
        assert_eq!(
            classify("/api/products"),
            Some(Route::Collection(CollectionRoute::Products))
        );
        assert_eq!(
            classify("/api/login"),
            Some(Route::Collection(CollectionRoute::Login))
        );
        assert_eq!(classify("/api/products/"), None);
        assert_eq!(classify("/api/Products"), None);
        assert_eq!(classify("/api/unknown"), None);
        assert_eq!(classify("/api"), None);
    }

    #[test]
    fn item_routes_require_id_shape() {
        assert_eq!(
            classify("/api/users/5f8d0d55b54764421b7156c9"),
            Some(Route::Item(Resource::Users, "5f8d0d55b54764421b7156c9".into()))
        );
        assert_eq!(
            classify("/api/orders/abcd1234"),
            Some(Route::Item(Resource::Orders, "abcd1234".into()))
        );
        // too short, too long, uppercase
        assert_eq!(classify("/api/products/abc123"), None);
        assert_eq!(classify("/api/products/0123456789abcdef0123456789"), None);
        assert_eq!(classify("/api/products/ABCDEF123"), None);
        // extra segment
        assert_eq!(classify("/api/products/abcd1234/extra"), None);
        // item routes only exist for users, products and orders
        assert_eq!(classify("/api/cart/abcd1234"), None);
    }

    #[test]
    fn item_pattern_substitutes_placeholder() {
        let route = classify("/api/products/abcd1234").unwrap();
        assert_eq!(route.pattern(), "/api/products/{id}");
        assert_eq!(
            Route::Collection(CollectionRoute::Cart).pattern(),
            "/api/cart"
        );
    }

    #[test]
    fn static_paths() {
        assert!(!is_api_path("/"));
        assert!(!is_api_path("/js/cart.js"));
        assert!(is_api_path("/api/users"));
    }
}
