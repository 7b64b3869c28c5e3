use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::auth::token::validate_jwt;
use crate::config::SecurityConfig;

/// Raw credentials carried by a request's `Authorization` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    None,
    Basic { email: String, password: String },
    Bearer { email: String, password: String },
}

impl Credentials {
    pub fn is_none(&self) -> bool {
        matches!(self, Credentials::None)
    }
}

/// Authorization scheme named in the header, regardless of whether the
/// credentials behind it are usable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Basic,
    Bearer,
}

pub fn scheme(headers: &HeaderMap) -> Option<Scheme> {
    let value = authorization(headers)?;
    if value.starts_with("Basic ") {
        Some(Scheme::Basic)
    } else if value.starts_with("Bearer ") {
        Some(Scheme::Bearer)
    } else {
        None
    }
}

/// Parse the `Authorization` header. Missing, malformed or unverifiable
/// credentials all yield [`Credentials::None`].
pub fn extract(headers: &HeaderMap, security: &SecurityConfig) -> Credentials {
    let Some(value) = authorization(headers) else {
        return Credentials::None;
    };

    if let Some(encoded) = value.strip_prefix("Basic ") {
        return parse_basic(encoded.trim()).unwrap_or(Credentials::None);
    }

    if let Some(token) = value.strip_prefix("Bearer ") {
        let token = token.trim();
        if token.is_empty() {
            return Credentials::None;
        }
        return match validate_jwt(token, security) {
            Ok(claims) => Credentials::Bearer {
                email: claims.email,
                password: claims.password,
            },
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                Credentials::None
            }
        };
    }

    Credentials::None
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Decode `base64(email:password)`, splitting on the first colon
fn parse_basic(encoded: &str) -> Option<Credentials> {
    let decoded = STANDARD.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;

    Some(Credentials::Basic {
        email: email.to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{generate_jwt, Claims};
    use axum::http::HeaderValue;

    fn security() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "test-secret".into(),
            jwt_expiry_hours: 1,
        }
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn basic(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn missing_or_empty_header() {
        assert_eq!(extract(&HeaderMap::new(), &security()), Credentials::None);
        assert_eq!(extract(&headers(""), &security()), Credentials::None);
        assert_eq!(scheme(&HeaderMap::new()), None);
    }

    #[test]
    fn basic_credentials_split_on_first_colon() {
        let creds = extract(&headers(&basic("a@b.com:pass:word")), &security());
        assert_eq!(
            creds,
            Credentials::Basic {
                email: "a@b.com".into(),
                password: "pass:word".into()
            }
        );
    }

    #[test]
    fn malformed_basic_is_none() {
        assert!(extract(&headers("Basic !!!not-base64"), &security()).is_none());
        assert!(extract(&headers(&basic("no-colon-here")), &security()).is_none());
        assert!(extract(&headers("Digest abc"), &security()).is_none());
    }

    #[test]
    fn bearer_token_yields_claims() {
        let claims = Claims::new("a@b.com".into(), "1234567890".into(), 1);
        let token = generate_jwt(&claims, &security()).unwrap();
        let value = format!("Bearer {token}");

        assert_eq!(scheme(&headers(&value)), Some(Scheme::Bearer));
        assert_eq!(
            extract(&headers(&value), &security()),
            Credentials::Bearer {
                email: "a@b.com".into(),
                password: "1234567890".into()
            }
        );
    }

    #[test]
    fn tampered_bearer_is_none() {
        let claims = Claims::new("a@b.com".into(), "1234567890".into(), 1);
        let token = generate_jwt(&claims, &security()).unwrap();
        let tampered = format!("Bearer {token}x");
        assert!(extract(&headers(&tampered), &security()).is_none());
        assert_eq!(scheme(&headers(&tampered)), Some(Scheme::Bearer));
    }
}
