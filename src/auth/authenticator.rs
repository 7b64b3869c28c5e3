use crate::auth::credentials::Credentials;
use crate::auth::password::verify_password;
use crate::database::models::User;
use crate::database::{DatabaseError, Store};

/// Resolve credentials to a stored user.
///
/// Unknown e-mail and wrong password both resolve to `None`; only store
/// failures are errors.
pub async fn resolve(
    store: &dyn Store,
    credentials: &Credentials,
) -> Result<Option<User>, DatabaseError> {
    let (email, password) = match credentials {
        Credentials::None => return Ok(None),
        Credentials::Basic { email, password } | Credentials::Bearer { email, password } => {
            (email, password)
        }
    };

    let Some(user) = store.find_user_by_email(email).await? else {
        tracing::debug!("Authentication failed: no user with e-mail {}", email);
        return Ok(None);
    };

    if !verify_password(password, &user.password) {
        tracing::debug!("Authentication failed: wrong password for {}", email);
        return Ok(None);
    }

    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::database::models::{NewUser, Role};
    use crate::database::MemoryStore;

    async fn store_with_user() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_user(NewUser {
                name: "Admin".into(),
                email: "admin@shop.test".into(),
                password_hash: hash_password("1234567890").unwrap(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        store
    }

    fn basic(email: &str, password: &str) -> Credentials {
        Credentials::Basic {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn resolves_matching_credentials() {
        let store = store_with_user().await;
        let user = resolve(&store, &basic("admin@shop.test", "1234567890"))
            .await
            .unwrap()
            .expect("user resolved");
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn bearer_claims_resolve_like_basic() {
        let store = store_with_user().await;
        let creds = Credentials::Bearer {
            email: "admin@shop.test".into(),
            password: "1234567890".into(),
        };
        assert!(resolve(&store, &creds).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn failures_collapse_to_none() {
        let store = store_with_user().await;
        assert!(resolve(&store, &Credentials::None).await.unwrap().is_none());
        assert!(resolve(&store, &basic("nobody@shop.test", "1234567890"))
            .await
            .unwrap()
            .is_none());
        assert!(resolve(&store, &basic("admin@shop.test", "wrong-password"))
            .await
            .unwrap()
            .is_none());
    }
}
