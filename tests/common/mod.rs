use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{header, Method, RequestBuilder, StatusCode};
use serde_json::Value;

use webshop_api::auth::password::hash_password;
use webshop_api::config::AppConfig;
use webshop_api::database::models::{NewProduct, NewUser, Role};
use webshop_api::database::{MemoryStore, Store};
use webshop_api::{app, AppState};

pub const ADMIN_EMAIL: &str = "admin@shop.test";
pub const ADMIN_PASSWORD: &str = "1234567890";
pub const CUSTOMER_EMAIL: &str = "customer@shop.test";
pub const CUSTOMER_PASSWORD: &str = "0987654321";

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    pub admin_id: String,
    pub customer_id: String,
    pub product_id: String,
}

impl TestServer {
    /// Start an in-process server on a free port backed by a seeded
    /// in-memory store
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let store = Arc::new(MemoryStore::new());
        let admin = store
            .insert_user(NewUser {
                name: "Admin".into(),
                email: ADMIN_EMAIL.into(),
                password_hash: hash_password(ADMIN_PASSWORD)?,
                role: Role::Admin,
            })
            .await?;
        let customer = store
            .insert_user(NewUser {
                name: "Customer".into(),
                email: CUSTOMER_EMAIL.into(),
                password_hash: hash_password(CUSTOMER_PASSWORD)?,
                role: Role::Customer,
            })
            .await?;
        let product = store
            .insert_product(NewProduct {
                name: "Desk lamp".into(),
                price: "24.99".parse()?,
                image: None,
                description: Some("Adjustable".into()),
            })
            .await?;

        let mut config = AppConfig::development();
        config.server.port = port;
        config.server.public_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/public").into();
        config.api.enable_request_logging = false;

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let router = app(AppState::new(store, config));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            base_url,
            client: reqwest::Client::new(),
            admin_id: admin.id,
            customer_id: customer.id,
            product_id: product.id,
        };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request accepting JSON, without credentials
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header(header::ACCEPT, "application/json")
    }

    pub fn as_admin(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path)
            .basic_auth(ADMIN_EMAIL, Some(ADMIN_PASSWORD))
    }

    pub fn as_customer(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path)
            .basic_auth(CUSTOMER_EMAIL, Some(CUSTOMER_PASSWORD))
    }
}

/// Response status plus the JSON body, or `Value::Null` when there is none
pub async fn send(request: RequestBuilder) -> Result<(StatusCode, Value)> {
    let response = request.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}
