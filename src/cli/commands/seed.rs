use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::password::hash_password;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::{config, DatabaseConfig};
use crate::database::models::product::{validate_image_url, validate_price, validate_product_name};
use crate::database::models::user::{validate_email, validate_name, validate_password};
use crate::database::models::{NewProduct, NewUser, Role};
use crate::database::{open_store, DatabaseError, Store};

#[derive(Debug, Deserialize)]
struct UserFixture {
    name: String,
    email: String,
    password: String,
    #[serde(default)]
    role: Role,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    name: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    image: Option<String>,
    description: Option<String>,
}

/// Fixture files loaded by `seed`, or by `serve` before it starts listening
#[derive(Debug, Clone, Default, Args)]
pub struct Fixtures {
    #[arg(long, help = "JSON array of users: name, email, password, role")]
    pub users: Option<PathBuf>,
    #[arg(long, help = "JSON array of products: name, price, image, description")]
    pub products: Option<PathBuf>,
}

impl Fixtures {
    pub fn is_empty(&self) -> bool {
        self.users.is_none() && self.products.is_none()
    }
}

/// Counts of inserted fixture documents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Seeded {
    pub users: usize,
    pub products: usize,
}

pub async fn handle(fixtures: Fixtures, output_format: OutputFormat) -> anyhow::Result<()> {
    let seeded = seed_database(&config().database, &fixtures).await?;

    output_success(
        output_format,
        &format!("Seeded {} users and {} products", seeded.users, seeded.products),
        Some(json!({ "users": seeded.users, "products": seeded.products })),
    )
}

/// Seed the configured PostgreSQL store. The in-memory store would be
/// discarded when the command exits, so it is refused.
async fn seed_database(database: &DatabaseConfig, fixtures: &Fixtures) -> anyhow::Result<Seeded> {
    if fixtures.is_empty() {
        anyhow::bail!("nothing to seed: pass --users and/or --products");
    }
    if database.url.is_none() {
        anyhow::bail!(
            "DATABASE_URL is not set; the in-memory store does not outlive this command. \
             Use `webshop serve --users FILE --products FILE` instead"
        );
    }

    let store = open_store(database)
        .await
        .context("failed to open store")?;
    load(store.as_ref(), fixtures).await
}

/// Load fixture files into `store`
pub async fn load(store: &dyn Store, fixtures: &Fixtures) -> anyhow::Result<Seeded> {
    let mut seeded = Seeded::default();
    if let Some(path) = &fixtures.users {
        seeded.users = seed_users(store, read_fixture(path)?).await?;
    }
    if let Some(path) = &fixtures.products {
        seeded.products = seed_products(store, read_fixture(path)?).await?;
    }
    Ok(seeded)
}

fn read_fixture<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid fixture file {}", path.display()))
}

/// Insert fixture users, keeping their roles. Existing e-mails are skipped.
async fn seed_users(store: &dyn Store, fixtures: Vec<UserFixture>) -> anyhow::Result<usize> {
    let mut inserted = 0;
    for fixture in fixtures {
        validate_password(&fixture.password)?;
        let user = NewUser {
            name: validate_name(&fixture.name)?,
            email: validate_email(&fixture.email)?,
            password_hash: hash_password(&fixture.password)?,
            role: fixture.role,
        };

        match store.insert_user(user).await {
            Ok(user) => {
                tracing::debug!("Seeded user {} ({})", user.email, user.role);
                inserted += 1;
            }
            Err(DatabaseError::Duplicate(_)) => {
                tracing::warn!("Skipping existing user {}", fixture.email);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(inserted)
}

async fn seed_products(store: &dyn Store, fixtures: Vec<ProductFixture>) -> anyhow::Result<usize> {
    let mut inserted = 0;
    for fixture in fixtures {
        let product = NewProduct {
            name: validate_product_name(&fixture.name)?,
            price: validate_price(fixture.price)?,
            image: fixture.image.as_deref().map(validate_image_url).transpose()?,
            description: fixture.description,
        };
        let product = store.insert_product(product).await?;
        tracing::debug!("Seeded product {}", product.id);
        inserted += 1;
    }
    Ok(inserted)
}
