use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{postgres::PgRow, types::Json, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::database::models::{
    new_id, NewOrder, NewProduct, NewUser, Order, OrderItem, Product, ProductUpdate, Role, User,
};
use crate::database::repository::Store;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        email       TEXT NOT NULL UNIQUE,
        password    TEXT NOT NULL,
        role        TEXT NOT NULL DEFAULT 'customer',
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id          TEXT PRIMARY KEY,
        name        TEXT NOT NULL,
        price       NUMERIC NOT NULL CHECK (price >= 0.01),
        image       TEXT,
        description TEXT,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id          TEXT PRIMARY KEY,
        customer_id TEXT NOT NULL,
        items       JSONB NOT NULL CHECK (jsonb_array_length(items) > 0),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
];

const USER_COLUMNS: &str = "id, name, email, password, role";
const PRODUCT_COLUMNS: &str = "id, name, price, image, description";
const ORDER_COLUMNS: &str = "id, customer_id, items";

/// PostgreSQL-backed store. Users and products map to plain columns, order
/// lines are kept as a JSONB document.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the collections when they do not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn user_from_row(row: &PgRow) -> Result<User, DatabaseError> {
    let role: String = row.try_get("role")?;
    let role = role
        .parse::<Role>()
        .map_err(|_| DatabaseError::Corrupt(format!("unknown role '{role}'")))?;

    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password: row.try_get("password")?,
        role,
    })
}

fn product_from_row(row: &PgRow) -> Result<Product, DatabaseError> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: row.try_get::<Decimal, _>("price")?,
        image: row.try_get("image")?,
        description: row.try_get("description")?,
    })
}

fn order_from_row(row: &PgRow) -> Result<Order, DatabaseError> {
    let Json(items) = row.try_get::<Json<Vec<OrderItem>>, _>("items")?;
    Ok(Order {
        id: row.try_get("id")?,
        customer_id: row.try_get("customer_id")?,
        items,
    })
}

fn collect<T>(
    rows: Vec<PgRow>,
    map: fn(&PgRow) -> Result<T, DatabaseError>,
) -> Result<Vec<T>, DatabaseError> {
    rows.iter().map(map).collect()
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        collect(rows, user_from_row)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query(&query).bind(email).fetch_optional(&self.pool).await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let query = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(new_id())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_write)?;
        user_from_row(&row)
    }

    async fn update_user_role(&self, id: &str, role: Role) -> Result<Option<User>, DatabaseError> {
        let query = format!("UPDATE users SET role = $2 WHERE id = $1 RETURNING {USER_COLUMNS}");
        let row = sqlx::query(&query)
            .bind(id)
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn delete_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let query = format!("DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}");
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn list_products(&self) -> Result<Vec<Product>, DatabaseError> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at, id");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        collect(rows, product_from_row)
    }

    async fn find_product(&self, id: &str) -> Result<Option<Product>, DatabaseError> {
        let query = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, DatabaseError> {
        let query = format!(
            "INSERT INTO products ({PRODUCT_COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {PRODUCT_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(new_id())
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.image)
            .bind(&product.description)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_write)?;
        product_from_row(&row)
    }

    async fn update_product(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> Result<Option<Product>, DatabaseError> {
        let query = format!(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                price = COALESCE($3, price),
                image = COALESCE($4, image),
                description = COALESCE($5, description)
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let row = sqlx::query(&query)
            .bind(id)
            .bind(update.name)
            .bind(update.price)
            .bind(update.image)
            .bind(update.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_write)?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn delete_product(&self, id: &str) -> Result<Option<Product>, DatabaseError> {
        let query = format!("DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}");
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn list_orders(&self) -> Result<Vec<Order>, DatabaseError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at, id");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        collect(rows, order_from_row)
    }

    async fn list_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, DatabaseError> {
        let query = format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY created_at, id"
        );
        let rows = sqlx::query(&query).bind(customer_id).fetch_all(&self.pool).await?;
        collect(rows, order_from_row)
    }

    async fn find_order(&self, id: &str) -> Result<Option<Order>, DatabaseError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1");
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(order_from_row).transpose()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, DatabaseError> {
        let query = format!(
            "INSERT INTO orders ({ORDER_COLUMNS}) VALUES ($1, $2, $3) RETURNING {ORDER_COLUMNS}"
        );
        let row = sqlx::query(&query)
            .bind(new_id())
            .bind(&order.customer_id)
            .bind(Json(&order.items))
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_write)?;
        order_from_row(&row)
    }
}
