use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    NewOrder, NewProduct, NewUser, Order, Product, ProductUpdate, Role, User,
};

/// Persistence seam for the three document collections.
///
/// Lookups that find nothing return `Ok(None)`; only backend failures are
/// errors. Inserting a user whose e-mail already exists must fail with
/// [`DatabaseError::Duplicate`] even when two inserts race.
#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;

    // Users
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;
    async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;
    async fn update_user_role(&self, id: &str, role: Role) -> Result<Option<User>, DatabaseError>;
    async fn delete_user(&self, id: &str) -> Result<Option<User>, DatabaseError>;

    // Products
    async fn list_products(&self) -> Result<Vec<Product>, DatabaseError>;
    async fn find_product(&self, id: &str) -> Result<Option<Product>, DatabaseError>;
    async fn insert_product(&self, product: NewProduct) -> Result<Product, DatabaseError>;
    async fn update_product(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> Result<Option<Product>, DatabaseError>;
    async fn delete_product(&self, id: &str) -> Result<Option<Product>, DatabaseError>;

    // Orders
    async fn list_orders(&self) -> Result<Vec<Order>, DatabaseError>;
    async fn list_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, DatabaseError>;
    async fn find_order(&self, id: &str) -> Result<Option<Order>, DatabaseError>;
    async fn insert_order(&self, order: NewOrder) -> Result<Order, DatabaseError>;
}
