use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    new_id, NewOrder, NewProduct, NewUser, Order, Product, ProductUpdate, Role, User,
};
use crate::database::repository::Store;

/// In-process store. Collections keep insertion order so repeated listings
/// are stable.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    products: RwLock<Vec<Product>>,
    orders: RwLock<Vec<Order>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        // Uniqueness is checked under the write lock so concurrent inserts cannot both pass
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(DatabaseError::Duplicate("users.email".to_string()));
        }

        let user = User {
            id: new_id(),
            name: user.name,
            email: user.email,
            password: user.password_hash,
            role: user.role,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_user_role(&self, id: &str, role: Role) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.id == id).map(|user| {
            user.role = role;
            user.clone()
        }))
    }

    async fn delete_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        let index = users.iter().position(|u| u.id == id);
        Ok(index.map(|index| users.remove(index)))
    }

    async fn list_products(&self) -> Result<Vec<Product>, DatabaseError> {
        Ok(self.products.read().await.clone())
    }

    async fn find_product(&self, id: &str) -> Result<Option<Product>, DatabaseError> {
        Ok(self.products.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, product: NewProduct) -> Result<Product, DatabaseError> {
        let product = Product {
            id: new_id(),
            name: product.name,
            price: product.price,
            image: product.image,
            description: product.description,
        };
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &str,
        update: ProductUpdate,
    ) -> Result<Option<Product>, DatabaseError> {
        let mut products = self.products.write().await;
        Ok(products.iter_mut().find(|p| p.id == id).map(|product| {
            update.apply(product);
            product.clone()
        }))
    }

    async fn delete_product(&self, id: &str) -> Result<Option<Product>, DatabaseError> {
        let mut products = self.products.write().await;
        let index = products.iter().position(|p| p.id == id);
        Ok(index.map(|index| products.remove(index)))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, DatabaseError> {
        Ok(self.orders.read().await.clone())
    }

    async fn list_orders_for_customer(&self, customer_id: &str) -> Result<Vec<Order>, DatabaseError> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn find_order(&self, id: &str) -> Result<Option<Order>, DatabaseError> {
        Ok(self.orders.read().await.iter().find(|o| o.id == id).cloned())
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, DatabaseError> {
        let order = Order {
            id: new_id(),
            customer_id: order.customer_id,
            items: order.items,
        };
        self.orders.write().await.push(order.clone());
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Test".into(),
            email: email.into(),
            password_hash: "hash".into(),
            role: Role::Customer,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store.insert_user(new_user("a@b.com")).await.unwrap();

        let err = store.insert_user(new_user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(_)));
        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_registrations_keep_one_user() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert_user(new_user("race@b.com")).await })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
    }

    #[tokio::test]
    async fn update_and_delete_missing_product_return_none() {
        let store = MemoryStore::new();
        let missing = "ffffffffffffffffffffffff";
        assert!(store
            .update_product(missing, ProductUpdate::default())
            .await
            .unwrap()
            .is_none());
        assert!(store.delete_product(missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn orders_are_scoped_by_customer() {
        let store = MemoryStore::new();
        let items = vec![crate::database::models::OrderItem {
            product: crate::database::models::ProductSnapshot {
                id: "p1".into(),
                name: "Lamp".into(),
                price: Decimal::ONE,
                description: None,
            },
            quantity: 1,
        }];
        store
            .insert_order(NewOrder { customer_id: "alice".into(), items: items.clone() })
            .await
            .unwrap();
        store
            .insert_order(NewOrder { customer_id: "bob".into(), items })
            .await
            .unwrap();

        assert_eq!(store.list_orders().await.unwrap().len(), 2);
        let own = store.list_orders_for_customer("alice").await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].customer_id, "alice");
    }
}
