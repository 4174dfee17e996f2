use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::catalog::{Customer, NewCustomer, NewProduct, Product};
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderLine, OrderLineInput, StockUpdate};
use crate::domain::ports::{CustomerDirectory, OrderStore, ProductCatalog, Store, StoreContext};

#[derive(Debug, Clone, Default)]
struct Tables {
    customers: HashMap<Uuid, Customer>,
    products: HashMap<Uuid, Product>,
    orders: HashMap<Uuid, Order>,
}

/// In-memory store for tests and local development.
///
/// A transaction holds the store lock for its whole duration and works on a copy of the
/// tables, which replaces the committed state only when the work succeeds.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_stock_updates: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `update_quantity` call fail until switched off again.
    pub fn fail_stock_updates(&self, fail: bool) {
        self.fail_stock_updates.store(fail, Ordering::SeqCst);
    }

    pub fn product(&self, id: Uuid) -> Option<Product> {
        self.tables.lock().ok()?.products.get(&id).cloned()
    }

    /// Overwrites a product's price outside of any order placement.
    pub fn set_price(&self, id: Uuid, price: BigDecimal) {
        if let Ok(mut tables) = self.tables.lock() {
            if let Some(product) = tables.products.get_mut(&id) {
                product.price = price;
            }
        }
    }

    pub fn order_count(&self) -> usize {
        self.tables.lock().map(|t| t.orders.len()).unwrap_or(0)
    }
}

impl Store for MemoryStore {
    fn transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreContext) -> Result<T, DomainError>,
    {
        let mut committed = self
            .tables
            .lock()
            .map_err(|_| DomainError::Persistence("store lock poisoned".into()))?;

        let mut ctx = MemoryContext {
            tables: committed.clone(),
            fail_stock_updates: self.fail_stock_updates.load(Ordering::SeqCst),
        };
        let value = work(&mut ctx)?;
        *committed = ctx.tables;
        Ok(value)
    }
}

struct MemoryContext {
    tables: Tables,
    fail_stock_updates: bool,
}

impl CustomerDirectory for MemoryContext {
    fn find_customer(&mut self, id: Uuid) -> Result<Option<Customer>, DomainError> {
        Ok(self.tables.customers.get(&id).cloned())
    }

    fn create_customer(&mut self, customer: NewCustomer) -> Result<Customer, DomainError> {
        let created = Customer {
            id: Uuid::new_v4(),
            name: customer.name,
            email: customer.email,
            created_at: Utc::now(),
        };
        self.tables.customers.insert(created.id, created.clone());
        Ok(created)
    }
}

impl ProductCatalog for MemoryContext {
    fn find_all_by_id(&mut self, ids: &BTreeSet<Uuid>) -> Result<Vec<Product>, DomainError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.tables.products.get(id).cloned())
            .collect())
    }

    fn update_quantity(&mut self, updates: &[StockUpdate]) -> Result<(), DomainError> {
        if self.fail_stock_updates {
            return Err(DomainError::Persistence("stock update rejected".into()));
        }
        for update in updates {
            if update.quantity < 0 {
                return Err(DomainError::Persistence(format!(
                    "stock for product {} would become {}",
                    update.product_id, update.quantity
                )));
            }
            let product = self.tables.products.get_mut(&update.product_id).ok_or_else(|| {
                DomainError::Persistence(format!("product {} vanished", update.product_id))
            })?;
            product.quantity = update.quantity;
        }
        Ok(())
    }

    fn create_product(&mut self, product: NewProduct) -> Result<Product, DomainError> {
        let created = Product {
            id: Uuid::new_v4(),
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            created_at: Utc::now(),
        };
        self.tables.products.insert(created.id, created.clone());
        Ok(created)
    }
}

impl OrderStore for MemoryContext {
    fn create_order(
        &mut self,
        customer: &Customer,
        lines: Vec<OrderLineInput>,
    ) -> Result<Order, DomainError> {
        let order = Order {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            created_at: Utc::now(),
            lines: lines
                .into_iter()
                .map(|l| OrderLine {
                    id: Uuid::new_v4(),
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price: l.price,
                })
                .collect(),
        };
        self.tables.orders.insert(order.id, order.clone());
        Ok(order)
    }

    fn find_order(&mut self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.tables.orders.get(&id).cloned())
    }
}
