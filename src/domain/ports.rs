use std::collections::BTreeSet;

use uuid::Uuid;

use super::catalog::{Customer, NewCustomer, NewProduct, Product};
use super::errors::DomainError;
use super::order::{Order, OrderLineInput, StockUpdate};

pub trait CustomerDirectory {
    fn find_customer(&mut self, id: Uuid) -> Result<Option<Customer>, DomainError>;
    fn create_customer(&mut self, customer: NewCustomer) -> Result<Customer, DomainError>;
}

pub trait ProductCatalog {
    /// Fetches every product whose id is in `ids`. Order is unspecified and missing ids are
    /// simply absent. Returned rows stay locked until the enclosing transaction ends.
    fn find_all_by_id(&mut self, ids: &BTreeSet<Uuid>) -> Result<Vec<Product>, DomainError>;
    fn update_quantity(&mut self, updates: &[StockUpdate]) -> Result<(), DomainError>;
    fn create_product(&mut self, product: NewProduct) -> Result<Product, DomainError>;
}

pub trait OrderStore {
    fn create_order(
        &mut self,
        customer: &Customer,
        lines: Vec<OrderLineInput>,
    ) -> Result<Order, DomainError>;
    fn find_order(&mut self, id: Uuid) -> Result<Option<Order>, DomainError>;
}

/// Everything reachable from inside a transaction.
pub trait StoreContext: CustomerDirectory + ProductCatalog + OrderStore {}

impl<T: CustomerDirectory + ProductCatalog + OrderStore> StoreContext for T {}

pub trait Store: Send + Sync + 'static {
    /// Runs `work` as one unit. Its writes are committed when it returns `Ok` and discarded
    /// otherwise. Transactions touching the same products never interleave.
    fn transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreContext) -> Result<T, DomainError>;
}

impl<S: Store> Store for std::sync::Arc<S> {
    fn transaction<T, F>(&self, work: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut dyn StoreContext) -> Result<T, DomainError>,
    {
        (**self).transaction(work)
    }
}
