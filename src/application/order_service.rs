use std::collections::{BTreeSet, HashMap};

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::catalog::{Customer, NewCustomer, NewProduct, Product};
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderItem, OrderLineInput, OrderRequest, StockUpdate};
use crate::domain::policy::AvailabilityPolicy;
use crate::domain::ports::Store;

/// Decimal places a price may carry; matches the `NUMERIC(12, 2)` price columns.
pub const PRICE_SCALE: i64 = 2;
/// Smallest price that no longer fits a `NUMERIC(12, 2)` column.
pub const MAX_PRICE_EXCLUSIVE: i64 = 10_000_000_000;

pub struct OrderService<S> {
    store: S,
    policy: AvailabilityPolicy,
}

impl<S: Store> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self::with_policy(store, AvailabilityPolicy::default())
    }

    pub fn with_policy(store: S, policy: AvailabilityPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> AvailabilityPolicy {
        self.policy
    }

    /// Validates the request, snapshots prices, records the order and decrements stock.
    ///
    /// Everything runs inside a single store transaction: the catalog rows are locked from
    /// the lookup until commit, and a failure at any step leaves no order and no stock change.
    pub fn place_order(&self, request: OrderRequest) -> Result<Order, DomainError> {
        validate_quantities(&request.items)?;

        let policy = self.policy;
        let result = self.store.transaction(|ctx| {
            let customer = ctx
                .find_customer(request.customer_id)?
                .ok_or(DomainError::CustomerNotFound(request.customer_id))?;

            let ids: BTreeSet<Uuid> = request.items.iter().map(|i| i.product_id).collect();
            let products = ctx.find_all_by_id(&ids)?;
            if products.is_empty() {
                return Err(DomainError::NoProductsFound);
            }

            let plan = plan_order(&request.items, &products, policy)?;
            let order = ctx.create_order(&customer, plan.lines)?;
            ctx.update_quantity(&plan.stock_updates)?;
            Ok(order)
        });

        match &result {
            Ok(order) => log::info!(
                "Placed order {} for customer {} with {} line(s)",
                order.id,
                order.customer_id,
                order.lines.len()
            ),
            Err(e) if e.is_validation() => {
                log::info!("Rejected order for customer {}: {}", request.customer_id, e)
            }
            Err(e) => log::warn!(
                "Order for customer {} rolled back: {}",
                request.customer_id,
                e
            ),
        }
        result
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        self.store.transaction(|ctx| ctx.find_order(id))
    }

    pub fn register_customer(&self, customer: NewCustomer) -> Result<Customer, DomainError> {
        if customer.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("customer name is required".into()));
        }
        if !customer.email.contains('@') {
            return Err(DomainError::InvalidInput(format!(
                "'{}' is not an email address",
                customer.email
            )));
        }
        let created = self.store.transaction(|ctx| ctx.create_customer(customer))?;
        log::debug!("Registered customer {}", created.id);
        Ok(created)
    }

    pub fn add_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        if product.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("product name is required".into()));
        }
        if product.price < BigDecimal::from(0) {
            return Err(DomainError::InvalidInput("price must not be negative".into()));
        }
        if product.price.normalized().as_bigint_and_exponent().1 > PRICE_SCALE {
            return Err(DomainError::InvalidInput(format!(
                "price {} has more than {} decimal places",
                product.price, PRICE_SCALE
            )));
        }
        if product.price >= BigDecimal::from(MAX_PRICE_EXCLUSIVE) {
            return Err(DomainError::InvalidInput(format!(
                "price {} must be below {}",
                product.price, MAX_PRICE_EXCLUSIVE
            )));
        }
        if product.quantity < 0 {
            return Err(DomainError::InvalidInput("quantity must not be negative".into()));
        }
        let created = self.store.transaction(|ctx| ctx.create_product(product))?;
        log::debug!("Added product {} with {} unit(s)", created.id, created.quantity);
        Ok(created)
    }
}

fn validate_quantities(items: &[OrderItem]) -> Result<(), DomainError> {
    match items.iter().find(|i| i.quantity <= 0) {
        Some(item) => Err(DomainError::InvalidInput(format!(
            "quantity for product {} must be positive, got {}",
            item.product_id, item.quantity
        ))),
        None => Ok(()),
    }
}

#[derive(Debug)]
struct OrderPlan {
    lines: Vec<OrderLineInput>,
    stock_updates: Vec<StockUpdate>,
}

/// Checks existence and availability in input order, then prices the lines and computes the
/// resulting stock levels. Repeated product ids are checked against their running total.
fn plan_order(
    items: &[OrderItem],
    products: &[Product],
    policy: AvailabilityPolicy,
) -> Result<OrderPlan, DomainError> {
    let by_id: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();

    if let Some(missing) = items.iter().find(|i| !by_id.contains_key(&i.product_id)) {
        return Err(DomainError::ProductNotFound(missing.product_id));
    }

    let mut demanded: Vec<(Uuid, i32)> = Vec::new();
    let mut lines = Vec::with_capacity(items.len());
    for item in items {
        let product = by_id[&item.product_id];
        let insufficient = |requested| DomainError::InsufficientStock {
            product_id: item.product_id,
            requested,
            available: product.quantity,
        };
        let total = match demanded.iter_mut().find(|(id, _)| *id == item.product_id) {
            Some((_, total)) => {
                // A total beyond i32::MAX can never be covered by an i32 stock level.
                *total = total
                    .checked_add(item.quantity)
                    .ok_or_else(|| insufficient(i32::MAX))?;
                *total
            }
            None => {
                demanded.push((item.product_id, item.quantity));
                item.quantity
            }
        };
        if !policy.is_satisfied(product.quantity, total) {
            return Err(insufficient(total));
        }
        lines.push(OrderLineInput {
            product_id: item.product_id,
            quantity: item.quantity,
            price: product.price.clone(),
        });
    }

    let stock_updates = demanded
        .into_iter()
        .map(|(product_id, total)| StockUpdate {
            product_id,
            quantity: by_id[&product_id].quantity - total,
        })
        .collect();

    Ok(OrderPlan {
        lines,
        stock_updates,
    })
}
