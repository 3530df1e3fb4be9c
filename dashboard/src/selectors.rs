//! Read helpers pages derive their views from.
//!
//! Pure functions over slices of
//! [`ApplicationState`](crate::state::ApplicationState). Nothing here
//! mutates state; call them inside
//! [`DashboardStore::state`](crate::DashboardStore::state) to avoid cloning.

use crate::types::{Order, OrderStatus, ProcurementOrder, Product, Supplier, SupplierStatus};
use std::collections::BTreeMap;

/// Number of orders in each status, in pipeline order
///
/// Statuses without orders are included with a count of zero.
#[must_use]
pub fn order_status_breakdown(orders: &[Order]) -> Vec<(OrderStatus, usize)> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| {
            let count = orders.iter().filter(|order| order.status == status).count();
            (status, count)
        })
        .collect()
}

/// Number of suppliers per category
#[must_use]
pub fn supplier_category_counts(suppliers: &[Supplier]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for supplier in suppliers {
        *counts.entry(supplier.category.clone()).or_insert(0) += 1;
    }
    counts
}

/// Number of suppliers currently active
#[must_use]
pub fn active_supplier_count(suppliers: &[Supplier]) -> usize {
    suppliers
        .iter()
        .filter(|supplier| supplier.status == SupplierStatus::Active)
        .count()
}

/// Mean supplier rating; `None` for an empty directory
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_supplier_rating(suppliers: &[Supplier]) -> Option<f64> {
    if suppliers.is_empty() {
        return None;
    }
    let total: f64 = suppliers.iter().map(|supplier| supplier.rating).sum();
    Some(total / suppliers.len() as f64)
}

/// Headline figures of the procurement page
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProcurementSummary {
    /// Sum of all purchase order amounts
    pub total_spend: u64,
    /// Orders processing or pending
    pub active: usize,
    /// Orders delivered
    pub delivered: usize,
    /// Orders delayed
    pub delayed: usize,
}

/// Summarise the purchase orders
#[must_use]
pub fn procurement_summary(orders: &[ProcurementOrder]) -> ProcurementSummary {
    orders
        .iter()
        .fold(ProcurementSummary::default(), |mut summary, order| {
            summary.total_spend += order.amount;
            match order.status {
                OrderStatus::Processing | OrderStatus::Pending => summary.active += 1,
                OrderStatus::Delivered => summary.delivered += 1,
                OrderStatus::Delayed => summary.delayed += 1,
                OrderStatus::Shipped => {},
            }
            summary
        })
}

/// Products with less stock than forecast demand
#[must_use]
pub fn low_stock_products(products: &[Product]) -> Vec<&Product> {
    products
        .iter()
        .filter(|product| product.stock < product.demand)
        .collect()
}

/// Status and free-text filter shared by the list pages
///
/// An empty filter matches everything. The search is a case-insensitive
/// substring match over each record's id and name fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListFilter<S> {
    /// Only records in this status
    pub status: Option<S>,
    /// Text to look for
    pub search: String,
}

impl<S> Default for ListFilter<S> {
    fn default() -> Self {
        Self {
            status: None,
            search: String::new(),
        }
    }
}

impl<S: PartialEq> ListFilter<S> {
    /// Filter on free text only
    #[must_use]
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            status: None,
            search: text.into(),
        }
    }

    /// Also require `status`
    #[must_use]
    pub fn with_status(mut self, status: S) -> Self {
        self.status = Some(status);
        self
    }

    fn accepts(&self, status: &S, fields: &[&str]) -> bool {
        if self.status.as_ref().is_some_and(|wanted| wanted != status) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || fields.iter().any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Orders matching `filter` on id or customer
#[must_use]
pub fn filter_orders<'a>(orders: &'a [Order], filter: &ListFilter<OrderStatus>) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|order| filter.accepts(&order.status, &[order.id.as_str(), order.customer.as_str()]))
        .collect()
}

/// Suppliers matching `filter` on id, name or contact
#[must_use]
pub fn filter_suppliers<'a>(
    suppliers: &'a [Supplier],
    filter: &ListFilter<SupplierStatus>,
) -> Vec<&'a Supplier> {
    suppliers
        .iter()
        .filter(|supplier| {
            filter.accepts(
                &supplier.status,
                &[
                    supplier.id.as_str(),
                    supplier.name.as_str(),
                    supplier.contact.as_str(),
                ],
            )
        })
        .collect()
}

/// Purchase orders matching `filter` on id or supplier
#[must_use]
pub fn filter_procurement<'a>(
    orders: &'a [ProcurementOrder],
    filter: &ListFilter<OrderStatus>,
) -> Vec<&'a ProcurementOrder> {
    orders
        .iter()
        .filter(|order| filter.accepts(&order.status, &[order.id.as_str(), order.supplier.as_str()]))
        .collect()
}
