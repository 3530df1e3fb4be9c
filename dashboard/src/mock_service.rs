//! In-process stand-in for the dashboard backend.
//!
//! [`MockDataService`] serves the seed records after a fixed per-resource
//! delay. Dashboard KPIs are jittered around their baselines on every call;
//! everything else is returned unchanged.

use crate::error::FetchError;
use crate::seed;
use crate::types::{Dataset, Kpis, Resource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Boxed future returned by [`DataSource::fetch`]
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Dataset, FetchError>> + Send>>;

/// Anything that can produce a dataset for a resource
///
/// The returned future owns everything it needs, so it can be moved into a
/// store effect.
pub trait DataSource: Send + Sync {
    /// Produce the current dataset for `resource`
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] when the source cannot serve the resource.
    fn fetch(&self, resource: Resource) -> FetchFuture;
}

/// Simulated round-trip time per resource
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockLatency {
    /// Delay for `dashboard`
    pub dashboard: Duration,
    /// Delay for `orders`
    pub orders: Duration,
    /// Delay for `suppliers`
    pub suppliers: Duration,
    /// Delay for `procurement`
    pub procurement: Duration,
}

impl MockLatency {
    /// No delay at all
    pub const ZERO: Self = Self {
        dashboard: Duration::ZERO,
        orders: Duration::ZERO,
        suppliers: Duration::ZERO,
        procurement: Duration::ZERO,
    };

    /// Delay for `resource`
    #[must_use]
    pub const fn for_resource(&self, resource: Resource) -> Duration {
        match resource {
            Resource::Dashboard => self.dashboard,
            Resource::Orders => self.orders,
            Resource::Suppliers => self.suppliers,
            Resource::Procurement => self.procurement,
        }
    }

    /// Every delay multiplied by `factor`; negative factors clamp to zero
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        Self {
            dashboard: self.dashboard.mul_f64(factor),
            orders: self.orders.mul_f64(factor),
            suppliers: self.suppliers.mul_f64(factor),
            procurement: self.procurement.mul_f64(factor),
        }
    }
}

impl Default for MockLatency {
    fn default() -> Self {
        Self {
            dashboard: Duration::from_millis(800),
            orders: Duration::from_millis(600),
            suppliers: Duration::from_millis(700),
            procurement: Duration::from_millis(650),
        }
    }
}

/// Mock backend serving canned records
///
/// Clones share one random generator, so a seeded service produces one
/// reproducible sequence no matter which clone is called.
#[derive(Clone, Debug)]
pub struct MockDataService {
    latency: MockLatency,
    rng: Arc<Mutex<StdRng>>,
}

impl MockDataService {
    /// Service with default latencies and an entropy-seeded generator
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Service whose KPI jitter is reproducible from `seed`
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            latency: MockLatency::default(),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Replace the simulated latencies
    #[must_use]
    pub const fn with_latency(mut self, latency: MockLatency) -> Self {
        self.latency = latency;
        self
    }

    /// Simulated latencies in use
    #[must_use]
    pub const fn latency(&self) -> MockLatency {
        self.latency
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(self) -> Arc<dyn DataSource> {
        Arc::new(self)
    }

    /// Baseline KPIs with independent bounded jitter on each value
    fn perturbed_kpis(&self) -> Kpis {
        let base = seed::kpi_baseline();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        Kpis {
            forecast_accuracy: base.forecast_accuracy + rng.gen_range(-0.25..=0.25),
            cost_savings: base.cost_savings + rng.gen_range(0..50_000),
            disruptions_prevented: base.disruptions_prevented + rng.gen_range(0..=2),
            inventory_turnover: base.inventory_turnover + rng.gen_range(-0.1..=0.1),
            avg_delivery_time: base.avg_delivery_time + rng.gen_range(-0.05..=0.05),
            stockout_rate: base.stockout_rate + rng.gen_range(-0.05..=0.05),
        }
    }

    /// Build the dataset for `resource` without any delay
    #[must_use]
    pub fn snapshot(&self, resource: Resource) -> Dataset {
        match resource {
            Resource::Dashboard => {
                let mut dashboard = seed::dashboard();
                dashboard.kpis = self.perturbed_kpis();
                Dataset::Dashboard(dashboard)
            },
            Resource::Orders => Dataset::Orders(seed::orders()),
            Resource::Suppliers => Dataset::Suppliers(seed::suppliers()),
            Resource::Procurement => Dataset::Procurement(seed::procurement()),
        }
    }
}

impl Default for MockDataService {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for MockDataService {
    fn fetch(&self, resource: Resource) -> FetchFuture {
        let delay = self.latency.for_resource(resource);
        let service = self.clone();

        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let dataset = service.snapshot(resource);
            tracing::trace!(%resource, records = dataset.len(), "Mock data served");
            Ok(dataset)
        })
    }
}
