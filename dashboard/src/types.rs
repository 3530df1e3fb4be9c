//! Domain types for the dashboard.
//!
//! Records are plain values: every fetch replaces them wholesale, so none of
//! them carries identity beyond its `id` field.

use crate::error::DashboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════
// Resources, pages and themes
// ═══════════════════════════════════════════════════════════

/// One of the four named datasets the dashboard fetches
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// KPIs, forecast series, inventory breakdown, alerts and top products
    Dashboard,
    /// Customer orders
    Orders,
    /// Supplier directory
    Suppliers,
    /// Purchase orders
    Procurement,
}

impl Resource {
    /// Every resource, in fetch order
    pub const ALL: [Self; 4] = [
        Self::Dashboard,
        Self::Orders,
        Self::Suppliers,
        Self::Procurement,
    ];

    /// Wire name of the resource
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Orders => "orders",
            Self::Suppliers => "suppliers",
            Self::Procurement => "procurement",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|resource| resource.as_str() == s)
            .ok_or_else(|| DashboardError::UnknownResource(s.to_string()))
    }
}

/// Navigation target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    /// Landing page with KPIs
    #[default]
    Dashboard,
    /// Customer orders
    Orders,
    /// Demand forecasting
    Forecasting,
    /// Inventory levels
    Inventory,
    /// Supplier directory
    Suppliers,
    /// Purchase orders
    Procurement,
    /// Supply disruptions
    Disruptions,
    /// Shipments and routes
    Logistics,
    /// Analytics
    Analytics,
    /// Supplier and delivery performance
    Performance,
    /// Reports
    Reports,
    /// Settings
    Settings,
    /// User profile
    Profile,
    /// Help
    Help,
}

impl Page {
    /// Every page, in navigation order
    pub const ALL: [Self; 14] = [
        Self::Dashboard,
        Self::Orders,
        Self::Forecasting,
        Self::Inventory,
        Self::Suppliers,
        Self::Procurement,
        Self::Disruptions,
        Self::Logistics,
        Self::Analytics,
        Self::Performance,
        Self::Reports,
        Self::Settings,
        Self::Profile,
        Self::Help,
    ];

    /// Stable id used in routes and persisted state
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Orders => "orders",
            Self::Forecasting => "forecasting",
            Self::Inventory => "inventory",
            Self::Suppliers => "suppliers",
            Self::Procurement => "procurement",
            Self::Disruptions => "disruptions",
            Self::Logistics => "logistics",
            Self::Analytics => "analytics",
            Self::Performance => "performance",
            Self::Reports => "reports",
            Self::Settings => "settings",
            Self::Profile => "profile",
            Self::Help => "help",
        }
    }

    /// Menu label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Orders => "Orders",
            Self::Forecasting => "Forecasting",
            Self::Inventory => "Inventory",
            Self::Suppliers => "Suppliers",
            Self::Procurement => "Procurement",
            Self::Disruptions => "Disruptions",
            Self::Logistics => "Logistics",
            Self::Analytics => "Analytics",
            Self::Performance => "Performance",
            Self::Reports => "Reports",
            Self::Settings => "Settings",
            Self::Profile => "Profile",
            Self::Help => "Help",
        }
    }

    /// Page for `id`, or the dashboard when the id is unknown
    #[must_use]
    pub fn resolve(id: &str) -> Self {
        id.parse().unwrap_or_default()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Page {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|page| page.id() == s)
            .ok_or_else(|| DashboardError::UnknownPage(s.to_string()))
    }
}

/// Colour scheme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light background
    Light,
    /// Dark background
    #[default]
    Dark,
}

impl Theme {
    /// The other theme
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Whether this is the dark theme
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Persisted name of the theme
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(DashboardError::UnknownTheme(other.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Statuses
// ═══════════════════════════════════════════════════════════

/// Progress of a customer or purchase order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Received by the customer
    Delivered,
    /// In transit
    Shipped,
    /// Being prepared
    Processing,
    /// Not started
    Pending,
    /// Behind its ETA
    Delayed,
}

impl OrderStatus {
    /// Every status, in pipeline order
    pub const ALL: [Self; 5] = [
        Self::Delivered,
        Self::Shipped,
        Self::Processing,
        Self::Pending,
        Self::Delayed,
    ];
}

/// Relationship state of a supplier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    /// Delivering normally
    Active,
    /// Onboarding or under review
    Pending,
    /// Behind on deliveries
    Delayed,
}

/// Urgency of a customer order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Expedite
    High,
    /// Normal handling
    Medium,
    /// Can wait
    Low,
}

/// Health of a stock position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    /// Within target range
    Optimal,
    /// Drifting from target
    Warning,
    /// Below reorder point
    Low,
    /// Stockout risk
    Critical,
}

/// Demand direction of a product
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Growing
    Up,
    /// Flat
    Stable,
    /// Shrinking
    Down,
}

/// Severity of a dashboard alert
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Needs action now
    Critical,
    /// Needs attention
    Warning,
    /// For information
    Info,
    /// Good news
    Success,
}

// ═══════════════════════════════════════════════════════════
// Records
// ═══════════════════════════════════════════════════════════

/// Headline indicators on the dashboard
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Forecast accuracy in percent
    pub forecast_accuracy: f64,
    /// Cost savings in rupees
    pub cost_savings: u64,
    /// Disruptions prevented this period
    pub disruptions_prevented: u32,
    /// Inventory turns per year
    pub inventory_turnover: f64,
    /// Average delivery time in days
    pub avg_delivery_time: f64,
    /// Stockout rate in percent
    pub stockout_rate: f64,
}

/// One week of the demand forecast
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Week label, e.g. "Jan 15"
    pub date: String,
    /// Observed demand; `None` for weeks not yet observed
    pub actual: Option<u32>,
    /// Predicted demand
    pub predicted: u32,
    /// Model confidence in percent
    pub confidence: u8,
}

/// Share of inventory value held in one category
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlice {
    /// Category name
    pub category: String,
    /// Share in percent
    pub value: u8,
    /// Category health
    pub status: StockStatus,
}

/// Notification shown in the dashboard feed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Feed position
    pub id: u32,
    /// Severity
    #[serde(rename = "type")]
    pub kind: AlertKind,
    /// Text shown to the user
    pub message: String,
    /// Relative age, e.g. "2 hours ago"
    pub time: String,
    /// Icon name used by the renderer
    pub icon: String,
}

/// Product tracked on the dashboard
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stock keeping unit
    pub sku: String,
    /// Display name
    pub name: String,
    /// Forecast demand in units
    pub demand: u32,
    /// Units on hand
    pub stock: u32,
    /// Stock health
    pub status: StockStatus,
    /// Demand direction
    pub trend: Trend,
}

/// Customer order
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order number, e.g. "ORD-001"
    pub id: String,
    /// Customer name
    pub customer: String,
    /// Order date (ISO 8601)
    pub date: String,
    /// Order value in rupees
    pub amount: u64,
    /// Fulfilment status
    pub status: OrderStatus,
    /// Line item count
    pub items: u32,
    /// Expected delivery date (ISO 8601)
    pub eta: String,
    /// Urgency
    pub priority: Priority,
}

/// Supplier directory entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    /// Supplier number, e.g. "SUP-001"
    pub id: String,
    /// Company name
    pub name: String,
    /// Contact person
    pub contact: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// City and country
    pub location: String,
    /// Rating out of 5
    pub rating: f64,
    /// Relationship state
    pub status: SupplierStatus,
    /// Number of products supplied
    pub products: u32,
    /// Date of the last purchase order (ISO 8601)
    pub last_order: String,
    /// On-time performance in percent
    pub performance: u8,
    /// Product category
    pub category: String,
}

/// Purchase order placed with a supplier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementOrder {
    /// Purchase order number, e.g. "PO-001"
    pub id: String,
    /// Supplier name
    pub supplier: String,
    /// Order date (ISO 8601)
    pub date: String,
    /// Order value in rupees
    pub amount: u64,
    /// Fulfilment status
    pub status: OrderStatus,
    /// Line item count
    pub items: u32,
}

/// Everything shown on the dashboard page
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    /// Headline indicators
    pub kpis: Kpis,
    /// Weekly demand forecast
    pub demand_forecast: Vec<ForecastPoint>,
    /// Inventory breakdown by category
    pub inventory: Vec<InventorySlice>,
    /// Alert feed
    pub alerts: Vec<Alert>,
    /// Products to watch
    pub top_products: Vec<Product>,
}

impl DashboardData {
    /// Shallow-merge `patch`: every field present replaces the current one
    pub fn merge(&mut self, patch: DashboardPatch) {
        if let Some(kpis) = patch.kpis {
            self.kpis = kpis;
        }
        if let Some(demand_forecast) = patch.demand_forecast {
            self.demand_forecast = demand_forecast;
        }
        if let Some(inventory) = patch.inventory {
            self.inventory = inventory;
        }
        if let Some(alerts) = patch.alerts {
            self.alerts = alerts;
        }
        if let Some(top_products) = patch.top_products {
            self.top_products = top_products;
        }
    }
}

/// Partial update of [`DashboardData`]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardPatch {
    /// Replacement KPIs
    pub kpis: Option<Kpis>,
    /// Replacement forecast series
    pub demand_forecast: Option<Vec<ForecastPoint>>,
    /// Replacement inventory breakdown
    pub inventory: Option<Vec<InventorySlice>>,
    /// Replacement alert feed
    pub alerts: Option<Vec<Alert>>,
    /// Replacement product list
    pub top_products: Option<Vec<Product>>,
}

impl From<DashboardData> for DashboardPatch {
    fn from(data: DashboardData) -> Self {
        Self {
            kpis: Some(data.kpis),
            demand_forecast: Some(data.demand_forecast),
            inventory: Some(data.inventory),
            alerts: Some(data.alerts),
            top_products: Some(data.top_products),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// User
// ═══════════════════════════════════════════════════════════

/// Signed-in user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User id
    pub id: String,
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Job title
    pub role: String,
    /// Personal settings
    pub preferences: UserPreferences,
}

/// Personal settings of the user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Preferred theme; mirrors `ui.theme`
    pub theme: Theme,
    /// Whether notifications are enabled
    pub notifications: bool,
    /// Interface language code
    pub language: String,
}

impl UserPreferences {
    /// Shallow-merge `patch`: every field present replaces the current one
    pub fn merge(&mut self, patch: PreferencesPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(notifications) = patch.notifications {
            self.notifications = notifications;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
    }
}

/// Partial update of [`UserPreferences`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesPatch {
    /// New theme
    pub theme: Option<Theme>,
    /// New notification setting
    pub notifications: Option<bool>,
    /// New language code
    pub language: Option<String>,
}

// ═══════════════════════════════════════════════════════════
// Datasets
// ═══════════════════════════════════════════════════════════

/// Payload of one successful fetch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resource", content = "data", rename_all = "lowercase")]
pub enum Dataset {
    /// Dashboard page data
    Dashboard(DashboardData),
    /// Customer orders
    Orders(Vec<Order>),
    /// Supplier directory
    Suppliers(Vec<Supplier>),
    /// Purchase orders
    Procurement(Vec<ProcurementOrder>),
}

impl Dataset {
    /// Resource this dataset belongs to
    #[must_use]
    pub const fn resource(&self) -> Resource {
        match self {
            Self::Dashboard(_) => Resource::Dashboard,
            Self::Orders(_) => Resource::Orders,
            Self::Suppliers(_) => Resource::Suppliers,
            Self::Procurement(_) => Resource::Procurement,
        }
    }

    /// Number of top-level records, for logging
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Dashboard(_) => 1,
            Self::Orders(orders) => orders.len(),
            Self::Suppliers(suppliers) => suppliers.len(),
            Self::Procurement(procurement) => procurement.len(),
        }
    }

    /// Whether the dataset holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
