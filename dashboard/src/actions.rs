//! Actions accepted by the dashboard reducer.

use crate::types::{
    Dataset, DashboardPatch, Order, Page, PreferencesPatch, ProcurementOrder, Resource, Supplier,
    Theme,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlates a `FetchData` with the terminal action it produces
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new random `RequestId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every state transition the dashboard supports
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum DashboardAction {
    // ========== Navigation and layout ==========
    /// Show `page`
    SetCurrentPage(Page),

    /// Flip the sidebar
    ToggleSidebar,

    /// Show `page`, closing the sidebar on narrow viewports
    Navigate {
        /// Target page
        page: Page,
        /// Current viewport width in pixels
        viewport_width: u32,
    },

    // ========== Preferences and theme ==========
    /// Shallow-merge into the user's preferences
    UpdateUserPreferences(PreferencesPatch),

    /// Set the theme
    UpdateTheme(Theme),

    /// Flip the theme, persist it and apply it to the platform
    ToggleTheme,

    /// Apply the theme resolved at activation
    Activate {
        /// Theme read from storage or the host
        theme: Theme,
    },

    // ========== Direct data writes ==========
    /// Shallow-merge into the dashboard data
    UpdateDashboardData(DashboardPatch),

    /// Replace the order list
    UpdateOrders(Vec<Order>),

    /// Replace the supplier list
    UpdateSuppliers(Vec<Supplier>),

    /// Replace the purchase order list
    UpdateProcurement(Vec<ProcurementOrder>),

    /// Set the loading flag of one resource
    SetLoading {
        /// Resource to update
        resource: Resource,
        /// New flag
        is_loading: bool,
    },

    /// Set or clear the error of one resource
    SetError {
        /// Resource to update
        resource: Resource,
        /// New message; `None` clears it
        error: Option<String>,
    },

    // ========== Fetch lifecycle ==========
    /// Start fetching `resource`
    FetchData {
        /// Resource to fetch
        resource: Resource,
        /// Correlation id echoed by the terminal action
        request_id: RequestId,
    },

    /// A fetch returned data
    FetchSucceeded {
        /// Resource that was fetched
        resource: Resource,
        /// Id of the originating `FetchData`
        request_id: RequestId,
        /// Data returned by the source
        dataset: Dataset,
    },

    /// A fetch failed
    FetchFailed {
        /// Resource that was fetched
        resource: Resource,
        /// Id of the originating `FetchData`
        request_id: RequestId,
        /// Failure message recorded in state
        message: String,
    },
}

impl DashboardAction {
    /// Start a fetch of `resource` with a fresh request id
    #[must_use]
    pub fn fetch(resource: Resource) -> Self {
        Self::FetchData {
            resource,
            request_id: RequestId::new(),
        }
    }

    /// Request id carried by fetch lifecycle actions
    #[must_use]
    pub const fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::FetchData { request_id, .. }
            | Self::FetchSucceeded { request_id, .. }
            | Self::FetchFailed { request_id, .. } => Some(*request_id),
            _ => None,
        }
    }

    /// Whether this action ends the fetch identified by `id`
    #[must_use]
    pub fn completes(&self, id: RequestId) -> bool {
        matches!(
            self,
            Self::FetchSucceeded { request_id, .. } | Self::FetchFailed { request_id, .. }
                if *request_id == id
        )
    }

    /// Outcome carried by a terminal fetch action; `None` for anything else
    #[must_use]
    pub fn into_outcome(self) -> Option<FetchOutcome> {
        match self {
            Self::FetchSucceeded { dataset, .. } => Some(FetchOutcome::Loaded(dataset)),
            Self::FetchFailed { message, .. } => Some(FetchOutcome::Failed(message)),
            _ => None,
        }
    }
}

/// How a `fetch_data` call ended
///
/// Failures are values, not errors: the message is also recorded in
/// `errors[resource]`.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome {
    /// The source returned data, now in state
    Loaded(Dataset),
    /// The source failed with this message
    Failed(String),
}

impl FetchOutcome {
    /// Whether the fetch returned data
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The dataset, if the fetch succeeded
    #[must_use]
    pub fn dataset(self) -> Option<Dataset> {
        match self {
            Self::Loaded(dataset) => Some(dataset),
            Self::Failed(_) => None,
        }
    }
}
