//! The application state aggregate.

use crate::seed;
use crate::types::{
    DashboardData, Order, Page, ProcurementOrder, Resource, Supplier, Theme, UserPreferences,
    UserProfile,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Interface flags shared by every page
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// Whether the navigation sidebar is shown
    pub sidebar_open: bool,
    /// Page being rendered
    pub current_page: Page,
    /// Unread notification count
    pub notifications: u32,
    /// Active theme; mirrors `user.preferences.theme`
    pub theme: Theme,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            current_page: Page::Dashboard,
            notifications: 5,
            theme: Theme::Dark,
        }
    }
}

/// Single source of truth for the dashboard
///
/// `Default` builds the seed state: the same records the mock service
/// serves, KPIs at their baselines, nothing loading and no errors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApplicationState {
    /// Signed-in user
    pub user: UserProfile,
    /// Dashboard page data
    pub dashboard: DashboardData,
    /// Customer orders
    pub orders: Vec<Order>,
    /// Supplier directory
    pub suppliers: Vec<Supplier>,
    /// Purchase orders
    pub procurement: Vec<ProcurementOrder>,
    /// Interface flags
    pub ui: UiState,
    /// Whether a fetch is outstanding, per resource
    pub loading: BTreeMap<Resource, bool>,
    /// Message of the last failed fetch, per resource
    pub errors: BTreeMap<Resource, Option<String>>,
    /// Time of the last successful fetch, per resource
    pub last_synced: BTreeMap<Resource, DateTime<Utc>>,
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self {
            user: UserProfile {
                id: "user-1".to_string(),
                name: "Alex Johnson".to_string(),
                email: "alex.johnson@company.com".to_string(),
                role: "Supply Chain Manager".to_string(),
                preferences: UserPreferences {
                    theme: Theme::Dark,
                    notifications: true,
                    language: "en".to_string(),
                },
            },
            dashboard: seed::dashboard(),
            orders: seed::orders(),
            suppliers: seed::suppliers(),
            procurement: seed::procurement(),
            ui: UiState::default(),
            loading: Resource::ALL.into_iter().map(|r| (r, false)).collect(),
            errors: Resource::ALL.into_iter().map(|r| (r, None)).collect(),
            last_synced: BTreeMap::new(),
        }
    }
}

impl ApplicationState {
    /// Whether a fetch of `resource` is outstanding
    #[must_use]
    pub fn is_loading(&self, resource: Resource) -> bool {
        self.loading.get(&resource).copied().unwrap_or(false)
    }

    /// Message of the last failed fetch of `resource`, if any
    #[must_use]
    pub fn error(&self, resource: Resource) -> Option<&str> {
        self.errors.get(&resource).and_then(Option::as_deref)
    }

    /// Active theme
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.ui.theme
    }

    /// Set the theme in both places it is kept
    pub(crate) fn set_theme(&mut self, theme: Theme) {
        self.ui.theme = theme;
        self.user.preferences.theme = theme;
    }

    /// Whether `ui.theme` and the user's preference agree
    #[must_use]
    pub fn theme_is_mirrored(&self) -> bool {
        self.ui.theme == self.user.preferences.theme
    }
}
