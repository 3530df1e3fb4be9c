//! # OptiFlow Dashboard
//!
//! Global state container for the OptiFlow supply-chain dashboard.
//!
//! Pages read from and write to one [`ApplicationState`] through a
//! [`DashboardStore`]. Every write is a [`DashboardAction`] applied by the
//! [`DashboardReducer`]; fetching, theme persistence and the dark-mode
//! toggle run as effects against the injected [`DashboardEnvironment`].
//!
//! ## Architecture
//!
//! ```text
//! page intent → DashboardAction → DashboardReducer → (state, effects)
//!                                                        │
//!              FetchSucceeded / FetchFailed  ←  DataGateway → DataSource
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use optiflow_dashboard::{
//!     DarkModeSignal, DashboardConfig, DashboardEnvironment, DashboardStore, Resource,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> optiflow_dashboard::Result<()> {
//! let config = DashboardConfig::default();
//! let env = DashboardEnvironment::from_config(&config, Arc::new(DarkModeSignal::default()));
//! let store = DashboardStore::new(env, &config);
//!
//! let activation = store.activate().await?;
//! let outcome = store.fetch_data(Resource::Orders).await?;
//! println!("orders loaded: {}", outcome.is_loaded());
//! activation.deactivate().await?;
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod config;
pub mod error;
pub mod gateway;
pub mod mock_service;
pub mod mocks;
pub mod reducer;
pub mod seed;
pub mod selectors;
pub mod state;
pub mod store;
pub mod theme;
pub mod types;

pub use actions::{DashboardAction, FetchOutcome, RequestId};
pub use config::DashboardConfig;
pub use error::{ConfigError, DashboardError, FetchError, Result, ThemeStorageError};
pub use gateway::{DataGateway, RequestStatus};
pub use mock_service::{DataSource, MockDataService, MockLatency};
pub use reducer::{DashboardEnvironment, DashboardReducer};
pub use state::{ApplicationState, UiState};
pub use store::{Activation, DashboardStore};
pub use theme::{
    ColorSchemeProbe, DarkModeSignal, DarkModeToggle, EnvColorScheme, FileThemeStorage,
    ThemeStorage,
};
pub use types::{Dataset, Page, Resource, Theme};
