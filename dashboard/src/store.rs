//! The dashboard store facade.
//!
//! [`DashboardStore`] is what pages hold. It owns a runtime [`Store`] over
//! [`ApplicationState`] and turns each page intent into one action. Handles
//! are cheap to clone and share one state.

use crate::actions::{DashboardAction, FetchOutcome, RequestId};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::reducer::{DashboardEnvironment, DashboardReducer};
use crate::state::ApplicationState;
use crate::theme::resolve_initial_theme;
use crate::types::{
    DashboardPatch, Order, Page, PreferencesPatch, ProcurementOrder, Resource, Supplier, Theme,
};
use optiflow_runtime::{EffectHandle, PollingTask, Store, StoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Runtime store specialised to the dashboard
pub type DashboardRuntime =
    Store<ApplicationState, DashboardAction, DashboardEnvironment, DashboardReducer>;

/// Global state container for the dashboard
#[derive(Clone)]
pub struct DashboardStore {
    runtime: DashboardRuntime,
    poll_interval: Duration,
    fetch_timeout: Duration,
    /// Set while an [`Activation`] is live
    active: Arc<AtomicBool>,
}

impl DashboardStore {
    /// Store starting from the seed state
    #[must_use]
    pub fn new(env: DashboardEnvironment, config: &DashboardConfig) -> Self {
        Self::with_state(ApplicationState::default(), env, config)
    }

    /// Store starting from `state`
    #[must_use]
    pub fn with_state(
        state: ApplicationState,
        env: DashboardEnvironment,
        config: &DashboardConfig,
    ) -> Self {
        Self {
            runtime: Store::new(state, DashboardReducer::new(), env),
            poll_interval: config.poll_interval,
            fetch_timeout: config.fetch_timeout,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The underlying runtime store
    #[must_use]
    pub const fn runtime(&self) -> &DashboardRuntime {
        &self.runtime
    }

    /// Injected dependencies
    #[must_use]
    pub const fn environment(&self) -> &DashboardEnvironment {
        self.runtime.environment()
    }

    // ========== Reads ==========

    /// Copy of the whole state
    pub async fn snapshot(&self) -> ApplicationState {
        self.runtime.state(ApplicationState::clone).await
    }

    /// Read part of the state without cloning the rest
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&ApplicationState) -> T,
    {
        self.runtime.state(f).await
    }

    /// Actions produced by effects, each delivered after it was applied
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardAction> {
        self.runtime.subscribe_actions()
    }

    // ========== Writes ==========

    async fn dispatch(&self, action: DashboardAction) -> Result<EffectHandle> {
        Ok(self.runtime.send(action).await?)
    }

    /// Show `page`
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down.
    pub async fn set_current_page(&self, page: Page) -> Result<()> {
        self.dispatch(DashboardAction::SetCurrentPage(page)).await?;
        Ok(())
    }

    /// Show the page with navigation id `id`
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::UnknownPage`] for an id outside the
    /// catalogue, without touching state.
    pub async fn set_current_page_id(&self, id: &str) -> Result<()> {
        self.set_current_page(id.parse()?).await
    }

    /// Flip the sidebar
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down.
    pub async fn toggle_sidebar(&self) -> Result<()> {
        self.dispatch(DashboardAction::ToggleSidebar).await?;
        Ok(())
    }

    /// Show `page`, closing the sidebar when `viewport_width` is narrow
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down.
    pub async fn navigate(&self, page: Page, viewport_width: u32) -> Result<()> {
        self.dispatch(DashboardAction::Navigate {
            page,
            viewport_width,
        })
        .await?;
        Ok(())
    }

    /// Shallow-merge into the user's preferences
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down.
    pub async fn update_user_preferences(&self, patch: PreferencesPatch) -> Result<()> {
        self.dispatch(DashboardAction::UpdateUserPreferences(patch))
            .await?;
        Ok(())
    }

    /// Set the theme
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down.
    pub async fn update_theme(&self, theme: Theme) -> Result<()> {
        self.dispatch(DashboardAction::UpdateTheme(theme)).await?;
        Ok(())
    }

    /// Flip the theme and wait until it is persisted and applied
    ///
    /// Returns the new theme.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down or
    /// if persisting outlasts the fetch timeout.
    pub async fn toggle_theme(&self) -> Result<Theme> {
        let mut handle = self.dispatch(DashboardAction::ToggleTheme).await?;
        handle.wait_with_timeout(self.fetch_timeout).await?;
        Ok(self.state(ApplicationState::theme).await)
    }

    /// Shallow-merge into the dashboard data
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down.
    pub async fn update_dashboard_data(&self, patch: DashboardPatch) -> Result<()> {
        self.dispatch(DashboardAction::UpdateDashboardData(patch))
            .await?;
        Ok(())
    }

    /// Replace the order list
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down.
    pub async fn update_orders(&self, orders: Vec<Order>) -> Result<()> {
        self.dispatch(DashboardAction::UpdateOrders(orders)).await?;
        Ok(())
    }

    /// Replace the supplier list
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down.
    pub async fn update_suppliers(&self, suppliers: Vec<Supplier>) -> Result<()> {
        self.dispatch(DashboardAction::UpdateSuppliers(suppliers))
            .await?;
        Ok(())
    }

    /// Replace the purchase order list
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down.
    pub async fn update_procurement(&self, procurement: Vec<ProcurementOrder>) -> Result<()> {
        self.dispatch(DashboardAction::UpdateProcurement(procurement))
            .await?;
        Ok(())
    }

    /// Set the loading flag of `resource`
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down.
    pub async fn set_loading(&self, resource: Resource, is_loading: bool) -> Result<()> {
        self.dispatch(DashboardAction::SetLoading {
            resource,
            is_loading,
        })
        .await?;
        Ok(())
    }

    /// Set or clear the error of `resource`
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] once the store is shutting down.
    pub async fn set_error(&self, resource: Resource, error: Option<String>) -> Result<()> {
        self.dispatch(DashboardAction::SetError { resource, error })
            .await?;
        Ok(())
    }

    // ========== Fetching ==========

    /// Fetch `resource` and wait for the result to land in state
    ///
    /// A failing source is not an error: its message is recorded in
    /// `errors[resource]` and returned as [`FetchOutcome::Failed`].
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] if the store is shutting down or no
    /// result arrives within the fetch timeout.
    #[tracing::instrument(skip_all, fields(resource = %resource))]
    pub async fn fetch_data(&self, resource: Resource) -> Result<FetchOutcome> {
        let request_id = RequestId::new();
        let terminal = self
            .runtime
            .send_and_wait_for(
                DashboardAction::FetchData {
                    resource,
                    request_id,
                },
                move |action| action.completes(request_id),
                self.fetch_timeout,
            )
            .await?;

        // The predicate only accepts terminal fetch actions.
        terminal
            .into_outcome()
            .ok_or(DashboardError::Store(StoreError::ChannelClosed))
    }

    /// Fetch the resource named `name`
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::UnknownResource`] for a name outside the
    /// four resources, before any state is touched, and otherwise the
    /// errors of [`DashboardStore::fetch_data`].
    pub async fn fetch_section(&self, name: &str) -> Result<FetchOutcome> {
        let resource: Resource = name.parse()?;
        self.fetch_data(resource).await
    }

    /// Fetch every resource concurrently
    ///
    /// # Errors
    ///
    /// Returns the first store-level error; fetch failures are outcomes.
    pub async fn refresh_all(&self) -> Result<Vec<(Resource, FetchOutcome)>> {
        let fetches = Resource::ALL
            .into_iter()
            .map(move |resource| async move { (resource, self.fetch_data(resource).await) });

        futures::future::join_all(fetches)
            .await
            .into_iter()
            .map(|(resource, outcome)| outcome.map(|outcome| (resource, outcome)))
            .collect()
    }

    // ========== Lifecycle ==========

    /// Resolve and apply the initial theme, then start polling
    ///
    /// The theme is in state and applied to the dark-mode toggle before
    /// this returns. The dashboard is re-fetched every poll interval until
    /// the returned guard is deactivated or dropped. One activation may be
    /// live per store.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::AlreadyActive`] while an earlier activation
    /// is live, and [`DashboardError::Store`] if the store is shutting down
    /// or applying the theme outlasts the fetch timeout.
    pub async fn activate(&self) -> Result<Activation> {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Rejected activation: dashboard is already active");
            return Err(DashboardError::AlreadyActive);
        }
        let live = LiveFlag(Arc::clone(&self.active));

        let env = self.runtime.environment();
        let theme =
            resolve_initial_theme(env.theme_storage.as_ref(), env.color_scheme.as_ref()).await;

        let mut handle = self.dispatch(DashboardAction::Activate { theme }).await?;
        handle.wait_with_timeout(self.fetch_timeout).await?;

        let polling = PollingTask::spawn(self.runtime.clone(), self.poll_interval, || {
            DashboardAction::fetch(Resource::Dashboard)
        });

        tracing::info!(
            %theme,
            poll_interval_secs = self.poll_interval.as_secs(),
            "Dashboard activated"
        );
        Ok(Activation { polling, _live: live })
    }

    /// Reject new actions and wait for in-flight effects
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] if effects are still running when
    /// `timeout` expires.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.runtime.shutdown(timeout).await?;
        Ok(())
    }
}

impl std::fmt::Debug for DashboardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardStore")
            .field("poll_interval", &self.poll_interval)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("pending_effects", &self.runtime.pending_effects())
            .field("active", &self.active.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

/// Guard for an activated dashboard
///
/// Owns the polling loop. Dropping the guard stops polling;
/// [`Activation::deactivate`] also waits for the loop to exit.
#[derive(Debug)]
#[must_use = "dropping the activation stops polling"]
pub struct Activation {
    polling: PollingTask,
    _live: LiveFlag,
}

/// Clears the store's activation flag on drop
#[derive(Debug)]
struct LiveFlag(Arc<AtomicBool>);

impl Drop for LiveFlag {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Activation {
    /// Polling fetches dispatched so far
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.polling.ticks()
    }

    /// Whether polling is still running
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.polling.is_running()
    }

    /// Stop polling and wait for the loop to exit
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Store`] if the polling task panicked.
    pub async fn deactivate(self) -> Result<()> {
        let Self { polling, _live } = self;
        let ticks = polling.ticks();
        polling.stop().await?;
        tracing::info!(ticks, "Dashboard deactivated");
        Ok(())
    }
}
