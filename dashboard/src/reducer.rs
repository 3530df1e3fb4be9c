//! Reducer logic for the dashboard.
//!
//! Every state change goes through [`DashboardReducer::reduce`]. Work that
//! leaves the process (fetching, persisting the theme, driving the
//! dark-mode toggle) is returned as effects for the store to run.

use crate::actions::{DashboardAction, RequestId};
use crate::config::DashboardConfig;
use crate::gateway::DataGateway;
use crate::mock_service::{DataSource, MockDataService, MockLatency};
use crate::state::ApplicationState;
use crate::theme::{ColorSchemeProbe, DarkModeToggle, EnvColorScheme, FileThemeStorage, ThemeStorage};
use crate::types::{Dataset, Resource, Theme};
use optiflow_core::{
    effect::Effect,
    environment::{Clock, SystemClock},
    reducer::Reducer,
    smallvec, SmallVec,
};
use std::sync::Arc;

/// Environment dependencies for the dashboard reducer
#[derive(Clone)]
pub struct DashboardEnvironment {
    /// Fetches datasets and keeps the request ledger
    pub gateway: DataGateway,
    /// Timestamps successful fetches
    pub clock: Arc<dyn Clock>,
    /// Persists the theme on toggle
    pub theme_storage: Arc<dyn ThemeStorage>,
    /// Host preference used when no theme is stored
    pub color_scheme: Arc<dyn ColorSchemeProbe>,
    /// Receives every theme change
    pub dark_mode: Arc<dyn DarkModeToggle>,
    /// Navigation below this width closes the sidebar
    pub narrow_viewport_width: u32,
}

impl DashboardEnvironment {
    /// Creates a new `DashboardEnvironment` with the system clock and the
    /// default narrow-viewport threshold
    #[must_use]
    pub fn new(
        source: Arc<dyn DataSource>,
        theme_storage: Arc<dyn ThemeStorage>,
        color_scheme: Arc<dyn ColorSchemeProbe>,
        dark_mode: Arc<dyn DarkModeToggle>,
    ) -> Self {
        Self {
            gateway: DataGateway::new(source),
            clock: Arc::new(SystemClock),
            theme_storage,
            color_scheme,
            dark_mode,
            narrow_viewport_width: DashboardConfig::default().narrow_viewport_width,
        }
    }

    /// Production environment for `config`
    ///
    /// Uses the mock service with scaled latencies, the theme file from the
    /// config and the `COLORFGBG` probe.
    #[must_use]
    pub fn from_config(config: &DashboardConfig, dark_mode: Arc<dyn DarkModeToggle>) -> Self {
        let source = MockDataService::new()
            .with_latency(MockLatency::default().scaled(config.mock_latency_scale))
            .shared();

        Self::new(
            source,
            Arc::new(FileThemeStorage::new(config.theme_file.clone())),
            Arc::new(EnvColorScheme::from_env()),
            dark_mode,
        )
        .with_narrow_viewport_width(config.narrow_viewport_width)
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the narrow-viewport threshold
    #[must_use]
    pub const fn with_narrow_viewport_width(mut self, width: u32) -> Self {
        self.narrow_viewport_width = width;
        self
    }
}

impl std::fmt::Debug for DashboardEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardEnvironment")
            .field("gateway", &self.gateway)
            .field("narrow_viewport_width", &self.narrow_viewport_width)
            .finish_non_exhaustive()
    }
}

/// Reducer for the dashboard state
#[derive(Clone, Debug, Default)]
pub struct DashboardReducer;

impl DashboardReducer {
    /// Creates a new `DashboardReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Replace the slice of state `dataset` belongs to
    fn apply_dataset(state: &mut ApplicationState, dataset: Dataset) {
        match dataset {
            Dataset::Dashboard(data) => state.dashboard = data,
            Dataset::Orders(orders) => state.orders = orders,
            Dataset::Suppliers(suppliers) => state.suppliers = suppliers,
            Dataset::Procurement(procurement) => state.procurement = procurement,
        }
    }

    fn settle(state: &mut ApplicationState, resource: Resource, error: Option<String>) {
        state.loading.insert(resource, false);
        state.errors.insert(resource, error);
    }

    /// Hand `theme` to the platform toggle
    fn apply_theme(env: &DashboardEnvironment, theme: Theme) -> Effect<DashboardAction> {
        let dark_mode = Arc::clone(&env.dark_mode);
        Effect::fire_and_forget(async move { dark_mode.apply(theme) })
    }

    /// Write `theme` to storage, logging failures
    fn persist_theme(env: &DashboardEnvironment, theme: Theme) -> Effect<DashboardAction> {
        let storage = Arc::clone(&env.theme_storage);
        Effect::fire_and_forget(async move {
            if let Err(error) = storage.save(theme).await {
                tracing::warn!(%error, %theme, "Could not persist theme");
            }
        })
    }

    /// Run the fetch and feed its outcome back as a terminal action
    fn fetch(
        env: &DashboardEnvironment,
        resource: Resource,
        request_id: RequestId,
    ) -> Effect<DashboardAction> {
        let gateway = env.gateway.clone();

        Effect::Future(Box::pin(async move {
            Some(match gateway.request(resource).await {
                Ok(dataset) => DashboardAction::FetchSucceeded {
                    resource,
                    request_id,
                    dataset,
                },
                Err(error) => DashboardAction::FetchFailed {
                    resource,
                    request_id,
                    message: error.message,
                },
            })
        }))
    }
}

impl Reducer for DashboardReducer {
    type State = ApplicationState;
    type Action = DashboardAction;
    type Environment = DashboardEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Navigation and layout ==========
            DashboardAction::SetCurrentPage(page) => {
                state.ui.current_page = page;
                SmallVec::new()
            },

            DashboardAction::ToggleSidebar => {
                state.ui.sidebar_open = !state.ui.sidebar_open;
                SmallVec::new()
            },

            DashboardAction::Navigate {
                page,
                viewport_width,
            } => {
                state.ui.current_page = page;
                if viewport_width < env.narrow_viewport_width {
                    state.ui.sidebar_open = false;
                }
                SmallVec::new()
            },

            // ========== Preferences and theme ==========
            DashboardAction::UpdateUserPreferences(patch) => {
                state.user.preferences.merge(patch);
                state.ui.theme = state.user.preferences.theme;
                SmallVec::new()
            },

            DashboardAction::UpdateTheme(theme) => {
                state.set_theme(theme);
                SmallVec::new()
            },

            DashboardAction::ToggleTheme => {
                let theme = state.theme().toggled();
                state.set_theme(theme);
                tracing::debug!(%theme, "Theme toggled");

                smallvec![
                    Self::apply_theme(env, theme),
                    Self::persist_theme(env, theme),
                ]
            },

            DashboardAction::Activate { theme } => {
                state.set_theme(theme);
                smallvec![Self::apply_theme(env, theme)]
            },

            // ========== Direct data writes ==========
            DashboardAction::UpdateDashboardData(patch) => {
                state.dashboard.merge(patch);
                SmallVec::new()
            },

            DashboardAction::UpdateOrders(orders) => {
                state.orders = orders;
                SmallVec::new()
            },

            DashboardAction::UpdateSuppliers(suppliers) => {
                state.suppliers = suppliers;
                SmallVec::new()
            },

            DashboardAction::UpdateProcurement(procurement) => {
                state.procurement = procurement;
                SmallVec::new()
            },

            DashboardAction::SetLoading {
                resource,
                is_loading,
            } => {
                state.loading.insert(resource, is_loading);
                SmallVec::new()
            },

            DashboardAction::SetError { resource, error } => {
                state.errors.insert(resource, error);
                SmallVec::new()
            },

            // ========== Fetch lifecycle ==========
            DashboardAction::FetchData {
                resource,
                request_id,
            } => {
                state.loading.insert(resource, true);
                state.errors.insert(resource, None);
                tracing::debug!(%resource, %request_id, "Fetch dispatched");

                smallvec![Self::fetch(env, resource, request_id)]
            },

            DashboardAction::FetchSucceeded {
                resource, dataset, ..
            } => {
                Self::apply_dataset(state, dataset);
                Self::settle(state, resource, None);
                state.last_synced.insert(resource, env.clock.now());
                SmallVec::new()
            },

            DashboardAction::FetchFailed {
                resource, message, ..
            } => {
                tracing::warn!(%resource, %message, "Fetch failure recorded");
                Self::settle(state, resource, Some(message));
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{FixedColorScheme, InMemoryThemeStorage, ScriptedDataSource};
    use crate::seed;
    use crate::theme::DarkModeSignal;
    use crate::types::{DashboardPatch, Page, PreferencesPatch};
    use optiflow_testing::{assertions, run_effects, test_clock, ReducerTest};

    struct Fixture {
        env: DashboardEnvironment,
        source: ScriptedDataSource,
        storage: InMemoryThemeStorage,
        signal: DarkModeSignal,
    }

    fn fixture() -> Fixture {
        let source = ScriptedDataSource::new();
        let storage = InMemoryThemeStorage::new();
        let signal = DarkModeSignal::new(Theme::Dark);
        let env = DashboardEnvironment::new(
            Arc::new(source.clone()),
            Arc::new(storage.clone()),
            Arc::new(FixedColorScheme::dark()),
            Arc::new(signal.clone()),
        )
        .with_clock(Arc::new(test_clock()));

        Fixture {
            env,
            source,
            storage,
            signal,
        }
    }

    fn test_env() -> DashboardEnvironment {
        fixture().env
    }

    #[test]
    fn test_set_current_page() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(ApplicationState::default())
            .when_action(DashboardAction::SetCurrentPage(Page::Orders))
            .then_state(|state| assert_eq!(state.ui.current_page, Page::Orders))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_toggle_sidebar_twice_is_identity() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(ApplicationState::default())
            .when_actions([DashboardAction::ToggleSidebar, DashboardAction::ToggleSidebar])
            .then_state(|state| assert!(state.ui.sidebar_open))
            .run();
    }

    #[test]
    fn test_narrow_navigation_closes_sidebar() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(ApplicationState::default())
            .when_action(DashboardAction::Navigate {
                page: Page::Inventory,
                viewport_width: 800,
            })
            .then_state(|state| {
                assert_eq!(state.ui.current_page, Page::Inventory);
                assert!(!state.ui.sidebar_open);
            })
            .run();
    }

    #[test]
    fn test_wide_navigation_keeps_sidebar() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(ApplicationState::default())
            .when_action(DashboardAction::Navigate {
                page: Page::Reports,
                viewport_width: 1024,
            })
            .then_state(|state| {
                assert_eq!(state.ui.current_page, Page::Reports);
                assert!(state.ui.sidebar_open);
            })
            .run();
    }

    #[test]
    fn test_narrow_navigation_never_reopens_sidebar() {
        let mut state = ApplicationState::default();
        state.ui.sidebar_open = false;

        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(DashboardAction::Navigate {
                page: Page::Help,
                viewport_width: 320,
            })
            .then_state(|state| assert!(!state.ui.sidebar_open))
            .run();
    }

    #[test]
    fn test_update_theme_mirrors_into_preferences() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(ApplicationState::default())
            .when_actions([
                DashboardAction::UpdateTheme(Theme::Dark),
                DashboardAction::UpdateTheme(Theme::Light),
            ])
            .then_state(|state| {
                assert_eq!(state.ui.theme, Theme::Light);
                assert_eq!(state.user.preferences.theme, Theme::Light);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_preferences_patch_with_theme_is_mirrored() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(ApplicationState::default())
            .when_action(DashboardAction::UpdateUserPreferences(PreferencesPatch {
                theme: Some(Theme::Light),
                notifications: Some(false),
                language: None,
            }))
            .then_state(|state| {
                assert_eq!(state.ui.theme, Theme::Light);
                assert!(!state.user.preferences.notifications);
                assert_eq!(state.user.preferences.language, "en");
            })
            .run();
    }

    #[test]
    fn test_update_dashboard_data_is_shallow() {
        let mut kpis = seed::kpi_baseline();
        kpis.stockout_rate = 9.9;

        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(ApplicationState::default())
            .when_action(DashboardAction::UpdateDashboardData(DashboardPatch {
                kpis: Some(kpis),
                ..DashboardPatch::default()
            }))
            .then_state(|state| {
                assert!((state.dashboard.kpis.stockout_rate - 9.9).abs() < f64::EPSILON);
                assert_eq!(state.dashboard.alerts.len(), 5);
            })
            .run();
    }

    #[test]
    fn test_set_loading_touches_one_resource() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(ApplicationState::default())
            .when_actions([
                DashboardAction::SetLoading {
                    resource: Resource::Orders,
                    is_loading: true,
                },
                DashboardAction::SetError {
                    resource: Resource::Suppliers,
                    error: Some("stale".into()),
                },
            ])
            .then_state(|state| {
                assert!(state.is_loading(Resource::Orders));
                assert!(!state.is_loading(Resource::Suppliers));
                assert_eq!(state.error(Resource::Suppliers), Some("stale"));
                assert_eq!(state.error(Resource::Orders), None);
            })
            .run();
    }

    #[test]
    fn test_update_lists_replace_wholesale() {
        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(ApplicationState::default())
            .when_actions([
                DashboardAction::UpdateOrders(Vec::new()),
                DashboardAction::UpdateSuppliers(seed::suppliers()[..2].to_vec()),
                DashboardAction::UpdateProcurement(Vec::new()),
            ])
            .then_state(|state| {
                assert!(state.orders.is_empty());
                assert_eq!(state.suppliers.len(), 2);
                assert!(state.procurement.is_empty());
            })
            .run();
    }

    #[test]
    fn test_fetch_data_marks_loading_and_clears_error() {
        let mut state = ApplicationState::default();
        state.errors.insert(Resource::Orders, Some("old failure".into()));

        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(DashboardAction::fetch(Resource::Orders))
            .then_state(|state| {
                assert!(state.is_loading(Resource::Orders));
                assert_eq!(state.error(Resource::Orders), None);
            })
            .then_effects(|effects| assertions::assert_future_count(effects, 1))
            .run();
    }

    #[tokio::test]
    async fn test_fetch_effect_feeds_back_success() {
        let fixture = fixture();
        let request_id = RequestId::new();

        let (_, effects) = ReducerTest::new(DashboardReducer::new())
            .with_env(fixture.env.clone())
            .given_state(ApplicationState::default())
            .when_action(DashboardAction::FetchData {
                resource: Resource::Procurement,
                request_id,
            })
            .run();

        let fed_back = run_effects(effects).await;
        assert_eq!(fed_back.len(), 1);
        assert!(fed_back[0].completes(request_id));
        assert!(matches!(fed_back[0], DashboardAction::FetchSucceeded { .. }));
        assert_eq!(fixture.source.calls(Resource::Procurement), 1);
    }

    #[tokio::test]
    async fn test_fetch_effect_feeds_back_failure() {
        let fixture = fixture();
        fixture.source.fail(Resource::Dashboard, "upstream 503");

        let (_, effects) = ReducerTest::new(DashboardReducer::new())
            .with_env(fixture.env.clone())
            .given_state(ApplicationState::default())
            .when_action(DashboardAction::fetch(Resource::Dashboard))
            .run();

        let fed_back = run_effects(effects).await;
        assert!(matches!(
            fed_back.as_slice(),
            [DashboardAction::FetchFailed { message, .. }] if message == "upstream 503"
        ));
    }

    #[test]
    fn test_fetch_succeeded_replaces_data_and_stamps_time() {
        let dataset = Dataset::Orders(seed::orders()[..3].to_vec());
        let mut state = ApplicationState::default();
        state.loading.insert(Resource::Orders, true);

        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(DashboardAction::FetchSucceeded {
                resource: Resource::Orders,
                request_id: RequestId::new(),
                dataset,
            })
            .then_state(|state| {
                assert_eq!(state.orders.len(), 3);
                assert!(!state.is_loading(Resource::Orders));
                assert_eq!(state.error(Resource::Orders), None);
                assert_eq!(state.last_synced.get(&Resource::Orders), Some(&test_clock().now()));
            })
            .run();
    }

    #[test]
    fn test_fetch_failed_keeps_previous_data() {
        let mut state = ApplicationState::default();
        state.loading.insert(Resource::Suppliers, true);

        ReducerTest::new(DashboardReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(DashboardAction::FetchFailed {
                resource: Resource::Suppliers,
                request_id: RequestId::new(),
                message: "timeout".into(),
            })
            .then_state(|state| {
                assert_eq!(state.suppliers, seed::suppliers());
                assert!(!state.is_loading(Resource::Suppliers));
                assert_eq!(state.error(Resource::Suppliers), Some("timeout"));
                assert!(state.last_synced.is_empty());
            })
            .run();
    }

    #[tokio::test]
    async fn test_toggle_theme_persists_and_applies() {
        let fixture = fixture();

        let (state, effects) = ReducerTest::new(DashboardReducer::new())
            .with_env(fixture.env.clone())
            .given_state(ApplicationState::default())
            .when_action(DashboardAction::ToggleTheme)
            .then_effects(|effects| assertions::assert_future_count(effects, 2))
            .run();
        assert_eq!(state.theme(), Theme::Light);
        assert!(state.theme_is_mirrored());

        let fed_back = run_effects(effects).await;
        assert!(fed_back.is_empty());
        assert_eq!(fixture.storage.stored(), Some(Theme::Light));
        assert_eq!(fixture.signal.current(), Theme::Light);
    }

    #[tokio::test]
    async fn test_activate_applies_without_persisting() {
        let fixture = fixture();

        let (state, effects) = ReducerTest::new(DashboardReducer::new())
            .with_env(fixture.env.clone())
            .given_state(ApplicationState::default())
            .when_action(DashboardAction::Activate { theme: Theme::Light })
            .run();
        run_effects(effects).await;

        assert_eq!(state.theme(), Theme::Light);
        assert_eq!(fixture.signal.current(), Theme::Light);
        assert_eq!(fixture.storage.saves(), 0);
    }
}
