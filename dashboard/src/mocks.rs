//! In-memory test doubles for the environment seams.
//!
//! These back the unit and integration tests and let hosts run the store
//! without touching the file system or the process environment.

use crate::error::{FetchError, ThemeStorageError};
use crate::mock_service::{DataSource, FetchFuture, MockDataService, MockLatency};
use crate::theme::{ColorSchemeProbe, StorageFuture, ThemeStorage};
use crate::types::{Dataset, Resource, Theme};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Clone, Debug)]
enum Script {
    Respond(Dataset),
    Fail(String),
}

#[derive(Debug, Default)]
struct ScriptBook {
    scripts: HashMap<Resource, Script>,
    delays: HashMap<Resource, Duration>,
    calls: HashMap<Resource, usize>,
}

/// Data source whose answers are set per resource by the test
///
/// Unscripted resources get the seed records with no delay. Clones share
/// their scripts, so a test can keep a handle and change answers while the
/// store holds another.
#[derive(Clone, Debug)]
pub struct ScriptedDataSource {
    book: Arc<Mutex<ScriptBook>>,
    fallback: MockDataService,
}

impl ScriptedDataSource {
    /// Source serving seed data for every resource
    #[must_use]
    pub fn new() -> Self {
        Self {
            book: Arc::new(Mutex::new(ScriptBook::default())),
            fallback: MockDataService::with_seed(0).with_latency(MockLatency::ZERO),
        }
    }

    fn book(&self) -> MutexGuard<'_, ScriptBook> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every fetch of `resource` fail with `message`
    pub fn fail(&self, resource: Resource, message: impl Into<String>) {
        self.book()
            .scripts
            .insert(resource, Script::Fail(message.into()));
    }

    /// Make every fetch of `resource` return `dataset`
    pub fn respond_with(&self, resource: Resource, dataset: Dataset) {
        self.book().scripts.insert(resource, Script::Respond(dataset));
    }

    /// Drop any script for `resource`, going back to seed data
    pub fn succeed(&self, resource: Resource) {
        self.book().scripts.remove(&resource);
    }

    /// Delay every fetch of `resource` by `delay`
    pub fn delay(&self, resource: Resource, delay: Duration) {
        self.book().delays.insert(resource, delay);
    }

    /// Number of fetches of `resource` started so far
    #[must_use]
    pub fn calls(&self, resource: Resource) -> usize {
        self.book().calls.get(&resource).copied().unwrap_or(0)
    }
}

impl Default for ScriptedDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for ScriptedDataSource {
    fn fetch(&self, resource: Resource) -> FetchFuture {
        let (script, delay) = {
            let mut book = self.book();
            *book.calls.entry(resource).or_insert(0) += 1;
            (
                book.scripts.get(&resource).cloned(),
                book.delays.get(&resource).copied(),
            )
        };
        let fallback = self.fallback.clone();

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match script {
                Some(Script::Respond(dataset)) => Ok(dataset),
                Some(Script::Fail(message)) => Err(FetchError::new(resource, message)),
                None => Ok(fallback.snapshot(resource)),
            }
        })
    }
}

/// Theme storage kept in memory
///
/// Counts saves so tests can check that a toggle persisted.
#[derive(Clone, Debug, Default)]
pub struct InMemoryThemeStorage {
    theme: Arc<Mutex<Option<Theme>>>,
    saves: Arc<AtomicUsize>,
    failure: Option<String>,
}

impl InMemoryThemeStorage {
    /// Empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `theme`
    #[must_use]
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme: Arc::new(Mutex::new(Some(theme))),
            ..Self::default()
        }
    }

    /// Storage whose every read and write fails with `message`
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Theme currently stored
    #[must_use]
    pub fn stored(&self) -> Option<Theme> {
        *self.theme.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of successful saves
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::Acquire)
    }

    fn check(&self) -> Result<(), ThemeStorageError> {
        match &self.failure {
            Some(message) => Err(ThemeStorageError::Unavailable(message.clone())),
            None => Ok(()),
        }
    }
}

impl ThemeStorage for InMemoryThemeStorage {
    fn load(&self) -> StorageFuture<'_, Option<Theme>> {
        Box::pin(async move {
            self.check()?;
            Ok(self.stored())
        })
    }

    fn save(&self, theme: Theme) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            self.check()?;
            let mut stored = self
                .theme
                .lock()
                .map_err(|_| ThemeStorageError::Unavailable("theme lock poisoned".to_string()))?;
            *stored = Some(theme);
            self.saves.fetch_add(1, Ordering::AcqRel);
            Ok(())
        })
    }
}

/// Host probe with a fixed answer
#[derive(Clone, Copy, Debug)]
pub struct FixedColorScheme {
    dark: bool,
}

impl FixedColorScheme {
    /// Host that prefers dark
    #[must_use]
    pub const fn dark() -> Self {
        Self { dark: true }
    }

    /// Host that prefers light
    #[must_use]
    pub const fn light() -> Self {
        Self { dark: false }
    }
}

impl ColorSchemeProbe for FixedColorScheme {
    fn prefers_dark(&self) -> bool {
        self.dark
    }
}
