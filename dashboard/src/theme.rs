//! Theme persistence, host colour-scheme detection and the platform toggle.
//!
//! Three seams sit around the theme:
//! - [`ThemeStorage`] keeps the one persisted preference
//! - [`ColorSchemeProbe`] reports the host's light/dark preference
//! - [`DarkModeToggle`] applies the active theme to whatever renders it

use crate::error::ThemeStorageError;
use crate::types::Theme;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;

/// Boxed future returned by [`ThemeStorage`] methods
pub type StorageFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, ThemeStorageError>> + Send + 'a>>;

/// Persisted theme preference
pub trait ThemeStorage: Send + Sync {
    /// Read the stored theme; `None` when nothing was stored yet
    ///
    /// # Errors
    ///
    /// Returns [`ThemeStorageError`] when the backend cannot be read.
    fn load(&self) -> StorageFuture<'_, Option<Theme>>;

    /// Store `theme`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns [`ThemeStorageError`] when the backend cannot be written.
    fn save(&self, theme: Theme) -> StorageFuture<'_, ()>;
}

/// Host light/dark preference
pub trait ColorSchemeProbe: Send + Sync {
    /// Whether the host prefers a dark scheme
    fn prefers_dark(&self) -> bool;
}

/// Sink for the active theme
pub trait DarkModeToggle: Send + Sync {
    /// Make `theme` the rendered theme
    fn apply(&self, theme: Theme);
}

#[derive(Serialize, Deserialize)]
struct ThemeDocument {
    theme: Theme,
}

/// JSON file holding `{"theme": "light" | "dark"}`
#[derive(Clone, Debug)]
pub struct FileThemeStorage {
    path: PathBuf,
}

impl FileThemeStorage {
    /// Storage backed by the file at `path`
    ///
    /// The file and its parent directories are created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the theme file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemeStorage for FileThemeStorage {
    fn load(&self) -> StorageFuture<'_, Option<Theme>> {
        Box::pin(async move {
            let raw = match tokio::fs::read_to_string(&self.path).await {
                Ok(raw) => raw,
                Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
                Err(error) => return Err(error.into()),
            };

            let document: ThemeDocument = serde_json::from_str(&raw)?;
            Ok(Some(document.theme))
        })
    }

    fn save(&self, theme: Theme) -> StorageFuture<'_, ()> {
        Box::pin(async move {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            let raw = serde_json::to_string(&ThemeDocument { theme })?;
            tokio::fs::write(&self.path, raw).await?;
            tracing::debug!(path = %self.path.display(), %theme, "Theme saved");
            Ok(())
        })
    }
}

/// Probe reading the `COLORFGBG` terminal convention
///
/// The variable holds `foreground;background` colour indices. A background
/// of 0 to 6 or 8 is a dark palette entry; anything else, or no variable at
/// all, reads as light.
#[derive(Clone, Debug, Default)]
pub struct EnvColorScheme {
    value: Option<String>,
}

impl EnvColorScheme {
    /// Name of the variable read by [`EnvColorScheme::from_env`]
    pub const VARIABLE: &'static str = "COLORFGBG";

    /// Probe over the current process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            value: std::env::var(Self::VARIABLE).ok(),
        }
    }

    /// Probe over an explicit `COLORFGBG` value
    #[must_use]
    pub fn from_value(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
        }
    }
}

impl ColorSchemeProbe for EnvColorScheme {
    fn prefers_dark(&self) -> bool {
        self.value
            .as_deref()
            .and_then(|value| value.rsplit(';').next())
            .and_then(|background| background.trim().parse::<u8>().ok())
            .is_some_and(|background| matches!(background, 0..=6 | 8))
    }
}

/// Toggle publishing the active theme on a `watch` channel
///
/// Renderers hold a receiver from [`DarkModeSignal::subscribe`] and redraw
/// on change. Clones publish to the same channel.
#[derive(Clone, Debug)]
pub struct DarkModeSignal {
    sender: Arc<watch::Sender<Theme>>,
}

impl DarkModeSignal {
    /// Signal starting at `initial`
    #[must_use]
    pub fn new(initial: Theme) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Receiver that observes every applied theme
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.sender.subscribe()
    }

    /// Last applied theme
    #[must_use]
    pub fn current(&self) -> Theme {
        *self.sender.borrow()
    }
}

impl Default for DarkModeSignal {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl DarkModeToggle for DarkModeSignal {
    fn apply(&self, theme: Theme) {
        let previous = self.sender.send_replace(theme);
        if previous != theme {
            tracing::debug!(%theme, "Dark mode toggled");
        }
    }
}

/// Theme to start with: the stored preference, else the host's
///
/// A storage failure is logged and treated as "nothing stored".
pub async fn resolve_initial_theme(
    storage: &dyn ThemeStorage,
    probe: &dyn ColorSchemeProbe,
) -> Theme {
    match storage.load().await {
        Ok(Some(theme)) => {
            tracing::debug!(%theme, "Using stored theme");
            return theme;
        },
        Ok(None) => {},
        Err(error) => tracing::warn!(%error, "Could not read stored theme, using host preference"),
    }

    if probe.prefers_dark() {
        Theme::Dark
    } else {
        Theme::Light
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{FixedColorScheme, InMemoryThemeStorage};

    #[tokio::test]
    async fn test_file_storage_roundtrip() -> Result<(), ThemeStorageError> {
        let dir = tempfile::tempdir()?;
        let storage = FileThemeStorage::new(dir.path().join("nested").join("theme.json"));

        assert_eq!(storage.load().await?, None);
        storage.save(Theme::Light).await?;
        assert_eq!(storage.load().await?, Some(Theme::Light));

        let raw = std::fs::read_to_string(storage.path())?;
        assert_eq!(raw, r#"{"theme":"light"}"#);
        Ok(())
    }

    #[tokio::test]
    async fn test_file_storage_rejects_garbage() -> Result<(), ThemeStorageError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("theme.json");
        std::fs::write(&path, r#"{"theme":"sepia"}"#)?;

        let result = FileThemeStorage::new(path).load().await;
        assert!(matches!(result, Err(ThemeStorageError::Format(_))));
        Ok(())
    }

    #[test]
    fn test_colorfgbg_parsing() {
        let dark = |value| EnvColorScheme::from_value(value).prefers_dark();
        assert!(dark(Some("15;0")));
        assert!(dark(Some("15;default;8")));
        assert!(!dark(Some("0;15")));
        assert!(!dark(Some("0;7")));
        assert!(!dark(Some("garbage")));
        assert!(!dark(None));
    }

    #[test]
    fn test_signal_publishes_applied_theme() {
        let signal = DarkModeSignal::new(Theme::Dark);
        let receiver = signal.subscribe();

        signal.apply(Theme::Light);

        assert_eq!(signal.current(), Theme::Light);
        assert_eq!(*receiver.borrow(), Theme::Light);
    }

    #[tokio::test]
    async fn test_stored_theme_wins_over_host() {
        let storage = InMemoryThemeStorage::with_theme(Theme::Light);
        let theme = resolve_initial_theme(&storage, &FixedColorScheme::dark()).await;
        assert_eq!(theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_host_preference_used_when_nothing_stored() {
        let storage = InMemoryThemeStorage::new();
        assert_eq!(
            resolve_initial_theme(&storage, &FixedColorScheme::dark()).await,
            Theme::Dark
        );
        assert_eq!(
            resolve_initial_theme(&storage, &FixedColorScheme::light()).await,
            Theme::Light
        );
    }

    #[tokio::test]
    async fn test_storage_failure_falls_back_to_host() {
        let storage = InMemoryThemeStorage::failing("disk on fire");
        let theme = resolve_initial_theme(&storage, &FixedColorScheme::light()).await;
        assert_eq!(theme, Theme::Light);
    }
}
