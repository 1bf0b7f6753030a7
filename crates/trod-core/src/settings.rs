//! Settings for trod.
//!
//! [`Settings`] holds the knobs that influence DDL rendering and logging, and
//! [`LazySettings`] provides a globally-accessible, configure-once instance.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// The implicit auto-increment primary key added to every table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultIdSettings {
    /// Column name of the implicit primary key.
    pub column: String,
    /// Column comment of the implicit primary key.
    pub comment: String,
}

impl Default for DefaultIdSettings {
    fn default() -> Self {
        Self {
            column: "id".to_string(),
            comment: "主键".to_string(),
        }
    }
}

/// The complete set of trod settings.
///
/// # Examples
///
/// ```
/// use trod_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.default_id.column, "id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled. Selects the pretty log format.
    pub debug: bool,

    /// The log level or `EnvFilter` directive (e.g. "info", "trod_db=debug").
    pub log_level: String,

    /// Character set applied to text columns that do not name one explicitly.
    pub default_charset: Option<String>,

    /// The implicit primary key column.
    pub default_id: DefaultIdSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            default_charset: None,
            default_id: DefaultIdSettings::default(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup, then use
/// [`get`](LazySettings::get) to access the settings.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns the configured settings, or `None` when unconfigured.
    pub fn try_get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
