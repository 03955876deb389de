//! Toolkit configuration.
//!
//! Configuration is plain data that can be built in code or loaded from a
//! TOML file. Every field has a default, so a file only needs to list the
//! values it overrides:
//!
//! ```toml
//! default_dpi = 144
//!
//! [layout]
//! spacing = 4
//! margins = { left = 0, top = 0, right = 0, bottom = 0 }
//!
//! [thread_pool]
//! num_threads = 2
//! ```

use std::path::Path;

use horizon_trellis_core::ThreadPoolConfig;
use horizon_trellis_core::logging::targets;
use horizon_trellis_render::BASE_DPI;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::widget::layout::{ContentMargins, DEFAULT_MARGINS, DEFAULT_SPACING};

/// Rows below this count are evaluated on the calling thread.
pub const DEFAULT_PARALLEL_ROW_THRESHOLD: usize = 8;

/// Top-level toolkit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// DPI assigned to newly created widgets.
    pub default_dpi: i32,
    /// Defaults applied to new grid layouts.
    pub layout: LayoutConfig,
    /// Worker pool used for the parallel row pass.
    pub thread_pool: ThreadPoolSettings,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            default_dpi: BASE_DPI,
            layout: LayoutConfig::default(),
            thread_pool: ThreadPoolSettings::default(),
        }
    }
}

impl ToolkitConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(target: targets::TOOLKIT, path = %path.display(), "loaded toolkit config");
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Check value ranges that the type system does not express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_dpi <= 0 {
            return Err(ConfigError::Invalid {
                field: "default_dpi",
                reason: format!("must be > 0, got {}", self.default_dpi),
            });
        }
        if self.layout.spacing < 0 {
            return Err(ConfigError::Invalid {
                field: "layout.spacing",
                reason: format!("must be >= 0, got {}", self.layout.spacing),
            });
        }
        let m = self.layout.margins;
        if m.left < 0 || m.top < 0 || m.right < 0 || m.bottom < 0 {
            return Err(ConfigError::Invalid {
                field: "layout.margins",
                reason: "margins must be >= 0".to_string(),
            });
        }
        if self.thread_pool.num_threads == Some(0) {
            return Err(ConfigError::Invalid {
                field: "thread_pool.num_threads",
                reason: "must be >= 1 when set".to_string(),
            });
        }
        Ok(())
    }
}

/// Defaults for grid layouts created through the toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Content margins in 96-dpi units.
    pub margins: ContentMargins,
    /// Spacing between sections in 96-dpi units.
    pub spacing: i32,
    /// Evaluate row heights on the worker pool.
    pub parallel_rows: bool,
    /// Minimum row count before the worker pool is used.
    pub parallel_row_threshold: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margins: DEFAULT_MARGINS,
            spacing: DEFAULT_SPACING,
            parallel_rows: true,
            parallel_row_threshold: DEFAULT_PARALLEL_ROW_THRESHOLD,
        }
    }
}

/// Serializable form of [`ThreadPoolConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadPoolSettings {
    /// Number of worker threads; unset means one per CPU core.
    pub num_threads: Option<usize>,
    /// Name prefix for worker threads.
    pub thread_name: String,
    /// Worker stack size in bytes.
    pub stack_size: Option<usize>,
}

impl Default for ThreadPoolSettings {
    fn default() -> Self {
        let ThreadPoolConfig {
            num_threads,
            thread_name,
            stack_size,
        } = ThreadPoolConfig::default();
        Self {
            num_threads,
            thread_name,
            stack_size,
        }
    }
}

impl From<ThreadPoolSettings> for ThreadPoolConfig {
    fn from(settings: ThreadPoolSettings) -> Self {
        Self {
            num_threads: settings.num_threads,
            thread_name: settings.thread_name,
            stack_size: settings.stack_size,
        }
    }
}
