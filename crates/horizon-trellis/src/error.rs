//! Error types for the widget and layout layer.

use horizon_trellis_core::{ObjectError, ObjectId};
use thiserror::Error;

/// Errors returned by layout configuration calls.
///
/// Every configuring operation validates its arguments before touching any
/// state, so an `Err` always means nothing was changed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The layout is not attached to a container.
    #[error("container required")]
    NoContainer,

    /// The container has no layout to configure.
    #[error("container has no layout")]
    NoLayout,

    /// The widget is not a child of the layout's container.
    #[error("widget {0:?} must be child of container")]
    NotAChild(ObjectId),

    /// A row or column span was zero.
    #[error("row span and column span must be >= 1 (got {row_span}x{column_span})")]
    ZeroSpan { row_span: usize, column_span: usize },

    /// A stretch factor was below one.
    #[error("stretch factor must be >= 1 (got {0})")]
    InvalidStretchFactor(u32),
}

/// Errors raised while creating or wiring widgets.
#[derive(Error, Debug)]
pub enum WidgetError {
    /// The widget's class was not registered with the toolkit.
    #[error("widget class '{0}' is not registered")]
    ClassNotRegistered(&'static str),

    /// The object registry rejected an operation.
    #[error("object error: {0}")]
    Object(#[from] ObjectError),

    /// The target widget is not part of the container.
    #[error("widget {0:?} not found")]
    WidgetNotFound(ObjectId),
}

/// Errors raised while loading toolkit configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration was not valid TOML for [`ToolkitConfig`](crate::config::ToolkitConfig).
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}
