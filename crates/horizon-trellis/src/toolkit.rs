//! Toolkit startup.
//!
//! [`Toolkit::init`] is the single startup step for the widget layer. It owns
//! the object registry every widget registers itself in, the set of widget
//! classes that may be instantiated, and the worker pool used by the grid
//! layout's parallel row pass. There is no process-wide state: widgets are
//! created against an explicit toolkit handle.

use std::collections::HashSet;
use std::sync::Arc;

use horizon_trellis_core::logging::targets;
use horizon_trellis_core::{Result, SharedObjectRegistry, ThreadPool, TrellisError};
use parking_lot::RwLock;

use crate::config::ToolkitConfig;
use crate::widget::layout::{GridLayout, LayoutContext};
use crate::widget::widgets::{Container, ImageView, Spacer};

/// The widget classes registered by [`Toolkit::init`].
pub const BUILTIN_CLASSES: [&str; 3] = [
    Container::CLASS_NAME,
    Spacer::CLASS_NAME,
    ImageView::CLASS_NAME,
];

/// Handle to an initialized widget toolkit.
pub struct Toolkit {
    config: ToolkitConfig,
    registry: Arc<SharedObjectRegistry>,
    classes: RwLock<HashSet<&'static str>>,
    pool: Option<Arc<ThreadPool>>,
}

impl Toolkit {
    /// Initialize the toolkit.
    ///
    /// Registers the built-in widget classes and, when parallel rows are
    /// enabled, builds the layout worker pool.
    pub fn init(config: ToolkitConfig) -> Result<Self> {
        let pool = if config.layout.parallel_rows {
            Some(Arc::new(ThreadPool::new(config.thread_pool.clone().into())?))
        } else {
            None
        };

        let toolkit = Self {
            config,
            registry: Arc::new(SharedObjectRegistry::new()),
            classes: RwLock::new(HashSet::new()),
            pool,
        };

        for class_name in BUILTIN_CLASSES {
            toolkit.register_class(class_name)?;
        }

        tracing::debug!(
            target: targets::TOOLKIT,
            default_dpi = toolkit.config.default_dpi,
            parallel_rows = toolkit.pool.is_some(),
            "toolkit initialized"
        );

        Ok(toolkit)
    }

    /// Register a widget class.
    ///
    /// Registering the same class twice is an error.
    pub fn register_class(&self, class_name: &'static str) -> Result<()> {
        if !self.classes.write().insert(class_name) {
            return Err(TrellisError::ClassAlreadyRegistered(class_name));
        }
        tracing::trace!(target: targets::TOOLKIT, class_name, "registered widget class");
        Ok(())
    }

    /// Check whether a widget class may be instantiated.
    pub fn is_class_registered(&self, class_name: &str) -> bool {
        self.classes.read().contains(class_name)
    }

    /// The configuration the toolkit was started with.
    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// The object registry shared by all widgets of this toolkit.
    pub fn registry(&self) -> &Arc<SharedObjectRegistry> {
        &self.registry
    }

    /// The layout worker pool, if parallel rows are enabled.
    pub fn thread_pool(&self) -> Option<&Arc<ThreadPool>> {
        self.pool.as_ref()
    }

    /// DPI for newly created widgets.
    pub fn default_dpi(&self) -> i32 {
        self.config.default_dpi
    }

    /// A layout context at `dpi` carrying the toolkit's worker pool.
    pub fn layout_context(&self, dpi: i32) -> LayoutContext {
        let ctx = LayoutContext::new(dpi);
        match &self.pool {
            Some(pool) => ctx.with_pool(pool.clone(), self.config.layout.parallel_row_threshold),
            None => ctx,
        }
    }

    /// A grid layout using the configured default margins and spacing.
    pub fn grid_layout(&self) -> GridLayout {
        let mut layout = GridLayout::new();
        layout.set_margins(self.config.layout.margins);
        layout.set_spacing(self.config.layout.spacing);
        layout
    }
}

impl std::fmt::Debug for Toolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolkit")
            .field("config", &self.config)
            .field("objects", &self.registry.object_count())
            .field("classes", &self.classes.read().len())
            .field("pool", &self.pool)
            .finish()
    }
}

static_assertions::assert_impl_all!(Toolkit: Send, Sync);
