//! Core systems for Horizon Trellis.
//!
//! This crate provides the foundational pieces the widget and layout crates
//! build on:
//!
//! - **Object Model**: Parent-child ownership, naming, visibility
//! - **Signal/Slot System**: Type-safe change notification
//! - **Worker Pool**: The rayon pool used for parallel row layout
//! - **Logging**: `tracing` targets and performance spans
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_trellis_core::Signal;
//!
//! let layout_requested = Signal::<()>::new();
//! let conn_id = layout_requested.connect(|_| {
//!     println!("layout requested");
//! });
//!
//! layout_requested.emit(());
//! layout_requested.disconnect(conn_id);
//! ```
//!
//! # Object Tree Example
//!
//! ```
//! use horizon_trellis_core::SharedObjectRegistry;
//!
//! let registry = SharedObjectRegistry::new();
//! let container = registry.register("Container");
//! let child = registry.register("Spacer");
//! registry.set_parent(child, Some(container)).unwrap();
//! assert!(registry.is_child_of(child, container));
//! ```

mod error;
pub mod logging;
pub mod object;
pub mod signal;
pub mod threadpool;

pub use error::{Result, ThreadPoolError, TrellisError};
pub use logging::PerfSpan;
pub use object::{Object, ObjectError, ObjectId, ObjectRegistry, ObjectResult, SharedObjectRegistry};
pub use signal::{ConnectionId, Signal};
pub use threadpool::{ThreadPool, ThreadPoolConfig};
