//! Error Types
//!
//! Most layer operations are lenient: a missing object yields `None` and a
//! controls-dependent call without controls is a no-op. The strict `try_*`
//! entry points on [`SceneLayer`](crate::SceneLayer) report the same misses
//! through [`OrreryError`] instead.
//!
//! ```rust,ignore
//! use orrery::errors::{OrreryError, Result};
//!
//! fn moon(layer: &orrery::SceneLayer<orrery::HeadlessBackend>) -> Result<()> {
//!     let handle = layer.try_get("solar/earth/moon")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the scene layer.
#[derive(Error, Debug)]
pub enum OrreryError {
    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// No node is registered (or named) under the given key.
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    // ========================================================================
    // Viewport Errors
    // ========================================================================
    /// A viewport dimension that is negative or not finite.
    #[error("Invalid viewport size: {width}x{height}")]
    InvalidSize {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// JSON parse error (settings, camera parameters, controls options).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, OrreryError>`.
pub type Result<T> = std::result::Result<T, OrreryError>;
