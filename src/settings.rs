//! Layer Settings
//!
//! Construction-time configuration for a [`SceneLayer`](crate::SceneLayer).
//!
//! ```rust,ignore
//! use orrery::{LayerSettings, LayerProfile};
//!
//! // Default: direct-object profile, alpha + antialias on
//! let settings = LayerSettings::default();
//!
//! // Path registry lookups, attach to an existing canvas
//! let settings = LayerSettings {
//!     profile: LayerProfile::Addressed,
//!     canvas: true,
//!     ..Default::default()
//! };
//!
//! // Or from JSON
//! let settings = LayerSettings::from_json(r#"{ "profile": "addressed", "pixel_ratio": 2.0 }"#)?;
//! ```

use serde::Deserialize;

// ---------------------------------------------------------------------------
// LayerProfile
// ---------------------------------------------------------------------------

/// Selects how names are resolved and which toggle flavour a host uses.
///
/// | Capability                         | `Direct`          | `Addressed`         |
/// |------------------------------------|-------------------|---------------------|
/// | `object("x")` / `toggle_object`    | tree search by name | registry full path |
/// | `toggle_object` renders            | yes               | yes                 |
/// | `switch` renders                   | n/a               | no                  |
///
/// Registry operations (`add_path`, `group`, `get`) work under both
/// profiles; only name resolution differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerProfile {
    /// Direct object handling: names are searched in the scene tree.
    #[default]
    Direct,
    /// Declarative named paths: names are full registry keys.
    Addressed,
}

// ---------------------------------------------------------------------------
// MissingPolicy
// ---------------------------------------------------------------------------

/// What the lenient API does when a reference cannot be resolved.
///
/// Either way the call returns `None` or does nothing; the `try_*` methods
/// are the strict alternative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Say nothing.
    #[default]
    Silent,
    /// Emit a `log::warn!` for every miss.
    Warn,
}

// ---------------------------------------------------------------------------
// ContextOptions
// ---------------------------------------------------------------------------

/// Drawing-context options forwarded to the backend once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContextOptions {
    /// Transparent clear color.
    pub alpha: bool,
    pub antialias: bool,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            alpha: true,
            antialias: true,
        }
    }
}

// ---------------------------------------------------------------------------
// LayerSettings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayerSettings {
    #[serde(flatten)]
    pub context: ContextOptions,

    /// The backend draws into a pre-existing canvas; adopt its layout size
    /// right after construction.
    pub canvas: bool,

    /// Initial pixel ratio. `None` queries the backend's device pixel ratio.
    pub pixel_ratio: Option<f32>,

    pub profile: LayerProfile,

    pub missing: MissingPolicy,

    /// Initial local clipping flag.
    pub clipping: bool,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            context: ContextOptions::default(),
            canvas: false,
            pixel_ratio: None,
            profile: LayerProfile::Direct,
            missing: MissingPolicy::Silent,
            clipping: false,
        }
    }
}

impl LayerSettings {
    /// Settings for the declarative named-path profile.
    #[must_use]
    pub fn addressed() -> Self {
        Self {
            profile: LayerProfile::Addressed,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> crate::errors::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
