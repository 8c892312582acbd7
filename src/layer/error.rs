//! Error types for the layer lifecycle.

use thiserror::Error;

/// Errors raised by layer configuration and initialization.
///
/// Per-tile rendering never returns these: data sparsity, transform
/// misses, and coercion failures all degrade to empty output. Only the
/// initialization path reports a hard failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayerError {
    /// The one hard failure: a layer without a feature source renders
    /// nothing, ever.
    #[error("no feature source provided; nothing will be rendered")]
    NoFeatureSource,

    /// Feature source rebinding is one-time; attempts after
    /// initialization are rejected and the existing source stays bound.
    #[error("cannot replace the feature source after initialization")]
    AlreadyInitialized,

    /// A selector names a style absent from the sheet. Collected at
    /// initialization, not rediscovered per tile.
    #[error("selector {selector} references unknown style '{style}'")]
    UnknownStyle { selector: usize, style: String },
}
