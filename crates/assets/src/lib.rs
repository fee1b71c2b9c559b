//! Asset side of the renderer: prebuilt view caches and the registry that names them.
//!
//! A layer sheet is turned into a [`ViewCache`] once, at load time. Sprites
//! then look their cache up by name and only ever read from it.
//!
//! # Invariants
//! - A `ViewCache` is fully built before anyone can query it, and never changes afterward.
//! - Caches are shared through `Arc`; one per distinct asset name.

mod manifest;
mod store;
mod view;

pub use manifest::{AssetManifest, ManifestEntry};
pub use store::ViewCacheStore;
pub use view::{ANGLE_BUCKETS, CACHE_SCALE, CachedView, ViewCache};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("sprite stack must consist of at least 1 layer (got {0})")]
    InvalidLayerCount(u32),
    #[error("layer sheet of {width}x{height} cannot hold {layers} layers")]
    SheetTooSmall { width: u32, height: u32, layers: u32 },
    #[error(
        "cannot scale stacked sprite larger than cached image scale (got {requested}, max in cache {max})"
    )]
    UnsupportedScale { requested: f64, max: f64 },
}
