//! Scene: owns the drawables, advances them each tick, composites each frame.
//!
//! # Invariants
//! - Updates run in insertion order, strictly before the frame is drawn.
//! - World objects draw in ascending projected screen-Y (painter's order);
//!   ties keep insertion order so the frame is stable.
//! - Screen-space overlays draw after all world objects, in insertion order.

mod config;
mod drawable;
mod scene;

pub use config::SceneConfig;
pub use drawable::{Drawable, UpdateContext};
pub use scene::{FrameStats, Scene, SceneSummary};

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("asset error: {0}")]
    Asset(#[from] stackworld_assets::AssetError),
    #[error("camera error: {0}")]
    Camera(#[from] stackworld_render::CameraError),
    #[error("invalid scene config: {0}")]
    InvalidConfig(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
