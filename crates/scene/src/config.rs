use std::path::Path;

use serde::{Deserialize, Serialize};
use stackworld_common::Rgba;

use crate::SceneError;

/// Scene configuration: canvas size, display upscale and initial camera setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Canvas width in canvas pixels.
    pub canvas_width: u32,
    /// Canvas height in canvas pixels.
    pub canvas_height: u32,
    /// Integer factor the canvas is blown up by for display.
    pub pixel_scale: u32,
    /// Color the canvas is cleared to every frame.
    pub background: Rgba,
    /// Camera closeness factor, in `[0, 1]`.
    pub closeness: f64,
    /// Camera zoom at startup.
    pub initial_zoom: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            canvas_width: 150,
            canvas_height: 100,
            pixel_scale: 4,
            background: Rgba::rgb(56, 56, 56),
            closeness: 0.2,
            initial_zoom: 3.0,
        }
    }
}

impl SceneConfig {
    /// Load a config from JSON. Missing fields take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(SceneError::InvalidConfig(format!(
                "canvas must be non-empty (got {}x{})",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.pixel_scale == 0 {
            return Err(SceneError::InvalidConfig(
                "pixel_scale must be at least 1".into(),
            ));
        }
        let display = self
            .canvas_width
            .checked_mul(self.pixel_scale)
            .zip(self.canvas_height.checked_mul(self.pixel_scale));
        // the upscaled frame is one allocation of RGBA pixels
        let fits = display.is_some_and(|(w, h)| {
            (w as usize)
                .checked_mul(h as usize)
                .and_then(|n| n.checked_mul(4))
                .is_some_and(|bytes| bytes <= isize::MAX as usize)
        });
        if !fits {
            return Err(SceneError::InvalidConfig(format!(
                "pixel_scale {} is too large for a {}x{} canvas",
                self.pixel_scale, self.canvas_width, self.canvas_height
            )));
        }
        Ok(())
    }

    /// Canvas size as `(width, height)`.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Size of the upscaled display image. Saturates for configs that
    /// would fail [`validate`](Self::validate).
    pub fn display_size(&self) -> (u32, u32) {
        (
            self.canvas_width.saturating_mul(self.pixel_scale),
            self.canvas_height.saturating_mul(self.pixel_scale),
        )
    }
}
