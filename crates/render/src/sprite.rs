use std::sync::Arc;

use glam::DVec2;
use stackworld_assets::{AssetError, ViewCache, ViewCacheStore};
use stackworld_common::normalize_angle;
use stackworld_raster::Image;

use crate::projection::{ScreenRect, project};
use crate::Camera;

/// What happened when a sprite was asked to draw itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Pixels were composited onto the canvas.
    Drawn,
    /// The sprite lies entirely outside the canvas.
    Culled,
    /// The sprite is too small at the current zoom to cover a pixel.
    Empty,
}

/// A world-space object drawn from a shared [`ViewCache`].
///
/// Its world position is the ground point of the stack: the center of the
/// bottom layer lands on the projected screen position.
#[derive(Debug, Clone)]
pub struct StackedSprite {
    asset: String,
    view: Arc<ViewCache>,
    position: DVec2,
    rotation: f64,
}

impl StackedSprite {
    /// Bind a new sprite at the world origin to the cache named `asset`.
    pub fn new(store: &ViewCacheStore, asset: &str) -> Result<Self, AssetError> {
        let view = store.get(asset)?;
        Ok(Self::with_view(asset, view))
    }

    /// Bind a new sprite to an already resolved cache.
    pub fn with_view(asset: impl Into<String>, view: Arc<ViewCache>) -> Self {
        Self {
            asset: asset.into(),
            view,
            position: DVec2::ZERO,
            rotation: 0.0,
        }
    }

    /// Builder-style world placement.
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.set_position(x, y);
        self
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn view(&self) -> &Arc<ViewCache> {
        &self.view
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = DVec2::new(x, y);
    }

    /// Rotation in degrees, within `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_angle(degrees);
    }

    /// Where the sprite's ground point lands on the canvas.
    pub fn screen_position(&self, camera: &Camera, canvas: (u32, u32)) -> DVec2 {
        project(self.position, camera, canvas)
    }

    /// Rotation of the sprite as seen through the camera.
    pub fn image_rotation(&self, camera: &Camera) -> f64 {
        self.rotation - camera.rotation()
    }

    /// Screen rectangle the transformed image would cover, computed without
    /// building the image.
    pub fn screen_bounds(&self, camera: &Camera, canvas: (u32, u32)) -> ScreenRect {
        let rotation = self.image_rotation(camera);
        let zoom = camera.zoom();
        ScreenRect::anchored(
            self.screen_position(camera, canvas),
            (
                self.view.center_x(rotation, zoom),
                self.view.center_y(rotation, zoom),
            ),
            self.view.transformed_width(rotation, zoom),
            self.view.transformed_height(rotation, zoom),
        )
    }

    /// Composite the sprite onto `canvas` as seen through `camera`.
    ///
    /// Offscreen sprites are rejected before any image is scaled. Fails only
    /// when the camera zoom exceeds the cache scale.
    pub fn draw(&self, canvas: &mut Image, camera: &Camera) -> Result<DrawOutcome, AssetError> {
        let size = (canvas.width(), canvas.height());
        let bounds = self.screen_bounds(camera, size);
        if bounds.is_offscreen(size) {
            tracing::trace!(asset = %self.asset, ?bounds, "culled offscreen sprite");
            return Ok(DrawOutcome::Culled);
        }
        let image = self
            .view
            .transformed_image(self.image_rotation(camera), camera.zoom())?;
        match image {
            Some(image) => {
                let (left, top) = bounds.origin();
                canvas.draw_image(&image, left, top);
                Ok(DrawOutcome::Drawn)
            }
            None => Ok(DrawOutcome::Empty),
        }
    }
}

/// A fixed screen-space image, such as a HUD element.
///
/// Drawn centered on its screen position and unaffected by the camera.
#[derive(Debug, Clone)]
pub struct ScreenSprite {
    image: Image,
    position: DVec2,
}

impl ScreenSprite {
    pub fn new(image: Image, x: f64, y: f64) -> Self {
        Self {
            image,
            position: DVec2::new(x, y),
        }
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn set_image(&mut self, image: Image) {
        self.image = image;
    }

    /// Screen position of the image center.
    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = DVec2::new(x, y);
    }

    pub fn draw(&self, canvas: &mut Image) -> DrawOutcome {
        if self.image.is_empty() {
            return DrawOutcome::Empty;
        }
        let (width, height) = (self.image.width() as i32, self.image.height() as i32);
        let bounds = ScreenRect::anchored(self.position, (width / 2, height / 2), width, height);
        if bounds.is_offscreen((canvas.width(), canvas.height())) {
            return DrawOutcome::Culled;
        }
        let (left, top) = bounds.origin();
        canvas.draw_image(&self.image, left, top);
        DrawOutcome::Drawn
    }
}
