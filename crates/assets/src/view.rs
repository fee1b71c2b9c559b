use std::time::Instant;

use stackworld_common::normalize_angle;
use stackworld_raster::Image;

use crate::AssetError;

/// Scale factor the cached images are rendered at.
///
/// Runtime zoom may not exceed this; anything smaller is a plain downscale.
pub const CACHE_SCALE: f64 = 8.0;

/// Number of evenly spaced rotation angles kept in each cache.
pub const ANGLE_BUCKETS: usize = 140;

/// One pre-rendered angle of a sprite stack.
#[derive(Debug, Clone)]
pub struct CachedView {
    /// All layers composited at [`CACHE_SCALE`].
    pub image: Image,
    /// Horizontal center of the stack, in cache pixels.
    pub center_x: u32,
    /// Vertical center of the bottom layer, in cache pixels.
    pub center_y: u32,
}

/// Pre-rendered images of a sprite stack at [`ANGLE_BUCKETS`] rotations.
///
/// Building is the expensive part: every layer is scaled and rotated once
/// per bucket. Queries afterward only pick a bucket and downscale it, so
/// create one cache per layer sheet and share it between sprites.
#[derive(Debug, Clone)]
pub struct ViewCache {
    layer_width: u32,
    layer_height: u32,
    layer_count: u32,
    views: Vec<CachedView>,
}

impl ViewCache {
    /// Build the cache from a sheet of `layer_count` equal-height bands.
    /// Bands run top layer first; the bottom layer is the lowest band.
    pub fn build(sheet: &Image, layer_count: u32) -> Result<Self, AssetError> {
        if layer_count == 0 {
            return Err(AssetError::InvalidLayerCount(layer_count));
        }
        if sheet.width() == 0 || sheet.height() < layer_count {
            return Err(AssetError::SheetTooSmall {
                width: sheet.width(),
                height: sheet.height(),
                layers: layer_count,
            });
        }

        let start = Instant::now();
        let layer_width = sheet.width();
        let layer_height = sheet.height() / layer_count;
        let layers = slice_layers(sheet, layer_count, layer_height);

        let views = (0..ANGLE_BUCKETS)
            .map(|i| {
                let degrees = i as f64 * 360.0 / ANGLE_BUCKETS as f64;
                render_view(&layers, layer_width, layer_height, degrees)
            })
            .collect();

        tracing::debug!(
            layer_width,
            layer_height,
            layer_count,
            buckets = ANGLE_BUCKETS,
            elapsed = ?start.elapsed(),
            "built view cache"
        );

        Ok(Self {
            layer_width,
            layer_height,
            layer_count,
            views,
        })
    }

    /// Width of one untransformed layer, in sheet pixels.
    pub fn layer_width(&self) -> u32 {
        self.layer_width
    }

    /// Height of one untransformed layer, in sheet pixels.
    pub fn layer_height(&self) -> u32 {
        self.layer_height
    }

    pub fn layer_count(&self) -> u32 {
        self.layer_count
    }

    /// Bucket holding the view closest below `rotation` degrees.
    pub fn cache_index(rotation: f64) -> usize {
        let index = (normalize_angle(rotation) / 360.0 * ANGLE_BUCKETS as f64) as usize;
        // values a hair under 360 can round the product up to ANGLE_BUCKETS
        index.min(ANGLE_BUCKETS - 1)
    }

    /// The cached view for a bucket index, if it exists.
    pub fn cached_view(&self, index: usize) -> Option<&CachedView> {
        self.views.get(index)
    }

    fn view(&self, rotation: f64) -> &CachedView {
        &self.views[Self::cache_index(rotation)]
    }

    /// The stack rotated by `rotation` degrees and scaled by `scale`.
    ///
    /// Returns `Ok(None)` when the scaled image would have no pixels, and
    /// [`AssetError::UnsupportedScale`] when `scale` exceeds [`CACHE_SCALE`].
    pub fn transformed_image(&self, rotation: f64, scale: f64) -> Result<Option<Image>, AssetError> {
        if scale > CACHE_SCALE {
            return Err(AssetError::UnsupportedScale {
                requested: scale,
                max: CACHE_SCALE,
            });
        }
        let cached = &self.view(rotation).image;
        let width = scale_dimension(cached.width(), scale);
        let height = scale_dimension(cached.height(), scale);
        if width <= 0 || height <= 0 {
            return Ok(None);
        }
        let (width, height) = (width as u32, height as u32);
        if width == cached.width() && height == cached.height() {
            return Ok(Some(cached.clone()));
        }
        Ok(Some(cached.scaled(width, height)))
    }

    /// Width of [`transformed_image`](Self::transformed_image) for the same
    /// arguments, without building the image.
    pub fn transformed_width(&self, rotation: f64, scale: f64) -> i32 {
        scale_dimension(self.view(rotation).image.width(), scale)
    }

    /// Height of [`transformed_image`](Self::transformed_image) for the same
    /// arguments, without building the image.
    pub fn transformed_height(&self, rotation: f64, scale: f64) -> i32 {
        scale_dimension(self.view(rotation).image.height(), scale)
    }

    /// Horizontal offset of the stack's center within the transformed image.
    pub fn center_x(&self, rotation: f64, scale: f64) -> i32 {
        scale_dimension(self.view(rotation).center_x, scale)
    }

    /// Vertical offset of the bottom layer's center within the transformed image.
    ///
    /// This is the stack's ground point; sprites anchor their world position here.
    pub fn center_y(&self, rotation: f64, scale: f64) -> i32 {
        scale_dimension(self.view(rotation).center_y, scale)
    }
}

/// `floor(cached / CACHE_SCALE * scale)`, saturating at the `i32` range.
fn scale_dimension(cached: u32, scale: f64) -> i32 {
    // float to int casts saturate and map NaN to 0
    (cached as f64 / CACHE_SCALE * scale).floor() as i32
}

/// Cut the sheet into layers, index 0 being the bottom band.
fn slice_layers(sheet: &Image, layer_count: u32, layer_height: u32) -> Vec<Image> {
    (0..layer_count)
        .map(|i| {
            let top = layer_height * (layer_count - 1 - i);
            sheet.crop(0, top as i32, sheet.width(), layer_height)
        })
        .collect()
}

fn render_view(layers: &[Image], layer_width: u32, layer_height: u32, degrees: f64) -> CachedView {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let width = (layer_width as f64 * CACHE_SCALE) as u32;
    let height = (layer_height as f64 * CACHE_SCALE) as u32;
    let rot_width = ((width as f64 * cos).abs() + (height as f64 * sin).abs()) as u32;
    let rot_height = ((width as f64 * sin).abs() + (height as f64 * cos).abs()) as u32;
    let stack_offset = (CACHE_SCALE * (layers.len() - 1) as f64) as u32;

    let mut image = Image::new(rot_width, rot_height + stack_offset);
    let footprint_x = (rot_width as i32 - width as i32) / 2;
    let footprint_y = (rot_height as i32 - height as i32) / 2;
    for (k, layer) in layers.iter().enumerate() {
        let scaled = layer.scaled(width, height);
        let mut footprint = Image::new(rot_width, rot_height);
        footprint.draw_image(&scaled, footprint_x, footprint_y);
        let rotated = footprint.rotated(degrees);
        let layers_above = layers.len() - 1 - k;
        image.draw_image(&rotated, 0, (CACHE_SCALE * layers_above as f64) as i32);
    }

    let center_x = rot_width / 2;
    let center_y = image.height() - rot_height / 2;
    CachedView {
        image,
        center_x,
        center_y,
    }
}
