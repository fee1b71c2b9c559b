//! Layer sheets for the demo: procedural stand-ins, or PNG files listed in a manifest.

use std::path::Path;

use anyhow::{Context, Result};
use stackworld_assets::{AssetManifest, ViewCacheStore};
use stackworld_common::Rgba;
use stackworld_raster::Image;

pub const CAR: &str = "car";
pub const CRATE: &str = "crate";

const CAR_LAYERS: u32 = 6;
const CRATE_LAYERS: u32 = 8;

/// Stack `layers` (bottom first) into one sheet, bottom layer lowest.
fn stack_sheet(layers: &[Image]) -> Image {
    let (w, h) = (layers[0].width(), layers[0].height());
    let mut sheet = Image::new(w, h * layers.len() as u32);
    for (i, layer) in layers.iter().enumerate() {
        let top = h * (layers.len() - 1 - i) as u32;
        sheet.draw_image(layer, 0, top as i32);
    }
    sheet
}

/// A 6x10 car facing up: wheels, body, windows, roof.
pub fn car_sheet() -> Image {
    let body = Rgba::rgb(196, 48, 52);
    let dark = Rgba::rgb(30, 30, 36);
    let glass = Rgba::rgb(120, 180, 220);
    let mut layers = Vec::new();
    for level in 0..CAR_LAYERS {
        let mut layer = Image::new(6, 10);
        for y in 0..10 {
            for x in 0..6 {
                let wheel = (x == 0 || x == 5) && matches!(y, 1 | 2 | 7 | 8);
                let color = match level {
                    0 | 1 if wheel => Some(dark),
                    0 | 1 | 2 if (1..5).contains(&x) => Some(body),
                    3 if (1..5).contains(&x) && (3..8).contains(&y) => {
                        Some(if y == 3 || y == 7 { glass } else { body })
                    }
                    4 | 5 if (1..5).contains(&x) && (4..7).contains(&y) => Some(body),
                    _ => None,
                };
                if let Some(c) = color {
                    layer.set(x, y, c);
                }
            }
        }
        layers.push(layer);
    }
    stack_sheet(&layers)
}

/// An 8x8 wooden crate with darker edges and a lid.
pub fn crate_sheet() -> Image {
    let plank = Rgba::rgb(176, 124, 70);
    let edge = Rgba::rgb(112, 72, 38);
    let mut layers = Vec::new();
    for level in 0..CRATE_LAYERS {
        let solid = level == 0 || level == CRATE_LAYERS - 1;
        let mut layer = Image::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                let border = x == 0 || y == 0 || x == 7 || y == 7;
                if border {
                    layer.set(x, y, edge);
                } else if solid {
                    layer.set(x, y, if (x + y) % 3 == 0 { edge } else { plank });
                }
            }
        }
        layers.push(layer);
    }
    stack_sheet(&layers)
}

/// Register the built-in car and crate caches.
pub fn register_builtin(store: &mut ViewCacheStore) -> Result<()> {
    store.register(CAR, &car_sheet(), CAR_LAYERS)?;
    store.register(CRATE, &crate_sheet(), CRATE_LAYERS)?;
    Ok(())
}

/// Decode every sheet listed in a manifest and register it.
pub fn register_manifest(store: &mut ViewCacheStore, manifest_path: &Path) -> Result<()> {
    let manifest = AssetManifest::load(manifest_path)
        .with_context(|| format!("loading manifest {}", manifest_path.display()))?;
    for (entry, path) in manifest.resolved(manifest_path) {
        let sheet = load_png(&path)?;
        store
            .register(entry.name.clone(), &sheet, entry.layers)
            .with_context(|| format!("building view cache for {}", entry.name))?;
        tracing::info!(name = %entry.name, path = %path.display(), "loaded layer sheet");
    }
    Ok(())
}

pub fn load_png(path: &Path) -> Result<Image> {
    let decoded = image::open(path)
        .with_context(|| format!("decoding {}", path.display()))?
        .to_rgba8();
    let (w, h) = decoded.dimensions();
    Image::from_rgba8(w, h, decoded.as_raw()).context("decoded image has unexpected size")
}

pub fn save_png(img: &Image, path: &Path) -> Result<()> {
    image::save_buffer(
        path,
        &img.to_rgba8(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("writing {}", path.display()))
}
