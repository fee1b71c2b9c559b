use std::hint::black_box;
use std::time::Instant;

use stackworld_assets::{ViewCache, ViewCacheStore};
use stackworld_common::Rgba;
use stackworld_input::NoInput;
use stackworld_raster::Image;
use stackworld_render::StackedSprite;
use stackworld_scene::{Scene, SceneConfig};

fn make_sheet(size: u32, layers: u32) -> Image {
    let mut sheet = Image::new(size, size * layers);
    for y in 0..sheet.height() {
        for x in 0..size {
            let shade = (40 + (y / size) * 10).min(255) as u8;
            sheet.set(x, y, Rgba::rgb(shade, 90, 200 - shade / 2));
        }
    }
    sheet
}

fn bench_cache_build(size: u32, layers: u32) {
    let sheet = make_sheet(size, layers);
    let start = Instant::now();
    let cache = ViewCache::build(black_box(&sheet), layers).unwrap();
    let elapsed = start.elapsed();
    black_box(cache);
    println!("  cache build ({size}x{size}, {layers} layers): {elapsed:?}");
}

fn make_scene(count: usize, spacing: f64) -> Scene {
    let mut store = ViewCacheStore::new();
    store.register("crate", &make_sheet(8, 8), 8).unwrap();
    let mut scene = Scene::new(SceneConfig::default()).unwrap();
    let side = (count as f64).sqrt().ceil() as usize;
    for i in 0..count {
        let x = (i % side) as f64 * spacing - side as f64 * spacing / 2.0;
        let y = (i / side) as f64 * spacing - side as f64 * spacing / 2.0;
        scene.add(StackedSprite::new(&store, "crate").unwrap().at(x, y));
    }
    scene
}

fn bench_frames(count: usize, iterations: usize) {
    let mut scene = make_scene(count, 12.0);
    let start = Instant::now();
    let mut drawn = 0;
    for i in 0..iterations {
        scene.camera_mut().target_rotation(i as f64 * 3.0);
        let stats = scene.step(black_box(&NoInput)).unwrap();
        drawn += stats.drawn;
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  frame ({count} sprites, {iterations} iters): {per_iter:?}/iter, {} drawn/frame",
        drawn / iterations
    );
}

fn bench_present(iterations: usize) {
    let scene = make_scene(100, 12.0);
    let start = Instant::now();
    for _ in 0..iterations {
        black_box(scene.present());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  present ({iterations} iters): {per_iter:?}/iter");
}

fn main() {
    println!("stackworld frame benchmarks");
    bench_cache_build(8, 8);
    bench_cache_build(16, 16);
    bench_frames(100, 100);
    bench_frames(1000, 20);
    bench_present(100);
}
