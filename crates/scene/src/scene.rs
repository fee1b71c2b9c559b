use stackworld_common::EntityId;
use stackworld_input::KeyInput;
use stackworld_raster::Image;
use stackworld_render::{Camera, DrawOutcome};

use crate::{Drawable, SceneConfig, SceneError, UpdateContext};

/// Per-frame drawing statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub tick: u64,
    /// World objects composited onto the canvas.
    pub drawn: usize,
    /// World objects skipped for lying outside the canvas.
    pub culled: usize,
    /// World objects too small to cover a pixel.
    pub empty: usize,
    /// Screen-space overlays composited after the world.
    pub overlays: usize,
}

impl FrameStats {
    fn record(&mut self, outcome: DrawOutcome) {
        match outcome {
            DrawOutcome::Drawn => self.drawn += 1,
            DrawOutcome::Culled => self.culled += 1,
            DrawOutcome::Empty => self.empty += 1,
        }
    }
}

/// The drawable collection plus the camera and canvas they render through.
///
/// Objects are kept in insertion order. Each frame runs [`tick`](Self::tick)
/// then [`render`](Self::render); [`present`](Self::present) produces the
/// upscaled image for display.
pub struct Scene {
    config: SceneConfig,
    camera: Camera,
    objects: Vec<(EntityId, Box<dyn Drawable>)>,
    canvas: Image,
    tick: u64,
}

impl Scene {
    /// Create an empty scene with the camera at the origin and the
    /// configured zoom and closeness.
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let mut camera = Camera::new();
        camera.reset_to(0.0, 0.0, 0.0, config.initial_zoom);
        camera.set_closeness(config.closeness)?;
        let canvas = Image::filled(config.canvas_width, config.canvas_height, config.background);
        Ok(Self {
            config,
            camera,
            objects: Vec::new(),
            canvas,
            tick: 0,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Number of ticks run so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Add a drawable at the end of the update and overlay order.
    pub fn add(&mut self, drawable: impl Drawable + 'static) -> EntityId {
        self.add_boxed(Box::new(drawable))
    }

    pub fn add_boxed(&mut self, drawable: Box<dyn Drawable>) -> EntityId {
        let id = EntityId::new();
        self.objects.push((id, drawable));
        tracing::debug!(id = %id.0, total = self.objects.len(), "added drawable");
        id
    }

    /// Remove a drawable, returning it if it was in the scene.
    pub fn remove(&mut self, id: EntityId) -> Option<Box<dyn Drawable>> {
        let index = self.objects.iter().position(|(oid, _)| *oid == id)?;
        let (_, drawable) = self.objects.remove(index);
        tracing::debug!(id = %id.0, total = self.objects.len(), "removed drawable");
        Some(drawable)
    }

    pub fn get(&self, id: EntityId) -> Option<&dyn Drawable> {
        self.objects
            .iter()
            .find(|(oid, _)| *oid == id)
            .map(|(_, d)| d.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut (dyn Drawable + 'static)> {
        self.objects
            .iter_mut()
            .find(|(oid, _)| *oid == id)
            .map(|(_, d)| d.as_mut())
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.objects.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Run every drawable's update hook, in insertion order.
    pub fn tick(&mut self, input: &dyn KeyInput) {
        self.tick += 1;
        let mut ctx = UpdateContext {
            camera: &mut self.camera,
            input,
            tick: self.tick,
        };
        for (_, drawable) in &mut self.objects {
            drawable.update(&mut ctx);
        }
    }

    /// World objects ordered back to front: ascending projected screen-Y,
    /// ties in insertion order. Overlays are left out.
    pub fn depth_order(&self) -> Vec<EntityId> {
        self.sorted_world_indices()
            .into_iter()
            .map(|i| self.objects[i].0)
            .collect()
    }

    fn sorted_world_indices(&self) -> Vec<usize> {
        let size = self.config.canvas_size();
        let mut world: Vec<(f64, usize)> = self
            .objects
            .iter()
            .enumerate()
            .filter_map(|(i, (_, d))| d.depth(&self.camera, size).map(|depth| (depth, i)))
            .collect();
        // stable sort keeps insertion order between equal depths
        world.sort_by(|a, b| a.0.total_cmp(&b.0));
        world.into_iter().map(|(_, i)| i).collect()
    }

    /// Clear the canvas and draw the world in depth order, then the overlays.
    ///
    /// A drawable that fails to render is skipped and the frame is still
    /// completed; the first such error is returned once it is.
    pub fn render(&mut self) -> Result<FrameStats, SceneError> {
        let _span = tracing::trace_span!("render_frame", tick = self.tick).entered();
        let mut stats = FrameStats {
            tick: self.tick,
            ..FrameStats::default()
        };
        let mut first_error = None;
        self.canvas.fill(self.config.background);

        for i in self.sorted_world_indices() {
            let (id, drawable) = &self.objects[i];
            match drawable.render(&mut self.canvas, &self.camera) {
                Ok(outcome) => stats.record(outcome),
                Err(err) => {
                    tracing::warn!(id = %id.0, %err, "drawable failed to render");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        let size = self.config.canvas_size();
        for (id, drawable) in &self.objects {
            if drawable.depth(&self.camera, size).is_some() {
                continue;
            }
            match drawable.render(&mut self.canvas, &self.camera) {
                Ok(DrawOutcome::Drawn) => stats.overlays += 1,
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(id = %id.0, %err, "overlay failed to render");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        tracing::trace!(
            drawn = stats.drawn,
            culled = stats.culled,
            empty = stats.empty,
            overlays = stats.overlays,
            "frame composited"
        );
        match first_error {
            Some(err) => Err(err),
            None => Ok(stats),
        }
    }

    /// Advance one tick and draw the resulting frame.
    pub fn step(&mut self, input: &dyn KeyInput) -> Result<FrameStats, SceneError> {
        self.tick(input);
        self.render()
    }

    /// The low-resolution canvas as last rendered.
    pub fn canvas(&self) -> &Image {
        &self.canvas
    }

    /// The canvas blown up by the configured pixel scale, nearest-neighbor.
    pub fn present(&self) -> Image {
        self.canvas.upscaled(self.config.pixel_scale)
    }

    pub fn summary(&self) -> SceneSummary {
        let size = self.config.canvas_size();
        let world_objects = self
            .objects
            .iter()
            .filter(|(_, d)| d.depth(&self.camera, size).is_some())
            .count();
        SceneSummary {
            tick: self.tick,
            world_objects,
            overlays: self.objects.len() - world_objects,
            camera: self.camera,
        }
    }
}

/// Summary of scene state for logging and the CLI.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub tick: u64,
    pub world_objects: usize,
    pub overlays: usize,
    pub camera: Camera,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: tick={} world_objects={} overlays={} camera=({:.2}, {:.2}) rot={:.1} zoom={:.2}",
            self.tick,
            self.world_objects,
            self.overlays,
            self.camera.x(),
            self.camera.y(),
            self.camera.rotation(),
            self.camera.zoom()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::DVec2;
    use stackworld_assets::{AssetError, ViewCacheStore};
    use stackworld_common::Rgba;
    use stackworld_input::{Key, KeyState, NoInput};
    use stackworld_render::{ScreenSprite, StackedSprite};

    use super::*;

    const RED: Rgba = Rgba::rgb(220, 30, 30);
    const BLUE: Rgba = Rgba::rgb(30, 30, 220);

    /// Camera at the origin, zoom 1, snapping closeness, 150x100 canvas.
    fn scene() -> Scene {
        Scene::new(SceneConfig {
            closeness: 1.0,
            initial_zoom: 1.0,
            ..SceneConfig::default()
        })
        .unwrap()
    }

    fn store() -> ViewCacheStore {
        let mut store = ViewCacheStore::new();
        store.register("red", &Image::filled(4, 4, RED), 1).unwrap();
        store.register("blue", &Image::filled(4, 4, BLUE), 1).unwrap();
        store
    }

    /// Drawable with a fixed depth that records when it is updated and drawn.
    struct Probe {
        name: &'static str,
        depth: Option<f64>,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Probe {
        fn new(name: &'static str, depth: Option<f64>, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                name,
                depth,
                log: Rc::clone(log),
            }
        }
    }

    impl Drawable for Probe {
        fn update(&mut self, ctx: &mut UpdateContext<'_>) {
            self.log
                .borrow_mut()
                .push(format!("update {} {}", self.name, ctx.tick));
        }

        fn render(&self, _canvas: &mut Image, _camera: &Camera) -> Result<DrawOutcome, SceneError> {
            self.log.borrow_mut().push(format!("draw {}", self.name));
            Ok(DrawOutcome::Drawn)
        }

        fn depth(&self, _camera: &Camera, _canvas: (u32, u32)) -> Option<f64> {
            self.depth
        }

        fn position(&self) -> DVec2 {
            DVec2::ZERO
        }
    }

    /// Moves itself right while space is held and drags the camera along.
    struct Follower {
        sprite: StackedSprite,
    }

    impl Drawable for Follower {
        fn update(&mut self, ctx: &mut UpdateContext<'_>) {
            if ctx.input.is_key_down(Key::Space) {
                let p = self.sprite.position();
                self.sprite.set_position(p.x + 10.0, p.y);
            }
            let p = self.sprite.position();
            ctx.camera.target_location(p.x, p.y);
        }

        fn render(&self, canvas: &mut Image, camera: &Camera) -> Result<DrawOutcome, SceneError> {
            self.sprite.render(canvas, camera)
        }

        fn depth(&self, camera: &Camera, canvas: (u32, u32)) -> Option<f64> {
            self.sprite.depth(camera, canvas)
        }

        fn position(&self) -> DVec2 {
            self.sprite.position()
        }
    }

    #[test]
    fn invalid_closeness_fails_construction() {
        let result = Scene::new(SceneConfig {
            closeness: 1.5,
            ..SceneConfig::default()
        });
        assert!(matches!(result, Err(SceneError::Camera(_))));
    }

    #[test]
    fn camera_starts_from_config() {
        let scene = Scene::new(SceneConfig::default()).unwrap();
        assert_eq!(scene.camera().zoom(), 3.0);
        assert_eq!(scene.camera().closeness(), 0.2);
        assert_eq!(scene.camera().position(), DVec2::ZERO);
    }

    #[test]
    fn add_remove_and_lookup() {
        let store = store();
        let mut scene = scene();
        let a = scene.add(StackedSprite::new(&store, "red").unwrap().at(3.0, 4.0));
        let b = scene.add(StackedSprite::new(&store, "blue").unwrap());
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(a).unwrap().position(), DVec2::new(3.0, 4.0));
        assert!(scene.remove(a).is_some());
        assert!(scene.remove(a).is_none());
        assert!(scene.get(a).is_none());
        assert_eq!(scene.ids().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn depth_order_is_ascending_screen_y() {
        let store = store();
        let mut scene = scene();
        // canvas center is y=50, so these project to 10, 5 and 20
        let at10 = scene.add(StackedSprite::new(&store, "red").unwrap().at(0.0, -40.0));
        let at5 = scene.add(StackedSprite::new(&store, "red").unwrap().at(0.0, -45.0));
        let at20 = scene.add(StackedSprite::new(&store, "red").unwrap().at(0.0, -30.0));
        assert_eq!(scene.depth_order(), vec![at5, at10, at20]);
    }

    #[test]
    fn depth_ties_keep_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = scene();
        let first = scene.add(Probe::new("first", Some(7.0), &log));
        let second = scene.add(Probe::new("second", Some(7.0), &log));
        let back = scene.add(Probe::new("back", Some(1.0), &log));
        assert_eq!(scene.depth_order(), vec![back, first, second]);
    }

    #[test]
    fn depth_follows_camera_rotation() {
        let store = store();
        let mut scene = scene();
        let right = scene.add(StackedSprite::new(&store, "red").unwrap().at(20.0, 0.0));
        let below = scene.add(StackedSprite::new(&store, "red").unwrap().at(0.0, 20.0));
        assert_eq!(scene.depth_order(), vec![right, below]);
        // turning the camera around flips which object is nearer
        scene.camera_mut().reset_to(0.0, 0.0, 180.0, 1.0);
        assert_eq!(scene.depth_order(), vec![below, right]);
    }

    #[test]
    fn updates_run_in_insertion_order_before_drawing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = scene();
        scene.add(Probe::new("overlay", None, &log));
        scene.add(Probe::new("near", Some(30.0), &log));
        scene.add(Probe::new("far", Some(10.0), &log));
        let stats = scene.step(&NoInput).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                "update overlay 1",
                "update near 1",
                "update far 1",
                "draw far",
                "draw near",
                "draw overlay",
            ]
        );
        assert_eq!(stats.drawn, 2);
        assert_eq!(stats.overlays, 1);
        assert_eq!(stats.tick, 1);
    }

    #[test]
    fn lower_object_is_painted_over_higher_one() {
        let store = store();
        let mut scene = scene();
        // both overlap around the canvas center; blue sits one pixel lower on screen
        scene.add(StackedSprite::new(&store, "blue").unwrap().at(0.0, 1.0));
        scene.add(StackedSprite::new(&store, "red").unwrap());
        scene.render().unwrap();
        // red covers rows 48..52, blue covers 49..53 and wins the overlap
        assert_eq!(scene.canvas().get(75, 48), Some(RED));
        assert_eq!(scene.canvas().get(75, 50), Some(BLUE));
        assert_eq!(scene.canvas().get(75, 52), Some(BLUE));
    }

    #[test]
    fn canvas_is_cleared_each_frame() {
        let store = store();
        let mut scene = scene();
        let id = scene.add(StackedSprite::new(&store, "red").unwrap());
        scene.render().unwrap();
        assert_eq!(scene.canvas().get(75, 50), Some(RED));
        scene.remove(id);
        scene.render().unwrap();
        assert_eq!(scene.canvas().get(75, 50), Some(SceneConfig::default().background));
    }

    #[test]
    fn offscreen_objects_are_counted_as_culled() {
        let store = store();
        let mut scene = scene();
        scene.add(StackedSprite::new(&store, "red").unwrap());
        scene.add(StackedSprite::new(&store, "red").unwrap().at(500.0, 0.0));
        let stats = scene.render().unwrap();
        assert_eq!((stats.drawn, stats.culled), (1, 1));
    }

    #[test]
    fn overlays_draw_over_world() {
        let store = store();
        let mut scene = scene();
        scene.add(ScreenSprite::new(Image::filled(4, 4, BLUE), 75.0, 50.0));
        scene.add(StackedSprite::new(&store, "red").unwrap());
        let stats = scene.render().unwrap();
        assert_eq!((stats.drawn, stats.overlays), (1, 1));
        assert_eq!(scene.canvas().get(75, 50), Some(BLUE));
    }

    #[test]
    fn logic_moves_objects_and_camera() {
        let store = store();
        let mut scene = scene();
        let id = scene.add(Follower {
            sprite: StackedSprite::new(&store, "red").unwrap(),
        });
        let mut keys = KeyState::new();
        keys.press(Key::Space);
        scene.step(&keys).unwrap();
        scene.step(&keys).unwrap();
        assert_eq!(scene.get(id).unwrap().position(), DVec2::new(20.0, 0.0));
        assert_eq!(scene.camera().position(), DVec2::new(20.0, 0.0));
        // the followed object stays centered
        assert_eq!(scene.canvas().get(75, 50), Some(RED));
        assert_eq!(scene.tick_count(), 2);
    }

    #[test]
    fn present_upscales_canvas() {
        let store = store();
        let mut scene = scene();
        scene.add(StackedSprite::new(&store, "red").unwrap());
        scene.render().unwrap();
        let display = scene.present();
        assert_eq!((display.width(), display.height()), (600, 400));
        assert_eq!(display.get(75 * 4 + 3, 50 * 4 + 3), Some(RED));
        assert_eq!(display.get(0, 0), Some(SceneConfig::default().background));
    }

    #[test]
    fn zoom_past_cache_scale_surfaces_as_error() {
        let store = store();
        let mut scene = scene();
        scene.add(StackedSprite::new(&store, "red").unwrap());
        scene.camera_mut().set_zoom(100.0);
        assert!(matches!(scene.render(), Err(SceneError::Asset(_))));
    }

    /// World object whose render always fails.
    struct Broken;

    impl Drawable for Broken {
        fn render(&self, _canvas: &mut Image, _camera: &Camera) -> Result<DrawOutcome, SceneError> {
            Err(AssetError::NotFound("broken".into()).into())
        }

        fn depth(&self, _camera: &Camera, _canvas: (u32, u32)) -> Option<f64> {
            Some(0.0)
        }

        fn position(&self) -> DVec2 {
            DVec2::ZERO
        }
    }

    #[test]
    fn failing_drawable_does_not_tear_the_frame() {
        let store = store();
        let mut scene = scene();
        // drawn first (depth 0), before the sprite and the overlay
        scene.add(Broken);
        scene.add(StackedSprite::new(&store, "red").unwrap());
        scene.add(ScreenSprite::new(Image::filled(2, 2, BLUE), 10.0, 10.0));
        assert!(matches!(
            scene.render(),
            Err(SceneError::Asset(AssetError::NotFound(_)))
        ));
        assert_eq!(scene.canvas().get(75, 50), Some(RED));
        assert_eq!(scene.canvas().get(10, 10), Some(BLUE));
    }

    #[test]
    fn unsupported_zoom_still_clears_and_draws_overlays() {
        let store = store();
        let mut scene = scene();
        scene.add(StackedSprite::new(&store, "red").unwrap());
        scene.add(ScreenSprite::new(Image::filled(2, 2, BLUE), 10.0, 10.0));
        scene.render().unwrap();
        scene.camera_mut().set_zoom(100.0);
        assert!(scene.render().is_err());
        // the previous frame's sprite is gone, not half-overwritten
        let background = SceneConfig::default().background;
        assert_eq!(scene.canvas().get(75, 50), Some(background));
        assert_eq!(scene.canvas().get(10, 10), Some(BLUE));
    }

    #[test]
    fn summary_counts_kinds() {
        let store = store();
        let mut scene = scene();
        scene.add(StackedSprite::new(&store, "red").unwrap());
        scene.add(ScreenSprite::new(Image::new(1, 1), 0.0, 0.0));
        let summary = scene.summary();
        assert_eq!((summary.world_objects, summary.overlays), (1, 1));
        assert!(summary.to_string().contains("world_objects=1"));
    }
}
