//! Demo world: a drivable car among scattered crates.

use glam::DVec2;
use stackworld_assets::{CACHE_SCALE, ViewCacheStore};
use stackworld_common::EntityId;
use stackworld_input::{Key, KeyInput};
use stackworld_raster::Image;
use stackworld_render::{Camera, DrawOutcome, StackedSprite};
use stackworld_scene::{Drawable, Scene, SceneError, UpdateContext};

use crate::sheets::{CAR, CRATE};

const ACCEL: f64 = 0.2;
const FRIC_ACCEL: f64 = 0.08;
const MAX_SPEED: f64 = 5.0;

const ROT_ACCEL: f64 = 0.2;
const ROT_FRIC_ACCEL: f64 = 0.1;
const MAX_ROT_SPEED: f64 = 3.0;

const ZOOM_STEP: f64 = 1.01;

/// Half the side of the square crates are scattered over.
const SCATTER: u64 = 500;

/// Player-driven car. Steers with left/right, accelerates with space, and
/// drags the camera along behind it.
pub struct Player {
    sprite: StackedSprite,
    speed: f64,
    rot_speed: f64,
}

impl Player {
    pub fn new(store: &ViewCacheStore) -> Result<Self, SceneError> {
        Ok(Self {
            sprite: StackedSprite::new(store, CAR)?,
            speed: 0.0,
            rot_speed: 0.0,
        })
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    fn steer(&mut self, input: &dyn KeyInput) {
        if input.is_key_down(Key::Left) {
            self.rot_speed -= ROT_ACCEL;
        }
        if input.is_key_down(Key::Right) {
            self.rot_speed += ROT_ACCEL;
        }
        // friction only ever slows the turn down
        if self.rot_speed.abs() < ROT_FRIC_ACCEL {
            self.rot_speed = 0.0;
        } else {
            self.rot_speed -= ROT_FRIC_ACCEL.copysign(self.rot_speed);
        }
        self.rot_speed = self.rot_speed.clamp(-MAX_ROT_SPEED, MAX_ROT_SPEED);
    }

    fn throttle(&mut self, input: &dyn KeyInput) {
        if input.is_key_down(Key::Space) {
            self.speed += ACCEL;
        }
        self.speed = (self.speed - FRIC_ACCEL).clamp(0.0, MAX_SPEED);
    }
}

impl Drawable for Player {
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.steer(ctx.input);
        let rotation = self.sprite.rotation() + self.rot_speed;
        self.sprite.set_rotation(rotation);
        ctx.camera.target_rotation(rotation);

        self.throttle(ctx.input);
        // the car sprite faces up, so 0 degrees of heading is -y
        let heading = DVec2::from_angle((rotation - 90.0).to_radians());
        let position = self.sprite.position() + heading * self.speed;
        self.sprite.set_position(position.x, position.y);
        ctx.camera.target_location(position.x, position.y);
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

    fn rotation(&self) -> f64 {
        self.sprite.rotation()
    }
}

/// Splitmix64 step, used to scatter crates reproducibly from a seed.
#[derive(Debug, Clone)]
pub struct SplitMix64(u64);

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform integer in `[-half, half)`.
    pub fn centered(&mut self, half: u64) -> i64 {
        (self.next_u64() % (2 * half)) as i64 - half as i64
    }
}

/// Put the player at the origin and `crates` crates around it.
/// Returns the player's id.
pub fn populate(
    scene: &mut Scene,
    store: &ViewCacheStore,
    crates: usize,
    seed: u64,
) -> Result<EntityId, SceneError> {
    let player = scene.add(Player::new(store)?);
    let mut rng = SplitMix64::new(seed);
    for _ in 0..crates {
        let x = rng.centered(SCATTER) as f64;
        let y = rng.centered(SCATTER) as f64;
        let mut sprite = StackedSprite::new(store, CRATE)?.at(x, y);
        sprite.set_rotation((rng.next_u64() % 360) as f64);
        scene.add(sprite);
    }
    tracing::info!(crates, seed, "populated demo world");
    Ok(player)
}

/// Apply the zoom keys, keeping the zoom within what the view caches hold.
pub fn apply_zoom_keys(camera: &mut Camera, input: &dyn KeyInput) {
    if input.is_key_down(Key::ZoomIn) || input.is_key_down(Key::Char('w')) {
        camera.zoom_by(ZOOM_STEP);
    }
    if input.is_key_down(Key::ZoomOut) || input.is_key_down(Key::Char('s')) {
        camera.zoom_by(2.0 - ZOOM_STEP);
    }
    if camera.zoom() > CACHE_SCALE {
        camera.set_zoom(CACHE_SCALE);
    }
}
