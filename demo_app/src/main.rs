//! Headless actor runtime demo
//!
//! Runs a small scripted scene with no window: a steerable ship that fires
//! short-lived bullets, a field of drifting asteroids and a scrolling
//! background. Draw calls are recorded into the engine's command buffer and
//! summarised in the log.
//!
//! Usage: `actor_demo [config.toml|config.ron]`

use actor_runtime::foundation::logging;
use actor_runtime::foundation::math::{axes, constants, Quat, Vec2, Vec3};
use actor_runtime::prelude::*;
use rand::Rng;

const SCREEN_WIDTH: f32 = 1024.0;
const SCREEN_HEIGHT: f32 = 768.0;
const DEMO_FRAMES: u64 = 300;
const ASTEROID_COUNT: usize = 12;

const SHIP_FRAMES: [TextureHandle; 4] = [
    TextureHandle::new(1, 64, 29),
    TextureHandle::new(2, 64, 29),
    TextureHandle::new(3, 64, 29),
    TextureHandle::new(4, 64, 29),
];
const ASTEROID_TEXTURE: TextureHandle = TextureHandle::new(10, 72, 72);
const FAR_LAYERS: [TextureHandle; 2] = [TextureHandle::new(20, 1024, 768), TextureHandle::new(21, 1024, 768)];
const STAR_LAYERS: [TextureHandle; 2] = [TextureHandle::new(22, 1024, 768), TextureHandle::new(23, 1024, 768)];
const BULLET_MESH: MeshHandle = MeshHandle(1);

/// Fires bullets from the ship while Space is held
struct ShipHook {
    fire_held: bool,
    cooldown: f32,
    shots: u32,
}

impl ShipHook {
    const RELOAD_TIME: f32 = 0.25;
    const BULLET_SPEED: f32 = 800.0;
    const BULLET_LIFETIME: f32 = 1.0;

    fn new() -> Self {
        Self { fire_held: false, cooldown: 0.0, shots: 0 }
    }
}

impl EntityHook for ShipHook {
    fn entity_input(&mut self, _ctx: &mut TickContext<'_>, keys: &KeyState) {
        self.fire_held = keys.is_pressed(KeyCode::Space);
    }

    fn update_entity(&mut self, ctx: &mut TickContext<'_>, delta_time: f32) {
        self.cooldown -= delta_time;
        if !self.fire_held || self.cooldown > 0.0 {
            return;
        }
        self.cooldown = Self::RELOAD_TIME;
        self.shots += 1;

        let (position, orientation) = (ctx.owner().position(), ctx.owner().orientation());
        let bullet = ctx.spawn();
        let registry = ctx.registry_mut();
        if let Some(entity) = registry.entity_mut(bullet) {
            entity.set_pose_3d(Some(position), Some(orientation));
            entity.set_scale(0.5);
        }
        registry.attach_behavior(bullet, MoveBehavior::new().with_forward_speed(Self::BULLET_SPEED));
        registry.attach_behavior(bullet, LifetimeBehavior::new(Self::BULLET_LIFETIME));
        registry.attach_behavior(bullet, MeshBehavior::new().with_mesh(BULLET_MESH).with_draw_order(140));
        log::debug!("Ship fired shot {}", self.shots);
    }
}

/// Scripted scene
struct DemoApp {
    frame: u64,
    ship: Option<EntityId>,
}

impl DemoApp {
    fn new() -> Self {
        Self { frame: 0, ship: None }
    }

    fn spawn_background(registry: &mut EntityRegistry) {
        let background = registry.create_entity();
        registry.attach_behavior(
            background,
            ScrollingBackgroundBehavior::new(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT))
                .with_draw_order(10)
                .with_scroll_speed(-100.0)
                .with_layers(FAR_LAYERS),
        );
        registry.attach_behavior(
            background,
            ScrollingBackgroundBehavior::new(Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT))
                .with_draw_order(15)
                .with_scroll_speed(-200.0)
                .with_layers(STAR_LAYERS),
        );
    }

    fn spawn_ship(registry: &mut EntityRegistry) -> EntityId {
        let ship = registry.create_entity();
        if let Some(entity) = registry.entity_mut(ship) {
            entity.set_position(Vec3::new(-300.0, 0.0, 0.0));
            entity.set_scale(1.5);
        }
        registry.attach_behavior(ship, InputMoveBehavior::new(300.0, constants::PI));
        registry.attach_behavior(
            ship,
            AnimatedSpriteBehavior::new().with_frames(SHIP_FRAMES.to_vec()).with_draw_order(150),
        );
        registry.set_hook(ship, ShipHook::new());
        ship
    }

    fn spawn_asteroids(registry: &mut EntityRegistry) {
        let mut rng = rand::thread_rng();
        for _ in 0..ASTEROID_COUNT {
            let asteroid = registry.create_entity();
            if let Some(entity) = registry.entity_mut(asteroid) {
                let position = Vec3::new(
                    rng.gen_range(-SCREEN_WIDTH / 2.0..SCREEN_WIDTH / 2.0),
                    rng.gen_range(-SCREEN_HEIGHT / 2.0..SCREEN_HEIGHT / 2.0),
                    0.0,
                );
                let heading = Quat::from_axis_angle(&axes::up(), rng.gen_range(0.0..constants::TAU));
                entity.set_pose_3d(Some(position), Some(heading));
                entity.set_scale(rng.gen_range(0.5..1.5));
            }
            registry.attach_behavior(
                asteroid,
                MoveBehavior::new()
                    .with_forward_speed(rng.gen_range(50.0..150.0))
                    .with_angular_speed(rng.gen_range(-1.0..1.0)),
            );
            registry.attach_behavior(asteroid, SpriteBehavior::new().with_texture(ASTEROID_TEXTURE));
        }
    }

    /// Keys held on a given frame of the script
    fn scripted_keys(frame: u64, keys: &mut KeyState) {
        keys.clear();
        if frame < 200 {
            keys.press(KeyCode::W);
        }
        if (60..100).contains(&frame) {
            keys.press(KeyCode::A);
        }
        if (140..170).contains(&frame) {
            keys.press(KeyCode::D);
        }
        if frame % 40 < 10 {
            keys.press(KeyCode::Space);
        }
    }
}

impl Application for DemoApp {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        log::info!("Building demo scene...");
        let registry = engine.registry_mut();
        Self::spawn_background(registry);
        self.ship = Some(Self::spawn_ship(registry));
        Self::spawn_asteroids(registry);
        log::info!("Demo scene ready with {} entities", registry.len());
        Ok(())
    }

    fn poll_input(&mut self, engine: &mut Engine) -> FrameControl {
        Self::scripted_keys(self.frame, engine.keys_mut());
        self.frame += 1;
        FrameControl::Continue
    }

    fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.render()?;

        if self.frame % 60 == 0 {
            let stats = engine.registry().last_tick();
            let ship_position = self
                .ship
                .and_then(|ship| engine.registry().entity(ship))
                .map(Entity::position)
                .ok_or_else(|| AppError::Custom("ship entity is gone".to_string()))?;
            log::info!(
                "Frame {}: {} entities, {} draw calls, +{} -{} this tick, ship at ({:.0}, {:.0})",
                self.frame,
                engine.registry().len(),
                engine.commands().len(),
                stats.spawned,
                stats.destroyed,
                ship_position.x,
                ship_position.y
            );
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let shots = self
            .ship
            .and_then(|ship| engine.registry().entity(ship))
            .and_then(|entity| entity.hook::<ShipHook>())
            .map_or(0, |hook| hook.shots);
        log::info!("Demo finished after {} frames, {} shots fired", self.frame, shots);
    }
}

fn load_config() -> Result<RuntimeConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => RuntimeConfig::load_from_file(path),
        None => Ok(RuntimeConfig { max_frames: Some(DEMO_FRAMES), ..RuntimeConfig::default() }),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_with_filter(&config.log_filter);

    log::info!("Starting actor runtime demo");

    let mut app = DemoApp::new();
    match Engine::run(config, &mut app) {
        Ok(()) => {
            log::info!("Demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Demo failed: {}", e);
            Err(e.into())
        }
    }
}
