//! Frame loop driving the entity registry

use crate::{
    application::{Application, AppError, FrameControl},
    config::{ConfigError, RuntimeConfig},
    ecs::{EntityRegistry, TickStats},
    foundation::time::FrameTimer,
    input::KeyState,
    render::CommandBuffer,
};
use thiserror::Error;

/// Main engine struct
///
/// Owns the registry and runs the per-frame sequence: poll input, fan it out
/// to the registry, tick, render.
pub struct Engine {
    registry: EntityRegistry,
    keys: KeyState,
    commands: CommandBuffer,
    timer: FrameTimer,
    config: RuntimeConfig,
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: RuntimeConfig) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!(
            "Initializing engine (max delta {}s, min frame {}s)",
            config.max_delta_time,
            config.min_frame_time
        );

        Ok(Self {
            registry: EntityRegistry::new(),
            keys: KeyState::new(),
            commands: CommandBuffer::new(),
            timer: FrameTimer::new(config.min_frame_time, config.max_delta_time),
            config,
            running: true,
        })
    }

    /// Run the main loop with the given application until it quits
    ///
    /// The loop also stops after [`RuntimeConfig::max_frames`] frames when
    /// that is set.
    pub fn run<T: Application>(config: RuntimeConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::Application(format!("App initialization: {e}")))?;

        log::info!("Starting main loop with {} entities", engine.registry.len());

        while engine.running {
            let delta_time = engine.timer.tick();
            engine.run_frame(app, delta_time)?;

            if engine.config.max_frames.is_some_and(|max| engine.timer.frame_count() >= max) {
                log::info!("Frame limit reached");
                engine.running = false;
            }
        }

        app.cleanup(&mut engine);
        engine.registry.clear();

        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps average)",
            engine.timer.frame_count(),
            engine.timer.average_fps()
        );
        Ok(())
    }

    /// Run one frame with an explicit delta time
    ///
    /// Returns the tick counters, or default counters when the application
    /// asked to quit while polling input.
    pub fn run_frame<T: Application>(
        &mut self,
        app: &mut T,
        delta_time: f32,
    ) -> Result<TickStats, EngineError> {
        if app.poll_input(self) == FrameControl::Quit {
            log::info!("Engine shutdown requested");
            self.running = false;
            return Ok(TickStats::default());
        }

        self.registry.process_input(&self.keys);

        app.update(self, delta_time)
            .map_err(|e| EngineError::Application(format!("App update: {e}")))?;

        let stats = self.registry.tick(delta_time);

        app.render(self)
            .map_err(|e| EngineError::Application(format!("App render: {e}")))?;

        Ok(stats)
    }

    /// Record this frame's draw calls into the command buffer
    pub fn render(&mut self) -> Result<(), AppError> {
        self.commands.clear();
        self.registry.render(&mut self.commands);
        Ok(())
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the loop will run another frame
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Get the entity registry
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Get mutable access to the entity registry
    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    /// Key snapshot handed to entities this frame
    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    /// Mutable key snapshot, written by [`Application::poll_input`]
    pub fn keys_mut(&mut self) -> &mut KeyState {
        &mut self.keys
    }

    /// Draw calls recorded by the last [`Self::render`]
    pub fn commands(&self) -> &CommandBuffer {
        &self.commands
    }

    /// Get the frame timer
    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Get the runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid runtime configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Application callback failed
    #[error("Application error: {0}")]
    Application(String),
}
