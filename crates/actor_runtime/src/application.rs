//! Application trait and lifecycle management

use crate::engine::{Engine, EngineError};
use thiserror::Error;

/// Whether the run loop keeps going after input was polled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    /// Run this frame
    Continue,
    /// Stop before updating this frame
    Quit,
}

/// Application lifecycle trait
///
/// Implement this trait to drive a scene with [`Engine::run`].
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is created. Spawn the initial entities
    /// here.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Refresh the key snapshot for this frame
    ///
    /// Write into [`Engine::keys_mut`]; the snapshot is handed to every active
    /// entity before the tick.
    fn poll_input(&mut self, engine: &mut Engine) -> FrameControl;

    /// Per-frame application logic, run after input and before the tick
    fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        Ok(())
    }

    /// Render the application
    ///
    /// Called after the tick. The default records the registry's draw calls
    /// into the engine's command buffer.
    fn render(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        engine.render()
    }

    /// Cleanup the application
    ///
    /// Called once when the loop ends, before the registry is cleared.
    fn cleanup(&mut self, _engine: &mut Engine) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}
