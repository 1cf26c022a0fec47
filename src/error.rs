//! Fatal startup errors.
//!
//! Steady-state failures (frame reads, volume pushes, window refreshes)
//! are logged and contained where they occur; only startup-time resource
//! acquisition escapes [`crate::app::run`] and terminates the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("window creation failed: {0}")]
    Window(String),

    #[error("camera unavailable: {0}")]
    Camera(String),
}
