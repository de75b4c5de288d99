//! # drawbot
//!
//! Turns short natural-language prompts into ordered sequences of drawing
//! commands and renders them onto a 2D surface, either in one pass or
//! animated one command at a time.
//!
//! Commands come from a [`generator::CommandGenerator`]: the built-in keyword
//! interpreter in [`prompt`] or a remote drawing service. A
//! [`session::DrawingSession`] keeps the live sequence, its undo history and
//! the drawing store in step with the surface.

pub mod canvas;
pub mod command;
pub mod config;
pub mod engine;
pub mod errors;
pub mod generator;
pub mod prompt;
pub mod session;
pub mod store;

pub use canvas::{Canvas, DrawingSurface};
pub use command::{Command, CommandKind};
pub use config::DrawbotConfig;
pub use errors::{DrawError, Result};
pub use session::DrawingSession;
