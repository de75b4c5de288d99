//! Drawing command engine
//!
//! - [`renderer`]: synchronous dispatch of commands to a surface
//! - [`animation`]: paced, cancellable playback
//! - [`history`]: linear undo/redo of command snapshots

pub mod animation;
pub mod history;
pub mod renderer;

pub use animation::{
    Animator, CancelToken, Pacer, PlaybackReport, RecordingPacer, TokioPacer, DEFAULT_DELAY,
};
pub use history::{History, HistoryEntry};
pub use renderer::{render, render_command, render_legacy, render_legacy_shape, RenderReport};
