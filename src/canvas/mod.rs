//! # Drawing surfaces
//!
//! ```text
//!                 ┌─────────────────────────┐
//!                 │   DrawingSurface trait  │
//!                 └───────────┬─────────────┘
//!                             │
//!          ┌──────────────────┼──────────────────┐
//!          ▼                  ▼                  ▼
//!    ┌───────────┐     ┌───────────┐     ┌─────────────┐
//!    │  Canvas   │     │ Recording │     │   Preview   │
//!    │ RGBA, PNG │     │  call log │     │ Kitty / ▀▄  │
//!    └───────────┘     └───────────┘     └─────────────┘
//! ```

mod canvas;
mod caps;
mod color;
mod font;
mod halfblock;
mod kitty;
mod png;
mod preview;
mod rasterizer;
mod recording;
mod shapes;
mod surface;

pub use canvas::{Canvas, MAX_DIMENSION};
pub use caps::{GraphicsProtocol, TerminalCaps};
pub use color::Color;
pub use halfblock::HalfBlockRasterizer;
pub use kitty::KittyRasterizer;
pub use png::{encode_rgba, to_data_url};
pub use preview::PreviewSurface;
pub use rasterizer::{select_rasterizer, RasterOutput, Rasterizer, StyledCell, StyledLine};
pub use recording::{RecordingSurface, SurfaceCall};
pub use shapes::{Circle, Line, Point, Polygon, Rect, Shape, TextRun};
pub use surface::{DrawingSurface, Fill, Font, Stroke};
