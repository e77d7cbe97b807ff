// SPDX-License-Identifier: MIT
//
// weft-term: rendering and input core for weft.
//
// Widgets paint styled characters into a cell grid through a PaintContext.
// The diff renderer compares that grid with the previous frame and emits
// the shortest escape stream it can find: one cursor move and one SGR
// sequence per run of same-styled changes. In the other direction, the
// mouse parser turns raw SGR or legacy reports into press, release, drag
// and scroll events, and synthesizes clicks and double-clicks from them.
//
// Terminal setup (raw mode, alternate screen, enabling mouse reporting) is
// left to the application. Output goes to any `std::io::Write`.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod config;
pub mod diff;
pub mod dirty;
pub mod mouse;
pub mod output;
pub mod paint;
pub mod pool;

pub use buffer::{Bounds, ScreenBuffer};
pub use cell::{Attr, Cell, CellStyle, Rgb};
pub use config::{ConfigError, ParserConfig, RenderConfig};
pub use diff::{DiffRenderer, FrameSwap, RenderStats};
pub use dirty::{DirtyRegion, DirtyRegionManager};
pub use mouse::{Modifiers, MouseButton, MouseEvent, MouseEventKind, MouseEventParser, ScrollDirection};
pub use paint::{BorderChars, PaintContext, PlainStyles, StyleResolver};
pub use pool::{CellPool, PoolStats};
