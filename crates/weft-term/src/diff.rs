// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// Compares the frame about to be shown against the one the terminal is
// currently displaying and emits escape sequences only for what changed.
// Most frames touch a few rows, so a full-screen repaint turns into a
// handful of short runs.
//
// The pipeline per frame:
//
//   1. Widgets paint into the current ScreenBuffer through a PaintContext.
//   2. DiffRenderer::render() compares it against the previous frame and
//      groups changed cells into runs: horizontal stretches on one row that
//      share a CellStyle.
//   3. Each run costs one cursor move, one SGR sequence and its characters,
//      all accumulated in an OutputBuffer.
//   4. flush_to() hands the frame to the terminal in a single write.
//
// Two paths:
//
//   - Full render when there is no previous frame or the sizes differ:
//     clear the screen, home the cursor, emit every cell.
//   - Incremental render otherwise. Unchanged rows are skipped with one
//     slice comparison. An unchanged frame produces no bytes at all.
//
// FrameSwap packages the previous/current pair so callers cannot get the
// bookkeeping wrong: paint into `current_mut()`, call `present()`, repeat.

use std::io::{self, Write};

use tracing::debug;

use crate::ansi;
use crate::buffer::ScreenBuffer;
use crate::cell::Cell;
use crate::config::RenderConfig;
use crate::output::OutputBuffer;

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// What a render pass produced, for profiling and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells emitted.
    pub cells_rendered: usize,
    /// Runs emitted (one cursor move and one SGR each).
    pub runs: usize,
    /// Total bytes of output generated.
    pub bytes_written: usize,
    /// Whether this was a full redraw.
    pub full_redraw: bool,
}

// ─── Runs ────────────────────────────────────────────────────────────────────

/// A horizontal stretch `[start, end)` of row `y` sharing one style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    y: u16,
    start: u16,
    end: u16,
}

/// Append the runs of row `y` to `runs`.
///
/// With `prev`, only cells that differ from `prev` take part; a run breaks
/// at every unchanged cell. Without it, every cell is emitted. Either way a
/// run breaks where the style changes.
fn collect_row_runs(curr: &[Cell], prev: Option<&[Cell]>, y: u16, runs: &mut Vec<Run>) {
    let changed = |x: usize| prev.is_none_or(|p| p[x] != curr[x]);
    let len = curr.len();
    let mut x = 0;

    while x < len {
        if !changed(x) {
            x += 1;
            continue;
        }
        let start = x;
        x += 1;
        while x < len && changed(x) && curr[x].same_style(&curr[start]) {
            x += 1;
        }
        // Row length is a buffer width, so both fit in u16.
        runs.push(Run {
            y,
            start: u16::try_from(start).unwrap_or(u16::MAX),
            end: u16::try_from(x).unwrap_or(u16::MAX),
        });
    }
}

/// Every run needed to turn `prev` into `curr`.
fn collect_runs(prev: Option<&ScreenBuffer>, curr: &ScreenBuffer) -> Vec<Run> {
    let mut runs = Vec::new();
    for y in 0..curr.height() {
        let Some(curr_row) = curr.row(y) else { break };
        let prev_row = prev.and_then(|p| p.row(y));
        if prev_row == Some(curr_row) {
            continue;
        }
        collect_row_runs(curr_row, prev_row, y, &mut runs);
    }
    runs
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Turns a (previous, current) frame pair into terminal output.
///
/// The renderer keeps no frame of its own; the caller supplies both sides.
/// See [`FrameSwap`] for an owner that manages the pair.
///
/// ```
/// use weft_term::buffer::ScreenBuffer;
/// use weft_term::cell::Cell;
/// use weft_term::diff::DiffRenderer;
///
/// let prev = ScreenBuffer::new(10, 2);
/// let mut curr = prev.clone();
/// curr.set_cell(3, 1, Cell::new('!'));
///
/// let mut renderer = DiffRenderer::new();
/// let stats = renderer.render(Some(&prev), &curr);
/// assert_eq!(stats.cells_rendered, 1);
/// assert!(renderer.output_bytes().starts_with(b"\x1b[2;4H"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiffRenderer {
    output: OutputBuffer,
    config: RenderConfig,
}

impl DiffRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RenderConfig) -> Self {
        Self {
            output: OutputBuffer::new(),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> RenderConfig {
        self.config
    }

    /// Diff `curr` against `prev` and generate the output for this frame,
    /// replacing whatever the last call produced.
    ///
    /// `prev` is what the terminal currently shows, or `None` if unknown.
    /// A missing `prev` or a size change forces a full redraw.
    pub fn render(&mut self, prev: Option<&ScreenBuffer>, curr: &ScreenBuffer) -> RenderStats {
        self.output.clear();

        let prev = prev.filter(|p| p.same_size(curr));
        let full_redraw = prev.is_none();
        let runs = collect_runs(prev, curr);

        let mut stats = RenderStats {
            full_redraw,
            ..RenderStats::default()
        };
        if runs.is_empty() && !full_redraw {
            return stats;
        }

        // Writes into a Vec-backed buffer cannot fail.
        let _ = self.encode(&runs, curr, full_redraw);

        stats.runs = runs.len();
        stats.cells_rendered = runs.iter().map(|r| usize::from(r.end - r.start)).sum();
        stats.bytes_written = self.output.len();
        debug!(
            cells = stats.cells_rendered,
            runs = stats.runs,
            bytes = stats.bytes_written,
            full_redraw,
            "rendered frame"
        );
        stats
    }

    fn encode(&mut self, runs: &[Run], curr: &ScreenBuffer, full_redraw: bool) -> io::Result<()> {
        let out = &mut self.output;

        if self.config.synchronized_output {
            ansi::begin_sync(out)?;
        }
        if full_redraw {
            ansi::clear_screen(out)?;
            ansi::cursor_home(out)?;
        }

        for run in runs {
            let Some(row) = curr.row(run.y) else { continue };
            let cells = &row[usize::from(run.start)..usize::from(run.end)];
            ansi::cursor_to(out, run.start, run.y)?;
            ansi::style(out, &cells[0].style())?;
            for cell in cells {
                out.write_char(cell.ch);
            }
        }

        if self.config.reset_after_frame {
            ansi::reset(out)?;
        }
        if self.config.synchronized_output {
            ansi::end_sync(out)?;
        }
        Ok(())
    }

    /// The bytes from the last render.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Write the last render's bytes to `w` and clear them.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }
}

/// The bytes that turn `prev` into `curr`, with the default [`RenderConfig`].
///
/// Identical frames give an empty vector.
#[must_use]
pub fn render(prev: Option<&ScreenBuffer>, curr: &ScreenBuffer) -> Vec<u8> {
    let mut renderer = DiffRenderer::new();
    renderer.render(prev, curr);
    renderer.output.take()
}

// ─── FrameSwap ───────────────────────────────────────────────────────────────

/// Owner of the previous/current frame pair.
///
/// Paint the next frame into [`current_mut`](Self::current_mut), then call
/// [`present`](Self::present). Presenting writes the diff, makes the
/// painted frame the previous one, and hands back a blank current buffer
/// of the same size.
///
/// ```
/// use weft_term::cell::Cell;
/// use weft_term::diff::FrameSwap;
///
/// let mut frames = FrameSwap::new(20, 4);
/// let mut out = Vec::new();
///
/// frames.current_mut().set_cell(0, 0, Cell::new('a'));
/// let first = frames.present(&mut out).unwrap();
/// assert!(first.full_redraw);
///
/// frames.current_mut().set_cell(0, 0, Cell::new('a'));
/// let second = frames.present(&mut out).unwrap();
/// assert_eq!(second.bytes_written, 0);
/// ```
#[derive(Debug, Clone)]
pub struct FrameSwap {
    current: ScreenBuffer,
    previous: Option<ScreenBuffer>,
    renderer: DiffRenderer,
}

impl FrameSwap {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_config(width, height, RenderConfig::default())
    }

    #[must_use]
    pub fn with_config(width: u16, height: u16, config: RenderConfig) -> Self {
        Self {
            current: ScreenBuffer::new(width, height),
            previous: None,
            renderer: DiffRenderer::with_config(config),
        }
    }

    /// The frame being painted.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> &ScreenBuffer {
        &self.current
    }

    #[inline]
    pub const fn current_mut(&mut self) -> &mut ScreenBuffer {
        &mut self.current
    }

    /// The frame the terminal shows, once something has been presented.
    #[inline]
    #[must_use]
    pub const fn previous(&self) -> Option<&ScreenBuffer> {
        self.previous.as_ref()
    }

    /// Diff, write the bytes to `w`, then swap frames.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails. The frames are not swapped
    /// in that case, so the next present retries the same diff.
    pub fn present(&mut self, w: &mut impl Write) -> io::Result<RenderStats> {
        let stats = self.renderer.render(self.previous.as_ref(), &self.current);
        self.renderer.flush_to(w)?;
        self.swap();
        Ok(stats)
    }

    /// Resize the frame being painted. The next present redraws everything.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.current.resize(width, height);
    }

    /// Forget what the terminal shows so the next present redraws
    /// everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    fn swap(&mut self) {
        let (width, height) = (self.current.width(), self.current.height());
        match &mut self.previous {
            Some(prev) => std::mem::swap(prev, &mut self.current),
            None => {
                let blank = ScreenBuffer::new(width, height);
                self.previous = Some(std::mem::replace(&mut self.current, blank));
            }
        }

        if self.current.width() == width && self.current.height() == height {
            self.current.clear();
        } else {
            self.current = ScreenBuffer::new(width, height);
        }
        self.current.clear_dirty();
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Attr, CellStyle, Rgb};
    use pretty_assertions::assert_eq;

    /// Helper: render and return (stats, output as a string).
    fn render_frame(
        renderer: &mut DiffRenderer,
        prev: Option<&ScreenBuffer>,
        curr: &ScreenBuffer,
    ) -> (RenderStats, String) {
        let stats = renderer.render(prev, curr);
        let output = String::from_utf8(renderer.output_bytes().to_vec()).unwrap();
        (stats, output)
    }

    fn write_str(buf: &mut ScreenBuffer, x: u16, y: u16, text: &str, style: CellStyle) {
        for (i, ch) in text.chars().enumerate() {
            buf.set_cell(x + u16::try_from(i).unwrap(), y, Cell::styled(ch, style));
        }
    }

    fn bare() -> DiffRenderer {
        DiffRenderer::with_config(RenderConfig::default().with_reset_after_frame(false))
    }

    // ── Unchanged Frames ────────────────────────────────────────────────

    #[test]
    fn identical_frames_produce_nothing() {
        let mut a = ScreenBuffer::new(10, 3);
        write_str(&mut a, 0, 0, "hello", CellStyle::PLAIN);
        let b = a.clone();
        assert!(render(Some(&a), &b).is_empty());
    }

    #[test]
    fn unchanged_frame_stays_empty_with_every_option() {
        let buf = ScreenBuffer::new(4, 4);
        let config = RenderConfig::default()
            .with_synchronized_output(true)
            .with_reset_after_frame(true);
        let mut renderer = DiffRenderer::with_config(config);
        let (stats, out) = render_frame(&mut renderer, Some(&buf), &buf);
        assert_eq!(out, "");
        assert_eq!(stats, RenderStats::default());
    }

    // ── Full Render ─────────────────────────────────────────────────────

    #[test]
    fn no_previous_is_full_render() {
        let mut curr = ScreenBuffer::new(3, 1);
        write_str(&mut curr, 0, 0, "ab", CellStyle::PLAIN);
        let (stats, out) = render_frame(&mut bare(), None, &curr);
        assert_eq!(out, "\x1b[2J\x1b[H\x1b[1;1H\x1b[0mab ");
        assert!(stats.full_redraw);
        assert_eq!(stats.cells_rendered, 3);
        assert_eq!(stats.runs, 1);
    }

    #[test]
    fn size_change_is_full_render() {
        let prev = ScreenBuffer::new(3, 1);
        let curr = ScreenBuffer::new(4, 1);
        let out = render(Some(&prev), &curr);
        assert!(out.starts_with(b"\x1b[2J\x1b[H"));
    }

    #[test]
    fn full_render_splits_rows_by_style() {
        let red = CellStyle::PLAIN.with_fg(Rgb(255, 0, 0));
        let mut curr = ScreenBuffer::new(4, 2);
        write_str(&mut curr, 2, 0, "RR", red);
        let (stats, out) = render_frame(&mut bare(), None, &curr);
        assert_eq!(
            out,
            "\x1b[2J\x1b[H\
             \x1b[1;1H\x1b[0m  \
             \x1b[1;3H\x1b[0;38;2;255;0;0mRR\
             \x1b[2;1H\x1b[0m    "
        );
        assert_eq!(stats.runs, 3);
        assert_eq!(stats.cells_rendered, 8);
    }

    #[test]
    fn zero_size_full_render_only_clears() {
        let (stats, out) = render_frame(&mut bare(), None, &ScreenBuffer::new(0, 0));
        assert_eq!(out, "\x1b[2J\x1b[H");
        assert_eq!(stats.cells_rendered, 0);
    }

    // ── Incremental Render ──────────────────────────────────────────────

    #[test]
    fn single_change_is_one_run() {
        let prev = ScreenBuffer::new(10, 5);
        let mut curr = prev.clone();
        curr.set_cell(4, 2, Cell::new('x').with_attrs(Attr::BOLD));
        let (stats, out) = render_frame(&mut bare(), Some(&prev), &curr);
        assert_eq!(out, "\x1b[3;5H\x1b[0;1mx");
        assert!(!stats.full_redraw);
        assert_eq!(stats.cells_rendered, 1);
        assert_eq!(stats.bytes_written, out.len());
    }

    #[test]
    fn contiguous_same_style_changes_share_a_run() {
        let prev = ScreenBuffer::new(10, 1);
        let mut curr = prev.clone();
        write_str(&mut curr, 2, 0, "abc", CellStyle::PLAIN);
        let (stats, out) = render_frame(&mut bare(), Some(&prev), &curr);
        assert_eq!(out, "\x1b[1;3H\x1b[0mabc");
        assert_eq!(stats.runs, 1);
    }

    #[test]
    fn unchanged_gap_splits_runs() {
        let prev = ScreenBuffer::new(10, 1);
        let mut curr = prev.clone();
        curr.set_cell(1, 0, Cell::new('a'));
        curr.set_cell(3, 0, Cell::new('b'));
        let (stats, out) = render_frame(&mut bare(), Some(&prev), &curr);
        assert_eq!(out, "\x1b[1;2H\x1b[0ma\x1b[1;4H\x1b[0mb");
        assert_eq!(stats.runs, 2);
    }

    #[test]
    fn style_change_splits_runs() {
        let prev = ScreenBuffer::new(10, 1);
        let mut curr = prev.clone();
        curr.set_cell(0, 0, Cell::new('a'));
        curr.set_cell(1, 0, Cell::new('b').with_bg(Rgb(0, 0, 255)));
        let (stats, out) = render_frame(&mut bare(), Some(&prev), &curr);
        assert_eq!(out, "\x1b[1;1H\x1b[0ma\x1b[1;2H\x1b[0;48;2;0;0;255mb");
        assert_eq!(stats.runs, 2);
    }

    #[test]
    fn style_only_change_is_rendered() {
        let mut prev = ScreenBuffer::new(3, 1);
        write_str(&mut prev, 0, 0, "abc", CellStyle::PLAIN);
        let mut curr = prev.clone();
        curr.set_cell(1, 0, Cell::new('b').with_attrs(Attr::UNDERLINE));
        let (_, out) = render_frame(&mut bare(), Some(&prev), &curr);
        assert_eq!(out, "\x1b[1;2H\x1b[0;4mb");
    }

    #[test]
    fn changes_on_several_rows() {
        let prev = ScreenBuffer::new(5, 3);
        let mut curr = prev.clone();
        curr.set_cell(0, 0, Cell::new('a'));
        curr.set_cell(4, 2, Cell::new('z'));
        let (stats, out) = render_frame(&mut bare(), Some(&prev), &curr);
        assert_eq!(out, "\x1b[1;1H\x1b[0ma\x1b[3;5H\x1b[0mz");
        assert_eq!(stats.runs, 2);
    }

    // ── Config ──────────────────────────────────────────────────────────

    #[test]
    fn reset_after_frame_is_default() {
        let prev = ScreenBuffer::new(2, 1);
        let mut curr = prev.clone();
        curr.set_cell(0, 0, Cell::new('a'));
        let out = render(Some(&prev), &curr);
        assert_eq!(out, b"\x1b[1;1H\x1b[0ma\x1b[0m");
    }

    #[test]
    fn synchronized_output_wraps_frame() {
        let prev = ScreenBuffer::new(2, 1);
        let mut curr = prev.clone();
        curr.set_cell(0, 0, Cell::new('a'));
        let config = RenderConfig::default().with_synchronized_output(true);
        let (_, out) = render_frame(&mut DiffRenderer::with_config(config), Some(&prev), &curr);
        assert_eq!(out, "\x1b[?2026h\x1b[1;1H\x1b[0ma\x1b[0m\x1b[?2026l");
    }

    #[test]
    fn render_replaces_previous_output() {
        let prev = ScreenBuffer::new(2, 1);
        let mut curr = prev.clone();
        curr.set_cell(0, 0, Cell::new('a'));
        let mut renderer = bare();
        renderer.render(Some(&prev), &curr);
        let (_, out) = render_frame(&mut renderer, Some(&curr), &curr);
        assert_eq!(out, "");
    }

    #[test]
    fn flush_to_writes_and_clears() {
        let mut renderer = bare();
        renderer.render(None, &ScreenBuffer::new(1, 1));
        let mut sink = Vec::new();
        renderer.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"\x1b[2J\x1b[H\x1b[1;1H\x1b[0m ");
        assert!(renderer.output_bytes().is_empty());
    }

    #[test]
    fn multibyte_chars_are_utf8() {
        let prev = ScreenBuffer::new(3, 1);
        let mut curr = prev.clone();
        curr.set_cell(0, 0, Cell::new('┌'));
        let (_, out) = render_frame(&mut bare(), Some(&prev), &curr);
        assert_eq!(out, "\x1b[1;1H\x1b[0m┌");
    }

    // ── FrameSwap ───────────────────────────────────────────────────────

    #[test]
    fn first_present_is_full() {
        let mut frames = FrameSwap::new(4, 2);
        let mut out = Vec::new();
        let stats = frames.present(&mut out).unwrap();
        assert!(stats.full_redraw);
        assert!(out.starts_with(b"\x1b[2J"));
        assert!(frames.previous().is_some());
    }

    #[test]
    fn present_swaps_and_blanks_current() {
        let mut frames = FrameSwap::new(4, 2);
        frames.current_mut().set_cell(1, 1, Cell::new('q'));
        frames.present(&mut Vec::new()).unwrap();

        assert_eq!(frames.previous().and_then(|p| p.get_cell(1, 1)), Some(Cell::new('q')));
        assert_eq!(frames.current(), &ScreenBuffer::new(4, 2));
        assert!(!frames.current().is_dirty());
    }

    #[test]
    fn repainting_same_content_writes_nothing() {
        let mut frames = FrameSwap::new(6, 1);
        let mut out = Vec::new();
        write_str(frames.current_mut(), 0, 0, "same", CellStyle::PLAIN);
        frames.present(&mut out).unwrap();

        out.clear();
        write_str(frames.current_mut(), 0, 0, "same", CellStyle::PLAIN);
        let stats = frames.present(&mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats.cells_rendered, 0);
    }

    #[test]
    fn not_repainting_erases_old_content() {
        let mut frames = FrameSwap::new(3, 1);
        write_str(frames.current_mut(), 0, 0, "ab", CellStyle::PLAIN);
        frames.present(&mut Vec::new()).unwrap();

        let mut out = Vec::new();
        let stats = frames.present(&mut out).unwrap();
        assert_eq!(stats.cells_rendered, 2);
        assert_eq!(out, b"\x1b[1;1H\x1b[0m  \x1b[0m");
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut frames = FrameSwap::new(3, 1);
        frames.present(&mut Vec::new()).unwrap();
        frames.resize(5, 2);
        let stats = frames.present(&mut Vec::new()).unwrap();
        assert!(stats.full_redraw);
        assert_eq!(frames.current().width(), 5);
        assert_eq!(frames.current().height(), 2);

        let stats = frames.present(&mut Vec::new()).unwrap();
        assert!(!stats.full_redraw);
    }

    #[test]
    fn force_redraw_repaints_everything() {
        let mut frames = FrameSwap::new(2, 2);
        frames.present(&mut Vec::new()).unwrap();
        frames.force_redraw();
        let stats = frames.present(&mut Vec::new()).unwrap();
        assert!(stats.full_redraw);
        assert_eq!(stats.cells_rendered, 4);
    }

    /// A writer that always fails.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_present_keeps_frames() {
        let mut frames = FrameSwap::new(2, 1);
        frames.current_mut().set_cell(0, 0, Cell::new('k'));
        assert!(frames.present(&mut Broken).is_err());
        assert!(frames.previous().is_none());
        assert_eq!(frames.current().get_cell(0, 0), Some(Cell::new('k')));
    }
}
