// SPDX-License-Identifier: MIT
//
// `weft render`: paint a small panel twice and show what reaches the
// terminal. The first frame is a full redraw; the second changes only the
// status row, so its diff is a single short run.

use std::io::{self, Write};

use tracing::info;
use weft_term::ansi;
use weft_term::{
    Attr, BorderChars, CellPool, CellStyle, FrameSwap, PaintContext, RenderConfig, RenderStats,
    Rgb, ScreenBuffer, StyleResolver,
};

const PARAGRAPH: &str = "Cells are painted into a buffer, compared with the previous frame, \
and only the differences are written out.\nResize the window and everything is drawn again.";

// ─── Theme ───────────────────────────────────────────────────────────────────

/// What a piece of the demo panel is, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Border,
    Title,
    Body,
    Status,
}

/// Fixed colors for [`Role`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoTheme;

impl StyleResolver for DemoTheme {
    type Style = Role;

    fn resolve(&self, style: Option<&Role>) -> CellStyle {
        let base = CellStyle::PLAIN.with_bg(Rgb(24, 24, 32));
        match style {
            Some(Role::Border) => base.with_fg(Rgb(90, 110, 140)),
            Some(Role::Title) => base.with_fg(Rgb(240, 200, 120)).with_attrs(Attr::BOLD),
            Some(Role::Body) | None => base.with_fg(Rgb(210, 210, 210)),
            Some(Role::Status) => CellStyle::PLAIN
                .with_fg(Rgb(24, 24, 32))
                .with_bg(Rgb(120, 180, 240)),
        }
    }
}

// ─── Painting ────────────────────────────────────────────────────────────────

/// Paint the demo panel with `status` on its bottom row.
pub fn paint(buf: &mut ScreenBuffer, pool: &mut CellPool, status: &str) {
    let bounds = buf.bounds();
    let (w, h) = (bounds.width, bounds.height);
    let inner_w = w.saturating_sub(2);
    let inner_h = h.saturating_sub(2);

    let mut ctx = PaintContext::new(buf, &DemoTheme, pool, bounds);
    ctx.clear(Some(&Role::Body));
    ctx.draw_border_with(0, 0, w, h, Some(&Role::Border), &BorderChars::ROUNDED);
    ctx.write_text(2, 0, " weft ", Some(&Role::Title), true);

    let mut body = ctx.sub_context(1, 1, inner_w, inner_h.saturating_sub(1));
    body.write_text_wrapped(1, 0, PARAGRAPH, Some(&Role::Body), inner_w.saturating_sub(2));

    let mut status_row = ctx.sub_context(1, h.saturating_sub(2), inner_w, inner_h.min(1));
    status_row.clear(Some(&Role::Status));
    status_row.write_text(1, 0, status, Some(&Role::Status), true);
}

// ─── Command ─────────────────────────────────────────────────────────────────

/// Size and output options for [`run`].
#[derive(Debug, Clone, Copy)]
pub struct DemoOptions {
    pub width: u16,
    pub height: u16,
    pub config: RenderConfig,
}

/// Write the full first frame and the incremental second frame to `out`,
/// then park the cursor below the panel.
pub fn run(opts: DemoOptions, out: &mut impl Write) -> io::Result<[RenderStats; 2]> {
    let mut frames = FrameSwap::with_config(opts.width, opts.height, opts.config);
    let mut pool = CellPool::new();

    paint(frames.current_mut(), &mut pool, "frame 1: full render");
    let first = frames.present(out)?;
    info!(
        cells = first.cells_rendered,
        runs = first.runs,
        bytes = first.bytes_written,
        "first frame"
    );

    paint(frames.current_mut(), &mut pool, "frame 2: incremental");
    let second = frames.present(out)?;
    info!(
        cells = second.cells_rendered,
        runs = second.runs,
        bytes = second.bytes_written,
        "second frame"
    );

    let pool_stats = pool.stats();
    info!(hits = pool_stats.hits, misses = pool_stats.misses, "cell pool");

    ansi::cursor_to(out, 0, opts.height)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok([first, second])
}

// ─── Tests ───────────────────────────────────────────────────────────────────
