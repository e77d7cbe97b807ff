// SPDX-License-Identifier: MIT
//
// Frame byte staging.
//
// DiffRenderer encodes a frame here, cursor moves and SGR runs included,
// and only touches the real writer once the frame is complete. A writer
// error leaves the staged bytes in place for the next attempt.

use std::io::{self, Write};

/// Staged escape and character bytes for one rendered frame.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    buf: Vec<u8>,
}

/// Room for a typical incremental frame. Full redraws grow it once and the
/// capacity is kept afterwards.
const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Staged bytes, not yet written anywhere.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Stage a cell character as UTF-8.
    #[inline]
    pub fn write_char(&mut self, ch: char) {
        let mut enc = [0u8; 4];
        self.buf.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
    }

    /// Drop staged bytes. The allocation stays for the next frame.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Hand the staged frame over as an owned `Vec`.
    #[must_use]
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buf)
    }

    /// Send the staged frame to `w` in one `write_all`, then flush.
    /// Nothing is written for an empty frame.
    ///
    /// # Errors
    ///
    /// Any error from `w`. Staged bytes are kept so the frame can be
    /// retried.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Staged bytes leave through flush_to.
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
