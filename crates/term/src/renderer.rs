//! TerminalRenderer: flushes a framebuffer to the real terminal.
//!
//! Rows that did not change since the previous frame are skipped.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    previous: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            previous: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode plus alternate screen
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.flush_buf()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force a full redraw on the next frame (after a resize)
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn draw(&mut self, fb: &FrameBuffer) -> Result<()> {
        self.buf.clear();
        encode_changed_rows(self.previous.as_ref(), fb, &mut self.buf)?;
        if !self.buf.is_empty() {
            self.flush_buf()?;
        }

        match &mut self.previous {
            Some(prev) => prev.clone_from(fb),
            None => self.previous = Some(fb.clone()),
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Rows of `next` that differ from `prev`; all rows when sizes differ or there is no `prev`
pub fn changed_rows(prev: Option<&FrameBuffer>, next: &FrameBuffer) -> Vec<u16> {
    let same_size = prev.is_some_and(|p| p.width() == next.width() && p.height() == next.height());
    (0..next.height())
        .filter(|&y| !same_size || prev.map(|p| p.row(y)) != Some(next.row(y)))
        .collect()
}

/// Encode the changed rows as crossterm commands into `out`. Writes nothing when
/// no row changed.
pub fn encode_changed_rows(prev: Option<&FrameBuffer>, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let rows = changed_rows(prev, next);
    if rows.is_empty() {
        return Ok(());
    }

    if rows.len() == next.height() as usize {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
    }

    let mut style: Option<CellStyle> = None;
    for y in rows {
        out.queue(cursor::MoveTo(0, y))?;
        for cell in next.row(y) {
            if style != Some(cell.style) {
                apply_style(out, cell.style)?;
                style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn apply_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetForegroundColor(color(style.fg)))?;
    out.queue(SetBackgroundColor(color(style.bg)))?;
    out.queue(SetAttribute(if style.bold {
        Attribute::Bold
    } else {
        Attribute::NormalIntensity
    }))?;
    Ok(())
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_redraws_everything() {
        let fb = FrameBuffer::new(4, 3);
        assert_eq!(changed_rows(None, &fb), vec![0, 1, 2]);
    }

    #[test]
    fn only_dirty_rows_are_encoded() {
        let prev = FrameBuffer::new(4, 3);
        let mut next = prev.clone();
        next.put_char(2, 1, 'X', CellStyle::default());
        assert_eq!(changed_rows(Some(&prev), &next), vec![1]);

        let mut out = Vec::new();
        encode_changed_rows(Some(&prev), &prev.clone(), &mut out).unwrap();
        assert!(out.is_empty());

        encode_changed_rows(Some(&prev), &next, &mut out).unwrap();
        assert!(String::from_utf8_lossy(&out).contains('X'));
    }

    #[test]
    fn resize_redraws_everything() {
        let prev = FrameBuffer::new(4, 3);
        let next = FrameBuffer::new(5, 2);
        assert_eq!(changed_rows(Some(&prev), &next), vec![0, 1]);
    }
}
