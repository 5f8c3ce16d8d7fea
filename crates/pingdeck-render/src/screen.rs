use crate::frame::Line;
use anyhow::{bail, Context, Result};
use crossterm::style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::tty::IsTty;
use crossterm::{cursor, event, queue, terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Terminal capabilities the dashboard needs. The engine talks to this
/// boundary only, so tests can substitute a capturing implementation.
pub trait Screen {
    fn width(&mut self) -> Result<u16>;

    /// Claim the terminal: verify it can reposition the cursor, switch to
    /// raw input, hide the cursor. Failing here is fatal at startup, never
    /// a silent mid-run degrade.
    fn setup(&mut self) -> Result<()>;

    /// Give the terminal back: restore cursor and input mode.
    fn teardown(&mut self) -> Result<()>;

    /// Append lines that are drawn once and never overwritten.
    fn commit_static(&mut self, lines: &[Line]) -> Result<()>;

    /// Draw the host-row region. The first commit appends the rows; later
    /// commits reposition to the top of the region and overwrite in place.
    fn commit_rows(&mut self, rows: &[Line]) -> Result<()>;

    /// Append the static footer below the row region, once.
    fn commit_footer(&mut self, lines: &[Line]) -> Result<()>;

    /// Non-blocking: true when any key is waiting.
    fn key_pressed(&mut self) -> Result<bool>;
}

/// Crossterm-backed screen writing to stdout.
pub struct CrosstermScreen {
    out: Stdout,
    raw_mode: bool,
    row_count: u16,
    footer_height: u16,
}

impl CrosstermScreen {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            raw_mode: false,
            row_count: 0,
            footer_height: 0,
        }
    }

    fn write_line(&mut self, line: &Line) -> Result<()> {
        for span in &line.spans {
            if let Some(fg) = span.fg {
                queue!(self.out, SetForegroundColor(fg))?;
            }
            if let Some(bg) = span.bg {
                queue!(self.out, SetBackgroundColor(bg))?;
            }
            queue!(self.out, Print(span.text.as_str()), ResetColor)?;
        }
        // Explicit carriage return: raw mode does not translate newlines,
        // and printing (rather than moving) scrolls at the bottom edge.
        queue!(self.out, Print("\r\n"))?;
        Ok(())
    }
}

impl Default for CrosstermScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for CrosstermScreen {
    fn width(&mut self) -> Result<u16> {
        let (cols, _rows) = terminal::size().context("failed to query terminal size")?;
        Ok(cols)
    }

    fn setup(&mut self) -> Result<()> {
        if !self.out.is_tty() {
            bail!("stdout is not a terminal; an in-place display needs cursor control");
        }
        terminal::enable_raw_mode().context("failed to enable raw input mode")?;
        self.raw_mode = true;
        queue!(self.out, cursor::Hide)?;
        self.out.flush()?;
        Ok(())
    }

    fn teardown(&mut self) -> Result<()> {
        queue!(self.out, cursor::Show)?;
        self.out.flush()?;
        if self.raw_mode {
            terminal::disable_raw_mode().context("failed to restore input mode")?;
            self.raw_mode = false;
        }
        Ok(())
    }

    fn commit_static(&mut self, lines: &[Line]) -> Result<()> {
        for line in lines {
            self.write_line(line)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn commit_rows(&mut self, rows: &[Line]) -> Result<()> {
        if self.row_count > 0 {
            let back = self.row_count + self.footer_height;
            queue!(self.out, cursor::MoveToPreviousLine(back))?;
        }
        for row in rows {
            self.write_line(row)?;
        }
        self.row_count = rows.len() as u16;
        if self.footer_height > 0 {
            queue!(self.out, cursor::MoveToNextLine(self.footer_height))?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn commit_footer(&mut self, lines: &[Line]) -> Result<()> {
        for line in lines {
            self.write_line(line)?;
        }
        self.footer_height = lines.len() as u16;
        self.out.flush()?;
        Ok(())
    }

    fn key_pressed(&mut self) -> Result<bool> {
        let mut pressed = false;
        while event::poll(Duration::from_millis(0)).context("failed to poll input")? {
            if let event::Event::Key(_) = event::read().context("failed to read input")? {
                pressed = true;
            }
        }
        Ok(pressed)
    }
}
