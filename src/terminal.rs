//! Turns a [`Canvas`] into ANSI half-block output.

use crate::canvas::Canvas;
use crate::palette::{Rgb, blend_colors};
use std::io::{self, Write};

/// A line of text drawn over one terminal row, centred horizontally.
pub struct Overlay<'a> {
    pub row: usize,
    pub text: &'a str,
    pub color: Rgb,
}

pub struct FrameEncoder {
    output_buf: Vec<u8>,
}

impl FrameEncoder {
    pub fn with_capacity(cols: usize, rows: usize) -> Self {
        Self {
            output_buf: Vec::with_capacity(cols * rows * 25),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.output_buf
    }

    /// Encodes the whole canvas, top pixel as background and bottom pixel as
    /// foreground of a `▄`. Colour codes are only emitted when they change.
    pub fn encode(&mut self, canvas: &Canvas, overlay: Option<&Overlay>) -> io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H"); // Move to home

        let width = canvas.width();
        let height = canvas.height();
        let mut prev_top: Option<Rgb> = None;
        let mut prev_bot: Option<Rgb> = None;

        for y in (0..height).step_by(2) {
            let row = y / 2;
            let caption = overlay.filter(|o| o.row == row).map(|o| {
                let chars: Vec<char> = o.text.chars().take(width).collect();
                let start = (width - chars.len()) / 2;
                (start, chars, o.color)
            });

            for x in 0..width {
                let top = canvas.pixel(x, y);
                let bot = if y + 1 < height {
                    canvas.pixel(x, y + 1)
                } else {
                    top
                };

                if let Some((start, chars, color)) = &caption {
                    if x >= *start && x < start + chars.len() {
                        let ch = chars[x - start];
                        let bg = blend_colors(top, bot, 0.5);
                        if prev_top != Some(bg) {
                            write!(self.output_buf, "\x1b[48;2;{};{};{}m", bg.0, bg.1, bg.2)?;
                            prev_top = Some(bg);
                        }
                        if prev_bot != Some(*color) {
                            write!(
                                self.output_buf,
                                "\x1b[38;2;{};{};{}m",
                                color.0, color.1, color.2
                            )?;
                            prev_bot = Some(*color);
                        }
                        write!(self.output_buf, "{}", ch)?;
                        continue;
                    }
                }

                if prev_top != Some(top) {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }
        Ok(())
    }

    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.output_buf)?;
        out.flush()
    }
}
