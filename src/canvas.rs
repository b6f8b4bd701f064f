//! Terminal surface. Each cell shows two stacked pixels using the lower half
//! block, background colour for the top pixel, foreground for the bottom one.

use std::io::Write;

use crate::fireworks::{Rgb, Surface, Vector};

/// Logical units per terminal pixel (half a cell vertically).
pub const LOGICAL_PER_PIXEL: f64 = 4.0;

// Below this a pixel is left at the background colour
const MIN_VISIBLE: f32 = 0.02;

pub struct Canvas {
    width: usize,
    height: usize,
    background: Rgb,
    glow_buffer: Vec<(f32, Rgb)>,
    output_buf: Vec<u8>,
}

impl Canvas {
    /// Canvas covering a terminal of `cols` x `rows` cells.
    pub fn new(cols: usize, rows: usize, background: Rgb) -> Self {
        let width = cols;
        let height = rows * 2;
        Self {
            width,
            height,
            background,
            glow_buffer: vec![(0.0, background); width * height],
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    pub fn clear(&mut self) {
        let background = self.background;
        self.glow_buffer.fill((0.0, background));
    }

    /// Logical position of the top pixel of a terminal cell.
    pub fn cell_to_logical(col: u16, row: u16) -> Vector {
        Vector::new(
            (f64::from(col) + 0.5) * LOGICAL_PER_PIXEL,
            (f64::from(row) * 2.0 + 0.5) * LOGICAL_PER_PIXEL,
        )
    }

    /// Glow at a pixel, for inspection.
    pub fn pixel(&self, x: usize, y: usize) -> Option<(f32, Rgb)> {
        (x < self.width && y < self.height).then(|| self.glow_buffer[y * self.width + x])
    }

    fn blend(&self, intensity: f32, color: Rgb) -> Rgb {
        if intensity <= MIN_VISIBLE {
            return self.background;
        }
        let t = intensity.min(1.0);
        let mix = |bg: u8, fg: u8| (bg as f32 * (1.0 - t) + fg as f32 * t) as u8;
        (
            mix(self.background.0, color.0),
            mix(self.background.1, color.1),
            mix(self.background.2, color.2),
        )
    }

    /// Write the whole frame, starting from the home position.
    pub fn present<W: Write>(&mut self, out: &mut W) -> std::io::Result<()> {
        let mut buf = std::mem::take(&mut self.output_buf);
        buf.clear();
        buf.extend_from_slice(b"\x1b[H");

        // Impossible colours so the first cell of each row always emits codes
        let mut prev_top: Option<Rgb> = None;
        let mut prev_bot: Option<Rgb> = None;

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top_idx = y * self.width + x;
                let bot_idx = if y + 1 < self.height {
                    (y + 1) * self.width + x
                } else {
                    top_idx
                };

                let (top_intensity, top_color) = self.glow_buffer[top_idx];
                let (bot_intensity, bot_color) = self.glow_buffer[bot_idx];
                let top = self.blend(top_intensity, top_color);
                let bot = self.blend(bot_intensity, bot_color);

                if prev_top != Some(top) {
                    write!(buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = Some(top);
                }
                if prev_bot != Some(bot) {
                    write!(buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = Some(bot);
                }
                buf.extend_from_slice("▄".as_bytes());
            }
            buf.extend_from_slice(b"\x1b[0m");
            prev_top = None;
            prev_bot = None;
            if y + 2 < self.height {
                buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&buf)?;
        out.flush()?;
        self.output_buf = buf;
        Ok(())
    }
}

impl Surface for Canvas {
    fn width(&self) -> f64 {
        self.width as f64 * LOGICAL_PER_PIXEL
    }

    fn height(&self) -> f64 {
        self.height as f64 * LOGICAL_PER_PIXEL
    }

    fn fill_disc(&mut self, center: Vector, radius: f64, color: Rgb, alpha: f64) {
        if !center.is_finite() || alpha <= 0.0 {
            return;
        }
        let cx = center.x / LOGICAL_PER_PIXEL;
        let cy = center.y / LOGICAL_PER_PIXEL;
        // Always reach at least the pixel under the centre
        let r = radius / LOGICAL_PER_PIXEL + 0.5;
        let intensity = alpha.min(1.0) as f32;

        let x0 = (cx - r).floor().max(0.0) as usize;
        let y0 = (cy - r).floor().max(0.0) as usize;
        let x1 = (cx + r).floor().min(self.width as f64 - 1.0);
        let y1 = (cy + r).floor().min(self.height as f64 - 1.0);
        if x1 < 0.0 || y1 < 0.0 {
            return;
        }

        for y in y0..=y1 as usize {
            for x in x0..=x1 as usize {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let idx = y * self.width + x;
                if intensity > self.glow_buffer[idx].0 {
                    self.glow_buffer[idx] = (intensity, color);
                }
            }
        }
    }
}
