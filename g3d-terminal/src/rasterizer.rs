//! Character-cell rasterizer for the pipeline's screen-space triangles.

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use g3d_core::ScreenTriangle;
use std::io::Write;

/// Character luminosity ramp (darkest to lightest).
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Fills shaded triangles into a glyph/color buffer. Overlap is resolved by
/// draw order (the engine's back-to-front sort), not a depth buffer, since
/// the pipeline output carries no per-pixel depth.
pub struct Rasterizer {
    width: usize,
    height: usize,
    glyphs: Vec<char>,
    colors: Vec<Color>,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            glyphs: vec![' '; size],
            colors: vec![Color::Reset; size],
        }
    }

    pub fn clear(&mut self) {
        self.glyphs.fill(' ');
        self.colors.fill(Color::Reset);
    }

    pub fn fill(&mut self, triangle: &ScreenTriangle) {
        let [r, g, b, _] = triangle.rgba();
        let luminance =
            (0.2126 * r as f64 + 0.7152 * g as f64 + 0.0722 * b as f64) / 255.0;
        let index = (luminance * (LUMINOSITY_RAMP.len() - 1) as f64) as usize;
        let glyph = LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)];
        let color = Color::Rgb { r, g, b };

        let [v0, v1, v2] = triangle.points;

        // Bounding box clipped to the buffer
        let min_x = (v0[0].min(v1[0]).min(v2[0]).floor() as i32).max(0);
        let max_x = (v0[0].max(v1[0]).max(v2[0]).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0[1].min(v1[1]).min(v2[1]).floor() as i32).max(0);
        let max_y = (v0[1].max(v1[1]).max(v2[1]).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, (px, py)) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let idx = y as usize * self.width + x as usize;
                        self.glyphs[idx] = glyph;
                        self.colors[idx] = color;
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.colors[idx]))?;
                writer.queue(Print(self.glyphs[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print('\n'))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Barycentric coordinates of a point in a triangle, None for degenerate
/// triangles.
fn barycentric(v0: [f64; 2], v1: [f64; 2], v2: [f64; 2], p: (f64, f64)) -> Option<(f64, f64, f64)> {
    let denom = (v1[1] - v2[1]) * (v0[0] - v2[0]) + (v2[0] - v1[0]) * (v0[1] - v2[1]);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1[1] - v2[1]) * (p.0 - v2[0]) + (v2[0] - v1[0]) * (p.1 - v2[1])) / denom;
    let w1 = ((v2[1] - v0[1]) * (p.0 - v2[0]) + (v0[0] - v2[0]) * (p.1 - v2[1])) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
