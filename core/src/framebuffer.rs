use embedded_graphics::{Pixel, pixelcolor::Rgb565, prelude::{DrawTarget, OriginDimensions, RgbColor, Size}};

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
pub const PIXEL_COUNT: usize = WIDTH * HEIGHT;

/// Off-screen RGB565 buffer for the 320x240 panel. Views paint into this and
/// the frontend pushes it to the physical display in one flush.
pub struct FrameBuffer {
    pixels: [Rgb565; PIXEL_COUNT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: [Rgb565::BLACK; PIXEL_COUNT],
        }
    }

    pub fn clear_screen(&mut self, color: Rgb565) {
        self.pixels.fill(color);
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return;
        }
        self.pixels[y as usize * WIDTH + x as usize] = color;
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb565> {
        if x < 0 || y < 0 || x as usize >= WIDTH || y as usize >= HEIGHT {
            return None;
        }
        Some(self.pixels[y as usize * WIDTH + x as usize])
    }

    /// Row-major pixel data, `WIDTH * HEIGHT` entries.
    pub fn data(&self) -> &[Rgb565] {
        &self.pixels
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel(coord.x, coord.y, color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_pixel_ignores_out_of_bounds() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(-1, 0, Rgb565::WHITE);
        fb.set_pixel(0, -1, Rgb565::WHITE);
        fb.set_pixel(WIDTH as i32, 0, Rgb565::WHITE);
        fb.set_pixel(0, HEIGHT as i32, Rgb565::WHITE);
        assert!(fb.data().iter().all(|px| *px == Rgb565::BLACK));
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut fb = FrameBuffer::new();
        fb.set_pixel(10, 10, Rgb565::RED);
        fb.clear_screen(Rgb565::BLACK);
        assert_eq!(fb.pixel(10, 10), Some(Rgb565::BLACK));
    }
}
