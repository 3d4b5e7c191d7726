use crate::framebuffer::FrameBuffer;

/// Backlight duty applied on every render pass.
pub const BACKLIGHT_DIM: f32 = 0.2;

/// RGB LED duty triple, 0.0..=1.0 per channel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LedColor {
    pub const OFF: LedColor = LedColor { r: 0.0, g: 0.0, b: 0.0 };
    /// Busy: a network fetch is in flight.
    pub const YELLOW: LedColor = LedColor { r: 0.1, g: 0.1, b: 0.0 };
    /// Alert: unseen records are waiting in the error sink.
    pub const RED: LedColor = LedColor { r: 0.1, g: 0.0, b: 0.0 };
}

/// Physical display, backlight and LED, implemented once per frontend.
/// All calls are fire-and-forget from the core's point of view.
pub trait Screen {
    fn flush(&mut self, buffers: &FrameBuffer);
    fn set_led(&mut self, color: LedColor);
    fn set_backlight(&mut self, level: f32);
}
