use embedded_graphics::prelude::RgbColor;
use skyhat_core::display::{LedColor, Screen};
use skyhat_core::framebuffer::{FrameBuffer, HEIGHT, WIDTH};
use skyhat_core::input::{ButtonState, Buttons};

const LED_SWATCH: usize = 10;

/// Simulated HAT: a minifb window stands in for the panel, the A/B/X/Y keys
/// for the face buttons, a corner swatch for the RGB LED and a brightness
/// scale on the blit for the backlight.
pub struct MinifbScreen {
    window: minifb::Window,
    display_buffer: Vec<u32>,
    led: LedColor,
    backlight: f32,
    buttons: ButtonState,
}

impl MinifbScreen {
    pub fn new(window: minifb::Window) -> Self {
        Self {
            window,
            display_buffer: vec![0xFF00_0000; WIDTH * HEIGHT],
            led: LedColor::OFF,
            backlight: 1.0,
            buttons: ButtonState::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(minifb::Key::Escape)
    }

    pub fn update(&mut self) {
        self.window.update();
        let mut current: u8 = 0;
        if self.window.is_key_down(minifb::Key::A) {
            current |= 1 << (Buttons::A as u8);
        }
        if self.window.is_key_down(minifb::Key::B) {
            current |= 1 << (Buttons::B as u8);
        }
        if self.window.is_key_down(minifb::Key::X) {
            current |= 1 << (Buttons::X as u8);
        }
        if self.window.is_key_down(minifb::Key::Y) {
            current |= 1 << (Buttons::Y as u8);
        }
        self.buttons.update(current);
    }

    pub fn buttons(&self) -> ButtonState {
        self.buttons
    }

    fn led_argb(&self) -> u32 {
        // LED channels are PWM duties around 0.1; exaggerate for visibility.
        let scale = |v: f32| ((v * 10.0).clamp(0.0, 1.0) * 255.0) as u32;
        0xFF00_0000 | (scale(self.led.r) << 16) | (scale(self.led.g) << 8) | scale(self.led.b)
    }

    fn paint_led_swatch(&mut self) {
        let argb = self.led_argb();
        for y in 0..LED_SWATCH {
            for x in 0..LED_SWATCH {
                self.display_buffer[y * WIDTH + (WIDTH - LED_SWATCH + x)] = argb;
            }
        }
    }

    fn present(&mut self) {
        if let Err(err) = self
            .window
            .update_with_buffer(&self.display_buffer, WIDTH, HEIGHT)
        {
            log::error!("window blit failed: {err}");
        }
    }
}

impl Screen for MinifbScreen {
    fn flush(&mut self, buffers: &FrameBuffer) {
        // A PC monitor has no real backlight; approximate the dimming so the
        // simulated panel stays readable at device duty levels.
        let level = 0.4 + 0.6 * self.backlight.clamp(0.0, 1.0);
        for (i, px) in buffers.data().iter().enumerate() {
            let r = (((px.r() as u32) << 3) as f32 * level) as u32;
            let g = (((px.g() as u32) << 2) as f32 * level) as u32;
            let b = (((px.b() as u32) << 3) as f32 * level) as u32;
            self.display_buffer[i] = 0xFF00_0000 | (r << 16) | (g << 8) | b;
        }
        self.paint_led_swatch();
        self.present();
    }

    fn set_led(&mut self, color: LedColor) {
        if self.led == color {
            return;
        }
        self.led = color;
        // Repaint immediately so the busy light shows during a slow fetch.
        self.paint_led_swatch();
        self.present();
    }

    fn set_backlight(&mut self, level: f32) {
        self.backlight = level;
    }
}
