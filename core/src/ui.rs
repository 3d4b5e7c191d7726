extern crate alloc;

use alloc::format;
use alloc::string::String;

use chrono::DateTime;
use embedded_graphics::{
    Drawable,
    mono_font::{MonoTextStyle, ascii::{FONT_6X10, FONT_10X20}},
    pixelcolor::Rgb565,
    prelude::{Point, RgbColor},
    text::Text,
};

use crate::framebuffer::{FrameBuffer, HEIGHT, WIDTH};
use crate::weather::{IconData, WeatherSnapshot};

/// Baseline of the top heading row.
pub const HEADER_Y: i32 = 20;
pub const LINE_HEIGHT: i32 = 24;
pub const SMALL_LINE_HEIGHT: i32 = 20;

const ICON_SIZE: i32 = 64;
const CELL_ICON_SIZE: i32 = 40;
const MARGIN_X: i32 = 16;

pub fn clear(buffers: &mut FrameBuffer) {
    buffers.clear_screen(Rgb565::BLACK);
}

pub fn text(buffers: &mut FrameBuffer, content: &str, x: i32, y: i32, color: Rgb565) {
    let style = MonoTextStyle::new(&FONT_10X20, color);
    Text::new(content, Point::new(x, y), style).draw(buffers).ok();
}

pub fn small_text(buffers: &mut FrameBuffer, content: &str, x: i32, y: i32, color: Rgb565) {
    let style = MonoTextStyle::new(&FONT_6X10, color);
    Text::new(content, Point::new(x, y), style).draw(buffers).ok();
}

/// "%a %d %b, %H:%M" long form, "%H:%M %a" short form.
pub fn timestamp_str(timestamp: i64, short: bool) -> String {
    let Some(datetime) = DateTime::from_timestamp(timestamp, 0) else {
        return String::from("--:--");
    };
    let fmt = if short { "%H:%M %a" } else { "%a %d %b, %H:%M" };
    format!("{}", datetime.format(fmt))
}

/// Full-page layout for one snapshot: icon top-right, readings down the left,
/// observation time along the bottom.
pub fn paint_weather(buffers: &mut FrameBuffer, snapshot: &WeatherSnapshot, icon: Option<&IconData>) {
    if let Some(icon) = icon {
        draw_icon(buffers, icon, WIDTH as i32 - ICON_SIZE - 12, 10, ICON_SIZE, ICON_SIZE);
    }
    text(buffers, &format!("{:.1} C", snapshot.temperature), MARGIN_X, 96, Rgb565::WHITE);
    text(
        buffers,
        &format!("feels like {:.1} C", snapshot.feels_like),
        MARGIN_X,
        96 + LINE_HEIGHT,
        Rgb565::WHITE,
    );
    text(
        buffers,
        &format!("humidity {}%", snapshot.humidity),
        MARGIN_X,
        96 + LINE_HEIGHT * 2,
        Rgb565::WHITE,
    );
    if let Some(location) = &snapshot.location {
        text(buffers, location, MARGIN_X, 96 + LINE_HEIGHT * 3, Rgb565::WHITE);
    }
    small_text(
        buffers,
        &timestamp_str(snapshot.timestamp, false),
        MARGIN_X,
        HEIGHT as i32 - 12,
        Rgb565::WHITE,
    );
}

/// Quadrant layout for the grid view, cell origin at `(x, y)`.
pub fn paint_weather_small(
    buffers: &mut FrameBuffer,
    snapshot: &WeatherSnapshot,
    icon: Option<&IconData>,
    x: i32,
    y: i32,
) {
    small_text(
        buffers,
        &timestamp_str(snapshot.timestamp, true),
        x + 8,
        y + 18,
        Rgb565::WHITE,
    );
    text(buffers, &format!("{:.1} C", snapshot.temperature), x + 8, y + 44, Rgb565::WHITE);
    small_text(
        buffers,
        &format!("hum {}%", snapshot.humidity),
        x + 8,
        y + 62,
        Rgb565::WHITE,
    );
    if let Some(icon) = icon {
        draw_icon(buffers, icon, x + 160 - CELL_ICON_SIZE - 8, y + 8, CELL_ICON_SIZE, CELL_ICON_SIZE);
    }
}

pub fn paint_placeholder(buffers: &mut FrameBuffer) {
    text(buffers, "No data yet", MARGIN_X, 96, Rgb565::WHITE);
    small_text(
        buffers,
        "waiting for the first successful fetch",
        MARGIN_X,
        96 + SMALL_LINE_HEIGHT,
        Rgb565::WHITE,
    );
}

/// Nearest-neighbour RGBA blit; pixels below half alpha stay transparent.
pub fn draw_icon(
    buffers: &mut FrameBuffer,
    icon: &IconData,
    x: i32,
    y: i32,
    target_w: i32,
    target_h: i32,
) {
    if icon.width == 0 || icon.height == 0 || target_w <= 0 || target_h <= 0 {
        return;
    }
    for ty in 0..target_h {
        let sy = (ty as i64 * icon.height as i64 / target_h as i64) as u32;
        for tx in 0..target_w {
            let sx = (tx as i64 * icon.width as i64 / target_w as i64) as u32;
            let idx = ((sy * icon.width + sx) * 4) as usize;
            let Some(px) = icon.pixels.get(idx..idx + 4) else {
                continue;
            };
            if px[3] < 128 {
                continue;
            }
            buffers.set_pixel(x + tx, y + ty, Rgb565::new(px[0] >> 3, px[1] >> 2, px[2] >> 3));
        }
    }
}
