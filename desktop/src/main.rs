use std::net::UdpSocket;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use skyhat_core::{
    app::App,
    framebuffer::{FrameBuffer, HEIGHT, WIDTH},
    views::ViewKind,
    weather::WeatherSource,
};

use crate::display::MinifbScreen;
use crate::fixture::FixtureSource;
use crate::owm::OwmSource;

mod display;
mod fixture;
mod owm;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if dotenvy::dotenv().is_ok() {
        log::info!("Loaded environment from .env");
    }

    log::info!("Skyhat desktop simulator started");

    match OwmSource::from_env() {
        Ok(mut source) => run(&mut source),
        Err(reason) => {
            log::warn!("OpenWeatherMap not configured ({reason}); using fixture data");
            run(&mut FixtureSource::new());
        }
    }
}

fn run<S: WeatherSource>(source: &mut S) {
    let mut window = minifb::Window::new(
        "Skyhat Desktop",
        WIDTH,
        HEIGHT,
        minifb::WindowOptions {
            scale: minifb::Scale::X2,
            ..minifb::WindowOptions::default()
        },
    )
    .unwrap_or_else(|e| {
        panic!("Unable to open window: {}", e);
    });

    window.set_target_fps(60);

    let mut buffers = Box::new(FrameBuffer::new());
    let mut screen = MinifbScreen::new(window);
    let mut app = App::new(&mut *buffers, source, interface_summary());
    app.switch_to(ViewKind::Page, &mut screen, unix_now());

    // Button sampling, the tick accumulator and every render run on this one
    // thread; nothing else touches application state.
    let mut last = Instant::now();
    while screen.is_open() {
        screen.update();
        let elapsed_ms = last.elapsed().as_millis() as u32;
        last = Instant::now();
        let buttons = screen.buttons();
        app.handle_buttons(&buttons, &mut screen, unix_now());
        app.advance(elapsed_ms, &mut screen, unix_now());
    }
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Outbound-interface summary shown on the errors view. Connecting a UDP
/// socket picks the routed local address without sending any packets.
fn interface_summary() -> Vec<String> {
    log::info!("Working out ip addresses...");
    let probe = || -> std::io::Result<String> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect("8.8.8.8:80")?;
        Ok(socket.local_addr()?.ip().to_string())
    };
    match probe() {
        Ok(ip) => vec![format!("ip: {ip}")],
        Err(_) => vec![String::from("No IP addr")],
    }
}
