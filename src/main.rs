mod canvas;
mod clock;
mod color;
mod display;
mod error;
mod renderer;
mod time;
mod timer;

use std::time::Instant;

use log::{error, info};
use pixels::{Pixels, SurfaceTexture};
use structopt::StructOpt;
use winit::{
    dpi::LogicalSize,
    event::{Event, VirtualKeyCode},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};
use winit_input_helper::WinitInputHelper;

use crate::canvas::{Canvas, FrameCanvas};
use crate::clock::Clock;
use crate::error::Error;
use crate::renderer::FrameRenderer;
use crate::time::SystemTime;

// Same as an unsized HTML canvas.
const INITIAL_WIDTH: u32 = 300;
const INITIAL_HEIGHT: u32 = 150;

const WIDTH_STEP: u32 = 20;
const MIN_WIDTH: u32 = 40;

#[derive(Debug, StructOpt)]
#[structopt(name = "binary-clock", about = "Shows the current time as a binary clock.")]
struct Opt {
    /// Size of each cell in pixels
    #[structopt(long, default_value = "30")]
    size: u32,

    /// Space between cells in pixels
    #[structopt(long, default_value = "2")]
    spacing: u32,

    /// Also show hundredths of a second
    #[structopt(short = "m", long)]
    hundredths: bool,

    /// Width to show the clock at, in logical pixels
    #[structopt(long)]
    width: Option<u32>,

    /// Wait for a start key instead of starting right away
    #[structopt(long)]
    paused: bool,
}

type SystemClock = Clock<FrameCanvas, SystemTime>;

fn title(clock: &SystemClock) -> String {
    let state = if clock.is_running() { "running" } else { "stopped" };
    let hundredths = if clock.hundredths() { ", hundredths" } else { "" };
    format!("Binary Clock ({}{})", state, hundredths)
}

fn apply_width(window: &Window, canvas: &FrameCanvas, width: u32) {
    let height = width as f64 * canvas.height() as f64 / canvas.width().max(1) as f64;
    window.set_inner_size(LogicalSize::new(width as f64, height));
}

fn main() {
    env_logger::init();
    let opt = Opt::from_args();
    if let Err(e) = run(opt) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(opt: Opt) -> Result<(), Error> {
    let mut clock = Clock::new(
        FrameCanvas::new(INITIAL_WIDTH, INITIAL_HEIGHT),
        SystemTime,
        opt.size as f64,
        opt.spacing as f64,
    )?;
    clock.set_hundredths(opt.hundredths);
    if !opt.paused {
        clock.start(Instant::now());
    }
    if let Some(width) = opt.width {
        clock.resize(width.max(MIN_WIDTH));
    }

    let event_loop = EventLoop::new();
    let mut input = WinitInputHelper::new();
    let window = {
        let canvas = clock.canvas();
        let size = LogicalSize::new(canvas.width(), canvas.height());
        WindowBuilder::new()
            .with_title(title(&clock))
            .with_inner_size(size)
            .build(&event_loop)?
    };
    if let Some(width) = clock.display_width() {
        apply_width(&window, clock.canvas(), width);
    }

    let mut shown_title = title(&clock);
    let mut buffer_size = (clock.canvas().width(), clock.canvas().height());
    let mut pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(buffer_size.0, buffer_size.1, surface_texture)?
    };
    let renderer = FrameRenderer;

    event_loop.run(move |event, _, control_flow| {
        if let Event::RedrawRequested(_) = event {
            let canvas = clock.canvas();
            let size = (canvas.width(), canvas.height());
            if size != buffer_size {
                pixels.resize_buffer(size.0, size.1);
                buffer_size = size;
            }
            renderer.draw(canvas, pixels.get_frame());
            if pixels
                .render()
                .map_err(|e| error!("pixels.render() failed: {}", e))
                .is_err()
            {
                *control_flow = ControlFlow::Exit;
                return;
            }
        }

        if input.update(&event) {
            // Close events
            if input.key_pressed(VirtualKeyCode::Escape) || input.quit() {
                *control_flow = ControlFlow::Exit;
                return;
            }

            let mut dirty = false;

            if input.key_pressed(VirtualKeyCode::S) || input.key_pressed(VirtualKeyCode::Return) {
                clock.start(Instant::now());
                let width = clock.display_width().unwrap_or_else(|| clock.canvas().width());
                apply_width(&window, clock.canvas(), width);
                dirty = true;
            }
            if input.key_pressed(VirtualKeyCode::Space) || input.key_pressed(VirtualKeyCode::P) {
                clock.stop();
                dirty = true;
            }
            if input.key_pressed(VirtualKeyCode::C) || input.key_pressed(VirtualKeyCode::Delete) {
                clock.clear();
                dirty = true;
            }
            if input.key_pressed(VirtualKeyCode::M) {
                clock.set_hundredths(!clock.hundredths());
                info!("Hundredths {}", if clock.hundredths() { "on" } else { "off" });
                dirty = true;
            }

            let grow = input.key_pressed(VirtualKeyCode::Plus)
                || input.key_pressed(VirtualKeyCode::Equals)
                || input.key_pressed(VirtualKeyCode::NumpadAdd);
            let shrink = input.key_pressed(VirtualKeyCode::Minus)
                || input.key_pressed(VirtualKeyCode::NumpadSubtract);
            if grow || shrink {
                let current = clock
                    .display_width()
                    .unwrap_or_else(|| clock.canvas().width());
                let width = if grow {
                    current.saturating_add(WIDTH_STEP)
                } else {
                    current.saturating_sub(WIDTH_STEP).max(MIN_WIDTH)
                };
                clock.resize(width);
                apply_width(&window, clock.canvas(), width);
            }

            // Resize the window
            if let Some(size) = input.window_resized() {
                pixels.resize_surface(size.width, size.height);
                dirty = true;
            }

            if clock.poll(Instant::now()) {
                dirty = true;
            }

            if dirty {
                let current = title(&clock);
                if current != shown_title {
                    window.set_title(&current);
                    shown_title = current;
                }
                window.request_redraw();
            }
        }

        *control_flow = match clock.next_deadline() {
            Some(deadline) => ControlFlow::WaitUntil(deadline),
            None => ControlFlow::Wait,
        };
    })
}
