use anyhow::Result;
use glam::Vec2;
use input_actions::engine::input::{
    default_bindings, ActionListener, BindingConfig, InputManager, MouseListener,
};
use input_actions::engine::tick::TickScheduler;
use log::info;
use std::cell::RefCell;
use std::rc::Rc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

/// Walking speed in units per second
const MOVE_SPEED: f32 = 120.0;
const DUCK_SPEED: f32 = 40.0;

/// Moves a point around and logs what the movement category does
#[derive(Debug, Default)]
struct PlayerController {
    position: Vec2,
    ducking: bool,
    jumps: u32,
}

impl PlayerController {
    fn step(&mut self, input: &mut InputManager, dt: f32) {
        let mut direction = 0.0;
        if input.is_action_held("move_left") {
            direction -= 1.0;
        }
        if input.is_action_held("move_right") {
            direction += 1.0;
        }
        let speed = if self.ducking { DUCK_SPEED } else { MOVE_SPEED };
        self.position.x += direction * speed * dt;

        // Buffered so a press a few ticks early still counts
        if !self.ducking && input.consume_buffered_action("jump") {
            self.jumps += 1;
            info!("Jump #{} at x = {:.1}", self.jumps, self.position.x);
        }
    }
}

impl ActionListener for PlayerController {
    fn on_action_triggered(&mut self, action: &str) {
        if action == "duck" {
            self.ducking = true;
        }
        info!("{action} pressed at x = {:.1}", self.position.x);
    }

    fn on_action_released(&mut self, action: &str) {
        if action == "duck" {
            self.ducking = false;
        }
        info!("{action} released at x = {:.1}", self.position.x);
    }

    fn on_action_held(&mut self, action: &str, hold_ms: u64) {
        log::debug!("{action} held for {hold_ms}ms");
    }
}

struct PointerLogger;

impl MouseListener for PointerLogger {
    fn on_mouse_moved(&mut self, position: Vec2, delta: Vec2) {
        log::trace!("Cursor at {position} (moved {delta})");
    }

    fn on_mouse_scrolled(&mut self, scroll_delta: i32) {
        info!("Scrolled {scroll_delta}");
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting input actions demo...");

    let bindings = match std::env::args().nth(1) {
        Some(path) => BindingConfig::load(path)?,
        None => default_bindings(),
    };

    let mut input = InputManager::new();
    bindings.apply(&mut input)?;

    let player = Rc::new(RefCell::new(PlayerController::default()));
    input.add_category_listener("movement", player.clone());
    input.add_category_listener("combat", player.clone());
    input.add_mouse_listener(Rc::new(RefCell::new(PointerLogger)));

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Input Actions")
        .with_inner_size(winit::dpi::LogicalSize::new(800, 600))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created, press Escape to quit");

    let devices = input.device_sink();
    let mut scheduler = TickScheduler::default();
    let dt = scheduler.step().as_secs_f32();

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                if devices.handle_window_event(&event) {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested => {
                        info!("Close requested, shutting down...");
                        elwt.exit();
                    }
                    // Keys released while unfocused never reach us
                    WindowEvent::Focused(false) => devices.reset(),
                    _ => {}
                }
            }
            Event::AboutToWait => {
                for _ in 0..scheduler.begin_frame() {
                    input.update();
                    player.borrow_mut().step(&mut input, dt);

                    if input.consume_buffered_action("pause") {
                        info!("Pause pressed, shutting down...");
                        elwt.exit();
                    }
                }
                elwt.set_control_flow(ControlFlow::WaitUntil(scheduler.next_tick_at()));
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
