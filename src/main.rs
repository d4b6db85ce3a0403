use anyhow::Result;
use glam::DVec2;
use log::info;
use rusted_controls::core::math::approx_equal;
use rusted_controls::engine::input::{
    Code, ControlScheme, ControllerDelegate, ControllerModel, DeviceController, KeyboardPush,
    SharedController, VoidController, FIRE_ATTACK, FIRE_JUMP, FIRE_MENU, FIRE_SPECIAL,
};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

// Pause (P) is handled here so it keeps working while input is suppressed
fn is_pause_key(event: &KeyEvent) -> bool {
    event.physical_key == PhysicalKey::Code(KeyCode::KeyP)
        && event.state == ElementState::Pressed
        && !event.repeat
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting Rusted Controls demo...");

    // Wire the keyboard into the gameplay controller
    let keyboard = Rc::new(KeyboardPush::with_default_keys("Keyboard"));
    let gameplay = ControllerModel::shared();
    ControlScheme::keyboard_default().apply(&mut *gameplay.borrow_mut(), keyboard.clone())?;

    gameplay.borrow_mut().add_listener(Rc::new(
        |device: &str, code: Code, repr: char, active: bool| {
            let state = if active { "pressed" } else { "released" };
            info!("{} {} (code {}, '{}')", device, state, code, repr);
        },
    ));

    // Call sites hold the delegate; pausing swaps the controller behind it
    let paused = Rc::new(Cell::new(false));
    let mut controller = {
        let paused = paused.clone();
        let gameplay: SharedController = gameplay.clone();
        let suppressed = VoidController::shared();
        ControllerDelegate::new(move || {
            if paused.get() {
                suppressed.clone()
            } else {
                gameplay.clone()
            }
        })
    };

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Rusted Controls")
        .with_inner_size(winit::dpi::LogicalSize::new(640, 360))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created: WASD/arrows move, Space/J/K fire, P pauses, Escape quits");

    let mut last_frame = Instant::now();
    let mut last_direction = DVec2::ZERO;

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => {
                keyboard.release_all();
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                if is_pause_key(&event) {
                    paused.set(!paused.get());
                    info!("{}", if paused.get() { "Input paused" } else { "Input resumed" });
                }
                keyboard.process_event(&event);
            }
            Event::AboutToWait => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;

                if let Err(err) = controller.update(dt) {
                    log::error!("Controller update failed: {:#}", anyhow::Error::from(err));
                    elwt.exit();
                    return;
                }

                let direction = controller.direction();
                if !approx_equal(direction.x, last_direction.x, 1e-6)
                    || !approx_equal(direction.y, last_direction.y, 1e-6)
                {
                    info!("Direction: ({:+.1}, {:+.1})", direction.x, direction.y);
                    last_direction = direction;
                }

                for (index, label) in [
                    (FIRE_JUMP, "Jump"),
                    (FIRE_ATTACK, "Attack"),
                    (FIRE_SPECIAL, "Special"),
                ] {
                    if controller.is_fired_once(index) {
                        info!("{}!", label);
                    }
                }

                if controller.is_fired_once(FIRE_MENU) {
                    info!("Menu requested, shutting down...");
                    elwt.exit();
                }

                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
