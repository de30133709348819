//! g3d terminal demo - rotating cube
//!
//! Renders the built-in cube, or a model file given as the first argument,
//! with keyboard camera movement. Controls:
//!   - W/S: Move forward/backward
//!   - A/D: Turn left/right
//!   - Arrow keys: Strafe and raise/lower
//!   - Q/ESC: Quit

use std::env;
use std::io;
use std::path::Path;

use crossterm::terminal;
use g3d_core::Engine;
use g3d_terminal::TerminalApp;
use log::error;

fn main() -> io::Result<()> {
    env_logger::init();

    let (width, height) = terminal::size()?;
    let mut engine = Engine::new(width as f64, height as f64);

    let mut name = "cube";
    if let Some(path) = env::args().nth(1) {
        match engine.registry_mut().load("model", Path::new(&path)) {
            Ok(()) => name = "model",
            Err(err) => error!("using the built-in cube instead: {err}"),
        }
    }

    let mut shape = engine
        .registry()
        .instance(name)
        .expect("the cube is always registered");
    shape.locate(0.0, 0.0, 9.0);

    let mut app = TerminalApp::new(engine, vec![shape]);
    app.run()
}
