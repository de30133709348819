//! Example: load and render a model file in the terminal.
//!
//! Usage: cargo run --example load_model -- path/to/model.obj

use std::env;
use std::io;
use std::path::Path;

use crossterm::terminal;
use g3d_core::Engine;
use g3d_terminal::TerminalApp;

fn main() -> io::Result<()> {
    env_logger::init();

    let (width, height) = terminal::size()?;
    let mut engine = Engine::new(width as f64, height as f64);

    let name = match env::args().nth(1) {
        Some(path) => {
            println!("Loading model: {path}");
            engine
                .registry_mut()
                .load("model", Path::new(&path))
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
            "model"
        }
        None => {
            eprintln!("No model file provided, using the built-in cube...");
            "cube"
        }
    };

    let mut shape = engine
        .registry()
        .instance(name)
        .expect("the cube is always registered");
    shape.locate(0.0, 0.0, 9.0);

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(engine, vec![shape]);
    app.run()
}
