//! Terminal host for the g3d pipeline: raw-mode event loop, keyboard camera
//! movement, and character-cell rasterization of the core's output.

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use g3d_core::{Engine, RenderOptions, Shape};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod camera;
pub mod rasterizer;

pub use camera::Camera;
pub use rasterizer::Rasterizer;

/// Camera movement per key press, in world units.
const MOVE_STEP: f64 = 0.2;
/// Yaw rotation per key press, in radians.
const YAW_STEP: f64 = 0.01;

/// Main application struct for terminal 3D rendering.
pub struct TerminalApp {
    engine: Engine,
    camera: Camera,
    shapes: Vec<Shape>,
    rasterizer: Rasterizer,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    spin: f64,
}

impl TerminalApp {
    /// The rasterizer is sized from the engine's field of view, so build the
    /// engine with the terminal's dimensions.
    pub fn new(engine: Engine, shapes: Vec<Shape>) -> Self {
        let width = engine.fov().width as usize;
        let height = engine.fov().height as usize;
        Self {
            engine,
            camera: Camera::new(),
            shapes,
            rasterizer: Rasterizer::new(width, height),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            spin: 0.0,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            if event::poll(Duration::from_millis(0))? {
                self.handle_input()?;
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if let Event::Key(KeyEvent { code, .. }) = event::read()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.running = false;
                }
                KeyCode::Char('w') => {
                    self.camera.move_forward(MOVE_STEP);
                }
                KeyCode::Char('s') => {
                    self.camera.move_forward(-MOVE_STEP);
                }
                KeyCode::Char('a') => {
                    self.camera.rotate_yaw(-YAW_STEP);
                }
                KeyCode::Char('d') => {
                    self.camera.rotate_yaw(YAW_STEP);
                }
                KeyCode::Left => {
                    self.camera.strafe(MOVE_STEP);
                }
                KeyCode::Right => {
                    self.camera.strafe(-MOVE_STEP);
                }
                KeyCode::Up => {
                    self.camera.rise(MOVE_STEP);
                }
                KeyCode::Down => {
                    self.camera.rise(-MOVE_STEP);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn update(&mut self) {
        // Continuous slow rotation for demo effect
        self.spin += 0.01;
        for shape in &mut self.shapes {
            shape.rotate(self.spin * 0.5, self.spin * 2.0 / 3.0, self.spin);
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let snapshot = self.camera.snapshot();
        let triangles = self.engine.render_frame(
            &snapshot,
            &self.shapes,
            RenderOptions { depth_sort: true },
        );

        self.rasterizer.clear();
        for triangle in &triangles {
            self.rasterizer.fill(triangle);
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.rasterizer.draw(&mut stdout)?;

        // Status overlay
        let position = self.camera.position();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "g3d | FPS: {:.1} | camera: {:.1}, {:.1}, {:.1} | W/S=Move A/D=Turn Arrows=Strafe/Raise Q=Quit",
                self.fps, position.x, position.y, position.z
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
