//! Per-frame transform stages from object space to screen space.
//!
//! The chain is fixed: world -> cull -> view -> project -> divide -> center
//! -> shade. Stages are a closed enum and [`Pipeline::new`] rejects chains
//! that violate the required relative order, so a misassembled pipeline
//! fails at construction rather than rendering garbage.

use nalgebra::Matrix4;
use thiserror::Error;

use crate::geometry::{Shape, Triangle};
use crate::transform;
use crate::vector::Vector;

/// Camera and light state captured once per frame.
///
/// The host mutates its own camera between frames; the pipeline only ever
/// sees this immutable copy, so a frame cannot observe a half-updated
/// camera.
#[derive(Debug, Clone, Copy)]
pub struct CameraSnapshot {
    pub up: Vector,
    pub position: Vector,
    pub look: Vector,
    pub yaw: f64,
    pub light: Vector,
}

impl CameraSnapshot {
    /// Look-at matrix for this snapshot, with the look direction rotated by
    /// the yaw angle about the world y axis.
    pub fn view_matrix(&self) -> Matrix4<f64> {
        let look = self.look.transform(&transform::rotation_y(self.yaw));
        transform::look_at(&self.position, &(self.position + look), &self.up)
    }
}

/// One stage of the transform chain.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Object space to world space via the shape's placement matrix.
    World(Matrix4<f64>),
    /// Recompute the face normal and cull back-facing triangles against the
    /// camera position.
    Cull { camera: Vector },
    /// World space to camera space.
    View(Matrix4<f64>),
    /// Camera space to clip space.
    Project(Matrix4<f64>),
    /// Perspective divide of x, y, z by the homogeneous w.
    Divide,
    /// Map normalized device coordinates onto pixel coordinates.
    Center { half_width: f64, half_height: f64 },
    /// Bake directional-light intensity into the face color.
    Shade { light: Vector },
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Stage::World(_) => "world",
            Stage::Cull { .. } => "cull",
            Stage::View(_) => "view",
            Stage::Project(_) => "project",
            Stage::Divide => "divide",
            Stage::Center { .. } => "center",
            Stage::Shade { .. } => "shade",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Stage::World(_) => 0,
            Stage::Cull { .. } => 1,
            Stage::View(_) => 2,
            Stage::Project(_) => 3,
            Stage::Divide => 4,
            Stage::Center { .. } => 5,
            Stage::Shade { .. } => 6,
        }
    }

    /// Apply this stage to one triangle. Every stage passes triangles
    /// already culled through unchanged.
    fn apply(&self, triangle: Triangle) -> Triangle {
        if !triangle.is_visible() {
            return triangle;
        }
        match self {
            Stage::World(matrix) | Stage::View(matrix) | Stage::Project(matrix) => {
                let [v0, v1, v2] = *triangle.vertices();
                triangle.with_vertices([
                    v0.transform(matrix),
                    v1.transform(matrix),
                    v2.transform(matrix),
                ])
            }
            Stage::Cull { camera } => cull(triangle, camera),
            Stage::Divide => {
                let [v0, v1, v2] = *triangle.vertices();
                triangle.with_vertices([divide(v0), divide(v1), divide(v2)])
            }
            Stage::Center {
                half_width,
                half_height,
            } => {
                let [v0, v1, v2] = *triangle.vertices();
                triangle.with_vertices([
                    center(v0, *half_width, *half_height),
                    center(v1, *half_width, *half_height),
                    center(v2, *half_width, *half_height),
                ])
            }
            Stage::Shade { light } => shade(triangle, light),
        }
    }
}

fn cull(mut triangle: Triangle, camera: &Vector) -> Triangle {
    let [v0, v1, v2] = *triangle.vertices();
    let cross = (v1 - v0).cross(&(v2 - v0));
    if cross.length_squared() == 0.0 {
        // Zero-area triangle: no meaningful normal, never drawn.
        triangle.normal = Vector::ZERO;
        triangle.visible = false;
        return triangle;
    }
    triangle.normal = cross.normalize();
    triangle.visible = triangle.normal.dot(&(v0 - *camera)) > 0.0;
    triangle
}

fn divide(v: Vector) -> Vector {
    // w == 0 marks a point at infinity; pass it through untouched.
    if v.w == 0.0 {
        v
    } else {
        v / v.w
    }
}

fn center(v: Vector, half_width: f64, half_height: f64) -> Vector {
    Vector::with_w((v.x + 1.0) * half_width, (v.y + 1.0) * half_height, v.z, 0.0)
}

fn shade(mut triangle: Triangle, light: &Vector) -> Triangle {
    let intensity = if light.length_squared() == 0.0 {
        MIN_INTENSITY
    } else {
        triangle.normal.dot(&light.normalize()).max(MIN_INTENSITY)
    };
    triangle.color = shade_color(triangle.color, intensity);
    triangle
}

const MIN_INTENSITY: f64 = 0.1;

/// Scale the r, g, b channels of a packed 0xRRGGBBAA color, clamping each to
/// a byte and leaving alpha untouched.
fn shade_color(color: u32, intensity: f64) -> u32 {
    let r = ((color >> 24) & 0xFF) as f64 * intensity;
    let g = ((color >> 16) & 0xFF) as f64 * intensity;
    let b = ((color >> 8) & 0xFF) as f64 * intensity;
    let a = color & 0xFF;
    ((r.min(255.0) as u32) << 24) | ((g.min(255.0) as u32) << 16) | ((b.min(255.0) as u32) << 8) | a
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error("stage {later} cannot run before {earlier}")]
    OutOfOrder {
        earlier: &'static str,
        later: &'static str,
    },
    #[error("stage {0} appears more than once")]
    Duplicate(&'static str),
}

/// An ordered chain of stages applied to every triangle of a shape.
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Build a pipeline from explicit stages, validating that each stage
    /// appears at most once and in the required relative order. Stages may
    /// be omitted (useful in tests); they cannot be reordered.
    pub fn new(stages: Vec<Stage>) -> Result<Self, PipelineError> {
        for pair in stages.windows(2) {
            let (earlier, later) = (&pair[0], &pair[1]);
            if earlier.rank() == later.rank() {
                return Err(PipelineError::Duplicate(earlier.name()));
            }
            if earlier.rank() > later.rank() {
                return Err(PipelineError::OutOfOrder {
                    earlier: later.name(),
                    later: earlier.name(),
                });
            }
        }
        Ok(Self { stages })
    }

    /// The full seven-stage chain for one shape placement and one camera
    /// snapshot.
    pub fn standard(
        world: Matrix4<f64>,
        camera: &CameraSnapshot,
        projection: Matrix4<f64>,
        half_width: f64,
        half_height: f64,
    ) -> Self {
        Self {
            stages: vec![
                Stage::World(world),
                Stage::Cull {
                    camera: camera.position,
                },
                Stage::View(camera.view_matrix()),
                Stage::Project(projection),
                Stage::Divide,
                Stage::Center {
                    half_width,
                    half_height,
                },
                Stage::Shade {
                    light: camera.light,
                },
            ],
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run every source triangle through the chain and keep the visible
    /// ones, in mesh order. Source triangles are never mutated; each frame
    /// works on fresh copies.
    pub fn run(&self, shape: &Shape) -> Vec<Triangle> {
        shape
            .triangles()
            .iter()
            .filter_map(|source| {
                let mut triangle = *source;
                triangle.visible = true;
                for stage in &self.stages {
                    triangle = stage.apply(triangle);
                }
                triangle.is_visible().then_some(triangle)
            })
            .collect()
    }
}
