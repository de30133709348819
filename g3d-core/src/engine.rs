//! Host-facing entry points: build once per process, call once per frame.

use nalgebra::Matrix4;

use crate::geometry::{ScreenTriangle, Shape, Triangle};
use crate::pipeline::{CameraSnapshot, Pipeline};
use crate::registry::ShapeRegistry;
use crate::transform;

/// Field-of-view and screen parameters, derived once from the output
/// dimensions and immutable afterwards.
#[derive(Debug, Clone, Copy)]
pub struct Fov {
    pub width: f64,
    pub height: f64,
    pub half_width: f64,
    pub half_height: f64,
    pub fov_degrees: f64,
    pub near: f64,
    pub far: f64,
}

impl Fov {
    pub const DEFAULT_FOV_DEGREES: f64 = 90.0;
    pub const DEFAULT_NEAR: f64 = 0.1;
    pub const DEFAULT_FAR: f64 = 1000.0;

    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            half_width: width / 2.0,
            half_height: height / 2.0,
            fov_degrees: Self::DEFAULT_FOV_DEGREES,
            near: Self::DEFAULT_NEAR,
            far: Self::DEFAULT_FAR,
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Scale factor derived from the field of view: the reciprocal of the
    /// half-angle in radians.
    pub fn fov_scale(&self) -> f64 {
        1.0 / (self.fov_degrees * std::f64::consts::PI / 360.0)
    }
}

/// Per-call rendering options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Sort output back-to-front by mean depth (painter's algorithm) before
    /// returning. Off by default: triangles come back in mesh order.
    pub depth_sort: bool,
}

/// Pipeline context: projection parameters, the projection matrix, and the
/// shape registry.
pub struct Engine {
    fov: Fov,
    projection: Matrix4<f64>,
    registry: ShapeRegistry,
}

impl Engine {
    pub fn new(width: f64, height: f64) -> Self {
        let fov = Fov::new(width, height);
        let projection = transform::projection(fov.aspect(), fov.fov_scale(), fov.near, fov.far);
        Self {
            fov,
            projection,
            registry: ShapeRegistry::new(),
        }
    }

    pub fn fov(&self) -> &Fov {
        &self.fov
    }

    pub fn projection(&self) -> &Matrix4<f64> {
        &self.projection
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ShapeRegistry {
        &mut self.registry
    }

    /// Transform every shape's triangles into screen space for one frame,
    /// returning shaded, pixel-space triangles for the rasterizer.
    pub fn render_frame(
        &self,
        camera: &CameraSnapshot,
        shapes: &[Shape],
        options: RenderOptions,
    ) -> Vec<ScreenTriangle> {
        let mut emitted: Vec<Triangle> = Vec::new();
        for shape in shapes {
            let pipeline = Pipeline::standard(
                transform::world(shape.rotation(), shape.location()),
                camera,
                self.projection,
                self.fov.half_width,
                self.fov.half_height,
            );
            emitted.extend(pipeline.run(shape));
        }
        if options.depth_sort {
            emitted.sort_by(|a, b| b.depth().total_cmp(&a.depth()));
        }
        emitted.iter().map(ScreenTriangle::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector;

    fn camera_at_origin() -> CameraSnapshot {
        CameraSnapshot {
            up: Vector::new(0.0, 1.0, 0.0),
            position: Vector::new(0.0, 0.0, 0.0),
            look: Vector::new(0.0, 0.0, 1.0),
            yaw: 0.0,
            light: Vector::new(0.0, 0.0, 1.0),
        }
    }

    #[test]
    fn test_engine_construction() {
        let engine = Engine::new(800.0, 600.0);
        assert!((engine.fov().aspect() - 800.0 / 600.0).abs() < 1e-12);
        assert!(engine.registry().instance("cube").is_some());

        let fov = engine.fov();
        let expected =
            transform::projection(fov.aspect(), fov.fov_scale(), fov.near, fov.far);
        assert!((engine.projection() - expected).norm() < 1e-12);
    }

    #[test]
    fn test_render_frame_emits_screen_triangles() {
        let engine = Engine::new(800.0, 600.0);
        let mut cube = engine.registry().instance("cube").unwrap();
        cube.locate(0.0, 0.0, 9.0);

        let out = engine.render_frame(&camera_at_origin(), &[cube], RenderOptions::default());
        assert!(!out.is_empty());
        assert!(out.len() <= 12);
        for triangle in &out {
            for point in &triangle.points {
                assert!(point[0].is_finite() && point[1].is_finite());
                assert!(point[0] >= 0.0 && point[0] <= 800.0);
                assert!(point[1] >= 0.0 && point[1] <= 600.0);
            }
        }
    }

    #[test]
    fn test_depth_sort_is_opt_in() {
        let near = Triangle::new(
            Vector::new(0.0, 0.0, 5.0),
            Vector::new(1.0, 0.0, 5.0),
            Vector::new(0.0, 1.0, 5.0),
            0x11111111,
        );
        let far = Triangle::new(
            Vector::new(0.0, 0.0, 9.0),
            Vector::new(1.0, 0.0, 9.0),
            Vector::new(0.0, 1.0, 9.0),
            0x22222222,
        );
        let engine = Engine::new(800.0, 600.0);
        let shape = Shape::new(vec![near, far]);
        let camera = camera_at_origin();

        // Mesh order by default.
        let plain = engine.render_frame(&camera, std::slice::from_ref(&shape), RenderOptions::default());
        assert_eq!(plain.len(), 2);
        assert_eq!(plain[0].rgba()[3], 0x11);

        // Back-to-front when requested.
        let sorted = engine.render_frame(
            &camera,
            std::slice::from_ref(&shape),
            RenderOptions { depth_sort: true },
        );
        assert_eq!(sorted.len(), 2);
        assert_eq!(sorted[0].rgba()[3], 0x22);
    }
}
