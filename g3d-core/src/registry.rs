//! Named shape templates: procedural built-ins plus file-loaded models.

use std::collections::HashMap;
use std::path::Path;

use log::info;

use crate::geometry::{Shape, Triangle};
use crate::obj::{self, LoadError};
use crate::vector::Vector;

/// Registry owning the canonical shape templates for the process lifetime.
/// Callers never get the template itself; [`ShapeRegistry::instance`] hands
/// out deep copies so per-instance placement can't corrupt shared geometry.
pub struct ShapeRegistry {
    shapes: HashMap<String, Shape>,
}

impl ShapeRegistry {
    /// Registry pre-populated with the built-in unit cube.
    pub fn new() -> Self {
        let mut registry = Self {
            shapes: HashMap::new(),
        };
        registry.insert("cube", cube());
        registry
    }

    pub fn insert(&mut self, name: impl Into<String>, shape: Shape) {
        self.shapes.insert(name.into(), shape);
    }

    /// Load a model file and register it under `name`.
    pub fn load(&mut self, name: &str, path: &Path) -> Result<(), LoadError> {
        let shape = obj::load_obj(path)?;
        info!(
            "registered shape {:?} with {} triangles",
            name,
            shape.triangles().len()
        );
        self.insert(name, shape);
        Ok(())
    }

    /// Deep copy of the named template, if registered.
    pub fn instance(&self, name: &str) -> Option<Shape> {
        self.shapes.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in unit cube: corners on 0/1 coordinates, two triangles per
/// face, one solid color per face.
pub fn cube() -> Shape {
    let p = [
        Vector::new(0.0, 0.0, 0.0),
        Vector::new(0.0, 1.0, 0.0),
        Vector::new(1.0, 1.0, 0.0),
        Vector::new(1.0, 0.0, 0.0),
        Vector::new(0.0, 0.0, 1.0),
        Vector::new(0.0, 1.0, 1.0),
        Vector::new(1.0, 1.0, 1.0),
        Vector::new(1.0, 0.0, 1.0),
    ];
    let faces: [([usize; 3], [usize; 3], u32); 6] = [
        // Front
        ([0, 1, 2], [0, 2, 3], 0xFF0000FF),
        // Left
        ([4, 5, 1], [4, 1, 0], 0xFFFF00FF),
        // Back
        ([7, 6, 5], [7, 5, 4], 0x00FF00FF),
        // Right
        ([3, 2, 6], [3, 6, 7], 0x00FFFFFF),
        // Top
        ([1, 5, 6], [1, 6, 2], 0x0000FFFF),
        // Bottom
        ([4, 0, 3], [4, 3, 7], 0xFF00FFFF),
    ];

    let mut triangles = Vec::with_capacity(12);
    for (first, second, color) in faces {
        triangles.push(Triangle::new(p[first[0]], p[first[1]], p[first[2]], color));
        triangles.push(Triangle::new(p[second[0]], p[second[1]], p[second[2]], color));
    }
    Shape::new(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_twelve_triangles() {
        assert_eq!(cube().triangles().len(), 12);
    }

    #[test]
    fn test_registry_starts_with_cube() {
        let registry = ShapeRegistry::new();
        assert!(registry.instance("cube").is_some());
        assert!(registry.instance("teapot").is_none());
    }

    #[test]
    fn test_instances_are_independent() {
        let registry = ShapeRegistry::new();
        let mut first = registry.instance("cube").unwrap();
        first.locate(10.0, 0.0, 0.0).rotate(1.0, 2.0, 3.0);

        let second = registry.instance("cube").unwrap();
        assert_eq!(*second.location(), Vector::new(0.0, 0.0, 0.0));
        assert_eq!(*second.rotation(), Vector::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_insert_and_instance_roundtrip() {
        let mut registry = ShapeRegistry::new();
        registry.insert("empty", Shape::new(Vec::new()));
        assert_eq!(registry.instance("empty").unwrap().triangles().len(), 0);
    }
}
