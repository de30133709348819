//! Loader for a line-oriented polygon-mesh text format.
//!
//! Two record kinds, keyed by a two-character prefix: `v x y z` declares a
//! vertex position (an optional fourth number is tolerated and ignored) and
//! `f i j k` declares a triangular face referencing earlier vertices by
//! 1-based index. Blank lines and lines with any other prefix are skipped.
//! The first malformed line fails the whole load.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use nom::character::complete::{i64 as int64, space0, space1};
use nom::combinator::{all_consuming, opt};
use nom::number::complete::double;
use nom::sequence::preceded;
use nom::IResult;
use thiserror::Error;

use crate::geometry::{Shape, Triangle};
use crate::vector::Vector;

/// Color assigned to faces the format itself carries no color for.
const FACE_COLOR: u32 = 0xFFFFFFFF;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("bad vertex on line {line}: {text}")]
    BadVertex { line: usize, text: String },
    #[error("bad face on line {line}: {text}")]
    BadFace { line: usize, text: String },
    #[error("face index {index} out of range on line {line}: {text}")]
    FaceIndexOutOfRange {
        line: usize,
        index: i64,
        text: String,
    },
}

/// Read and parse a model file into a shape.
pub fn load_obj(path: &Path) -> Result<Shape, LoadError> {
    let input = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let shape = parse_obj(&input)?;
    debug!(
        "loaded {} triangles from {}",
        shape.triangles().len(),
        path.display()
    );
    Ok(shape)
}

/// Parse model text into a shape. Faces reference the global vertex list
/// accumulated from all `v` lines seen so far.
pub fn parse_obj(input: &str) -> Result<Shape, LoadError> {
    let mut points: Vec<Vector> = Vec::new();
    let mut triangles: Vec<Triangle> = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let number = index + 1;
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        match line.get(..2) {
            Some("v ") => points.push(parse_vertex(&line[2..], number, line)?),
            Some("f ") => triangles.push(parse_face(&points, &line[2..], number, line)?),
            _ => {}
        }
    }

    Ok(Shape::new(triangles))
}

fn parse_vertex(fields: &str, number: usize, line: &str) -> Result<Vector, LoadError> {
    all_consuming(vertex_fields)(fields)
        .map(|(_, v)| v)
        .map_err(|_| LoadError::BadVertex {
            line: number,
            text: line.to_string(),
        })
}

fn vertex_fields(input: &str) -> IResult<&str, Vector> {
    let (input, _) = space0(input)?;
    let (input, x) = double(input)?;
    let (input, y) = preceded(space1, double)(input)?;
    let (input, z) = preceded(space1, double)(input)?;
    let (input, _) = opt(preceded(space1, double))(input)?;
    let (input, _) = space0(input)?;
    Ok((input, Vector::new(x, y, z)))
}

fn parse_face(
    points: &[Vector],
    fields: &str,
    number: usize,
    line: &str,
) -> Result<Triangle, LoadError> {
    let (_, indices) =
        all_consuming(face_fields)(fields).map_err(|_| LoadError::BadFace {
            line: number,
            text: line.to_string(),
        })?;
    let mut corners = [Vector::ZERO; 3];
    for (corner, &index) in corners.iter_mut().zip(indices.iter()) {
        if index < 1 || index as usize > points.len() {
            return Err(LoadError::FaceIndexOutOfRange {
                line: number,
                index,
                text: line.to_string(),
            });
        }
        *corner = points[index as usize - 1];
    }
    Ok(Triangle::new(corners[0], corners[1], corners[2], FACE_COLOR))
}

fn face_fields(input: &str) -> IResult<&str, [i64; 3]> {
    let (input, _) = space0(input)?;
    let (input, i) = int64(input)?;
    let (input, j) = preceded(space1, int64)(input)?;
    let (input, k) = preceded(space1, int64)(input)?;
    let (input, _) = space0(input)?;
    Ok((input, [i, j, k]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_vertices_and_face() {
        let shape = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(shape.triangles().len(), 1);
        let vertices = shape.triangles()[0].vertices();
        assert_eq!(vertices[0], Vector::new(0.0, 0.0, 0.0));
        assert_eq!(vertices[1], Vector::new(1.0, 0.0, 0.0));
        assert_eq!(vertices[2], Vector::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_skips_blanks_and_unknown_prefixes() {
        let input = "# model\n\nv 0 0 0\nvn 0 1 0\nv 1 0 0\nv 0 1 0\no thing\nf 1 2 3\n";
        let shape = parse_obj(input).unwrap();
        assert_eq!(shape.triangles().len(), 1);
    }

    #[test]
    fn test_tolerates_fourth_vertex_field() {
        let shape = parse_obj("v 0 0 0 1.0\nv 1 0 0 1.0\nv 0 1 0 1.0\nf 1 2 3\n").unwrap();
        assert_eq!(shape.triangles().len(), 1);
    }

    #[test]
    fn test_rejects_malformed_vertex() {
        let err = parse_obj("v 0 0 0\nv 1 nope 0\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::BadVertex { line: 2, ref text } if text == "v 1 nope 0"
        ));
    }

    #[test]
    fn test_rejects_trailing_junk() {
        let err = parse_obj("v 1 2 3 4 5\n").unwrap_err();
        assert!(matches!(err, LoadError::BadVertex { line: 1, .. }));
    }

    #[test]
    fn test_rejects_malformed_face() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 z\n").unwrap_err();
        assert!(matches!(err, LoadError::BadFace { line: 4, .. }));
    }

    #[test]
    fn test_rejects_out_of_range_face_index() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::FaceIndexOutOfRange {
                line: 4,
                index: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_face_index() {
        let err = parse_obj("v 0 0 0\nf 0 1 1\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::FaceIndexOutOfRange { index: 0, .. }
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_obj(Path::new("does/not/exist.obj")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
