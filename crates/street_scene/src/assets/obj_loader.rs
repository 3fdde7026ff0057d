//! Wavefront OBJ reader for the scene's props

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::render::{Mesh, Vertex};

const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];
const DEFAULT_TEX_COORD: [f32; 2] = [0.0, 0.0];

/// OBJ parsing errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// Underlying read failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A number or index could not be parsed
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
    /// Well-formed but unusable content
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// OBJ loader producing flat triangle meshes
///
/// Polygons are fan-triangulated. Materials, groups and smoothing
/// directives are ignored.
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Parse OBJ text from any buffered reader
    pub fn parse<R: BufRead>(reader: R) -> Result<Mesh, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = number + 1;
            let mut parts = line.split_whitespace();

            match parts.next() {
                Some("v") => positions.push(parse_floats(&mut parts, line_no)?),
                Some("vn") => normals.push(parse_floats(&mut parts, line_no)?),
                Some("vt") => tex_coords.push(parse_floats(&mut parts, line_no)?),
                Some("f") => {
                    let first = vertices.len();
                    for corner in parts {
                        let vertex = resolve_corner(corner, &positions, &tex_coords, &normals, line_no)?;
                        vertices.push(vertex);
                    }
                    let corners = vertices.len() - first;
                    if corners < 3 {
                        return Err(ObjError::ParseError {
                            line: line_no,
                            message: format!("face with {corners} corners"),
                        });
                    }
                    for i in 1..corners - 1 {
                        indices.extend([first, first + i, first + i + 1].map(index_u32));
                    }
                }
                _ => {}
            }
        }

        if vertices.is_empty() {
            return Err(ObjError::InvalidFormat("no faces found".to_string()));
        }

        Ok(Mesh::new(vertices, indices))
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn index_u32(index: usize) -> u32 {
    index as u32
}

fn parse_floats<'a, const N: usize>(
    parts: &mut impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<[f32; N], ObjError> {
    let mut values = [0.0; N];
    for value in &mut values {
        let token = parts.next().ok_or_else(|| ObjError::ParseError {
            line,
            message: format!("expected {N} components"),
        })?;
        *value = token.parse().map_err(|_| ObjError::ParseError {
            line,
            message: format!("invalid number '{token}'"),
        })?;
    }
    Ok(values)
}

/// Resolve a 1-based (or negative, relative) OBJ index
fn resolve_index(token: &str, count: usize, line: usize) -> Result<usize, ObjError> {
    let raw: i64 = token.parse().map_err(|_| ObjError::ParseError {
        line,
        message: format!("invalid index '{token}'"),
    })?;
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let resolved = if raw < 0 { count + raw } else { raw - 1 };
    if (0..count).contains(&resolved) {
        usize::try_from(resolved).map_err(|_| ObjError::InvalidFormat(format!("index {raw}")))
    } else {
        Err(ObjError::ParseError {
            line,
            message: format!("index {raw} out of range (have {count})"),
        })
    }
}

fn resolve_corner(
    corner: &str,
    positions: &[[f32; 3]],
    tex_coords: &[[f32; 2]],
    normals: &[[f32; 3]],
    line: usize,
) -> Result<Vertex, ObjError> {
    let mut fields = corner.split('/');
    let position_token = fields.next().unwrap_or_default();
    let position = positions[resolve_index(position_token, positions.len(), line)?];

    let tex_coord = match fields.next() {
        Some(token) if !token.is_empty() => tex_coords[resolve_index(token, tex_coords.len(), line)?],
        _ => DEFAULT_TEX_COORD,
    };
    let normal = match fields.next() {
        Some(token) if !token.is_empty() => normals[resolve_index(token, normals.len(), line)?],
        _ => DEFAULT_NORMAL,
    };

    Ok(Vertex::new(position, normal, tex_coord))
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1 4/1/1
";

    #[test]
    fn test_quad_is_fan_triangulated() {
        let mesh = ObjLoader::parse(QUAD.as_bytes()).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_negative_indices_and_missing_attributes() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = ObjLoader::parse(text.as_bytes()).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertices[2].position, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[2].normal, DEFAULT_NORMAL);
    }

    #[test]
    fn test_out_of_range_index() {
        let text = "v 0 0 0\nf 1 2 3\n";
        let result = ObjLoader::parse(text.as_bytes());
        assert!(matches!(result, Err(ObjError::ParseError { line: 2, .. })));
    }

    #[test]
    fn test_zero_index_rejected() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        assert!(ObjLoader::parse(text.as_bytes()).is_err());
    }

    #[test]
    fn test_empty_file_rejected() {
        let result = ObjLoader::parse("# nothing\n".as_bytes());
        assert!(matches!(result, Err(ObjError::InvalidFormat(_))));
    }
}
