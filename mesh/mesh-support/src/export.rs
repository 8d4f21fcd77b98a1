//! Debug export of meshes, supports and highlighted regions.
//!
//! Binary STL for slicers and viewers, JSON for scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hashbrown::HashMap;
use mesh_types::{Aabb, IndexedMesh, Point3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ExportError, ExportResult};

const HEADER_SIZE: usize = 80;
const HEADER_TEXT: &[u8] = b"Binary STL written by mesh-support";

/// Resolve an optional face selection against a mesh.
fn selected_faces(mesh: &IndexedMesh, faces: Option<&[usize]>) -> ExportResult<Vec<usize>> {
    let count = mesh.faces.len();
    match faces {
        None => Ok((0..count).collect()),
        Some(faces) => {
            if let Some(&face) = faces.iter().find(|&&f| f >= count) {
                return Err(ExportError::FaceOutOfRange { face, count });
            }
            Ok(faces.to_vec())
        }
    }
}

/// Write a mesh, or a subset of its faces, as binary STL.
///
/// # Errors
///
/// - [`ExportError::FaceOutOfRange`] if a selected face does not exist
/// - [`ExportError::TooManyFaces`] above `u32::MAX` faces
/// - [`ExportError::Io`] if writing fails
///
/// # Example
///
/// ```
/// use mesh_support::write_stl_binary;
/// use mesh_types::unit_cube;
///
/// let mut bytes = Vec::new();
/// write_stl_binary(&unit_cube(), Some(&[0, 1]), &mut bytes).unwrap();
/// assert_eq!(bytes.len(), 84 + 2 * 50);
/// ```
pub fn write_stl_binary<W: Write>(
    mesh: &IndexedMesh,
    faces: Option<&[usize]>,
    mut writer: W,
) -> ExportResult<()> {
    let faces = selected_faces(mesh, faces)?;
    let face_count =
        u32::try_from(faces.len()).map_err(|_| ExportError::TooManyFaces { count: faces.len() })?;

    let mut header = [b' '; HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    writer.write_all(&header)?;
    writer.write_all(&face_count.to_le_bytes())?;

    for face in faces {
        let tri = mesh.face_triangle(face);
        let normal = tri.normal().unwrap_or_default();
        write_f32s(&mut writer, [normal.x, normal.y, normal.z])?;
        for v in tri.vertices() {
            write_f32s(&mut writer, [v.x, v.y, v.z])?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

fn write_f32s<W: Write>(writer: &mut W, values: [f64; 3]) -> ExportResult<()> {
    for value in values {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: binary STL stores f32
        writer.write_all(&(value as f32).to_le_bytes())?;
    }
    Ok(())
}

/// Save a mesh, or a subset of its faces, as a binary STL file.
///
/// # Errors
///
/// Same as [`write_stl_binary`], plus file creation failures.
pub fn save_stl_binary<P: AsRef<Path>>(
    path: P,
    mesh: &IndexedMesh,
    faces: Option<&[usize]>,
) -> ExportResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_stl_binary(mesh, faces, BufWriter::new(file))?;
    debug!(path = %path.display(), "Wrote binary STL");
    Ok(())
}

/// Axis-aligned bounds in a [`MeshDump`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DumpBounds {
    /// Smallest corner.
    pub min: [f64; 3],
    /// Largest corner.
    pub max: [f64; 3],
}

/// A compact, serializable copy of a mesh or a face subset.
///
/// Only vertices referenced by the selected faces are kept, renumbered in
/// first-use order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDump {
    /// Vertex positions.
    pub vertices: Vec<[f64; 3]>,
    /// Triangle indices into `vertices`.
    pub indices: Vec<[u32; 3]>,
    /// Bounds of `vertices`; all zeros when empty.
    pub bounds: DumpBounds,
}

impl MeshDump {
    /// Copy a mesh, or a subset of its faces.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::FaceOutOfRange`] if a selected face does not exist.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_support::MeshDump;
    /// use mesh_types::unit_cube;
    ///
    /// let dump = MeshDump::from_mesh(&unit_cube(), Some(&[0, 1])).unwrap();
    /// assert_eq!(dump.vertices.len(), 4);
    /// assert_eq!(dump.bounds.max, [1.0, 1.0, 0.0]);
    /// ```
    pub fn from_mesh(mesh: &IndexedMesh, faces: Option<&[usize]>) -> ExportResult<Self> {
        let faces = selected_faces(mesh, faces)?;

        let mut remap: HashMap<u32, u32> = HashMap::new();
        let mut points: Vec<Point3<f64>> = Vec::new();
        let mut indices = Vec::with_capacity(faces.len());
        for face in faces {
            let tri = mesh.faces[face].map(|v| {
                *remap.entry(v).or_insert_with(|| {
                    points.push(*mesh.position(v));
                    #[allow(clippy::cast_possible_truncation)]
                    // Truncation: the source mesh indexes vertices with u32
                    let id = (points.len() - 1) as u32;
                    id
                })
            });
            indices.push(tri);
        }

        let bounds = if points.is_empty() {
            DumpBounds {
                min: [0.0; 3],
                max: [0.0; 3],
            }
        } else {
            let aabb = Aabb::from_points(points.iter());
            DumpBounds {
                min: aabb.min.into(),
                max: aabb.max.into(),
            }
        };

        Ok(Self {
            vertices: points.iter().map(|&p| p.into()).collect(),
            indices,
            bounds,
        })
    }

    /// Write as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Json`] if serialization or writing fails.
    pub fn write_json<W: Write>(&self, writer: W) -> ExportResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Save as a pretty-printed JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if the file cannot be created, or
    /// [`ExportError::Json`] if writing fails.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ExportResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::unit_cube;

    fn read_f32(bytes: &[u8], at: usize) -> f32 {
        f32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    #[test]
    fn stl_layout() {
        let mut bytes = Vec::new();
        write_stl_binary(&unit_cube(), None, &mut bytes).unwrap();
        assert_eq!(bytes.len(), 84 + 12 * 50);
        assert!(bytes.starts_with(HEADER_TEXT));
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 12);
        // first face is on the bottom, facing down
        assert!((read_f32(&bytes, 84 + 8) + 1.0).abs() < 1e-6);
        // attribute count
        assert_eq!(&bytes[84 + 48..84 + 50], &[0, 0]);
    }

    #[test]
    fn out_of_range_face_is_rejected() {
        let mut bytes = Vec::new();
        let err = write_stl_binary(&unit_cube(), Some(&[3, 12]), &mut bytes).unwrap_err();
        assert!(matches!(err, ExportError::FaceOutOfRange { face: 12, count: 12 }));
        assert!(bytes.is_empty());
    }

    #[test]
    fn dump_compacts_vertices() {
        let cube = unit_cube();
        let dump = MeshDump::from_mesh(&cube, Some(&[4, 5])).unwrap();
        assert_eq!(dump.vertices.len(), 4);
        assert_eq!(dump.indices.len(), 2);
        assert!(dump.indices.iter().flatten().all(|&i| i < 4));
        // the y = 0 side
        assert!(dump.vertices.iter().all(|v| v[1].abs() < f64::EPSILON));
    }

    #[test]
    fn empty_selection_has_zero_bounds() {
        let dump = MeshDump::from_mesh(&unit_cube(), Some(&[])).unwrap();
        assert!(dump.vertices.is_empty());
        assert_eq!(dump.bounds.min, [0.0; 3]);
    }

    #[test]
    fn json_round_trips_through_serde() {
        let dump = MeshDump::from_mesh(&unit_cube(), None).unwrap();
        let mut text = Vec::new();
        dump.write_json(&mut text).unwrap();
        let back: MeshDump = serde_json::from_slice(&text).unwrap();
        assert_eq!(back, dump);
    }
}
