//! OBJ format support

use crate::error::{open, IoError};
use brainviz_core::{MeshLoader, Point3f, Result, TriangleMesh};
use obj::ObjData;
use std::io::{BufReader, Read};
use std::path::Path;

/// Reads Wavefront OBJ models into triangle meshes.
///
/// Polygons are fan-triangulated and smooth vertex normals are recomputed
/// from the geometry; per-corner normals and texture coordinates in the file
/// are ignored. When `normalize_radius` is set the model is centered and
/// scaled to fit a sphere of that radius.
#[derive(Debug, Clone, Default)]
pub struct ObjReader {
    pub normalize_radius: Option<f32>,
}

impl ObjReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader that fits loaded models to a sphere of `radius`
    pub fn normalized(radius: f32) -> Self {
        Self {
            normalize_radius: Some(radius),
        }
    }

    /// Parse OBJ data from any reader
    pub fn read_from<R: Read>(&self, input: R) -> Result<TriangleMesh> {
        let data = ObjData::load_buf(BufReader::new(input)).map_err(|e| IoError::ParseError {
            line: 0,
            message: e.to_string(),
        })?;

        let mut mesh = mesh_from_obj_data(&data)?;
        if mesh.is_empty() {
            return Err(IoError::InvalidFormat {
                format: "OBJ file contains no faces".to_string(),
            }
            .into());
        }
        if let Some(radius) = self.normalize_radius {
            mesh.normalize_to_radius(radius);
        }
        mesh.compute_vertex_normals();
        Ok(mesh)
    }
}

impl MeshLoader for ObjReader {
    fn load(&self, path: &Path) -> Result<TriangleMesh> {
        let file = open(path)?;
        let mesh = self.read_from(file)?;
        log::info!(
            "Loaded {} with {} vertices and {} faces",
            path.display(),
            mesh.vertex_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }
}

fn mesh_from_obj_data(data: &ObjData) -> Result<TriangleMesh> {
    let vertices: Vec<Point3f> = data
        .position
        .iter()
        .map(|p| Point3f::new(p[0], p[1], p[2]))
        .collect();
    let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, Vec::new());

    for object in &data.objects {
        for group in &object.groups {
            for poly in &group.polys {
                let corners: Vec<usize> = poly.0.iter().map(|tuple| tuple.0).collect();
                if corners.len() < 3 {
                    log::debug!("Skipping degenerate polygon with {} corners", corners.len());
                    continue;
                }
                for i in 1..corners.len() - 1 {
                    mesh.add_face([corners[0], corners[i], corners[i + 1]]);
                }
            }
        }
    }

    mesh.validate()?;
    Ok(mesh)
}
