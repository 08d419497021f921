//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
        }
    }

    /// Generate a UV ellipsoid with the given semi-axes.
    ///
    /// Used as a stand-in brain when no model file is supplied.
    pub fn ellipsoid(semi_axes: Vector3f, slices: usize, stacks: usize) -> Self {
        let slices = slices.max(3);
        let stacks = stacks.max(2);
        let mut mesh = Self::new();

        for stack in 0..=stacks {
            let phi = std::f32::consts::PI * stack as f32 / stacks as f32;
            for slice in 0..slices {
                let theta = 2.0 * std::f32::consts::PI * slice as f32 / slices as f32;
                mesh.add_vertex(Point3f::new(
                    semi_axes.x * phi.sin() * theta.cos(),
                    semi_axes.y * phi.sin() * theta.sin(),
                    semi_axes.z * phi.cos(),
                ));
            }
        }

        for stack in 0..stacks {
            for slice in 0..slices {
                let next = (slice + 1) % slices;
                let a = stack * slices + slice;
                let b = stack * slices + next;
                let c = (stack + 1) * slices + slice;
                let d = (stack + 1) * slices + next;
                // Poles collapse into degenerate triangles; skip them
                if stack != 0 {
                    mesh.add_face([a, c, b]);
                }
                if stack + 1 != stacks {
                    mesh.add_face([b, c, d]);
                }
            }
        }

        mesh.compute_vertex_normals();
        mesh
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    /// Check that every face references an existing vertex and that
    /// normals, if present, match the vertex count.
    pub fn validate(&self) -> Result<()> {
        let count = self.vertices.len();
        if let Some((i, face)) = self
            .faces
            .iter()
            .enumerate()
            .find(|(_, f)| f.iter().any(|&v| v >= count))
        {
            return Err(Error::InvalidData(format!(
                "face {} references vertex {:?} but mesh has {} vertices",
                i, face, count
            )));
        }
        if let Some(normals) = &self.normals {
            if normals.len() != count {
                return Err(Error::InvalidData(format!(
                    "mesh has {} normals for {} vertices",
                    normals.len(),
                    count
                )));
            }
        }
        Ok(())
    }

    /// Compute smooth vertex normals by accumulating area-weighted face normals
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3f::zeros(); self.vertices.len()];
        for face in &self.faces {
            let v0 = self.vertices[face[0]];
            let v1 = self.vertices[face[1]];
            let v2 = self.vertices[face[2]];
            let n = (v1 - v0).cross(&(v2 - v0));
            for &i in face {
                normals[i] += n;
            }
        }
        for n in &mut normals {
            *n = n.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::z);
        }
        self.normals = Some(normals);
    }

    /// Axis-aligned bounding box as `(min, max)`
    pub fn bounding_box(&self) -> (Point3f, Point3f) {
        let Some(first) = self.vertices.first() else {
            return (Point3f::origin(), Point3f::origin());
        };
        self.vertices.iter().fold((*first, *first), |(min, max), p| {
            (min.inf(p), max.sup(p))
        })
    }

    /// Translate the mesh so its bounding box is centered on the origin and
    /// scale it uniformly so the farthest vertex lies at `radius`.
    pub fn normalize_to_radius(&mut self, radius: f32) {
        if self.vertices.is_empty() {
            return;
        }
        let (min, max) = self.bounding_box();
        let center = nalgebra::center(&min, &max);
        let extent = self
            .vertices
            .iter()
            .map(|v| (v - center).norm())
            .fold(0.0f32, f32::max);
        let scale = if extent > f32::EPSILON { radius / extent } else { 1.0 };

        for v in &mut self.vertices {
            *v = Point3f::from((*v - center) * scale);
        }
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
