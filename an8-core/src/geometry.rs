/// Polygon geometry: meshes, subdivision cages and their morph offsets
use nalgebra::{Point2, Point3, Vector3};
use std::sync::Arc;

use crate::transform::Base;

/// A vertex position. Its identity is its index in the owning point list.
pub type Point = Point3<f32>;
pub type Normal = Vector3<f32>;
pub type TexCoord = Point2<f32>;

/// An edge between two points, by index
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub start: u32,
    pub end: u32,
    /// Crease sharpness, when the edge carries one
    pub sharpness: Option<i64>,
}

impl Edge {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end,
            sharpness: None,
        }
    }
}

/// One corner of a face
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaceVertex {
    pub point: u32,
    pub normal: Option<u32>,
    pub texcoord: Option<u32>,
}

/// A polygon over the owning node's points
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Face {
    pub flags: u32,
    /// Index into the owning node's material list
    pub material: u32,
    pub flat_normal: Option<u32>,
    pub vertices: Vec<FaceVertex>,
}

impl Face {
    /// Face with plain point corners, material 0 and no flags
    pub fn from_points(points: &[u32]) -> Self {
        Self {
            flags: 0,
            material: 0,
            flat_normal: None,
            vertices: points
                .iter()
                .map(|&point| FaceVertex {
                    point,
                    normal: None,
                    texcoord: None,
                })
                .collect(),
        }
    }
}

/// Displacement of a single point for one morph target
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MorphOffsetData {
    pub point_index: u32,
    pub delta: Vector3<f32>,
}

impl MorphOffsetData {
    pub fn new(point_index: u32, dx: f32, dy: f32, dz: f32) -> Self {
        Self {
            point_index,
            delta: Vector3::new(dx, dy, dz),
        }
    }
}

/// The offsets a single mesh or subdivision carries for the morph target
/// called `name`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MorphOffsets {
    pub name: String,
    pub data: Arc<[MorphOffsetData]>,
}

impl MorphOffsets {
    pub fn new(name: impl Into<String>, data: Vec<MorphOffsetData>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// Point, edge and face buffers shared by meshes and subdivision cages.
///
/// Buffers are reference counted so derived nodes can carry them over
/// without copying.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub points: Arc<[Point]>,
    /// `None` once the points have moved and the normals went stale
    pub normals: Option<Arc<[Normal]>>,
    pub edges: Arc<[Edge]>,
    pub texcoords: Arc<[TexCoord]>,
    pub faces: Arc<[Face]>,
    pub morph_offsets: Arc<[MorphOffsets]>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::from_points(Vec::new())
    }

    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            points: points.into(),
            normals: None,
            edges: Vec::new().into(),
            texcoords: Vec::new().into(),
            faces: Vec::new().into(),
            morph_offsets: Vec::new().into(),
        }
    }

    pub fn with_normals(mut self, normals: Vec<Normal>) -> Self {
        self.normals = Some(normals.into());
        self
    }

    pub fn with_edges(mut self, edges: Vec<Edge>) -> Self {
        self.edges = edges.into();
        self
    }

    pub fn with_texcoords(mut self, texcoords: Vec<TexCoord>) -> Self {
        self.texcoords = texcoords.into();
        self
    }

    pub fn with_faces(mut self, faces: Vec<Face>) -> Self {
        self.faces = faces.into();
        self
    }

    pub fn with_morph_offsets(mut self, morph_offsets: Vec<MorphOffsets>) -> Self {
        self.morph_offsets = morph_offsets.into();
        self
    }

    /// Eight corners and six quads of an axis-aligned cube centred on the origin
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let points = (0..8u32)
            .map(|i| {
                let axis = |bit: u32| if i & bit == 0 { -half } else { half };
                Point::new(axis(1), axis(2), axis(4))
            })
            .collect();

        let edges: [(u32, u32); 12] = [
            (0, 1), (2, 3), (4, 5), (6, 7),
            (0, 2), (1, 3), (4, 6), (5, 7),
            (0, 4), (1, 5), (2, 6), (3, 7),
        ];
        let edges = edges.iter().map(|&(start, end)| Edge::new(start, end)).collect();

        let faces: [[u32; 4]; 6] = [
            [0, 2, 3, 1], // -z
            [4, 5, 7, 6], // +z
            [0, 1, 5, 4], // -y
            [2, 6, 7, 3], // +y
            [0, 4, 6, 2], // -x
            [1, 3, 7, 5], // +x
        ];
        let faces = faces.iter().map(|quad| Face::from_points(quad)).collect();

        Self::from_points(points).with_edges(edges).with_faces(faces)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

/// A named polygon mesh
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mesh {
    pub name: String,
    pub base: Base,
    pub pivot: Base,
    pub material: Option<String>,
    pub layer: Option<i64>,
    pub smooth_angle: Option<f32>,
    pub material_list: Arc<[String]>,
    pub geometry: Geometry,
}

impl Mesh {
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            base: Base::identity(),
            pivot: Base::identity(),
            material: None,
            layer: None,
            smooth_angle: None,
            material_list: Vec::new().into(),
            geometry,
        }
    }

    pub fn cube(name: impl Into<String>, size: f32) -> Self {
        Self::new(name, Geometry::cube(size))
    }
}

/// A subdivision surface control cage.
///
/// `working` is the number of refinement passes the authoring tool applies
/// when it converts the cage into a mesh.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subdivision {
    pub name: String,
    pub base: Base,
    pub pivot: Base,
    pub material: Option<String>,
    pub layer: Option<i64>,
    pub smooth_angle: Option<f32>,
    pub working: u32,
    /// Refinement passes used for final renders
    pub divisions: u32,
    pub material_list: Arc<[String]>,
    pub geometry: Geometry,
}

impl Subdivision {
    /// Cage with identity placement. `divisions` starts out equal to
    /// `working`; set it afterwards when the two differ.
    pub fn new(name: impl Into<String>, geometry: Geometry, working: u32) -> Self {
        Self {
            name: name.into(),
            base: Base::identity(),
            pivot: Base::identity(),
            material: None,
            layer: None,
            smooth_angle: None,
            working,
            divisions: working,
            material_list: Vec::new().into(),
            geometry,
        }
    }

    pub fn cube(name: impl Into<String>, size: f32, working: u32) -> Self {
        Self::new(name, Geometry::cube(size), working)
    }
}
