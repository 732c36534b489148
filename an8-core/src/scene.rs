/// Scene graph nodes: objects, groups and the components they hold
use nalgebra::Vector3;
use std::sync::Arc;

use crate::geometry::{Mesh, Point, Subdivision};
use crate::transform::Base;

/// How a sphere primitive is tessellated
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SphereTessellation {
    LongLat { longitude: u32, latitude: u32 },
    Geodesic(u32),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub name: String,
    pub base: Base,
    pub pivot: Base,
    pub material: Option<String>,
    pub diameter: f32,
    pub tessellation: SphereTessellation,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cylinder {
    pub name: String,
    pub base: Base,
    pub pivot: Base,
    pub material: Option<String>,
    pub length: f32,
    pub diameter: f32,
    pub top_diameter: f32,
    pub longitude: u32,
    pub latitude: u32,
    pub cap_start: bool,
    pub cap_end: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cube {
    pub name: String,
    pub base: Base,
    pub pivot: Base,
    pub material: Option<String>,
    pub scale: Vector3<f32>,
    pub divisions: [u32; 3],
}

/// A spline path
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathCom {
    pub name: String,
    pub base: Base,
    pub pivot: Base,
    pub knots: Arc<[Point]>,
    pub closed: bool,
}

/// Text laid out by the authoring tool
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextCom {
    pub name: String,
    pub base: Base,
    pub pivot: Base,
    pub font: String,
    pub text: String,
    pub size: f32,
}

/// A deformation modifier (bend, wave, ...). Its parameters are opaque here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub name: String,
    pub base: Base,
    pub pivot: Base,
    pub kind: String,
    pub parameters: Arc<[f32]>,
}

/// A reference image placed in the scene
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Image {
    pub name: String,
    pub base: Base,
    pub pivot: Base,
    pub file: String,
    pub width: f32,
    pub height: f32,
}

/// A material declared by an object. Only the name is modelled; surfaces and
/// textures are resolved by the exporter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Material {
    pub name: String,
}

/// A named deformation channel. Matched against
/// [`MorphOffsets`](crate::geometry::MorphOffsets) by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MorphTarget {
    pub name: String,
}

impl MorphTarget {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Anything a group or object can hold
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Component {
    Mesh(Arc<Mesh>),
    Subdivision(Arc<Subdivision>),
    Group(Arc<Group>),
    Sphere(Arc<Sphere>),
    Cylinder(Arc<Cylinder>),
    Cube(Arc<Cube>),
    PathCom(Arc<PathCom>),
    TextCom(Arc<TextCom>),
    Modifier(Arc<Modifier>),
    Image(Arc<Image>),
}

impl Component {
    pub fn name(&self) -> &str {
        match self {
            Component::Mesh(node) => &node.name,
            Component::Subdivision(node) => &node.name,
            Component::Group(node) => &node.name,
            Component::Sphere(node) => &node.name,
            Component::Cylinder(node) => &node.name,
            Component::Cube(node) => &node.name,
            Component::PathCom(node) => &node.name,
            Component::TextCom(node) => &node.name,
            Component::Modifier(node) => &node.name,
            Component::Image(node) => &node.name,
        }
    }

    /// True when both components are the same variant and share their node
    pub fn ptr_eq(&self, other: &Component) -> bool {
        match (self, other) {
            (Component::Mesh(a), Component::Mesh(b)) => Arc::ptr_eq(a, b),
            (Component::Subdivision(a), Component::Subdivision(b)) => Arc::ptr_eq(a, b),
            (Component::Group(a), Component::Group(b)) => Arc::ptr_eq(a, b),
            (Component::Sphere(a), Component::Sphere(b)) => Arc::ptr_eq(a, b),
            (Component::Cylinder(a), Component::Cylinder(b)) => Arc::ptr_eq(a, b),
            (Component::Cube(a), Component::Cube(b)) => Arc::ptr_eq(a, b),
            (Component::PathCom(a), Component::PathCom(b)) => Arc::ptr_eq(a, b),
            (Component::TextCom(a), Component::TextCom(b)) => Arc::ptr_eq(a, b),
            (Component::Modifier(a), Component::Modifier(b)) => Arc::ptr_eq(a, b),
            (Component::Image(a), Component::Image(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! impl_component_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Component {
                fn from(node: $variant) -> Self {
                    Component::$variant(Arc::new(node))
                }
            }

            impl From<Arc<$variant>> for Component {
                fn from(node: Arc<$variant>) -> Self {
                    Component::$variant(node)
                }
            }
        )*
    };
}

impl_component_from!(
    Mesh,
    Subdivision,
    Group,
    Sphere,
    Cylinder,
    Cube,
    PathCom,
    TextCom,
    Modifier,
    Image,
);

/// Nodes that hold a list of components.
///
/// `with_components` carries every other field of the node over unchanged,
/// so it is the single place that decides which fields a rebuild touches.
pub trait Composite: Sized {
    fn components(&self) -> &[Component];

    fn with_components(&self, components: Vec<Component>) -> Self;

    fn meshes(&self) -> impl Iterator<Item = &Arc<Mesh>> {
        self.components().iter().filter_map(|component| match component {
            Component::Mesh(mesh) => Some(mesh),
            _ => None,
        })
    }

    fn subdivisions(&self) -> impl Iterator<Item = &Arc<Subdivision>> {
        self.components().iter().filter_map(|component| match component {
            Component::Subdivision(subdivision) => Some(subdivision),
            _ => None,
        })
    }

    fn groups(&self) -> impl Iterator<Item = &Arc<Group>> {
        self.components().iter().filter_map(|component| match component {
            Component::Group(group) => Some(group),
            _ => None,
        })
    }
}

/// A named container of components, nested inside an object or another group
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    pub name: String,
    pub base: Base,
    pub pivot: Base,
    pub layer: Option<i64>,
    pub components: Vec<Component>,
}

impl Group {
    pub fn new(name: impl Into<String>, components: Vec<Component>) -> Self {
        Self {
            name: name.into(),
            base: Base::identity(),
            pivot: Base::identity(),
            layer: None,
            components,
        }
    }
}

impl Composite for Group {
    fn components(&self) -> &[Component] {
        &self.components
    }

    fn with_components(&self, components: Vec<Component>) -> Self {
        Self {
            name: self.name.clone(),
            base: self.base,
            pivot: self.pivot,
            layer: self.layer,
            components,
        }
    }
}

/// The root of a modelled object
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Object {
    pub name: String,
    pub layer: Option<i64>,
    pub materials: Arc<[Material]>,
    pub components: Vec<Component>,
    pub morph_targets: Vec<MorphTarget>,
}

impl Object {
    pub fn new(name: impl Into<String>, components: Vec<Component>) -> Self {
        Self {
            name: name.into(),
            layer: None,
            materials: Vec::new().into(),
            components,
            morph_targets: Vec::new(),
        }
    }

    pub fn with_materials(mut self, materials: Vec<Material>) -> Self {
        self.materials = materials.into();
        self
    }

    pub fn with_morph_targets(mut self, morph_targets: Vec<MorphTarget>) -> Self {
        self.morph_targets = morph_targets;
        self
    }

    /// Look up a declared morph target by name
    pub fn morph_target(&self, name: &str) -> Option<&MorphTarget> {
        self.morph_targets.iter().find(|target| target.name == name)
    }
}

impl Composite for Object {
    fn components(&self) -> &[Component] {
        &self.components
    }

    fn with_components(&self, components: Vec<Component>) -> Self {
        Self {
            name: self.name.clone(),
            layer: self.layer,
            materials: Arc::clone(&self.materials),
            components,
            morph_targets: self.morph_targets.clone(),
        }
    }
}
