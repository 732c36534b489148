//! An8 Core Library - Scene graph transformations for the model translator
//!
//! This library derives new geometry from a parsed, in-memory object tree
//! without mutating it: applying morph targets and converting subdivision
//! cages into meshes. Anomalies are reported through a caller-supplied
//! [`WarningSink`]; none of them are fatal.

pub mod bake;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod morph;
pub mod rebuild;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use bake::{bake, bake_group, bake_object};
pub use diagnostics::{Discard, Warning, WarningLog, WarningSink};
pub use error::{Result, SceneError};
pub use geometry::{Edge, Face, Geometry, Mesh, MorphOffsetData, MorphOffsets, Point, Subdivision};
pub use morph::{
    apply_all_morph_targets, apply_morph_target, apply_morph_target_named,
    apply_morph_target_to_group,
};
pub use scene::{Component, Composite, Group, MorphTarget, Object};
pub use transform::Base;
