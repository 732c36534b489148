/// Converting subdivision cages into meshes
use log::debug;
use std::sync::Arc;

use crate::diagnostics::{report, Warning, WarningSink};
use crate::geometry::{Mesh, Subdivision};
use crate::rebuild::{rebuild, Rebuild};
use crate::scene::{Component, Group, Object};

/// Produce the mesh the authoring tool's "Convert to Mesh" would.
///
/// Refinement is not performed: the cage's points, normals, edges,
/// texcoords, faces and morph offsets are carried over verbatim, and a
/// warning naming the subdivision is reported when `working` asks for any
/// refinement passes. `layer` and `divisions` are not carried.
pub fn bake(subdivision: &Subdivision, sink: &mut dyn WarningSink) -> Mesh {
    let mesh = Mesh {
        name: subdivision.name.clone(),
        base: subdivision.base,
        pivot: subdivision.pivot,
        material: subdivision.material.clone(),
        layer: None,
        smooth_angle: subdivision.smooth_angle,
        material_list: Arc::clone(&subdivision.material_list),
        geometry: subdivision.geometry.clone(),
    };

    if subdivision.working > 0 {
        report(sink, Warning::SubdivisionNotRefined(subdivision.name.clone()));
    }

    debug!(
        "Baked subdivision \"{}\" into a mesh with {} points and {} faces",
        mesh.name,
        mesh.geometry.points.len(),
        mesh.geometry.faces.len()
    );

    mesh
}

/// Replace every subdivision in the object, at any depth, with its baked mesh
pub fn bake_object(object: &Object, sink: &mut dyn WarningSink) -> Object {
    rebuild(object, &mut BakeSubdivisions, sink)
}

/// Replace every subdivision in the group, at any depth, with its baked mesh
pub fn bake_group(group: &Group, sink: &mut dyn WarningSink) -> Group {
    rebuild(group, &mut BakeSubdivisions, sink)
}

struct BakeSubdivisions;

impl Rebuild for BakeSubdivisions {
    fn subdivision(
        &mut self,
        subdivision: &Arc<Subdivision>,
        sink: &mut dyn WarningSink,
    ) -> Component {
        bake(subdivision, sink).into()
    }
}
