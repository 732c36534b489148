/// Applying morph targets to an object hierarchy
use log::{debug, trace};
use nalgebra::Vector3;
use std::sync::Arc;

use crate::diagnostics::WarningSink;
use crate::error::{Result, SceneError};
use crate::geometry::{Geometry, Mesh, MorphOffsets, Point, Subdivision};
use crate::rebuild::{rebuild, rebuild_components, Rebuild};
use crate::scene::{Component, Group, MorphTarget, Object};

/// Produce a copy of `object` with `target` baked into its geometry.
///
/// The result is named `"{object}_Morph_{target}"` and declares no morph
/// targets. Meshes and subdivisions without offsets for `target` are shared
/// with the input, as is everything that morphs never touch.
pub fn apply_morph_target(
    object: &Object,
    target: &MorphTarget,
    sink: &mut dyn WarningSink,
) -> Object {
    debug!(
        "Applying morph target \"{}\" to object \"{}\"",
        target.name, object.name
    );

    Object {
        name: format!("{}_Morph_{}", object.name, target.name),
        layer: object.layer,
        materials: Arc::clone(&object.materials),
        components: rebuild_components(&object.components, &mut ApplyMorph { target }, sink),
        morph_targets: Vec::new(),
    }
}

/// Same as [`apply_morph_target`] for a bare group. The group keeps its name.
pub fn apply_morph_target_to_group(
    group: &Group,
    target: &MorphTarget,
    sink: &mut dyn WarningSink,
) -> Group {
    rebuild(group, &mut ApplyMorph { target }, sink)
}

/// Resolve one of the object's declared morph targets by name and apply it
pub fn apply_morph_target_named(
    object: &Object,
    name: &str,
    sink: &mut dyn WarningSink,
) -> Result<Object> {
    let target = object
        .morph_target(name)
        .ok_or_else(|| SceneError::UnknownMorphTarget {
            object: object.name.clone(),
            target: name.to_string(),
        })?;
    Ok(apply_morph_target(object, target, sink))
}

/// One morphed copy of `object` per declared morph target, in declaration order
pub fn apply_all_morph_targets(object: &Object, sink: &mut dyn WarningSink) -> Vec<Object> {
    object
        .morph_targets
        .iter()
        .map(|target| apply_morph_target(object, target, sink))
        .collect()
}

/// Deform a single mesh. Returns the same `Arc` when nothing matches.
pub fn morph_mesh(mesh: &Arc<Mesh>, target: &MorphTarget) -> Arc<Mesh> {
    let Some(geometry) = deform(&mesh.geometry, &target.name, &mesh.name) else {
        return Arc::clone(mesh);
    };

    Arc::new(Mesh {
        name: mesh.name.clone(),
        base: mesh.base,
        pivot: mesh.pivot,
        material: mesh.material.clone(),
        layer: mesh.layer,
        smooth_angle: mesh.smooth_angle,
        material_list: Arc::clone(&mesh.material_list),
        geometry,
    })
}

/// Deform a single subdivision cage. It stays a cage; nothing is refined.
pub fn morph_subdivision(subdivision: &Arc<Subdivision>, target: &MorphTarget) -> Arc<Subdivision> {
    let Some(geometry) = deform(&subdivision.geometry, &target.name, &subdivision.name) else {
        return Arc::clone(subdivision);
    };

    Arc::new(Subdivision {
        name: subdivision.name.clone(),
        base: subdivision.base,
        pivot: subdivision.pivot,
        material: subdivision.material.clone(),
        layer: subdivision.layer,
        smooth_angle: subdivision.smooth_angle,
        working: subdivision.working,
        divisions: subdivision.divisions,
        material_list: Arc::clone(&subdivision.material_list),
        geometry,
    })
}

struct ApplyMorph<'a> {
    target: &'a MorphTarget,
}

impl Rebuild for ApplyMorph<'_> {
    fn mesh(&mut self, mesh: &Arc<Mesh>, _sink: &mut dyn WarningSink) -> Component {
        Component::Mesh(morph_mesh(mesh, self.target))
    }

    fn subdivision(
        &mut self,
        subdivision: &Arc<Subdivision>,
        _sink: &mut dyn WarningSink,
    ) -> Component {
        Component::Subdivision(morph_subdivision(subdivision, self.target))
    }
}

/// First offsets block named `target` that has data, provided there are
/// points to move at all.
fn find_offsets<'a>(geometry: &'a Geometry, target: &str) -> Option<&'a MorphOffsets> {
    if geometry.points.is_empty() {
        return None;
    }
    geometry
        .morph_offsets
        .iter()
        .find(|offsets| offsets.name == target && !offsets.data.is_empty())
}

/// Moved points with stale normals dropped and the consumed offsets removed,
/// or `None` when `target` does not apply to this geometry.
fn deform(geometry: &Geometry, target: &str, owner: &str) -> Option<Geometry> {
    let offsets = find_offsets(geometry, target)?;

    // The first entry for a point wins; entries past the end are skipped.
    let mut deltas: Vec<Option<Vector3<f32>>> = vec![None; geometry.points.len()];
    for entry in offsets.data.iter() {
        match deltas.get_mut(entry.point_index as usize) {
            Some(slot) => {
                if slot.is_none() {
                    *slot = Some(entry.delta);
                }
            }
            None => trace!(
                "Skipping offset for point {} of \"{}\", which has {} points",
                entry.point_index,
                owner,
                geometry.points.len()
            ),
        }
    }

    let points: Arc<[Point]> = geometry
        .points
        .iter()
        .zip(&deltas)
        .map(|(point, delta)| match delta {
            Some(delta) => point + delta,
            None => *point,
        })
        .collect();

    debug!(
        "Morph target \"{}\" moved {} of {} points of \"{}\"",
        target,
        deltas.iter().filter(|delta| delta.is_some()).count(),
        points.len(),
        owner
    );

    Some(Geometry {
        points,
        normals: None,
        edges: Arc::clone(&geometry.edges),
        texcoords: Arc::clone(&geometry.texcoords),
        faces: Arc::clone(&geometry.faces),
        morph_offsets: Vec::new().into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Discard, WarningLog};
    use crate::geometry::{MorphOffsetData, Normal};
    use crate::scene::{Composite, Cube, Cylinder, Modifier, Sphere, SphereTessellation};
    use crate::transform::Base;

    fn two_point_mesh(name: &str, offsets: Vec<MorphOffsets>) -> Mesh {
        let geometry = Geometry::from_points(vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0)])
            .with_normals(vec![Normal::new(0.0, 1.0, 0.0), Normal::new(0.0, 1.0, 0.0)])
            .with_morph_offsets(offsets);
        Mesh::new(name, geometry)
    }

    fn smile(data: Vec<MorphOffsetData>) -> MorphOffsets {
        MorphOffsets::new("Smile", data)
    }

    fn assert_point(point: &Point, x: f32, y: f32, z: f32) {
        assert!((point.x - x).abs() < 1e-6);
        assert!((point.y - y).abs() < 1e-6);
        assert!((point.z - z).abs() < 1e-6);
    }

    fn primitives() -> Vec<Component> {
        vec![
            Sphere {
                name: "ball".to_string(),
                base: Base::from_origin(0.0, 2.0, 0.0),
                pivot: Base::identity(),
                material: Some("rubber".to_string()),
                diameter: 0.5,
                tessellation: SphereTessellation::LongLat {
                    longitude: 12,
                    latitude: 8,
                },
            }
            .into(),
            Cylinder {
                name: "neck".to_string(),
                base: Base::identity(),
                pivot: Base::identity(),
                material: None,
                length: 1.0,
                diameter: 0.4,
                top_diameter: 0.3,
                longitude: 16,
                latitude: 1,
                cap_start: true,
                cap_end: false,
            }
            .into(),
            Cube {
                name: "box".to_string(),
                base: Base::identity(),
                pivot: Base::identity(),
                material: None,
                scale: Vector3::new(1.0, 2.0, 3.0),
                divisions: [1, 1, 1],
            }
            .into(),
            Modifier {
                name: "bend".to_string(),
                base: Base::identity(),
                pivot: Base::identity(),
                kind: "bend".to_string(),
                parameters: vec![0.5, 90.0].into(),
            }
            .into(),
        ]
    }

    #[test]
    fn test_delta_applied_and_normals_dropped() {
        let mesh = Arc::new(two_point_mesh(
            "lips",
            vec![smile(vec![MorphOffsetData::new(1, 0.0, 0.0, 1.0)])],
        ));
        let morphed = morph_mesh(&mesh, &MorphTarget::new("Smile"));

        assert_eq!(morphed.geometry.points.len(), 2);
        assert_point(&morphed.geometry.points[0], 0.0, 0.0, 0.0);
        assert_point(&morphed.geometry.points[1], 1.0, 1.0, 2.0);
        assert!(morphed.geometry.normals.is_none());
        assert!(morphed.geometry.morph_offsets.is_empty());

        // The source is untouched
        assert_point(&mesh.geometry.points[1], 1.0, 1.0, 1.0);
        assert!(mesh.geometry.normals.is_some());
        assert_eq!(mesh.geometry.morph_offsets.len(), 1);
    }

    #[test]
    fn test_out_of_range_index_is_skipped() {
        let mesh = Arc::new(two_point_mesh(
            "lips",
            vec![smile(vec![MorphOffsetData::new(5, 1.0, 1.0, 1.0)])],
        ));
        let morphed = morph_mesh(&mesh, &MorphTarget::new("Smile"));

        assert_point(&morphed.geometry.points[0], 0.0, 0.0, 0.0);
        assert_point(&morphed.geometry.points[1], 1.0, 1.0, 1.0);
    }

    #[test]
    fn test_out_of_range_index_reports_nothing() {
        let object = Object::new(
            "Head",
            vec![two_point_mesh(
                "lips",
                vec![smile(vec![
                    MorphOffsetData::new(u32::MAX, 1.0, 1.0, 1.0),
                    MorphOffsetData::new(2, 1.0, 1.0, 1.0),
                ])],
            )
            .into()],
        );
        let mut warnings = WarningLog::new();
        let morphed = apply_morph_target(&object, &MorphTarget::new("Smile"), &mut warnings);

        assert!(warnings.is_empty());
        let lips = morphed.meshes().next().unwrap();
        assert_point(&lips.geometry.points[0], 0.0, 0.0, 0.0);
        assert_point(&lips.geometry.points[1], 1.0, 1.0, 1.0);
    }

    #[test]
    fn test_non_matching_mesh_is_shared() {
        let mesh = Arc::new(two_point_mesh(
            "lips",
            vec![smile(vec![MorphOffsetData::new(0, 1.0, 0.0, 0.0)])],
        ));
        let morphed = morph_mesh(&mesh, &MorphTarget::new("Frown"));
        assert!(Arc::ptr_eq(&mesh, &morphed));
    }

    #[test]
    fn test_empty_offsets_and_empty_points_are_no_ops() {
        let empty_data = Arc::new(two_point_mesh("a", vec![smile(Vec::new())]));
        assert!(Arc::ptr_eq(
            &empty_data,
            &morph_mesh(&empty_data, &MorphTarget::new("Smile"))
        ));

        let no_points = Arc::new(Mesh::new(
            "b",
            Geometry::new().with_morph_offsets(vec![smile(vec![MorphOffsetData::new(0, 1.0, 0.0, 0.0)])]),
        ));
        assert!(Arc::ptr_eq(
            &no_points,
            &morph_mesh(&no_points, &MorphTarget::new("Smile"))
        ));
    }

    #[test]
    fn test_first_matching_block_wins() {
        let mesh = Arc::new(two_point_mesh(
            "lips",
            vec![
                MorphOffsets::new("Frown", vec![MorphOffsetData::new(0, 9.0, 9.0, 9.0)]),
                smile(Vec::new()),
                smile(vec![MorphOffsetData::new(0, 1.0, 0.0, 0.0)]),
                smile(vec![MorphOffsetData::new(0, 0.0, 5.0, 0.0)]),
            ],
        ));
        let morphed = morph_mesh(&mesh, &MorphTarget::new("Smile"));
        assert_point(&morphed.geometry.points[0], 1.0, 0.0, 0.0);
    }

    #[test]
    fn test_first_entry_for_a_point_wins() {
        let mesh = Arc::new(two_point_mesh(
            "lips",
            vec![smile(vec![
                MorphOffsetData::new(1, 0.0, 1.0, 0.0),
                MorphOffsetData::new(1, 0.0, 7.0, 0.0),
            ])],
        ));
        let morphed = morph_mesh(&mesh, &MorphTarget::new("Smile"));
        assert_point(&morphed.geometry.points[1], 1.0, 2.0, 1.0);
    }

    #[test]
    fn test_subdivision_stays_a_cage() {
        let cage = Subdivision::new(
            "body",
            Geometry::cube(2.0).with_morph_offsets(vec![smile(vec![MorphOffsetData::new(7, 0.0, 0.5, 0.0)])]),
            3,
        );
        let cage = Arc::new(cage);
        let morphed = morph_subdivision(&cage, &MorphTarget::new("Smile"));

        assert_eq!(morphed.working, 3);
        assert_eq!(morphed.divisions, 3);
        assert_point(&morphed.geometry.points[7], 1.0, 1.5, 1.0);
        assert!(Arc::ptr_eq(&morphed.geometry.faces, &cage.geometry.faces));
        assert!(Arc::ptr_eq(&morphed.geometry.edges, &cage.geometry.edges));
    }

    #[test]
    fn test_object_naming_and_targets_consumed() {
        let mut object = Object::new("Head", Vec::new()).with_morph_targets(vec![MorphTarget::new("Smile")]);
        object.layer = Some(2);
        let morphed = apply_morph_target(&object, &MorphTarget::new("Smile"), &mut Discard);

        assert_eq!(morphed.name, "Head_Morph_Smile");
        assert_eq!(morphed.layer, Some(2));
        assert!(morphed.morph_targets.is_empty());
        assert_eq!(object.name, "Head");
    }

    #[test]
    fn test_identity_when_nothing_matches() {
        let object = Object::new(
            "Head",
            vec![
                two_point_mesh("lips", vec![smile(vec![MorphOffsetData::new(0, 1.0, 0.0, 0.0)])]).into(),
                Group::new("hat", primitives()).into(),
            ],
        );
        let morphed = apply_morph_target(&object, &MorphTarget::new("Wink"), &mut Discard);

        assert_eq!(morphed.components, object.components);
        assert_eq!(morphed.materials, object.materials);
    }

    #[test]
    fn test_primitives_pass_through() {
        let mut parts = primitives();
        parts.push(two_point_mesh("lips", vec![smile(vec![MorphOffsetData::new(0, 1.0, 0.0, 0.0)])]).into());
        let group = Group::new("face", parts);

        let morphed = apply_morph_target_to_group(&group, &MorphTarget::new("Smile"), &mut Discard);

        assert_eq!(morphed.name, "face");
        for (before, after) in group.components.iter().zip(&morphed.components).take(4) {
            assert_eq!(before, after);
            assert!(before.ptr_eq(after));
        }
        assert!(!group.components[4].ptr_eq(&morphed.components[4]));
    }

    #[test]
    fn test_only_matching_branch_changes() {
        let object = Object::new(
            "Head",
            vec![
                Group::new(
                    "left",
                    vec![two_point_mesh("cheek", vec![smile(vec![MorphOffsetData::new(0, 0.0, 0.0, -1.0)])]).into()],
                )
                .into(),
                Group::new("right", vec![two_point_mesh("ear", Vec::new()).into()]).into(),
            ],
        );
        let morphed = apply_morph_target(&object, &MorphTarget::new("Smile"), &mut Discard);

        let groups: Vec<&Arc<Group>> = morphed.groups().collect();
        assert_eq!(groups.len(), 2);
        assert_point(&groups[0].meshes().next().unwrap().geometry.points[0], 0.0, 0.0, -1.0);

        let source_right = object.groups().nth(1).unwrap();
        assert_eq!(groups[1], source_right);
        assert_eq!(
            groups[1].meshes().next().unwrap().geometry.points,
            source_right.meshes().next().unwrap().geometry.points
        );
    }

    #[test]
    fn test_nested_groups_are_walked() {
        let inner = Group::new(
            "inner",
            vec![two_point_mesh("tip", vec![smile(vec![MorphOffsetData::new(1, 1.0, 0.0, 0.0)])]).into()],
        );
        let object = Object::new("Head", vec![Group::new("outer", vec![inner.into()]).into()]);
        let morphed = apply_morph_target(&object, &MorphTarget::new("Smile"), &mut Discard);

        let outer = morphed.groups().next().unwrap();
        assert_eq!(outer.name, "outer");
        let inner = outer.groups().next().unwrap();
        assert_eq!(inner.name, "inner");
        assert_point(&inner.meshes().next().unwrap().geometry.points[1], 2.0, 1.0, 1.0);
    }

    #[test]
    fn test_named_lookup() {
        let object = Object::new(
            "Head",
            vec![two_point_mesh("lips", vec![smile(vec![MorphOffsetData::new(0, 0.0, 1.0, 0.0)])]).into()],
        )
        .with_morph_targets(vec![MorphTarget::new("Smile")]);

        let morphed = apply_morph_target_named(&object, "Smile", &mut Discard).unwrap();
        assert_eq!(morphed.name, "Head_Morph_Smile");

        let missing = apply_morph_target_named(&object, "Wink", &mut Discard);
        assert_eq!(
            missing,
            Err(SceneError::UnknownMorphTarget {
                object: "Head".to_string(),
                target: "Wink".to_string(),
            })
        );
    }

    #[test]
    fn test_all_targets_in_declaration_order() {
        let object = Object::new("Head", vec![two_point_mesh("lips", Vec::new()).into()])
            .with_morph_targets(vec![MorphTarget::new("Smile"), MorphTarget::new("Frown")]);
        let mut warnings = WarningLog::new();
        let variants = apply_all_morph_targets(&object, &mut warnings);

        let names: Vec<&str> = variants.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Head_Morph_Smile", "Head_Morph_Frown"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_results_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Object>();
        assert_send_sync::<Group>();
    }
}
