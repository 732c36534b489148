/// Copy-with-override over the scene graph.
///
/// Meshes and subdivisions are handed to a [`Rebuild`] implementation, groups
/// are walked recursively, and every other component is shared with the
/// source tree as-is.
use std::sync::Arc;

use crate::diagnostics::WarningSink;
use crate::geometry::{Mesh, Subdivision};
use crate::scene::{Component, Composite};

/// Decides what replaces each deformable node during a rebuild.
///
/// The defaults share the node unchanged.
pub trait Rebuild {
    fn mesh(&mut self, mesh: &Arc<Mesh>, _sink: &mut dyn WarningSink) -> Component {
        Component::Mesh(Arc::clone(mesh))
    }

    fn subdivision(
        &mut self,
        subdivision: &Arc<Subdivision>,
        _sink: &mut dyn WarningSink,
    ) -> Component {
        Component::Subdivision(Arc::clone(subdivision))
    }
}

/// Rebuild a composite node. The result is always a new node.
pub fn rebuild<C, R>(node: &C, rebuilder: &mut R, sink: &mut dyn WarningSink) -> C
where
    C: Composite,
    R: Rebuild + ?Sized,
{
    node.with_components(rebuild_components(node.components(), rebuilder, sink))
}

/// Rebuild a component list, preserving its order.
///
/// A nested group whose children all come back shared is itself shared.
pub fn rebuild_components<R>(
    components: &[Component],
    rebuilder: &mut R,
    sink: &mut dyn WarningSink,
) -> Vec<Component>
where
    R: Rebuild + ?Sized,
{
    let mut rebuilt = Vec::with_capacity(components.len());

    for component in components {
        let next = match component {
            Component::Mesh(mesh) => rebuilder.mesh(mesh, sink),
            Component::Subdivision(subdivision) => rebuilder.subdivision(subdivision, sink),
            Component::Group(group) => {
                let children = rebuild_components(&group.components, rebuilder, sink);
                if all_shared(&group.components, &children) {
                    Component::Group(Arc::clone(group))
                } else {
                    Component::Group(Arc::new(group.with_components(children)))
                }
            }
            Component::Sphere(_)
            | Component::Cylinder(_)
            | Component::Cube(_)
            | Component::PathCom(_)
            | Component::TextCom(_)
            | Component::Modifier(_)
            | Component::Image(_) => component.clone(),
        };
        rebuilt.push(next);
    }

    rebuilt
}

fn all_shared(before: &[Component], after: &[Component]) -> bool {
    before.len() == after.len() && before.iter().zip(after).all(|(a, b)| a.ptr_eq(b))
}
