/// Placement of scene nodes relative to their parent
use nalgebra::{Point3, UnitQuaternion};

/// Origin and orientation of a node.
///
/// Used both for a node's `base` and for its `pivot`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Base {
    pub origin: Point3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

impl Base {
    pub fn identity() -> Self {
        Self {
            origin: Point3::origin(),
            orientation: UnitQuaternion::identity(),
        }
    }

    pub fn from_origin(x: f32, y: f32, z: f32) -> Self {
        Self {
            origin: Point3::new(x, y, z),
            orientation: UnitQuaternion::identity(),
        }
    }
}

impl Default for Base {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_base() {
        let base = Base::identity();
        assert_eq!(base.origin, Point3::origin());
        assert_eq!(base.orientation, UnitQuaternion::identity());
        assert_eq!(base, Base::default());
    }

    #[test]
    fn test_base_from_origin() {
        let base = Base::from_origin(1.0, 2.0, 3.0);
        assert!((base.origin.x - 1.0).abs() < 1e-6);
        assert!((base.origin.y - 2.0).abs() < 1e-6);
        assert!((base.origin.z - 3.0).abs() < 1e-6);
        assert_eq!(base.orientation, UnitQuaternion::identity());
    }
}
