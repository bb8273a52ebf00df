use gs_math::Vec3;

/// World placement of an entity. Euler angles are in degrees and are stored as given, so saved
/// angles come back exactly as they were written.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub euler_angles: Vec3,
}

impl Transform {
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}
