pub use glam::*;

/// Component-wise comparison within `epsilon`. Coordinates that went through a text round trip
/// are compared with this rather than `==`.
#[inline]
pub fn approx_eq_vec3(a: Vec3, b: Vec3, epsilon: f32) -> bool {
    a.abs_diff_eq(b, epsilon)
}
