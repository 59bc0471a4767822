use super::buffer::FieldBuffer;
use glam::{Vec2, Vec3};
use std::f32::consts::PI;

/// Point on the unit sphere for a texel coordinate.
///
/// `u` wraps the longitude twice (θ = 4πu) and `v` spans pole to pole
/// (φ = π(v − 0.5)).
pub fn sphere_point(uv: Vec2) -> Vec3 {
    let theta = 4.0 * PI * uv.x;
    let phi = PI * (uv.y - 0.5);
    Vec3::new(theta.cos() * phi.cos(), theta.sin() * phi.cos(), phi.sin())
}

pub fn sphere_field(resolution: usize) -> FieldBuffer {
    FieldBuffer::from_fn(resolution, sphere_point)
}
