//! Leapfrog integration of a 3-vector field kept in a three-generation ring.

pub mod buffer;
pub mod force;
pub mod integrator;
pub mod ring;
pub mod seed;

pub use buffer::{texel_uv, FieldBuffer};
pub use force::{
    curl_noise, BurstForce, ForceKernel, ImpulseParams, ManifoldSpring, SwarmForce, ZeroForce,
};
pub use integrator::{Integrator, VelocityGate};
pub use ring::{next_index, prior_index, StateRing, RING_LEN};
pub use seed::{sphere_field, sphere_point};
