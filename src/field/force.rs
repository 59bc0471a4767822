use super::seed::sphere_point;
use crate::beats::Beats;
use glam::{Vec2, Vec3};

/// Transient per-tick input of impulse-driven kernels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseParams {
    pub dir: Vec3,
    pub origin: Vec3,
    pub weight: f32,
}

impl Default for ImpulseParams {
    fn default() -> Self {
        Self {
            dir: Vec3::ZERO,
            origin: Vec3::ZERO,
            weight: 1.0,
        }
    }
}

impl ImpulseParams {
    /// Random kick scaled by the kick-band intensity, around a random
    /// origin inside the unit cube centred on zero.
    pub fn random(rng: &mut fastrand::Rng, kick: f32) -> Self {
        let mut centred = || rng.f32() - 0.5;
        let dir = Vec3::new(centred(), centred(), centred()) * (0.1 * kick);
        let origin = Vec3::new(centred(), centred(), centred());
        Self {
            dir,
            origin,
            weight: 1.0,
        }
    }
}

pub trait ForceKernel: Send + Sync {
    fn name(&self) -> &'static str;
    fn force(&self, p: Vec3, uv: Vec2, beats: &Beats, impulse: &ImpulseParams) -> Vec3;
}

pub struct ZeroForce;

impl ForceKernel for ZeroForce {
    fn name(&self) -> &'static str {
        "zero"
    }

    fn force(&self, _p: Vec3, _uv: Vec2, _beats: &Beats, _impulse: &ImpulseParams) -> Vec3 {
        Vec3::ZERO
    }
}

/// Constant turbulence plus a weak pull back onto the unit sphere.
#[derive(Debug, Clone, Copy)]
pub struct SwarmForce {
    pub curl: f32,
    pub centering: f32,
    pub seed: u32,
}

impl Default for SwarmForce {
    fn default() -> Self {
        Self {
            curl: 0.000_01,
            centering: 0.000_005,
            seed: 0,
        }
    }
}

impl ForceKernel for SwarmForce {
    fn name(&self) -> &'static str {
        "swarm"
    }

    fn force(&self, p: Vec3, _uv: Vec2, _beats: &Beats, _impulse: &ImpulseParams) -> Vec3 {
        self.curl * curl_noise(p, self.seed) + self.centering * (p.normalize_or_zero() - p)
    }
}

/// Beat-driven turbulence, a centering pull that relaxes on `centering_band`,
/// and a localized kick with a logistic falloff around the impulse origin.
#[derive(Debug, Clone, Copy)]
pub struct BurstForce {
    pub curl: f32,
    pub curl_band: usize,
    pub centering: f32,
    pub centering_band: usize,
    pub falloff_radius: f32,
    pub falloff_sharpness: f32,
    pub seed: u32,
}

impl Default for BurstForce {
    fn default() -> Self {
        Self {
            curl: 0.0025,
            curl_band: 0,
            centering: 0.000_05,
            centering_band: 3,
            falloff_radius: 0.9,
            falloff_sharpness: 20.0,
            seed: 0,
        }
    }
}

impl ForceKernel for BurstForce {
    fn name(&self) -> &'static str {
        "burst"
    }

    fn force(&self, p: Vec3, _uv: Vec2, beats: &Beats, impulse: &ImpulseParams) -> Vec3 {
        let turbulence = self.curl * beats.band(self.curl_band) * curl_noise(p, self.seed);
        let centering =
            self.centering * (1.0 - beats.band(self.centering_band)) * (p.normalize_or_zero() - p);
        let dist = (p - impulse.origin).length();
        let falloff = logistic(self.falloff_sharpness * (self.falloff_radius - dist));
        turbulence + centering + impulse.dir * (impulse.weight * falloff)
    }
}

/// Spring toward the seeding sphere at the texel's own coordinate.
#[derive(Debug, Clone, Copy)]
pub struct ManifoldSpring {
    pub strength: f32,
}

impl Default for ManifoldSpring {
    fn default() -> Self {
        Self { strength: 0.01 }
    }
}

impl ForceKernel for ManifoldSpring {
    fn name(&self) -> &'static str {
        "manifold"
    }

    fn force(&self, p: Vec3, uv: Vec2, _beats: &Beats, _impulse: &ImpulseParams) -> Vec3 {
        self.strength * (sphere_point(uv) - p)
    }
}

pub fn logistic(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Unit-length curl of a three-channel gradient-noise potential, by central
/// differences.
pub fn curl_noise(p: Vec3, seed: u32) -> Vec3 {
    const E: f32 = 0.1;
    let dx = Vec3::new(E, 0.0, 0.0);
    let dy = Vec3::new(0.0, E, 0.0);
    let dz = Vec3::new(0.0, 0.0, E);

    let px0 = noise_vec3(p - dx, seed);
    let px1 = noise_vec3(p + dx, seed);
    let py0 = noise_vec3(p - dy, seed);
    let py1 = noise_vec3(p + dy, seed);
    let pz0 = noise_vec3(p - dz, seed);
    let pz1 = noise_vec3(p + dz, seed);

    let x = py1.z - py0.z - pz1.y + pz0.y;
    let y = pz1.x - pz0.x - px1.z + px0.z;
    let z = px1.y - px0.y - py1.x + py0.x;
    (Vec3::new(x, y, z) * (1.0 / (2.0 * E))).normalize_or_zero()
}

fn noise_vec3(p: Vec3, seed: u32) -> Vec3 {
    Vec3::new(
        gradient_noise(p, seed),
        gradient_noise(Vec3::new(p.y - 19.1, p.z + 33.4, p.x + 47.2), seed),
        gradient_noise(Vec3::new(p.z + 74.2, p.x - 124.5, p.y + 99.4), seed),
    )
}

const GRADIENTS: [Vec3; 12] = [
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(-1.0, 1.0, 0.0),
    Vec3::new(1.0, -1.0, 0.0),
    Vec3::new(-1.0, -1.0, 0.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(-1.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, -1.0),
    Vec3::new(-1.0, 0.0, -1.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(0.0, -1.0, 1.0),
    Vec3::new(0.0, 1.0, -1.0),
    Vec3::new(0.0, -1.0, -1.0),
];

/// Lattice gradient noise in roughly `[-1, 1]`.
pub fn gradient_noise(p: Vec3, seed: u32) -> f32 {
    let cell = p.floor();
    let f = p - cell;
    let (ix, iy, iz) = (cell.x as i32, cell.y as i32, cell.z as i32);
    let fade = f * f * f * (f * (f * 6.0 - Vec3::splat(15.0)) + Vec3::splat(10.0));

    let corner = |ox: i32, oy: i32, oz: i32| -> f32 {
        let h = hash3(ix + ox, iy + oy, iz + oz, seed);
        let g = GRADIENTS[(h % GRADIENTS.len() as u32) as usize];
        g.dot(f - Vec3::new(ox as f32, oy as f32, oz as f32))
    };

    let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), fade.x);
    let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), fade.x);
    let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), fade.x);
    let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), fade.x);
    let y0 = lerp(x00, x10, fade.y);
    let y1 = lerp(x01, x11, fade.y);
    lerp(y0, y1, fade.z)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn hash3(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    // Deterministic 3D hash (not crypto).
    let mut n = (x as u32).wrapping_mul(374_761_393)
        ^ (y as u32).wrapping_mul(668_265_263)
        ^ (z as u32).wrapping_mul(2_246_822_519)
        ^ seed.wrapping_mul(0x9E37_79B9);
    n ^= n >> 13;
    n = n.wrapping_mul(1_274_126_177);
    n ^ (n >> 16)
}
