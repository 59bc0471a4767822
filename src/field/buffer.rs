use glam::{Vec2, Vec3};

/// One generation of the field: `resolution × resolution` vectors, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBuffer {
    resolution: usize,
    data: Vec<Vec3>,
}

impl FieldBuffer {
    pub fn new(resolution: usize) -> Self {
        let resolution = resolution.max(1);
        Self {
            resolution,
            data: vec![Vec3::ZERO; resolution * resolution],
        }
    }

    /// Fills every texel from its normalized coordinate.
    pub fn from_fn(resolution: usize, f: impl Fn(Vec2) -> Vec3) -> Self {
        let mut buf = Self::new(resolution);
        let res = buf.resolution;
        for (idx, v) in buf.data.iter_mut().enumerate() {
            *v = f(texel_uv(res, idx % res, idx / res));
        }
        buf
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Vec3> {
        if x >= self.resolution || y >= self.resolution {
            return None;
        }
        Some(self.data[y * self.resolution + x])
    }

    pub fn as_slice(&self) -> &[Vec3] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Vec3] {
        &mut self.data
    }

    pub fn mean_radius(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().map(|v| v.length()).sum::<f32>() / self.data.len() as f32
    }

    pub fn max_radius(&self) -> f32 {
        self.data.iter().map(|v| v.length()).fold(0.0, f32::max)
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

/// Texel-centre coordinate of `(x, y)`.
pub fn texel_uv(resolution: usize, x: usize, y: usize) -> Vec2 {
    let r = resolution.max(1) as f32;
    Vec2::new((x as f32 + 0.5) / r, (y as f32 + 0.5) / r)
}
