use super::buffer::{texel_uv, FieldBuffer};
use super::force::{ForceKernel, ImpulseParams};
use super::ring::StateRing;
use crate::beats::Beats;
use rayon::prelude::*;

/// Scale applied to the velocity term `s0 − s1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VelocityGate {
    /// Undamped integration.
    Free,
    /// Kills the velocity term while `beats[band] >= threshold`.
    BeatFreeze { band: usize, threshold: f32 },
    Constant(f32),
}

impl VelocityGate {
    pub fn factor(&self, beats: &Beats) -> f32 {
        match *self {
            Self::Free => 1.0,
            Self::BeatFreeze { band, threshold } => 1.0 - step(threshold, beats.band(band)),
            Self::Constant(k) => k,
        }
    }
}

fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

/// Second-order update `next = s0 + gate·(s0 − s1) + force(s0)`.
pub struct Integrator {
    gate: VelocityGate,
    kernel: Box<dyn ForceKernel>,
    clamp: Option<f32>,
}

impl Integrator {
    pub fn new(gate: VelocityGate, kernel: impl ForceKernel + 'static) -> Self {
        Self {
            gate,
            kernel: Box::new(kernel),
            clamp: None,
        }
    }

    /// Caps the length of every written vector. `None` leaves values untouched.
    pub fn with_clamp(mut self, max_len: Option<f32>) -> Self {
        self.clamp = max_len.filter(|m| m.is_finite() && *m > 0.0);
        self
    }

    pub fn gate(&self) -> VelocityGate {
        self.gate
    }

    pub fn kernel_name(&self) -> &'static str {
        self.kernel.name()
    }

    pub fn step(
        &self,
        prior1: &FieldBuffer,
        prior2: &FieldBuffer,
        beats: &Beats,
        impulse: &ImpulseParams,
    ) -> FieldBuffer {
        let mut out = FieldBuffer::new(prior1.resolution());
        self.step_into(&mut out, prior1, prior2, beats, impulse);
        out
    }

    /// Writes one generation into `out`. Buffers of mismatched resolution
    /// leave `out` untouched.
    pub fn step_into(
        &self,
        out: &mut FieldBuffer,
        prior1: &FieldBuffer,
        prior2: &FieldBuffer,
        beats: &Beats,
        impulse: &ImpulseParams,
    ) {
        let res = out.resolution();
        if prior1.resolution() != res || prior2.resolution() != res {
            debug_assert!(false, "field resolution mismatch");
            return;
        }

        let gate = self.gate.factor(beats);
        let kernel: &dyn ForceKernel = &*self.kernel;
        let clamp = self.clamp;
        let s0 = prior1.as_slice();
        let s1 = prior2.as_slice();

        out.as_mut_slice()
            .par_chunks_mut(res)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, dst) in row.iter_mut().enumerate() {
                    let i = y * res + x;
                    let p = s0[i];
                    let f = kernel.force(p, texel_uv(res, x, y), beats, impulse);
                    let next = p + gate * (p - s1[i]) + f;
                    *dst = match clamp {
                        Some(max) => next.clamp_length_max(max),
                        None => next,
                    };
                }
            });
    }

    /// Writes the generation for `tick` inside the ring.
    pub fn advance(&self, ring: &mut StateRing, tick: u64, beats: &Beats, impulse: &ImpulseParams) {
        let (next, prior1, prior2) = ring.split(tick);
        self.step_into(next, prior1, prior2, beats, impulse);
    }
}
