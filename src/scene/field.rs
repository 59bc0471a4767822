use super::camera::CameraDrift;
use super::{FrameCtx, Scene, SceneStats};
use crate::field::{
    sphere_field, BurstForce, FieldBuffer, ImpulseParams, Integrator, ManifoldSpring, StateRing,
    SwarmForce, VelocityGate, ZeroForce,
};
use crate::tuning::FieldTuning;
use glam::Vec3;
use std::f32::consts::PI;

const KICK_BAND: usize = 0;
const CAMERA_LEAD: f32 = 20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldFlavor {
    /// No force; the cloud only moves once something perturbs it.
    Still,
    /// Slow constant turbulence around the sphere.
    Swarm,
    /// Beat-driven kicks with a periodic relax back onto the sphere.
    Burst,
}

impl FieldFlavor {
    pub fn label(self) -> &'static str {
        match self {
            Self::Still => "Particles: Beat Freeze",
            Self::Swarm => "Swarm: Curl Drift",
            Self::Burst => "Barticles: Impulse Burst",
        }
    }
}

/// Particle cloud whose positions live in a three-generation field ring.
pub struct FieldScene {
    flavor: FieldFlavor,
    ring: StateRing,
    integrator: Integrator,
    reset: Option<Integrator>,
    tuning: FieldTuning,
    camera: CameraDrift,
    orbit: f32,
    last_tick: Option<u64>,
    resetting: bool,
    impulse: ImpulseParams,
    rng: fastrand::Rng,
}

impl FieldScene {
    pub fn new(flavor: FieldFlavor, resolution: usize, tuning: FieldTuning, rng: fastrand::Rng) -> Self {
        let integrator = match flavor {
            FieldFlavor::Still => Integrator::new(tuning.freeze_gate(), ZeroForce),
            FieldFlavor::Swarm => Integrator::new(VelocityGate::Free, SwarmForce::default()),
            FieldFlavor::Burst => Integrator::new(tuning.freeze_gate(), BurstForce::default()),
        }
        .with_clamp(tuning.clamp);
        let reset = (flavor == FieldFlavor::Burst).then(|| {
            Integrator::new(
                VelocityGate::Constant(tuning.reset_velocity),
                ManifoldSpring {
                    strength: tuning.reset_spring,
                },
            )
            .with_clamp(tuning.clamp)
        });

        Self {
            flavor,
            ring: StateRing::seeded(sphere_field(resolution)),
            integrator,
            reset,
            tuning,
            camera: CameraDrift::default(),
            orbit: 0.0,
            last_tick: None,
            resetting: false,
            impulse: ImpulseParams::default(),
            rng,
        }
    }

    pub fn flavor(&self) -> FieldFlavor {
        self.flavor
    }

    pub fn ring(&self) -> &StateRing {
        &self.ring
    }

    /// Most recently written generation (the seed before the first tick).
    pub fn latest(&self) -> &FieldBuffer {
        match self.last_tick {
            Some(t) => self.ring.next(t),
            None => self.ring.next(0),
        }
    }

    pub fn camera(&self) -> &CameraDrift {
        &self.camera
    }

    pub fn orbit_angle(&self) -> f32 {
        self.orbit
    }

    pub fn is_resetting(&self) -> bool {
        self.resetting
    }

    pub fn last_impulse(&self) -> ImpulseParams {
        self.impulse
    }

    fn step_burst(&mut self, ctx: &FrameCtx) {
        let kick = ctx.beats.band(KICK_BAND);
        self.impulse = ImpulseParams::random(&mut self.rng, kick);
        if kick > 0.0 {
            self.camera
                .set_goal(self.impulse.origin + CAMERA_LEAD * self.impulse.dir);
        }

        let resetting = self.tuning.in_reset(ctx.tick);
        if resetting != self.resetting {
            tracing::debug!(tick = ctx.tick, resetting, "field reset mode");
            self.resetting = resetting;
        }

        match (&self.reset, resetting) {
            (Some(reset), true) => {
                self.camera.set_goal(Vec3::ZERO);
                reset.advance(&mut self.ring, ctx.tick, &ctx.beats, &self.impulse);
            }
            _ => self
                .integrator
                .advance(&mut self.ring, ctx.tick, &ctx.beats, &self.impulse),
        }
    }
}

impl Scene for FieldScene {
    fn name(&self) -> &'static str {
        self.flavor.label()
    }

    fn forward(&mut self, ctx: &FrameCtx) {
        // Orbit only ever moves forward, even if the tempo estimate drops.
        self.orbit = self.orbit.max(0.0125 * 2.0 * PI * ctx.tempo * ctx.time);
        self.camera.ease();

        match self.flavor {
            FieldFlavor::Burst => self.step_burst(ctx),
            FieldFlavor::Still | FieldFlavor::Swarm => {
                self.integrator
                    .advance(&mut self.ring, ctx.tick, &ctx.beats, &self.impulse)
            }
        }
        self.last_tick = Some(ctx.tick);
    }

    fn stats(&self) -> SceneStats {
        let latest = self.latest();
        SceneStats {
            extent: latest.max_radius(),
            finite: latest.is_finite(),
            detail: format!(
                "kernel={} mean_r={:.4} reset={}",
                if self.resetting { "manifold" } else { self.integrator.kernel_name() },
                latest.mean_radius(),
                self.resetting
            ),
        }
    }
}
