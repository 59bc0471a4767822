use super::camera::CameraDrift;
use super::{FrameCtx, Scene, SceneStats};
use crate::cube::{CellDynamics, Lattice, PatternGenerator, Playback, Sequencer};

const STEP_BANDS: [usize; 3] = [0, 2, 4];
const DRIFT_BAND: usize = 3;
const ORBIT_STEP: f32 = 0.01;

/// Lattice of cubes re-arranged by the pattern sequencer.
///
/// The sequencer advances one batch on ticks where any of the step bands is
/// active; the cells follow their targets every tick.
pub struct CubeScene {
    seq: Sequencer,
    dynamics: CellDynamics,
    camera: CameraDrift,
    orbit: f32,
    last: Option<Playback>,
    rng: fastrand::Rng,
}

impl CubeScene {
    pub fn new(
        lattice: Lattice,
        generator: PatternGenerator,
        dynamics: CellDynamics,
        mut rng: fastrand::Rng,
    ) -> Self {
        let seq = Sequencer::new(lattice, generator, rng.fork());
        Self {
            seq,
            dynamics,
            camera: CameraDrift::default(),
            orbit: 0.0,
            last: None,
            rng,
        }
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.seq
    }

    pub fn camera(&self) -> &CameraDrift {
        &self.camera
    }

    pub fn orbit_angle(&self) -> f32 {
        self.orbit
    }

    pub fn last_playback(&self) -> Option<Playback> {
        self.last
    }

    /// Orbit radius that keeps the whole lattice in view.
    pub fn orbit_radius(&self) -> f32 {
        4.0 + 2.0 * self.seq.lattice().size() as f32
    }
}

impl Scene for CubeScene {
    fn name(&self) -> &'static str {
        "Cube: Pattern Sequencer"
    }

    fn forward(&mut self, ctx: &FrameCtx) {
        self.orbit += ORBIT_STEP;
        if ctx.beats.band(DRIFT_BAND) > 0.001 {
            self.camera.nudge(&mut self.rng, 2.0, 0.95);
        }
        self.camera.ease();

        let drive: f32 = STEP_BANDS.iter().map(|&b| ctx.beats.band(b)).sum();
        if drive > 0.0 {
            self.last = Some(self.seq.next());
        }
        self.seq.integrate(self.dynamics);
    }

    fn stats(&self) -> SceneStats {
        let cells = self.seq.cells();
        SceneStats {
            extent: cells.max_abs_component(),
            finite: cells.positions().iter().all(|p| p.is_finite()),
            detail: format!(
                "pattern={} batch={}/{} settled={}",
                self.seq.queue().pattern.label(),
                self.seq.cursor(),
                self.seq.queue().len(),
                cells.all_settled()
            ),
        }
    }
}
