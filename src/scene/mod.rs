mod camera;
mod cube;
mod field;

use crate::beats::Beats;
use crate::cube::{Lattice, PatternGenerator};
use crate::tuning::Tuning;
use std::fmt;

pub use camera::CameraDrift;
pub use cube::CubeScene;
pub use field::{FieldFlavor, FieldScene};

/// Everything a scene receives from the frame driver for one tick.
#[derive(Debug, Clone, Copy)]
pub struct FrameCtx {
    pub tick: u64,
    /// Seconds since the driver started.
    pub time: f32,
    pub tempo: f32,
    pub beats: Beats,
}

/// Snapshot of a scene's produced state, for reports and smoke checks.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneStats {
    /// Largest absolute coordinate (cube) or radius (field).
    pub extent: f32,
    pub finite: bool,
    pub detail: String,
}

pub trait Scene {
    fn name(&self) -> &'static str;
    fn forward(&mut self, ctx: &FrameCtx);
    fn stats(&self) -> SceneStats;
}

#[derive(Debug, Clone)]
pub struct SceneOptions {
    pub grid_size: usize,
    pub resolution: usize,
    pub seed: u64,
    pub tuning: Tuning,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            grid_size: 4,
            resolution: 128,
            seed: 0,
            tuning: Tuning::default(),
        }
    }
}

pub fn make_scenes(opts: &SceneOptions) -> Vec<Box<dyn Scene>> {
    let mut rng = fastrand::Rng::with_seed(opts.seed);
    let t = &opts.tuning;

    let mut v: Vec<Box<dyn Scene>> = Vec::new();
    v.push(Box::new(CubeScene::new(
        Lattice::new(opts.grid_size),
        PatternGenerator::new(t.cascade.clone()),
        t.cube,
        rng.fork(),
    )));
    for flavor in [FieldFlavor::Still, FieldFlavor::Swarm, FieldFlavor::Burst] {
        v.push(Box::new(FieldScene::new(flavor, opts.resolution, t.field, rng.fork())));
    }
    v
}

pub fn scene_names(scenes: &[Box<dyn Scene>]) -> Vec<&'static str> {
    scenes.iter().map(|s| s.name()).collect()
}

/// Matches an index or a case-insensitive name fragment.
pub fn select_scene(query: &str, scenes: &[Box<dyn Scene>]) -> Result<usize, SceneError> {
    let q = query.trim();
    if q.is_empty() {
        return Err(SceneError::UnknownScene(query.to_string()));
    }
    if let Ok(i) = q.parse::<usize>() {
        return if i < scenes.len() {
            Ok(i)
        } else {
            Err(SceneError::UnknownScene(query.to_string()))
        };
    }
    let q_l = q.to_lowercase();
    scenes
        .iter()
        .position(|s| s.name().to_lowercase().contains(&q_l))
        .ok_or_else(|| SceneError::UnknownScene(query.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    UnknownScene(String),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownScene(q) => write!(f, "no scene matches '{q}'"),
        }
    }
}

impl std::error::Error for SceneError {}
