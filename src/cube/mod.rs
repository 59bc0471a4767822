//! Event-driven animation of an N×N×N lattice of cells.

pub mod cells;
pub mod cluster;
pub mod lattice;
pub mod pattern;
pub mod queue;
pub mod sequencer;

pub use cells::{CellDynamics, CellStore};
pub use cluster::{find_clusters, MAX_CLUSTER};
pub use lattice::{Cell, Lattice};
pub use pattern::{Cascade, PatternGenerator, PatternKind};
pub use queue::{AnimationQueue, Event, EventBatch};
pub use sequencer::{Playback, Sequencer};
