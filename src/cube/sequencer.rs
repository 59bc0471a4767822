use super::cells::{CellDynamics, CellStore};
use super::lattice::Lattice;
use super::pattern::{PatternGenerator, PatternKind};
use super::queue::AnimationQueue;

/// What a call to [`Sequencer::next`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// The queue was exhausted and a new one was generated; nothing applied.
    Regenerated { pattern: PatternKind, batches: usize },
    /// The batch at `index` was applied.
    Applied { index: usize, events: usize, snap: bool },
}

/// Replays generated animation queues against the lattice cells.
///
/// The sequencer exclusively owns the cell state and the queue; callers
/// drive it with [`next`](Self::next) once per tick and read positions
/// through [`cells`](Self::cells).
pub struct Sequencer {
    cells: CellStore,
    queue: AnimationQueue,
    cursor: usize,
    generator: PatternGenerator,
    rng: fastrand::Rng,
}

impl Sequencer {
    pub fn new(lattice: Lattice, generator: PatternGenerator, rng: fastrand::Rng) -> Self {
        let mut seq = Self {
            cells: CellStore::identity(lattice),
            queue: AnimationQueue::new(PatternKind::Sandpile),
            cursor: 0,
            generator,
            rng,
        };
        seq.init();
        seq
    }

    pub fn with_seed(lattice: Lattice, seed: u64) -> Self {
        Self::new(lattice, PatternGenerator::default(), fastrand::Rng::with_seed(seed))
    }

    /// Puts every cell back on its coordinate and generates a fresh queue.
    pub fn init(&mut self) {
        self.cells.reset_identity();
        self.regenerate();
    }

    /// Replaces the current queue; the next call plays its first batch.
    pub fn play(&mut self, queue: AnimationQueue) {
        self.queue = queue;
        self.cursor = 0;
    }

    pub fn next(&mut self) -> Playback {
        let Some(batch) = self.queue.get(self.cursor) else {
            self.regenerate();
            return Playback::Regenerated {
                pattern: self.queue.pattern,
                batches: self.queue.len(),
            };
        };

        for ev in &batch.events {
            if batch.snap {
                self.cells.snap_to(ev.cell, ev.dst);
            } else {
                self.cells.move_to(ev.cell, ev.dst);
            }
        }
        let applied = Playback::Applied {
            index: self.cursor,
            events: batch.len(),
            snap: batch.snap,
        };
        self.cursor += 1;
        applied
    }

    pub fn integrate(&mut self, dynamics: CellDynamics) {
        self.cells.integrate(dynamics);
    }

    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    pub fn lattice(&self) -> Lattice {
        self.cells.lattice()
    }

    pub fn queue(&self) -> &AnimationQueue {
        &self.queue
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.cursor)
    }

    fn regenerate(&mut self) {
        let lattice = self.cells.lattice();
        self.queue = self.generator.generate(&lattice, &mut self.rng);
        self.cursor = 0;
        tracing::debug!(
            pattern = self.queue.pattern.label(),
            batches = self.queue.len(),
            "cube queue generated"
        );
    }
}
