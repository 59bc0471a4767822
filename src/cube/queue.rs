use super::lattice::Cell;
use super::pattern::PatternKind;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub cell: Cell,
    pub dst: Vec3,
}

impl Event {
    pub fn new(cell: Cell, dst: Vec3) -> Self {
        Self { cell, dst }
    }

    /// Sends the cell back to its own coordinate.
    pub fn home(cell: Cell) -> Self {
        Self::new(cell, cell.home())
    }
}

/// One tick's worth of events. An empty batch is a pacing tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBatch {
    pub events: Vec<Event>,
    pub snap: bool,
}

impl EventBatch {
    pub fn moves(events: Vec<Event>) -> Self {
        Self { events, snap: false }
    }

    pub fn snaps(events: Vec<Event>) -> Self {
        Self { events, snap: true }
    }

    pub fn pause() -> Self {
        Self::default()
    }

    pub fn is_pause(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationQueue {
    pub pattern: PatternKind,
    pub batches: Vec<EventBatch>,
}

impl AnimationQueue {
    pub fn new(pattern: PatternKind) -> Self {
        Self {
            pattern,
            batches: Vec::new(),
        }
    }

    pub fn push(&mut self, batch: EventBatch) {
        self.batches.push(batch);
    }

    pub fn push_moves(&mut self, events: Vec<Event>) {
        self.batches.push(EventBatch::moves(events));
    }

    pub fn pause(&mut self, ticks: usize) {
        self.batches
            .extend(std::iter::repeat_with(EventBatch::pause).take(ticks));
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&EventBatch> {
        self.batches.get(idx)
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.batches.iter().flat_map(|b| b.events.iter())
    }
}
