use super::cluster::find_clusters;
use super::lattice::{Cell, Lattice};
use super::queue::{AnimationQueue, Event, EventBatch};
use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Octree,
    ScreenTile,
    Shuffle,
    Polyomino,
    Slice,
    Explode,
    Sandpile,
}

impl PatternKind {
    pub const fn all() -> [Self; 7] {
        [
            Self::Octree,
            Self::ScreenTile,
            Self::Shuffle,
            Self::Polyomino,
            Self::Slice,
            Self::Explode,
            Self::Sandpile,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Octree => "Octree Split",
            Self::ScreenTile => "Screen Tile",
            Self::Shuffle => "Cluster Shuffle",
            Self::Polyomino => "Polyomino In/Out",
            Self::Slice => "Slice Sweep",
            Self::Explode => "Explode",
            Self::Sandpile => "Sandpile",
        }
    }

    /// Key used for this pattern in tuning files.
    pub fn key(self) -> &'static str {
        match self {
            Self::Octree => "octree",
            Self::ScreenTile => "screen",
            Self::Shuffle => "shuffle",
            Self::Polyomino => "polyomino",
            Self::Slice => "slice",
            Self::Explode => "explode",
            Self::Sandpile => "sandpile",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::all().into_iter().find(|k| k.key() == key)
    }
}

/// Ordered `(threshold, pattern)` list.
///
/// Selection draws one uniform value per entry, in order; the first entry
/// whose draw falls below its threshold wins. The last entry is taken when
/// nothing matched, whatever its threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Cascade {
    entries: Vec<(f32, PatternKind)>,
}

impl Default for Cascade {
    fn default() -> Self {
        Self {
            entries: vec![
                (0.25, PatternKind::Octree),
                (0.1, PatternKind::ScreenTile),
                (0.25, PatternKind::Shuffle),
                (0.5, PatternKind::Polyomino),
                (0.5, PatternKind::Slice),
                (0.5, PatternKind::Explode),
                (1.0, PatternKind::Sandpile),
            ],
        }
    }
}

impl Cascade {
    /// Falls back to the default cascade when `entries` is empty.
    pub fn new(entries: Vec<(f32, PatternKind)>) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        Self { entries }
    }

    pub fn only(kind: PatternKind) -> Self {
        Self {
            entries: vec![(1.0, kind)],
        }
    }

    pub fn entries(&self) -> &[(f32, PatternKind)] {
        &self.entries
    }

    pub fn threshold(&self, kind: PatternKind) -> Option<f32> {
        self.entries.iter().find(|(_, k)| *k == kind).map(|(p, _)| *p)
    }

    /// Updates `kind` in place. A kind not yet listed goes in just before
    /// the fallback entry.
    pub fn set_threshold(&mut self, kind: PatternKind, p: f32) {
        let p = p.clamp(0.0, 1.0);
        match self.entries.iter_mut().find(|(_, k)| *k == kind) {
            Some(entry) => entry.0 = p,
            None => {
                let at = self.entries.len().saturating_sub(1);
                self.entries.insert(at, (p, kind));
            }
        }
    }

    pub fn pick(&self, rng: &mut fastrand::Rng) -> PatternKind {
        let last = self.entries.len().saturating_sub(1);
        for (idx, &(p, kind)) in self.entries.iter().enumerate() {
            if idx == last || rng.f32() < p {
                return kind;
            }
        }
        PatternKind::Sandpile
    }
}

const SANDPILE_LIFT: f32 = 20.0;
const POLY_REPEAT_P: f32 = 0.9;
const SLICE_REPEAT_P: f32 = 0.6;
const EXPLODE_SCALE: f32 = 3.0;
const SHUFFLE_ROUNDS: usize = 40;
const SHUFFLE_ZERO_ROUNDS: usize = 3;
const OCTREE_SPREAD: f32 = 8.0;

#[derive(Debug, Clone, Default)]
pub struct PatternGenerator {
    cascade: Cascade,
}

impl PatternGenerator {
    pub fn new(cascade: Cascade) -> Self {
        Self { cascade }
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    pub fn generate(&self, lattice: &Lattice, rng: &mut fastrand::Rng) -> AnimationQueue {
        let kind = self.cascade.pick(rng);
        build(kind, lattice, rng)
    }
}

/// Builds the full queue for one pattern.
pub fn build(kind: PatternKind, lattice: &Lattice, rng: &mut fastrand::Rng) -> AnimationQueue {
    let mut q = AnimationQueue::new(kind);
    match kind {
        PatternKind::Octree => octree(lattice, &mut q),
        PatternKind::ScreenTile => screen_tile(lattice, &mut q),
        PatternKind::Shuffle => shuffle(lattice, rng, &mut q),
        PatternKind::Polyomino => {
            poly_out(lattice, rng, &mut q);
            q.pause(5);
            while rng.f32() < POLY_REPEAT_P {
                poly_in(lattice, rng, &mut q);
                q.pause(1);
                poly_out(lattice, rng, &mut q);
            }
            poly_in(lattice, rng, &mut q);
        }
        PatternKind::Slice => {
            slice(lattice, &mut q);
            while rng.f32() < SLICE_REPEAT_P {
                slice(lattice, &mut q);
            }
        }
        PatternKind::Explode => explode(lattice, &mut q),
        PatternKind::Sandpile => {
            sandpile_out(lattice, rng, &mut q);
            sandpile_in(lattice, rng, &mut q);
        }
    }
    if q.is_empty() {
        q.pause(1);
    }
    q
}

/// Drops cells onto random `(x, y)` columns until every column holds `N`.
/// Yields the dropped cells in order; the column axis is `i`/`k`, the
/// height axis is `j`.
fn sandpile_order(lattice: &Lattice, rng: &mut fastrand::Rng) -> Vec<Cell> {
    let n = lattice.size();
    let mut height = vec![0usize; n * n];
    let mut order = Vec::with_capacity(lattice.len());
    while order.len() < lattice.len() {
        let x = rng.usize(..n);
        let y = rng.usize(..n);
        let h = &mut height[x * n + y];
        if *h < n {
            order.push(Cell::new(x as i32, *h as i32, y as i32));
            *h += 1;
        }
    }
    order
}

fn sandpile_out(lattice: &Lattice, rng: &mut fastrand::Rng, q: &mut AnimationQueue) {
    for cell in sandpile_order(lattice, rng) {
        let dst = Vec3::new(cell.i as f32, -SANDPILE_LIFT, cell.k as f32);
        q.push_moves(vec![Event::new(cell, dst)]);
    }
}

fn sandpile_in(lattice: &Lattice, rng: &mut fastrand::Rng, q: &mut AnimationQueue) {
    let lifted = lattice
        .cells()
        .map(|c| Event::new(c, c.home() + Vec3::Y * SANDPILE_LIFT))
        .collect();
    q.push(EventBatch::snaps(lifted));
    q.pause(5);
    for cell in sandpile_order(lattice, rng) {
        q.push_moves(vec![Event::home(cell)]);
    }
}

fn rigid_offset(lattice: &Lattice, rng: &mut fastrand::Rng) -> Vec3 {
    let reach = lattice.size() as f32 + 1.0;
    let mut delta = Vec3::ZERO;
    delta[rng.usize(..3)] = if rng.bool() { -reach } else { reach };
    delta
}

/// Scatters every group at once, then brings groups home one per tick.
fn poly_in(lattice: &Lattice, rng: &mut fastrand::Rng, q: &mut AnimationQueue) {
    let groups = find_clusters(lattice, rng);
    let mut scatter = Vec::with_capacity(lattice.len());
    let mut returns = Vec::with_capacity(groups.len());
    for group in &groups {
        let delta = rigid_offset(lattice, rng);
        scatter.extend(group.iter().map(|&c| Event::new(c, c.home() + delta)));
        returns.push(group.iter().map(|&c| Event::home(c)).collect());
    }
    q.push_moves(scatter);
    for events in returns {
        q.push_moves(events);
    }
}

/// Sends groups away one per tick.
fn poly_out(lattice: &Lattice, rng: &mut fastrand::Rng, q: &mut AnimationQueue) {
    for group in find_clusters(lattice, rng) {
        let delta = rigid_offset(lattice, rng);
        q.push_moves(group.iter().map(|&c| Event::new(c, c.home() + delta)).collect());
    }
}

fn explode(lattice: &Lattice, q: &mut AnimationQueue) {
    let c = lattice.center();
    let n = lattice.size() as f32;
    let center = Vec3::splat(c);

    q.push_moves(lattice.cells().map(|cell| Event::new(cell, center)).collect());
    q.pause(14);
    q.push_moves(
        lattice
            .cells()
            .map(|cell| Event::new(cell, EXPLODE_SCALE * (cell.home() - center) + Vec3::splat(n)))
            .collect(),
    );
    q.pause(30);
    q.push_moves(lattice.cells().map(Event::home).collect());
    q.pause(15);
}

fn slice(lattice: &Lattice, q: &mut AnimationQueue) {
    let n = lattice.size() as i32;
    // (sweep axis, descending, doubling mask applied to the destination)
    const PHASES: [(usize, bool, [bool; 3]); 6] = [
        (0, true, [true, false, false]),
        (1, true, [true, true, false]),
        (2, true, [true, true, true]),
        (0, false, [false, true, true]),
        (1, false, [false, false, true]),
        (2, false, [false, false, false]),
    ];
    for (axis, descending, double) in PHASES {
        for step in 0..n {
            let layer = if descending { n - 1 - step } else { step };
            let events = lattice
                .cells()
                .filter(|c| c.axis(axis) == layer)
                .map(|c| {
                    let mut dst = c.home();
                    for d in 0..3 {
                        if double[d] {
                            dst[d] *= 2.0;
                        }
                    }
                    Event::new(c, dst)
                })
                .collect();
            q.push_moves(events);
        }
    }
}

fn shuffle(lattice: &Lattice, rng: &mut fastrand::Rng, q: &mut AnimationQueue) {
    let groups = find_clusters(lattice, rng);
    let mut offsets = vec![[0i32; 3]; groups.len()];

    let apply = |offsets: &[[i32; 3]], q: &mut AnimationQueue| {
        let mut events = Vec::with_capacity(lattice.len());
        for (group, off) in groups.iter().zip(offsets) {
            let off = Vec3::new(off[0] as f32, off[1] as f32, off[2] as f32);
            events.extend(group.iter().map(|&c| Event::new(c, c.home() + off)));
        }
        q.push_moves(events);
    };

    apply(&offsets, q);
    for _ in 0..SHUFFLE_ROUNDS {
        for off in &mut offsets {
            // Truncation toward zero keeps the nudge in [-4, 4].
            off[rng.usize(..3)] += ((rng.f32() - 0.5) * 10.0) as i32;
        }
        apply(&offsets, q);
    }
    for _ in 0..SHUFFLE_ZERO_ROUNDS {
        for off in &mut offsets {
            off[rng.usize(..3)] = 0;
        }
        apply(&offsets, q);
    }
    offsets.fill([0; 3]);
    apply(&offsets, q);
}

fn octree(lattice: &Lattice, q: &mut AnimationQueue) {
    let half = lattice.center();
    let local = |c: i32| 4.0 * (c / 2) as f32 + (c % 2) as f32 - half;
    q.push_moves(
        lattice
            .cells()
            .map(|c| Event::new(c, Vec3::new(local(c.i), local(c.j), local(c.k))))
            .collect(),
    );
    q.pause(10);
    q.push_moves(
        lattice
            .cells()
            .map(|c| Event::new(c, OCTREE_SPREAD * c.home() - Vec3::splat(OCTREE_SPREAD)))
            .collect(),
    );
    q.pause(10);
}

fn screen_tile(lattice: &Lattice, q: &mut AnimationQueue) {
    let n = lattice.size() as f32;
    q.push_moves(
        lattice
            .cells()
            .map(|c| {
                let dst = Vec3::new(
                    c.i as f32 + n * (c.k % 2) as f32,
                    c.j as f32 + n * (c.k / 2) as f32,
                    0.0,
                );
                Event::new(c, dst)
            })
            .collect(),
    );
    q.pause(4);
}
