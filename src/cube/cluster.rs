use super::lattice::{Cell, Lattice};

pub const MAX_CLUSTER: usize = 5;
const STEPS_PER_CELL: usize = 4;

/// Partitions the lattice into small connected groups ("polyominoes").
///
/// Each group grows from the first unclaimed cell (lattice order) by a
/// randomized breadth-first walk: every cell taken from the group's frontier
/// gets up to four single-axis `±1` probes, and a probe is accepted when it
/// lands in-bounds on an unclaimed cell. Growth stops at [`MAX_CLUSTER`]
/// cells or when the frontier is exhausted. The returned order is shuffled.
pub fn find_clusters(lattice: &Lattice, rng: &mut fastrand::Rng) -> Vec<Vec<Cell>> {
    let mut claimed = vec![false; lattice.len()];
    let mut groups = Vec::new();

    for seed in lattice.cells() {
        let Some(seed_idx) = lattice.index(seed) else {
            continue;
        };
        if claimed[seed_idx] {
            continue;
        }
        claimed[seed_idx] = true;

        let mut group = vec![seed];
        let mut ptr = 0usize;
        'grow: while group.len() < MAX_CLUSTER && ptr < group.len() {
            let from = group[ptr];
            ptr += 1;
            for _ in 0..STEPS_PER_CELL {
                let axis = rng.usize(..3);
                let delta = if rng.bool() { -1 } else { 1 };
                let probe = from.with_axis(axis, from.axis(axis) + delta);
                let Some(idx) = lattice.index(probe) else {
                    continue;
                };
                if claimed[idx] {
                    continue;
                }
                claimed[idx] = true;
                group.push(probe);
                if group.len() >= MAX_CLUSTER {
                    break 'grow;
                }
            }
        }
        groups.push(group);
    }

    rng.shuffle(&mut groups);
    groups
}
