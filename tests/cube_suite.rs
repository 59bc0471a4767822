use std::collections::HashSet;

use glam::Vec3;
use scene_engine::cube::pattern::build;
use scene_engine::cube::{
    find_clusters, AnimationQueue, Cascade, Cell, CellDynamics, Event, EventBatch, Lattice,
    PatternGenerator, PatternKind, Playback, Sequencer, MAX_CLUSTER,
};

fn adjacent(a: Cell, b: Cell) -> bool {
    (a.i - b.i).abs() + (a.j - b.j).abs() + (a.k - b.k).abs() == 1
}

#[test]
fn lattice_index_is_dense_and_bounds_checked() {
    let lattice = Lattice::new(3);
    assert_eq!(lattice.len(), 27);
    assert_eq!(lattice.index(Cell::new(1, 2, 0)), Some(5));
    assert_eq!(lattice.index(Cell::new(0, 0, 2)), Some(18));
    assert_eq!(lattice.index(Cell::new(3, 0, 0)), None);
    assert_eq!(lattice.index(Cell::new(0, -1, 0)), None);

    let seen: HashSet<usize> = lattice.cells().filter_map(|c| lattice.index(c)).collect();
    assert_eq!(seen.len(), 27);
    assert!(seen.iter().all(|&i| i < 27));
    assert_eq!(Lattice::new(0).size(), 1);
}

#[test]
fn clusters_partition_the_lattice() {
    for n in 1..=6 {
        let lattice = Lattice::new(n);
        for seed in 0..40u64 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let groups = find_clusters(&lattice, &mut rng);

            let mut seen = HashSet::new();
            for group in &groups {
                assert!(
                    (1..=MAX_CLUSTER).contains(&group.len()),
                    "n={n} seed={seed}: group of {}",
                    group.len()
                );
                for (idx, &cell) in group.iter().enumerate() {
                    assert!(lattice.contains(cell), "n={n} seed={seed}: {cell:?} outside");
                    assert!(seen.insert(cell), "n={n} seed={seed}: {cell:?} claimed twice");
                    if idx > 0 {
                        assert!(
                            group[..idx].iter().any(|&c| adjacent(c, cell)),
                            "n={n} seed={seed}: {cell:?} not connected to its group"
                        );
                    }
                }
            }
            assert_eq!(seen.len(), lattice.len(), "n={n} seed={seed}: cells missing");
        }
    }
}

#[test]
fn every_pattern_builds_a_queue_within_the_lattice() {
    for n in 1..=5 {
        let lattice = Lattice::new(n);
        for kind in PatternKind::all() {
            for seed in 0..8u64 {
                let mut rng = fastrand::Rng::with_seed(seed);
                let q = build(kind, &lattice, &mut rng);
                assert_eq!(q.pattern, kind);
                assert!(!q.is_empty(), "{} produced an empty queue for n={n}", kind.label());
                for ev in q.events() {
                    assert!(lattice.contains(ev.cell), "{}: {:?} outside n={n}", kind.label(), ev.cell);
                    assert!(ev.dst.is_finite());
                }
            }
        }
    }
}

#[test]
fn explode_collapses_then_scatters_then_returns() {
    let lattice = Lattice::new(4);
    let mut rng = fastrand::Rng::with_seed(3);
    let q = build(PatternKind::Explode, &lattice, &mut rng);

    assert_eq!(q.len(), 1 + 14 + 1 + 30 + 1 + 15);
    let collapse = &q.batches[0];
    assert_eq!(collapse.len(), 64);
    assert!(collapse.events.iter().all(|e| e.dst == Vec3::splat(2.0)));
    assert!(q.batches[1..15].iter().all(EventBatch::is_pause));

    let scatter = &q.batches[15];
    let corner = scatter
        .events
        .iter()
        .find(|e| e.cell == Cell::new(0, 0, 0))
        .map(|e| e.dst);
    assert_eq!(corner, Some(Vec3::splat(-2.0)));

    let home = &q.batches[46];
    assert!(home.events.iter().all(|e| e.dst == e.cell.home()));
}

#[test]
fn sandpile_lifts_every_cell_once_each_way() {
    let lattice = Lattice::new(3);
    let mut rng = fastrand::Rng::with_seed(11);
    let q = build(PatternKind::Sandpile, &lattice, &mut rng);
    assert_eq!(q.len(), 27 + 1 + 5 + 27);

    let out: Vec<Cell> = q.batches[..27].iter().flat_map(|b| b.events.iter().map(|e| e.cell)).collect();
    let unique: HashSet<Cell> = out.iter().copied().collect();
    assert_eq!(unique.len(), 27);

    let lift = &q.batches[27];
    assert!(lift.snap);
    assert_eq!(lift.len(), 27);
    assert!(lift.events.iter().all(|e| e.dst.y >= 20.0));
    assert!(q.batches[33..].iter().all(|b| b.events.iter().all(|e| e.dst == e.cell.home())));
}

#[test]
fn screen_tile_lays_slices_side_by_side() {
    let lattice = Lattice::new(4);
    let mut rng = fastrand::Rng::with_seed(0);
    let q = build(PatternKind::ScreenTile, &lattice, &mut rng);
    let dst = q
        .events()
        .find(|e| e.cell == Cell::new(1, 2, 3))
        .map(|e| e.dst);
    assert_eq!(dst, Some(Vec3::new(5.0, 6.0, 0.0)));
    assert_eq!(q.len(), 1 + 4);
}

#[test]
fn slice_batches_sweep_single_layers() {
    let lattice = Lattice::new(3);
    let mut rng = fastrand::Rng::with_seed(5);
    let q = build(PatternKind::Slice, &lattice, &mut rng);
    assert_eq!(q.len() % (6 * 3), 0);
    for batch in &q.batches {
        assert_eq!(batch.len(), 9);
    }
    let first_layer: HashSet<i32> = q.batches[0].events.iter().map(|e| e.cell.i).collect();
    assert_eq!(first_layer, HashSet::from([2]));
}

#[test]
fn sequencer_starts_at_identity_with_a_queue() {
    let lattice = Lattice::new(3);
    let seq = Sequencer::with_seed(lattice, 9);
    assert!(!seq.queue().is_empty());
    assert_eq!(seq.cursor(), 0);
    for cell in lattice.cells() {
        assert_eq!(seq.cells().position(cell), Some(cell.home()));
        assert_eq!(seq.cells().target(cell), Some(cell.home()));
    }
}

#[test]
fn batches_play_in_order_and_snaps_are_exact() {
    let lattice = Lattice::new(3);
    let mut seq = Sequencer::with_seed(lattice, 1);
    let moved = Cell::new(0, 0, 0);
    let snapped = Cell::new(2, 1, 0);

    let mut q = AnimationQueue::new(PatternKind::Slice);
    q.push_moves(vec![Event::new(moved, Vec3::new(5.0, 5.0, 5.0))]);
    q.pause(1);
    q.push(EventBatch::snaps(vec![Event::new(snapped, Vec3::new(-1.5, 0.25, 7.0))]));
    seq.play(q);

    assert_eq!(
        seq.next(),
        Playback::Applied { index: 0, events: 1, snap: false }
    );
    assert_eq!(seq.cells().target(moved), Some(Vec3::new(5.0, 5.0, 5.0)));
    assert_eq!(seq.cells().position(moved), Some(Vec3::ZERO));

    assert_eq!(
        seq.next(),
        Playback::Applied { index: 1, events: 0, snap: false }
    );
    assert_eq!(
        seq.next(),
        Playback::Applied { index: 2, events: 1, snap: true }
    );
    let dst = Vec3::new(-1.5, 0.25, 7.0);
    assert_eq!(seq.cells().position(snapped), Some(dst));
    assert_eq!(seq.cells().prev_position(snapped), Some(dst));
    assert_eq!(seq.cells().target(snapped), Some(dst));
    assert_eq!(seq.remaining(), 0);

    assert!(matches!(seq.next(), Playback::Regenerated { .. }));
    assert_eq!(seq.cursor(), 0);
    assert!(!seq.queue().is_empty());
}

#[test]
fn regeneration_tick_applies_nothing() {
    let lattice = Lattice::new(2);
    let mut seq = Sequencer::with_seed(lattice, 4);
    seq.play(AnimationQueue::new(PatternKind::Octree));
    let before = seq.cells().targets().to_vec();

    let played = seq.next();
    assert!(matches!(played, Playback::Regenerated { batches, .. } if batches > 0));
    assert_eq!(seq.cells().targets(), &before[..]);
}

#[test]
fn cells_converge_exactly_onto_targets() {
    let lattice = Lattice::new(2);
    let mut seq = Sequencer::with_seed(lattice, 2);
    let goal = Vec3::new(3.0, -2.0, 1.0);
    let cell = Cell::new(1, 0, 1);

    let mut q = AnimationQueue::new(PatternKind::Shuffle);
    q.push_moves(lattice.cells().map(|c| Event::new(c, goal)).collect());
    seq.play(q);
    seq.next();

    let dynamics = CellDynamics::default();
    let mut steps = 0;
    while !seq.cells().all_settled() {
        seq.integrate(dynamics);
        steps += 1;
        assert!(steps < 500, "cells did not settle");
    }
    assert_eq!(seq.cells().position(cell), Some(goal));
}

#[test]
fn explode_only_run_stays_bounded() {
    let lattice = Lattice::new(4);
    let generator = PatternGenerator::new(Cascade::only(PatternKind::Explode));
    let mut seq = Sequencer::new(lattice, generator, fastrand::Rng::with_seed(21));
    seq.init();
    assert!(!seq.queue().is_empty());
    assert!(lattice.cells().all(|c| seq.cells().position(c) == Some(c.home())));
    let dynamics = CellDynamics::default();

    let mut peak = 0.0f32;
    for _ in 0..200 {
        if let Playback::Regenerated { pattern, .. } = seq.next() {
            assert_eq!(pattern, PatternKind::Explode);
        }
        seq.integrate(dynamics);
        peak = peak.max(seq.cells().max_abs_component());
        assert!(seq.cells().positions().iter().all(|p| p.is_finite()));
    }
    assert!(peak <= 12.0, "peak displacement {peak}");
    assert!(peak > 3.0, "explode never scattered (peak {peak})");
}

#[test]
fn cascade_prefers_earlier_entries() {
    let cascade = Cascade::default();
    let mut rng = fastrand::Rng::with_seed(77);
    let draws = 20_000;
    let mut octree = 0usize;
    let mut kinds = HashSet::new();
    for _ in 0..draws {
        let kind = cascade.pick(&mut rng);
        if kind == PatternKind::Octree {
            octree += 1;
        }
        kinds.insert(kind);
    }
    let share = octree as f32 / draws as f32;
    assert!((0.22..0.28).contains(&share), "octree share {share}");
    assert_eq!(kinds.len(), PatternKind::all().len());
}

#[test]
fn cascade_falls_through_to_last_entry() {
    let cascade = Cascade::new(vec![
        (0.0, PatternKind::Octree),
        (0.0, PatternKind::Slice),
        (0.0, PatternKind::Explode),
    ]);
    let mut rng = fastrand::Rng::with_seed(1);
    for _ in 0..100 {
        assert_eq!(cascade.pick(&mut rng), PatternKind::Explode);
    }
    assert_eq!(Cascade::new(Vec::new()), Cascade::default());
}

#[test]
fn settling_cells_still_blend_toward_target() {
    let lattice = Lattice::new(2);
    let mut seq = Sequencer::with_seed(lattice, 6);
    let cell = Cell::new(0, 0, 0);

    let mut q = AnimationQueue::new(PatternKind::Slice);
    q.push(EventBatch::snaps(vec![Event::new(cell, Vec3::splat(0.995))]));
    q.push_moves(vec![Event::new(cell, Vec3::splat(1.0))]);
    seq.play(q);
    seq.next();
    seq.next();
    seq.integrate(CellDynamics::default());

    let p = seq.cells().position(cell).unwrap_or(Vec3::NAN);
    let expected = 0.4 * 0.995 + 0.6 * 1.0;
    assert!((p.x - expected).abs() < 1e-6, "x={}", p.x);
    assert_ne!(p.x, 1.0);
    assert_eq!(seq.cells().prev_position(cell), Some(Vec3::splat(0.995)));
}

#[test]
fn polyomino_moves_groups_rigidly_along_one_axis() {
    for n in 2..=4 {
        let lattice = Lattice::new(n);
        let reach = n as f32 + 1.0;
        for seed in 0..10u64 {
            let mut rng = fastrand::Rng::with_seed(seed);
            let q = build(PatternKind::Polyomino, &lattice, &mut rng);

            for ev in q.events() {
                let d = ev.dst - ev.cell.home();
                let moved: Vec<f32> = d.to_array().into_iter().filter(|c| *c != 0.0).collect();
                assert!(
                    moved.is_empty() || (moved.len() == 1 && moved[0].abs() == reach),
                    "n={n} seed={seed}: offset {d} for {:?}",
                    ev.cell
                );
            }

            let first_pause = q
                .batches
                .iter()
                .position(EventBatch::is_pause)
                .unwrap_or(q.len());
            assert!(first_pause > 0);
            for batch in &q.batches[..first_pause] {
                let d0 = batch.events[0].dst - batch.events[0].cell.home();
                assert!(d0 != Vec3::ZERO);
                assert!(batch.events.iter().all(|e| e.dst - e.cell.home() == d0));
                assert!(batch.len() <= MAX_CLUSTER);
            }

            let mut last = vec![None; lattice.len()];
            for ev in q.events() {
                if let Some(idx) = lattice.index(ev.cell) {
                    last[idx] = Some(ev.dst);
                }
            }
            for cell in lattice.cells() {
                let idx = lattice.index(cell).unwrap_or(0);
                assert_eq!(last[idx], Some(cell.home()), "n={n} seed={seed}: {cell:?} not home");
            }
        }
    }
}

#[test]
fn shuffle_rounds_cover_every_cell_and_end_home() {
    let lattice = Lattice::new(3);
    let mut rng = fastrand::Rng::with_seed(13);
    let q = build(PatternKind::Shuffle, &lattice, &mut rng);

    assert_eq!(q.len(), 1 + 40 + 3 + 1);
    for batch in &q.batches {
        let cells: HashSet<Cell> = batch.events.iter().map(|e| e.cell).collect();
        assert_eq!(batch.len(), 27);
        assert_eq!(cells.len(), 27);
    }
    assert!(q.batches[0].events.iter().all(|e| e.dst == e.cell.home()));
    assert!(q.batches[44].events.iter().all(|e| e.dst == e.cell.home()));
    assert!(q.batches[1..41].iter().any(|b| b.events.iter().any(|e| e.dst != e.cell.home())));
}

#[test]
fn octree_splits_locally_then_spreads() {
    let lattice = Lattice::new(4);
    let mut rng = fastrand::Rng::with_seed(0);
    let q = build(PatternKind::Octree, &lattice, &mut rng);

    assert_eq!(q.len(), 22);
    assert_eq!(q.batches[0].len(), 64);
    assert!(q.batches[1..11].iter().all(EventBatch::is_pause));
    assert_eq!(q.batches[11].len(), 64);
    assert!(q.batches[12..].iter().all(EventBatch::is_pause));

    let corner_cell = Cell::new(1, 0, 3);
    let local = q.batches[0].events.iter().find(|e| e.cell == corner_cell).map(|e| e.dst);
    assert_eq!(local, Some(Vec3::new(-1.0, -2.0, 3.0)));
    assert!(q.batches[11]
        .events
        .iter()
        .all(|e| e.dst == 8.0 * e.cell.home() - Vec3::splat(8.0)));
}

#[test]
fn new_cascade_entries_go_before_the_fallback() {
    let mut cascade = Cascade::new(vec![(1.0, PatternKind::Sandpile)]);
    cascade.set_threshold(PatternKind::Octree, 1.0);
    assert_eq!(
        cascade.entries(),
        &[(1.0, PatternKind::Octree), (1.0, PatternKind::Sandpile)]
    );
    let mut rng = fastrand::Rng::with_seed(2);
    for _ in 0..50 {
        assert_eq!(cascade.pick(&mut rng), PatternKind::Octree);
    }

    cascade.set_threshold(PatternKind::Sandpile, 0.3);
    assert_eq!(cascade.entries().last(), Some(&(0.3, PatternKind::Sandpile)));
}
