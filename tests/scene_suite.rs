use glam::Vec3;
use scene_engine::beats::{BeatSynth, Beats};
use scene_engine::cube::{Cascade, CellDynamics, Lattice, PatternGenerator, PatternKind};
use scene_engine::scene::{
    make_scenes, scene_names, select_scene, CubeScene, FieldFlavor, FieldScene, FrameCtx, Scene,
    SceneError, SceneOptions,
};
use scene_engine::tuning::FieldTuning;

fn small_options() -> SceneOptions {
    SceneOptions {
        grid_size: 3,
        resolution: 12,
        seed: 7,
        ..SceneOptions::default()
    }
}

fn ctx(tick: u64, beats: Beats) -> FrameCtx {
    FrameCtx {
        tick,
        time: tick as f32 / 60.0,
        tempo: 120.0,
        beats,
    }
}

#[test]
fn scene_list_is_stable() {
    let scenes = make_scenes(&small_options());
    let names = scene_names(&scenes);
    assert_eq!(
        names,
        vec![
            "Cube: Pattern Sequencer",
            "Particles: Beat Freeze",
            "Swarm: Curl Drift",
            "Barticles: Impulse Burst",
        ]
    );
}

#[test]
fn select_scene_by_index_or_fragment() {
    let scenes = make_scenes(&small_options());
    assert_eq!(select_scene("0", &scenes), Ok(0));
    assert_eq!(select_scene("cube", &scenes), Ok(0));
    assert_eq!(select_scene("  SWARM ", &scenes), Ok(2));
    assert_eq!(select_scene("barticles", &scenes), Ok(3));
    assert_eq!(select_scene("particles", &scenes), Ok(1));

    let err = select_scene("9", &scenes).unwrap_err();
    assert_eq!(err, SceneError::UnknownScene("9".to_string()));
    assert!(err.to_string().contains("'9'"));
    assert!(select_scene("", &scenes).is_err());
    assert!(select_scene("fractal", &scenes).is_err());
}

#[test]
fn every_scene_stays_finite_under_synthetic_beats() {
    let mut scenes = make_scenes(&small_options());
    for scene in scenes.iter_mut() {
        let mut synth = BeatSynth::new(128.0, 60.0, 3);
        for tick in 0..240 {
            let frame = FrameCtx {
                tick,
                time: synth.time(tick),
                tempo: synth.tempo(),
                beats: synth.sample(tick),
            };
            scene.forward(&frame);
        }
        let stats = scene.stats();
        assert!(stats.finite, "{} went non-finite", scene.name());
        assert!(stats.extent.is_finite());
        assert!(!stats.detail.is_empty());
    }
}

#[test]
fn cube_scene_waits_for_step_bands() {
    let generator = PatternGenerator::new(Cascade::only(PatternKind::Slice));
    let mut scene = CubeScene::new(
        Lattice::new(3),
        generator,
        CellDynamics::default(),
        fastrand::Rng::with_seed(1),
    );

    for tick in 0..10 {
        scene.forward(&ctx(tick, Beats::default()));
    }
    assert_eq!(scene.last_playback(), None);
    assert_eq!(scene.sequencer().cursor(), 0);
    assert!(scene.stats().detail.contains("settled=true"));

    scene.forward(&ctx(10, Beats::default().with_band(2, 0.6)));
    assert!(scene.last_playback().is_some());
    assert_eq!(scene.sequencer().cursor(), 1);

    scene.forward(&ctx(11, Beats::default().with_band(1, 1.0)));
    assert_eq!(scene.sequencer().cursor(), 1);
    assert!((scene.orbit_angle() - 0.12).abs() < 1e-5);
}

#[test]
fn cube_camera_drifts_only_on_its_band() {
    let mut scene = CubeScene::new(
        Lattice::new(2),
        PatternGenerator::default(),
        CellDynamics::default(),
        fastrand::Rng::with_seed(8),
    );
    scene.forward(&ctx(0, Beats::default()));
    assert_eq!(scene.camera().goal(), Vec3::ZERO);

    scene.forward(&ctx(1, Beats::default().with_band(3, 0.5)));
    assert_ne!(scene.camera().goal(), Vec3::ZERO);
    assert!(scene.camera().goal().abs().max_element() <= 1.0);
}

#[test]
fn reset_window_covers_the_tail_of_each_period() {
    let t = FieldTuning::default();
    assert!(!t.in_reset(0));
    assert!(!t.in_reset(899));
    assert!(t.in_reset(900));
    assert!(t.in_reset(999));
    assert!(!t.in_reset(1000));
    assert!(t.in_reset(1950));

    let never = FieldTuning {
        reset_window: 0,
        ..FieldTuning::default()
    };
    assert!((0..3000).all(|tick| !never.in_reset(tick)));
}

#[test]
fn burst_scene_enters_and_leaves_reset() {
    let tuning = FieldTuning {
        reset_period: 20,
        reset_window: 5,
        ..FieldTuning::default()
    };
    let mut scene = FieldScene::new(FieldFlavor::Burst, 8, tuning, fastrand::Rng::with_seed(2));
    let kick = Beats::default().with_band(0, 1.0);

    for tick in 0..15 {
        scene.forward(&ctx(tick, kick));
        assert!(!scene.is_resetting(), "tick {tick}");
    }
    assert_ne!(scene.camera().goal(), Vec3::ZERO);

    for tick in 15..20 {
        scene.forward(&ctx(tick, kick));
        assert!(scene.is_resetting(), "tick {tick}");
        assert_eq!(scene.camera().goal(), Vec3::ZERO);
    }
    assert!(scene.stats().detail.contains("kernel=manifold"));

    scene.forward(&ctx(20, kick));
    assert!(!scene.is_resetting());
    assert!(scene.stats().detail.contains("kernel=burst"));
}

#[test]
fn still_scene_holds_its_seed_without_force() {
    let mut scene = FieldScene::new(FieldFlavor::Still, 8, FieldTuning::default(), fastrand::Rng::with_seed(4));
    let seed = scene.latest().clone();
    for tick in 0..30 {
        scene.forward(&ctx(tick, Beats::default()));
    }
    assert_eq!(scene.latest(), &seed);
    assert!(!scene.is_resetting());
}

#[test]
fn field_orbit_never_moves_backwards() {
    let mut scene = FieldScene::new(FieldFlavor::Swarm, 4, FieldTuning::default(), fastrand::Rng::with_seed(6));
    scene.forward(&FrameCtx {
        tick: 0,
        time: 10.0,
        tempo: 120.0,
        beats: Beats::default(),
    });
    let high = scene.orbit_angle();
    assert!(high > 0.0);

    scene.forward(&FrameCtx {
        tick: 1,
        time: 10.0,
        tempo: 60.0,
        beats: Beats::default(),
    });
    assert_eq!(scene.orbit_angle(), high);
}
