use std::time::{Duration, Instant};

use anyhow::Result;
use scene_engine::beats::BeatSynth;
use scene_engine::scene::{make_scenes, FrameCtx, Scene, SceneOptions};
use scene_engine::tuning::Tuning;

#[derive(Debug, Clone, PartialEq)]
struct Args {
    ticks: u64,
    grid_size: usize,
    resolution: usize,
    tempo: f32,
    fps: f32,
    seed: u64,
    ci_smoke: bool,
    quick: bool,
    max_ms: f64,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            ticks: 600,
            grid_size: 4,
            resolution: 128,
            tempo: 120.0,
            fps: 60.0,
            seed: 1,
            ci_smoke: false,
            quick: false,
            max_ms: 20.0,
        }
    }
}

fn parse_args() -> Args {
    parse_args_from(std::env::args().skip(1).collect())
}

fn parse_args_from(argv: Vec<String>) -> Args {
    let mut args = Args::default();

    let mut i = 0usize;
    while i < argv.len() {
        let k = argv[i].as_str();
        let v = argv.get(i + 1).map(|s| s.as_str());
        match (k, v) {
            ("--ticks", Some(x)) => {
                if let Ok(n) = x.parse::<u64>() {
                    args.ticks = n.max(1);
                }
                i += 2;
            }
            ("--grid-size", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.grid_size = n.clamp(1, 32);
                }
                i += 2;
            }
            ("--resolution", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.resolution = n.clamp(1, 2048);
                }
                i += 2;
            }
            ("--tempo", Some(x)) => {
                if let Ok(v) = x.parse::<f32>() {
                    if v.is_finite() {
                        args.tempo = v.max(1.0);
                    }
                }
                i += 2;
            }
            ("--fps", Some(x)) => {
                if let Ok(v) = x.parse::<f32>() {
                    if v.is_finite() {
                        args.fps = v.max(1.0);
                    }
                }
                i += 2;
            }
            ("--seed", Some(x)) => {
                if let Ok(n) = x.parse::<u64>() {
                    args.seed = n;
                }
                i += 2;
            }
            ("--ci-smoke", Some(x)) if !x.starts_with("--") => {
                args.ci_smoke = parse_bool(x).unwrap_or(true);
                i += 2;
            }
            ("--ci-smoke", _) => {
                args.ci_smoke = true;
                i += 1;
            }
            ("--quick", Some(x)) if !x.starts_with("--") => {
                args.quick = parse_bool(x).unwrap_or(true);
                i += 2;
            }
            ("--quick", _) => {
                args.quick = true;
                i += 1;
            }
            ("--max-ms", Some(x)) => {
                if let Ok(v) = x.parse::<f64>() {
                    args.max_ms = v.max(0.1);
                }
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    if args.quick {
        args.ticks = args.ticks.min(120);
        args.resolution = args.resolution.min(64);
    }

    args
}

fn parse_bool(s: &str) -> Option<bool> {
    let v = s.trim().to_ascii_lowercase();
    match v.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Loose bound on how far a cube cell may stray from the lattice.
fn cube_extent_limit(grid_size: usize) -> f32 {
    let n = grid_size as f32;
    // Furthest targets: octree spread (8n), sandpile lift (20), 40 shuffle nudges of up to 4.
    // Doubled to leave room for follow-filter overshoot.
    2.0 * (8.0 * n + 20.0 + 160.0)
}

struct SceneRun {
    elapsed: Duration,
    finite: bool,
    peak: f32,
}

/// Drives one scene for `args.ticks` ticks. Only `forward` is timed; stats
/// are sampled between ticks.
fn run_scene(scene: &mut dyn Scene, args: &Args) -> SceneRun {
    let mut beats = BeatSynth::new(args.tempo, args.fps, args.seed);
    let mut run = SceneRun {
        elapsed: Duration::ZERO,
        finite: true,
        peak: 0.0,
    };

    for tick in 0..args.ticks {
        let ctx = FrameCtx {
            tick,
            time: beats.time(tick),
            tempo: beats.tempo(),
            beats: beats.sample(tick),
        };
        let start = Instant::now();
        scene.forward(&ctx);
        run.elapsed += start.elapsed();

        let stats = scene.stats();
        run.finite &= stats.finite;
        run.peak = run.peak.max(stats.extent);
    }
    run
}

fn bench(args: &Args) -> Result<()> {
    let opts = SceneOptions {
        grid_size: args.grid_size,
        resolution: args.resolution,
        seed: args.seed,
        tuning: Tuning::default(),
    };
    let mut scenes = make_scenes(&opts);
    let mut total_time = Duration::ZERO;
    let mut total_ticks = 0u64;
    let mut broken = Vec::<String>::new();
    let mut slow = Vec::<(String, f64)>::new();

    println!(
        "Scene benchmark: scenes={} ticks/scene={} grid={} resolution={} quick={}",
        scenes.len(),
        args.ticks,
        args.grid_size,
        args.resolution,
        args.quick
    );

    for (idx, scene) in scenes.iter_mut().enumerate() {
        let name = scene.name();
        let SceneRun { elapsed, finite, peak } = run_scene(scene.as_mut(), args);
        total_time += elapsed;
        total_ticks += args.ticks;

        let ms = elapsed.as_secs_f64() * 1000.0 / args.ticks as f64;
        let stats = scene.stats();
        println!(
            "{:>2}. {:<28} {:>8.3} ms/tick  peak={:>8.3}  {}",
            idx, name, ms, peak, stats.detail
        );

        // Scene 0 is the cube lattice; the rest are fields with no fixed bound.
        let bounded = idx != 0 || peak <= cube_extent_limit(args.grid_size);
        if !finite || !bounded {
            broken.push(name.to_string());
        }
        if args.ci_smoke && ms > args.max_ms {
            slow.push((name.to_string(), ms));
        }
    }

    let avg_ms = total_time.as_secs_f64() * 1000.0 / total_ticks.max(1) as f64;
    println!("Summary: {:>8.3} ms/tick avg", avg_ms);

    if !broken.is_empty() {
        eprintln!("  unstable scenes: {}", broken.join(", "));
    }
    if args.ci_smoke {
        if !broken.is_empty() || !slow.is_empty() {
            eprintln!("CI smoke: FAIL");
            for (name, ms) in slow {
                eprintln!("  slow scene: {} ({:.3} ms/tick > {:.3})", name, ms, args.max_ms);
            }
            anyhow::bail!("ci smoke failed");
        }
        println!("CI smoke: PASS (max_ms={:.3})", args.max_ms);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args();
    bench(&args)
}
