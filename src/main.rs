use anyhow::{Context, Result};
use clap::Parser;
use scene_engine::beats::BeatSynth;
use scene_engine::config::Config;
use scene_engine::scene::{make_scenes, scene_names, select_scene, FrameCtx, SceneOptions};
use scene_engine::tuning::{tuning_storage_path, Tuning};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cfg = Config::parse();
    let tuning_path = cfg.tuning.clone().or_else(tuning_storage_path);
    let tuning = Tuning::load(tuning_path.as_deref())
        .with_context(|| format!("load tuning ({:?})", tuning_path))?;

    if cfg.save_tuning {
        let path = tuning_path.context("no tuning path (set --tuning or HOME)")?;
        tuning
            .save(Some(path.as_path()))
            .with_context(|| format!("save tuning to {}", path.display()))?;
        tracing::info!(path = %path.display(), "tuning saved");
        return Ok(());
    }

    let opts = SceneOptions {
        grid_size: cfg.grid_size as usize,
        resolution: cfg.resolution as usize,
        seed: cfg.seed,
        tuning,
    };
    let mut scenes = make_scenes(&opts);

    if cfg.list_scenes {
        for (i, name) in scene_names(&scenes).iter().enumerate() {
            println!("{i:>2}. {name}");
        }
        return Ok(());
    }

    let active = select_scene(&cfg.scene, &scenes)?;
    let scene = &mut scenes[active];
    let mut beats = BeatSynth::new(cfg.tempo, cfg.fps, cfg.seed);
    tracing::info!(
        scene = scene.name(),
        ticks = cfg.ticks,
        grid = opts.grid_size,
        resolution = opts.resolution,
        "running"
    );

    let start = Instant::now();
    for tick in 0..cfg.ticks {
        let ctx = FrameCtx {
            tick,
            time: beats.time(tick),
            tempo: beats.tempo(),
            beats: beats.sample(tick),
        };
        scene.forward(&ctx);

        if cfg.report_every > 0 && (tick + 1) % cfg.report_every == 0 {
            let stats = scene.stats();
            if !stats.finite {
                tracing::warn!(tick, "non-finite values in scene output");
            }
            tracing::info!(tick, extent = stats.extent, "{}", stats.detail);
        }
    }

    let elapsed = start.elapsed().as_secs_f64() * 1000.0;
    let per_tick = elapsed / cfg.ticks.max(1) as f64;
    tracing::info!(total_ms = elapsed, per_tick_ms = per_tick, "done");
    Ok(())
}
