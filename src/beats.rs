pub const BEAT_BANDS: usize = 16;

/// Per-band beat intensities in `[0, 1]`, refreshed once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beats {
    pub bands: [f32; BEAT_BANDS],
}

impl Default for Beats {
    fn default() -> Self {
        Self {
            bands: [0.0; BEAT_BANDS],
        }
    }
}

impl Beats {
    pub fn from_bands(bands: [f32; BEAT_BANDS]) -> Self {
        let mut b = Self { bands };
        for v in &mut b.bands {
            *v = v.clamp(0.0, 1.0);
        }
        b
    }

    /// Zero for out-of-range bands.
    pub fn band(&self, idx: usize) -> f32 {
        self.bands.get(idx).copied().unwrap_or(0.0)
    }

    pub fn with_band(mut self, idx: usize, v: f32) -> Self {
        if let Some(slot) = self.bands.get_mut(idx) {
            *slot = v.clamp(0.0, 1.0);
        }
        self
    }

    pub fn is_silent(&self) -> bool {
        self.bands.iter().all(|&v| v == 0.0)
    }
}

// Beat subdivision per band, in quarter notes.
const SUBDIVISIONS: [f32; BEAT_BANDS] = [
    1.0, 2.0, 0.5, 4.0, 1.0, 0.25, 2.0, 8.0, 0.5, 16.0, 1.0, 3.0, 0.75, 4.0, 6.0, 12.0,
];
const HIT_CHANCE: [f32; BEAT_BANDS] = [
    0.95, 0.9, 0.7, 0.85, 0.6, 0.5, 0.8, 0.9, 0.4, 0.75, 0.5, 0.6, 0.35, 0.7, 0.65, 0.8,
];
const DECAY: f32 = 0.78;
const FLOOR: f32 = 0.02;

/// Deterministic stand-in for live beat detection.
///
/// Each band fires on its own subdivision of the tempo grid (with a per-band
/// hit chance), jumps to a high level and decays exponentially back to zero.
pub struct BeatSynth {
    tempo: f32,
    fps: f32,
    levels: [f32; BEAT_BANDS],
    last_slot: [i64; BEAT_BANDS],
    rng: fastrand::Rng,
}

impl BeatSynth {
    pub fn new(tempo: f32, fps: f32, seed: u64) -> Self {
        Self {
            tempo: tempo.clamp(20.0, 400.0),
            fps: fps.max(1.0),
            levels: [0.0; BEAT_BANDS],
            last_slot: [-1; BEAT_BANDS],
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    pub fn tempo(&self) -> f32 {
        self.tempo
    }

    /// Seconds since tick zero.
    pub fn time(&self, tick: u64) -> f32 {
        tick as f32 / self.fps
    }

    pub fn sample(&mut self, tick: u64) -> Beats {
        let ticks_per_beat = 60.0 / self.tempo * self.fps;
        for b in 0..BEAT_BANDS {
            let period = (ticks_per_beat * SUBDIVISIONS[b]).max(1.0);
            let slot = (tick as f32 / period).floor() as i64;
            if slot != self.last_slot[b] {
                self.last_slot[b] = slot;
                if self.rng.f32() < HIT_CHANCE[b] {
                    self.levels[b] = 0.7 + 0.3 * self.rng.f32();
                    continue;
                }
            }
            self.levels[b] *= DECAY;
            if self.levels[b] < FLOOR {
                self.levels[b] = 0.0;
            }
        }
        Beats::from_bands(self.levels)
    }
}
