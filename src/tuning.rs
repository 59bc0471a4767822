use crate::beats::BEAT_BANDS;
use crate::cube::{Cascade, CellDynamics, PatternKind};
use crate::field::VelocityGate;
use std::fmt;
use std::path::{Path, PathBuf};

/// Field-scene constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldTuning {
    pub freeze_band: usize,
    pub freeze_threshold: f32,
    pub reset_period: u64,
    pub reset_window: u64,
    pub reset_velocity: f32,
    pub reset_spring: f32,
    pub clamp: Option<f32>,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            freeze_band: 9,
            freeze_threshold: 0.8,
            reset_period: 1000,
            reset_window: 100,
            reset_velocity: 0.8,
            reset_spring: 0.01,
            clamp: None,
        }
    }
}

impl FieldTuning {
    pub fn freeze_gate(&self) -> VelocityGate {
        VelocityGate::BeatFreeze {
            band: self.freeze_band,
            threshold: self.freeze_threshold,
        }
    }

    /// True for the last `reset_window` ticks of every `reset_period`.
    pub fn in_reset(&self, tick: u64) -> bool {
        let period = self.reset_period.max(1);
        let window = self.reset_window.min(period);
        window > 0 && tick % period >= period - window
    }
}

/// Engine constants loaded from a `key=value` file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tuning {
    pub cube: CellDynamics,
    pub cascade: Cascade,
    pub field: FieldTuning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuningError {
    Io(String),
    Parse { line: usize, message: String },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl Tuning {
    /// `None` or a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, TuningError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = match std::fs::read_to_string(path) {
            Ok(v) => v,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no tuning file, using defaults");
                return Ok(Self::default());
            }
            Err(err) => return Err(TuningError::Io(err.to_string())),
        };
        let tuning = Self::parse(&text)?;
        tracing::info!(path = %path.display(), "loaded tuning");
        Ok(tuning)
    }

    pub fn parse(text: &str) -> Result<Self, TuningError> {
        let mut t = Self::default();
        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key_raw, value_raw)) = line.split_once('=') else {
                return Err(parse_err(line_no, "expected <key>=<value>"));
            };
            let key = key_raw.trim();
            let value = value_raw.trim();
            match key {
                "cube.rate" => t.cube.rate = parse_f32(value, line_no, key)?,
                "cube.damping" => {
                    let v = parse_f32(value, line_no, key)?;
                    if !(0.0..1.0).contains(&v) {
                        return Err(parse_err(line_no, "cube.damping must be in [0, 1)"));
                    }
                    t.cube.damping = v;
                }
                "cube.snap_epsilon" => t.cube.snap_epsilon = parse_f32(value, line_no, key)?.max(0.0),
                "field.freeze_band" => {
                    let band = parse_u64(value, line_no, key)? as usize;
                    if band >= BEAT_BANDS {
                        return Err(parse_err(
                            line_no,
                            &format!("field.freeze_band must be below {BEAT_BANDS}"),
                        ));
                    }
                    t.field.freeze_band = band;
                }
                "field.freeze_threshold" => t.field.freeze_threshold = parse_f32(value, line_no, key)?,
                "field.reset_period" => t.field.reset_period = parse_u64(value, line_no, key)?.max(1),
                "field.reset_window" => t.field.reset_window = parse_u64(value, line_no, key)?,
                "field.reset_velocity" => t.field.reset_velocity = parse_f32(value, line_no, key)?,
                "field.reset_spring" => t.field.reset_spring = parse_f32(value, line_no, key)?,
                "field.clamp" => {
                    t.field.clamp = match value.to_ascii_lowercase().as_str() {
                        "off" | "none" | "0" => None,
                        _ => {
                            let v = parse_f32(value, line_no, key)?;
                            if v <= 0.0 {
                                return Err(parse_err(line_no, "field.clamp must be positive or off"));
                            }
                            Some(v)
                        }
                    };
                }
                _ => {
                    if let Some(name) = key.strip_prefix("pattern.") {
                        let Some(kind) = PatternKind::from_key(name) else {
                            return Err(parse_err(line_no, &format!("unknown pattern '{name}'")));
                        };
                        let p = parse_f32(value, line_no, key)?;
                        if !(0.0..=1.0).contains(&p) {
                            return Err(parse_err(line_no, "pattern probability must be in [0, 1]"));
                        }
                        t.cascade.set_threshold(kind, p);
                    }
                }
            }
        }
        t.field.reset_window = t.field.reset_window.min(t.field.reset_period);
        Ok(t)
    }

    pub fn to_text(&self) -> String {
        let mut body = String::from("# scene_engine tuning v1\n");
        body.push_str(&format!("cube.rate={}\n", self.cube.rate));
        body.push_str(&format!("cube.damping={}\n", self.cube.damping));
        body.push_str(&format!("cube.snap_epsilon={}\n", self.cube.snap_epsilon));
        for &(p, kind) in self.cascade.entries() {
            body.push_str(&format!("pattern.{}={}\n", kind.key(), p));
        }
        let f = &self.field;
        body.push_str(&format!("field.freeze_band={}\n", f.freeze_band));
        body.push_str(&format!("field.freeze_threshold={}\n", f.freeze_threshold));
        body.push_str(&format!("field.reset_period={}\n", f.reset_period));
        body.push_str(&format!("field.reset_window={}\n", f.reset_window));
        body.push_str(&format!("field.reset_velocity={}\n", f.reset_velocity));
        body.push_str(&format!("field.reset_spring={}\n", f.reset_spring));
        match f.clamp {
            Some(v) => body.push_str(&format!("field.clamp={v}\n")),
            None => body.push_str("field.clamp=off\n"),
        }
        body
    }

    pub fn save(&self, path: Option<&Path>) -> Result<(), TuningError> {
        let Some(path) = path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TuningError::Io(e.to_string()))?;
        }
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, self.to_text()).map_err(|e| TuningError::Io(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| TuningError::Io(e.to_string()))
    }
}

pub fn tuning_storage_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.trim().is_empty() {
            return Some(PathBuf::from(xdg).join("scene_engine").join("tuning.txt"));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("scene_engine")
            .join("tuning.txt"),
    )
}

fn parse_err(line: usize, message: &str) -> TuningError {
    TuningError::Parse {
        line,
        message: message.to_string(),
    }
}

fn parse_f32(raw: &str, line: usize, key: &str) -> Result<f32, TuningError> {
    match raw.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(parse_err(line, &format!("{key} expects a number, got '{raw}'"))),
    }
}

fn parse_u64(raw: &str, line: usize, key: &str) -> Result<u64, TuningError> {
    raw.parse::<u64>()
        .map_err(|_| parse_err(line, &format!("{key} expects a non-negative integer, got '{raw}'")))
}
