//! The parameter store.
//!
//! Both parameters live in atomics so the audio thread and any number of editor threads can
//! read and write them without locking. The audio thread reads one [Snapshot] per block.
use std::sync::atomic::{AtomicBool, Ordering};

use atomic_float::AtomicF32;
use processor::{Error, editor::ParameterTree};

/// Dry/processed crossfade, `0.0..=1.0`.
pub const MIX: u64 = 0;

/// Effect on/off. Stored and automated under the legacy name `bypass`, where `true` means the
/// effect is applied.
pub const ENABLED: u64 = 1;

/// Static description of a parameter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Info {
    pub id: u64,
    pub name: &'static str,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
}

pub static INFO: [Info; 2] = [
    Info {
        id: MIX,
        name: "mix",
        label: "Mix",
        min: 0.0,
        max: 1.0,
        step: 0.001,
        default: 1.0,
    },
    Info {
        id: ENABLED,
        name: "enabled",
        label: "Enabled",
        min: 0.0,
        max: 1.0,
        step: 1.0,
        default: 1.0,
    },
];

/// The name of the parameter tree root.
pub const ROOT: &str = "RingMod Sidechain";

/// Parameter values as seen by one block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub mix: f32,
    pub enabled: bool,
}

pub struct Params {
    mix: AtomicF32,
    enabled: AtomicBool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            mix: AtomicF32::new(1.0),
            enabled: AtomicBool::new(true),
        }
    }
}

impl Params {
    pub fn mix(&self) -> f32 {
        self.mix.load(Ordering::Relaxed)
    }

    /// Clamped to `0.0..=1.0` and quantized to the mix step. NaN is ignored.
    pub fn set_mix(&self, mix: f32) {
        if mix.is_nan() {
            return;
        }
        let mix = (mix.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
        self.mix.store(mix, Ordering::Relaxed);
    }

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mix: self.mix(),
            enabled: self.enabled(),
        }
    }

    /// Read a parameter as a plain number. Booleans read as `0.0` or `1.0`.
    pub fn get(&self, id: u64) -> Option<f64> {
        match id {
            MIX => Some(f64::from(self.mix())),
            ENABLED => Some(if self.enabled() { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Write a parameter from a plain number. Booleans are on at `0.5` and above.
    pub fn set(&self, id: u64, value: f64) -> Result<(), Error> {
        match id {
            MIX => self.set_mix(value as f32),
            ENABLED if value.is_nan() => (),
            ENABLED => self.set_enabled(value >= 0.5),
            _ => return Err(Error::UnknownParameter(id)),
        }
        Ok(())
    }

    pub fn tree(&self) -> ParameterTree {
        let children = INFO
            .iter()
            .map(|info| {
                let value = self.get(info.id).unwrap_or(info.default);
                ParameterTree::leaf(info.label, info.id, value)
            })
            .collect();
        ParameterTree::branch(ROOT, children)
    }
}

/// The name a parameter was published under before it was renamed.
pub fn legacy_name(id: u64) -> Option<&'static str> {
    match id {
        ENABLED => Some("bypass"),
        _ => None,
    }
}

/// Look up a parameter by its current or legacy name.
pub fn id_for(name: &str) -> Option<u64> {
    INFO.iter()
        .find(|info| info.name.eq_ignore_ascii_case(name))
        .map(|info| info.id)
        .or_else(|| {
            INFO.iter().map(|info| info.id).find(|id| {
                legacy_name(*id).is_some_and(|legacy| legacy.eq_ignore_ascii_case(name))
            })
        })
}

pub fn format(id: u64, value: f64) -> Option<String> {
    match id {
        MIX => Some(format!("{:.1} %", value.clamp(0.0, 1.0) * 100.0)),
        ENABLED => Some(if value >= 0.5 { "On" } else { "Off" }.to_owned()),
        _ => None,
    }
}

pub fn parse(id: u64, text: &str) -> Option<f64> {
    let text = text.trim();
    match id {
        MIX => {
            let number = text.strip_suffix('%').unwrap_or(text).trim_end();
            let percent = number.parse::<f64>().ok().filter(|p| p.is_finite())?;
            Some((percent / 100.0).clamp(0.0, 1.0))
        }
        ENABLED => match text.to_ascii_lowercase().as_str() {
            "on" | "true" | "1" => Some(1.0),
            "off" | "false" | "0" => Some(0.0),
            _ => None,
        },
        _ => None,
    }
}
