//! Per-sample math of the effect.
//!
//! The dry signal is ducked by the instantaneous sidechain magnitude and crossfaded with
//! itself by `mix`:
//!
//! ```text
//! processed = dry - dry * |sc|
//! out       = dry * (1 - mix) + processed * mix
//! ```
//!
//! The sidechain is not clamped, so `|sc| > 1` inverts the signal. Parameters are constant
//! over a block; a change between blocks is a step at the block boundary.

/// Gain applied to the copies handed to the visualizers. Never applied to the output.
pub const VISUAL_GAIN: f32 = 0.8;

#[inline]
pub fn duck(dry: f32, sc: f32, mix: f32) -> f32 {
    let processed = dry - dry * sc.abs();
    dry * (1.0 - mix) + processed * mix
}

/// Process one channel into `out`. Without a sidechain the channel is copied through.
pub fn process_channel(dry: &[f32], sc: Option<&[f32]>, out: &mut [f32], mix: f32) {
    match sc {
        Some(sc) => {
            for ((out, dry), sc) in out.iter_mut().zip(dry).zip(sc) {
                *out = duck(*dry, *sc, mix);
            }
        }
        None => {
            let len = out.len().min(dry.len());
            out[..len].copy_from_slice(&dry[..len]);
        }
    }
}

/// Process one channel whose input and output share memory.
pub fn process_channel_in_place(io: &mut [f32], sc: Option<&[f32]>, mix: f32) {
    let Some(sc) = sc else {
        return;
    };
    for (sample, sc) in io.iter_mut().zip(sc) {
        *sample = duck(*sample, *sc, mix);
    }
}

#[cfg(test)]
mod tests {
    use super::{duck, process_channel, process_channel_in_place};

    #[test]
    fn reference_block() {
        let dry = [1.0f32; 4];
        let sc: [f32; 4] = [0.5, -0.5, 1.0, 2.0];
        let mut out = [0.0; 4];
        process_channel(&dry, Some(&sc[..]), &mut out, 0.5);
        assert_eq!(out, [0.75, 0.75, 0.5, 0.0]);

        let mut io = dry;
        process_channel_in_place(&mut io, Some(&sc[..]), 0.5);
        assert_eq!(io, out);
    }

    #[test]
    fn mix_extremes() {
        for (dry, sc) in [(0.3, 0.9), (-0.7, -0.25), (1.0, 1.5), (0.0, 0.4)] {
            assert_eq!(duck(dry, sc, 0.0), dry);
            assert_eq!(duck(dry, sc, 1.0), dry - dry * f32::abs(sc));
        }
    }

    #[test]
    fn missing_sidechain_is_identity() {
        let dry = [0.1, -0.2, 0.3];
        let mut out = [9.0; 3];
        process_channel(&dry, None, &mut out, 1.0);
        assert_eq!(out, dry);

        let mut io = dry;
        process_channel_in_place(&mut io, None, 1.0);
        assert_eq!(io, dry);
    }
}
