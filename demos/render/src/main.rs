//! Render a second of a 440 Hz tone ducked by a slow sidechain sine, the way a host would.
use buffer::Audio;
use processor::{
    Editor, Processor,
    processor::{Status, context as cx},
};
use ringmod::{RingMod, params};

#[derive(Copy, Clone, Debug)]
pub struct Sine {
    phase: f32,
    freq: f32,
    sample_rate: f32,
}

impl Sine {
    pub fn new(freq: f32, sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            freq,
            sample_rate,
        }
    }

    pub fn next_sample(&mut self) -> f32 {
        let sine = (self.phase * std::f32::consts::TAU).sin();
        self.phase = (self.phase + self.freq / self.sample_rate).fract();
        sine
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let sample_rate = 48e3;
    let block_size = 512;
    let num_blocks = 94;
    let num_channels = 2;

    let mut plugin = RingMod::new(&ringmod::Options::default());
    let mut editor = plugin.ring_mod_editor();
    editor.set_param(params::MIX, 0.75)?;
    let ports = editor.get_ports();
    plugin.activate(cx::Activate {
        sample_rate,
        max_num_frames: block_size,
        ports: &ports,
    })?;

    let display = plugin.display().ok_or("no display")?;
    let ticker = display.spawn_refresh()?;

    // The host processes in place: the main input and the output share memory.
    let mut io = vec![0.0f32; num_channels * block_size];
    let mut sidechain = vec![0.0f32; num_channels * block_size];
    let io_ptrs = unsafe { [io.as_mut_ptr(), io.as_mut_ptr().add(block_size)] };
    let sc_ptrs = unsafe { [sidechain.as_mut_ptr(), sidechain.as_mut_ptr().add(block_size)] };
    let mut inputs = unsafe {
        [
            Audio::from_raw(io_ptrs.as_ptr(), num_channels, block_size),
            Audio::from_raw(sc_ptrs.as_ptr(), num_channels, block_size),
        ]
    };
    let mut outputs = unsafe { [Audio::from_raw(io_ptrs.as_ptr(), num_channels, block_size)] };

    let mut tone = Sine::new(440.0, sample_rate as f32);
    let mut lfo = Sine::new(2.0, sample_rate as f32);

    plugin.start();
    for block in 0..num_blocks {
        if block == num_blocks / 2 {
            log::info!("switching the effect off");
            editor.set_param(params::ENABLED, 0.0)?;
        }
        for frame in 0..block_size {
            let (carrier, envelope) = (tone.next_sample(), lfo.next_sample());
            for channel in 0..num_channels {
                inputs[0][channel][frame] = carrier;
                inputs[1][channel][frame] = envelope;
            }
        }

        let processed = plugin.process(cx::Process {
            sample_rate,
            num_frames: block_size,
            audio_inputs: &inputs,
            audio_outputs: &mut outputs,
        });
        debug_assert_ne!(processed.status, Status::Passthrough);

        if block % 16 == 0 {
            let peak = outputs[0]
                .iter()
                .flatten()
                .fold(0.0f32, |peak, sample| peak.max(sample.abs()));
            println!("block {block:3}: {:?}, peak {peak:.3}", processed.status);
        }
    }
    display.refresh();
    let main_peak = display
        .main(|scope| scope.levels(0).fold(0.0f32, |peak, level| peak.max(level.max)))
        .unwrap_or_default();
    let outline = display
        .sidechain(|scope| scope.outline(0, 256.0, 64.0))
        .unwrap_or_default();
    println!("main scope peak {main_peak:.3} (input scaled by 0.8)");
    println!(
        "sidechain outline: {} points, visible: {}",
        outline.len(),
        display.sidechain_visible()
    );

    plugin.stop();
    drop(ticker);
    plugin.reset();
    Ok(())
}
