use std::sync::{Arc, Mutex};

use buffer::{Arena, Audio};
use processor::{
    Editor, Error, Port, Processor,
    processor::{Processed, Status, context as cx},
};
use scope::{Sink, Visualizer};

use crate::{
    Options,
    display::{Display, DisplayHandle},
    editor::RingModEditor,
    layout::{self, Layout},
    params::Params,
    signal::{self, VISUAL_GAIN},
};

/// The sidechain ducking processor.
///
/// Generic over the visualization [Sink] so that hosts without a display (and tests) can plug
/// in their own. The default sinks come with a [Display] that editors can observe.
pub struct RingMod<S = Visualizer>
where
    S: Sink,
{
    params: Arc<Params>,
    ports: Arc<Mutex<Vec<Port>>>,
    main_sink: S,
    sidechain_sink: S,
    display: Option<Arc<Display>>,
    active: Option<Active>,
}

/// Everything allocated by [Processor::activate].
struct Active {
    layout: Layout,
    max_num_frames: usize,
    sample_rate: f64,
    scaled_main: Audio,
    scaled_sidechain: Audio,
    // Backs the two views above; dropped last.
    _arena: Arena,
}

impl RingMod<Visualizer> {
    pub fn new(options: &Options) -> Self {
        let (main_sink, main_scope) = scope::channel(&options.scope);
        let (sidechain_sink, sidechain_scope) = scope::channel(&options.scope);
        let display = Arc::new(Display::new(main_scope, sidechain_scope));
        let mut this = Self::with_sinks(main_sink, sidechain_sink);
        this.display = Some(display);
        this
    }
}

impl<S> RingMod<S>
where
    S: Sink,
{
    /// Create a processor that feeds the given sinks and has no display of its own.
    pub fn with_sinks(main_sink: S, sidechain_sink: S) -> Self {
        Self {
            params: Arc::new(Params::default()),
            ports: Arc::new(Mutex::new(layout::default_ports())),
            main_sink,
            sidechain_sink,
            display: None,
            active: None,
        }
    }

    pub fn params(&self) -> &Arc<Params> {
        &self.params
    }

    /// A view of the waveforms, if this processor has a display.
    pub fn display(&self) -> Option<DisplayHandle> {
        self.display
            .as_ref()
            .map(|display| DisplayHandle::new(display, self.params.clone()))
    }

    /// Create the concrete editor. [Processor::editor] boxes the same thing.
    pub fn ring_mod_editor(&self) -> RingModEditor {
        RingModEditor::new(self.params.clone(), self.ports.clone(), self.display())
    }

    /// The layout accepted by the last activation.
    pub fn layout(&self) -> Option<Layout> {
        self.active.as_ref().map(|active| active.layout)
    }

    pub fn sample_rate(&self) -> Option<f64> {
        self.active.as_ref().map(|active| active.sample_rate)
    }

    pub fn sinks(&self) -> (&S, &S) {
        (&self.main_sink, &self.sidechain_sink)
    }

    fn clear_sinks(&mut self) {
        self.main_sink.clear();
        self.sidechain_sink.clear();
    }
}

impl<S> Processor for RingMod<S>
where
    S: Sink + 'static,
{
    fn editor(&self) -> Box<dyn Editor> {
        Box::new(self.ring_mod_editor())
    }

    fn activate(&mut self, context: cx::Activate<'_>) -> Result<(), Error> {
        let layout = layout::validate(context.ports)?;
        self.active = None;

        let mut arena = Arena::new(layout.num_scratch_channels(), context.max_num_frames);
        let mut scaled_main = Audio::new(layout.main_channels);
        let mut scaled_sidechain = Audio::new(layout.num_sidechain_channels());
        if !(arena.acquire(&mut scaled_main) && arena.acquire(&mut scaled_sidechain)) {
            return Err(Error::UnsupportedLayout(format!(
                "cannot allocate {} scratch channels",
                layout.num_scratch_channels()
            )));
        }

        log::info!(
            "activated at {} Hz, up to {} frames, {} main channels, sidechain: {:?}",
            context.sample_rate,
            context.max_num_frames,
            layout.main_channels,
            layout.sidechain_channels,
        );
        self.active = Some(Active {
            layout,
            max_num_frames: context.max_num_frames,
            sample_rate: context.sample_rate,
            scaled_main,
            scaled_sidechain,
            _arena: arena,
        });
        self.clear_sinks();
        Ok(())
    }

    fn start(&mut self) -> bool {
        log::debug!("start");
        self.clear_sinks();
        true
    }

    fn stop(&mut self) -> bool {
        log::debug!("stop");
        self.clear_sinks();
        true
    }

    fn process(&mut self, context: cx::Process<'_>) -> Processed {
        let cx::Process {
            num_frames,
            audio_inputs,
            audio_outputs,
            ..
        } = context;

        let Some(active) = self.active.as_mut() else {
            return passthrough(audio_inputs, audio_outputs);
        };
        let Some((main, sidechain)) = active.check(num_frames, audio_inputs, audio_outputs) else {
            return passthrough(audio_inputs, audio_outputs);
        };
        let output = &mut audio_outputs[0];

        // Visualize independent, attenuated copies of both inputs, whatever the effect state.
        active.scaled_main.set_num_frames(num_frames);
        active.scaled_main.copy_scaled_from(main, VISUAL_GAIN);
        match sidechain {
            Some(sidechain) => {
                active.scaled_sidechain.set_num_channels(sidechain.num_channels());
                active.scaled_sidechain.set_num_frames(num_frames);
                active.scaled_sidechain.copy_scaled_from(sidechain, VISUAL_GAIN);
            }
            None => {
                active.scaled_sidechain.set_num_channels(0);
                active.scaled_sidechain.set_num_frames(num_frames);
            }
        }
        self.main_sink.push_buffer(&active.scaled_main);
        self.sidechain_sink.push_buffer(&active.scaled_sidechain);

        let params = self.params.snapshot();
        if !params.enabled {
            return Processed::new(Status::Bypassed);
        }

        for channel in 0..active.layout.main_channels {
            let sc = sidechain.map(|sc| &sc[channel % sc.num_channels()][..num_frames]);
            if output.shares_channel(main, channel) {
                signal::process_channel_in_place(&mut output[channel][..num_frames], sc, params.mix);
            } else {
                signal::process_channel(
                    &main[channel][..num_frames],
                    sc,
                    &mut output[channel][..num_frames],
                    params.mix,
                );
            }
        }
        Processed::new(Status::Processed)
    }

    fn reset(&mut self) {
        log::debug!("reset");
        self.active = None;
        self.clear_sinks();
    }
}

impl Active {
    /// Check a block against the activated layout. Returns the main input and the sidechain,
    /// if one is connected.
    fn check<'a>(
        &self,
        num_frames: usize,
        inputs: &'a [Audio],
        outputs: &[Audio],
    ) -> Option<(&'a Audio, Option<&'a Audio>)> {
        let main = inputs.first()?;
        let output = outputs.first()?;
        let num_channels = self.layout.main_channels;
        if num_frames > self.max_num_frames
            || main.num_channels() != num_channels
            || output.num_channels() != num_channels
            || main.num_frames() < num_frames
            || output.num_frames() < num_frames
        {
            return None;
        }

        let sidechain = match inputs.get(1) {
            Some(sc) if sc.num_channels() == 0 => None,
            Some(sc)
                if sc.num_channels() == self.layout.num_sidechain_channels()
                    && sc.num_frames() >= num_frames =>
            {
                Some(sc)
            }
            Some(_) => return None,
            None => None,
        };
        Some((main, sidechain))
    }
}

/// Pass the main input through unmodified, or silence the output if the buses don't match.
fn passthrough(inputs: &[Audio], outputs: &mut [Audio]) -> Processed {
    if let Some(output) = outputs.first_mut() {
        match inputs.first() {
            Some(main)
                if main.num_channels() == output.num_channels()
                    && main.num_frames() >= output.num_frames() =>
            {
                output.copy_from(main)
            }
            _ => output.fill(0.0),
        }
    }
    Processed::new(Status::Passthrough)
}
