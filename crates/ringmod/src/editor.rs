use std::sync::{Arc, Mutex, PoisonError};

use processor::{
    Editor, Error, Port, capabilities,
    editor::{Capabilities, ParameterTree},
};

use crate::{display::DisplayHandle, layout, params, params::Params, state};

/// The main-thread half of [crate::RingMod].
pub struct RingModEditor {
    params: Arc<Params>,
    ports: Arc<Mutex<Vec<Port>>>,
    display: Option<DisplayHandle>,
}

impl RingModEditor {
    pub(crate) fn new(
        params: Arc<Params>,
        ports: Arc<Mutex<Vec<Port>>>,
        display: Option<DisplayHandle>,
    ) -> Self {
        Self {
            params,
            ports,
            display,
        }
    }

    /// The waveform display, if the processor has one.
    pub fn display(&self) -> Option<&DisplayHandle> {
        self.display.as_ref()
    }

    pub fn sidechain_visible(&self) -> bool {
        self.params.enabled()
    }

    fn ports(&self) -> std::sync::MutexGuard<'_, Vec<Port>> {
        self.ports.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Editor for RingModEditor {
    fn capabilities(&self) -> Capabilities {
        capabilities::PERSISTENT
            | capabilities::CONFIGURABLE_PORTS
            | capabilities::THREAD_SAFE
            | capabilities::VISUALIZATION
    }

    fn save(&mut self) -> Vec<u8> {
        state::encode(&self.params.snapshot())
    }

    fn load(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let state = state::decode(bytes).map_err(|error| {
            log::warn!("failed to load state: {error}");
            Error::State(Box::new(error))
        })?;
        self.params.set_mix(state.mix);
        self.params.set_enabled(state.enabled);
        Ok(())
    }

    fn get_ports(&mut self) -> Vec<Port> {
        self.ports().clone()
    }

    fn set_ports(&mut self, ports: &[Port]) -> Result<(), Error> {
        let layout = layout::validate(ports)?;
        log::debug!("accepted bus layout {layout:?}");
        *self.ports() = ports.to_vec();
        Ok(())
    }

    fn params(&mut self) -> ParameterTree {
        self.params.tree()
    }

    fn get_param(&mut self, id: u64) -> Option<f64> {
        self.params.get(id)
    }

    fn set_param(&mut self, id: u64, value: f64) -> Result<(), Error> {
        self.params.set(id, value)
    }

    fn fmt_param(&mut self, id: u64, value: f64) -> Option<String> {
        params::format(id, value)
    }

    fn parse_param(&mut self, id: u64, text: &str) -> Option<f64> {
        params::parse(id, text)
    }
}

#[cfg(test)]
mod tests {
    use processor::{Editor, Error, Port, Processor, capabilities, port};

    use crate::{Options, RingMod, params, state};

    #[test]
    fn save_and_load() {
        let plugin = RingMod::new(&Options::default());
        let mut editor = plugin.editor();
        assert_ne!(editor.capabilities() & capabilities::PERSISTENT, 0);

        editor.set_param(params::MIX, 0.3).unwrap();
        editor.set_param(params::ENABLED, 0.0).unwrap();
        let saved = editor.save();
        assert_eq!(saved.len(), state::LEN);

        editor.set_param(params::MIX, 0.9).unwrap();
        editor.set_param(params::ENABLED, 1.0).unwrap();
        editor.load(&saved).unwrap();
        assert!((editor.get_param(params::MIX).unwrap() - 0.3).abs() < 1e-6);
        assert_eq!(editor.get_param(params::ENABLED), Some(0.0));
        assert!(!plugin.params().enabled(), "editors share the processor's parameters");
    }

    #[test]
    fn bad_state_is_rejected() {
        let plugin = RingMod::new(&Options::default());
        let mut editor = plugin.editor();
        editor.set_param(params::MIX, 0.4).unwrap();
        assert!(matches!(editor.load(b"nope"), Err(Error::State(_))));
        assert!((editor.get_param(params::MIX).unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn ports_are_only_replaced_when_accepted() {
        let plugin = RingMod::new(&Options::default());
        let mut editor = plugin.editor();
        let defaults = editor.get_ports();
        assert_eq!(defaults.len(), 3);

        let bad = [
            Port::input("main", port::STEREO),
            Port::input("sidechain", port::STEREO_2_1),
            Port::output("main", port::STEREO),
        ];
        assert!(matches!(editor.set_ports(&bad), Err(Error::UnsupportedLayout(_))));
        assert_eq!(editor.get_ports(), defaults);

        let mono = [
            Port::input("main", port::MONO),
            Port::input("sidechain", port::MONO),
            Port::output("main", port::MONO),
        ];
        editor.set_ports(&mono).unwrap();
        assert_eq!(plugin.editor().get_ports(), mono);
    }

    #[test]
    fn text_and_tree() {
        let plugin = RingMod::new(&Options::default());
        let mut editor = plugin.editor();
        assert_eq!(editor.fmt_param(params::MIX, 1.0).as_deref(), Some("100.0 %"));
        assert_eq!(editor.parse_param(params::MIX, "25 %"), Some(0.25));
        assert_eq!(editor.parse_param(params::ENABLED, "off"), Some(0.0));
        assert_eq!(editor.params().leaves().count(), 2);
    }

    #[test]
    fn sidechain_visibility_follows_enabled() {
        let plugin = RingMod::new(&Options::default());
        let editor = plugin.ring_mod_editor();
        assert!(editor.display().is_some());
        assert!(editor.sidechain_visible());
        plugin.params().set_enabled(false);
        assert!(!editor.sidechain_visible());
        assert!(!editor.display().is_some_and(|display| display.sidechain_visible()));
    }
}
