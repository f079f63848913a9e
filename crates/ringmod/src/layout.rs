//! Bus layout negotiation.
use processor::{
    Error, Port,
    port::{self, ChannelSet},
};

/// An accepted bus layout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Channels of the main input, and of the output.
    pub main_channels: usize,

    /// Channels of the sidechain input, None when there is none or it is switched off.
    pub sidechain_channels: Option<usize>,
}

impl Layout {
    pub fn num_sidechain_channels(&self) -> usize {
        self.sidechain_channels.unwrap_or(0)
    }

    /// The number of scratch channels needed to hold one copy of every input.
    pub fn num_scratch_channels(&self) -> usize {
        self.main_channels + self.num_sidechain_channels()
    }
}

/// Check a proposed set of ports. Accepts exactly one output, a main input of the same width,
/// and an optional mono or stereo sidechain. Has no side effects.
pub fn validate(ports: &[Port]) -> Result<Layout, Error> {
    let outputs: Vec<_> = ports.iter().filter(|port| port.is_output()).collect();
    let inputs: Vec<_> = ports.iter().filter(|port| port.is_input()).collect();

    let [output] = outputs.as_slice() else {
        return Err(unsupported(format!(
            "expected one output bus, got {}",
            outputs.len()
        )));
    };
    let (main, sidechain) = match inputs.as_slice() {
        [main] => (*main, None),
        [main, sidechain] => (*main, Some(*sidechain)),
        _ => {
            return Err(unsupported(format!(
                "expected a main input and at most one sidechain, got {} inputs",
                inputs.len()
            )));
        }
    };

    if main.channels.is_disabled() {
        return Err(unsupported(format!("main input '{}' is disabled", main.name)));
    }
    if main.num_channels() != output.num_channels() {
        return Err(unsupported(format!(
            "main input is {} but output is {}",
            main.channels, output.channels
        )));
    }

    let sidechain_channels = match sidechain {
        None => None,
        Some(sidechain) if sidechain.channels.is_disabled() => None,
        Some(sidechain) if is_mono_or_stereo(&sidechain.channels) => Some(sidechain.num_channels()),
        Some(sidechain) => {
            return Err(unsupported(format!(
                "sidechain '{}' must be mono or stereo, got {}",
                sidechain.name, sidechain.channels
            )));
        }
    };

    Ok(Layout {
        main_channels: main.num_channels(),
        sidechain_channels,
    })
}

/// Stereo in and out with a stereo sidechain.
pub fn default_ports() -> Vec<Port> {
    vec![
        Port::input("main", port::STEREO),
        Port::input("sidechain", port::STEREO),
        Port::output("main", port::STEREO),
    ]
}

fn is_mono_or_stereo(channels: &ChannelSet) -> bool {
    *channels == port::MONO || *channels == port::STEREO
}

fn unsupported(reason: String) -> Error {
    log::warn!("rejected bus layout: {reason}");
    Error::UnsupportedLayout(reason)
}

#[cfg(test)]
mod tests {
    use processor::{
        Error, Port,
        port::{self, ChannelSet},
    };

    use super::{Layout, default_ports, validate};

    fn with_sidechain(sidechain: Option<ChannelSet>) -> Vec<Port> {
        let mut ports = vec![
            Port::input("main", port::STEREO),
            Port::output("main", port::STEREO),
        ];
        if let Some(channels) = sidechain {
            ports.push(Port::input("sidechain", channels));
        }
        ports
    }

    #[test]
    fn accepts_supported_sidechains() {
        let layout = validate(&with_sidechain(None)).unwrap();
        assert_eq!(layout.sidechain_channels, None);
        let layout = validate(&with_sidechain(Some(port::MONO))).unwrap();
        assert_eq!(layout.sidechain_channels, Some(1));
        let layout = validate(&with_sidechain(Some(port::STEREO))).unwrap();
        assert_eq!(
            layout,
            Layout {
                main_channels: 2,
                sidechain_channels: Some(2)
            }
        );
        assert_eq!(layout.num_scratch_channels(), 4);
    }

    #[test]
    fn disabled_sidechain_counts_as_absent() {
        let layout = validate(&with_sidechain(Some(port::DISABLED))).unwrap();
        assert_eq!(layout.sidechain_channels, None);
        assert_eq!(layout.num_scratch_channels(), 2);
    }

    #[test]
    fn rejects_other_sidechains() {
        for channels in [
            port::STEREO_2_1,
            port::SURROUND_5_1,
            ChannelSet::new("mid-side", 2),
        ] {
            let result = validate(&with_sidechain(Some(channels)));
            assert!(matches!(result, Err(Error::UnsupportedLayout(_))));
        }
    }

    #[test]
    fn rejects_mismatched_main_buses() {
        let ports = [
            Port::input("main", port::MONO),
            Port::output("main", port::STEREO),
        ];
        assert!(validate(&ports).is_err());

        let ports = [
            Port::input("main", port::DISABLED),
            Port::output("main", port::DISABLED),
        ];
        assert!(validate(&ports).is_err());

        let ports = [Port::input("main", port::STEREO)];
        assert!(validate(&ports).is_err());

        let mut ports = with_sidechain(Some(port::MONO));
        ports.push(Port::input("extra", port::MONO));
        assert!(validate(&ports).is_err());
    }

    #[test]
    fn outputs_may_come_first() {
        let mut ports = default_ports();
        ports.rotate_right(1);
        assert!(ports[0].is_output());
        let layout = validate(&ports).unwrap();
        assert_eq!(layout.sidechain_channels, Some(2));
    }

    #[test]
    fn mono_main_bus() {
        let ports = [
            Port::input("main", port::MONO),
            Port::input("sidechain", port::STEREO),
            Port::output("main", port::MONO),
        ];
        let layout = validate(&ports).unwrap();
        assert_eq!(layout.main_channels, 1);
        assert_eq!(layout.sidechain_channels, Some(2));
    }
}
