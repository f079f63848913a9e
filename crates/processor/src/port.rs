use core::fmt;
use std::borrow::Cow;

/// An audio bus offered by the host. Ports of each direction are ordered: the first input is
/// the main input, any further inputs are auxiliary (sidechain) inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Port {
    pub direction: Direction,
    pub channels: ChannelSet,
    pub name: Cow<'static, str>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// A named arrangement of channels.
#[derive(Debug, Clone)]
pub struct ChannelSet {
    pub description: Cow<'static, str>,
    pub num_channels: usize,
}

impl Port {
    pub fn input(name: impl Into<Cow<'static, str>>, channels: ChannelSet) -> Self {
        Self {
            direction: Direction::Input,
            channels,
            name: name.into(),
        }
    }

    pub fn output(name: impl Into<Cow<'static, str>>, channels: ChannelSet) -> Self {
        Self {
            direction: Direction::Output,
            channels,
            name: name.into(),
        }
    }

    pub fn is_input(&self) -> bool {
        self.direction == Direction::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == Direction::Output
    }

    pub fn num_channels(&self) -> usize {
        self.channels.num_channels
    }
}

impl PartialEq for ChannelSet {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.num_channels == other.num_channels
    }
}

impl Eq for ChannelSet {}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} ch)", self.name(), self.num_channels)
    }
}

impl ChannelSet {
    /// Create a new (custom) channel set.
    pub fn new(name: &str, num_channels: usize) -> Self {
        Self {
            description: Cow::Owned(name.to_lowercase()),
            num_channels,
        }
    }

    /// Get the name.
    pub fn name(&self) -> &str {
        self.description.as_ref()
    }

    /// Get the number of channels.
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// A bus the host has switched off.
    pub fn is_disabled(&self) -> bool {
        self.num_channels == 0
    }
}

/// A bus that is declared but switched off.
pub const DISABLED: ChannelSet = ChannelSet {
    description: Cow::Borrowed("disabled"),
    num_channels: 0,
};

/// Mono.
pub const MONO: ChannelSet = ChannelSet {
    description: Cow::Borrowed("mono"),
    num_channels: 1,
};

/// Stereo (L, R)
pub const STEREO: ChannelSet = ChannelSet {
    description: Cow::Borrowed("stereo"),
    num_channels: 2,
};

/// 2.1 (L, R, LFE)
pub const STEREO_2_1: ChannelSet = ChannelSet {
    description: Cow::Borrowed("2.1"),
    num_channels: 3,
};

/// 5.1 surround (L, C, R, Ls, Rs, LFE)
pub const SURROUND_5_1: ChannelSet = ChannelSet {
    description: Cow::Borrowed("surround-5.1"),
    num_channels: 6,
};

#[cfg(test)]
mod tests {
    use super::{ChannelSet, Direction, MONO, Port, STEREO};

    #[test]
    fn custom_sets_compare_by_name_and_width() {
        assert_eq!(ChannelSet::new("Stereo", 2), STEREO);
        assert_ne!(ChannelSet::new("mid-side", 2), STEREO);
        assert_ne!(ChannelSet::new("mono", 2), MONO);
    }

    #[test]
    fn constructors() {
        let port = Port::input("sidechain", MONO);
        assert_eq!(port.direction, Direction::Input);
        assert!(port.is_input());
        assert_eq!(port.num_channels(), 1);
        assert_eq!(STEREO.to_string(), "stereo (2 ch)");
    }
}
