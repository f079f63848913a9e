use crate::{Error, Port};

/// The main-thread half of a plugin. Hosts and UIs read and write parameters, negotiate ports
/// and persist state through this interface; none of it runs on the audio thread.
pub trait Editor {
    /// Returns the (static) capabilities of the plugin.
    fn capabilities(&self) -> Capabilities;

    /// Save state. Requires [capabilities::PERSISTENT].
    fn save(&mut self) -> Vec<u8> {
        Vec::new()
    }

    /// Load state. Requires [capabilities::PERSISTENT]. On error the current state is kept.
    #[allow(unused_variables)]
    fn load(&mut self, bytes: &[u8]) -> Result<(), Error> {
        Ok(())
    }

    /// Return the current (or default) set of ports.
    fn get_ports(&mut self) -> Vec<Port>;

    /// Propose a set of ports. Requires [capabilities::CONFIGURABLE_PORTS]. The current ports
    /// are only replaced when the proposal is accepted.
    #[allow(unused_variables)]
    fn set_ports(&mut self, ports: &[Port]) -> Result<(), Error> {
        Err(Error::UnsupportedLayout("ports are not configurable".into()))
    }

    /// Return the parameter tree.
    fn params(&mut self) -> ParameterTree;

    /// Get a parameter value.
    fn get_param(&mut self, id: u64) -> Option<f64>;

    /// Set a parameter value. Out of range values are clamped.
    fn set_param(&mut self, id: u64, value: f64) -> Result<(), Error>;

    /// Format the parameter value as a string. Returns Some on success.
    #[allow(unused_variables)]
    fn fmt_param(&mut self, id: u64, value: f64) -> Option<String> {
        None
    }

    /// Parse the parameter value from text. Returns Some on success.
    #[allow(unused_variables)]
    fn parse_param(&mut self, id: u64, text: &str) -> Option<f64> {
        None
    }
}

/// A parameter tree holds the parameters in its leaves.
#[derive(Default, Debug)]
pub struct ParameterTree {
    /// The parameter name. Optional for branches.
    pub name: String,

    /// The parameter ID, None if this is a branch.
    pub id: Option<u64>,

    /// The parameter value, None if this is a branch.
    pub value: Option<f64>,

    /// The children, empty if this is a leaf.
    pub children: Vec<Self>,
}

pub struct Iter<'a> {
    stack: Vec<&'a ParameterTree>,
}

impl ParameterTree {
    /// Create a leaf.
    pub fn leaf(name: impl Into<String>, id: u64, value: f64) -> Self {
        Self {
            name: name.into(),
            id: Some(id),
            value: Some(value),
            children: Vec::new(),
        }
    }

    /// Create a branch.
    pub fn branch(name: impl Into<String>, children: Vec<Self>) -> Self {
        Self {
            name: name.into(),
            id: None,
            value: None,
            children,
        }
    }

    /// Iterate every node, depth first.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Iterate the parameters (leaves) only.
    pub fn leaves(&self) -> impl Iterator<Item = &ParameterTree> {
        self.iter().filter(|node| node.id.is_some())
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a ParameterTree;
    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

impl<'a> IntoIterator for &'a ParameterTree {
    type IntoIter = Iter<'a>;
    type Item = Self;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub type Capability = u64;
pub type Capabilities = u64;

pub mod capabilities {
    /// Enable save/load.
    pub const PERSISTENT: u64 = 1 << 0;

    /// Enable [super::Editor::set_ports].
    pub const CONFIGURABLE_PORTS: u64 = 1 << 1;

    /// Enable [super::Editor::get_param] to be called on any thread.
    pub const THREAD_SAFE_GET_PARAM: u64 = 1 << 2;

    /// Enable [super::Editor::set_param] to be called on any thread.
    pub const THREAD_SAFE_SET_PARAM: u64 = 1 << 3;

    /// Enable [super::Editor::fmt_param] to be called on any thread.
    pub const THREAD_SAFE_FMT_PARAM: u64 = 1 << 4;

    /// Enable [super::Editor::parse_param] to be called on any thread.
    pub const THREAD_SAFE_PARSE_PARAM: u64 = 1 << 5;

    /// The plugin draws visualizations that need periodic refreshing.
    pub const VISUALIZATION: u64 = 1 << 6;

    /// Enable all THREAD_SAFE_* capabilities.
    pub const THREAD_SAFE: u64 = THREAD_SAFE_GET_PARAM
        | THREAD_SAFE_SET_PARAM
        | THREAD_SAFE_FMT_PARAM
        | THREAD_SAFE_PARSE_PARAM;
}

#[cfg(test)]
mod tests {
    use super::ParameterTree;

    #[test]
    fn depth_first_in_declaration_order() {
        let tree = ParameterTree::branch(
            "root",
            vec![
                ParameterTree::leaf("a", 0, 0.5),
                ParameterTree::branch("group", vec![ParameterTree::leaf("b", 1, 1.0)]),
                ParameterTree::leaf("c", 2, 0.0),
            ],
        );
        let names: Vec<_> = tree.iter().map(|node| node.name.as_str()).collect();
        assert_eq!(names, ["root", "a", "group", "b", "c"]);

        let ids: Vec<_> = tree.leaves().filter_map(|node| node.id).collect();
        assert_eq!(ids, [0, 1, 2]);
    }
}
