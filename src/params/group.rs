use super::published::PublishedParam;

/// Named parameter groups, in order of first use.
///
/// Parameters are published in runs: `set_group("filter")` then a handful of
/// `add_param_to_current_group` calls. Groups are never removed except by
/// `clear`, so an index stays valid for the life of the map.
#[derive(Debug, Clone, Default)]
pub struct ParamGroupMap {
    groups: Vec<String>,
    current: Option<usize>,
}

impl ParamGroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.current = None;
    }

    /// Make `name` the current group, creating it if needed.
    pub fn set_group(&mut self, name: &str) -> usize {
        let index = match self.groups.iter().position(|g| g == name) {
            Some(i) => i,
            None => {
                self.groups.push(name.to_owned());
                self.groups.len() - 1
            }
        };
        self.current = Some(index);
        index
    }

    pub fn current_group(&self) -> Option<usize> {
        self.current
    }

    pub fn add_param_to_current_group(&self, param: &mut PublishedParam) {
        param.set_group(self.current);
    }

    pub fn group_name(&self, index: usize) -> Option<&str> {
        self.groups.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
