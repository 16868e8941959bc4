//! Registry of voice node types.
//!
//! The registry maps a type tag such as `"filter.lowpass"` to a factory and
//! a description, so voice chains can be written down as plain lists of tags
//! (in a config file, say) and built at setup time. It is an ordinary value:
//! build one, register what you need, and hand it to the engine builder.
//!
//! Any tag may carry an `@2x` suffix to run that node through
//! [`Oversampled`](crate::graph::oversample::Oversampled).

use std::collections::HashMap;

use crate::{
    error::EngineError,
    graph::{
        amp::GateAmpNode,
        delay::DelayNode,
        extensions::NodeExt,
        filter::FilterNode,
        node::GraphNode,
        oscillator::OscNode,
        through::Through,
    },
};

/// Suffix that wraps a node in a 2x oversampler.
pub const OVERSAMPLE_SUFFIX: &str = "@2x";

/// Factory function type for creating node instances.
pub type NodeFactory = fn() -> Box<dyn GraphNode>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    Source,
    Filter,
    Amp,
    Effect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub tag: &'static str,
    pub name: &'static str,
    pub category: NodeCategory,
    pub description: &'static str,
}

pub struct NodeRegistry {
    factories: HashMap<&'static str, NodeFactory>,
    infos: Vec<NodeInfo>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            infos: Vec::new(),
        }
    }

    /// A registry holding every node this crate ships.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for (info, factory) in builtin() {
            // Tags in the builtin table are distinct.
            let _ = registry.register(info, factory);
        }
        registry
    }

    /// Add a node type. Fails if the tag is taken or uses the oversampling
    /// suffix.
    pub fn register(&mut self, info: NodeInfo, factory: NodeFactory) -> Result<(), EngineError> {
        if info.tag.ends_with(OVERSAMPLE_SUFFIX) {
            return Err(EngineError::ReservedTag(info.tag.to_string()));
        }
        if self.factories.contains_key(info.tag) {
            return Err(EngineError::DuplicateNode(info.tag.to_string()));
        }
        tracing::debug!(tag = info.tag, "registered node type");
        self.factories.insert(info.tag, factory);
        self.infos.push(info);
        Ok(())
    }

    /// A fresh node for `tag`, oversampled if the tag ends in `@2x`.
    pub fn create(&self, tag: &str) -> Result<Box<dyn GraphNode>, EngineError> {
        let (base, oversample) = match tag.strip_suffix(OVERSAMPLE_SUFFIX) {
            Some(base) => (base, true),
            None => (tag, false),
        };
        let factory = self
            .factories
            .get(base)
            .ok_or_else(|| EngineError::UnknownNode(tag.to_string()))?;
        let node = factory();
        Ok(if oversample {
            node.oversampled().boxed()
        } else {
            node
        })
    }

    /// Chain the nodes for `tags` in series, first tag first.
    pub fn build_chain<S: AsRef<str>>(&self, tags: &[S]) -> Result<Box<dyn GraphNode>, EngineError> {
        let mut tags = tags.iter();
        let first = tags
            .next()
            .ok_or_else(|| EngineError::UnknownNode(String::new()))?;
        let mut chain = self.create(first.as_ref())?;
        for tag in tags {
            let next = self.create(tag.as_ref())?;
            chain = Box::new(Through::new(chain, next));
        }
        Ok(chain)
    }

    pub fn info(&self, tag: &str) -> Option<&NodeInfo> {
        let base = tag.strip_suffix(OVERSAMPLE_SUFFIX).unwrap_or(tag);
        self.infos.iter().find(|info| info.tag == base)
    }

    pub fn list(&self) -> &[NodeInfo] {
        &self.infos
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        let base = tag.strip_suffix(OVERSAMPLE_SUFFIX).unwrap_or(tag);
        self.factories.contains_key(base)
    }
}

fn builtin() -> [(NodeInfo, NodeFactory); 8] {
    fn info(
        tag: &'static str,
        name: &'static str,
        category: NodeCategory,
        description: &'static str,
    ) -> NodeInfo {
        NodeInfo {
            tag,
            name,
            category,
            description,
        }
    }

    [
        (
            info("osc.sine", "Sine", NodeCategory::Source, "Sine oscillator following voice pitch"),
            || OscNode::sine().boxed(),
        ),
        (
            info("osc.tri", "Triangle", NodeCategory::Source, "Triangle oscillator following voice pitch"),
            || OscNode::triangle().boxed(),
        ),
        (
            info("filter.lowpass", "Lowpass", NodeCategory::Filter, "Biquad lowpass with key tracking"),
            || FilterNode::lowpass().boxed(),
        ),
        (
            info("filter.highpass", "Highpass", NodeCategory::Filter, "Biquad highpass with key tracking"),
            || FilterNode::highpass().boxed(),
        ),
        (
            info("filter.bandpass", "Bandpass", NodeCategory::Filter, "Biquad bandpass with key tracking"),
            || FilterNode::bandpass().boxed(),
        ),
        (
            info("filter.notch", "Notch", NodeCategory::Filter, "Biquad notch with key tracking"),
            || FilterNode::notch().boxed(),
        ),
        (
            info("amp.gate", "Gate Amp", NodeCategory::Amp, "Voice amp signal with click-free ramp"),
            || GateAmpNode::new().boxed(),
        ),
        (
            info("fx.delay", "Delay", NodeCategory::Effect, "Feedback echo"),
            || DelayNode::new().boxed(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node::RenderCtx;

    #[test]
    fn builtin_nodes_are_listed() {
        let registry = NodeRegistry::with_builtin();
        assert_eq!(registry.len(), 8);
        assert!(registry.contains("osc.sine"));
        assert!(registry.contains("filter.lowpass@2x"));
        assert_eq!(registry.info("amp.gate").map(|i| i.category), Some(NodeCategory::Amp));
    }

    #[test]
    fn unknown_tags_are_errors() {
        let registry = NodeRegistry::with_builtin();
        assert_eq!(
            registry.create("osc.saw").err(),
            Some(EngineError::UnknownNode("osc.saw".into()))
        );
        assert!(registry.create("osc.sine@4x").is_err());
        assert!(registry.build_chain::<&str>(&[]).is_err());
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let mut registry = NodeRegistry::with_builtin();
        let info = registry.info("osc.sine").cloned().unwrap();
        assert_eq!(
            registry.register(info, || OscNode::sine().boxed()),
            Err(EngineError::DuplicateNode("osc.sine".into()))
        );
    }

    #[test]
    fn oversampling_suffix_is_reserved() {
        let mut registry = NodeRegistry::new();
        let info = NodeInfo {
            tag: "osc.sine@2x",
            name: "Sine",
            category: NodeCategory::Source,
            description: "",
        };
        assert_eq!(
            registry.register(info, || OscNode::sine().boxed()),
            Err(EngineError::ReservedTag("osc.sine@2x".into()))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = NodeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.create("osc.sine").is_err());
    }

    #[test]
    fn chains_render() {
        let registry = NodeRegistry::with_builtin();
        let mut chain = registry
            .build_chain(&["osc.tri@2x", "filter.lowpass", "amp.gate"])
            .unwrap();
        chain.prepare(48_000.0, 256).unwrap();
        let mut buffer = vec![0.0; 256];
        chain.render_block(&mut buffer, &RenderCtx::new(48_000.0));
        assert!(buffer.iter().all(|x| x.is_finite()));
        assert!(buffer.iter().any(|&x| x != 0.0));
    }
}
