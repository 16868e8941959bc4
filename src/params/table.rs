use std::collections::HashMap;
use std::sync::Arc;

use super::{
    engine_params::EngineParam, group::ParamGroupMap, property::PropertySet,
    published::PublishedParam, shared::SharedParams,
};
use crate::error::EngineError;

/// Control-thread registry of the engine's published parameters.
///
/// Every successful write is range-checked by the [`PublishedParam`], stored
/// into the shared atomic cell the audio thread reads, and broadcast to the
/// [`PropertySet`] so UI-side listeners see it in the same call.
#[derive(Debug)]
pub struct ParamTable {
    params: Vec<PublishedParam>,
    lookup: HashMap<String, usize>,
    groups: ParamGroupMap,
    shared: Arc<SharedParams>,
    properties: PropertySet,
}

impl ParamTable {
    /// Publish the engine catalogue. `max_voices` bounds the voice count.
    pub fn new(max_voices: usize) -> Result<Self, EngineError> {
        let mut params = Vec::with_capacity(EngineParam::COUNT);
        let mut lookup = HashMap::new();
        let mut groups = ParamGroupMap::new();
        let shared = Arc::new(SharedParams::new());

        for param in EngineParam::ALL {
            let spec = param.spec();
            let mut published = PublishedParam::new(spec.name, param.index());
            if let Some(alias) = spec.alias {
                published = published.with_alias(alias);
                lookup.insert(alias.to_owned(), param.index());
            }
            lookup.insert(spec.name.to_owned(), param.index());

            let hi = match param {
                EngineParam::Voices => max_voices.max(2) as f32,
                _ => spec.hi,
            };
            published.set_range(spec.lo, hi, spec.interval, spec.warp, spec.zero_threshold)?;
            published.set_default(spec.default);
            let value = published.reset_to_default();
            shared.set(param, value);

            groups.set_group(spec.group);
            groups.add_param_to_current_group(&mut published);
            params.push(published);
        }

        tracing::debug!(count = params.len(), groups = groups.len(), "published engine parameters");

        Ok(Self {
            params,
            lookup,
            groups,
            shared,
            properties: PropertySet::new(),
        })
    }

    /// Cells for the audio thread.
    pub fn shared(&self) -> Arc<SharedParams> {
        Arc::clone(&self.shared)
    }

    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    pub fn groups(&self) -> &ParamGroupMap {
        &self.groups
    }

    /// Resolve a name or alias.
    pub fn lookup(&self, name: &str) -> Result<EngineParam, EngineError> {
        self.lookup
            .get(name)
            .map(|&i| EngineParam::ALL[i])
            .ok_or_else(|| EngineError::UnknownParam(name.to_owned()))
    }

    pub fn param(&self, param: EngineParam) -> &PublishedParam {
        &self.params[param.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PublishedParam> {
        self.params.iter()
    }

    pub fn value(&self, param: EngineParam) -> f32 {
        self.params[param.index()].value()
    }

    pub fn set(&mut self, param: EngineParam, value: f32) -> Result<f32, EngineError> {
        let stored = self.params[param.index()].set_value(value)?;
        self.publish(param, stored);
        Ok(stored)
    }

    pub fn set_by_name(&mut self, name: &str, value: f32) -> Result<f32, EngineError> {
        let param = self.lookup(name)?;
        self.set(param, value)
    }

    pub fn set_proportion(&mut self, param: EngineParam, p: f32) -> Result<f32, EngineError> {
        let stored = self.params[param.index()].set_value_as_linear_proportion(p)?;
        self.publish(param, stored);
        Ok(stored)
    }

    pub fn proportion(&self, param: EngineParam) -> f32 {
        self.params[param.index()].value_as_linear_proportion()
    }

    fn publish(&mut self, param: EngineParam, value: f32) {
        self.shared.set(param, value);
        self.properties.set_property(param.name(), value);
    }
}
