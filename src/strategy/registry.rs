use super::variants::StrategyVariant;
use crate::error::{NntcError, Result};
use std::collections::BTreeMap;

pub struct StrategyRegistry {
    variants: BTreeMap<String, StrategyVariant>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            variants: BTreeMap::new(),
        };
        for variant in StrategyVariant::all() {
            registry.register(variant);
        }
        registry
    }

    pub fn register(&mut self, variant: StrategyVariant) {
        self.variants.insert(variant.name.clone(), variant);
    }

    pub fn get(&self, name: &str) -> Option<&StrategyVariant> {
        self.variants.get(name)
    }

    /// Lookup that also accepts the name in any letter case
    pub fn resolve(&self, name: &str) -> Result<&StrategyVariant> {
        self.get(name)
            .or_else(|| {
                self.variants
                    .values()
                    .find(|v| v.name.eq_ignore_ascii_case(name))
            })
            .ok_or_else(|| NntcError::UnknownVariant(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.variants.keys().map(|k| k.as_str()).collect()
    }

    pub fn variants(&self) -> impl Iterator<Item = &StrategyVariant> {
        self.variants.values()
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
