//! Per-definition validator cache.
//!
//! One slot per service type, filled on the first invocation and never replaced.
//! A slot may hold `None` when the type declares no rules, so the rules are only
//! ever asked for once.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::debug;
use validation::{RuleEngine, Validator};

use crate::errors::ConfigurationError;

/// Stable identity of a service definition: the Rust type behind it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefinitionId {
    type_id: TypeId,
    name: &'static str,
}

impl DefinitionId {
    pub fn of<S: 'static>() -> Self {
        Self { type_id: TypeId::of::<S>(), name: std::any::type_name::<S>() }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DefinitionId").field(&self.name).finish()
    }
}

type Slot = Option<Arc<dyn Validator>>;

static GLOBAL: Lazy<Arc<ValidatorCache>> = Lazy::new(|| Arc::new(ValidatorCache::new()));

#[derive(Default)]
pub struct ValidatorCache {
    slots: DashMap<DefinitionId, Slot>,
}

impl ValidatorCache {
    pub fn new() -> Self {
        Self { slots: DashMap::new() }
    }

    /// Process-wide cache used by definitions that were not given their own.
    pub fn global() -> Arc<ValidatorCache> {
        Arc::clone(&GLOBAL)
    }

    /// Return the cached validator for `id`, compiling `rules()` on first use.
    ///
    /// Compilation runs outside the map lock. When two callers race on the first build,
    /// the first insert wins and both callers get the surviving validator.
    pub fn get_or_build<F>(
        &self,
        id: DefinitionId,
        engine: &dyn RuleEngine,
        rules: F,
    ) -> Result<Slot, ConfigurationError>
    where
        F: FnOnce() -> Option<Value>,
    {
        if let Some(slot) = self.slots.get(&id) {
            return Ok(slot.value().clone());
        }

        let built: Slot = match rules() {
            Some(rules) => Some(engine.compile(&rules).map_err(|source| ConfigurationError::InvalidRules {
                definition: id.name().to_string(),
                source,
            })?),
            None => None,
        };

        let stored = self.slots.entry(id).or_insert_with(|| built.clone()).value().clone();
        match (&stored, &built) {
            (Some(kept), Some(ours)) if !Arc::ptr_eq(kept, ours) => {
                debug!(definition = id.name(), "validator build lost a race; using the stored one");
            }
            _ => debug!(definition = id.name(), has_rules = stored.is_some(), "validator slot initialised"),
        }
        Ok(stored)
    }

    pub fn get(&self, id: &DefinitionId) -> Option<Slot> {
        self.slots.get(id).map(|slot| slot.value().clone())
    }

    pub fn contains(&self, id: &DefinitionId) -> bool {
        self.slots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for ValidatorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorCache").field("slots", &self.slots.len()).finish()
    }
}
