//! Rule storage
//!
//! The rule source the evaluator reads from and writes triggered flags back
//! to. Rules for one entity are read once per update; the flag write must be
//! visible before that entity's next update is processed.

pub mod file;

pub use file::FileRuleStore;

use crate::domain::ThresholdRule;
use crate::error::StoreError;

/// Queryable collection of rules keyed by entity
pub trait RuleStore {
    /// Rules configured for an entity
    fn rules_for(&self, entity_id: &str) -> Result<Vec<ThresholdRule>, StoreError>;

    /// Persist a rule's triggered flag
    fn save_triggered(&mut self, rule_id: &str, triggered: bool) -> Result<(), StoreError>;
}

/// In-memory rule store
#[derive(Debug, Clone, Default)]
pub struct MemoryRuleStore {
    rules: Vec<ThresholdRule>,
}

impl MemoryRuleStore {
    /// Create a store holding `rules`
    pub fn new(rules: Vec<ThresholdRule>) -> Self {
        Self { rules }
    }

    /// All rules
    pub fn rules(&self) -> &[ThresholdRule] {
        &self.rules
    }

    /// Look up a rule by id
    pub fn get(&self, rule_id: &str) -> Option<&ThresholdRule> {
        self.rules.iter().find(|r| r.id == rule_id)
    }
}

impl RuleStore for MemoryRuleStore {
    fn rules_for(&self, entity_id: &str) -> Result<Vec<ThresholdRule>, StoreError> {
        Ok(self
            .rules
            .iter()
            .filter(|r| r.entity_id == entity_id)
            .cloned()
            .collect())
    }

    fn save_triggered(&mut self, rule_id: &str, triggered: bool) -> Result<(), StoreError> {
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| StoreError::RuleNotFound(rule_id.to_string()))?;
        rule.triggered = triggered;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RuleKind;

    fn store() -> MemoryRuleStore {
        MemoryRuleStore::new(vec![
            ThresholdRule::status("a-status", "a", "u1"),
            ThresholdRule::sliding("a-cpu", "a", "u1", RuleKind::Cpu, 80.0).unwrap(),
            ThresholdRule::sliding("b-cpu", "b", "u1", RuleKind::Cpu, 80.0).unwrap(),
        ])
    }

    #[test]
    fn test_rules_for_entity() {
        let store = store();
        let rules = store.rules_for("a").unwrap();
        assert_eq!(rules.len(), 2);
        assert!(rules.iter().all(|r| r.entity_id == "a"));
        assert!(store.rules_for("missing").unwrap().is_empty());
    }

    #[test]
    fn test_save_triggered() {
        let mut store = store();
        store.save_triggered("b-cpu", true).unwrap();
        assert!(store.get("b-cpu").unwrap().triggered);
        assert!(!store.get("a-cpu").unwrap().triggered);
    }

    #[test]
    fn test_save_unknown_rule() {
        let mut store = store();
        assert!(matches!(
            store.save_triggered("nope", true),
            Err(StoreError::RuleNotFound(_))
        ));
    }
}
