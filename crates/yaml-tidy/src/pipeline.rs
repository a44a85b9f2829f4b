//! rules, then qualification, then document markers
use crate::document;
use crate::mapping::MappingTable;
use crate::qualify::Qualifier;
use crate::rules::RuleSet;

/// The full transformation of one document
///
/// Built once per run and shared read-only by every worker.
#[derive(derive_new::new, Debug, Clone)]
pub struct Pipeline {
    rules: RuleSet,
    qualifier: Qualifier,
}

impl Pipeline {
    /// [RuleSet::canonical] with a qualifier for `mapping`
    pub fn canonical(mapping: &MappingTable) -> Self {
        Self::new(RuleSet::canonical(), Qualifier::new(mapping))
    }

    pub fn run(&self, text: &str) -> String {
        let text = self.rules.apply(text);
        let text = self.qualifier.apply(&text);
        document::normalize(&text)
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
