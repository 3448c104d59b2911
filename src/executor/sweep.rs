//! Per-field scenario expansion.
//!
//! Takes a template scenario with a JSON payload and builds one scenario per
//! (field, strategy) pair, each with that single field mutated.

use std::collections::BTreeSet;

use serde_json::Value;
use tracing::debug;

use super::scenario::{Payload, Scenario};
use crate::payload::{list_field_paths, mutate_field, navigator, CyclicGuard, FieldPath, MutationStrategy};

/// Builds mutated scenarios for every eligible field of a payload.
#[derive(Debug, Clone)]
pub struct FieldSweep {
    guard: CyclicGuard,
    strategies: Vec<MutationStrategy>,
    skipped_fields: BTreeSet<String>,
    primitives_only: bool,
}

impl FieldSweep {
    /// Paths whose segments repeat more than `cyclic_max_repeats` times in a
    /// row are left out.
    pub fn new(cyclic_max_repeats: usize) -> Self {
        Self {
            guard: CyclicGuard::new(cyclic_max_repeats),
            strategies: Vec::new(),
            skipped_fields: BTreeSet::new(),
            primitives_only: true,
        }
    }

    pub fn with_strategy(mut self, strategy: MutationStrategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Exclude a field, named in dotted (`a.b[0].c`) or `#` form.
    pub fn skipping_field(mut self, field: impl Into<String>) -> Self {
        self.skipped_fields.insert(field.into());
        self
    }

    /// Also target object and array fields, not only leaves.
    pub fn including_containers(mut self) -> Self {
        self.primitives_only = false;
        self
    }

    fn is_skipped(&self, path: &FieldPath) -> bool {
        self.skipped_fields.contains(&path.to_dotted()) || self.skipped_fields.contains(&path.to_string())
    }

    /// Fields of `doc` this sweep would mutate, in traversal order.
    pub fn candidate_fields(&self, doc: &Value) -> Vec<FieldPath> {
        list_field_paths(doc)
            .filter(|path| !self.guard.is_cyclic(&path.labels()))
            .filter(|path| !self.is_skipped(path))
            .filter(|path| !self.primitives_only || navigator::is_primitive(doc, path))
            .collect()
    }

    /// One scenario per (field, strategy). Templates without a JSON payload
    /// yield nothing.
    pub fn build(&self, template: &Scenario) -> Vec<Scenario> {
        let Some(doc) = template.payload.as_document() else {
            debug!(fuzzer = %template.fuzzer, "payload is not JSON, nothing to sweep");
            return Vec::new();
        };

        let mut scenarios = Vec::new();
        for path in self.candidate_fields(&doc) {
            for strategy in &self.strategies {
                let Some(mutated) = mutate_field(&doc, &path, strategy) else {
                    continue;
                };
                let mut scenario = template.clone();
                scenario.description = describe(&template.description, &path, strategy);
                scenario.payload = Payload::Json(mutated.document);
                scenarios.push(scenario);
            }
        }
        debug!(
            fuzzer = %template.fuzzer,
            scenarios = scenarios.len(),
            "field sweep built"
        );
        scenarios
    }
}

fn describe(base: &str, path: &FieldPath, strategy: &MutationStrategy) -> String {
    let detail = format!("Current field [{}] [{}]", path.to_dotted(), strategy);
    if base.is_empty() {
        detail
    } else {
        format!("{} {}", base, detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, ResponseFamily};
    use serde_json::json;

    fn template(payload: Payload) -> Scenario {
        Scenario::new("Trailing", "Send values with trailing spaces", HttpMethod::Post, "/pets", ResponseFamily::ClientError)
            .with_payload(payload)
    }

    #[test]
    fn builds_one_scenario_per_field_and_strategy() {
        let sweep = FieldSweep::new(2)
            .with_strategy(MutationStrategy::Trail(" ".into()))
            .with_strategy(MutationStrategy::Remove);
        let built = sweep.build(&template(Payload::Json(json!({"name": "rex", "tag": {"id": 1}}))));

        assert_eq!(built.len(), 4);
        assert_eq!(
            built[0].description,
            "Send values with trailing spaces Current field [name] [TRAIL with \" \"]"
        );
        assert_eq!(built[0].payload, Payload::Json(json!({"name": "rex ", "tag": {"id": 1}})));
        assert_eq!(built[3].payload, Payload::Json(json!({"name": "rex", "tag": {}})));
    }

    #[test]
    fn cyclic_and_skipped_fields_are_left_out() {
        let doc = json!({"a": {"a": {"a": {"a": 1}}}, "b": 2, "c": 3});
        let sweep = FieldSweep::new(2).skipping_field("c");
        let fields: Vec<String> = sweep.candidate_fields(&doc).iter().map(FieldPath::to_dotted).collect();
        assert_eq!(fields, vec!["b"]);
    }

    #[test]
    fn containers_are_opt_in() {
        let doc = json!({"tag": {"id": 1}});
        let fields: Vec<String> = FieldSweep::new(2)
            .including_containers()
            .candidate_fields(&doc)
            .iter()
            .map(FieldPath::to_dotted)
            .collect();
        assert_eq!(fields, vec!["tag", "tag.id"]);
    }

    #[test]
    fn non_json_payload_builds_nothing() {
        let sweep = FieldSweep::new(2).with_strategy(MutationStrategy::Remove);
        assert!(sweep.build(&template(Payload::Raw("not json".into()))).is_empty());
        assert!(sweep.build(&template(Payload::Empty)).is_empty());
    }
}
