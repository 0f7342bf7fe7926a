use nios_api::types::{DtcTopology, DtcTopologyRule, DtcTopologyRuleSource};

use super::{parse_wire_enum, require_name};
use crate::diagnostics::Diagnostics;
use crate::extattrs::{ExtAttrMap, from_wire, to_wire};
use crate::model::{
    DtcDestinationType, DtcReturnType, DtcTopologyModel, DtcTopologyRuleModel,
    DtcTopologyRuleSourceModel,
};
use crate::object::{ExpandMode, ManagedObject};

// ── Nested blocks ────────────────────────────────────────────────────

fn expand_rule(rule: &DtcTopologyRuleModel) -> DtcTopologyRule {
    DtcTopologyRule {
        reference: None,
        dest_type: Some(rule.dest_type.to_string()),
        destination_link: rule.destination_link.clone(),
        return_type: rule.return_type.map(|t| t.to_string()),
        sources: (!rule.sources.is_empty())
            .then(|| rule.sources.iter().map(expand_source).collect()),
        valid: None,
    }
}

fn expand_source(source: &DtcTopologyRuleSourceModel) -> DtcTopologyRuleSource {
    DtcTopologyRuleSource {
        source_type: Some(source.source_type.to_string()),
        source_op: source.source_op.map(|op| op.to_string()),
        source_value: Some(source.source_value.clone()),
    }
}

/// `None` (with a diagnostic) when the rule cannot be represented.
fn flatten_rule(
    rule: &DtcTopologyRule,
    index: usize,
    diags: &mut Diagnostics,
) -> Option<DtcTopologyRuleModel> {
    let attribute = format!("rules[{index}].dest_type");
    let Some(dest_type) =
        parse_wire_enum::<DtcDestinationType>(rule.dest_type.as_deref(), &attribute, diags)
    else {
        if rule.dest_type.is_none() {
            diags.attribute_error(
                attribute,
                "Malformed nested block",
                "topology rule has no destination type",
            );
        }
        return None;
    };

    let sources = rule
        .sources
        .iter()
        .flatten()
        .enumerate()
        .filter_map(|(i, source)| flatten_source(source, index, i, diags))
        .collect();

    Some(DtcTopologyRuleModel {
        reference: rule.reference.clone(),
        dest_type,
        destination_link: rule.destination_link.clone(),
        return_type: parse_wire_enum(
            rule.return_type.as_deref(),
            &format!("rules[{index}].return_type"),
            diags,
        ),
        sources,
        valid: rule.valid,
    })
}

fn flatten_source(
    source: &DtcTopologyRuleSource,
    rule_index: usize,
    index: usize,
    diags: &mut Diagnostics,
) -> Option<DtcTopologyRuleSourceModel> {
    let prefix = format!("rules[{rule_index}].sources[{index}]");
    let source_type = parse_wire_enum(
        source.source_type.as_deref(),
        &format!("{prefix}.source_type"),
        diags,
    );
    let source_op = parse_wire_enum(
        source.source_op.as_deref(),
        &format!("{prefix}.source_op"),
        diags,
    );

    match (source_type, &source.source_value) {
        (Some(source_type), Some(value)) => Some(DtcTopologyRuleSourceModel {
            source_type,
            source_op,
            source_value: value.clone(),
        }),
        _ => {
            diags.attribute_error(
                prefix,
                "Malformed nested block",
                "rule source needs a source_type and a source_value",
            );
            None
        }
    }
}

// ── ManagedObject ────────────────────────────────────────────────────

impl ManagedObject for DtcTopologyModel {
    type Wire = DtcTopology;

    const OBJECT_TYPE: &'static str = "dtc:topology";
    const RETURN_FIELDS: &'static [&'static str] = &["name", "comment", "extattrs", "rules"];
    const SUPPORTS_EXTATTRS: bool = true;
    const TAGS_INTERNAL_ID: bool = true;

    fn validate(&self, diags: &mut Diagnostics) {
        require_name(&self.name, diags);

        for (i, rule) in self.rules.iter().flatten().enumerate() {
            let answers = matches!(rule.return_type, None | Some(DtcReturnType::Regular));
            if answers && rule.destination_link.is_none() {
                diags.attribute_error(
                    format!("rules[{i}].destination_link"),
                    "Missing required attribute",
                    "destination_link is required when return_type is REGULAR",
                );
            }
            for (j, source) in rule.sources.iter().enumerate() {
                if source.source_value.trim().is_empty() {
                    diags.attribute_error(
                        format!("rules[{i}].sources[{j}].source_value"),
                        "Missing required attribute",
                        "source_value must not be empty",
                    );
                }
            }
        }
    }

    fn expand(&self, _mode: ExpandMode) -> DtcTopology {
        DtcTopology {
            reference: None,
            name: Some(self.name.clone()),
            comment: self.comment.clone(),
            extattrs: (!self.extattrs.is_empty()).then(|| to_wire(&self.extattrs)),
            rules: self
                .rules
                .as_ref()
                .map(|rules| rules.iter().map(expand_rule).collect()),
        }
    }

    fn flatten(wire: &DtcTopology, _prior: Option<&Self>, diags: &mut Diagnostics) -> Self {
        let all: ExtAttrMap = wire.extattrs.as_ref().map(from_wire).unwrap_or_default();
        let rules = wire.rules.as_ref().map(|rules| {
            rules
                .iter()
                .enumerate()
                .filter_map(|(i, rule)| flatten_rule(rule, i, diags))
                .collect()
        });

        Self {
            reference: wire.reference.clone(),
            name: wire.name.clone().unwrap_or_default(),
            comment: wire.comment.clone(),
            rules,
            extattrs: all.clone(),
            extattrs_all: Some(all),
        }
    }

    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn extattrs(&self) -> Option<&ExtAttrMap> {
        Some(&self.extattrs)
    }

    fn extattrs_all(&self) -> Option<&ExtAttrMap> {
        self.extattrs_all.as_ref()
    }

    fn set_extattrs(&mut self, visible: ExtAttrMap, all: ExtAttrMap) {
        self.extattrs = visible;
        self.extattrs_all = Some(all);
    }

    fn carry_computed(&mut self, prior: &Self) {
        self.reference.clone_from(&prior.reference);
        self.extattrs_all.clone_from(&prior.extattrs_all);
        if self.rules.is_none() {
            self.rules.clone_from(&prior.rules);
            return;
        }
        // Rules are positional; a rule keeps its computed values while it
        // still sits at the same index with the same destination.
        let prior_rules = prior.rules.iter().flatten();
        for (rule, old) in self.rules.iter_mut().flatten().zip(prior_rules) {
            if rule.dest_type == old.dest_type && rule.destination_link == old.destination_link {
                rule.reference.clone_from(&old.reference);
                rule.valid = old.valid;
            }
        }
    }

    fn clear_computed(&mut self) {
        self.reference = None;
        self.extattrs_all = None;
        for rule in self.rules.iter_mut().flatten() {
            rule.reference = None;
            rule.valid = None;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::{DtcSourceOp, DtcSourceType};

    fn topology() -> DtcTopologyModel {
        DtcTopologyModel {
            name: "geo".into(),
            comment: Some("EU first".into()),
            rules: Some(vec![
                DtcTopologyRuleModel {
                    reference: None,
                    dest_type: DtcDestinationType::Pool,
                    destination_link: Some("dtc:pool/ZG5z:eu".into()),
                    return_type: Some(DtcReturnType::Regular),
                    sources: vec![DtcTopologyRuleSourceModel {
                        source_type: DtcSourceType::Continent,
                        source_op: Some(DtcSourceOp::Is),
                        source_value: "Europe".into(),
                    }],
                    valid: None,
                },
                DtcTopologyRuleModel {
                    reference: None,
                    dest_type: DtcDestinationType::Server,
                    destination_link: None,
                    return_type: Some(DtcReturnType::Nxdomain),
                    sources: Vec::new(),
                    valid: None,
                },
            ]),
            extattrs: [("Owner".to_owned(), json!("dns-team"))].into(),
            ..DtcTopologyModel::default()
        }
    }

    #[test]
    fn nested_rules_round_trip() {
        let model = topology();
        let mut diags = Diagnostics::new();

        let wire = model.expand(ExpandMode::Create);
        let mut back = DtcTopologyModel::flatten(&wire, None, &mut diags);
        back.clear_computed();

        assert!(diags.is_empty(), "{diags}");
        assert_eq!(back, model);
    }

    #[test]
    fn expanded_rules_use_wire_spelling() {
        insta::assert_json_snapshot!(topology().expand(ExpandMode::Create).rules, @r#"
        [
          {
            "dest_type": "POOL",
            "destination_link": "dtc:pool/ZG5z:eu",
            "return_type": "REGULAR",
            "sources": [
              {
                "source_type": "CONTINENT",
                "source_op": "IS",
                "source_value": "Europe"
              }
            ]
          },
          {
            "dest_type": "SERVER",
            "return_type": "NXDOMAIN"
          }
        ]
        "#);
    }

    #[test]
    fn unknown_dest_type_is_a_schema_diagnostic() {
        let wire: DtcTopology = serde_json::from_value(json!({
            "_ref": "dtc:topology/ZG5z:geo",
            "name": "geo",
            "rules": [
                { "dest_type": "POOL", "destination_link": "dtc:pool/ZG5z:eu" },
                { "dest_type": "REGION", "destination_link": "dtc:pool/ZG5z:us" }
            ]
        }))
        .unwrap();
        let mut diags = Diagnostics::new();

        let model = DtcTopologyModel::flatten(&wire, None, &mut diags);

        assert_eq!(model.rules.unwrap().len(), 1);
        let errors: Vec<_> = diags.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].attribute.as_deref(), Some("rules[1].dest_type"));
    }

    #[test]
    fn computed_rule_values_follow_unchanged_rules() {
        let mut prior = topology();
        prior.reference = Some("dtc:topology/ZG5z:geo".into());
        let prior_rules = prior.rules.as_mut().unwrap();
        prior_rules[0].reference = Some("dtc:topology:rule/ZG5z:r0".into());
        prior_rules[0].valid = Some(true);
        let mut plan = topology();
        plan.rules.as_mut().unwrap()[0].destination_link = Some("dtc:pool/ZG5z:us".into());

        plan.carry_computed(&prior);

        assert_eq!(plan.reference, prior.reference);
        let rules = plan.rules.unwrap();
        assert!(rules[0].reference.is_none());
        assert!(rules[0].valid.is_none());
    }

    #[test]
    fn unset_rules_stay_off_the_wire() {
        let model = DtcTopologyModel {
            name: "geo".into(),
            ..DtcTopologyModel::default()
        };

        let update = serde_json::to_value(model.expand(ExpandMode::Update)).unwrap();

        assert_eq!(update, json!({ "name": "geo" }));
    }

    #[test]
    fn explicit_empty_rules_clear_the_topology() {
        let model = DtcTopologyModel {
            name: "geo".into(),
            rules: Some(Vec::new()),
            ..DtcTopologyModel::default()
        };

        let update = serde_json::to_value(model.expand(ExpandMode::Update)).unwrap();

        assert_eq!(update, json!({ "name": "geo", "rules": [] }));
    }

    #[test]
    fn unset_rules_follow_prior_state_in_plans() {
        let mut prior = topology();
        prior.rules.as_mut().unwrap()[0].valid = Some(true);
        let mut plan = DtcTopologyModel {
            rules: None,
            ..topology()
        };

        plan.carry_computed(&prior);

        assert_eq!(plan.rules, prior.rules);
    }

    #[test]
    fn regular_rule_needs_a_destination() {
        let mut model = topology();
        model.rules.as_mut().unwrap()[0].destination_link = None;
        let mut diags = Diagnostics::new();

        model.validate(&mut diags);

        let first = diags.errors().next().unwrap();
        assert_eq!(first.attribute.as_deref(), Some("rules[0].destination_link"));
    }
}
