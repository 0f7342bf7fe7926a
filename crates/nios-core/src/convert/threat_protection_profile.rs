use nios_api::types::ThreatProtectionProfile;

use super::{check_create_only, check_range, require_name};
use crate::diagnostics::Diagnostics;
use crate::extattrs::{ExtAttrMap, from_wire, to_wire};
use crate::model::ThreatProtectionProfileModel;
use crate::object::{ExpandMode, ManagedObject};

impl ManagedObject for ThreatProtectionProfileModel {
    type Wire = ThreatProtectionProfile;

    const OBJECT_TYPE: &'static str = "threatprotection:profile";
    const RETURN_FIELDS: &'static [&'static str] = &[
        "name",
        "comment",
        "current_ruleset",
        "disable_multiple_dns_tcp_request",
        "events_per_second_per_rule",
        "extattrs",
        "members",
        "use_current_ruleset",
        "use_disable_multiple_dns_tcp_request",
        "use_events_per_second_per_rule",
    ];
    const SUPPORTS_EXTATTRS: bool = true;
    const TAGS_INTERNAL_ID: bool = true;

    fn validate(&self, diags: &mut Diagnostics) {
        require_name(&self.name, diags);
        check_range(
            self.events_per_second_per_rule,
            0..=i64::from(u32::MAX),
            "events_per_second_per_rule",
            diags,
        );
        if self.source_member.is_some() && self.source_profile.is_some() {
            diags.attribute_error(
                "source_profile",
                "Conflicting attributes",
                "only one of source_member and source_profile may be set",
            );
        }
    }

    fn validate_update(&self, prior: &Self, diags: &mut Diagnostics) {
        check_create_only(
            self.source_member.as_ref(),
            prior.source_member.as_ref(),
            "source_member",
            diags,
        );
        check_create_only(
            self.source_profile.as_ref(),
            prior.source_profile.as_ref(),
            "source_profile",
            diags,
        );
    }

    fn expand(&self, mode: ExpandMode) -> ThreatProtectionProfile {
        let create = mode == ExpandMode::Create;
        ThreatProtectionProfile {
            reference: None,
            name: Some(self.name.clone()),
            comment: self.comment.clone(),
            current_ruleset: self.current_ruleset.clone(),
            disable_multiple_dns_tcp_request: self.disable_multiple_dns_tcp_request,
            events_per_second_per_rule: self.events_per_second_per_rule,
            extattrs: (!self.extattrs.is_empty()).then(|| to_wire(&self.extattrs)),
            // Unset leaves the assignment alone; `Some([])` clears it.
            members: self.members.clone(),
            source_member: self.source_member.clone().filter(|_| create),
            source_profile: self.source_profile.clone().filter(|_| create),
            use_current_ruleset: self.use_current_ruleset,
            use_disable_multiple_dns_tcp_request: self.use_disable_multiple_dns_tcp_request,
            use_events_per_second_per_rule: self.use_events_per_second_per_rule,
        }
    }

    fn flatten(
        wire: &ThreatProtectionProfile,
        prior: Option<&Self>,
        _diags: &mut Diagnostics,
    ) -> Self {
        let all: ExtAttrMap = wire.extattrs.as_ref().map(from_wire).unwrap_or_default();
        Self {
            reference: wire.reference.clone(),
            name: wire.name.clone().unwrap_or_default(),
            comment: wire.comment.clone(),
            current_ruleset: wire.current_ruleset.clone(),
            disable_multiple_dns_tcp_request: wire.disable_multiple_dns_tcp_request,
            events_per_second_per_rule: wire.events_per_second_per_rule,
            members: wire.members.clone(),
            source_member: prior.and_then(|p| p.source_member.clone()),
            source_profile: prior.and_then(|p| p.source_profile.clone()),
            use_current_ruleset: wire.use_current_ruleset,
            use_disable_multiple_dns_tcp_request: wire.use_disable_multiple_dns_tcp_request,
            use_events_per_second_per_rule: wire.use_events_per_second_per_rule,
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
        if self.current_ruleset.is_none() {
            self.current_ruleset.clone_from(&prior.current_ruleset);
        }
        if self.members.is_none() {
            self.members.clone_from(&prior.members);
        }
    }

    fn clear_computed(&mut self) {
        self.reference = None;
        self.extattrs_all = None;
    }
}
