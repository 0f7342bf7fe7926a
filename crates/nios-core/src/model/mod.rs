// ── Resource state models ──
//
// The user-facing shape of each managed object: what configuration
// declares and what state records. Conversion to and from the WAPI payload
// types lives in `crate::convert`.

pub mod bfd_template;
pub mod dtc_topology;
pub mod threat_protection_profile;

// ── Re-exports ──────────────────────────────────────────────────────

pub use bfd_template::{BfdAuthenticationType, BfdTemplateModel};
pub use dtc_topology::{
    DtcDestinationType, DtcReturnType, DtcSourceOp, DtcSourceType, DtcTopologyModel,
    DtcTopologyRuleModel, DtcTopologyRuleSourceModel,
};
pub use threat_protection_profile::ThreatProtectionProfileModel;
