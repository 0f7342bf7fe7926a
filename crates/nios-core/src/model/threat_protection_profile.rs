// ── Threat protection profile ──

use serde::{Deserialize, Serialize};

use crate::extattrs::ExtAttrMap;

/// State of a `nios_threatprotection_profile` resource.
///
/// The `use_*` flags tell the appliance whether the matching value overrides
/// the grid-level setting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatProtectionProfileModel {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_ruleset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_multiple_dns_tcp_request: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_per_second_per_rule: Option<i64>,
    /// Grid members the profile is assigned to. Left to the appliance when
    /// unset; an empty list removes every assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    /// Create-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_member: Option<String>,
    /// Create-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_current_ruleset: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_disable_multiple_dns_tcp_request: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_events_per_second_per_rule: Option<bool>,
    #[serde(default)]
    pub extattrs: ExtAttrMap,
    /// Every attribute the appliance reported, inherited ones included.
    /// `None` until the first apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extattrs_all: Option<ExtAttrMap>,
}
