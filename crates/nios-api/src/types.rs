//! WAPI object payloads.
//!
//! Field names match the appliance's snake_case JSON. Every user-settable
//! field is an `Option` skipped when `None`, so an absent value is never sent
//! as a zero value. Server-assigned fields (`_ref`, rule validity) are
//! deserialized but never serialized back.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Extensible attributes ────────────────────────────────────────────

/// One extensible attribute entry: `{ "value": ..., "inheritance_source": ... }`.
///
/// Values are strings, integers, emails, dates or lists depending on the
/// attribute definition, so they stay as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtAttrValue {
    pub value: Value,
    /// Set by the appliance when the value is inherited from a parent
    /// object (e.g. a network container). Never sent on write.
    #[serde(default, skip_serializing)]
    pub inheritance_source: Option<Value>,
}

impl ExtAttrValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            inheritance_source: None,
        }
    }

    pub fn is_inherited(&self) -> bool {
        self.inheritance_source.is_some()
    }
}

/// Extensible attributes keyed by attribute name.
pub type ExtAttrs = BTreeMap<String, ExtAttrValue>;

// ── bfdtemplate ──────────────────────────────────────────────────────

/// BFD (Bidirectional Forwarding Detection) template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BfdTemplate {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// One of `NONE`, `MD5`, `SHA1`, `KEYED_MD5`, `METICULOUS_MD5`,
    /// `KEYED_SHA1`, `METICULOUS_SHA1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_key_id: Option<i64>,
    /// Write-only: the appliance never returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_multiplier: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rx_interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_tx_interval: Option<i64>,
}

// ── threatprotection:profile ─────────────────────────────────────────

/// Threat protection profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreatProtectionProfile {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_ruleset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_multiple_dns_tcp_request: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_per_second_per_rule: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extattrs: Option<ExtAttrs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
    /// Create-only: copy settings from this member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_member: Option<String>,
    /// Create-only: copy settings from this profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_current_ruleset: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_disable_multiple_dns_tcp_request: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_events_per_second_per_rule: Option<bool>,
}

// ── dtc:topology ─────────────────────────────────────────────────────

/// DTC (DNS Traffic Control) topology: an ordered rule list that picks a
/// pool or server for a query based on its source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DtcTopology {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extattrs: Option<ExtAttrs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<DtcTopologyRule>>,
}

/// One topology rule (`dtc:topology:rule`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DtcTopologyRule {
    #[serde(rename = "_ref", default, skip_serializing)]
    pub reference: Option<String>,
    /// `POOL` or `SERVER`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_type: Option<String>,
    /// Reference of the destination pool or server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_link: Option<String>,
    /// `REGULAR`, `NOERR` or `NXDOMAIN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<DtcTopologyRuleSource>>,
    /// Computed: whether the destination still exists.
    #[serde(default, skip_serializing)]
    pub valid: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DtcTopologyRuleSource {
    /// `CITY`, `CONTINENT`, `COUNTRY`, `EA0`..`EA3`, `SUBDIVISION` or `SUBNET`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    /// `IS` or `IS_NOT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_op: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_value: Option<String>,
}
