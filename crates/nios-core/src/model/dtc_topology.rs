// ── DTC topology ──

use serde::{Deserialize, Serialize};

use crate::extattrs::ExtAttrMap;

/// What a matching topology rule points at.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DtcDestinationType {
    Pool,
    Server,
}

/// DNS response type returned when a rule matches.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DtcReturnType {
    Regular,
    Noerr,
    Nxdomain,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DtcSourceType {
    City,
    Continent,
    Country,
    Ea0,
    Ea1,
    Ea2,
    Ea3,
    Subdivision,
    Subnet,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DtcSourceOp {
    Is,
    IsNot,
}

/// One match condition of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DtcTopologyRuleSourceModel {
    pub source_type: DtcSourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_op: Option<DtcSourceOp>,
    pub source_value: String,
}

/// One ordered rule of a topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DtcTopologyRuleModel {
    /// Computed.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub dest_type: DtcDestinationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<DtcReturnType>,
    /// An empty list matches every query.
    #[serde(default)]
    pub sources: Vec<DtcTopologyRuleSourceModel>,
    /// Computed: false once the destination has been deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

/// State of a `nios_dtc_topology` resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DtcTopologyModel {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Ordered rules. Left to the appliance when unset; an empty list
    /// removes every rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<DtcTopologyRuleModel>>,
    #[serde(default)]
    pub extattrs: ExtAttrMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extattrs_all: Option<ExtAttrMap>,
}
