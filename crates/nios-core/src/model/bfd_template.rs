// ── BFD template ──

use serde::{Deserialize, Serialize};

/// Default BFD detection multiplier applied by the appliance.
pub const DEFAULT_DETECTION_MULTIPLIER: i64 = 3;

/// Authentication scheme for BFD control packets.
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
pub enum BfdAuthenticationType {
    None,
    Md5,
    Sha1,
    KeyedMd5,
    MeticulousMd5,
    KeyedSha1,
    MeticulousSha1,
}

impl BfdAuthenticationType {
    /// Whether this scheme needs a key and key ID.
    pub fn requires_key(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// State of a `nios_bfd_template` resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BfdTemplateModel {
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<BfdAuthenticationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_key_id: Option<i64>,
    /// Never returned by the appliance; state keeps the configured value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_key: Option<String>,
    #[serde(default = "default_detection_multiplier")]
    pub detection_multiplier: i64,
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rx_interval: Option<i64>,
    /// Milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_tx_interval: Option<i64>,
}

fn default_detection_multiplier() -> i64 {
    DEFAULT_DETECTION_MULTIPLIER
}

impl Default for BfdTemplateModel {
    fn default() -> Self {
        Self {
            reference: None,
            name: String::new(),
            authentication_type: None,
            authentication_key_id: None,
            authentication_key: None,
            detection_multiplier: DEFAULT_DETECTION_MULTIPLIER,
            min_rx_interval: None,
            min_tx_interval: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn authentication_types_use_wire_spelling() {
        let parsed: BfdAuthenticationType = "METICULOUS_SHA1".parse().unwrap();
        assert_eq!(parsed, BfdAuthenticationType::MeticulousSha1);
        assert_eq!(BfdAuthenticationType::KeyedMd5.to_string(), "KEYED_MD5");
        assert_eq!(
            serde_json::to_value(BfdAuthenticationType::Sha1).unwrap(),
            json!("SHA1")
        );
        assert!("sha256".parse::<BfdAuthenticationType>().is_err());
    }

    #[test]
    fn detection_multiplier_defaults_to_three() {
        let model: BfdTemplateModel = serde_json::from_value(json!({ "name": "t1" })).unwrap();
        assert_eq!(model.detection_multiplier, 3);
        assert!(model.reference.is_none());
    }
}
