use nios_api::types::BfdTemplate;

use super::{check_range, parse_wire_enum, require_name};
use crate::diagnostics::Diagnostics;
use crate::model::bfd_template::DEFAULT_DETECTION_MULTIPLIER;
use crate::model::{BfdAuthenticationType, BfdTemplateModel};
use crate::object::{ExpandMode, ManagedObject};

impl ManagedObject for BfdTemplateModel {
    type Wire = BfdTemplate;

    const OBJECT_TYPE: &'static str = "bfdtemplate";
    const RETURN_FIELDS: &'static [&'static str] = &[
        "name",
        "authentication_type",
        "authentication_key_id",
        "detection_multiplier",
        "min_rx_interval",
        "min_tx_interval",
    ];
    const SUPPORTS_EXTATTRS: bool = false;
    const TAGS_INTERNAL_ID: bool = false;

    fn validate(&self, diags: &mut Diagnostics) {
        require_name(&self.name, diags);
        check_range(
            Some(self.detection_multiplier),
            3..=50,
            "detection_multiplier",
            diags,
        );
        check_range(self.min_rx_interval, 50..=9999, "min_rx_interval", diags);
        check_range(self.min_tx_interval, 50..=9999, "min_tx_interval", diags);
        check_range(
            self.authentication_key_id,
            0..=255,
            "authentication_key_id",
            diags,
        );

        if self
            .authentication_type
            .is_some_and(BfdAuthenticationType::requires_key)
            && self.authentication_key.is_none()
        {
            diags.attribute_error(
                "authentication_key",
                "Missing required attribute",
                "authentication_key is required unless authentication_type is NONE",
            );
        }
    }

    fn expand(&self, _mode: ExpandMode) -> BfdTemplate {
        BfdTemplate {
            reference: None,
            name: Some(self.name.clone()),
            authentication_type: self.authentication_type.map(|t| t.to_string()),
            authentication_key_id: self.authentication_key_id,
            authentication_key: self.authentication_key.clone(),
            detection_multiplier: Some(self.detection_multiplier),
            min_rx_interval: self.min_rx_interval,
            min_tx_interval: self.min_tx_interval,
        }
    }

    fn flatten(wire: &BfdTemplate, prior: Option<&Self>, diags: &mut Diagnostics) -> Self {
        Self {
            reference: wire.reference.clone(),
            name: wire.name.clone().unwrap_or_default(),
            authentication_type: parse_wire_enum(
                wire.authentication_type.as_deref(),
                "authentication_type",
                diags,
            ),
            authentication_key_id: wire.authentication_key_id,
            authentication_key: prior.and_then(|p| p.authentication_key.clone()),
            detection_multiplier: wire
                .detection_multiplier
                .unwrap_or(DEFAULT_DETECTION_MULTIPLIER),
            min_rx_interval: wire.min_rx_interval,
            min_tx_interval: wire.min_tx_interval,
        }
    }

    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn carry_computed(&mut self, prior: &Self) {
        self.reference.clone_from(&prior.reference);
        if self.authentication_type.is_none() {
            self.authentication_type = prior.authentication_type;
        }
        if self.min_rx_interval.is_none() {
            self.min_rx_interval = prior.min_rx_interval;
        }
        if self.min_tx_interval.is_none() {
            self.min_tx_interval = prior.min_tx_interval;
        }
    }

    fn clear_computed(&mut self) {
        self.reference = None;
    }
}
