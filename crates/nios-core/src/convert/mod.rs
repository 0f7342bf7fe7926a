// ── Model <-> wire mapping ──
//
// `ManagedObject` impls for each state model. Expand never sends a value
// the user left unset; flatten records what the appliance returned and
// reports values it cannot represent through `Diagnostics`.

mod bfd_template;
mod dtc_topology;
mod threat_protection_profile;

use std::str::FromStr;

use crate::diagnostics::Diagnostics;

/// Parse an appliance enum string, recording a diagnostic on failure.
fn parse_wire_enum<E: FromStr>(
    raw: Option<&str>,
    attribute: &str,
    diags: &mut Diagnostics,
) -> Option<E> {
    let raw = raw?;
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            diags.attribute_error(
                attribute,
                "Unexpected value from appliance",
                format!("'{raw}' is not a recognised value"),
            );
            None
        }
    }
}

fn require_name(name: &str, diags: &mut Diagnostics) {
    if name.trim().is_empty() {
        diags.attribute_error("name", "Missing required attribute", "name must not be empty");
    }
}

fn check_range(
    value: Option<i64>,
    range: std::ops::RangeInclusive<i64>,
    attribute: &str,
    diags: &mut Diagnostics,
) {
    if let Some(value) = value.filter(|v| !range.contains(v)) {
        diags.attribute_error(
            attribute,
            "Value out of range",
            format!(
                "{value} is outside {}..={}",
                range.start(),
                range.end()
            ),
        );
    }
}

/// Flag a planned change to a value the appliance only accepts on create.
fn check_create_only(
    planned: Option<&String>,
    prior: Option<&String>,
    attribute: &str,
    diags: &mut Diagnostics,
) {
    if planned != prior {
        diags.attribute_error(
            attribute,
            "Attribute cannot be changed",
            format!("{attribute} is only applied at creation; recreate the resource to change it"),
        );
    }
}
