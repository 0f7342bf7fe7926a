// ── Extensible attribute reconciliation ──
//
// A managed object's extattrs mix two owners: keys the user declares in
// configuration, and keys the appliance attaches on its own (inherited from
// a parent scope or set by policy). State keeps the user's subset in
// `extattrs` and everything the appliance reported in `extattrs_all`.
//
// A reserved internal-ID entry is written at create/import time so an object
// can be found again by a filtered search when its reference goes stale.

use std::collections::BTreeMap;

use nios_api::types::{ExtAttrValue, ExtAttrs};
use serde_json::Value;
use uuid::Uuid;

/// Reserved attribute used to relocate an object after out-of-band changes.
pub const INTERNAL_ID_KEY: &str = "Terraform Internal ID";

/// Extensible attributes as they appear in resource state: name to raw value.
pub type ExtAttrMap = BTreeMap<String, Value>;

/// Split the full remote attribute set into the user-visible subset and a
/// full copy.
///
/// The visible subset holds exactly the keys present in both
/// `user_declared` and `remote_full`, with the remote values. A declared key
/// missing remotely is simply absent from the result.
pub fn remove_inherited_extattrs(
    user_declared: &ExtAttrMap,
    remote_full: &ExtAttrMap,
) -> (ExtAttrMap, ExtAttrMap) {
    let visible = remote_full
        .iter()
        .filter(|(key, _)| user_declared.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    (visible, remote_full.clone())
}

/// Merge previously observed inherited attributes into an outgoing payload.
///
/// Keys in `user_declared` always win.
pub fn add_inherited_extattrs(user_declared: &ExtAttrMap, inherited: &ExtAttrMap) -> ExtAttrMap {
    let mut merged = inherited.clone();
    merged.extend(
        user_declared
            .iter()
            .map(|(key, value)| (key.clone(), value.clone())),
    );
    merged
}

/// The attributes in `all` that the user did not manage in `prior_user`.
///
/// This is the set update carries over: a key the user managed last time
/// and has since removed is dropped rather than resurrected.
pub fn inherited_extattrs(all: &ExtAttrMap, prior_user: &ExtAttrMap) -> ExtAttrMap {
    all.iter()
        .filter(|(key, _)| !prior_user.contains_key(*key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Ensure the internal-ID entry exists, generating a fresh UUID if absent.
pub fn add_internal_id_to_extattrs(mut current: ExtAttrMap) -> ExtAttrMap {
    current
        .entry(INTERNAL_ID_KEY.to_owned())
        .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
    current
}

/// The internal-ID value, if present and a string.
pub fn internal_id(extattrs: &ExtAttrMap) -> Option<&str> {
    extattrs.get(INTERNAL_ID_KEY).and_then(Value::as_str)
}

// ── Wire conversion ──────────────────────────────────────────────────

/// State map to wire payload (`{"Name": {"value": ...}}`).
pub fn to_wire(extattrs: &ExtAttrMap) -> ExtAttrs {
    extattrs
        .iter()
        .map(|(key, value)| (key.clone(), ExtAttrValue::new(value.clone())))
        .collect()
}

/// Wire payload to state map, dropping inheritance metadata.
pub fn from_wire(extattrs: &ExtAttrs) -> ExtAttrMap {
    extattrs
        .iter()
        .map(|(key, attr)| (key.clone(), attr.value.clone()))
        .collect()
}

/// Attributes an imported object's owner set directly: neither inherited
/// nor the internal-ID tag.
pub fn locally_set(extattrs: &ExtAttrs) -> ExtAttrMap {
    extattrs
        .iter()
        .filter(|(key, attr)| !attr.is_inherited() && key.as_str() != INTERNAL_ID_KEY)
        .map(|(key, attr)| (key.clone(), attr.value.clone()))
        .collect()
}
