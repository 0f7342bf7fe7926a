// ── Managed object traits ──
//
// Each resource type implements `ManagedObject` on its state model. The
// handlers in `handler.rs` and `data_source.rs` are generic over it, so a
// new object type needs a model, a wire type, and this impl.

use nios_api::types::{BfdTemplate, DtcTopology, ExtAttrs, ThreatProtectionProfile};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::diagnostics::Diagnostics;
use crate::extattrs::ExtAttrMap;

/// Which write an expanded payload is for.
///
/// Create-only fields are sent on `Create` and left out on `Update`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandMode {
    Create,
    Update,
}

/// A WAPI payload type the handlers can move over the wire.
pub trait WireObject: Serialize + DeserializeOwned + Default + Send + Sync {
    fn reference(&self) -> Option<&str>;

    fn extattrs(&self) -> Option<&ExtAttrs> {
        None
    }

    fn set_extattrs(&mut self, _extattrs: Option<ExtAttrs>) {}
}

/// A resource's state model and its mapping to and from the wire.
pub trait ManagedObject: Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync {
    type Wire: WireObject;

    /// WAPI object type, e.g. `dtc:topology`.
    const OBJECT_TYPE: &'static str;
    /// Fields requested with `_return_fields+` on every read and write.
    const RETURN_FIELDS: &'static [&'static str];
    const SUPPORTS_EXTATTRS: bool;
    /// Whether create and import write the internal-ID tag.
    const TAGS_INTERNAL_ID: bool;

    /// Check plan values before any remote call.
    fn validate(&self, diags: &mut Diagnostics);

    /// Check a planned update against prior state (create-only fields).
    fn validate_update(&self, _prior: &Self, _diags: &mut Diagnostics) {}

    /// Model to wire payload. Unset optional fields stay absent.
    fn expand(&self, mode: ExpandMode) -> Self::Wire;

    /// Wire payload to model. Values the appliance never returns
    /// (write-only, create-only) are taken from `prior` when given.
    fn flatten(wire: &Self::Wire, prior: Option<&Self>, diags: &mut Diagnostics) -> Self;

    fn reference(&self) -> Option<&str>;

    fn extattrs(&self) -> Option<&ExtAttrMap> {
        None
    }

    fn extattrs_all(&self) -> Option<&ExtAttrMap> {
        None
    }

    /// Store the user-visible subset and the full remote set.
    fn set_extattrs(&mut self, _visible: ExtAttrMap, _all: ExtAttrMap) {}

    /// Copy server-computed values from prior state into a plan.
    fn carry_computed(&mut self, prior: &Self);

    /// Mark server-computed values unknown until after apply.
    fn clear_computed(&mut self);
}

// ── Wire impls ───────────────────────────────────────────────────────

impl WireObject for BfdTemplate {
    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

impl WireObject for ThreatProtectionProfile {
    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn extattrs(&self) -> Option<&ExtAttrs> {
        self.extattrs.as_ref()
    }

    fn set_extattrs(&mut self, extattrs: Option<ExtAttrs>) {
        self.extattrs = extattrs;
    }
}

impl WireObject for DtcTopology {
    fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    fn extattrs(&self) -> Option<&ExtAttrs> {
        self.extattrs.as_ref()
    }

    fn set_extattrs(&mut self, extattrs: Option<ExtAttrs>) {
        self.extattrs = extattrs;
    }
}
