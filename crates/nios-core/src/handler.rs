// ── Resource handlers ──
//
// Sequences create, read, update, delete, import and plan for one object
// type against the WAPI. Extattr reconciliation and reference recovery by
// internal ID happen here; field mapping is delegated to `ManagedObject`.

use std::marker::PhantomData;
use std::sync::Arc;

use nios_api::{QueryParams, WapiClient};
use tracing::{debug, info, warn};

use crate::config::ProviderConfig;
use crate::diagnostics::Diagnostics;
use crate::error::CoreError;
use crate::extattrs::{
    ExtAttrMap, INTERNAL_ID_KEY, add_inherited_extattrs, add_internal_id_to_extattrs, from_wire,
    inherited_extattrs, internal_id, locally_set, remove_inherited_extattrs, to_wire,
};
use crate::object::{ExpandMode, ManagedObject, WireObject};

/// Result of refreshing a resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<T> {
    Found(T),
    /// The object is gone; drop it from state.
    Removed,
}

/// Where a read currently stands.
#[derive(Debug)]
enum ReadState {
    HaveReference(String),
    NeedLookupByExtAttr(String),
    NotFound,
}

/// CRUD orchestration for one managed object type.
pub struct ResourceHandler<T> {
    client: Arc<WapiClient>,
    suppress_computed_plan: bool,
    _object: PhantomData<fn() -> T>,
}

impl<T: ManagedObject> ResourceHandler<T> {
    pub fn new(client: Arc<WapiClient>, config: &ProviderConfig) -> Self {
        Self {
            client,
            suppress_computed_plan: config.suppress_computed_plan,
            _object: PhantomData,
        }
    }

    fn query() -> QueryParams {
        QueryParams::new().return_fields_plus(T::RETURN_FIELDS.iter().copied())
    }

    fn write_query() -> QueryParams {
        Self::query().return_as_object()
    }

    /// Flatten a wire object and split its extattrs against `declared`.
    fn reconcile(
        wire: &T::Wire,
        declared: Option<&ExtAttrMap>,
        prior: Option<&T>,
    ) -> Result<T, CoreError> {
        let mut diags = Diagnostics::new();
        let mut model = T::flatten(wire, prior, &mut diags);
        diags.into_result()?;

        if T::SUPPORTS_EXTATTRS {
            let remote = wire.extattrs().map(from_wire).unwrap_or_default();
            let declared = declared.cloned().unwrap_or_default();
            let (visible, all) = remove_inherited_extattrs(&declared, &remote);
            model.set_extattrs(visible, all);
        }
        Ok(model)
    }

    fn validate(planned: &T, prior: Option<&T>) -> Result<(), CoreError> {
        let mut diags = Diagnostics::new();
        planned.validate(&mut diags);
        if let Some(prior) = prior {
            planned.validate_update(prior, &mut diags);
        }
        diags.into_result()
    }

    // ── Create ───────────────────────────────────────────────────────

    pub async fn create(&self, plan: &T) -> Result<T, CoreError> {
        Self::validate(plan, None)?;

        let mut wire = plan.expand(ExpandMode::Create);
        if T::SUPPORTS_EXTATTRS {
            let mut attrs = plan.extattrs().cloned().unwrap_or_default();
            if T::TAGS_INTERNAL_ID {
                attrs = add_internal_id_to_extattrs(attrs);
            }
            wire.set_extattrs((!attrs.is_empty()).then(|| to_wire(&attrs)));
        }

        let created: T::Wire = self
            .client
            .create(T::OBJECT_TYPE, &wire, &Self::write_query())
            .await?;

        let recorded = match created.reference() {
            Some(_) => Self::reconcile(&created, plan.extattrs(), Some(plan)),
            None => Err(CoreError::Internal(format!(
                "appliance returned no reference for new {}",
                T::OBJECT_TYPE
            ))),
        };
        match recorded {
            Ok(model) => {
                info!(
                    object_type = T::OBJECT_TYPE,
                    reference = model.reference().unwrap_or_default(),
                    "created"
                );
                Ok(model)
            }
            Err(e) => {
                // Not compensated: the object stays on the appliance.
                warn!(
                    object_type = T::OBJECT_TYPE,
                    reference = created.reference().unwrap_or("<unknown>"),
                    error = %e,
                    "object was created but could not be recorded; import it to reconcile"
                );
                Err(e)
            }
        }
    }

    // ── Read ─────────────────────────────────────────────────────────

    /// Refresh `prior` from the appliance.
    ///
    /// A stale reference (404, or pointing at an object whose internal ID
    /// differs from ours) falls back to a search by internal ID.
    pub async fn read(&self, prior: &T) -> Result<ReadOutcome<T>, CoreError> {
        let stored_id = prior
            .extattrs_all()
            .and_then(internal_id)
            .filter(|_| T::TAGS_INTERNAL_ID)
            .map(str::to_owned);

        let mut state = match (prior.reference(), &stored_id) {
            (Some(reference), _) => ReadState::HaveReference(reference.to_owned()),
            (None, Some(id)) => ReadState::NeedLookupByExtAttr(id.clone()),
            (None, None) => ReadState::NotFound,
        };

        loop {
            debug!(object_type = T::OBJECT_TYPE, ?state, "read");
            state = match state {
                ReadState::HaveReference(reference) => {
                    match self.client.get::<T::Wire>(&reference, &Self::query()).await {
                        Ok(wire) => match &stored_id {
                            Some(id) if remote_internal_id(&wire) != Some(id.as_str()) => {
                                debug!(
                                    object_type = T::OBJECT_TYPE,
                                    reference = %reference,
                                    "reference now names a different object"
                                );
                                ReadState::NeedLookupByExtAttr(id.clone())
                            }
                            _ => {
                                let model = Self::reconcile(&wire, prior.extattrs(), Some(prior))?;
                                return Ok(ReadOutcome::Found(model));
                            }
                        },
                        Err(e) if e.is_not_found() => match &stored_id {
                            Some(id) => ReadState::NeedLookupByExtAttr(id.clone()),
                            None => ReadState::NotFound,
                        },
                        Err(e) => return Err(e.into()),
                    }
                }
                ReadState::NeedLookupByExtAttr(id) => {
                    let query = Self::query().extattr_filter(INTERNAL_ID_KEY, id.as_str());
                    let found = self
                        .client
                        .list::<T::Wire>(T::OBJECT_TYPE, &query)
                        .await?
                        .into_items();

                    let mut matches = found.into_iter();
                    match (matches.next(), matches.next()) {
                        (None, _) => ReadState::NotFound,
                        (Some(wire), None) => {
                            let model = Self::reconcile(&wire, prior.extattrs(), Some(prior))?;
                            warn!(
                                object_type = T::OBJECT_TYPE,
                                old = prior.reference().unwrap_or_default(),
                                new = model.reference().unwrap_or_default(),
                                "re-adopted object by internal ID"
                            );
                            return Ok(ReadOutcome::Found(model));
                        }
                        (Some(_), Some(_)) => {
                            return Err(CoreError::AmbiguousInternalId {
                                object_type: T::OBJECT_TYPE,
                                internal_id: id,
                                count: 2 + matches.count(),
                            });
                        }
                    }
                }
                ReadState::NotFound => {
                    warn!(
                        object_type = T::OBJECT_TYPE,
                        reference = prior.reference().unwrap_or_default(),
                        "object no longer exists; removing from state"
                    );
                    return Ok(ReadOutcome::Removed);
                }
            };
        }
    }

    // ── Update ───────────────────────────────────────────────────────

    pub async fn update(&self, plan: &T, prior: &T) -> Result<T, CoreError> {
        Self::validate(plan, Some(prior))?;
        let reference = prior.reference().ok_or(CoreError::MissingReference {
            object_type: T::OBJECT_TYPE,
        })?;

        let mut wire = plan.expand(ExpandMode::Update);
        if T::SUPPORTS_EXTATTRS {
            let declared = plan.extattrs().cloned().unwrap_or_default();
            let prior_user = prior.extattrs().cloned().unwrap_or_default();
            let inherited = prior
                .extattrs_all()
                .map(|all| inherited_extattrs(all, &prior_user))
                .unwrap_or_default();

            let mut merged = add_inherited_extattrs(&declared, &inherited);
            if T::TAGS_INTERNAL_ID {
                merged = add_internal_id_to_extattrs(merged);
            }
            wire.set_extattrs(Some(to_wire(&merged)));
        }

        let updated: T::Wire = self
            .client
            .update(reference, &wire, &Self::write_query())
            .await?;
        let model = Self::reconcile(&updated, plan.extattrs(), Some(plan))?;

        info!(
            object_type = T::OBJECT_TYPE,
            reference = model.reference().unwrap_or_default(),
            "updated"
        );
        Ok(model)
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Delete the object; one that is already gone counts as deleted.
    pub async fn delete(&self, prior: &T) -> Result<(), CoreError> {
        let Some(reference) = prior.reference() else {
            debug!(object_type = T::OBJECT_TYPE, "no reference in state, nothing to delete");
            return Ok(());
        };

        match self.client.delete(reference).await {
            Ok(_) => {
                info!(object_type = T::OBJECT_TYPE, reference, "deleted");
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                info!(object_type = T::OBJECT_TYPE, reference, "already deleted");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    // ── Import ───────────────────────────────────────────────────────

    /// Adopt an existing object by reference, tagging it with an internal
    /// ID when this type carries one.
    ///
    /// Attributes set directly on the object become the user-declared set;
    /// inherited ones are left to the appliance.
    pub async fn import(&self, reference: &str) -> Result<T, CoreError> {
        let mut wire: T::Wire = self.client.get(reference, &Self::query()).await?;
        let declared = wire.extattrs().map(locally_set).unwrap_or_default();

        if T::TAGS_INTERNAL_ID && remote_internal_id(&wire).is_none() {
            let tagged = add_internal_id_to_extattrs(declared.clone());
            let mut body = T::Wire::default();
            body.set_extattrs(Some(to_wire(&tagged)));
            wire = self
                .client
                .update(reference, &body, &Self::write_query())
                .await?;
            debug!(object_type = T::OBJECT_TYPE, reference, "tagged imported object");
        }

        let model = Self::reconcile(&wire, Some(&declared), None)?;
        info!(
            object_type = T::OBJECT_TYPE,
            reference = model.reference().unwrap_or(reference),
            "imported"
        );
        Ok(model)
    }

    // ── Plan ─────────────────────────────────────────────────────────

    /// Validate a planned state and fill in server-computed values.
    ///
    /// Unchanged resources keep their prior computed values. Changed ones
    /// keep them only when `suppress_computed_plan` is set; otherwise they
    /// are left unknown until apply.
    pub fn plan(&self, planned: &T, prior: Option<&T>) -> Result<T, CoreError> {
        Self::validate(planned, prior)?;

        let mut next = planned.clone();
        match prior {
            Some(prior) => {
                next.carry_computed(prior);
                if !self.suppress_computed_plan && next != *prior {
                    next.clear_computed();
                }
            }
            None => next.clear_computed(),
        }
        Ok(next)
    }
}

fn remote_internal_id<W: WireObject>(wire: &W) -> Option<&str> {
    wire.extattrs()?.get(INTERNAL_ID_KEY)?.value.as_str()
}
