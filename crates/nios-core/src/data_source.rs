// ── Data sources ──
//
// Read-only search over one object type. Results are paged through
// `list_all` and flattened with the same mapping as the resources.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use nios_api::{QueryParams, WapiClient};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::diagnostics::Diagnostics;
use crate::error::CoreError;
use crate::extattrs::{INTERNAL_ID_KEY, from_wire};
use crate::object::{ManagedObject, WireObject};

/// Search for objects of type `T` by field and extattr filters.
pub struct DataSourceHandler<T> {
    client: Arc<WapiClient>,
    page_size: u32,
    _object: PhantomData<fn() -> T>,
}

impl<T: ManagedObject> DataSourceHandler<T> {
    pub fn new(client: Arc<WapiClient>, config: &ProviderConfig) -> Self {
        Self {
            client,
            page_size: config.page_size,
            _object: PhantomData,
        }
    }

    /// Every object matching all `filters` (`field=value`) and
    /// `extattr_filters` (`*Name=value`).
    ///
    /// Each result's `extattrs` holds the remote attributes minus the
    /// internal-ID tag; `extattrs_all` holds all of them.
    pub async fn read(
        &self,
        filters: &BTreeMap<String, String>,
        extattr_filters: &BTreeMap<String, String>,
    ) -> Result<Vec<T>, CoreError> {
        let mut query = QueryParams::new().return_fields_plus(T::RETURN_FIELDS.iter().copied());
        for (field, value) in filters {
            query = query.filter(field.as_str(), value.as_str());
        }
        for (name, value) in extattr_filters {
            query = query.extattr_filter(name.as_str(), value.as_str());
        }

        let found: Vec<T::Wire> = self
            .client
            .list_all(T::OBJECT_TYPE, &query, self.page_size)
            .await?;
        debug!(object_type = T::OBJECT_TYPE, count = found.len(), "data source read");

        let mut diags = Diagnostics::new();
        let models = found
            .iter()
            .map(|wire| {
                let mut model = T::flatten(wire, None, &mut diags);
                if T::SUPPORTS_EXTATTRS {
                    let all = wire.extattrs().map(from_wire).unwrap_or_default();
                    let mut visible = all.clone();
                    visible.remove(INTERNAL_ID_KEY);
                    model.set_extattrs(visible, all);
                }
                model
            })
            .collect();
        diags.into_result()?;
        Ok(models)
    }
}
