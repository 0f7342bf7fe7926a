// ── Provider ──
//
// Entry point for the plugin layer. Resource and data source calls arrive
// as a type name plus JSON state; they are dispatched to the typed handler
// for that object type and every failure comes back as `Diagnostics`.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use nios_api::WapiClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::data_source::DataSourceHandler;
use crate::diagnostics::Diagnostics;
use crate::error::CoreError;
use crate::handler::{ReadOutcome, ResourceHandler};
use crate::model::{BfdTemplateModel, DtcTopologyModel, ThreatProtectionProfileModel};
use crate::object::ManagedObject;

/// Object types this provider manages, by their resource type name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum ResourceKind {
    #[strum(serialize = "nios_bfd_template")]
    BfdTemplate,
    #[strum(serialize = "nios_threatprotection_profile")]
    ThreatProtectionProfile,
    #[strum(serialize = "nios_dtc_topology")]
    DtcTopology,
}

impl ResourceKind {
    pub fn from_type_name(type_name: &str) -> Result<Self, CoreError> {
        type_name
            .parse()
            .map_err(|_| CoreError::UnknownResourceType {
                type_name: type_name.to_owned(),
            })
    }

    /// The WAPI object type behind this resource.
    pub fn object_type(self) -> &'static str {
        match self {
            Self::BfdTemplate => BfdTemplateModel::OBJECT_TYPE,
            Self::ThreatProtectionProfile => ThreatProtectionProfileModel::OBJECT_TYPE,
            Self::DtcTopology => DtcTopologyModel::OBJECT_TYPE,
        }
    }
}

/// Run `$body` with `$model` bound to the state model for `$kind`.
macro_rules! with_model {
    ($kind:expr, $model:ident => $body:expr) => {
        match $kind {
            ResourceKind::BfdTemplate => {
                type $model = BfdTemplateModel;
                $body
            }
            ResourceKind::ThreatProtectionProfile => {
                type $model = ThreatProtectionProfileModel;
                $body
            }
            ResourceKind::DtcTopology => {
                type $model = DtcTopologyModel;
                $body
            }
        }
    };
}

/// Data source configuration: `filters` match fields, `extattrfilters`
/// match extensible attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSourceQuery {
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    #[serde(default)]
    pub extattrfilters: BTreeMap<String, String>,
}

/// Resolve `fut` unless `cancel` fires first; the pending request is
/// dropped on cancellation.
async fn cancellable<F, R>(cancel: &CancellationToken, fut: F) -> Result<R, Diagnostics>
where
    F: Future<Output = Result<R, CoreError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(CoreError::Cancelled.into()),
        result = fut => result.map_err(Diagnostics::from),
    }
}

/// A configured provider instance.
pub struct Provider {
    client: Arc<WapiClient>,
    config: ProviderConfig,
}

impl Provider {
    pub fn new(config: ProviderConfig) -> Result<Self, Diagnostics> {
        let client = config.connect()?;
        Ok(Self::with_client(config, client))
    }

    /// Use an already-built client (tests, custom transports).
    pub fn with_client(config: ProviderConfig, client: WapiClient) -> Self {
        Self {
            client: Arc::new(client),
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn resource<T: ManagedObject>(&self) -> ResourceHandler<T> {
        ResourceHandler::new(Arc::clone(&self.client), &self.config)
    }

    // ── Typed operations ─────────────────────────────────────────────

    async fn create_as<M: ManagedObject>(&self, plan: Value) -> Result<Value, CoreError> {
        let plan: M = serde_json::from_value(plan)?;
        let created = self.resource::<M>().create(&plan).await?;
        Ok(serde_json::to_value(created)?)
    }

    async fn read_as<M: ManagedObject>(&self, state: Value) -> Result<Option<Value>, CoreError> {
        let prior: M = serde_json::from_value(state)?;
        match self.resource::<M>().read(&prior).await? {
            ReadOutcome::Found(model) => Ok(Some(serde_json::to_value(model)?)),
            ReadOutcome::Removed => Ok(None),
        }
    }

    async fn update_as<M: ManagedObject>(
        &self,
        plan: Value,
        prior: Value,
    ) -> Result<Value, CoreError> {
        let plan: M = serde_json::from_value(plan)?;
        let prior: M = serde_json::from_value(prior)?;
        let updated = self.resource::<M>().update(&plan, &prior).await?;
        Ok(serde_json::to_value(updated)?)
    }

    async fn delete_as<M: ManagedObject>(&self, prior: Value) -> Result<(), CoreError> {
        let prior: M = serde_json::from_value(prior)?;
        self.resource::<M>().delete(&prior).await
    }

    async fn import_as<M: ManagedObject>(&self, reference: &str) -> Result<Value, CoreError> {
        let imported = self.resource::<M>().import(reference).await?;
        Ok(serde_json::to_value(imported)?)
    }

    fn plan_as<M: ManagedObject>(
        &self,
        planned: Value,
        prior: Option<Value>,
    ) -> Result<Value, CoreError> {
        let planned: M = serde_json::from_value(planned)?;
        let prior: Option<M> = prior.map(serde_json::from_value).transpose()?;
        let next = self.resource::<M>().plan(&planned, prior.as_ref())?;
        Ok(serde_json::to_value(next)?)
    }

    async fn search_as<M: ManagedObject>(&self, query: &DataSourceQuery) -> Result<Value, CoreError> {
        let handler = DataSourceHandler::<M>::new(Arc::clone(&self.client), &self.config);
        let found = handler.read(&query.filters, &query.extattrfilters).await?;
        Ok(serde_json::json!({ "result": serde_json::to_value(found)? }))
    }

    // ── Resources ────────────────────────────────────────────────────

    pub async fn create(
        &self,
        type_name: &str,
        plan: Value,
        cancel: &CancellationToken,
    ) -> Result<Value, Diagnostics> {
        let kind = ResourceKind::from_type_name(type_name)?;
        debug!(%kind, "create");
        with_model!(kind, M => cancellable(cancel, self.create_as::<M>(plan)).await)
    }

    /// `Ok(None)` when the object is gone and should leave state.
    pub async fn read(
        &self,
        type_name: &str,
        state: Value,
        cancel: &CancellationToken,
    ) -> Result<Option<Value>, Diagnostics> {
        let kind = ResourceKind::from_type_name(type_name)?;
        debug!(%kind, "read");
        with_model!(kind, M => cancellable(cancel, self.read_as::<M>(state)).await)
    }

    pub async fn update(
        &self,
        type_name: &str,
        plan: Value,
        prior: Value,
        cancel: &CancellationToken,
    ) -> Result<Value, Diagnostics> {
        let kind = ResourceKind::from_type_name(type_name)?;
        debug!(%kind, "update");
        with_model!(kind, M => cancellable(cancel, self.update_as::<M>(plan, prior)).await)
    }

    pub async fn delete(
        &self,
        type_name: &str,
        prior: Value,
        cancel: &CancellationToken,
    ) -> Result<(), Diagnostics> {
        let kind = ResourceKind::from_type_name(type_name)?;
        debug!(%kind, "delete");
        with_model!(kind, M => cancellable(cancel, self.delete_as::<M>(prior)).await)
    }

    /// Import by WAPI reference.
    pub async fn import(
        &self,
        type_name: &str,
        reference: &str,
        cancel: &CancellationToken,
    ) -> Result<Value, Diagnostics> {
        let kind = ResourceKind::from_type_name(type_name)?;
        debug!(%kind, reference, "import");
        with_model!(kind, M => cancellable(cancel, self.import_as::<M>(reference)).await)
    }

    /// Validate a plan and settle its computed values. No remote calls.
    pub fn plan(
        &self,
        type_name: &str,
        planned: Value,
        prior: Option<Value>,
    ) -> Result<Value, Diagnostics> {
        let kind = ResourceKind::from_type_name(type_name)?;
        with_model!(kind, M => self.plan_as::<M>(planned, prior)).map_err(Diagnostics::from)
    }

    // ── Data sources ─────────────────────────────────────────────────

    /// Search by a [`DataSourceQuery`]; results come back as
    /// `{"result": [...]}`.
    pub async fn read_data_source(
        &self,
        type_name: &str,
        query: Value,
        cancel: &CancellationToken,
    ) -> Result<Value, Diagnostics> {
        let kind = ResourceKind::from_type_name(type_name)?;
        let query: DataSourceQuery = serde_json::from_value(query).map_err(CoreError::from)?;
        debug!(%kind, ?query, "data source read");
        with_model!(kind, M => cancellable(cancel, self.search_as::<M>(&query)).await)
    }
}
