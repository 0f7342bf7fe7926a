// nios-core: Resource handlers and extattr reconciliation between nios-api
// and the provider plugin layer.

pub mod config;
mod convert;
pub mod data_source;
pub mod diagnostics;
pub mod error;
pub mod extattrs;
pub mod handler;
pub mod logging;
pub mod model;
pub mod object;
pub mod provider;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ProviderConfig, TlsVerification};
pub use data_source::DataSourceHandler;
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::CoreError;
pub use extattrs::{ExtAttrMap, INTERNAL_ID_KEY};
pub use handler::{ReadOutcome, ResourceHandler};
pub use logging::{LogFormat, init_logging, try_init_logging};
pub use object::{ExpandMode, ManagedObject, WireObject};
pub use provider::{DataSourceQuery, Provider, ResourceKind};

pub use model::{
    BfdAuthenticationType, BfdTemplateModel, DtcTopologyModel, DtcTopologyRuleModel,
    DtcTopologyRuleSourceModel, ThreatProtectionProfileModel,
};
