mod alert;
mod error;
mod references;
pub mod status;
mod validation;

pub use alert::{Alert, AlertList, AlertSpec, EventSeverity};
pub use error::Error;
pub use references::CrossNamespaceObjectReference;
pub use status::{AlertStatus, Condition, ConditionStatus, Conditions};
pub use validation::validate;

/// API group of the notification resources.
pub const GROUP: &str = "notification.fluxcd.io";
/// API version of the notification resources.
pub const VERSION: &str = "v1alpha1";

fn datetime_schema(_: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
    serde_json::from_value(serde_json::json!({
        "type": "string",
        "format": "date-time",
    }))
    .unwrap()
}
