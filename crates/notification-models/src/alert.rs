use crate::{AlertStatus, CrossNamespaceObjectReference, Error};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ListMeta;
use kube::{CustomResource, Resource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{from_value, json};

/// AlertSpec defines an alerting rule for events involving a list of objects.
#[derive(CustomResource, Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[kube(
    group = "notification.fluxcd.io",
    version = "v1alpha1",
    kind = "Alert",
    plural = "alerts",
    namespaced,
    status = "AlertStatus",
    derive = "PartialEq",
    printcolumn = r#"{"name":"Ready","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].status","description":""}"#,
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.conditions[?(@.type==\"Ready\")].message","description":""}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp","description":""}"#
)]
#[serde(rename_all = "camelCase")]
pub struct AlertSpec {
    /// # Provider which is sent events matched by this Alert.
    /// The provider is looked up by name within the Alert's namespace.
    /// Its `namespace`, `kind`, and `apiVersion` are ignored.
    #[serde(default)]
    pub provider_ref: CrossNamespaceObjectReference,
    /// # Severity of events which are matched, defaulting to 'info'.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[schemars(schema_with = "EventSeverity::schema")]
    pub event_severity: String,
    /// # Objects whose events are matched by this Alert.
    #[serde(default)]
    #[schemars(length(min = 1))]
    pub event_sources: Vec<CrossNamespaceObjectReference>,
}

impl AlertSpec {
    pub fn new(
        provider: impl Into<String>,
        event_sources: impl IntoIterator<Item = CrossNamespaceObjectReference>,
    ) -> Self {
        Self {
            provider_ref: CrossNamespaceObjectReference::new("", provider),
            event_severity: String::new(),
            event_sources: event_sources.into_iter().collect(),
        }
    }

    /// Fill fields which were left empty with their default values.
    /// Applying defaults is idempotent.
    pub fn apply_defaults(&mut self) {
        if self.event_severity.is_empty() {
            self.event_severity = EventSeverity::default().as_str().to_string();
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        crate::validate(self)
    }

    /// Severity of matched events, where an empty severity is its default.
    pub fn severity(&self) -> Result<EventSeverity, Error> {
        if self.event_severity.is_empty() {
            return Ok(EventSeverity::default());
        }
        EventSeverity::from_str(&self.event_severity).ok_or_else(|| Error::InvalidEnumValue {
            field: "spec.eventSeverity".to_string(),
            value: self.event_severity.clone(),
            allowed: EventSeverity::ALLOWED,
        })
    }
}

impl Alert {
    pub fn apply_defaults(&mut self) {
        self.spec.apply_defaults()
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.spec.validate()
    }

    /// Whether the Alert's Ready condition is True.
    pub fn is_ready(&self) -> bool {
        self.status.as_ref().map(AlertStatus::is_ready).unwrap_or(false)
    }

    /// Namespace in which the Alert's provider is expected to live.
    /// This is always the Alert's own namespace, whatever `providerRef.namespace` says.
    pub fn provider_namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }
}

/// Severity of events matched by an Alert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EventSeverity {
    #[default]
    Info,
    Error,
}

impl EventSeverity {
    pub const ALLOWED: &'static [&'static str] = &["info", "error"];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventSeverity::Info => "info",
            EventSeverity::Error => "error",
        }
    }

    pub fn from_str(value: &str) -> Option<EventSeverity> {
        match value {
            "info" => Some(EventSeverity::Info),
            "error" => Some(EventSeverity::Error),
            _ => None,
        }
    }

    fn schema(_: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        from_value(json!({
            "type": "string",
            "enum": EventSeverity::ALLOWED,
            "default": EventSeverity::default().as_str(),
        }))
        .unwrap()
    }
}

impl std::fmt::Display for EventSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// AlertList is an ordered collection of Alerts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertList {
    #[serde(default = "AlertList::default_api_version")]
    pub api_version: String,
    #[serde(default = "AlertList::default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default)]
    pub items: Vec<Alert>,
}

impl AlertList {
    pub fn new(items: impl IntoIterator<Item = Alert>) -> Self {
        Self {
            api_version: Self::default_api_version(),
            kind: Self::default_kind(),
            metadata: ListMeta::default(),
            items: items.into_iter().collect(),
        }
    }

    fn default_api_version() -> String {
        Alert::api_version(&()).into_owned()
    }

    fn default_kind() -> String {
        format!("{}List", Alert::kind(&()))
    }
}

impl IntoIterator for AlertList {
    type Item = Alert;
    type IntoIter = std::vec::IntoIter<Alert>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
