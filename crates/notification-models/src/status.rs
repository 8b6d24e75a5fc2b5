use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{from_value, json};

/// Type of the condition which summarizes whether an object is reconciled.
pub const READY: &str = "Ready";

/// AlertStatus is the observed state of an Alert, as reported by its controller.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertStatus {
    /// # Conditions of the Alert.
    /// At most one condition is present for each condition type.
    #[serde(default, skip_serializing_if = "Conditions::is_empty")]
    pub conditions: Conditions,
}

impl AlertStatus {
    /// Set the condition of `type_`, replacing any current condition of that type.
    pub fn set_condition(
        &mut self,
        type_: impl Into<String>,
        status: ConditionStatus,
        reason: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.conditions
            .set(Condition::new(type_, status, reason, message, now));
    }

    pub fn condition(&self, type_: &str) -> Option<&Condition> {
        self.conditions.get(type_)
    }

    pub fn remove_condition(&mut self, type_: &str) -> Option<Condition> {
        self.conditions.remove(type_)
    }

    pub fn mark_ready(
        &mut self,
        reason: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.set_condition(READY, ConditionStatus::True, reason, message, now)
    }

    pub fn mark_not_ready(
        &mut self,
        reason: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.set_condition(READY, ConditionStatus::False, reason, message, now)
    }

    /// An Alert is ready only if its Ready condition is present and True.
    pub fn is_ready(&self) -> bool {
        matches!(
            self.condition(READY),
            Some(Condition {
                status: ConditionStatus::True,
                ..
            })
        )
    }

    /// Value of the "Ready" printer column.
    pub fn ready_column(&self) -> &str {
        self.condition(READY)
            .map(|c| c.status.as_str())
            .unwrap_or_default()
    }

    /// Value of the "Status" printer column.
    pub fn status_column(&self) -> &str {
        self.condition(READY)
            .map(|c| c.message.as_str())
            .unwrap_or_default()
    }
}

/// Status of a condition.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl ConditionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        }
    }
}

impl From<bool> for ConditionStatus {
    fn from(value: bool) -> Self {
        if value {
            ConditionStatus::True
        } else {
            ConditionStatus::False
        }
    }
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition is an observation of one aspect of an object's current state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// # Type of the condition, such as "Ready".
    #[serde(rename = "type")]
    pub type_: String,
    /// # Status of the condition.
    pub status: ConditionStatus,
    /// # Last time the condition's status changed.
    /// Conditions written without a transition time decode as `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(schema_with = "crate::datetime_schema")]
    pub last_transition_time: Option<DateTime<Utc>>,
    /// # Machine-readable reason for the condition's last transition.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    /// # Human-readable details of the condition.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// # Object generation which the condition was set against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

impl Condition {
    pub fn new(
        type_: impl Into<String>,
        status: ConditionStatus,
        reason: impl Into<String>,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            type_: type_.into(),
            status,
            last_transition_time: Some(now),
            reason: reason.into(),
            message: message.into(),
            observed_generation: None,
        }
    }

    pub fn with_observed_generation(mut self, generation: i64) -> Self {
        self.observed_generation = Some(generation);
        self
    }
}

/// Conditions is an ordered set of Condition, keyed on condition type.
///
/// Order is insertion order of each condition type. A set condition replaces
/// the present condition of its type at that position, or is appended if
/// the type isn't present.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Conditions(Vec<Condition>);

impl Conditions {
    /// Set `condition`, replacing a present condition of the same type.
    ///
    /// The last transition time of a replaced condition is retained
    /// if its status is unchanged.
    pub fn set(&mut self, mut condition: Condition) {
        match self.0.iter_mut().find(|c| c.type_ == condition.type_) {
            Some(current) => {
                if current.status == condition.status {
                    condition.last_transition_time = current
                        .last_transition_time
                        .or(condition.last_transition_time);
                }
                *current = condition;
            }
            None => self.0.push(condition),
        }
    }

    pub fn get(&self, type_: &str) -> Option<&Condition> {
        self.0.iter().find(|c| c.type_ == type_)
    }

    pub fn remove(&mut self, type_: &str) -> Option<Condition> {
        let index = self.0.iter().position(|c| c.type_ == type_)?;
        Some(self.0.remove(index))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // Later conditions of a type overwrite earlier ones, without
    // the transition time bookkeeping of `set`.
    fn insert(&mut self, condition: Condition) {
        match self.0.iter_mut().find(|c| c.type_ == condition.type_) {
            Some(current) => *current = condition,
            None => self.0.push(condition),
        }
    }
}

impl std::ops::Deref for Conditions {
    type Target = [Condition];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Conditions {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Condition> for Conditions {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        let mut conditions = Conditions::default();
        for condition in iter {
            conditions.insert(condition);
        }
        conditions
    }
}

impl<'de> Deserialize<'de> for Conditions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let conditions = Vec::<Condition>::deserialize(deserializer)?;
        Ok(conditions.into_iter().collect())
    }
}

impl JsonSchema for Conditions {
    fn schema_name() -> String {
        String::from("Conditions")
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        let items = gen.subschema_for::<Condition>();

        from_value(json!({
            "type": "array",
            "items": items,
            "x-kubernetes-list-type": "map",
            "x-kubernetes-list-map-keys": ["type"],
        }))
        .unwrap()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn ts(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 30, 9, minute, 0).unwrap()
    }

    fn types(status: &AlertStatus) -> Vec<&str> {
        status.conditions.iter().map(|c| c.type_.as_str()).collect()
    }

    #[test]
    fn test_set_condition_replaces_in_place() {
        let mut status = AlertStatus::default();
        status.set_condition("Reconciling", ConditionStatus::True, "Progressing", "", ts(0));
        status.mark_not_ready("ProviderNotFound", "provider 'slack' not found", ts(1));
        status.set_condition("Stalled", ConditionStatus::False, "", "", ts(2));

        status.mark_ready("Succeeded", "Initialized", ts(3));
        status.mark_ready("Succeeded", "Still initialized", ts(4));

        assert_eq!(types(&status), vec!["Reconciling", READY, "Stalled"]);
        assert_eq!(
            status.condition(READY),
            Some(&Condition::new(
                READY,
                ConditionStatus::True,
                "Succeeded",
                "Still initialized",
                ts(3),
            ))
        );
        assert!(status.is_ready());
        assert_eq!(status.ready_column(), "True");
        assert_eq!(status.status_column(), "Still initialized");
    }

    #[test]
    fn test_transition_time_tracks_status_changes() {
        let mut status = AlertStatus::default();

        status.mark_not_ready("ProviderNotFound", "first", ts(0));
        status.mark_not_ready("ProviderNotFound", "second", ts(1));
        assert_eq!(status.condition(READY).unwrap().last_transition_time, Some(ts(0)));

        status.mark_ready("Succeeded", "Initialized", ts(2));
        assert_eq!(status.condition(READY).unwrap().last_transition_time, Some(ts(2)));

        status.set_condition(READY, ConditionStatus::Unknown, "", "", ts(3));
        assert_eq!(status.condition(READY).unwrap().last_transition_time, Some(ts(3)));
        assert!(!status.is_ready());
    }

    #[test]
    fn test_missing_ready_condition() {
        let mut status = AlertStatus::default();
        assert!(!status.is_ready());
        assert_eq!(status.ready_column(), "");
        assert_eq!(status.status_column(), "");

        status.mark_ready("Succeeded", "Initialized", ts(0));
        assert!(status.remove_condition(READY).is_some());
        assert!(status.remove_condition(READY).is_none());
        assert!(!status.is_ready());
        assert!(status.conditions.is_empty());
    }

    #[test]
    fn test_duplicate_conditions_are_collapsed_on_decode() {
        let status: AlertStatus = serde_json::from_value(json!({
            "conditions": [
                {"type": "Ready", "status": "False", "lastTransitionTime": "2024-05-30T09:00:00Z", "message": "old"},
                {"type": "Reconciling", "status": "True", "lastTransitionTime": "2024-05-30T09:01:00Z"},
                {"type": "Ready", "status": "True", "lastTransitionTime": "2024-05-30T09:02:00Z", "message": "new"},
            ]
        }))
        .unwrap();

        assert_eq!(types(&status), vec![READY, "Reconciling"]);
        assert_eq!(status.status_column(), "new");
        assert_eq!(status.condition(READY).unwrap().last_transition_time, Some(ts(2)));
    }

    #[test]
    fn test_condition_without_transition_time() {
        let mut status: AlertStatus = serde_json::from_value(json!({
            "conditions": [
                {"type": "Ready", "status": "True", "message": "Initialized"},
            ]
        }))
        .unwrap();

        assert!(status.is_ready());
        assert_eq!(status.status_column(), "Initialized");
        assert_eq!(status.condition(READY).unwrap().last_transition_time, None);
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({"conditions": [{"type": "Ready", "status": "True", "message": "Initialized"}]})
        );

        // An unchanged status adopts the time of the update, as none is known.
        status.mark_ready("Succeeded", "Initialized", ts(5));
        assert_eq!(status.condition(READY).unwrap().last_transition_time, Some(ts(5)));
    }

    #[test]
    fn test_status_serialization() {
        let mut status = AlertStatus::default();
        assert_eq!(serde_json::to_value(&status).unwrap(), json!({}));

        status.mark_not_ready("ProviderNotFound", "provider 'slack' not found", ts(10));
        status.conditions.set(
            Condition::new("Reconciling", ConditionStatus::True, "", "", ts(11))
                .with_observed_generation(3),
        );

        insta::assert_json_snapshot!(status, @r###"
        {
          "conditions": [
            {
              "type": "Ready",
              "status": "False",
              "lastTransitionTime": "2024-05-30T09:10:00Z",
              "reason": "ProviderNotFound",
              "message": "provider 'slack' not found"
            },
            {
              "type": "Reconciling",
              "status": "True",
              "lastTransitionTime": "2024-05-30T09:11:00Z",
              "observedGeneration": 3
            }
          ]
        }
        "###);

        let round_trip: AlertStatus =
            serde_json::from_str(&serde_json::to_string(&status).unwrap()).unwrap();
        assert_eq!(round_trip, status);
    }

    #[test]
    fn test_conditions_schema_is_keyed_by_type() {
        let settings = schemars::gen::SchemaSettings::openapi3().with(|s| {
            s.inline_subschemas = true;
        });
        let generator = schemars::gen::SchemaGenerator::new(settings);
        let schema = generator.into_root_schema_for::<AlertStatus>();
        let schema = serde_json::to_value(&schema).unwrap();
        let conditions = &schema["properties"]["conditions"];

        assert_eq!(conditions["x-kubernetes-list-type"], json!("map"));
        assert_eq!(conditions["x-kubernetes-list-map-keys"], json!(["type"]));
        assert_eq!(
            conditions["items"]["properties"]["status"]["enum"],
            json!(["True", "False", "Unknown"])
        );
        assert_eq!(conditions["items"]["required"], json!(["status", "type"]));
    }
}
