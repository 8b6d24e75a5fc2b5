use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// CrossNamespaceObjectReference contains enough information to locate
/// the typed referenced object at cluster level.
///
/// A reference is an identity and nothing more: it's resolved by looking
/// up the referent at the time it's needed, and never holds the referent itself.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrossNamespaceObjectReference {
    /// # API version of the referent.
    /// When empty, the default version of the referent's API group is used.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    /// # Kind of the referent.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// # Name of the referent.
    #[serde(default)]
    pub name: String,
    /// # Namespace of the referent.
    /// When empty, the referent is in the namespace of the referring object.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl CrossNamespaceObjectReference {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Namespace in which the referent lives, given the namespace of the referring object.
    pub fn namespace_or<'a>(&'a self, referrer_namespace: &'a str) -> &'a str {
        if self.namespace.is_empty() {
            referrer_namespace
        } else {
            &self.namespace
        }
    }

    /// Returns true if the referent lives outside of `referrer_namespace`.
    pub fn is_cross_namespace(&self, referrer_namespace: &str) -> bool {
        self.namespace_or(referrer_namespace) != referrer_namespace
    }

    pub fn example() -> Self {
        Self::new("GitRepository", "podinfo").with_namespace("flux-system")
    }
}

impl std::fmt::Display for CrossNamespaceObjectReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.kind.is_empty() {
            write!(f, "{}/", self.kind)?;
        }
        if !self.namespace.is_empty() {
            write!(f, "{}/", self.namespace)?;
        }
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod test {
    use super::CrossNamespaceObjectReference;
    use serde_json::json;

    #[test]
    fn test_namespace_resolution() {
        let local = CrossNamespaceObjectReference::new("Kustomization", "apps");
        assert_eq!(local.namespace_or("default"), "default");
        assert!(!local.is_cross_namespace("default"));

        let remote = local.clone().with_namespace("flux-system");
        assert_eq!(remote.namespace_or("default"), "flux-system");
        assert!(remote.is_cross_namespace("default"));
        assert!(!remote.is_cross_namespace("flux-system"));
    }

    #[test]
    fn test_display() {
        let table = vec![
            (CrossNamespaceObjectReference::new("GitRepository", "podinfo"), "GitRepository/podinfo"),
            (CrossNamespaceObjectReference::example(), "GitRepository/flux-system/podinfo"),
            (CrossNamespaceObjectReference::new("", "slack"), "slack"),
        ];
        for (reference, expect) in table {
            assert_eq!(reference.to_string(), expect);
        }
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let reference = CrossNamespaceObjectReference::new("HelmRelease", "podinfo");
        insta::assert_json_snapshot!(reference, @r###"
        {
          "kind": "HelmRelease",
          "name": "podinfo"
        }
        "###);

        let parsed: CrossNamespaceObjectReference = serde_json::from_value(json!({
            "apiVersion": "source.toolkit.fluxcd.io/v1beta1",
            "kind": "GitRepository",
            "name": "podinfo",
            "namespace": "flux-system",
            "unknownField": true,
        }))
        .unwrap();

        assert_eq!(
            parsed,
            CrossNamespaceObjectReference::example()
                .with_api_version("source.toolkit.fluxcd.io/v1beta1")
        );
    }
}
