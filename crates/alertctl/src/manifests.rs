use anyhow::Context;
use kube::Resource;
use notification_models::{Alert, AlertList};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// Load all Alerts of the manifest at `path`, where `-` is stdin.
///
/// The manifest must be readable, but each of its documents is decoded
/// independently: a document which isn't a valid Alert or AlertList is
/// returned as an error in its place, and doesn't prevent loading the others.
pub fn load(path: &Path) -> anyhow::Result<Vec<anyhow::Result<Alert>>> {
    let content = if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read manifest from stdin")?;
        content
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?
    };

    let alerts: Vec<_> = parse(&content)
        .into_iter()
        .map(|alert| alert.with_context(|| format!("failed to parse manifest {}", path.display())))
        .collect();
    tracing::debug!(path = %path.display(), alerts = alerts.len(), "loaded manifest");

    Ok(alerts)
}

/// Parse Alerts from YAML or JSON `content`, which may hold multiple documents.
/// AlertList documents contribute each of their items, and a document which
/// cannot be decoded contributes a single error.
pub fn parse(content: &str) -> Vec<anyhow::Result<Alert>> {
    let mut alerts = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        match parse_document(index, document) {
            Ok(parsed) => alerts.extend(parsed.into_iter().map(Ok)),
            Err(err) => alerts.push(Err(err)),
        }
    }

    alerts
}

fn parse_document(
    index: usize,
    document: serde_yaml::Deserializer<'_>,
) -> anyhow::Result<Vec<Alert>> {
    let doc = serde_json::Value::deserialize(document)
        .with_context(|| format!("document {index} is not valid YAML"))?;

    if doc.is_null() {
        return Ok(Vec::new()); // Empty document.
    }
    let kind = doc.get("kind").and_then(|k| k.as_str()).unwrap_or_default();
    let api_version = doc
        .get("apiVersion")
        .and_then(|v| v.as_str())
        .unwrap_or_default();

    if api_version != Alert::api_version(&()) {
        tracing::warn!(
            index,
            api_version,
            expected = %Alert::api_version(&()),
            "document has an unexpected apiVersion"
        );
    }

    match kind {
        "Alert" => Ok(vec![serde_json::from_value::<Alert>(doc)
            .with_context(|| format!("document {index} is not a valid Alert"))?]),
        "AlertList" => Ok(serde_json::from_value::<AlertList>(doc)
            .with_context(|| format!("document {index} is not a valid AlertList"))?
            .items),
        other => anyhow::bail!("document {index} has unsupported kind {other:?}"),
    }
}

/// Name of an Alert for display, qualified by its namespace if it has one.
pub fn display_name(alert: &Alert) -> String {
    let name = alert.metadata.name.as_deref().unwrap_or("<unnamed>");
    match alert.metadata.namespace.as_deref() {
        Some(namespace) => format!("{namespace}/{name}"),
        None => name.to_string(),
    }
}
