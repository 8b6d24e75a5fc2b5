use crate::{AlertSpec, CrossNamespaceObjectReference, Error};

/// Validate an AlertSpec, returning the first constraint it violates.
///
/// Validation doesn't apply defaults: an empty `eventSeverity` is valid,
/// as it's filled by `AlertSpec::apply_defaults`.
pub fn validate(spec: &AlertSpec) -> Result<(), Error> {
    let AlertSpec {
        provider_ref,
        event_severity: _,
        event_sources,
    } = spec;

    spec.severity()?;

    if provider_ref.name.is_empty() {
        return Err(Error::missing("spec.providerRef.name"));
    }
    if event_sources.is_empty() {
        return Err(Error::missing("spec.eventSources"));
    }
    for (index, source) in event_sources.iter().enumerate() {
        walk_event_source(&format!("spec.eventSources[{index}]"), source)?;
    }

    Ok(())
}

fn walk_event_source(scope: &str, source: &CrossNamespaceObjectReference) -> Result<(), Error> {
    if source.kind.is_empty() {
        return Err(Error::missing(format!("{scope}.kind")));
    }
    if source.name.is_empty() {
        return Err(Error::missing(format!("{scope}.name")));
    }
    Ok(())
}
