use anyhow::Context;
use kube::CustomResourceExt;
use notification_models::Alert;
use std::io::Write;
use std::path::PathBuf;

mod manifests;
mod output;

use output::{Output, OutputType};

/// A command-line tool for working with Alert manifests.
///
/// Manifests are read from local YAML or JSON files, which may hold
/// multiple documents. Use `-` to read from stdin.
#[derive(Debug, clap::Parser)]
#[clap(author, about, version)]
pub struct Cli {
    #[clap(subcommand)]
    cmd: Command,

    #[clap(flatten)]
    output: Output,
}

#[derive(Debug, clap::Subcommand)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Print the CustomResourceDefinition of the Alert kind.
    Crd,
    /// Apply defaults to Alerts and validate them.
    ///
    /// Each invalid Alert is reported along with the field at fault,
    /// as is each document which isn't a decodable Alert.
    /// The command fails if any Alert is invalid.
    Check(Manifests),
    /// List Alerts along with their readiness.
    Get(Manifests),
    /// Print Alerts with default values filled in.
    Default(Manifests),
}

#[derive(Debug, clap::Args)]
pub struct Manifests {
    /// Manifest files to read, or `-` for stdin.
    #[clap(required = true)]
    files: Vec<PathBuf>,
}

impl Manifests {
    /// Load Alerts of every manifest, keeping documents which failed to decode.
    fn load_documents(&self) -> anyhow::Result<Vec<anyhow::Result<Alert>>> {
        let mut alerts = Vec::new();
        for path in &self.files {
            alerts.extend(manifests::load(path)?);
        }
        Ok(alerts)
    }

    /// Load Alerts of every manifest, failing on the first document which didn't decode.
    fn load(&self) -> anyhow::Result<Vec<Alert>> {
        self.load_documents()?.into_iter().collect()
    }
}

impl Cli {
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Crd => {
                let crd = serde_yaml::to_string(&Alert::crd())
                    .context("failed to serialize CustomResourceDefinition")?;
                std::io::stdout().lock().write_all(crd.as_bytes())?;
                Ok(())
            }
            Command::Check(manifests) => check(manifests.load_documents()?),
            Command::Get(manifests) => {
                let now = chrono::Utc::now();
                let output_type = self.output.resolve(OutputType::Table);
                output::write_all(output_type, now, manifests.load()?)
            }
            Command::Default(manifests) => {
                let mut alerts = manifests.load()?;
                alerts.iter_mut().for_each(Alert::apply_defaults);

                let output_type = match self.output.resolve(OutputType::Yaml) {
                    OutputType::Table => OutputType::Yaml,
                    other => other,
                };
                output::write_all(output_type, chrono::Utc::now(), alerts)
            }
        }
    }
}

fn check(alerts: Vec<anyhow::Result<Alert>>) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    let total = alerts.len();
    let mut failed = 0;

    for alert in alerts {
        let mut alert = match alert {
            Ok(alert) => alert,
            Err(err) => {
                writeln!(stdout, "{err:#}")?;
                failed += 1;
                continue;
            }
        };
        alert.apply_defaults();

        if !alert.spec.provider_ref.namespace.is_empty() {
            tracing::warn!(
                alert = %manifests::display_name(&alert),
                namespace = %alert.spec.provider_ref.namespace,
                "providerRef.namespace is ignored; the provider is looked up in the Alert's namespace"
            );
        }

        match alert.validate() {
            Ok(()) => writeln!(stdout, "{}: valid", manifests::display_name(&alert))?,
            Err(err) => {
                tracing::debug!(name = ?alert.metadata.name, field = ?err.field(), "alert is invalid");
                writeln!(stdout, "{}: {err}", manifests::display_name(&alert))?;
                failed += 1;
            }
        }
    }

    if failed != 0 {
        anyhow::bail!("{failed} of {total} alerts are invalid");
    }
    Ok(())
}
