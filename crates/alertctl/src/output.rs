use chrono::{DateTime, Utc};
use notification_models::Alert;
use serde::Serialize;
use std::io::{self, Write};

#[derive(clap::Args, Clone, Debug, Default)]
pub struct Output {
    /// How to format CLI output
    #[clap(global = true, short, long, value_enum, env = "ALERTCTL_OUTPUT")]
    pub output: Option<OutputType>,
}

impl Output {
    /// Output type to use, where `tty_default` is used if no type
    /// was requested and stdout is a terminal.
    pub fn resolve(&self, tty_default: OutputType) -> OutputType {
        use crossterm::tty::IsTty;

        if let Some(ty) = self.output {
            ty
        } else if io::stdout().is_tty() {
            tty_default
        } else {
            OutputType::Yaml
        }
    }
}

#[derive(clap::ValueEnum, Debug, Copy, Clone, PartialEq)]
pub enum OutputType {
    /// Format output as compact JSON with items separated by newlines
    Json,
    /// Format output as YAML
    Yaml,
    /// Format the output as a pretty-printed table
    Table,
}

/// A trait for things that can be output from the CLI as either JSON, YAML, or a table.
pub trait CliOutput: Serialize {
    /// Additional context used to render a table row.
    type TableAlt: Copy;

    /// Returns the column headers of the table.
    fn table_headers() -> Vec<&'static str>;

    /// Converts this item into a tabular representation. The returned cells must be in the
    /// same order as the `table_headers`.
    fn into_table_row(self, alt: Self::TableAlt) -> Vec<String>;
}

// Alert rows carry the printer columns of the Alert kind,
// and are rendered relative to the current time.
impl CliOutput for Alert {
    type TableAlt = DateTime<Utc>;

    fn table_headers() -> Vec<&'static str> {
        vec!["Namespace", "Name", "Ready", "Status", "Age"]
    }

    fn into_table_row(self, now: DateTime<Utc>) -> Vec<String> {
        let (ready, status) = match &self.status {
            Some(status) => (
                status.ready_column().to_string(),
                status.status_column().to_string(),
            ),
            None => (String::new(), String::new()),
        };
        let created = self.metadata.creation_timestamp.as_ref().map(|ts| ts.0);

        vec![
            self.metadata.namespace.unwrap_or_default(),
            self.metadata.name.unwrap_or_default(),
            ready,
            status,
            age(created, now),
        ]
    }
}

pub fn write_all<T: CliOutput>(
    output_type: OutputType,
    alt: T::TableAlt,
    items: impl IntoIterator<Item = T>,
) -> anyhow::Result<()> {
    match output_type {
        OutputType::Json => print_json(items),
        OutputType::Yaml => print_yaml(items),
        OutputType::Table => print_table(alt, items),
    }
}

pub fn print_yaml(items: impl IntoIterator<Item = impl CliOutput>) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    for item in items {
        serde_yaml::to_writer(&mut stdout, &item)?;
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

pub fn print_json(items: impl IntoIterator<Item = impl CliOutput>) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    for item in items {
        serde_json::to_writer(&mut stdout, &item)?;
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

pub fn print_table<T: CliOutput>(
    alt: T::TableAlt,
    items: impl IntoIterator<Item = T>,
) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    let mut table = new_table(T::table_headers());

    for item in items {
        table.add_row(item.into_table_row(alt));
    }

    for line in table.lines() {
        stdout.write_all(line.as_bytes())?;
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

fn new_table(headers: Vec<&str>) -> comfy_table::Table {
    let mut table = comfy_table::Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .apply_modifier(comfy_table::modifiers::UTF8_SOLID_INNER_BORDERS);

    table.set_header(headers);
    table
}

/// Age of an object created at `created`, in a single coarse unit
/// such as "90s", "15m", "36h", or "4d".
pub fn age(created: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(created) = created else {
        return "<unknown>".to_string();
    };
    let seconds = (now - created).num_seconds().max(0);

    if seconds < 120 {
        format!("{seconds}s")
    } else if seconds < 120 * 60 {
        format!("{}m", seconds / 60)
    } else if seconds < 48 * 60 * 60 {
        format!("{}h", seconds / (60 * 60))
    } else {
        format!("{}d", seconds / (24 * 60 * 60))
    }
}
