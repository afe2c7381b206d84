//! Output format resolution and the format-and-write entry points used by
//! every command: flags beat file extension beats input-format hint beats
//! the common table format.

use crate::config::Profile;
use crate::error::Result;
use crate::output::{
    item_table_formatter, json_formatter, list_table_formatter, write_output, yaml_formatter,
    ItemNaming, OutputFormatter,
};
use crate::table::TableGenerator;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// IoFormat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoFormat {
    Json,
    Yaml,
    /// Human-readable table rendering.
    Common,
}

/// Infer a machine format from a filename extension. Unknown extensions
/// default to JSON.
pub fn format_from_filename(filename: &Path) -> IoFormat {
    match filename
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("yaml") | Some("yml") => IoFormat::Yaml,
        _ => IoFormat::Json,
    }
}

/// Parse a YAML or JSON file into a `T`, keyed on the extension.
pub fn read_input<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    match format_from_filename(path) {
        IoFormat::Json => Ok(serde_json::from_str(&text)?),
        _ => Ok(serde_yaml::from_str(&text)?),
    }
}

// ---------------------------------------------------------------------------
// OutputFlags
// ---------------------------------------------------------------------------

/// Resolved output flags of one command invocation.
#[derive(Debug, Clone, Default)]
pub struct OutputFlags {
    pub json: bool,
    pub yaml: bool,
    pub output: Option<PathBuf>,
    pub indent: Option<usize>,
    pub compact: bool,
    pub expanded: bool,
}

// ---------------------------------------------------------------------------
// Formatter resolution
// ---------------------------------------------------------------------------

const DEFAULT_JSON_INDENT: usize = 4;
const DEFAULT_YAML_INDENT: usize = 2;

/// Pick the output formatter for a command invocation.
///
/// Resolution order, first match wins: explicit `--json`; explicit
/// `--yaml`; `--output` filename extension; the input-format hint; common.
/// Common uses the supplied table formatter when there is one and falls
/// back to YAML otherwise. Indent comes from the flags, then the profile,
/// then the per-format default.
pub fn build_output_formatter<T: Serialize + 'static>(
    flags: &OutputFlags,
    profile: &Profile,
    input_format: Option<IoFormat>,
    common_formatter: Option<OutputFormatter<T>>,
) -> OutputFormatter<T> {
    let mut format = IoFormat::Common;
    if flags.json {
        format = IoFormat::Json;
    } else if flags.yaml {
        format = IoFormat::Yaml;
    } else if let Some(output) = &flags.output {
        format = format_from_filename(output);
    } else if let Some(hint) = input_format {
        format = hint;
    }

    if format == IoFormat::Common {
        if let Some(formatter) = common_formatter {
            return formatter;
        }
    }

    let indent = flags.indent.or(profile.indent);
    match format {
        IoFormat::Json => json_formatter(indent.unwrap_or(DEFAULT_JSON_INDENT)),
        _ => yaml_formatter(indent.unwrap_or(DEFAULT_YAML_INDENT)),
    }
}

// ---------------------------------------------------------------------------
// Format-and-write entry points
// ---------------------------------------------------------------------------

/// Format a single record and write it to the flag-selected destination.
pub fn format_and_write_item<T: Serialize + 'static>(
    flags: &OutputFlags,
    profile: &Profile,
    item: &T,
    fields: &[&str],
    input_format: Option<IoFormat>,
) -> Result<()> {
    let generator = TableGenerator::new(flags.expanded);
    let common = item_table_formatter(
        generator,
        fields.iter().map(|f| f.to_string()).collect(),
    );
    let formatter = build_output_formatter(flags, profile, input_format, Some(common));
    write_output(&formatter(item)?, flags.output.as_deref())
}

/// Per-command description of how list output should look.
#[derive(Debug, Clone, Default)]
pub struct ListOutput {
    /// Explicit field list; empty means fall back to the sort/primary key
    /// pair, then to every field of the first record.
    pub fields: Vec<String>,
    pub sort_key: Option<String>,
    pub primary_key: Option<String>,
    pub include_index: bool,
    pub naming: ItemNaming,
}

impl ListOutput {
    fn resolve_fields(&self, first: Option<&Value>) -> Vec<String> {
        if !self.fields.is_empty() {
            return self.fields.clone();
        }
        if let (Some(sort_key), Some(primary_key)) = (&self.sort_key, &self.primary_key) {
            return vec![sort_key.clone(), primary_key.clone()];
        }
        match first.and_then(Value::as_object) {
            Some(object) => object.keys().cloned().collect(),
            None => Vec::new(),
        }
    }
}

/// Format a sequence of records and write it to the flag-selected
/// destination.
pub fn format_and_write_list<T: Serialize + 'static>(
    flags: &OutputFlags,
    profile: &Profile,
    items: Vec<T>,
    config: &ListOutput,
) -> Result<()> {
    let first = items.first().map(serde_json::to_value).transpose()?;
    let fields = config.resolve_fields(first.as_ref());
    let generator = TableGenerator::new(flags.expanded);
    let common = list_table_formatter(
        generator,
        fields,
        config.include_index,
        config.naming.clone(),
    );
    let formatter = build_output_formatter(flags, profile, None, Some(common));
    write_output(&formatter(&items)?, flags.output.as_deref())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
