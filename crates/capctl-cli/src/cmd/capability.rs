use crate::prompt::TerminalPrompter;
use anyhow::Context;
use capctl_core::capability::CapabilityDefinition;
use capctl_core::client::CapabilitiesClient;
use capctl_core::config::Profile;
use capctl_core::format::{
    format_and_write_item, format_and_write_list, format_from_filename, read_input, ListOutput,
    OutputFlags,
};
use capctl_core::output::{sort, ItemNaming};
use capctl_core::validate::validate;
use capctl_core::wizard::run_wizard;
use capctl_core::CapctlError;
use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

/// Fields shown in the default item table for a created capability.
const CAPABILITY_FIELDS: &[&str] = &["name", "id", "version"];

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output as JSON
    #[arg(long, short = 'j')]
    json: bool,

    /// Output as YAML
    #[arg(long, short = 'y')]
    yaml: bool,

    /// Write output to a file instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Indent width for JSON/YAML output
    #[arg(long, value_name = "N")]
    indent: Option<usize>,

    /// Compact table format with no lines between body rows (default)
    #[arg(long, conflicts_with = "expanded")]
    compact: bool,

    /// Expanded table format with a line between body rows
    #[arg(long)]
    expanded: bool,
}

impl OutputArgs {
    fn to_flags(&self) -> OutputFlags {
        OutputFlags {
            json: self.json,
            yaml: self.yaml,
            output: self.output.clone(),
            indent: self.indent,
            compact: self.compact,
            expanded: self.expanded,
        }
    }
}

#[derive(Subcommand)]
pub enum CapabilitySubcommand {
    /// Create a capability, interactively or from a definition file
    Create {
        /// Read the definition from a YAML or JSON file instead of prompting
        #[arg(long, short = 'i', value_name = "PATH")]
        input: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// List capability namespaces available to the account
    Namespaces {
        #[command(flatten)]
        output: OutputArgs,
    },
}

pub fn run(subcmd: CapabilitySubcommand) -> anyhow::Result<()> {
    let profile = Profile::load();
    match subcmd {
        CapabilitySubcommand::Create { input, output } => {
            create(&profile, input.as_deref(), &output)
        }
        CapabilitySubcommand::Namespaces { output } => namespaces(&profile, &output),
    }
}

fn api_client(profile: &Profile) -> anyhow::Result<CapabilitiesClient> {
    let token = profile.api_token().context(
        "no API token: set CAPCTL_TOKEN or add `token` to ~/.config/capctl/config.yaml",
    )?;
    Ok(CapabilitiesClient::new(profile.api_url(), token))
}

fn create(profile: &Profile, input: Option<&Path>, output: &OutputArgs) -> anyhow::Result<()> {
    let (definition, input_format) = match input {
        Some(path) => {
            let definition: CapabilityDefinition = read_input(path).with_context(|| {
                format!("failed to read capability definition from {}", path.display())
            })?;
            (definition, Some(format_from_filename(path)))
        }
        None => {
            let mut prompter = TerminalPrompter::new();
            let definition = run_wizard(&mut prompter).context("capability authoring failed")?;
            (definition, None)
        }
    };

    if !validate(&definition).is_ok() {
        return Err(CapctlError::MissingContent).context("invalid capability definition");
    }

    let client = api_client(profile)?;
    let capability = client.create(&definition).map_err(|e| {
        tracing::error!("capability create failed: {e}");
        e
    })?;

    let flags = output.to_flags();
    format_and_write_item(&flags, profile, &capability, CAPABILITY_FIELDS, input_format)
        .context("failed to write output")?;
    Ok(())
}

fn namespaces(profile: &Profile, output: &OutputArgs) -> anyhow::Result<()> {
    let client = api_client(profile)?;
    let namespaces = client
        .list_namespaces()
        .context("failed to list namespaces")?;
    let namespaces = sort(&namespaces, &["name"]);

    let flags = output.to_flags();
    let config = ListOutput {
        fields: vec![
            "name".to_string(),
            "ownerType".to_string(),
            "ownerId".to_string(),
        ],
        include_index: true,
        naming: ItemNaming::singular("namespace"),
        ..ListOutput::default()
    };
    format_and_write_list(&flags, profile, namespaces, &config).context("failed to write output")
}
