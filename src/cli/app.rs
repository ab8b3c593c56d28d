use super::output;
use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use upgrade_wizard::{
    ExecutionSession, FileCompletionStore, FormValues, HostContext, Invocation, MemorySchema,
    OrchestrationEngine, SchemaBootstrap, UpgradeConfig,
};

#[derive(Parser)]
#[command(name = "upgrade-wizard")]
#[command(about = "Lists and runs the upgrade wizards of an installation")]
pub struct Cli {
    /// Upgrade configuration (JSON)
    #[arg(long, global = true, default_value = "upgrade.json")]
    pub config: PathBuf,

    /// Schema catalog of the installation (JSON, created if missing)
    #[arg(long, global = true, default_value = "catalog.json")]
    pub catalog: PathBuf,

    /// Wizard completion markers (JSON, created if missing)
    #[arg(long, global = true, default_value = "completions.json")]
    pub completions: PathBuf,

    /// Print the result as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the wizards that still need to run
    List,
    /// Show the input form of a wizard
    Input {
        identifier: String,
        #[arg(long = "value", value_name = "FIELD=VALUE")]
        values: Vec<String>,
    },
    /// Run a wizard
    Perform {
        identifier: String,
        #[arg(long = "value", value_name = "FIELD=VALUE")]
        values: Vec<String>,
        /// Report the statements the wizard executed
        #[arg(long)]
        show_queries: bool,
    },
}

pub struct App {
    cli: Cli,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Runs one invocation. Returns `false` when an error status was reported.
    pub fn run(&self) -> Result<bool> {
        let config = UpgradeConfig::from_json_file(&self.cli.config)
            .with_context(|| format!("Failed to load '{}'", self.cli.config.display()))?;

        let schema = Arc::new(
            MemorySchema::open(&self.cli.catalog)
                .with_context(|| format!("Failed to load '{}'", self.cli.catalog.display()))?,
        );
        let completions = Arc::new(FileCompletionStore::new(&self.cli.completions));
        let host = HostContext::new(schema.clone(), completions);

        let registry = config
            .build_registry()
            .context("Failed to configure update wizards")?;
        let mut engine = OrchestrationEngine::from_config(&config, registry, host)?;
        if let Some(required) = config.load_bootstrap_schema()? {
            engine = engine.with_bootstrap(SchemaBootstrap::new(schema.clone(), required));
        }

        let invocation = self.invocation(&config)?;
        let output = ExecutionSession::new(&engine).run(&invocation)?;

        if self.cli.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print!("{}", output::render(&output));
        }
        Ok(!output.has_errors())
    }

    fn invocation(&self, config: &UpgradeConfig) -> Result<Invocation> {
        let invocation = match &self.cli.command {
            Command::List => Invocation::list(),
            Command::Input { identifier, values } => Invocation::get_user_input(identifier)
                .with_values(parse_values(identifier, values)?),
            Command::Perform {
                identifier,
                values,
                show_queries,
            } => Invocation::perform_update(identifier)
                .with_values(parse_values(identifier, values)?)
                .show_database_queries(*show_queries || config.show_database_queries),
        };
        Ok(invocation)
    }
}

fn parse_values(identifier: &str, raw: &[String]) -> Result<FormValues> {
    let mut values = FormValues::new();
    for pair in raw {
        let (field, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid value '{}', expected FIELD=VALUE", pair))?;
        let field = field.trim();
        if field.is_empty() {
            return Err(anyhow!("Invalid value '{}': empty field name", pair));
        }
        values.set_field(identifier, field, value);
    }
    Ok(values)
}
