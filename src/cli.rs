use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

mod terminal;

use clap::ArgAction;
use lumen::{
    audit::audit,
    batch::{Orchestrator, Target, TreeProvider},
    checks::CheckRegistry,
    domain::{Config, ElementNode},
    report, AuditResult,
};
use terminal::Colorize;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file
    #[arg(short, long, default_value = "lumen.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(&self.config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Audit a single element-tree snapshot
    Audit(Audit),

    /// Audit a batch of named snapshots from a manifest
    Batch(Batch),

    /// List the installed automated checks
    Checks,

    /// Show or modify configuration settings
    Config(ConfigCmd),
}

impl Command {
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self {
            Self::Audit(command) => command.run(config_path)?,
            Self::Batch(command) => command.run(config_path)?,
            Self::Checks => Checks::run(config_path)?,
            Self::Config(command) => command.run(config_path)?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

/// Load the configuration, falling back to defaults when the file is absent.
fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        Config::load(path).map_err(|e| anyhow::anyhow!("{e}"))
    } else {
        Ok(Config::default())
    }
}

/// Read and deserialize an element-tree snapshot from a JSON file.
fn load_snapshot(path: &Path) -> anyhow::Result<ElementNode> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read snapshot {}: {e}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse snapshot {}: {e}", path.display()))
}

#[derive(Debug, clap::Parser)]
pub struct Audit {
    /// Path to the JSON element-tree snapshot
    snapshot: PathBuf,

    /// Target name for the report (defaults to the snapshot file stem)
    #[clap(long, short)]
    name: Option<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress output (exit code still reports compliance)
    #[arg(long, short)]
    quiet: bool,
}

impl Audit {
    #[instrument(skip(config_path))]
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let config = load_config(config_path)?;
        let registry = CheckRegistry::with_defaults(&config);

        let name = self.name.clone().unwrap_or_else(|| {
            self.snapshot
                .file_stem()
                .map_or_else(|| "snapshot".to_string(), |s| s.to_string_lossy().into_owned())
        });

        let tree = load_snapshot(&self.snapshot)?;
        let result = audit(&name, &tree, &registry);

        if !self.quiet {
            match self.output {
                OutputFormat::Table => Self::output_table(&result),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Summary => println!(
                    "score={} level={} compliant={}",
                    result.score,
                    result.compliance_level,
                    result.is_compliant()
                ),
            }
        }

        if !result.is_compliant() {
            std::process::exit(2);
        }
        Ok(())
    }

    fn output_table(result: &AuditResult) {
        print!("{}", report::format_result(result));
        println!();
        if result.is_compliant() {
            println!(
                "{}",
                format!("✅ {} is compliant (score {})", result.target_name, result.score)
                    .success()
            );
        } else {
            let verdict = format!(
                "⚠️  {} is not compliant (score {})",
                result.target_name, result.score
            );
            // Hard failures are colored distinctly from near misses.
            if report::Band::from_score(result.score) == report::Band::Fail {
                println!("{}", verdict.danger());
            } else {
                println!("{}", verdict.warning());
            }
            println!(
                "{}",
                "Address the next steps above and re-run the audit".dim()
            );
        }
    }
}

#[derive(Debug, clap::Parser)]
pub struct Batch {
    /// Path to a JSON manifest mapping target names to snapshot files
    manifest: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress output (exit code still reports compliance)
    #[arg(long, short)]
    quiet: bool,
}

impl Batch {
    #[instrument(skip(config_path))]
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let config = load_config(config_path)?;

        let content = std::fs::read_to_string(&self.manifest).map_err(|e| {
            anyhow::anyhow!("Failed to read manifest {}: {e}", self.manifest.display())
        })?;
        let manifest: BTreeMap<String, PathBuf> = serde_json::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse manifest {}: {e}", self.manifest.display())
        })?;

        // Snapshot files are resolved relative to the manifest.
        let base = self
            .manifest
            .parent()
            .map_or_else(PathBuf::new, Path::to_path_buf);

        let targets: Vec<Target> = manifest
            .into_iter()
            .map(|(name, path)| {
                let path = base.join(path);
                let provider: Box<dyn TreeProvider> = Box::new(move || {
                    load_snapshot(&path)
                        .map_err(|e| lumen::ProviderError::Failed(e.to_string()))
                });
                (name, provider)
            })
            .collect();

        let summary = Orchestrator::new(&config).run(&targets)?;

        if !self.quiet {
            match self.output {
                OutputFormat::Table => {
                    if terminal::is_narrow() {
                        for result in &summary.targets {
                            println!(
                                "{} {}/100 {}",
                                result.target_name, result.score, result.compliance_level
                            );
                        }
                    } else {
                        print!("{}", report::format_summary(&summary));
                    }
                    println!();
                    if summary.non_compliant_targets == 0 {
                        println!(
                            "{}",
                            format!("✅ All {} targets are compliant", summary.total_targets)
                                .success()
                        );
                    } else {
                        println!(
                            "{}",
                            format!(
                                "⚠️  {} of {} targets are not compliant",
                                summary.non_compliant_targets, summary.total_targets
                            )
                            .warning()
                        );
                        println!(
                            "{}",
                            "Run 'lumen audit <snapshot>' on a failing target for details".dim()
                        );
                    }
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Summary => println!(
                    "targets={} compliant={} rate={}%",
                    summary.total_targets,
                    summary.compliant_targets,
                    summary.overall_compliance_rate
                ),
            }
        }

        if summary.non_compliant_targets > 0 {
            std::process::exit(2);
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Checks {}

impl Checks {
    #[instrument(skip(config_path))]
    fn run(config_path: &Path) -> anyhow::Result<()> {
        let config = load_config(config_path)?;
        let registry = CheckRegistry::with_defaults(&config);

        println!("Installed checks ({}):", registry.len());
        for id in registry.ids() {
            println!("  • {id}");
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct ConfigCmd {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key to set
        key: String,

        /// Value to set
        value: String,
    },
}

impl ConfigCmd {
    #[instrument(skip(config_path))]
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self.command {
            ConfigCommand::Show => {
                let config = load_config(config_path)?;

                println!("Configuration:");
                println!(
                    "  workers: {}",
                    config
                        .workers()
                        .map_or_else(|| "auto".to_string(), |n| n.to_string())
                );
                if config.extra_generic_phrases().is_empty() {
                    println!("  extra_generic_phrases: (none)");
                } else {
                    println!("  extra_generic_phrases:");
                    for phrase in config.extra_generic_phrases() {
                        println!("    • {phrase}");
                    }
                }
            }
            ConfigCommand::Set { key, value } => {
                let mut config = load_config(config_path)?;

                match key.as_str() {
                    "workers" => {
                        let workers = value
                            .parse::<usize>()
                            .map_err(|_| anyhow::anyhow!("Value must be a number (0 = auto)"))?;
                        config.set_workers(workers);
                        config
                            .save(config_path)
                            .map_err(|e| anyhow::anyhow!("{e}"))?;
                        println!("{}", format!("workers: {workers}").success());
                    }
                    "generic-phrase" => {
                        if config.add_generic_phrase(&value) {
                            config
                                .save(config_path)
                                .map_err(|e| anyhow::anyhow!("{e}"))?;
                            println!("{}", format!("Added phrase '{value}'").success());
                        } else {
                            println!("No changes: phrase already present.");
                        }
                    }
                    _ => {
                        return Err(anyhow::anyhow!(
                            "Unknown configuration key: '{key}'\nSupported keys: workers, \
                             generic-phrase",
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}
