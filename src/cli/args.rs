//! Command-line surface, derived with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// ModelScope Quota - query per-model rate limits via probe requests.
#[derive(Parser, Debug)]
#[command(name = "msq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Global flags ===
    /// Output format
    #[arg(long, value_enum, default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// The output format after applying the `--json` shorthand.
    #[must_use]
    pub fn effective_format(&self) -> OutputFormat {
        if self.json { OutputFormat::Json } else { self.format }
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe rate limits for one or more models
    Probe(ProbeArgs),

    /// Run the HTTP query service
    Serve(ServeArgs),
}

/// Arguments for the `probe` command.
#[derive(Parser, Debug)]
pub struct ProbeArgs {
    /// Model IDs to probe (comma-separated or repeated)
    #[arg(long, short = 'm', value_name = "MODEL", value_delimiter = ',', required = true)]
    pub models: Vec<String>,

    /// API key (overrides MSQ_API_KEY and the config file)
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Additional attempts after the first for transient failures
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,
}

/// Arguments for the `serve` command.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Bind host
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Bind port
    #[arg(long, short = 'p', value_name = "PORT")]
    pub port: Option<u16>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Rich terminal panels
    #[default]
    Human,
    /// The wire envelope as JSON
    Json,
    /// Markdown sections, one per model
    Md,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn probe_models_split_on_commas() {
        let cli = Cli::parse_from(["msq", "probe", "--models", "qwen-max,deepseek-v3"]);
        let Some(Commands::Probe(args)) = cli.command else {
            panic!("expected probe command");
        };
        assert_eq!(args.models, vec!["qwen-max", "deepseek-v3"]);
    }

    #[test]
    fn probe_models_can_repeat() {
        let cli = Cli::parse_from(["msq", "probe", "-m", "qwen-max", "-m", "deepseek-v3"]);
        let Some(Commands::Probe(args)) = cli.command else {
            panic!("expected probe command");
        };
        assert_eq!(args.models.len(), 2);
    }

    #[test]
    fn json_shorthand_wins() {
        let cli = Cli::parse_from(["msq", "--json", "probe", "-m", "qwen-max"]);
        assert_eq!(cli.effective_format(), OutputFormat::Json);
    }

    #[test]
    fn serve_accepts_bind_overrides() {
        let cli = Cli::parse_from(["msq", "serve", "--host", "0.0.0.0", "-p", "9000"]);
        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(args.port, Some(9000));
    }
}
