use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "component-audit")]
#[command(version)]
#[command(
    about = "Deterministic design-token classification and AI-assisted audits for UI components",
    long_about = None
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze components exported as scene JSON, one after another
    Analyze {
        /// Scene files; each holds one node or an array of nodes
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Model id (overrides the configured model)
        #[arg(short, long)]
        model: Option<String>,

        /// Skip the knowledge service and use built-in guidance
        #[arg(long)]
        offline: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Classify design tokens without calling any service
    Tokens {
        /// Scene file
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Compare observed states and properties with a family's best practices
    Gaps {
        /// Component family (button, toast, data table, ...)
        family: String,

        /// Observed states, comma separated
        #[arg(long, value_delimiter = ',')]
        states: Vec<String>,

        /// Observed properties, comma separated
        #[arg(long, value_delimiter = ',')]
        props: Vec<String>,

        /// Documented accessibility notes, comma separated
        #[arg(long, value_delimiter = ',')]
        accessibility: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Probe the knowledge service and show which guidance would be used
    Knowledge {
        /// Skip the knowledge service
        #[arg(long)]
        offline: bool,
    },
    /// Initialize configuration
    Init,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
    /// Markdown formatted output
    Markdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_gaps_lists_split_on_commas() {
        let cli = Cli::parse_from([
            "component-audit",
            "gaps",
            "button",
            "--states",
            "hover,focus",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Gaps {
                family,
                states,
                props,
                format,
                ..
            } => {
                assert_eq!(family, "button");
                assert_eq!(states, vec!["hover", "focus"]);
                assert!(props.is_empty());
                assert_eq!(format, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_analyze_requires_files() {
        assert!(Cli::try_parse_from(["component-audit", "analyze"]).is_err());
        let cli = Cli::parse_from(["component-audit", "-v", "analyze", "a.json", "--offline"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Analyze { offline: true, .. }));
    }
}
