//! Command-line interface for tslens.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::analyzer::Analyzer;
use crate::config::AnalyzerConfig;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_NO_MATCHES: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Structural analysis of TypeScript codebases.
///
/// tslens parses every TypeScript file under a root with tree-sitter and
/// searches the syntax trees for imports, calls, class declarations or any
/// pattern written in tree-sitter's query language.
#[derive(Parser)]
#[command(name = "tslens")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
pub struct GlobalArgs {
    /// Root directory of the codebase
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = Format::Pretty)]
    pub format: Format,

    /// Skip .tsx files
    #[arg(long, global = true)]
    pub no_tsx: bool,

    /// Also analyze files under node_modules
    #[arg(long, global = true)]
    pub include_node_modules: bool,

    /// Glob pattern of paths to exclude (repeatable)
    #[arg(short = 'x', long = "exclude", global = true)]
    pub exclude: Vec<String>,

    /// Process files in parallel
    #[arg(long, global = true)]
    pub parallel: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Pretty,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find import statements mentioning a name or module
    Imports {
        /// Substring to look for in the import statement
        name: String,
    },
    /// Find calls to a function or method
    Calls {
        /// Function name (matches `name(...)` and `x.name(...)`)
        name: String,

        /// Include the first argument of each call
        #[arg(long)]
        first_arg: bool,
    },
    /// Find class declarations
    Classes {
        /// Only classes with exactly this name
        name: Option<String>,
    },
    /// Run a tree-sitter query
    Query(QueryArgs),
    /// Show construct and line statistics
    Stats {
        /// List line counts per file
        #[arg(long)]
        files: bool,
    },
}

/// Arguments for the query command.
#[derive(Args)]
pub struct QueryArgs {
    /// Query text, e.g. '(class_declaration name: (type_identifier) @name)'
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub pattern: Option<String>,

    /// Read the query from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// One result per match with all of its captures
    #[arg(long)]
    pub grouped: bool,
}

/// Tracing filter directive for a `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Resolve the configuration: file (explicit or discovered), then flags.
pub fn resolve_config(global: &GlobalArgs) -> anyhow::Result<AnalyzerConfig> {
    let mut config = match &global.config {
        Some(path) => AnalyzerConfig::from_file(path)?,
        None => match AnalyzerConfig::discover(&global.root)? {
            Some((path, config)) => {
                tracing::info!("using config {}", path.display());
                config
            }
            None => AnalyzerConfig::default(),
        },
    };

    if global.no_tsx {
        config.include_tsx = false;
    }
    if global.include_node_modules {
        config.exclude_node_modules = false;
    }
    if global.parallel {
        config.parallel = true;
    }
    config.excluded_paths.extend(global.exclude.iter().cloned());

    Ok(config)
}

/// Run a command.
pub fn run(cli: &Cli) -> anyhow::Result<i32> {
    let config = resolve_config(&cli.global)?;
    let analyzer = Analyzer::with_config(&cli.global.root, config)?;
    let root = analyzer.root().to_path_buf();

    let (title, result) = match &cli.command {
        Commands::Imports { name } => (format!("imports of {:?}", name), analyzer.find_imports(name)),
        Commands::Calls { name, first_arg } => (
            format!("calls to {:?}", name),
            analyzer.find_function_calls(name, *first_arg),
        ),
        Commands::Classes { name } => (
            match name {
                Some(n) => format!("class {:?}", n),
                None => "all classes".to_string(),
            },
            analyzer.find_class_definitions(name.as_deref()),
        ),
        Commands::Query(args) => {
            let text = match (&args.pattern, &args.file) {
                (Some(pattern), _) => pattern.clone(),
                (None, Some(file)) => std::fs::read_to_string(file)?,
                (None, None) => anyhow::bail!("no query given"),
            };
            let result = if args.grouped {
                analyzer.custom_query_grouped(&text)
            } else {
                analyzer.custom_query(&text)
            };
            (format!("query {}", text.trim()), result)
        }
        Commands::Stats { files } => {
            let stats = analyzer.generate_stats();
            match cli.global.format {
                Format::Json => report::write_json(&stats)?,
                Format::Pretty => report::write_pretty_stats(&root, &stats, *files),
            }
            return Ok(EXIT_SUCCESS);
        }
    };

    match cli.global.format {
        Format::Json => report::write_json(&result)?,
        Format::Pretty => report::write_pretty_report(&root, &title, &result),
    }

    if result.is_empty() {
        Ok(EXIT_NO_MATCHES)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_calls() {
        let cli = Cli::parse_from(["tslens", "calls", "fetch", "--first-arg", "-r", "app", "-f", "json"]);
        assert_eq!(cli.global.root, PathBuf::from("app"));
        assert_eq!(cli.global.format, Format::Json);
        match cli.command {
            Commands::Calls { name, first_arg } => {
                assert_eq!(name, "fetch");
                assert!(first_arg);
            }
            _ => panic!("expected calls command"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("tslens.yaml"),
            "excluded_paths: [\"**/gen/**\"]\n",
        )
        .unwrap();

        let root = temp.path().to_string_lossy().to_string();
        let cli = Cli::parse_from(["tslens", "stats", "--root", &root, "--no-tsx", "-x", "**/*.d.ts"]);
        let config = resolve_config(&cli.global).unwrap();

        assert!(!config.include_tsx);
        assert!(config.exclude_node_modules);
        assert_eq!(config.excluded_paths, vec!["**/gen/**", "**/*.d.ts"]);
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(2), "debug");
        assert_eq!(log_level(9), "trace");
    }
}
