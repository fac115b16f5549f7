mod commands;
mod exit_code;
mod progress;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::CommandContext;
use exit_code::ExitCode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "graphql-util")]
#[command(about = "Run saved GraphQL operations against configured endpoints", long_about = None)]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Path to graphql-util config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Target name (for multi-target configs)
    #[arg(short, long, value_name = "NAME", global = true)]
    target: Option<String>,

    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except results and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Suppress progress indicators (spinners)
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show progress indicators (spinners)
    pub show_progress: bool,
    /// Whether to show informational output (success messages, summaries)
    pub show_info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the target schema, fetching it by introspection if it is not cached
    Schema {
        /// Fetch the schema again and overwrite the cached artifact
        #[arg(long)]
        refresh: bool,

        /// Print the schema as SDL instead of a summary
        #[arg(long)]
        sdl: bool,
    },

    /// List the operations registered from the target's query files
    Operations,

    /// Execute a registered operation and print the JSON result
    ///
    /// Exits with 1 when the server answers with GraphQL errors and with 2
    /// when no GraphQL response could be obtained.
    Run {
        /// Operation name, in callable (`getuser`) or constant (`GETUSER`) form
        name: String,

        /// Variables as a JSON object
        #[arg(long, value_name = "JSON")]
        variables: Option<String>,

        /// Extra request header in "Name: Value" format (repeatable)
        #[arg(short = 'H', long = "header", value_name = "HEADER")]
        headers: Vec<String>,

        /// Request timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// List the enums of the target schema with their values
    Enums,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    let ctx = CommandContext {
        config: cli.config,
        target: cli.target,
        output: OutputOptions {
            show_progress: !cli.quiet && !cli.no_progress,
            show_info: !cli.quiet,
        },
    };

    let result = match cli.command {
        Commands::Schema { refresh, sdl } => commands::schema::run(&ctx, refresh, sdl),
        Commands::Operations => commands::operations::run(&ctx),
        Commands::Run {
            name,
            variables,
            headers,
            timeout,
        } => commands::run::run(&ctx, &name, variables.as_deref(), &headers, timeout),
        Commands::Enums => commands::enums::run(&ctx),
    };

    match result {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::for_error(&e).into()
        }
    }
}

/// Initialize tracing on stderr, filtered by `RUST_LOG`
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Configure colored output based on flags and environment variables.
///
/// Priority order (highest to lowest):
/// 1. `--color` flag (force colors on)
/// 2. `--no-color` flag (force colors off)
/// 3. `NO_COLOR` environment variable (if set to any value, disable colors)
/// 4. `CLICOLOR_FORCE` environment variable (if set to non-zero, force colors)
/// 5. `CLICOLOR` environment variable (if set to "0", disable colors)
/// 6. Default: colors enabled if stdout is a TTY (handled by `colored` crate)
///
/// See: <https://no-color.org/> and <https://bixense.com/clicolors/>
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    if force_color {
        control::set_override(true);
    } else if no_color || std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if let Ok(val) = std::env::var("CLICOLOR_FORCE") {
        if !val.is_empty() && val != "0" {
            control::set_override(true);
        }
    } else if std::env::var("CLICOLOR").is_ok_and(|val| val == "0") {
        control::set_override(false);
    }
}


#[cfg(test)]
mod color_tests {
    use super::configure_colors;
    use colored::control::{self, SHOULD_COLORIZE};
    use std::sync::Mutex;

    // Env vars and the color override are process-global.
    static TEST_MUTEX: Mutex<()> = Mutex::new(());

    fn with_clean_env<F: FnOnce()>(f: F) {
        let _lock = TEST_MUTEX.lock().unwrap();

        let saved = ["NO_COLOR", "CLICOLOR", "CLICOLOR_FORCE"].map(|var| (var, std::env::var_os(var)));
        for (var, _) in &saved {
            std::env::remove_var(var);
        }
        control::unset_override();

        f();

        control::unset_override();
        for (var, value) in saved {
            if let Some(value) = value {
                std::env::set_var(var, value);
            }
        }
    }

    #[test]
    fn color_flag_wins_over_no_color_env() {
        with_clean_env(|| {
            std::env::set_var("NO_COLOR", "1");
            configure_colors(true, false);
            assert!(SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn no_color_flag_disables_colors() {
        with_clean_env(|| {
            configure_colors(false, true);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn empty_no_color_env_still_disables_colors() {
        with_clean_env(|| {
            std::env::set_var("NO_COLOR", "");
            configure_colors(false, false);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn clicolor_force_enables_colors() {
        with_clean_env(|| {
            std::env::set_var("CLICOLOR_FORCE", "1");
            configure_colors(false, false);
            assert!(SHOULD_COLORIZE.should_colorize());
        });
    }

    #[test]
    fn clicolor_zero_disables_colors() {
        with_clean_env(|| {
            std::env::set_var("CLICOLOR", "0");
            configure_colors(false, false);
            assert!(!SHOULD_COLORIZE.should_colorize());
        });
    }
}
