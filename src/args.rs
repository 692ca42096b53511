//! Command-line argument parsing and processing.
//!
//! This module handles parsing of command-line arguments and provides a clean
//! interface for the main application logic. It supports the standard help,
//! version, and debug flags while gracefully handling unknown options.
//!
//! duskr takes one or more positional labels naming the lamps or lamp groups
//! it should manage; everything else about device addressing lives behind the
//! device adapter.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the scheduler over the devices matching these labels
    Run {
        debug_enabled: bool,
        labels: Vec<String>,
    },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to missing labels or unknown arguments and exit non-zero
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse the process arguments.
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }

    /// Parse command-line arguments into a structured result.
    ///
    /// Flags may appear anywhere; every non-flag argument is taken as a device
    /// or group label. Running with no labels is an operator error, so it maps
    /// to `ShowHelpDueToError` rather than a silent no-op run.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut debug_enabled = false;
        let mut labels: Vec<String> = Vec::new();

        for arg in args.into_iter().skip(1) {
            match arg.as_ref() {
                "--help" | "-h" => return ParsedArgs { action: CliAction::ShowHelp },
                "--version" | "-V" => return ParsedArgs { action: CliAction::ShowVersion },
                "--debug" | "-d" => debug_enabled = true,
                other if other.starts_with('-') => {
                    return ParsedArgs {
                        action: CliAction::ShowHelpDueToError,
                    };
                }
                label => labels.push(label.to_string()),
            }
        }

        if labels.is_empty() {
            return ParsedArgs {
                action: CliAction::ShowHelpDueToError,
            };
        }

        ParsedArgs {
            action: CliAction::Run {
                debug_enabled,
                labels,
            },
        }
    }
}

/// Display version information.
pub fn display_version_info() {
    println!("duskr {}", env!("CARGO_PKG_VERSION"));
}

/// Display help information.
pub fn display_help() {
    println!("duskr v{} ━━╸", env!("CARGO_PKG_VERSION"));
    println!("Sunset-synced evening scheduler for networked smart lamps");
    println!();
    println!("Usage: duskr [OPTIONS] <LABEL>...");
    println!();
    println!("Arguments:");
    println!("  <LABEL>...       Names of the lamps and/or lamp groups to manage");
    println!();
    println!("Options:");
    println!("  -d, --debug      Enable detailed debug output");
    println!("  -h, --help       Print help");
    println!("  -V, --version    Print version");
    println!();
    println!("Example:");
    println!("  duskr \"Living Room\" \"Desk Lamp\"");
}
