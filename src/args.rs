use crate::formatter::OutputMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CSS to Tailwind CLI - Converts plain CSS declarations into Tailwind utility classes
#[derive(Parser, Debug)]
#[command(name = "tailwind-converter-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert CSS (from a file or stdin) and print the result as JSON
    Convert(ConvertArgs),
    /// Print the known values of a CSS property as JSON
    Lookup(LookupArgs),
}

/// Arguments for the convert command
#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    /// CSS file to convert
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "CSS file to convert (reads stdin when omitted)"
    )]
    pub input: Option<PathBuf>,

    /// Output shape of the class list
    #[arg(
        short = 'm',
        long = "mode",
        value_enum,
        help = "Output mode; defaults to the configured mode, or `classes`"
    )]
    pub mode: Option<OutputMode>,

    /// Configuration file path (YAML or JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        env = "TAILWIND_CONVERTER_CONFIG",
        help = "Path to configuration file (YAML or JSON format)"
    )]
    pub config: Option<PathBuf>,

    /// Where to write the JSON result
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Write the JSON result to this file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    /// Pretty-print JSON
    #[arg(
        long = "pretty",
        default_value_t = false,
        help = "Pretty-print the JSON result"
    )]
    pub pretty: bool,

    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        default_value_t = false,
        help = "Enable verbose output"
    )]
    pub verbose: bool,
}

/// Arguments for the lookup command
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// CSS property name, e.g. `margin`
    #[arg(value_name = "PROPERTY")]
    pub property: String,

    /// Configuration file path (YAML or JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        env = "TAILWIND_CONVERTER_CONFIG",
        help = "Path to configuration file (YAML or JSON format)"
    )]
    pub config: Option<PathBuf>,
}

impl ConvertArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(input), Some(output)) = (&self.input, &self.output) {
            if input == output {
                return Err("Input and output paths must be different".to_string());
            }
        }

        Ok(())
    }
}
