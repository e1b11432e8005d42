//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::builder::PossibleValuesParser;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::services::ExportFormat;

use crate::domain::{DIVISIONS, ROLES};

/// Operational budget suggested for new members, in Rupiah.
pub const DEFAULT_AMOUNT: u64 = 5_000_000;

/// Member roster and budget management for Masjid Ashobirin
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// CSV data file (overrides config and ROSTER_DATA_FILE)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Quick statistics: members, budget, average, divisions
    Home,

    /// Members per role and the member list
    Structure,

    /// Budget share and summary per division
    Budget,

    /// Filtered report with optional CSV or spreadsheet export
    Report(ReportArgs),

    /// Show the full member table
    List,

    /// Add a member
    Add(AddArgs),

    /// Edit a member (unspecified fields keep their current value)
    Edit(EditArgs),

    /// Delete a member
    Delete {
        /// Member ID
        id: u64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Division to include (repeatable; default: all present)
    #[arg(long = "division", value_name = "DIVISION")]
    pub divisions: Vec<String>,

    /// Role to include (repeatable; default: all present)
    #[arg(long = "role", value_name = "ROLE")]
    pub roles: Vec<String>,

    /// Write the filtered table to a dated file
    #[arg(long)]
    pub export: bool,

    /// Export file format
    #[arg(long, value_enum, default_value_t = ExportFormatCli::Csv, requires = "export")]
    pub format: ExportFormatCli,

    /// Export directory (default: export_dir from config)
    #[arg(long, requires = "export", value_hint = ValueHint::DirPath)]
    pub export_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormatCli {
    Csv,
    Xlsx,
}

impl From<ExportFormatCli> for ExportFormat {
    fn from(format: ExportFormatCli) -> Self {
        match format {
            ExportFormatCli::Csv => ExportFormat::Csv,
            ExportFormatCli::Xlsx => ExportFormat::Xlsx,
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Full name
    #[arg(long)]
    pub name: String,

    #[arg(long, value_parser = PossibleValuesParser::new(ROLES))]
    pub role: String,

    #[arg(long, value_parser = PossibleValuesParser::new(DIVISIONS))]
    pub division: String,

    /// Salary or operational budget (Rp)
    #[arg(long, default_value_t = DEFAULT_AMOUNT)]
    pub amount: u64,

    #[arg(long, default_value = "")]
    pub phone: String,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Member ID
    pub id: u64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, value_parser = PossibleValuesParser::new(ROLES))]
    pub role: Option<String>,

    #[arg(long, value_parser = PossibleValuesParser::new(DIVISIONS))]
    pub division: Option<String>,

    /// Salary or operational budget (Rp)
    #[arg(long)]
    pub amount: Option<u64>,

    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file location
    Path,
    /// Print a commented config template
    Template,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_args(argv: &[&str]) -> ReportArgs {
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Report(args)) => args,
            other => panic!("expected report command, got {other:?}"),
        }
    }

    #[test]
    fn given_export_without_format_when_parsing_then_csv() {
        let args = report_args(&["roster", "report", "--export"]);
        assert!(args.export);
        assert_eq!(args.format, ExportFormatCli::Csv);
    }

    #[test]
    fn given_xlsx_format_when_parsing_then_maps_to_spreadsheet_export() {
        let args = report_args(&["roster", "report", "--export", "--format", "xlsx"]);
        assert_eq!(ExportFormat::from(args.format), ExportFormat::Xlsx);
    }

    #[test]
    fn given_format_without_export_when_parsing_then_rejected() {
        assert!(Cli::try_parse_from(["roster", "report", "--format", "xlsx"]).is_err());
    }
}
