//! CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command-line flags. Each one overrides the matching config file entry.
#[derive(Parser, Debug, Default, Clone)]
#[command(
    name = "sheetboard",
    about = "Terminal dashboard for spreadsheet-based task trackers",
    version,
    after_help = "Examples:\n  \
        sheetboard --workbook board.json              # Local JSON workbook\n  \
        sheetboard --spreadsheet-id 1AbC --credentials credentials.json\n  \
        sheetboard --spreadsheet-id 1AbC --token authorized_user.json\n  \
        sheetboard --config board.config.json --sheet 工作"
)]
pub struct CliArgs {
    #[arg(long, value_name = "FILE", help = "Path to a JSON configuration file")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        conflicts_with = "spreadsheet_id",
        help = "Read a local JSON workbook instead of Google Sheets"
    )]
    pub workbook: Option<PathBuf>,

    #[arg(long, value_name = "ID", help = "Google spreadsheet id")]
    pub spreadsheet_id: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Service account key file (credentials.json) for Google Sheets"
    )]
    pub credentials: Option<PathBuf>,

    #[arg(
        long,
        env = "GCP_SERVICE_ACCOUNT_JSON",
        value_name = "JSON",
        hide_env_values = true,
        help = "Service account key as inline JSON"
    )]
    pub credentials_json: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        help = "OAuth authorized-user token file for Google Sheets"
    )]
    pub token: Option<PathBuf>,

    #[arg(
        long,
        env = "SHEETBOARD_API_KEY",
        value_name = "KEY",
        hide_env_values = true,
        help = "Google API key for publicly shared spreadsheets"
    )]
    pub api_key: Option<String>,

    #[arg(long, value_name = "NAME", help = "Sheet to select on startup")]
    pub sheet: Option<String>,

    #[arg(long, value_name = "DIR", help = "Directory for log files")]
    pub log_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64),
        help = "Refresh every SECS seconds (0 disables)"
    )]
    pub refresh: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workbook_flags() {
        let args = CliArgs::try_parse_from([
            "sheetboard",
            "--workbook",
            "board.json",
            "--sheet",
            "工作",
            "--refresh",
            "15",
        ])
        .unwrap();
        assert_eq!(args.workbook, Some(PathBuf::from("board.json")));
        assert_eq!(args.sheet.as_deref(), Some("工作"));
        assert_eq!(args.refresh, Some(15));
    }

    #[test]
    fn test_parse_service_account_flags() {
        let args = CliArgs::try_parse_from([
            "sheetboard",
            "--spreadsheet-id",
            "abc",
            "--credentials",
            "credentials.json",
        ])
        .unwrap();
        assert_eq!(args.spreadsheet_id.as_deref(), Some("abc"));
        assert_eq!(args.credentials, Some(PathBuf::from("credentials.json")));
    }

    #[test]
    fn test_workbook_conflicts_with_spreadsheet_id() {
        let result = CliArgs::try_parse_from([
            "sheetboard",
            "--workbook",
            "board.json",
            "--spreadsheet-id",
            "abc",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_refresh_rejected() {
        assert!(CliArgs::try_parse_from(["sheetboard", "--refresh", "soon"]).is_err());
    }
}
