//! Dashboard configuration
//!
//! Settings are layered: command-line flags win over the JSON config file,
//! which wins over the built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::CliArgs;

pub const DEFAULT_TITLE: &str = "Project Progress Board";
pub const DEFAULT_OVERVIEW_HEADING: &str = "Overview";
pub const DEFAULT_STATUS_COLUMN: &str = "狀態";
pub const DEFAULT_DONE_VALUE: &str = "已完成";
pub const DEFAULT_DISPLAY_COLUMNS: &[&str] = &["任務細項", "截止日", "狀態"];

const CONFIG_DIR_NAME: &str = "sheetboard";
const CONFIG_FILE_NAME: &str = "config.json";

/// Ways to authenticate against Google Sheets.
///
/// A service account key wins over an authorized-user token, which wins over
/// an API key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GoogleCredentials {
    /// Service account key file (`credentials.json`)
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
    /// Service account key as inline JSON
    #[serde(default)]
    pub credentials_json: Option<String>,
    #[serde(default)]
    pub token_path: Option<PathBuf>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl GoogleCredentials {
    /// Fill every field not given here from `fallback`
    fn or(self, fallback: GoogleCredentials) -> Self {
        Self {
            credentials_path: self.credentials_path.or(fallback.credentials_path),
            credentials_json: self.credentials_json.or(fallback.credentials_json),
            token_path: self.token_path.or(fallback.token_path),
            api_key: self.api_key.or(fallback.api_key),
        }
    }
}

/// Where the workbook lives
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    Google {
        spreadsheet_id: String,
        #[serde(flatten)]
        credentials: GoogleCredentials,
    },
    File {
        path: PathBuf,
    },
}

impl SourceConfig {
    /// Override Google credentials; file sources ignore them
    fn with_credentials(self, overrides: GoogleCredentials) -> Self {
        match self {
            SourceConfig::Google {
                spreadsheet_id,
                credentials,
            } => SourceConfig::Google {
                spreadsheet_id,
                credentials: overrides.or(credentials),
            },
            file => file,
        }
    }

    fn resolve_relative(self, base: &Path) -> Self {
        let resolve = |path: PathBuf| {
            if path.is_absolute() {
                path
            } else {
                base.join(path)
            }
        };
        match self {
            SourceConfig::File { path } => SourceConfig::File {
                path: resolve(path),
            },
            SourceConfig::Google {
                spreadsheet_id,
                credentials,
            } => SourceConfig::Google {
                spreadsheet_id,
                credentials: GoogleCredentials {
                    credentials_path: credentials.credentials_path.map(resolve),
                    token_path: credentials.token_path.map(resolve),
                    ..credentials
                },
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub title: String,
    /// Optional line shown under the title
    pub greeting: Option<String>,
    pub overview_heading: String,
    pub status_column: String,
    pub done_value: String,
    pub display_columns: Vec<String>,
    pub source: SourceConfig,
    pub auto_refresh: Option<Duration>,
    /// Sheet to select on startup
    pub initial_sheet: Option<String>,
    pub log_dir: PathBuf,
}

impl BoardConfig {
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let CliArgs {
            config,
            workbook: cli_workbook,
            spreadsheet_id: cli_spreadsheet_id,
            credentials: cli_credentials,
            credentials_json: cli_credentials_json,
            token: cli_token,
            api_key: cli_api_key,
            sheet: cli_sheet,
            log_dir: cli_log_dir,
            refresh: cli_refresh,
        } = args;

        let config_path = config.or_else(default_config_path);
        let file_config = match config_path.as_ref() {
            Some(path) => load_config_file(path)?,
            None => PartialConfig::default(),
        };

        let PartialConfig {
            title,
            greeting,
            overview_heading,
            status_column,
            done_value,
            display_columns,
            source: file_source,
            auto_refresh_secs,
            initial_sheet,
            log_dir,
        } = file_config;

        let source = match (cli_workbook, cli_spreadsheet_id) {
            (Some(path), _) => SourceConfig::File { path },
            (None, Some(spreadsheet_id)) => SourceConfig::Google {
                spreadsheet_id,
                credentials: GoogleCredentials::default(),
            },
            (None, None) => file_source.context(
                "no workbook configured: pass --workbook or --spreadsheet-id, \
                 or set \"source\" in the config file",
            )?,
        }
        .with_credentials(GoogleCredentials {
            credentials_path: cli_credentials,
            credentials_json: cli_credentials_json,
            token_path: cli_token,
            api_key: cli_api_key,
        });

        let refresh_secs = cli_refresh.or(auto_refresh_secs).filter(|secs| *secs > 0);

        let config = Self {
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            greeting,
            overview_heading: overview_heading
                .unwrap_or_else(|| DEFAULT_OVERVIEW_HEADING.to_string()),
            status_column: status_column.unwrap_or_else(|| DEFAULT_STATUS_COLUMN.to_string()),
            done_value: done_value.unwrap_or_else(|| DEFAULT_DONE_VALUE.to_string()),
            display_columns: display_columns.unwrap_or_else(|| {
                DEFAULT_DISPLAY_COLUMNS
                    .iter()
                    .map(|column| (*column).to_string())
                    .collect()
            }),
            source,
            auto_refresh: refresh_secs.map(Duration::from_secs),
            initial_sheet: cli_sheet.or(initial_sheet),
            log_dir: cli_log_dir.or(log_dir).unwrap_or_else(default_log_dir),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.status_column.trim().is_empty(),
            "status column name must not be empty"
        );
        anyhow::ensure!(!self.done_value.is_empty(), "done value must not be empty");
        anyhow::ensure!(
            !self.display_columns.is_empty(),
            "at least one display column must be configured"
        );
        anyhow::ensure!(
            self.display_columns.iter().all(|c| !c.trim().is_empty()),
            "display column names must not be empty"
        );
        if let SourceConfig::Google { spreadsheet_id, .. } = &self.source {
            anyhow::ensure!(
                !spreadsheet_id.trim().is_empty(),
                "spreadsheet id must not be empty"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    title: Option<String>,
    greeting: Option<String>,
    overview_heading: Option<String>,
    status_column: Option<String>,
    done_value: Option<String>,
    display_columns: Option<Vec<String>>,
    source: Option<SourceConfig>,
    auto_refresh_secs: Option<u64>,
    initial_sheet: Option<String>,
    log_dir: Option<PathBuf>,
}

/// `<config dir>/sheetboard/config.json`, if it exists
fn default_config_path() -> Option<PathBuf> {
    let path = dirs::config_dir()?
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME);
    path.exists().then_some(path)
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME).join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn load_config_file(path: &Path) -> Result<PartialConfig> {
    if !path.exists() {
        anyhow::bail!("config file {:?} does not exist", path);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let mut parsed: PartialConfig = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse JSON config {:?}", path))?;

    // Paths inside the file are relative to the file itself
    if let Some(base) = path.parent() {
        parsed.source = parsed.source.map(|source| source.resolve_relative(base));
        parsed.log_dir = parsed.log_dir.map(|dir| {
            if dir.is_absolute() {
                dir
            } else {
                base.join(dir)
            }
        });
    }
    Ok(parsed)
}
