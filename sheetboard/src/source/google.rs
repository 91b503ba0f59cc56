//! Google Sheets backend
//!
//! Reads one spreadsheet through the Sheets v4 REST API with a blocking
//! `reqwest` client. Three ways to authenticate:
//! - a service account key (`credentials.json`, or the same JSON inline),
//!   exchanged for access tokens through a signed RS256 JWT-bearer grant
//! - an OAuth authorized-user token file (`token`, `refresh_token`,
//!   `client_id`, `client_secret`, `token_uri`, `expiry`), refreshed in memory
//!   when it expires
//! - an API key, for spreadsheets shared publicly
//!
//! The first row of every worksheet is its header, like `get_all_records`.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::SheetSource;
use crate::config::GoogleCredentials;
use crate::error::SourceError;
use crate::models::{records_from_values, Row};

pub const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Read-only access is all the dashboard needs
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Google rejects assertions valid for more than an hour
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Key file picked up from the working directory when nothing else is configured
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GoogleApiError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Token expired or revoked")]
    AuthExpired,
    #[error("Token not found at {0}")]
    TokenNotFound(PathBuf),
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("No credentials: set a service account key, a token file or an API key")]
    NoCredentials,
    #[error("Invalid service account key: {0}")]
    InvalidCredentials(String),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Token
// ============================================================================

/// OAuth2 authorized-user token, as written by the Python google-auth library.
/// Both `token` and `access_token` are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleToken {
    #[serde(alias = "access_token", default)]
    pub token: String,
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Expiry time (RFC 3339)
    #[serde(default)]
    pub expiry: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl GoogleToken {
    pub fn load(path: &Path) -> Result<Self, GoogleApiError> {
        if !path.exists() {
            return Err(GoogleApiError::TokenNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Whether the token needs a refresh before use.
///
/// Tokens without a parseable expiry, or expiring within a minute, count as expired.
pub fn is_token_expired(token: &GoogleToken) -> bool {
    if token.token.is_empty() {
        return true;
    }
    match &token.expiry {
        None => true,
        Some(expiry) => match chrono::DateTime::parse_from_rfc3339(expiry) {
            Ok(expiry) => expiry <= chrono::Utc::now() + chrono::Duration::seconds(60),
            Err(_) => true,
        },
    }
}

/// POST a grant to the token endpoint; returns the access token and its RFC 3339 expiry
fn request_token(
    client: &Client,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<(String, String), GoogleApiError> {
    let resp = client.post(token_uri).form(form).send()?;
    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    if !status.is_success() {
        return Err(map_refresh_error(status.as_u16(), &body));
    }

    let body: Value = serde_json::from_str(&body)?;
    let access_token = body["access_token"]
        .as_str()
        .ok_or_else(|| GoogleApiError::RefreshFailed("No access_token in response".into()))?;
    let expires_in = body["expires_in"].as_u64().unwrap_or(3600);
    let expiry = chrono::Utc::now() + chrono::Duration::seconds(expires_in as i64);
    Ok((access_token.to_string(), expiry.to_rfc3339()))
}

fn refresh_access_token(client: &Client, token: &GoogleToken) -> Result<GoogleToken, GoogleApiError> {
    let refresh_token = token
        .refresh_token
        .as_deref()
        .ok_or(GoogleApiError::AuthExpired)?;

    let mut form = vec![
        ("client_id", token.client_id.as_str()),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];
    if let Some(secret) = token.client_secret.as_deref() {
        form.push(("client_secret", secret));
    }

    let (access_token, expiry) = request_token(client, &token.token_uri, &form)?;
    let mut refreshed = token.clone();
    refreshed.token = access_token;
    refreshed.expiry = Some(expiry);
    Ok(refreshed)
}

fn map_refresh_error(status: u16, body: &str) -> GoogleApiError {
    let lowered = body.to_lowercase();
    if (status == 400 || status == 401)
        && (lowered.contains("invalid_grant") || lowered.contains("token has been expired"))
    {
        return GoogleApiError::AuthExpired;
    }
    GoogleApiError::RefreshFailed(format!("HTTP {}: {}", status, body))
}

// ============================================================================
// Service account
// ============================================================================

/// Service account key as downloaded from the Cloud console
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, GoogleApiError> {
        let key: Self = serde_json::from_str(json)?;
        match key.key_type.as_deref() {
            None | Some("service_account") => Ok(key),
            Some(other) => Err(GoogleApiError::InvalidCredentials(format!(
                "expected a service_account key, got \"{}\"",
                other
            ))),
        }
    }

    pub fn load(path: &Path) -> Result<Self, GoogleApiError> {
        if !path.exists() {
            return Err(GoogleApiError::TokenNotFound(path.to_path_buf()));
        }
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Empty token slot that is filled on first use
    fn unissued_token(&self) -> GoogleToken {
        GoogleToken {
            token: String::new(),
            refresh_token: None,
            token_uri: self.token_uri.clone(),
            client_id: self.client_email.clone(),
            client_secret: None,
            expiry: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Sign the RS256 JWT asserting the service account identity, issued at `now`
fn sign_assertion(key: &ServiceAccountKey, now: i64) -> Result<String, GoogleApiError> {
    let claims = AssertionClaims {
        iss: key.client_email.clone(),
        scope: SHEETS_SCOPE.to_string(),
        aud: key.token_uri.clone(),
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };
    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| GoogleApiError::InvalidCredentials(e.to_string()))?;
    jsonwebtoken::encode(&header, &claims, &signing_key)
        .map_err(|e| GoogleApiError::InvalidCredentials(e.to_string()))
}

fn exchange_assertion(client: &Client, key: &ServiceAccountKey) -> Result<GoogleToken, GoogleApiError> {
    let assertion = sign_assertion(key, chrono::Utc::now().timestamp())?;
    let form = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];
    let (access_token, expiry) = request_token(client, &key.token_uri, &form)?;

    let mut token = key.unissued_token();
    token.token = access_token;
    token.expiry = Some(expiry);
    Ok(token)
}

// ============================================================================
// API responses
// ============================================================================

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Pull the human message out of a Google error body, falling back to the raw text
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// A1 range covering a whole sheet: the quoted sheet name
pub fn quote_sheet_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "''"))
}

// ============================================================================
// Client
// ============================================================================

enum GoogleAuth {
    ServiceAccount {
        key: ServiceAccountKey,
        token: Mutex<GoogleToken>,
    },
    Token(Mutex<GoogleToken>),
    ApiKey(String),
}

impl GoogleAuth {
    /// Pick the strongest configured credential. Without any, a
    /// `credentials.json` in the working directory is used if present.
    fn from_credentials(credentials: &GoogleCredentials) -> Result<Self, GoogleApiError> {
        let service_account = match (&credentials.credentials_json, &credentials.credentials_path) {
            (Some(json), _) => Some(ServiceAccountKey::from_json(json)?),
            (None, Some(path)) => Some(ServiceAccountKey::load(path)?),
            (None, None) => None,
        };
        if let Some(key) = service_account {
            let token = Mutex::new(key.unissued_token());
            return Ok(GoogleAuth::ServiceAccount { key, token });
        }

        if let Some(path) = &credentials.token_path {
            return Ok(GoogleAuth::Token(Mutex::new(GoogleToken::load(path)?)));
        }
        if let Some(key) = &credentials.api_key {
            return Ok(GoogleAuth::ApiKey(key.clone()));
        }

        let fallback = Path::new(DEFAULT_CREDENTIALS_FILE);
        if fallback.exists() {
            info!(path = %fallback.display(), "using service account key from working directory");
            let key = ServiceAccountKey::load(fallback)?;
            let token = Mutex::new(key.unissued_token());
            return Ok(GoogleAuth::ServiceAccount { key, token });
        }
        Err(GoogleApiError::NoCredentials)
    }
}

/// One Google spreadsheet
pub struct GoogleSheets {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    auth: GoogleAuth,
}

impl GoogleSheets {
    /// Prepare a client. No request is made until the first call; a missing
    /// or unreadable key or token file is a connection error.
    pub fn connect(
        spreadsheet_id: &str,
        credentials: &GoogleCredentials,
    ) -> Result<Self, SourceError> {
        let auth = GoogleAuth::from_credentials(credentials).map_err(connection_error)?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| connection_error(e.into()))?;

        Ok(Self {
            client,
            base_url: SHEETS_API.to_string(),
            spreadsheet_id: spreadsheet_id.to_string(),
            auth,
        })
    }

    fn spreadsheet_url(&self) -> Result<Url, GoogleApiError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| GoogleApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GoogleApiError::InvalidUrl(self.base_url.clone()))?
            .push(&self.spreadsheet_id);
        Ok(url)
    }

    fn values_url(&self, sheet: &str) -> Result<Url, GoogleApiError> {
        let mut url = self.spreadsheet_url()?;
        url.path_segments_mut()
            .map_err(|_| GoogleApiError::InvalidUrl(self.base_url.clone()))?
            .push("values")
            .push(&quote_sheet_name(sheet));
        Ok(url)
    }

    /// Cached access token, renewed through `renew` once it has expired.
    /// The lock is held across the token POST; passes run one at a time so
    /// nothing else waits on it.
    fn access_token(
        &self,
        slot: &Mutex<GoogleToken>,
        renew: impl FnOnce(&GoogleToken) -> Result<GoogleToken, GoogleApiError>,
    ) -> Result<String, GoogleApiError> {
        let mut token = slot
            .lock()
            .map_err(|_| GoogleApiError::RefreshFailed("token lock poisoned".into()))?;
        if is_token_expired(&token) {
            *token = renew(&token)?;
        }
        Ok(token.token.clone())
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, GoogleApiError> {
        Ok(match &self.auth {
            GoogleAuth::ServiceAccount { key, token } => {
                let access = self.access_token(token, |_| {
                    info!(account = %key.client_email, "requesting service account access token");
                    exchange_assertion(&self.client, key)
                })?;
                request.bearer_auth(access)
            }
            GoogleAuth::Token(slot) => {
                let access = self.access_token(slot, |token| {
                    info!("refreshing Google access token");
                    refresh_access_token(&self.client, token)
                })?;
                request.bearer_auth(access)
            }
            GoogleAuth::ApiKey(key) => request.query(&[("key", key.as_str())]),
        })
    }

    fn get(&self, url: Url, query: &[(&str, &str)]) -> Result<Response, GoogleApiError> {
        let request = self.authorize(self.client.get(url).query(query))?;
        let resp = request.send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(GoogleApiError::ApiError {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }
        Ok(resp)
    }

    fn sheet_titles(&self) -> Result<Vec<String>, GoogleApiError> {
        let resp = self.get(
            self.spreadsheet_url()?,
            &[("fields", "sheets.properties.title")],
        )?;
        let meta: SpreadsheetMeta = resp.json()?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    fn sheet_values(&self, sheet: &str) -> Result<Vec<Vec<Value>>, GoogleApiError> {
        let resp = self.get(
            self.values_url(sheet)?,
            &[
                ("majorDimension", "ROWS"),
                ("valueRenderOption", "FORMATTED_VALUE"),
            ],
        )?;
        let range: ValueRange = resp.json()?;
        Ok(range.values)
    }
}

fn connection_error(err: GoogleApiError) -> SourceError {
    SourceError::Connection(err.to_string())
}

impl SheetSource for GoogleSheets {
    fn list_sheet_names(&self) -> Result<Vec<String>, SourceError> {
        self.sheet_titles().map_err(connection_error)
    }

    fn fetch_rows(&self, sheet: &str) -> Result<Vec<Row>, SourceError> {
        debug!(sheet, spreadsheet = %self.spreadsheet_id, "fetching sheet values");
        let values = self
            .sheet_values(sheet)
            .map_err(|e| SourceError::sheet_read(sheet, e))?;
        records_from_values(&values).map_err(|message| SourceError::sheet_read(sheet, message))
    }

    fn describe(&self) -> String {
        format!("google:{}", self.spreadsheet_id)
    }
}

// ============================================================================
// Tests
// ============================================================================
