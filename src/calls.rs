//! The operations a front end needs, behind one capability trait.
//!
//! [`DirectCalls`] runs them in-process against the settings file and the ICT
//! API. [`RelayClient`] forwards them to a running relay server over loopback
//! HTTP. Which one is used is decided once at startup.

use crate::error::IctError;
use crate::ict::{self, IctClient, WorkflowError};
use crate::settings::{SettingsError, SettingsStore};
use crate::types::{
    AccountInfo, AccountRecord, AuthResponse, Credentials, FaxRecord, SendFaxRequest,
};
use crate::{
    url_join, API_PATHS, API_UI_AUTHENTICATION, API_UI_GET_ALL_ACCOUNTS, API_UI_GET_LAST_FAXES,
    API_UI_LOAD_ACCOUNT_INFO, API_UI_LOAD_SETTINGS, API_UI_LOGOUT, API_UI_SAVE_SETTINGS,
    API_UI_SEND_FAX,
};
use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("authentication against the host failed: {0}")]
    Authentication(#[source] IctError),

    #[error(transparent)]
    Remote(#[from] IctError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Non-200 answer from the relay server.
    #[error("API call failed with status code: {status} {message}")]
    Relay { status: u16, message: String },

    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn is_not_configured(&self) -> bool {
        matches!(self, ApiError::Settings(SettingsError::NotFound))
            || matches!(self, ApiError::Relay { message, .. } if message.contains("settings file not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!("relay request failed: {}", self);
        let body = serde_json::json!({
            "error": self.to_string()
        });
        (status, Json(body)).into_response()
    }
}

#[async_trait]
pub trait FaxApi: Send + Sync {
    async fn authenticate(&self) -> Result<AuthResponse, ApiError>;
    async fn get_account_info(&self) -> Result<AccountInfo, ApiError>;
    async fn save_settings(&self, credentials: &Credentials) -> Result<(), ApiError>;
    async fn load_settings(&self) -> Result<Credentials, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    /// Print-flagged faxes, oldest first; `count` keeps only the most recent ones.
    async fn get_last_faxes(&self, count: Option<usize>) -> Result<Vec<FaxRecord>, ApiError>;
    async fn get_all_accounts(&self) -> Result<Vec<AccountRecord>, ApiError>;
    async fn send_fax(&self, request: SendFaxRequest) -> Result<(), ApiError>;
}

/// Profile of the logged-in user, or the placeholder profile when no
/// credentials are stored yet.
pub async fn account_info_or_empty(api: &dyn FaxApi) -> Result<AccountInfo, ApiError> {
    match api.get_account_info().await {
        Ok(info) => Ok(info),
        Err(err) if err.is_not_configured() => Ok(AccountInfo::empty()),
        Err(err) => Err(err),
    }
}

/// Keeps only print-flagged records, in their original order, then the last
/// `count` of them.
pub fn filter_printed(records: Vec<FaxRecord>, count: Option<usize>) -> Vec<FaxRecord> {
    let printed: Vec<FaxRecord> = records.into_iter().filter(|r| r.is_printed()).collect();
    let skip = count
        .map(|c| printed.len().saturating_sub(c))
        .unwrap_or(0);
    printed.into_iter().skip(skip).collect()
}

#[derive(Debug, Clone)]
pub struct DirectCalls {
    store: SettingsStore,
}

impl DirectCalls {
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Loads credentials and authenticates once; the token lives for one operation.
    async fn session(&self) -> Result<(IctClient, AuthResponse), ApiError> {
        let credentials = self.store.load()?;
        let client = IctClient::from_credentials(&credentials)?;
        let auth = client
            .authenticate(&credentials)
            .await
            .map_err(ApiError::Authentication)?;
        Ok((client, auth))
    }
}

#[async_trait]
impl FaxApi for DirectCalls {
    async fn authenticate(&self) -> Result<AuthResponse, ApiError> {
        let (_, auth) = self.session().await?;
        Ok(auth)
    }

    async fn get_account_info(&self) -> Result<AccountInfo, ApiError> {
        let (_, auth) = self.session().await?;
        Ok(AccountInfo::from(auth))
    }

    async fn save_settings(&self, credentials: &Credentials) -> Result<(), ApiError> {
        Ok(self.store.save(credentials)?)
    }

    async fn load_settings(&self) -> Result<Credentials, ApiError> {
        Ok(self.store.load()?)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        Ok(self.store.logout()?)
    }

    async fn get_last_faxes(&self, count: Option<usize>) -> Result<Vec<FaxRecord>, ApiError> {
        let (client, auth) = self.session().await?;
        let records = client.list_transmissions(&auth.token).await?;
        Ok(filter_printed(records, count))
    }

    async fn get_all_accounts(&self) -> Result<Vec<AccountRecord>, ApiError> {
        let (client, auth) = self.session().await?;
        Ok(client.list_accounts(&auth.token).await?)
    }

    async fn send_fax(&self, request: SendFaxRequest) -> Result<(), ApiError> {
        let (client, auth) = self.session().await?;
        let receipt = ict::send_fax(&client, &auth.token, &request).await?;
        info!(
            contact_id = receipt.contact_id,
            document_id = receipt.document_id,
            program_id = receipt.program_id,
            transmission_id = receipt.transmission_id,
            "fax sent"
        );
        Ok(())
    }
}

/// Talks to a relay server listening on the loopback interface.
#[derive(Clone)]
pub struct RelayClient {
    port: u16,
    http: Client,
}

impl RelayClient {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            http: Client::new(),
        }
    }

    pub fn build_url(&self, endpoint: &str) -> String {
        url_join("http", crate::config::LOCALHOST, self.port, &[API_PATHS, endpoint])
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        let resp = self.http.get(self.build_url(endpoint)).send().await.map_err(IctError::from)?;
        read_body(resp).await
    }

    async fn get_query<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let resp = self
            .http
            .get(self.build_url(endpoint))
            .query(query)
            .send()
            .await
            .map_err(IctError::from)?;
        read_body(resp).await
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    if resp.status() == reqwest::StatusCode::OK {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let message = resp
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(|s| s.to_string()))
        .unwrap_or_default();
    Err(ApiError::Relay { status, message })
}

async fn read_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let resp = check_status(resp).await?;
    Ok(resp.json::<T>().await.map_err(IctError::from)?)
}

fn json_field<T: serde::Serialize>(value: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string(value).map_err(IctError::from)?)
}

#[async_trait]
impl FaxApi for RelayClient {
    async fn authenticate(&self) -> Result<AuthResponse, ApiError> {
        self.get(API_UI_AUTHENTICATION).await
    }

    async fn get_account_info(&self) -> Result<AccountInfo, ApiError> {
        self.get(API_UI_LOAD_ACCOUNT_INFO).await
    }

    async fn save_settings(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let resp = self
            .http
            .post(self.build_url(API_UI_SAVE_SETTINGS))
            .json(credentials)
            .send()
            .await
            .map_err(IctError::from)?;
        check_status(resp).await?;
        Ok(())
    }

    async fn load_settings(&self) -> Result<Credentials, ApiError> {
        self.get(API_UI_LOAD_SETTINGS).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let resp = self
            .http
            .get(self.build_url(API_UI_LOGOUT))
            .send()
            .await
            .map_err(IctError::from)?;
        check_status(resp).await?;
        Ok(())
    }

    async fn get_last_faxes(&self, count: Option<usize>) -> Result<Vec<FaxRecord>, ApiError> {
        match count {
            Some(count) => {
                self.get_query(API_UI_GET_LAST_FAXES, &[("count", count.to_string())])
                    .await
            }
            None => self.get(API_UI_GET_LAST_FAXES).await,
        }
    }

    async fn get_all_accounts(&self) -> Result<Vec<AccountRecord>, ApiError> {
        self.get(API_UI_GET_ALL_ACCOUNTS).await
    }

    async fn send_fax(&self, request: SendFaxRequest) -> Result<(), ApiError> {
        let form = reqwest::multipart::Form::new()
            .text("contact", json_field(&request.contact)?)
            .text("document", json_field(&request.document)?)
            .text("transmission", json_field(&request.transmission)?)
            .text("fileModel", json_field(&request.file_model)?)
            .part(
                "file",
                reqwest::multipart::Part::bytes(request.file).file_name("filename.txt"),
            );
        let resp = self
            .http
            .post(self.build_url(API_UI_SEND_FAX))
            .multipart(form)
            .send()
            .await
            .map_err(IctError::from)?;
        check_status(resp).await?;
        Ok(())
    }
}
