pub mod calls;
pub mod config;
pub mod crypto;
pub mod error;
pub mod files;
pub mod ict;
pub mod logging;
pub mod request;
pub mod settings;
pub mod types;

pub use config::Config;

use self::calls::{ApiError, DirectCalls, FaxApi};
use self::config::Paths;
use self::settings::SettingsStore;
use self::types::{
    AccountInfo, AccountRecord, AuthResponse, Contact, Credentials, DocumentRecord, FaxRecord,
    SendFaxRequest, SendFileInfo, Transmission,
};

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Multipart, Query, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info};

pub const API_PATHS: &str = "/api/v1";

pub const API_UI_AUTHENTICATION: &str = "authentication";
pub const API_UI_SAVE_SETTINGS: &str = "save_settings";
pub const API_UI_LOAD_SETTINGS: &str = "load_settings";
pub const API_UI_LOAD_ACCOUNT_INFO: &str = "load_account_info";
pub const API_UI_LOGOUT: &str = "logout";
pub const API_UI_GET_LAST_FAXES: &str = "load_faxes";
pub const API_UI_GET_ALL_ACCOUNTS: &str = "load_accounts";
pub const API_UI_SEND_FAX: &str = "send_fax";
pub const API_UI_HEALTH: &str = "health";

const MULTIPART_PARSE_FAILED: &str = "failed to parse multipart form";

/// Upper bound for a `send_fax` upload.
pub const MAX_UPLOAD_BYTES: usize = 1 << 31;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub direct: DirectCalls,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct FaxQuery {
    pub count: Option<usize>,
}

/// `{protocol}://{host}:{port}/{paths...}` with slashes between path pieces
/// normalised.
pub fn url_join(protocol: &str, host: &str, port: u16, paths: &[&str]) -> String {
    let joined = paths
        .iter()
        .map(|p| p.trim_matches('/'))
        .collect::<Vec<_>>()
        .join("/");
    format!("{}://{}:{}/{}", protocol, host, port, joined)
}

fn route_path(endpoint: &str) -> String {
    format!("{}/{}", API_PATHS, endpoint)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(&route_path(API_UI_AUTHENTICATION), get(authentication))
        .route(&route_path(API_UI_SAVE_SETTINGS), post(save_settings))
        .route(&route_path(API_UI_LOAD_SETTINGS), get(load_settings))
        .route(&route_path(API_UI_LOAD_ACCOUNT_INFO), get(load_account_info))
        .route(&route_path(API_UI_LOGOUT), get(logout))
        .route(&route_path(API_UI_GET_LAST_FAXES), get(load_faxes))
        .route(&route_path(API_UI_GET_ALL_ACCOUNTS), get(load_accounts))
        .route(
            &route_path(API_UI_SEND_FAX),
            post(send_fax).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(&route_path(API_UI_HEALTH), get(health))
        .with_state(state)
}

pub fn create_app(config: Config, paths: &Paths) -> (AppState, Router) {
    let state = AppState {
        config,
        direct: DirectCalls::new(SettingsStore::new(&paths.settings_file)),
    };
    let app = build_router(state.clone());
    (state, app)
}

/// Binds the configured address and serves the relay until ctrl-c.
pub async fn serve(config: Config, paths: &Paths) -> anyhow::Result<()> {
    let addr = config.listen_addr();
    let (_, app) = create_app(config, paths);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("going to listen on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {err:?}");
        std::future::pending::<()>().await;
    }
    info!("shutting down relay");
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn authentication(State(state): State<AppState>) -> Result<Json<AuthResponse>, ApiError> {
    Ok(Json(state.direct.authenticate().await?))
}

async fn save_settings(
    State(state): State<AppState>,
    credentials: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<&'static str>, ApiError> {
    let Json(credentials) = credentials.map_err(|r| ApiError::BadRequest(r.body_text()))?;
    state.direct.save_settings(&credentials).await?;
    Ok(Json("ok"))
}

async fn load_settings(State(state): State<AppState>) -> Result<Json<Credentials>, ApiError> {
    Ok(Json(state.direct.load_settings().await?))
}

async fn load_account_info(State(state): State<AppState>) -> Result<Json<AccountInfo>, ApiError> {
    Ok(Json(state.direct.get_account_info().await?))
}

async fn logout(State(state): State<AppState>) -> Result<Json<&'static str>, ApiError> {
    state.direct.logout().await?;
    Ok(Json("ok"))
}

async fn load_faxes(
    State(state): State<AppState>,
    query: Result<Query<FaxQuery>, QueryRejection>,
) -> Result<Json<Vec<FaxRecord>>, ApiError> {
    let Query(query) = query.map_err(|r| ApiError::BadRequest(r.body_text()))?;
    Ok(Json(state.direct.get_last_faxes(query.count).await?))
}

async fn load_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountRecord>>, ApiError> {
    Ok(Json(state.direct.get_all_accounts().await?))
}

async fn send_fax(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let multipart = multipart.map_err(|r| {
        error!("send_fax rejected: {}", r.body_text());
        ApiError::BadRequest(MULTIPART_PARSE_FAILED.to_string())
    })?;
    let request = read_send_fax_form(multipart).await?;
    state.direct.send_fax(request).await?;
    Ok(Json(MessageResponse {
        message: "fax sent successfully".to_string(),
    }))
}

async fn read_send_fax_form(mut multipart: Multipart) -> Result<SendFaxRequest, ApiError> {
    let parse_failed = || ApiError::BadRequest(MULTIPART_PARSE_FAILED.to_string());

    let mut fields: HashMap<String, String> = HashMap::new();
    let mut file: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await.map_err(|_| parse_failed())? {
        let Some(name) = field.name().map(|n| n.to_string()) else {
            continue;
        };
        if name == "file" {
            let bytes = field.bytes().await.map_err(|_| parse_failed())?;
            file = Some(bytes.to_vec());
        } else {
            let text = field.text().await.map_err(|_| parse_failed())?;
            fields.insert(name, text);
        }
    }

    let file = file
        .ok_or_else(|| ApiError::BadRequest("failed to get file from request".to_string()))?;

    let contact: Contact = decode_field(&fields, "contact")?;
    let document: DocumentRecord = decode_field(&fields, "document")?;
    let transmission: Transmission = decode_field(&fields, "transmission")?;
    let file_model: SendFileInfo = decode_field(&fields, "fileModel")?;

    Ok(SendFaxRequest {
        contact,
        document,
        transmission,
        file,
        file_model,
    })
}

fn decode_field<T: DeserializeOwned>(
    fields: &HashMap<String, String>,
    name: &str,
) -> Result<T, ApiError> {
    let raw = fields.get(name).map(String::as_str).unwrap_or_default();
    serde_json::from_str(raw).map_err(|err| {
        error!("bad {} field: {}", name, err);
        ApiError::BadRequest(format!("failed to unmarshal {} data", name))
    })
}
