use crate::error::IctError;
use crate::ict::workflow::FaxRemote;
use crate::types::{
    AccountRecord, AuthResponse, Contact, ConvertedTransmission, Credentials, DocumentRecord,
    FaxRecord, FaxResponse, ProgramRequest, Transmission,
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use std::time::Duration;
use tracing::debug;

pub const AUTHENTICATION_API_PATH: &str = "api/authenticate";
pub const TRANSMISSIONS_API_PATH: &str = "api/transmissions";
pub const ACCOUNTS_API_PATH: &str = "api/accounts";
pub const CONTACTS_API_PATH: &str = "api/contacts";
pub const DOCUMENTS_API_PATH: &str = "api/documents";
pub const PROGRAMS_API_PATH: &str = "api/programs/sendfax";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Name of the multipart part carrying document bytes.
const UPLOAD_FILE_NAME: &str = "filename.txt";

pub fn document_media_path(document_id: i64) -> String {
    format!("api/documents/{}/media", document_id)
}

pub fn transmission_send_path(transmission_id: i64) -> String {
    format!("api/transmissions/{}/send", transmission_id)
}

/// Keeps scheme and authority of a user-supplied hostname; any path is dropped.
pub fn base_url(hostname: &str) -> Result<String, IctError> {
    let parsed =
        Url::parse(hostname.trim()).map_err(|_| IctError::InvalidHost(hostname.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| IctError::InvalidHost(hostname.to_string()))?;
    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}", parsed.scheme(), host, port),
        None => format!("{}://{}", parsed.scheme(), host),
    })
}

/// Client for the ICT fax API, bound to one host.
#[derive(Clone)]
pub struct IctClient {
    base: String,
    // Authentication has never been bounded by a timeout; every other call is.
    auth_http: Client,
    http: Client,
}

impl IctClient {
    pub fn new(hostname: &str) -> Result<Self, IctError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base: base_url(hostname)?,
            auth_http: Client::new(),
            http,
        })
    }

    pub fn from_credentials(credentials: &Credentials) -> Result<Self, IctError> {
        Self::new(&credentials.hostname)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path)
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, IctError> {
        let resp = self
            .auth_http
            .post(self.url(AUTHENTICATION_API_PATH))
            .json(credentials)
            .send()
            .await?;
        let resp = expect_ok(resp, "Authentication")?;
        Ok(resp.json::<AuthResponse>().await?)
    }

    pub async fn list_transmissions(&self, token: &str) -> Result<Vec<FaxRecord>, IctError> {
        let resp = self
            .http
            .get(self.url(TRANSMISSIONS_API_PATH))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = expect_ok(resp, "Fetching faxes")?;
        let faxes: Vec<FaxResponse> = resp.json().await?;
        Ok(faxes.into_iter().map(FaxRecord::from).collect())
    }

    pub async fn list_accounts(&self, token: &str) -> Result<Vec<AccountRecord>, IctError> {
        let resp = self
            .http
            .get(self.url(ACCOUNTS_API_PATH))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = expect_ok(resp, "Fetching accounts")?;
        Ok(resp.json().await?)
    }

    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response, IctError> {
        Ok(self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }
}

fn expect_ok(resp: Response, operation: &'static str) -> Result<Response, IctError> {
    if resp.status() != StatusCode::OK {
        return Err(IctError::Status {
            operation,
            status: resp.status().as_u16(),
        });
    }
    Ok(resp)
}

#[async_trait]
impl FaxRemote for IctClient {
    async fn create_contact(&self, token: &str, contact: &Contact) -> Result<i64, IctError> {
        let resp = self.post_json(CONTACTS_API_PATH, token, contact).await?;
        let body = expect_ok(resp, "CreateContact")?.text().await?;
        // A non-numeric body is accepted as id 0.
        Ok(body.parse::<i64>().unwrap_or(0))
    }

    async fn create_document(&self, token: &str, document: &DocumentRecord) -> Result<i64, IctError> {
        let resp = self.post_json(DOCUMENTS_API_PATH, token, document).await?;
        let body = expect_ok(resp, "CreateDocumentRecord")?.text().await?;
        Ok(body.parse::<i64>().unwrap_or(0))
    }

    async fn upload_file(
        &self,
        token: &str,
        document_id: i64,
        file: &[u8],
        content_type: &str,
    ) -> Result<(), IctError> {
        let mut part = reqwest::multipart::Part::bytes(file.to_vec()).file_name(UPLOAD_FILE_NAME);
        if !content_type.is_empty() {
            part = part.mime_str(content_type)?;
        }
        let form = reqwest::multipart::Form::new().part("file", part);
        let resp = self
            .http
            .put(self.url(&document_media_path(document_id)))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        expect_ok(resp, "Uploading document file")?;
        Ok(())
    }

    async fn create_program(&self, token: &str, document_id: i64) -> Result<i64, IctError> {
        let resp = self
            .post_json(PROGRAMS_API_PATH, token, &ProgramRequest { document_id })
            .await?;
        if resp.status() != StatusCode::OK {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            debug!("create program error response body: {}", body);
            return Err(IctError::Status {
                operation: "CreateProgram",
                status,
            });
        }
        let body = resp.text().await?;
        body.trim()
            .parse::<i64>()
            .map_err(|_| IctError::InvalidId {
                what: "program",
                body,
            })
    }

    async fn create_transmission(
        &self,
        token: &str,
        transmission: &Transmission,
        contact_id: i64,
        program_id: i64,
    ) -> Result<i64, IctError> {
        let mut transmission = transmission.clone();
        transmission.contact_id = contact_id.to_string();
        transmission.program_id = program_id.to_string();
        let converted = ConvertedTransmission::from(&transmission);
        debug!("transmission request body: {}", serde_json::to_string(&converted)?);

        let resp = self.post_json(TRANSMISSIONS_API_PATH, token, &converted).await?;
        let body = expect_ok(resp, "CreateTransmission")?.text().await?;
        debug!("transmission response body: {}", body);
        Ok(body.parse::<i64>().unwrap_or(0))
    }

    async fn send_transmission(&self, token: &str, transmission_id: i64) -> Result<(), IctError> {
        let resp = self
            .http
            .post(self.url(&transmission_send_path(transmission_id)))
            .bearer_auth(token)
            .send()
            .await?;
        expect_ok(resp, "Sending transmission")?;
        Ok(())
    }
}
