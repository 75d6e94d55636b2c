use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const EMPTY_FIELD: &str = "N/A";
pub const WITH_PRINT: &str = "1";
pub const WITHOUT_PRINT: &str = "0";
pub const WITH_COVER: &str = "1";
pub const WITHOUT_COVER: &str = "0";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(rename = "host")]
    pub hostname: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthResponse {
    pub token: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub company: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub company: String,
}

impl AccountInfo {
    /// Placeholder shown before any credentials are configured.
    pub fn empty() -> Self {
        Self {
            first_name: EMPTY_FIELD.to_string(),
            last_name: EMPTY_FIELD.to_string(),
            email: "empty@empty.com".to_string(),
            phone: "+(0) 000 000-000".to_string(),
            country: EMPTY_FIELD.to_string(),
            company: EMPTY_FIELD.to_string(),
        }
    }
}

impl From<AuthResponse> for AccountInfo {
    // The remote profile's country is never surfaced.
    fn from(res: AuthResponse) -> Self {
        Self {
            first_name: res.first_name,
            last_name: res.last_name,
            email: res.email,
            phone: res.phone,
            country: EMPTY_FIELD.to_string(),
            company: res.company,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub custom1: String,
    pub custom2: String,
    pub custom3: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentRecord {
    #[serde(rename = "name")]
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRequest {
    pub document_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transmission {
    pub title: String,
    pub contact_id: String,
    pub account_id: String,
    pub program_id: String,
    pub is_print: String,
    #[serde(rename = "is_coverpage")]
    pub is_cover_page: String,
    pub try_allowed: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedTransmission {
    pub title: String,
    pub contact_id: i64,
    pub account_id: i64,
    pub program_id: i64,
    pub is_print: i64,
    #[serde(rename = "is_coverpage")]
    pub is_cover_page: i64,
    pub try_allowed: i64,
}

impl From<&Transmission> for ConvertedTransmission {
    /// Malformed numeric strings become 0.
    fn from(t: &Transmission) -> Self {
        Self {
            title: t.title.clone(),
            contact_id: parse_lenient(&t.contact_id),
            account_id: parse_lenient(&t.account_id),
            program_id: parse_lenient(&t.program_id),
            is_print: parse_lenient(&t.is_print),
            is_cover_page: parse_lenient(&t.is_cover_page),
            try_allowed: parse_lenient(&t.try_allowed),
        }
    }
}

pub fn parse_lenient(value: &str) -> i64 {
    value.parse::<i64>().unwrap_or(0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRecord {
    pub account_id: String,
    pub tenant_id: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub created_by: String,
    pub company: String,
}

/// A transmission as listed by the remote API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaxResponse {
    pub last_run: String,
    pub title: String,
    pub contact_phone: String,
    pub account_phone: String,
    pub status: String,
    pub is_print: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaxRecord {
    pub last_run: DateTime<Utc>,
    pub title: String,
    pub contact_phone: String,
    pub account_phone: String,
    pub status: String,
    pub is_print: String,
}

impl FaxRecord {
    pub fn is_printed(&self) -> bool {
        self.is_print == WITH_PRINT
    }
}

impl From<FaxResponse> for FaxRecord {
    fn from(res: FaxResponse) -> Self {
        Self {
            last_run: parse_last_run(&res.last_run),
            title: res.title,
            contact_phone: res.contact_phone,
            account_phone: res.account_phone,
            status: res.status,
            is_print: res.is_print,
        }
    }
}

/// Unix seconds encoded as a string; anything unparsable keeps the default time.
pub fn parse_last_run(raw: &str) -> DateTime<Utc> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendFileInfo {
    pub content_type: String,
}

/// Everything one fax submission needs.
#[derive(Debug, Clone, Default)]
pub struct SendFaxRequest {
    pub contact: Contact,
    pub document: DocumentRecord,
    pub transmission: Transmission,
    pub file: Vec<u8>,
    pub file_model: SendFileInfo,
}
