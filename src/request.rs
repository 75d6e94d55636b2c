//! Turning a local document plus recipient details into a [`SendFaxRequest`].

use crate::files::{content_type_for, extract_file_extension, EMPTY_FILE_EXTENSION};
use crate::types::{
    Contact, DocumentRecord, SendFaxRequest, SendFileInfo, Transmission, WITHOUT_COVER,
    WITHOUT_PRINT, WITH_COVER, WITH_PRINT,
};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Recipient and delivery settings for one fax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaxOptions {
    pub to: String,
    pub account_id: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub print: bool,
    pub cover_page: bool,
    pub tries: u32,
}

impl Default for FaxOptions {
    fn default() -> Self {
        Self {
            to: String::new(),
            account_id: String::new(),
            title: None,
            name: None,
            print: true,
            cover_page: false,
            tries: 1,
        }
    }
}

/// Reads `file` and builds the request. Only the extension decides whether
/// the file is accepted; types without a known MIME type go out with an empty
/// content type.
pub fn build_send_request(
    file: &Path,
    options: FaxOptions,
) -> Result<SendFaxRequest, RequestError> {
    let path = file.to_string_lossy().to_string();
    let extension = extract_file_extension(&path);
    if extension == EMPTY_FILE_EXTENSION {
        return Err(RequestError::UnsupportedFile(path));
    }
    let content_type = content_type_for(&extension).unwrap_or_default();
    let contents = fs::read(file).map_err(|source| RequestError::Io {
        path: path.clone(),
        source,
    })?;

    let FaxOptions {
        to,
        account_id,
        title,
        name,
        print,
        cover_page,
        tries,
    } = options;
    let title = title.unwrap_or_else(|| {
        file.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "fax".to_string())
    });

    Ok(SendFaxRequest {
        contact: Contact {
            first_name: name.unwrap_or_default(),
            phone: to,
            ..Contact::default()
        },
        document: DocumentRecord {
            title: title.clone(),
            description: title.clone(),
        },
        transmission: Transmission {
            title,
            account_id,
            is_print: (if print { WITH_PRINT } else { WITHOUT_PRINT }).to_string(),
            is_cover_page: (if cover_page { WITH_COVER } else { WITHOUT_COVER }).to_string(),
            try_allowed: tries.to_string(),
            ..Transmission::default()
        },
        file: contents,
        file_model: SendFileInfo {
            content_type: content_type.to_string(),
        },
    })
}
