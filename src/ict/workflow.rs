//! The fax submission chain.
//!
//! contact -> document -> upload -> program -> transmission -> send. Each step
//! needs the ID produced by an earlier one, so they run one after another. A
//! failure stops the chain; records already created remotely are left in place.

use crate::error::IctError;
use crate::types::{Contact, DocumentRecord, SendFaxRequest, Transmission};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

/// The remote calls the submission chain is made of.
#[async_trait]
pub trait FaxRemote: Send + Sync {
    async fn create_contact(&self, token: &str, contact: &Contact) -> Result<i64, IctError>;

    async fn create_document(&self, token: &str, document: &DocumentRecord) -> Result<i64, IctError>;

    async fn upload_file(
        &self,
        token: &str,
        document_id: i64,
        file: &[u8],
        content_type: &str,
    ) -> Result<(), IctError>;

    async fn create_program(&self, token: &str, document_id: i64) -> Result<i64, IctError>;

    async fn create_transmission(
        &self,
        token: &str,
        transmission: &Transmission,
        contact_id: i64,
        program_id: i64,
    ) -> Result<i64, IctError>;

    async fn send_transmission(&self, token: &str, transmission_id: i64) -> Result<(), IctError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaxStep {
    CreateContact,
    CreateDocument,
    UploadFile,
    CreateProgram,
    CreateTransmission,
    SendTransmission,
}

impl fmt::Display for FaxStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FaxStep::CreateContact => "create contact",
            FaxStep::CreateDocument => "create document record",
            FaxStep::UploadFile => "upload document file",
            FaxStep::CreateProgram => "create program",
            FaxStep::CreateTransmission => "create transmission",
            FaxStep::SendTransmission => "send transmission",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
#[error("Failed to {step}: {source}")]
pub struct WorkflowError {
    pub step: FaxStep,
    #[source]
    pub source: IctError,
}

/// IDs produced along the way, mostly useful for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaxReceipt {
    pub contact_id: i64,
    pub document_id: i64,
    pub program_id: i64,
    pub transmission_id: i64,
}

fn at(step: FaxStep) -> impl FnOnce(IctError) -> WorkflowError {
    move |source| WorkflowError { step, source }
}

pub async fn send_fax<R: FaxRemote + ?Sized>(
    remote: &R,
    token: &str,
    request: &SendFaxRequest,
) -> Result<FaxReceipt, WorkflowError> {
    let contact_id = remote
        .create_contact(token, &request.contact)
        .await
        .map_err(at(FaxStep::CreateContact))?;
    debug!(contact_id, "contact created");

    let document_id = remote
        .create_document(token, &request.document)
        .await
        .map_err(at(FaxStep::CreateDocument))?;
    debug!(document_id, "document record created");

    remote
        .upload_file(
            token,
            document_id,
            &request.file,
            &request.file_model.content_type,
        )
        .await
        .map_err(at(FaxStep::UploadFile))?;
    debug!(document_id, bytes = request.file.len(), "document file uploaded");

    let program_id = remote
        .create_program(token, document_id)
        .await
        .map_err(at(FaxStep::CreateProgram))?;
    debug!(program_id, "program created");

    let transmission_id = remote
        .create_transmission(token, &request.transmission, contact_id, program_id)
        .await
        .map_err(at(FaxStep::CreateTransmission))?;
    debug!(transmission_id, "transmission created");

    remote
        .send_transmission(token, transmission_id)
        .await
        .map_err(at(FaxStep::SendTransmission))?;
    info!(transmission_id, "fax transmission sent");

    Ok(FaxReceipt {
        contact_id,
        document_id,
        program_id,
        transmission_id,
    })
}
