use async_trait::async_trait;
use print2fax::error::IctError;
use print2fax::ict::workflow::{send_fax, FaxReceipt, FaxRemote, FaxStep};
use print2fax::types::{
    Contact, DocumentRecord, SendFaxRequest, SendFileInfo, Transmission,
};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Contact(String),
    Document(String),
    Upload {
        document_id: i64,
        len: usize,
        content_type: String,
    },
    Program(i64),
    Transmission {
        contact_id: i64,
        program_id: i64,
        title: String,
    },
    Send(i64),
}

#[derive(Default)]
struct MockRemote {
    calls: Mutex<Vec<Call>>,
    tokens: Mutex<Vec<String>>,
    fail_at: Option<FaxStep>,
}

impl MockRemote {
    fn failing_at(step: FaxStep) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::default()
        }
    }

    fn record(&self, token: &str, call: Call) {
        self.tokens.lock().unwrap().push(token.to_string());
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, step: FaxStep, operation: &'static str) -> Result<(), IctError> {
        if self.fail_at == Some(step) {
            return Err(IctError::Status {
                operation,
                status: 500,
            });
        }
        Ok(())
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FaxRemote for MockRemote {
    async fn create_contact(&self, token: &str, contact: &Contact) -> Result<i64, IctError> {
        self.record(token, Call::Contact(contact.phone.clone()));
        self.check(FaxStep::CreateContact, "contact creation")?;
        Ok(11)
    }

    async fn create_document(
        &self,
        token: &str,
        document: &DocumentRecord,
    ) -> Result<i64, IctError> {
        self.record(token, Call::Document(document.title.clone()));
        self.check(FaxStep::CreateDocument, "document creation")?;
        Ok(22)
    }

    async fn upload_file(
        &self,
        token: &str,
        document_id: i64,
        file: &[u8],
        content_type: &str,
    ) -> Result<(), IctError> {
        self.record(
            token,
            Call::Upload {
                document_id,
                len: file.len(),
                content_type: content_type.to_string(),
            },
        );
        self.check(FaxStep::UploadFile, "file upload")
    }

    async fn create_program(&self, token: &str, document_id: i64) -> Result<i64, IctError> {
        self.record(token, Call::Program(document_id));
        self.check(FaxStep::CreateProgram, "program creation")?;
        Ok(33)
    }

    async fn create_transmission(
        &self,
        token: &str,
        transmission: &Transmission,
        contact_id: i64,
        program_id: i64,
    ) -> Result<i64, IctError> {
        self.record(
            token,
            Call::Transmission {
                contact_id,
                program_id,
                title: transmission.title.clone(),
            },
        );
        self.check(FaxStep::CreateTransmission, "transmission creation")?;
        Ok(44)
    }

    async fn send_transmission(&self, token: &str, transmission_id: i64) -> Result<(), IctError> {
        self.record(token, Call::Send(transmission_id));
        self.check(FaxStep::SendTransmission, "transmission send")
    }
}

fn request() -> SendFaxRequest {
    SendFaxRequest {
        contact: Contact {
            phone: "+15551234".to_string(),
            ..Contact::default()
        },
        document: DocumentRecord {
            title: "Invoice".to_string(),
            description: "March".to_string(),
        },
        transmission: Transmission {
            title: "Invoice fax".to_string(),
            account_id: "3".to_string(),
            is_print: "1".to_string(),
            is_cover_page: "0".to_string(),
            try_allowed: "1".to_string(),
            ..Transmission::default()
        },
        file: b"%PDF-1.4 fake".to_vec(),
        file_model: SendFileInfo {
            content_type: "application/pdf".to_string(),
        },
    }
}

#[tokio::test]
async fn test_send_fax_threads_ids_through_chain() {
    let remote = MockRemote::default();
    let receipt = send_fax(&remote, "tok", &request()).await.unwrap();

    assert_eq!(
        receipt,
        FaxReceipt {
            contact_id: 11,
            document_id: 22,
            program_id: 33,
            transmission_id: 44,
        }
    );
    assert_eq!(
        remote.calls(),
        vec![
            Call::Contact("+15551234".to_string()),
            Call::Document("Invoice".to_string()),
            Call::Upload {
                document_id: 22,
                len: 13,
                content_type: "application/pdf".to_string(),
            },
            Call::Program(22),
            Call::Transmission {
                contact_id: 11,
                program_id: 33,
                title: "Invoice fax".to_string(),
            },
            Call::Send(44),
        ]
    );
}

#[tokio::test]
async fn test_send_fax_uses_same_token_everywhere() {
    let remote = MockRemote::default();
    send_fax(&remote, "bearer-xyz", &request()).await.unwrap();
    let tokens = remote.tokens.lock().unwrap().clone();
    assert_eq!(tokens.len(), 6);
    assert!(tokens.iter().all(|t| t == "bearer-xyz"));
}

#[tokio::test]
async fn test_document_failure_stops_chain() {
    let remote = MockRemote::failing_at(FaxStep::CreateDocument);
    let err = send_fax(&remote, "tok", &request()).await.unwrap_err();

    assert_eq!(err.step, FaxStep::CreateDocument);
    assert_eq!(
        remote.calls(),
        vec![
            Call::Contact("+15551234".to_string()),
            Call::Document("Invoice".to_string()),
        ]
    );
    assert_eq!(
        err.to_string(),
        "Failed to create document record: document creation failed with status code: 500"
    );
}

#[tokio::test]
async fn test_upload_failure_skips_program() {
    let remote = MockRemote::failing_at(FaxStep::UploadFile);
    let err = send_fax(&remote, "tok", &request()).await.unwrap_err();
    assert_eq!(err.step, FaxStep::UploadFile);
    assert_eq!(remote.calls().len(), 3);
    assert!(!remote
        .calls()
        .iter()
        .any(|c| matches!(c, Call::Program(_))));
}

#[tokio::test]
async fn test_send_failure_reports_last_step() {
    let remote = MockRemote::failing_at(FaxStep::SendTransmission);
    let err = send_fax(&remote, "tok", &request()).await.unwrap_err();
    assert_eq!(err.step, FaxStep::SendTransmission);
    assert_eq!(err.source.status_code(), Some(500));
    assert_eq!(remote.calls().len(), 6);
}

#[tokio::test]
async fn test_contact_failure_makes_no_other_calls() {
    let remote = MockRemote::failing_at(FaxStep::CreateContact);
    let err = send_fax(&remote, "tok", &request()).await.unwrap_err();
    assert_eq!(err.step, FaxStep::CreateContact);
    assert_eq!(remote.calls().len(), 1);
}

#[test]
fn test_step_labels() {
    assert_eq!(FaxStep::CreateContact.to_string(), "create contact");
    assert_eq!(FaxStep::UploadFile.to_string(), "upload document file");
    assert_eq!(FaxStep::SendTransmission.to_string(), "send transmission");
}
