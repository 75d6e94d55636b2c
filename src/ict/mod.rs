pub mod client;
pub mod workflow;

pub use client::IctClient;
pub use workflow::{send_fax, FaxRemote, FaxStep, WorkflowError};
