//! Document endpoints, including multipart upload.
//!
//! Uploads are one-shot: the request client's retry loop is skipped because
//! re-sending a partially received upload can duplicate the file server-side.
//! Batches run strictly sequentially so the progress counter means what it
//! says and a failure leaves a clean prefix of files persisted.

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};
use crate::types::Document;

#[derive(Debug, Clone, Deserialize)]
struct DocumentListData {
    #[serde(default)]
    documents: Vec<Document>,
}

/// One file queued for upload.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub project_id: String,
    pub phase_id: String,
}

/// Error from a sequential batch: which file failed, how many landed before
/// it. Files `0..completed` are persisted server-side; the rest were never
/// sent.
#[derive(Debug, thiserror::Error)]
#[error("upload of \"{file_name}\" failed after {completed} file(s): {source}")]
pub struct UploadBatchError {
    pub file_name: String,
    pub completed: usize,
    #[source]
    pub source: ApiError,
}

/// Upload seam: the batch runner only needs "send one document", so tests
/// inject failures without a server.
#[async_trait]
pub trait DocumentSink {
    async fn upload_document(&self, upload: &DocumentUpload) -> Result<Document, ApiError>;
}

#[async_trait]
impl DocumentSink for ApiClient {
    async fn upload_document(&self, upload: &DocumentUpload) -> Result<Document, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            document: Document,
        }

        let part = reqwest::multipart::Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("project_id", upload.project_id.clone())
            .text("phase_id", upload.phase_id.clone());

        let envelope = self
            .request_multipart::<Data>("/documents/upload", form)
            .await?;
        Ok(envelope.data.document)
    }
}

/// Upload files strictly one after another. `progress(current, total)` fires
/// before each upload starts, so on the i-th failure it last reported
/// `(i, total)` and exactly `i - 1` files are persisted.
pub async fn upload_batch<S: DocumentSink + ?Sized>(
    sink: &S,
    uploads: &[DocumentUpload],
    mut progress: impl FnMut(usize, usize),
) -> Result<Vec<Document>, UploadBatchError> {
    let total = uploads.len();
    let mut uploaded = Vec::with_capacity(total);

    for (index, upload) in uploads.iter().enumerate() {
        progress(index + 1, total);
        match sink.upload_document(upload).await {
            Ok(document) => uploaded.push(document),
            Err(source) => {
                return Err(UploadBatchError {
                    file_name: upload.file_name.clone(),
                    completed: index,
                    source,
                });
            }
        }
    }
    log::info!("uploaded {} document(s)", uploaded.len());
    Ok(uploaded)
}

impl ApiClient {
    pub async fn list_documents(&self, project_id: &str) -> Result<Vec<Document>, ApiError> {
        let envelope = self
            .request_empty::<DocumentListData>(
                Method::GET,
                &format!("/projects/{project_id}/documents"),
            )
            .await?;
        Ok(envelope.data.documents)
    }

    /// Fetch a time-limited direct-download link. The client hands the URL to
    /// the operator; it does not stream the file itself.
    pub async fn document_download_url(&self, id: &str) -> Result<String, ApiError> {
        #[derive(Deserialize)]
        struct Data {
            url: String,
        }

        let envelope = self
            .request_empty::<Data>(Method::GET, &format!("/documents/{id}/download"))
            .await?;
        Ok(envelope.data.url)
    }

    pub async fn review_document(
        &self,
        id: &str,
        review_status: &str,
        notes: Option<&str>,
    ) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            review_status: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            approval_notes: Option<&'a str>,
        }

        self.request_ack(
            Method::PUT,
            &format!("/documents/{id}/review"),
            Some(&Body {
                review_status,
                approval_notes: notes,
            }),
        )
        .await
    }

    pub async fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        self.request_ack_empty(Method::DELETE, &format!("/documents/{id}"))
            .await
    }
}
