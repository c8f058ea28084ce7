//! Two-step file upload.
//!
//! Step one POSTs the file's metadata to an endpoint that answers with a
//! one-time `upload_url` and signed `upload_params`. Step two POSTs those
//! params plus the file bytes, as multipart form data, to `upload_url`. The
//! second request goes to the file store, not the API, and carries no bearer
//! token.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::{parse_json, CanvasClient};
use crate::error::ApiError;
use crate::http::{FilePart, HttpMethod, HttpRequest, MultipartForm, RequestBody};
use crate::params::Params;
use crate::transport::Transport;

/// Results of both upload steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// Response of the initiate-upload request.
    pub init: Value,
    /// Response of the file store.
    pub upload: Value,
}

#[derive(Debug, Deserialize)]
struct UploadTarget {
    upload_url: String,
    #[serde(default)]
    upload_params: Map<String, Value>,
}

impl UploadTarget {
    /// Content migrations nest the target under `pre_attachment`.
    fn from_init(init: &Value) -> Result<Self, ApiError> {
        let source = match init.get("pre_attachment") {
            Some(pre) if init.get("upload_url").is_none() => pre,
            _ => init,
        };
        Self::deserialize(source)
            .map_err(|e| ApiError::UnexpectedPayload(format!("upload init response: {e}")))
    }
}

/// Local file contents and metadata, read before any request is sent.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl LocalFile {
    pub fn read(path: &Path) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidLocalFile {
            path: path.display().to_string(),
            reason,
        };
        let meta = fs::metadata(path).map_err(|e| invalid(e.to_string()))?;
        if !meta.is_file() {
            return Err(invalid("not a regular file".to_string()));
        }
        let bytes = fs::read(path).map_err(|e| invalid(e.to_string()))?;
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| invalid("no file name".to_string()))?
            .to_string();
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl<T: Transport> CanvasClient<T> {
    /// Upload `local_file` through the initiate-upload endpoint at `path`.
    ///
    /// `data` holds the metadata form fields for step one (name, size,
    /// parent folder, ...).
    pub fn upload_file(&self, path: &str, data: Params, local_file: &Path) -> Result<UploadOutcome, ApiError> {
        let file = LocalFile::read(local_file)?;
        self.upload_bytes(path, data, file)
    }

    pub(crate) fn upload_bytes(&self, path: &str, data: Params, file: LocalFile) -> Result<UploadOutcome, ApiError> {
        let init_request = HttpRequest {
            method: HttpMethod::Post,
            url: self.url_for(path),
            headers: vec![self.auth_header()?],
            body: Some(RequestBody::Form(data.to_pairs())),
        };
        debug!(url = %init_request.url, file = %file.file_name, "initiating upload");
        let init = parse_json(self.execute(&init_request)?)?;

        let target = UploadTarget::from_init(&init)?;

        let fields = target
            .upload_params
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();
        let form = MultipartForm::new(
            fields,
            FilePart {
                field: "file".to_string(),
                file_name: file.file_name,
                content_type: file.content_type,
                bytes: file.bytes,
            },
        );
        let upload_request = HttpRequest {
            method: HttpMethod::Post,
            url: target.upload_url,
            headers: Vec::new(),
            body: Some(RequestBody::Multipart(form)),
        };
        debug!(url = %upload_request.url, "uploading file contents");
        let upload = parse_json(self.execute(&upload_request)?)?;

        Ok(UploadOutcome { init, upload })
    }
}
