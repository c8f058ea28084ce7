use std::fmt::Display;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::client::CanvasClient;
use crate::error::ApiError;
use crate::params::Params;
use crate::transport::Transport;
use crate::upload::{LocalFile, UploadOutcome};

impl<T: Transport> CanvasClient<T> {
    /// Course files whose name matches `search_term`.
    pub fn list_files(&self, course: impl Display, search_term: &str) -> Result<Vec<Value>, ApiError> {
        self.get(format!("api/v1/courses/{course}/files"))
            .add_param("search_term", search_term)
            .submit_paginated()
    }

    /// Upload a local file into the course folder `upload_path`, which the
    /// server creates if needed. An existing file of the same name is
    /// replaced when `overwrite` is set, otherwise the upload is renamed.
    pub fn upload_file_to_course(
        &self,
        course: impl Display,
        local_file: &Path,
        upload_path: &str,
        remote_name: Option<&str>,
        content_type: Option<&str>,
        overwrite: bool,
    ) -> Result<UploadOutcome, ApiError> {
        let mut file = LocalFile::read(local_file)?;
        if let Some(name) = remote_name {
            file.file_name = name.to_string();
        }
        if let Some(content_type) = content_type {
            file.content_type = content_type.to_string();
        }

        let mut data = Params::new();
        data.add("name", &file.file_name, true);
        data.add("size", file.size(), true);
        data.add("parent_folder_path", upload_path, true);
        data.add("on_duplicate", if overwrite { "overwrite" } else { "rename" }, true);
        data.add_optional("content_type", content_type, true);

        self.upload_bytes(&format!("api/v1/courses/{course}/files"), data, file)
    }

    /// Import a zipped QTI quiz through a content migration and return the
    /// migration as it stands after the upload. Poll its `progress_url` with
    /// [`CanvasClient::progress`] to wait for the import.
    pub fn import_qti_quiz(&self, course: impl Display, qti_file: &Path) -> Result<Value, ApiError> {
        let file = LocalFile::read(qti_file)?;
        let mut data = Params::new();
        data.add("migration_type", "qti_converter", true);
        data.nest("pre_attachment")
            .add("name", &file.file_name)
            .add("size", file.size());

        let outcome = self.upload_bytes(&format!("api/v1/courses/{course}/content_migrations"), data, file)?;
        let migration = match &outcome.init["id"] {
            Value::Null => {
                return Err(ApiError::UnexpectedPayload(
                    "content migration response has no id".to_string(),
                ))
            }
            Value::String(id) => id.clone(),
            id => id.to_string(),
        };
        info!(%migration, "qti quiz uploaded");

        self.get(format!("api/v1/courses/{course}/content_migrations/{migration}"))
            .submit()
    }
}
