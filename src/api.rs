// API client module: a small blocking HTTP client for the control panel's
// file manager. Requests go out one at a time; each call is a single
// request/response exchange and nothing is retried.

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Credentials;
use crate::error::FmError;
use crate::path::{AbsolutePath, HomeRelativePath};
use crate::remote::{Accepted, DirStatus, RemoteFs};
use crate::response::{decode, Decoded, Shape, Verdict};

/// Path of the JSON-RPC style endpoint.
pub const JSON_API_PATH: &str = "/json-api/cpanel";
/// Path of the multipart upload endpoint.
pub const UPLOAD_PATH: &str = "/execute/Fileman/upload_files";
/// Content type sent for every uploaded part.
pub const UPLOAD_CONTENT_TYPE: &str = "text/plain";

/// `RemoteFs` backed by the panel's HTTP API. Holds a reqwest blocking
/// client, the base URL and the prepared Authorization header.
#[derive(Clone)]
pub struct FileManagerClient {
    client: Client,
    base_url: String,
    principal: String,
    auth: HeaderValue,
}

impl FileManagerClient {
    /// Build a client with its own reqwest client using `timeout` per request.
    pub fn new(credentials: &Credentials, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Self::with_client(credentials, client)
    }

    /// Use an already configured reqwest client.
    pub fn with_client(credentials: &Credentials, client: Client) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!(
            "cpanel {}:{}",
            credentials.principal, credentials.token
        ))
        .context("Credentials contain characters not allowed in a header")?;
        auth.set_sensitive(true);
        Ok(FileManagerClient {
            client,
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            principal: credentials.principal.clone(),
            auth,
        })
    }

    /// GET the JSON-RPC endpoint for `Fileman::<func>` with `params`.
    fn json_api(&self, func: &str, params: &[(&str, &str)]) -> Result<Decoded, FmError> {
        let url = format!("{}{}", self.base_url, JSON_API_PATH);
        let mut query: Vec<(&str, &str)> = vec![
            ("cpanel_jsonapi_user", self.principal.as_str()),
            ("cpanel_jsonapi_apiversion", "2"),
            ("cpanel_jsonapi_module", "Fileman"),
            ("cpanel_jsonapi_func", func),
        ];
        query.extend_from_slice(params);
        tracing::debug!(func, ?params, "GET {}", url);

        let res = self
            .client
            .get(&url)
            .header(AUTHORIZATION, self.auth.clone())
            .query(&query)
            .send()?;
        read_body(res, Shape::JsonRpc)
    }
}

/// Turn a response into a decoded body, or an HTTP status error for non-2xx.
fn read_body(res: Response, shape: Shape) -> Result<Decoded, FmError> {
    let status = res.status();
    let body = res.text()?;
    if !status.is_success() {
        return Err(FmError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body,
        });
    }
    Ok(decode(shape, &body))
}

fn rejected(operation: &'static str, decoded: Decoded) -> FmError {
    let reason = decoded
        .verdict
        .reason()
        .unwrap_or("request rejected")
        .to_string();
    FmError::Application {
        operation,
        reason,
        payload: decoded.payload,
    }
}

impl RemoteFs for FileManagerClient {
    fn create_directory(
        &self,
        parent: &AbsolutePath,
        name: &str,
        permissions: &str,
    ) -> Result<DirStatus, FmError> {
        let decoded = self.json_api(
            "mkdir",
            &[
                ("path", parent.as_str()),
                ("name", name),
                ("permissions", permissions),
            ],
        )?;
        if decoded.verdict == Verdict::Success {
            tracing::info!("Created directory {}/{}", parent, name);
            return Ok(DirStatus::Created);
        }
        if decoded.verdict.mentions_exists() {
            tracing::warn!("Directory {}/{} already exists", parent, name);
            return Ok(DirStatus::AlreadyExists);
        }
        Err(rejected("mkdir", decoded))
    }

    fn upload_files(&self, dir: &HomeRelativePath, files: &[PathBuf]) -> Result<Accepted, FmError> {
        if files.is_empty() {
            return Err(FmError::NoFiles);
        }

        let mut form = multipart::Form::new().text("dir", dir.as_str().to_string());
        for (index, path) in files.iter().enumerate() {
            // Whole file is buffered; the panel's upload limit bounds the size.
            let bytes = std::fs::read(path).map_err(|source| FmError::LocalFile {
                path: path.clone(),
                source,
            })?;
            let file_name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("upload.txt")
                .to_string();
            let part = multipart::Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(UPLOAD_CONTENT_TYPE)?;
            form = form.part(format!("file-{}", index + 1), part);
        }

        let url = format!("{}{}", self.base_url, UPLOAD_PATH);
        tracing::debug!(dir = %dir, count = files.len(), "POST {}", url);
        let res = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.auth.clone())
            .multipart(form)
            .send()?;

        let decoded = read_body(res, Shape::FlatStatus)?;
        if decoded.verdict == Verdict::Success {
            tracing::info!("Uploaded {} file(s) to {}", files.len(), dir);
            Ok(Accepted)
        } else {
            Err(rejected("upload_files", decoded))
        }
    }

    fn delete_file(&self, path: &HomeRelativePath) -> Result<Accepted, FmError> {
        // doubledecode=0 keeps percent-encoded names from being decoded twice.
        let decoded = self.json_api(
            "fileop",
            &[
                ("op", "unlink"),
                ("sourcefiles", path.as_str()),
                ("doubledecode", "0"),
            ],
        )?;
        if decoded.verdict == Verdict::Success {
            tracing::info!("Deleted file {}", path);
            Ok(Accepted)
        } else {
            Err(rejected("unlink", decoded))
        }
    }

    fn delete_directory(&self, path: &HomeRelativePath) -> Result<Accepted, FmError> {
        let decoded = self.json_api("fileop", &[("op", "rmdir"), ("sourcefiles", path.as_str())])?;
        // Accepted only; a non-empty directory stays in place and the panel
        // may still answer 2xx with nothing to say about it.
        match decoded.verdict {
            Verdict::Success => {
                tracing::info!("Directory removal accepted for {}", path);
                Ok(Accepted)
            }
            Verdict::Unconfirmed => {
                tracing::warn!("Directory removal of {} accepted without confirmation", path);
                Ok(Accepted)
            }
            Verdict::Failure { .. } => Err(rejected("rmdir", decoded)),
        }
    }
}
