//! Backend invocation protocol.
//!
//! The bridge itself is late-bound: a command name plus a body, answered with
//! untyped JSON. [`BackendClient`] is the only code that speaks it directly;
//! it has one method per command and checks the shape of every answer before
//! anything reaches the result store.
//!
//! `extract-from-bytes` bodies go out as [`InvokeBody::Raw`] by default. A
//! bridge that only understands JSON gets the `{"bytes": [..]}` mapping
//! instead through [`BackendClient::with_bytes_encoding`].

pub mod mock;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Record;
use crate::error::AppError;

pub const PICK_FILE: &str = "pick-file";
pub const EXTRACT_FROM_PATH: &str = "extract-from-path";
pub const EXTRACT_FROM_BYTES: &str = "extract-from-bytes";

/// Body of a bridge invocation.
///
/// Byte buffers travel as `Raw` so a PDF is not expanded into one JSON number
/// per byte.
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeBody {
    Json(Value),
    Raw(Vec<u8>),
}

impl InvokeBody {
    pub fn empty() -> Self {
        InvokeBody::Json(Value::Object(serde_json::Map::new()))
    }
}

/// Answer of a bridge invocation: JSON on success, an opaque message on
/// failure.
pub type BridgeFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, String>> + Send + 'a>>;

/// A command channel to the extraction backend.
pub trait Bridge: Send + Sync {
    fn invoke<'a>(&'a self, command: &'a str, body: InvokeBody) -> BridgeFuture<'a>;
}

/// Payload of `extract-from-path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathPayload {
    pub path: String,
}

/// JSON form of the `extract-from-bytes` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BytesPayload {
    pub bytes: Vec<u8>,
}

/// How `extract-from-bytes` carries the file contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BytesEncoding {
    #[default]
    Raw,
    /// `{"bytes": [n, ...]}`, one JSON number per byte.
    Json,
}

/// What to extract records from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractSource {
    /// A path chosen through the dialog; the backend reads the file.
    Path(PathBuf),
    /// Raw file contents from a drop or the file input.
    Bytes(Vec<u8>),
}

/// Typed client over a [`Bridge`].
#[derive(Clone)]
pub struct BackendClient {
    bridge: Arc<dyn Bridge>,
    bytes_encoding: BytesEncoding,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("bytes_encoding", &self.bytes_encoding)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    pub fn new(bridge: Arc<dyn Bridge>) -> Self {
        Self {
            bridge,
            bytes_encoding: BytesEncoding::default(),
        }
    }

    pub fn with_bytes_encoding(mut self, encoding: BytesEncoding) -> Self {
        self.bytes_encoding = encoding;
        self
    }

    /// Ask the backend to show its file dialog.
    ///
    /// `Ok(None)` means the user cancelled.
    pub async fn pick_file(&self) -> Result<Option<PathBuf>, AppError> {
        tracing::debug!(command = PICK_FILE, "invoking bridge");
        let value = self
            .bridge
            .invoke(PICK_FILE, InvokeBody::empty())
            .await
            .map_err(AppError::Extraction)?;
        parse_picked_path(value)
    }

    pub async fn extract(&self, source: ExtractSource) -> Result<Vec<Record>, AppError> {
        match source {
            ExtractSource::Path(path) => self.extract_from_path(&path).await,
            ExtractSource::Bytes(bytes) => self.extract_from_bytes(bytes).await,
        }
    }

    pub async fn extract_from_path(&self, path: &Path) -> Result<Vec<Record>, AppError> {
        let payload = PathPayload {
            path: path.to_string_lossy().into_owned(),
        };
        let body = serde_json::to_value(&payload)
            .map_err(|e| AppError::MalformedResponse(e.to_string()))?;
        tracing::debug!(command = EXTRACT_FROM_PATH, path = %payload.path, "invoking bridge");
        let value = self
            .bridge
            .invoke(EXTRACT_FROM_PATH, InvokeBody::Json(body))
            .await
            .map_err(AppError::Extraction)?;
        parse_records(value)
    }

    pub async fn extract_from_bytes(&self, bytes: Vec<u8>) -> Result<Vec<Record>, AppError> {
        tracing::debug!(
            command = EXTRACT_FROM_BYTES,
            len = bytes.len(),
            encoding = ?self.bytes_encoding,
            "invoking bridge"
        );
        let body = match self.bytes_encoding {
            BytesEncoding::Raw => InvokeBody::Raw(bytes),
            BytesEncoding::Json => InvokeBody::Json(
                serde_json::to_value(BytesPayload { bytes })
                    .map_err(|e| AppError::MalformedResponse(e.to_string()))?,
            ),
        };
        let value = self
            .bridge
            .invoke(EXTRACT_FROM_BYTES, body)
            .await
            .map_err(AppError::Extraction)?;
        parse_records(value)
    }
}

/// `null` or `""` → cancelled, a string → path, anything else is malformed.
pub fn parse_picked_path(value: Value) -> Result<Option<PathBuf>, AppError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(PathBuf::from(s))),
        other => Err(AppError::MalformedResponse(format!(
            "{PICK_FILE}: esperado caminho ou null, recebido {}",
            type_name(&other)
        ))),
    }
}

/// Check that `value` is an array of objects and decode each as a [`Record`].
pub fn parse_records(value: Value) -> Result<Vec<Record>, AppError> {
    let Value::Array(items) = value else {
        return Err(AppError::MalformedResponse(format!(
            "esperada lista de registros, recebido {}",
            type_name(&value)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            if !item.is_object() {
                return Err(AppError::MalformedResponse(format!(
                    "registro {i}: esperado objeto, recebido {}",
                    type_name(&item)
                )));
            }
            serde_json::from_value::<Record>(item)
                .map_err(|e| AppError::MalformedResponse(format!("registro {i}: {e}")))
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "número",
        Value::String(_) => "texto",
        Value::Array(_) => "lista",
        Value::Object(_) => "objeto",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn records_decode_with_missing_fields() {
        let records = parse_records(json!([
            {"processo": "912345678", "titular": "ACME", "ncl": "25", "especificacao": "Roupas"},
            {"processo": "923456789"}
        ]))
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].titular, None);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let records = parse_records(json!([{"processo": "1", "extra": 5}])).unwrap();
        assert_eq!(records[0].processo.as_deref(), Some("1"));
    }

    #[test]
    fn non_array_is_malformed() {
        let err = parse_records(json!({"processo": "1"})).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn array_of_arrays_is_malformed() {
        // serde would happily decode a struct from a sequence; the shape
        // check must reject it first
        let err = parse_records(json!([["1", "2", "3", "4"]])).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let err = parse_records(json!([{"processo": 912345678}])).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn picked_path_shapes() {
        assert_eq!(parse_picked_path(Value::Null).unwrap(), None);
        assert_eq!(parse_picked_path(json!("")).unwrap(), None);
        assert_eq!(
            parse_picked_path(json!("/tmp/rpi.pdf")).unwrap(),
            Some(PathBuf::from("/tmp/rpi.pdf"))
        );
        assert!(matches!(
            parse_picked_path(json!(42)),
            Err(AppError::MalformedResponse(_))
        ));
    }
}
