use std::time::Duration;

use thiserror::Error;

/// Every failure the orchestration layer can surface.
///
/// All variants except [`AppError::BackendUnavailable`] are caught at the
/// boundary of the flow that raised them and turned into a feedback banner.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The bridge handle never appeared. Fatal for the whole session.
    #[error("backend indisponível após {attempts} tentativas ({waited:?})")]
    BackendUnavailable { attempts: u32, waited: Duration },
    #[error("Apenas arquivos PDF são permitidos.")]
    UnsupportedFileType { mime: String },
    /// Message reported by the extraction engine, kept verbatim.
    #[error("{0}")]
    Extraction(String),
    #[error("resposta malformada do backend: {0}")]
    MalformedResponse(String),
    #[error("{0}")]
    Clipboard(String),
    #[error("{0}")]
    Export(String),
}

impl AppError {
    /// Text shown in the feedback banner for this error.
    pub fn feedback_message(&self) -> String {
        match self {
            AppError::Clipboard(msg) => {
                format!("Erro ao copiar para a área de transferência: {msg}")
            }
            AppError::Export(msg) => format!("Erro ao exportar CSV: {msg}"),
            other => format!("Erro: {other}"),
        }
    }

    /// Whether the session can keep going after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::BackendUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_message_is_verbatim() {
        let err = AppError::Extraction("corrupt PDF".into());
        assert_eq!(err.feedback_message(), "Erro: corrupt PDF");
    }

    #[test]
    fn unsupported_file_type_message() {
        let err = AppError::UnsupportedFileType {
            mime: "image/png".into(),
        };
        assert_eq!(
            err.feedback_message(),
            "Erro: Apenas arquivos PDF são permitidos."
        );
    }

    #[test]
    fn clipboard_message_keeps_cause() {
        let err = AppError::Clipboard("permission denied".into());
        assert!(err.feedback_message().ends_with("permission denied"));
    }

    #[test]
    fn only_backend_unavailable_is_fatal() {
        assert!(
            AppError::BackendUnavailable {
                attempts: 50,
                waited: Duration::from_secs(5),
            }
            .is_fatal()
        );
        assert!(!AppError::Extraction("x".into()).is_fatal());
        assert!(!AppError::MalformedResponse("x".into()).is_fatal());
    }
}
