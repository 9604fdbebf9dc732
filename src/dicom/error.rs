use crate::dicom::DicomMetadata;
use thiserror::Error;

/// Failure of one file-processing stage; keeps metadata when it was available
#[derive(Debug, Error)]
pub enum ProcessError {
    /// File could not be opened as DICOM - no metadata available
    #[error("{0:#}")]
    NotADicomFile(anyhow::Error),

    /// Valid DICOM file but the image could not be extracted - no metadata available
    #[error("{0:#}")]
    ExtractionFailed(anyhow::Error),

    /// Image windowed but display failed
    #[error("{error:#}")]
    DisplayFailed {
        metadata: Box<DicomMetadata>,
        error: anyhow::Error,
    },
}

impl ProcessError {
    /// Returns metadata if available (for verbose display before error)
    pub fn metadata(&self) -> Option<&DicomMetadata> {
        match self {
            ProcessError::DisplayFailed { metadata, .. } => Some(metadata),
            _ => None,
        }
    }
}
