use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::vector::FieldType;

/// The flat error taxonomy shared by every catalog, schema and backend operation.
///
/// Backends translate their own failures into one of these conditions. The numeric codes
/// are the ones used by the classic OGR C API, see [`OgrErr::from_code`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OgrErr {
    NotEnoughData,
    NotEnoughMemory,
    UnsupportedGeometryType,
    UnsupportedOperation,
    CorruptData,
    Failure,
    UnsupportedSrs,
    InvalidHandle,
    NonExistingFeature,
    /// Catch-all for codes no other variant covers.
    Undefined,
}

impl OgrErr {
    /// Maps a numeric error code to its condition.
    ///
    /// Returns `None` for `0`, which means success. Unknown codes map to [`OgrErr::Undefined`].
    pub fn from_code(code: i32) -> Option<OgrErr> {
        match code {
            0 => None,
            1 => Some(OgrErr::NotEnoughData),
            2 => Some(OgrErr::NotEnoughMemory),
            3 => Some(OgrErr::UnsupportedGeometryType),
            4 => Some(OgrErr::UnsupportedOperation),
            5 => Some(OgrErr::CorruptData),
            6 => Some(OgrErr::Failure),
            7 => Some(OgrErr::UnsupportedSrs),
            8 => Some(OgrErr::InvalidHandle),
            9 => Some(OgrErr::NonExistingFeature),
            _ => Some(OgrErr::Undefined),
        }
    }

    /// The numeric code of this condition. [`OgrErr::Undefined`] has no code of its own and
    /// reports `-1`.
    pub fn code(self) -> i32 {
        match self {
            OgrErr::NotEnoughData => 1,
            OgrErr::NotEnoughMemory => 2,
            OgrErr::UnsupportedGeometryType => 3,
            OgrErr::UnsupportedOperation => 4,
            OgrErr::CorruptData => 5,
            OgrErr::Failure => 6,
            OgrErr::UnsupportedSrs => 7,
            OgrErr::InvalidHandle => 8,
            OgrErr::NonExistingFeature => 9,
            OgrErr::Undefined => -1,
        }
    }
}

impl Display for OgrErr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            OgrErr::NotEnoughData => "Not Enough Data Error",
            OgrErr::NotEnoughMemory => "Not Enough Memory Error",
            OgrErr::UnsupportedGeometryType => "Unsupported Geometry Type Error",
            OgrErr::UnsupportedOperation => "Unsupported Operation Error",
            OgrErr::CorruptData => "Corrupt Data Error",
            OgrErr::Failure => "OGR Failure Error",
            OgrErr::UnsupportedSrs => "Unsupported SRS Error",
            OgrErr::InvalidHandle => "Invalid Handle Error",
            OgrErr::NonExistingFeature => "Non Existing Feature Error",
            OgrErr::Undefined => "Undefined Error",
        };
        f.write_str(msg)
    }
}

#[derive(Clone, Debug, Error)]
pub enum OgrError {
    #[error("OGR method '{method_name}' returned error: '{err}'")]
    OgrError {
        err: OgrErr,
        method_name: &'static str,
    },
    #[error("Invalid field name '{field_name}' used on method {method_name}")]
    InvalidFieldName {
        field_name: String,
        method_name: &'static str,
    },
    #[error("Invalid field index {index} used on method {method_name}")]
    InvalidFieldIndex {
        index: usize,
        method_name: &'static str,
    },
    #[error("Invalid layer index {index} used on method {method_name}")]
    InvalidLayerIndex {
        index: usize,
        method_name: &'static str,
    },
    #[error("Invalid layer name '{name}' used on method {method_name}")]
    InvalidLayerName {
        name: String,
        method_name: &'static str,
    },
    #[error("Invalid driver index {0}")]
    InvalidDriverIndex(usize),
    #[error("No driver registered under the name '{0}'")]
    InvalidDriverName(String),
    #[error("Handle is stale or was never issued, used on method {method_name}")]
    StaleHandle { method_name: &'static str },
    #[error("Field '{field_name}' holds values of type {expected}, used on method {method_name}")]
    FieldTypeMismatch {
        field_name: String,
        expected: FieldType,
        method_name: &'static str,
    },
    #[error(
        "Feature has {actual} slots but the schema has {expected}, used on method {method_name}"
    )]
    SchemaMismatch {
        expected: usize,
        actual: usize,
        method_name: &'static str,
    },
    #[error("No registered driver could open '{name}'")]
    OpenFailed { name: String },
    #[error("Bad argument: {0}")]
    BadArgument(String),
}

impl OgrError {
    /// Shorthand for the [`OgrError::OgrError`] variant.
    pub(crate) fn ogr(err: OgrErr, method_name: &'static str) -> OgrError {
        OgrError::OgrError { err, method_name }
    }

    /// The condition of the flat taxonomy this error reports.
    pub fn kind(&self) -> OgrErr {
        match self {
            OgrError::OgrError { err, .. } => *err,
            OgrError::InvalidFieldName { .. }
            | OgrError::InvalidFieldIndex { .. }
            | OgrError::InvalidLayerIndex { .. }
            | OgrError::InvalidLayerName { .. }
            | OgrError::InvalidDriverIndex(_)
            | OgrError::InvalidDriverName(_)
            | OgrError::StaleHandle { .. } => OgrErr::InvalidHandle,
            OgrError::FieldTypeMismatch { .. }
            | OgrError::SchemaMismatch { .. }
            | OgrError::OpenFailed { .. }
            | OgrError::BadArgument(_) => OgrErr::Failure,
        }
    }
}

pub type Result<T> = std::result::Result<T, OgrError>;
