use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::errors::*;

/// A shared, opaque spatial reference.
///
/// Cloning a `SpatialRef` shares the same underlying reference. The definition string is
/// carried verbatim and never parsed beyond [`SpatialRef::auth_code`].
///
/// ```
/// use ogr::spatial_ref::SpatialRef;
///
/// let wgs84 = SpatialRef::from_epsg(4326);
/// let alias = wgs84.clone();
/// assert!(wgs84.is_same_object(&alias));
/// assert!(!wgs84.is_same_object(&SpatialRef::from_epsg(4326)));
/// ```
#[derive(Clone)]
pub struct SpatialRef {
    inner: Arc<SrsDefinition>,
}

struct SrsDefinition {
    definition: String,
}

impl SpatialRef {
    /// Wraps a user supplied definition (WKT, PROJ string, `AUTHORITY:CODE`, ...).
    pub fn from_definition(definition: &str) -> Result<SpatialRef> {
        if definition.trim().is_empty() {
            return Err(OgrError::ogr(OgrErr::UnsupportedSrs, "from_definition"));
        }
        Ok(SpatialRef {
            inner: Arc::new(SrsDefinition {
                definition: definition.to_string(),
            }),
        })
    }

    pub fn from_epsg(epsg_code: u32) -> SpatialRef {
        SpatialRef {
            inner: Arc::new(SrsDefinition {
                definition: format!("EPSG:{}", epsg_code),
            }),
        }
    }

    pub fn definition(&self) -> &str {
        &self.inner.definition
    }

    /// The code of an `EPSG:<code>` definition.
    pub fn auth_code(&self) -> Option<u32> {
        let (authority, code) = self.inner.definition.split_once(':')?;
        if !authority.eq_ignore_ascii_case("EPSG") {
            return None;
        }
        code.trim().parse().ok()
    }

    /// Identity comparison: `true` only for references to the same definition object.
    pub fn is_same_object(&self, other: &SpatialRef) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Debug for SpatialRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SpatialRef")
            .field(&self.inner.definition)
            .finish()
    }
}
