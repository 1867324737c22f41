use std::ops::{Deref, DerefMut};

use crate::errors::*;
use crate::vector::{DataSource, Geometry, Layer};

/// The result of a SQL query executed by
/// [`DataSource::execute_sql()`](DataSource::execute_sql()). It is just a thin wrapper around
/// a read-only [`Layer`], and you can treat it as such.
///
/// A result set borrows the data source it came from, so it is always released before the
/// data source is closed. It is released when dropped, or explicitly through
/// [`DataSource::release_result_set`].
#[derive(Debug)]
pub struct ResultSet<'a> {
    pub(crate) layer: Layer,
    pub(crate) dataset: &'a DataSource,
}

impl Deref for ResultSet<'_> {
    type Target = Layer;

    fn deref(&self) -> &Self::Target {
        &self.layer
    }
}

impl DerefMut for ResultSet<'_> {
    fn deref_mut(&mut self) -> &mut <Self as Deref>::Target {
        &mut self.layer
    }
}

impl Drop for ResultSet<'_> {
    fn drop(&mut self) {
        tracing::debug!(
            data_source = %self.dataset.name(),
            layer = %self.layer.name(),
            "result set released"
        );
    }
}

/// Represents valid SQL dialects to use in SQL queries.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Use the default dialect. This is OGR SQL unless the backend has a native dialect.
    #[default]
    DEFAULT,

    /// Explicitly choose OGR SQL regardless of if the backend has a native dialect.
    OGR,

    /// SQLite dialect.
    SQLITE,
}

impl Dialect {
    /// The dialect name handed to the backend. Empty for [`Dialect::DEFAULT`].
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::DEFAULT => "",
            Dialect::OGR => "OGRSQL",
            Dialect::SQLITE => "SQLITE",
        }
    }
}

/// [DataSource] methods relating to SQL.
impl DataSource {
    /// Execute a SQL query against the data source. Returns a [`ResultSet`], which can be
    /// treated just as any other [`Layer`].
    ///
    /// Queries such as `ALTER TABLE`, `CREATE INDEX`, etc. have no [`ResultSet`], and return
    /// `None`, which is distinct from an empty [`ResultSet`].
    ///
    /// # Arguments
    /// * `query`: The SQL query
    /// * `spatial_filter`: Limit results of the query to features that intersect the given
    ///   [`Geometry`]. An empty geometry applies no filter
    /// * `dialect`: The dialect of SQL to use
    ///
    /// Backends that cannot run SQL fail with
    /// [`OgrErr::UnsupportedOperation`](crate::errors::OgrErr::UnsupportedOperation).
    pub fn execute_sql(
        &self,
        query: &str,
        spatial_filter: Option<&Geometry>,
        dialect: Dialect,
    ) -> Result<Option<ResultSet<'_>>> {
        tracing::debug!(
            data_source = %self.name(),
            query,
            dialect = dialect.as_str(),
            "execute sql"
        );
        let result = self
            .backend()
            .execute_sql(query, self.layer_slice(), dialect.as_str())?;
        let Some(mut layer) = result else {
            return Ok(None);
        };
        layer.set_read_only(true);
        if let Some(geometry) = spatial_filter {
            layer.set_spatial_filter(geometry);
        }
        Ok(Some(ResultSet {
            layer,
            dataset: self,
        }))
    }

    /// Release a result set. Equivalent to dropping it.
    pub fn release_result_set(&self, result_set: ResultSet<'_>) {
        drop(result_set);
    }
}
