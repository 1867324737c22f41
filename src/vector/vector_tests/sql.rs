use std::collections::HashSet;

use crate::errors::{OgrErr, OgrError, Result};
use crate::test_utils::roads;
use crate::vector::{caps, sql, DataSource, DataSourceBackend, Geometry, Layer, LayerOptions};
use crate::Driver;

/// Understands `SELECT * FROM <layer> [WHERE kind = '<value>']`; any other statement runs
/// without a result set.
struct SelectBackend;

impl DataSourceBackend for SelectBackend {
    fn sync(&mut self, _name: &str, _layers: &[Layer]) -> Result<()> {
        Ok(())
    }

    fn execute_sql(
        &self,
        statement: &str,
        layers: &[Layer],
        dialect: &str,
    ) -> Result<Option<Layer>> {
        if dialect == sql::Dialect::SQLITE.as_str() {
            return Err(OgrError::ogr(OgrErr::UnsupportedOperation, "execute_sql"));
        }
        let Some(rest) = statement.strip_prefix("SELECT * FROM ") else {
            return Ok(None);
        };
        let (table, kind) = match rest.split_once(" WHERE kind = ") {
            Some((table, kind)) => (table, Some(kind.trim_matches('\''))),
            None => (rest, None),
        };
        let source = layers
            .iter()
            .find(|l| l.name() == table)
            .ok_or(OgrError::ogr(OgrErr::Failure, "execute_sql"))?;

        let mut result = source.duplicate("result");
        if let Some(kind) = kind {
            let rejected: Vec<u64> = result
                .features()
                .filter(|f| {
                    let value = f.field("kind").ok().flatten();
                    value.and_then(|v| v.into_string()).as_deref() != Some(kind)
                })
                .filter_map(|f| f.fid())
                .collect();
            for fid in rejected {
                result.delete_feature(fid)?;
            }
        }
        Ok(Some(result))
    }
}

fn with_roads<F>(f: F)
where
    F: FnOnce(&DataSource),
{
    let driver = Driver::new(crate::vector::MemoryDriver);
    let mut ds = DataSource::new("sql_roads", &driver, true, Box::new(SelectBackend))
        .with_capabilities(
            [caps::dataset::CREATE_LAYER].into_iter().collect(),
            caps::layer::ALL.iter().copied().collect(),
        );
    let fixture = roads("sql_roads_fixture");
    ds.copy_layer(fixture.layer(0).unwrap(), "roads", None).unwrap();
    f(&ds);
}

#[test]
fn test_sql() {
    with_roads(|ds| {
        let query = "SELECT * FROM roads WHERE kind = 'highway'";
        let mut result_set = ds
            .execute_sql(query, None, sql::Dialect::DEFAULT)
            .unwrap()
            .unwrap();

        let field_names: HashSet<_> = result_set
            .defn()
            .fields()
            .map(|field| field.name().to_string())
            .collect();
        let correct_field_names: HashSet<_> =
            ["kind", "lanes"].iter().map(|s| s.to_string()).collect();
        assert_eq!(correct_field_names, field_names);
        assert_eq!(1, result_set.feature_count());

        for feature in result_set.features() {
            let kind = feature
                .field("kind")
                .unwrap()
                .unwrap()
                .into_string()
                .unwrap();
            assert_eq!("highway", kind);
        }
    });
}

#[test]
fn test_sql_with_spatial_filter() {
    with_roads(|ds| {
        let bbox = Geometry::bbox(-10.0, -10.0, 5.0, 5.0);
        let mut result_set = ds
            .execute_sql("SELECT * FROM roads", Some(&bbox), sql::Dialect::OGR)
            .unwrap()
            .unwrap();
        assert!(result_set.spatial_filter().is_some());
        assert_eq!(2, result_set.feature_count());

        let fids: HashSet<u64> = result_set.features().filter_map(|f| f.fid()).collect();
        assert_eq!(fids, HashSet::from([0, 2]));
    });
}

#[test]
fn test_sql_with_empty_spatial_filter() {
    with_roads(|ds| {
        let empty = Geometry::from_geo(geo_types::Geometry::GeometryCollection(geo_types::GeometryCollection::<f64>(vec![])));
        assert!(empty.is_empty());
        let mut result_set = ds
            .execute_sql("SELECT * FROM roads", Some(&empty), sql::Dialect::DEFAULT)
            .unwrap()
            .unwrap();
        assert!(result_set.spatial_filter().is_none());
        assert_eq!(3, result_set.feature_count());
        assert_eq!(3, result_set.features().count());
    });
}

#[test]
fn test_sql_result_set_is_read_only() {
    with_roads(|ds| {
        let mut result_set = ds
            .execute_sql("SELECT * FROM roads", None, sql::Dialect::DEFAULT)
            .unwrap()
            .unwrap();
        assert!(result_set.is_read_only());
        assert!(result_set.defn().is_schema_locked());
        assert!(!result_set.test_capability(caps::layer::DELETE_FEATURE));
        let err = result_set.delete_feature(0).unwrap_err();
        assert_eq!(err.kind(), OgrErr::UnsupportedOperation);
        ds.release_result_set(result_set);

        // the source layer is untouched
        assert_eq!(ds.layer(0).unwrap().feature_count(), 3);
        assert!(!ds.layer(0).unwrap().is_read_only());
    });
}

#[test]
fn test_sql_without_result_set() {
    with_roads(|ds| {
        let result = ds
            .execute_sql("CREATE INDEX ON roads USING kind", None, sql::Dialect::DEFAULT)
            .unwrap();
        assert!(result.is_none());
    });
}

#[test]
fn test_sql_errors() {
    with_roads(|ds| {
        let err = ds
            .execute_sql("SELECT * FROM rivers", None, sql::Dialect::DEFAULT)
            .unwrap_err();
        assert_eq!(err.kind(), OgrErr::Failure);

        let err = ds
            .execute_sql("SELECT * FROM roads", None, sql::Dialect::SQLITE)
            .unwrap_err();
        assert_eq!(err.kind(), OgrErr::UnsupportedOperation);
    });
}

#[test]
fn test_sql_unsupported_by_backend() {
    let mut ds = Driver::new(crate::vector::MemoryDriver)
        .create("test_sql_unsupported_by_backend")
        .unwrap();
    ds.create_layer(LayerOptions {
        name: "empty",
        ..Default::default()
    })
    .unwrap();
    let err = ds
        .execute_sql("SELECT * FROM empty", None, sql::Dialect::DEFAULT)
        .unwrap_err();
    assert_eq!(err.kind(), OgrErr::UnsupportedOperation);
}

#[test]
fn test_dialect_names() {
    assert_eq!(sql::Dialect::default(), sql::Dialect::DEFAULT);
    assert_eq!(sql::Dialect::DEFAULT.as_str(), "");
    assert_eq!(sql::Dialect::OGR.as_str(), "OGRSQL");
    assert_eq!(sql::Dialect::SQLITE.as_str(), "SQLITE");
}
