use crate::errors::OgrErr;
use crate::spatial_ref::SpatialRef;
use crate::test_utils::roads;
use crate::{assert_almost_eq, Driver, DriverImpl, Envelope, OpenFlags};

use super::{
    caps, DataSource, DataSourceBackend, Feature, FeatureIterator, FieldDefn, FieldType,
    FieldValue, GeomFieldDefn, Geometry, GeometryType, Layer, LayerOptions, MemoryDriver,
};

mod sql;

fn with_layer<F>(ds_name: &str, f: F)
where
    F: FnOnce(&mut Layer),
{
    let mut ds = roads(ds_name);
    let layer = ds.layer_by_name_mut("roads").unwrap();
    f(layer);
}

fn with_features<F>(ds_name: &str, f: F)
where
    F: FnOnce(FeatureIterator),
{
    with_layer(ds_name, |layer| f(layer.features()));
}

fn with_feature<F>(ds_name: &str, fid: u64, f: F)
where
    F: FnOnce(Feature),
{
    with_layer(ds_name, |layer| f(layer.feature(fid).unwrap()));
}

fn kinds(layer: &mut Layer) -> Vec<String> {
    layer
        .features()
        .map(|f| f.field("kind").unwrap().unwrap().into_string().unwrap())
        .collect()
}

#[test]
fn test_layer_count() {
    let ds = roads("test_layer_count");
    assert_eq!(ds.layer_count(), 1);
    assert_eq!(ds.layers().count(), 1);
}

#[test]
fn test_layer_lookup() {
    let ds = roads("test_layer_lookup");
    assert_eq!(ds.layer(0).unwrap().name(), "roads");
    assert_eq!(ds.layer_by_name("roads").unwrap().name(), "roads");

    let err = ds.layer(1).unwrap_err();
    assert_eq!(err.kind(), OgrErr::InvalidHandle);
    let err = ds.layer_by_name("rivers").unwrap_err();
    assert_eq!(err.kind(), OgrErr::InvalidHandle);
}

#[test]
fn test_layer_get_extent() {
    with_layer("test_layer_get_extent", |layer| {
        let extent = layer.get_extent().unwrap();
        assert_almost_eq(extent.min_x, -5.0);
        assert_almost_eq(extent.max_x, 30.0);
        assert_almost_eq(extent.min_y, -5.0);
        assert_almost_eq(extent.max_y, 25.0);
        assert_eq!(layer.try_get_extent(), Some(extent));
    });
}

#[test]
fn test_empty_layer_extent() {
    let mut ds = Driver::new(MemoryDriver)
        .create("test_empty_layer_extent")
        .unwrap();
    let layer = ds.create_layer(Default::default()).unwrap();
    assert!(layer.try_get_extent().is_none());
    let err = layer.get_extent().unwrap_err();
    assert_eq!(err.kind(), OgrErr::Failure);
}

#[test]
fn test_layer_spatial_ref() {
    with_layer("test_layer_spatial_ref", |layer| {
        let srs = layer.spatial_ref().unwrap();
        assert_eq!(srs.auth_code(), Some(4326));
        let geom_srs = layer.defn().geom_field_defn(0).unwrap();
        assert!(geom_srs.spatial_ref().unwrap().is_same_object(srs));
    });
}

#[test]
fn test_layer_capabilities() {
    with_layer("test_layer_capabilities", |layer| {
        assert!(layer.test_capability(caps::layer::RANDOM_READ));
        assert!(layer.test_capability("randomread"));
        assert!(layer.test_capability(caps::layer::SEQUENTIAL_WRITE));
        assert!(!layer.test_capability(caps::layer::TRANSACTIONS));
        assert!(!layer.test_capability("NoSuchCapability"));
    });
}

#[test]
fn test_feature_count() {
    with_layer("test_feature_count", |layer| {
        assert_eq!(layer.feature_count(), 3);
    });
}

#[test]
fn test_feature() {
    with_layer("test_feature", |layer| {
        assert!(layer.feature(0).is_some());
        assert!(layer.feature(2).is_some());
        assert!(layer.feature(3).is_none());
    });
}

#[test]
fn test_iterate_features() {
    with_features("test_iterate_features", |features| {
        assert_eq!(features.count(), 3);
    });
}

#[test]
fn test_fid() {
    with_feature("test_fid", 1, |feature| {
        assert_eq!(feature.fid(), Some(1));
    });
}

#[test]
fn test_string_field() {
    with_feature("test_string_field", 1, |feature| {
        assert_eq!(
            feature.field("kind").unwrap().unwrap().into_string(),
            Some("highway".to_string())
        );
    });
}

#[test]
fn test_null_field() {
    with_feature("test_null_field", 2, |feature| {
        assert_eq!(feature.field("lanes").unwrap(), None);
    });
}

#[test]
fn test_next_feature_and_reset() {
    with_layer("test_next_feature_and_reset", |layer| {
        assert_eq!(layer.next_feature().unwrap().fid(), Some(0));
        assert_eq!(layer.next_feature().unwrap().fid(), Some(1));
        assert_eq!(layer.next_feature().unwrap().fid(), Some(2));
        assert!(layer.next_feature().is_none());
        layer.reset_reading();
        assert_eq!(layer.next_feature().unwrap().fid(), Some(0));
    });
}

#[test]
fn test_spatial_filter() {
    with_layer("test_spatial_filter", |layer| {
        assert!(layer.spatial_filter().is_none());
        layer.set_spatial_filter_rect(-1.0, -1.0, 15.0, 15.0);
        assert_eq!(layer.feature_count(), 1);
        assert_eq!(kinds(layer), ["residential"]);

        // touching boundaries intersect
        layer.set_spatial_filter(&Geometry::point(30.0, 25.0));
        assert_eq!(kinds(layer), ["highway"]);

        // the filter does not apply to random reads nor the extent
        assert!(layer.feature(2).is_some());
        assert_eq!(layer.get_extent().unwrap().min_x, -5.0);

        layer.clear_spatial_filter();
        assert_eq!(layer.feature_count(), 3);
    });
}

#[test]
fn test_create_feature_assigns_fids() {
    with_layer("test_create_feature_assigns_fids", |layer| {
        let fid = layer
            .create_feature(Feature::new(layer.defn()))
            .unwrap();
        assert_eq!(fid, 3);

        let mut feature = Feature::new(layer.defn());
        feature.set_fid(Some(10));
        assert_eq!(layer.create_feature(feature).unwrap(), 10);
        assert_eq!(layer.create_feature(Feature::new(layer.defn())).unwrap(), 11);

        let mut duplicate = Feature::new(layer.defn());
        duplicate.set_fid(Some(10));
        let err = layer.create_feature(duplicate).unwrap_err();
        assert_eq!(err.kind(), OgrErr::Failure);
        assert_eq!(layer.feature_count(), 6);
    });
}

#[test]
fn test_create_feature_checks_slots() {
    with_layer("test_create_feature_checks_slots", |layer| {
        let other = crate::vector::Defn::new("other");
        other
            .add_field_defn(&FieldDefn::new("kind", FieldType::String))
            .unwrap();
        let err = layer.create_feature(Feature::new(&other)).unwrap_err();
        assert_eq!(err.kind(), OgrErr::Failure);
        assert_eq!(layer.feature_count(), 3);
    });
}

#[test]
fn test_create_feature_rebinds_to_layer_schema() {
    with_layer("test_create_feature_rebinds", |layer| {
        let lookalike = layer.defn().duplicate();
        let fid = layer.create_feature(Feature::new(&lookalike)).unwrap();
        assert!(layer.feature(fid).unwrap().defn().ptr_eq(layer.defn()));
        assert_eq!(lookalike.reference_count(), 1);
    });
}

#[test]
fn test_set_and_delete_feature() {
    with_layer("test_set_and_delete_feature", |layer| {
        let mut feature = layer.feature(2).unwrap();
        feature.set_field_integer("lanes", 1).unwrap();
        layer.set_feature(feature).unwrap();
        assert_eq!(
            layer.feature(2).unwrap().field("lanes").unwrap(),
            Some(FieldValue::IntegerValue(1))
        );

        let mut missing = Feature::new(layer.defn());
        missing.set_fid(Some(99));
        let err = layer.set_feature(missing).unwrap_err();
        assert_eq!(err.kind(), OgrErr::NonExistingFeature);

        layer.delete_feature(0).unwrap();
        assert_eq!(layer.feature_count(), 2);
        let err = layer.delete_feature(0).unwrap_err();
        assert_eq!(err.kind(), OgrErr::NonExistingFeature);
    });
}

#[test]
fn test_create_field_remaps_features() {
    with_layer("test_create_field_remaps_features", |layer| {
        let mut width = FieldDefn::new("width", FieldType::Real);
        width.set_precision(2);
        width.add_to_layer(layer).unwrap();

        assert_eq!(layer.defn().field_count(), 3);
        let mut feature = layer.feature(0).unwrap();
        assert_eq!(feature.field_count(), 3);
        assert_eq!(feature.field("width").unwrap(), None);
        feature.set_field_double("width", 7.5).unwrap();
        layer.set_feature(feature).unwrap();
        assert_eq!(
            layer.feature(0).unwrap().field("width").unwrap(),
            Some(FieldValue::RealValue(7.5))
        );
    });
}

#[test]
fn test_delete_field_remaps_features() {
    with_layer("test_delete_field_remaps_features", |layer| {
        layer.delete_field(0).unwrap();
        let feature = layer.feature(1).unwrap();
        assert_eq!(feature.field_count(), 1);
        assert_eq!(feature.field("lanes").unwrap(), Some(FieldValue::IntegerValue(4)));
        assert!(feature.field("kind").is_err());

        let err = layer.delete_field(5).unwrap_err();
        assert_eq!(err.kind(), OgrErr::InvalidHandle);
    });
}

#[test]
fn test_reorder_fields_remaps_features() {
    with_layer("test_reorder_fields_remaps_features", |layer| {
        layer.reorder_fields(&[1, 0]).unwrap();
        let names: Vec<String> = layer.defn().fields().map(|f| f.name().to_string()).collect();
        assert_eq!(names, ["lanes", "kind"]);
        let feature = layer.feature(1).unwrap();
        assert_eq!(
            feature.field_by_index(0).unwrap(),
            Some(FieldValue::IntegerValue(4))
        );

        let err = layer.reorder_fields(&[0, 0]).unwrap_err();
        assert_eq!(err.kind(), OgrErr::Failure);
        let feature = layer.feature(1).unwrap();
        assert_eq!(
            feature.field_by_index(0).unwrap(),
            Some(FieldValue::IntegerValue(4))
        );
    });
}

#[test]
fn test_alter_field_defn_drops_mismatched_values() {
    with_layer("test_alter_field_defn", |layer| {
        let mut lanes = FieldDefn::new("lane_count", FieldType::Integer);
        lanes.set_width(3);
        layer.alter_field_defn(1, &lanes).unwrap();
        assert_eq!(
            layer.feature(0).unwrap().field("lane_count").unwrap(),
            Some(FieldValue::IntegerValue(2))
        );

        layer
            .alter_field_defn(1, &FieldDefn::new("lane_count", FieldType::String))
            .unwrap();
        assert_eq!(layer.feature(0).unwrap().field("lane_count").unwrap(), None);
    });
}

#[test]
fn test_create_geom_field() {
    with_layer("test_create_geom_field", |layer| {
        layer
            .create_geom_field(&GeomFieldDefn::new("centroid", GeometryType::Point))
            .unwrap();
        assert_eq!(layer.defn().geom_field_count(), 2);
        let mut feature = layer.feature(0).unwrap();
        assert_eq!(feature.geom_field_count(), 2);
        feature
            .set_geometry_by_index(1, Geometry::point(5.0, 0.5))
            .unwrap();
        layer.set_feature(feature).unwrap();
        assert!(layer
            .feature(0)
            .unwrap()
            .geometry_by_name("centroid")
            .unwrap()
            .is_some());
    });
}

#[test]
fn test_features_share_the_layer_defn() {
    with_layer("test_features_share_the_layer_defn", |layer| {
        let before = layer.defn().reference_count();
        let feature = layer.feature(0).unwrap();
        assert!(feature.defn().ptr_eq(layer.defn()));
        assert_eq!(layer.defn().reference_count(), before + 1);
        drop(feature);
        assert_eq!(layer.defn().reference_count(), before);
    });
}

#[test]
fn test_create_layer() {
    let mut ds = Driver::new(MemoryDriver).create("test_create_layer").unwrap();
    let srs = SpatialRef::from_epsg(3857);
    let layer = ds
        .create_layer(LayerOptions {
            name: "parcels",
            srs: Some(&srs),
            ty: GeometryType::Polygon,
            options: Some(&["SPATIAL_INDEX=YES"]),
        })
        .unwrap();
    assert_eq!(layer.name(), "parcels");
    assert_eq!(layer.defn().name(), "parcels");
    assert_eq!(layer.geometry_type(), GeometryType::Polygon);
    assert_eq!(
        layer.creation_options().fetch_name_value("SPATIAL_INDEX"),
        Some("YES")
    );

    let layer = ds
        .create_layer(LayerOptions {
            name: "attributes",
            ty: GeometryType::None,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(layer.defn().geom_field_count(), 0);
    assert_eq!(ds.layer_count(), 2);
}

#[test]
fn test_create_layer_duplicate_name() {
    let mut ds = roads("test_create_layer_duplicate_name");
    let err = ds
        .create_layer(LayerOptions {
            name: "roads",
            ..Default::default()
        })
        .unwrap_err();
    assert_eq!(err.kind(), OgrErr::Failure);
    assert_eq!(ds.layer_count(), 1);
}

#[test]
fn test_create_layer_bad_options() {
    let mut ds = roads("test_create_layer_bad_options");
    let err = ds
        .create_layer(LayerOptions {
            name: "rivers",
            options: Some(&["NOT_AN_OPTION"]),
            ..Default::default()
        })
        .unwrap_err();
    assert_eq!(err.kind(), OgrErr::Failure);
    assert_eq!(ds.layer_count(), 1);
}

#[test]
fn test_copy_layer() {
    let source = roads("test_copy_layer_source");
    let mut ds = Driver::new(MemoryDriver).create("test_copy_layer").unwrap();
    let mut filtered = source.layer(0).unwrap().duplicate("filtered");
    filtered.set_spatial_filter_rect(-1.0, -1.0, 15.0, 15.0);

    let copy = ds.copy_layer(&filtered, "copy", None).unwrap();
    assert_eq!(copy.name(), "copy");
    // every feature is copied, whatever the source filter
    assert_eq!(copy.feature_count(), 3);
    assert!(copy.spatial_filter().is_none());
    assert!(copy.defn().is_same(source.layer(0).unwrap().defn()));
    assert!(!copy.defn().ptr_eq(source.layer(0).unwrap().defn()));

    // the copy is independent
    copy.delete_field(0).unwrap();
    assert_eq!(source.layer(0).unwrap().defn().field_count(), 2);
}

#[test]
fn test_duplicate_layer() {
    let mut ds = roads("test_duplicate_layer");
    let copy = ds.duplicate_layer(0, "roads_copy", None).unwrap();
    assert_eq!(copy.feature_count(), 3);
    assert_eq!(ds.layer_count(), 2);

    let err = ds.duplicate_layer(5, "nope", None).unwrap_err();
    assert_eq!(err.kind(), OgrErr::InvalidHandle);
}

#[test]
fn test_delete_layer() {
    let mut ds = roads("test_delete_layer");
    let err = ds.delete_layer(1).unwrap_err();
    assert_eq!(err.kind(), OgrErr::InvalidHandle);
    ds.delete_layer(0).unwrap();
    assert_eq!(ds.layer_count(), 0);
}

#[test]
fn test_data_source_capabilities() {
    let ds = roads("test_data_source_capabilities");
    assert!(ds.is_update());
    assert!(ds.test_capability(caps::dataset::CREATE_LAYER));
    assert!(ds.test_capability(caps::dataset::DELETE_LAYER));
    assert!(!ds.test_capability(caps::dataset::TRANSACTIONS));
    assert_eq!(ds.driver().short_name(), "Memory");
}

#[test]
fn test_read_only_data_source() {
    let driver = Driver::new(MemoryDriver);
    roads("test_read_only_data_source").destroy().unwrap();

    let mut ds = driver
        .open("test_read_only_data_source", OpenFlags::READONLY)
        .unwrap();
    assert!(!ds.is_update());
    assert!(!ds.test_capability(caps::dataset::CREATE_LAYER));
    let err = ds.create_layer(Default::default()).unwrap_err();
    assert_eq!(err.kind(), OgrErr::UnsupportedOperation);
    let err = ds.delete_layer(0).unwrap_err();
    assert_eq!(err.kind(), OgrErr::UnsupportedOperation);

    let layer = ds.layer_mut(0).unwrap();
    assert_eq!(layer.feature_count(), 3);
    assert!(layer.is_read_only());
    assert!(layer.defn().is_schema_locked());
    assert!(layer.test_capability(caps::layer::RANDOM_READ));
    assert!(!layer.test_capability(caps::layer::SEQUENTIAL_WRITE));
    let err = layer.create_feature(Feature::new(layer.defn())).unwrap_err();
    assert_eq!(err.kind(), OgrErr::UnsupportedOperation);
    let err = layer
        .create_field(&FieldDefn::new("x", FieldType::Integer))
        .unwrap_err();
    assert_eq!(err.kind(), OgrErr::UnsupportedOperation);
    let err = layer.defn().delete_field_defn(0).unwrap_err();
    assert_eq!(err.kind(), OgrErr::UnsupportedOperation);
}

#[test]
fn test_update_persists_on_close() {
    let driver = Driver::new(MemoryDriver);
    roads("test_update_persists_on_close").destroy().unwrap();

    {
        let mut ds = driver
            .open("test_update_persists_on_close", OpenFlags::UPDATE)
            .unwrap();
        assert!(ds.is_update());
        let layer = ds.layer_mut(0).unwrap();
        layer.delete_feature(1).unwrap();
    }

    let mut ds = driver
        .open("test_update_persists_on_close", OpenFlags::READONLY)
        .unwrap();
    assert_eq!(ds.layer_mut(0).unwrap().feature_count(), 2);
}

#[test]
fn test_driver_copy_and_delete() {
    let driver = Driver::new(MemoryDriver);
    let source = roads("test_driver_copy_source");
    let copy = driver.copy(&source, "test_driver_copy_target", &[]).unwrap();
    assert_eq!(copy.layer_count(), 1);
    assert_eq!(copy.layer(0).unwrap().feature_count(), 3);
    assert_eq!(copy.name(), "test_driver_copy_target");
    copy.destroy().unwrap();

    assert!(driver
        .open("test_driver_copy_target", OpenFlags::READONLY)
        .is_ok());
    driver.delete("test_driver_copy_target").unwrap();
    let err = driver
        .open("test_driver_copy_target", OpenFlags::READONLY)
        .unwrap_err();
    assert_eq!(err.kind(), OgrErr::Failure);
    let err = driver.delete("test_driver_copy_target").unwrap_err();
    assert_eq!(err.kind(), OgrErr::Failure);
}

struct NoStorage;

impl DataSourceBackend for NoStorage {
    fn sync(&mut self, _name: &str, _layers: &[Layer]) -> crate::errors::Result<()> {
        Ok(())
    }
}

/// A driver that recognises every name but only ever opens read-only.
struct ReadOnlyDriver;

impl DriverImpl for ReadOnlyDriver {
    fn short_name(&self) -> &str {
        "ReadOnly"
    }

    fn open(
        &self,
        driver: &Driver,
        name: &str,
        _flags: crate::OpenFlags,
        _options: &crate::cpl::CslStringList,
    ) -> crate::errors::Result<Option<DataSource>> {
        let mut ds = DataSource::new(name, driver, false, Box::new(NoStorage));
        ds.attach_layer(Layer::new(
            "empty",
            None,
            GeometryType::Point,
            caps::layer::ALL.iter().copied().collect(),
        ));
        Ok(Some(ds))
    }
}

#[test]
fn test_driver_may_refuse_update() {
    let driver = Driver::new(ReadOnlyDriver);
    let ds = driver.open("anything", OpenFlags::UPDATE).unwrap();
    assert!(!ds.is_update());
    assert!(ds.layer(0).unwrap().is_read_only());
    assert_eq!(ds.driver().long_name(), "ReadOnly");

    assert!(!driver.test_capability(caps::driver::CREATE_DATA_SOURCE));
    let err = driver.create("anything").unwrap_err();
    assert_eq!(err.kind(), OgrErr::UnsupportedOperation);
    let err = driver.delete("anything").unwrap_err();
    assert_eq!(err.kind(), OgrErr::UnsupportedOperation);
}

#[test]
fn test_envelope_of_layer_matches_features() {
    with_layer("test_envelope_of_layer_matches_features", |layer| {
        let merged = layer
            .features()
            .filter_map(|f| f.envelope())
            .fold(Envelope::default(), |acc, e| acc.union(&e));
        assert_eq!(Some(merged), layer.try_get_extent());
    });
}

fn points_layer<F>(ds_name: &str, points: &[(f64, f64)], f: F)
where
    F: FnOnce(&mut Layer),
{
    let mut ds = Driver::new(MemoryDriver).create(ds_name).unwrap();
    let layer = ds
        .create_layer(LayerOptions {
            name: "points",
            ty: GeometryType::Point,
            ..Default::default()
        })
        .unwrap();
    for &(x, y) in points {
        layer
            .create_feature_fields(Some(Geometry::point(x, y)), &[], &[])
            .unwrap();
    }
    f(layer);
}

#[test]
fn test_extent_includes_point_at_origin() {
    let expected = Envelope::new(0.0, 0.0, 5.0, 5.0);
    points_layer("test_extent_origin_first", &[(0.0, 0.0), (5.0, 5.0)], |layer| {
        assert_eq!(layer.get_extent().unwrap(), expected);
    });
    points_layer("test_extent_origin_last", &[(5.0, 5.0), (0.0, 0.0)], |layer| {
        assert_eq!(layer.get_extent().unwrap(), expected);
    });
}

#[test]
fn test_feature_envelope_includes_geometry_at_origin() {
    let defn = crate::vector::Defn::new("pair");
    defn.add_geom_field_defn(&GeomFieldDefn::new("a", GeometryType::Point))
        .unwrap();
    defn.add_geom_field_defn(&GeomFieldDefn::new("b", GeometryType::Point))
        .unwrap();
    let mut feature = Feature::new(&defn);
    feature.set_geometry_by_index(0, Geometry::point(0.0, 0.0)).unwrap();
    feature.set_geometry_by_index(1, Geometry::point(5.0, 5.0)).unwrap();
    assert_eq!(feature.envelope(), Some(Envelope::new(0.0, 0.0, 5.0, 5.0)));

    feature.set_geometry_by_index(0, Geometry::point(5.0, 5.0)).unwrap();
    feature.set_geometry_by_index(1, Geometry::point(0.0, 0.0)).unwrap();
    assert_eq!(feature.envelope(), Some(Envelope::new(0.0, 0.0, 5.0, 5.0)));
}

#[test]
fn test_empty_spatial_filter_clears_filter() {
    with_layer("test_empty_spatial_filter_clears_filter", |layer| {
        layer.set_spatial_filter_rect(-1.0, -1.0, 15.0, 15.0);
        assert_eq!(layer.feature_count(), 1);

        let empty = Geometry::from_geo(geo_types::Geometry::GeometryCollection(geo_types::GeometryCollection::<f64>(vec![])));
        layer.set_spatial_filter(&empty);
        assert!(layer.spatial_filter().is_none());
        assert_eq!(layer.feature_count(), 3);
        assert_eq!(layer.features().count(), 3);
    });
}

#[test]
fn test_create_feature_rejects_last_fid() {
    with_layer("test_create_feature_rejects_last_fid", |layer| {
        let mut feature = Feature::new(layer.defn());
        feature.set_fid(Some(u64::MAX));
        let err = layer.create_feature(feature).unwrap_err();
        assert_eq!(err.kind(), OgrErr::Failure);
        assert_eq!(layer.feature_count(), 3);
        assert!(layer.feature(u64::MAX).is_none());
        // fid assignment is unaffected
        assert_eq!(layer.create_feature(Feature::new(layer.defn())).unwrap(), 3);
    });
}

#[test]
fn test_cloned_defn_reference_is_released() {
    with_layer("test_cloned_defn_reference_is_released", |layer| {
        let before = layer.defn().reference_count();
        let defn = layer.defn().clone();
        assert_eq!(layer.defn().reference_count(), before + 1);
        defn.release();
        assert_eq!(layer.defn().reference_count(), before);
    });
}

struct FailingStorage;

impl DataSourceBackend for FailingStorage {
    fn sync(&mut self, _name: &str, _layers: &[Layer]) -> crate::errors::Result<()> {
        Err(crate::errors::OgrError::ogr(OgrErr::Failure, "sync"))
    }
}

#[test]
fn test_failing_sync_is_reported() {
    let driver = Driver::new(MemoryDriver);

    let mut ds = DataSource::new("failing_sync", &driver, true, Box::new(FailingStorage));
    let err = ds.sync().unwrap_err();
    assert_eq!(err.kind(), OgrErr::Failure);
    let err = ds.destroy().unwrap_err();
    assert_eq!(err.kind(), OgrErr::Failure);

    // nothing to flush without update access
    let mut ds = DataSource::new("failing_read_only", &driver, false, Box::new(FailingStorage));
    ds.sync().unwrap();
    ds.destroy().unwrap();

    // dropping only logs the failure
    drop(DataSource::new("failing_drop", &driver, true, Box::new(FailingStorage)));
}
