use geo_types::line_string;

use crate::spatial_ref::SpatialRef;
use crate::vector::{
    DataSource, FieldType, FieldValue, Geometry, GeometryType, LayerOptions, MemoryDriver,
};
use crate::Driver;

/// An updatable Memory data source called `name` with a single `roads` layer of three
/// line strings:
///
/// | fid | kind        | lanes | extent                    |
/// |-----|-------------|-------|---------------------------|
/// | 0   | residential | 2     | (0, 0) - (10, 1)          |
/// | 1   | highway     | 4     | (20, 20) - (30, 25)       |
/// | 2   | pedestrian  | null  | (-5, -5) - (-1, -2)       |
///
/// The driver is not taken from the registry, so tests using it do not depend on what is
/// registered.
pub(crate) fn roads(name: &str) -> DataSource {
    let mut ds = Driver::new(MemoryDriver).create(name).unwrap();
    let srs = SpatialRef::from_epsg(4326);
    let layer = ds
        .create_layer(LayerOptions {
            name: "roads",
            srs: Some(&srs),
            ty: GeometryType::LineString,
            ..Default::default()
        })
        .unwrap();
    layer
        .create_defn_fields(&[("kind", FieldType::String), ("lanes", FieldType::Integer)])
        .unwrap();

    let rows = [
        (
            line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 1.0)],
            "residential",
            Some(2),
        ),
        (
            line_string![(x: 20.0, y: 25.0), (x: 30.0, y: 20.0)],
            "highway",
            Some(4),
        ),
        (
            line_string![(x: -5.0, y: -2.0), (x: -1.0, y: -5.0)],
            "pedestrian",
            None,
        ),
    ];
    for (geometry, kind, lanes) in rows {
        let mut names = vec!["kind"];
        let mut values = vec![FieldValue::StringValue(kind.to_string())];
        if let Some(lanes) = lanes {
            names.push("lanes");
            values.push(FieldValue::IntegerValue(lanes));
        }
        layer
            .create_feature_fields(Some(Geometry::from_geo(geometry.into())), &names, &values)
            .unwrap();
    }
    ds
}
