//! Vector catalog
//!
//! Data sources own layers, layers hold features, and every feature shares the [`Defn`]
//! (schema) of the layer it came from.
//!
//! ## Reading and writing
//!
//! ```
//! use ogr::vector::{FieldDefn, FieldType, FieldValue, Geometry, GeometryType, LayerOptions};
//! use ogr::DriverManager;
//!
//! let driver = DriverManager::get_driver_by_name("Memory").unwrap();
//! let mut ds = driver.create("vector_doc").unwrap();
//! let layer = ds
//!     .create_layer(LayerOptions {
//!         name: "roads",
//!         ty: GeometryType::LineString,
//!         ..Default::default()
//!     })
//!     .unwrap();
//! layer.create_field(&FieldDefn::new("highway", FieldType::String)).unwrap();
//! layer
//!     .create_feature_fields(
//!         Some(Geometry::bbox(26.10, 44.42, 26.11, 44.43)),
//!         &["highway"],
//!         &[FieldValue::StringValue("pedestrian".to_string())],
//!     )
//!     .unwrap();
//!
//! let layer = ds.layer_mut(0).unwrap();
//! for feature in layer.features() {
//!     let highway = feature.field("highway").unwrap().unwrap();
//!     let extent = feature.geometry().unwrap().envelope();
//!     println!("{} {:?}", highway.into_string().unwrap(), extent);
//! }
//! ```

pub use dataset::{DataSource, DataSourceBackend};
pub use defn::{Defn, FieldDefn, GeomFieldDefn};
pub use feature::{Feature, FieldValue};
pub use geometry::Geometry;
pub use layer::{FeatureIterator, Layer};
pub use memory::MemoryDriver;
pub use options::LayerOptions;
pub use shared::{SharedDataSource, SharedId};
pub use sql::{Dialect, ResultSet};
pub use types::{FieldType, GeometryType, Justification};

pub mod caps;
mod dataset;
mod defn;
mod feature;
mod geometry;
mod layer;
pub(crate) mod memory;
mod options;
mod shared;
pub mod sql;
mod types;

#[cfg(test)]
mod vector_tests;
