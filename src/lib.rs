//! A vector feature store catalog: drivers, data sources, layers and reference-counted
//! feature schemas, plus the envelope algebra used for bounding-box filtering.
//!
//! Storage formats plug in through [`DriverImpl`] and
//! [`DataSourceBackend`](vector::DataSourceBackend). The built-in `Memory` driver keeps
//! data sources in memory for the lifetime of the process.
//!
//! ## Use
//!
//! ```
//! use ogr::vector::{FieldType, GeometryType, LayerOptions};
//! use ogr::{DriverManager, Envelope};
//!
//! let driver = DriverManager::get_driver_by_name("Memory").unwrap();
//! let mut ds = driver.create("lib_doc").unwrap();
//! let layer = ds
//!     .create_layer(LayerOptions {
//!         name: "parcels",
//!         ty: GeometryType::Polygon,
//!         ..Default::default()
//!     })
//!     .unwrap();
//! layer.create_defn_fields(&[("owner", FieldType::String)]).unwrap();
//!
//! let defn = layer.defn();
//! assert_eq!(defn.field_count(), 1);
//! assert_eq!(defn.geometry_type(), GeometryType::Polygon);
//!
//! let a = Envelope::new(0.0, 0.0, 2.0, 2.0);
//! let b = Envelope::new(1.0, 1.0, 3.0, 3.0);
//! assert_eq!(a.intersect(&b), Envelope::new(1.0, 1.0, 2.0, 2.0));
//! ```
//!
//! ## Logging
//!
//! Lifecycle events are emitted through [`tracing`]. The crate never installs a subscriber.

#![crate_name = "ogr"]
#![crate_type = "lib"]

pub mod config;
pub mod cpl;
mod driver;
mod envelope;
pub mod errors;
mod options;
pub mod spatial_ref;
pub mod vector;

pub use driver::{Driver, DriverImpl, DriverManager};
pub use envelope::Envelope;
pub use options::{DataSourceOptions, OpenFlags};

#[cfg(test)]
pub(crate) mod test_utils;

#[cfg(test)]
fn assert_almost_eq(a: f64, b: f64) {
    let diff: f64 = b - a;
    assert!(diff.abs() < 1e-9);
}
