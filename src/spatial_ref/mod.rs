//! Spatial references
//!
//! Coordinate system definitions live in an external subsystem. The catalog only holds
//! shared references to them and compares them by identity.

mod srs;

pub use srs::SpatialRef;
