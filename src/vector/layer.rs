use std::collections::BTreeMap;
use std::ops::Bound;

use crate::cpl::CslStringList;
use crate::envelope::Envelope;
use crate::errors::*;
use crate::spatial_ref::SpatialRef;
use crate::vector::caps::{self, Capabilities};
use crate::vector::defn::check_permutation;
use crate::vector::{
    Defn, Feature, FieldDefn, FieldType, FieldValue, GeomFieldDefn, Geometry, GeometryType,
};

/// Capabilities a read-only layer never reports.
const WRITE_CAPABILITIES: &[&str] = &[
    caps::layer::SEQUENTIAL_WRITE,
    caps::layer::RANDOM_WRITE,
    caps::layer::CREATE_FIELD,
    caps::layer::DELETE_FIELD,
    caps::layer::REORDER_FIELDS,
    caps::layer::ALTER_FIELD_DEFN,
    caps::layer::DELETE_FEATURE,
    caps::layer::CREATE_GEOM_FIELD,
    caps::layer::TRANSACTIONS,
];

/// Layer in a vector data source
///
/// A layer stores features keyed by their fid, in fid order. Its schema is a [`Defn`] the
/// layer holds one reference on; features read from the layer share it.
///
/// ```
/// use ogr::vector::{caps, FieldType, FieldValue, Geometry, GeometryType, Layer};
///
/// let mut layer = Layer::new(
///     "cities",
///     None,
///     GeometryType::Point,
///     caps::layer::ALL.iter().copied().collect(),
/// );
/// layer.create_defn_fields(&[("name", FieldType::String)]).unwrap();
/// layer
///     .create_feature_fields(
///         Some(Geometry::point(2.35, 48.85)),
///         &["name"],
///         &[FieldValue::StringValue("Paris".to_string())],
///     )
///     .unwrap();
///
/// for feature in layer.features() {
///     let name = feature.field("name").unwrap().unwrap().into_string().unwrap();
///     assert_eq!(name, "Paris");
/// }
/// ```
#[derive(Debug)]
pub struct Layer {
    name: String,
    defn: Defn,
    spatial_ref: Option<SpatialRef>,
    features: BTreeMap<u64, Feature>,
    next_fid: u64,
    cursor: Option<u64>,
    spatial_filter: Option<Geometry>,
    capabilities: Capabilities,
    read_only: bool,
    creation_options: CslStringList,
}

impl Layer {
    /// Creates an empty layer. A geometry type other than [`GeometryType::None`] gives the
    /// layer one unnamed geometry field in `spatial_ref`.
    pub fn new(
        name: &str,
        spatial_ref: Option<&SpatialRef>,
        geometry_type: GeometryType,
        capabilities: Capabilities,
    ) -> Layer {
        let defn = Defn::new(name);
        if geometry_type != GeometryType::None {
            let mut geom_field = GeomFieldDefn::new("", geometry_type);
            geom_field.set_spatial_ref(spatial_ref.cloned());
            // a new definition is never locked
            let _ = defn.add_geom_field_defn(&geom_field);
        }
        Layer::with_defn(name, defn, spatial_ref.cloned(), capabilities)
    }

    /// Takes over the reference held by `defn`.
    fn with_defn(
        name: &str,
        defn: Defn,
        spatial_ref: Option<SpatialRef>,
        capabilities: Capabilities,
    ) -> Layer {
        Layer {
            name: name.to_string(),
            defn,
            spatial_ref,
            features: BTreeMap::new(),
            next_fid: 0,
            cursor: None,
            spatial_filter: None,
            capabilities,
            read_only: false,
            creation_options: CslStringList::new(),
        }
    }

    /// A writable copy named `name`, with an independent schema and all features.
    ///
    /// The spatial filter is not copied, and every feature is copied regardless of it.
    pub fn duplicate(&self, name: &str) -> Layer {
        let defn = self.defn.duplicate();
        defn.set_name(name);
        let mut copy = Layer::with_defn(
            name,
            defn,
            self.spatial_ref.clone(),
            self.capabilities.clone(),
        );
        for (&fid, feature) in &self.features {
            let mut feature = feature.clone();
            feature.rebind(&copy.defn);
            copy.features.insert(fid, feature);
        }
        copy.next_fid = self.next_fid;
        copy.creation_options = self.creation_options.clone();
        copy
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The layer's schema.
    ///
    /// Cloning the returned [`Defn`] takes a counted reference; give it back with
    /// [`Defn::release`] once done.
    pub fn defn(&self) -> &Defn {
        &self.defn
    }

    pub fn spatial_ref(&self) -> Option<&SpatialRef> {
        self.spatial_ref.as_ref()
    }

    /// Geometry type of the first geometry field.
    pub fn geometry_type(&self) -> GeometryType {
        self.defn.geometry_type()
    }

    /// The options the layer was created with.
    pub fn creation_options(&self) -> &CslStringList {
        &self.creation_options
    }

    pub(crate) fn set_creation_options(&mut self, options: CslStringList) {
        self.creation_options = options;
    }

    pub(crate) fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Read-only layers lock their schema.
    pub(crate) fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        self.defn.set_schema_locked(read_only);
    }

    /// Test if this layer supports the named capability, see [`caps::layer`].
    pub fn test_capability(&self, capability: &str) -> bool {
        if self.read_only
            && WRITE_CAPABILITIES
                .iter()
                .any(|c| c.eq_ignore_ascii_case(capability))
        {
            return false;
        }
        self.capabilities.contains(capability)
    }

    fn check_capability(&self, capability: &str, method_name: &'static str) -> Result<()> {
        if self.test_capability(capability) {
            Ok(())
        } else {
            Err(OgrError::ogr(OgrErr::UnsupportedOperation, method_name))
        }
    }

    /// Returns an iterator over the features passing the spatial filter.
    ///
    /// Reading restarts from the first feature.
    pub fn features(&mut self) -> FeatureIterator<'_> {
        self.reset_reading();
        FeatureIterator { layer: self }
    }

    /// Fetch the next feature passing the spatial filter, advancing the read cursor.
    pub fn next_feature(&mut self) -> Option<Feature> {
        let start = match self.cursor {
            Some(fid) => Bound::Excluded(fid),
            None => Bound::Unbounded,
        };
        let filter = self.filter_envelope();
        let (&fid, feature) = self
            .features
            .range((start, Bound::Unbounded))
            .find(|(_, f)| passes(filter.as_ref(), f))?;
        self.cursor = Some(fid);
        Some(feature.clone())
    }

    /// Reset the read cursor to the first feature.
    pub fn reset_reading(&mut self) {
        self.cursor = None;
    }

    /// Fetch a feature by fid. The spatial filter does not apply.
    pub fn feature(&self, fid: u64) -> Option<Feature> {
        self.features.get(&fid).cloned()
    }

    /// Number of features passing the spatial filter.
    pub fn feature_count(&self) -> u64 {
        let filter = self.filter_envelope();
        self.features
            .values()
            .filter(|f| passes(filter.as_ref(), f))
            .count() as u64
    }

    /// Extent of all feature geometries, ignoring the spatial filter.
    ///
    /// Fails with [`OgrErr::Failure`] when no feature has a geometry.
    pub fn get_extent(&self) -> Result<Envelope> {
        self.try_get_extent()
            .ok_or(OgrError::ogr(OgrErr::Failure, "get_extent"))
    }

    /// Like [`Layer::get_extent`], returning `None` when no feature has a geometry.
    pub fn try_get_extent(&self) -> Option<Envelope> {
        self.features
            .values()
            .filter_map(Feature::envelope)
            .reduce(|a, b| a.cover(&b))
    }

    /// Only return features whose extent intersects the extent of `geometry`.
    ///
    /// An empty geometry clears the filter. Resets reading.
    pub fn set_spatial_filter(&mut self, geometry: &Geometry) {
        self.spatial_filter = if geometry.is_empty() {
            None
        } else {
            Some(geometry.clone())
        };
        self.reset_reading();
    }

    /// Set a rectangular spatial filter.
    pub fn set_spatial_filter_rect(&mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) {
        self.set_spatial_filter(&Geometry::bbox(min_x, min_y, max_x, max_y));
    }

    pub fn clear_spatial_filter(&mut self) {
        self.spatial_filter = None;
        self.reset_reading();
    }

    pub fn spatial_filter(&self) -> Option<&Geometry> {
        self.spatial_filter.as_ref()
    }

    fn filter_envelope(&self) -> Option<Envelope> {
        self.spatial_filter.as_ref().and_then(Geometry::extent)
    }

    /// Store a new feature and return its fid.
    ///
    /// A feature without fid gets the next free one. The feature must have one slot per
    /// field and per geometry field of this layer's schema.
    pub fn create_feature(&mut self, mut feature: Feature) -> Result<u64> {
        self.check_capability(caps::layer::SEQUENTIAL_WRITE, "create_feature")?;
        self.check_slots(&feature, "create_feature")?;
        let fid = match feature.fid() {
            Some(fid) if self.features.contains_key(&fid) => {
                return Err(OgrError::ogr(OgrErr::Failure, "create_feature"));
            }
            Some(fid) => fid,
            None => self.next_fid,
        };
        let next = fid
            .checked_add(1)
            .ok_or(OgrError::ogr(OgrErr::Failure, "create_feature"))?;
        self.next_fid = self.next_fid.max(next);
        feature.set_fid(Some(fid));
        if !feature.defn().ptr_eq(&self.defn) {
            feature.rebind(&self.defn);
        }
        self.features.insert(fid, feature);
        Ok(fid)
    }

    /// Replace the stored feature with the same fid.
    pub fn set_feature(&mut self, mut feature: Feature) -> Result<()> {
        self.check_capability(caps::layer::RANDOM_WRITE, "set_feature")?;
        self.check_slots(&feature, "set_feature")?;
        let fid = feature
            .fid()
            .filter(|fid| self.features.contains_key(fid))
            .ok_or(OgrError::ogr(OgrErr::NonExistingFeature, "set_feature"))?;
        if !feature.defn().ptr_eq(&self.defn) {
            feature.rebind(&self.defn);
        }
        self.features.insert(fid, feature);
        Ok(())
    }

    pub fn delete_feature(&mut self, fid: u64) -> Result<()> {
        self.check_capability(caps::layer::DELETE_FEATURE, "delete_feature")?;
        self.features
            .remove(&fid)
            .map(|_| ())
            .ok_or(OgrError::ogr(OgrErr::NonExistingFeature, "delete_feature"))
    }

    fn check_slots(&self, feature: &Feature, method_name: &'static str) -> Result<()> {
        let expected = self.defn.field_count() + self.defn.geom_field_count();
        let actual = feature.field_count() + feature.geom_field_count();
        if feature.field_count() != self.defn.field_count()
            || feature.geom_field_count() != self.defn.geom_field_count()
        {
            return Err(OgrError::SchemaMismatch {
                expected,
                actual,
                method_name,
            });
        }
        Ok(())
    }

    /// Create a feature from a geometry and named field values. Returns the new fid.
    pub fn create_feature_fields(
        &mut self,
        geometry: Option<Geometry>,
        field_names: &[&str],
        values: &[FieldValue],
    ) -> Result<u64> {
        let mut feature = Feature::new(&self.defn);
        if let Some(geometry) = geometry {
            feature.set_geometry(geometry)?;
        }
        for (field, value) in field_names.iter().zip(values) {
            feature.set_field(field, value)?;
        }
        self.create_feature(feature)
    }

    /// Add fields from `(name, type)` pairs.
    pub fn create_defn_fields(&mut self, fields_def: &[(&str, FieldType)]) -> Result<()> {
        for &(name, ty) in fields_def {
            self.create_field(&FieldDefn::new(name, ty))?;
        }
        Ok(())
    }

    /// Append a field to the schema. Stored features get a null value for it.
    pub fn create_field(&mut self, field: &FieldDefn) -> Result<()> {
        self.check_capability(caps::layer::CREATE_FIELD, "create_field")?;
        self.defn.add_field_defn(field)?;
        for feature in self.features.values_mut() {
            feature.push_field_slot();
        }
        Ok(())
    }

    pub fn delete_field(&mut self, idx: usize) -> Result<()> {
        self.check_capability(caps::layer::DELETE_FIELD, "delete_field")?;
        self.defn.delete_field_defn(idx)?;
        for feature in self.features.values_mut() {
            feature.remove_field_slot(idx);
        }
        Ok(())
    }

    /// Reorder the fields, see [`Defn::reorder_field_defns`].
    pub fn reorder_fields(&mut self, new_order: &[usize]) -> Result<()> {
        self.check_capability(caps::layer::REORDER_FIELDS, "reorder_fields")?;
        check_permutation(new_order, self.defn.field_count(), "reorder_fields")?;
        self.defn.reorder_field_defns(new_order)?;
        for feature in self.features.values_mut() {
            feature.reorder_field_slots(new_order);
        }
        Ok(())
    }

    /// Replace a field definition. Stored values that no longer fit the type become null.
    pub fn alter_field_defn(&mut self, idx: usize, field: &FieldDefn) -> Result<()> {
        self.check_capability(caps::layer::ALTER_FIELD_DEFN, "alter_field_defn")?;
        self.defn.alter_field_defn(idx, field)?;
        for feature in self.features.values_mut() {
            feature.retype_field_slot(idx, field.field_type());
        }
        Ok(())
    }

    pub fn create_geom_field(&mut self, field: &GeomFieldDefn) -> Result<()> {
        self.check_capability(caps::layer::CREATE_GEOM_FIELD, "create_geom_field")?;
        self.defn.add_geom_field_defn(field)?;
        for feature in self.features.values_mut() {
            feature.push_geom_slot();
        }
        Ok(())
    }
}

impl Drop for Layer {
    fn drop(&mut self) {
        self.defn.drop_reference();
    }
}

fn passes(filter: Option<&Envelope>, feature: &Feature) -> bool {
    match filter {
        None => true,
        Some(filter) => feature
            .envelope()
            .is_some_and(|extent| extent.intersects(filter)),
    }
}

/// Iterator over the features of a [`Layer`], see [`Layer::features`].
pub struct FeatureIterator<'a> {
    layer: &'a mut Layer,
}

impl Iterator for FeatureIterator<'_> {
    type Item = Feature;

    #[inline]
    fn next(&mut self) -> Option<Feature> {
        self.layer.next_feature()
    }
}
