use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::errors::*;
use crate::spatial_ref::SpatialRef;
use crate::vector::{FieldType, GeometryType, Justification, Layer};

/// Descriptor of one attribute column.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefn {
    name: String,
    field_type: FieldType,
    width: i32,
    precision: i32,
    justification: Justification,
    ignored: bool,
    nullable: bool,
    default_value: Option<String>,
}

impl FieldDefn {
    pub fn new(name: &str, field_type: FieldType) -> FieldDefn {
        FieldDefn {
            name: name.to_string(),
            field_type,
            width: 0,
            precision: 0,
            justification: Justification::Undefined,
            ignored: false,
            nullable: true,
            default_value: None,
        }
    }

    /// Get the name of this field.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the data type of this field.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn set_field_type(&mut self, field_type: FieldType) {
        self.field_type = field_type;
    }

    /// Get the formatting width for this field.
    ///
    /// Zero means no specified width.
    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn set_width(&mut self, width: i32) {
        self.width = width;
    }

    /// Get the formatting precision for this field.
    ///
    /// This should normally be zero for fields of types other than Real.
    pub fn precision(&self) -> i32 {
        self.precision
    }

    pub fn set_precision(&mut self, precision: i32) {
        self.precision = precision;
    }

    pub fn justification(&self) -> Justification {
        self.justification
    }

    pub fn set_justification(&mut self, justification: Justification) {
        self.justification = justification;
    }

    /// Set all defining parameters of the field in a single call.
    pub fn set(
        &mut self,
        name: &str,
        field_type: FieldType,
        width: i32,
        precision: i32,
        justification: Justification,
    ) {
        self.name = name.to_string();
        self.field_type = field_type;
        self.width = width;
        self.precision = precision;
        self.justification = justification;
    }

    /// Whether this field should be skipped when fetching features.
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub fn set_ignored(&mut self, ignored: bool) {
        self.ignored = ignored;
    }

    /// Return whether this field can receive null values.
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }

    /// Get default field value.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn set_default_value(&mut self, default_value: Option<&str>) {
        self.default_value = default_value.map(str::to_string);
    }

    /// Add this field to the schema of `layer`, remapping the features it already holds.
    pub fn add_to_layer(&self, layer: &mut Layer) -> Result<()> {
        layer.create_field(self)
    }

    fn same_as(&self, other: &FieldDefn) -> bool {
        self.name == other.name
            && self.field_type == other.field_type
            && self.width == other.width
            && self.precision == other.precision
    }
}

/// Descriptor of one geometry column.
#[derive(Clone, Debug)]
pub struct GeomFieldDefn {
    name: String,
    geometry_type: GeometryType,
    spatial_ref: Option<SpatialRef>,
    nullable: bool,
    ignored: bool,
}

impl GeomFieldDefn {
    pub fn new(name: &str, geometry_type: GeometryType) -> GeomFieldDefn {
        GeomFieldDefn {
            name: name.to_string(),
            geometry_type,
            spatial_ref: None,
            nullable: true,
            ignored: false,
        }
    }

    /// Get the name of this field.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }

    pub fn set_geometry_type(&mut self, geometry_type: GeometryType) {
        self.geometry_type = geometry_type;
    }

    /// The spatial reference is shared with its other holders, never copied.
    pub fn spatial_ref(&self) -> Option<&SpatialRef> {
        self.spatial_ref.as_ref()
    }

    pub fn set_spatial_ref(&mut self, spatial_ref: Option<SpatialRef>) {
        self.spatial_ref = spatial_ref;
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn set_nullable(&mut self, nullable: bool) {
        self.nullable = nullable;
    }

    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub fn set_ignored(&mut self, ignored: bool) {
        self.ignored = ignored;
    }

    fn same_as(&self, other: &GeomFieldDefn) -> bool {
        let same_srs = match (&self.spatial_ref, &other.spatial_ref) {
            (None, None) => true,
            (Some(a), Some(b)) => a.is_same_object(b),
            _ => false,
        };
        self.name == other.name && self.geometry_type == other.geometry_type && same_srs
    }
}

#[derive(Clone, Debug)]
struct DefnState {
    name: String,
    fields: Vec<FieldDefn>,
    geom_fields: Vec<GeomFieldDefn>,
    style_ignored: bool,
    schema_locked: bool,
}

struct DefnShared {
    ref_count: AtomicUsize,
    state: RwLock<Option<DefnState>>,
}

/// Layer definition
///
/// The schema shared by all features of a layer: an ordered list of attribute fields and an
/// ordered list of geometry fields.
///
/// A `Defn` is a handle on a reference-counted definition. A new definition starts with a
/// count of one. [`Defn::reference`] and [`Defn::dereference`] adjust the count; reaching
/// zero destroys the definition. Cloning a handle takes a reference, so every clone must
/// eventually be balanced with [`Defn::release`] or [`Defn::dereference`]. Features and
/// layers do this on their own.
///
/// Edits made through any handle are visible through every other handle. Existing
/// [`Feature`](crate::vector::Feature)s are *not* resized by schema edits on the definition;
/// the schema-editing methods of [`Layer`] remap the features the layer stores.
///
/// # Panics
///
/// Using a definition after it was destroyed, and dereferencing it past zero, are
/// precondition violations and panic.
///
/// ```
/// use ogr::vector::{Defn, FieldDefn, FieldType, GeomFieldDefn, GeometryType};
///
/// let defn = Defn::new("parcels");
/// let mut owner = FieldDefn::new("owner", FieldType::String);
/// owner.set_width(64);
/// defn.add_field_defn(&owner).unwrap();
/// defn.add_geom_field_defn(&GeomFieldDefn::new("geom", GeometryType::Polygon)).unwrap();
///
/// assert_eq!(defn.field_count(), 1);
/// assert_eq!(defn.geometry_type(), GeometryType::Polygon);
/// ```
pub struct Defn {
    shared: Arc<DefnShared>,
}

impl Defn {
    /// Creates an empty definition with a reference count of one.
    pub fn new(name: &str) -> Defn {
        let state = DefnState {
            name: name.to_string(),
            fields: Vec::new(),
            geom_fields: Vec::new(),
            style_ignored: false,
            schema_locked: false,
        };
        Defn {
            shared: Arc::new(DefnShared {
                ref_count: AtomicUsize::new(1),
                state: RwLock::new(Some(state)),
            }),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&DefnState) -> R) -> R {
        let guard = match self.shared.state.read() {
            Ok(guard) => guard,
            Err(poison_error) => poison_error.into_inner(),
        };
        match guard.as_ref() {
            Some(state) => f(state),
            None => panic!("feature definition used after it was destroyed"),
        }
    }

    fn with_state_mut<R>(&self, f: impl FnOnce(&mut DefnState) -> R) -> R {
        let mut guard = match self.shared.state.write() {
            Ok(guard) => guard,
            Err(poison_error) => poison_error.into_inner(),
        };
        match guard.as_mut() {
            Some(state) => f(state),
            None => panic!("feature definition used after it was destroyed"),
        }
    }

    /// Runs a structural edit unless the schema is locked.
    fn edit<R>(
        &self,
        method_name: &'static str,
        f: impl FnOnce(&mut DefnState) -> Result<R>,
    ) -> Result<R> {
        self.with_state_mut(|state| {
            if state.schema_locked {
                return Err(OgrError::ogr(OgrErr::UnsupportedOperation, method_name));
            }
            f(state)
        })
    }

    pub fn name(&self) -> String {
        self.with_state(|state| state.name.clone())
    }

    pub fn set_name(&self, name: &str) {
        self.with_state_mut(|state| state.name = name.to_string())
    }

    pub fn field_count(&self) -> usize {
        self.with_state(|state| state.fields.len())
    }

    /// A copy of the field definition at `index`.
    pub fn field_defn(&self, index: usize) -> Result<FieldDefn> {
        self.with_state(|state| {
            state
                .fields
                .get(index)
                .cloned()
                .ok_or(OgrError::InvalidFieldIndex {
                    index,
                    method_name: "field_defn",
                })
        })
    }

    /// Index of the first field called `name`, compared exactly.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.with_state(|state| state.fields.iter().position(|f| f.name == name))
    }

    /// Iterate over the field schema.
    pub fn fields(&self) -> impl Iterator<Item = FieldDefn> {
        self.with_state(|state| state.fields.clone()).into_iter()
    }

    /// Append a copy of `field`. Returns its index, which is the field count before the call.
    pub fn add_field_defn(&self, field: &FieldDefn) -> Result<usize> {
        self.edit("add_field_defn", |state| {
            state.fields.push(field.clone());
            Ok(state.fields.len() - 1)
        })
    }

    /// Remove the field at `index`; later fields shift down by one.
    pub fn delete_field_defn(&self, index: usize) -> Result<()> {
        self.edit("delete_field_defn", |state| {
            if index >= state.fields.len() {
                return Err(OgrError::InvalidFieldIndex {
                    index,
                    method_name: "delete_field_defn",
                });
            }
            state.fields.remove(index);
            Ok(())
        })
    }

    /// Reorder the fields. `new_order[i]` is the current index of the field that moves to
    /// position `i`; it must be a permutation of `0..field_count()`.
    pub fn reorder_field_defns(&self, new_order: &[usize]) -> Result<()> {
        self.edit("reorder_field_defns", |state| {
            check_permutation(new_order, state.fields.len(), "reorder_field_defns")?;
            state.fields = new_order.iter().map(|&i| state.fields[i].clone()).collect();
            Ok(())
        })
    }

    /// Replace the definition of the field at `index`.
    pub fn alter_field_defn(&self, index: usize, field: &FieldDefn) -> Result<()> {
        self.edit("alter_field_defn", |state| {
            let slot = state
                .fields
                .get_mut(index)
                .ok_or(OgrError::InvalidFieldIndex {
                    index,
                    method_name: "alter_field_defn",
                })?;
            *slot = field.clone();
            Ok(())
        })
    }

    /// Ignoring a field is not a structural edit and is allowed on locked schemas.
    pub fn set_field_ignored(&self, index: usize, ignored: bool) -> Result<()> {
        self.with_state_mut(|state| {
            let field = state
                .fields
                .get_mut(index)
                .ok_or(OgrError::InvalidFieldIndex {
                    index,
                    method_name: "set_field_ignored",
                })?;
            field.ignored = ignored;
            Ok(())
        })
    }

    pub fn geom_field_count(&self) -> usize {
        self.with_state(|state| state.geom_fields.len())
    }

    /// A copy of the geometry field definition at `index`.
    pub fn geom_field_defn(&self, index: usize) -> Result<GeomFieldDefn> {
        self.with_state(|state| {
            state
                .geom_fields
                .get(index)
                .cloned()
                .ok_or(OgrError::InvalidFieldIndex {
                    index,
                    method_name: "geom_field_defn",
                })
        })
    }

    pub fn geom_field_index(&self, name: &str) -> Option<usize> {
        self.with_state(|state| state.geom_fields.iter().position(|f| f.name == name))
    }

    /// Iterate over the geometry field schema.
    pub fn geom_fields(&self) -> impl Iterator<Item = GeomFieldDefn> {
        self.with_state(|state| state.geom_fields.clone()).into_iter()
    }

    pub fn add_geom_field_defn(&self, field: &GeomFieldDefn) -> Result<usize> {
        self.edit("add_geom_field_defn", |state| {
            state.geom_fields.push(field.clone());
            Ok(state.geom_fields.len() - 1)
        })
    }

    pub fn delete_geom_field_defn(&self, index: usize) -> Result<()> {
        self.edit("delete_geom_field_defn", |state| {
            if index >= state.geom_fields.len() {
                return Err(OgrError::InvalidFieldIndex {
                    index,
                    method_name: "delete_geom_field_defn",
                });
            }
            state.geom_fields.remove(index);
            Ok(())
        })
    }

    pub fn set_geom_field_ignored(&self, index: usize, ignored: bool) -> Result<()> {
        self.with_state_mut(|state| {
            let field = state
                .geom_fields
                .get_mut(index)
                .ok_or(OgrError::InvalidFieldIndex {
                    index,
                    method_name: "set_geom_field_ignored",
                })?;
            field.ignored = ignored;
            Ok(())
        })
    }

    /// Get the geometry type of the first geometry field, [`GeometryType::None`] without one.
    pub fn geometry_type(&self) -> GeometryType {
        self.with_state(|state| {
            state
                .geom_fields
                .first()
                .map_or(GeometryType::None, |f| f.geometry_type)
        })
    }

    /// Set the geometry type of the first geometry field.
    ///
    /// Without geometry fields, a type other than [`GeometryType::None`] adds an unnamed one.
    /// Setting [`GeometryType::None`] removes the first geometry field.
    pub fn set_geometry_type(&self, geometry_type: GeometryType) -> Result<()> {
        self.edit("set_geometry_type", |state| {
            match (state.geom_fields.is_empty(), geometry_type) {
                (true, GeometryType::None) => {}
                (true, ty) => state.geom_fields.push(GeomFieldDefn::new("", ty)),
                (false, GeometryType::None) => {
                    state.geom_fields.remove(0);
                }
                (false, ty) => state.geom_fields[0].geometry_type = ty,
            }
            Ok(())
        })
    }

    pub fn is_geometry_ignored(&self) -> bool {
        self.with_state(|state| state.geom_fields.first().is_some_and(|f| f.ignored))
    }

    pub fn set_geometry_ignored(&self, ignored: bool) {
        self.with_state_mut(|state| {
            if let Some(field) = state.geom_fields.first_mut() {
                field.ignored = ignored;
            }
        })
    }

    pub fn is_style_ignored(&self) -> bool {
        self.with_state(|state| state.style_ignored)
    }

    pub fn set_style_ignored(&self, ignored: bool) {
        self.with_state_mut(|state| state.style_ignored = ignored)
    }

    /// Whether structural edits are refused with [`OgrErr::UnsupportedOperation`].
    pub fn is_schema_locked(&self) -> bool {
        self.with_state(|state| state.schema_locked)
    }

    pub(crate) fn set_schema_locked(&self, locked: bool) {
        self.with_state_mut(|state| state.schema_locked = locked)
    }

    /// Structural equality: same fields by (name, type, width, precision) and same geometry
    /// fields by (name, geometry type, spatial reference identity), in the same order.
    pub fn is_same(&self, other: &Defn) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let (fields, geom_fields) =
            self.with_state(|state| (state.fields.clone(), state.geom_fields.clone()));
        other.with_state(|state| {
            fields.len() == state.fields.len()
                && geom_fields.len() == state.geom_fields.len()
                && fields.iter().zip(&state.fields).all(|(a, b)| a.same_as(b))
                && geom_fields
                    .iter()
                    .zip(&state.geom_fields)
                    .all(|(a, b)| a.same_as(b))
        })
    }

    /// Whether both handles refer to the same definition.
    pub fn ptr_eq(&self, other: &Defn) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// A new, independent definition with the same content and a reference count of one.
    /// The copy's schema is never locked.
    pub fn duplicate(&self) -> Defn {
        let mut state = self.with_state(|state| state.clone());
        state.schema_locked = false;
        Defn {
            shared: Arc::new(DefnShared {
                ref_count: AtomicUsize::new(1),
                state: RwLock::new(Some(state)),
            }),
        }
    }

    /// Increment the reference count. Returns the new count.
    pub fn reference(&self) -> usize {
        assert!(self.is_alive(), "feature definition used after it was destroyed");
        self.shared.ref_count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Decrement the reference count, destroying the definition when it reaches zero.
    /// Returns the new count.
    pub fn dereference(&self) -> usize {
        match self.decrement() {
            Some(count) => count,
            None => panic!("feature definition dereferenced past zero"),
        }
    }

    /// Fetch the current reference count.
    pub fn reference_count(&self) -> usize {
        self.shared.ref_count.load(Ordering::SeqCst)
    }

    /// Drop the reference held by this handle.
    pub fn release(self) {
        self.dereference();
    }

    /// Destroy the definition regardless of its reference count.
    ///
    /// Other holders must no longer use it; doing so panics.
    pub fn destroy(self) {
        self.shared.ref_count.store(0, Ordering::SeqCst);
        self.take_state();
    }

    /// `false` once the definition was destroyed.
    pub fn is_alive(&self) -> bool {
        match self.shared.state.read() {
            Ok(guard) => guard.is_some(),
            Err(poison_error) => poison_error.into_inner().is_some(),
        }
    }

    /// Dereference from a `Drop` impl: never panics.
    pub(crate) fn drop_reference(&self) {
        if self.decrement().is_none() {
            tracing::warn!("feature definition reference dropped after its count reached zero");
        }
    }

    fn decrement(&self) -> Option<usize> {
        let previous = self
            .shared
            .ref_count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
                count.checked_sub(1)
            })
            .ok()?;
        if previous == 1 {
            self.take_state();
        }
        Some(previous - 1)
    }

    fn take_state(&self) {
        let mut guard = match self.shared.state.write() {
            Ok(guard) => guard,
            Err(poison_error) => poison_error.into_inner(),
        };
        if let Some(state) = guard.take() {
            tracing::debug!(defn = %state.name, "feature definition destroyed");
        }
    }
}

/// Cloning takes a reference on the shared definition. Dropping a clone does not give it
/// back: call [`Defn::release`] instead.
impl Clone for Defn {
    fn clone(&self) -> Self {
        self.reference();
        Defn {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Debug for Defn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let guard = match self.shared.state.read() {
            Ok(guard) => guard,
            Err(poison_error) => poison_error.into_inner(),
        };
        match guard.as_ref() {
            Some(state) => f
                .debug_struct("Defn")
                .field("name", &state.name)
                .field("fields", &state.fields)
                .field("geom_fields", &state.geom_fields)
                .field("ref_count", &self.reference_count())
                .finish(),
            None => f.write_str("Defn(<destroyed>)"),
        }
    }
}

pub(crate) fn check_permutation(
    new_order: &[usize],
    len: usize,
    method_name: &'static str,
) -> Result<()> {
    let mut seen = vec![false; len];
    if new_order.len() != len {
        return Err(OgrError::ogr(OgrErr::Failure, method_name));
    }
    for &i in new_order {
        if i >= len || seen[i] {
            return Err(OgrError::ogr(OgrErr::Failure, method_name));
        }
        seen[i] = true;
    }
    Ok(())
}
