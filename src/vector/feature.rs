use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::envelope::Envelope;
use crate::errors::*;
use crate::vector::{Defn, FieldType, Geometry};

/// A feature: one value slot per field and one geometry slot per geometry field of the
/// definition it was created from.
///
/// A feature holds a reference on its [`Defn`] for as long as it lives. Slots are sized
/// when the feature is created; later edits made directly on the definition do not resize
/// them.
#[derive(Clone, Debug)]
pub struct Feature {
    defn: Defn,
    fid: Option<u64>,
    fields: Vec<Option<FieldValue>>,
    geometries: Vec<Option<Geometry>>,
    style_string: Option<String>,
}

impl Feature {
    /// Creates an empty feature with all slots null.
    pub fn new(defn: &Defn) -> Feature {
        Feature {
            defn: defn.clone(),
            fid: None,
            fields: vec![None; defn.field_count()],
            geometries: vec![None; defn.geom_field_count()],
            style_string: None,
        }
    }

    /// The definition this feature was built against.
    pub fn defn(&self) -> &Defn {
        &self.defn
    }

    /// Get the feature identifier, if one was assigned.
    pub fn fid(&self) -> Option<u64> {
        self.fid
    }

    pub fn set_fid(&mut self, fid: Option<u64>) {
        self.fid = fid;
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn geom_field_count(&self) -> usize {
        self.geometries.len()
    }

    /// Get the index of the named field.
    pub fn field_index(&self, name: &str) -> Result<usize> {
        self.defn
            .field_index(name)
            .filter(|&idx| idx < self.fields.len())
            .ok_or_else(|| OgrError::InvalidFieldName {
                field_name: name.to_string(),
                method_name: "field_index",
            })
    }

    /// Get the value of a named field. If the field exists, it returns a [`FieldValue`]
    /// wrapper, that you need to unpack to a base type (string, float, etc).
    ///
    /// A null field yields `Ok(None)`.
    pub fn field(&self, name: &str) -> Result<Option<FieldValue>> {
        let idx = self.field_index(name)?;
        self.field_by_index(idx)
    }

    pub fn field_by_index(&self, idx: usize) -> Result<Option<FieldValue>> {
        self.fields
            .get(idx)
            .cloned()
            .ok_or(OgrError::InvalidFieldIndex {
                index: idx,
                method_name: "field_by_index",
            })
    }

    /// Iterate over `(name, value)` pairs in field order.
    pub fn fields(&self) -> impl Iterator<Item = (String, Option<FieldValue>)> + '_ {
        self.defn
            .fields()
            .zip(self.fields.iter())
            .map(|(defn, value)| (defn.name().to_string(), value.clone()))
    }

    /// Set a field. The value must match the field type declared by the definition.
    pub fn set_field(&mut self, name: &str, value: &FieldValue) -> Result<()> {
        let idx = self.field_index(name)?;
        self.set_field_by_index(idx, value)
    }

    pub fn set_field_by_index(&mut self, idx: usize, value: &FieldValue) -> Result<()> {
        if idx >= self.fields.len() {
            return Err(OgrError::InvalidFieldIndex {
                index: idx,
                method_name: "set_field_by_index",
            });
        }
        let field_defn = self.defn.field_defn(idx)?;
        if value.field_type() != field_defn.field_type() {
            return Err(OgrError::FieldTypeMismatch {
                field_name: field_defn.name().to_string(),
                expected: field_defn.field_type(),
                method_name: "set_field_by_index",
            });
        }
        self.fields[idx] = Some(value.clone());
        Ok(())
    }

    pub fn set_field_string(&mut self, name: &str, value: &str) -> Result<()> {
        self.set_field(name, &FieldValue::StringValue(value.to_string()))
    }

    pub fn set_field_double(&mut self, name: &str, value: f64) -> Result<()> {
        self.set_field(name, &FieldValue::RealValue(value))
    }

    pub fn set_field_integer(&mut self, name: &str, value: i32) -> Result<()> {
        self.set_field(name, &FieldValue::IntegerValue(value))
    }

    pub fn set_field_integer64(&mut self, name: &str, value: i64) -> Result<()> {
        self.set_field(name, &FieldValue::Integer64Value(value))
    }

    /// Clear a field, marking it as null.
    pub fn set_field_null(&mut self, idx: usize) -> Result<()> {
        let slot = self
            .fields
            .get_mut(idx)
            .ok_or(OgrError::InvalidFieldIndex {
                index: idx,
                method_name: "set_field_null",
            })?;
        *slot = None;
        Ok(())
    }

    /// Get the geometry of the first geometry field, if set.
    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometries.first().and_then(Option::as_ref)
    }

    pub fn geometry_by_index(&self, idx: usize) -> Result<Option<&Geometry>> {
        self.geometries
            .get(idx)
            .map(Option::as_ref)
            .ok_or(OgrError::InvalidFieldIndex {
                index: idx,
                method_name: "geometry_by_index",
            })
    }

    pub fn geometry_by_name(&self, field_name: &str) -> Result<Option<&Geometry>> {
        match self.defn.geom_field_index(field_name) {
            Some(idx) => self.geometry_by_index(idx),
            None => Err(OgrError::InvalidFieldName {
                field_name: field_name.to_string(),
                method_name: "geometry_by_name",
            }),
        }
    }

    /// Set the geometry of the first geometry field.
    pub fn set_geometry(&mut self, geom: Geometry) -> Result<()> {
        self.set_geometry_by_index(0, geom)
    }

    pub fn set_geometry_by_index(&mut self, idx: usize, geom: Geometry) -> Result<()> {
        let slot = self
            .geometries
            .get_mut(idx)
            .ok_or(OgrError::InvalidFieldIndex {
                index: idx,
                method_name: "set_geometry_by_index",
            })?;
        *slot = Some(geom);
        Ok(())
    }

    pub fn style_string(&self) -> Option<&str> {
        self.style_string.as_deref()
    }

    pub fn set_style_string(&mut self, style: Option<&str>) {
        self.style_string = style.map(str::to_string);
    }

    /// Extent of all non-null geometries, `None` when the feature has none.
    pub fn envelope(&self) -> Option<Envelope> {
        self.geometries
            .iter()
            .flatten()
            .filter_map(Geometry::extent)
            .reduce(|a, b| a.cover(&b))
    }

    /// Points this feature at `defn`, keeping its slots.
    pub(crate) fn rebind(&mut self, defn: &Defn) {
        let previous = std::mem::replace(&mut self.defn, defn.clone());
        previous.drop_reference();
    }

    pub(crate) fn push_field_slot(&mut self) {
        self.fields.push(None);
    }

    pub(crate) fn remove_field_slot(&mut self, idx: usize) {
        if idx < self.fields.len() {
            self.fields.remove(idx);
        }
    }

    /// Callers validate `new_order` first.
    pub(crate) fn reorder_field_slots(&mut self, new_order: &[usize]) {
        self.fields = new_order.iter().map(|&i| self.fields[i].take()).collect();
    }

    /// Drops a value that no longer matches its field type.
    pub(crate) fn retype_field_slot(&mut self, idx: usize, field_type: FieldType) {
        if let Some(slot) = self.fields.get_mut(idx) {
            if slot.as_ref().is_some_and(|v| v.field_type() != field_type) {
                *slot = None;
            }
        }
    }

    pub(crate) fn push_geom_slot(&mut self) {
        self.geometries.push(None);
    }
}

impl Drop for Feature {
    fn drop(&mut self) {
        self.defn.drop_reference();
    }
}

/// The value of one attribute, one variant per [`FieldType`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    IntegerValue(i32),
    IntegerListValue(Vec<i32>),
    Integer64Value(i64),
    Integer64ListValue(Vec<i64>),
    RealValue(f64),
    RealListValue(Vec<f64>),
    StringValue(String),
    StringListValue(Vec<String>),
    BinaryValue(Vec<u8>),
    DateValue(NaiveDate),
    TimeValue(NaiveTime),
    DateTimeValue(DateTime<FixedOffset>),
}

impl FieldValue {
    /// The field type this value belongs to.
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::IntegerValue(_) => FieldType::Integer,
            FieldValue::IntegerListValue(_) => FieldType::IntegerList,
            FieldValue::Integer64Value(_) => FieldType::Integer64,
            FieldValue::Integer64ListValue(_) => FieldType::Integer64List,
            FieldValue::RealValue(_) => FieldType::Real,
            FieldValue::RealListValue(_) => FieldType::RealList,
            FieldValue::StringValue(_) => FieldType::String,
            FieldValue::StringListValue(_) => FieldType::StringList,
            FieldValue::BinaryValue(_) => FieldType::Binary,
            FieldValue::DateValue(_) => FieldType::Date,
            FieldValue::TimeValue(_) => FieldType::Time,
            FieldValue::DateTimeValue(_) => FieldType::DateTime,
        }
    }

    /// Interpret the value as `String`. Returns `None` if the value is something else.
    pub fn into_string(self) -> Option<String> {
        match self {
            FieldValue::StringValue(rv) => Some(rv),
            _ => None,
        }
    }

    /// Interpret the value as `f64`. Integers are widened.
    pub fn into_real(self) -> Option<f64> {
        match self {
            FieldValue::RealValue(rv) => Some(rv),
            FieldValue::IntegerValue(rv) => Some(rv as f64),
            FieldValue::Integer64Value(rv) => Some(rv as f64),
            _ => None,
        }
    }

    /// Interpret the value as `i32`. 64-bit integers are narrowed only when they fit.
    pub fn into_int(self) -> Option<i32> {
        match self {
            FieldValue::IntegerValue(rv) => Some(rv),
            FieldValue::Integer64Value(rv) => i32::try_from(rv).ok(),
            _ => None,
        }
    }

    pub fn into_int64(self) -> Option<i64> {
        match self {
            FieldValue::IntegerValue(rv) => Some(rv as i64),
            FieldValue::Integer64Value(rv) => Some(rv),
            _ => None,
        }
    }

    pub fn into_int_list(self) -> Option<Vec<i32>> {
        match self {
            FieldValue::IntegerListValue(rv) => Some(rv),
            _ => None,
        }
    }

    pub fn into_int64_list(self) -> Option<Vec<i64>> {
        match self {
            FieldValue::IntegerListValue(rv) => Some(rv.into_iter().map(i64::from).collect()),
            FieldValue::Integer64ListValue(rv) => Some(rv),
            _ => None,
        }
    }

    pub fn into_real_list(self) -> Option<Vec<f64>> {
        match self {
            FieldValue::RealListValue(rv) => Some(rv),
            _ => None,
        }
    }

    pub fn into_string_list(self) -> Option<Vec<String>> {
        match self {
            FieldValue::StringListValue(rv) => Some(rv),
            _ => None,
        }
    }

    pub fn into_binary(self) -> Option<Vec<u8>> {
        match self {
            FieldValue::BinaryValue(rv) => Some(rv),
            _ => None,
        }
    }

    /// Interpret the value as a date. Date-times yield their local date.
    pub fn into_date(self) -> Option<NaiveDate> {
        match self {
            FieldValue::DateValue(rv) => Some(rv),
            FieldValue::DateTimeValue(rv) => Some(rv.date_naive()),
            _ => None,
        }
    }

    pub fn into_time(self) -> Option<NaiveTime> {
        match self {
            FieldValue::TimeValue(rv) => Some(rv),
            FieldValue::DateTimeValue(rv) => Some(rv.time()),
            _ => None,
        }
    }

    pub fn into_datetime(self) -> Option<DateTime<FixedOffset>> {
        match self {
            FieldValue::DateTimeValue(rv) => Some(rv),
            _ => None,
        }
    }
}
