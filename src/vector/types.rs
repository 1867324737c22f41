use std::fmt::{Display, Formatter};

use crate::errors::{OgrErr, OgrError, Result};

/// Type of an attribute column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    Integer,
    IntegerList,
    Real,
    RealList,
    String,
    StringList,
    Binary,
    Date,
    Time,
    DateTime,
    Integer64,
    Integer64List,
}

impl FieldType {
    /// Numeric code of the classic OGR field type enumeration.
    pub fn code(self) -> u32 {
        match self {
            FieldType::Integer => 0,
            FieldType::IntegerList => 1,
            FieldType::Real => 2,
            FieldType::RealList => 3,
            FieldType::String => 4,
            FieldType::StringList => 5,
            FieldType::Binary => 8,
            FieldType::Date => 9,
            FieldType::Time => 10,
            FieldType::DateTime => 11,
            FieldType::Integer64 => 12,
            FieldType::Integer64List => 13,
        }
    }

    /// Inverse of [`FieldType::code`]. The retired wide-string codes 6 and 7 are rejected.
    pub fn from_code(code: u32) -> Result<FieldType> {
        let ty = match code {
            0 => FieldType::Integer,
            1 => FieldType::IntegerList,
            2 => FieldType::Real,
            3 => FieldType::RealList,
            4 => FieldType::String,
            5 => FieldType::StringList,
            8 => FieldType::Binary,
            9 => FieldType::Date,
            10 => FieldType::Time,
            11 => FieldType::DateTime,
            12 => FieldType::Integer64,
            13 => FieldType::Integer64List,
            _ => {
                return Err(OgrError::BadArgument(format!(
                    "Unknown field type code {}",
                    code
                )))
            }
        };
        Ok(ty)
    }

    /// Human readable name of the field type.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Integer => "Integer",
            FieldType::IntegerList => "IntegerList",
            FieldType::Real => "Real",
            FieldType::RealList => "RealList",
            FieldType::String => "String",
            FieldType::StringList => "StringList",
            FieldType::Binary => "Binary",
            FieldType::Date => "Date",
            FieldType::Time => "Time",
            FieldType::DateTime => "DateTime",
            FieldType::Integer64 => "Integer64",
            FieldType::Integer64List => "Integer64List",
        }
    }

    pub fn is_list(self) -> bool {
        matches!(
            self,
            FieldType::IntegerList
                | FieldType::RealList
                | FieldType::StringList
                | FieldType::Integer64List
        )
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Display justification of an attribute column.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Justification {
    #[default]
    Undefined,
    Left,
    Right,
}

const WKB_25D_BIT: u32 = 0x8000_0000;

/// Geometry type of a geometry column, following the well known binary codes.
///
/// [`GeometryType::Null`] is a sentinel distinct from [`GeometryType::Unknown`]: it marks
/// the absence of a type rather than "any type".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryType {
    Unknown,
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    None,
    LinearRing,
    Point25D,
    LineString25D,
    Polygon25D,
    MultiPoint25D,
    MultiLineString25D,
    MultiPolygon25D,
    GeometryCollection25D,
    Null,
}

impl GeometryType {
    pub fn code(self) -> u32 {
        match self {
            GeometryType::Unknown => 0,
            GeometryType::Point => 1,
            GeometryType::LineString => 2,
            GeometryType::Polygon => 3,
            GeometryType::MultiPoint => 4,
            GeometryType::MultiLineString => 5,
            GeometryType::MultiPolygon => 6,
            GeometryType::GeometryCollection => 7,
            GeometryType::None => 100,
            GeometryType::LinearRing => 101,
            GeometryType::Point25D => WKB_25D_BIT | 1,
            GeometryType::LineString25D => WKB_25D_BIT | 2,
            GeometryType::Polygon25D => WKB_25D_BIT | 3,
            GeometryType::MultiPoint25D => WKB_25D_BIT | 4,
            GeometryType::MultiLineString25D => WKB_25D_BIT | 5,
            GeometryType::MultiPolygon25D => WKB_25D_BIT | 6,
            GeometryType::GeometryCollection25D => WKB_25D_BIT | 7,
            GeometryType::Null => u32::MAX,
        }
    }

    pub fn from_code(code: u32) -> Result<GeometryType> {
        let ty = match code {
            0 => GeometryType::Unknown,
            1 => GeometryType::Point,
            2 => GeometryType::LineString,
            3 => GeometryType::Polygon,
            4 => GeometryType::MultiPoint,
            5 => GeometryType::MultiLineString,
            6 => GeometryType::MultiPolygon,
            7 => GeometryType::GeometryCollection,
            100 => GeometryType::None,
            101 => GeometryType::LinearRing,
            0x8000_0001 => GeometryType::Point25D,
            0x8000_0002 => GeometryType::LineString25D,
            0x8000_0003 => GeometryType::Polygon25D,
            0x8000_0004 => GeometryType::MultiPoint25D,
            0x8000_0005 => GeometryType::MultiLineString25D,
            0x8000_0006 => GeometryType::MultiPolygon25D,
            0x8000_0007 => GeometryType::GeometryCollection25D,
            u32::MAX => GeometryType::Null,
            _ => return Err(OgrError::ogr(OgrErr::UnsupportedGeometryType, "from_code")),
        };
        Ok(ty)
    }

    /// Strips the z-coordinate flag.
    pub fn flatten(self) -> GeometryType {
        match self {
            GeometryType::Point25D => GeometryType::Point,
            GeometryType::LineString25D => GeometryType::LineString,
            GeometryType::Polygon25D => GeometryType::Polygon,
            GeometryType::MultiPoint25D => GeometryType::MultiPoint,
            GeometryType::MultiLineString25D => GeometryType::MultiLineString,
            GeometryType::MultiPolygon25D => GeometryType::MultiPolygon,
            GeometryType::GeometryCollection25D => GeometryType::GeometryCollection,
            other => other,
        }
    }

    pub fn is_3d(self) -> bool {
        self.flatten() != self
    }

    /// The "25D" variant of this type. Types without one are returned unchanged.
    pub fn to_3d(self) -> GeometryType {
        match self {
            GeometryType::Point => GeometryType::Point25D,
            GeometryType::LineString => GeometryType::LineString25D,
            GeometryType::Polygon => GeometryType::Polygon25D,
            GeometryType::MultiPoint => GeometryType::MultiPoint25D,
            GeometryType::MultiLineString => GeometryType::MultiLineString25D,
            GeometryType::MultiPolygon => GeometryType::MultiPolygon25D,
            GeometryType::GeometryCollection => GeometryType::GeometryCollection25D,
            other => other,
        }
    }

    /// Human readable name of the geometry type, e.g. `"3D Multi Polygon"`.
    pub fn name(self) -> String {
        let flat = match self.flatten() {
            GeometryType::Unknown => "Unknown (any)",
            GeometryType::Point => "Point",
            GeometryType::LineString => "Line String",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "Multi Point",
            GeometryType::MultiLineString => "Multi Line String",
            GeometryType::MultiPolygon => "Multi Polygon",
            GeometryType::GeometryCollection => "Geometry Collection",
            GeometryType::None => "None",
            GeometryType::LinearRing => "Linear Ring",
            GeometryType::Null => "Null",
            _ => unreachable!("flatten() only returns 2D types"),
        };
        if self.is_3d() {
            format!("3D {}", flat)
        } else {
            flat.to_string()
        }
    }
}

impl Display for GeometryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}
