//! Geometry type modifier (typmod) decoding.
//!
//! PostGIS packs the declared subtype of a `geometry(...)`/`geography(...)`
//! column into the column's 32-bit typmod:
//!
//! | Bits  | Field                               |
//! |-------|-------------------------------------|
//! | 0     | has M                               |
//! | 1     | has Z                               |
//! | 2-7   | geometry subtype code               |
//! | 8-28  | SRID, 21-bit two's complement       |
//!
//! A negative typmod means the column has no modifier.

use std::fmt;

use crate::constants::{
    TYPMOD_M_MASK, TYPMOD_SRID_BITS, TYPMOD_SRID_MASK, TYPMOD_TYPE_MASK, TYPMOD_Z_MASK,
};

/// Subtype names, indexed by typmod type code.
pub const GEOMETRY_TYPES: [&str; 16] = [
    "Unknown",
    "Point",
    "LineString",
    "Polygon",
    "MultiPoint",
    "MultiLineString",
    "MultiPolygon",
    "GeometryCollection",
    "CircularString",
    "CompoundCurve",
    "CurvePolygon",
    "MultiCurve",
    "MultiSurface",
    "PolyhedralSurface",
    "Triangle",
    "Tin",
];

/// Geometry subtype as encoded in a typmod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GeometryType {
    Unknown = 0,
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
    CircularString = 8,
    CompoundCurve = 9,
    CurvePolygon = 10,
    MultiCurve = 11,
    MultiSurface = 12,
    PolyhedralSurface = 13,
    Triangle = 14,
    Tin = 15,
}

impl GeometryType {
    /// Look up a subtype by type code.
    ///
    /// Returns `None` for codes outside the known table (the field is six
    /// bits wide but only 16 codes are assigned).
    pub fn from_code(code: i32) -> Option<Self> {
        use GeometryType::*;
        let ty = match code {
            0 => Unknown,
            1 => Point,
            2 => LineString,
            3 => Polygon,
            4 => MultiPoint,
            5 => MultiLineString,
            6 => MultiPolygon,
            7 => GeometryCollection,
            8 => CircularString,
            9 => CompoundCurve,
            10 => CurvePolygon,
            11 => MultiCurve,
            12 => MultiSurface,
            13 => PolyhedralSurface,
            14 => Triangle,
            15 => Tin,
            _ => return None,
        };
        Some(ty)
    }

    /// Type code.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Subtype name as PostGIS spells it.
    pub fn name(self) -> &'static str {
        GEOMETRY_TYPES[self as usize]
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields unpacked from a typmod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypmodFields {
    /// Subtype code, an index into [`GEOMETRY_TYPES`].
    pub type_code: i32,
    /// Spatial reference system identifier.
    pub srid: i32,
    /// 1 if the column has a Z dimension.
    pub z: i32,
    /// 1 if the column has an M dimension.
    pub m: i32,
    /// Number of dimensions (2 to 4).
    pub ndims: i32,
}

/// Extract the SRID.
///
/// The shift pair sign-extends the 21-bit field; it relies on the left shift
/// discarding bits 29-31 and on `>>` being arithmetic for `i32`.
pub fn srid(typmod: i32) -> i32 {
    (typmod & TYPMOD_SRID_MASK).wrapping_shl(3) >> 11
}

/// Extract the subtype code.
pub fn type_code(typmod: i32) -> i32 {
    (typmod & TYPMOD_TYPE_MASK) >> 2
}

/// Z flag, 0 or 1.
pub fn z(typmod: i32) -> i32 {
    (typmod & TYPMOD_Z_MASK) >> 1
}

/// M flag, 0 or 1.
pub fn m(typmod: i32) -> i32 {
    typmod & TYPMOD_M_MASK
}

/// Number of coordinate dimensions.
pub fn ndims(typmod: i32) -> i32 {
    2 + z(typmod) + m(typmod)
}

/// Unpack every field of a typmod.
pub fn typeobj(typmod: i32) -> TypmodFields {
    TypmodFields {
        type_code: type_code(typmod),
        srid: srid(typmod),
        z: z(typmod),
        m: m(typmod),
        ndims: ndims(typmod),
    }
}

/// Render the typmod annotation, e.g. `(PointZ,4326)`.
///
/// Returns an empty string for a negative typmod or when no field is set.
/// The exact format (no spaces, SRID only when positive) is what
/// `postgis_typmod_out` produces and what tools parsing `format_type`
/// output expect.
pub fn typename(typmod: i32) -> String {
    if typmod < 0 {
        return String::new();
    }

    let TypmodFields {
        type_code,
        srid,
        z,
        m,
        ..
    } = typeobj(typmod);

    if type_code == 0 && srid == 0 && z == 0 && m == 0 {
        return String::new();
    }

    let mut name = String::from("(");
    match GeometryType::from_code(type_code) {
        Some(ty) if ty != GeometryType::Unknown => name.push_str(ty.name()),
        _ => name.push_str("Geometry"),
    }
    if z != 0 {
        name.push('Z');
    }
    if m != 0 {
        name.push('M');
    }
    if srid > 0 {
        name.push(',');
        name.push_str(&srid.to_string());
    }
    name.push(')');
    name
}

/// A packed geometry typmod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Typmod(pub i32);

impl Typmod {
    /// Pack a typmod the way the server's `TYPMOD_SET_*` macros do.
    pub fn new(geometry_type: GeometryType, srid: i32, has_z: bool, has_m: bool) -> Self {
        let mut typmod = (srid & TYPMOD_SRID_BITS) << 8;
        typmod |= (geometry_type.code() << 2) & TYPMOD_TYPE_MASK;
        if has_z {
            typmod |= TYPMOD_Z_MASK;
        }
        if has_m {
            typmod |= TYPMOD_M_MASK;
        }
        Self(typmod)
    }

    /// Whether a modifier is present at all.
    pub fn is_present(self) -> bool {
        self.0 >= 0
    }

    pub fn srid(self) -> i32 {
        srid(self.0)
    }

    pub fn type_code(self) -> i32 {
        type_code(self.0)
    }

    /// Declared subtype, if the code is a known one.
    pub fn geometry_type(self) -> Option<GeometryType> {
        GeometryType::from_code(self.type_code())
    }

    pub fn has_z(self) -> bool {
        z(self.0) != 0
    }

    pub fn has_m(self) -> bool {
        m(self.0) != 0
    }

    pub fn ndims(self) -> i32 {
        ndims(self.0)
    }

    pub fn fields(self) -> TypmodFields {
        typeobj(self.0)
    }
}

impl From<i32> for Typmod {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Typmod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&typename(self.0))
    }
}
