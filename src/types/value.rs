//! Decoded spatial values.

use std::fmt;

use geo_types::Geometry;
use geozero::ToJson;

use crate::error::{Error, Result};

/// Bounding box decoded from `box2d`/`box3d` text.
///
/// Corners keep the dimensionality of the source: two ordinates for
/// `BOX(...)`, three for `BOX3D(...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxValue {
    /// Lower-left corner.
    pub min: Vec<f64>,
    /// Upper-right corner.
    pub max: Vec<f64>,
}

impl BoxValue {
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Self {
        Self { min, max }
    }

    /// Number of ordinates per corner.
    pub fn ndims(&self) -> usize {
        self.min.len()
    }

    /// Corners as `[[xmin, ymin(, zmin)], [xmax, ymax(, zmax)]]`.
    pub fn coordinates(&self) -> Vec<Vec<f64>> {
        vec![self.min.clone(), self.max.clone()]
    }
}

impl fmt::Display for BoxValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |corner: &[f64]| {
            corner
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let tag = if self.ndims() == 3 { "BOX3D" } else { "BOX" };
        write!(f, "{}({},{})", tag, join(&self.min), join(&self.max))
    }
}

/// A decoded PostGIS column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SpatialValue {
    /// NULL value.
    Null,
    /// Geometry or geography parsed by the WKB codec.
    Geometry(Geometry<f64>),
    /// Undecoded (E)WKB bytes, produced by [`raw_wkb_parser`](crate::decode::raw_wkb_parser).
    Wkb(Vec<u8>),
    /// `box2d`/`box3d` value.
    Box(BoxValue),
    /// Array value. Nested arrays stay nested.
    Array(Vec<SpatialValue>),
}

impl SpatialValue {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, SpatialValue::Null)
    }

    /// Try to get the value as a geometry.
    pub fn as_geometry(&self) -> Option<&Geometry<f64>> {
        match self {
            SpatialValue::Geometry(g) => Some(g),
            _ => None,
        }
    }

    /// Try to get the value as a box.
    pub fn as_box(&self) -> Option<&BoxValue> {
        match self {
            SpatialValue::Box(b) => Some(b),
            _ => None,
        }
    }

    /// Try to get the value as raw WKB bytes.
    pub fn as_wkb(&self) -> Option<&[u8]> {
        match self {
            SpatialValue::Wkb(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Try to get the elements of an array value.
    pub fn as_array(&self) -> Option<&[SpatialValue]> {
        match self {
            SpatialValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Serialize a geometry value to GeoJSON.
    pub fn to_geojson(&self) -> Result<String> {
        match self {
            SpatialValue::Geometry(g) => Ok(g.to_json()?),
            other => Err(Error::type_conversion(format!(
                "cannot convert {} to GeoJSON",
                other.kind()
            ))),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            SpatialValue::Null => "NULL",
            SpatialValue::Geometry(_) => "geometry",
            SpatialValue::Wkb(_) => "WKB",
            SpatialValue::Box(_) => "box",
            SpatialValue::Array(_) => "array",
        }
    }
}

impl From<Geometry<f64>> for SpatialValue {
    fn from(value: Geometry<f64>) -> Self {
        SpatialValue::Geometry(value)
    }
}

impl From<BoxValue> for SpatialValue {
    fn from(value: BoxValue) -> Self {
        SpatialValue::Box(value)
    }
}

impl fmt::Display for SpatialValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpatialValue::Null => write!(f, "NULL"),
            SpatialValue::Geometry(g) => write!(f, "{:?}", g),
            SpatialValue::Wkb(bytes) => write!(f, "<WKB: {} bytes>", bytes.len()),
            SpatialValue::Box(b) => write!(f, "{}", b),
            SpatialValue::Array(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// A column value from a text-format query.
///
/// Columns with a bound decoder come back as [`ColumnValue::Spatial`];
/// everything else keeps the server's text.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    /// NULL value.
    Null,
    /// Undecoded text.
    Text(String),
    /// Decoded PostGIS value.
    Spatial(SpatialValue),
}

impl ColumnValue {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    /// Try to get the value as text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as a decoded spatial value.
    pub fn as_spatial(&self) -> Option<&SpatialValue> {
        match self {
            ColumnValue::Spatial(v) => Some(v),
            _ => None,
        }
    }
}

impl From<SpatialValue> for ColumnValue {
    fn from(value: SpatialValue) -> Self {
        match value {
            SpatialValue::Null => ColumnValue::Null,
            other => ColumnValue::Spatial(other),
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Null => write!(f, "NULL"),
            ColumnValue::Text(s) => write!(f, "{}", s),
            ColumnValue::Spatial(v) => write!(f, "{}", v),
        }
    }
}
