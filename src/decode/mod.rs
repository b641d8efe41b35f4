//! Text-format decoders for PostGIS types.
//!
//! Each supported type has its own module with decode functions.
//!
//! ## Currently Supported
//!
//! | PostGIS Type            | Module     |
//! |-------------------------|------------|
//! | geometry, geography     | `geometry` |
//! | box2d, box3d            | `bbox`     |
//! | _geometry, _geography   | `array`    |
//! | _box2d, _box3d          | `array`    |
//!
//! `geometry_dump` is a composite type with no decoder; its OIDs are still
//! resolved so callers can look them up.

mod array;
mod bbox;
mod geometry;

use std::sync::Arc;

use crate::constants::*;
use crate::error::Result;
use crate::types::SpatialValue;

pub use array::{decode_array, parse_array_literal};
pub use bbox::decode_box;
pub use geometry::{
    decode_geometry, parse_ewkb_hex, raw_wkb_parser, reset_geometry_parser, set_geometry_parser,
    GeometryParser,
};

/// Decoder bound to a column OID. `None` is SQL NULL.
pub type TypeParser = Arc<dyn Fn(Option<&str>) -> Result<SpatialValue> + Send + Sync>;

/// Make a decoder null-safe.
///
/// NULL and empty input yield [`SpatialValue::Null`] without calling
/// `decode`.
pub fn allow_null<F>(decode: F) -> TypeParser
where
    F: Fn(&str) -> Result<SpatialValue> + Send + Sync + 'static,
{
    Arc::new(move |raw: Option<&str>| match raw {
        None | Some("") => Ok(SpatialValue::Null),
        Some(raw) => decode(raw),
    })
}

/// Decoder for a PostGIS type name, if one exists.
pub fn parser_for(type_name: &str) -> Option<TypeParser> {
    let parser = match type_name {
        TYPE_GEOMETRY | TYPE_GEOGRAPHY => allow_null(decode_geometry),
        TYPE_BOX2D | TYPE_BOX3D => allow_null(decode_box),
        TYPE_GEOMETRY_ARRAY | TYPE_GEOGRAPHY_ARRAY => decode_array(decode_geometry),
        TYPE_BOX2D_ARRAY | TYPE_BOX3D_ARRAY => decode_array(decode_box),
        _ => return None,
    };
    Some(parser)
}
