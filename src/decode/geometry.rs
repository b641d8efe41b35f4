//! Geometry/geography decoder and the process-wide parser hook.
//!
//! PostgreSQL's text output for `geometry` and `geography` is the hex
//! encoding of extended WKB. Decoding goes through a single swappable hook
//! so callers can substitute another geometry representation without
//! touching any registry.

use std::io::Cursor;
use std::sync::Arc;

use geo_types::Geometry;
use geozero::wkb::{FromWkb, WkbDialect};
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::Result;
use crate::types::SpatialValue;

/// Function turning hex (E)WKB text into a value.
pub type GeometryParser = Arc<dyn Fn(&str) -> Result<SpatialValue> + Send + Sync>;

static GEOMETRY_PARSER: Lazy<RwLock<GeometryParser>> =
    Lazy::new(|| RwLock::new(default_parser()));

fn default_parser() -> GeometryParser {
    Arc::new(parse_ewkb_hex)
}

/// Replace the geometry parser used by every geometry and geography decoder.
///
/// Applies to decoders already installed in a dispatch table.
pub fn set_geometry_parser<F>(parser: F)
where
    F: Fn(&str) -> Result<SpatialValue> + Send + Sync + 'static,
{
    *GEOMETRY_PARSER.write() = Arc::new(parser);
}

/// Restore the default EWKB parser.
pub fn reset_geometry_parser() {
    *GEOMETRY_PARSER.write() = default_parser();
}

/// Decode a geometry value through the current hook.
pub fn decode_geometry(raw: &str) -> Result<SpatialValue> {
    // Clone out so the lock is not held while decoding.
    let parser = GEOMETRY_PARSER.read().clone();
    parser(raw)
}

/// Default parser: hex EWKB into a `geo_types` geometry.
pub fn parse_ewkb_hex(raw: &str) -> Result<SpatialValue> {
    let bytes = hex::decode(raw)?;
    let mut reader = Cursor::new(bytes);
    let geometry = Geometry::<f64>::from_wkb(&mut reader, WkbDialect::Ewkb)?;
    Ok(SpatialValue::Geometry(geometry))
}

/// Alternative parser keeping the undecoded EWKB bytes.
pub fn raw_wkb_parser(raw: &str) -> Result<SpatialValue> {
    Ok(SpatialValue::Wkb(hex::decode(raw)?))
}
