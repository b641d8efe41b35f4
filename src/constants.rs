//! PostGIS type names and typmod layout constants.
//!
//! The typmod masks mirror the `TYPMOD_*` macros in PostGIS `liblwgeom.h`.

/// Spatial type names resolved against `pg_type` on registration.
///
/// A leading underscore is PostgreSQL's naming for the array type of the
/// base name.
pub const TYPE_NAMES: [&str; 10] = [
    TYPE_GEOMETRY,
    TYPE_GEOMETRY_DUMP,
    TYPE_GEOGRAPHY,
    TYPE_BOX2D,
    TYPE_BOX3D,
    TYPE_GEOMETRY_ARRAY,
    TYPE_GEOMETRY_DUMP_ARRAY,
    TYPE_GEOGRAPHY_ARRAY,
    TYPE_BOX2D_ARRAY,
    TYPE_BOX3D_ARRAY,
];

pub const TYPE_GEOMETRY: &str = "geometry";
pub const TYPE_GEOMETRY_DUMP: &str = "geometry_dump";
pub const TYPE_GEOGRAPHY: &str = "geography";
pub const TYPE_BOX2D: &str = "box2d";
pub const TYPE_BOX3D: &str = "box3d";
pub const TYPE_GEOMETRY_ARRAY: &str = "_geometry";
pub const TYPE_GEOMETRY_DUMP_ARRAY: &str = "_geometry_dump";
pub const TYPE_GEOGRAPHY_ARRAY: &str = "_geography";
pub const TYPE_BOX2D_ARRAY: &str = "_box2d";
pub const TYPE_BOX3D_ARRAY: &str = "_box3d";

/// Prefix PostgreSQL gives array type names.
pub const ARRAY_TYPE_PREFIX: char = '_';

/// Element delimiter PostGIS declares for its types (`typdelim`).
pub const POSTGIS_ARRAY_DELIMITER: char = ':';

// Typmod bit fields
pub const TYPMOD_SRID_MASK: i32 = 0x1FFF_FF00;
pub const TYPMOD_TYPE_MASK: i32 = 0x0000_00FC;
pub const TYPMOD_Z_MASK: i32 = 0x0000_0002;
pub const TYPMOD_M_MASK: i32 = 0x0000_0001;

/// Width of the signed SRID field.
pub const TYPMOD_SRID_BITS: i32 = 0x001F_FFFF;

/// Tracing target for this crate.
pub const LOG_TARGET: &str = "postgis";
