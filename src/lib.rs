//! PostGIS types for tokio-postgres.
//!
//! Decodes PostGIS `geometry`, `geography`, `box2d`, `box3d` and their array
//! forms from PostgreSQL text output, and unpacks geometry type modifiers.
//!
//! PostGIS is an extension, so its type OIDs differ between databases. A
//! [`SpatialRegistry`] looks them up once per connection (or any other key),
//! binds a decoder to each OID in a shared [`TypeParsers`] table, and keeps
//! the OID ↔ name mapping for later lookups.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use postgis_types_rs::{query, SpatialRegistry, TypeParsers, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let (client, connection) =
//!         tokio_postgres::connect("host=localhost user=postgres", tokio_postgres::NoTls).await?;
//!     tokio::spawn(connection);
//!
//!     let parsers = Arc::new(TypeParsers::new());
//!     let registry = SpatialRegistry::new(parsers.clone());
//!     registry.register(&client, None).await?;
//!
//!     let result = query(&client, &parsers, "SELECT ST_MakePoint(1, 2) AS geom").await?;
//!     if let Some(geom) = result.rows[0].spatial("geom") {
//!         println!("{}", geom.to_geojson()?);
//!     }
//!
//!     // Typmod of a `geometry(Point,4326)` column
//!     assert_eq!(postgis_types_rs::typename(1_107_460), "(Point,4326)");
//!     Ok(())
//! }
//! ```

pub mod constants;
pub mod decode;
pub mod error;
pub mod parsers;
pub mod query;
pub mod registry;
pub mod resolver;
pub mod types;

// Re-export main types
pub use decode::{
    decode_array, decode_box, decode_geometry, reset_geometry_parser, set_geometry_parser,
    GeometryParser, TypeParser,
};
pub use error::{Error, Result};
pub use parsers::TypeParsers;
pub use query::{query, QueryResult};
pub use registry::SpatialRegistry;
pub use resolver::OidResolver;
pub use types::typmod::{m, ndims, srid, type_code, typename, typeobj, z};
pub use types::{
    BoxValue, Column, ColumnInfo, ColumnValue, GeometryType, Row, SpatialValue, Typmod,
    TypmodFields, GEOMETRY_TYPES,
};
