//! PostGIS value and metadata types.

mod column;
mod row;
pub mod typmod;
mod value;

pub use column::{Column, ColumnInfo};
pub use row::Row;
pub use typmod::{GeometryType, Typmod, TypmodFields, GEOMETRY_TYPES};
pub use value::{BoxValue, ColumnValue, SpatialValue};
