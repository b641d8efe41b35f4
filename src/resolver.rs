//! Type name to OID resolution.
//!
//! OIDs of extension types differ between database instances, so they are
//! looked up in `pg_type` at runtime. The `OidResolver` trait is the seam the
//! registry calls through; `tokio_postgres::Client` implements it with a
//! single catalog query.

use std::collections::HashMap;
use std::future::Future;

use tracing::debug;

use crate::constants::LOG_TARGET;
use crate::error::Result;

/// Catalog query for a set of type names.
///
/// Ordered by OID so the oldest type wins when a name exists in several
/// schemas.
pub const RESOLVE_TYPE_OIDS_SQL: &str = "SELECT typname::text, oid \
     FROM pg_catalog.pg_type \
     WHERE typname::text = ANY($1::text[]) \
     ORDER BY oid";

/// Resolves type names to OIDs.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use postgis_types_rs::{OidResolver, Result};
///
/// struct Fixed(HashMap<String, u32>);
///
/// impl OidResolver for Fixed {
///     async fn resolve_type_oids(
///         &self,
///         _key: Option<&str>,
///         type_names: &[&str],
///     ) -> Result<HashMap<String, u32>> {
///         Ok(type_names
///             .iter()
///             .filter_map(|name| self.0.get(*name).map(|oid| (name.to_string(), *oid)))
///             .collect())
///     }
/// }
/// ```
pub trait OidResolver {
    /// Look up the OIDs of `type_names` for the scope `key`.
    ///
    /// Names the database does not know are left out of the map.
    fn resolve_type_oids(
        &self,
        key: Option<&str>,
        type_names: &[&str],
    ) -> impl Future<Output = Result<HashMap<String, u32>>> + Send;
}

impl OidResolver for tokio_postgres::Client {
    async fn resolve_type_oids(
        &self,
        key: Option<&str>,
        type_names: &[&str],
    ) -> Result<HashMap<String, u32>> {
        debug!(target: LOG_TARGET, ?key, count = type_names.len(), "querying pg_type");

        let rows = self.query(RESOLVE_TYPE_OIDS_SQL, &[&type_names]).await?;

        let mut oids = HashMap::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get(0)?;
            let oid: u32 = row.try_get(1)?;
            oids.entry(name).or_insert(oid);
        }
        Ok(oids)
    }
}
