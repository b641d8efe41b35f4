//! PostGIS type registry.
//!
//! The registry discovers the OIDs a database assigned to the PostGIS types,
//! binds a decoder to each, and remembers the OID ↔ name mapping. All state
//! is scoped by a registry key, so several databases or schemas can be
//! registered side by side without colliding. `None` is the default scope.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::constants::*;
use crate::decode::{parser_for, TypeParser};
use crate::error::Result;
use crate::parsers::TypeParsers;
use crate::resolver::OidResolver;
use crate::types::Typmod;

type ScopeKey = Option<String>;

/// Types resolved for one registry key.
#[derive(Default)]
struct ScopeTypes {
    oids: HashMap<String, u32>,
    names: HashMap<u32, String>,
    parsers: HashMap<u32, TypeParser>,
    geometry: Option<u32>,
    geometry_array: Option<u32>,
    geography: Option<u32>,
    geography_array: Option<u32>,
}

impl ScopeTypes {
    /// Build the scope from resolver output, binding decoders into `dispatch`.
    ///
    /// Only names from `TYPE_NAMES` are considered, so OIDs outside the
    /// PostGIS set are never written to the dispatch table.
    fn bind(resolved: &HashMap<String, u32>, dispatch: &TypeParsers) -> Self {
        let mut scope = ScopeTypes::default();

        for name in TYPE_NAMES {
            let Some(&oid) = resolved.get(name) else {
                trace!(target: LOG_TARGET, name, "type not resolved");
                continue;
            };

            scope.oids.insert(name.to_string(), oid);
            scope.names.insert(oid, name.to_string());

            if let Some(parser) = parser_for(name) {
                dispatch.set_type_parser(oid, parser.clone());
                scope.parsers.insert(oid, parser);
            }
        }

        scope.geometry = scope.oids.get(TYPE_GEOMETRY).copied();
        scope.geometry_array = scope.oids.get(TYPE_GEOMETRY_ARRAY).copied();
        scope.geography = scope.oids.get(TYPE_GEOGRAPHY).copied();
        scope.geography_array = scope.oids.get(TYPE_GEOGRAPHY_ARRAY).copied();
        scope
    }

    fn is_initialized(&self) -> bool {
        self.geometry.is_some()
    }

    fn is_geometry_type(&self, oid: u32) -> bool {
        [
            self.geometry,
            self.geography,
            self.geometry_array,
            self.geography_array,
        ]
        .contains(&Some(oid))
    }
}

/// Per-key PostGIS type registry.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use postgis_types_rs::{SpatialRegistry, TypeParsers};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let (client, connection) =
///         tokio_postgres::connect("host=localhost user=postgres", tokio_postgres::NoTls).await?;
///     tokio::spawn(connection);
///
///     let parsers = Arc::new(TypeParsers::new());
///     let registry = SpatialRegistry::new(parsers.clone());
///     registry.register(&client, None).await?;
///
///     if let Some(oid) = registry.type_oid("geometry", None) {
///         assert!(registry.is_geometry_type(oid, None));
///         assert!(parsers.contains(oid));
///     }
///     Ok(())
/// }
/// ```
pub struct SpatialRegistry {
    /// Client dispatch table decoders are installed into.
    dispatch: Arc<TypeParsers>,
    /// Resolved types per key.
    scopes: RwLock<HashMap<ScopeKey, ScopeTypes>>,
    /// In-flight registration guards for keys not yet registered.
    in_flight: Mutex<HashMap<ScopeKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl SpatialRegistry {
    /// Create a registry installing decoders into `dispatch`.
    pub fn new(dispatch: Arc<TypeParsers>) -> Self {
        Self {
            dispatch,
            scopes: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// The dispatch table this registry writes to.
    pub fn dispatch(&self) -> &Arc<TypeParsers> {
        &self.dispatch
    }

    /// Resolve the PostGIS type OIDs for `key` and install their decoders.
    ///
    /// Returns immediately if `key` is already registered. Concurrent calls
    /// for the same key wait for the first one, so at most one resolver
    /// round-trip is in flight per key. A resolver error is returned as is and
    /// leaves the key unregistered; the next call retries.
    pub async fn register<R: OidResolver>(&self, resolver: &R, key: Option<&str>) -> Result<()> {
        if self.is_registered(key) {
            trace!(target: LOG_TARGET, ?key, "already registered");
            return Ok(());
        }

        let guard = self.in_flight_guard(key);
        let _in_flight = guard.lock().await;

        if self.is_registered(key) {
            debug!(target: LOG_TARGET, ?key, "registered by a concurrent call");
            return Ok(());
        }

        debug!(target: LOG_TARGET, ?key, "resolving PostGIS type oids");
        let resolved = resolver.resolve_type_oids(key, &TYPE_NAMES).await?;

        let scope = ScopeTypes::bind(&resolved, &self.dispatch);
        let registered = scope.is_initialized();
        if registered {
            debug!(
                target: LOG_TARGET,
                ?key,
                types = scope.oids.len(),
                parsers = scope.parsers.len(),
                "registered PostGIS types"
            );
        } else {
            warn!(
                target: LOG_TARGET,
                ?key,
                "type 'geometry' not found; is the postgis extension installed?"
            );
        }

        self.scopes.write().insert(key.map(str::to_owned), scope);
        if registered {
            // Later calls return on the fast path; waiters hold their own Arc.
            self.in_flight.lock().remove(&key.map(str::to_owned));
        }
        Ok(())
    }

    /// Check whether `key` has a resolved geometry OID.
    pub fn is_registered(&self, key: Option<&str>) -> bool {
        self.with_scope(key, ScopeTypes::is_initialized)
            .unwrap_or(false)
    }

    /// Check whether `oid` is geometry, geography or an array of either.
    pub fn is_geometry_type(&self, oid: u32, key: Option<&str>) -> bool {
        self.with_scope(key, |scope| scope.is_geometry_type(oid))
            .unwrap_or(false)
    }

    /// Decoder bound to `oid` under `key`.
    pub fn type_parser(&self, oid: u32, key: Option<&str>) -> Option<TypeParser> {
        self.with_scope(key, |scope| scope.parsers.get(&oid).cloned())
            .flatten()
    }

    /// Type name of `oid` under `key`.
    pub fn type_name(&self, oid: u32, key: Option<&str>) -> Option<String> {
        self.with_scope(key, |scope| scope.names.get(&oid).cloned())
            .flatten()
    }

    /// OID of `type_name` under `key`.
    pub fn type_oid(&self, type_name: &str, key: Option<&str>) -> Option<u32> {
        self.with_scope(key, |scope| scope.oids.get(type_name).copied())
            .flatten()
    }

    /// All resolved name → OID pairs for `key`.
    pub fn oids(&self, key: Option<&str>) -> HashMap<String, u32> {
        self.with_scope(key, |scope| scope.oids.clone())
            .unwrap_or_default()
    }

    /// All resolved OID → name pairs for `key`.
    pub fn names(&self, key: Option<&str>) -> HashMap<u32, String> {
        self.with_scope(key, |scope| scope.names.clone())
            .unwrap_or_default()
    }

    /// Render a column type like the server's `format_type`, e.g.
    /// `geometry(Point,4326)` or `geography(Polygon,4326)[]`.
    ///
    /// Returns `None` if `oid` is not a PostGIS type under `key`.
    pub fn format_type(&self, oid: u32, typmod: i32, key: Option<&str>) -> Option<String> {
        let name = self.type_name(oid, key)?;
        let (base, suffix) = match name.strip_prefix(ARRAY_TYPE_PREFIX) {
            Some(base) => (base.to_string(), "[]"),
            None => (name.clone(), ""),
        };
        let modifier = match base.as_str() {
            TYPE_GEOMETRY | TYPE_GEOGRAPHY => Typmod(typmod).to_string(),
            _ => String::new(),
        };
        Some(format!("{}{}{}", base, modifier, suffix))
    }

    fn with_scope<T>(&self, key: Option<&str>, f: impl FnOnce(&ScopeTypes) -> T) -> Option<T> {
        let scopes = self.scopes.read();
        scopes.get(&key.map(str::to_owned)).map(f)
    }

    fn in_flight_guard(&self, key: Option<&str>) -> Arc<tokio::sync::Mutex<()>> {
        self.in_flight
            .lock()
            .entry(key.map(str::to_owned))
            .or_default()
            .clone()
    }
}

impl std::fmt::Debug for SpatialRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scopes = self.scopes.read();
        f.debug_struct("SpatialRegistry")
            .field("dispatch", &self.dispatch)
            .field("scopes", &scopes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved() -> HashMap<String, u32> {
        HashMap::from([
            ("geometry".to_string(), 17001),
            ("geography".to_string(), 17002),
            ("box2d".to_string(), 17003),
            ("geometry_dump".to_string(), 17004),
            ("_geometry".to_string(), 17011),
            ("_geography".to_string(), 17012),
            ("not_postgis".to_string(), 99),
        ])
    }

    #[test]
    fn test_bind_scope() {
        let dispatch = TypeParsers::new();
        let scope = ScopeTypes::bind(&resolved(), &dispatch);

        assert!(scope.is_initialized());
        assert_eq!(scope.oids.len(), 6);
        assert_eq!(scope.names.get(&17004).map(String::as_str), Some("geometry_dump"));
        // geometry_dump has no decoder
        assert_eq!(scope.parsers.len(), 5);
        assert_eq!(dispatch.len(), 5);
        assert!(!dispatch.contains(99));
        assert!(!dispatch.contains(17004));
    }

    #[test]
    fn test_geometry_oids() {
        let scope = ScopeTypes::bind(&resolved(), &TypeParsers::new());
        for oid in [17001, 17002, 17011, 17012] {
            assert!(scope.is_geometry_type(oid));
        }
        assert!(!scope.is_geometry_type(17003));
        assert!(!scope.is_geometry_type(0));
    }

    #[test]
    fn test_bind_without_geometry() {
        let resolved = HashMap::from([("box2d".to_string(), 5)]);
        let scope = ScopeTypes::bind(&resolved, &TypeParsers::new());
        assert!(!scope.is_initialized());
        assert!(!scope.is_geometry_type(5));
    }

    struct FixedResolver(HashMap<String, u32>);

    impl OidResolver for FixedResolver {
        async fn resolve_type_oids(
            &self,
            _key: Option<&str>,
            _type_names: &[&str],
        ) -> Result<HashMap<String, u32>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_register_keeps_unrelated_parsers() {
        let dispatch = Arc::new(TypeParsers::new());
        dispatch.set_type_parser(99, crate::decode::allow_null(crate::decode::decode_box));
        let registry = SpatialRegistry::new(dispatch.clone());

        tokio_test::block_on(registry.register(&FixedResolver(resolved()), None)).unwrap();

        assert!(registry.is_registered(None));
        // 99 came back from the resolver as "not_postgis"; the existing
        // parser must survive and the name must not be recorded.
        assert!(dispatch.contains(99));
        assert_eq!(registry.type_name(99, None), None);
        assert_eq!(dispatch.len(), 6);
    }

    #[test]
    fn test_guard_released_after_register() {
        let registry = SpatialRegistry::new(Arc::new(TypeParsers::new()));
        let missing = FixedResolver(HashMap::from([("box2d".to_string(), 5)]));

        tokio_test::block_on(registry.register(&missing, Some("bare"))).unwrap();
        assert!(!registry.is_registered(Some("bare")));
        assert_eq!(registry.in_flight.lock().len(), 1);

        for key in [None, Some("a"), Some("b")] {
            tokio_test::block_on(registry.register(&FixedResolver(resolved()), key)).unwrap();
            assert!(registry.is_registered(key));
        }
        tokio_test::block_on(registry.register(&FixedResolver(resolved()), Some("bare")))
            .unwrap();

        assert!(registry.in_flight.lock().is_empty());
    }

    #[test]
    fn test_format_type() {
        let registry = SpatialRegistry::new(Arc::new(TypeParsers::new()));
        let scope = ScopeTypes::bind(&resolved(), &registry.dispatch);
        registry.scopes.write().insert(None, scope);

        let point_4326 = Typmod::new(crate::types::GeometryType::Point, 4326, false, false).0;
        assert_eq!(
            registry.format_type(17001, point_4326, None).as_deref(),
            Some("geometry(Point,4326)")
        );
        assert_eq!(
            registry.format_type(17012, point_4326, None).as_deref(),
            Some("geography(Point,4326)[]")
        );
        assert_eq!(
            registry.format_type(17001, -1, None).as_deref(),
            Some("geometry")
        );
        assert_eq!(registry.format_type(17003, -1, None).as_deref(), Some("box2d"));
        assert_eq!(registry.format_type(17001, -1, Some("other")), None);
        assert_eq!(registry.format_type(1, -1, None), None);
    }
}
