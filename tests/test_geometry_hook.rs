//! The geometry parser hook is process-wide, so it is exercised in its own
//! test binary with a single test.

use std::collections::HashMap;
use std::sync::Arc;

use postgis_types_rs::decode::raw_wkb_parser;
use postgis_types_rs::{
    reset_geometry_parser, set_geometry_parser, OidResolver, Result, SpatialRegistry,
    SpatialValue, TypeParsers,
};

const POINT_1_2: &str = "0101000000000000000000F03F0000000000000040";

struct Resolver;

impl OidResolver for Resolver {
    async fn resolve_type_oids(
        &self,
        _key: Option<&str>,
        _type_names: &[&str],
    ) -> Result<HashMap<String, u32>> {
        Ok(HashMap::from([
            ("geometry".to_string(), 100),
            ("geography".to_string(), 101),
            ("_geometry".to_string(), 102),
        ]))
    }
}

#[tokio::test]
async fn test_swap_geometry_parser() {
    let parsers = Arc::new(TypeParsers::new());
    let registry = SpatialRegistry::new(parsers.clone());
    registry.register(&Resolver, None).await.unwrap();

    let decoded = parsers.parse(100, Some(POINT_1_2)).unwrap().unwrap();
    assert!(decoded.as_geometry().is_some());

    // Installed decoders pick up the new hook without re-registering.
    set_geometry_parser(raw_wkb_parser);
    let raw = parsers.parse(101, Some(POINT_1_2)).unwrap().unwrap();
    assert_eq!(raw.as_wkb().map(|b| b.len()), Some(21));

    let array = parsers
        .parse(102, Some(&format!("{{{}:{}}}", POINT_1_2, POINT_1_2)))
        .unwrap()
        .unwrap();
    assert!(array
        .as_array()
        .unwrap()
        .iter()
        .all(|v| matches!(v, SpatialValue::Wkb(_))));

    // Custom representation: the parser sees the raw hex text.
    set_geometry_parser(|raw: &str| Ok(SpatialValue::Wkb(raw.as_bytes().to_vec())));
    let text = parsers.parse(100, Some("ABCD")).unwrap().unwrap();
    assert_eq!(text.as_wkb(), Some(&b"ABCD"[..]));
    // Nulls never reach the hook.
    assert_eq!(parsers.parse(100, None).unwrap().unwrap(), SpatialValue::Null);

    reset_geometry_parser();
    let decoded = parsers.parse(100, Some(POINT_1_2)).unwrap().unwrap();
    assert!(decoded.as_geometry().is_some());
}
