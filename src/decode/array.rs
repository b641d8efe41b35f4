//! Array literal decoder for PostGIS array types.
//!
//! PostgreSQL prints arrays as `{elem,elem,...}` using the element type's
//! `typdelim`. PostGIS declares `:` for its types, so `_geometry` comes back
//! as `{0101...:0101...}`. The decoder rewrites every `:` to `,` and then
//! parses a standard array literal.
//!
//! The rewrite is blind: a `:` inside a quoted element is turned into a `,`
//! as well. Hex EWKB and box text never contain one.

use std::iter::Peekable;
use std::str::CharIndices;

use super::{allow_null, TypeParser};
use crate::constants::POSTGIS_ARRAY_DELIMITER;
use crate::error::{Error, Result};
use crate::types::SpatialValue;

/// Wrap an element decoder into a null-safe array decoder.
pub fn decode_array<F>(element: F) -> TypeParser
where
    F: Fn(&str) -> Result<SpatialValue> + Send + Sync + 'static,
{
    let element = allow_null(element);
    allow_null(move |raw| {
        let literal = raw.replace(POSTGIS_ARRAY_DELIMITER, ",");
        parse_array_literal(&literal, &*element).map(SpatialValue::Array)
    })
}

/// Parse a `,`-delimited array literal, decoding each element.
///
/// Unquoted `NULL` (any case) is passed to `element` as `None`. Nested
/// arrays become nested [`SpatialValue::Array`] values. A leading dimension
/// decoration such as `[1:2]=` is skipped.
///
/// The whole literal is parsed before any element is decoded, so a
/// malformed literal is reported as [`Error::InvalidArrayLiteral`] even when
/// its elements would not decode either.
pub fn parse_array_literal(
    source: &str,
    element: &dyn Fn(Option<&str>) -> Result<SpatialValue>,
) -> Result<Vec<SpatialValue>> {
    let mut parser = ArrayParser {
        source,
        chars: source.char_indices().peekable(),
    };
    parser.skip_dimensions()?;
    parser.skip_whitespace();
    let items = parser.parse_array()?;
    parser.skip_whitespace();
    if let Some((pos, c)) = parser.chars.next() {
        return Err(Error::invalid_array(
            pos,
            format!("unexpected {:?} after closing '}}'", c),
        ));
    }
    decode_items(items, element)
}

/// Element text of a parsed literal, not yet decoded.
enum RawItem {
    Null,
    Text(String),
    Array(Vec<RawItem>),
}

fn decode_items(
    items: Vec<RawItem>,
    element: &dyn Fn(Option<&str>) -> Result<SpatialValue>,
) -> Result<Vec<SpatialValue>> {
    items
        .into_iter()
        .map(|item| match item {
            RawItem::Null => element(None),
            RawItem::Text(text) => element(Some(&text)),
            RawItem::Array(nested) => decode_items(nested, element).map(SpatialValue::Array),
        })
        .collect()
}

struct ArrayParser<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl ArrayParser<'_> {
    fn position(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(pos, _)| *pos)
            .unwrap_or(self.source.len())
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.chars.peek(), Some((_, c)) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn skip_dimensions(&mut self) -> Result<()> {
        if !matches!(self.chars.peek(), Some((_, '['))) {
            return Ok(());
        }
        for (_, c) in self.chars.by_ref() {
            if c == '=' {
                return Ok(());
            }
        }
        Err(Error::invalid_array(
            self.source.len(),
            "dimension decoration without '='",
        ))
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        let pos = self.position();
        match self.chars.next() {
            Some((_, c)) if c == expected => Ok(()),
            Some((_, c)) => Err(Error::invalid_array(
                pos,
                format!("expected {:?}, found {:?}", expected, c),
            )),
            None => Err(Error::invalid_array(
                pos,
                format!("expected {:?}, found end of input", expected),
            )),
        }
    }

    fn parse_array(&mut self) -> Result<Vec<RawItem>> {
        self.expect('{')?;
        let mut items = Vec::new();

        self.skip_whitespace();
        if matches!(self.chars.peek(), Some((_, '}'))) {
            self.chars.next();
            return Ok(items);
        }

        loop {
            self.skip_whitespace();
            let item = match self.chars.peek() {
                Some((_, '{')) => RawItem::Array(self.parse_array()?),
                Some((_, '"')) => RawItem::Text(self.parse_quoted()?),
                _ => match self.parse_unquoted()? {
                    Some(text) => RawItem::Text(text),
                    None => RawItem::Null,
                },
            };
            items.push(item);

            self.skip_whitespace();
            let pos = self.position();
            match self.chars.next() {
                Some((_, ',')) => continue,
                Some((_, '}')) => return Ok(items),
                Some((_, c)) => {
                    return Err(Error::invalid_array(
                        pos,
                        format!("expected ',' or '}}', found {:?}", c),
                    ))
                }
                None => return Err(Error::invalid_array(pos, "unterminated array")),
            }
        }
    }

    fn parse_quoted(&mut self) -> Result<String> {
        let start = self.position();
        self.expect('"')?;
        let mut text = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(text),
                Some((_, '\\')) => match self.chars.next() {
                    Some((_, c)) => text.push(c),
                    None => break,
                },
                Some((_, c)) => text.push(c),
                None => break,
            }
        }
        Err(Error::invalid_array(start, "unterminated quoted element"))
    }

    /// Returns `None` for an unquoted `NULL`.
    fn parse_unquoted(&mut self) -> Result<Option<String>> {
        let start = self.position();
        let mut text = String::new();
        let mut escaped = false;
        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                ',' | '}' => break,
                '{' | '"' => {
                    return Err(Error::invalid_array(
                        self.position(),
                        format!("unexpected {:?} in unquoted element", c),
                    ))
                }
                '\\' => {
                    self.chars.next();
                    match self.chars.next() {
                        Some((_, c)) => text.push(c),
                        None => return Err(Error::invalid_array(start, "dangling escape")),
                    }
                    escaped = true;
                    continue;
                }
                _ => text.push(c),
            }
            self.chars.next();
        }

        let text = text.trim_end();
        if text.is_empty() && !escaped {
            return Err(Error::invalid_array(start, "empty element"));
        }
        if !escaped && text.eq_ignore_ascii_case("NULL") {
            return Ok(None);
        }
        Ok(Some(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode_box, decode_geometry};
    use geo_types::{Geometry, Point};

    const POINT_1_2: &str = "0101000000000000000000F03F0000000000000040";
    const POINT_3_4: &str = "010100000000000000000008400000000000001040";

    fn text(raw: Option<&str>) -> Result<SpatialValue> {
        // Keep the element text as bytes so assertions can compare it.
        Ok(match raw {
            Some(s) => SpatialValue::Wkb(s.as_bytes().to_vec()),
            None => SpatialValue::Null,
        })
    }

    fn strings(items: &[SpatialValue]) -> Vec<Option<String>> {
        items
            .iter()
            .map(|v| v.as_wkb().map(|b| String::from_utf8(b.to_vec()).unwrap()))
            .collect()
    }

    fn point(x: f64, y: f64) -> SpatialValue {
        SpatialValue::Geometry(Geometry::Point(Point::new(x, y)))
    }

    #[test]
    fn test_parse_simple() {
        let items = parse_array_literal("{a,b,c}", &text).unwrap();
        assert_eq!(
            strings(&items),
            vec![Some("a".into()), Some("b".into()), Some("c".into())]
        );
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_array_literal("{}", &text).unwrap().is_empty());
        assert!(parse_array_literal("{ }", &text).unwrap().is_empty());
    }

    #[test]
    fn test_parse_null_and_quoted() {
        let items = parse_array_literal(r#"{NULL,"NULL",null,"a\"b","x,y"}"#, &text).unwrap();
        assert_eq!(
            strings(&items),
            vec![
                None,
                Some("NULL".into()),
                None,
                Some("a\"b".into()),
                Some("x,y".into())
            ]
        );
    }

    #[test]
    fn test_parse_nested() {
        let items = parse_array_literal("{{a,b},{c,NULL}}", &text).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            strings(items[0].as_array().unwrap()),
            vec![Some("a".into()), Some("b".into())]
        );
        assert_eq!(
            strings(items[1].as_array().unwrap()),
            vec![Some("c".into()), None]
        );
    }

    #[test]
    fn test_parse_dimension_decoration() {
        let items = parse_array_literal("[0,1]={a,b}", &text).unwrap();
        assert_eq!(strings(&items), vec![Some("a".into()), Some("b".into())]);
    }

    #[test]
    fn test_parse_malformed() {
        for bad in ["", "a,b", "{a,b", "{\"a}", "{a}x", "{a,,b}", "{a b\"c}"] {
            let err = parse_array_literal(bad, &text).unwrap_err();
            assert!(
                matches!(err, Error::InvalidArrayLiteral { .. }),
                "{:?} gave {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_geometry_array() {
        let parser = decode_array(decode_geometry);
        let raw = format!("{{{}:NULL:{}}}", POINT_1_2, POINT_3_4);
        let value = parser(Some(&raw)).unwrap();
        assert_eq!(
            value,
            SpatialValue::Array(vec![point(1.0, 2.0), SpatialValue::Null, point(3.0, 4.0)])
        );
    }

    #[test]
    fn test_box_array() {
        let parser = decode_array(decode_box);
        let value = parser(Some(r#"{"BOX(1 2,5 6)":"BOX(0 0,1 1)"}"#)).unwrap();
        let boxes: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_box().unwrap().coordinates())
            .collect();
        assert_eq!(
            boxes,
            vec![
                vec![vec![1.0, 2.0], vec![5.0, 6.0]],
                vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            ]
        );
    }

    #[test]
    fn test_array_null_passthrough() {
        let parser = decode_array(decode_box);
        assert_eq!(parser(None).unwrap(), SpatialValue::Null);
        assert_eq!(parser(Some("")).unwrap(), SpatialValue::Null);
    }

    #[test]
    fn test_structural_error_before_element_error() {
        // "0101" alone is not valid WKB, but the missing '}' is reported.
        let parser = decode_array(decode_geometry);
        let err = parser(Some("{0101")).unwrap_err();
        assert!(
            matches!(err, Error::InvalidArrayLiteral { position: 5, .. }),
            "got {:?}",
            err
        );

        let raw = format!("{{{}:0101", POINT_1_2);
        assert!(matches!(
            parser(Some(&raw)),
            Err(Error::InvalidArrayLiteral { .. })
        ));
    }

    #[test]
    fn test_array_element_error() {
        let parser = decode_array(decode_box);
        let err = parser(Some(r#"{"BOX(1 2,5 6)":"BOX(x 2,5 6)"}"#)).unwrap_err();
        assert!(matches!(err, Error::InvalidBox { .. }));
    }
}
