//! `box2d` / `box3d` text decoder.
//!
//! Text form is `BOX(x1 y1,x2 y2)` or `BOX3D(x1 y1 z1,x2 y2 z2)`.

use crate::error::{Error, Result};
use crate::types::{BoxValue, SpatialValue};

/// Decode box text into its two corners.
pub fn decode_box(raw: &str) -> Result<SpatialValue> {
    let open = raw
        .find('(')
        .ok_or_else(|| Error::invalid_box(raw, "missing '('"))?;
    let close = raw
        .find(')')
        .ok_or_else(|| Error::invalid_box(raw, "missing ')'"))?;
    if close < open {
        return Err(Error::invalid_box(raw, "')' before '('"));
    }

    let mut corners = Vec::with_capacity(2);
    for pair in raw[open + 1..close].split(',') {
        let corner = pair
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|e| {
                    Error::invalid_box(raw, format!("invalid ordinate {:?}: {}", token, e))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        corners.push(corner);
    }

    match <[Vec<f64>; 2]>::try_from(corners) {
        Ok([min, max]) => Ok(SpatialValue::Box(BoxValue::new(min, max))),
        Err(corners) => Err(Error::invalid_box(
            raw,
            format!("expected 2 corners, found {}", corners.len()),
        )),
    }
}
