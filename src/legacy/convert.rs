//! Primitive value parsers for directive parameters.

use cgmath::{Vector3, Vector4};
use thiserror::Error;

use crate::model::ColorEx;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HelperError {
    #[error("expected at least {expected} values, found {found}")]
    MissingElement { expected: usize, found: usize },

    #[error("`{0}` is not a number")]
    InvalidNumber(String),
}

/// `true`/`on` and `false`/`off`, case-sensitive.  Anything else reads as
/// `false`.
pub fn parse_bool(value: &str) -> bool {
    match value {
        "true" | "on" => true,
        "false" | "off" => false,
        _ => false,
    }
}

pub fn parse_float(value: &str) -> Result<f32, HelperError> {
    value
        .trim()
        .parse()
        .map_err(|_| HelperError::InvalidNumber(value.to_string()))
}

fn parse_floats<const N: usize>(values: &[&str]) -> Result<[f32; N], HelperError> {
    if values.len() < N {
        return Err(HelperError::MissingElement {
            expected: N,
            found: values.len(),
        });
    }

    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = parse_float(value)?;
    }
    Ok(out)
}

/// Three or four components; alpha defaults to 1.
pub fn parse_color(values: &[&str]) -> Result<ColorEx, HelperError> {
    let [r, g, b] = parse_floats::<3>(values)?;
    let a = match values.get(3) {
        Some(alpha) => parse_float(alpha)?,
        None => 1.0,
    };
    Ok(ColorEx::new(r, g, b, a))
}

pub fn parse_color_str(value: &str) -> Result<ColorEx, HelperError> {
    let values: Vec<_> = value.split_whitespace().collect();
    parse_color(&values)
}

pub fn parse_vector3(values: &[&str]) -> Result<Vector3<f32>, HelperError> {
    let [x, y, z] = parse_floats::<3>(values)?;
    Ok(Vector3::new(x, y, z))
}

pub fn parse_vector4(values: &[&str]) -> Result<Vector4<f32>, HelperError> {
    let [x, y, z, w] = parse_floats::<4>(values)?;
    Ok(Vector4::new(x, y, z, w))
}
