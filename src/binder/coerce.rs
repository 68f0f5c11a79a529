//! Value coercion engine.
//!
//! Converts raw string values into typed field values (bind direction)
//! and typed field values back into their canonical string form (encode
//! direction), dispatching on the field's [`FieldKind`] tag and writing
//! through `&dyn Any` slots.
//!
//! Coercion rules:
//! - strings are taken verbatim;
//! - integers and floats parse at the field's declared width, with the
//!   empty string coercing to zero;
//! - booleans accept `true`/`false`/`1`/`0`/`t`/`f` (and case
//!   variants), with the empty string coercing to `false`;
//! - the `Json` kind stores the raw string verbatim as a
//!   `serde_json::Value::String`;
//! - `Vec<T>` fields apply the scalar rule element-wise, producing a
//!   vector whose length equals the supplied value count.

use std::any::Any;
use std::str::FromStr;

use serde_json::Value;

use super::error::BindError;
use super::field::{FieldKind, ScalarKind};

/// Apply `values` to the field slot according to its kind.
///
/// A `Nested` kind with an explicit external name, or an `Opaque` kind,
/// has no built-in rule; reaching here without a registered decoder is
/// an [`BindError::UnsupportedKind`].
pub(crate) fn assign(
    kind: &FieldKind,
    type_name: &'static str,
    name: &str,
    slot: &mut dyn Any,
    values: &[String],
) -> Result<(), BindError> {
    match *kind {
        FieldKind::Scalar(scalar) => {
            let raw = values.first().map(String::as_str).unwrap_or("");
            assign_scalar(scalar, type_name, name, slot, raw)
        }
        FieldKind::List(scalar) => assign_list(scalar, type_name, name, slot, values),
        FieldKind::Nested(_) | FieldKind::Opaque => Err(BindError::UnsupportedKind {
            field: name.to_string(),
        }),
    }
}

fn assign_scalar(
    kind: ScalarKind,
    type_name: &'static str,
    name: &str,
    slot: &mut dyn Any,
    raw: &str,
) -> Result<(), BindError> {
    match kind {
        ScalarKind::Str => put(slot, type_name, raw.to_string()),
        ScalarKind::I8 => put(slot, type_name, parse_or_zero::<i8>(kind, name, raw)?),
        ScalarKind::I16 => put(slot, type_name, parse_or_zero::<i16>(kind, name, raw)?),
        ScalarKind::I32 => put(slot, type_name, parse_or_zero::<i32>(kind, name, raw)?),
        ScalarKind::I64 => put(slot, type_name, parse_or_zero::<i64>(kind, name, raw)?),
        ScalarKind::Isize => put(slot, type_name, parse_or_zero::<isize>(kind, name, raw)?),
        ScalarKind::U8 => put(slot, type_name, parse_or_zero::<u8>(kind, name, raw)?),
        ScalarKind::U16 => put(slot, type_name, parse_or_zero::<u16>(kind, name, raw)?),
        ScalarKind::U32 => put(slot, type_name, parse_or_zero::<u32>(kind, name, raw)?),
        ScalarKind::U64 => put(slot, type_name, parse_or_zero::<u64>(kind, name, raw)?),
        ScalarKind::Usize => put(slot, type_name, parse_or_zero::<usize>(kind, name, raw)?),
        ScalarKind::F32 => put(slot, type_name, parse_or_zero::<f32>(kind, name, raw)?),
        ScalarKind::F64 => put(slot, type_name, parse_or_zero::<f64>(kind, name, raw)?),
        ScalarKind::Bool => put(slot, type_name, parse_bool(name, raw)?),
        ScalarKind::Json => put(slot, type_name, Value::String(raw.to_string())),
    }
}

fn assign_list(
    kind: ScalarKind,
    type_name: &'static str,
    name: &str,
    slot: &mut dyn Any,
    values: &[String],
) -> Result<(), BindError> {
    match kind {
        ScalarKind::Str => fill(slot, type_name, values, |raw| Ok(raw.to_string())),
        ScalarKind::I8 => fill(slot, type_name, values, |raw| parse_or_zero::<i8>(kind, name, raw)),
        ScalarKind::I16 => fill(slot, type_name, values, |raw| parse_or_zero::<i16>(kind, name, raw)),
        ScalarKind::I32 => fill(slot, type_name, values, |raw| parse_or_zero::<i32>(kind, name, raw)),
        ScalarKind::I64 => fill(slot, type_name, values, |raw| parse_or_zero::<i64>(kind, name, raw)),
        ScalarKind::Isize => fill(slot, type_name, values, |raw| parse_or_zero::<isize>(kind, name, raw)),
        ScalarKind::U8 => fill(slot, type_name, values, |raw| parse_or_zero::<u8>(kind, name, raw)),
        ScalarKind::U16 => fill(slot, type_name, values, |raw| parse_or_zero::<u16>(kind, name, raw)),
        ScalarKind::U32 => fill(slot, type_name, values, |raw| parse_or_zero::<u32>(kind, name, raw)),
        ScalarKind::U64 => fill(slot, type_name, values, |raw| parse_or_zero::<u64>(kind, name, raw)),
        ScalarKind::Usize => fill(slot, type_name, values, |raw| parse_or_zero::<usize>(kind, name, raw)),
        ScalarKind::F32 => fill(slot, type_name, values, |raw| parse_or_zero::<f32>(kind, name, raw)),
        ScalarKind::F64 => fill(slot, type_name, values, |raw| parse_or_zero::<f64>(kind, name, raw)),
        ScalarKind::Bool => fill(slot, type_name, values, |raw| parse_bool(name, raw)),
        ScalarKind::Json => fill(slot, type_name, values, |raw| Ok(Value::String(raw.to_string()))),
    }
}

fn put<T: 'static>(slot: &mut dyn Any, type_name: &'static str, value: T) -> Result<(), BindError> {
    let slot = slot
        .downcast_mut::<T>()
        .ok_or(BindError::InvalidTarget { type_name })?;
    *slot = value;
    Ok(())
}

fn fill<T: 'static>(
    slot: &mut dyn Any,
    type_name: &'static str,
    values: &[String],
    parse: impl Fn(&str) -> Result<T, BindError>,
) -> Result<(), BindError> {
    let list = slot
        .downcast_mut::<Vec<T>>()
        .ok_or(BindError::InvalidTarget { type_name })?;
    let mut out = Vec::with_capacity(values.len());
    for raw in values {
        out.push(parse(raw)?);
    }
    *list = out;
    Ok(())
}

fn parse_or_zero<T>(kind: ScalarKind, name: &str, raw: &str) -> Result<T, BindError>
where
    T: FromStr + Default,
{
    if raw.is_empty() {
        return Ok(T::default());
    }
    raw.parse::<T>().map_err(|_| BindError::Conversion {
        field: name.to_string(),
        value: raw.to_string(),
        kind: kind.name(),
    })
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, BindError> {
    match raw {
        "" | "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        _ => Err(BindError::Conversion {
            field: name.to_string(),
            value: raw.to_string(),
            kind: "bool",
        }),
    }
}

/// Render a scalar field to its canonical string form.
///
/// Returns `None` when the field is suppressed by `omitempty` (or, for
/// the `Json` kind, holds `Null`).
pub(crate) fn render_scalar(kind: ScalarKind, slot: &dyn Any, omit_empty: bool) -> Option<String> {
    match kind {
        ScalarKind::Str => render_one::<String>(slot, omit_empty),
        ScalarKind::I8 => render_one::<i8>(slot, omit_empty),
        ScalarKind::I16 => render_one::<i16>(slot, omit_empty),
        ScalarKind::I32 => render_one::<i32>(slot, omit_empty),
        ScalarKind::I64 => render_one::<i64>(slot, omit_empty),
        ScalarKind::Isize => render_one::<isize>(slot, omit_empty),
        ScalarKind::U8 => render_one::<u8>(slot, omit_empty),
        ScalarKind::U16 => render_one::<u16>(slot, omit_empty),
        ScalarKind::U32 => render_one::<u32>(slot, omit_empty),
        ScalarKind::U64 => render_one::<u64>(slot, omit_empty),
        ScalarKind::Usize => render_one::<usize>(slot, omit_empty),
        ScalarKind::F32 => render_one::<f32>(slot, omit_empty),
        ScalarKind::F64 => render_one::<f64>(slot, omit_empty),
        ScalarKind::Bool => render_one::<bool>(slot, omit_empty),
        ScalarKind::Json => render_json(slot.downcast_ref::<Value>()?, omit_empty),
    }
}

/// Render a list field element-wise, preserving element order.
///
/// `omitempty` applies per element.
pub(crate) fn render_list(kind: ScalarKind, slot: &dyn Any, omit_empty: bool) -> Vec<String> {
    match kind {
        ScalarKind::Str => render_each::<String>(slot, omit_empty),
        ScalarKind::I8 => render_each::<i8>(slot, omit_empty),
        ScalarKind::I16 => render_each::<i16>(slot, omit_empty),
        ScalarKind::I32 => render_each::<i32>(slot, omit_empty),
        ScalarKind::I64 => render_each::<i64>(slot, omit_empty),
        ScalarKind::Isize => render_each::<isize>(slot, omit_empty),
        ScalarKind::U8 => render_each::<u8>(slot, omit_empty),
        ScalarKind::U16 => render_each::<u16>(slot, omit_empty),
        ScalarKind::U32 => render_each::<u32>(slot, omit_empty),
        ScalarKind::U64 => render_each::<u64>(slot, omit_empty),
        ScalarKind::Usize => render_each::<usize>(slot, omit_empty),
        ScalarKind::F32 => render_each::<f32>(slot, omit_empty),
        ScalarKind::F64 => render_each::<f64>(slot, omit_empty),
        ScalarKind::Bool => render_each::<bool>(slot, omit_empty),
        ScalarKind::Json => match slot.downcast_ref::<Vec<Value>>() {
            Some(list) => list
                .iter()
                .filter_map(|v| render_json(v, omit_empty))
                .collect(),
            None => Vec::new(),
        },
    }
}

fn render_one<T>(slot: &dyn Any, omit_empty: bool) -> Option<String>
where
    T: ToString + Default + PartialEq + 'static,
{
    let value = slot.downcast_ref::<T>()?;
    if omit_empty && *value == T::default() {
        return None;
    }
    Some(value.to_string())
}

fn render_each<T>(slot: &dyn Any, omit_empty: bool) -> Vec<String>
where
    T: ToString + Default + PartialEq + 'static,
{
    match slot.downcast_ref::<Vec<T>>() {
        Some(list) => list
            .iter()
            .filter(|v| !(omit_empty && **v == T::default()))
            .map(ToString::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn render_json(value: &Value, omit_empty: bool) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            if omit_empty && s.is_empty() {
                None
            } else {
                Some(s.clone())
            }
        }
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::field::{BindField, FieldKind};

    fn kind_of<T: BindField>() -> FieldKind {
        T::field_kind()
    }

    fn one(v: &str) -> Vec<String> {
        vec![v.to_string()]
    }

    #[test]
    fn test_int_parses_at_declared_width() {
        let mut v: i8 = 0;
        assign(&kind_of::<i8>(), "t", "n", &mut v, &one("-12")).unwrap();
        assert_eq!(v, -12);
        let err = assign(&kind_of::<i8>(), "t", "n", &mut v, &one("300")).unwrap_err();
        assert!(matches!(err, BindError::Conversion { .. }));
    }

    #[test]
    fn test_empty_string_coerces_to_zero() {
        let mut i: i64 = 7;
        assign(&kind_of::<i64>(), "t", "n", &mut i, &one("")).unwrap();
        assert_eq!(i, 0);

        let mut f: f64 = 1.5;
        assign(&kind_of::<f64>(), "t", "n", &mut f, &one("")).unwrap();
        assert_eq!(f, 0.0);

        let mut b = true;
        assign(&kind_of::<bool>(), "t", "n", &mut b, &one("")).unwrap();
        assert!(!b);
    }

    #[test]
    fn test_bool_literals() {
        for raw in ["1", "t", "true", "True", "TRUE"] {
            let mut b = false;
            assign(&kind_of::<bool>(), "t", "n", &mut b, &one(raw)).unwrap();
            assert!(b, "{raw} should parse as true");
        }
        for raw in ["0", "f", "false", "False", "FALSE"] {
            let mut b = true;
            assign(&kind_of::<bool>(), "t", "n", &mut b, &one(raw)).unwrap();
            assert!(!b, "{raw} should parse as false");
        }
        let mut b = false;
        let err = assign(&kind_of::<bool>(), "t", "n", &mut b, &one("yes")).unwrap_err();
        assert!(matches!(err, BindError::Conversion { .. }));
    }

    #[test]
    fn test_list_length_equals_value_count() {
        let mut v: Vec<u32> = Vec::new();
        let values: Vec<String> = vec!["1".into(), "2".into(), "3".into()];
        assign(&kind_of::<Vec<u32>>(), "t", "n", &mut v, &values).unwrap();
        assert_eq!(v, vec![1, 2, 3]);

        // Regression: a single supplied value allocates length 1.
        assign(&kind_of::<Vec<u32>>(), "t", "n", &mut v, &one("9")).unwrap();
        assert_eq!(v, vec![9]);
    }

    #[test]
    fn test_json_kind_stores_raw_string() {
        let mut v = Value::Null;
        assign(&kind_of::<Value>(), "t", "n", &mut v, &one("hello world")).unwrap();
        assert_eq!(v, Value::String("hello world".to_string()));
    }

    #[test]
    fn test_render_omit_empty() {
        assert_eq!(render_scalar(ScalarKind::I32, &0i32, true), None);
        assert_eq!(
            render_scalar(ScalarKind::I32, &0i32, false),
            Some("0".to_string())
        );
        assert_eq!(render_scalar(ScalarKind::Str, &String::new(), true), None);
        assert_eq!(render_scalar(ScalarKind::Bool, &false, true), None);
        assert_eq!(
            render_scalar(ScalarKind::Bool, &false, false),
            Some("false".to_string())
        );
    }

    #[test]
    fn test_render_list_preserves_order() {
        let list: Vec<i64> = vec![3, 1, 2];
        assert_eq!(
            render_list(ScalarKind::I64, &list, false),
            vec!["3", "1", "2"]
        );
    }

    #[test]
    fn test_conversion_error_names_field_and_value() {
        let mut v: u16 = 0;
        let err = assign(&kind_of::<u16>(), "t", "age", &mut v, &one("abc")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("age"), "{msg}");
        assert!(msg.contains("abc"), "{msg}");
    }
}
