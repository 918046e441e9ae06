//! Helpers for reading optimizer tuning values from a JSON parameter object.
//!
//! A missing key or a value of the wrong type yields the default, so a
//! partially specified `--params` object never fails a palette request.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, accepting JSON integers too.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts a `usize` from `params[name]`.
///
/// Only non-negative JSON integers are accepted; `12.5` or `-3` fall back
/// to `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}
