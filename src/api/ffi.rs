//! C-compatible API for an external form front end.
//!
//! Every string returned by this module is allocated by Rust and must be
//! released with `rp_free_str`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use serde_json::{json, Value};

use crate::api::form;
use crate::common::config::AppCfg;
use crate::common::error::{PriceCode, PriceError, PriceResult};
use crate::features::domain::Feature;
use crate::features::service as features;
use crate::inference::cell;
use crate::inference::domain::PreFittedPipeline;
use crate::inference::service as inference;

/// ABI version to coordinate with the front end.
#[no_mangle]
pub extern "C" fn rp_api_version() -> u32 {
    1
}

/// Load the artifacts into the process-wide pipeline.
///
/// `artifact_root` may be null to keep the configured directory. Returns a
/// `PriceCode`; only `0` means predictions can be served.
#[no_mangle]
pub extern "C" fn rp_init(artifact_root: *const c_char) -> u32 {
    let root = read_str(artifact_root);
    match init(root.as_deref()) {
        Ok(()) => PriceCode::Ok.raw(),
        Err(err) => {
            log::error!(target: "ffi", "init failed: {err}");
            err.code().raw()
        }
    }
}

fn init(root: Option<&str>) -> PriceResult<()> {
    let mut cfg = AppCfg::load()?;
    if let Some(root) = root {
        cfg = cfg.with_artifact_root(root);
    }
    crate::common::log::init(cfg.log_level);
    cell::global().get_or_load(|| inference::load_from_cfg(&cfg))?;
    Ok(())
}

/// Predict from a JSON listing and return a JSON response.
#[no_mangle]
pub extern "C" fn rp_predict(input: *const c_char) -> *const c_char {
    let response = match read_str(input) {
        Some(input) => respond(cell::global().get().as_deref(), &input),
        None => failure(&PriceError::invalid("input is null")),
    };
    string_to_raw(response.to_string())
}

/// The field table (keys, columns, bounds, defaults) as JSON.
#[no_mangle]
pub extern "C" fn rp_schema() -> *const c_char {
    string_to_raw(schema_json().to_string())
}

/// Free strings allocated by Rust.
#[no_mangle]
pub extern "C" fn rp_free_str(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: every non-null pointer handed out here came from `CString::into_raw`.
    unsafe {
        let _ = CString::from_raw(ptr as *mut c_char);
    }
}

/// Build the response for one request against an optionally loaded pipeline.
pub fn respond(pipeline: Option<&PreFittedPipeline>, input: &str) -> Value {
    let outcome = features::listing_from_json(input)
        .and_then(|listing| features::assemble(&listing))
        .and_then(|vector| {
            let pipeline = pipeline.ok_or(PriceError::NotReady)?;
            inference::predict(pipeline, &vector)
        });

    match outcome {
        Ok(prediction) => json!({
            "ok": true,
            "price": prediction.price,
            "display": form::render_price(prediction.price),
            "latency_us": prediction.latency_us,
        }),
        Err(err) => failure(&err),
    }
}

fn failure(err: &PriceError) -> Value {
    json!({
        "ok": false,
        "code": err.code().raw(),
        "error": form::render_error(err),
    })
}

pub fn schema_json() -> Value {
    let fields: Vec<Value> = Feature::ALL
        .iter()
        .map(|f| {
            let spec = f.spec();
            json!({
                "key": f.key(),
                "column": f.column(),
                "section": form::Section::of(*f).title(),
                "min": spec.min,
                "max": spec.max,
                "default": spec.default,
                "step": spec.step,
                "integral": spec.integral,
            })
        })
        .collect();
    Value::Array(fields)
}

fn read_str(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    // SAFETY: callers pass NUL-terminated strings that outlive this call.
    let raw = unsafe { CStr::from_ptr(ptr) };
    Some(raw.to_string_lossy().into_owned())
}

fn string_to_raw(s: String) -> *const c_char {
    match CString::new(s) {
        Ok(cstring) => cstring.into_raw(),
        Err(_) => fallback_json_raw(),
    }
}

fn fallback_json_raw() -> *const c_char {
    // no interior NUL in the literal
    CString::new(r#"{"ok":false}"#)
        .map(|cstring| cstring.into_raw() as *const c_char)
        .unwrap_or(std::ptr::null())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_all_fields_in_order() {
        let schema = schema_json();
        let fields = schema.as_array().unwrap();
        assert_eq!(fields.len(), Feature::COUNT);
        assert_eq!(fields[0]["key"], "host_response_rate");
        assert_eq!(fields[23]["column"], "Reviews per Month");
        assert_eq!(fields[4]["step"], 0.5);
    }

    #[test]
    fn unloaded_pipeline_answers_not_ready() {
        let response = respond(None, "{}");
        assert_eq!(response["ok"], false);
        assert_eq!(response["code"], PriceCode::NotReady.raw());
    }

    #[test]
    fn invalid_input_is_reported_before_inference() {
        let response = respond(None, r#"{"beds": 99}"#);
        assert_eq!(response["code"], PriceCode::InvalidInput.raw());
    }

    #[test]
    fn strings_cross_the_boundary() {
        let raw = rp_schema();
        assert!(!raw.is_null());
        let text = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
        assert!(text.starts_with('['));
        rp_free_str(raw);

        let raw = rp_predict(std::ptr::null());
        let text = unsafe { CStr::from_ptr(raw) }.to_string_lossy().into_owned();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["code"], PriceCode::InvalidInput.raw());
        rp_free_str(raw);
    }
}
