//! Input conversion shared by the WASM entry points.

use anyhow::{Context, Result};
use serde_wasm_bindgen::{from_value, to_value};
use treefree_core::valuation::prime_from_u64;
use treefree_core::{decide_discrete_free, parse_generators, Prime, ReductionSettings, Sl2};
use wasm_bindgen::prelude::*;

pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_group(generators: &[String], prime: u32) -> Result<(Vec<Sl2>, Prime)> {
    let prime = prime_from_u64(u64::from(prime)).context("Invalid prime.")?;
    let generators = parse_generators(generators)?;
    Ok((generators, prime))
}

pub(crate) fn build_group(generators: &[String], prime: u32) -> Result<(Vec<Sl2>, Prime), JsValue> {
    parse_group(generators, prime).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}

/// `undefined` or `null` select the default settings.
pub(crate) fn build_settings(settings: JsValue) -> Result<ReductionSettings, JsValue> {
    if settings.is_undefined() || settings.is_null() {
        return Ok(ReductionSettings::default());
    }
    from_value(settings).map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))
}

#[wasm_bindgen]
pub fn decide(generators: Vec<String>, prime: u32, settings: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let (generators, prime) = build_group(&generators, prime)?;
    let settings = build_settings(settings)?;
    let verdict = decide_discrete_free(&generators, &prime, settings).map_err(to_js_error)?;

    to_value(&verdict).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::{build_settings, decide};
    use treefree_core::ReductionSettings;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn error_message(result: Result<JsValue, JsValue>) -> String {
        result
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default()
    }

    #[wasm_bindgen_test]
    fn decide_rejects_composite_prime() {
        let result = decide(vec!["2 0; 0 1/2".to_string()], 4, JsValue::UNDEFINED);
        assert!(error_message(result).contains("Invalid prime"));
    }

    #[wasm_bindgen_test]
    fn decide_names_bad_generator() {
        let result = decide(
            vec!["2 0; 0 1/2".to_string(), "2 0; 0 1".to_string()],
            2,
            JsValue::UNDEFINED,
        );
        let message = error_message(result);
        assert!(message.contains("Generator 1 is invalid"), "{message}");
        assert!(message.contains("Determinant is 2"), "{message}");
    }

    #[wasm_bindgen_test]
    fn missing_settings_fall_back_to_defaults() {
        let settings = build_settings(JsValue::NULL).expect("settings");
        assert_eq!(settings, ReductionSettings::default());
    }

    #[wasm_bindgen_test]
    fn decide_reports_discrete_free_outcome() {
        let value = decide(
            vec!["2 0; 3 1/2".to_string(), "2 -3/2; 0 1/2".to_string()],
            2,
            JsValue::UNDEFINED,
        )
        .expect("verdict");
        let outcome = js_sys::Reflect::get(&value, &JsValue::from_str("outcome"))
            .expect("outcome field")
            .as_string();
        assert_eq!(outcome.as_deref(), Some("DiscreteFree"));
    }
}
