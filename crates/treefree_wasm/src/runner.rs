//! Batched reduction runner for the browser.

use crate::group::{build_group, build_settings, to_js_error};
use js_sys::Float64Array;
use serde_wasm_bindgen::to_value;
use treefree_core::ReductionRunner;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmReductionRunner {
    runner: ReductionRunner,
}

#[wasm_bindgen]
impl WasmReductionRunner {
    #[wasm_bindgen(constructor)]
    pub fn new(
        generators: Vec<String>,
        prime: u32,
        settings: JsValue,
    ) -> Result<WasmReductionRunner, JsValue> {
        console_error_panic_hook::set_once();

        let (generators, prime) = build_group(&generators, prime)?;
        let settings = build_settings(settings)?;
        let runner = ReductionRunner::new(generators, prime, settings).map_err(to_js_error)?;

        Ok(WasmReductionRunner { runner })
    }

    pub fn is_done(&self) -> bool {
        self.runner.is_done()
    }

    pub fn run_steps(&mut self, batch_size: u32) -> Result<JsValue, JsValue> {
        let progress = self.runner.run_steps(batch_size as usize);
        to_value(&progress).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn get_progress(&self) -> Result<JsValue, JsValue> {
        to_value(&self.runner.progress())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn get_result(&self) -> Result<JsValue, JsValue> {
        let verdict = self
            .runner
            .verdict()
            .ok_or_else(|| JsValue::from_str("Reduction has not finished"))?;
        to_value(verdict).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn get_prime(&self) -> String {
        self.runner.prime().to_string()
    }

    /// Settings in effect, with defaults filled in.
    pub fn get_settings(&self) -> Result<JsValue, JsValue> {
        to_value(&self.runner.settings())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Current generators, formatted as `[[a, b], [c, d]]`.
    pub fn get_generators(&self) -> Vec<String> {
        self.runner
            .generators()
            .iter()
            .map(|g| g.to_string())
            .collect()
    }

    /// Current generators spelled in the original ones.
    pub fn get_words(&self) -> Vec<String> {
        self.runner.words().iter().map(|w| w.to_string()).collect()
    }

    pub fn potential_history(&self) -> Float64Array {
        let history: Vec<f64> = self
            .runner
            .potential_history()
            .iter()
            .map(|&value| value as f64)
            .collect();
        Float64Array::from(history.as_slice())
    }
}
