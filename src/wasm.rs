//! WebAssembly bindings for browser hosts.
//!
//! The host owns the simulation, so the binding mirrors the step protocol
//! directly: `translate`, run the simulation, `recordFitness`, repeat.

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::optimizer::{Optimizer, OptimizerConfig, Strategy};
use crate::problem::VectorEncoding;
use crate::space::{Dimension, ParameterSpace};

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Construction parameters passed from JavaScript.
#[derive(Debug, Deserialize)]
struct Setup {
    /// `[min, max]` per dimension.
    bounds: Vec<(f64, f64)>,
    #[serde(default)]
    strategy: Strategy,
    #[serde(default)]
    config: OptimizerConfig,
    /// Current design in domain units, seeds the first agent.
    #[serde(default)]
    existing: Option<Vec<f64>>,
}

/// Optimizer over plain real-valued bounds.
#[wasm_bindgen]
pub struct WasmOptimizer {
    inner: Optimizer<VectorEncoding>,
}

#[wasm_bindgen]
impl WasmOptimizer {
    /// Creates an optimizer from `{ bounds, strategy?, config?, existing? }`.
    #[wasm_bindgen(constructor)]
    pub fn new(setup: JsValue) -> Result<WasmOptimizer, JsValue> {
        let setup: Setup = serde_wasm_bindgen::from_value(setup)
            .map_err(|e| JsValue::from_str(&format!("Invalid setup: {e}")))?;

        let dimensions = setup
            .bounds
            .iter()
            .enumerate()
            .map(|(i, &(min, max))| Dimension::new(format!("x{i}"), min, max))
            .collect::<Result<Vec<_>, _>>()
            .map_err(js_error)?;
        let encoding = VectorEncoding::new(ParameterSpace::new(dimensions).map_err(js_error)?);

        let inner = match setup.existing {
            Some(existing) => Optimizer::with_existing_design(
                encoding,
                setup.strategy,
                setup.config,
                existing.as_slice(),
            ),
            None => Optimizer::new(encoding, setup.strategy, setup.config),
        }
        .map_err(js_error)?;

        Ok(WasmOptimizer { inner })
    }

    #[wasm_bindgen(js_name = startEvolving)]
    pub fn start_evolving(&mut self) {
        self.inner.start_evolving();
    }

    /// Decoded parameters of agent `index`.
    #[wasm_bindgen]
    pub fn translate(&self, index: usize) -> Result<Vec<f64>, JsValue> {
        self.inner.translate(index).map_err(js_error)
    }

    #[wasm_bindgen(js_name = translateBest)]
    pub fn translate_best(&self) -> Option<Vec<f64>> {
        self.inner.translate_best()
    }

    /// Reports a fitness; returns the converged flag.
    #[wasm_bindgen(js_name = recordFitness)]
    pub fn record_fitness(&mut self, index: usize, fitness: f64) -> Result<bool, JsValue> {
        self.inner.record_fitness(index, fitness).map_err(js_error)
    }

    #[wasm_bindgen(js_name = shouldTerminate)]
    pub fn should_terminate(&self) -> bool {
        self.inner.should_terminate()
    }

    /// Normalized coordinates of the fittest agent so far.
    #[wasm_bindgen(js_name = applyFittest)]
    pub fn apply_fittest(&self) -> Option<Vec<f64>> {
        self.inner.apply_fittest().map(<[f64]>::to_vec)
    }

    #[wasm_bindgen(js_name = isConverged)]
    pub fn is_converged(&self) -> bool {
        self.inner.is_converged()
    }

    #[wasm_bindgen]
    pub fn generation(&self) -> usize {
        self.inner.generation()
    }

    #[wasm_bindgen]
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    /// Best agent and population per generation, as a JS object.
    #[wasm_bindgen]
    pub fn history(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.history())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Best fitness per generation, baseline first.
    #[wasm_bindgen(js_name = bestFitnessSeries)]
    pub fn best_fitness_series(&self) -> Vec<f64> {
        self.inner.history().best_fitness_series()
    }
}
