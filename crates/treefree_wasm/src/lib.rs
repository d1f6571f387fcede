//! WASM bindings for the treefree core library.
//!
//! The browser drives a `WasmReductionRunner` in batches so long searches
//! never block the UI thread for a whole run; `decide` is the one-shot form.

mod group;
mod runner;

pub use group::decide;
pub use runner::WasmReductionRunner;
