//! Library target for the `plvet` package.
//!
//! The primary deliverable of this package is the `plvet` CLI binary
//! (`src/main.rs`). This library exists so CI can run `cargo test -p plvet --doc`
//! for feature/doctype validation.

#[doc(hidden)]
pub use plvet_engine;
