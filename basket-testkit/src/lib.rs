//! Test helpers for basket service tests.
//!
//! Provides a recording store double and basket fixtures.

mod fixtures;
mod recording;

pub use fixtures::{sample_basket, sample_item, widget_basket};
pub use recording::{RecordingStore, StoreOperation};
