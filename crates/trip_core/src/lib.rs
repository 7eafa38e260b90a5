pub mod aggregate;
pub mod controller;
pub mod dataset;
pub mod demo;
pub mod scene;
pub mod trips;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
