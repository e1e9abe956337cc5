//! Install pipeline integration tests.

mod common;
mod fixup_tests;
mod pipeline_tests;
mod record;
