//! Fixture tests for the fragment key pass.
//!
//! Every `tests/<suite>.jsx` is run through the CLI library and the keys it
//! attaches are compared against `tests/<suite>.keys`, one key per line.
#![allow(missing_docs, clippy::missing_docs_in_private_items)]

include!(concat!(env!("OUT_DIR"), "/tests.rs"));
