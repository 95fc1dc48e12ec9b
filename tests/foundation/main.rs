//! Integration tests for Layer 0: Foundation
//!
//! Tests for the update taxonomy, errors, listener registry, and storage bindings.

mod bindings;
