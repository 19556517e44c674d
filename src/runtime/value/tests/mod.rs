//! Tests for the value model

mod json;
mod primitives;
