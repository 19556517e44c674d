//! Runtime system
//!
//! This module contains the value model shared by the writer and its
//! callers.

pub mod value;
