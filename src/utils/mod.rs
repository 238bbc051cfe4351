//! Utility functions for code generation, URL validation and export rendering.
//!
//! - [`code_generator`] - Short code generation and custom code validation
//! - [`url_validator`] - Target URL validation
//! - [`csv_export`] - CSV rendering of exported records

pub mod code_generator;
pub mod csv_export;
pub mod url_validator;
