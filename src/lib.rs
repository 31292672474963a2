//! Tokenkit Library
//!
//! This library provides the design-token engine behind the `tokenkit` CLI:
//! deriving color values and tonal variants, keeping a settings snapshot
//! consistent with its generated stylesheets, expanding CSS macros from
//! categorized expansion tables, and looking up rules and custom properties
//! in generated CSS.

// Module declarations
pub mod cli;
pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod expansions;
pub mod models;
pub mod parser;
pub mod services;
pub mod stylesheet;
