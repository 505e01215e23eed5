/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 27/1/26
******************************************************************************/

//! # IronIdd Codegen
//!
//! Build-time code generation for the IronIdd dictionary toolkit.
//!
//! This crate generates Rust source code from a parsed dictionary, providing
//! a typed object-type enum and field index enums for every object.
//!
//! ## Usage
//!
//! Typically used in a `build.rs` script to generate code at compile time.

pub mod generator;

pub use generator::{CodeGenerator, GeneratorConfig};
