//! Generate typed data-binding declarations from a parsed XML Schema.
//!
//! `xsd-codegen` reads a *proto tree* (the JSON intermediate form an XSD
//! parser produces, see [`proto_tree`]) and emits one source file of type
//! declarations for Go, Rust or TypeScript that round-trips documents
//! conforming to the schema.
//!
//! # Features
//!
//! - Resolves simple-type alias chains down to XSD builtins
//! - Normalizes schema names to exported identifiers, disambiguating collisions
//!   deterministically (`Mytype`, `Mytype2`, ...)
//! - Keeps the original wire name wherever normalization changed it
//! - Emits each schema name at most once, however often it is defined
//! - Boxes or pointer-wraps members that would make a recursive type infinite
//! - Imports only what the generated code uses
//! - Deterministic output: byte-identical across runs
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use xsd_codegen::codegen::{GenerateConfig, generate};
//! use xsd_codegen::target::TargetLanguage;
//!
//! let tree = xsd_codegen::proto_tree::load_tree(Path::new("service.tree.json"))?;
//! let config = GenerateConfig::new(TargetLanguage::Go, "out/service");
//! let stats = generate(&tree, &config)?;
//! eprintln!("Generated {} declarations", stats.declarations_emitted);
//! # Ok::<(), xsd_codegen::error::Error>(())
//! ```

pub mod builtin;
pub mod codegen;
pub mod decl;
pub mod emit;
pub mod error;
pub mod memo;
pub mod naming;
pub mod proto_tree;
pub mod recursion;
pub mod resolve;
pub mod target;
