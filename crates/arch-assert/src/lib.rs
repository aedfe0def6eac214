//! # arch-assert
//!
//! Architecture convention assertions for test suites.
//!
//! This is the main facade crate: it re-exports the core engine, the
//! fluent rule builders, config discovery, and the panic bridge that
//! turns a violated result into a test failure.
//!
//! ## Quick Start
//!
//! ```toml
//! [dev-dependencies]
//! arch-assert = "0.2"
//! ```
//!
//! ```
//! use arch_assert::fluent::types;
//! use arch_assert::metadata::{Access, MetadataIndex, TypeSpec};
//! use arch_assert::AssertNotViolated;
//!
//! // In a real suite the index is populated by the host's metadata
//! // adapter; here it is built by hand.
//! let mut builder = MetadataIndex::builder();
//! let asm = builder.add_assembly("App.Domain");
//! builder.add_type(asm, TypeSpec::new("Order").in_namespace("App.Domain"));
//! let index = builder.build();
//!
//! types()
//!     .that()
//!     .that_are_public()
//!     .should_be_public()
//!     .named("public types stay public")
//!     .check()
//!     .run(&index)
//!     .assert_not_violated();
//! ```
//!
//! Checks pick up exclusion settings from `arch-assert.toml` /
//! `.arch-assert.toml` at the workspace root via
//! [`default_check_options`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Re-export the engine types and traits
pub use arch_assert_core::*;

/// Fluent rule builders (`types()`, `methods()`, `assemblies()`, …).
pub mod fluent {
    pub use arch_assert_fluent::*;
}

mod runner;

pub use runner::{default_check_options, load_config, AssertNotViolated};
