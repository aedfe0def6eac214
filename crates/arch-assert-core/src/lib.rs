//! # arch-assert-core
//!
//! Core engine for asserting architectural conventions over program
//! metadata.
//!
//! This crate provides the building blocks for architecture rules:
//!
//! - [`metadata`] — the queryable program model (assemblies, types,
//!   members) and its builder
//! - [`Filter`] and [`Requirement`] — named predicates that narrow the
//!   candidate set and assert conditions over it
//! - [`Exemption`] — post-hoc suppression of accepted violations
//! - [`Rule`] and [`Check`] — the build-then-run pipeline
//! - [`TestResult`] and [`RuleBundle`] — results and report rendering
//!
//! ## Example
//!
//! ```
//! use arch_assert_core::{CheckError, Requirement, Rule, ViolationError};
//! use arch_assert_core::metadata::{Access, MetadataIndex, TypeId, TypeSpec};
//! use arch_assert_core::Entity;
//!
//! let mut builder = MetadataIndex::builder();
//! let asm = builder.add_assembly("App");
//! builder.add_type(asm, TypeSpec::new("Service").with_access(Access::Internal));
//! let index = builder.build();
//!
//! let check = Rule::<TypeId>::new()
//!     .named("services are public")
//!     .should(Requirement::should_satisfy(
//!         "should be public",
//!         |idx, t: TypeId| t.access(idx) == Some(Access::Public),
//!         |idx, t| CheckError::Violation(ViolationError::new(
//!             t.entity_ref(),
//!             t.full_name(idx),
//!             format!("Type '{}' should be public", t.name(idx)),
//!         )),
//!     ))
//!     .check();
//!
//! assert!(check.run(&index).is_violated());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod entity;
mod error;
mod exemption;
mod filter;
mod pattern;
mod requirement;
mod result;
mod rule;

/// The program metadata model and its builder.
pub mod metadata;
/// Type relationship queries (equality, implementation, inheritance).
pub mod relations;

pub use config::{
    CheckOptions, Config, ConfigError, ExclusionList, DEFAULT_EXCLUDED_NAMESPACES,
};
pub use entity::{Entity, EntityKind, EntityRef, MemberEntity};
pub use error::{CheckError, DependencyError, EmptySourceError, ViolationError};
pub use exemption::{apply_all, Exemption};
pub use filter::{any_member_satisfies, Filter};
pub use pattern::{Pattern, PatternError};
pub use requirement::Requirement;
pub use result::{BundleResult, RuleBundle, TestResult, ViolationReport};
pub use rule::{Check, Rule};
