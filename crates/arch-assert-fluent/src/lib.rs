//! # arch-assert-fluent
//!
//! Per-entity-kind fluent facades over the generic rule engine in
//! `arch-assert-core`.
//!
//! Each entry point (`types()`, `methods()`, `assemblies()`, …) opens a
//! builder chain: `that_*` calls narrow the candidate set, `should_*`
//! calls add requirements, `unless`/`allow_empty` add exemptions, and
//! `check()` freezes the chain into a runnable check.
//!
//! ## Example
//!
//! ```
//! use arch_assert_core::metadata::{Access, MetadataIndex, TypeSpec};
//! use arch_assert_core::Pattern;
//! use arch_assert_fluent::types;
//!
//! let mut builder = MetadataIndex::builder();
//! let asm = builder.add_assembly("App");
//! builder.add_type(asm, TypeSpec::new("OrderService").in_namespace("App"));
//! builder.add_type(
//!     asm,
//!     TypeSpec::new("LegacyHelper")
//!         .in_namespace("App")
//!         .with_access(Access::Internal),
//! );
//! let index = builder.build();
//!
//! let check = types()
//!     .that()
//!     .that_have_name_matching(Pattern::new("*Service")?, false)
//!     .should_be_public()
//!     .named("services are public")
//!     .check();
//!
//! assert!(!check.run(&index).is_violated());
//! # Ok::<(), arch_assert_core::PatternError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assemblies;
mod members;
mod predicates;
mod types;

pub use assemblies::{assemblies, AssembliesBuilder};
pub use members::{
    constructors, events, fields, methods, parameters, properties, ConstructorsBuilder,
    EventsBuilder, FieldsBuilder, MethodsBuilder, ParametersBuilder, PropertiesBuilder,
};
pub use types::{types, TypeAttributeClause, TypesBuilder};
