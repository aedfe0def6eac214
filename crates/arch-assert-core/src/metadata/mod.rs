//! The program metadata model consumed by the rule engine.
//!
//! This module contains no I/O: the host populates a [`MetadataIndex`]
//! ahead of time (from its reflection facility, a binary reader, or by
//! hand in tests) via [`MetadataIndexBuilder`], and the engine only ever
//! reads it. Entities are referenced through small `Copy` id handles into
//! arena-style storage.

mod builder;

pub use builder::{
    ConstructorSpec, EventSpec, FieldSpec, MetadataIndexBuilder, MethodSpec, PropertySpec, TypeSpec,
};

use serde::Serialize;
use std::ops::BitOr;

use crate::relations;

// ────────────────────────────────────────────
// Id handles
// ────────────────────────────────────────────

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(pub(crate) usize);
    };
}

id_type!(
    /// Handle to an assembly in a [`MetadataIndex`].
    AssemblyId
);
id_type!(
    /// Handle to a type in a [`MetadataIndex`].
    TypeId
);
id_type!(
    /// Handle to a constructor in a [`MetadataIndex`].
    ConstructorId
);
id_type!(
    /// Handle to an event in a [`MetadataIndex`].
    EventId
);
id_type!(
    /// Handle to a field in a [`MetadataIndex`].
    FieldId
);
id_type!(
    /// Handle to a method in a [`MetadataIndex`].
    MethodId
);
id_type!(
    /// Handle to a property in a [`MetadataIndex`].
    PropertyId
);
id_type!(
    /// Handle to a parameter in a [`MetadataIndex`].
    ParameterId
);

// ────────────────────────────────────────────
// Access levels
// ────────────────────────────────────────────

/// The access level of a single entity. Every entity has exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Visible everywhere.
    #[default]
    Public,
    /// Visible within the declaring assembly.
    Internal,
    /// Visible to derived types.
    Protected,
    /// Visible within the declaring type.
    Private,
}

impl Access {
    /// Returns the single-flag modifier set for this access level.
    #[must_use]
    pub const fn as_modifiers(self) -> AccessModifiers {
        match self {
            Self::Public => AccessModifiers::PUBLIC,
            Self::Internal => AccessModifiers::INTERNAL,
            Self::Protected => AccessModifiers::PROTECTED,
            Self::Private => AccessModifiers::PRIVATE,
        }
    }
}

impl std::fmt::Display for Access {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Internal => write!(f, "internal"),
            Self::Protected => write!(f, "protected"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// A set of access levels with "is any of these" semantics.
///
/// Checks are declared against a set (`PUBLIC | INTERNAL`) while each
/// entity carries exactly one [`Access`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AccessModifiers(u8);

impl AccessModifiers {
    /// The public flag.
    pub const PUBLIC: Self = Self(0b0001);
    /// The internal flag.
    pub const INTERNAL: Self = Self(0b0010);
    /// The protected flag.
    pub const PROTECTED: Self = Self(0b0100);
    /// The private flag.
    pub const PRIVATE: Self = Self(0b1000);

    /// Tests whether this set contains the given access level.
    #[must_use]
    pub const fn contains(self, access: Access) -> bool {
        self.0 & access.as_modifiers().0 != 0
    }

    /// Returns true if no flag is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for AccessModifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl From<Access> for AccessModifiers {
    fn from(access: Access) -> Self {
        access.as_modifiers()
    }
}

impl std::fmt::Display for AccessModifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (flag, name) in [
            (Self::PUBLIC, "public"),
            (Self::INTERNAL, "internal"),
            (Self::PROTECTED, "protected"),
            (Self::PRIVATE, "private"),
        ] {
            if self.0 & flag.0 != 0 {
                if !first {
                    write!(f, " or ")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        if first {
            write!(f, "none")?;
        }
        Ok(())
    }
}

// ────────────────────────────────────────────
// Record types
// ────────────────────────────────────────────

/// Facts about one assembly.
#[derive(Debug, Clone)]
pub struct AssemblyData {
    /// Assembly name, e.g. `MyApp.Domain`.
    pub name: String,
    /// Names of assemblies this assembly references. References may point
    /// outside the index, so they are kept as names rather than ids.
    pub referenced_assemblies: Vec<String>,
    /// Types declared in this assembly.
    pub types: Vec<TypeId>,
}

/// Facts about one type.
#[derive(Debug, Clone)]
pub struct TypeData {
    /// Simple type name, e.g. `OrderService`.
    pub name: String,
    /// Namespace, or `None` for non-namespaced types.
    pub namespace: Option<String>,
    /// The declaring assembly.
    pub assembly: AssemblyId,
    /// Access level.
    pub access: Access,
    /// Whether this type is an interface.
    pub is_interface: bool,
    /// Whether this type is abstract.
    pub is_abstract: bool,
    /// Whether this type is sealed.
    pub is_sealed: bool,
    /// Whether this type is nested inside another type.
    pub is_nested: bool,
    /// Whether this type is the universal root of the inheritance chain.
    /// The root never counts as an ancestor.
    pub is_root: bool,
    /// For generic types, the open generic definition. An open generic
    /// definition points to itself.
    pub generic_definition: Option<TypeId>,
    /// Bound type arguments. Empty for open generics.
    pub generic_args: Vec<TypeId>,
    /// The base type, if any.
    pub base_type: Option<TypeId>,
    /// All implemented interfaces, including those inherited from the base
    /// chain, as a reflection facility would report them.
    pub interfaces: Vec<TypeId>,
    /// Attribute types applied to this type.
    pub attributes: Vec<TypeId>,
    /// Declared constructors.
    pub constructors: Vec<ConstructorId>,
    /// Declared events.
    pub events: Vec<EventId>,
    /// Declared fields.
    pub fields: Vec<FieldId>,
    /// Declared methods.
    pub methods: Vec<MethodId>,
    /// Declared properties.
    pub properties: Vec<PropertyId>,
}

impl TypeData {
    /// Whether this type is generic (open or closed).
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.generic_definition.is_some()
    }

    /// Whether this type is an open generic (no type arguments bound).
    #[must_use]
    pub fn is_open_generic(&self) -> bool {
        self.is_generic() && self.generic_args.is_empty()
    }

    /// The namespace-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Facts about one constructor.
#[derive(Debug, Clone)]
pub struct ConstructorData {
    /// The declaring type.
    pub declaring_type: TypeId,
    /// Access level.
    pub access: Access,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterId>,
    /// Attribute types applied to this constructor.
    pub attributes: Vec<TypeId>,
}

/// Facts about one event.
#[derive(Debug, Clone)]
pub struct EventData {
    /// Event name.
    pub name: String,
    /// The declaring type.
    pub declaring_type: TypeId,
    /// Access level.
    pub access: Access,
    /// Handler type, if known.
    pub handler_type: Option<TypeId>,
    /// Attribute types applied to this event.
    pub attributes: Vec<TypeId>,
}

/// Facts about one field.
#[derive(Debug, Clone)]
pub struct FieldData {
    /// Field name.
    pub name: String,
    /// The declaring type.
    pub declaring_type: TypeId,
    /// Access level.
    pub access: Access,
    /// The field's type.
    pub field_type: TypeId,
    /// Whether the field is static.
    pub is_static: bool,
    /// Attribute types applied to this field.
    pub attributes: Vec<TypeId>,
}

/// Facts about one method.
#[derive(Debug, Clone)]
pub struct MethodData {
    /// Method name.
    pub name: String,
    /// The declaring type.
    pub declaring_type: TypeId,
    /// Access level.
    pub access: Access,
    /// Whether the method is static.
    pub is_static: bool,
    /// Compiler-generated accessor methods (property getters, event
    /// adders, operators) carry a special name and are skipped by the
    /// representative-method projection.
    pub is_special_name: bool,
    /// Whether the method is declared on this type rather than inherited.
    pub declared_here: bool,
    /// Return type, or `None` for void.
    pub return_type: Option<TypeId>,
    /// Parameters in declaration order.
    pub parameters: Vec<ParameterId>,
    /// Attribute types applied to this method.
    pub attributes: Vec<TypeId>,
}

/// Facts about one property.
#[derive(Debug, Clone)]
pub struct PropertyData {
    /// Property name.
    pub name: String,
    /// The declaring type.
    pub declaring_type: TypeId,
    /// Access level.
    pub access: Access,
    /// The property's type.
    pub property_type: TypeId,
    /// Attribute types applied to this property.
    pub attributes: Vec<TypeId>,
}

/// Facts about one parameter.
#[derive(Debug, Clone)]
pub struct ParameterData {
    /// Parameter name.
    pub name: String,
    /// The parameter's type.
    pub parameter_type: TypeId,
    /// The type declaring the owning method or constructor.
    pub declaring_type: TypeId,
}

// ────────────────────────────────────────────
// The index
// ────────────────────────────────────────────

/// Arena-style store for program metadata.
///
/// Built once via [`MetadataIndexBuilder`], then only read. All id handles
/// handed out by the builder are valid for the built index; indexing with
/// a handle from a *different* index is a logic error and may panic.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    pub(crate) assemblies: Vec<AssemblyData>,
    pub(crate) types: Vec<TypeData>,
    pub(crate) constructors: Vec<ConstructorData>,
    pub(crate) events: Vec<EventData>,
    pub(crate) fields: Vec<FieldData>,
    pub(crate) methods: Vec<MethodData>,
    pub(crate) properties: Vec<PropertyData>,
    pub(crate) parameters: Vec<ParameterData>,
}

impl MetadataIndex {
    /// Starts building a new index.
    #[must_use]
    pub fn builder() -> MetadataIndexBuilder {
        MetadataIndexBuilder::new()
    }

    /// Returns all assemblies in the index.
    #[must_use]
    pub fn all_assemblies(&self) -> Vec<AssemblyId> {
        (0..self.assemblies.len()).map(AssemblyId).collect()
    }

    /// Looks up an assembly record.
    #[must_use]
    pub fn assembly(&self, id: AssemblyId) -> &AssemblyData {
        &self.assemblies[id.0]
    }

    /// Looks up a type record.
    #[must_use]
    pub fn type_data(&self, id: TypeId) -> &TypeData {
        &self.types[id.0]
    }

    /// Looks up a constructor record.
    #[must_use]
    pub fn constructor(&self, id: ConstructorId) -> &ConstructorData {
        &self.constructors[id.0]
    }

    /// Looks up an event record.
    #[must_use]
    pub fn event(&self, id: EventId) -> &EventData {
        &self.events[id.0]
    }

    /// Looks up a field record.
    #[must_use]
    pub fn field(&self, id: FieldId) -> &FieldData {
        &self.fields[id.0]
    }

    /// Looks up a method record.
    #[must_use]
    pub fn method(&self, id: MethodId) -> &MethodData {
        &self.methods[id.0]
    }

    /// Looks up a property record.
    #[must_use]
    pub fn property(&self, id: PropertyId) -> &PropertyData {
        &self.properties[id.0]
    }

    /// Looks up a parameter record.
    #[must_use]
    pub fn parameter(&self, id: ParameterId) -> &ParameterData {
        &self.parameters[id.0]
    }

    /// Finds a type by its namespace-qualified name.
    #[must_use]
    pub fn find_type(&self, full_name: &str) -> Option<TypeId> {
        self.types
            .iter()
            .position(|t| t.full_name() == full_name)
            .map(TypeId)
    }

    /// Tests whether a type carries an attribute of the given attribute
    /// type, with open/closed generic tolerance.
    ///
    /// When `inherit` is true, the base-type chain is searched as well.
    #[must_use]
    pub fn type_has_attribute(&self, ty: TypeId, attribute: TypeId, inherit: bool) -> bool {
        let mut current = ty;
        loop {
            let data = self.type_data(current);
            if self.attributes_match(&data.attributes, attribute) {
                return true;
            }
            if !inherit {
                return false;
            }
            match data.base_type {
                Some(base) if !self.type_data(base).is_root => current = base,
                _ => return false,
            }
        }
    }

    /// Tests an attribute list for a match against an attribute type,
    /// tolerating open/closed generic mismatches.
    ///
    /// Member-level lookups do not walk override chains; the model does
    /// not track them.
    #[must_use]
    pub fn attributes_match(&self, attributes: &[TypeId], attribute: TypeId) -> bool {
        attributes
            .iter()
            .any(|a| relations::is_equal_to(self, *a, attribute))
    }

    /// The representative methods of a type: declared here, public,
    /// instance, and not special-name. This is the subset used when a
    /// type is projected onto "its methods" in delegated requirements.
    #[must_use]
    pub fn representative_methods(&self, ty: TypeId) -> Vec<MethodId> {
        self.type_data(ty)
            .methods
            .iter()
            .copied()
            .filter(|m| {
                let m = self.method(*m);
                m.declared_here && m.access == Access::Public && !m.is_static && !m.is_special_name
            })
            .collect()
    }

    /// Creates a source view restricted to assemblies satisfying the
    /// predicate.
    #[must_use]
    pub fn scoped<P>(&self, predicate: P) -> ScopedSource<'_>
    where
        P: Fn(&AssemblyData) -> bool,
    {
        let assemblies = self
            .all_assemblies()
            .into_iter()
            .filter(|a| predicate(self.assembly(*a)))
            .collect();
        ScopedSource {
            index: self,
            assemblies,
        }
    }
}

// ────────────────────────────────────────────
// Sources
// ────────────────────────────────────────────

/// A supplier of program metadata for a check run.
///
/// The engine treats the source as a synchronous call returning an
/// already-materialized set of assemblies. [`MetadataIndex`] itself is the
/// whole-universe source; [`ScopedSource`] narrows it.
pub trait MetadataSource {
    /// The backing index.
    fn index(&self) -> &MetadataIndex;

    /// The assemblies in scope for this source.
    fn assemblies(&self) -> Vec<AssemblyId>;
}

impl MetadataSource for MetadataIndex {
    fn index(&self) -> &MetadataIndex {
        self
    }

    fn assemblies(&self) -> Vec<AssemblyId> {
        self.all_assemblies()
    }
}

/// A view over a subset of an index's assemblies.
#[derive(Debug, Clone)]
pub struct ScopedSource<'a> {
    index: &'a MetadataIndex,
    assemblies: Vec<AssemblyId>,
}

impl MetadataSource for ScopedSource<'_> {
    fn index(&self) -> &MetadataIndex {
        self.index
    }

    fn assemblies(&self) -> Vec<AssemblyId> {
        self.assemblies.clone()
    }
}
