//! The generic entity abstraction over the eight metadata kinds.
//!
//! Filters, requirements, and rules are written once against [`Entity`];
//! the per-kind fluent facades are thin wrappers over that single generic
//! core.

use serde::Serialize;

use crate::config::ExclusionList;
use crate::metadata::{
    AssemblyId, ConstructorId, EventId, FieldId, MetadataIndex, MethodId, ParameterId, PropertyId,
    TypeId,
};
use crate::metadata::Access;

/// The kind of a metadata entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A compiled program unit.
    Assembly,
    /// A type.
    Type,
    /// A constructor.
    Constructor,
    /// An event.
    Event,
    /// A field.
    Field,
    /// A method.
    Method,
    /// A property.
    Property,
    /// A parameter.
    Parameter,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Assembly => "assembly",
            Self::Type => "type",
            Self::Constructor => "constructor",
            Self::Event => "event",
            Self::Field => "field",
            Self::Method => "method",
            Self::Property => "property",
            Self::Parameter => "parameter",
        };
        write!(f, "{name}")
    }
}

/// A kind-tagged back-reference to the offending entity, carried by
/// errors for programmatic inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityRef {
    /// Reference to an assembly.
    Assembly(AssemblyId),
    /// Reference to a type.
    Type(TypeId),
    /// Reference to a constructor.
    Constructor(ConstructorId),
    /// Reference to an event.
    Event(EventId),
    /// Reference to a field.
    Field(FieldId),
    /// Reference to a method.
    Method(MethodId),
    /// Reference to a property.
    Property(PropertyId),
    /// Reference to a parameter.
    Parameter(ParameterId),
}

impl EntityRef {
    /// The kind of the referenced entity.
    #[must_use]
    pub fn kind(self) -> EntityKind {
        match self {
            Self::Assembly(_) => EntityKind::Assembly,
            Self::Type(_) => EntityKind::Type,
            Self::Constructor(_) => EntityKind::Constructor,
            Self::Event(_) => EntityKind::Event,
            Self::Field(_) => EntityKind::Field,
            Self::Method(_) => EntityKind::Method,
            Self::Property(_) => EntityKind::Property,
            Self::Parameter(_) => EntityKind::Parameter,
        }
    }

    /// The display name of the referenced entity.
    #[must_use]
    pub fn display_name(self, index: &MetadataIndex) -> String {
        match self {
            Self::Assembly(id) => id.full_name(index),
            Self::Type(id) => id.full_name(index),
            Self::Constructor(id) => id.full_name(index),
            Self::Event(id) => id.full_name(index),
            Self::Field(id) => id.full_name(index),
            Self::Method(id) => id.full_name(index),
            Self::Property(id) => id.full_name(index),
            Self::Parameter(id) => id.full_name(index),
        }
    }
}

/// Capability surface shared by every entity kind.
///
/// Implementations are id handles; all data access goes through the
/// index, which a check borrows read-only for its whole run.
pub trait Entity: Copy + Eq + std::hash::Hash + std::fmt::Debug + 'static {
    /// The kind tag for this entity type.
    const KIND: EntityKind;

    /// Enumerates all entities of this kind declared in the given
    /// assemblies, in declaration order.
    fn in_assemblies(index: &MetadataIndex, assemblies: &[AssemblyId]) -> Vec<Self>;

    /// The entity's simple name.
    fn name(self, index: &MetadataIndex) -> &str;

    /// The entity's qualified display name.
    fn full_name(self, index: &MetadataIndex) -> String;

    /// The assembly this entity belongs to.
    fn assembly(self, index: &MetadataIndex) -> AssemblyId;

    /// The entity's access level, if the kind has one.
    fn access(self, index: &MetadataIndex) -> Option<Access>;

    /// Attribute types applied to this entity.
    fn attributes(self, index: &MetadataIndex) -> &[TypeId];

    /// Converts into the kind-tagged reference form.
    fn entity_ref(self) -> EntityRef;

    /// Whether the exclusion list drops this entity before filtering.
    ///
    /// The default checks the owning assembly's name; types additionally
    /// check their namespace, and members follow their declaring type.
    fn excluded_by(self, index: &MetadataIndex, exclusions: &ExclusionList) -> bool {
        exclusions.excludes(&index.assembly(self.assembly(index)).name)
    }
}

/// An entity declared on a type: the five member kinds.
pub trait MemberEntity: Entity {
    /// Enumerates this kind's members declared on a type.
    fn of_type(index: &MetadataIndex, ty: TypeId) -> Vec<Self>;

    /// The declaring type.
    fn declaring_type(self, index: &MetadataIndex) -> TypeId;
}

impl Entity for AssemblyId {
    const KIND: EntityKind = EntityKind::Assembly;

    fn in_assemblies(_index: &MetadataIndex, assemblies: &[AssemblyId]) -> Vec<Self> {
        assemblies.to_vec()
    }

    fn name(self, index: &MetadataIndex) -> &str {
        &index.assembly(self).name
    }

    fn full_name(self, index: &MetadataIndex) -> String {
        index.assembly(self).name.clone()
    }

    fn assembly(self, _index: &MetadataIndex) -> AssemblyId {
        self
    }

    fn access(self, _index: &MetadataIndex) -> Option<Access> {
        None
    }

    fn attributes(self, _index: &MetadataIndex) -> &[TypeId] {
        &[]
    }

    fn entity_ref(self) -> EntityRef {
        EntityRef::Assembly(self)
    }
}

impl Entity for TypeId {
    const KIND: EntityKind = EntityKind::Type;

    fn in_assemblies(index: &MetadataIndex, assemblies: &[AssemblyId]) -> Vec<Self> {
        assemblies
            .iter()
            .flat_map(|a| index.assembly(*a).types.iter().copied())
            .collect()
    }

    fn name(self, index: &MetadataIndex) -> &str {
        &index.type_data(self).name
    }

    fn full_name(self, index: &MetadataIndex) -> String {
        index.type_data(self).full_name()
    }

    fn assembly(self, index: &MetadataIndex) -> AssemblyId {
        index.type_data(self).assembly
    }

    fn access(self, index: &MetadataIndex) -> Option<Access> {
        Some(index.type_data(self).access)
    }

    fn attributes(self, index: &MetadataIndex) -> &[TypeId] {
        &index.type_data(self).attributes
    }

    fn entity_ref(self) -> EntityRef {
        EntityRef::Type(self)
    }

    fn excluded_by(self, index: &MetadataIndex, exclusions: &ExclusionList) -> bool {
        let data = index.type_data(self);
        if exclusions.excludes(&index.assembly(data.assembly).name) {
            return true;
        }
        data.namespace
            .as_deref()
            .is_some_and(|ns| exclusions.excludes(ns))
    }
}

/// Implements [`Entity`] (and [`MemberEntity`]) for a member id.
macro_rules! member_entity {
    ($id:ty, $kind:ident, $lookup:ident, $list:ident, name: $name:tt) => {
        impl Entity for $id {
            const KIND: EntityKind = EntityKind::$kind;

            fn in_assemblies(index: &MetadataIndex, assemblies: &[AssemblyId]) -> Vec<Self> {
                assemblies
                    .iter()
                    .flat_map(|a| index.assembly(*a).types.iter())
                    .flat_map(|t| index.type_data(*t).$list.iter().copied())
                    .collect()
            }

            fn name(self, index: &MetadataIndex) -> &str {
                member_entity!(@name self, index, $lookup, $name)
            }

            fn full_name(self, index: &MetadataIndex) -> String {
                let declaring = index.$lookup(self).declaring_type;
                format!(
                    "{}.{}",
                    index.type_data(declaring).full_name(),
                    self.name(index)
                )
            }

            fn assembly(self, index: &MetadataIndex) -> AssemblyId {
                index.type_data(index.$lookup(self).declaring_type).assembly
            }

            fn access(self, index: &MetadataIndex) -> Option<Access> {
                Some(index.$lookup(self).access)
            }

            fn attributes(self, index: &MetadataIndex) -> &[TypeId] {
                &index.$lookup(self).attributes
            }

            fn entity_ref(self) -> EntityRef {
                EntityRef::$kind(self)
            }

            fn excluded_by(self, index: &MetadataIndex, exclusions: &ExclusionList) -> bool {
                index
                    .$lookup(self)
                    .declaring_type
                    .excluded_by(index, exclusions)
            }
        }

        impl MemberEntity for $id {
            fn of_type(index: &MetadataIndex, ty: TypeId) -> Vec<Self> {
                index.type_data(ty).$list.clone()
            }

            fn declaring_type(self, index: &MetadataIndex) -> TypeId {
                index.$lookup(self).declaring_type
            }
        }
    };
    (@name $self:ident, $index:ident, $lookup:ident, named) => {
        &$index.$lookup($self).name
    };
    // Constructors carry no name of their own; use the declaring type's.
    (@name $self:ident, $index:ident, $lookup:ident, declaring) => {
        &$index.type_data($index.$lookup($self).declaring_type).name
    };
}

member_entity!(ConstructorId, Constructor, constructor, constructors, name: declaring);
member_entity!(EventId, Event, event, events, name: named);
member_entity!(FieldId, Field, field, fields, name: named);
member_entity!(MethodId, Method, method, methods, name: named);
member_entity!(PropertyId, Property, property, properties, name: named);

impl Entity for ParameterId {
    const KIND: EntityKind = EntityKind::Parameter;

    fn in_assemblies(index: &MetadataIndex, assemblies: &[AssemblyId]) -> Vec<Self> {
        let methods = MethodId::in_assemblies(index, assemblies);
        let constructors = ConstructorId::in_assemblies(index, assemblies);
        methods
            .iter()
            .flat_map(|m| index.method(*m).parameters.iter().copied())
            .chain(
                constructors
                    .iter()
                    .flat_map(|c| index.constructor(*c).parameters.iter().copied()),
            )
            .collect()
    }

    fn name(self, index: &MetadataIndex) -> &str {
        &index.parameter(self).name
    }

    fn full_name(self, index: &MetadataIndex) -> String {
        let declaring = index.parameter(self).declaring_type;
        format!(
            "{}.{}",
            index.type_data(declaring).full_name(),
            self.name(index)
        )
    }

    fn assembly(self, index: &MetadataIndex) -> AssemblyId {
        index.type_data(index.parameter(self).declaring_type).assembly
    }

    fn access(self, _index: &MetadataIndex) -> Option<Access> {
        None
    }

    fn attributes(self, _index: &MetadataIndex) -> &[TypeId] {
        &[]
    }

    fn entity_ref(self) -> EntityRef {
        EntityRef::Parameter(self)
    }

    fn excluded_by(self, index: &MetadataIndex, exclusions: &ExclusionList) -> bool {
        index
            .parameter(self)
            .declaring_type
            .excluded_by(index, exclusions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{FieldSpec, MetadataIndex, MethodSpec, TypeSpec};

    fn sample() -> (MetadataIndex, AssemblyId, TypeId) {
        let mut b = MetadataIndex::builder();
        let asm = b.add_assembly("App.Domain");
        let ty = b.add_type(asm, TypeSpec::new("Order").in_namespace("App.Domain"));
        let int = b.add_type(asm, TypeSpec::new("Int32").in_namespace("System"));
        b.add_method(ty, MethodSpec::new("Total").with_parameter("scale", int));
        b.add_field(ty, FieldSpec::new("id", int));
        (b.build(), asm, ty)
    }

    #[test]
    fn member_full_names_are_type_qualified() {
        let (index, asm, ty) = sample();
        let methods = MethodId::in_assemblies(&index, &[asm]);
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].full_name(&index), "App.Domain.Order.Total");
        assert_eq!(methods[0].declaring_type(&index), ty);
    }

    #[test]
    fn type_exclusion_considers_namespace() {
        let (index, asm, _) = sample();
        let exclusions = ExclusionList::new(vec!["System".to_string()]);
        let types = TypeId::in_assemblies(&index, &[asm]);
        let survivors: Vec<_> = types
            .into_iter()
            .filter(|t| !t.excluded_by(&index, &exclusions))
            .collect();
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].name(&index), "Order");
    }

    #[test]
    fn member_exclusion_follows_declaring_type() {
        let (index, asm, _) = sample();
        let exclusions = ExclusionList::new(vec!["App.Domain".to_string()]);
        let fields = FieldId::in_assemblies(&index, &[asm]);
        assert!(fields[0].excluded_by(&index, &exclusions));
    }

    #[test]
    fn parameters_enumerate_from_methods_and_constructors() {
        let (index, asm, _) = sample();
        let params = ParameterId::in_assemblies(&index, &[asm]);
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name(&index), "scale");
    }

    #[test]
    fn assembly_exclusion_uses_assembly_name() {
        let (index, asm, _) = sample();
        let exclusions = ExclusionList::new(vec!["App".to_string()]);
        assert!(asm.excluded_by(&index, &exclusions));
    }
}
