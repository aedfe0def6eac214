//! Construction of a [`MetadataIndex`].

use super::{
    Access, AssemblyData, AssemblyId, ConstructorData, ConstructorId, EventData, EventId,
    FieldData, FieldId, MetadataIndex, MethodData, MethodId, ParameterData, ParameterId,
    PropertyData, PropertyId, TypeData, TypeId,
};

/// Populates a [`MetadataIndex`] ahead of rule evaluation.
///
/// Ids are handed out in insertion order and remain valid for the built
/// index. The builder is the only way to create index contents; once
/// [`build`](Self::build) is called the model is read-only.
///
/// # Example
///
/// ```
/// use arch_assert_core::metadata::{Access, MetadataIndex, MethodSpec, TypeSpec};
///
/// let mut builder = MetadataIndex::builder();
/// let asm = builder.add_assembly("Shop.Domain");
/// let order = builder.add_type(asm, TypeSpec::new("Order").in_namespace("Shop.Domain"));
/// builder.add_method(order, MethodSpec::new("Total"));
/// let index = builder.build();
/// assert_eq!(index.type_data(order).name, "Order");
/// ```
#[derive(Debug, Default)]
pub struct MetadataIndexBuilder {
    index: MetadataIndex,
}

impl MetadataIndexBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assembly.
    pub fn add_assembly(&mut self, name: impl Into<String>) -> AssemblyId {
        let id = AssemblyId(self.index.assemblies.len());
        self.index.assemblies.push(AssemblyData {
            name: name.into(),
            referenced_assemblies: Vec::new(),
            types: Vec::new(),
        });
        id
    }

    /// Records that `assembly` references another assembly by name.
    pub fn add_assembly_reference(&mut self, assembly: AssemblyId, referenced: impl Into<String>) {
        self.index.assemblies[assembly.0]
            .referenced_assemblies
            .push(referenced.into());
    }

    /// Adds a type to an assembly.
    pub fn add_type(&mut self, assembly: AssemblyId, spec: TypeSpec) -> TypeId {
        let id = TypeId(self.index.types.len());
        // An open generic definition is its own definition.
        let generic_definition = if spec.open_generic {
            Some(id)
        } else {
            spec.generic_definition
        };
        self.index.types.push(TypeData {
            name: spec.name,
            namespace: spec.namespace,
            assembly,
            access: spec.access,
            is_interface: spec.is_interface,
            is_abstract: spec.is_abstract,
            is_sealed: spec.is_sealed,
            is_nested: spec.is_nested,
            is_root: spec.is_root,
            generic_definition,
            generic_args: spec.generic_args,
            base_type: spec.base_type,
            interfaces: spec.interfaces,
            attributes: spec.attributes,
            constructors: Vec::new(),
            events: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
        });
        self.index.assemblies[assembly.0].types.push(id);
        id
    }

    /// Adds a constructor to a type.
    pub fn add_constructor(&mut self, ty: TypeId, spec: ConstructorSpec) -> ConstructorId {
        let parameters = self.add_parameters(ty, spec.parameters);
        let id = ConstructorId(self.index.constructors.len());
        self.index.constructors.push(ConstructorData {
            declaring_type: ty,
            access: spec.access,
            parameters,
            attributes: spec.attributes,
        });
        self.index.types[ty.0].constructors.push(id);
        id
    }

    /// Adds an event to a type.
    pub fn add_event(&mut self, ty: TypeId, spec: EventSpec) -> EventId {
        let id = EventId(self.index.events.len());
        self.index.events.push(EventData {
            name: spec.name,
            declaring_type: ty,
            access: spec.access,
            handler_type: spec.handler_type,
            attributes: spec.attributes,
        });
        self.index.types[ty.0].events.push(id);
        id
    }

    /// Adds a field to a type.
    pub fn add_field(&mut self, ty: TypeId, spec: FieldSpec) -> FieldId {
        let id = FieldId(self.index.fields.len());
        self.index.fields.push(FieldData {
            name: spec.name,
            declaring_type: ty,
            access: spec.access,
            field_type: spec.field_type,
            is_static: spec.is_static,
            attributes: spec.attributes,
        });
        self.index.types[ty.0].fields.push(id);
        id
    }

    /// Adds a method to a type.
    pub fn add_method(&mut self, ty: TypeId, spec: MethodSpec) -> MethodId {
        let parameters = self.add_parameters(ty, spec.parameters);
        let id = MethodId(self.index.methods.len());
        self.index.methods.push(MethodData {
            name: spec.name,
            declaring_type: ty,
            access: spec.access,
            is_static: spec.is_static,
            is_special_name: spec.is_special_name,
            declared_here: spec.declared_here,
            return_type: spec.return_type,
            parameters,
            attributes: spec.attributes,
        });
        self.index.types[ty.0].methods.push(id);
        id
    }

    /// Adds a property to a type.
    pub fn add_property(&mut self, ty: TypeId, spec: PropertySpec) -> PropertyId {
        let id = PropertyId(self.index.properties.len());
        self.index.properties.push(PropertyData {
            name: spec.name,
            declaring_type: ty,
            access: spec.access,
            property_type: spec.property_type,
            attributes: spec.attributes,
        });
        self.index.types[ty.0].properties.push(id);
        id
    }

    /// Finishes building.
    #[must_use]
    pub fn build(self) -> MetadataIndex {
        self.index
    }

    fn add_parameters(
        &mut self,
        declaring_type: TypeId,
        parameters: Vec<(String, TypeId)>,
    ) -> Vec<ParameterId> {
        parameters
            .into_iter()
            .map(|(name, parameter_type)| {
                let id = ParameterId(self.index.parameters.len());
                self.index.parameters.push(ParameterData {
                    name,
                    parameter_type,
                    declaring_type,
                });
                id
            })
            .collect()
    }
}

/// Declarative description of a type for [`MetadataIndexBuilder::add_type`].
#[derive(Debug, Clone)]
pub struct TypeSpec {
    name: String,
    namespace: Option<String>,
    access: Access,
    is_interface: bool,
    is_abstract: bool,
    is_sealed: bool,
    is_nested: bool,
    is_root: bool,
    open_generic: bool,
    generic_definition: Option<TypeId>,
    generic_args: Vec<TypeId>,
    base_type: Option<TypeId>,
    interfaces: Vec<TypeId>,
    attributes: Vec<TypeId>,
}

impl TypeSpec {
    /// A public, non-generic, non-nested type with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            access: Access::Public,
            is_interface: false,
            is_abstract: false,
            is_sealed: false,
            is_nested: false,
            is_root: false,
            open_generic: false,
            generic_definition: None,
            generic_args: Vec::new(),
            base_type: None,
            interfaces: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Sets the namespace.
    #[must_use]
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the access level.
    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Marks the type as an interface (interfaces are also abstract).
    #[must_use]
    pub fn interface(mut self) -> Self {
        self.is_interface = true;
        self.is_abstract = true;
        self
    }

    /// Marks the type as abstract.
    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Marks the type as sealed.
    #[must_use]
    pub fn sealed(mut self) -> Self {
        self.is_sealed = true;
        self
    }

    /// Marks the type as nested.
    #[must_use]
    pub fn nested(mut self) -> Self {
        self.is_nested = true;
        self
    }

    /// Marks the type as the universal inheritance root.
    #[must_use]
    pub fn root(mut self) -> Self {
        self.is_root = true;
        self
    }

    /// Marks the type as an open generic definition.
    #[must_use]
    pub fn generic(mut self) -> Self {
        self.open_generic = true;
        self
    }

    /// Marks the type as a closed instantiation of an open generic
    /// definition with the given type arguments.
    #[must_use]
    pub fn instantiating(mut self, definition: TypeId, args: impl IntoIterator<Item = TypeId>) -> Self {
        self.generic_definition = Some(definition);
        self.generic_args = args.into_iter().collect();
        self
    }

    /// Sets the base type.
    #[must_use]
    pub fn extending(mut self, base: TypeId) -> Self {
        self.base_type = Some(base);
        self
    }

    /// Adds implemented interfaces (the full set, including inherited).
    #[must_use]
    pub fn implementing(mut self, interfaces: impl IntoIterator<Item = TypeId>) -> Self {
        self.interfaces.extend(interfaces);
        self
    }

    /// Applies an attribute type.
    #[must_use]
    pub fn with_attribute(mut self, attribute: TypeId) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Declarative description of a constructor.
#[derive(Debug, Clone, Default)]
pub struct ConstructorSpec {
    access: Access,
    parameters: Vec<(String, TypeId)>,
    attributes: Vec<TypeId>,
}

impl ConstructorSpec {
    /// A public parameterless constructor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the access level.
    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.parameters.push((name.into(), ty));
        self
    }

    /// Applies an attribute type.
    #[must_use]
    pub fn with_attribute(mut self, attribute: TypeId) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Declarative description of an event.
#[derive(Debug, Clone)]
pub struct EventSpec {
    name: String,
    access: Access,
    handler_type: Option<TypeId>,
    attributes: Vec<TypeId>,
}

impl EventSpec {
    /// A public event with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: Access::Public,
            handler_type: None,
            attributes: Vec::new(),
        }
    }

    /// Sets the access level.
    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Sets the handler type.
    #[must_use]
    pub fn with_handler(mut self, handler: TypeId) -> Self {
        self.handler_type = Some(handler);
        self
    }

    /// Applies an attribute type.
    #[must_use]
    pub fn with_attribute(mut self, attribute: TypeId) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Declarative description of a field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    access: Access,
    field_type: TypeId,
    is_static: bool,
    attributes: Vec<TypeId>,
}

impl FieldSpec {
    /// A public instance field with the given name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: TypeId) -> Self {
        Self {
            name: name.into(),
            access: Access::Public,
            field_type,
            is_static: false,
            attributes: Vec::new(),
        }
    }

    /// Sets the access level.
    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Marks the field as static.
    #[must_use]
    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Applies an attribute type.
    #[must_use]
    pub fn with_attribute(mut self, attribute: TypeId) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Declarative description of a method.
#[derive(Debug, Clone)]
pub struct MethodSpec {
    name: String,
    access: Access,
    is_static: bool,
    is_special_name: bool,
    declared_here: bool,
    return_type: Option<TypeId>,
    parameters: Vec<(String, TypeId)>,
    attributes: Vec<TypeId>,
}

impl MethodSpec {
    /// A public instance method declared on the type it is added to.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: Access::Public,
            is_static: false,
            is_special_name: false,
            declared_here: true,
            return_type: None,
            parameters: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Sets the access level.
    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Marks the method as static.
    #[must_use]
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Marks the method as special-name (accessor, operator).
    #[must_use]
    pub fn special_name(mut self) -> Self {
        self.is_special_name = true;
        self
    }

    /// Marks the method as inherited rather than declared here.
    #[must_use]
    pub fn inherited(mut self) -> Self {
        self.declared_here = false;
        self
    }

    /// Sets the return type.
    #[must_use]
    pub fn returning(mut self, ty: TypeId) -> Self {
        self.return_type = Some(ty);
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, ty: TypeId) -> Self {
        self.parameters.push((name.into(), ty));
        self
    }

    /// Applies an attribute type.
    #[must_use]
    pub fn with_attribute(mut self, attribute: TypeId) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Declarative description of a property.
#[derive(Debug, Clone)]
pub struct PropertySpec {
    name: String,
    access: Access,
    property_type: TypeId,
    attributes: Vec<TypeId>,
}

impl PropertySpec {
    /// A public property with the given name and type.
    #[must_use]
    pub fn new(name: impl Into<String>, property_type: TypeId) -> Self {
        Self {
            name: name.into(),
            access: Access::Public,
            property_type,
            attributes: Vec::new(),
        }
    }

    /// Sets the access level.
    #[must_use]
    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    /// Applies an attribute type.
    #[must_use]
    pub fn with_attribute(mut self, attribute: TypeId) -> Self {
        self.attributes.push(attribute);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_handed_out_in_insertion_order() {
        let mut builder = MetadataIndexBuilder::new();
        let a = builder.add_assembly("A");
        let b = builder.add_assembly("B");
        assert!(a < b);

        let t1 = builder.add_type(a, TypeSpec::new("First"));
        let t2 = builder.add_type(b, TypeSpec::new("Second"));
        let index = builder.build();

        assert_eq!(index.assembly(a).types, vec![t1]);
        assert_eq!(index.assembly(b).types, vec![t2]);
    }

    #[test]
    fn open_generic_definition_points_to_itself() {
        let mut builder = MetadataIndexBuilder::new();
        let asm = builder.add_assembly("Lib");
        let list = builder.add_type(asm, TypeSpec::new("List").generic());
        let index = builder.build();

        assert_eq!(index.type_data(list).generic_definition, Some(list));
        assert!(index.type_data(list).is_open_generic());
    }

    #[test]
    fn method_parameters_are_materialized() {
        let mut builder = MetadataIndexBuilder::new();
        let asm = builder.add_assembly("Lib");
        let int = builder.add_type(asm, TypeSpec::new("Int32").in_namespace("System"));
        let svc = builder.add_type(asm, TypeSpec::new("Svc"));
        let m = builder.add_method(svc, MethodSpec::new("Add").with_parameter("count", int));
        let index = builder.build();

        let params = &index.method(m).parameters;
        assert_eq!(params.len(), 1);
        assert_eq!(index.parameter(params[0]).name, "count");
        assert_eq!(index.parameter(params[0]).declaring_type, svc);
    }

    #[test]
    fn assembly_references_are_recorded_as_names() {
        let mut builder = MetadataIndexBuilder::new();
        let asm = builder.add_assembly("App");
        builder.add_assembly_reference(asm, "Legacy.Billing");
        let index = builder.build();

        assert_eq!(index.assembly(asm).referenced_assemblies, vec!["Legacy.Billing"]);
    }
}
