//! Shared filter and requirement constructors used by every facade.

use arch_assert_core::metadata::AccessModifiers;
use arch_assert_core::{
    CheckError, Entity, EntityKind, Filter, Pattern, Requirement, ViolationError,
};

/// The capitalized noun used in violation messages for one entity kind.
pub(crate) fn kind_noun(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Assembly => "Assembly",
        EntityKind::Type => "Type",
        EntityKind::Constructor => "Constructor",
        EntityKind::Event => "Event",
        EntityKind::Field => "Field",
        EntityKind::Method => "Method",
        EntityKind::Property => "Property",
        EntityKind::Parameter => "Parameter",
    }
}

pub(crate) fn name_matching<E: Entity>(pattern: Pattern, ignore_case: bool) -> Filter<E> {
    Filter::new(
        format!("have name matching '{pattern}'"),
        move |index, entity: E| pattern.matches(Some(entity.name(index)), ignore_case),
    )
}

pub(crate) fn access_in<E: Entity>(set: AccessModifiers) -> Filter<E> {
    Filter::new(format!("are {set}"), move |index, entity: E| {
        entity.access(index).is_some_and(|a| set.contains(a))
    })
}

/// Attribute filter resolving the attribute type by full name per run.
///
/// Member attributes do not walk inheritance chains; the type facade has
/// its own inherit-aware variant.
pub(crate) fn has_attribute<E: Entity>(attribute: impl Into<String>) -> Filter<E> {
    let attribute = attribute.into();
    Filter::new(
        format!("have attribute '{attribute}'"),
        move |index, entity: E| {
            index
                .find_type(&attribute)
                .is_some_and(|attr| index.attributes_match(entity.attributes(index), attr))
        },
    )
}

pub(crate) fn should_have_access<E: Entity>(set: AccessModifiers) -> Requirement<E> {
    Requirement::should_satisfy(
        format!("should be {set}"),
        move |index, entity: E| entity.access(index).is_some_and(|a| set.contains(a)),
        move |index, entity: E| {
            CheckError::Violation(ViolationError::new(
                entity.entity_ref(),
                entity.full_name(index),
                format!(
                    "{} '{}' should be {set}",
                    kind_noun(E::KIND),
                    entity.name(index)
                ),
            ))
        },
    )
}

pub(crate) fn should_have_name_matching<E: Entity>(
    pattern: Pattern,
    ignore_case: bool,
) -> Requirement<E> {
    let matcher = pattern.clone();
    Requirement::should_satisfy(
        format!("should have name matching '{pattern}'"),
        move |index, entity: E| matcher.matches(Some(entity.name(index)), ignore_case),
        move |index, entity: E| {
            CheckError::Violation(ViolationError::new(
                entity.entity_ref(),
                entity.full_name(index),
                format!(
                    "{} '{}' should have name matching '{pattern}'",
                    kind_noun(E::KIND),
                    entity.name(index)
                ),
            ))
        },
    )
}
