//! Type relationship resolution.
//!
//! Architectural rules frequently need "any type assignable to X"
//! semantics distinct from "exactly X" or "directly derived from X", and
//! rules are usually declared against open generic definitions
//! (`IRepository<>`) while scanned types are closed (`IRepository<User>`).
//! The operations here resolve those relationships over the metadata
//! model.

use crate::metadata::{MetadataIndex, TypeId};

/// Structural equality between two type descriptors.
///
/// An open generic (no type arguments bound) is compatible with any
/// instantiation of the same generic definition, and with another open
/// generic of that definition. Two closed generics are compatible iff
/// they share a definition and every corresponding type argument is
/// itself compatible. Non-generic types require identity.
#[must_use]
pub fn is_equal_to(index: &MetadataIndex, a: TypeId, b: TypeId) -> bool {
    let da = index.type_data(a);
    let db = index.type_data(b);

    match (da.generic_definition, db.generic_definition) {
        (None, None) => a == b,
        (Some(def_a), Some(def_b)) => {
            if def_a != def_b {
                return false;
            }
            // An open side is compatible with any instantiation.
            if da.generic_args.is_empty() || db.generic_args.is_empty() {
                return true;
            }
            da.generic_args.len() == db.generic_args.len()
                && da
                    .generic_args
                    .iter()
                    .zip(&db.generic_args)
                    .all(|(x, y)| is_equal_to(index, *x, *y))
        }
        _ => false,
    }
}

/// Tests whether `a` implements `interface_type`.
///
/// The interface set is matched with [`is_equal_to`], so an open
/// interface definition matches any of its instantiations. When
/// `force_direct` is true, only interfaces newly introduced at `a` count:
/// the base type's interface set is subtracted first.
#[must_use]
pub fn implements(
    index: &MetadataIndex,
    a: TypeId,
    interface_type: TypeId,
    force_direct: bool,
) -> bool {
    let data = index.type_data(a);

    if force_direct {
        let base_interfaces: &[TypeId] = data
            .base_type
            .map_or(&[], |base| &index.type_data(base).interfaces);
        data.interfaces
            .iter()
            .filter(|i| !base_interfaces.contains(*i))
            .any(|i| is_equal_to(index, *i, interface_type))
    } else {
        data.interfaces
            .iter()
            .any(|i| is_equal_to(index, *i, interface_type))
    }
}

/// Tests whether `a` inherits from `parent`.
///
/// Inheriting from yourself is not inheritance: `inherits_from(a, a)` is
/// false for every `a`. The walk starts at `a` itself (so `parent` may be
/// an interface implemented anywhere on the chain) and climbs the base
/// chain up to, but not including, the universal root type. With
/// `force_direct`, only the immediate base and directly introduced
/// interfaces are examined; the walk does not continue past that level.
#[must_use]
pub fn inherits_from(index: &MetadataIndex, a: TypeId, parent: TypeId, force_direct: bool) -> bool {
    if is_equal_to(index, a, parent) {
        return false;
    }

    let mut current = a;
    loop {
        if implements(index, current, parent, force_direct) {
            return true;
        }
        let Some(base) = index.type_data(current).base_type else {
            return false;
        };
        if index.type_data(base).is_root {
            return false;
        }
        if is_equal_to(index, base, parent) {
            return true;
        }
        if force_direct {
            return false;
        }
        current = base;
    }
}

/// `is_equal_to(a, parent) || inherits_from(a, parent, force_direct)`.
#[must_use]
pub fn is_or_inherits_from(
    index: &MetadataIndex,
    a: TypeId,
    parent: TypeId,
    force_direct: bool,
) -> bool {
    is_equal_to(index, a, parent) || inherits_from(index, a, parent, force_direct)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MetadataIndexBuilder, TypeSpec};

    struct Fixture {
        index: MetadataIndex,
        root: TypeId,
        animal: TypeId,
        dog: TypeId,
        puppy: TypeId,
        feedable: TypeId,
        repo_def: TypeId,
        repo_user: TypeId,
        repo_order: TypeId,
        user: TypeId,
        order: TypeId,
    }

    fn fixture() -> Fixture {
        let mut b = MetadataIndexBuilder::new();
        let asm = b.add_assembly("Zoo");
        let root = b.add_type(asm, TypeSpec::new("Object").in_namespace("System").root());
        let feedable = b.add_type(asm, TypeSpec::new("IFeedable").interface());
        let animal = b.add_type(asm, TypeSpec::new("Animal").extending(root));
        let dog = b.add_type(
            asm,
            TypeSpec::new("Dog").extending(animal).implementing([feedable]),
        );
        let puppy = b.add_type(
            asm,
            TypeSpec::new("Puppy").extending(dog).implementing([feedable]),
        );
        let user = b.add_type(asm, TypeSpec::new("User").extending(root));
        let order = b.add_type(asm, TypeSpec::new("Order").extending(root));
        let repo_def = b.add_type(asm, TypeSpec::new("IRepository").interface().generic());
        let repo_user = b.add_type(
            asm,
            TypeSpec::new("IRepository")
                .interface()
                .instantiating(repo_def, [user]),
        );
        let repo_order = b.add_type(
            asm,
            TypeSpec::new("IRepository")
                .interface()
                .instantiating(repo_def, [order]),
        );
        Fixture {
            index: b.build(),
            root,
            animal,
            dog,
            puppy,
            feedable,
            repo_def,
            repo_user,
            repo_order,
            user,
            order,
        }
    }

    #[test]
    fn non_generic_equality_is_identity() {
        let f = fixture();
        assert!(is_equal_to(&f.index, f.dog, f.dog));
        assert!(!is_equal_to(&f.index, f.dog, f.animal));
    }

    #[test]
    fn open_generic_is_compatible_with_any_instantiation() {
        let f = fixture();
        assert!(is_equal_to(&f.index, f.repo_def, f.repo_user));
        assert!(is_equal_to(&f.index, f.repo_user, f.repo_def));
        assert!(is_equal_to(&f.index, f.repo_def, f.repo_def));
    }

    #[test]
    fn closed_generics_compare_type_arguments() {
        let f = fixture();
        assert!(!is_equal_to(&f.index, f.repo_user, f.repo_order));
        assert!(is_equal_to(&f.index, f.repo_user, f.repo_user));
    }

    #[test]
    fn generic_never_equals_non_generic() {
        let f = fixture();
        assert!(!is_equal_to(&f.index, f.repo_def, f.user));
        assert!(!is_equal_to(&f.index, f.repo_user, f.order));
    }

    #[test]
    fn closed_implementor_implements_open_interface() {
        let mut b = MetadataIndexBuilder::new();
        let asm = b.add_assembly("App");
        let user = b.add_type(asm, TypeSpec::new("User"));
        let repo_def = b.add_type(asm, TypeSpec::new("IRepository").interface().generic());
        let repo_user = b.add_type(
            asm,
            TypeSpec::new("IRepository")
                .interface()
                .instantiating(repo_def, [user]),
        );
        let concrete = b.add_type(asm, TypeSpec::new("UserRepository").implementing([repo_user]));
        let index = b.build();

        assert!(implements(&index, concrete, repo_def, false));
        assert!(implements(&index, concrete, repo_user, false));
    }

    #[test]
    fn force_direct_subtracts_base_interfaces() {
        let mut b = MetadataIndexBuilder::new();
        let asm = b.add_assembly("App");
        let marker = b.add_type(asm, TypeSpec::new("IMarker").interface());
        let fresh = b.add_type(asm, TypeSpec::new("IFresh").interface());
        let base = b.add_type(asm, TypeSpec::new("Base").implementing([marker]));
        let derived = b.add_type(
            asm,
            TypeSpec::new("Derived")
                .extending(base)
                .implementing([marker, fresh]),
        );
        let index = b.build();

        assert!(implements(&index, derived, marker, false));
        assert!(!implements(&index, derived, marker, true));
        assert!(implements(&index, derived, fresh, true));
    }

    #[test]
    fn self_is_not_an_ancestor() {
        let f = fixture();
        assert!(!inherits_from(&f.index, f.dog, f.dog, false));
        assert!(is_or_inherits_from(&f.index, f.dog, f.dog, false));
    }

    #[test]
    fn transitive_inheritance_walks_the_chain() {
        let f = fixture();
        assert!(inherits_from(&f.index, f.puppy, f.animal, false));
        assert!(inherits_from(&f.index, f.puppy, f.dog, false));
        assert!(!inherits_from(&f.index, f.animal, f.puppy, false));
    }

    #[test]
    fn interfaces_count_as_parents() {
        let f = fixture();
        assert!(inherits_from(&f.index, f.dog, f.feedable, false));
    }

    #[test]
    fn root_type_is_never_an_ancestor() {
        let f = fixture();
        assert!(!inherits_from(&f.index, f.puppy, f.root, false));
    }

    #[test]
    fn force_direct_stops_after_one_level() {
        let f = fixture();
        assert!(inherits_from(&f.index, f.puppy, f.dog, true));
        assert!(!inherits_from(&f.index, f.puppy, f.animal, true));
    }
}
