//! Required component sets
//!
//! A system names the components it needs as a tuple type, e.g.
//! `(Position, Velocity)`. [`ComponentSet`] turns that tuple into the
//! membership test used by [`ComponentsManager::entities_with`] and into a
//! bundle of exclusive pool borrows from which per-entity `&mut` references
//! are fetched.

use std::any::TypeId;
use std::cell::RefMut;

use super::component::short_type_name;
use super::{Component, ComponentPool, ComponentsManager, EcsError, Entity};

pub trait ComponentSet: 'static {
    /// Mutable references to one entity's components, in tuple order.
    type Refs<'a>
    where
        Self: 'a;

    /// Exclusive borrows of every pool in the set.
    type Guards<'a>
    where
        Self: 'a;

    /// Type that drives traversal (the first in the tuple).
    fn driver() -> TypeId;

    fn type_names() -> Vec<&'static str>;

    fn contains_all(manager: &ComponentsManager, entity: Entity) -> bool;

    /// Fails with `BorrowConflict` when a type appears twice in the set or
    /// one of its pools is already borrowed.
    fn lock(manager: &ComponentsManager) -> Result<Self::Guards<'_>, EcsError>;

    fn fetch<'g, 'a: 'g>(
        guards: &'g mut Self::Guards<'a>,
        entity: Entity,
    ) -> Result<Self::Refs<'g>, EcsError>;
}

macro_rules! impl_component_set {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: Component $(, $rest: Component)*> ComponentSet for ($first, $($rest,)*) {
            type Refs<'a> = (&'a mut $first, $(&'a mut $rest,)*)
            where
                Self: 'a;

            type Guards<'a> = (RefMut<'a, ComponentPool<$first>>, $(RefMut<'a, ComponentPool<$rest>>,)*)
            where
                Self: 'a;

            fn driver() -> TypeId {
                TypeId::of::<$first>()
            }

            fn type_names() -> Vec<&'static str> {
                vec![short_type_name::<$first>() $(, short_type_name::<$rest>())*]
            }

            fn contains_all(manager: &ComponentsManager, entity: Entity) -> bool {
                manager.has::<$first>(entity) $(&& manager.has::<$rest>(entity))*
            }

            fn lock(manager: &ComponentsManager) -> Result<Self::Guards<'_>, EcsError> {
                Ok((manager.pool_mut::<$first>()?, $(manager.pool_mut::<$rest>()?,)*))
            }

            #[allow(non_snake_case)]
            fn fetch<'g, 'a: 'g>(
                guards: &'g mut Self::Guards<'a>,
                entity: Entity,
            ) -> Result<Self::Refs<'g>, EcsError> {
                let ($first, $($rest,)*) = guards;
                Ok(($first.get_mut(entity)?, $($rest.get_mut(entity)?,)*))
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
