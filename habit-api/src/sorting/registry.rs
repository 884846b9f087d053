//! Process-wide registry of sort mapping definitions

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use super::apply::{apply_sort, OrderBy};
use super::mapping::SortMappingDefinition;
use crate::error::{Error, Result};

type Definition = Arc<dyn Any + Send + Sync>;

/// Sort mapping definitions keyed by (public shape, storage record) type pair
///
/// Filled once during startup and shared read-only afterwards (wrap it in an
/// `Arc`). Lookup is exact on the type pair.
#[derive(Default)]
pub struct SortMappingRegistry {
    definitions: HashMap<(TypeId, TypeId), Definition>,
}

impl SortMappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the mappings for `P` over `S`, replacing any earlier definition
    pub fn register<P, S>(&mut self, definition: SortMappingDefinition<P, S>) -> &mut Self
    where
        P: 'static,
        S: 'static,
    {
        tracing::debug!(
            public = type_name::<P>(),
            storage = type_name::<S>(),
            mappings = definition.mappings().len(),
            "Registered sort mappings"
        );
        self.definitions
            .insert(Self::key::<P, S>(), Arc::new(definition));
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<P, S>(mut self, definition: SortMappingDefinition<P, S>) -> Self
    where
        P: 'static,
        S: 'static,
    {
        self.register(definition);
        self
    }

    /// Definition registered for `P` over `S`
    ///
    /// A missing registration is a wiring bug, reported as
    /// [`Error::Configuration`].
    pub fn mappings<P, S>(&self) -> Result<Arc<SortMappingDefinition<P, S>>>
    where
        P: 'static,
        S: 'static,
    {
        self.definitions
            .get(&Self::key::<P, S>())
            .cloned()
            .and_then(|def| def.downcast::<SortMappingDefinition<P, S>>().ok())
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "no sort mapping registered from {} to {}",
                    type_name::<P>(),
                    type_name::<S>()
                ))
            })
    }

    /// Validate a sort expression against the mappings for `P` over `S`
    pub fn validate<P, S>(&self, sort: Option<&str>) -> Result<bool>
    where
        P: 'static,
        S: 'static,
    {
        Ok(self.mappings::<P, S>()?.validate(sort))
    }

    /// Build the ordering for a sort expression using the mappings for `P` over `S`
    pub fn order_by<P, S>(&self, sort: Option<&str>) -> Result<OrderBy<S>>
    where
        P: 'static,
        S: 'static,
    {
        let definition = self.mappings::<P, S>()?;
        apply_sort(sort, definition.mappings(), definition.default_key())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn key<P: 'static, S: 'static>() -> (TypeId, TypeId) {
        (TypeId::of::<P>(), TypeId::of::<S>())
    }
}

impl std::fmt::Debug for SortMappingRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SortMappingRegistry")
            .field("definitions", &self.definitions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorting::{SortKey, SortMapping};

    struct Habit {
        name: String,
    }
    struct HabitDto;
    struct TagDto;

    fn definition() -> SortMappingDefinition<HabitDto, Habit> {
        SortMappingDefinition::new(
            vec![SortMapping::new("name", "name", |h: &Habit| h.name.clone().into())],
            SortKey::new("name", |h: &Habit| h.name.clone().into()),
        )
    }

    #[test]
    fn test_lookup_by_type_pair() {
        let registry = SortMappingRegistry::new().with(definition());
        assert_eq!(registry.len(), 1);

        let found = registry.mappings::<HabitDto, Habit>().expect("registered");
        assert_eq!(found.mappings()[0].public_field, "name");
    }

    #[test]
    fn test_missing_registration_is_configuration_error() {
        let registry = SortMappingRegistry::new().with(definition());
        let err = registry.mappings::<TagDto, Habit>().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(registry.validate::<TagDto, Habit>(None).is_err());
    }

    #[test]
    fn test_validate_through_registry() {
        let registry = SortMappingRegistry::new().with(definition());
        assert!(registry.validate::<HabitDto, Habit>(Some("NAME desc")).unwrap());
        assert!(!registry.validate::<HabitDto, Habit>(Some("color")).unwrap());
    }

    #[test]
    fn test_order_by_through_registry() {
        let registry = SortMappingRegistry::new().with(definition());
        let order = registry
            .order_by::<HabitDto, Habit>(Some("name desc"))
            .expect("ordering");

        let mut habits = vec![
            Habit { name: "read".into() },
            Habit { name: "walk".into() },
        ];
        order.sort_slice(&mut habits);
        assert_eq!(habits[0].name, "walk");
    }
}
