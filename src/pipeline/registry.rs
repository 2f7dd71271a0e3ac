use crate::imports::*;

/// Known filter types, looked up by uuid when loading pipeline files.
///
/// Each entry keeps the identity reported by a throwaway instance next to the factory, so lookups
/// never build a filter just to read its name.
pub struct FilterRegistry {
    filters: IndexMap<Uuid, (FilterIdentity, FilterFactory)>,
    names: HashMap<&'static str, Uuid>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.filters.values().map(|(identity, _)| identity.name))
            .finish()
    }
}

impl FilterRegistry {
    pub fn new() -> Self {
        FilterRegistry {
            filters: IndexMap::new(),
            names: HashMap::new(),
        }
    }

    /// Registry holding every built-in filter.
    pub fn with_builtins() -> Result<Self> {
        let mut registry = Self::new();
        crate::filters::register_builtins(&mut registry)
            .context("Failed to register built-in filters")?;
        Ok(registry)
    }

    pub fn register(&mut self, factory: FilterFactory) -> Result<()> {
        let identity = factory().identity();
        if let Some((existing, _)) = self.filters.get(&identity.uuid) {
            return Err(anyhow::anyhow!(
                "Filter uuid {} is already registered as '{}'",
                identity.uuid,
                existing.name
            ));
        }
        if self.names.contains_key(identity.name) {
            return Err(anyhow::anyhow!(
                "Filter name '{}' is already registered",
                identity.name
            ));
        }
        tracing::debug!(filter = identity.name, uuid = %identity.uuid, "Registered filter");
        self.names.insert(identity.name, identity.uuid);
        self.filters.insert(identity.uuid, (identity, factory));
        Ok(())
    }

    pub fn create(&self, uuid: &Uuid) -> Option<Box<dyn Filter>> {
        self.filters.get(uuid).map(|(_, factory)| factory())
    }

    pub fn create_by_name(&self, name: &str) -> Option<Box<dyn Filter>> {
        self.names.get(name).and_then(|uuid| self.create(uuid))
    }

    pub fn identity(&self, uuid: &Uuid) -> Option<&FilterIdentity> {
        self.filters.get(uuid).map(|(identity, _)| identity)
    }

    /// Identities in registration order.
    pub fn identities(&self) -> impl Iterator<Item = &FilterIdentity> {
        self.filters.values().map(|(identity, _)| identity)
    }

    pub fn contains(&self, uuid: &Uuid) -> bool {
        self.filters.contains_key(uuid)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{create_group::CreateDataGroup, delete::DeleteData};

    #[test]
    fn lookup_by_uuid_and_name() {
        let registry = FilterRegistry::with_builtins().unwrap();
        let filter = registry.create(&CreateDataGroup::UUID).unwrap();
        assert_eq!(filter.identity().name, "CreateDataGroup");
        let filter = registry.create_by_name("DeleteData").unwrap();
        assert_eq!(filter.identity().uuid, DeleteData::UUID);
        assert!(registry.create(&Uuid::nil()).is_none());
        assert!(registry.create_by_name("Missing").is_none());
    }

    #[test]
    fn builtin_conflicts_are_errors_not_partial_registries() {
        let mut registry = FilterRegistry::with_builtins().unwrap();
        let err = crate::filters::register_builtins(&mut registry).unwrap_err();
        assert!(err.to_string().contains("is already registered as 'CreateDataGroup'"));
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn identities_keep_registration_order() {
        let mut registry = FilterRegistry::new();
        assert!(registry.is_empty());
        registry.register(factory::<DeleteData>()).unwrap();
        registry.register(factory::<CreateDataGroup>()).unwrap();
        let names: Vec<&str> = registry.identities().map(|i| i.name).collect();
        assert_eq!(names, vec!["DeleteData", "CreateDataGroup"]);
        assert!(registry.register(factory::<DeleteData>()).is_err());
        assert_eq!(registry.len(), 2);
    }
}
