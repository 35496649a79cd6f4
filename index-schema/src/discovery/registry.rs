//! Registrations and the type universes that hold them.

use std::fmt;

use crate::discovery::{DiscoveredConfiguration, EntityType};
use crate::errors::DiscoveryError;

/// One declaring type's capability to configure one entity type.
///
/// Built by [`registration!`](crate::registration) and collected at link time
/// by [`register_configuration!`](crate::register_configuration).
#[derive(Clone, Copy)]
pub struct Registration {
    declaring_type: &'static str,
    entity_type: fn() -> EntityType,
    discover: fn(Option<&str>) -> Result<DiscoveredConfiguration, DiscoveryError>,
}

impl Registration {
    pub const fn new(
        declaring_type: &'static str,
        entity_type: fn() -> EntityType,
        discover: fn(Option<&str>) -> Result<DiscoveredConfiguration, DiscoveryError>,
    ) -> Self {
        Self {
            declaring_type,
            entity_type,
            discover,
        }
    }

    pub fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    pub fn entity_type(&self) -> EntityType {
        (self.entity_type)()
    }

    /// Instantiate the declaring type and run its configure routine.
    pub fn discover(&self, prefix: Option<&str>) -> Result<DiscoveredConfiguration, DiscoveryError> {
        (self.discover)(prefix)
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("declaring_type", &self.declaring_type)
            .field("entity_type", &self.entity_type())
            .finish()
    }
}

inventory::collect!(Registration);

/// Source of declaring types for discovery.
pub trait TypeUniverse {
    fn registrations(&self) -> Box<dyn Iterator<Item = &Registration> + Send + '_>;
}

/// Every registration submitted with `register_configuration!` in any crate
/// linked into the binary.
///
/// Iteration order follows the linker and is not guaranteed to be stable.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryUniverse;

impl TypeUniverse for InventoryUniverse {
    fn registrations(&self) -> Box<dyn Iterator<Item = &Registration> + Send + '_> {
        let registrations: Vec<&'static Registration> =
            inventory::iter::<Registration>.into_iter().collect();
        Box::new(registrations.into_iter())
    }
}

/// An explicit, ordered set of registrations.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    registrations: Vec<Registration>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every link-time registration.
    pub fn from_inventory() -> Self {
        Self {
            registrations: inventory::iter::<Registration>.into_iter().copied().collect(),
        }
    }

    pub fn with(mut self, registration: Registration) -> Self {
        self.register(registration);
        self
    }

    pub fn register(&mut self, registration: Registration) {
        self.registrations.push(registration);
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl TypeUniverse for TypeRegistry {
    fn registrations(&self) -> Box<dyn Iterator<Item = &Registration> + Send + '_> {
        Box::new(self.registrations.iter())
    }
}

/// Build a [`Registration`] for a declaring type and an entity type.
///
/// The declaring type is constructed with `Default` unless a constructor
/// returning `Result<D, E: Display>` is given.
///
/// ```ignore
/// let registry = TypeRegistry::new()
///     .with(registration!(UserProfileConfiguration => UserProfile))
///     .with(registration!(AuditConfiguration => AuditLog, constructor = AuditConfiguration::from_env));
/// ```
#[macro_export]
macro_rules! registration {
    ($declaring:ty => $entity:ty) => {
        $crate::registration!(
            $declaring => $entity,
            constructor = $crate::discovery::default_constructor::<$declaring>
        )
    };
    ($declaring:ty => $entity:ty, constructor = $constructor:expr) => {
        $crate::discovery::Registration::new(
            stringify!($declaring),
            $crate::discovery::EntityType::of::<$entity>,
            |prefix| {
                $crate::discovery::discover_declaration::<$declaring, $entity, _, _>(
                    stringify!($declaring),
                    $constructor,
                    prefix,
                )
            },
        )
    };
}

/// Register a declaring type for link-time discovery.
///
/// ```ignore
/// register_configuration!(UserProfileConfiguration => UserProfile);
/// ```
#[macro_export]
macro_rules! register_configuration {
    ($($args:tt)*) => {
        $crate::inventory::submit! {
            $crate::registration!($($args)*)
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::EntityConfigBuilder;
    use crate::discovery::ConfigureDocument;
    use crate::Document;

    #[allow(dead_code)]
    #[derive(Document)]
    struct LinkedEntity {
        key: String,
    }

    #[derive(Default)]
    struct LinkedConfiguration;

    impl ConfigureDocument<LinkedEntity> for LinkedConfiguration {
        fn configure(
            &self,
            builder: EntityConfigBuilder<LinkedEntity>,
            prefix: Option<&str>,
        ) -> EntityConfigBuilder<LinkedEntity> {
            builder.to_index(prefix)
        }
    }

    crate::register_configuration!(LinkedConfiguration => LinkedEntity);

    #[test]
    fn test_inventory_universe_sees_submitted_registrations() {
        let universe = InventoryUniverse;
        let found: Vec<_> = universe
            .registrations()
            .filter(|r| r.entity_type().is::<LinkedEntity>())
            .collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].declaring_type(), "LinkedConfiguration");

        let discovered = found[0].discover(Some("Linked")).unwrap();
        assert_eq!(
            discovered
                .downcast_ref::<LinkedEntity>()
                .unwrap()
                .index_name(),
            Some("linked_linked_entity")
        );
    }

    #[test]
    fn test_registry_from_inventory() {
        let registry = TypeRegistry::from_inventory();
        assert!(!registry.is_empty());
        assert!(registry
            .registrations()
            .any(|r| r.declaring_type() == "LinkedConfiguration"));
    }

    #[test]
    fn test_registry_keeps_order() {
        let registry = TypeRegistry::new()
            .with(crate::registration!(LinkedConfiguration => LinkedEntity))
            .with(crate::registration!(LinkedConfiguration => LinkedEntity));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.registrations().count(), 2);
    }
}
