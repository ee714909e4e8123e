//! Mapping rules, fluent builders, profiles, and configuration resolution.
//!
//! - [`rule`]: property rules, transformer/condition variants, the fluent
//!   per-property builder, and the named-callable registry
//! - [`configuration`]: resolved configurations and cache keys
//! - [`store`]: shared storage the fluent builders write through
//! - [`type_mapping`]: one-direction and bidirectional builders (open/sealed)
//! - [`profile`]: named bundles of type mappings
//! - [`builder`]: the configuration builder that merges all rule sources

pub mod builder;
pub mod configuration;
pub mod profile;
pub mod rule;
pub mod store;
pub mod type_mapping;

pub use builder::ConfigurationBuilder;
pub use configuration::{pair_key, MappingConfiguration};
pub use profile::MappingProfile;
pub use rule::{Condition, PropertyMapping, PropertyRule, Transformer, TransformerRegistry};
pub use store::MappingStore;
pub use type_mapping::{BidirectionalTypeMapping, TypeMapping};
