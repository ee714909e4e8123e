//! Fluent type-mapping builders with an open/sealed state machine.
//!
//! Builders write member registrations into a shared [`MappingStore`].
//! Member registration is only valid while a builder is open; sealing
//! freezes it, and for bidirectional pairs materializes every registered
//! member pair as two reciprocal property mappings. Resealing is a no-op.

use std::fmt;
use std::sync::Arc;

use crate::error::{MapperError, Result};

use super::rule::PropertyMapping;
use super::store::MappingStore;

/// Fluent builder for one mapping direction.
pub struct TypeMapping {
    source_type: String,
    dest_type: String,
    store: Arc<MappingStore>,
    sealed: bool,
}

impl fmt::Debug for TypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeMapping")
            .field("source_type", &self.source_type)
            .field("dest_type", &self.dest_type)
            .field("sealed", &self.sealed)
            .finish_non_exhaustive()
    }
}

impl TypeMapping {
    /// Create an open builder writing into `store`.
    pub(crate) fn new(
        source_type: impl Into<String>,
        dest_type: impl Into<String>,
        store: Arc<MappingStore>,
    ) -> Self {
        Self {
            source_type: source_type.into(),
            dest_type: dest_type.into(),
            store,
            sealed: false,
        }
    }

    /// Source type name.
    #[must_use]
    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// Destination type name.
    #[must_use]
    pub fn dest_type(&self) -> &str {
        &self.dest_type
    }

    /// Whether the builder has been sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.sealed {
            return Err(MapperError::InvalidState(format!(
                "mapping {} -> {} is sealed",
                self.source_type, self.dest_type
            )));
        }
        Ok(())
    }

    /// Register a property mapping for one destination member.
    pub fn for_member(
        &mut self,
        dest_property: &str,
        mapping: PropertyMapping,
    ) -> Result<&mut Self> {
        self.ensure_open()?;
        self.store
            .set_member(&self.source_type, &self.dest_type, dest_property, mapping);
        Ok(self)
    }

    /// Shorthand: map `dest_property` from `source_key`.
    pub fn for_members(&mut self, dest_property: &str, source_key: &str) -> Result<&mut Self> {
        self.for_member(dest_property, PropertyMapping::new().map_from(source_key))
    }

    /// Freeze the builder. Idempotent.
    pub fn seal(&mut self) -> &mut Self {
        self.sealed = true;
        self
    }
}

/// Fluent builder for a reciprocal pair of mapping directions.
///
/// Owns a forward (`A -> B`) and a reverse (`B -> A`) [`TypeMapping`] plus
/// the registered member pairs. Sealing materializes each pair as
/// `dest.map_from(source)` in both directions, then seals both inner
/// builders.
pub struct BidirectionalTypeMapping {
    forward: TypeMapping,
    reverse: TypeMapping,
    pairs: Vec<(String, String)>,
    sealed: bool,
}

impl fmt::Debug for BidirectionalTypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BidirectionalTypeMapping")
            .field("forward", &self.forward)
            .field("reverse", &self.reverse)
            .field("pairs", &self.pairs)
            .field("sealed", &self.sealed)
            .finish()
    }
}

impl BidirectionalTypeMapping {
    /// Create an open bidirectional builder between `type_a` and `type_b`.
    pub(crate) fn new(type_a: &str, type_b: &str, store: Arc<MappingStore>) -> Self {
        Self {
            forward: TypeMapping::new(type_a, type_b, Arc::clone(&store)),
            reverse: TypeMapping::new(type_b, type_a, store),
            pairs: Vec::new(),
            sealed: false,
        }
    }

    /// Forward direction (`A -> B`).
    #[must_use]
    pub fn forward(&self) -> &TypeMapping {
        &self.forward
    }

    /// Reverse direction (`B -> A`).
    #[must_use]
    pub fn reverse(&self) -> &TypeMapping {
        &self.reverse
    }

    /// Whether the pair has been sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.sealed {
            return Err(MapperError::InvalidState(format!(
                "bidirectional mapping {} <-> {} is sealed",
                self.forward.source_type, self.forward.dest_type
            )));
        }
        Ok(())
    }

    /// Register a reciprocal member pair (`a_property` on the A side,
    /// `b_property` on the B side).
    pub fn for_member_pairs(&mut self, a_property: &str, b_property: &str) -> Result<&mut Self> {
        self.ensure_open()?;
        self.pairs
            .push((a_property.to_string(), b_property.to_string()));
        Ok(self)
    }

    /// Alias for [`for_member_pairs`](Self::for_member_pairs).
    pub fn for_members(&mut self, a_property: &str, b_property: &str) -> Result<&mut Self> {
        self.for_member_pairs(a_property, b_property)
    }

    /// Register a member mapping on the forward direction only.
    pub fn for_forward_member(
        &mut self,
        dest_property: &str,
        mapping: PropertyMapping,
    ) -> Result<&mut Self> {
        self.ensure_open()?;
        self.forward.for_member(dest_property, mapping)?;
        Ok(self)
    }

    /// Register a member mapping on the reverse direction only.
    pub fn for_reverse_member(
        &mut self,
        dest_property: &str,
        mapping: PropertyMapping,
    ) -> Result<&mut Self> {
        self.ensure_open()?;
        self.reverse.for_member(dest_property, mapping)?;
        Ok(self)
    }

    /// Materialize registered pairs as reciprocal member mappings and seal
    /// both directions. Calling `seal` again is a no-op.
    pub fn seal(&mut self) -> &mut Self {
        if self.sealed {
            return self;
        }

        for (a_property, b_property) in &self.pairs {
            self.forward.store.set_member(
                &self.forward.source_type,
                &self.forward.dest_type,
                b_property.clone(),
                PropertyMapping::new().map_from(a_property.clone()),
            );
            self.reverse.store.set_member(
                &self.reverse.source_type,
                &self.reverse.dest_type,
                a_property.clone(),
                PropertyMapping::new().map_from(b_property.clone()),
            );
        }

        self.forward.seal();
        self.reverse.seal();
        self.sealed = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_member_after_seal_fails() {
        let store = Arc::new(MappingStore::new());
        let mut mapping = TypeMapping::new("A", "B", store);
        mapping.for_members("name", "full_name").unwrap();
        mapping.seal();

        let err = mapping.for_members("age", "years").unwrap_err();
        assert!(matches!(err, MapperError::InvalidState(_)));
    }

    #[test]
    fn test_bidirectional_seal_materializes_pairs() {
        let store = Arc::new(MappingStore::new());
        let mut bidir = BidirectionalTypeMapping::new("A", "B", Arc::clone(&store));
        bidir.for_members("name", "name").unwrap();
        bidir.seal();

        let forward = store.members("A", "B").unwrap();
        assert_eq!(forward.get("name").unwrap().source(), Some("name"));
        let reverse = store.members("B", "A").unwrap();
        assert_eq!(reverse.get("name").unwrap().source(), Some("name"));
    }

    #[test]
    fn test_bidirectional_renamed_pair() {
        let store = Arc::new(MappingStore::new());
        let mut bidir = BidirectionalTypeMapping::new("A", "B", Arc::clone(&store));
        bidir.for_member_pairs("first_name", "firstName").unwrap();
        bidir.seal();

        let forward = store.members("A", "B").unwrap();
        assert_eq!(
            forward.get("firstName").unwrap().source(),
            Some("first_name")
        );
        let reverse = store.members("B", "A").unwrap();
        assert_eq!(
            reverse.get("first_name").unwrap().source(),
            Some("firstName")
        );
    }

    #[test]
    fn test_reseal_is_noop_and_mutation_fails() {
        let store = Arc::new(MappingStore::new());
        let mut bidir = BidirectionalTypeMapping::new("A", "B", Arc::clone(&store));
        bidir.for_members("name", "name").unwrap();
        bidir.seal();
        bidir.seal();
        assert!(bidir.is_sealed());

        // Pairs were not materialized twice.
        assert_eq!(store.members("A", "B").unwrap().len(), 1);

        let err = bidir.for_members("age", "age").unwrap_err();
        assert!(matches!(err, MapperError::InvalidState(_)));
        let err = bidir
            .for_forward_member("age", PropertyMapping::new())
            .unwrap_err();
        assert!(matches!(err, MapperError::InvalidState(_)));
    }
}
