//! Lookup table from pattern type to generator

use std::collections::HashMap;
use std::sync::Arc;

use super::{CairnGenerator, Generator, PromenadeGenerator};
use crate::domain::DomainError;

/// Generators registered by namespace
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    generators: HashMap<String, Arc<dyn Generator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in cairn and promenade generators
    pub fn with_defaults() -> Self {
        Self::new()
            .with_generator(CairnGenerator::new())
            .with_generator(PromenadeGenerator::new())
    }

    /// Registers a generator under its namespace, replacing any existing one
    pub fn with_generator(mut self, generator: impl Generator + 'static) -> Self {
        self.register(Arc::new(generator));
        self
    }

    pub fn register(&mut self, generator: Arc<dyn Generator>) {
        self.generators
            .insert(generator.namespace().to_string(), generator);
    }

    pub fn get(&self, pattern_type: &str) -> Option<&Arc<dyn Generator>> {
        self.generators.get(pattern_type)
    }

    /// Resolves the generator for a pattern type, failing on unknown or missing types
    pub fn resolve(&self, pattern_type: Option<&str>) -> Result<&Arc<dyn Generator>, DomainError> {
        pattern_type
            .and_then(|t| self.get(t))
            .ok_or_else(|| DomainError::unknown_pattern_type(pattern_type))
    }

    pub fn namespaces(&self) -> Vec<&str> {
        let mut namespaces: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        namespaces.sort_unstable();
        namespaces
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_register_both_generators() {
        let registry = GeneratorRegistry::with_defaults();
        assert_eq!(registry.namespaces(), vec!["cairn", "promenade"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_resolve_known_type() {
        let registry = GeneratorRegistry::with_defaults();
        let generator = registry.resolve(Some("promenade")).unwrap();
        assert_eq!(generator.namespace(), "promenade");
    }

    #[test]
    fn test_resolve_unknown_type() {
        let registry = GeneratorRegistry::with_defaults();
        let result = registry.resolve(Some("unknown"));

        match result {
            Err(DomainError::UnknownPatternType { pattern_type }) => {
                assert_eq!(pattern_type.as_deref(), Some("unknown"));
            }
            other => panic!("expected UnknownPatternType, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_missing_type() {
        let registry = GeneratorRegistry::with_defaults();
        assert!(matches!(
            registry.resolve(None),
            Err(DomainError::UnknownPatternType { pattern_type: None })
        ));
    }

    #[test]
    fn test_registering_replaces_namespace() {
        let registry = GeneratorRegistry::with_defaults()
            .with_generator(CairnGenerator::new().with_model("claude-3-haiku-20240307"));

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get("cairn").unwrap().model(),
            Some("claude-3-haiku-20240307")
        );
    }
}
