//! Process-wide extractor registry.

use std::collections::HashMap;
use std::sync::Arc;

use docnorm_core::Extractor;
use once_cell::sync::Lazy;

use crate::factory::{ExtractorFactory, ExtractorKind};

static GLOBAL_REGISTRY: Lazy<ExtractorRegistry> = Lazy::new(ExtractorRegistry::new);

/// Lookup table from registry name to extractor.
///
/// Built once and never modified. Unknown names return `None`; deciding what
/// to do about them is the caller's concern.
pub struct ExtractorRegistry {
    extractors: HashMap<&'static str, Arc<dyn Extractor>>,
}

impl ExtractorRegistry {
    /// Build a registry holding every [`ExtractorKind`].
    pub fn new() -> Self {
        let extractors = ExtractorKind::all()
            .map(|kind| (kind.as_str(), ExtractorFactory::create(kind)))
            .collect();
        Self { extractors }
    }

    /// The shared registry.
    pub fn global() -> &'static ExtractorRegistry {
        &GLOBAL_REGISTRY
    }

    /// Look up an extractor by registry name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Extractor>> {
        self.extractors.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.extractors.contains_key(name)
    }

    /// Registered names, in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        ExtractorKind::all()
            .map(ExtractorKind::as_str)
            .filter(|name| self.extractors.contains_key(name))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_registry_holds_every_kind() {
        let registry = ExtractorRegistry::global();
        assert_eq!(registry.len(), 6);
        assert!(!registry.is_empty());

        for name in registry.names() {
            let extractor = registry.get(name).unwrap();
            assert_eq!(extractor.name(), name);
        }
    }

    #[test]
    fn test_unknown_name_is_none() {
        let registry = ExtractorRegistry::global();
        assert!(registry.get("pdf_to_string").is_none());
        assert!(!registry.contains("pdf_to_string"));
        assert!(registry.contains("txt_to_string"));
    }

    #[test]
    fn test_global_returns_the_same_instance() {
        let a = ExtractorRegistry::global().get("docx_to_string").unwrap();
        let b = ExtractorRegistry::global().get("docx_to_string").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
