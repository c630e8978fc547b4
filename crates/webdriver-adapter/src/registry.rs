//! Registry mapping issued element ids to live driver handles.

use dashmap::DashMap;
use waypoint_core_types::ElementId;

/// Concurrent registry of elements found in the current document.
pub struct ElementRegistry<E> {
    elements: DashMap<ElementId, E>,
}

impl<E: Clone> ElementRegistry<E> {
    pub fn new() -> Self {
        Self {
            elements: DashMap::new(),
        }
    }

    pub fn insert(&self, element: E) -> ElementId {
        let id = ElementId::new();
        self.elements.insert(id.clone(), element);
        id
    }

    pub fn get(&self, id: &ElementId) -> Option<E> {
        self.elements.get(id).map(|entry| entry.value().clone())
    }

    /// Forget every element; called whenever the document changes.
    pub fn clear(&self) {
        self.elements.clear();
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<E: Clone> Default for ElementRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_clear() {
        let registry = ElementRegistry::new();
        let id = registry.insert("button#submit".to_string());
        assert_eq!(registry.get(&id).as_deref(), Some("button#submit"));
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.get(&id).is_none());
        assert!(registry.is_empty());
    }
}
