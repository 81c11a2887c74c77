//! UI component handles for focus containment and traversal.
//!
//! A [`UiComponent`] is a lightweight handle into the host application's UI
//! tree. The dispatch core never paints or lays out components; it only needs
//! identity (which component lost platform focus?), the parent chain (where
//! is the nearest focus-traversal container?), and the child list (does a
//! component lie inside a session's UI region?).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// A shared handle to a node in the host UI tree.
///
/// Clones share the same underlying node; identity is by node, not by value.
#[derive(Clone)]
pub struct UiComponent {
    inner: Arc<UiNode>,
}

struct UiNode {
    id: u64,
    traversal_root: bool,
    parent: RwLock<Weak<UiNode>>,
    children: RwLock<Vec<UiComponent>>,
}

impl UiComponent {
    /// Create a new detached component.
    pub fn new() -> Self {
        Self::build(false)
    }

    /// Create a new detached container that owns a focus-traversal cycle.
    ///
    /// The focus arbiter walks the parent chain up to the nearest traversal
    /// root when handing focus outward.
    pub fn traversal_root() -> Self {
        Self::build(true)
    }

    fn build(traversal_root: bool) -> Self {
        Self {
            inner: Arc::new(UiNode {
                id: NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed),
                traversal_root,
                parent: RwLock::new(Weak::new()),
                children: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Process-unique identifier of this component.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Whether this component owns a focus-traversal cycle.
    pub fn is_traversal_root(&self) -> bool {
        self.inner.traversal_root
    }

    /// Attach a child to this component.
    pub fn add_child(&self, child: &UiComponent) {
        *child.inner.parent.write().unwrap() = Arc::downgrade(&self.inner);
        self.inner.children.write().unwrap().push(child.clone());
    }

    /// The parent component, if attached.
    pub fn parent(&self) -> Option<UiComponent> {
        self.inner
            .parent
            .read()
            .unwrap()
            .upgrade()
            .map(|inner| UiComponent { inner })
    }

    /// Snapshot of the child list.
    pub fn children(&self) -> Vec<UiComponent> {
        self.inner.children.read().unwrap().clone()
    }

    /// The first child, if any.
    pub fn first_child(&self) -> Option<UiComponent> {
        self.inner.children.read().unwrap().first().cloned()
    }

    /// Whether two handles refer to the same node.
    pub fn same(&self, other: &UiComponent) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for UiComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for UiComponent {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for UiComponent {}

impl std::fmt::Debug for UiComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiComponent")
            .field("id", &self.inner.id)
            .field("traversal_root", &self.inner.traversal_root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_components_are_distinct() {
        let a = UiComponent::new();
        let b = UiComponent::new();
        assert_ne!(a.id(), b.id());
        assert!(!a.same(&b));
    }

    #[test]
    fn test_clone_is_same_node() {
        let a = UiComponent::new();
        let b = a.clone();
        assert!(a.same(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_parent_child_links() {
        let parent = UiComponent::new();
        let child = UiComponent::new();
        parent.add_child(&child);

        assert!(child.parent().unwrap().same(&parent));
        assert_eq!(parent.children().len(), 1);
        assert!(parent.first_child().unwrap().same(&child));
    }

    #[test]
    fn test_detached_has_no_parent() {
        let component = UiComponent::new();
        assert!(component.parent().is_none());
        assert!(component.first_child().is_none());
    }

    #[test]
    fn test_traversal_root_flag() {
        assert!(UiComponent::traversal_root().is_traversal_root());
        assert!(!UiComponent::new().is_traversal_root());
    }

    #[test]
    fn test_parent_dropped_leaves_child_detached() {
        let child = UiComponent::new();
        {
            let parent = UiComponent::new();
            parent.add_child(&child);
            assert!(child.parent().is_some());
        }
        assert!(child.parent().is_none());
    }
}
