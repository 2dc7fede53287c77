//! FocusRing — keyboard focus cycling between the sidebar and the active view.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.items.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }

    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }

    /// Replace the ring contents (on view switch), keeping the focused id
    /// when it is still present.
    pub fn set_items(&mut self, items: Vec<ComponentId>) {
        let old = self.current();
        self.items = items;
        self.current = old
            .and_then(|id| self.items.iter().position(|&x| x == id))
            .unwrap_or(0);
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_both_ways() {
        let mut ring = FocusRing::new(vec![ComponentId::Sidebar, ComponentId::Home]);
        assert_eq!(ring.current(), Some(ComponentId::Sidebar));
        assert_eq!(ring.next(), Some(ComponentId::Home));
        assert_eq!(ring.next(), Some(ComponentId::Sidebar));
        assert_eq!(ring.prev(), Some(ComponentId::Home));
    }

    #[test]
    fn test_set_items_keeps_focus_when_possible() {
        let mut ring = FocusRing::new(vec![ComponentId::Sidebar, ComponentId::Home]);
        ring.set_items(vec![ComponentId::Sidebar, ComponentId::Search]);
        assert!(ring.is_focused(ComponentId::Sidebar));

        ring.set(ComponentId::Search);
        ring.set_items(vec![ComponentId::Sidebar, ComponentId::LikedSongs]);
        assert!(ring.is_focused(ComponentId::Sidebar));
        assert!(FocusRing::default().next().is_none());
    }
}
