//! Ordered store of overlay components

use super::ControlComponent;
use log::debug;
use std::rc::Rc;

struct Entry {
    component: Rc<dyn ControlComponent>,
    private: bool,
}

/// Components attached to one controller, in insertion order
///
/// Private components receive every notification but are not part of the
/// visual stack the view layer draws.
#[derive(Default)]
pub struct ComponentRegistry {
    entries: Vec<Entry>,
}

/// Identity comparison for shared trait objects
pub(crate) fn same_component(a: &Rc<dyn ControlComponent>, b: &Rc<dyn ControlComponent>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a component; returns false if it is already registered
    pub fn add(&mut self, component: Rc<dyn ControlComponent>, private: bool) -> bool {
        if self.contains(&component) {
            debug!("component already registered");
            return false;
        }
        self.entries.push(Entry { component, private });
        true
    }

    /// Remove one component; returns false if it was not registered
    pub fn remove(&mut self, component: &Rc<dyn ControlComponent>) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| !same_component(&e.component, component));
        before != self.entries.len()
    }

    pub fn remove_all_private(&mut self) {
        self.entries.retain(|e| !e.private);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, component: &Rc<dyn ControlComponent>) -> bool {
        self.entries.iter().any(|e| same_component(&e.component, component))
    }

    /// Whether a registered component is private
    pub fn is_private(&self, component: &Rc<dyn ControlComponent>) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| same_component(&e.component, component))
            .map(|e| e.private)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every component in registration order
    ///
    /// Callers fan out over the snapshot, never over the registry itself,
    /// so components may add or remove components while being notified.
    pub fn snapshot(&self) -> Vec<Rc<dyn ControlComponent>> {
        self.entries.iter().map(|e| e.component.clone()).collect()
    }

    /// Non-private components in draw order, most recently added first
    pub fn visual_stack(&self) -> Vec<Rc<dyn ControlComponent>> {
        self.entries
            .iter()
            .rev()
            .filter(|e| !e.private)
            .map(|e| e.component.clone())
            .collect()
    }
}
