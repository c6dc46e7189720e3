//! Hover and select highlighting for placed objects.
//!
//! At most one object is selected at a time. [`SelectionCoordinator`] owns
//! that slot and tells the previous holder it lost the selection before the
//! new holder is told it gained it. [`Highlights`] tracks the visual state
//! each object should render with.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

/// Visual state a renderer maps onto a material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightState {
  #[default]
  Default,
  Hover,
  Selected,
}

/// Receives selection changes from a [`SelectionCoordinator`].
pub trait SelectionListener<K> {
  fn selected(&mut self, key: &K);

  fn deselected(&mut self, key: &K);
}

#[derive(Debug)]
pub struct SelectionCoordinator<K> {
  current: Option<K>,
}

impl<K> Default for SelectionCoordinator<K> {
  fn default() -> Self {
    Self { current: None }
  }
}

impl<K: Eq + Clone> SelectionCoordinator<K> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn current(&self) -> Option<&K> {
    self.current.as_ref()
  }

  pub fn is_selected(&self, key: &K) -> bool {
    self.current.as_ref() == Some(key)
  }

  /// Grant the selection to `key`, deselecting the previous holder first.
  ///
  /// Returns the previous holder. Re-selecting the current holder still
  /// notifies it as selected but never as deselected.
  pub fn select(&mut self, key: K, listener: &mut impl SelectionListener<K>) -> Option<K> {
    let previous = self.current.take().filter(|prev| *prev != key);
    if let Some(prev) = &previous {
      listener.deselected(prev);
    }
    listener.selected(&key);
    self.current = Some(key);
    previous
  }

  /// Deselect `key`. The slot is cleared only if `key` holds it; the
  /// listener is told either way.
  pub fn deselect(&mut self, key: &K, listener: &mut impl SelectionListener<K>) -> bool {
    let held = self.is_selected(key);
    if held {
      self.current = None;
    }
    listener.deselected(key);
    held
  }

  /// Drop the slot without notifying, e.g. when the holder was destroyed.
  pub fn forget(&mut self, key: &K) {
    if self.is_selected(key) {
      self.current = None;
    }
  }
}

/// Per-object highlight states.
#[derive(Debug)]
pub struct Highlights<K> {
  states: HashMap<K, HighlightState>,
}

impl<K> Default for Highlights<K> {
  fn default() -> Self {
    Self { states: HashMap::new() }
  }
}

impl<K: Eq + Hash + Clone> Highlights<K> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn state(&self, key: &K) -> HighlightState {
    self.states.get(key).copied().unwrap_or_default()
  }

  /// Hovering only shows on objects that are not selected.
  pub fn hover_enter(&mut self, key: &K) {
    if self.state(key) != HighlightState::Selected {
      self.states.insert(key.clone(), HighlightState::Hover);
    }
  }

  pub fn hover_exit(&mut self, key: &K) {
    if self.state(key) != HighlightState::Selected {
      self.states.insert(key.clone(), HighlightState::Default);
    }
  }

  pub fn remove(&mut self, key: &K) {
    self.states.remove(key);
  }
}

impl<K: Eq + Hash + Clone> SelectionListener<K> for Highlights<K> {
  fn selected(&mut self, key: &K) {
    self.states.insert(key.clone(), HighlightState::Selected);
  }

  fn deselected(&mut self, key: &K) {
    self.states.insert(key.clone(), HighlightState::Default);
  }
}
