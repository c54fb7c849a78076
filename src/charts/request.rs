//! Field bindings and chart requests built from widget state.

use super::kind::ChartKind;
use std::collections::BTreeMap;

/// Role name to column assignment.
///
/// Single-select roles hold zero or one column; multi-select roles keep the
/// order in which the user picked their columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldBindings {
    slots: BTreeMap<String, Vec<String>>,
}

impl FieldBindings {
    /// Bind a single-select role. `None` clears it.
    pub fn set(&mut self, role: &str, column: Option<&str>) {
        match column {
            Some(c) => {
                self.slots.insert(role.to_string(), vec![c.to_string()]);
            }
            None => {
                self.slots.remove(role);
            }
        }
    }

    /// Bind a multi-select role.
    pub fn set_many(&mut self, role: &str, columns: Vec<String>) {
        if columns.is_empty() {
            self.slots.remove(role);
        } else {
            self.slots.insert(role.to_string(), columns);
        }
    }

    pub fn single(&self, role: &str) -> Option<&str> {
        self.slots
            .get(role)
            .and_then(|cols| cols.first())
            .map(|s| s.as_str())
    }

    pub fn many(&self, role: &str) -> &[String] {
        self.slots.get(role).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

/// Builders used by the chart tests.
#[cfg(test)]
impl FieldBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, role: &str, column: &str) -> Self {
        self.set(role, Some(column));
        self
    }

    pub fn with_many(mut self, role: &str, columns: &[&str]) -> Self {
        self.set_many(role, columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// What the user asked for when pressing Generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub bindings: FieldBindings,
}

impl ChartRequest {
    pub fn new(kind: ChartKind, bindings: FieldBindings) -> Self {
        Self { kind, bindings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_binding_can_be_cleared() {
        let mut b = FieldBindings::new().with("X Axis", "a");
        assert_eq!(b.single("X Axis"), Some("a"));
        b.set("X Axis", None);
        assert_eq!(b.single("X Axis"), None);
        assert!(b.is_empty());
    }

    #[test]
    fn many_binding_keeps_selection_order() {
        let b = FieldBindings::new().with_many("Hierarchy", &["region", "city", "store"]);
        assert_eq!(b.many("Hierarchy"), ["region", "city", "store"]);
        assert!(b.many("Other").is_empty());
    }
}
