use log::{debug, trace};

use crate::errors::{TaxonError, TaxonResult};
use crate::models::entity::{EntityChange, EntityKey, TypeId};
use crate::store::EntityStore;

/// Nodes of the dependent-selection dataflow graph, listed in topological
/// order. The two input nodes hold user choices; the rest are pure functions
/// of their upstream nodes and the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Node {
    SelectedType = 0,
    ApplicableProperties = 1,
    SelectedProperty = 2,
    PossibleValues = 3,
    AssignedValues = 4,
}

const TOPO_ORDER: [Node; 5] = [
    Node::SelectedType,
    Node::ApplicableProperties,
    Node::SelectedProperty,
    Node::PossibleValues,
    Node::AssignedValues,
];

fn dependents(node: Node) -> &'static [Node] {
    match node {
        Node::SelectedType => &[
            Node::ApplicableProperties,
            Node::SelectedProperty,
            Node::AssignedValues,
        ],
        Node::ApplicableProperties => &[Node::SelectedProperty],
        Node::SelectedProperty => &[Node::PossibleValues, Node::AssignedValues],
        Node::PossibleValues | Node::AssignedValues => &[],
    }
}

/// The dependent-selection chain of the editor, kept synchronized with the
/// entity store:
///
/// ```text
/// selected type -> applicable properties -> selected property
///               -> possible values of the selected property
///               -> values assigned for the (type, property) pair
/// ```
///
/// Whenever an upstream node or a relevant store record changes, every
/// transitively dependent node is recomputed in dependency order, exactly
/// once, before the next snapshot is observable. No node ever references a
/// key absent from the store: a deleted selection resets to its default
/// instead of dangling.
#[derive(Debug, Default)]
pub struct SelectionGraph {
    selected_type: Option<TypeId>,
    applicable_properties: Vec<String>,
    selected_property: Option<String>,
    possible_values: Vec<String>,
    assigned_values: Vec<String>,
    dirty: [bool; 5],
}

impl SelectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_type(&self) -> Option<TypeId> {
        self.selected_type
    }

    pub fn selected_property(&self) -> Option<&str> {
        self.selected_property.as_deref()
    }

    /// Ordered names of the properties applicable to the selected type
    pub fn applicable_properties(&self) -> &[String] {
        &self.applicable_properties
    }

    /// Ordered domain values of the selected property
    pub fn possible_values(&self) -> &[String] {
        &self.possible_values
    }

    /// Ordered values assigned for the selected (type, property) pair
    pub fn assigned_values(&self) -> &[String] {
        &self.assigned_values
    }

    /// Recompute the whole chain from the store, e.g. after a snapshot
    /// refresh. An unset or stale selected type falls back to the first type.
    pub fn sync(&mut self, store: &EntityStore) {
        for node in TOPO_ORDER {
            self.mark(node);
        }
        self.sweep(store, false);
    }

    /// Change the selected type. `None` clears the selection; a known id
    /// selects it; an unknown id is rejected so the graph never points at a
    /// missing key.
    pub fn select_type(&mut self, store: &EntityStore, type_id: Option<TypeId>) -> TaxonResult<()> {
        if let Some(id) = type_id {
            if store.type_by_id(id).is_none() {
                return Err(TaxonError::InvalidReference(format!(
                    "unknown type id {}",
                    id
                )));
            }
        }
        let changed = self.selected_type != type_id;
        self.selected_type = type_id;
        if changed {
            debug!("selected type -> {:?}", type_id);
            for node in dependents(Node::SelectedType) {
                self.mark(*node);
            }
            self.sweep(store, true);
        }
        Ok(())
    }

    /// Change the selected property. The choice is constrained to the
    /// applicable properties of the selected type.
    pub fn select_property(
        &mut self,
        store: &EntityStore,
        property_name: Option<&str>,
    ) -> TaxonResult<()> {
        if let Some(name) = property_name {
            if !self.applicable_properties.iter().any(|p| p == name) {
                return Err(TaxonError::ValidationError(format!(
                    "property '{}' is not applicable to the selected type",
                    name
                )));
            }
        }
        let next = property_name.map(str::to_string);
        let changed = self.selected_property != next;
        self.selected_property = next;
        if changed {
            debug!("selected property -> {:?}", self.selected_property);
            for node in dependents(Node::SelectedProperty) {
                self.mark(*node);
            }
            self.sweep(store, false);
        }
        Ok(())
    }

    /// Resynchronize after a store mutation batch: mark the nodes whose
    /// inputs the changes touch, then recompute dependents in topological
    /// order.
    pub fn apply(&mut self, store: &EntityStore, changes: &[EntityChange]) {
        for change in changes {
            match &change.key {
                EntityKey::Type(id) => {
                    // A removed selection goes stale; a first type arriving
                    // provides the default for an empty one.
                    if self.selected_type == Some(*id) || self.selected_type.is_none() {
                        self.mark(Node::SelectedType);
                    }
                }
                EntityKey::Property(name) => {
                    if self.selected_property.as_deref() == Some(name.as_str()) {
                        self.mark(Node::SelectedProperty);
                    }
                }
                EntityKey::TypeProperty { type_id, .. } => {
                    if self.selected_type == Some(*type_id) {
                        self.mark(Node::ApplicableProperties);
                    }
                }
                EntityKey::PossibleValue { property_name, .. } => {
                    if self.selected_property.as_deref() == Some(property_name.as_str()) {
                        self.mark(Node::PossibleValues);
                    }
                }
                EntityKey::PropertyValue {
                    type_id,
                    property_name,
                } => {
                    if self.selected_type == Some(*type_id)
                        && self.selected_property.as_deref() == Some(property_name.as_str())
                    {
                        self.mark(Node::AssignedValues);
                    }
                }
            }
        }
        self.sweep(store, false);
    }

    fn mark(&mut self, node: Node) {
        self.dirty[node as usize] = true;
    }

    /// Single pass over the topological order: each dirty node is recomputed
    /// exactly once, and a node whose value changed marks its dependents
    /// (which all come later in the order).
    fn sweep(&mut self, store: &EntityStore, mut type_changed: bool) {
        for node in TOPO_ORDER {
            if !self.dirty[node as usize] {
                continue;
            }
            self.dirty[node as usize] = false;
            let changed = match node {
                Node::SelectedType => {
                    let next = self.compute_selected_type(store);
                    let changed = next != self.selected_type;
                    self.selected_type = next;
                    type_changed |= changed;
                    changed
                }
                Node::ApplicableProperties => {
                    let next = self
                        .selected_type
                        .map(|id| store.properties_of_type(id))
                        .unwrap_or_default();
                    let changed = next != self.applicable_properties;
                    self.applicable_properties = next;
                    changed
                }
                Node::SelectedProperty => {
                    let next = self.compute_selected_property(store, type_changed);
                    let changed = next != self.selected_property;
                    self.selected_property = next;
                    changed
                }
                Node::PossibleValues => {
                    let next = self
                        .selected_property
                        .as_deref()
                        .map(|p| store.values_of_property(p))
                        .unwrap_or_default();
                    let changed = next != self.possible_values;
                    self.possible_values = next;
                    changed
                }
                Node::AssignedValues => {
                    let next = match (self.selected_type, self.selected_property.as_deref()) {
                        (Some(type_id), Some(property)) => store.assigned_values(type_id, property),
                        _ => Vec::new(),
                    };
                    let changed = next != self.assigned_values;
                    self.assigned_values = next;
                    changed
                }
            };
            if changed {
                trace!("selection node {:?} recomputed", node);
                for dependent in dependents(node) {
                    self.mark(*dependent);
                }
            }
        }
    }

    fn compute_selected_type(&self, store: &EntityStore) -> Option<TypeId> {
        match self.selected_type {
            Some(id) if store.type_by_id(id).is_some() => Some(id),
            // Unset or stale: default to the first type, if any.
            _ => store.types().first().map(|t| t.id),
        }
    }

    fn compute_selected_property(&self, store: &EntityStore, type_changed: bool) -> Option<String> {
        let first = || self.applicable_properties.first().cloned();
        if type_changed {
            return first();
        }
        match self.selected_property.as_deref() {
            Some(name) if self.applicable_properties.iter().any(|p| p == name) => {
                Some(name.to_string())
            }
            // The selected property entity was deleted: fall back to the
            // unselected state, never to an arbitrary remaining property.
            Some(name) if store.property_by_name(name).is_none() => None,
            // Still exists but is no longer applicable (or nothing was
            // selected): reset to the first applicable property.
            _ => first(),
        }
    }
}
