use crate::engine::IntegrityEngine;
use crate::errors::TaxonError;
use crate::models::entity::{EntityKind, ItemType, PossibleValue, Property};
use crate::tests::support::{seeded_store, setup};

#[test]
fn deleting_a_type_cascades_all_its_assignments() {
    setup();
    let mut store = seeded_store();
    IntegrityEngine::add_property_value(&mut store, 1, "Color", "red").unwrap();
    IntegrityEngine::add_property_value(&mut store, 1, "Material", "wood").unwrap();

    let removed = IntegrityEngine::delete_type(&mut store, 1);

    // Two applicability assignments and two value assignments went with it
    assert_eq!(removed, 4);
    assert!(store.type_by_id(1).is_none());
    assert!(store.properties_of_type(1).is_empty());
    assert!(store.assignment(1, "Color").is_none());
    assert!(store.assignment(1, "Material").is_none());
    // The other type and the schema itself are untouched
    assert!(store.type_by_id(2).is_some());
    assert_eq!(store.properties().len(), 2);
    assert_eq!(store.values_of_property("Color"), vec!["red", "blue"]);
}

#[test]
fn deleting_an_unknown_type_cascades_nothing() {
    setup();
    let mut store = seeded_store();
    assert_eq!(IntegrityEngine::delete_type(&mut store, 99), 0);
    assert_eq!(store.types().len(), 2);
}

#[test]
fn deleting_a_property_cascades_domain_and_assignments() {
    setup();
    let mut store = seeded_store();
    IntegrityEngine::add_property_value(&mut store, 1, "Material", "wood").unwrap();

    let removed = IntegrityEngine::delete_property(&mut store, "Material");

    assert_eq!(removed, 2);
    assert!(store.property_by_name("Material").is_none());
    assert!(store.values_of_property("Material").is_empty());
    // The type's applicability list no longer names the property and the
    // value assignment is gone entirely, not just emptied
    assert_eq!(store.properties_of_type(1), vec!["Color"]);
    assert!(store.assignment(1, "Material").is_none());
    // Unrelated property untouched
    assert_eq!(store.values_of_property("Color"), vec!["red", "blue"]);
}

#[test]
fn deleting_a_possible_value_strips_it_from_every_assignment() {
    setup();
    let mut store = seeded_store();
    IntegrityEngine::add_type_property(&mut store, 2, "Color").unwrap();
    IntegrityEngine::add_property_value(&mut store, 1, "Color", "red").unwrap();
    IntegrityEngine::add_property_value(&mut store, 1, "Color", "blue").unwrap();
    IntegrityEngine::add_property_value(&mut store, 2, "Color", "blue").unwrap();

    let stripped = IntegrityEngine::delete_possible_value(&mut store, "Color", "red");

    assert_eq!(stripped, 1);
    assert!(!store.has_possible_value("Color", "red"));
    assert_eq!(store.assigned_values(1, "Color"), vec!["blue"]);
    // An assignment that never contained the value is unaffected
    assert_eq!(store.assigned_values(2, "Color"), vec!["blue"]);
}

#[test]
fn assigned_values_empty_after_sole_value_deleted() {
    setup();
    let mut store = seeded_store();
    IntegrityEngine::add_property_value(&mut store, 1, "Color", "red").unwrap();

    IntegrityEngine::delete_possible_value(&mut store, "Color", "red");

    assert_eq!(store.assigned_values(1, "Color"), Vec::<String>::new());
    // The assignment record survives with an empty value list
    assert!(store.assignment(1, "Color").is_some());
}

#[test]
fn deleting_an_absent_possible_value_is_a_noop() {
    setup();
    let mut store = seeded_store();
    assert_eq!(
        IntegrityEngine::delete_possible_value(&mut store, "Color", "green"),
        0
    );
    assert_eq!(store.values_of_property("Color"), vec!["red", "blue"]);
}

#[test]
fn adding_a_type_property_twice_is_idempotent() {
    setup();
    let mut store = seeded_store();
    assert!(IntegrityEngine::add_type_property(&mut store, 2, "Color").unwrap());
    let before = store.list(EntityKind::TypeProperty);

    assert!(!IntegrityEngine::add_type_property(&mut store, 2, "Color").unwrap());

    assert_eq!(store.list(EntityKind::TypeProperty), before);
}

#[test]
fn adding_a_type_property_establishes_an_empty_value_assignment() {
    setup();
    let mut store = seeded_store();
    IntegrityEngine::add_type_property(&mut store, 2, "Material").unwrap();
    let assignment = store.assignment(2, "Material").unwrap();
    assert!(assignment.values.is_empty());
}

#[test]
fn type_property_references_must_exist() {
    setup();
    let mut store = seeded_store();
    assert!(matches!(
        IntegrityEngine::add_type_property(&mut store, 99, "Color"),
        Err(TaxonError::InvalidReference(_))
    ));
    assert!(matches!(
        IntegrityEngine::add_type_property(&mut store, 1, "Weight"),
        Err(TaxonError::InvalidReference(_))
    ));
}

#[test]
fn removing_a_type_property_drops_its_value_assignment() {
    setup();
    let mut store = seeded_store();
    IntegrityEngine::add_property_value(&mut store, 1, "Color", "red").unwrap();

    assert!(IntegrityEngine::remove_type_property(&mut store, 1, "Color"));

    assert!(!store.has_type_property(1, "Color"));
    assert!(store.assignment(1, "Color").is_none());
    // A second removal is a no-op
    assert!(!IntegrityEngine::remove_type_property(&mut store, 1, "Color"));
}

#[test]
fn value_assignment_requires_the_pair_to_be_established() {
    setup();
    let mut store = seeded_store();
    // Type 2 has no applicability assignment for Color
    assert!(matches!(
        IntegrityEngine::add_property_value(&mut store, 2, "Color", "red"),
        Err(TaxonError::InvalidReference(_))
    ));
}

#[test]
fn value_assignment_must_come_from_the_domain() {
    setup();
    let mut store = seeded_store();
    assert!(matches!(
        IntegrityEngine::add_property_value(&mut store, 1, "Color", "green"),
        Err(TaxonError::InvalidReference(_))
    ));
}

#[test]
fn duplicate_value_assignment_is_silently_ignored() {
    setup();
    let mut store = seeded_store();
    assert!(IntegrityEngine::add_property_value(&mut store, 1, "Color", "red").unwrap());
    assert!(!IntegrityEngine::add_property_value(&mut store, 1, "Color", "red").unwrap());
    assert_eq!(store.assigned_values(1, "Color"), vec!["red"]);
}

#[test]
fn removing_an_absent_value_is_a_noop() {
    setup();
    let mut store = seeded_store();
    IntegrityEngine::add_property_value(&mut store, 1, "Color", "blue").unwrap();
    assert!(!IntegrityEngine::remove_property_value(
        &mut store, 1, "Color", "red"
    ));
    assert_eq!(store.assigned_values(1, "Color"), vec!["blue"]);
}

#[test]
fn names_are_trimmed_and_must_be_unique_and_non_empty() {
    setup();
    let mut store = seeded_store();

    assert!(matches!(
        IntegrityEngine::insert_type(
            &mut store,
            ItemType {
                id: 10,
                name: "   ".to_string()
            }
        ),
        Err(TaxonError::ValidationError(_))
    ));
    assert!(matches!(
        IntegrityEngine::insert_type(
            &mut store,
            ItemType {
                id: 10,
                name: "Lamp".to_string()
            }
        ),
        Err(TaxonError::ValidationError(_))
    ));

    IntegrityEngine::insert_type(
        &mut store,
        ItemType {
            id: 10,
            name: "  Table ".to_string(),
        },
    )
    .unwrap();
    assert!(store.type_by_name("Table").is_some());

    // Names are case-sensitive: a different casing is a different name
    IntegrityEngine::insert_property(
        &mut store,
        Property {
            id: 10,
            name: "color".to_string(),
        },
    )
    .unwrap();
    assert!(store.property_by_name("color").is_some());

    assert!(matches!(
        IntegrityEngine::insert_possible_value(
            &mut store,
            PossibleValue {
                property_name: "Color".to_string(),
                value: "red".to_string()
            }
        ),
        Err(TaxonError::ValidationError(_))
    ));
}
