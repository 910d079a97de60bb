use anyhow::Result;

use taxon::models::entity::TypeId;
use taxon::session::EditorSession;

use crate::cli::ui;

/// Declare a property applicable to a type
pub async fn assign(session: &mut EditorSession, type_id: TypeId, property: &str) -> Result<()> {
    if session.assign_property(type_id, property).await? {
        ui::print_success(&format!(
            "Property '{}' is now applicable to type {}",
            property, type_id
        ));
    } else {
        ui::print_info(&format!(
            "Property '{}' was already applicable to type {}",
            property, type_id
        ));
    }
    Ok(())
}

/// Withdraw a property from a type
pub async fn unassign(session: &mut EditorSession, type_id: TypeId, property: &str) -> Result<()> {
    if session.unassign_property(type_id, property).await? {
        ui::print_success(&format!(
            "Property '{}' withdrawn from type {}",
            property, type_id
        ));
    } else {
        ui::print_info(&format!(
            "Property '{}' was not applicable to type {}",
            property, type_id
        ));
    }
    Ok(())
}

/// Assign a possible value to a type's property
pub async fn set(
    session: &mut EditorSession,
    type_id: TypeId,
    property: &str,
    value: &str,
) -> Result<()> {
    if session.assign_value(type_id, property, value).await? {
        ui::print_success(&format!(
            "Assigned '{}' to property '{}' of type {}",
            value, property, type_id
        ));
    } else {
        ui::print_info(&format!(
            "'{}' was already assigned to property '{}' of type {}",
            value, property, type_id
        ));
    }
    Ok(())
}

/// Remove an assigned value from a type's property
pub async fn unset(
    session: &mut EditorSession,
    type_id: TypeId,
    property: &str,
    value: &str,
) -> Result<()> {
    if session.remove_value(type_id, property, value).await? {
        ui::print_success(&format!(
            "Removed '{}' from property '{}' of type {}",
            value, property, type_id
        ));
    } else {
        ui::print_info(&format!(
            "'{}' was not assigned to property '{}' of type {}",
            value, property, type_id
        ));
    }
    Ok(())
}

/// Render the dependent-selection chain for a type
pub async fn show(
    session: &mut EditorSession,
    type_id: Option<TypeId>,
    property: Option<&str>,
) -> Result<()> {
    if let Some(id) = type_id {
        session.select_type(Some(id))?;
    }
    if let Some(name) = property {
        session.select_property(Some(name))?;
    }

    let selection = session.selection();
    let Some(selected_type) = selection.selected_type() else {
        ui::print_warning("No types defined yet");
        return Ok(());
    };
    let type_name = session
        .store()
        .type_by_id(selected_type)
        .map(|t| t.name.clone())
        .unwrap_or_default();

    ui::print_header(&format!("Type '{}' (id {})", type_name, selected_type));

    if selection.applicable_properties().is_empty() {
        ui::print_empty("applicable properties");
        return Ok(());
    }
    println!("Applicable properties:");
    for name in selection.applicable_properties() {
        if Some(name.as_str()) == selection.selected_property() {
            ui::print_item(&format!("{} (selected)", name));
        } else {
            ui::print_item(name);
        }
    }

    if let Some(selected_property) = selection.selected_property() {
        println!("\nPossible values of '{}':", selected_property);
        if selection.possible_values().is_empty() {
            ui::print_empty("possible values");
        }
        for value in selection.possible_values() {
            ui::print_item(value);
        }

        println!("\nAssigned values:");
        if selection.assigned_values().is_empty() {
            ui::print_empty("assigned values");
        }
        for value in selection.assigned_values() {
            ui::print_item(value);
        }
    }
    Ok(())
}
