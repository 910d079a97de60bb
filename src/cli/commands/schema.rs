use anyhow::Result;

use taxon::session::EditorSession;

use crate::cli::ui;
use crate::cli::{PropAction, TypeAction, ValueAction};

/// Item-type management command
pub async fn types(session: &mut EditorSession, action: &TypeAction) -> Result<()> {
    match action {
        TypeAction::List => {
            ui::print_header("Item Types");
            if session.store().types().is_empty() {
                ui::print_empty("types");
            }
            for item_type in session.store().types() {
                ui::print_item(&format!("{} (id {})", item_type.name, item_type.id));
            }
        }
        TypeAction::Add { name } => {
            let created = session.create_type(name).await?;
            ui::print_success(&format!(
                "Created type '{}' with id {}",
                created.name, created.id
            ));
        }
        TypeAction::Rm { id } => {
            let removed = session.delete_type(*id).await?;
            ui::print_success(&format!(
                "Deleted type {} ({} assignment(s) removed)",
                id, removed
            ));
        }
    }
    Ok(())
}

/// Property management command
pub async fn props(session: &mut EditorSession, action: &PropAction) -> Result<()> {
    match action {
        PropAction::List => {
            ui::print_header("Properties");
            if session.store().properties().is_empty() {
                ui::print_empty("properties");
            }
            for property in session.store().properties() {
                let values = session.store().values_of_property(&property.name);
                ui::print_item(&format!(
                    "{} (id {}, {} possible value(s))",
                    property.name,
                    property.id,
                    values.len()
                ));
            }
        }
        PropAction::Add { name } => {
            let created = session.create_property(name).await?;
            ui::print_success(&format!(
                "Created property '{}' with id {}",
                created.name, created.id
            ));
        }
        PropAction::Rm { id } => {
            let removed = session.delete_property(*id).await?;
            ui::print_success(&format!(
                "Deleted property {} ({} assignment(s) removed)",
                id, removed
            ));
        }
    }
    Ok(())
}

/// Possible-value management command
pub async fn values(
    session: &mut EditorSession,
    property: &str,
    action: &ValueAction,
) -> Result<()> {
    match action {
        ValueAction::List => {
            ui::print_header(&format!("Possible Values of '{}'", property));
            let values = session.store().values_of_property(property);
            if values.is_empty() {
                ui::print_empty("values");
            }
            for value in values {
                ui::print_item(&value);
            }
        }
        ValueAction::Add { value } => {
            let created = session.add_possible_value(property, value).await?;
            ui::print_success(&format!(
                "Added value '{}' to property '{}'",
                created.value, created.property_name
            ));
        }
        ValueAction::Rm { value } => {
            let stripped = session.delete_possible_value(property, value).await?;
            ui::print_success(&format!(
                "Removed value '{}' from property '{}' ({} assignment(s) updated)",
                value, property, stripped
            ));
        }
    }
    Ok(())
}
