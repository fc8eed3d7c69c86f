//! # Modifier Commands
//!
//! Modifiers are sale extras: an extra charge plus the ingredients (or
//! recipes) one application consumes.

use tracing::info;

use pantry_core::validation::{validate_component_quantity, validate_name, validate_price};
use pantry_core::{Catalog, Money};

use super::{component_name, modifier_name};
use crate::cli::ModifierCommand;
use crate::error::CliResult;
use crate::render::{qty, Table};
use crate::state::AppContext;

pub async fn run(ctx: &AppContext, cmd: ModifierCommand) -> CliResult<String> {
    let mut catalog = ctx.store.load_catalog().await?;

    let out = match cmd {
        ModifierCommand::List => return list(&catalog),
        ModifierCommand::Set { name, charge } => {
            let name = set_charge(&mut catalog, &name, charge)?;
            info!(modifier = %name, %charge, "Set modifier charge");
            format!("{name} now adds {charge}\n")
        }
        ModifierCommand::Add {
            modifier,
            component,
            quantity,
        } => {
            validate_component_quantity(quantity)?;
            let modifier = modifier_name(&catalog, &modifier)?;
            let component = component_name(&catalog, &component)?;
            catalog.set_modifier_component(&modifier, &component, quantity)?;
            info!(%modifier, %component, %quantity, "Set modifier component");
            format!("{modifier} uses {} of {component}\n", qty(quantity))
        }
        ModifierCommand::RemoveComponent { modifier, component } => {
            let modifier = modifier_name(&catalog, &modifier)?;
            let component = component_name(&catalog, &component).unwrap_or_else(|_| component.trim().to_string());
            let removed = catalog.remove_modifier_component(&modifier, &component)?;
            info!(%modifier, %component, "Removed modifier component");
            format!("Removed {} {component} from {modifier}\n", qty(removed))
        }
        ModifierCommand::Delete { name } => {
            let name = modifier_name(&catalog, &name)?;
            catalog.remove_modifier(&name)?;
            info!(modifier = %name, "Deleted modifier");
            format!("Deleted modifier {name}\n")
        }
    };

    ctx.store.modifiers().save(catalog.modifiers()).await?;
    Ok(out)
}

fn list(catalog: &Catalog) -> CliResult<String> {
    let mut table = Table::new(["Modifier", "Extra charge", "Ingredient cost", "Uses"]).right(&[1, 2]);
    for modifier in catalog.modifiers() {
        let uses: Vec<String> = modifier
            .components
            .iter()
            .map(|c| format!("{} {}", c.name, qty(c.quantity)))
            .collect();
        table.row([
            modifier.name.clone(),
            modifier.extra_charge.to_string(),
            Money::from_decimal(catalog.modifier_cost(&modifier.name)?).to_string(),
            uses.join("; "),
        ]);
    }
    if table.is_empty() {
        return Ok("No modifiers yet.\n".to_string());
    }
    Ok(table.render())
}

/// Sets the charge of an existing modifier (matched leniently) or creates it.
pub(crate) fn set_charge(catalog: &mut Catalog, query: &str, charge: Money) -> CliResult<String> {
    validate_price("extra charge", charge)?;
    let name = match catalog.find_modifier(query) {
        Some(existing) => existing.name.clone(),
        None => {
            let name = query.trim().to_string();
            validate_name("modifier", &name)?;
            name
        }
    };
    catalog.set_modifier_charge(&name, charge)?;
    Ok(name)
}
