use super::ui;
use crate::FamilyCommand;
use crate::core::family::FamilyMember;
use crate::store::family::FamilyStore;
use anyhow::Result;
use comfy_table::Cell;

pub fn run(family: &FamilyStore, command: FamilyCommand, currency: &str) -> Result<()> {
    match command {
        FamilyCommand::Add {
            name,
            relation,
            spend,
        } => {
            let member = family.add_member(&name, relation, spend)?;
            println!(
                "Added {} ({}) with id {}.",
                member.name, member.relation, member.id
            );
        }
        FamilyCommand::Remove { id } => {
            if family.remove_member(&id)? {
                println!("Removed family member {id}.");
            } else {
                anyhow::bail!("No family member with id {id}");
            }
        }
        FamilyCommand::List => {
            let members = family.members()?;
            if members.is_empty() {
                println!("No family members yet. Try: famfin family add \"Ana\" spouse 120");
                return Ok(());
            }
            println!("{}", members_table(&members, currency));
        }
    }
    Ok(())
}

fn members_table(members: &[FamilyMember], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("Relation"),
        ui::header_cell(&format!("Reported spend ({currency})")),
        ui::header_cell("Id"),
    ]);

    for member in members {
        table.add_row(vec![
            Cell::new(&member.name),
            Cell::new(member.relation.to_string()),
            ui::amount_cell(member.self_reported_spend),
            Cell::new(&member.id),
        ]);
    }

    table.to_string()
}
