//! Item commands

use anyhow::{bail, Result};
use clap::{ArgGroup, Subcommand};
use hitodo_core::{DraftTarget, EditTarget};
use uuid::Uuid;

use super::app::HostApp;
use super::output::Output;

#[derive(Subcommand)]
pub enum ItemCommands {
    /// Add an item to a list, or a sub-item to an item
    #[command(group(ArgGroup::new("parent").required(true).args(["list", "item"])))]
    Add {
        /// Item content
        content: String,

        /// Parent list ID
        #[arg(long)]
        list: Option<Uuid>,

        /// Parent item ID
        #[arg(long)]
        item: Option<Uuid>,
    },

    /// Change an item's content
    Edit {
        /// Item ID
        id: Uuid,

        /// New content
        content: String,
    },

    /// Delete an item and its sub-items
    Rm {
        /// Item ID
        id: Uuid,
    },
}

pub fn run(cmd: ItemCommands, app: &mut HostApp, output: &Output) -> Result<()> {
    match cmd {
        ItemCommands::Add {
            content,
            list,
            item,
        } => {
            let created = match (list, item) {
                (Some(list), _) => {
                    app.view_mut().set_draft(DraftTarget::NewItem(list), content);
                    app.add_item(list)?
                }
                (None, Some(item)) => {
                    app.view_mut().set_draft(DraftTarget::NewSubItem(item), content);
                    app.add_sub_item(item)?
                }
                (None, None) => bail!("either --list or --item is required"),
            };
            match created {
                Some(id) => output.success(&format!("Added item {id}")),
                None => output.success("Item content is empty; nothing added"),
            }
        }
        ItemCommands::Edit { id, content } => {
            app.edit_item_content(id)?;
            app.view_mut().set_edit_text(EditTarget::ItemContent(id), content);
            if app.commit_item_content(id)? {
                output.success(&format!("Updated item {id}"));
            } else {
                output.success("Content unchanged");
            }
        }
        ItemCommands::Rm { id } => {
            app.delete_item(id)?;
            output.success(&format!("Deleted item {id}"));
        }
    }
    Ok(())
}
