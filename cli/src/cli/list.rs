//! List commands

use anyhow::Result;
use clap::Subcommand;
use hitodo_core::{DraftTarget, EditTarget};
use uuid::Uuid;

use super::app::HostApp;
use super::output::Output;

#[derive(Subcommand)]
pub enum ListCommands {
    /// Create a list
    Add {
        /// List title
        title: String,
    },

    /// Rename a list
    Rename {
        /// List ID
        id: Uuid,

        /// New title
        title: String,
    },

    /// Delete a list and everything in it
    Rm {
        /// List ID
        id: Uuid,
    },
}

pub fn run(cmd: ListCommands, app: &mut HostApp, output: &Output) -> Result<()> {
    match cmd {
        ListCommands::Add { title } => {
            app.view_mut().set_draft(DraftTarget::NewList, title);
            match app.submit_new_list()? {
                Some(id) => {
                    output.success(&format!("Created list {id}"));
                    if let Some(list) = app.board().list(id) {
                        output.data(list);
                    }
                }
                None => output.success("List title is empty; nothing created"),
            }
        }
        ListCommands::Rename { id, title } => {
            app.edit_list_title(id)?;
            app.view_mut().set_edit_text(EditTarget::ListTitle(id), title);
            if app.commit_list_title(id)? {
                output.success(&format!("Renamed list {id}"));
            } else {
                output.success("Title unchanged");
            }
        }
        ListCommands::Rm { id } => {
            app.delete_list(id)?;
            output.success(&format!("Deleted list {id}"));
        }
    }
    Ok(())
}
