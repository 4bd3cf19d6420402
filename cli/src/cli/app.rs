//! Main CLI application structure

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hitodo_core::{App, DragLocation, DragResult, Parent, SyncPolicy, TodoClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use super::output::{Output, OutputFormat};
use super::{item, list};
use crate::transport::UreqTransport;

pub(crate) type HostApp = App<UreqTransport>;

#[derive(Parser)]
#[command(name = "hitodo")]
#[command(author, version, about = "Hierarchical todo lists from the terminal")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base URL of the todo API, including the /api prefix
    #[arg(long, env = "HITODO_API_URL", default_value = "http://127.0.0.1:5000/api", global = true)]
    pub api_url: String,

    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Refetch the whole collection after item changes instead of patching it
    #[arg(long, global = true)]
    pub reload: bool,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every list with its items
    Show {
        /// Collapse these items, hiding their sub-items
        #[arg(long, value_name = "ITEM")]
        collapse: Vec<Uuid>,
    },

    /// Manage lists
    #[command(subcommand)]
    List(list::ListCommands),

    /// Manage items and sub-items
    #[command(subcommand)]
    Item(item::ItemCommands),

    /// Drag a list-level item to a position in a list
    Mv {
        /// Item to move
        item: Uuid,

        /// Destination list
        list: Uuid,

        /// Final position in the destination list
        index: usize,
    },
}

/// Parse arguments and execute the command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = Output::new(cli.format, cli.verbose);
    let policy = if cli.reload {
        SyncPolicy::Reload
    } else {
        SyncPolicy::Reconcile
    };
    let mut app = App::new(TodoClient::new(&cli.api_url), UreqTransport::new()).with_policy(policy);
    app.load()
        .with_context(|| format!("failed to load lists from {}", cli.api_url))?;

    match cli.command {
        Commands::Show { collapse } => {
            for id in collapse {
                if !app.view().is_collapsed(id) {
                    app.toggle_collapsed(id);
                }
            }
            output.board(&app);
        }
        Commands::List(cmd) => list::run(cmd, &mut app, &output)?,
        Commands::Item(cmd) => item::run(cmd, &mut app, &output)?,
        Commands::Mv { item, list, index } => move_item(&mut app, &output, item, list, index)?,
    }
    Ok(())
}

fn move_item(
    app: &mut HostApp,
    output: &Output,
    item: Uuid,
    list: Uuid,
    index: usize,
) -> Result<()> {
    let Some(location) = app.board().locate(item) else {
        bail!("item not found: {item}");
    };
    let Parent::List(source_list) = location.parent else {
        bail!("only list-level items can be dragged; {item} is a sub-item");
    };

    let drag = DragResult {
        draggable_id: item,
        source: DragLocation {
            droppable_id: source_list,
            index: location.index,
        },
        destination: Some(DragLocation {
            droppable_id: list,
            index,
        }),
    };
    if app.on_drag_end(drag)? {
        output.success(&format!("Moved {item} to position {index}"));
    } else {
        output.success("Nothing to move");
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
