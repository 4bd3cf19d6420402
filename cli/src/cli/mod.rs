//! # Command-Line Interface
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | View | Print the whole collection | `show`, `show --collapse <item>` |
//! | List | Top-level containers | `list add`, `list rename`, `list rm` |
//! | Item | Entries and sub-entries | `item add --list`, `item add --item`, `item edit`, `item rm` |
//! | Move | Drag a list-level item to a slot | `mv <item> <list> <index>` |
//!
//! Every invocation loads the collection first, performs one action through
//! the application root, and prints the result. `--format json` switches to
//! machine-readable output.

mod app;
mod item;
mod list;
mod output;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
