//! Output formatting for CLI commands

use hitodo_core::{App, Row, Transport};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Text => println!("{}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "success": true,
                        "message": message
                    })
                );
            }
        }
    }

    /// Prints structured data; text mode only shows it when verbose
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                if self.verbose {
                    if let Ok(json) = serde_json::to_string_pretty(data) {
                        println!("{}", json);
                    }
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints the collection as an indented tree
    pub fn board<T: Transport>(&self, app: &App<T>) {
        if self.format == OutputFormat::Json {
            self.data(app.board().lists());
            return;
        }
        if app.board().is_empty() {
            println!("No lists yet");
            return;
        }
        for line in render(&app.rows()) {
            println!("{}", line);
        }
    }
}

/// One line per row. Items are indented by depth; `[+]` marks items that
/// still accept a sub-item.
pub fn render(rows: &[Row<'_>]) -> Vec<String> {
    rows.iter()
        .map(|row| match row {
            Row::List { list, .. } => format!("{} ({})", list.title, list.id),
            Row::Item {
                item,
                depth,
                collapsed,
                controls,
                ..
            } => {
                let mut line = format!("{}- {} ({})", "  ".repeat(*depth), item.content, item.id);
                if *collapsed {
                    line.push_str(" [collapsed]");
                }
                if controls.add_sub_item {
                    line.push_str(" [+]");
                }
                line
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hitodo_core::view::rows;
    use hitodo_core::{Board, Item, Parent, TodoList, ViewState};
    use uuid::Uuid;

    #[test]
    fn render_indents_by_depth_and_marks_open_slots() {
        let list = Uuid::from_u128(1);
        let a = Uuid::from_u128(10);
        let b = Uuid::from_u128(11);
        let mut board = Board::new();
        board.insert_list(TodoList::new(list, "Groceries"));
        board.insert_item(Parent::List(list), Item::new(a, "A")).unwrap();
        board.insert_item(Parent::Item(a), Item::new(b, "B")).unwrap();

        let view = ViewState::new();
        let lines = render(&rows(&board, &view));
        assert_eq!(
            lines,
            vec![
                format!("Groceries ({list})"),
                format!("  - A ({a}) [+]"),
                format!("    - B ({b}) [+]"),
            ]
        );
    }

    #[test]
    fn render_hides_sub_items_of_collapsed_items() {
        let list = Uuid::from_u128(1);
        let a = Uuid::from_u128(10);
        let mut board = Board::new();
        board.insert_list(TodoList::new(list, "Groceries"));
        board.insert_item(Parent::List(list), Item::new(a, "A")).unwrap();
        board
            .insert_item(Parent::Item(a), Item::new(Uuid::from_u128(11), "B"))
            .unwrap();

        let mut view = ViewState::new();
        view.toggle_collapsed(a);
        let lines = render(&rows(&board, &view));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], format!("  - A ({a}) [collapsed]"));
    }
}
