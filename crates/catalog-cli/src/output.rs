//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use catalog_curator::{ControllerSnapshot, EntrySnapshot, Notice, SaveOutcome};
use catalog_domain::{Product, ProductView};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
#[derive(Debug, Clone)]
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the catalog held by a snapshot.
    pub fn format_catalog(&self, snapshot: &ControllerSnapshot) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&snapshot.catalog)?),
            OutputFormat::Table => Ok(self.format_catalog_table(snapshot)),
            OutputFormat::Quiet => Ok(snapshot
                .catalog
                .iter()
                .map(|p| p.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format the recommendation queue held by a snapshot.
    pub fn format_queue(&self, snapshot: &ControllerSnapshot) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&snapshot.entries)?),
            OutputFormat::Table => Ok(self.format_queue_table(snapshot)),
            OutputFormat::Quiet => Ok(snapshot
                .entries
                .iter()
                .map(|e| e.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_catalog_table(&self, snapshot: &ControllerSnapshot) -> String {
        if snapshot.catalog.is_empty() {
            return self.colorize("There are no products... yet!", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Name", "Description", "Category", "Price", ""]);

        for product in &snapshot.catalog {
            let marker = if snapshot.is_deleting(product) {
                "deleting..."
            } else if snapshot.is_highlighted(product) {
                "* saved"
            } else {
                ""
            };
            let mut row = product_cells(&ProductView::from(product));
            row.push(marker.to_string());
            builder.push_record(row);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn format_queue_table(&self, snapshot: &ControllerSnapshot) -> String {
        if snapshot.entries.is_empty() {
            return self.colorize("No recommendations queued.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "ID", "Name", "Description", "Category", "Price", "Save"]);

        for (index, entry) in snapshot.entries.iter().enumerate() {
            let flags = snapshot.row_flags(entry);
            let action = if flags.saving {
                "..."
            } else if flags.fading {
                "fading"
            } else if flags.disabled {
                "-"
            } else {
                "+"
            };

            let mut row = vec![(index + 1).to_string()];
            row.extend(product_cells(&entry.view));
            row.push(action.to_string());
            builder.push_record(row);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format a controller notice.
    pub fn notice(&self, notice: &Notice) -> String {
        self.error(&notice.message)
    }

    /// Format the result of queueing a recommendation.
    pub fn queued(&self, row: usize, entry: &EntrySnapshot) -> String {
        let label = entry
            .view
            .name
            .clone()
            .or_else(|| entry.view.id.map(|id| format!("product {}", id)))
            .unwrap_or_else(|| "recommendation".to_string());
        let msg = format!("Queued {} as row {}", label, row);
        if entry.linked {
            self.success(&msg)
        } else {
            self.warning(&format!("{} (flat payload, cannot be saved)", msg))
        }
    }

    /// Format the result of a save.
    pub fn saved(&self, outcome: &SaveOutcome) -> String {
        match outcome.highlighted {
            Some(id) => self.success(&format!("Recommendation saved as product {}", id)),
            None => self.success("Recommendation saved"),
        }
    }

    /// Format a removal from the queue.
    pub fn removed(&self, entry: &EntrySnapshot) -> String {
        let label = entry
            .view
            .name
            .clone()
            .unwrap_or_else(|| entry.id.short());
        self.info(&format!("{} left the queue", label))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn product_cells(view: &ProductView) -> Vec<String> {
    vec![
        view.id.map(|id| id.to_string()).unwrap_or_default(),
        view.name.clone().unwrap_or_default(),
        view.description.clone().unwrap_or_default(),
        view.category.clone().unwrap_or_default(),
        view.price.map(format_price).unwrap_or_default(),
    ]
}

/// Prices are shown with two decimals.
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}

/// Catalog product by id, for messages.
pub fn find_product(snapshot: &ControllerSnapshot, id: i64) -> Option<&Product> {
    snapshot.catalog.iter().find(|p| p.id.value() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_domain::{EntryId, EntryKey, EntryStatus, ProductId};
    use serde_json::json;

    fn product(id: i64, name: &str) -> Product {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "description": "A product",
            "category": "tools",
            "price": 12.5
        }))
        .unwrap()
    }

    fn entry(status: EntryStatus, name: &str) -> EntrySnapshot {
        EntrySnapshot {
            id: EntryId::new(),
            status,
            view: ProductView {
                id: Some(ProductId::new(7)),
                name: Some(name.to_string()),
                description: None,
                category: None,
                price: Some(9.99),
            },
            linked: true,
            source_product_id: Some(ProductId::new(1)),
        }
    }

    fn snapshot() -> ControllerSnapshot {
        ControllerSnapshot {
            catalog: vec![product(1, "Hammer"), product(7, "Widget")],
            highlighted_product_id: Some(ProductId::new(7)),
            ..Default::default()
        }
    }

    #[test]
    fn test_catalog_table_marks_highlight() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_catalog(&snapshot()).unwrap();
        assert!(output.contains("Hammer"));
        assert!(output.contains("12.50"));
        assert!(output.contains("* saved"));
    }

    #[test]
    fn test_catalog_table_marks_deleting() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut snapshot = snapshot();
        snapshot.deleting_product_id = Some(ProductId::new(1));
        let output = formatter.format_catalog(&snapshot).unwrap();
        assert!(output.contains("deleting..."));
    }

    #[test]
    fn test_empty_catalog() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_catalog(&ControllerSnapshot::default())
            .unwrap();
        assert_eq!(output, "There are no products... yet!");
    }

    #[test]
    fn test_catalog_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_catalog(&snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[1]["id"], json!(7));
        assert_eq!(value[1]["name"], json!("Widget"));
    }

    #[test]
    fn test_catalog_quiet() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_catalog(&snapshot()).unwrap();
        assert_eq!(output, "1\n7");
    }

    #[test]
    fn test_queue_table_actions() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let saving = entry(EntryStatus::Saving, "Saving Widget");
        let snapshot = ControllerSnapshot {
            saving: Some(EntryKey::Entry(saving.id)),
            entries: vec![
                saving,
                entry(EntryStatus::Pending, "Waiting Widget"),
                entry(EntryStatus::Fading, "Fading Widget"),
            ],
            ..Default::default()
        };

        let output = formatter.format_queue(&snapshot).unwrap();
        assert!(output.contains("..."));
        assert!(output.contains("fading"));
        assert!(output.contains("Waiting Widget"));
        assert!(output.contains("9.99"));
    }

    #[test]
    fn test_empty_queue() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_queue(&ControllerSnapshot::default())
            .unwrap();
        assert!(output.contains("No recommendations queued"));
    }

    #[test]
    fn test_queued_message_for_flat_payload() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut flat = entry(EntryStatus::Pending, "Loose");
        flat.linked = false;
        assert!(formatter.queued(1, &flat).contains("cannot be saved"));
        assert_eq!(
            formatter.queued(2, &entry(EntryStatus::Pending, "Widget")),
            "✓ Queued Widget as row 2"
        );
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }

    #[test]
    fn test_colorize_unknown_color_is_plain() {
        let formatter = Formatter::new(OutputFormat::Table, true);
        assert_eq!(formatter.colorize("text", "cyan"), "text");
    }

    #[test]
    fn test_notice_formatting() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let notice = Notice {
            id: 1,
            message: "boom".to_string(),
        };
        assert_eq!(formatter.notice(&notice), "✗ boom");
    }

    #[test]
    fn test_find_product() {
        let snapshot = snapshot();
        assert!(find_product(&snapshot, 7).is_some());
        assert!(find_product(&snapshot, 3).is_none());
    }
}
