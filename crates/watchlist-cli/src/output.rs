use catalog_sources::{ImageKind, ImageResolver};
use clap::ValueEnum;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use watchlist_core::{Decorated, StatusCounts};
use watchlist_models::{CatalogItem, Genre, WatchStatus, WatchlistEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message("success", "✓".green().to_string(), msg.as_ref());
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            _ => self.print_json(&json!({ "type": "info", "message": msg.as_ref() })),
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message("warning", "⚠".yellow().to_string(), msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // always shown, even with --quiet
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            _ => self.print_json(&json!({ "type": "error", "message": msg.as_ref() })),
        }
    }

    /// Remote failures and empty lists end up here rather than as errors
    pub fn empty_state(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref().dimmed()),
            _ => self.print_json(&json!({ "type": "empty", "message": msg.as_ref(), "items": [] })),
        }
    }

    pub fn println(&self, msg: impl AsRef<str>) {
        if self.quiet || !self.is_human() {
            return;
        }
        println!("{}", msg.as_ref());
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }
        self.print_json(data);
    }

    fn message(&self, kind: &str, symbol: String, msg: &str) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", symbol, msg),
            _ => self.print_json(&json!({ "type": kind, "message": msg })),
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(data).unwrap_or_default()),
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default())
            }
            OutputFormat::Human => println!("{}", data),
        }
    }
}

pub fn section_header(title: &str, output: &Output) {
    output.println("");
    output.println(format!("{}", title.bold().bright_cyan()));
    output.println(format!("{}", "─".repeat(title.chars().count()).bright_cyan()));
}

fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

fn status_cell(status: WatchStatus) -> Cell {
    let color = match status {
        WatchStatus::WantToWatch => Color::Blue,
        WatchStatus::Watching => Color::Yellow,
        WatchStatus::Watched => Color::Green,
    };
    Cell::new(status.label()).fg(color)
}

fn year_of(release_date: Option<&str>) -> String {
    release_date
        .and_then(|d| d.get(0..4))
        .unwrap_or("-")
        .to_string()
}

pub fn entries_table(entries: &[&WatchlistEntry]) -> Table {
    let mut table = styled_table();
    table.set_header(header(&["ID", "Title", "Type", "Year", "Status", "Rating", "Notes", "Added"]));
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.id.as_str()).fg(Color::DarkGrey),
            Cell::new(&entry.title),
            Cell::new(entry.media_type.as_str()),
            Cell::new(year_of(entry.release_date.as_deref())),
            status_cell(entry.status),
            Cell::new(entry.rating.map(|r| r.to_string()).unwrap_or_default()),
            Cell::new(entry.notes.as_deref().unwrap_or("")),
            Cell::new(entry.added_at.format("%Y-%m-%d").to_string()),
        ]);
    }
    table
}

pub fn catalog_table(items: &[Decorated<'_>]) -> Table {
    let mut table = styled_table();
    table.set_header(header(&["ID", "Title", "Type", "Year", "Score", "On list"]));
    for decorated in items {
        let item = decorated.item;
        let on_list = match decorated.status() {
            Some(status) => status_cell(status),
            None => Cell::new(""),
        };
        table.add_row(vec![
            Cell::new(item.catalog_id),
            Cell::new(&item.title),
            Cell::new(item.media_type.as_str()),
            Cell::new(item.year().map(|y| y.to_string()).unwrap_or_else(|| "-".to_string())),
            Cell::new(format!("{:.1}", item.vote_average)),
            on_list,
        ]);
    }
    table
}

pub fn genres_table(genres: &[Genre]) -> Table {
    let mut table = styled_table();
    table.set_header(header(&["ID", "Genre"]));
    for genre in genres {
        table.add_row(vec![Cell::new(genre.id), Cell::new(&genre.name)]);
    }
    table
}

pub fn stats_table(counts: &StatusCounts) -> Table {
    let mut table = styled_table();
    table.set_header(header(&["Status", "Entries"]));
    table.add_row(vec![Cell::new("All"), Cell::new(counts.all)]);
    for status in WatchStatus::ALL {
        table.add_row(vec![status_cell(status), Cell::new(counts.count(Some(status)))]);
    }
    table
}

/// Catalog item as emitted in JSON output, with artwork URLs resolved
pub fn catalog_item_json(item: &CatalogItem, images: &ImageResolver) -> serde_json::Value {
    let mut value = serde_json::to_value(item).unwrap_or_default();
    if let Some(object) = value.as_object_mut() {
        object.insert(
            "poster_url".to_string(),
            json!(images.resolve(item.poster_path.as_deref(), ImageKind::Poster)),
        );
        object.insert(
            "backdrop_url".to_string(),
            json!(images.resolve(item.backdrop_path.as_deref(), ImageKind::Backdrop)),
        );
    }
    value
}

pub fn decorated_json(items: &[Decorated<'_>], images: &ImageResolver) -> serde_json::Value {
    items
        .iter()
        .map(|d| {
            let mut value = catalog_item_json(d.item, images);
            if let Some(object) = value.as_object_mut() {
                object.insert("entry_id".to_string(), json!(d.entry.map(|e| e.id.as_str())));
                object.insert("status".to_string(), json!(d.status()));
            }
            value
        })
        .collect()
}
