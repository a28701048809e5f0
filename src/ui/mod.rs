//! CLI output: result cards, tables, status lines and spinners.
//!
//! [`BookCard`] is the renderer-neutral view of a book; the interactive
//! screen and the one-shot `search` command both draw from it.

mod card;

pub use card::{cards, BookCard, Cover, NO_COVER};

use comfy_table::{presets, Attribute, Cell, Table};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::search::{PagerView, StatusLine};
use crate::utils::{book_table_columns, terminal_width, truncate_with_ellipsis};

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Info => "ℹ",
        Status::Loading => "◐",
        Status::Search => "🔍",
    }
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Info,
    Loading,
    Search,
}

/// Print a styled status message.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => println!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg.red()),
        Status::Info => println!("{} {}", icon.cyan().bold(), msg),
        Status::Loading => println!("{} {}", icon.cyan(), msg),
        Status::Search => println!("{} {}", icon.yellow(), msg),
    }
}

/// Print the status line, if there is one.
pub fn print_status_line(line: &StatusLine) {
    match line {
        StatusLine::Loading => print_status(Status::Loading, &line.to_string()),
        StatusLine::Error(_) => print_status(Status::Error, &line.to_string()),
        StatusLine::NoResults(_) => print_status(Status::Info, &line.to_string()),
    }
}

/// Print search results header.
pub fn print_search_header(query: &str, count: usize, duration: Duration) {
    println!();
    println!(
        "{} Search results for: \"{}\"",
        status_icon(Status::Search).yellow().bold(),
        query.cyan().bold()
    );
    println!(
        "{} {} books on this page in {:.2}s",
        "─".repeat(30).dimmed(),
        count.to_string().green().bold(),
        duration.as_secs_f64()
    );
    println!();
}

/// Render cards as a table sized to the terminal.
pub fn book_table(cards: &[BookCard], width: usize) -> Table {
    let (title_w, authors_w, _, tags_w) = book_table_columns(width);

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_header(vec!["Title", "Authors", "Year", "Cover", "Tags"]);

    for card in cards {
        let cover = match &card.cover {
            Cover::Image(_) => "✓".to_string(),
            Cover::Placeholder => NO_COVER.to_string(),
        };
        table.add_row(vec![
            Cell::new(truncate_with_ellipsis(&card.title, title_w)).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&card.authors, authors_w)),
            Cell::new(&card.year),
            Cell::new(cover),
            Cell::new(truncate_with_ellipsis(&card.tags.join(", "), tags_w)),
        ]);
    }
    table
}

/// Print cards as a table.
pub fn print_book_table(cards: &[BookCard]) {
    println!("{}", book_table(cards, terminal_width()));
}

/// Print cards as plain text blocks.
pub fn print_book_plain(cards: &[BookCard]) {
    for card in cards {
        println!("{} - {} ({})", card.title, card.authors, card.year);
        println!("  Cover: {}", card.cover);
        if !card.tags.is_empty() {
            println!("  Tags: {}", card.tags.join(", "));
        }
        println!();
    }
}

/// Pager summary with Prev/Next hints.
pub fn pager_line(pager: &PagerView) -> String {
    let prev = if pager.prev_enabled { "← Prev" } else { "      " };
    let next = if pager.next_enabled { "Next →" } else { "" };
    format!("{}   {}   {}", prev, pager, next).trim_end().to_string()
}

/// Print the pager line.
pub fn print_pager(pager: &PagerView) {
    println!("{}", pager_line(pager).dimmed());
}

/// Loading spinner shown while a one-shot search is outstanding.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        let style = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ");
        pb.set_style(style);
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Remove the spinner from the terminal.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
