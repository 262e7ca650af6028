//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use bookish_core::{BookRecord, CatalogVolume, Shelf, Snapshot};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single book with full detail
    pub fn print_book(&self, book: &BookRecord) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:     {}", book.id);
                println!("Title:  {}", book.title);
                println!("Author: {}", book.author);
                println!("Pages:  {}", book.total_pages);
                println!("Genre:  {}", book.genre);
                if let Some(page) = book.current_page {
                    println!("Progress: {}/{}", page, book.total_pages);
                }
                if let Some(date) = book.start_date {
                    println!("Started:  {}", date);
                }
                if let Some(date) = book.finished_date {
                    println!("Finished: {}", date);
                }
                if let Some(rating) = book.rating {
                    println!("Rating:   {}/5", rating);
                }
                if let Some(ref review) = book.review {
                    println!("Review:   {}", review);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(book).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", book.id);
            }
        }
    }

    /// Print the books of one shelf
    pub fn print_shelf(&self, shelf: Shelf, books: &[BookRecord]) {
        match self.format {
            OutputFormat::Human => {
                println!("{} ({})", shelf.label(), books.len());
                if books.is_empty() {
                    println!("  (empty)");
                    return;
                }
                for book in books {
                    let detail = match shelf {
                        Shelf::Reading => format!(
                            "{}/{} pages",
                            book.current_page.unwrap_or(0),
                            book.total_pages
                        ),
                        Shelf::Read => match book.rating {
                            Some(r) => format!("{}/5", r),
                            None => String::new(),
                        },
                        Shelf::Goal => book.genre.clone(),
                    };
                    println!(
                        "  {} | {} | {} | {}",
                        truncate(&book.id, 14),
                        truncate(&book.title, 35),
                        truncate(&book.author, 25),
                        detail
                    );
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(books).unwrap());
            }
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.id);
                }
            }
        }
    }

    /// Print catalog search results as a numbered list
    pub fn print_search_results(&self, volumes: &[CatalogVolume]) {
        match self.format {
            OutputFormat::Human => {
                if volumes.is_empty() {
                    println!("No books found.");
                    return;
                }
                for (index, volume) in volumes.iter().enumerate() {
                    let info = &volume.volume_info;
                    let title = info.title.as_deref().unwrap_or("Unknown Title");
                    let author = if info.authors.is_empty() {
                        "Unknown Author".to_string()
                    } else {
                        info.authors.join(", ")
                    };
                    let pages = info
                        .page_count
                        .map(|p| format!("{} pages", p))
                        .unwrap_or_default();
                    println!(
                        "{:>2}. {} | {} | {} | {}",
                        index + 1,
                        truncate(title, 35),
                        truncate(&author, 25),
                        pages,
                        volume.id
                    );
                }
                println!("\nFound {} book(s)", volumes.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(volumes).unwrap());
            }
            OutputFormat::Quiet => {
                for volume in volumes {
                    println!("{}", volume.id);
                }
            }
        }
    }

    /// Print the per-shelf counts of a snapshot
    pub fn print_snapshot_summary(&self, snapshot: &Snapshot) {
        match self.format {
            OutputFormat::Human => {
                println!("- {} books in To Be Read", snapshot.goal_books.len());
                println!(
                    "- {} currently reading books",
                    snapshot.currently_reading.len()
                );
                println!("- {} finished books", snapshot.read_books.len());
                println!("- Total: {} books", snapshot.total_books);
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "goal": snapshot.goal_books.len(),
                        "reading": snapshot.currently_reading.len(),
                        "read": snapshot.read_books.len(),
                        "total": snapshot.total_books
                    })
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
