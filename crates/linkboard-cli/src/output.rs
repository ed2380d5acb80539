//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use linkboard_core::collection::category_name;
use linkboard_core::{Category, Link};

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

    /// Print a single link
    pub fn print_link(&self, link: &Link, categories: &[Category], favorite: bool) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", link.id);
                println!("Title:       {}", link.title);
                println!("URL:         {}", link.url);
                if let Some(ref desc) = link.description {
                    println!("Description: {}", desc);
                }
                println!(
                    "Category:    {}",
                    category_name(categories, &link.category)
                );
                if favorite {
                    println!("Favorite:    yes");
                }
                println!("Created:     {}", link.created_at.format("%Y-%m-%d %H:%M"));
                println!("Updated:     {}", link.updated_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => print_json(link),
            OutputFormat::Quiet => {
                println!("{}", link.id);
            }
        }
    }

    /// Print a list of links
    pub fn print_links(&self, links: &[&Link], categories: &[Category]) {
        match self.format {
            OutputFormat::Human => {
                if links.is_empty() {
                    println!("No links found.");
                    return;
                }
                for link in links {
                    println!(
                        "{} | {} | {} | {}",
                        short_id(&link.id),
                        truncate(&link.title, 35),
                        truncate(category_name(categories, &link.category), 15),
                        truncate(&link.url, 45)
                    );
                }
                println!("\n{} link(s)", links.len());
            }
            OutputFormat::Json => print_json(&links),
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", link.id);
                }
            }
        }
    }

    /// Print categories with the number of links in each
    pub fn print_categories(&self, categories: &[(&Category, usize)]) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No categories.");
                    return;
                }
                for (category, count) in categories {
                    println!("{} | {} ({})", category.id, category.name, count);
                }
                println!("\n{} categor(ies)", categories.len());
            }
            OutputFormat::Json => {
                let json: Vec<_> = categories
                    .iter()
                    .map(|(category, count)| {
                        serde_json::json!({
                            "id": category.id,
                            "name": category.name,
                            "order": category.order,
                            "links": count
                        })
                    })
                    .collect();
                print_json(&json);
            }
            OutputFormat::Quiet => {
                for (category, _) in categories {
                    println!("{}", category.id);
                }
            }
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

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode JSON: {}", e),
    }
}

/// First 8 characters of an id
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
