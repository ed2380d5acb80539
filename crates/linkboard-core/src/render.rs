//! HTML rendering of the link board
//!
//! Every function here is a pure function of its arguments and returns an
//! HTML fragment as a `String`. All user text and attribute values pass
//! through [`escape_html`].

use std::fmt::Write;

use crate::collection::{category_name, favorite_links, group_by_category};
use crate::filter::{CategoryFilter, Filter};
use crate::models::{
    Category, Link, ALL_CATEGORIES, FAVORITES_COLUMN, UNCATEGORIZED, UNCATEGORIZED_NAME,
};

/// Borrowed state needed to render the board
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    pub links: &'a [Link],
    pub categories: &'a [Category],
    pub favorites: &'a [String],
    pub filter: &'a Filter,
    /// Category whose name is being edited in the manage list
    pub renaming: Option<&'a str>,
}

impl BoardView<'_> {
    fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|f| f == id)
    }
}

/// Escape text for use in element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn empty_state(icon: &str, heading: &str, hint: &str) -> String {
    format!(
        r#"<div class="empty-state"><i class="fas {icon}"></i><h3>{heading}</h3><p>{hint}</p></div>"#
    )
}

/// The board: favorites column, then one column per non-empty category
pub fn render_links(view: &BoardView<'_>) -> String {
    let filtered = view.filter.apply(view.links);

    if filtered.is_empty() {
        return if view.links.is_empty() {
            empty_state("fa-bookmark", "No links yet", "Add your first link!")
        } else {
            empty_state("fa-search", "No results", "Try a different search.")
        };
    }

    let mut html = String::from(r#"<div class="category-columns" id="categoryColumns">"#);
    let mut column_index = 0;

    let favorites = favorite_links(view.links, view.favorites);
    if !favorites.is_empty() {
        let _ = write!(
            html,
            r#"<div class="category-column favorites-column" data-category-id="{FAVORITES_COLUMN}" data-column-index="0"><h3 class="category-header"><i class="fas fa-star"></i> Favorites ({count})</h3><div class="links-list" data-category="{FAVORITES_COLUMN}">"#,
            count = favorites.len(),
        );
        for (index, link) in favorites.iter().enumerate() {
            html.push_str(&render_link_row(link, index, true));
        }
        html.push_str("</div></div>");
        column_index += 1;
    }

    for (category_id, links) in group_by_category(&filtered, view.categories) {
        let id = escape_html(&category_id);
        let name = escape_html(category_name(view.categories, &category_id));

        let _ = write!(
            html,
            r#"<div class="category-column" draggable="true" data-category-id="{id}" data-column-index="{column_index}"><h3 class="category-header"><span class="drag-handle">⋮⋮</span> <span class="category-name">{name}</span> ({count})<button class="quick-add-btn" data-category="{id}" title="Add link to {name}"><i class="fas fa-plus"></i></button></h3><div class="links-list" data-category="{id}">"#,
            count = links.len(),
        );
        for (index, link) in links.iter().enumerate() {
            html.push_str(&render_link_row(link, index, view.is_favorite(&link.id)));
        }
        html.push_str("</div></div>");
        column_index += 1;
    }

    html.push_str("</div>");
    html
}

/// One link with favorite, edit and delete controls
pub fn render_link_row(link: &Link, index: usize, is_favorite: bool) -> String {
    let id = escape_html(&link.id);
    let (star, favorite_title) = if is_favorite {
        ("fas fa-star", "Remove from favorites")
    } else {
        ("far fa-star", "Add to favorites")
    };

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="link-row" draggable="true" data-id="{id}" data-link-index="{index}"><div class="link-title-col"><span class="link-drag-handle">⋮</span><a href="{url}" target="_blank" rel="noopener" class="link-title-link" title="Open in new tab">{title}</a>"#,
        url = escape_html(&link.url),
        title = escape_html(&link.title),
    );
    if let Some(description) = &link.description {
        let _ = write!(
            html,
            r#"<p class="link-description">{}</p>"#,
            escape_html(description)
        );
    }
    let _ = write!(
        html,
        r#"</div><div class="link-actions-col"><button class="action-btn favorite-btn" data-id="{id}" title="{favorite_title}"><i class="{star}"></i></button><button class="action-btn edit-btn" data-id="{id}" title="Edit">✏️</button><button class="action-btn delete-btn" data-id="{id}" title="Delete">🗑️</button></div></div>"#
    );
    html
}

/// Category filter dropdown, "All" first
pub fn render_category_menu(categories: &[Category], active: &CategoryFilter) -> String {
    let item = |value: &str, label: &str| {
        let class = if active.as_str() == value {
            "dropdown-item active"
        } else {
            "dropdown-item"
        };
        format!(
            r#"<div class="{class}" data-category="{}">{}</div>"#,
            escape_html(value),
            escape_html(label)
        )
    };

    let mut html = String::from(r#"<div class="dropdown-menu" id="categoryDropdownMenu">"#);
    html.push_str(&item(ALL_CATEGORIES, "All"));
    for category in categories {
        html.push_str(&item(&category.id, &category.name));
    }
    html.push_str("</div>");
    html
}

/// `<option>` list for the link form's category select
pub fn render_category_options(categories: &[Category], selected: &str) -> String {
    let option = |value: &str, label: &str| {
        let attr = if value == selected { " selected" } else { "" };
        format!(
            r#"<option value="{}"{attr}>{}</option>"#,
            escape_html(value),
            escape_html(label)
        )
    };

    let mut html: String = categories
        .iter()
        .map(|c| option(&c.id, &c.name))
        .collect();
    html.push_str(&option(UNCATEGORIZED, UNCATEGORIZED_NAME));
    html
}

/// Category management list
///
/// The category being renamed shows a text input instead of its name.
pub fn render_category_list(categories: &[Category], renaming: Option<&str>) -> String {
    let mut html = String::from(r#"<ul class="category-list" id="categoryList">"#);

    for category in categories {
        let id = escape_html(&category.id);
        let name = escape_html(&category.name);

        if renaming == Some(category.id.as_str()) {
            let _ = write!(
                html,
                r#"<li data-id="{id}"><input type="text" id="editCategoryInput_{id}" value="{name}" /><button class="edit-btn" data-id="{id}">Save</button><button class="delete-btn" data-id="{id}">Delete</button></li>"#
            );
        } else {
            let _ = write!(
                html,
                r#"<li data-id="{id}"><span>{name}</span><button class="edit-btn" data-id="{id}">Rename</button><button class="delete-btn" data-id="{id}">Delete</button></li>"#
            );
        }
    }

    html.push_str("</ul>");
    html
}

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;padding:1.5rem;background:#f5f6fa;color:#2c3e50}\
.category-columns{display:flex;gap:1rem;align-items:flex-start;overflow-x:auto}\
.category-column{background:#fff;border-radius:8px;padding:.75rem;min-width:260px}\
.category-header{font-size:1rem;margin:0 0 .5rem}\
.link-row{display:flex;justify-content:space-between;padding:.25rem 0;border-top:1px solid #ecf0f1}\
.link-description{margin:.15rem 0 0;font-size:.85rem;color:#7f8c8d}\
.action-btn,.quick-add-btn{border:none;background:none;cursor:pointer}\
.empty-state{text-align:center;padding:3rem;color:#7f8c8d}\
.dropdown-item.active{font-weight:bold}\
.link-form{display:flex;flex-direction:column;gap:.5rem;max-width:420px;margin-top:1.5rem}\
";

/// Form for adding a link; the category select starts at `selected`
fn render_link_form(categories: &[Category], selected: &str) -> String {
    format!(
        concat!(
            r#"<form id="linkForm" class="link-form"><h2>Add link</h2>"#,
            r#"<input type="text" id="linkTitle" name="title" placeholder="Title" required />"#,
            r#"<input type="url" id="linkUrl" name="url" placeholder="https://" required />"#,
            r#"<select id="linkCategory" name="category">{}</select>"#,
            r#"<textarea id="linkDescription" name="description" placeholder="Description"></textarea>"#,
            r#"<button type="submit">Save</button></form>"#
        ),
        render_category_options(categories, selected)
    )
}

/// Complete standalone HTML document for the board
pub fn render_page(view: &BoardView<'_>) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n<title>linkboard</title>\n");
    let _ = writeln!(html, "<style>{STYLE}</style>");
    html.push_str("</head>\n<body>\n<header class=\"header\"><h1>linkboard</h1>");
    let _ = write!(
        html,
        r#"<input type="search" id="searchInput" placeholder="Search links" value="{}" />"#,
        escape_html(&view.filter.search)
    );
    html.push_str(&render_category_menu(view.categories, &view.filter.category));
    html.push_str("</header>\n<main id=\"linksContainer\">");
    html.push_str(&render_links(view));
    html.push_str("</main>\n<aside class=\"category-manager\"><h2>Categories</h2>");
    html.push_str(&render_category_list(view.categories, view.renaming));
    html.push_str("</aside>\n");

    // New links go to the filtered category, else the first one
    let selected = match &view.filter.category {
        CategoryFilter::Only(id) => id.as_str(),
        CategoryFilter::All => view
            .categories
            .first()
            .map_or(UNCATEGORIZED, |c| c.id.as_str()),
    };
    html.push_str(&render_link_form(view.categories, selected));
    html.push_str("\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::default_categories;
    use scraper::{Html, Selector};

    struct Board {
        links: Vec<Link>,
        categories: Vec<Category>,
        favorites: Vec<String>,
        filter: Filter,
    }

    impl Board {
        fn new(links: Vec<Link>) -> Self {
            Self {
                links,
                categories: default_categories(),
                favorites: Vec::new(),
                filter: Filter::default(),
            }
        }

        fn view(&self) -> BoardView<'_> {
            BoardView {
                links: &self.links,
                categories: &self.categories,
                favorites: &self.favorites,
                filter: &self.filter,
                renaming: None,
            }
        }
    }

    fn count(html: &str, selector: &str) -> usize {
        let fragment = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        fragment.select(&selector).count()
    }

    fn texts(html: &str, selector: &str) -> Vec<String> {
        let fragment = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        fragment
            .select(&selector)
            .map(|e| e.text().collect::<String>())
            .collect()
    }

    fn attrs(html: &str, selector: &str, attr: &str) -> Vec<String> {
        let fragment = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        fragment
            .select(&selector)
            .filter_map(|e| e.value().attr(attr).map(str::to_string))
            .collect()
    }

    fn sample_board() -> Board {
        Board::new(vec![
            Link::new("GitHub", "https://github.com").in_category("tools"),
            Link::new("Crates", "https://crates.io").in_category("tools"),
            Link::new("Rust Book", "https://doc.rust-lang.org/book").in_category("study"),
            Link::new("Loose", "https://loose.example"),
        ])
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_empty_collection_state() {
        let board = Board::new(Vec::new());
        let html = render_links(&board.view());
        assert_eq!(texts(&html, ".empty-state h3"), vec!["No links yet"]);
        assert_eq!(count(&html, ".category-columns"), 0);
    }

    #[test]
    fn test_no_results_state() {
        let mut board = sample_board();
        board.filter.search = "nothing matches this".to_string();
        let html = render_links(&board.view());
        assert_eq!(texts(&html, ".empty-state h3"), vec!["No results"]);
    }

    #[test]
    fn test_one_column_per_group_and_one_row_per_link() {
        let board = sample_board();
        let html = render_links(&board.view());

        assert_eq!(
            attrs(&html, ".category-column", "data-category-id"),
            vec!["study", "tools", UNCATEGORIZED]
        );
        assert_eq!(count(&html, ".link-row"), 4);
        assert_eq!(
            texts(&html, ".category-column .category-name"),
            vec!["Study", "Tools", "Uncategorized"]
        );
    }

    #[test]
    fn test_filter_limits_rows() {
        let mut board = sample_board();
        board.filter.category = CategoryFilter::Only("tools".into());
        let html = render_links(&board.view());

        assert_eq!(attrs(&html, ".category-column", "data-category-id"), vec!["tools"]);
        assert_eq!(texts(&html, ".link-title-link"), vec!["GitHub", "Crates"]);
    }

    #[test]
    fn test_favorites_column_first_and_unfiltered() {
        let mut board = sample_board();
        board.favorites = vec![board.links[2].id.clone()];
        board.filter.category = CategoryFilter::Only("tools".into());
        let html = render_links(&board.view());

        let columns = attrs(&html, ".category-column", "data-category-id");
        assert_eq!(columns, vec![FAVORITES_COLUMN, "tools"]);
        assert_eq!(
            texts(&html, ".favorites-column .link-title-link"),
            vec!["Rust Book"]
        );
        assert_eq!(
            attrs(&html, ".category-column", "data-column-index"),
            vec!["0", "1"]
        );
    }

    #[test]
    fn test_no_favorites_column_without_favorites() {
        let board = sample_board();
        let html = render_links(&board.view());
        assert_eq!(count(&html, ".favorites-column"), 0);
    }

    #[test]
    fn test_unknown_category_column_uses_raw_id() {
        let board = Board::new(vec![Link::new("Orphan", "https://o.com").in_category("ghost")]);
        let html = render_links(&board.view());
        assert_eq!(texts(&html, ".category-name"), vec!["ghost"]);
    }

    #[test]
    fn test_user_text_is_escaped() {
        let board = Board::new(vec![Link::new(
            "<script>alert(1)</script>",
            "https://x.com/?a=1&b=\"2\"",
        )
        .with_description("<b>bold</b>")]);
        let html = render_links(&board.view());

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert_eq!(count(&html, "script"), 0);
        assert_eq!(
            texts(&html, ".link-title-link"),
            vec!["<script>alert(1)</script>"]
        );
        assert_eq!(
            attrs(&html, ".link-title-link", "href"),
            vec!["https://x.com/?a=1&b=\"2\""]
        );
    }

    #[test]
    fn test_link_row_favorite_icon() {
        let link = Link::new("A", "https://a.com");
        let html = render_link_row(&link, 0, true);
        assert_eq!(attrs(&html, ".favorite-btn i", "class"), vec!["fas fa-star"]);

        let html = render_link_row(&link, 3, false);
        assert_eq!(attrs(&html, ".favorite-btn i", "class"), vec!["far fa-star"]);
        assert_eq!(attrs(&html, ".link-row", "data-link-index"), vec!["3"]);
    }

    #[test]
    fn test_category_menu_all_first() {
        let categories = default_categories();
        let html = render_category_menu(&categories, &CategoryFilter::Only("study".into()));

        let items = attrs(&html, ".dropdown-item", "data-category");
        assert_eq!(items[0], ALL_CATEGORIES);
        assert_eq!(items.len(), categories.len() + 1);
        assert_eq!(texts(&html, ".dropdown-item.active"), vec!["Study"]);
    }

    #[test]
    fn test_category_options_end_with_uncategorized() {
        let categories = default_categories();
        let html = render_category_options(&categories, "tools");

        let values = attrs(&html, "option", "value");
        assert_eq!(values.last().map(String::as_str), Some(UNCATEGORIZED));
        assert_eq!(values.len(), categories.len() + 1);
        assert_eq!(attrs(&html, "option[selected]", "value"), vec!["tools"]);
    }

    #[test]
    fn test_category_list_rename_input() {
        let categories = default_categories();
        let html = render_category_list(&categories, Some("work"));

        assert_eq!(count(&html, "li"), categories.len());
        assert_eq!(attrs(&html, "li input", "value"), vec!["Work"]);
        assert_eq!(texts(&html, "li > span").len(), categories.len() - 1);
    }

    #[test]
    fn test_render_page_is_complete_document() {
        let mut board = sample_board();
        board.filter.search = "git".to_string();
        let page = render_page(&board.view());

        let document = Html::parse_document(&page);
        let title = Selector::parse("title").unwrap();
        assert_eq!(
            document.select(&title).next().unwrap().text().collect::<String>(),
            "linkboard"
        );
        let search = Selector::parse("#searchInput").unwrap();
        assert_eq!(
            document.select(&search).next().unwrap().value().attr("value"),
            Some("git")
        );
        let rows = Selector::parse("#linksContainer .link-row").unwrap();
        assert_eq!(document.select(&rows).count(), 1);
        let list = Selector::parse("#categoryList li").unwrap();
        assert_eq!(document.select(&list).count(), 5);
        let options = Selector::parse("#linkForm #linkCategory option").unwrap();
        assert_eq!(document.select(&options).count(), 6);
    }

    #[test]
    fn test_link_form_preselects_category() {
        let mut board = sample_board();
        let selected = |page: &str| {
            let document = Html::parse_document(page);
            let option = Selector::parse("#linkCategory option[selected]").unwrap();
            document
                .select(&option)
                .filter_map(|e| e.value().attr("value").map(str::to_string))
                .collect::<Vec<_>>()
        };

        assert_eq!(selected(&render_page(&board.view())), vec!["work"]);

        board.filter.category = CategoryFilter::Only("study".to_string());
        assert_eq!(selected(&render_page(&board.view())), vec!["study"]);

        board.categories.clear();
        board.filter.category = CategoryFilter::All;
        assert_eq!(selected(&render_page(&board.view())), vec![UNCATEGORIZED]);
    }
}
