//! HTML rendering of the logbook
//!
//! The visible list is a pure function of the entry collection: sorted
//! newest-first (stable, so same-date entries keep insertion order), with
//! user text escaped and per-row copy/delete controls addressed by
//! `data-id`/`data-action` attributes. `render_page` wraps the list in a
//! standalone document that the app exports next to the data file.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use super::entry::Entry;

/// Formats a date in the localized `DD/MM/YYYY` form used for display
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Escapes HTML-special characters with their named entities
///
/// The contract is exactly five replacements: `&` `<` `>` `"` `'` become
/// `&amp;` `&lt;` `&gt;` `&quot;` `&#39;`. Ampersand goes first so already
/// produced entities are not double-escaped.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Returns the collection in display order: descending by date, ties kept
/// in insertion order
pub fn display_order(entries: &[Entry]) -> Vec<&Entry> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    // Stable sort, so equal dates preserve insertion order
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

/// Renders the entry list markup
///
/// An empty collection renders the empty-state placeholder instead of an
/// empty list.
pub fn render_list(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return r#"<p class="empty-state">No entries yet. Add your first log above.</p>"#
            .to_string();
    }

    let mut out = String::from("<ul class=\"entries\">\n");
    for entry in display_order(entries) {
        out.push_str(&render_row(entry));
    }
    out.push_str("</ul>\n");
    out
}

/// Renders one entry row with its action controls
fn render_row(entry: &Entry) -> String {
    format!(
        concat!(
            "<li class=\"entry\">\n",
            "  <div class=\"entry-title\">\n",
            "    <h3>{title}</h3>\n",
            "    <div class=\"entry-actions\">\n",
            "      <button class=\"secondary small\" data-id=\"{id}\" data-action=\"copy\">Copy</button>\n",
            "      <button class=\"danger small\" data-id=\"{id}\" data-action=\"delete\">Delete</button>\n",
            "    </div>\n",
            "  </div>\n",
            "  <div class=\"entry-meta\">{date}</div>\n",
            "  <div class=\"entry-desc\">{description}</div>\n",
            "</li>\n"
        ),
        title = escape_html(&entry.title),
        id = escape_html(&entry.id),
        date = format_date(entry.date),
        description = escape_html(&entry.description),
    )
}

/// Renders the full standalone page embedding the list
pub fn render_page(entries: &[Entry]) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head>\n",
            "  <meta charset=\"UTF-8\">\n",
            "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
            "  <title>Shiplog</title>\n",
            "  <style>{css}</style>\n",
            "</head>\n",
            "<body>\n",
            "  <main class=\"container\">\n",
            "    <h1>Shiplog</h1>\n",
            "    <p class=\"stats\">{count} entries</p>\n",
            "{list}",
            "  </main>\n",
            "</body>\n",
            "</html>\n"
        ),
        css = CSS,
        count = entries.len(),
        list = render_list(entries),
    )
}

/// Writes the rendered page to disk
pub fn export_page(entries: &[Entry], path: &Path) -> std::io::Result<()> {
    fs::write(path, render_page(entries))
}

const CSS: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  background: #0b1620;
  color: #e8eef4;
  line-height: 1.5;
}
.container { max-width: 720px; margin: 0 auto; padding: 24px 16px; }
h1 { margin-bottom: 4px; }
.stats { color: #7d93a8; margin-bottom: 20px; }
.entries { list-style: none; }
.entry {
  background: #122233;
  border: 1px solid #1e3447;
  border-radius: 8px;
  padding: 14px;
  margin-bottom: 12px;
}
.entry-title { display: flex; justify-content: space-between; gap: 8px; }
.entry-actions { display: flex; gap: 6px; }
.entry-meta { color: #7d93a8; font-size: 0.85em; margin: 4px 0 8px; }
.entry-desc { white-space: pre-wrap; }
button {
  border: 0;
  border-radius: 6px;
  padding: 4px 10px;
  cursor: pointer;
  font-size: 0.85em;
}
button.secondary { background: #27455e; color: #e8eef4; }
button.danger { background: #6e2a2a; color: #ffdede; }
.empty-state { color: #7d93a8; text-align: center; padding: 32px 0; }
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, title: &str, description: &str, date: &str) -> Entry {
        Entry {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(format_date(date), "01/05/2024");
    }

    #[test]
    fn test_escape_html_all_five_entities() {
        assert_eq!(
            escape_html(r#"&<>"'"#),
            "&amp;&lt;&gt;&quot;&#39;"
        );
    }

    #[test]
    fn test_escape_html_does_not_double_escape() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn test_display_order_is_descending_by_date() {
        let entries = vec![
            entry("1", "Dive log", "Saw <a shark>", "2024-05-01"),
            entry("2", "Surface", "Calm & clear", "2024-05-03"),
        ];

        let ordered = display_order(&entries);
        assert_eq!(ordered[0].title, "Surface");
        assert_eq!(ordered[1].title, "Dive log");
    }

    #[test]
    fn test_display_order_ties_keep_insertion_order() {
        let entries = vec![
            entry("1", "Morning", "first", "2024-05-01"),
            entry("2", "Evening", "second", "2024-05-01"),
        ];

        let ordered = display_order(&entries);
        assert_eq!(ordered[0].id, "1");
        assert_eq!(ordered[1].id, "2");
    }

    #[test]
    fn test_render_list_escapes_descriptions() {
        let entries = vec![entry("1", "Dive log", "Saw <a shark>", "2024-05-01")];

        let html = render_list(&entries);
        assert!(html.contains("Saw &lt;a shark&gt;"));
        assert!(!html.contains("Saw <a shark>"));
    }

    #[test]
    fn test_render_list_order_and_escaping_scenario() {
        let entries = vec![
            entry("1", "Dive log", "Saw <a shark>", "2024-05-01"),
            entry("2", "Surface", "Calm & clear", "2024-05-03"),
        ];

        let html = render_list(&entries);
        let surface_pos = html.find("Surface").unwrap();
        let dive_pos = html.find("Dive log").unwrap();
        assert!(surface_pos < dive_pos, "Newest entry should render first");
        assert!(html.contains("Saw &lt;a shark&gt;"));
        assert!(html.contains("Calm &amp; clear"));
    }

    #[test]
    fn test_render_list_empty_state() {
        let html = render_list(&[]);
        assert!(html.contains("empty-state"));
        assert!(!html.contains("<li"));
    }

    #[test]
    fn test_render_list_rows_carry_action_attributes() {
        let entries = vec![entry("abc", "Dive log", "text", "2024-05-01")];

        let html = render_list(&entries);
        assert!(html.contains(r#"data-id="abc" data-action="copy""#));
        assert!(html.contains(r#"data-id="abc" data-action="delete""#));
    }

    #[test]
    fn test_render_is_pure() {
        let entries = vec![
            entry("1", "Dive log", "Saw <a shark>", "2024-05-01"),
            entry("2", "Surface", "Calm & clear", "2024-05-03"),
        ];
        assert_eq!(render_list(&entries), render_list(&entries));
        assert_eq!(render_page(&entries), render_page(&entries));
    }

    #[test]
    fn test_export_page_writes_document() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("logbook.html");
        let entries = vec![entry("1", "Dive log", "text", "2024-05-01")];

        export_page(&entries, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("Dive log"));
    }
}
