use chrono::{DateTime, Utc};

use crate::layers::filter::Filter;
use crate::layers::format::{
    capitalize, escape_html, file_icon, format_date, format_file_size, format_timestamp,
    terminal_safe,
};
use crate::layers::stats::Statistics;
use crate::layers::{Resource, ANONYMOUS};

pub const EMPTY_STATE: &str =
    "No resources found. Try adjusting your filters or upload a new resource.";

/// One summary card of the resource grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: i64,
    pub icon: &'static str,
    pub title: String,
    pub subject: String,
    pub semester: i32,
    pub downloads: u64,
    pub uploaded: String,
    pub uploader: Option<String>,
    pub download_url: String,
}

impl Card {
    pub fn new(resource: &Resource, now: DateTime<Utc>, download_url: String) -> Self {
        let uploader = resource.uploader();
        Self {
            id: resource.id,
            icon: file_icon(&resource.kind),
            title: resource.title.clone(),
            subject: resource.subject.clone(),
            semester: resource.semester,
            downloads: resource.downloads(),
            uploaded: format_date(resource.upload_date, now),
            uploader: (uploader != ANONYMOUS).then(|| uploader.to_string()),
            download_url,
        }
    }

    /// "Uploaded 3 days ago", with " by <name>" unless the uploader is anonymous.
    pub fn uploaded_line(&self) -> String {
        match &self.uploader {
            Some(name) => format!("Uploaded {} by {}", self.uploaded, name),
            None => format!("Uploaded {}", self.uploaded),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Empty,
    Grid(Vec<Card>),
}

impl View {
    pub fn build(
        filtered: &[Resource],
        now: DateTime<Utc>,
        download_url: impl Fn(i64) -> String,
    ) -> Self {
        if filtered.is_empty() {
            return View::Empty;
        }
        View::Grid(
            filtered
                .iter()
                .map(|r| Card::new(r, now, download_url(r.id)))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        match self {
            View::Empty => 0,
            View::Grid(cards) => cards.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, View::Empty)
    }

    /// Terminal rendering. Backend text goes through `terminal_safe`.
    pub fn to_text(&self) -> String {
        let mut out = Filter::count_label(self.len());
        out.push('\n');
        match self {
            View::Empty => {
                out.push_str(&format!("\n{}\n", EMPTY_STATE));
            }
            View::Grid(cards) => {
                for card in cards {
                    out.push_str(&format!(
                        "\n{} {}  [#{}]\n",
                        card.icon,
                        terminal_safe(&card.title),
                        card.id
                    ));
                    out.push_str(&format!(
                        "   📚 {} · 🎓 Sem {} · 📥 {}\n",
                        terminal_safe(&card.subject),
                        card.semester,
                        card.downloads
                    ));
                    out.push_str(&format!("   {}\n", terminal_safe(&card.uploaded_line())));
                }
            }
        }
        out
    }
}

pub fn statistics_text(stats: &Statistics) -> String {
    format!(
        "Resources: {}  Downloads: {}  Subjects: {}  Semesters: {}",
        stats.total_resources, stats.total_downloads, stats.total_subjects, stats.total_semesters
    )
}

fn detail_rows(resource: &Resource) -> Vec<(&'static str, String)> {
    vec![
        ("📝 Title", resource.title.clone()),
        ("📚 Subject", resource.subject.clone()),
        ("🎓 Semester", format!("Semester {}", resource.semester)),
        ("📂 Type", capitalize(resource.kind.as_str())),
        ("📄 File Name", resource.file_name.clone()),
        ("💾 File Size", format_file_size(resource.file_size)),
        ("👤 Uploaded By", resource.uploader().to_string()),
        ("📅 Upload Date", format_timestamp(resource.upload_date)),
        ("📥 Downloads", format!("{} times", resource.downloads())),
    ]
}

pub fn render_details(resource: &Resource) -> String {
    detail_rows(resource)
        .into_iter()
        .map(|(label, value)| format!("{:<16} {}\n", format!("{}:", label), terminal_safe(&value)))
        .collect()
}

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
.stats{display:flex;gap:1rem}.stat{padding:.5rem 1rem;border:1px solid #ddd}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(260px,1fr));gap:1rem}\
.resource-card{border:1px solid #ddd;border-radius:8px;padding:1rem}\
.resource-icon{font-size:2rem}.resource-meta span{margin-right:.5rem}\
.modal{display:none;position:fixed;inset:0}.modal:target{display:block}\
.modal-backdrop{position:absolute;inset:0;background:rgba(0,0,0,.5)}\
.modal-content{position:relative;margin:10vh auto;max-width:480px;background:#fff;padding:1rem}";

/// Renders a standalone page: statistics, count, then either the empty state or
/// the card grid. Every interpolated text field is escaped.
pub fn render_html(view: &View, stats: &Statistics, details: &[Resource]) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!(
        "<title>College Resource Hub</title>\n<style>{}</style>\n",
        STYLE
    ));
    out.push_str("</head>\n<body>\n");

    out.push_str("<div class=\"stats\">\n");
    for (id, label, value) in [
        ("totalResources", "Resources", stats.total_resources as u64),
        ("totalDownloads", "Downloads", stats.total_downloads),
        ("totalSubjects", "Subjects", stats.total_subjects as u64),
        ("totalSemesters", "Semesters", stats.total_semesters as u64),
    ] {
        out.push_str(&format!(
            "<div class=\"stat\"><strong id=\"{}\">{}</strong> {}</div>\n",
            id, value, label
        ));
    }
    out.push_str("</div>\n");
    out.push_str(&format!(
        "<p id=\"resourceCount\">{}</p>\n",
        Filter::count_label(view.len())
    ));

    match view {
        View::Empty => {
            out.push_str(&format!("<div id=\"emptyState\">{}</div>\n", EMPTY_STATE));
        }
        View::Grid(cards) => {
            out.push_str("<div id=\"resourcesList\" class=\"grid\">\n");
            for card in cards {
                out.push_str(&render_card(card));
            }
            out.push_str("</div>\n");
        }
    }

    for resource in details {
        out.push_str(&render_details_modal(resource));
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn render_card(card: &Card) -> String {
    let mut out = String::from("<div class=\"resource-card\">\n");
    out.push_str(&format!("  <div class=\"resource-icon\">{}</div>\n", card.icon));
    out.push_str(&format!(
        "  <h3 class=\"resource-title\">{}</h3>\n",
        escape_html(&card.title)
    ));
    out.push_str(&format!(
        "  <div class=\"resource-meta\"><span>📚 {}</span><span>🎓 Sem {}</span><span>📥 {}</span></div>\n",
        escape_html(&card.subject),
        card.semester,
        card.downloads
    ));
    out.push_str(&format!(
        "  <div class=\"resource-date\">{}</div>\n",
        escape_html(&card.uploaded_line())
    ));
    out.push_str(&format!(
        "  <div class=\"resource-actions\"><a class=\"btn btn-primary\" href=\"{}\" target=\"_blank\">Download</a> <a class=\"btn btn-secondary\" href=\"#details-{}\">Details</a></div>\n",
        escape_html(&card.download_url),
        card.id
    ));
    out.push_str("</div>\n");
    out
}

// Opened through the :target selector; the backdrop and the close link both dismiss it.
fn render_details_modal(resource: &Resource) -> String {
    let mut out = format!("<div class=\"modal\" id=\"details-{}\">\n", resource.id);
    out.push_str("  <a class=\"modal-backdrop\" href=\"#\"></a>\n");
    out.push_str("  <div class=\"modal-content\">\n");
    for (label, value) in detail_rows(resource) {
        out.push_str(&format!(
            "    <div class=\"detail-row\"><span class=\"detail-label\">{}:</span> <span class=\"detail-value\">{}</span></div>\n",
            label,
            escape_html(&value)
        ));
    }
    out.push_str("    <a class=\"close\" href=\"#\">Close</a>\n");
    out.push_str("  </div>\n</div>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::testing::{catalog, resource};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn url(id: i64) -> String {
        format!("http://hub/api/resources/download/{}", id)
    }

    #[test]
    fn test_empty_view() {
        let view = View::build(&[], now(), url);
        assert!(view.is_empty());
        let text = view.to_text();
        assert!(text.starts_with("0 resources"));
        assert!(text.contains(EMPTY_STATE));

        let html = render_html(&view, &Statistics::default(), &[]);
        assert!(html.contains("id=\"emptyState\""));
        assert!(!html.contains("resourcesList"));
    }

    #[test]
    fn test_cards_follow_collection_order() {
        let all = catalog();
        let view = View::build(&all, now(), url);
        let View::Grid(cards) = &view else {
            panic!("expected grid");
        };
        let ids: Vec<i64> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(cards[0].icon, "📝");
        assert_eq!(cards[0].uploaded, "2 weeks ago");
        assert_eq!(cards[4].icon, "📄");
        assert_eq!(cards[2].download_url, url(3));
    }

    #[test]
    fn test_uploader_suffix() {
        let mut r = resource(1, "A", "B", 1, "notes");
        let card = Card::new(&r, now(), url(1));
        assert_eq!(card.uploaded_line(), "Uploaded 2 weeks ago");

        r.uploader_name = Some("Priya".to_string());
        let card = Card::new(&r, now(), url(1));
        assert_eq!(card.uploaded_line(), "Uploaded 2 weeks ago by Priya");
    }

    #[test]
    fn test_html_escapes_fields() {
        let mut r = resource(9, "<img src=x onerror=alert(1)>", "A&B", 2, "unknown_tag");
        r.uploader_name = Some("\"Eve\"".to_string());
        let all = vec![r];
        let view = View::build(&all, now(), url);
        let html = render_html(&view, &Statistics::from_resources(&all), &all);

        assert!(!html.contains("<img src=x"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(html.contains("A&amp;B"));
        assert!(html.contains("by &quot;Eve&quot;"));
        assert!(html.contains("href=\"#details-9\""));
        assert!(html.contains("id=\"details-9\""));
        assert!(html.contains("<strong id=\"totalResources\">1</strong>"));
    }

    #[test]
    fn test_render_details_lists_all_fields() {
        let r = resource(2, "DBMS Midterm", "DBMS", 4, "papers");
        let text = render_details(&r);
        assert!(text.contains("DBMS Midterm"));
        assert!(text.contains("Semester 4"));
        assert!(text.contains("Papers"));
        assert!(text.contains("2.pdf"));
        assert!(text.contains("2.0 KB"));
        assert!(text.contains("Anonymous"));
        assert!(text.contains("2 times"));
    }

    #[test]
    fn test_terminal_output_strips_control_chars() {
        let mut r = resource(4, "Lab\x1b[2J Manual", "OS\u{7}", 5, "other");
        r.uploader_name = Some("Eve\r\n".to_string());
        let view = View::build(&[r.clone()], now(), url);
        let text = view.to_text();
        assert!(!text.contains('\x1b'));
        assert!(!text.contains('\u{7}'));
        assert!(!text.contains('\r'));
        assert!(text.contains("Lab_[2J Manual"));
        assert!(text.contains("OS_"));

        let details = render_details(&r);
        assert!(!details.contains('\x1b'));
        assert!(details.contains("Lab_[2J Manual"));
    }

    #[test]
    fn test_statistics_text() {
        let stats = Statistics::from_resources(&catalog());
        assert_eq!(
            statistics_text(&stats),
            "Resources: 5  Downloads: 15  Subjects: 4  Semesters: 4"
        );
    }
}
