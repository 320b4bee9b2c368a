//! Document model of the tracker page: input fields, product summary,
//! timeline and notifications, plus HTML and terminal renderings.

use verifarm_storage::{ProductRecord, Stage, TimelineEntry};

use crate::notify::Notifications;

/// Icon for stages without a dedicated one.
pub const GENERIC_STAGE_ICON: &str = "📦";

/// Icon shown next to a stage label. Unrecognised labels (including
/// differently-cased known ones) get [`GENERIC_STAGE_ICON`].
pub fn stage_icon(stage: &str) -> &'static str {
    match Stage::from_label(stage) {
        Some(Stage::Harvesting) => "🌿",
        Some(Stage::Processing) => "🏭",
        Some(Stage::Storage) => "❄️",
        Some(Stage::Transport) => "🚚",
        Some(Stage::Retail) => "🏪",
        None => GENERIC_STAGE_ICON,
    }
}

/// The page's input fields.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TrackerForm {
    /// Identifier typed into the tracking field.
    pub product_id: String,
    pub name: String,
    pub farm: String,
    pub harvest_date: String,
}

impl TrackerForm {
    /// Empty the three add-product fields.
    pub fn clear_new_product(&mut self) {
        self.name.clear();
        self.farm.clear();
        self.harvest_date.clear();
    }
}

/// Header block shown above the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub status: String,
    pub farm: String,
    pub harvest_date: String,
    pub current_location: String,
}

impl ProductSummary {
    /// CSS class of the status badge, e.g. `status fresh`.
    pub fn status_class(&self) -> String {
        format!("status {}", self.status.to_lowercase())
    }
}

impl From<&ProductRecord> for ProductSummary {
    fn from(product: &ProductRecord) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            status: product.status.clone(),
            farm: product.farm.clone(),
            harvest_date: product.harvest_date.clone(),
            current_location: product.current_location.clone(),
        }
    }
}

/// One rendered timeline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineItem {
    /// The entry's status string; selects the visual treatment only.
    pub status: String,
    pub icon: &'static str,
    pub stage: String,
    pub location: String,
    pub date: String,
    /// `None` when the entry carries the `"N/A"` sentinel.
    pub temperature: Option<String>,
}

impl TimelineItem {
    /// CSS class, e.g. `timeline-item current`.
    pub fn css_class(&self) -> String {
        format!("timeline-item {}", self.status)
    }
}

impl From<&TimelineEntry> for TimelineItem {
    fn from(entry: &TimelineEntry) -> Self {
        Self {
            status: entry.status.clone(),
            icon: stage_icon(&entry.stage),
            stage: entry.stage.clone(),
            location: entry.location.clone(),
            date: entry.date.clone(),
            temperature: entry.displayed_temperature().map(str::to_string),
        }
    }
}

/// The tracker page.
#[derive(Debug, Default, Clone)]
pub struct TrackerView {
    pub form: TrackerForm,
    pub notifications: Notifications,
    summary: Option<ProductSummary>,
    timeline: Vec<TimelineItem>,
}

impl TrackerView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> Option<&ProductSummary> {
        self.summary.as_ref()
    }

    pub fn timeline(&self) -> &[TimelineItem] {
        &self.timeline
    }

    /// Show `product`'s summary and timeline, replacing what was shown.
    pub fn show_product(&mut self, product: &ProductRecord) {
        self.summary = Some(ProductSummary::from(product));
        self.render_timeline(&product.timeline);
    }

    /// Replace the timeline with `entries`. Rendering the same entries again
    /// yields the same timeline.
    pub fn render_timeline(&mut self, entries: &[TimelineEntry]) {
        self.timeline = entries.iter().map(TimelineItem::from).collect();
    }

    // ── Output ────────────────────────────────────────────────────────────────

    /// HTML fragment for the product summary and timeline.
    pub fn render_html(&self) -> String {
        let mut out = String::new();

        if let Some(summary) = &self.summary {
            out.push_str("<section class=\"product-info\">\n");
            out.push_str(&format!(
                "  <h3 id=\"productName\">{}</h3>\n",
                escape_html(&summary.name)
            ));
            out.push_str(&format!(
                "  <span id=\"productStatus\" class=\"{}\">{}</span>\n",
                escape_html(&summary.status_class()),
                escape_html(&summary.status)
            ));
            out.push_str("  <dl>\n");
            for (id, label, value) in [
                ("detailId", "Product ID", &summary.id),
                ("detailFarm", "Farm", &summary.farm),
                ("detailHarvest", "Harvest Date", &summary.harvest_date),
                ("detailLocation", "Current Location", &summary.current_location),
            ] {
                out.push_str(&format!(
                    "    <dt>{label}</dt><dd id=\"{id}\">{}</dd>\n",
                    escape_html(value)
                ));
            }
            out.push_str("  </dl>\n");
            out.push_str("</section>\n");
        }

        out.push_str("<div class=\"timeline\">\n");
        for item in &self.timeline {
            out.push_str(&format!(
                "  <div class=\"{}\">\n",
                escape_html(&item.css_class())
            ));
            out.push_str("    <div class=\"timeline-marker\"></div>\n");
            out.push_str("    <div class=\"timeline-content\">\n");
            out.push_str(&format!(
                "      <h4>{} {}</h4>\n",
                item.icon,
                escape_html(&item.stage)
            ));
            out.push_str(&format!(
                "      <p><strong>Location:</strong> {}</p>\n",
                escape_html(&item.location)
            ));
            out.push_str(&format!(
                "      <p><strong>Date:</strong> {}</p>\n",
                escape_html(&item.date)
            ));
            if let Some(temperature) = &item.temperature {
                out.push_str(&format!(
                    "      <p><strong>Temperature:</strong> {}</p>\n",
                    escape_html(temperature)
                ));
            }
            out.push_str("    </div>\n");
            out.push_str("  </div>\n");
        }
        out.push_str("</div>\n");

        out
    }

    /// Plain-text rendering for terminals.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if let Some(summary) = &self.summary {
            out.push_str(&format!("{} [{}]\n", summary.name, summary.status));
            out.push_str(&format!("  ID:               {}\n", summary.id));
            out.push_str(&format!("  Farm:             {}\n", summary.farm));
            out.push_str(&format!("  Harvest date:     {}\n", summary.harvest_date));
            out.push_str(&format!(
                "  Current location: {}\n",
                summary.current_location
            ));
            out.push('\n');
        }

        out.push_str("Timeline\n");
        for item in &self.timeline {
            out.push_str(&format!(
                "  [{}] {} {}\n",
                item.status, item.icon, item.stage
            ));
            out.push_str(&format!("      Location:    {}\n", item.location));
            out.push_str(&format!("      Date:        {}\n", item.date));
            if let Some(temperature) = &item.temperature {
                out.push_str(&format!("      Temperature: {}\n", temperature));
            }
        }

        out
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use verifarm_storage::{demo_products, NewProduct, StageStatus};

    fn tomatoes() -> ProductRecord {
        demo_products().remove(0)
    }

    #[test]
    fn known_stages_have_icons_and_others_fall_back() {
        assert_eq!(stage_icon("Harvesting"), "🌿");
        assert_eq!(stage_icon("Processing"), "🏭");
        assert_eq!(stage_icon("Transport"), "🚚");
        assert_eq!(stage_icon("Inspection"), GENERIC_STAGE_ICON);
        assert_eq!(stage_icon("retail"), GENERIC_STAGE_ICON);
    }

    #[test]
    fn render_timeline_replaces_previous_items() {
        let mut view = TrackerView::new();
        let product = tomatoes();

        view.render_timeline(&product.timeline);
        let first_html = view.render_html();
        view.render_timeline(&product.timeline);

        assert_eq!(view.timeline().len(), 4);
        assert_eq!(view.render_html(), first_html);
        assert_eq!(first_html.matches("timeline-item").count(), 4);
    }

    #[test]
    fn showing_another_product_swaps_the_timeline() {
        let mut view = TrackerView::new();
        view.show_product(&tomatoes());

        let kale = ProductRecord::registered(
            "AGTKALE01".to_string(),
            NewProduct::new("Kale", "Hill Farm", "2024-02-01"),
        );
        view.show_product(&kale);

        assert_eq!(view.summary().unwrap().name, "Kale");
        assert_eq!(view.timeline()[1].stage, "Processing");
    }

    #[test]
    fn not_available_temperature_is_omitted() {
        let kale = ProductRecord::registered(
            "AGTKALE01".to_string(),
            NewProduct::new("Kale", "Hill Farm", "2024-02-01"),
        );
        let mut view = TrackerView::new();
        view.show_product(&kale);

        assert_eq!(view.timeline()[0].temperature.as_deref(), Some("22°C"));
        assert!(view.timeline()[1..].iter().all(|i| i.temperature.is_none()));

        let html = view.render_html();
        assert_eq!(html.matches("Temperature:").count(), 1);
        assert!(!html.contains("N/A"));
    }

    #[test]
    fn status_drives_css_class() {
        let mut view = TrackerView::new();
        view.show_product(&tomatoes());

        let classes: Vec<String> = view.timeline().iter().map(|i| i.css_class()).collect();
        assert_eq!(
            classes,
            [
                "timeline-item completed",
                "timeline-item completed",
                "timeline-item current",
                "timeline-item upcoming",
            ]
        );
        assert_eq!(view.summary().unwrap().status_class(), "status fresh");
        assert_eq!(
            view.timeline()[2].status,
            StageStatus::Current.as_str()
        );
    }

    #[test]
    fn html_escapes_record_fields() {
        let product = ProductRecord::registered(
            "AGTXSS001".to_string(),
            NewProduct::new("<script>alert(1)</script>", "A & B \"Farm\"", "2024-02-01"),
        );
        let mut view = TrackerView::new();
        view.show_product(&product);

        let html = view.render_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("A &amp; B &quot;Farm&quot;"));
    }

    #[test]
    fn text_rendering_lists_summary_and_stages() {
        let mut view = TrackerView::new();
        view.show_product(&tomatoes());

        let text = view.render_text();
        assert!(text.starts_with("Organic Tomatoes [Fresh]\n"));
        assert!(text.contains("  [current] 🚚 Transport\n"));
        assert!(text.contains("Temperature: 6°C"));
    }

    #[test]
    fn clear_new_product_keeps_tracking_field() {
        let mut form = TrackerForm {
            product_id: "AGT001".to_string(),
            name: "Kale".to_string(),
            farm: "Hill Farm".to_string(),
            harvest_date: "2024-02-01".to_string(),
        };
        form.clear_new_product();
        assert_eq!(form.product_id, "AGT001");
        assert!(form.name.is_empty() && form.farm.is_empty() && form.harvest_date.is_empty());
    }
}
