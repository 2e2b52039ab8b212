//! Map legend for the risk categories

use avaterrain_colormap::{RiskCategory, RiskClass, Rgba, RISK_TABLE};

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub category: RiskCategory,
    /// e.g. "High (30-45°)"
    pub label: String,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
    pub note: String,
}

impl Default for Legend {
    fn default() -> Self {
        let last = RISK_TABLE.len() - 1;
        let entries = RISK_TABLE
            .iter()
            .enumerate()
            .map(|(i, class)| LegendEntry {
                category: class.category,
                label: format!(
                    "{} ({})",
                    class.category.label(),
                    threshold_label(class, i == 0, i == last)
                ),
                color: class.color,
            })
            .collect();

        Self {
            title: "Avalanche Terrain Risk".to_string(),
            entries,
            note: "Most avalanches start on 30-45° slopes".to_string(),
        }
    }
}

/// Slope range text; the open-ended first and last classes get `<` / `>`
fn threshold_label(class: &RiskClass, first: bool, last: bool) -> String {
    if first {
        format!("<{}°", class.upper)
    } else if last {
        format!(">{}°", class.lower)
    } else {
        format!("{}-{}°", class.lower, class.upper)
    }
}

impl Legend {
    /// Fixed-position HTML block for the lower-left corner of the map
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str(
            "<div class=\"risk-legend\" style=\"position: fixed; bottom: 50px; left: 50px; \
             z-index: 1000; background-color: white; padding: 15px; border-radius: 5px; \
             border: 2px solid grey; font-family: Arial, sans-serif;\">\n",
        );
        html.push_str(&format!(
            "  <h4 style=\"margin: 0 0 10px 0;\">{}</h4>\n",
            escape_html(&self.title)
        ));
        for entry in &self.entries {
            html.push_str(&format!(
                "  <div><span style=\"background-color: {}; width: 20px; height: 12px; \
                 display: inline-block; margin-right: 5px;\"></span> {}</div>\n",
                entry.color.css_rgb(),
                escape_html(&entry.label)
            ));
        }
        html.push_str(&format!(
            "  <p style=\"font-size: 10px; margin: 10px 0 0 0; color: grey;\">{}</p>\n",
            escape_html(&self.note)
        ));
        html.push_str("</div>\n");
        html
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
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

    #[test]
    fn labels_follow_table() {
        let legend = Legend::default();
        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Low (<25°)",
                "Moderate (25-30°)",
                "High (30-45°)",
                "Very High (45-60°)",
                "Extreme (>60°)",
            ]
        );
        assert_eq!(legend.entries[4].color, RiskCategory::Extreme.color());
    }

    #[test]
    fn html_is_escaped() {
        let html = Legend::default().to_html();
        assert!(html.contains("Avalanche Terrain Risk"));
        assert!(html.contains("Low (&lt;25°)"));
        assert!(html.contains("Extreme (&gt;60°)"));
        assert!(html.contains("rgb(255, 165, 0)"));
        assert!(html.contains("Most avalanches start on 30-45° slopes"));
    }

    #[test]
    fn html_has_one_line_per_entry() {
        let legend = Legend::default();
        let html = legend.to_html();
        let lines: Vec<&str> = html.lines().collect();
        // opening div, title, five entries, note, closing div
        assert_eq!(lines.len(), 2 + legend.entries.len() + 2);
        assert_eq!(html.matches("<div><span").count(), 5);
        assert!(lines[1].trim_start().starts_with("<h4"));
        assert_eq!(lines.last(), Some(&"</div>"));
    }
}
