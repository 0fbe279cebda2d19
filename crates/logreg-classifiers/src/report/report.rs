use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

use crate::stats::{ClassificationMetrics, RocCurve};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// A titled block of HTML content and embedded plots.
pub struct ReportSection {
    title: String,
    content: Vec<Markup>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: Vec::new(),
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.content.push(content);
    }

    /// Embed a plot as an inline `<div>` rendered by plotly.js.
    pub fn add_plot(&mut self, plot: Plot) {
        let div_id = format!("plot-{}-{}", slug(&self.title), self.content.len());
        self.content
            .push(PreEscaped(plot.to_inline_html(Some(div_id.as_str()))));
    }
}

/// Self-contained HTML report.
pub struct Report {
    title: String,
    created: DateTime<Local>,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            created: Local::now(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn render(&self) -> String {
        let created = self.created.format("%Y-%m-%d %H:%M:%S").to_string();
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style { "body { font-family: sans-serif; margin: 2em; } table { border-collapse: collapse; } td, th { border: 1px solid #ccc; padding: 4px 8px; text-align: right; }" }
                }
                body {
                    h1 { (self.title) }
                    p { "Generated " (created) }
                    @for section in &self.sections {
                        section {
                            h2 { (section.title) }
                            @for block in &section.content {
                                (block)
                            }
                        }
                    }
                }
            }
        }
        .into_string()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(&path, self.render())
            .with_context(|| format!("Failed to write report: {}", path.as_ref().display()))
    }
}

/// Table of accuracy/precision/recall, one row per named evaluation.
pub fn metrics_table(rows: &[(&str, &ClassificationMetrics)]) -> Markup {
    html! {
        table {
            tr { th { "Evaluation" } th { "Accuracy" } th { "Precision" } th { "Recall" } th { "TP" } th { "FP" } th { "TN" } th { "FN" } }
            @for (name, m) in rows {
                tr {
                    td { (name) }
                    td { (format!("{:.4}", m.accuracy)) }
                    td { (format!("{:.4}", m.precision)) }
                    td { (format!("{:.4}", m.recall)) }
                    td { (m.counts.true_positives.to_string()) }
                    td { (m.counts.false_positives.to_string()) }
                    td { (m.counts.true_negatives.to_string()) }
                    td { (m.counts.false_negatives.to_string()) }
                }
            }
        }
    }
}

/// Table of the sampled ROC points of a curve.
pub fn roc_table(curve: &RocCurve) -> Markup {
    html! {
        table {
            tr { th { "Threshold" } th { "FPR" } th { "TPR" } th { "Tied" } }
            @for p in curve.iter() {
                tr {
                    td { (format!("{:.2}", p.threshold)) }
                    td { (format!("{:.4}", p.fpr)) }
                    td { (format!("{:.4}", p.tpr)) }
                    td { (p.counts.tied.to_string()) }
                }
            }
        }
    }
}

fn slug(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ConfusionCounts;

    #[test]
    fn render_contains_sections_and_metrics() {
        let metrics = ClassificationMetrics {
            accuracy: 0.75,
            precision: 0.5,
            recall: 1.0,
            counts: ConfusionCounts::default(),
        };
        let mut section = ReportSection::new("Fitted model");
        section.add_content(metrics_table(&[("test", &metrics)]));

        let mut report = Report::new("Logistic regression");
        report.add_section(section);
        let html = report.render();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Fitted model"));
        assert!(html.contains("0.7500"));
    }

    #[test]
    fn slug_replaces_non_alphanumerics() {
        assert_eq!(slug("ROC Curves (test)"), "roc-curves--test-");
    }
}
