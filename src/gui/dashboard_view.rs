//! Dashboard View Widget
//! Central scrollable panel: headline metric, annual, monthly and seasonal charts.

use crate::charts::{ChartPlotter, NATIONAL_COLOR, WHO_COLOR};
use crate::dashboard::{DashboardSummary, DataSource};
use crate::data::schema::CONCENTRATION_UNIT;
use crate::gui::control_panel::Page;
use crate::stats::StatsCalculator;
use egui::{Color32, RichText, ScrollArea};

/// What one page currently has to show.
pub struct PageContent<'a> {
    pub summary: Option<&'a DashboardSummary>,
    pub error: Option<&'a str>,
    pub loading: bool,
}

/// Renders a page of the dashboard.
pub struct DashboardView;

impl DashboardView {
    pub fn show(ui: &mut egui::Ui, page: Page, content: PageContent<'_>) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new("PM10 Air Quality Analysis Dashboard").size(26.0));
                ui.label(
                    "PM10 trends compared with WHO and South African National Air Quality \
                     Standards (NAAQS).",
                );
                if page == Page::Default {
                    ui.label(
                        RichText::new(
                            "The default dataset ships with the application. \
                             Upload an alternative dataset for comparison.",
                        )
                        .size(11.0)
                        .color(Color32::GRAY),
                    );
                }
                ui.add_space(10.0);

                if let Some(error) = content.error {
                    Self::show_error(ui, error);
                }

                match content.summary {
                    Some(summary) => Self::show_summary(ui, summary),
                    None if content.loading => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Loading dataset...");
                        });
                    }
                    None if content.error.is_none() => Self::show_info(ui, page),
                    None => {}
                }
            });
    }

    fn show_info(ui: &mut egui::Ui, page: Page) {
        let text = match page {
            Page::Upload => "Please upload your PM10 CSV file to begin analysis.",
            Page::Default => "The default dataset has not been loaded yet.",
        };
        egui::Frame::none()
            .fill(Color32::from_rgb(222, 235, 250))
            .rounding(5.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(format!("ℹ {text}")).color(Color32::from_rgb(30, 70, 120)));
            });
    }

    fn show_error(ui: &mut egui::Ui, error: &str) {
        egui::Frame::none()
            .fill(Color32::from_rgb(253, 226, 228))
            .rounding(5.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(format!("⚠ {error}")).color(Color32::from_rgb(156, 0, 6)));
            });
        ui.add_space(10.0);
    }

    fn show_summary(ui: &mut egui::Ui, summary: &DashboardSummary) {
        if let DataSource::Uploaded(path) = &summary.source {
            ui.label(
                RichText::new(format!("Showing {}", path.display()))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        }

        // ===== Summary Metric =====
        ui.label(RichText::new("Average PM10 Concentration").size(14.0));
        ui.label(
            RichText::new(StatsCalculator::format_concentration(summary.overall_mean))
                .size(32.0)
                .strong(),
        );
        ui.add_space(5.0);
        ui.separator();

        // ===== Annual Mean Trends =====
        ui.heading("Annual Mean Trends");
        ChartPlotter::draw_yearly_chart(ui, &summary.yearly, summary.thresholds);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!(
                    "━ ━ WHO ({} {CONCENTRATION_UNIT})",
                    summary.thresholds.who
                ))
                .color(WHO_COLOR),
            );
            ui.label("|");
            ui.label(
                RichText::new(format!(
                    "━━ SA NAAQS ({} {CONCENTRATION_UNIT})",
                    summary.thresholds.national
                ))
                .color(NATIONAL_COLOR),
            );
        });
        ui.add_space(15.0);

        // ===== Monthly Patterns =====
        ui.heading("Monthly Patterns");
        ui.columns(2, |columns| {
            ChartPlotter::draw_monthly_bar(&mut columns[0], &summary.monthly);
            ChartPlotter::draw_monthly_line(&mut columns[1], &summary.monthly);
        });
        ui.add_space(15.0);

        // ===== Seasonal Boxplots =====
        ui.heading("Seasonal PM10 Distribution");
        ChartPlotter::draw_season_boxplot(ui, &summary.seasons);
        ui.add_space(15.0);
    }
}
