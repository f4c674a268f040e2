//! Control Panel Widget
//! Left side panel with page selection, file upload and status.

use egui::{Color32, RichText};
use std::path::Path;

/// The two dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    /// Analysis of a user-uploaded file only.
    #[default]
    Upload,
    /// The archived dataset, optionally overridden by an upload.
    Default,
}

impl Page {
    pub fn title(self) -> &'static str {
        match self {
            Page::Upload => "Upload Analysis",
            Page::Default => "Default Dataset",
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub page: Page,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            page: Page::default(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel. `source` is the file behind the current page, if any.
    pub fn show(&mut self, ui: &mut egui::Ui, source: Option<&Path>, loading: bool) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌫 PM10 Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("Air Quality Analysis").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Pages =====
        ui.label(RichText::new("📄 Pages").size(14.0).strong());
        ui.add_space(5.0);
        for page in [Page::Upload, Page::Default] {
            let previous = self.page;
            ui.selectable_value(&mut self.page, page, page.title());
            if self.page != previous {
                action = ControlPanelAction::PageChanged;
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Data Source =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = source
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    let path_color = if source.is_some() {
                        ui.visuals().text_color()
                    } else {
                        Color32::GRAY
                    };
                    ui.label(RichText::new(&path_text).size(12.0).color(path_color));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_enabled_ui(!loading, |ui| {
                            if ui.button("📂 Upload CSV").clicked() {
                                action = ControlPanelAction::BrowseCsv;
                            }
                        });
                    });
                });
            });

        ui.add_space(5.0);
        ui.label(
            RichText::new("Expected columns: Year, Month, Season, PM10")
                .size(11.0)
                .color(Color32::GRAY),
        );

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);
        if loading {
            ui.spinner();
        }

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    PageChanged,
    BrowseCsv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_page_is_the_landing_page() {
        let panel = ControlPanel::new();
        assert_eq!(panel.page, Page::Upload);
        assert_eq!(panel.status, "Ready");
    }

    #[test]
    fn page_titles() {
        assert_eq!(Page::Upload.title(), "Upload Analysis");
        assert_eq!(Page::Default.title(), "Default Dataset");
    }
}
