//! PM10 Dashboard Main Application
//! Main window with control panel and dashboard pages.

use crate::config::DashboardConfig;
use crate::dashboard::{build_dashboard, DashboardSummary, DataSource};
use crate::gui::control_panel::Page;
use crate::gui::dashboard_view::PageContent;
use crate::gui::{ControlPanel, ControlPanelAction, DashboardView};
use egui::SidePanel;
use log::{error, info};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// Dataset loading result from background thread
enum LoadResult {
    Complete(DashboardSummary),
    Error(String),
}

/// Data and pending load for one page.
#[derive(Default)]
struct PageState {
    source: Option<DataSource>,
    summary: Option<DashboardSummary>,
    error: Option<String>,
    load_rx: Option<Receiver<LoadResult>>,
}

impl PageState {
    fn is_loading(&self) -> bool {
        self.load_rx.is_some()
    }
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    control_panel: ControlPanel,
    upload_page: PageState,
    default_page: PageState,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self {
            config,
            control_panel: ControlPanel::new(),
            upload_page: PageState::default(),
            default_page: PageState::default(),
        }
    }

    fn page_state(&self, page: Page) -> &PageState {
        match page {
            Page::Upload => &self.upload_page,
            Page::Default => &self.default_page,
        }
    }

    fn page_state_mut(&mut self, page: Page) -> &mut PageState {
        match page {
            Page::Upload => &mut self.upload_page,
            Page::Default => &mut self.default_page,
        }
    }

    /// Handle CSV file selection for the current page.
    fn handle_browse_csv(&mut self) {
        let page = self.control_panel.page;
        if self.page_state(page).is_loading() {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_load(page, DataSource::Uploaded(path));
        }
    }

    /// The default page reads the archived dataset the first time it is shown.
    fn ensure_default_loaded(&mut self) {
        if self.control_panel.page == Page::Default && self.default_page.source.is_none() {
            let source = DataSource::Default(self.config.default_dataset.clone());
            self.start_load(Page::Default, source);
        }
    }

    /// Run the pipeline for `source` on a background thread.
    /// Whatever the page showed before is discarded.
    fn start_load(&mut self, page: Page, source: DataSource) {
        info!("Loading {} for {}", source.path().display(), page.title());
        self.control_panel
            .set_status(&format!("Loading {}...", Self::file_label(source.path())));

        let (tx, rx) = channel();
        let config = self.config.clone();
        let job_source = source.clone();

        thread::spawn(move || {
            let result = match build_dashboard(&job_source, &config) {
                Ok(summary) => LoadResult::Complete(summary),
                Err(e) => LoadResult::Error(format!("{e:#}")),
            };
            let _ = tx.send(result);
        });

        let state = self.page_state_mut(page);
        state.source = Some(source);
        state.summary = None;
        state.error = None;
        state.load_rx = Some(rx);
    }

    /// Check for loading results on both pages
    fn check_load_results(&mut self) {
        for page in [Page::Upload, Page::Default] {
            let state = self.page_state_mut(page);
            let Some(rx) = state.load_rx.take() else {
                continue;
            };

            let status = match rx.try_recv() {
                Ok(LoadResult::Complete(summary)) => {
                    let status = format!("Loaded {} rows", summary.row_count);
                    state.summary = Some(summary);
                    status
                }
                Ok(LoadResult::Error(message)) => {
                    error!("Failed to load dataset: {message}");
                    state.error = Some(message.clone());
                    format!("Error: {message}")
                }
                Err(std::sync::mpsc::TryRecvError::Empty) => {
                    state.load_rx = Some(rx);
                    continue;
                }
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    let message = "Loading stopped unexpectedly".to_string();
                    state.error = Some(message.clone());
                    format!("Error: {message}")
                }
            };

            if page == self.control_panel.page {
                self.control_panel.set_status(&status);
            }
        }
    }

    /// Refresh the status line after switching pages.
    fn handle_page_changed(&mut self) {
        let state = self.page_state(self.control_panel.page);
        let status = if state.is_loading() {
            "Loading...".to_string()
        } else if let Some(error) = &state.error {
            format!("Error: {error}")
        } else if let Some(summary) = &state.summary {
            format!("Loaded {} rows", summary.row_count)
        } else {
            "Ready".to_string()
        };
        self.control_panel.set_status(&status);
    }

    fn file_label(path: &Path) -> String {
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string())
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_default_loaded();
        self.check_load_results();

        let page = self.control_panel.page;
        let loading = self.page_state(page).is_loading();

        // Request repaint while loading
        if self.upload_page.is_loading() || self.default_page.is_loading() {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                let source = self
                    .page_state(page)
                    .source
                    .as_ref()
                    .map(|s| s.path().to_path_buf());
                let action = self.control_panel.show(ui, source.as_deref(), loading);

                match action {
                    ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                    ControlPanelAction::PageChanged => self.handle_page_changed(),
                    ControlPanelAction::None => {}
                }
            });

        // Central panel - Dashboard
        let page = self.control_panel.page;
        let state = self.page_state(page);
        egui::CentralPanel::default().show(ctx, |ui| {
            DashboardView::show(
                ui,
                page,
                PageContent {
                    summary: state.summary.as_ref(),
                    error: state.error.as_deref(),
                    loading: state.is_loading(),
                },
            );
        });
    }
}
