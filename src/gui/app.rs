//! Chartify Studio Main Application
//! Welcome gate, then the dashboard with control panel, field panel and chart viewer.

use crate::charts::{ChartKind, ChartOptions, ChartSelection};
use crate::config::AppConfig;
use crate::data::{DataLoader, LoaderError};
use crate::gui::{
    ChartViewer, ControlPanel, ControlPanelAction, FieldPanel, FieldPanelAction, PanelContext,
    WelcomeAction, WelcomePage,
};
use crate::session::{GateState, ProfileStore, SessionError, SessionState};
use egui::{Color32, RichText, SidePanel};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Finished {
        result: Result<DataFrame, LoaderError>,
        path: PathBuf,
    },
}

/// Everything the loader thread has sent so far, and whether it can still send more.
fn drain_load_channel(rx: &Receiver<LoadResult>) -> (Vec<LoadResult>, bool) {
    let mut results = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(result) => results.push(result),
            Err(TryRecvError::Empty) => return (results, true),
            Err(TryRecvError::Disconnected) => return (results, false),
        }
    }
}

/// Main application window. One window is one session.
pub struct ChartifyApp {
    config: AppConfig,
    options: ChartOptions,
    session: SessionState,
    profile_store: ProfileStore,
    welcome: WelcomePage,

    loader: DataLoader,
    selection: ChartSelection,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    load_error: Option<String>,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl ChartifyApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let profile_store = ProfileStore::new(config.profile_path.clone());
        let welcome = WelcomePage::new();
        Self {
            options: ChartOptions::from(&config),
            config,
            session: SessionState::new(),
            profile_store,
            welcome,
            loader: DataLoader::new(),
            selection: ChartSelection::new(),
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
            load_error: None,
            load_rx: None,
            is_loading: false,
        }
    }

    fn handle_welcome_action(&mut self, action: WelcomeAction) {
        match action {
            WelcomeAction::Start => self.session.open_form(),
            WelcomeAction::Submit { name, contact } => {
                match self
                    .session
                    .submit_profile(&name, &contact, &self.profile_store)
                {
                    Ok(profile) => {
                        log::info!("Session unlocked for {}", profile.name);
                        self.welcome.message = None;
                    }
                    Err(e @ SessionError::Validation) => self.welcome.set_error(e.to_string()),
                    Err(e) => {
                        log::error!("Profile submit failed: {}", e);
                        self.welcome.set_error(e.to_string());
                    }
                }
            }
            WelcomeAction::None => {}
        }
    }

    /// Handle CSV file selection. Parsing runs on a background thread.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.set_status("Loading CSV file...");
            self.is_loading = true;

            let (tx, rx) = channel();
            self.load_rx = Some(rx);

            thread::spawn(move || {
                let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));
                let result = DataLoader::read_csv(&path);
                let _ = tx.send(LoadResult::Finished { result, path });
            });
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        let (results, connected) = drain_load_channel(&rx);
        let mut finished = false;
        for result in results {
            match result {
                LoadResult::Progress(status) => {
                    self.control_panel.set_status(status);
                }
                LoadResult::Finished { result, path } => {
                    self.finish_load(result, path);
                    finished = true;
                }
            }
        }

        if finished {
            return;
        }
        if connected {
            self.load_rx = Some(rx);
        } else {
            // The thread is gone without a result; unblock the upload button.
            log::error!("CSV loader thread exited without a result");
            self.is_loading = false;
            let message = "CSV loading stopped unexpectedly";
            self.load_error = Some(message.to_string());
            self.control_panel.set_status(format!("Error: {}", message));
        }
    }

    fn finish_load(&mut self, result: Result<DataFrame, LoaderError>, path: PathBuf) {
        self.is_loading = false;
        self.selection.reset();
        match self.loader.apply_csv_result(result, path) {
            Ok(_) => {
                self.load_error = None;
                self.set_loaded_status();
            }
            Err(e) => {
                self.load_error = Some(e.to_string());
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    fn handle_use_sample(&mut self) {
        let (seed, rows) = (self.config.sample_seed, self.config.sample_rows);
        match self.loader.load_sample(seed, rows) {
            Ok(_) => {
                self.selection.reset();
                self.load_error = None;
                self.set_loaded_status();
            }
            Err(e) => {
                log::error!("Sample generation failed: {}", e);
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    fn set_loaded_status(&mut self) {
        if let Some(ds) = self.loader.dataset() {
            let status = format!(
                "Loaded {} rows, {} columns",
                ds.row_count(),
                ds.all_columns().len()
            );
            self.control_panel.set_status(status);
        }
    }

    fn handle_chart_kind_changed(&mut self, kind: ChartKind) {
        log::debug!("Chart type changed to {}", kind.label());
        self.selection.select_kind(kind);
    }

    fn handle_generate(&mut self) {
        let Some(dataset) = self.loader.dataset() else {
            return;
        };
        if let Err(e) = self.selection.generate(dataset, &self.options) {
            self.control_panel.set_status(e.to_string());
        }
    }

    /// Save the current figure as JSON to a user-chosen path.
    fn handle_export_json(&mut self) {
        let Some(figure) = self.selection.figure() else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name("chart.json")
            .save_file()
        else {
            return;
        };

        match figure.write_json(&path) {
            Ok(()) => {
                log::info!("Exported {} to {:?}", figure.kind().label(), path);
                self.control_panel
                    .set_status(format!("Exported {}", path.display()));
            }
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.control_panel.set_status(format!("Export error: {}", e));
            }
        }
    }

    fn show_dashboard(&mut self, ctx: &egui::Context) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let panel_ctx = PanelContext {
                        dataset: self.loader.dataset(),
                        chart_kind: self.selection.kind(),
                        user_name: self.session.user_name(),
                        user_contact: self.session.user_contact(),
                        is_loading: self.is_loading,
                    };
                    let action = self.control_panel.show(ui, panel_ctx);

                    let mut field_action = FieldPanelAction::None;
                    if let Some(dataset) = self.loader.dataset() {
                        ui.add_space(10.0);
                        ui.label(RichText::new("🔧 Fields").size(14.0).strong());
                        ui.add_space(5.0);
                        field_action = FieldPanel::show(ui, &mut self.selection, dataset);
                    }

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::UseSample => self.handle_use_sample(),
                        ControlPanelAction::ChartKindChanged(kind) => {
                            self.handle_chart_kind_changed(kind)
                        }
                        ControlPanelAction::None => {}
                    }
                    match field_action {
                        FieldPanelAction::Generate => self.handle_generate(),
                        FieldPanelAction::ExportJson => self.handle_export_json(),
                        FieldPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.load_error {
                ui.label(
                    RichText::new(error)
                        .size(14.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
                ui.add_space(8.0);
            }

            if self.loader.dataset().is_none() {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("Upload CSV or use sample dataset")
                            .size(20.0)
                            .color(Color32::GRAY),
                    );
                });
                return;
            }
            self.chart_viewer.show(ui, &self.selection);
        });
    }
}

impl eframe::App for ChartifyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();
        if self.is_loading {
            ctx.request_repaint();
        }

        // Welcome gate until the profile is submitted.
        let gate = self.session.gate_state();
        if gate != GateState::Submitted {
            egui::CentralPanel::default().show(ctx, |ui| {
                let action = self.welcome.show(ui, gate, &self.config.splash);
                self.handle_welcome_action(action);
            });
            return;
        }

        self.show_dashboard(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_loader_thread_reports_disconnect() {
        let (tx, rx) = channel();
        tx.send(LoadResult::Progress("Reading CSV file...".to_string()))
            .unwrap();
        drop(tx);

        let (results, connected) = drain_load_channel(&rx);
        assert!(!connected);
        assert_eq!(results.len(), 1);
        assert!(matches!(&results[0], LoadResult::Progress(s) if s == "Reading CSV file..."));
    }

    #[test]
    fn running_loader_thread_stays_connected() {
        let (tx, rx) = channel::<LoadResult>();
        let (results, connected) = drain_load_channel(&rx);
        assert!(connected);
        assert!(results.is_empty());

        tx.send(LoadResult::Finished {
            result: Err(LoaderError::NoData),
            path: PathBuf::from("empty.csv"),
        })
        .unwrap();
        let (results, connected) = drain_load_channel(&rx);
        assert!(connected);
        assert!(matches!(
            &results[..],
            [LoadResult::Finished { result: Err(LoaderError::NoData), .. }]
        ));
    }
}
