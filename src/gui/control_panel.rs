//! Control Panel Widget
//! Left side panel with the data source, chart type and status.

use crate::charts::ChartKind;
use crate::data::Dataset;
use egui::{Color32, ComboBox, RichText};

/// What the control panel needs to know about the rest of the app.
pub struct PanelContext<'a> {
    pub dataset: Option<&'a Dataset>,
    pub chart_kind: ChartKind,
    pub user_name: Option<&'a str>,
    pub user_contact: Option<&'a str>,
    pub is_loading: bool,
}

/// Left side control panel with data source selection and chart type.
pub struct ControlPanel {
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, ctx: PanelContext<'_>) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Chartify Studio")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            if let Some(name) = ctx.user_name {
                let greeting = ui.label(
                    RichText::new(format!("Hello, {}", name))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                if let Some(contact) = ctx.user_contact {
                    greeting.on_hover_text(format!("Contact: {}", contact));
                }
            }
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                let (text, color) = match ctx.dataset {
                    Some(ds) => (
                        format!(
                            "{} ({} rows, {} columns)",
                            ds.source().describe(),
                            ds.row_count(),
                            ds.all_columns().len()
                        ),
                        ui.visuals().text_color(),
                    ),
                    None => ("No data loaded".to_string(), Color32::GRAY),
                };
                ui.label(RichText::new(text).size(12.0).color(color));
                ui.add_space(5.0);

                ui.add_enabled_ui(!ctx.is_loading, |ui| {
                    ui.horizontal(|ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                        if ui.button("Use Sample Dataset").clicked() {
                            action = ControlPanelAction::UseSample;
                        }
                    });
                });
                if ctx.is_loading {
                    ui.add(egui::ProgressBar::new(0.0).animate(true));
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Chart Type Section =====
        ui.label(RichText::new("📈 Chart Type").size(14.0).strong());
        ui.add_space(5.0);

        ui.add_enabled_ui(ctx.dataset.is_some(), |ui| {
            ComboBox::from_id_salt("chart_kind")
                .width(220.0)
                .selected_text(ctx.chart_kind.label())
                .show_ui(ui, |ui| {
                    for kind in ChartKind::ALL {
                        if ui
                            .selectable_label(kind == ctx.chart_kind, kind.label())
                            .clicked()
                            && kind != ctx.chart_kind
                        {
                            action = ControlPanelAction::ChartKindChanged(kind);
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") || self.status.starts_with("Exported") {
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
    BrowseCsv,
    UseSample,
    ChartKindChanged(ChartKind),
}
