//! Chart Viewer Widget
//! Central panel showing the rendered figure or the reason there is none.

use crate::charts::{ChartPlotter, ChartSelection, ViewState};
use egui::{Color32, RichText, ScrollArea};

/// Holds interaction state for the figure on screen.
#[derive(Default)]
pub struct ChartViewer {
    view: ViewState,
    generation: u64,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut egui::Ui, selection: &ChartSelection) {
        // Every Generate starts from a fresh view.
        if selection.generation() != self.generation {
            self.generation = selection.generation();
            self.view = ViewState::default();
        }

        match selection.outcome() {
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("Choose the fields and press Generate")
                            .size(18.0)
                            .color(Color32::GRAY),
                    );
                });
            }
            Some(Err(e)) => {
                ui.add_space(20.0);
                ui.label(
                    RichText::new(format!("⚠ {}", e))
                        .size(16.0)
                        .color(Color32::from_rgb(243, 156, 18)),
                );
            }
            Some(Ok(figure)) => {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        egui::Frame::none()
                            .rounding(8.0)
                            .stroke(egui::Stroke::new(1.0, Color32::from_rgb(100, 149, 237)))
                            .fill(ui.visuals().widgets.noninteractive.bg_fill)
                            .inner_margin(12.0)
                            .show(ui, |ui| {
                                ui.label(
                                    RichText::new(figure.kind().label())
                                        .size(18.0)
                                        .strong(),
                                );
                                ui.add_space(8.0);
                                ChartPlotter::draw(ui, figure, &mut self.view);
                            });
                    });
            }
        }
    }
}
