//! Field Panel Widget
//! One widget per role of the selected chart, plus Generate and Export.

use crate::charts::{self, Arity, ChartSelection, RoleSpec};
use crate::data::Dataset;
use egui::{Color32, ComboBox, RichText, ScrollArea};

const NONE_LABEL: &str = "None";

/// Actions triggered by the field panel
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPanelAction {
    None,
    Generate,
    ExportJson,
}

pub struct FieldPanel;

impl FieldPanel {
    pub fn show(
        ui: &mut egui::Ui,
        selection: &mut ChartSelection,
        dataset: &Dataset,
    ) -> FieldPanelAction {
        let mut action = FieldPanelAction::None;

        // A chart the dataset cannot support shows only the reason.
        if let Err(e) = charts::precondition(selection.kind(), dataset) {
            ui.label(
                RichText::new(format!("⚠ {}", e))
                    .size(13.0)
                    .color(Color32::from_rgb(243, 156, 18)),
            );
            return action;
        }

        selection.ensure_defaults(dataset);

        let label_width = 110.0;
        let combo_width = 170.0;
        for role in charts::roles(selection.kind()) {
            match role.arity {
                Arity::Required | Arity::Optional => {
                    ui.horizontal(|ui| {
                        ui.add_sized([label_width, 20.0], egui::Label::new(format!("{}:", role.name)));
                        Self::single_select(ui, selection, dataset, role, combo_width);
                    });
                }
                Arity::Many => {
                    ui.label(format!("{}:", role.name));
                    Self::multi_select(ui, selection, dataset, role);
                }
            }
            ui.add_space(5.0);
        }

        ui.add_space(10.0);
        ui.horizontal(|ui| {
            let button = egui::Button::new(RichText::new("▶ Generate").size(15.0))
                .min_size(egui::vec2(140.0, 32.0));
            if ui.add(button).clicked() {
                action = FieldPanelAction::Generate;
            }

            ui.add_enabled_ui(selection.figure().is_some(), |ui| {
                let button = egui::Button::new(RichText::new("📄 Export JSON").size(14.0))
                    .min_size(egui::vec2(130.0, 32.0));
                if ui.add(button).clicked() {
                    action = FieldPanelAction::ExportJson;
                }
            });
        });

        action
    }

    fn single_select(
        ui: &mut egui::Ui,
        selection: &mut ChartSelection,
        dataset: &Dataset,
        role: &RoleSpec,
        width: f32,
    ) {
        let current = selection.bindings().single(role.name).map(str::to_string);
        let mut chosen = current.clone();

        ComboBox::from_id_salt(("role", role.name))
            .width(width)
            .selected_text(current.as_deref().unwrap_or(NONE_LABEL))
            .show_ui(ui, |ui| {
                if role.arity == Arity::Optional {
                    ui.selectable_value(&mut chosen, None, NONE_LABEL);
                }
                for col in role.kind.candidates(dataset) {
                    ui.selectable_value(&mut chosen, Some(col.clone()), col);
                }
            });

        if chosen != current {
            selection.bind(role.name, chosen.as_deref());
        }
    }

    /// Checkbox list; the binding keeps columns in the order they were ticked.
    fn multi_select(
        ui: &mut egui::Ui,
        selection: &mut ChartSelection,
        dataset: &Dataset,
        role: &RoleSpec,
    ) {
        let mut picked: Vec<String> = selection.bindings().many(role.name).to_vec();
        let before = picked.clone();

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt(("multi", role.name))
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for col in role.kind.candidates(dataset) {
                            let mut checked = picked.contains(col);
                            if ui.checkbox(&mut checked, col).changed() {
                                if checked {
                                    picked.push(col.clone());
                                } else {
                                    picked.retain(|c| c != col);
                                }
                            }
                        }
                    });
            });

        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                for col in role.kind.candidates(dataset) {
                    if !picked.contains(col) {
                        picked.push(col.clone());
                    }
                }
            }
            if ui.small_button("Clear All").clicked() {
                picked.clear();
            }
        });

        if picked != before {
            selection.bind_many(role.name, picked);
        }
    }
}
