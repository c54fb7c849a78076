//! Welcome Page
//! Splash screen and the name/contact form shown before the dashboard.

use crate::config::SplashText;
use crate::session::GateState;
use egui::{Color32, RichText};

/// Actions triggered by the welcome page
#[derive(Debug, Clone, PartialEq)]
pub enum WelcomeAction {
    None,
    Start,
    Submit { name: String, contact: String },
}

/// Form buffers and the last submit error.
#[derive(Default)]
pub struct WelcomePage {
    pub name: String,
    pub contact: String,
    pub message: Option<String>,
}

impl WelcomePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn show(&mut self, ui: &mut egui::Ui, gate: GateState, splash: &SplashText) -> WelcomeAction {
        let mut action = WelcomeAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.18);
            ui.label(RichText::new(&splash.title).size(28.0).color(Color32::GRAY));
            ui.label(
                RichText::new(&splash.brand)
                    .size(48.0)
                    .strong()
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new(&splash.subtitle).size(20.0));
            ui.add_space(30.0);

            match gate {
                GateState::ShowingSplash => {
                    let button = egui::Button::new(RichText::new("Let's Start").size(18.0))
                        .min_size(egui::vec2(180.0, 40.0));
                    if ui.add(button).clicked() {
                        action = WelcomeAction::Start;
                    }
                }
                GateState::ShowingForm => action = self.show_form(ui),
                GateState::Submitted => {}
            }
        });

        action
    }

    fn show_form(&mut self, ui: &mut egui::Ui) -> WelcomeAction {
        let mut action = WelcomeAction::None;

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_max_width(360.0);
                ui.label(RichText::new("Tell us about you").size(16.0).strong());
                ui.add_space(8.0);

                egui::Grid::new("welcome_form")
                    .num_columns(2)
                    .spacing([10.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Name:");
                        ui.text_edit_singleline(&mut self.name);
                        ui.end_row();
                        ui.label("Contact Number:");
                        ui.text_edit_singleline(&mut self.contact);
                        ui.end_row();
                    });

                ui.add_space(10.0);
                if ui.button(RichText::new("Submit").size(15.0)).clicked() {
                    action = WelcomeAction::Submit {
                        name: self.name.clone(),
                        contact: self.contact.clone(),
                    };
                }

                if let Some(message) = &self.message {
                    ui.add_space(6.0);
                    ui.label(
                        RichText::new(message)
                            .size(12.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                }
            });

        action
    }
}
