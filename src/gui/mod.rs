//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod field_panel;
mod welcome;

pub use app::ChartifyApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction, PanelContext};
pub use field_panel::{FieldPanel, FieldPanelAction};
pub use welcome::{WelcomeAction, WelcomePage};
