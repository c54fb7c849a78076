//! Charts module - Chart catalog, dispatch, figure building and drawing

mod builders;
mod dispatch;
mod figure;
mod kind;
mod layout;
mod plotter;
mod request;
mod selection;

pub use dispatch::{precondition, roles, ChartOptions};
pub use kind::{Arity, ChartKind, RoleSpec};
pub use plotter::{ChartPlotter, ViewState};
pub use selection::ChartSelection;
