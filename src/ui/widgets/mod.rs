//! UI widgets for the dashboard panels.

pub mod chart;
pub mod form;
pub mod help;
pub mod status_bar;

pub use chart::render_chart;
pub use form::render_form_section;
pub use help::render_help;
pub use status_bar::render_status_bar;
