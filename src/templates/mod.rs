//! HTML templates and styling for the mentions viewer.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constant, including the annotation label colours
//! - `components` - Page skeleton, pager, panels and placeholders

mod components;
mod styles;

pub use components::{
    base_html, collapsed_mentions_html, error_panel_html, fetching_html, html_escape,
    mentions_link, pager_html, placeholder_panel_html, row_error_html, row_panel_html,
};
pub use styles::STYLE;
