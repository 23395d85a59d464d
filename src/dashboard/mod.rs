//! The dashboard page, the app's home screen.

mod page;

pub use page::get_dashboard_page;
