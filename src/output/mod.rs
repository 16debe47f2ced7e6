//! Terminal rendering and file export for scan reports.

mod json;
mod plain;

pub use json::export_json;
pub use plain::{print_error, print_report, print_scan_header, print_success, print_warning};
