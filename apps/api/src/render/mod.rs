// Results Renderer: the pure report view model and the HTML pages built from it.

pub mod html;
pub mod report;

pub use report::{build_report, ReportView};
