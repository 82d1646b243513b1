//! Export and sharing surface: CSV reports, structured multi-page report
//! documents, generated insight copy, shareable dashboard links, and the
//! background job manager that writes export artifacts to disk.

pub mod csv;
pub mod format;
pub mod insights;
pub mod jobs;
pub mod report;
pub mod share_link;

pub use csv::{export_filename, full_report_csv, metrics_csv};
pub use format::{format_currency, format_large_number, format_percentage, hours_label};
pub use insights::generate_insights;
pub use jobs::{ExportKind, ExportManager, ExportStatus};
pub use report::{build_report, ReportDocument, ReportPage, ReportSection};
pub use share_link::{DashboardTab, ShareState};
