//! Report generation port trait.

use std::path::Path;

use crate::domain::dashboard::Dashboard;
use crate::domain::error::SectorboardError;

/// Port for writing a rendered dashboard.
pub trait ReportPort {
    fn write(&self, dashboard: &Dashboard, output_path: &Path) -> Result<(), SectorboardError>;
}
