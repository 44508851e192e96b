use importer::ImportReport;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ImportQueryParams {
    /// Term for rows with a blank academic_year; defaults to the current term
    pub default_term: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImportReportResponse {
    pub imported: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl From<ImportReport> for ImportReportResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            imported: report.imported,
            errors: report.errors,
            warnings: report.warnings,
        }
    }
}
