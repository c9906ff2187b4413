//! Export port trait for computed series.

use crate::domain::alignment::AlignedChartSeries;
use crate::domain::error::CompounderError;
use crate::domain::projection::ProjectionResult;
use std::io::Write;

/// Writes computed series for charting elsewhere.
pub trait ExportPort {
    fn write_projection(
        &self,
        result: &ProjectionResult,
        out: &mut dyn Write,
    ) -> Result<(), CompounderError>;

    fn write_chart(
        &self,
        chart: &AlignedChartSeries,
        out: &mut dyn Write,
    ) -> Result<(), CompounderError>;
}
