//! CSV export of projections and aligned charts.

use crate::domain::alignment::AlignedChartSeries;
use crate::domain::error::CompounderError;
use crate::domain::projection::ProjectionResult;
use crate::ports::export_port::ExportPort;
use std::io::Write;

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExportAdapter;

fn csv_error(e: csv::Error) -> CompounderError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => CompounderError::Io(io),
        other => CompounderError::DataSource {
            reason: format!("CSV write error: {other:?}"),
        },
    }
}

/// Two decimal places; money columns are shown as currency downstream.
fn money(value: f64) -> String {
    format!("{value:.2}")
}

impl ExportPort for CsvExportAdapter {
    fn write_projection(
        &self,
        result: &ProjectionResult,
        out: &mut dyn Write,
    ) -> Result<(), CompounderError> {
        let mut wtr = csv::Writer::from_writer(out);
        wtr.write_record(["year", "label", "principal", "total_balance"])
            .map_err(csv_error)?;
        for point in &result.points {
            wtr.write_record([
                point.year_index.to_string(),
                point.label.clone(),
                money(point.principal_contributed),
                money(point.total_balance),
            ])
            .map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn write_chart(
        &self,
        chart: &AlignedChartSeries,
        out: &mut dyn Write,
    ) -> Result<(), CompounderError> {
        let mut wtr = csv::Writer::from_writer(out);

        let mut header = vec!["date".to_string()];
        header.extend(chart.series.iter().map(|s| s.label.clone()));
        wtr.write_record(&header).map_err(csv_error)?;

        for (i, date) in chart.labels.iter().enumerate() {
            let mut row = vec![date.clone()];
            // Missing markers become empty cells, never zero.
            row.extend(
                chart
                    .series
                    .iter()
                    .map(|s| {
                        s.values
                            .get(i)
                            .copied()
                            .flatten()
                            .map(|v| v.to_string())
                            .unwrap_or_default()
                    }),
            );
            wtr.write_record(&row).map_err(csv_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::alignment::{align, ChartSeries};
    use crate::domain::price_series::PriceSeries;
    use crate::domain::projection::{project, ProjectionParameters};

    #[test]
    fn projection_csv_has_header_and_rows() {
        let params = ProjectionParameters {
            years: 2,
            ..ProjectionParameters::default()
        };
        let result = project(&params, 2030);
        let mut buf = Vec::new();
        CsvExportAdapter.write_projection(&result, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "year,label,principal,total_balance");
        assert_eq!(lines[1], "0,Now,5000.00,5000.00");
        assert!(lines[3].starts_with("2,2032,7400.00,"));
    }

    #[test]
    fn chart_csv_leaves_missing_cells_empty() {
        let a: PriceSeries = [("2024-01-01", 10.0), ("2024-01-03", 12.5)].into_iter().collect();
        let b: PriceSeries = [("2024-01-02", 20.0)].into_iter().collect();
        let chart = align(&a, Some(&b), "a", Some("b"));

        let mut buf = Vec::new();
        CsvExportAdapter.write_chart(&chart, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "date,A Closing Price,B Closing Price\n\
             2024-01-01,10,\n\
             2024-01-02,,20\n\
             2024-01-03,12.5,\n"
        );
    }

    #[test]
    fn short_value_array_writes_empty_cells() {
        let chart = AlignedChartSeries {
            labels: vec!["2024-01-01".into(), "2024-01-02".into()],
            series: vec![ChartSeries {
                symbol: "A".into(),
                label: "A Closing Price".into(),
                values: vec![Some(1.5)],
            }],
        };
        let mut buf = Vec::new();
        CsvExportAdapter.write_chart(&chart, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "date,A Closing Price\n2024-01-01,1.5\n2024-01-02,\n"
        );
    }

    #[test]
    fn empty_chart_writes_header_only() {
        let chart = align(&PriceSeries::new(), None, "a", None);
        let mut buf = Vec::new();
        CsvExportAdapter.write_chart(&chart, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "date,A Closing Price\n");
    }
}
