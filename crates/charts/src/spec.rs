//! Render query rows into a declarative chart spec.
//!
//! The spec is data for the drawing layer: a mark, axis labels, and one
//! series of points. No drawing happens here.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::{ChartConfig, ChartKind};

/// One result row, as produced by the engine.
pub type Row = IndexMap<String, serde_json::Value>;

/// A chart ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub mark: Mark,
    pub points: Vec<DataPoint>,
}

/// How the points are drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mark", rename_all = "snake_case")]
pub enum Mark {
    Line { trendline: bool },
    Bar { horizontal: bool },
    Pie { donut: bool },
    Point { size: Option<f64> },
}

/// One plotted point: a label or numeric position, and a numeric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: PlotValue,
    pub y: f64,
}

/// An x-axis value; categorical columns plot as labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlotValue {
    Number(f64),
    Label(String),
}

/// A row held a value the chart can't plot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    #[error("result rows have no '{0}' column")]
    MissingColumn(String),

    #[error("column '{column}' holds a non-numeric value")]
    NonNumericValue { column: String },
}

impl ChartConfig {
    /// Build the chart spec for a set of result rows.
    pub fn render(&self, rows: &[Row]) -> Result<ChartSpec, ChartError> {
        let points = rows
            .iter()
            .map(|row| {
                Ok(DataPoint {
                    x: plot_value(row, &self.x)?,
                    y: numeric_value(row, &self.y)?,
                })
            })
            .collect::<Result<Vec<_>, ChartError>>()?;

        Ok(ChartSpec {
            title: self.title.clone(),
            x_label: self.x_label.clone().unwrap_or_else(|| self.x.clone()),
            y_label: self.y_label.clone().unwrap_or_else(|| self.y.clone()),
            mark: self.mark(),
            points,
        })
    }

    fn mark(&self) -> Mark {
        match &self.kind {
            ChartKind::LineChart(settings) => Mark::Line {
                trendline: settings.trendline,
            },
            ChartKind::BarChart(settings) => Mark::Bar {
                horizontal: settings.horizontal,
            },
            ChartKind::PieChart(settings) => Mark::Pie {
                donut: settings.donut,
            },
            ChartKind::ScatterPlot(settings) => Mark::Point {
                size: settings.point_size,
            },
        }
    }
}

fn plot_value(row: &Row, column: &str) -> Result<PlotValue, ChartError> {
    let value = row
        .get(column)
        .ok_or_else(|| ChartError::MissingColumn(column.to_string()))?;
    match value {
        serde_json::Value::String(label) => Ok(PlotValue::Label(label.clone())),
        _ => value
            .as_f64()
            .map(PlotValue::Number)
            .ok_or_else(|| ChartError::NonNumericValue {
                column: column.to_string(),
            }),
    }
}

fn numeric_value(row: &Row, column: &str) -> Result<f64, ChartError> {
    row.get(column)
        .ok_or_else(|| ChartError::MissingColumn(column.to_string()))?
        .as_f64()
        .ok_or_else(|| ChartError::NonNumericValue {
            column: column.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineChartSettings;

    fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), value.clone()))
            .collect()
    }

    fn line_chart(x: &str, y: &str) -> ChartConfig {
        serde_json::from_value(serde_json::json!({
            "title": "test",
            "x": x,
            "y": y,
            "type": "line_chart",
            "query": {"fields": ["*"]}
        }))
        .unwrap()
    }

    #[test]
    fn test_rows_become_points_in_order() {
        let config = line_chart("platforms", "game_count");
        let rows = vec![
            row(&[
                ("platforms", serde_json::json!("PC")),
                ("game_count", serde_json::json!(12)),
            ]),
            row(&[
                ("platforms", serde_json::json!("Switch")),
                ("game_count", serde_json::json!(7)),
            ]),
        ];

        let spec = config.render(&rows).unwrap();
        assert_eq!(spec.points.len(), 2);
        assert_eq!(spec.points[0].x, PlotValue::Label("PC".to_string()));
        assert_eq!(spec.points[1].y, 7.0);
        assert_eq!(spec.x_label, "platforms");
        assert_eq!(spec.mark, Mark::Line { trendline: false });
    }

    #[test]
    fn test_missing_columns_are_an_error() {
        let config = line_chart("platforms", "game_count");
        let rows = vec![row(&[("platforms", serde_json::json!("PC"))])];
        assert_eq!(
            config.render(&rows),
            Err(ChartError::MissingColumn("game_count".to_string()))
        );
    }

    #[test]
    fn test_non_numeric_y_values_are_an_error() {
        let config = line_chart("platforms", "game_count");
        let rows = vec![row(&[
            ("platforms", serde_json::json!("PC")),
            ("game_count", serde_json::json!("many")),
        ])];
        assert_eq!(
            config.render(&rows),
            Err(ChartError::NonNumericValue {
                column: "game_count".to_string(),
            })
        );
    }

    #[test]
    fn test_line_settings_carry_into_the_mark() {
        let mut config = line_chart("x", "y");
        config.kind = crate::config::ChartKind::LineChart(LineChartSettings { trendline: true });
        let spec = config.render(&[]).unwrap();
        assert_eq!(spec.mark, Mark::Line { trendline: true });
    }
}
