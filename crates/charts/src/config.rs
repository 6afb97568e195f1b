//! Chart configuration: a closed set of chart kinds, each with its own
//! statically declared settings.
//!
//! A configuration owns the query draft it plots. The draft is an explicit
//! value threaded from the caller into the engine; nothing here reads or
//! writes ambient state.

use serde::{Deserialize, Serialize};

use query_engine_translation::translation::QueryRequest;

/// One chart: where its data comes from and how to present it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default)]
    pub title: String,
    /// Result column plotted on the x axis (or used as slice labels).
    pub x: String,
    /// Result column plotted on the y axis (or used as slice values).
    pub y: String,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
    /// The query draft whose rows this chart plots.
    pub query: QueryRequest,
    #[serde(flatten)]
    pub kind: ChartKind,
}

/// The closed set of chart kinds. Each variant declares exactly the
/// settings that kind accepts; there is no dynamic lookup by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    LineChart(LineChartSettings),
    BarChart(BarChartSettings),
    PieChart(PieChartSettings),
    ScatterPlot(ScatterPlotSettings),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LineChartSettings {
    /// Overlay a least-squares trendline.
    #[serde(default)]
    pub trendline: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BarChartSettings {
    #[serde(default)]
    pub horizontal: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PieChartSettings {
    #[serde(default)]
    pub donut: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScatterPlotSettings {
    /// Point radius in display units.
    #[serde(default)]
    pub point_size: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_configs_deserialize_by_type_tag() {
        let config: ChartConfig = serde_json::from_value(serde_json::json!({
            "title": "Ratings over time",
            "x": "first_release_date",
            "y": "avg_rating",
            "type": "line_chart",
            "trendline": true,
            "query": {
                "fields": ["first_release_date"],
                "aggregation": {"avg_rating": {"field": "rating", "function": "AVG"}},
                "groupBy": ["first_release_date"]
            }
        }))
        .unwrap();

        match config.kind {
            ChartKind::LineChart(settings) => assert!(settings.trendline),
            other => panic!("expected a line chart, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_chart_types_are_rejected() {
        let result: Result<ChartConfig, _> = serde_json::from_value(serde_json::json!({
            "x": "a",
            "y": "b",
            "type": "sparkline",
            "query": {"fields": ["*"]}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_do_not_bleed_across_kinds() {
        // 'trendline' belongs to line charts only
        let result: Result<ChartConfig, _> = serde_json::from_value(serde_json::json!({
            "x": "a",
            "y": "b",
            "type": "bar_chart",
            "trendline": true,
            "query": {"fields": ["*"]}
        }));
        assert!(result.is_err());
    }
}
