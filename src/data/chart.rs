use serde::Serialize;

/// Component id of the outcome pie chart.
pub const PIE_CHART_ID: &str = "success-pie-chart";
/// Component id of the payload / outcome scatter chart.
pub const SCATTER_CHART_ID: &str = "success-payload-scatter-chart";

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// One category of the outcome pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    /// A success count for the all-sites view, a percentage for a single site.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub id: &'static str,
    pub title: String,
    pub slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome_class: u8,
    pub launch_site: String,
}

/// All points sharing one booster version category (one colour).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub category: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub id: &'static str,
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn point_count(&self) -> usize {
        self.points().count()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Every point, series by series.
    pub fn points(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.series.iter().flat_map(|s| s.points.iter())
    }
}

// ---------------------------------------------------------------------------
// ChartSpec – what the renderer consumes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie(PieChart),
    Scatter(ScatterChart),
}

impl ChartSpec {
    pub fn id(&self) -> &'static str {
        match self {
            ChartSpec::Pie(c) => c.id,
            ChartSpec::Scatter(c) => c.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Pie(c) => &c.title,
            ChartSpec::Scatter(c) => &c.title,
        }
    }
}

impl From<PieChart> for ChartSpec {
    fn from(chart: PieChart) -> Self {
        ChartSpec::Pie(chart)
    }
}

impl From<ScatterChart> for ChartSpec {
    fn from(chart: ScatterChart) -> Self {
        ChartSpec::Scatter(chart)
    }
}
