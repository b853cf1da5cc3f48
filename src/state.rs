use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::aggregate::{aggregate_outcomes, filter_payload_correlation};
use crate::data::chart::{ChartSpec, PieChart, ScatterChart};
use crate::data::model::{LaunchDataset, PayloadRange, SiteSelector};

/// Component id of the site dropdown.
pub const SITE_DROPDOWN_ID: &str = "site-dropdown";
/// Component id of the payload range slider.
pub const PAYLOAD_SLIDER_ID: &str = "payload-slider";

// ---------------------------------------------------------------------------
// Control events
// ---------------------------------------------------------------------------

/// A control changed value.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SiteSelected(SiteSelector),
    PayloadRangeChanged(PayloadRange),
}

impl ControlEvent {
    /// Id of the control that emitted the event.
    pub fn control_id(&self) -> &'static str {
        match self {
            ControlEvent::SiteSelected(_) => SITE_DROPDOWN_ID,
            ControlEvent::PayloadRangeChanged(_) => PAYLOAD_SLIDER_ID,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// The dataset is shared read-only; every control change recomputes the
/// charts that depend on it from scratch.
pub struct AppState {
    pub dataset: Arc<LaunchDataset>,

    pub site: SiteSelector,
    pub payload: PayloadRange,

    /// Cached chart specs for the current control values.
    pub pie: PieChart,
    pub scatter: ScatterChart,

    /// Colours for pie slices (sites, outcome classes) and scatter series (boosters).
    pub site_colors: ColorMap,
    pub class_colors: ColorMap,
    pub booster_colors: ColorMap,

    /// Slider track bounds and step.
    pub slider_bounds: (f64, f64),
    pub slider_step: f64,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: LaunchDataset, site: SiteSelector, payload: PayloadRange) -> Self {
        let dataset = Arc::new(dataset);
        let slider_bounds = (dataset.payload_min, dataset.payload_max);
        let pie = aggregate_outcomes(&dataset, &site);
        let scatter = filter_payload_correlation(&dataset, &site, payload);
        let site_colors = ColorMap::new(&dataset.launch_sites);
        let booster_colors = ColorMap::new(&dataset.booster_categories);

        AppState {
            dataset,
            site,
            payload,
            pie,
            scatter,
            site_colors,
            class_colors: ColorMap::new(&["1", "0"]),
            booster_colors,
            slider_bounds,
            slider_step: 0.0,
            status_message: None,
        }
    }

    pub fn with_slider(mut self, bounds: (f64, f64), step: f64) -> Self {
        self.slider_bounds = bounds;
        self.slider_step = step;
        self
    }

    /// Route a control change to the handler of every chart that reads it.
    ///
    /// Returns the ids of the charts that were recomputed.
    pub fn apply(&mut self, event: ControlEvent) -> Vec<&'static str> {
        log::debug!("{} changed: {event:?}", event.control_id());
        match event {
            ControlEvent::SiteSelected(site) => {
                self.site = site;
                self.refresh_pie();
                self.refresh_scatter();
                vec![self.pie.id, self.scatter.id]
            }
            ControlEvent::PayloadRangeChanged(range) => {
                self.payload = range;
                self.refresh_scatter();
                vec![self.scatter.id]
            }
        }
    }

    /// Swap in a freshly loaded dataset, resetting the controls to its extent.
    pub fn set_dataset(&mut self, dataset: LaunchDataset) {
        let (lo, hi) = self.slider_bounds;
        self.slider_bounds = (lo.min(dataset.payload_min), hi.max(dataset.payload_max));
        self.payload = dataset.full_payload_range();
        self.site = SiteSelector::All;
        self.site_colors = ColorMap::new(&dataset.launch_sites);
        self.booster_colors = ColorMap::new(&dataset.booster_categories);
        self.dataset = Arc::new(dataset);
        self.refresh_pie();
        self.refresh_scatter();
        self.status_message = None;
    }

    /// Dropdown options: "All Sites" followed by every site in the data.
    pub fn site_options(&self) -> Vec<SiteSelector> {
        std::iter::once(SiteSelector::All)
            .chain(
                self.dataset
                    .launch_sites
                    .iter()
                    .map(|s| SiteSelector::Site(s.clone())),
            )
            .collect()
    }

    /// Both current charts, pie first.
    pub fn chart_specs(&self) -> Vec<ChartSpec> {
        vec![self.pie.clone().into(), self.scatter.clone().into()]
    }

    fn refresh_pie(&mut self) {
        self.pie = aggregate_outcomes(&self.dataset, &self.site);
        log::debug!("{}: {} slices", self.pie.id, self.pie.slices.len());
    }

    fn refresh_scatter(&mut self) {
        self.scatter = filter_payload_correlation(&self.dataset, &self.site, self.payload);
        log::debug!(
            "{}: {} points in {} series",
            self.scatter.id,
            self.scatter.point_count(),
            self.scatter.series.len()
        );
    }
}
