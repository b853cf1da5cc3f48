use std::path::PathBuf;

use clap::Parser;

use crate::data::model::{LaunchDataset, PayloadRange, SiteSelector, ALL_SITES};

/// Command-line configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "spacex-dash")]
#[command(about = "SpaceX launch records dashboard")]
pub struct Config {
    /// Launch records file (.csv, .json or .parquet)
    #[arg(default_value = "spacex_launch_dash.csv")]
    pub data: PathBuf,

    /// Lower bound of the payload slider (kg)
    #[arg(long, default_value_t = 0.0, value_parser = non_negative_kg)]
    pub slider_min: f64,

    /// Upper bound of the payload slider (kg)
    #[arg(long, default_value_t = 10000.0, value_parser = non_negative_kg)]
    pub slider_max: f64,

    /// Payload slider step (kg)
    #[arg(long, default_value_t = 1000.0, value_parser = non_negative_kg)]
    pub slider_step: f64,

    /// Write both chart specifications as JSON to this path and exit
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Initial site selection ("ALL" or a launch site name)
    #[arg(long, default_value = ALL_SITES)]
    pub site: String,

    /// Initial lower payload bound (defaults to the lightest launch)
    #[arg(long, value_parser = non_negative_kg)]
    pub payload_min: Option<f64>,

    /// Initial upper payload bound (defaults to the heaviest launch)
    #[arg(long, value_parser = non_negative_kg)]
    pub payload_max: Option<f64>,
}

/// Parse a mass in kilograms; negative or non-finite values are rejected.
fn non_negative_kg(value: &str) -> Result<f64, String> {
    let kg: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if !kg.is_finite() || kg < 0.0 {
        return Err(format!("{value} kg is out of range (must be >= 0)"));
    }
    Ok(kg)
}

impl Config {
    pub fn site_selector(&self) -> SiteSelector {
        SiteSelector::parse(&self.site)
    }

    /// Initial payload range, filling unset bounds from the dataset.
    pub fn payload_range(&self, dataset: &LaunchDataset) -> PayloadRange {
        PayloadRange::new(
            self.payload_min.unwrap_or(dataset.payload_min),
            self.payload_max.unwrap_or(dataset.payload_max),
        )
    }

    /// Slider track bounds; widened when the data falls outside them.
    pub fn slider_bounds(&self, dataset: &LaunchDataset) -> (f64, f64) {
        let lo = self.slider_min.min(self.slider_max).min(dataset.payload_min);
        let hi = self.slider_max.max(self.slider_min).max(dataset.payload_max);
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LaunchRecord;

    fn dataset(masses: &[f64]) -> LaunchDataset {
        LaunchDataset::from_records(
            masses
                .iter()
                .map(|&m| LaunchRecord {
                    launch_site: "CCAFS LC-40".into(),
                    payload_mass_kg: m,
                    booster_version_category: "FT".into(),
                    outcome_class: 1,
                })
                .collect(),
        )
    }

    #[test]
    fn defaults_match_dashboard_layout() {
        let cfg = Config::try_parse_from(["spacex-dash"]).expect("parse");
        assert_eq!(cfg.data, PathBuf::from("spacex_launch_dash.csv"));
        assert_eq!(cfg.slider_min, 0.0);
        assert_eq!(cfg.slider_max, 10000.0);
        assert_eq!(cfg.slider_step, 1000.0);
        assert_eq!(cfg.site_selector(), SiteSelector::All);
        assert!(cfg.export.is_none());
    }

    #[test]
    fn payload_range_defaults_to_dataset_extent() {
        let ds = dataset(&[350.0, 9600.0]);
        let cfg = Config::try_parse_from(["spacex-dash", "--payload-max", "4000"]).expect("parse");
        assert_eq!(cfg.payload_range(&ds), PayloadRange::new(350.0, 4000.0));
    }

    #[test]
    fn parses_export_and_site() {
        let cfg = Config::try_parse_from([
            "spacex-dash",
            "launches.parquet",
            "--export",
            "charts.json",
            "--site",
            "KSC LC-39A",
        ])
        .expect("parse");
        assert_eq!(cfg.data, PathBuf::from("launches.parquet"));
        assert_eq!(cfg.export, Some(PathBuf::from("charts.json")));
        assert_eq!(
            cfg.site_selector(),
            SiteSelector::Site("KSC LC-39A".to_string())
        );
    }

    #[test]
    fn negative_masses_are_rejected() {
        for flag in ["--payload-min=-5", "--payload-max=-0.5", "--slider-min=-1000"] {
            assert!(
                Config::try_parse_from(["spacex-dash", flag]).is_err(),
                "{flag} should be rejected"
            );
        }
        assert!(Config::try_parse_from(["spacex-dash", "--payload-min", "heavy"]).is_err());
        let cfg = Config::try_parse_from(["spacex-dash", "--payload-min", "0"]).expect("parse");
        assert_eq!(cfg.payload_min, Some(0.0));
    }

    #[test]
    fn slider_bounds_cover_heavy_payloads() {
        let ds = dataset(&[500.0, 15600.0]);
        let cfg = Config::try_parse_from(["spacex-dash"]).expect("parse");
        assert_eq!(cfg.slider_bounds(&ds), (0.0, 15600.0));
    }
}
