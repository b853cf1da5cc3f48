use std::fmt;

use serde::Serialize;

/// Dropdown value meaning "every launch site".
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the launch table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchRecord {
    pub launch_site: String,
    /// Always finite and non-negative.
    pub payload_mass_kg: f64,
    pub booster_version_category: String,
    /// 1 = success, 0 = failure.
    pub outcome_class: u8,
}

impl LaunchRecord {
    pub fn is_success(&self) -> bool {
        self.outcome_class == 1
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indices for the controls.
///
/// Built once at load time and never mutated afterwards; the dashboard shares
/// it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    /// All launches in file order.
    pub records: Vec<LaunchRecord>,
    /// Distinct launch sites in order of first appearance.
    pub launch_sites: Vec<String>,
    /// Distinct booster categories in order of first appearance.
    pub booster_categories: Vec<String>,
    pub payload_min: f64,
    pub payload_max: f64,
}

impl LaunchDataset {
    /// Build the site / booster indices from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut launch_sites: Vec<String> = Vec::new();
        let mut booster_categories: Vec<String> = Vec::new();
        let mut payload_min = f64::INFINITY;
        let mut payload_max = f64::NEG_INFINITY;

        for rec in &records {
            if !launch_sites.contains(&rec.launch_site) {
                launch_sites.push(rec.launch_site.clone());
            }
            if !booster_categories.contains(&rec.booster_version_category) {
                booster_categories.push(rec.booster_version_category.clone());
            }
            payload_min = payload_min.min(rec.payload_mass_kg);
            payload_max = payload_max.max(rec.payload_mass_kg);
        }

        if records.is_empty() {
            payload_min = 0.0;
            payload_max = 0.0;
        }

        LaunchDataset {
            records,
            launch_sites,
            booster_categories,
            payload_min,
            payload_max,
        }
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The payload range covering every record.
    pub fn full_payload_range(&self) -> PayloadRange {
        PayloadRange::new(self.payload_min, self.payload_max)
    }
}

// ---------------------------------------------------------------------------
// SiteSelector – dropdown value
// ---------------------------------------------------------------------------

/// Either every site or one named site.
///
/// A name that does not occur in the dataset is legal and simply matches no
/// records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub enum SiteSelector {
    #[default]
    All,
    Site(String),
}

impl SiteSelector {
    /// Interpret a raw dropdown value; `"ALL"` is the sentinel.
    pub fn parse(value: &str) -> Self {
        if value == ALL_SITES {
            SiteSelector::All
        } else {
            SiteSelector::Site(value.to_string())
        }
    }

    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelector::All => true,
            SiteSelector::Site(site) => record.launch_site == *site,
        }
    }

    /// Raw value as the dropdown would report it.
    pub fn value(&self) -> &str {
        match self {
            SiteSelector::All => ALL_SITES,
            SiteSelector::Site(site) => site,
        }
    }

    /// Human label shown in the dropdown.
    pub fn label(&self) -> &str {
        match self {
            SiteSelector::All => "All Sites",
            SiteSelector::Site(site) => site,
        }
    }
}

impl fmt::Display for SiteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

// ---------------------------------------------------------------------------
// PayloadRange – inclusive slider bounds
// ---------------------------------------------------------------------------

/// Inclusive payload-mass bounds in kilograms. `min <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    min: f64,
    max: f64,
}

impl PayloadRange {
    /// Build a range from two slider handles; reversed handles are swapped.
    pub fn new(a: f64, b: f64) -> Self {
        PayloadRange {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, mass: f64) -> bool {
        self.min <= mass && mass <= self.max
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] kg", self.min, self.max)
    }
}
