use std::collections::BTreeMap;

use super::chart::{
    PieChart, PieSlice, ScatterChart, ScatterPoint, ScatterSeries, PIE_CHART_ID,
    SCATTER_CHART_ID,
};
use super::model::{LaunchDataset, PayloadRange, SiteSelector};

// ---------------------------------------------------------------------------
// Outcome aggregation (pie chart)
// ---------------------------------------------------------------------------

/// Compute the outcome pie for a site selection.
///
/// * `All` → successful launches counted per site (raw counts, not shares).
/// * one site → share of each outcome class at that site, in percent.
///
/// An empty subset (including an unknown site) yields no slices.
pub fn aggregate_outcomes(dataset: &LaunchDataset, site: &SiteSelector) -> PieChart {
    match site {
        SiteSelector::All => success_counts_by_site(dataset),
        SiteSelector::Site(name) => class_shares_for_site(dataset, name),
    }
}

fn success_counts_by_site(dataset: &LaunchDataset) -> PieChart {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for rec in dataset.records.iter().filter(|r| r.is_success()) {
        *counts.entry(rec.launch_site.as_str()).or_default() += 1;
    }

    // Keep the dropdown's site order rather than alphabetical.
    let slices = dataset
        .launch_sites
        .iter()
        .filter_map(|site| {
            counts.get(site.as_str()).map(|&n| PieSlice {
                label: site.clone(),
                value: n as f64,
            })
        })
        .collect();

    PieChart {
        id: PIE_CHART_ID,
        title: "All Launch Site Outcomes".to_string(),
        slices,
    }
}

fn class_shares_for_site(dataset: &LaunchDataset, site: &str) -> PieChart {
    let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
    for rec in dataset.records.iter().filter(|r| r.launch_site == site) {
        *counts.entry(rec.outcome_class).or_default() += 1;
    }
    let total: usize = counts.values().sum();

    let mut by_count: Vec<(u8, usize)> = counts.into_iter().collect();
    // Largest share first; BTreeMap order makes ties fall back to ascending class.
    by_count.sort_by(|a, b| b.1.cmp(&a.1));

    let slices = if total == 0 {
        Vec::new()
    } else {
        by_count
            .into_iter()
            .map(|(class, n)| PieSlice {
                label: class.to_string(),
                value: n as f64 / total as f64 * 100.0,
            })
            .collect()
    };

    PieChart {
        id: PIE_CHART_ID,
        title: format!("Total Successful Outcomes for {site}"),
        slices,
    }
}

// ---------------------------------------------------------------------------
// Payload correlation (scatter chart)
// ---------------------------------------------------------------------------

/// Select launches inside `payload` (inclusive) at the chosen site and group
/// them by booster version category.
///
/// Series appear in first-appearance order of their category within the
/// filtered launches; points keep dataset order.
pub fn filter_payload_correlation(
    dataset: &LaunchDataset,
    site: &SiteSelector,
    payload: PayloadRange,
) -> ScatterChart {
    let mut series: Vec<ScatterSeries> = Vec::new();

    for rec in dataset
        .records
        .iter()
        .filter(|r| payload.contains(r.payload_mass_kg) && site.matches(r))
    {
        let point = ScatterPoint {
            payload_mass_kg: rec.payload_mass_kg,
            outcome_class: rec.outcome_class,
            launch_site: rec.launch_site.clone(),
        };
        match series
            .iter_mut()
            .find(|s| s.category == rec.booster_version_category)
        {
            Some(existing) => existing.points.push(point),
            None => series.push(ScatterSeries {
                category: rec.booster_version_category.clone(),
                points: vec![point],
            }),
        }
    }

    let title = match site {
        SiteSelector::All => "Correlation between Payload and Success for all Sites".to_string(),
        SiteSelector::Site(name) => format!("Correlation between Payload and Success for {name}"),
    };

    ScatterChart {
        id: SCATTER_CHART_ID,
        title,
        x_label: "Payload Mass (kg)",
        y_label: "class",
        series,
    }
}
