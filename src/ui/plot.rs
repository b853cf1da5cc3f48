use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::data::model::SiteSelector;
use crate::state::AppState;

/// Widest arc a single polygon may span; egui fills polygons as convex shapes.
const MAX_WEDGE_ANGLE: f64 = FRAC_PI_2;
/// Arc resolution: points per full turn.
const ARC_POINTS_PER_TURN: f64 = 128.0;

// ---------------------------------------------------------------------------
// Central panel: both charts stacked
// ---------------------------------------------------------------------------

pub fn charts(ui: &mut Ui, state: &AppState) {
    let height = ((ui.available_height() - 80.0) / 2.0).max(150.0);
    pie_chart(ui, state, height);
    ui.separator();
    scatter_chart(ui, state, height);
}

fn empty_note(ui: &mut Ui) {
    ui.label(RichText::new("No launches match the current selection").italics());
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// One convex piece of a pie slice, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub slice: usize,
    pub start: f64,
    pub end: f64,
}

/// Split slices into wedges of at most a quarter turn.
///
/// The first slice starts at twelve o'clock and slices run clockwise.
/// Zero and negative values produce no wedges.
pub fn pie_wedges(values: &[f64]) -> Vec<Wedge> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut wedges = Vec::new();
    let mut angle = FRAC_PI_2;
    for (slice, &value) in values.iter().enumerate() {
        if value <= 0.0 {
            continue;
        }
        let sweep = value / total * TAU;
        let pieces = (sweep / MAX_WEDGE_ANGLE).ceil().max(1.0) as usize;
        let step = sweep / pieces as f64;
        for i in 0..pieces {
            let start = angle - step * i as f64;
            wedges.push(Wedge {
                slice,
                start,
                end: start - step,
            });
        }
        angle -= sweep;
    }
    wedges
}

fn wedge_outline(wedge: &Wedge) -> Vec<[f64; 2]> {
    let sweep = (wedge.start - wedge.end).abs();
    let steps = ((sweep / TAU) * ARC_POINTS_PER_TURN).ceil().max(1.0) as usize;
    let mut outline = Vec::with_capacity(steps + 2);
    outline.push([0.0, 0.0]);
    for i in 0..=steps {
        let a = wedge.start + (wedge.end - wedge.start) * i as f64 / steps as f64;
        outline.push([a.cos(), a.sin()]);
    }
    outline
}

fn pie_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let pie = &state.pie;
    ui.heading(&pie.title);
    if pie.is_empty() {
        empty_note(ui);
        return;
    }

    let values: Vec<f64> = pie.slices.iter().map(|s| s.value).collect();
    let total = pie.total();
    let colors = match state.site {
        SiteSelector::All => &state.site_colors,
        SiteSelector::Site(_) => &state.class_colors,
    };

    Plot::new(pie.id)
        .legend(Legend::default())
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for wedge in pie_wedges(&values) {
                let slice = &pie.slices[wedge.slice];
                let color = colors.color_for(&slice.label);
                // Pieces of one slice share a name, so they share a legend entry.
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(wedge_outline(&wedge)))
                        .name(&slice.label)
                        .fill_color(color)
                        .stroke((1.0, color)),
                );
            }

            let mut angle = FRAC_PI_2;
            for slice in &pie.slices {
                let sweep = slice.value / total * TAU;
                let mid = angle - sweep / 2.0;
                angle -= sweep;
                let share = slice.value / total * 100.0;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        RichText::new(format!("{share:.1}%")).strong(),
                    )
                    .color(Color32::WHITE),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------

fn scatter_chart(ui: &mut Ui, state: &AppState, height: f32) {
    let scatter = &state.scatter;
    ui.heading(&scatter.title);
    if scatter.is_empty() {
        empty_note(ui);
        return;
    }

    Plot::new(scatter.id)
        .legend(Legend::default())
        .height(height)
        .x_axis_label(scatter.x_label)
        .y_axis_label(scatter.y_label)
        .include_x(state.payload.min())
        .include_x(state.payload.max())
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &scatter.series {
                let points: PlotPoints = series
                    .points
                    .iter()
                    .map(|p| [p.payload_mass_kg, p.outcome_class as f64])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(&series.category)
                        .color(state.booster_colors.color_for(&series.category))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep_of(wedges: &[Wedge], slice: usize) -> f64 {
        wedges
            .iter()
            .filter(|w| w.slice == slice)
            .map(|w| w.start - w.end)
            .sum()
    }

    #[test]
    fn wedges_cover_full_turn_in_proportion() {
        let wedges = pie_wedges(&[2.0, 1.0]);
        assert!((sweep_of(&wedges, 0) - TAU * 2.0 / 3.0).abs() < 1e-9);
        assert!((sweep_of(&wedges, 1) - TAU / 3.0).abs() < 1e-9);
        assert!(wedges
            .iter()
            .all(|w| w.start - w.end <= MAX_WEDGE_ANGLE + 1e-9));
    }

    #[test]
    fn wedges_are_contiguous_from_twelve_o_clock() {
        let wedges = pie_wedges(&[66.7, 33.3]);
        assert!((wedges[0].start - FRAC_PI_2).abs() < 1e-12);
        for pair in wedges.windows(2) {
            assert!((pair[0].end - pair[1].start).abs() < 1e-9);
        }
        let last = wedges.last().expect("wedges");
        assert!((last.end - (FRAC_PI_2 - TAU)).abs() < 1e-9);
    }

    #[test]
    fn whole_pie_is_split_into_quarters() {
        let wedges = pie_wedges(&[100.0]);
        assert_eq!(wedges.len(), 4);
    }

    #[test]
    fn zero_values_draw_nothing() {
        assert!(pie_wedges(&[]).is_empty());
        assert!(pie_wedges(&[0.0, 0.0]).is_empty());
        let wedges = pie_wedges(&[0.0, 5.0]);
        assert!(wedges.iter().all(|w| w.slice == 1));
    }

    #[test]
    fn outline_starts_at_centre_and_lies_on_unit_circle() {
        let wedge = Wedge {
            slice: 0,
            start: FRAC_PI_2,
            end: 0.0,
        };
        let outline = wedge_outline(&wedge);
        assert_eq!(outline[0], [0.0, 0.0]);
        for p in &outline[1..] {
            assert!(((p[0] * p[0] + p[1] * p[1]).sqrt() - 1.0).abs() < 1e-9);
        }
    }
}
