//! Chart Plotter Module
//! Creates the dashboard charts using egui_plot.

use crate::dashboard::Thresholds;
use crate::data::schema::CONCENTRATION_UNIT;
use crate::stats::{MonthMean, SeasonDistribution, YearMean};
use egui::Color32;
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, HLine, Legend, Line, LineStyle, Plot,
    PlotPoints, Points,
};
use std::ops::RangeInclusive;

pub const YEAR_BAR_COLOR: Color32 = Color32::from_rgb(74, 144, 226); // #4A90E2
pub const MONTH_COLOR: Color32 = Color32::from_rgb(80, 200, 120); // #50C878
pub const WHO_COLOR: Color32 = Color32::from_rgb(220, 20, 60);
pub const NATIONAL_COLOR: Color32 = Color32::from_rgb(255, 165, 0);

/// Season palette, cycled for labels beyond the known four.
pub const PALETTE: [Color32; 6] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Fixed value axis of the seasonal boxplot.
pub const SEASON_DOMAIN: (f64, f64) = (0.0, 100.0);

const YEARLY_HEIGHT: f32 = 400.0;
const MONTHLY_HEIGHT: f32 = 350.0;
const SEASON_HEIGHT: f32 = 400.0;

/// Builds dashboard charts from precomputed aggregates.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the season at `index` in display order.
    pub fn season_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Axis formatter that labels whole-number positions with `labels[i]`.
    fn category_formatter(
        labels: Vec<String>,
    ) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String + 'static {
        move |mark, _range| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        }
    }

    fn value_label(name: &str, value: f64) -> String {
        if name.is_empty() {
            format!("{value:.2} {CONCENTRATION_UNIT}")
        } else {
            format!("{name}\n{value:.2} {CONCENTRATION_UNIT}")
        }
    }

    /// Clamp a value into the boxplot domain.
    pub fn clamp_to_domain(value: f64) -> f64 {
        value.clamp(SEASON_DOMAIN.0, SEASON_DOMAIN.1)
    }

    /// Annual mean bars with WHO and national limit rules.
    pub fn draw_yearly_chart(ui: &mut egui::Ui, yearly: &[YearMean], thresholds: Thresholds) {
        let labels: Vec<String> = yearly.iter().map(|y| y.year.to_string()).collect();

        let bars: Vec<Bar> = yearly
            .iter()
            .enumerate()
            .filter_map(|(i, y)| {
                let mean = y.mean?;
                Some(
                    Bar::new(i as f64, mean)
                        .name(y.year.to_string())
                        .width(0.6)
                        .fill(YEAR_BAR_COLOR),
                )
            })
            .collect();

        Plot::new("yearly_means")
            .height(YEARLY_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label(format!("PM10 ({CONCENTRATION_UNIT})"))
            .include_y(0.0)
            .include_y(thresholds.national * 1.1)
            .x_axis_formatter(Self::category_formatter(labels))
            .label_formatter(|_name, _point| String::new())
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(YEAR_BAR_COLOR)
                        .name("Annual mean")
                        .element_formatter(Box::new(|bar, _chart| {
                            Self::value_label(&bar.name, bar.value)
                        })),
                );
                plot_ui.hline(
                    HLine::new(thresholds.who)
                        .color(WHO_COLOR)
                        .width(2.0)
                        .style(LineStyle::Dashed { length: 5.0 })
                        .name(format!("WHO ({} {CONCENTRATION_UNIT})", thresholds.who)),
                );
                plot_ui.hline(
                    HLine::new(thresholds.national)
                        .color(NATIONAL_COLOR)
                        .width(2.0)
                        .name(format!("SA NAAQS ({} {CONCENTRATION_UNIT})", thresholds.national)),
                );
            });
    }

    /// Monthly mean bars in calendar order.
    pub fn draw_monthly_bar(ui: &mut egui::Ui, monthly: &[MonthMean]) {
        let labels: Vec<String> = monthly.iter().map(|m| Self::short_month(&m.month)).collect();

        let bars: Vec<Bar> = monthly
            .iter()
            .enumerate()
            .filter_map(|(i, m)| {
                Some(
                    Bar::new(i as f64, m.mean?)
                        .name(&m.month)
                        .width(0.6)
                        .fill(MONTH_COLOR),
                )
            })
            .collect();

        Plot::new("monthly_bar")
            .height(MONTHLY_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Month")
            .y_axis_label("PM10")
            .include_y(0.0)
            .x_axis_formatter(Self::category_formatter(labels))
            .label_formatter(|_name, _point| String::new())
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(MONTH_COLOR)
                        .element_formatter(Box::new(|bar, _chart| {
                            Self::value_label(&bar.name, bar.value)
                        })),
                );
            });
    }

    /// Monthly means as a line with point markers.
    pub fn draw_monthly_line(ui: &mut egui::Ui, monthly: &[MonthMean]) {
        let labels: Vec<String> = monthly.iter().map(|m| Self::short_month(&m.month)).collect();
        let names: Vec<String> = monthly.iter().map(|m| m.month.clone()).collect();

        let points: Vec<[f64; 2]> = monthly
            .iter()
            .enumerate()
            .filter_map(|(i, m)| Some([i as f64, m.mean?]))
            .collect();

        Plot::new("monthly_line")
            .height(MONTHLY_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Month")
            .y_axis_label("PM10")
            .x_axis_formatter(Self::category_formatter(labels))
            .label_formatter(move |_name, point| {
                let idx = point.x.round();
                let month = if idx >= 0.0 {
                    names.get(idx as usize).map(String::as_str).unwrap_or_default()
                } else {
                    ""
                };
                Self::value_label(month, point.y)
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(MONTH_COLOR)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(MONTH_COLOR),
                );
            });
    }

    /// Seasonal min-max boxplot on a fixed 0-100 axis.
    pub fn draw_season_boxplot(ui: &mut egui::Ui, seasons: &[SeasonDistribution]) {
        let labels: Vec<String> = seasons.iter().map(|s| s.season.clone()).collect();

        Plot::new("season_boxplot")
            .height(SEASON_HEIGHT)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_drag(false)
            .x_axis_label("Season")
            .y_axis_label(format!("PM10 ({CONCENTRATION_UNIT})"))
            .include_y(SEASON_DOMAIN.0)
            .include_y(SEASON_DOMAIN.1)
            .x_axis_formatter(Self::category_formatter(labels))
            .label_formatter(|_name, _point| String::new())
            .show(ui, |plot_ui| {
                for (i, dist) in seasons.iter().enumerate() {
                    let Some(stats) = dist.box_stats else {
                        continue;
                    };
                    let color = Self::season_color(i);

                    let spread = BoxSpread::new(
                        Self::clamp_to_domain(stats.min),
                        Self::clamp_to_domain(stats.q1),
                        Self::clamp_to_domain(stats.median),
                        Self::clamp_to_domain(stats.q3),
                        Self::clamp_to_domain(stats.max),
                    );
                    let elem = BoxElem::new(i as f64, spread)
                        .name(&dist.season)
                        .box_width(0.4)
                        .whisker_width(0.0)
                        .fill(color.gamma_multiply(0.6))
                        .stroke(egui::Stroke::new(1.5, color));

                    plot_ui.box_plot(
                        BoxPlot::new(vec![elem])
                            .name(&dist.season)
                            .element_formatter(Box::new(move |elem, _plot| {
                                format!(
                                    "{}\nmax {:.2}\nQ3 {:.2}\nmedian {:.2}\nQ1 {:.2}\nmin {:.2}",
                                    elem.name,
                                    stats.max,
                                    stats.q3,
                                    stats.median,
                                    stats.q1,
                                    stats.min
                                )
                            })),
                    );
                }
            });
    }

    /// Three-letter axis label for a month name.
    pub fn short_month(month: &str) -> String {
        month.chars().take(3).collect()
    }
}
