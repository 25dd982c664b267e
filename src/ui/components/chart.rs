use chrono::{Duration as ChronoDuration, Local};
use ratatui::prelude::Stylize;
use ratatui::text::Line as TextLine;
use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine},
        Block, Borders, Paragraph, Wrap,
    },
};

use crate::fetch::RatePoint;
use crate::ui::components::utils::split_vertical;

/// Display ranges offered over the fetched trailing-year series. These cut
/// what is drawn; the underlying series is never refetched for a new range.
pub const TIMEFRAMES: &[(&str, Option<ChronoDuration>)] = &[
    ("1W", Some(ChronoDuration::days(7))),
    ("1M", Some(ChronoDuration::days(30))),
    ("6M", Some(ChronoDuration::weeks(26))),
    ("1Y", Some(ChronoDuration::weeks(52))),
    ("All", None),
];

pub const DEFAULT_TIMEFRAME_INDEX: usize = 3;

const DATE_LABEL_FMT: &str = "%Y-%m-%d";
const DATE_LABEL_FMT_SHORT: &str = "%m-%d";
const DATE_LABEL_FMT_MEDIUM: &str = "%Y-%m";

pub fn render_rate_chart(
    f: &mut Frame<'_>,
    area: Rect,
    base: &str,
    target: &str,
    series: &[RatePoint],
    timeframe_index: usize,
) {
    let segments = split_vertical(area, &[Constraint::Min(3), Constraint::Length(2)]);
    let chart_area = segments[0];
    let summary_area = segments[1];

    let (label, duration) = TIMEFRAMES[timeframe_index];
    let visible = cut_to_timeframe(series, duration);

    if visible.is_empty() {
        f.render_widget(
            Paragraph::new("No historical data returned for this pair.")
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("{}/{} — {}", base, target, label)),
                ),
            chart_area,
        );
        return;
    }

    let timeframe_legend = TIMEFRAMES
        .iter()
        .enumerate()
        .map(|(idx, (lbl, _))| {
            if idx == timeframe_index {
                format!("[{}]", lbl)
            } else {
                lbl.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ");

    let first = visible.first().unwrap();
    let last = visible.last().unwrap();
    let mut highest = first;
    let mut lowest = first;
    for point in &visible[1..] {
        if point.rate > highest.rate {
            highest = point;
        }
        if point.rate < lowest.rate {
            lowest = point;
        }
    }

    let draw_series = thin_to_width(&visible, chart_area.width);

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for point in &draw_series {
        y_min = y_min.min(point.rate);
        y_max = y_max.max(point.rate);
    }
    let mut rate_range = y_max - y_min;
    if rate_range <= 0.0 {
        rate_range = (y_max.abs().max(1.0)) * 0.01;
    }

    let width_px = chart_area.width.max(1) as f64;
    let height_px = chart_area.height.max(1) as f64;

    let left_margin = 9.0;
    let right_margin = 1.0;
    let top_margin = 1.0;
    let bottom_margin = 1.0;

    let axis_x = left_margin;
    let available_width = (width_px - left_margin - right_margin).max(1.0);
    let x_scale = if draw_series.len() > 1 {
        available_width / ((draw_series.len() - 1) as f64)
    } else {
        0.0
    };
    let axis_x_end = axis_x + available_width;

    let axis_y = bottom_margin;
    let available_height = (height_px - bottom_margin - top_margin).max(1.0);
    let rate_scale = available_height / rate_range;
    let axis_y_top = axis_y + available_height;

    let coords: Vec<(f64, f64)> = draw_series
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            (
                axis_x + idx as f64 * x_scale,
                axis_y + (point.rate - y_min) * rate_scale,
            )
        })
        .collect();

    let line_color = if last.rate >= first.rate {
        Color::Green
    } else {
        Color::Red
    };

    let rate_label_x = axis_x - 1.2;
    let rate_ticks: Vec<(f64, String)> = compute_rate_ticks(y_min, y_min + rate_range, 7)
        .into_iter()
        .map(|value| {
            (
                axis_y + (value - y_min) * rate_scale,
                format!("{:.4}", value),
            )
        })
        .collect();

    let date_ticks: Vec<(f64, String)> = compute_date_ticks(&draw_series, 6)
        .into_iter()
        .map(|(idx, text)| (axis_x + idx as f64 * x_scale, text))
        .collect();

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "{}/{} — {} | {}  (←/→ cycle)",
            base, target, label, timeframe_legend
        )))
        .marker(Marker::HalfBlock)
        .x_bounds([0.0, width_px])
        .y_bounds([-1.0, height_px])
        .paint(move |ctx| {
            if coords.len() == 1 {
                let (x, y) = coords[0];
                ctx.draw(&CanvasLine {
                    x1: x - 0.5,
                    y1: y,
                    x2: x + 0.5,
                    y2: y,
                    color: line_color,
                });
            } else {
                for pair in coords.windows(2) {
                    ctx.draw(&CanvasLine {
                        x1: pair[0].0,
                        y1: pair[0].1,
                        x2: pair[1].0,
                        y2: pair[1].1,
                        color: line_color,
                    });
                }
            }

            ctx.layer();
            let axis_color = Color::DarkGray;
            ctx.draw(&CanvasLine {
                x1: axis_x,
                y1: axis_y,
                x2: axis_x_end,
                y2: axis_y,
                color: axis_color,
            });
            ctx.draw(&CanvasLine {
                x1: axis_x,
                y1: axis_y,
                x2: axis_x,
                y2: axis_y_top,
                color: axis_color,
            });

            for (coord, text) in rate_ticks.iter() {
                if *coord < axis_y - 0.001 || *coord > axis_y_top + 0.001 {
                    continue;
                }
                ctx.print(rate_label_x - 7.0, *coord, text.clone());
            }

            for (x_pos, text) in date_ticks.iter() {
                ctx.print(*x_pos, -1.0, text.clone());
            }
        });

    f.render_widget(canvas, chart_area);

    let change = if first.rate.abs() > f64::EPSILON {
        (last.rate - first.rate) / first.rate * 100.0
    } else {
        0.0
    };
    let summary = format!(
        "{} days • {} -> {} • {:+.2}%\nhigh {:.4} on {} • low {:.4} on {}",
        visible.len(),
        first.date,
        last.date,
        change,
        highest.rate,
        highest.date,
        lowest.rate,
        lowest.date,
    );
    f.render_widget(
        Paragraph::new(
            summary
                .lines()
                .map(|line| TextLine::from(line.to_string()).gray())
                .collect::<Vec<_>>(),
        )
        .wrap(Wrap { trim: true }),
        summary_area,
    );
}

/// Cut the series to the display range. When the range holds fewer than two
/// points the full series is shown instead of a degenerate chart.
fn cut_to_timeframe(series: &[RatePoint], duration: Option<ChronoDuration>) -> Vec<RatePoint> {
    let Some(duration) = duration else {
        return series.to_vec();
    };

    let cutoff = Local::now().date_naive() - duration;
    let visible: Vec<RatePoint> = series
        .iter()
        .filter(|point| point.day >= cutoff)
        .cloned()
        .collect();

    if visible.len() < 2 {
        series.to_vec()
    } else {
        visible
    }
}

/// Decimate long series to roughly what the terminal can resolve, keeping
/// order and the final point.
fn thin_to_width(series: &[RatePoint], width: u16) -> Vec<RatePoint> {
    let max_points = usize::from(width.max(1)) * 2;
    if max_points == 0 || series.len() <= max_points {
        return series.to_vec();
    }

    let stride = (series.len() + max_points - 1) / max_points;
    let mut thinned: Vec<RatePoint> = series.iter().step_by(stride).cloned().collect();
    if let (Some(last), Some(kept)) = (series.last(), thinned.last()) {
        if kept != last {
            thinned.push(last.clone());
        }
    }
    thinned
}

fn compute_rate_ticks(min: f64, max: f64, desired: usize) -> Vec<f64> {
    let desired = desired.max(2);
    if !min.is_finite() || !max.is_finite() {
        return vec![0.0, 1.0];
    }

    let mut effective_min = min;
    let mut effective_max = max.max(effective_min + f64::EPSILON);
    if (effective_max - effective_min).abs() < 1e-12 {
        let span = effective_min.abs().max(1.0) * 0.01;
        effective_min -= span / 2.0;
        effective_max += span / 2.0;
    }

    let step = (effective_max - effective_min) / (desired as f64 - 1.0);
    (0..desired)
        .map(|i| effective_min + step * i as f64)
        .collect()
}

fn compute_date_ticks(series: &[RatePoint], desired: usize) -> Vec<(usize, String)> {
    if series.is_empty() {
        return Vec::new();
    }

    let last_index = series.len() - 1;
    if last_index == 0 {
        return vec![(0, series[0].day.format(DATE_LABEL_FMT).to_string())];
    }

    let desired = desired.max(2).min(series.len());
    let step = (last_index as f64) / (desired.saturating_sub(1) as f64);
    let mut indices: Vec<usize> = (0..desired)
        .map(|i| ((i as f64 * step).round() as usize).min(last_index))
        .collect();
    indices.push(0);
    indices.push(last_index);
    indices.sort_unstable();
    indices.dedup();

    let total_days = (series[last_index].day - series[0].day).num_days().abs();
    let mid_format = if total_days > 365 {
        DATE_LABEL_FMT_MEDIUM
    } else {
        DATE_LABEL_FMT_SHORT
    };

    indices
        .into_iter()
        .map(|idx| {
            let text = if idx == 0 || idx == last_index {
                series[idx].day.format(DATE_LABEL_FMT).to_string()
            } else {
                series[idx].day.format(mid_format).to_string()
            };
            (idx, text)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::utils::DATE_FMT;

    use super::*;

    fn point_on(day: NaiveDate, rate: f64) -> RatePoint {
        RatePoint {
            date: day.format(DATE_FMT).to_string(),
            day,
            rate,
        }
    }

    fn days_ago(days: i64) -> NaiveDate {
        Local::now().date_naive() - ChronoDuration::days(days)
    }

    #[test]
    fn timeframe_cut_keeps_recent_points() {
        let series = vec![
            point_on(days_ago(300), 0.90),
            point_on(days_ago(20), 0.93),
            point_on(days_ago(3), 0.94),
        ];

        let cut = cut_to_timeframe(&series, Some(ChronoDuration::days(30)));
        assert_eq!(cut.len(), 2);
        assert_eq!(cut[0].day, days_ago(20));
    }

    #[test]
    fn degenerate_timeframe_falls_back_to_full_series() {
        let series = vec![
            point_on(days_ago(300), 0.90),
            point_on(days_ago(20), 0.93),
            point_on(days_ago(3), 0.94),
        ];

        // Only one point inside a week; the whole series is shown instead.
        let cut = cut_to_timeframe(&series, Some(ChronoDuration::days(7)));
        assert_eq!(cut.len(), 3);

        let all = cut_to_timeframe(&series, None);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn thinning_preserves_order_and_last_point() {
        let series: Vec<RatePoint> = (0..500)
            .map(|i| point_on(days_ago(500 - i), 0.9 + i as f64 * 1e-4))
            .collect();

        let thinned = thin_to_width(&series, 40);

        assert!(thinned.len() <= 81);
        assert_eq!(thinned.last(), series.last());
        for pair in thinned.windows(2) {
            assert!(pair[0].day < pair[1].day);
        }
    }

    #[test]
    fn rate_ticks_cover_the_range() {
        let ticks = compute_rate_ticks(0.90, 0.96, 7);
        assert_eq!(ticks.len(), 7);
        assert!((ticks[0] - 0.90).abs() < 1e-9);
        assert!((ticks[6] - 0.96).abs() < 1e-9);
        for pair in ticks.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn flat_series_still_gets_distinct_ticks() {
        let ticks = compute_rate_ticks(1.0, 1.0, 5);
        assert!(ticks.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn date_ticks_label_both_endpoints_in_full() {
        let series: Vec<RatePoint> = (0..90)
            .map(|i| point_on(days_ago(90 - i), 0.92))
            .collect();

        let ticks = compute_date_ticks(&series, 6);

        assert_eq!(ticks.first().unwrap().0, 0);
        assert_eq!(ticks.last().unwrap().0, series.len() - 1);
        assert_eq!(ticks.first().unwrap().1.len(), 10);
    }
}
