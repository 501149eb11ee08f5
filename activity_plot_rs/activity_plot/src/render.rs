//! Overlay renderers. Each takes the chart by value, records its drawing
//! calls, and hands the chart back for further composition or [`crate::show`].

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::chart::{AxisLabels, Chart, Role};
use crate::segments::{check_lengths, flatten};
use crate::PlotError;

const DISTANCE_LABEL: &str = "Distance (m)";
const ALTITUDE_LABEL: &str = "Altitude (m)";

/// Color every distance/altitude pair by hill membership.
///
/// A pair is drawn in the hill color only when both endpoints belong to some
/// hill segment; everything else gets the background color.
pub fn render_hills<S: AsRef<[usize]>>(
    mut chart: Chart,
    altitude: &[f64],
    distance: &[f64],
    hills: &[S],
) -> Result<Chart, PlotError> {
    check_lengths("altitude", altitude.len(), "distance", distance.len())?;
    let members = flatten(hills);
    members.check_bounds(distance.len())?;

    let style = chart.style().clone();
    let mut hill_pairs = 0usize;
    for j in 1..distance.len() {
        let from = (distance[j - 1], altitude[j - 1]);
        let to = (distance[j], altitude[j]);
        if members.contains(j - 1) && members.contains(j) {
            chart.line(from, to, style.hill_color, style.line_width, Role::Hill);
            hill_pairs += 1;
        } else {
            chart.line(
                from,
                to,
                style.background_color,
                style.line_width,
                Role::Background,
            );
        }
    }

    chart.set_labels(AxisLabels::new("Detected hills", DISTANCE_LABEL, ALTITUDE_LABEL));
    debug!(
        samples = distance.len(),
        hills = hills.len(),
        hill_pairs,
        "rendered hill overlay"
    );
    Ok(chart)
}

/// Plot the in-interval indicator against elapsed time.
///
/// The first sample is always "No", even when a segment lists index 0.
pub fn render_intervals<S: AsRef<[usize]>>(
    mut chart: Chart,
    timestamps: &[DateTime<Utc>],
    intervals: &[S],
) -> Result<Chart, PlotError> {
    let members = flatten(intervals);
    members.check_bounds(timestamps.len())?;

    let style = chart.style().clone();
    let elapsed = elapsed_seconds(timestamps);
    let indicator: Vec<u8> = (0..timestamps.len())
        .map(|i| u8::from(i > 0 && members.contains(i)))
        .collect();

    for i in 1..elapsed.len() {
        if indicator[i - 1] != indicator[i] {
            continue;
        }
        let from = (elapsed[i - 1], f64::from(indicator[i - 1]));
        let to = (elapsed[i], f64::from(indicator[i]));
        if indicator[i] == 1 {
            chart.line(
                from,
                to,
                style.interval_color,
                style.interval_line_width,
                Role::InInterval,
            );
        } else {
            chart.line(
                from,
                to,
                style.rest_color,
                style.interval_line_width,
                Role::OutOfInterval,
            );
        }
    }

    chart.set_labels(
        AxisLabels::new("Intervals", "Time (s)", "Interval")
            .with_y_ticks(&[(0.0, "No"), (1.0, "Yes")]),
    );
    debug!(
        samples = timestamps.len(),
        intervals = intervals.len(),
        "rendered interval overlay"
    );
    Ok(chart)
}

/// Scatter every altitude/distance sample with no segment coloring.
pub fn render_basic_map(
    mut chart: Chart,
    altitude: &[f64],
    distance: &[f64],
) -> Result<Chart, PlotError> {
    check_lengths("altitude", altitude.len(), "distance", distance.len())?;

    let style = chart.style().clone();
    for (&x, &y) in distance.iter().zip(altitude) {
        chart.point((x, y), style.point_color, style.point_radius, Role::Sample);
    }

    chart.set_labels(AxisLabels::new(
        "Topographic map of cycling activity",
        DISTANCE_LABEL,
        ALTITUDE_LABEL,
    ));
    debug!(samples = distance.len(), "rendered basic map");
    Ok(chart)
}

/// Seconds since the first timestamp, at millisecond resolution.
pub fn elapsed_seconds(timestamps: &[DateTime<Utc>]) -> Vec<f64> {
    let Some(&base) = timestamps.first() else {
        return Vec::new();
    };
    timestamps
        .iter()
        .map(|t| (*t - base).num_milliseconds() as f64 / 1000.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::DrawCommand;
    use crate::style::{ChartStyle, Rgb};
    use chrono::{Duration, TimeZone};

    fn seconds_apart(count: i64) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2023, 5, 14, 8, 30, 0).unwrap();
        (0..count).map(|s| start + Duration::seconds(s)).collect()
    }

    fn roles(chart: &Chart) -> Vec<Role> {
        chart.commands().iter().map(|c| c.role()).collect()
    }

    #[test]
    fn hill_pair_needs_both_endpoints() {
        let chart = render_hills(
            Chart::default(),
            &[0.0, 10.0, 20.0],
            &[0.0, 1.0, 2.0],
            &[vec![1, 2]],
        )
        .unwrap();
        assert_eq!(roles(&chart), vec![Role::Background, Role::Hill]);
        assert_eq!(chart.commands()[0].color(), Rgb::BLUE);
        assert_eq!(chart.commands()[1].color(), Rgb::RED);
        match chart.commands()[1] {
            DrawCommand::Line { from, to, .. } => {
                assert_eq!(from, (1.0, 10.0));
                assert_eq!(to, (2.0, 20.0));
            }
            other => panic!("expected a line, got {:?}", other),
        }
    }

    #[test]
    fn no_hills_is_all_background() {
        let hills: Vec<Vec<usize>> = Vec::new();
        let chart = render_hills(
            Chart::default(),
            &[5.0, 6.0, 4.0, 3.0],
            &[0.0, 10.0, 20.0, 30.0],
            &hills,
        )
        .unwrap();
        assert_eq!(chart.line_count(), 3);
        assert!(roles(&chart).iter().all(|r| *r == Role::Background));
    }

    #[test]
    fn adjacent_hills_join_across_boundary() {
        // 2 ends one hill and 3 starts the next, so 2->3 is a hill pair too.
        let chart = render_hills(
            Chart::default(),
            &[0.0; 6],
            &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            &[vec![1, 2], vec![3, 4]],
        )
        .unwrap();
        assert_eq!(
            roles(&chart),
            vec![
                Role::Background,
                Role::Hill,
                Role::Hill,
                Role::Hill,
                Role::Background
            ]
        );
    }

    #[test]
    fn hills_use_style_colors() {
        let style = ChartStyle {
            hill_color: Rgb(10, 20, 30),
            background_color: Rgb(40, 50, 60),
            line_width: 7,
            ..ChartStyle::default()
        };
        let chart =
            render_hills(Chart::new(style), &[1.0, 2.0, 3.0], &[0.0, 1.0, 2.0], &[vec![0, 1]])
                .unwrap();
        assert_eq!(chart.commands()[0].color(), Rgb(10, 20, 30));
        assert_eq!(chart.commands()[1].color(), Rgb(40, 50, 60));
        assert!(matches!(chart.commands()[0], DrawCommand::Line { width: 7, .. }));
    }

    #[test]
    fn hill_labels() {
        let chart = render_hills(Chart::default(), &[1.0], &[0.0], &[vec![0]]).unwrap();
        assert_eq!(chart.line_count(), 0);
        let labels = chart.labels();
        assert_eq!(labels.title.as_deref(), Some("Detected hills"));
        assert_eq!(labels.x_label, "Distance (m)");
        assert_eq!(labels.y_label, "Altitude (m)");
        assert!(labels.y_ticks.is_none());
    }

    #[test]
    fn hills_reject_mismatched_series() {
        let err = render_hills(Chart::default(), &[1.0, 2.0], &[0.0], &[vec![0]]).unwrap_err();
        assert!(matches!(
            err,
            PlotError::LengthMismatch {
                left: "altitude",
                left_len: 2,
                right: "distance",
                right_len: 1
            }
        ));
    }

    #[test]
    fn hills_reject_out_of_range_index() {
        let err =
            render_hills(Chart::default(), &[1.0, 2.0], &[0.0, 1.0], &[vec![1, 2]]).unwrap_err();
        assert!(matches!(err, PlotError::InvalidIndex { index: 2, len: 2 }));
    }

    #[test]
    fn interval_indicator_and_colors() {
        let chart = render_intervals(Chart::default(), &seconds_apart(4), &[vec![2, 3]]).unwrap();
        let lines: Vec<_> = chart
            .commands()
            .iter()
            .map(|c| match *c {
                DrawCommand::Line {
                    from, to, color, width, ..
                } => (from, to, color, width),
                other => panic!("expected a line, got {:?}", other),
            })
            .collect();
        assert_eq!(
            lines,
            vec![
                ((0.0, 0.0), (1.0, 0.0), Rgb::BLUE, 3),
                ((2.0, 1.0), (3.0, 1.0), Rgb::RED, 3),
            ]
        );
    }

    #[test]
    fn first_sample_is_never_in_interval() {
        let chart =
            render_intervals(Chart::default(), &seconds_apart(3), &[vec![0, 1, 2]]).unwrap();
        // 0 reads as "No", so only 1->2 connects.
        assert_eq!(roles(&chart), vec![Role::InInterval]);
    }

    #[test]
    fn interval_labels_are_categorical() {
        let intervals: Vec<Vec<usize>> = Vec::new();
        let chart = render_intervals(Chart::default(), &seconds_apart(1), &intervals).unwrap();
        assert_eq!(chart.line_count(), 0);
        let labels = chart.labels();
        assert_eq!(labels.title.as_deref(), Some("Intervals"));
        assert_eq!(labels.x_label, "Time (s)");
        assert_eq!(labels.y_label, "Interval");
        assert_eq!(
            labels.y_ticks,
            Some(vec![(0.0, "No".to_string()), (1.0, "Yes".to_string())])
        );
    }

    #[test]
    fn intervals_reject_out_of_range_index() {
        let err =
            render_intervals(Chart::default(), &seconds_apart(3), &[vec![2, 5]]).unwrap_err();
        assert!(matches!(err, PlotError::InvalidIndex { index: 5, len: 3 }));
    }

    #[test]
    fn elapsed_keeps_millisecond_precision() {
        let start = Utc.with_ymd_and_hms(2023, 5, 14, 8, 30, 0).unwrap();
        let stamps = vec![
            start,
            start + Duration::milliseconds(1500),
            start + Duration::seconds(90),
        ];
        assert_eq!(elapsed_seconds(&stamps), vec![0.0, 1.5, 90.0]);
        assert!(elapsed_seconds(&[]).is_empty());
    }

    #[test]
    fn basic_map_is_points_only() {
        let chart =
            render_basic_map(Chart::default(), &[100.0, 101.5, 99.0], &[0.0, 5.0, 10.0]).unwrap();
        assert_eq!(chart.point_count(), 3);
        assert_eq!(chart.line_count(), 0);
        assert_eq!(
            chart.commands()[1],
            DrawCommand::Point {
                at: (5.0, 101.5),
                color: Rgb::BLUE,
                radius: 2,
                role: Role::Sample,
            }
        );
        assert_eq!(
            chart.labels().title.as_deref(),
            Some("Topographic map of cycling activity")
        );
    }

    #[test]
    fn basic_map_single_sample() {
        let chart = render_basic_map(Chart::default(), &[42.0], &[0.0]).unwrap();
        assert_eq!(chart.commands().len(), 1);
    }

    #[test]
    fn renders_accumulate_on_one_chart() {
        let chart = render_basic_map(Chart::default(), &[1.0, 2.0], &[0.0, 1.0]).unwrap();
        let chart = render_hills(chart, &[1.0, 2.0], &[0.0, 1.0], &[vec![0, 1]]).unwrap();
        assert_eq!(chart.point_count(), 2);
        assert_eq!(chart.line_count(), 1);
        assert_eq!(chart.labels().title.as_deref(), Some("Detected hills"));
    }
}
