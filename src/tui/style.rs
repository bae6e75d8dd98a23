//! Color constants and bar scaling helpers for the TUI.

use ratatui::style::Color;

/// Accent used for the histogram bars and the enabled trigger.
pub const ACCENT: Color = Color::Rgb(100, 108, 255);
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Muted text (hints, captions, footer).
pub const MUTED: Color = Color::DarkGray;
/// Disabled trigger foreground.
pub const DISABLED: Color = Color::Gray;
/// Error panel border and heading.
pub const ERROR: Color = Color::Red;
/// Metric card values.
pub const VALUE: Color = Color::Cyan;

/// Resolution of the integer bar heights handed to the bar chart.
pub const BAR_SCALE: f64 = 1000.0;

/// Maps bar values onto integer heights proportional to the largest value.
///
/// The bar chart only takes integers; scaling keeps fractional GWh values
/// distinguishable. Negative and non-finite values draw as zero.
pub fn scale_bars(values: &[f64]) -> Vec<u64> {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![0; values.len()];
    }
    values
        .iter()
        .map(|&v| {
            if v.is_finite() && v > 0.0 {
                (v / max * BAR_SCALE).round() as u64
            } else {
                0
            }
        })
        .collect()
}

/// Column geometry of the histogram bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    pub width: u16,
    pub gap: u16,
}

/// Geometry that fits `count` bars into `columns` cells.
///
/// Bars keep a one-cell gap while each can have at least one column of its
/// own plus the gap; denser charts pack single-column bars with no gap.
pub fn bar_layout(columns: u16, count: usize) -> BarLayout {
    let per_bar = if count == 0 {
        0
    } else {
        usize::from(columns) / count
    };
    if per_bar >= 2 {
        BarLayout {
            width: u16::try_from(per_bar - 1).unwrap_or(u16::MAX),
            gap: 1,
        }
    } else {
        BarLayout { width: 1, gap: 0 }
    }
}

/// Averages runs of consecutive values so at most `columns` remain.
///
/// Values are returned unchanged when they already fit.
pub fn bin_bars(values: &[f64], columns: usize) -> Vec<f64> {
    if columns == 0 || values.len() <= columns {
        return values.to_vec();
    }
    let per_bin = values.len().div_ceil(columns);
    values
        .chunks(per_bin)
        .map(|chunk| chunk.iter().sum::<f64>() / chunk.len() as f64)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_preserves_ratios() {
        assert_eq!(
            scale_bars(&[1.0, 5.0, 9.0, 5.0, 1.0]),
            vec![111, 556, 1000, 556, 111]
        );
    }

    #[test]
    fn scale_handles_empty_and_non_positive() {
        assert!(scale_bars(&[]).is_empty());
        assert_eq!(scale_bars(&[0.0, -2.0]), vec![0, 0]);
        assert_eq!(scale_bars(&[-1.0, 2.0]), vec![0, 1000]);
    }

    #[test]
    fn layout_keeps_gaps_while_they_fit() {
        assert_eq!(bar_layout(60, 5), BarLayout { width: 11, gap: 1 });
        assert_eq!(bar_layout(118, 59), BarLayout { width: 1, gap: 1 });
    }

    #[test]
    fn dense_layout_drops_gaps() {
        assert_eq!(bar_layout(118, 60), BarLayout { width: 1, gap: 0 });
        assert_eq!(bar_layout(118, 118), BarLayout { width: 1, gap: 0 });
        assert_eq!(bar_layout(10, 0), BarLayout { width: 1, gap: 0 });
    }

    #[test]
    fn binning_averages_consecutive_values() {
        let values = [1.0, 3.0, 5.0, 7.0, 9.0];
        assert_eq!(bin_bars(&values, 5), values.to_vec());
        assert_eq!(bin_bars(&values, 2), vec![3.0, 8.0]);
        assert_eq!(bin_bars(&[2.0; 500], 118).len(), 100);
        assert!(bin_bars(&[], 10).is_empty());
    }
}
