//! Value processing for the choropleth maps.
//!
//! This crate turns the values of one (indicator, date) selection into
//! the numbers the map page shows: statistical color ranges with their
//! annotation, descriptive statistics and polygon fill colors.

/// Descriptive statistics and candidate color ranges.
pub mod stats {
    use serde::{Deserialize, Serialize};

    /// A closed interval of values, `low <= high`.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct ValueRange {
        pub low: f64,
        pub high: f64,
    }

    impl ValueRange {
        pub fn width(&self) -> f64 {
            self.high - self.low
        }
    }

    /// The three candidate ranges offered by the map page.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ScaleOptions {
        /// `[min, max]`
        pub full: ValueRange,
        /// `[P5, P95]`
        pub percentile: ValueRange,
        /// `mean ± 2σ`, clipped to `[min, max]`
        pub std_dev: ValueRange,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct DescriptiveStats {
        pub count: usize,
        pub min: f64,
        pub max: f64,
        pub mean: f64,
        pub median: f64,
        /// Sample standard deviation (n - 1), 0 for a single value.
        pub std_dev: f64,
    }

    /// Keep the finite values, dropping nulls and NaN/inf.
    pub fn finite_values<I>(values: I) -> Vec<f64>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        values.into_iter().flatten().filter(|v| v.is_finite()).collect()
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }

    /// Percentile of sorted data, linear interpolation between closest ranks.
    ///
    /// `p` is in `[0, 100]`. Returns `None` for empty input.
    pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
        if sorted.is_empty() {
            return None;
        }
        let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = rank.ceil() as usize;
        let fraction = rank - lower as f64;
        Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
    }

    /// Percentile of unsorted data.
    pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
        percentile_sorted(&sorted(values), p)
    }

    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Sample standard deviation; 0 when fewer than two values.
    pub fn std_dev(values: &[f64]) -> Option<f64> {
        let mean = mean(values)?;
        if values.len() < 2 {
            return Some(0.0);
        }
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Some((sum_sq / (values.len() - 1) as f64).sqrt())
    }

    pub fn describe(values: &[f64]) -> Option<DescriptiveStats> {
        let sorted = sorted(values);
        let (min, max) = (*sorted.first()?, *sorted.last()?);
        Some(DescriptiveStats {
            count: sorted.len(),
            min,
            max,
            mean: mean(&sorted)?,
            median: percentile_sorted(&sorted, 50.0)?,
            std_dev: std_dev(&sorted)?,
        })
    }

    /// Compute the three candidate ranges; `None` when no finite value remains.
    pub fn scale_options(values: &[f64]) -> Option<ScaleOptions> {
        let sorted = sorted(values);
        let (min, max) = (*sorted.first()?, *sorted.last()?);
        let mean = mean(&sorted)?;
        let sigma = std_dev(&sorted)?;
        Some(ScaleOptions {
            full: ValueRange { low: min, high: max },
            percentile: ValueRange {
                low: percentile_sorted(&sorted, 5.0)?,
                high: percentile_sorted(&sorted, 95.0)?,
            },
            std_dev: ValueRange {
                low: min.max(mean - 2.0 * sigma),
                high: max.min(mean + 2.0 * sigma),
            },
        })
    }

}

/// Statistical range modes and their map annotation.
pub mod range {
    use crate::stats::{scale_options, ValueRange};
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    /// Annotation shown when a selection has rows but no usable value.
    pub const AUTOMATIC_NOTE: &str = "Échelle automatique";
    /// Annotation shown when the selection has no rows.
    pub const NO_DATA_NOTE: &str = "Pas de données";

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub enum RangeMode {
        #[default]
        FullRange,
        Percentile,
        StdDev,
    }

    impl RangeMode {
        pub const ALL: [RangeMode; 3] = [RangeMode::FullRange, RangeMode::Percentile, RangeMode::StdDev];

        pub fn label(&self) -> &'static str {
            match self {
                RangeMode::FullRange => "Échelle complète (min-max)",
                RangeMode::Percentile => "Percentiles (5-95%)",
                RangeMode::StdDev => "Moyenne ± 2 écarts-types",
            }
        }

        /// Annotation for a computed range, two decimals.
        pub fn note(&self, range: &ValueRange) -> String {
            match self {
                RangeMode::FullRange => format!("min={:.2}, max={:.2}", range.low, range.high),
                RangeMode::Percentile => format!(
                    "5e percentile={:.2}, 95e percentile={:.2}",
                    range.low, range.high
                ),
                RangeMode::StdDev => format!("moyenne ± 2σ: [{:.2}, {:.2}]", range.low, range.high),
            }
        }
    }

    impl fmt::Display for RangeMode {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.label())
        }
    }

    impl FromStr for RangeMode {
        type Err = anyhow::Error;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            RangeMode::ALL
                .into_iter()
                .find(|mode| mode.label() == s)
                .ok_or_else(|| anyhow::anyhow!("Unknown range mode: {}", s))
        }
    }

    /// The color range applied to a map, with its annotation.
    #[derive(Debug, Clone, PartialEq)]
    pub struct ColorRange {
        /// `None` lets the color scale fall back to the data extent.
        pub bounds: Option<ValueRange>,
        pub note: String,
    }

    impl ColorRange {
        /// Range for a selection that matched no rows.
        pub fn no_data() -> Self {
            Self {
                bounds: None,
                note: NO_DATA_NOTE.to_string(),
            }
        }

        /// Range for the finite values of a non-empty selection.
        pub fn resolve(values: &[f64], mode: RangeMode) -> Self {
            let options = match scale_options(values) {
                Some(options) => options,
                None => {
                    log::debug!("range: no finite value, automatic scale");
                    return Self {
                        bounds: None,
                        note: AUTOMATIC_NOTE.to_string(),
                    };
                }
            };
            let bounds = match mode {
                RangeMode::FullRange => options.full,
                RangeMode::Percentile => options.percentile,
                RangeMode::StdDev => options.std_dev,
            };
            Self {
                note: mode.note(&bounds),
                bounds: Some(bounds),
            }
        }

        /// Resolve for a selection of `row_count` rows.
        pub fn for_selection(row_count: usize, values: &[f64], mode: RangeMode) -> Self {
            if row_count == 0 {
                Self::no_data()
            } else {
                Self::resolve(values, mode)
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_full_range_note() {
            let range = ColorRange::resolve(&[1.0, 2.5, 10.0], RangeMode::FullRange);
            assert_eq!(range.bounds, Some(ValueRange { low: 1.0, high: 10.0 }));
            assert_eq!(range.note, "min=1.00, max=10.00");
        }

        #[test]
        fn test_percentile_note() {
            let range = ColorRange::resolve(&[1.0, 2.0, 3.0, 4.0, 5.0], RangeMode::Percentile);
            assert_eq!(range.note, "5e percentile=1.20, 95e percentile=4.80");
        }

        #[test]
        fn test_std_dev_note_is_clipped() {
            let range = ColorRange::resolve(&[0.0, 10.0], RangeMode::StdDev);
            assert_eq!(range.bounds, Some(ValueRange { low: 0.0, high: 10.0 }));
            assert_eq!(range.note, "moyenne ± 2σ: [0.00, 10.00]");
        }

        #[test]
        fn test_empty_values_fall_back_to_automatic() {
            let range = ColorRange::for_selection(3, &[], RangeMode::Percentile);
            assert!(range.bounds.is_none());
            assert_eq!(range.note, AUTOMATIC_NOTE);
        }

        #[test]
        fn test_no_rows_is_no_data() {
            let range = ColorRange::for_selection(0, &[], RangeMode::FullRange);
            assert!(range.bounds.is_none());
            assert_eq!(range.note, NO_DATA_NOTE);
        }

        #[test]
        fn test_mode_from_label() {
            for mode in RangeMode::ALL {
                assert_eq!(mode.label().parse::<RangeMode>().unwrap(), mode);
            }
            assert!("Quantiles".parse::<RangeMode>().is_err());
        }
    }
}

/// Sequential color schemes and value-to-color mapping.
pub mod color {
    use crate::stats::ValueRange;
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    type Rgb = (u8, u8, u8);

    const BLUES: &[Rgb] = &[
        (247, 251, 255),
        (222, 235, 247),
        (198, 219, 239),
        (158, 202, 225),
        (107, 174, 214),
        (66, 146, 198),
        (33, 113, 181),
        (8, 81, 156),
        (8, 48, 107),
    ];

    const GREENS: &[Rgb] = &[
        (247, 252, 245),
        (229, 245, 224),
        (199, 233, 192),
        (161, 217, 155),
        (116, 196, 118),
        (65, 171, 93),
        (35, 139, 69),
        (0, 109, 44),
        (0, 68, 27),
    ];

    const DARKMINT: &[Rgb] = &[
        (210, 251, 212),
        (165, 219, 194),
        (123, 188, 176),
        (85, 156, 158),
        (58, 124, 137),
        (35, 93, 114),
        (18, 63, 90),
    ];

    const ICE: &[Rgb] = &[
        (3, 5, 18),
        (25, 25, 51),
        (44, 42, 87),
        (58, 60, 125),
        (62, 83, 160),
        (62, 109, 178),
        (72, 134, 187),
        (89, 159, 196),
        (114, 184, 205),
        (149, 207, 216),
        (192, 229, 232),
        (234, 252, 253),
    ];

    /// Fill color of territories without a value.
    pub const MISSING_COLOR: &str = "#d9d9d9";

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub enum ColorScheme {
        #[default]
        Blues,
        Greens,
        Darkmint,
        Ice,
    }

    impl ColorScheme {
        pub const ALL: [ColorScheme; 4] = [
            ColorScheme::Blues,
            ColorScheme::Greens,
            ColorScheme::Darkmint,
            ColorScheme::Ice,
        ];

        pub fn name(&self) -> &'static str {
            match self {
                ColorScheme::Blues => "Blues",
                ColorScheme::Greens => "Greens",
                ColorScheme::Darkmint => "Darkmint",
                ColorScheme::Ice => "ice",
            }
        }

        fn stops(&self) -> &'static [Rgb] {
            match self {
                ColorScheme::Blues => BLUES,
                ColorScheme::Greens => GREENS,
                ColorScheme::Darkmint => DARKMINT,
                ColorScheme::Ice => ICE,
            }
        }

        /// Color at position `t` in `[0, 1]` of the scheme.
        pub fn sample(&self, t: f64) -> String {
            let stops = self.stops();
            let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
            let pos = t * (stops.len() - 1) as f64;
            let lower = pos.floor() as usize;
            let upper = pos.ceil() as usize;
            let fraction = pos - lower as f64;
            let (a, b) = (stops[lower], stops[upper]);
            let mix = |x: u8, y: u8| -> u8 { (x as f64 + (y as f64 - x as f64) * fraction).round() as u8 };
            format!("#{:02x}{:02x}{:02x}", mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
        }
    }

    impl fmt::Display for ColorScheme {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    impl FromStr for ColorScheme {
        type Err = anyhow::Error;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            ColorScheme::ALL
                .into_iter()
                .find(|scheme| scheme.name().eq_ignore_ascii_case(s.trim()))
                .ok_or_else(|| anyhow::anyhow!("Unknown color scheme: {}", s))
        }
    }

    /// A scheme bound to a value domain.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ColorScale {
        pub scheme: ColorScheme,
        pub reversed: bool,
        pub domain: ValueRange,
    }

    impl ColorScale {
        /// Bind a scheme to `bounds`, or to the extent of `values` when no
        /// bounds were computed. `None` when neither is available.
        pub fn new(
            scheme: ColorScheme,
            reversed: bool,
            bounds: Option<ValueRange>,
            values: &[f64],
        ) -> Option<Self> {
            let domain = match bounds {
                Some(bounds) => bounds,
                None => {
                    let mut finite = values.iter().copied().filter(|v| v.is_finite());
                    let first = finite.next()?;
                    let (low, high) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
                    ValueRange { low, high }
                }
            };
            Some(Self {
                scheme,
                reversed,
                domain,
            })
        }

        /// Scale name with the `_r` suffix when reversed.
        pub fn name(&self) -> String {
            if self.reversed {
                format!("{}_r", self.scheme.name())
            } else {
                self.scheme.name().to_string()
            }
        }

        /// Position of a value in `[0, 1]`; values outside the domain are clamped.
        pub fn position(&self, value: f64) -> f64 {
            let width = self.domain.width();
            let t = if width > 0.0 {
                ((value - self.domain.low) / width).clamp(0.0, 1.0)
            } else {
                0.5
            };
            if self.reversed {
                1.0 - t
            } else {
                t
            }
        }

        pub fn color_for(&self, value: Option<f64>) -> String {
            match value.filter(|v| v.is_finite()) {
                Some(v) => self.scheme.sample(self.position(v)),
                None => MISSING_COLOR.to_string(),
            }
        }

        /// Evenly spaced `(value, color)` pairs for the legend, low to high.
        pub fn legend_stops(&self, count: usize) -> Vec<(f64, String)> {
            let count = count.max(2);
            (0..count)
                .map(|i| {
                    let value = self.domain.low + self.domain.width() * i as f64 / (count - 1) as f64;
                    (value, self.color_for(Some(value)))
                })
                .collect()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn blues(reversed: bool) -> ColorScale {
            ColorScale::new(
                ColorScheme::Blues,
                reversed,
                Some(ValueRange { low: 0.0, high: 10.0 }),
                &[],
            )
            .unwrap()
        }

        #[test]
        fn test_sample_endpoints() {
            assert_eq!(ColorScheme::Blues.sample(0.0), "#f7fbff");
            assert_eq!(ColorScheme::Blues.sample(1.0), "#08306b");
            assert_eq!(ColorScheme::Greens.sample(1.0), "#00441b");
        }

        #[test]
        fn test_values_are_clamped() {
            let scale = blues(false);
            assert_eq!(scale.color_for(Some(-5.0)), scale.color_for(Some(0.0)));
            assert_eq!(scale.color_for(Some(50.0)), scale.color_for(Some(10.0)));
        }

        #[test]
        fn test_reversed_scale() {
            let scale = blues(true);
            assert_eq!(scale.name(), "Blues_r");
            assert_eq!(scale.color_for(Some(0.0)), "#08306b");
            assert_eq!(scale.color_for(Some(10.0)), "#f7fbff");
        }

        #[test]
        fn test_missing_value_color() {
            assert_eq!(blues(false).color_for(None), MISSING_COLOR);
        }

        #[test]
        fn test_automatic_domain_from_values() {
            let scale = ColorScale::new(ColorScheme::Ice, false, None, &[3.0, -1.0, 8.0]).unwrap();
            assert_eq!(scale.domain, ValueRange { low: -1.0, high: 8.0 });
            assert!(ColorScale::new(ColorScheme::Ice, false, None, &[]).is_none());
        }

        #[test]
        fn test_scheme_from_name() {
            assert_eq!("ice".parse::<ColorScheme>().unwrap(), ColorScheme::Ice);
            assert_eq!("Darkmint".parse::<ColorScheme>().unwrap(), ColorScheme::Darkmint);
            assert!("Rainbow".parse::<ColorScheme>().is_err());
        }

        #[test]
        fn test_legend_stops() {
            let stops = blues(false).legend_stops(5);
            assert_eq!(stops.len(), 5);
            assert_eq!(stops[0].0, 0.0);
            assert_eq!(stops[4].0, 10.0);
        }
    }
}
