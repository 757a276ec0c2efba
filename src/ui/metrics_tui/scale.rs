//! Axis limits and unit labels for gauge values.
//!
//! Two scaling laws live here. [`scale_unit`] formats a value with a binary
//! K/M/G suffix and any precision, for display next to a gauge title.
//! [`limit_and_label`] rounds a value up to a "round" axis ceiling and gives
//! it a label that always fits in [`LABEL_WIDTH`] cells. Labels for very
//! large values are truncated and can therefore be ambiguous.

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// Width of the axis limit label next to a gauge
pub const LABEL_WIDTH: usize = 3;

/// Axis ceiling chosen for a value, with its display label
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLimit {
    pub limit: f64,
    pub label: String,
}

/// Format a value with a binary unit suffix.
///
/// Thresholds are checked from the largest down and only the first match
/// scales the value.
pub fn scale_unit(value: f64, precision: usize) -> String {
    if value > GIB {
        format!("{:.*}G", precision, value / GIB)
    } else if value > MIB {
        format!("{:.*}M", precision, value / MIB)
    } else if value > KIB {
        format!("{:.*}K", precision, value / KIB)
    } else {
        format!("{:.*}", precision, value)
    }
}

/// Round `value` up to an axis limit and build its fixed-width label.
///
/// Below 1000 the steps are decimal (1, 10, 100); above that they are
/// binary (KiB, MiB, GiB buckets). The returned limit is never below the
/// value. Negative input is treated as zero.
pub fn limit_and_label(value: f64) -> AxisLimit {
    let value = value.max(0.0);

    let (limit, text) = if value <= 10.0 {
        let limit = value.ceil();
        (limit, format!("{:.0}", limit))
    } else if value <= 100.0 {
        let limit = (value / 10.0).ceil() * 10.0;
        (limit, format!("{:.0}", limit))
    } else if value <= 1000.0 {
        let limit = (value / 100.0).ceil() * 100.0;
        (limit, format!("{:.0}", limit))
    } else if value <= 1_024_000.0 {
        let limit = (value / KIB).ceil() * KIB;
        (limit, format!("{:.0}K", limit / KIB))
    } else if value <= 1_024_000_000.0 {
        let limit = (value / MIB).ceil() * MIB;
        (limit, format!("{:.0}M", limit / MIB))
    } else {
        let limit = (value / GIB).ceil() * GIB;
        (limit, format!("{:.0}G", limit / GIB))
    };

    AxisLimit {
        limit,
        label: format!("{:<width$.width$}", text, width = LABEL_WIDTH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_unit_suffixes() {
        assert_eq!(scale_unit(2048.0, 1), "2.0K");
        assert_eq!(scale_unit(512.0, 0), "512");
        assert_eq!(scale_unit(1.5, 2), "1.50");
        assert_eq!(scale_unit(3.0 * MIB, 0), "3M");
        assert_eq!(scale_unit(1.5 * GIB, 2), "1.50G");
    }

    #[test]
    fn test_scale_unit_boundaries_are_exclusive() {
        assert_eq!(scale_unit(1024.0, 0), "1024");
        assert_eq!(scale_unit(MIB, 0), "1024K");
        assert_eq!(scale_unit(GIB, 0), "1024M");
        assert_eq!(scale_unit(GIB + 1.0, 0), "1G");
    }

    #[test]
    fn test_scale_unit_exactly_one_suffix() {
        for v in [0.0, 1.0, 1025.0, 5.0e5, 2.0e6, 9.0e8, 3.0e9, 5.0e12] {
            let text = scale_unit(v, 1);
            let suffixes = text.chars().filter(|c| "KMG".contains(*c)).count();
            let expected = if v > KIB { 1 } else { 0 };
            assert_eq!(suffixes, expected, "{} -> {}", v, text);
        }
    }

    #[test]
    fn test_small_values_use_decimal_steps() {
        assert_eq!(limit_and_label(0.0), AxisLimit { limit: 0.0, label: "0  ".into() });
        assert_eq!(limit_and_label(3.2).limit, 4.0);
        assert_eq!(limit_and_label(10.0).label, "10 ");
        assert_eq!(limit_and_label(42.0).limit, 50.0);
        assert_eq!(limit_and_label(420.0), AxisLimit { limit: 500.0, label: "500".into() });
    }

    #[test]
    fn test_large_values_use_binary_steps() {
        let k = limit_and_label(1500.0);
        assert_eq!(k.limit, 2048.0);
        assert_eq!(k.label, "2K ");

        let m = limit_and_label(3_500_000.0);
        assert_eq!(m.limit, 4.0 * MIB);
        assert_eq!(m.label, "4M ");

        let g = limit_and_label(1.5 * GIB);
        assert_eq!(g.limit, 2.0 * GIB);
        assert_eq!(g.label, "2G ");
    }

    #[test]
    fn test_label_truncated_to_field_width() {
        let k = limit_and_label(1_000_000.0);
        assert_eq!(k.limit, 977.0 * KIB);
        assert_eq!(k.label, "977");

        let g = limit_and_label(100.0 * GIB);
        assert_eq!(g.label, "100");
        assert_eq!(g.label.len(), LABEL_WIDTH);
    }

    #[test]
    fn test_limit_is_a_ceiling() {
        let mut v = 0.0;
        while v < 1.0e13 {
            let axis = limit_and_label(v);
            assert!(axis.limit >= v, "limit {} below value {}", axis.limit, v);
            assert_eq!(axis.label.chars().count(), LABEL_WIDTH);
            v = v * 1.7 + 0.3;
        }
    }

    #[test]
    fn test_negative_treated_as_zero() {
        assert_eq!(limit_and_label(-5.0).limit, 0.0);
        assert_eq!(limit_and_label(-5.0).label, "0  ");
    }
}
