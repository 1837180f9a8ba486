//! Display formatting for telemetry values

/// Threshold above which values are scaled down to kilo units
const KILO: f64 = 1000.0;

/// Formats a value for display: magnitudes of 1000 or more are scaled
/// down by 1000 and shown with one decimal place, smaller values are
/// shown as integers.
pub fn format_value(value: f64) -> String {
    if value.abs() >= KILO {
        format!("{:.1}", value / KILO)
    } else {
        format!("{:.0}", value)
    }
}

/// Unit prefix matching [`format_value`]: "k" once the value has been
/// scaled, empty otherwise.
pub fn unit_prefix(value: f64) -> &'static str {
    if value.abs() >= KILO {
        "k"
    } else {
        ""
    }
}

/// Formats a value together with its unit, e.g. `1400.0, "W"` becomes
/// `1.4 kW` and `275.0, "W"` becomes `275 W`.
pub fn format_with_unit(value: f64, unit: &str) -> String {
    format!("{} {}{}", format_value(value), unit_prefix(value), unit)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn small_values_render_as_integers() {
        assert_eq!(format_value(275.0), "275");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(999.4), "999");
        assert_eq!(format_value(-275.0), "-275");
    }

    #[test]
    fn large_values_scale_to_kilo() {
        assert_eq!(format_value(1400.0), "1.4");
        assert_eq!(format_value(1000.0), "1.0");
        assert_eq!(format_value(11500.0), "11.5");
        assert_eq!(format_value(-1400.0), "-1.4");
    }

    #[test]
    fn prefix_appears_at_threshold() {
        assert_eq!(unit_prefix(999.9), "");
        assert_eq!(unit_prefix(1000.0), "k");
        assert_eq!(unit_prefix(-1000.0), "k");
    }

    #[test]
    fn unit_rendering() {
        assert_eq!(format_with_unit(1400.0, "W"), "1.4 kW");
        assert_eq!(format_with_unit(275.0, "W"), "275 W");
        assert_eq!(format_with_unit(3700.0, "Wh"), "3.7 kWh");
        assert_eq!(format_with_unit(6.2, "A"), "6 A");
    }

    proptest! {
        #[test]
        fn prefix_matches_scaling(value in -100_000.0..100_000.0f64) {
            let scaled = value.abs() >= 1000.0;
            prop_assert_eq!(unit_prefix(value) == "k", scaled);
        }

        #[test]
        fn formatted_value_parses_back(value in -100_000.0..100_000.0f64) {
            let text = format_value(value);
            let parsed: f64 = text.parse().unwrap();
            let restored = if unit_prefix(value) == "k" {
                parsed * 1000.0
            } else {
                parsed
            };
            // One decimal in kilo units or whole base units, so the
            // rounding error is bounded by half a display step.
            let step = if unit_prefix(value) == "k" { 100.0 } else { 1.0 };
            prop_assert!((restored - value).abs() <= step / 2.0 + 1e-9);
        }

        #[test]
        fn scaled_values_have_one_decimal(value in 1000.0..100_000.0f64) {
            let text = format_value(value);
            let (_, decimals) = text.split_once('.').unwrap();
            prop_assert_eq!(decimals.len(), 1);
        }
    }
}
