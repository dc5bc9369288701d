//! Sequential colormap for correlation values (dark for low, light for high).

const STOPS: [(f64, [u8; 3]); 5] = [
    (0.00, [3, 5, 26]),
    (0.25, [112, 31, 87]),
    (0.50, [225, 51, 66]),
    (0.75, [246, 164, 124]),
    (1.00, [250, 235, 221]),
];

/// Map `value` in `[vmin, vmax]` to an RGB triple. Out-of-range values clamp.
pub fn heat_color(value: f64, vmin: f64, vmax: f64) -> [u8; 3] {
    let t = if vmax > vmin {
        ((value - vmin) / (vmax - vmin)).clamp(0.0, 1.0)
    } else {
        1.0
    };

    for pair in STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            let mut out = [0u8; 3];
            for k in 0..3 {
                out[k] = (c0[k] as f64 + (c1[k] as f64 - c0[k] as f64) * f).round() as u8;
            }
            return out;
        }
    }
    STOPS[STOPS.len() - 1].1
}

/// Color scale bounds for a heatmap: `vmax` is pinned at 1.0.
pub fn scale_bounds(visible: Option<(f64, f64)>) -> (f64, f64) {
    let vmax = 1.0;
    match visible {
        Some((lo, _)) if lo < vmax => (lo, vmax),
        _ => (vmax - 1.0, vmax),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_of_scale_hit_first_and_last_stop() {
        assert_eq!(heat_color(-1.0, -1.0, 1.0), [3, 5, 26]);
        assert_eq!(heat_color(1.0, -1.0, 1.0), [250, 235, 221]);
        assert_eq!(heat_color(0.0, -1.0, 1.0), [225, 51, 66]);
    }

    #[test]
    fn out_of_range_clamps() {
        assert_eq!(heat_color(-5.0, 0.0, 1.0), heat_color(0.0, 0.0, 1.0));
        assert_eq!(heat_color(5.0, 0.0, 1.0), heat_color(1.0, 0.0, 1.0));
    }

    #[test]
    fn bounds_pin_vmax() {
        assert_eq!(scale_bounds(Some((-0.3, 0.9))), (-0.3, 1.0));
        assert_eq!(scale_bounds(None), (0.0, 1.0));
        assert_eq!(scale_bounds(Some((1.0, 1.0))), (0.0, 1.0));
    }
}
