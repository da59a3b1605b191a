// Choropleth styling for block features.
//
// Three linear ramps split at 150 and 1000 per square foot. Each feature
// gets simplestyle properties so any GeoJSON viewer draws the map without
// further setup.
use serde_json::{Map, Value};

pub const LOW_THRESHOLD: f64 = 150.0;
pub const HIGH_THRESHOLD: f64 = 1000.0;
pub const HIGH_CEILING: f64 = 10_000.0;

const FILL_OPACITY: f64 = 0.7;
const STROKE_WIDTH: u32 = 2;

type Rgb = [u8; 3];

#[derive(Debug, Clone, Copy)]
pub struct ColorRamp {
    pub min: f64,
    pub max: f64,
    stops: [Rgb; 5],
}

pub static GREENS: ColorRamp = ColorRamp {
    min: 0.0,
    max: LOW_THRESHOLD,
    stops: [
        [237, 248, 233],
        [186, 228, 179],
        [116, 196, 118],
        [49, 163, 84],
        [0, 109, 44],
    ],
};

pub static BLUES: ColorRamp = ColorRamp {
    min: LOW_THRESHOLD,
    max: HIGH_THRESHOLD,
    stops: [
        [239, 243, 255],
        [189, 215, 231],
        [107, 174, 214],
        [49, 130, 189],
        [8, 81, 156],
    ],
};

pub static REDS: ColorRamp = ColorRamp {
    min: HIGH_THRESHOLD,
    max: HIGH_CEILING,
    stops: [
        [254, 229, 217],
        [252, 174, 145],
        [251, 106, 74],
        [222, 45, 38],
        [165, 15, 21],
    ],
};

impl ColorRamp {
    /// Hex color for `value`, clamped to the ramp's range.
    pub fn color(&self, value: f64) -> String {
        let span = self.max - self.min;
        let t = if span > 0.0 && value.is_finite() {
            ((value - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let pos = t * (self.stops.len() - 1) as f64;
        let lower = (pos.floor() as usize).min(self.stops.len() - 2);
        let frac = pos - lower as f64;
        let (a, b) = (self.stops[lower], self.stops[lower + 1]);

        let mut rgb = [0u8; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            let mixed = f64::from(a[i]) + (f64::from(b[i]) - f64::from(a[i])) * frac;
            *channel = mixed.round() as u8;
        }
        format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
    }
}

pub fn ramp_for(value: f64) -> &'static ColorRamp {
    if value < LOW_THRESHOLD {
        &GREENS
    } else if value > HIGH_THRESHOLD {
        &REDS
    } else {
        &BLUES
    }
}

pub fn fill_color(value: f64) -> String {
    ramp_for(value).color(value)
}

/// Add `fill`, `fill-opacity`, `stroke` and `stroke-width` for `value`.
pub fn apply_style(properties: &mut Map<String, Value>, value: f64) {
    let color = fill_color(value);
    properties.insert("fill".into(), Value::from(color.clone()));
    properties.insert("fill-opacity".into(), Value::from(FILL_OPACITY));
    properties.insert("stroke".into(), Value::from(color));
    properties.insert("stroke-width".into(), Value::from(STROKE_WIDTH));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_tier_by_threshold() {
        assert!(std::ptr::eq(ramp_for(0.0), &GREENS));
        assert!(std::ptr::eq(ramp_for(149.9), &GREENS));
        assert!(std::ptr::eq(ramp_for(150.0), &BLUES));
        assert!(std::ptr::eq(ramp_for(1000.0), &BLUES));
        assert!(std::ptr::eq(ramp_for(1000.1), &REDS));
    }

    #[test]
    fn ramp_endpoints_and_clamping() {
        assert_eq!(GREENS.color(0.0), "#edf8e9");
        assert_eq!(GREENS.color(150.0), "#006d2c");
        assert_eq!(GREENS.color(-20.0), "#edf8e9");
        assert_eq!(REDS.color(50_000.0), "#a50f15");
        assert_eq!(BLUES.color(f64::NAN), "#eff3ff");
    }

    #[test]
    fn interpolates_between_stops() {
        // Halfway between the first two blue stops.
        let v = LOW_THRESHOLD + (HIGH_THRESHOLD - LOW_THRESHOLD) / 8.0;
        assert_eq!(BLUES.color(v), "#d6e5f3");
    }

    #[test]
    fn style_properties_are_added() {
        let mut props = Map::new();
        apply_style(&mut props, 400.0);
        assert_eq!(props["fill"], props["stroke"]);
        assert_eq!(props["fill-opacity"], Value::from(0.7));
        assert_eq!(props["stroke-width"], Value::from(2));
    }
}
