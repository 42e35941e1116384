// Color scale for normalized metric values.
//
// Values live on a symmetric [-3, +3] scale. Zero and above take the green
// branch, below zero the red branch; intensity grows linearly with magnitude
// and saturates at 3. Missing values get a fixed neutral gray.

/// Magnitude at which a color is fully saturated.
pub const SCALE_LIMIT: f64 = 3.0;

/// Color for a missing value.
pub const NEUTRAL: Rgb = Rgb::new(128, 128, 128);

/// Channel value of the dominant channel at zero intensity.
const DOMINANT_FLOOR: f64 = 140.0;
/// Channel value of the two muted channels at zero intensity.
const MUTED_CEILING: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

/// Which side of the scale a value falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Zero or above.
    Positive,
    Negative,
    /// Missing or NaN.
    Neutral,
}

pub fn polarity(value: Option<f64>) -> Polarity {
    match value {
        Some(v) if v.is_nan() => Polarity::Neutral,
        Some(v) if v >= 0.0 => Polarity::Positive,
        Some(_) => Polarity::Negative,
        None => Polarity::Neutral,
    }
}

/// Clamp a value onto the color scale. Only used for color and bar length;
/// labels keep the true value.
pub fn clamp_to_scale(value: f64) -> f64 {
    value.clamp(-SCALE_LIMIT, SCALE_LIMIT)
}

/// Map a value to its bar color.
pub fn color_for(value: Option<f64>) -> Rgb {
    let v = match value {
        Some(v) if !v.is_nan() => v,
        _ => return NEUTRAL,
    };

    let t = clamp_to_scale(v).abs() / SCALE_LIMIT;
    let dominant = channel(DOMINANT_FLOOR + (255.0 - DOMINANT_FLOOR) * t);
    let muted = channel(MUTED_CEILING * (1.0 - t));

    if v >= 0.0 {
        Rgb::new(muted, dominant, muted)
    } else {
        Rgb::new(dominant, muted, muted)
    }
}

fn channel(x: f64) -> u8 {
    x.round().clamp(0.0, 255.0) as u8
}
