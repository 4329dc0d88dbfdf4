//! Pure per-channel math for the photometric steps.
//!
//! These functions are separated from the backend so they can be unit tested
//! without decoding images. Tone curves are precomputed into 256-entry lookup
//! tables; the backend maps every color channel through them. Every output is
//! rounded and clamped to `0..=255`, never wrapped.

/// Lookup table mapping an 8-bit channel value to its adjusted value.
pub type ChannelLut = [u8; 256];

/// Round and clamp a channel value computed in the 0–255 domain.
#[inline]
pub fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value + 0.5).clamp(0.0, 255.0) as u8
}

fn build_lut(f: impl Fn(f64) -> f64) -> ChannelLut {
    let mut lut = [0u8; 256];
    for (i, out) in lut.iter_mut().enumerate() {
        *out = clamp_channel(f(i as f64));
    }
    lut
}

/// `255 · (v/255)^(1/gamma)`. Gamma must be positive.
pub fn gamma_lut(gamma: f64) -> ChannelLut {
    let exponent = 1.0 / gamma;
    build_lut(|v| (v / 255.0).powf(exponent) * 255.0)
}

/// Linear stretch around mid-grey. `delta` is clamped to -100..=100;
/// -100 collapses every value to mid-grey.
pub fn contrast_lut(delta: i32) -> ChannelLut {
    let factor = 1.0 + f64::from(delta.clamp(-100, 100)) / 100.0;
    build_lut(|v| ((v / 255.0 - 0.5) * factor + 0.5) * 255.0)
}

/// Constant shift of `255 · delta/100`. `delta` is clamped to -100..=100.
pub fn brightness_lut(delta: i32) -> ChannelLut {
    let shift = 255.0 * f64::from(delta.clamp(-100, 100)) / 100.0;
    build_lut(|v| v + shift)
}

/// Multiplier applied to HSL saturation. `delta` is clamped to -100..=500.
pub fn saturation_factor(delta: i32) -> f64 {
    1.0 + f64::from(delta.clamp(-100, 500)) / 100.0
}

/// Scale the HSL saturation of one RGB pixel.
pub fn saturate(rgb: [u8; 3], factor: f64) -> [u8; 3] {
    let (h, s, l) = rgb_to_hsl(
        f64::from(rgb[0]) / 255.0,
        f64::from(rgb[1]) / 255.0,
        f64::from(rgb[2]) / 255.0,
    );
    let (r, g, b) = hsl_to_rgb(h, (s * factor).clamp(0.0, 1.0), l);
    [
        clamp_channel(r * 255.0),
        clamp_channel(g * 255.0),
        clamp_channel(b * 255.0),
    ]
}

/// Unsharp combine: push the original away from its blurred copy.
#[inline]
pub fn sharpen_channel(original: u8, blurred: u8) -> u8 {
    let o = i16::from(original);
    let b = i16::from(blurred);
    (2 * o - b).clamp(0, 255) as u8
}

#[inline]
pub fn invert_channel(value: u8) -> u8 {
    255 - value
}

/// RGB in 0..=1 → (hue, saturation, lightness), all in 0..=1.
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h / 6.0, s, l)
}

/// Inverse of [`rgb_to_hsl`].
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    (
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
