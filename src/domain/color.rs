//! Color parsing and WCAG contrast mathematics.
//!
//! Colors are parsed from the forms commonly found in computed styles
//! (`#RGB`, `#RRGGBB`, `rgb(r, g, b)`, `rgba(r, g, b, a)`). All contrast
//! calculations follow the WCAG 2.1 definitions of relative luminance and
//! contrast ratio.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

/// Matches `rgb(r, g, b)` and `rgba(r, g, b, a)`. The alpha component is
/// accepted and ignored; contrast is defined over opaque colors.
static RGB_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[0-9.]+\s*)?\)$")
        .expect("rgb pattern is valid")
});

/// An opaque sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorValue {
    red: u8,
    green: u8,
    blue: u8,
}

/// Errors that can occur when parsing a color string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseColorError {
    /// The input is not recognisable hex or rgb syntax.
    #[error("unrecognised color '{0}': expected #RGB, #RRGGBB, or rgb(r, g, b)")]
    Syntax(String),

    /// A channel in an `rgb()` expression is outside 0–255.
    #[error("color channel out of range in '{0}': {1}")]
    Channel(String, String),
}

impl ColorValue {
    /// Create a color from explicit channel values.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// A grayscale color with all three channels set to `value`.
    #[must_use]
    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Pure white (`#ffffff`).
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Pure black (`#000000`).
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// The red channel.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// The green channel.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// The blue channel.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// The WCAG relative luminance of this color, in `[0, 1]`.
    ///
    /// Channels are linearized with the sRGB transfer function before being
    /// combined with the standard coefficients.
    #[must_use]
    pub fn relative_luminance(&self) -> f64 {
        let r = linearize(self.red);
        let g = linearize(self.green);
        let b = linearize(self.blue);
        0.2126f64.mul_add(r, 0.7152f64.mul_add(g, 0.0722 * b))
    }
}

/// Linearize an 8-bit sRGB channel.
fn linearize(channel: u8) -> f64 {
    let v = f64::from(channel) / 255.0;
    if v <= 0.039_28 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for ColorValue {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ParseColorError::Syntax(s.to_string()));
        }

        if let Some(captures) = RGB_PATTERN.captures(trimmed) {
            let mut channels = [0_u8; 3];
            for (slot, capture) in channels.iter_mut().zip(captures.iter().skip(1)) {
                let digits = capture.expect("capture group is not optional").as_str();
                *slot = digits.parse().map_err(|_| {
                    ParseColorError::Channel(s.to_string(), digits.to_string())
                })?;
            }
            return Ok(Self::new(channels[0], channels[1], channels[2]));
        }

        Err(ParseColorError::Syntax(s.to_string()))
    }
}

/// Parse a bare 3- or 6-digit hex triplet (no leading `#`).
fn parse_hex(hex: &str) -> Option<ColorValue> {
    // Guard before slicing: rejects non-hex input and keeps the byte
    // slices below on character boundaries for multibyte input.
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded = match hex.len() {
        3 => hex
            .chars()
            .flat_map(|c| [c, c])
            .collect::<String>(),
        6 => hex.to_string(),
        _ => return None,
    };

    let red = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let green = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let blue = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some(ColorValue::new(red, green, blue))
}

/// The WCAG text-size category that selects the applicable thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextCategory {
    /// Body-size text. AA requires 4.5:1, AAA requires 7:1.
    #[default]
    Normal,
    /// Large text (≥ 18px, or ≥ 14px at bold weight). AA requires 3:1,
    /// AAA requires 4.5:1.
    Large,
}

impl TextCategory {
    /// Classify text from its computed font size (px) and weight.
    #[must_use]
    pub fn from_style(font_size_px: f64, font_weight: u16) -> Self {
        if font_size_px >= 18.0 || (font_size_px >= 14.0 && font_weight >= 700) {
            Self::Large
        } else {
            Self::Normal
        }
    }

    /// The minimum ratio for AA conformance at this size.
    #[must_use]
    pub const fn aa_threshold(self) -> f64 {
        match self {
            Self::Normal => 4.5,
            Self::Large => 3.0,
        }
    }

    /// The minimum ratio for AAA conformance at this size.
    #[must_use]
    pub const fn aaa_threshold(self) -> f64 {
        match self {
            Self::Normal => 7.0,
            Self::Large => 4.5,
        }
    }
}

impl fmt::Display for TextCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal text"),
            Self::Large => write!(f, "large text"),
        }
    }
}

/// The outcome of a contrast evaluation for one foreground/background pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastResult {
    /// The contrast ratio, bounded to `[1, 21]`.
    pub ratio: f64,
    /// Whether the ratio meets the AA threshold for the text category.
    pub is_aa_compliant: bool,
    /// Whether the ratio meets the AAA threshold for the text category.
    pub is_aaa_compliant: bool,
    /// The AA threshold that applied.
    pub min_required_ratio: f64,
    /// A one-line human-readable verdict.
    pub message: String,
}

/// The contrast ratio between two colors, bounded to `[1, 21]`.
///
/// Symmetric in its arguments: the lighter color always contributes the
/// numerator.
#[must_use]
pub fn contrast_ratio(a: ColorValue, b: ColorValue) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let ratio = (la.max(lb) + 0.05) / (la.min(lb) + 0.05);
    ratio.clamp(1.0, 21.0)
}

/// Evaluate a foreground/background pair against the WCAG thresholds for the
/// given text category.
#[must_use]
pub fn check_contrast(
    foreground: ColorValue,
    background: ColorValue,
    category: TextCategory,
) -> ContrastResult {
    let ratio = contrast_ratio(foreground, background);
    let is_aa_compliant = ratio >= category.aa_threshold();
    let is_aaa_compliant = ratio >= category.aaa_threshold();

    let message = if is_aaa_compliant {
        format!("contrast {ratio:.2}:1 meets AA and AAA for {category}")
    } else if is_aa_compliant {
        format!("contrast {ratio:.2}:1 meets AA (but not AAA) for {category}")
    } else {
        format!(
            "contrast {ratio:.2}:1 is below the AA minimum {:.1}:1 for {category}",
            category.aa_threshold()
        )
    };

    ContrastResult {
        ratio,
        is_aa_compliant,
        is_aaa_compliant,
        min_required_ratio: category.aa_threshold(),
        message,
    }
}

/// Find a grayscale color meeting `target_ratio` against `background`.
///
/// When the background is closer to white, the search runs over dark
/// candidates and returns the *lightest* gray still meeting the ratio; when
/// it is closer to black, the search runs over light candidates and returns
/// the *darkest* gray still meeting it. The contrast of a gray against a
/// fixed background is monotone in the channel value on either side of the
/// background's luminance, so a binary search over the integer channel
/// converges; it terminates once the interval narrows to width ≤ 1.
///
/// Returns `None` if no grayscale color can reach the target (for example a
/// high ratio against a mid-gray background).
#[must_use]
pub fn find_contrasting_color(background: ColorValue, target_ratio: f64) -> Option<ColorValue> {
    let ratio_of = |value: u8| contrast_ratio(ColorValue::gray(value), background);

    let darken = ratio_of(0) >= ratio_of(255);

    if darken {
        // Dark-on-light: ratio decreases as the candidate lightens. Find the
        // largest channel value still meeting the target.
        if ratio_of(0) < target_ratio {
            return None;
        }
        let (mut lo, mut hi) = (0_u8, 255_u8);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if ratio_of(mid) >= target_ratio {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(ColorValue::gray(lo))
    } else {
        // Light-on-dark: ratio increases as the candidate lightens. Find the
        // smallest channel value meeting the target.
        if ratio_of(255) < target_ratio {
            return None;
        }
        let (mut lo, mut hi) = (0_u8, 255_u8);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if ratio_of(mid) >= target_ratio {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Some(ColorValue::gray(hi))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("#ffffff", ColorValue::WHITE; "lowercase hex white")]
    #[test_case("#FFFFFF", ColorValue::WHITE; "uppercase hex white")]
    #[test_case("#000000", ColorValue::BLACK; "hex black")]
    #[test_case("#fff", ColorValue::WHITE; "shorthand white")]
    #[test_case("#a1b", ColorValue::new(0xaa, 0x11, 0xbb); "shorthand expands per digit")]
    #[test_case("#777777", ColorValue::gray(0x77); "mid gray")]
    #[test_case("rgb(255, 255, 255)", ColorValue::WHITE; "rgb white")]
    #[test_case("rgb(0,0,0)", ColorValue::BLACK; "rgb no spaces")]
    #[test_case("RGB(12, 34, 56)", ColorValue::new(12, 34, 56); "rgb case insensitive")]
    #[test_case("rgba(10, 20, 30, 0.5)", ColorValue::new(10, 20, 30); "rgba alpha ignored")]
    #[test_case("  #123456  ", ColorValue::new(0x12, 0x34, 0x56); "surrounding whitespace")]
    fn parses_valid_colors(input: &str, expected: ColorValue) {
        assert_eq!(input.parse::<ColorValue>().unwrap(), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("#"; "bare hash")]
    #[test_case("#12345"; "five hex digits")]
    #[test_case("#gggggg"; "non hex digits")]
    #[test_case("#aéaé"; "multibyte six byte candidate")]
    #[test_case("#ééé"; "multibyte three char candidate")]
    #[test_case("red"; "named colors unsupported")]
    #[test_case("rgb(1, 2)"; "missing channel")]
    #[test_case("hsl(0, 0%, 0%)"; "hsl unsupported")]
    fn rejects_invalid_syntax(input: &str) {
        assert!(matches!(
            input.parse::<ColorValue>(),
            Err(ParseColorError::Syntax(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_channel() {
        let err = "rgb(300, 0, 0)".parse::<ColorValue>().unwrap_err();
        assert!(matches!(err, ParseColorError::Channel(_, _)));
    }

    #[test]
    fn display_round_trips() {
        let color = ColorValue::new(0x12, 0xab, 0xef);
        assert_eq!(color.to_string(), "#12abef");
        assert_eq!(color.to_string().parse::<ColorValue>().unwrap(), color);
    }

    #[test]
    fn identical_colors_have_unit_ratio() {
        let ratio = contrast_ratio(ColorValue::WHITE, ColorValue::WHITE);
        assert!((ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn black_on_white_is_maximal() {
        let ratio = contrast_ratio(ColorValue::BLACK, ColorValue::WHITE);
        assert!((ratio - 21.0).abs() < 0.01);
    }

    #[test]
    fn ratio_is_symmetric() {
        let a = ColorValue::new(0x33, 0x66, 0x99);
        let b = ColorValue::new(0xf0, 0xe0, 0xd0);
        assert!((contrast_ratio(a, b) - contrast_ratio(b, a)).abs() < 1e-12);
    }

    #[test]
    fn ratio_stays_in_bounds_for_arbitrary_pairs() {
        let samples = [
            ColorValue::BLACK,
            ColorValue::WHITE,
            ColorValue::gray(0x77),
            ColorValue::new(255, 0, 0),
            ColorValue::new(0, 255, 0),
            ColorValue::new(0, 0, 255),
            ColorValue::new(1, 2, 3),
        ];
        for a in samples {
            for b in samples {
                let ratio = contrast_ratio(a, b);
                assert!((1.0..=21.0).contains(&ratio), "{a} vs {b} gave {ratio}");
            }
        }
    }

    #[test_case(17.9, 400, TextCategory::Normal; "just under large size")]
    #[test_case(18.0, 400, TextCategory::Large; "at large size")]
    #[test_case(14.0, 700, TextCategory::Large; "bold at fourteen")]
    #[test_case(14.0, 400, TextCategory::Normal; "regular at fourteen")]
    #[test_case(13.9, 700, TextCategory::Normal; "bold under fourteen")]
    fn classifies_text_size(size: f64, weight: u16, expected: TextCategory) {
        assert_eq!(TextCategory::from_style(size, weight), expected);
    }

    #[test]
    fn boundary_gray_on_white_fails_aa() {
        // #777777 on white is ≈4.48:1, just under the 4.5 threshold.
        let result = check_contrast(
            ColorValue::gray(0x77),
            ColorValue::WHITE,
            TextCategory::Normal,
        );
        assert!(result.ratio > 4.4 && result.ratio < 4.5);
        assert!(!result.is_aa_compliant);
        assert!(!result.is_aaa_compliant);
        assert!((result.min_required_ratio - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn boundary_gray_passes_as_large_text() {
        let result = check_contrast(
            ColorValue::gray(0x77),
            ColorValue::WHITE,
            TextCategory::Large,
        );
        assert!(result.is_aa_compliant);
        assert!(!result.is_aaa_compliant);
    }

    #[test]
    fn aaa_implies_aa() {
        let samples = [
            (ColorValue::BLACK, ColorValue::WHITE),
            (ColorValue::gray(0x44), ColorValue::WHITE),
            (ColorValue::gray(0x77), ColorValue::WHITE),
            (ColorValue::WHITE, ColorValue::gray(0x30)),
        ];
        for (fg, bg) in samples {
            for category in [TextCategory::Normal, TextCategory::Large] {
                let result = check_contrast(fg, bg, category);
                if result.is_aaa_compliant {
                    assert!(result.is_aa_compliant, "{fg} on {bg}");
                }
            }
        }
    }

    #[test]
    fn finds_boundary_gray_against_white() {
        let found = find_contrasting_color(ColorValue::WHITE, 4.5).unwrap();
        assert_eq!(found.red(), found.green());
        assert_eq!(found.green(), found.blue());

        // The returned gray meets the target...
        assert!(contrast_ratio(found, ColorValue::WHITE) >= 4.5);
        // ...and is the boundary: one step lighter no longer does.
        let lighter = ColorValue::gray(found.red() + 1);
        assert!(contrast_ratio(lighter, ColorValue::WHITE) < 4.5);
    }

    #[test]
    fn finds_boundary_gray_against_black() {
        let found = find_contrasting_color(ColorValue::BLACK, 4.5).unwrap();
        assert!(contrast_ratio(found, ColorValue::BLACK) >= 4.5);
        let darker = ColorValue::gray(found.red() - 1);
        assert!(contrast_ratio(darker, ColorValue::BLACK) < 4.5);
    }

    #[test]
    fn unreachable_target_returns_none() {
        assert_eq!(find_contrasting_color(ColorValue::gray(0x80), 21.0), None);
    }

    #[test]
    fn extreme_targets_resolve_to_extremes() {
        assert_eq!(
            find_contrasting_color(ColorValue::WHITE, 21.0),
            Some(ColorValue::BLACK)
        );
        assert_eq!(
            find_contrasting_color(ColorValue::BLACK, 21.0),
            Some(ColorValue::WHITE)
        );
    }
}
