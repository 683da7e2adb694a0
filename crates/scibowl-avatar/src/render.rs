//! Avatar generation and SVG rendering.
//!
//! An avatar is a pure function of `(identity, size)`: the identity is
//! salted and versioned, hashed into a seed, and every later decision
//! (palette, band thresholds, noise lattice) is drawn from one PRNG stream
//! in a fixed order. Changing that order changes every avatar, so bump
//! [`AVATAR_VERSION`] when it has to change.

use std::fmt::Write as _;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::contour::{marching_squares, path_data};
use crate::field::{OCTAVES, PERSISTENCE, ScalarField, value_noise};
use crate::hash::{Mulberry32, cyrb53};
use crate::palette::{self, Palette};

/// Version mixed into every seed.
pub const AVATAR_VERSION: u32 = 1;

/// Salt mixed into every seed.
pub const GLOBAL_SALT: &str = "scibowl-arena-v1";

/// Edge length used when the caller does not ask for one.
pub const DEFAULT_SIZE: u32 = 64;

/// Smallest edge length rendered.
pub const MIN_SIZE: u32 = 8;

/// Largest edge length rendered.
pub const MAX_SIZE: u32 = 256;

/// Clamp a requested edge length into `[MIN_SIZE, MAX_SIZE]`.
pub const fn clamp_size(size: u32) -> u32 {
    if size < MIN_SIZE {
        MIN_SIZE
    } else if size > MAX_SIZE {
        MAX_SIZE
    } else {
        size
    }
}

/// Canonical form of a username identity: trimmed and lowercased.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The string hashed into the seed for `identity`.
pub fn seed_string(identity: &str) -> String {
    format!("{AVATAR_VERSION}:{GLOBAL_SALT}:{identity}")
}

/// Band cut-offs in normalized field units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Lower edge of the mid band, in `[0.40, 0.52)`.
    pub mid: f64,
    /// Lower edge of the high band; always at least `mid + 0.12`.
    pub high: f64,
}

impl Thresholds {
    /// Draw thresholds from the stream.
    #[allow(clippy::suboptimal_flops)]
    fn draw(rng: &mut Mulberry32) -> Self {
        let mid = 0.40 + rng.next_f64() * 0.12;
        let high = (mid + 0.12).max(0.58 + rng.next_f64() * 0.12);
        Self { mid, high }
    }
}

/// Which band a field sample falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Below the mid threshold; shows the background.
    Low,
    /// At or above the mid threshold.
    Mid,
    /// At or above the high threshold.
    High,
}

/// A generated avatar, ready to render.
#[derive(Debug, Clone)]
pub struct Avatar {
    seed: u64,
    size: u32,
    palette: Palette,
    thresholds: Thresholds,
    field: ScalarField,
}

impl Avatar {
    /// Generate the avatar for `identity` at `size` (clamped).
    pub fn generate(identity: &str, size: u32) -> Self {
        let size = clamp_size(size);
        let seed = cyrb53(&seed_string(identity));
        let mut rng = Mulberry32::new(seed);

        let palette = palette::pick(rng.next_f64());
        let thresholds = Thresholds::draw(&mut rng);
        let edge = size as usize;
        let field = value_noise(edge, edge, &mut rng, OCTAVES, PERSISTENCE);

        Self {
            seed,
            size,
            palette,
            thresholds,
            field,
        }
    }

    /// The 53-bit seed hash.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Rendered edge length.
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Chosen palette.
    pub const fn palette(&self) -> Palette {
        self.palette
    }

    /// Band cut-offs.
    pub const fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// The normalized scalar field.
    pub const fn field(&self) -> &ScalarField {
        &self.field
    }

    /// Band of the cell whose top-left sample is `(x, y)`.
    pub fn band_at(&self, x: usize, y: usize) -> Band {
        let v = self.field.get(x, y);
        if v >= self.thresholds.high {
            Band::High
        } else if v >= self.thresholds.mid {
            Band::Mid
        } else {
            Band::Low
        }
    }

    /// Unit-square path data for the mid and high bands.
    fn band_paths(&self) -> (String, String) {
        let mut mid = String::new();
        let mut high = String::new();
        let cells = (self.size as usize).saturating_sub(1);
        for y in 0..cells {
            for x in 0..cells {
                let target = match self.band_at(x, y) {
                    Band::High => &mut high,
                    Band::Mid => &mut mid,
                    Band::Low => continue,
                };
                let _ = write!(target, "M {x} {y} h 1 v 1 h -1 Z ");
            }
        }
        (mid, high)
    }

    /// Contour strokes at both thresholds.
    fn contour_path(&self) -> String {
        let mut segments = marching_squares(&self.field, self.thresholds.mid);
        segments.extend(marching_squares(&self.field, self.thresholds.high));
        path_data(&segments)
    }

    /// Render as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let size = self.size;
        let half = f64::from(size) / 2.0;
        // The clip id derives from the seed so that raw identities never
        // reach the markup.
        let clip = format!("circle-clip-{:x}", self.seed);
        let (mid, high) = self.band_paths();
        let contours = self.contour_path();
        let Palette {
            background,
            mid: mid_fill,
            high: high_fill,
        } = self.palette;

        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="100%" height="100%">"#
        );
        let _ = writeln!(svg, "  <defs>");
        let _ = writeln!(svg, r#"    <clipPath id="{clip}">"#);
        let _ = writeln!(svg, r#"      <circle cx="{half}" cy="{half}" r="{half}"/>"#);
        let _ = writeln!(svg, "    </clipPath>");
        let _ = writeln!(svg, "  </defs>");
        let _ = writeln!(svg, r#"  <g clip-path="url(#{clip})">"#);
        let _ = writeln!(
            svg,
            r#"    <rect width="{size}" height="{size}" fill="{background}"/>"#
        );
        if !mid.is_empty() {
            let _ = writeln!(
                svg,
                r#"    <path d="{}" fill="{mid_fill}" fill-rule="evenodd"/>"#,
                mid.trim_end()
            );
        }
        if !high.is_empty() {
            let _ = writeln!(
                svg,
                r#"    <path d="{}" fill="{high_fill}" fill-rule="evenodd"/>"#,
                high.trim_end()
            );
        }
        if !contours.is_empty() {
            let _ = writeln!(
                svg,
                r#"    <path d="{contours}" fill="none" stroke="{high_fill}" stroke-width="0.35" stroke-opacity="0.6"/>"#
            );
        }
        let _ = writeln!(svg, "  </g>");
        svg.push_str("</svg>");
        svg
    }
}

/// Render the SVG document for `identity` at `size`.
pub fn generate_svg(identity: &str, size: u32) -> String {
    Avatar::generate(identity, size).to_svg()
}

/// Wrap an SVG document in a base64 `data:` URI.
pub fn svg_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

/// Render `identity` at `size` straight to a `data:` URI.
pub fn data_url(identity: &str, size: u32) -> String {
    svg_data_url(&generate_svg(identity, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_deterministic() {
        assert_eq!(generate_svg("ada", 32), generate_svg("ada", 32));
        assert_eq!(data_url("ada", 32), data_url("ada", 32));
    }

    #[test]
    fn different_identities_differ() {
        assert_ne!(generate_svg("ada", 32), generate_svg("grace", 32));
    }

    #[test]
    fn size_is_part_of_the_output() {
        assert_ne!(generate_svg("ada", 32), generate_svg("ada", 48));
    }

    #[test]
    fn thresholds_keep_their_gap() {
        for name in ["a", "b", "curie", "faraday", "noether", "ramanujan"] {
            let t = Avatar::generate(name, 16).thresholds();
            assert!((0.40..0.52).contains(&t.mid));
            assert!(t.high >= t.mid + 0.12 - 1e-12);
            assert!(t.high < 0.70);
        }
    }

    #[test]
    fn size_is_clamped() {
        assert_eq!(clamp_size(0), MIN_SIZE);
        assert_eq!(clamp_size(64), 64);
        assert_eq!(clamp_size(10_000), MAX_SIZE);
        assert_eq!(Avatar::generate("x", 1).size(), MIN_SIZE);
        assert_eq!(Avatar::generate("x", 9_999).field().width(), MAX_SIZE as usize);
    }

    #[test]
    fn svg_structure() {
        let avatar = Avatar::generate("ada", 32);
        let svg = avatar.to_svg();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 32 32\""));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(&format!("circle-clip-{:x}", avatar.seed())));
        assert!(svg.contains(r#"<circle cx="16" cy="16" r="16"/>"#));
        assert!(svg.contains(avatar.palette().background));
    }

    #[test]
    fn server_markup_adds_contours_over_the_bands() {
        let avatar = Avatar::generate("ada", 32);
        let svg = avatar.to_svg();
        assert!(!avatar.contour_path().is_empty());
        assert!(svg.contains(r#"fill="none" stroke=""#));
        assert!(svg.contains(&format!(r#"clip-path="url(#circle-clip-{:x})""#, avatar.seed())));
    }

    #[test]
    fn identity_never_reaches_markup() {
        let svg = generate_svg("\"><script>alert(1)</script>", 16);
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn data_url_is_base64_svg() {
        let url = data_url("ada", 16);
        let encoded = url.strip_prefix("data:image/svg+xml;base64,");
        let decoded = encoded.and_then(|e| STANDARD.decode(e).ok());
        assert_eq!(decoded, Some(generate_svg("ada", 16).into_bytes()));
    }

    #[test]
    fn seed_string_is_versioned_and_salted() {
        assert_eq!(seed_string("ada"), "1:scibowl-arena-v1:ada");
        assert_eq!(normalize_identity("  Ada "), "ada");
    }
}
