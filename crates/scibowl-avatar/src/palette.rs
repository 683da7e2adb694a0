//! Fixed color palettes avatars are drawn from.

/// Three colors for the low, mid, and high bands of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Fill for the low band (the whole disc underneath).
    pub background: &'static str,
    /// Fill for the mid band.
    pub mid: &'static str,
    /// Fill for the high band and contour strokes.
    pub high: &'static str,
}

/// Every palette, indexed by the first PRNG draw.
pub const PALETTES: [Palette; 5] = [
    // deep purple
    Palette {
        background: "#1e1b4b",
        mid: "#7c3aed",
        high: "#a78bfa",
    },
    // slate / indigo
    Palette {
        background: "#0f172a",
        mid: "#6366f1",
        high: "#818cf8",
    },
    // slate / violet
    Palette {
        background: "#1e293b",
        mid: "#8b5cf6",
        high: "#c4b5fd",
    },
    // indigo / pink
    Palette {
        background: "#312e81",
        mid: "#ec4899",
        high: "#f9a8d4",
    },
    // blue
    Palette {
        background: "#1e3a8a",
        mid: "#3b82f6",
        high: "#93c5fd",
    },
];

/// Pick a palette from a draw in `[0, 1)`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn pick(draw: f64) -> Palette {
    let index = (draw * PALETTES.len() as f64).floor() as usize;
    PALETTES.get(index).copied().unwrap_or(PALETTES[4])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_map_to_buckets() {
        assert_eq!(pick(0.0), PALETTES[0]);
        assert_eq!(pick(0.19), PALETTES[0]);
        assert_eq!(pick(0.2), PALETTES[1]);
        assert_eq!(pick(0.99), PALETTES[4]);
    }

    #[test]
    fn out_of_range_draw_clamps_to_last() {
        assert_eq!(pick(1.0), PALETTES[4]);
    }
}
