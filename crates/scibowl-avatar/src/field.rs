//! Smooth scalar fields built from layered value noise.

use crate::hash::Mulberry32;

/// Octaves summed into an avatar field.
pub const OCTAVES: u32 = 3;

/// Amplitude falloff between octaves.
pub const PERSISTENCE: f64 = 0.6;

/// Smallest lattice spacing, in cells.
const MIN_GRID: usize = 4;

/// A row-major grid of samples in `[0, 1]` after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl ScalarField {
    /// A field of zeros.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width.saturating_mul(height)],
        }
    }

    /// Build a field from row-major samples. Returns `None` if the sample
    /// count does not match the dimensions.
    pub fn from_rows(width: usize, height: usize, values: Vec<f64>) -> Option<Self> {
        (values.len() == width.checked_mul(height)?).then_some(Self {
            width,
            height,
            values,
        })
    }

    /// Columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Sample at `(x, y)`; out-of-range coordinates read as `0.0`.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.index(x, y)
            .and_then(|i| self.values.get(i).copied())
            .unwrap_or(0.0)
    }

    /// All samples, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        y.checked_mul(self.width)?.checked_add(x)
    }

    /// Rescale samples to `[0, 1]`. A constant field becomes all zeros.
    pub fn normalize(&mut self) {
        let (min, max) = self
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let range = max - min;
        if !range.is_finite() || range <= 0.0 {
            self.values.iter_mut().for_each(|v| *v = 0.0);
            return;
        }
        for v in &mut self.values {
            *v = (*v - min) / range;
        }
    }
}

// Plain multiply-add keeps results bit-identical to the browser renderer.
#[allow(clippy::suboptimal_flops)]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[allow(clippy::suboptimal_flops)]
fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

/// Sum `octaves` layers of smoothstep-interpolated lattice noise and
/// normalize the result.
///
/// Each octave draws its lattice from `rng` row by row, so the field is a
/// pure function of the generator state on entry.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::suboptimal_flops
)]
pub fn value_noise(
    width: usize,
    height: usize,
    rng: &mut Mulberry32,
    octaves: u32,
    persistence: f64,
) -> ScalarField {
    let mut field = ScalarField::zeros(width, height);

    for octave in 0..octaves {
        let frequency = 1_usize.checked_shl(octave).unwrap_or(usize::MAX);
        let amplitude = persistence.powi(octave as i32);
        let grid_size = (width / frequency).max(MIN_GRID);

        let lattice_w = width.div_ceil(grid_size).saturating_add(2);
        let lattice_h = height.div_ceil(grid_size).saturating_add(2);
        let samples = (0..lattice_w.saturating_mul(lattice_h))
            .map(|_| rng.next_f64())
            .collect();
        let Some(lattice) = ScalarField::from_rows(lattice_w, lattice_h, samples) else {
            continue;
        };

        let step = grid_size as f64;
        for y in 0..height {
            let gy = y as f64 / step;
            let y0 = gy.floor();
            let sy = smoothstep(gy - y0);
            let y0 = y0 as usize;
            let y1 = y0.saturating_add(1);

            for x in 0..width {
                let gx = x as f64 / step;
                let x0 = gx.floor();
                let sx = smoothstep(gx - x0);
                let x0 = x0 as usize;
                let x1 = x0.saturating_add(1);

                let top = lerp(lattice.get(x0, y0), lattice.get(x1, y0), sx);
                let bottom = lerp(lattice.get(x0, y1), lattice.get(x1, y1), sx);
                let value = lerp(top, bottom, sy);

                if let Some(slot) = field.index(x, y).and_then(|i| field.values.get_mut(i)) {
                    *slot += value * amplitude;
                }
            }
        }
    }

    field.normalize();
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::cyrb53;

    #[test]
    fn noise_is_normalized() {
        let mut rng = Mulberry32::new(cyrb53("normalize"));
        let field = value_noise(32, 32, &mut rng, OCTAVES, PERSISTENCE);
        let values = field.values();
        assert_eq!(values.len(), 32 * 32);
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(values.iter().any(|v| *v <= f64::EPSILON));
        assert!(values.iter().any(|v| *v >= 1.0 - f64::EPSILON));
    }

    #[test]
    fn noise_is_deterministic() {
        let a = value_noise(16, 16, &mut Mulberry32::new(9), OCTAVES, PERSISTENCE);
        let b = value_noise(16, 16, &mut Mulberry32::new(9), OCTAVES, PERSISTENCE);
        assert_eq!(a, b);
    }

    #[test]
    fn constant_field_normalizes_to_zero() {
        let mut field =
            ScalarField::from_rows(2, 2, vec![0.7; 4]).unwrap_or_else(|| ScalarField::zeros(2, 2));
        field.normalize();
        assert!(field.values().iter().all(|v| v.abs() < f64::EPSILON));
    }

    #[test]
    fn from_rows_rejects_wrong_length() {
        assert!(ScalarField::from_rows(3, 3, vec![0.0; 8]).is_none());
    }

    #[test]
    fn out_of_range_reads_zero() {
        let field =
            ScalarField::from_rows(1, 1, vec![0.5]).unwrap_or_else(|| ScalarField::zeros(1, 1));
        assert!((field.get(0, 0) - 0.5).abs() < f64::EPSILON);
        assert!(field.get(5, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn smoothstep_endpoints() {
        assert!(smoothstep(0.0).abs() < f64::EPSILON);
        assert!((smoothstep(1.0) - 1.0).abs() < f64::EPSILON);
        assert!((smoothstep(0.5) - 0.5).abs() < f64::EPSILON);
    }
}
