//! The diffusing odor field prey deposit into and the agent senses from.
//!
//! The field is a stack of `grid_width x grid_height` planes, one per
//! [`OdorChannel`]. Each tick the engine:
//!
//! 1. lets every prey [`deposit`](OdorField::deposit) its signature at its
//!    current cell (overwriting, not adding),
//! 2. calls [`step`](OdorField::step) once, which blurs every plane with a
//!    separable Gaussian kernel and multiplies it by the decay factor.
//!
//! # Coordinates
//!
//! Arena coordinates map to cells with a centered affine transform
//! `cell = trunc((p - arena / 2) * (grid / arena) + grid / 2)`, clamped to
//! the grid. Deposit and sample share this transform, so sampling the cell a
//! prey just marked returns exactly what it deposited.
//!
//! # Boundaries
//!
//! The blur uses half-sample-symmetric reflection at the grid edges
//! (`d c b a | a b c d | d c b a`). With a normalized symmetric kernel this
//! makes diffusion conserve total mass, so after one `step` the mass is
//! exactly `decay` times what it was, whatever the spatial pattern.
//!
//! [`OdorChannel`]: cyberslug_types::OdorChannel

use cyberslug_types::{ODOR_CHANNEL_COUNT, OdorChannel, OdorVector, Position};

use crate::arena::Arena;
use crate::config::FieldConfig;
use crate::error::WorldError;

/// Multi-channel odor concentration grid.
#[derive(Debug, Clone, PartialEq)]
pub struct OdorField {
    grid_width: usize,
    grid_height: usize,
    /// Arena midpoint, the origin of the affine map.
    arena_center: Position,
    /// Grid cells per arena unit along x.
    scale_x: f64,
    /// Grid cells per arena unit along y.
    scale_y: f64,
    /// Normalized Gaussian weights, length `2 * radius + 1`.
    kernel: Vec<f64>,
    decay: f64,
    /// Concentrations, laid out `channel * (w * h) + x * h + y`.
    cells: Vec<f64>,
    /// Reusable buffer for the intermediate blur pass.
    scratch: Vec<f64>,
}

impl OdorField {
    /// Allocate a zeroed field covering `arena`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] if the field configuration is
    /// invalid or the grid is too large to allocate an index for.
    pub fn new(arena: &Arena, config: &FieldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let plane = config
            .grid_width
            .checked_mul(config.grid_height)
            .ok_or_else(|| WorldError::invalid("field grid is too large"))?;
        let total = plane
            .checked_mul(ODOR_CHANNEL_COUNT)
            .ok_or_else(|| WorldError::invalid("field grid is too large"))?;

        Ok(Self {
            grid_width: config.grid_width,
            grid_height: config.grid_height,
            arena_center: arena.center(),
            scale_x: usize_to_f64(config.grid_width) / arena.width(),
            scale_y: usize_to_f64(config.grid_height) / arena.height(),
            kernel: gaussian_kernel(config.diffusion_sigma, config.diffusion_radius),
            decay: config.decay,
            cells: vec![0.0; total],
            scratch: vec![0.0; plane],
        })
    }

    /// Grid width in cells.
    pub const fn grid_width(&self) -> usize {
        self.grid_width
    }

    /// Grid height in cells.
    pub const fn grid_height(&self) -> usize {
        self.grid_height
    }

    /// Map an arena position to its (clamped) grid cell.
    pub fn cell_for(&self, position: Position) -> (usize, usize) {
        let gx = (position.x - self.arena_center.x)
            .mul_add(self.scale_x, usize_to_f64(self.grid_width) / 2.0);
        let gy = (position.y - self.arena_center.y)
            .mul_add(self.scale_y, usize_to_f64(self.grid_height) / 2.0);
        (
            clamp_to_cell(gx, self.grid_width),
            clamp_to_cell(gy, self.grid_height),
        )
    }

    /// Overwrite the channel vector of the cell under `position`.
    ///
    /// Negative concentrations are clamped to zero.
    pub fn deposit(&mut self, position: Position, odor: &OdorVector) {
        let (x, y) = self.cell_for(position);
        for channel in OdorChannel::ALL {
            let value = odor.get(channel.index()).copied().unwrap_or(0.0);
            if let Some(cell) = self
                .index(channel, x, y)
                .and_then(|idx| self.cells.get_mut(idx))
            {
                *cell = value.max(0.0);
            }
        }
    }

    /// Sample the channel vector `distance` cells away from `position`'s cell
    /// along the absolute angle `angle_degrees`.
    ///
    /// The projected cell is truncated and clamped to the grid; sampling
    /// never wraps around.
    pub fn sample(&self, position: Position, angle_degrees: f64, distance: f64) -> OdorVector {
        let (cx, cy) = self.cell_for(position);
        let radians = angle_degrees.to_radians();
        let tx = distance.mul_add(radians.cos(), usize_to_f64(cx));
        let ty = distance.mul_add(radians.sin(), usize_to_f64(cy));
        self.cell_vector(
            clamp_to_cell(tx, self.grid_width),
            clamp_to_cell(ty, self.grid_height),
        )
    }

    /// The channel vector stored at a grid cell (zeros when out of range).
    pub fn cell_vector(&self, x: usize, y: usize) -> OdorVector {
        let mut out = [0.0; ODOR_CHANNEL_COUNT];
        for (slot, channel) in out.iter_mut().zip(OdorChannel::ALL) {
            *slot = self.value(channel, x, y);
        }
        out
    }

    /// Concentration of one channel at a grid cell (zero when out of range).
    pub fn value(&self, channel: OdorChannel, x: usize, y: usize) -> f64 {
        self.index(channel, x, y)
            .and_then(|idx| self.cells.get(idx))
            .copied()
            .unwrap_or(0.0)
    }

    /// Diffuse every channel, then apply the decay factor.
    ///
    /// Must be called exactly once per tick, after that tick's deposits.
    pub fn step(&mut self) {
        let plane = self.plane_len();
        if plane == 0 {
            return;
        }
        let mut cells = std::mem::take(&mut self.cells);
        for channel_plane in cells.chunks_exact_mut(plane) {
            self.blur_plane(channel_plane);
        }
        for cell in &mut cells {
            *cell *= self.decay;
        }
        self.cells = cells;
    }

    /// Zero every cell.
    pub fn reset(&mut self) {
        self.cells.fill(0.0);
    }

    /// Sum of all concentrations across all channels.
    pub fn total_mass(&self) -> f64 {
        self.cells.iter().sum()
    }

    /// Sum of concentrations in one channel.
    pub fn channel_mass(&self, channel: OdorChannel) -> f64 {
        let plane = self.plane_len();
        self.cells
            .chunks_exact(plane.max(1))
            .nth(channel.index())
            .map_or(0.0, |values| values.iter().sum())
    }

    const fn plane_len(&self) -> usize {
        self.grid_width.saturating_mul(self.grid_height)
    }

    fn index(&self, channel: OdorChannel, x: usize, y: usize) -> Option<usize> {
        if x >= self.grid_width || y >= self.grid_height {
            return None;
        }
        channel
            .index()
            .checked_mul(self.plane_len())?
            .checked_add(x.checked_mul(self.grid_height)?)?
            .checked_add(y)
    }

    /// Separable blur of one channel plane in place: along y into the
    /// scratch buffer, then along x back into the plane.
    fn blur_plane(&mut self, plane: &mut [f64]) {
        let w = self.grid_width;
        let h = self.grid_height;
        let radius = self.kernel.len().saturating_sub(1) / 2;

        for x in 0..w {
            let column_start = x.saturating_mul(h);
            for y in 0..h {
                let mut acc = 0.0;
                for (k, weight) in self.kernel.iter().enumerate() {
                    let source = reflect(y, k, radius, h);
                    let value = plane
                        .get(column_start.saturating_add(source))
                        .copied()
                        .unwrap_or(0.0);
                    acc = weight.mul_add(value, acc);
                }
                if let Some(slot) = self.scratch.get_mut(column_start.saturating_add(y)) {
                    *slot = acc;
                }
            }
        }

        for x in 0..w {
            for y in 0..h {
                let mut acc = 0.0;
                for (k, weight) in self.kernel.iter().enumerate() {
                    let source = reflect(x, k, radius, w);
                    let value = self
                        .scratch
                        .get(source.saturating_mul(h).saturating_add(y))
                        .copied()
                        .unwrap_or(0.0);
                    acc = weight.mul_add(value, acc);
                }
                if let Some(slot) = plane.get_mut(x.saturating_mul(h).saturating_add(y)) {
                    *slot = acc;
                }
            }
        }
    }
}

/// Build a normalized Gaussian kernel of half-width `radius`.
fn gaussian_kernel(sigma: f64, radius: usize) -> Vec<f64> {
    if radius == 0 {
        return vec![1.0];
    }
    let span = radius.saturating_mul(2).saturating_add(1);
    let center = usize_to_f64(radius);
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f64> = (0..span)
        .map(|i| {
            let offset = usize_to_f64(i) - center;
            (-(offset * offset) / denom).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    if sum > 0.0 {
        for weight in &mut kernel {
            *weight /= sum;
        }
    }
    kernel
}

/// Index of tap `k` of a kernel of half-width `radius` centered on `pos`,
/// reflected half-sample-symmetrically into `[0, len)`.
fn reflect(pos: usize, k: usize, radius: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let period = len.saturating_mul(2);
    // Shift by a whole number of periods so the offset never goes negative.
    let periods = radius.checked_div(period).unwrap_or(0).saturating_add(1);
    let shift = period.saturating_mul(periods);
    let raw = pos.saturating_add(k).saturating_add(shift).saturating_sub(radius);
    let folded = raw.checked_rem(period).unwrap_or(0);
    if folded < len {
        folded
    } else {
        period.saturating_sub(1).saturating_sub(folded)
    }
}

/// Truncate toward zero and clamp into `[0, len)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_to_cell(value: f64, len: usize) -> usize {
    let last = len.saturating_sub(1);
    let truncated = value.trunc();
    // NaN and negatives land on the first cell.
    if truncated.is_nan() || truncated <= 0.0 {
        return 0;
    }
    if truncated >= usize_to_f64(last) {
        return last;
    }
    truncated as usize
}

#[allow(clippy::cast_precision_loss)]
const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}
