//! Raw gaze samples — the capability the smoother operates over.
//!
//! Any timestamped positional datum can be smoothed as long as it exposes
//! planar X/Y coordinates and knows how to blend itself toward a newer
//! sample. Two representations ship with the crate: planar screen points
//! and 3D gaze direction vectors.

// ── Capability ──────────────────────────────────────────────

/// A raw positional gaze datum.
///
/// `blend_toward` mutates `self` into `(reference + alpha * self) / (1 + alpha)`
/// component-wise, refreshes any derived fields and stamps `timestamp`.
/// Blending against a different representation is impossible by construction:
/// the reference is always `Self`.
pub trait RawSample: Clone {
    /// Timestamp, ms.
    fn timestamp(&self) -> u64;

    /// Planar X.
    fn x(&self) -> f32;

    /// Planar Y.
    fn y(&self) -> f32;

    /// Blend toward `reference` with ratio `alpha` and take `timestamp`.
    fn blend_toward(&mut self, reference: &Self, alpha: f64, timestamp: u64);
}

fn blend(reference: f32, current: f32, alpha: f64) -> f32 {
    ((reference as f64 + alpha * current as f64) / (1.0 + alpha)) as f32
}

// ── Planar point ────────────────────────────────────────────

/// Raw 2D gaze point (usually screen pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPoint {
    pub timestamp: u64,
    pub x: f32,
    pub y: f32,
}

impl RawPoint {
    /// Point at `(x, y)` taken at `timestamp`.
    pub fn new(timestamp: u64, x: f32, y: f32) -> Self {
        Self { timestamp, x, y }
    }
}

impl RawSample for RawPoint {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn x(&self) -> f32 {
        self.x
    }

    fn y(&self) -> f32 {
        self.y
    }

    fn blend_toward(&mut self, reference: &Self, alpha: f64, timestamp: u64) {
        self.timestamp = timestamp;
        self.x = blend(reference.x, self.x, alpha);
        self.y = blend(reference.y, self.y, alpha);
    }
}

// ── Direction vector ────────────────────────────────────────

/// Minimal 3D vector for gaze directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Vector from its components.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm.
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or `ZERO` for a degenerate input.
    pub fn normalize(self) -> Self {
        match self.length() {
            len if len > f32::EPSILON => Self::new(self.x / len, self.y / len, self.z / len),
            _ => Self::ZERO,
        }
    }
}

/// Raw 3D gaze direction.
///
/// X and Y are tangent projections of the unit direction
/// (`tan(asin(v.x))`, `tan(asin(v.y))`), so distances between samples are
/// measured on a flat plane one unit in front of the eye. Z is rebuilt from
/// the unit-sphere constraint after every blend, with `X² + Y²` clamped to 1
/// so large projections never yield NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawVector {
    timestamp: u64,
    x: f32,
    y: f32,
    z: f32,
    original: Vec3,
}

impl RawVector {
    /// Project `direction` taken at `timestamp`. The direction is normalized
    /// first, so trackers reporting non-unit vectors never push `asin` out
    /// of its domain.
    pub fn new(timestamp: u64, direction: Vec3) -> Self {
        let unit = direction.normalize();
        let x = (unit.x as f64).asin().tan() as f32;
        let y = (unit.y as f64).asin().tan() as f32;
        Self {
            timestamp,
            x,
            y,
            z: unit_z(x, y),
            original: direction,
        }
    }

    /// Direction this sample was created from.
    pub fn original(&self) -> Vec3 {
        self.original
    }

    /// Smoothed projection as a vector `(X, Y, Z)`.
    pub fn shifted(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Depth component rebuilt from the projected X and Y.
    pub fn z(&self) -> f32 {
        self.z
    }
}

fn unit_z(x: f32, y: f32) -> f32 {
    let xx = x as f64 * x as f64;
    let yy = y as f64 * y as f64;
    (1.0 - (xx + yy).min(1.0)).max(0.0).sqrt() as f32
}

impl RawSample for RawVector {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn x(&self) -> f32 {
        self.x
    }

    fn y(&self) -> f32 {
        self.y
    }

    fn blend_toward(&mut self, reference: &Self, alpha: f64, timestamp: u64) {
        self.timestamp = timestamp;
        self.x = blend(reference.x, self.x, alpha);
        self.y = blend(reference.y, self.y, alpha);
        self.z = unit_z(self.x, self.y);
    }
}

// ── Tests ───────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_blend_weights_history() {
        let mut current = RawPoint::new(0, 0.0, 0.0);
        let reference = RawPoint::new(33, 10.0, 20.0);
        current.blend_toward(&reference, 1.0, 33);
        assert_eq!(current.timestamp, 33);
        assert!((current.x - 5.0).abs() < 1e-6);
        assert!((current.y - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_point_blend_zero_alpha_takes_reference() {
        let mut current = RawPoint::new(0, 100.0, 100.0);
        let reference = RawPoint::new(10, 3.0, 4.0);
        current.blend_toward(&reference, 0.0, 10);
        assert_eq!(current, reference);
    }

    #[test]
    fn test_vector_projection() {
        let v = RawVector::new(5, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(v.timestamp(), 5);
        assert_eq!(v.x(), 0.0);
        assert_eq!(v.y(), 0.0);
        assert!((v.z() - 1.0).abs() < 1e-6);

        // 30 degrees off-axis: sin = 0.5, tan = 1/sqrt(3)
        let v = RawVector::new(0, Vec3::new(0.5, 0.0, 0.866_025_4));
        assert!((v.x() - 0.577_350_3).abs() < 1e-5);
        assert_eq!(v.original(), Vec3::new(0.5, 0.0, 0.866_025_4));
    }

    #[test]
    fn test_vector_blend_rebuilds_z() {
        let mut current = RawVector::new(0, Vec3::new(0.0, 0.0, 1.0));
        let reference = RawVector::new(10, Vec3::new(0.3, 0.2, 0.932_737_9));
        current.blend_toward(&reference, 0.0, 10);
        let s = current.shifted();
        let expected_z = (1.0 - s.x * s.x - s.y * s.y).sqrt();
        assert!((s.z - expected_z).abs() < 1e-5);
        assert_eq!(current.timestamp(), 10);
    }

    #[test]
    fn test_vector_z_clamped_for_large_projection() {
        // asin(0.95) is ~72 degrees, tan of that is ~3, so X² alone exceeds 1
        let mut current = RawVector::new(0, Vec3::new(0.95, 0.0, 0.312));
        let reference = RawVector::new(10, Vec3::new(0.95, 0.2, 0.24));
        current.blend_toward(&reference, 2.0, 10);
        assert!(current.x() > 1.0);
        assert_eq!(current.z(), 0.0);
        assert!(!current.z().is_nan());
    }

    #[test]
    fn test_vector_from_unnormalized_direction() {
        // Same direction at twice the length projects identically
        let unit = RawVector::new(0, Vec3::new(0.6, 0.0, 0.8));
        let long = RawVector::new(0, Vec3::new(1.2, 0.0, 1.6));
        assert!((long.x() - unit.x()).abs() < 1e-6);
        assert!((long.x() - 0.75).abs() < 1e-5);
        assert_eq!(long.original(), Vec3::new(1.2, 0.0, 1.6));

        // Degenerate direction stays finite and looks straight ahead
        let zero = RawVector::new(0, Vec3::ZERO);
        assert_eq!(zero.x(), 0.0);
        assert_eq!(zero.y(), 0.0);
        assert_eq!(zero.z(), 1.0);
    }
}
