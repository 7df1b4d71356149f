// primitive.rs — Concrete region sources
//
// Simple implementations of the canonical forms: a dense array-backed grid
// field and a handful of closure- and geometry-backed predicates. Spatial
// sophistication is out of scope here; these exist so conversion has real
// values to route and so callers without a geometry library of their own can
// still feed the resolver.

use std::sync::Arc;

use crate::mask::{
    GridField, GridFieldInterval, GridMask, RealField, RealMask, RealMaskInterval,
};
use crate::sample::Sample;

// ── Array-backed grid field ─────────────────────────────────────────────────

/// Dense row-major grid-interval field. The min corner is the origin; the
/// max corner is `extents - 1` per dimension.
#[derive(Debug, Clone)]
pub struct ArrayField {
    extents: Vec<i64>,
    data: Vec<Sample>,
}

impl ArrayField {
    /// Field of `Bit(false)` samples.
    pub fn bits(extents: &[i64]) -> Self {
        ArrayField::filled(extents, Sample::Bit(false))
    }

    /// Field filled with one sample value. All positions share the element
    /// type of `fill`, which keeps the uniform-element precondition trivially
    /// true. Non-positive extents are treated as zero; sampling such a field
    /// still yields the fill value, so element-type probes stay panic-free.
    pub fn filled(extents: &[i64], fill: Sample) -> Self {
        let extents: Vec<i64> = extents.iter().map(|&e| e.max(0)).collect();
        let len = extents.iter().map(|&e| e.max(1)).product::<i64>() as usize;
        ArrayField {
            extents,
            data: vec![fill; len],
        }
    }

    pub fn set(&mut self, pos: &[i64], value: Sample) {
        let idx = self.offset(pos);
        self.data[idx] = value;
    }

    pub fn get(&self, pos: &[i64]) -> Sample {
        self.data[self.offset(pos)]
    }

    /// Row-major offset. Out-of-range coordinates clamp to the bounds, so a
    /// probe at any position yields a representative element; zero-extent
    /// dimensions pin their coordinate to zero.
    fn offset(&self, pos: &[i64]) -> usize {
        let mut idx: i64 = 0;
        for (d, &extent) in self.extents.iter().enumerate() {
            let p = pos.get(d).copied().unwrap_or(0).clamp(0, (extent - 1).max(0));
            idx = idx * extent + p;
        }
        idx as usize
    }
}

impl GridField for ArrayField {
    fn dims(&self) -> usize {
        self.extents.len()
    }

    fn sample(&self, pos: &[i64]) -> Sample {
        self.get(pos)
    }
}

impl GridFieldInterval for ArrayField {
    fn min(&self) -> Vec<i64> {
        vec![0; self.extents.len()]
    }

    fn max(&self) -> Vec<i64> {
        self.extents.iter().map(|e| e - 1).collect()
    }
}

// ── Closure-backed unbounded forms ──────────────────────────────────────────

/// Unbounded grid predicate defined by a closure.
#[derive(Clone)]
pub struct FnGridMask {
    dims: usize,
    f: Arc<dyn Fn(&[i64]) -> bool + Send + Sync>,
}

impl FnGridMask {
    pub fn new(dims: usize, f: impl Fn(&[i64]) -> bool + Send + Sync + 'static) -> Self {
        FnGridMask { dims, f: Arc::new(f) }
    }
}

impl GridMask for FnGridMask {
    fn dims(&self) -> usize {
        self.dims
    }

    fn test(&self, pos: &[i64]) -> bool {
        (self.f)(pos)
    }
}

/// Unbounded real predicate defined by a closure.
#[derive(Clone)]
pub struct FnRealMask {
    dims: usize,
    f: Arc<dyn Fn(&[f64]) -> bool + Send + Sync>,
}

impl FnRealMask {
    pub fn new(dims: usize, f: impl Fn(&[f64]) -> bool + Send + Sync + 'static) -> Self {
        FnRealMask { dims, f: Arc::new(f) }
    }
}

impl RealMask for FnRealMask {
    fn dims(&self) -> usize {
        self.dims
    }

    fn test(&self, pos: &[f64]) -> bool {
        (self.f)(pos)
    }
}

/// Unbounded grid field defined by a closure.
#[derive(Clone)]
pub struct FnGridField {
    dims: usize,
    f: Arc<dyn Fn(&[i64]) -> Sample + Send + Sync>,
}

impl FnGridField {
    pub fn new(dims: usize, f: impl Fn(&[i64]) -> Sample + Send + Sync + 'static) -> Self {
        FnGridField { dims, f: Arc::new(f) }
    }
}

impl GridField for FnGridField {
    fn dims(&self) -> usize {
        self.dims
    }

    fn sample(&self, pos: &[i64]) -> Sample {
        (self.f)(pos)
    }
}

/// Unbounded real field defined by a closure.
#[derive(Clone)]
pub struct FnRealField {
    dims: usize,
    f: Arc<dyn Fn(&[f64]) -> Sample + Send + Sync>,
}

impl FnRealField {
    pub fn new(dims: usize, f: impl Fn(&[f64]) -> Sample + Send + Sync + 'static) -> Self {
        FnRealField { dims, f: Arc::new(f) }
    }
}

impl RealField for FnRealField {
    fn dims(&self) -> usize {
        self.dims
    }

    fn sample(&self, pos: &[f64]) -> Sample {
        (self.f)(pos)
    }
}

// ── Geometry-backed real predicates ─────────────────────────────────────────

/// Real interval mask true at exactly one point; both interval corners
/// coincide with the point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointMask {
    point: Vec<f64>,
}

impl PointMask {
    pub fn new(point: &[f64]) -> Self {
        PointMask {
            point: point.to_vec(),
        }
    }

    pub fn point(&self) -> &[f64] {
        &self.point
    }
}

impl RealMask for PointMask {
    fn dims(&self) -> usize {
        self.point.len()
    }

    fn test(&self, pos: &[f64]) -> bool {
        pos.len() == self.point.len() && pos.iter().zip(&self.point).all(|(a, b)| a == b)
    }
}

impl RealMaskInterval for PointMask {
    fn min(&self) -> Vec<f64> {
        self.point.clone()
    }

    fn max(&self) -> Vec<f64> {
        self.point.clone()
    }
}

/// Closed axis-aligned box in real coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxMask {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl BoxMask {
    pub fn new(min: &[f64], max: &[f64]) -> Self {
        BoxMask {
            min: min.to_vec(),
            max: max.to_vec(),
        }
    }
}

impl RealMask for BoxMask {
    fn dims(&self) -> usize {
        self.min.len()
    }

    fn test(&self, pos: &[f64]) -> bool {
        pos.len() == self.min.len()
            && pos
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(p, (lo, hi))| lo <= p && p <= hi)
    }
}

impl RealMaskInterval for BoxMask {
    fn min(&self) -> Vec<f64> {
        self.min.clone()
    }

    fn max(&self) -> Vec<f64> {
        self.max.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::ElementType;

    #[test]
    fn array_field_round_trips_samples() {
        let mut field = ArrayField::bits(&[4, 3]);
        field.set(&[2, 1], Sample::Bit(true));
        assert_eq!(field.get(&[2, 1]), Sample::Bit(true));
        assert_eq!(field.get(&[0, 0]), Sample::Bit(false));
        assert_eq!(field.min(), vec![0, 0]);
        assert_eq!(field.max(), vec![3, 2]);
    }

    #[test]
    fn array_field_clamps_out_of_range_probes() {
        let field = ArrayField::filled(&[2, 2], Sample::U16(9));
        assert_eq!(field.get(&[100, -5]).element_type(), ElementType::U16);
    }

    #[test]
    fn array_field_tolerates_zero_extent_dimensions() {
        let field = ArrayField::bits(&[0, 5]);
        assert_eq!(field.get(&[0, 3]), Sample::Bit(false));
        assert_eq!(field.min(), vec![0, 0]);
        assert_eq!(field.max(), vec![-1, 4]);

        let negative = ArrayField::filled(&[3, -2], Sample::U16(1));
        assert_eq!(negative.get(&[1, 0]).element_type(), ElementType::U16);
    }

    #[test]
    fn point_mask_true_only_at_point() {
        let p = PointMask::new(&[12.0, 13.0]);
        assert!(p.test(&[12.0, 13.0]));
        assert!(!p.test(&[12.0, 13.5]));
        assert_eq!(p.min(), vec![12.0, 13.0]);
        assert_eq!(p.max(), vec![12.0, 13.0]);
    }

    #[test]
    fn box_mask_is_closed() {
        let b = BoxMask::new(&[0.0, 0.0], &[2.0, 4.0]);
        assert!(b.test(&[0.0, 0.0]));
        assert!(b.test(&[2.0, 4.0]));
        assert!(b.test(&[1.0, 2.0]));
        assert!(!b.test(&[2.1, 4.0]));
    }
}
