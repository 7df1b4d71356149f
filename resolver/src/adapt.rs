// adapt.rs — Adapters between predicate and sampled-field forms
//
// A mask viewed as a field samples `Bit(test(pos))`; a field viewed as a mask
// tests `sample(pos).truthy()`. One wrapper per domain, direction, and
// boundedness; interval wrappers delegate the corners unchanged.
//
// Precondition for field-to-mask wrappers: the wrapped field produces bit
// elements. The shipped converters enforce this before constructing one.

use std::sync::Arc;

use crate::mask::{
    GridField, GridFieldInterval, GridMask, GridMaskInterval, RealField, RealFieldInterval,
    RealMask, RealMaskInterval,
};
use crate::sample::Sample;

// ── Grid: mask viewed as field ──────────────────────────────────────────────

pub struct MaskAsGridField {
    mask: Arc<dyn GridMask>,
}

impl MaskAsGridField {
    pub fn new(mask: Arc<dyn GridMask>) -> Self {
        MaskAsGridField { mask }
    }
}

impl GridField for MaskAsGridField {
    fn dims(&self) -> usize {
        self.mask.dims()
    }

    fn sample(&self, pos: &[i64]) -> Sample {
        Sample::Bit(self.mask.test(pos))
    }
}

pub struct MaskAsGridFieldInterval {
    mask: Arc<dyn GridMaskInterval>,
}

impl MaskAsGridFieldInterval {
    pub fn new(mask: Arc<dyn GridMaskInterval>) -> Self {
        MaskAsGridFieldInterval { mask }
    }
}

impl GridField for MaskAsGridFieldInterval {
    fn dims(&self) -> usize {
        self.mask.dims()
    }

    fn sample(&self, pos: &[i64]) -> Sample {
        Sample::Bit(self.mask.test(pos))
    }
}

impl GridFieldInterval for MaskAsGridFieldInterval {
    fn min(&self) -> Vec<i64> {
        self.mask.min()
    }

    fn max(&self) -> Vec<i64> {
        self.mask.max()
    }
}

// ── Grid: field viewed as mask ──────────────────────────────────────────────

pub struct FieldAsGridMask {
    field: Arc<dyn GridField>,
}

impl FieldAsGridMask {
    pub fn new(field: Arc<dyn GridField>) -> Self {
        FieldAsGridMask { field }
    }
}

impl GridMask for FieldAsGridMask {
    fn dims(&self) -> usize {
        self.field.dims()
    }

    fn test(&self, pos: &[i64]) -> bool {
        self.field.sample(pos).truthy()
    }
}

pub struct FieldAsGridMaskInterval {
    field: Arc<dyn GridFieldInterval>,
}

impl FieldAsGridMaskInterval {
    pub fn new(field: Arc<dyn GridFieldInterval>) -> Self {
        FieldAsGridMaskInterval { field }
    }
}

impl GridMask for FieldAsGridMaskInterval {
    fn dims(&self) -> usize {
        self.field.dims()
    }

    fn test(&self, pos: &[i64]) -> bool {
        self.field.sample(pos).truthy()
    }
}

impl GridMaskInterval for FieldAsGridMaskInterval {
    fn min(&self) -> Vec<i64> {
        self.field.min()
    }

    fn max(&self) -> Vec<i64> {
        self.field.max()
    }
}

// ── Real: mask viewed as field ──────────────────────────────────────────────

pub struct MaskAsRealField {
    mask: Arc<dyn RealMask>,
}

impl MaskAsRealField {
    pub fn new(mask: Arc<dyn RealMask>) -> Self {
        MaskAsRealField { mask }
    }
}

impl RealField for MaskAsRealField {
    fn dims(&self) -> usize {
        self.mask.dims()
    }

    fn sample(&self, pos: &[f64]) -> Sample {
        Sample::Bit(self.mask.test(pos))
    }
}

pub struct MaskAsRealFieldInterval {
    mask: Arc<dyn RealMaskInterval>,
}

impl MaskAsRealFieldInterval {
    pub fn new(mask: Arc<dyn RealMaskInterval>) -> Self {
        MaskAsRealFieldInterval { mask }
    }
}

impl RealField for MaskAsRealFieldInterval {
    fn dims(&self) -> usize {
        self.mask.dims()
    }

    fn sample(&self, pos: &[f64]) -> Sample {
        Sample::Bit(self.mask.test(pos))
    }
}

impl RealFieldInterval for MaskAsRealFieldInterval {
    fn min(&self) -> Vec<f64> {
        self.mask.min()
    }

    fn max(&self) -> Vec<f64> {
        self.mask.max()
    }
}

// ── Real: field viewed as mask ──────────────────────────────────────────────

pub struct FieldAsRealMask {
    field: Arc<dyn RealField>,
}

impl FieldAsRealMask {
    pub fn new(field: Arc<dyn RealField>) -> Self {
        FieldAsRealMask { field }
    }
}

impl RealMask for FieldAsRealMask {
    fn dims(&self) -> usize {
        self.field.dims()
    }

    fn test(&self, pos: &[f64]) -> bool {
        self.field.sample(pos).truthy()
    }
}

pub struct FieldAsRealMaskInterval {
    field: Arc<dyn RealFieldInterval>,
}

impl FieldAsRealMaskInterval {
    pub fn new(field: Arc<dyn RealFieldInterval>) -> Self {
        FieldAsRealMaskInterval { field }
    }
}

impl RealMask for FieldAsRealMaskInterval {
    fn dims(&self) -> usize {
        self.field.dims()
    }

    fn test(&self, pos: &[f64]) -> bool {
        self.field.sample(pos).truthy()
    }
}

impl RealMaskInterval for FieldAsRealMaskInterval {
    fn min(&self) -> Vec<f64> {
        self.field.min()
    }

    fn max(&self) -> Vec<f64> {
        self.field.max()
    }
}
