// mask.rs — Canonical region representations (geometry boundary)
//
// Object-safe traits for the eight canonical forms, plus `Region`, the closed
// sum resolution operates on. The geometry itself (what a given mask shape
// means spatially) lives behind these traits; this crate only routes values
// between the forms.
//
// Interval forms are supertraited on their unbounded base form, so a bounded
// value is usable wherever the unbounded form is requested. `Region` values
// hold `Arc`s: resolution hands candidates back unchanged when they already
// satisfy a request, and callers may keep cheap clones.

use std::sync::Arc;

use crate::sample::Sample;
use crate::shape::{Domain, Form, ShapeSpec};

// ── Predicate forms ─────────────────────────────────────────────────────────

/// Membership predicate over integer grid positions.
pub trait GridMask: Send + Sync {
    fn dims(&self) -> usize;
    fn test(&self, pos: &[i64]) -> bool;
}

/// Grid predicate with a finite bounding interval (inclusive corners).
pub trait GridMaskInterval: GridMask {
    fn min(&self) -> Vec<i64>;
    fn max(&self) -> Vec<i64>;
}

/// Membership predicate over real-valued positions.
pub trait RealMask: Send + Sync {
    fn dims(&self) -> usize;
    fn test(&self, pos: &[f64]) -> bool;
}

/// Real predicate with a finite bounding interval (inclusive corners).
pub trait RealMaskInterval: RealMask {
    fn min(&self) -> Vec<f64>;
    fn max(&self) -> Vec<f64>;
}

// ── Sampled-field forms ─────────────────────────────────────────────────────

/// Function returning a sampled value at each grid position. The element
/// type is a runtime property of the produced samples; converters require it
/// to be uniform across positions.
pub trait GridField: Send + Sync {
    fn dims(&self) -> usize;
    fn sample(&self, pos: &[i64]) -> Sample;
}

/// Grid field with a finite bounding interval.
pub trait GridFieldInterval: GridField {
    fn min(&self) -> Vec<i64>;
    fn max(&self) -> Vec<i64>;
}

/// Function returning a sampled value at each real-valued position.
pub trait RealField: Send + Sync {
    fn dims(&self) -> usize;
    fn sample(&self, pos: &[f64]) -> Sample;
}

/// Real field with a finite bounding interval.
pub trait RealFieldInterval: RealField {
    fn min(&self) -> Vec<f64>;
    fn max(&self) -> Vec<f64>;
}

// ── Region ──────────────────────────────────────────────────────────────────

/// A value known to be one of the eight canonical forms.
#[derive(Clone)]
pub enum Region {
    GridMask(Arc<dyn GridMask>),
    GridMaskInterval(Arc<dyn GridMaskInterval>),
    RealMask(Arc<dyn RealMask>),
    RealMaskInterval(Arc<dyn RealMaskInterval>),
    GridField(Arc<dyn GridField>),
    GridFieldInterval(Arc<dyn GridFieldInterval>),
    RealField(Arc<dyn RealField>),
    RealFieldInterval(Arc<dyn RealFieldInterval>),
}

impl Region {
    /// Runtime shape of this value. Predicates carry the bit element by
    /// construction; a field's element type is unknown until probed, so its
    /// shape is generic and the element-type guard decides the rest.
    pub fn shape(&self) -> ShapeSpec {
        match self {
            Region::GridMask(_) => ShapeSpec::bit(Domain::Grid, Form::Mask),
            Region::GridMaskInterval(_) => ShapeSpec::bit(Domain::Grid, Form::MaskInterval),
            Region::RealMask(_) => ShapeSpec::bit(Domain::Real, Form::Mask),
            Region::RealMaskInterval(_) => ShapeSpec::bit(Domain::Real, Form::MaskInterval),
            Region::GridField(_) => ShapeSpec::any(Domain::Grid, Form::Field),
            Region::GridFieldInterval(_) => ShapeSpec::any(Domain::Grid, Form::FieldInterval),
            Region::RealField(_) => ShapeSpec::any(Domain::Real, Form::Field),
            Region::RealFieldInterval(_) => ShapeSpec::any(Domain::Real, Form::FieldInterval),
        }
    }

    /// Canonical form name, used in conversion failure messages. The concrete
    /// implementation behind the trait object is not recoverable here, so
    /// diagnostics stay at form granularity.
    pub fn type_name(&self) -> &'static str {
        match self {
            Region::GridMask(_) => "GridMask",
            Region::GridMaskInterval(_) => "GridMaskInterval",
            Region::RealMask(_) => "RealMask",
            Region::RealMaskInterval(_) => "RealMaskInterval",
            Region::GridField(_) => "GridField",
            Region::GridFieldInterval(_) => "GridFieldInterval",
            Region::RealField(_) => "RealField",
            Region::RealFieldInterval(_) => "RealFieldInterval",
        }
    }

    // ── Checked extraction ──────────────────────────────────────────────
    //
    // Interval forms upcast to their unbounded base form; the reverse never
    // holds.

    pub fn as_grid_mask(&self) -> Option<Arc<dyn GridMask>> {
        match self {
            Region::GridMask(m) => Some(m.clone()),
            Region::GridMaskInterval(m) => {
                let up: Arc<dyn GridMask> = m.clone();
                Some(up)
            }
            _ => None,
        }
    }

    pub fn as_grid_mask_interval(&self) -> Option<Arc<dyn GridMaskInterval>> {
        match self {
            Region::GridMaskInterval(m) => Some(m.clone()),
            _ => None,
        }
    }

    pub fn as_real_mask(&self) -> Option<Arc<dyn RealMask>> {
        match self {
            Region::RealMask(m) => Some(m.clone()),
            Region::RealMaskInterval(m) => {
                let up: Arc<dyn RealMask> = m.clone();
                Some(up)
            }
            _ => None,
        }
    }

    pub fn as_real_mask_interval(&self) -> Option<Arc<dyn RealMaskInterval>> {
        match self {
            Region::RealMaskInterval(m) => Some(m.clone()),
            _ => None,
        }
    }

    pub fn as_grid_field(&self) -> Option<Arc<dyn GridField>> {
        match self {
            Region::GridField(f) => Some(f.clone()),
            Region::GridFieldInterval(f) => {
                let up: Arc<dyn GridField> = f.clone();
                Some(up)
            }
            _ => None,
        }
    }

    pub fn as_grid_field_interval(&self) -> Option<Arc<dyn GridFieldInterval>> {
        match self {
            Region::GridFieldInterval(f) => Some(f.clone()),
            _ => None,
        }
    }

    pub fn as_real_field(&self) -> Option<Arc<dyn RealField>> {
        match self {
            Region::RealField(f) => Some(f.clone()),
            Region::RealFieldInterval(f) => {
                let up: Arc<dyn RealField> = f.clone();
                Some(up)
            }
            _ => None,
        }
    }

    pub fn as_real_field_interval(&self) -> Option<Arc<dyn RealFieldInterval>> {
        match self {
            Region::RealFieldInterval(f) => Some(f.clone()),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Region::{}", self.type_name())
    }
}
