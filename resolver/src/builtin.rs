// builtin.rs — Shipped conversion rules
//
// Eight rules pairing each predicate form with its same-domain,
// same-boundedness field form, in both directions. The unbounded pairs sit
// at low priority so interval-preserving rules win whenever the candidate
// carries bounds. Field-to-mask rules are applicable only when the guard
// confirms the candidate samples bit elements; mask-to-field rules need no
// runtime check.

use std::sync::Arc;

use crate::adapt::{
    FieldAsGridMask, FieldAsGridMaskInterval, FieldAsRealMask, FieldAsRealMaskInterval,
    MaskAsGridField, MaskAsGridFieldInterval, MaskAsRealField, MaskAsRealFieldInterval,
};
use crate::convert::{priority, Candidate, Convert, ConvertError, SourceSpec};
use crate::guard;
use crate::mask::Region;
use crate::shape::{Domain, Form, ShapeSpec};

/// The full shipped rule set, in registration order. This is what a plugin
/// discovery layer would contribute at start-up.
pub fn builtin_converters() -> Vec<Box<dyn Convert>> {
    vec![
        Box::new(GridMaskToField),
        Box::new(GridFieldToMask),
        Box::new(GridMaskIntervalToFieldInterval),
        Box::new(GridFieldIntervalToMaskInterval),
        Box::new(RealMaskToField),
        Box::new(RealFieldToMask),
        Box::new(RealMaskIntervalToFieldInterval),
        Box::new(RealFieldIntervalToMaskInterval),
    ]
}

fn unsupported(converter: &'static str, candidate: &Candidate) -> ConvertError {
    ConvertError::unsupported(converter, candidate.type_name())
}

// ── Grid domain ─────────────────────────────────────────────────────────────

pub struct GridMaskToField;

impl Convert for GridMaskToField {
    fn name(&self) -> &'static str {
        "grid-mask-to-field"
    }

    fn source(&self) -> SourceSpec {
        SourceSpec::Shape(ShapeSpec::bit(Domain::Grid, Form::Mask))
    }

    fn target(&self) -> ShapeSpec {
        ShapeSpec::bit(Domain::Grid, Form::Field)
    }

    fn priority(&self) -> i32 {
        priority::LOW
    }

    fn convert(&self, candidate: &Candidate) -> Result<Region, ConvertError> {
        let mask = candidate
            .as_region()
            .and_then(Region::as_grid_mask)
            .ok_or_else(|| unsupported(self.name(), candidate))?;
        Ok(Region::GridField(Arc::new(MaskAsGridField::new(mask))))
    }
}

pub struct GridFieldToMask;

impl Convert for GridFieldToMask {
    fn name(&self) -> &'static str {
        "grid-field-to-mask"
    }

    fn source(&self) -> SourceSpec {
        SourceSpec::Shape(ShapeSpec::any(Domain::Grid, Form::Field))
    }

    fn target(&self) -> ShapeSpec {
        ShapeSpec::bit(Domain::Grid, Form::Mask)
    }

    fn priority(&self) -> i32 {
        priority::LOW
    }

    fn applicable(&self, candidate: &Candidate) -> bool {
        match candidate.as_region() {
            Some(region) => region.as_grid_field().is_some() && guard::region_is_bit(region),
            None => false,
        }
    }

    fn convert(&self, candidate: &Candidate) -> Result<Region, ConvertError> {
        let field = candidate
            .as_region()
            .and_then(Region::as_grid_field)
            .ok_or_else(|| unsupported(self.name(), candidate))?;
        Ok(Region::GridMask(Arc::new(FieldAsGridMask::new(field))))
    }
}

pub struct GridMaskIntervalToFieldInterval;

impl Convert for GridMaskIntervalToFieldInterval {
    fn name(&self) -> &'static str {
        "grid-mask-interval-to-field-interval"
    }

    fn source(&self) -> SourceSpec {
        SourceSpec::Shape(ShapeSpec::bit(Domain::Grid, Form::MaskInterval))
    }

    fn target(&self) -> ShapeSpec {
        ShapeSpec::bit(Domain::Grid, Form::FieldInterval)
    }

    fn convert(&self, candidate: &Candidate) -> Result<Region, ConvertError> {
        let mask = candidate
            .as_region()
            .and_then(Region::as_grid_mask_interval)
            .ok_or_else(|| unsupported(self.name(), candidate))?;
        Ok(Region::GridFieldInterval(Arc::new(
            MaskAsGridFieldInterval::new(mask),
        )))
    }
}

pub struct GridFieldIntervalToMaskInterval;

impl Convert for GridFieldIntervalToMaskInterval {
    fn name(&self) -> &'static str {
        "grid-field-interval-to-mask-interval"
    }

    fn source(&self) -> SourceSpec {
        SourceSpec::Shape(ShapeSpec::any(Domain::Grid, Form::FieldInterval))
    }

    fn target(&self) -> ShapeSpec {
        ShapeSpec::bit(Domain::Grid, Form::MaskInterval)
    }

    fn applicable(&self, candidate: &Candidate) -> bool {
        match candidate.as_region() {
            Some(region) => {
                region.as_grid_field_interval().is_some() && guard::region_is_bit(region)
            }
            None => false,
        }
    }

    fn convert(&self, candidate: &Candidate) -> Result<Region, ConvertError> {
        let field = candidate
            .as_region()
            .and_then(Region::as_grid_field_interval)
            .ok_or_else(|| unsupported(self.name(), candidate))?;
        Ok(Region::GridMaskInterval(Arc::new(
            FieldAsGridMaskInterval::new(field),
        )))
    }
}

// ── Real domain ─────────────────────────────────────────────────────────────

pub struct RealMaskToField;

impl Convert for RealMaskToField {
    fn name(&self) -> &'static str {
        "real-mask-to-field"
    }

    fn source(&self) -> SourceSpec {
        SourceSpec::Shape(ShapeSpec::bit(Domain::Real, Form::Mask))
    }

    fn target(&self) -> ShapeSpec {
        ShapeSpec::bit(Domain::Real, Form::Field)
    }

    fn priority(&self) -> i32 {
        priority::LOW
    }

    fn convert(&self, candidate: &Candidate) -> Result<Region, ConvertError> {
        let mask = candidate
            .as_region()
            .and_then(Region::as_real_mask)
            .ok_or_else(|| unsupported(self.name(), candidate))?;
        Ok(Region::RealField(Arc::new(MaskAsRealField::new(mask))))
    }
}

pub struct RealFieldToMask;

impl Convert for RealFieldToMask {
    fn name(&self) -> &'static str {
        "real-field-to-mask"
    }

    fn source(&self) -> SourceSpec {
        SourceSpec::Shape(ShapeSpec::any(Domain::Real, Form::Field))
    }

    fn target(&self) -> ShapeSpec {
        ShapeSpec::bit(Domain::Real, Form::Mask)
    }

    fn priority(&self) -> i32 {
        priority::LOW
    }

    fn applicable(&self, candidate: &Candidate) -> bool {
        match candidate.as_region() {
            Some(region) => region.as_real_field().is_some() && guard::region_is_bit(region),
            None => false,
        }
    }

    fn convert(&self, candidate: &Candidate) -> Result<Region, ConvertError> {
        let field = candidate
            .as_region()
            .and_then(Region::as_real_field)
            .ok_or_else(|| unsupported(self.name(), candidate))?;
        Ok(Region::RealMask(Arc::new(FieldAsRealMask::new(field))))
    }
}

pub struct RealMaskIntervalToFieldInterval;

impl Convert for RealMaskIntervalToFieldInterval {
    fn name(&self) -> &'static str {
        "real-mask-interval-to-field-interval"
    }

    fn source(&self) -> SourceSpec {
        SourceSpec::Shape(ShapeSpec::bit(Domain::Real, Form::MaskInterval))
    }

    fn target(&self) -> ShapeSpec {
        ShapeSpec::bit(Domain::Real, Form::FieldInterval)
    }

    fn convert(&self, candidate: &Candidate) -> Result<Region, ConvertError> {
        let mask = candidate
            .as_region()
            .and_then(Region::as_real_mask_interval)
            .ok_or_else(|| unsupported(self.name(), candidate))?;
        Ok(Region::RealFieldInterval(Arc::new(
            MaskAsRealFieldInterval::new(mask),
        )))
    }
}

pub struct RealFieldIntervalToMaskInterval;

impl Convert for RealFieldIntervalToMaskInterval {
    fn name(&self) -> &'static str {
        "real-field-interval-to-mask-interval"
    }

    fn source(&self) -> SourceSpec {
        SourceSpec::Shape(ShapeSpec::any(Domain::Real, Form::FieldInterval))
    }

    fn target(&self) -> ShapeSpec {
        ShapeSpec::bit(Domain::Real, Form::MaskInterval)
    }

    fn applicable(&self, candidate: &Candidate) -> bool {
        match candidate.as_region() {
            Some(region) => {
                region.as_real_field_interval().is_some() && guard::region_is_bit(region)
            }
            None => false,
        }
    }

    fn convert(&self, candidate: &Candidate) -> Result<Region, ConvertError> {
        let field = candidate
            .as_region()
            .and_then(Region::as_real_field_interval)
            .ok_or_else(|| unsupported(self.name(), candidate))?;
        Ok(Region::RealMaskInterval(Arc::new(
            FieldAsRealMaskInterval::new(field),
        )))
    }
}
