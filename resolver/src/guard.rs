// guard.rs — Element-type guard
//
// Shape matching cannot see a field's element type; only a concrete sample
// can. The guard probes exactly one position — the interval's min corner for
// bounded fields, the origin for unbounded ones — and checks the element is
// bit. Single-sample by contract: registered converters must produce fields
// with a uniform element type across positions.
//
// Failure modes: none. The guard answers a boolean and never errors.

use crate::mask::{GridField, GridFieldInterval, RealField, RealFieldInterval, Region};
use crate::sample::ElementType;

/// Is this region's element type bit? Predicates are bit by construction;
/// fields are probed.
pub fn region_is_bit(region: &Region) -> bool {
    match region {
        Region::GridMask(_)
        | Region::GridMaskInterval(_)
        | Region::RealMask(_)
        | Region::RealMaskInterval(_) => true,
        Region::GridField(f) => grid_field_is_bit(f.as_ref()),
        Region::GridFieldInterval(f) => grid_field_interval_is_bit(f.as_ref()),
        Region::RealField(f) => real_field_is_bit(f.as_ref()),
        Region::RealFieldInterval(f) => real_field_interval_is_bit(f.as_ref()),
    }
}

/// Probe an unbounded grid field at the origin.
pub fn grid_field_is_bit(field: &dyn GridField) -> bool {
    let probe = vec![0i64; field.dims()];
    field.sample(&probe).element_type() == ElementType::Bit
}

/// Probe a bounded grid field at its min corner.
pub fn grid_field_interval_is_bit(field: &dyn GridFieldInterval) -> bool {
    field.sample(&field.min()).element_type() == ElementType::Bit
}

/// Probe an unbounded real field at the origin.
pub fn real_field_is_bit(field: &dyn RealField) -> bool {
    let probe = vec![0.0f64; field.dims()];
    field.sample(&probe).element_type() == ElementType::Bit
}

/// Probe a bounded real field at its min corner.
pub fn real_field_interval_is_bit(field: &dyn RealFieldInterval) -> bool {
    field.sample(&field.min()).element_type() == ElementType::Bit
}
