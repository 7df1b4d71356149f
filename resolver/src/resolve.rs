// resolve.rs — Resolution engine
//
// Public entry point: one operation per canonical target shape, plus the
// untyped best-effort mask operation. Each typed operation runs the same
// search: reject absent input, return the candidate untouched when it
// already satisfies the request (guard-checked for field targets), try a
// direct registry hop, then one fallback hop through the counterpart shape
// (mask <-> field). Exactly two hops are ever composed; the fallback
// recursions run with fallback disabled, so worst-case work is a constant
// number of registry lookups.
//
// Preconditions: the registry is frozen before the first call.
// Failure modes: absent input, no matching converter after all hops, or a
//                match rejected solely by the element-type guard. All are
//                conclusive; nothing is retried.
// Side effects: none. Resolution writes no shared state.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::convert::Candidate;
use crate::guard;
use crate::mask::{
    GridField, GridFieldInterval, GridMask, GridMaskInterval, RealField, RealFieldInterval,
    RealMask, RealMaskInterval, Region,
};
use crate::registry::{ConversionRegistry, RegistryBuilder};
use crate::shape::{Domain, Form, ShapeSpec};

// ── Errors ──────────────────────────────────────────────────────────────────

/// Why a resolution request failed. One kind per taxonomy entry; all carry
/// the requested shape, and all but `NullInput` carry the candidate's
/// concrete type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The candidate was absent. No registry lookup is attempted.
    NullInput { target: String },
    /// No registered converter's declared shapes matched, after all fallback
    /// hops.
    NoConverter { candidate: String, target: String },
    /// A structurally matching conversion existed but was rejected by the
    /// element-type guard; the engine never returns a value of the wrong
    /// element type.
    ElementMismatch { candidate: String, target: String },
}

impl ResolveError {
    fn null_input(target: impl fmt::Display) -> Self {
        ResolveError::NullInput {
            target: target.to_string(),
        }
    }

    fn no_converter(candidate: &str, target: impl fmt::Display) -> Self {
        ResolveError::NoConverter {
            candidate: candidate.to_string(),
            target: target.to_string(),
        }
    }

    fn element_mismatch(candidate: &str, target: impl fmt::Display) -> Self {
        ResolveError::ElementMismatch {
            candidate: candidate.to_string(),
            target: target.to_string(),
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NullInput { target } => {
                write!(f, "cannot convert null to {}", target)
            }
            ResolveError::NoConverter { candidate, target } => {
                write!(f, "cannot convert {} to {}", candidate, target)
            }
            ResolveError::ElementMismatch { candidate, target } => {
                write!(
                    f,
                    "cannot convert {} to {}: sampled element type is not bit",
                    candidate, target
                )
            }
        }
    }
}

impl std::error::Error for ResolveError {}

// ── Engine ──────────────────────────────────────────────────────────────────

const GRID_MASK: ShapeSpec = ShapeSpec::bit(Domain::Grid, Form::Mask);
const GRID_MASK_INTERVAL: ShapeSpec = ShapeSpec::bit(Domain::Grid, Form::MaskInterval);
const REAL_MASK: ShapeSpec = ShapeSpec::bit(Domain::Real, Form::Mask);
const REAL_MASK_INTERVAL: ShapeSpec = ShapeSpec::bit(Domain::Real, Form::MaskInterval);
const GRID_FIELD: ShapeSpec = ShapeSpec::bit(Domain::Grid, Form::Field);
const GRID_FIELD_INTERVAL: ShapeSpec = ShapeSpec::bit(Domain::Grid, Form::FieldInterval);
const REAL_FIELD: ShapeSpec = ShapeSpec::bit(Domain::Real, Form::Field);
const REAL_FIELD_INTERVAL: ShapeSpec = ShapeSpec::bit(Domain::Real, Form::FieldInterval);

/// Resolves arbitrary candidates to canonical region representations against
/// a frozen conversion registry.
pub struct RegionResolver {
    registry: ConversionRegistry,
}

impl RegionResolver {
    pub fn new(registry: ConversionRegistry) -> Self {
        RegionResolver { registry }
    }

    /// Resolver over the shipped rule set only.
    pub fn with_builtins() -> Self {
        RegionResolver::new(RegistryBuilder::with_builtins().freeze())
    }

    pub fn registry(&self) -> &ConversionRegistry {
        &self.registry
    }

    // ── Typed operations ────────────────────────────────────────────────

    pub fn to_grid_mask(
        &self,
        candidate: Option<&Candidate>,
    ) -> Result<Arc<dyn GridMask>, ResolveError> {
        let cand = required(candidate, &GRID_MASK)?;
        let region = self.resolve(cand, &GRID_MASK, true)?;
        region
            .as_grid_mask()
            .ok_or_else(|| ResolveError::no_converter(cand.type_name(), GRID_MASK))
    }

    pub fn to_grid_mask_interval(
        &self,
        candidate: Option<&Candidate>,
    ) -> Result<Arc<dyn GridMaskInterval>, ResolveError> {
        let cand = required(candidate, &GRID_MASK_INTERVAL)?;
        let region = self.resolve(cand, &GRID_MASK_INTERVAL, true)?;
        region
            .as_grid_mask_interval()
            .ok_or_else(|| ResolveError::no_converter(cand.type_name(), GRID_MASK_INTERVAL))
    }

    pub fn to_real_mask(
        &self,
        candidate: Option<&Candidate>,
    ) -> Result<Arc<dyn RealMask>, ResolveError> {
        let cand = required(candidate, &REAL_MASK)?;
        let region = self.resolve(cand, &REAL_MASK, true)?;
        region
            .as_real_mask()
            .ok_or_else(|| ResolveError::no_converter(cand.type_name(), REAL_MASK))
    }

    pub fn to_real_mask_interval(
        &self,
        candidate: Option<&Candidate>,
    ) -> Result<Arc<dyn RealMaskInterval>, ResolveError> {
        let cand = required(candidate, &REAL_MASK_INTERVAL)?;
        let region = self.resolve(cand, &REAL_MASK_INTERVAL, true)?;
        region
            .as_real_mask_interval()
            .ok_or_else(|| ResolveError::no_converter(cand.type_name(), REAL_MASK_INTERVAL))
    }

    pub fn to_grid_field(
        &self,
        candidate: Option<&Candidate>,
    ) -> Result<Arc<dyn GridField>, ResolveError> {
        let cand = required(candidate, &GRID_FIELD)?;
        let region = self.resolve(cand, &GRID_FIELD, true)?;
        region
            .as_grid_field()
            .ok_or_else(|| ResolveError::no_converter(cand.type_name(), GRID_FIELD))
    }

    pub fn to_grid_field_interval(
        &self,
        candidate: Option<&Candidate>,
    ) -> Result<Arc<dyn GridFieldInterval>, ResolveError> {
        let cand = required(candidate, &GRID_FIELD_INTERVAL)?;
        let region = self.resolve(cand, &GRID_FIELD_INTERVAL, true)?;
        region
            .as_grid_field_interval()
            .ok_or_else(|| ResolveError::no_converter(cand.type_name(), GRID_FIELD_INTERVAL))
    }

    pub fn to_real_field(
        &self,
        candidate: Option<&Candidate>,
    ) -> Result<Arc<dyn RealField>, ResolveError> {
        let cand = required(candidate, &REAL_FIELD)?;
        let region = self.resolve(cand, &REAL_FIELD, true)?;
        region
            .as_real_field()
            .ok_or_else(|| ResolveError::no_converter(cand.type_name(), REAL_FIELD))
    }

    pub fn to_real_field_interval(
        &self,
        candidate: Option<&Candidate>,
    ) -> Result<Arc<dyn RealFieldInterval>, ResolveError> {
        let cand = required(candidate, &REAL_FIELD_INTERVAL)?;
        let region = self.resolve(cand, &REAL_FIELD_INTERVAL, true)?;
        region
            .as_real_field_interval()
            .ok_or_else(|| ResolveError::no_converter(cand.type_name(), REAL_FIELD_INTERVAL))
    }

    /// Best-effort resolution to any predicate form. Candidates already in a
    /// predicate form come back untouched; otherwise one registry lookup
    /// across all predicate targets (priority decides, so interval-preserving
    /// rules win), then the grid field hop, then the real field hop.
    pub fn to_mask(&self, candidate: Option<&Candidate>) -> Result<Region, ResolveError> {
        let cand = match candidate {
            Some(c) => c,
            None => return Err(ResolveError::null_input("Mask")),
        };

        if let Some(region) = cand.as_region() {
            if region.shape().form.is_mask() {
                return Ok(region.clone());
            }
        }

        if let Some(entry) = self.registry.lookup_where(cand, |t| t.form.is_mask()) {
            if let Ok(out) = entry.rule().convert(cand) {
                if out.shape().form.is_mask() {
                    return Ok(out);
                }
            }
        }

        for domain in [Domain::Grid, Domain::Real] {
            let field = ShapeSpec::bit(domain, Form::Field);
            if let Ok(inter) = self.resolve(cand, &field, false) {
                if guard::region_is_bit(&inter) {
                    let next = Candidate::from(inter);
                    let mask = ShapeSpec::bit(domain, Form::Mask);
                    if let Ok(out) = self.resolve(&next, &mask, false) {
                        return Ok(out);
                    }
                }
            }
        }

        Err(ResolveError::no_converter(cand.type_name(), "Mask"))
    }

    // ── Search ──────────────────────────────────────────────────────────

    /// The two-step search behind every typed operation. `fallback` is false
    /// on the recursive legs, which bounds composition to two hops.
    fn resolve(
        &self,
        cand: &Candidate,
        target: &ShapeSpec,
        fallback: bool,
    ) -> Result<Region, ResolveError> {
        let mut element_mismatch = false;

        // Identity short-circuit: a candidate already of the requested shape
        // comes back untouched, even when a matching converter is registered.
        // Field candidates still face the guard; their element type is a
        // runtime property.
        if let Some(region) = cand.as_region() {
            if target.accepts_target(&region.shape()) {
                if !target.form.is_field() || guard::region_is_bit(region) {
                    return Ok(region.clone());
                }
                element_mismatch = true;
            }
        }

        // Direct hop.
        if let Some(entry) = self.registry.lookup(cand, target) {
            if let Ok(out) = entry.rule().convert(cand) {
                if guard::region_is_bit(&out) {
                    if target.accepts_target(&out.shape()) {
                        return Ok(out);
                    }
                } else {
                    element_mismatch = true;
                }
            }
        }

        // Fallback hop through the counterpart shape, then a direct-only
        // resolution of the intermediate to the target.
        if fallback {
            let mid = target.counterpart();
            debug!(
                candidate = cand.type_name(),
                requested = %target,
                via = %mid,
                "direct resolution failed, trying intermediate hop"
            );
            match self.resolve(cand, &mid, false) {
                Ok(inter) => {
                    if guard::region_is_bit(&inter) {
                        let next = Candidate::from(inter);
                        match self.resolve(&next, target, false) {
                            Ok(out) => return Ok(out),
                            Err(ResolveError::ElementMismatch { .. }) => element_mismatch = true,
                            Err(_) => {}
                        }
                    } else {
                        element_mismatch = true;
                    }
                }
                Err(ResolveError::ElementMismatch { .. }) => element_mismatch = true,
                Err(_) => {}
            }
        }

        Err(if element_mismatch {
            ResolveError::element_mismatch(cand.type_name(), target)
        } else {
            ResolveError::no_converter(cand.type_name(), target)
        })
    }
}

fn required<'a>(
    candidate: Option<&'a Candidate>,
    target: &ShapeSpec,
) -> Result<&'a Candidate, ResolveError> {
    candidate.ok_or_else(|| ResolveError::null_input(target))
}
