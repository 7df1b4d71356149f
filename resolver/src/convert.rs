// convert.rs — Conversion rule surface
//
// `Candidate` is the untyped input resolution routes: either a value already
// in canonical form or an arbitrary concrete value contributed by a caller.
// `Convert` is the capability interface every conversion rule implements; the
// registry stores rules behind it and matches them by declared source/target
// shape before consulting the rule's own applicability predicate.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::mask::Region;
use crate::shape::ShapeSpec;

// ── Priority constants ──────────────────────────────────────────────────────

/// Converter selection priorities. Higher wins; exact ties fall back to
/// registration order.
pub mod priority {
    pub const FIRST: i32 = 1_000_000;
    pub const VERY_HIGH: i32 = 10_000;
    pub const HIGH: i32 = 100;
    pub const NORMAL: i32 = 0;
    pub const LOW: i32 = -100;
    pub const VERY_LOW: i32 = -10_000;
    pub const LAST: i32 = -1_000_000;
}

// ── Candidate ───────────────────────────────────────────────────────────────

/// An arbitrary concrete value offered for conversion, carried with its type
/// name for diagnostics.
#[derive(Clone)]
pub struct RawValue {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl RawValue {
    pub fn type_id(&self) -> TypeId {
        (*self.value).type_id()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Input to a resolution request: a canonical region or a raw value a
/// registered converter may know how to interpret.
#[derive(Clone)]
pub enum Candidate {
    Region(Region),
    Raw(RawValue),
}

impl Candidate {
    pub fn raw<T: Any + Send + Sync>(value: T) -> Self {
        Candidate::Raw(RawValue {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        })
    }

    pub fn region(region: Region) -> Self {
        Candidate::Region(region)
    }

    pub fn as_region(&self) -> Option<&Region> {
        match self {
            Candidate::Region(r) => Some(r),
            Candidate::Raw(_) => None,
        }
    }

    pub fn downcast_raw<T: Any>(&self) -> Option<&T> {
        match self {
            Candidate::Raw(raw) => raw.value.downcast_ref::<T>(),
            Candidate::Region(_) => None,
        }
    }

    /// Runtime shape, for candidates already in canonical form.
    pub fn shape(&self) -> Option<ShapeSpec> {
        self.as_region().map(Region::shape)
    }

    pub fn raw_type_id(&self) -> Option<TypeId> {
        match self {
            Candidate::Raw(raw) => Some(raw.type_id()),
            Candidate::Region(_) => None,
        }
    }

    /// Type name for failure messages. Raw candidates report their concrete
    /// type; region candidates report the canonical form, not the
    /// implementation behind the trait object.
    pub fn type_name(&self) -> &'static str {
        match self {
            Candidate::Region(r) => r.type_name(),
            Candidate::Raw(raw) => raw.type_name(),
        }
    }
}

impl From<Region> for Candidate {
    fn from(region: Region) -> Self {
        Candidate::Region(region)
    }
}

// ── Declared source ─────────────────────────────────────────────────────────

/// A converter's declared input: a canonical shape, or one concrete value
/// type identified at runtime.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSpec {
    Shape(ShapeSpec),
    Value {
        type_name: &'static str,
        #[serde(skip)]
        id: TypeId,
    },
}

impl SourceSpec {
    pub fn value<T: Any>() -> Self {
        SourceSpec::Value {
            type_name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    pub fn accepts(&self, candidate: &Candidate) -> bool {
        match self {
            SourceSpec::Shape(declared) => match candidate.shape() {
                Some(shape) => declared.accepts_source(&shape),
                None => false,
            },
            SourceSpec::Value { id, .. } => candidate.raw_type_id() == Some(*id),
        }
    }
}

// ── Converter capability interface ──────────────────────────────────────────

/// One conversion rule. Rules are contributed at registry population and
/// never mutated afterwards; `convert` must be pure with respect to the
/// candidate.
pub trait Convert: Send + Sync {
    /// Stable rule name, surfaced in the registry manifest.
    fn name(&self) -> &'static str;

    fn source(&self) -> SourceSpec;

    fn target(&self) -> ShapeSpec;

    fn priority(&self) -> i32 {
        priority::NORMAL
    }

    /// Runtime applicability beyond the static shape match — typically a
    /// probe of the candidate's sampled element type.
    fn applicable(&self, _candidate: &Candidate) -> bool {
        true
    }

    fn convert(&self, candidate: &Candidate) -> Result<Region, ConvertError>;
}

// ── Errors ──────────────────────────────────────────────────────────────────

/// A converter was applied to a candidate it does not support. The registry
/// filters by declared shapes first, so hitting this means a rule's
/// declaration and implementation disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertError {
    pub converter: &'static str,
    pub candidate: &'static str,
}

impl ConvertError {
    pub fn unsupported(converter: &'static str, candidate: &'static str) -> Self {
        ConvertError {
            converter,
            candidate,
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "converter '{}' cannot convert {}",
            self.converter, self.candidate
        )
    }
}

impl std::error::Error for ConvertError {}
