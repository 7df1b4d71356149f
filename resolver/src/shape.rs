// shape.rs — Capability descriptors for canonical region representations
//
// A `ShapeSpec` structurally describes one canonical representation: its
// coordinate domain (grid or real), its form (membership predicate or
// sampled field, optionally interval-bounded), and its element spec. Shape
// matching is the static half of converter selection; the element-type guard
// covers the half only a runtime value can answer.
//
// Preconditions: none (types only).
// Side effects: none.

use std::fmt;

use serde::Serialize;

use crate::sample::ElementType;

// ── Axes ────────────────────────────────────────────────────────────────────

/// Coordinate domain: integer grid positions or real-valued positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Grid,
    Real,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Grid => write!(f, "Grid"),
            Domain::Real => write!(f, "Real"),
        }
    }
}

/// Representation form: membership predicate or sampled field, each either
/// unbounded or carrying a finite bounding interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Form {
    Mask,
    MaskInterval,
    Field,
    FieldInterval,
}

impl Form {
    pub fn is_mask(self) -> bool {
        matches!(self, Form::Mask | Form::MaskInterval)
    }

    pub fn is_field(self) -> bool {
        matches!(self, Form::Field | Form::FieldInterval)
    }

    pub fn is_interval(self) -> bool {
        matches!(self, Form::MaskInterval | Form::FieldInterval)
    }

    /// Does a value of form `candidate` satisfy a request for `self`?
    /// An interval-bounded form satisfies its unbounded base form, never the
    /// reverse.
    pub fn accepts(self, candidate: Form) -> bool {
        candidate == self
            || match self {
                Form::Mask => candidate == Form::MaskInterval,
                Form::Field => candidate == Form::FieldInterval,
                _ => false,
            }
    }

    /// Same boundedness, predicate flipped to field and vice versa. This is
    /// the intermediate form the resolution fallback routes through.
    pub fn counterpart(self) -> Form {
        match self {
            Form::Mask => Form::Field,
            Form::MaskInterval => Form::FieldInterval,
            Form::Field => Form::Mask,
            Form::FieldInterval => Form::MaskInterval,
        }
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Form::Mask => write!(f, "Mask"),
            Form::MaskInterval => write!(f, "MaskInterval"),
            Form::Field => write!(f, "Field"),
            Form::FieldInterval => write!(f, "FieldInterval"),
        }
    }
}

// ── Element spec ────────────────────────────────────────────────────────────

/// Declared element type of a shape. `Any` marks a shape generic over its
/// element; the concrete type is then checked on the runtime value by the
/// element-type guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementSpec {
    Any,
    Is(ElementType),
}

impl ElementSpec {
    /// Compatibility is symmetric: `Any` matches anything, concrete types
    /// must be equal.
    pub fn compatible(&self, other: &ElementSpec) -> bool {
        match (self, other) {
            (ElementSpec::Any, _) | (_, ElementSpec::Any) => true,
            (ElementSpec::Is(a), ElementSpec::Is(b)) => a == b,
        }
    }
}

// ── Shape spec ──────────────────────────────────────────────────────────────

/// Structural description of one canonical region representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShapeSpec {
    pub domain: Domain,
    pub form: Form,
    pub element: ElementSpec,
}

impl ShapeSpec {
    pub const fn new(domain: Domain, form: Form, element: ElementSpec) -> Self {
        ShapeSpec {
            domain,
            form,
            element,
        }
    }

    /// Shape with the bit element type — the only element resolution accepts.
    pub const fn bit(domain: Domain, form: Form) -> Self {
        ShapeSpec::new(domain, form, ElementSpec::Is(ElementType::Bit))
    }

    /// Shape generic over its element type.
    pub const fn any(domain: Domain, form: Form) -> Self {
        ShapeSpec::new(domain, form, ElementSpec::Any)
    }

    /// Does a converter declaring target `declared` serve a request for
    /// `self`? Domains must be equal; the declared form must equal the
    /// requested form or be its interval refinement; element specs must be
    /// compatible.
    pub fn accepts_target(&self, declared: &ShapeSpec) -> bool {
        self.domain == declared.domain
            && self.form.accepts(declared.form)
            && self.element.compatible(&declared.element)
    }

    /// Does a candidate of runtime shape `candidate` feed a converter
    /// declaring source `self`? Same rule as target acceptance.
    pub fn accepts_source(&self, candidate: &ShapeSpec) -> bool {
        self.accepts_target(candidate)
    }

    /// The intermediate shape the resolution fallback routes through: same
    /// domain and boundedness, mask and field forms swapped.
    pub fn counterpart(&self) -> ShapeSpec {
        ShapeSpec::new(self.domain, self.form.counterpart(), self.element)
    }
}

impl fmt::Display for ShapeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.domain, self.form)?;
        match self.element {
            ElementSpec::Any => Ok(()),
            ElementSpec::Is(e) => write!(f, "<{}>", e),
        }
    }
}
