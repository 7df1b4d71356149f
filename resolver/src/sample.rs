// sample.rs — Element values produced by sampled fields
//
// A sampled field yields one value per position. The concrete value type is
// unknown until runtime, so both the value and its type tag are modeled as
// closed enums. Resolution only ever accepts the bit element type; the other
// variants exist so non-bit sources can be represented (and rejected) rather
// than being unconstructable.
//
// Preconditions: none (types only).
// Side effects: none.

use std::fmt;

use serde::Serialize;

// ── Element type tag ────────────────────────────────────────────────────────

/// Runtime tag for the value type a field produces at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Bit,
    U8,
    I16,
    U16,
    I32,
    F32,
    F64,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Bit => "bit",
            ElementType::U8 => "u8",
            ElementType::I16 => "i16",
            ElementType::U16 => "u16",
            ElementType::I32 => "i32",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
        };
        write!(f, "{}", name)
    }
}

// ── Sampled value ───────────────────────────────────────────────────────────

/// One value sampled from a field at a single position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Bit(bool),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    F32(f32),
    F64(f64),
}

impl Sample {
    pub fn element_type(&self) -> ElementType {
        match self {
            Sample::Bit(_) => ElementType::Bit,
            Sample::U8(_) => ElementType::U8,
            Sample::I16(_) => ElementType::I16,
            Sample::U16(_) => ElementType::U16,
            Sample::I32(_) => ElementType::I32,
            Sample::F32(_) => ElementType::F32,
            Sample::F64(_) => ElementType::F64,
        }
    }

    /// True exactly for `Bit(true)`. Non-bit samples are never truthy; a
    /// field of the wrong element type must not masquerade as a predicate.
    pub fn truthy(&self) -> bool {
        matches!(self, Sample::Bit(true))
    }

    pub fn as_bit(&self) -> Option<bool> {
        match self {
            Sample::Bit(b) => Some(*b),
            _ => None,
        }
    }
}
