// registry.rs — Conversion registry
//
// Population happens once, through `RegistryBuilder`, before any resolution
// call; `freeze` is the barrier after which the registry is read-only and
// shares safely across threads. Each registered rule gets a descriptor
// recording its declared source, target, and priority — the registry matches
// on descriptors and only consults the rule itself for its runtime
// applicability predicate.
//
// Failure modes: lookup reports absence, never an error; what absence means
// is the resolution engine's call.

use serde::Serialize;
use tracing::debug;

use crate::builtin::builtin_converters;
use crate::convert::{Candidate, Convert, SourceSpec};
use crate::shape::ShapeSpec;

// ── Descriptors ─────────────────────────────────────────────────────────────

/// Declared capabilities of one registered rule.
#[derive(Debug, Clone, Serialize)]
pub struct ConverterDesc {
    pub name: &'static str,
    pub source: SourceSpec,
    pub target: ShapeSpec,
    pub priority: i32,
}

/// One registered rule: descriptor plus implementation.
pub struct ConverterEntry {
    desc: ConverterDesc,
    rule: Box<dyn Convert>,
}

impl ConverterEntry {
    pub fn desc(&self) -> &ConverterDesc {
        &self.desc
    }

    pub fn rule(&self) -> &dyn Convert {
        self.rule.as_ref()
    }
}

// ── Builder ─────────────────────────────────────────────────────────────────

/// Mutable population phase. Registration order is preserved and breaks
/// exact priority ties.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<ConverterEntry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        RegistryBuilder::default()
    }

    /// Builder pre-populated with the shipped rule set.
    pub fn with_builtins() -> Self {
        let mut builder = RegistryBuilder::new();
        for rule in builtin_converters() {
            builder.register_boxed(rule);
        }
        builder
    }

    pub fn register<C: Convert + 'static>(&mut self, rule: C) -> &mut Self {
        self.register_boxed(Box::new(rule))
    }

    pub fn register_boxed(&mut self, rule: Box<dyn Convert>) -> &mut Self {
        let desc = ConverterDesc {
            name: rule.name(),
            source: rule.source(),
            target: rule.target(),
            priority: rule.priority(),
        };
        self.entries.push(ConverterEntry { desc, rule });
        self
    }

    /// End of population. The frozen registry is immutable.
    pub fn freeze(self) -> ConversionRegistry {
        ConversionRegistry {
            entries: self.entries,
        }
    }
}

// ── Frozen registry ─────────────────────────────────────────────────────────

/// Read-only collection of conversion rules.
pub struct ConversionRegistry {
    entries: Vec<ConverterEntry>,
}

impl ConversionRegistry {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ConverterDesc> {
        self.entries.iter().map(|e| &e.desc)
    }

    /// Best rule converting `candidate` to a shape serving `request`, or
    /// absence. Selection: declared target serves the request, declared
    /// source accepts the candidate, the rule's own predicate holds; highest
    /// priority wins, first registered breaks ties.
    pub fn lookup(&self, candidate: &Candidate, request: &ShapeSpec) -> Option<&ConverterEntry> {
        self.lookup_where(candidate, |target| request.accepts_target(target))
    }

    /// Same selection with a caller-supplied filter over declared targets.
    pub fn lookup_where(
        &self,
        candidate: &Candidate,
        target_filter: impl Fn(&ShapeSpec) -> bool,
    ) -> Option<&ConverterEntry> {
        let mut best: Option<&ConverterEntry> = None;
        for entry in &self.entries {
            if !target_filter(&entry.desc.target) {
                continue;
            }
            if !entry.desc.source.accepts(candidate) {
                continue;
            }
            if !entry.rule.applicable(candidate) {
                continue;
            }
            match best {
                Some(b) if b.desc.priority >= entry.desc.priority => {}
                _ => best = Some(entry),
            }
        }
        if let Some(entry) = best {
            debug!(
                converter = entry.desc.name,
                priority = entry.desc.priority,
                candidate = candidate.type_name(),
                "selected converter"
            );
        }
        best
    }

    // ── Manifest ────────────────────────────────────────────────────────

    /// Human-readable manifest of the registered rules.
    pub fn manifest_json(&self) -> String {
        // Descriptor serialization is infallible: no maps with non-string
        // keys, no untagged enums.
        serde_json::to_string_pretty(&self.manifest()).unwrap_or_default()
    }

    /// Compact manifest with stable field order, input to the fingerprint.
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(&self.manifest()).unwrap_or_default()
    }

    /// SHA-256 of the canonical manifest. Stable across processes for the
    /// same rule set in the same order.
    pub fn fingerprint(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_json().as_bytes());
        let result = hasher.finalize();
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Hex string of the fingerprint (64 characters).
    pub fn fingerprint_hex(&self) -> String {
        use std::fmt::Write;
        let mut s = String::with_capacity(64);
        for b in self.fingerprint() {
            let _ = write!(s, "{:02x}", b);
        }
        s
    }

    fn manifest(&self) -> Manifest<'_> {
        Manifest {
            schema_version: 1,
            converters: self.descriptors().collect(),
        }
    }
}

#[derive(Serialize)]
struct Manifest<'a> {
    schema_version: u32,
    converters: Vec<&'a ConverterDesc>,
}
