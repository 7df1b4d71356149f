// Resolution engine conformance tests.
//
// Exercises the public resolver operations end to end against the shipped
// rule set plus caller-contributed converters: identity short-circuit,
// priority selection, two-hop fallback composition, null rejection, and
// element-type filtering.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use maskcast::convert::{priority, Candidate, Convert, ConvertError, SourceSpec};
use maskcast::mask::Region;
use maskcast::primitive::{ArrayField, BoxMask, PointMask};
use maskcast::registry::RegistryBuilder;
use maskcast::resolve::{RegionResolver, ResolveError};
use maskcast::sample::Sample;
use maskcast::shape::{Domain, Form, ShapeSpec};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn data_ptr<T: ?Sized>(arc: &Arc<T>) -> *const u8 {
    Arc::as_ptr(arc).cast::<u8>()
}

/// All 2^d corners of the interval spanned by `min` and `max`.
fn corners(min: &[i64], max: &[i64]) -> Vec<Vec<i64>> {
    let d = min.len();
    (0..1u32 << d)
        .map(|bits| {
            (0..d)
                .map(|i| if bits >> i & 1 == 1 { max[i] } else { min[i] })
                .collect()
        })
        .collect()
}

/// Converter from a raw `Vec<f64>` to a point mask, registered the way a
/// caller-supplied plugin would be.
struct VecToPointMask;

impl Convert for VecToPointMask {
    fn name(&self) -> &'static str {
        "vec-to-point-mask"
    }

    fn source(&self) -> SourceSpec {
        SourceSpec::value::<Vec<f64>>()
    }

    fn target(&self) -> ShapeSpec {
        ShapeSpec::bit(Domain::Real, Form::MaskInterval)
    }

    fn priority(&self) -> i32 {
        priority::LAST
    }

    fn convert(&self, candidate: &Candidate) -> Result<Region, ConvertError> {
        let point = candidate
            .downcast_raw::<Vec<f64>>()
            .ok_or_else(|| ConvertError::unsupported(self.name(), candidate.type_name()))?;
        Ok(Region::RealMaskInterval(Arc::new(PointMask::new(point))))
    }
}

/// Converter that counts how often it is applied. Used to verify the
/// identity short-circuit never invokes a registered rule.
struct CountingIdentity {
    applied: Arc<AtomicUsize>,
}

impl Convert for CountingIdentity {
    fn name(&self) -> &'static str {
        "counting-identity"
    }

    fn source(&self) -> SourceSpec {
        SourceSpec::Shape(ShapeSpec::bit(Domain::Real, Form::MaskInterval))
    }

    fn target(&self) -> ShapeSpec {
        ShapeSpec::bit(Domain::Real, Form::MaskInterval)
    }

    fn priority(&self) -> i32 {
        priority::FIRST
    }

    fn convert(&self, candidate: &Candidate) -> Result<Region, ConvertError> {
        self.applied.fetch_add(1, Ordering::Relaxed);
        let mask = candidate
            .as_region()
            .and_then(Region::as_real_mask_interval)
            .ok_or_else(|| ConvertError::unsupported(self.name(), candidate.type_name()))?;
        Ok(Region::RealMaskInterval(mask))
    }
}

// ── Identity ────────────────────────────────────────────────────────────────

#[test]
fn candidate_already_of_target_shape_returns_unchanged() {
    let resolver = RegionResolver::with_builtins();
    let mask: Arc<dyn maskcast::mask::RealMaskInterval> =
        Arc::new(BoxMask::new(&[8.0, -2.0], &[22.0, 65.25]));
    let cand = Candidate::region(Region::RealMaskInterval(mask.clone()));

    let out = resolver.to_real_mask(Some(&cand)).expect("real mask");
    assert_eq!(data_ptr(&out), data_ptr(&mask));
}

#[test]
fn identity_short_circuit_skips_registered_converters() {
    let applied = Arc::new(AtomicUsize::new(0));
    let mut builder = RegistryBuilder::with_builtins();
    builder.register(CountingIdentity {
        applied: applied.clone(),
    });
    let resolver = RegionResolver::new(builder.freeze());

    let mask: Arc<dyn maskcast::mask::RealMaskInterval> = Arc::new(PointMask::new(&[1.0, 2.0]));
    let cand = Candidate::region(Region::RealMaskInterval(mask.clone()));
    let out = resolver
        .to_real_mask_interval(Some(&cand))
        .expect("real mask interval");

    assert_eq!(data_ptr(&out), data_ptr(&mask));
    assert_eq!(applied.load(Ordering::Relaxed), 0);
}

// ── Untyped best-effort mask ────────────────────────────────────────────────

#[test]
fn bit_field_interval_resolves_to_interval_mask() {
    let resolver = RegionResolver::with_builtins();
    let mut field = ArrayField::bits(&[12, 52, 10]);
    field.set(&[3, 7, 2], Sample::Bit(true));
    let cand = Candidate::region(Region::GridFieldInterval(Arc::new(field)));

    // The interval-preserving rule outranks the unbounded one, so the
    // best-effort operation keeps the bounds.
    let out = resolver.to_mask(Some(&cand)).expect("mask");
    let mask = match out {
        Region::GridMaskInterval(m) => m,
        other => panic!("expected grid mask interval, got {:?}", other),
    };
    assert_eq!(mask.min(), vec![0, 0, 0]);
    assert_eq!(mask.max(), vec![11, 51, 9]);
    assert!(mask.test(&[3, 7, 2]));
    assert!(!mask.test(&[0, 0, 0]));
}

#[test]
fn mask_candidates_pass_through_best_effort_operation() {
    let resolver = RegionResolver::with_builtins();
    let mask: Arc<dyn maskcast::mask::RealMaskInterval> = Arc::new(PointMask::new(&[4.0]));
    let cand = Candidate::region(Region::RealMaskInterval(mask.clone()));

    let out = resolver.to_mask(Some(&cand)).expect("mask");
    match out {
        Region::RealMaskInterval(m) => assert_eq!(data_ptr(&m), data_ptr(&mask)),
        other => panic!("expected real mask interval, got {:?}", other),
    }
}

// ── Two-hop composition ─────────────────────────────────────────────────────

#[test]
fn raw_value_resolves_through_two_hops() {
    let mut builder = RegistryBuilder::with_builtins();
    builder.register(VecToPointMask);
    let resolver = RegionResolver::new(builder.freeze());

    let cand = Candidate::raw(vec![12.0f64, 13.0]);
    let field = resolver
        .to_real_field_interval(Some(&cand))
        .expect("real field interval");

    // Hop one produced the point mask, hop two wrapped it as a field.
    assert_eq!(field.min(), vec![12.0, 13.0]);
    assert_eq!(field.max(), vec![12.0, 13.0]);
    assert_eq!(field.sample(&[12.0, 13.0]), Sample::Bit(true));
    assert_eq!(field.sample(&[0.0, 0.0]), Sample::Bit(false));
}

#[test]
fn fallback_composition_requires_both_hops() {
    // With both the caller rule (raw -> mask) and the shipped rule
    // (mask -> field) present, the two-hop request succeeds.
    let mut builder = RegistryBuilder::with_builtins();
    builder.register(VecToPointMask);
    let resolver = RegionResolver::new(builder.freeze());
    let cand = Candidate::raw(vec![1.0f64, 2.0]);
    assert!(resolver.to_real_field_interval(Some(&cand)).is_ok());

    // Remove the first hop: no path from the raw value at all.
    let resolver = RegionResolver::with_builtins();
    let err = resolver.to_real_field_interval(Some(&cand)).err().unwrap();
    assert!(matches!(err, ResolveError::NoConverter { .. }));

    // Remove the second hop: the raw value converts to a mask, but nothing
    // carries it onward to a field.
    let mut builder = RegistryBuilder::new();
    builder.register(VecToPointMask);
    let resolver = RegionResolver::new(builder.freeze());
    let err = resolver.to_real_field_interval(Some(&cand)).err().unwrap();
    assert!(matches!(err, ResolveError::NoConverter { .. }));
}

// ── Priority ────────────────────────────────────────────────────────────────

#[test]
fn higher_priority_converter_is_selected() {
    struct At {
        name: &'static str,
        priority: i32,
        point: f64,
    }

    impl Convert for At {
        fn name(&self) -> &'static str {
            self.name
        }

        fn source(&self) -> SourceSpec {
            SourceSpec::value::<u8>()
        }

        fn target(&self) -> ShapeSpec {
            ShapeSpec::bit(Domain::Real, Form::MaskInterval)
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn convert(&self, _candidate: &Candidate) -> Result<Region, ConvertError> {
            Ok(Region::RealMaskInterval(Arc::new(PointMask::new(&[
                self.point,
            ]))))
        }
    }

    let mut builder = RegistryBuilder::new();
    builder.register(At {
        name: "low",
        priority: priority::LOW,
        point: 1.0,
    });
    builder.register(At {
        name: "high",
        priority: priority::HIGH,
        point: 2.0,
    });
    let resolver = RegionResolver::new(builder.freeze());

    let cand = Candidate::raw(0u8);
    let out = resolver
        .to_real_mask_interval(Some(&cand))
        .expect("real mask interval");
    assert_eq!(out.min(), vec![2.0]);
}

// ── Null rejection ──────────────────────────────────────────────────────────

#[test]
fn absent_input_fails_for_every_operation() {
    let resolver = RegionResolver::with_builtins();
    assert!(matches!(
        resolver.to_grid_mask(None),
        Err(ResolveError::NullInput { .. })
    ));
    assert!(matches!(
        resolver.to_grid_mask_interval(None),
        Err(ResolveError::NullInput { .. })
    ));
    assert!(matches!(
        resolver.to_real_mask(None),
        Err(ResolveError::NullInput { .. })
    ));
    assert!(matches!(
        resolver.to_real_mask_interval(None),
        Err(ResolveError::NullInput { .. })
    ));
    assert!(matches!(
        resolver.to_grid_field(None),
        Err(ResolveError::NullInput { .. })
    ));
    assert!(matches!(
        resolver.to_grid_field_interval(None),
        Err(ResolveError::NullInput { .. })
    ));
    assert!(matches!(
        resolver.to_real_field(None),
        Err(ResolveError::NullInput { .. })
    ));
    assert!(matches!(
        resolver.to_real_field_interval(None),
        Err(ResolveError::NullInput { .. })
    ));
    assert!(matches!(
        resolver.to_mask(None),
        Err(ResolveError::NullInput { .. })
    ));
}

// ── Failure reporting ───────────────────────────────────────────────────────

#[test]
fn unconvertible_candidate_fails_conclusively() {
    let resolver = RegionResolver::with_builtins();
    // A real-domain mask has no path into the grid domain.
    let mask = BoxMask::new(&[8.0, -2.0, 0.5, 105.0], &[22.0, 65.25, 9.0, 107.0]);
    let cand = Candidate::region(Region::RealMaskInterval(Arc::new(mask)));
    let err = resolver.to_grid_mask_interval(Some(&cand)).err().unwrap();
    assert_eq!(
        err,
        ResolveError::NoConverter {
            candidate: "RealMaskInterval".to_string(),
            target: "GridMaskInterval<bit>".to_string(),
        }
    );
}

// ── Element-type filtering ──────────────────────────────────────────────────

#[test]
fn non_bit_field_never_satisfies_a_predicate_request() {
    let resolver = RegionResolver::with_builtins();
    let field = ArrayField::filled(&[4, 4], Sample::U16(500));
    let cand = Candidate::region(Region::GridFieldInterval(Arc::new(field)));

    let err = resolver.to_grid_mask_interval(Some(&cand)).err().unwrap();
    assert!(matches!(err, ResolveError::ElementMismatch { .. }));

    let err = resolver.to_grid_mask(Some(&cand)).err().unwrap();
    assert!(matches!(err, ResolveError::ElementMismatch { .. }));

    assert!(resolver.to_mask(Some(&cand)).is_err());
}

#[test]
fn non_bit_field_fails_identity_for_field_requests() {
    let resolver = RegionResolver::with_builtins();
    let field = ArrayField::filled(&[4, 4], Sample::F32(0.5));
    let cand = Candidate::region(Region::GridFieldInterval(Arc::new(field)));

    let err = resolver.to_grid_field_interval(Some(&cand)).err().unwrap();
    assert!(matches!(err, ResolveError::ElementMismatch { .. }));
}

#[test]
fn zero_extent_field_resolves_without_panicking() {
    let resolver = RegionResolver::with_builtins();
    let field = ArrayField::bits(&[0, 5]);
    let cand = Candidate::region(Region::GridFieldInterval(Arc::new(field)));

    // The guard's min-corner probe and the conversion itself must tolerate
    // the degenerate bounds.
    let mask = resolver
        .to_grid_mask_interval(Some(&cand))
        .expect("grid mask interval");
    assert_eq!(mask.min(), vec![0, 0]);
    assert_eq!(mask.max(), vec![-1, 4]);
    assert!(!mask.test(&[0, 0]));
}

// ── Bounded-field scenario ──────────────────────────────────────────────────

#[test]
fn bounded_bit_field_resolves_to_predicate_matching_every_corner() {
    let resolver = RegionResolver::with_builtins();
    let mut field = ArrayField::bits(&[12, 52]);
    field.set(&[0, 0], Sample::Bit(true));
    field.set(&[11, 0], Sample::Bit(true));
    field.set(&[11, 51], Sample::Bit(true));
    // [0, 51] stays false.
    let source = Arc::new(field);
    let cand = Candidate::region(Region::GridFieldInterval(source.clone()));

    let mask = resolver
        .to_grid_mask_interval(Some(&cand))
        .expect("grid mask interval");
    assert_eq!(mask.min(), vec![0, 0]);
    assert_eq!(mask.max(), vec![11, 51]);
    for corner in corners(&mask.min(), &mask.max()) {
        assert_eq!(
            mask.test(&corner),
            source.get(&corner).truthy(),
            "corner {:?}",
            corner
        );
    }
}
