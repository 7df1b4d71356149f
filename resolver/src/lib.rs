// maskcast — Region representation resolution
//
// Routes arbitrary input values to one of the canonical region
// representations used by downstream image analysis: grid or real membership
// predicates, sampled bit fields, and their interval-bounded forms. The
// routing is a registry of independently contributed conversion rules plus a
// two-hop resolution engine; the geometry of the regions themselves stays
// behind the `mask` traits.

pub mod adapt;
pub mod builtin;
pub mod convert;
pub mod guard;
pub mod mask;
pub mod primitive;
pub mod registry;
pub mod resolve;
pub mod sample;
pub mod shape;
