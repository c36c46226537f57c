//! Response parsing core.
//!
//! Takes the free text returned by the generative backend and decomposes it
//! into structured clinical fields. Every parser in this module is pure and
//! total: malformed input degrades to empty values or fixed placeholders,
//! never to an error. Only the upstream inference call can fail.

pub mod assembler;
pub mod differential;
pub mod list;
pub mod references;
pub mod section;
pub mod types;

pub use assembler::assemble;
pub use differential::parse_differential_diagnosis;
pub use list::{parse_list, ListStyle};
pub use references::parse_references;
pub use section::{extract_section, section_map};
pub use types::{AnalysisMode, DiagnosisEntry, Reference, StructuredAnalysis};
