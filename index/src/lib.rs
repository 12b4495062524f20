//! Declaration and reference index for Terraform configuration files
//!
//! [`Index::collect`] walks a parsed file once: root blocks become typed or
//! untyped sections, and every string literal is parsed as an interpolation
//! template whose variable accesses are recorded as references. Errors from
//! either parser are kept in the index instead of aborting the run.

pub mod declarations;
pub mod dump;
pub mod error;
pub mod index;
pub mod position;
pub mod property;
pub mod references;
pub mod types;

pub use declarations::Declaration;
pub use dump::AstDump;
pub use error::IndexError;
pub use error::IndexResult;
pub use index::Index;
pub use index::parse_bytes;
pub use property::extract_property;
pub use types::Position;
pub use types::ReferenceList;
pub use types::SourceError;
pub use types::TypedSection;
pub use types::UntypedSection;

/// Format version written into every [`Index`].
pub const INDEX_VERSION: &str = "1.2.0";
