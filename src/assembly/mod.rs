//! Person assembly: wire record ↔ internal model
//!
//! The wire shape is a flat record whose relationship fields are bare
//! identifiers (`motherId`, `fatherId`, `spouseId`). Inbound assembly resolves
//! those identifiers *leniently*: an identifier that does not resolve is
//! dropped, not an error. This is a deliberate asymmetry with the relationship
//! manager, whose direct operations resolve *strictly* and fail loudly on a
//! miss. Both modes are kept distinct on purpose; do not unify them.

mod assembler;
mod record;

pub use assembler::PersonAssembler;
pub use record::PersonRecord;
