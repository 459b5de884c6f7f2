mod entry;
mod error;
mod failure;
mod ids;
mod listing;
mod name;
mod operation;

pub use entry::{Entry, EntryKind};
pub use error::DomainError;
pub use failure::FailureKind;
pub use ids::SessionId;
pub use listing::DirectoryListing;
pub use name::EntryName;
pub use operation::{OperationOutcome, OperationRequest};
