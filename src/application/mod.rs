// Application layer: the two state stores and the composition root that
// initializes them in dependency order.

pub mod directory;
pub mod error;
pub mod ledger;
pub mod reporting;
pub mod tracker;

pub use directory::*;
pub use error::*;
pub use ledger::*;
pub use reporting::*;
pub use tracker::*;
