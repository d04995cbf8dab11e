//! Discovery-transform-persist workflow
//!
//! Two separately invoked phases share a staging file:
//! - **scan**: find tagged blocks, classify and generate a card for each,
//!   merge the cards into the staging store
//! - **commit**: add each staged card to the deck, mark its block processed,
//!   drop it from the staging store
//!
//! Everything runs sequentially; each external call completes before the
//! next one starts.

pub mod classifier;
pub mod commit;
pub mod discovery;
pub mod generator;
pub mod marker;
pub mod normalizer;
pub mod passage;
pub mod repair;
pub mod scan;
pub mod staging;

pub use commit::{run_commit, CommitReport, FailedCommit};
pub use discovery::{discover_tagged_blocks, DiscoveryOptions};
pub use scan::{process_block, run_scan, ScanReport, SkippedBlock};
pub use staging::{StagingStore, STAGING_EXTENSION};
