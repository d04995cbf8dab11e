//! Test Helper Utilities
//!
//! In-memory fakes of the external services, recording what they receive

pub mod fakes;

pub use fakes::{
    block, doc, reference_now, tagged_block, Answer, FakeDeck, FakeDocumentStore, ScriptedGenerator,
};
