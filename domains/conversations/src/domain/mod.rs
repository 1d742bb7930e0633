//! Conversations domain layer: entities, completion policy, ask flow

pub mod answer;
pub mod ask;
pub mod completion;
pub mod entities;
pub mod state;
