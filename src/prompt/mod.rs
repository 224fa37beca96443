//! Payload assembly for agent invocations.

pub mod assemble;

pub use assemble::PayloadAssembler;
