//! Hack Virtual Machine - Simulator for Generated Assembly
//!
//! Loads Hack assembly text, resolves its symbols, and executes it over a
//! 16K-word RAM. Built for exercising translator output: the machine knows
//! the generated halt idiom, exposes the stack, and runs under a step
//! budget so a miscompiled jump can never hang a test.

pub mod constants;
pub mod loader;
pub mod machine;

pub use loader::{load, LoadError, Program};
pub use machine::{Machine, MachineError, RunOutcome};
