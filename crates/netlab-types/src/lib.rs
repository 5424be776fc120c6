//! Netlab Types
//!
//! This crate defines the values exchanged between the netlab calculators and the
//! presentation layer that drives them: raw form inputs, input schemas and the
//! computed results. It is kept separate from `netlab-calculator` so that UI bindings
//! can depend on the data shapes without pulling in the formula implementations.

#![deny(missing_docs)]
#![deny(clippy::all)]

mod types;
pub use types::{
    CalculatorResult, CalculatorSpec, InputKind, InputSpec, InputValue, InputValues, Limit,
    MacStatus, ResultValue,
};
