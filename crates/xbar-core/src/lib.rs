//! Core types for the xbar crossbar simulation kernel.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! physical data model of a memristor crossbar ([`Cell`], [`CrossbarState`]),
//! the constants used by the conductance law, and the error types shared by
//! the state and kernel layers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cell;
pub mod constants;
pub mod error;
pub mod state;

pub use cell::Cell;
pub use error::{KernelError, StateError};
pub use state::{CrossbarState, InitialConditions};
