//! Cascaded performance of an RF signal chain, and power-unit conversions.
//!
//! A chain is an ordered slice of [`Stage`]s, stage 1 nearest the input.
//! [`compute_cascade`] folds it into a [`CascadeResult`]: summed gain, Friis
//! noise figure, input-referred P1dB and IP3, and spurious-free dynamic range,
//! each rounded to two decimals. [`cascade_nodes`] keeps the cumulative
//! metrics after every stage.
//!
//! The [`conversion`] functions move between dB, dBm and Watts. Both halves are
//! pure; a [`Workbench`] is the caller-owned state that an editor or script
//! keeps between calculations.
//!
//! ```
//! use rfcascade::{compute_cascade, Stage};
//!
//! let lna = Stage::new("LNA", 20.0, 1.5, 10.0, 20.0);
//! let result = compute_cascade(&[lna]).unwrap();
//! assert_eq!(result.sfdr_db, 128.33);
//! ```

mod cascade;
pub mod constants;
pub mod conversion;
mod error;
pub mod file;
mod node;
pub mod numeric;
mod stage;
mod workbench;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "report")]
pub mod report;

pub use cascade::{cascade_nodes, cascade_output_node, compute_cascade, CascadeResult};
pub use conversion::{
    compute_conversion, db_to_dbm, dbm_to_watts, watts_to_db, watts_to_dbm, Conversion, Convert,
    Converted, DbToDbm, DbmToWatts, PowerConversions, WattsToDb, WattsToDbm,
};
pub use error::{ComputeError, Error, Result};
pub use file::{load_chain, Chain};
pub use node::CascadeNode;
pub use stage::Stage;
pub use workbench::Workbench;
