//! Decode GROMACS `.edr` energy trajectory files into column-major
//! tables of per-frame scalar observables.
//!
//! `.edr` is GROMACS's XDR-encoded binary energy format: a name table
//! (one name and physical unit per recorded observable) followed by a
//! sequence of frames, each a time stamp plus one value per observable
//! and zero or more auxiliary typed blocks. Six on-disk revisions
//! exist; this crate auto-detects precision and version from
//! structural cues, since the format carries no explicit precision
//! flag.
//!
//! ```no_run
//! fn main() -> Result<(), edriter::EdrError> {
//!     let table = edriter::decode("ener.edr")?;
//!     println!("{:?}", table.column_names);
//!     println!("{} frames", table.rows.len());
//!
//!     let units = edriter::read_units("ener.edr")?;
//!     println!("{:?}", units.get("Time"));
//!
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod block;
pub mod consts;
pub(crate) mod context;
pub mod edr;
pub mod energy;
pub mod error;
pub mod frame;
pub(crate) mod iterator;
pub(crate) mod legacy;
pub mod names;
pub(crate) mod reader;

pub use aggregate::{decode, read_units, EnergyTable};
pub use block::{Block, ElementType, SubBlock, Value};
pub use edr::Edr;
pub use energy::Energy;
pub use error::EdrError;
pub use frame::Frame;
pub use names::{NameTable, TermName};
