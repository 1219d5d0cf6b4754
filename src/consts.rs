//! Magic numbers and format limits for the EDR binary layout.

/// Highest file-format version this implementation understands.
pub const ENX_VERSION: i32 = 5;

/// Name-table magic, written in place of a positive legacy `nre`.
pub const FILE_MAGIC: i32 = -55555;

/// Per-frame header magic for non-legacy (version >= 2) files.
pub const FRAME_MAGIC: i32 = -7777777;

/// Sentinel threshold for `first_real`: anything greater indicates a
/// legacy (version 1) frame rather than a modern sentinel + magic.
pub const LEGACY_SENTINEL: f64 = -1e-10;

/// Block id used for the synthesized distance-restraint block
/// prepended to frames with `ndisre != 0` (version < 4).
pub const ENX_DISRE: i32 = 3;

/// Upper bound (exclusive) on plausible legacy frame times, in ps.
pub const LEGACY_MAX_TIME: f64 = 1e20;

/// Default unit recorded for energy terms in files predating
/// unit-per-term storage (version 1).
pub const DEFAULT_UNIT: &str = "kJ/mol";

/// Unit implicitly assigned to the synthesized `Time` column.
pub const TIME_UNIT: &str = "ps";
