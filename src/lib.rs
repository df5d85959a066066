/// Decoders for the game's `kind:::value` tagged cell format
pub mod decode;
/// Record shapes for the three balance tables and their XML assembly
pub mod defs;
/// Error definitions
pub mod error;
/// Source generators that serialize a loaded dataset as code
pub mod export;
/// Utilities for loading the full dataset from the game's map archive
pub mod game_data;
/// Game concept types (enumerations, decimal arrays, unit references)
pub mod game_types;
