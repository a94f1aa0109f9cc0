//! Reflection generated at build time for `include/game.hpp`.

/// The generated `reflection.hpp`.
pub const REFLECTION_HEADER: &str = include_str!(concat!(env!("OUT_DIR"), "/reflection.hpp"));

/// The generated `obs.h` with the annotation macros.
pub const MARKER_HEADER: &str = include_str!(concat!(env!("OUT_DIR"), "/obs.h"));

/// JSON summary of everything reflected.
pub const METADATA: &str = include_str!(concat!(env!("OUT_DIR"), "/reflection.json"));

/// The annotated header the AST was parsed from.
pub const GAME_HEADER: &str = include_str!("../include/game.hpp");
