//! The gameplay core of a Doom-engine game: fixed-point math, the blockmap and BSP, sight and
//! hitscan tracing, and everything that happens when a thing touches, hurts, or kills another.
//!
//! There's no renderer, no sound, and no tic loop here.  A `World` holds a `Level` plus its map
//! objects and players; callers drive it and drain the `GameEvent`s it queues.

extern crate bit_vec;
#[macro_use]
extern crate bitflags;
extern crate byteorder;
#[macro_use]
extern crate error_chain;
extern crate euclid;
extern crate memmap;
#[macro_use]
extern crate nom;
extern crate ron;
#[macro_use]
extern crate serde;
#[macro_use]
extern crate tracing;

#[cfg(test)]
#[macro_use]
extern crate proptest;

pub mod archive;
pub mod blockmap;
pub mod blockwalk;
pub mod bsp;
pub mod divline;
pub mod errors;
pub mod fixed;
pub mod geom;
pub mod hitscan;
pub mod info;
pub mod input_buffer;
pub mod inter;
pub mod intercept;
pub mod load;
pub mod map;
pub mod messages;
pub mod mobj;
pub mod parse;
pub mod player;
pub mod pspr;
pub mod random;
pub mod reject;
pub mod rules;
pub mod sight;
pub mod tables;
pub mod weapons;
pub mod world;

pub use archive::wad::{BareWAD, MapName};
pub use load::{LoadedMap, MapThing, load_map};
pub use parse::map::{BareBinaryLine, BareBinaryMap, BareBinaryThing, BareMap, parse_doom_map};
pub use parse::wad::parse_wad;
pub use rules::{GameConfig, Ruleset};
pub use world::{GameEvent, World};
