//! Containers that maps come out of.  Only WADs, for now.

pub mod wad;
