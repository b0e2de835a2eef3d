//! nom parsers for the binary formats: the WAD container and the classic map lumps.

pub mod map;
pub mod wad;

mod util;

use nom::{is_digit, le_u8};

use self::util::naive_eof;
use archive::wad::MapName;

named!(digit<u8>, map!(verify!(le_u8, is_digit), |d| d - b'0'));

named!(exmy_map_name<MapName>, do_parse!(
    tag!(b"E") >>
    episode: digit >>
    tag!(b"M") >>
    map: digit >>
    (MapName::ExMy(episode, map))
));

named!(mapxx_map_name<MapName>, do_parse!(
    tag!(b"MAP") >>
    number: verify!(
        do_parse!(tens: digit >> ones: digit >> (tens * 10 + ones)),
        |n| n >= 1 && n <= 32) >>
    (MapName::MAPxx(number))
));

/// A whole lump name that's a map marker in one of the two stock naming schemes.
named!(pub vanilla_map_name<MapName>, terminated!(alt!(exmy_map_name | mapxx_map_name), naive_eof));
