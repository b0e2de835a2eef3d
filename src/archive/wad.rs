use std;
use std::fmt;

use errors::{ErrorKind, Result};
use parse::vanilla_map_name;

/// Type of the WAD.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WADType {
    /// full standalone game
    IWAD,
    /// patch wad, a small mod
    PWAD,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MapFormat {
    Doom,
    Hexen,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MapName {
    ExMy(u8, u8),
    MAPxx(u8),
}

impl fmt::Display for MapName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MapName::ExMy(e, m) => write!(f, "E{}M{}", e, m),
            MapName::MAPxx(xx) => write!(f, "MAP{:02}", xx),
        }
    }
}

/// Low-level interface to a parsed WAD: the raw buffer plus its directory.  Nothing has been
/// checked beyond the header and directory being readable.
pub struct BareWAD<'n> {
    pub buffer: &'n [u8],
    pub header: BareWADHeader,
    pub directory: Vec<BareWADDirectoryEntry<'n>>,
}

impl<'n> BareWAD<'n> {
    /// Contents of the lump at `index`, or an error if the directory points outside the file.
    pub fn entry_slice(&self, index: usize) -> Result<&'n [u8]> {
        let entry = self.directory.get(index).ok_or(ErrorKind::BadReference("lump", index))?;
        entry.extract_slice(self.buffer)
    }

    pub fn first_entry(&self, name: &str) -> Option<&BareWADDirectoryEntry<'n>> {
        self.directory.iter().find(|entry| entry.name == name)
    }

    pub fn iter_maps<'a>(&'a self) -> impl Iterator<Item=WADMapEntryBlock> + 'a {
        self.iter().filter_map(|item|
            if let WADItem::Map(map_block) = item {
                Some(map_block)
            }
            else {
                None
            }
        )
    }

    /// Find a map by its marker name, like `E1M1` or `MAP07`.
    pub fn find_map(&self, name: MapName) -> Option<WADMapEntryBlock> {
        self.iter_maps().find(|block| block.name == name)
    }

    pub fn iter<'a>(&'a self) -> WADIterator<'a, 'n> {
        WADIterator {
            entry_iter: self.directory.iter().enumerate().peekable(),
        }
    }
}

pub struct BareWADHeader {
    pub identification: WADType,
    pub numlumps: u32,
    pub infotableofs: u32,
}

#[derive(Debug)]
pub struct BareWADDirectoryEntry<'name> {
    pub filepos: u32,
    pub size: u32,
    pub name: &'name str,
}

impl<'n> BareWADDirectoryEntry<'n> {
    /// Extract the slice described by this entry from a buffer.
    pub fn extract_slice<'b>(&self, buf: &'b [u8]) -> Result<&'b [u8]> {
        let start = self.filepos as usize;
        let end = start + self.size as usize;
        if end > buf.len() {
            return Err(ErrorKind::TruncatedData("lump contents").into());
        }
        Ok(&buf[start..end])
    }
}

// -----------------------------------------------------------------------------
// Map stuff

// Standard lumps and whether they're required
const MAP_LUMP_ORDER: [(&str, bool); 11] = [
    ("THINGS",	 true),
    ("LINEDEFS", true),
    ("SIDEDEFS", true),
    ("VERTEXES", true),
    ("SEGS",	 false),
    ("SSECTORS", false),
    ("NODES",	 false),
    ("SECTORS",	 true),
    ("REJECT",	 false),
    ("BLOCKMAP", false),
    ("BEHAVIOR", false),
];

pub enum WADItem<'a, 'n: 'a> {
    Map(WADMapEntryBlock),
    Entry(&'a BareWADDirectoryEntry<'n>),
}

pub struct WADIterator<'a, 'n: 'a> {
    entry_iter: std::iter::Peekable<std::iter::Enumerate<std::slice::Iter<'a, BareWADDirectoryEntry<'n>>>>,
}

impl<'a, 'n> Iterator for WADIterator<'a, 'n> {
    type Item = WADItem<'a, 'n>;

    fn next(&mut self) -> Option<Self::Item> {
        let (i, entry) = self.entry_iter.next()?;
        let map_name = match vanilla_map_name(entry.name.as_bytes()) {
            Ok((_, found_map_name)) => found_map_name,
            Err(_) => { return Some(WADItem::Entry(entry)); }
        };

        let mut range = WADMapEntryBlock{
            format: MapFormat::Doom,
            name: map_name,
            marker_index: i,
            last_index: i,

            things_index: None,
            linedefs_index: None,
            sidedefs_index: None,
            vertexes_index: None,
            segs_index: None,
            ssectors_index: None,
            nodes_index: None,
            sectors_index: None,
            reject_index: None,
            blockmap_index: None,
            behavior_index: None,
        };

        // Peek, so that stumbling onto the next map's marker doesn't consume it
        for &(lump_name, is_required) in MAP_LUMP_ORDER.iter() {
            let (next_i, next_entry) = match self.entry_iter.peek() {
                Some(&next) => next,
                None => { break; }
            };
            if next_entry.name != lump_name {
                if is_required {
                    warn!("map {} is missing its {} lump (found {} instead)", range.name, lump_name, next_entry.name);
                }
                continue;
            }

            let slot = match lump_name {
                "THINGS" => &mut range.things_index,
                "LINEDEFS" => &mut range.linedefs_index,
                "SIDEDEFS" => &mut range.sidedefs_index,
                "VERTEXES" => &mut range.vertexes_index,
                "SEGS" => &mut range.segs_index,
                "SSECTORS" => &mut range.ssectors_index,
                "NODES" => &mut range.nodes_index,
                "SECTORS" => &mut range.sectors_index,
                "REJECT" => &mut range.reject_index,
                "BLOCKMAP" => &mut range.blockmap_index,
                _ => &mut range.behavior_index,
            };
            *slot = Some(next_i);
            range.last_index = next_i;
            self.entry_iter.next();
        }

        // The presence of a BEHAVIOR lump is the sole indication of Hexen format
        if range.behavior_index.is_some() {
            range.format = MapFormat::Hexen;
        }
        Some(WADItem::Map(range))
    }
}

/// Where one map's lumps live in the directory.  Missing lumps are `None`; whether that's fatal
/// is up to whoever loads the map.
#[derive(Debug)]
pub struct WADMapEntryBlock {
    pub format: MapFormat,
    pub name: MapName,
    pub marker_index: usize,
    pub last_index: usize,

    pub things_index: Option<usize>,
    pub linedefs_index: Option<usize>,
    pub sidedefs_index: Option<usize>,
    pub vertexes_index: Option<usize>,
    pub segs_index: Option<usize>,
    pub ssectors_index: Option<usize>,
    pub nodes_index: Option<usize>,
    pub sectors_index: Option<usize>,
    pub reject_index: Option<usize>,
    pub blockmap_index: Option<usize>,
    pub behavior_index: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> BareWADDirectoryEntry {
        BareWADDirectoryEntry{ filepos: 0, size: 0, name }
    }

    fn wad<'a>(names: &[&'a str]) -> BareWAD<'a> {
        BareWAD{
            buffer: &[],
            header: BareWADHeader{ identification: WADType::PWAD, numlumps: names.len() as u32, infotableofs: 0 },
            directory: names.iter().map(|&name| entry(name)).collect(),
        }
    }

    #[test]
    fn finds_map_blocks() {
        let wad = wad(&["PLAYPAL", "E1M1", "THINGS", "LINEDEFS", "SIDEDEFS", "VERTEXES", "SECTORS", "MAP02", "THINGS", "LINEDEFS", "SIDEDEFS", "VERTEXES", "SEGS", "SSECTORS", "NODES", "SECTORS", "REJECT", "BLOCKMAP", "BEHAVIOR"]);
        let maps: Vec<_> = wad.iter_maps().collect();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0].name, MapName::ExMy(1, 1));
        assert_eq!(maps[0].format, MapFormat::Doom);
        assert_eq!(maps[0].sectors_index, Some(6));
        assert_eq!(maps[0].blockmap_index, None);
        assert_eq!(maps[0].last_index, 6);
        assert_eq!(maps[1].name, MapName::MAPxx(2));
        assert_eq!(maps[1].format, MapFormat::Hexen);
        assert_eq!(maps[1].blockmap_index, Some(17));
        assert_eq!(wad.find_map(MapName::MAPxx(2)).map(|block| block.marker_index), Some(7));
    }

    #[test]
    fn lumps_outside_the_file_are_errors() {
        let buffer = [0u8; 4];
        let entry = BareWADDirectoryEntry{ filepos: 2, size: 8, name: "THINGS" };
        assert!(entry.extract_slice(&buffer).is_err());
        let entry = BareWADDirectoryEntry{ filepos: 2, size: 2, name: "THINGS" };
        assert_eq!(entry.extract_slice(&buffer).unwrap().len(), 2);
    }

    #[test]
    fn map_names_display() {
        assert_eq!(MapName::ExMy(2, 3).to_string(), "E2M3");
        assert_eq!(MapName::MAPxx(7).to_string(), "MAP07");
    }
}
