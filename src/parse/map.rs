use byteorder::{ByteOrder, LittleEndian};
use nom::{le_i16, le_u16, le_u8};

use super::util::fixed_length_ascii;
use errors::{ErrorKind, Result, nom_to_result};
use archive::wad::{BareWAD, MapFormat, WADMapEntryBlock};

named!(hexen_args<[u8; 5]>, count_fixed!(u8, le_u8, 5));

#[derive(Debug)]
pub struct BareDoomThing {
    pub x: i16,
    pub y: i16,
    pub angle: i16,
    pub doomednum: i16,
    // NOTE: boom added two flags, and mbf one more, so this is a decent signal for targeting those (but not 100%)
    pub flags: u16,
}

named!(doom_things_lump<Vec<BareDoomThing>>, many0!(complete!(do_parse!(
    x: le_i16 >>
    y: le_i16 >>
    angle: le_i16 >>
    doomednum: le_i16 >>
    flags: le_u16 >>
    (BareDoomThing{ x, y, angle, doomednum, flags })
))));

#[derive(Debug)]
pub struct BareHexenThing {
    pub tid: i16,
    pub x: i16,
    pub y: i16,
    pub z: i16,
    pub angle: i16,
    pub doomednum: i16,
    pub flags: u16,
    pub special: u8,
    pub args: [u8; 5],
}

named!(hexen_things_lump<Vec<BareHexenThing>>, many0!(complete!(do_parse!(
    tid: le_i16 >>
    x: le_i16 >>
    y: le_i16 >>
    z: le_i16 >>
    angle: le_i16 >>
    doomednum: le_i16 >>
    flags: le_u16 >>
    special: le_u8 >>
    args: hexen_args >>
    (BareHexenThing{
        tid,
        x,
        y,
        z,
        angle,
        doomednum,
        flags,
        special,
        args,
    })
))));

pub trait BareBinaryThing {
    fn coords(&self) -> (i16, i16);
    fn angle(&self) -> i16;
    fn doomednum(&self) -> i16;
    fn flags(&self) -> u16;
}
impl BareBinaryThing for BareDoomThing {
    fn coords(&self) -> (i16, i16) {
        (self.x, self.y)
    }
    fn angle(&self) -> i16 {
        self.angle
    }
    fn doomednum(&self) -> i16 {
        self.doomednum
    }
    fn flags(&self) -> u16 {
        self.flags
    }
}
impl BareBinaryThing for BareHexenThing {
    fn coords(&self) -> (i16, i16) {
        (self.x, self.y)
    }
    fn angle(&self) -> i16 {
        self.angle
    }
    fn doomednum(&self) -> i16 {
        self.doomednum
    }
    fn flags(&self) -> u16 {
        self.flags
    }
}


// NOTE: vertex and sidedef indices are i16 in vanilla, but most source ports read them as u16,
// keeping only 0xFFFF (-1) to mean "no side"
#[derive(Debug)]
pub struct BareDoomLine {
    pub v0: i16,
    pub v1: i16,
    pub flags: i16,
    pub special: i16,
    pub sector_tag: i16,
    pub front_sidedef: i16,
    pub back_sidedef: i16,
}

named!(doom_linedefs_lump<Vec<BareDoomLine>>, many0!(complete!(do_parse!(
    v0: le_i16 >>
    v1: le_i16 >>
    flags: le_i16 >>
    special: le_i16 >>
    sector_tag: le_i16 >>
    front_sidedef: le_i16 >>
    back_sidedef: le_i16 >>
    (BareDoomLine{ v0, v1, flags, special, sector_tag, front_sidedef, back_sidedef })
))));

#[derive(Debug)]
pub struct BareHexenLine {
    pub v0: i16,
    pub v1: i16,
    pub flags: i16,
    pub special: u8,
    pub args: [u8; 5],
    pub front_sidedef: i16,
    pub back_sidedef: i16,
}

named!(hexen_linedefs_lump<Vec<BareHexenLine>>, many0!(complete!(do_parse!(
    v0: le_i16 >>
    v1: le_i16 >>
    flags: le_i16 >>
    special: le_u8 >>
    args: hexen_args >>
    front_sidedef: le_i16 >>
    back_sidedef: le_i16 >>
    (BareHexenLine{
        v0,
        v1,
        flags,
        special,
        args,
        front_sidedef,
        back_sidedef,
    })
))));

pub trait BareBinaryLine {
    fn vertex_indices(&self) -> (i16, i16);
    fn side_indices(&self) -> (i16, i16);
    fn flags(&self) -> i16;
    fn special(&self) -> i16;
    /// Hexen lines have no tag; their specials take arguments instead.
    fn tag(&self) -> i16;
}
impl BareBinaryLine for BareDoomLine {
    fn vertex_indices(&self) -> (i16, i16) {
        (self.v0, self.v1)
    }
    fn side_indices(&self) -> (i16, i16) {
        (self.front_sidedef, self.back_sidedef)
    }
    fn flags(&self) -> i16 {
        self.flags
    }
    fn special(&self) -> i16 {
        self.special
    }
    fn tag(&self) -> i16 {
        self.sector_tag
    }
}
impl BareBinaryLine for BareHexenLine {
    fn vertex_indices(&self) -> (i16, i16) {
        (self.v0, self.v1)
    }
    fn side_indices(&self) -> (i16, i16) {
        (self.front_sidedef, self.back_sidedef)
    }
    fn flags(&self) -> i16 {
        self.flags
    }
    fn special(&self) -> i16 {
        self.special as i16
    }
    fn tag(&self) -> i16 {
        0
    }
}

#[derive(Debug)]
pub struct BareSide<'tex> {
    pub x_offset: i16,
    pub y_offset: i16,
    pub upper_texture: &'tex str,
    pub lower_texture: &'tex str,
    pub middle_texture: &'tex str,
    pub sector: i16,
}

named!(sidedefs_lump<Vec<BareSide>>, many0!(complete!(do_parse!(
    x_offset: le_i16 >>
    y_offset: le_i16 >>
    upper_texture: apply!(fixed_length_ascii, 8) >>
    lower_texture: apply!(fixed_length_ascii, 8) >>
    middle_texture: apply!(fixed_length_ascii, 8) >>
    sector: le_i16 >>
    (BareSide{
        x_offset,
        y_offset,
        upper_texture,
        lower_texture,
        middle_texture,
        sector
    })
))));

#[derive(Debug)]
pub struct BareVertex {
    pub x: i16,
    pub y: i16,
}

named!(vertexes_lump<Vec<BareVertex>>, many0!(complete!(do_parse!(
    x: le_i16 >>
    y: le_i16 >>
    (BareVertex{ x, y })
))));

#[derive(Debug)]
pub struct BareSector<'tex> {
    pub floor_height: i16,
    pub ceiling_height: i16,
    pub floor_texture: &'tex str,
    pub ceiling_texture: &'tex str,
    pub light: i16,
    pub sector_type: i16,
    pub sector_tag: i16,
}

named!(sectors_lump<Vec<BareSector>>, many0!(complete!(do_parse!(
    floor_height: le_i16 >>
    ceiling_height: le_i16 >>
    floor_texture: apply!(fixed_length_ascii, 8) >>
    ceiling_texture: apply!(fixed_length_ascii, 8) >>
    light: le_i16 >>
    sector_type: le_i16 >>
    sector_tag: le_i16 >>
    (BareSector{
        floor_height,
        ceiling_height,
        floor_texture,
        ceiling_texture,
        light,
        sector_type,
        sector_tag,
    })
))));

#[derive(Debug)]
pub struct BareSeg {
    pub v0: u16,
    pub v1: u16,
    pub angle: i16,
    pub line: u16,
    /// 0 for the line's front side, 1 for its back
    pub side: i16,
    pub offset: i16,
}

named!(segs_lump<Vec<BareSeg>>, many0!(complete!(do_parse!(
    v0: le_u16 >>
    v1: le_u16 >>
    angle: le_i16 >>
    line: le_u16 >>
    side: le_i16 >>
    offset: le_i16 >>
    (BareSeg{ v0, v1, angle, line, side, offset })
))));

#[derive(Debug)]
pub struct BareSubsector {
    pub numsegs: u16,
    pub firstseg: u16,
}

named!(ssectors_lump<Vec<BareSubsector>>, many0!(complete!(do_parse!(
    numsegs: le_u16 >>
    firstseg: le_u16 >>
    (BareSubsector{ numsegs, firstseg })
))));

/// Set on a node child that's a subsector rather than another node
pub const NF_SUBSECTOR: u16 = 0x8000;

#[derive(Debug)]
pub struct BareNode {
    pub x: i16,
    pub y: i16,
    pub dx: i16,
    pub dy: i16,
    /// Top, bottom, left, right; front child first
    pub bbox: [[i16; 4]; 2],
    pub children: [u16; 2],
}

named!(bare_bbox<[i16; 4]>, count_fixed!(i16, le_i16, 4));

named!(nodes_lump<Vec<BareNode>>, many0!(complete!(do_parse!(
    x: le_i16 >>
    y: le_i16 >>
    dx: le_i16 >>
    dy: le_i16 >>
    front_bbox: bare_bbox >>
    back_bbox: bare_bbox >>
    front_child: le_u16 >>
    back_child: le_u16 >>
    (BareNode{
        x,
        y,
        dx,
        dy,
        bbox: [front_bbox, back_bbox],
        children: [front_child, back_child],
    })
))));

/// The BLOCKMAP lump, with its offset table resolved into one line list per cell.
#[derive(Debug)]
pub struct BareBlockmap {
    pub orgx: i16,
    pub orgy: i16,
    pub width: i16,
    pub height: i16,
    pub cells: Vec<Vec<u16>>,
}

const BLOCKMAP_HEADER_WORDS: usize = 4;
const BLOCKLIST_END: u16 = 0xFFFF;

/// Read a BLOCKMAP lump.  Every cell's list starts with a 0 that vanilla checks as line 0; like
/// Boom, that leading 0 is dropped.
pub fn parse_blockmap(buf: &[u8]) -> Result<BareBlockmap> {
    let words = buf.len() / 2;
    if words < BLOCKMAP_HEADER_WORDS {
        return Err(ErrorKind::TruncatedData("BLOCKMAP header").into());
    }
    let word = |index: usize| LittleEndian::read_u16(&buf[index * 2 ..]);

    let orgx = word(0) as i16;
    let orgy = word(1) as i16;
    let width = word(2) as i16;
    let height = word(3) as i16;
    if width < 0 || height < 0 {
        return Err(ErrorKind::NegativeOffset("BLOCKMAP", 2, width.min(height) as isize).into());
    }
    let numcells = width as usize * height as usize;
    if words < BLOCKMAP_HEADER_WORDS + numcells {
        return Err(ErrorKind::TruncatedData("BLOCKMAP offsets").into());
    }

    let mut cells = Vec::with_capacity(numcells);
    for cell in 0 .. numcells {
        let offset = word(BLOCKMAP_HEADER_WORDS + cell) as usize;
        if offset >= words {
            return Err(ErrorKind::TruncatedData("BLOCKMAP line list").into());
        }

        let mut lines = Vec::new();
        let mut index = offset;
        if word(index) == 0 {
            index += 1;
        }
        loop {
            if index >= words {
                warn!("BLOCKMAP list for cell {} runs off the end of the lump", cell);
                break;
            }
            let line = word(index);
            if line == BLOCKLIST_END {
                break;
            }
            lines.push(line);
            index += 1;
        }
        cells.push(lines);
    }

    Ok(BareBlockmap{ orgx, orgy, width, height, cells })
}


#[derive(Debug)]
pub struct BareBinaryMap<'a, L: BareBinaryLine, T: BareBinaryThing> {
    pub vertices: Vec<BareVertex>,
    pub sectors: Vec<BareSector<'a>>,
    pub sides: Vec<BareSide<'a>>,
    pub lines: Vec<L>,
    pub things: Vec<T>,
    pub segs: Vec<BareSeg>,
    pub subsectors: Vec<BareSubsector>,
    pub nodes: Vec<BareNode>,
    pub blockmap: Option<BareBlockmap>,
    /// Raw bits; its length is only meaningful once the sector count is known
    pub reject: Option<&'a [u8]>,
}

/// The result of parsing a Doom-format map definition.  The contained
/// structures have not been changed in any way.  Everything is public, and
/// nothing is preventing you from meddling with the contained data in a way
/// that might make it invalid.
pub type BareDoomMap<'a> = BareBinaryMap<'a, BareDoomLine, BareDoomThing>;

/// The result of parsing a Hexen-format map definition.
pub type BareHexenMap<'a> = BareBinaryMap<'a, BareHexenLine, BareHexenThing>;

#[derive(Debug)]
pub enum BareMap<'a> {
    Doom(BareDoomMap<'a>),
    Hexen(BareHexenMap<'a>),
}

fn required_lump<'a>(archive: &BareWAD<'a>, index: Option<usize>, name: &'static str) -> Result<&'a [u8]> {
    let index = index.ok_or(ErrorKind::MissingMapLump(name))?;
    archive.entry_slice(index)
}

fn optional_lump<'a>(archive: &BareWAD<'a>, index: Option<usize>) -> Result<Option<&'a [u8]>> {
    match index {
        Some(index) => archive.entry_slice(index).map(Some),
        None => Ok(None),
    }
}

/// Parse every lump of one map into bare records.  Nothing is cross-checked here; that happens
/// when the map is built into a `Level`.
pub fn parse_doom_map<'a>(archive: &BareWAD<'a>, range: &WADMapEntryBlock) -> Result<BareMap<'a>> {
    let buf = required_lump(archive, range.vertexes_index, "VERTEXES")?;
    let vertices = nom_to_result("VERTEXES lump", buf, vertexes_lump(buf))?;

    let buf = required_lump(archive, range.sectors_index, "SECTORS")?;
    let sectors = nom_to_result("SECTORS lump", buf, sectors_lump(buf))?;

    let buf = required_lump(archive, range.sidedefs_index, "SIDEDEFS")?;
    let sides = nom_to_result("SIDEDEFS lump", buf, sidedefs_lump(buf))?;

    let segs = match optional_lump(archive, range.segs_index)? {
        Some(buf) => nom_to_result("SEGS lump", buf, segs_lump(buf))?,
        None => Vec::new(),
    };
    let subsectors = match optional_lump(archive, range.ssectors_index)? {
        Some(buf) => nom_to_result("SSECTORS lump", buf, ssectors_lump(buf))?,
        None => Vec::new(),
    };
    let nodes = match optional_lump(archive, range.nodes_index)? {
        Some(buf) => nom_to_result("NODES lump", buf, nodes_lump(buf))?,
        None => Vec::new(),
    };
    let blockmap = match optional_lump(archive, range.blockmap_index)? {
        Some(buf) if !buf.is_empty() => Some(parse_blockmap(buf)?),
        _ => None,
    };
    let reject = optional_lump(archive, range.reject_index)?;

    let lines_buf = required_lump(archive, range.linedefs_index, "LINEDEFS")?;
    let things_buf = required_lump(archive, range.things_index, "THINGS")?;
    if range.format == MapFormat::Doom {
        let lines = nom_to_result("LINEDEFS lump", lines_buf, doom_linedefs_lump(lines_buf))?;
        let things = nom_to_result("THINGS lump", things_buf, doom_things_lump(things_buf))?;

        Ok(BareMap::Doom(BareDoomMap{
            vertices,
            sectors,
            sides,
            lines,
            things,
            segs,
            subsectors,
            nodes,
            blockmap,
            reject,
        }))
    }
    else {
        let lines = nom_to_result("LINEDEFS lump", lines_buf, hexen_linedefs_lump(lines_buf))?;
        let things = nom_to_result("THINGS lump", things_buf, hexen_things_lump(things_buf))?;

        Ok(BareMap::Hexen(BareHexenMap{
            vertices,
            sectors,
            sides,
            lines,
            things,
            segs,
            subsectors,
            nodes,
            blockmap,
            reject,
        }))
    }
}
