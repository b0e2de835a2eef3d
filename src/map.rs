use std::fmt;
use std::marker::PhantomData;
use std::slice;

use blockmap::Blockmap;
use bsp::{Node, Subsector};
use fixed::Fixed;
use geom::{BBox, Point};
use reject::Reject;

// TODO map diagnostics worth adding to load::build_level
// - info: unused vertex
// - info: sector with no sides

pub type Vertex = Point;

/// A fully resolved level: geometry, the BSP, the blockmap, and the reject table.  Sector heights
/// are the only part of this the playsim changes while running.
pub struct Level {
    vertices: Vec<Vertex>,
    sectors: Vec<Sector>,
    sides: Vec<Side>,
    lines: Vec<Line>,
    pub(crate) subsectors: Vec<Subsector>,
    pub(crate) nodes: Vec<Node>,

    pub blockmap: Blockmap,
    pub reject: Reject,
}

impl Level {
    pub fn new() -> Self {
        return Level {
            vertices: Vec::new(),
            sectors: Vec::new(),
            sides: Vec::new(),
            lines: Vec::new(),
            subsectors: Vec::new(),
            nodes: Vec::new(),

            blockmap: Blockmap::empty(),
            reject: Reject::all_visible(0),
        };
    }

    pub fn add_vertex(&mut self, x: Fixed, y: Fixed) -> Handle<Vertex> {
        self.vertices.push(Point::new(x, y));
        return (self.vertices.len() - 1).into();
    }

    pub fn add_sector(&mut self, floorheight: Fixed, ceilingheight: Fixed) -> Handle<Sector> {
        self.sectors.push(Sector{
            floorheight,
            ceilingheight,
            lightlevel: 160,
            special: 0,
            tag: 0,
        });
        return (self.sectors.len() - 1).into();
    }

    pub fn add_side(&mut self, sector: Handle<Sector>) -> Handle<Side> {
        self.sides.push(Side{ sector });
        return (self.sides.len() - 1).into();
    }

    /// Add a line between two existing vertices.  The derived fields (direction, bounding box,
    /// slope type, sectors) are filled in here, so sides must already exist.
    pub fn add_line(&mut self, v1: Handle<Vertex>, v2: Handle<Vertex>, front: Option<Handle<Side>>, back: Option<Handle<Side>>) -> Handle<Line> {
        let p1 = self.vertices[v1.0];
        let p2 = self.vertices[v2.0];
        let dx = p2.x.wrapping_sub(p1.x);
        let dy = p2.y.wrapping_sub(p1.y);

        let slopetype =
            if dx == 0 { SlopeType::Vertical }
            else if dy == 0 { SlopeType::Horizontal }
            else if (dy > 0) == (dx > 0) { SlopeType::Positive }
            else { SlopeType::Negative };

        let mut flags = LineFlags::empty();
        if back.is_some() {
            flags |= LineFlags::TWO_SIDED;
        }
        else {
            flags |= LineFlags::BLOCKING;
        }

        let front_sector = front.map(|s| self.sides[s.0].sector);
        let back_sector = back.map(|s| self.sides[s.0].sector);

        self.lines.push(Line{
            v1,
            v2,
            dx,
            dy,
            flags,
            special: 0,
            tag: 0,
            front_side: front,
            back_side: back,
            front_sector,
            back_sector,
            bbox: BBox::from_points(p1, p2),
            slopetype,
        });
        return (self.lines.len() - 1).into();
    }

    pub fn add_subsector(&mut self, sector: Handle<Sector>) -> Handle<Subsector> {
        self.subsectors.push(Subsector{ sector });
        return (self.subsectors.len() - 1).into();
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn vertex(&self, handle: Handle<Vertex>) -> &Vertex {
        return &self.vertices[handle.0];
    }
    pub fn sector(&self, handle: Handle<Sector>) -> &Sector {
        return &self.sectors[handle.0];
    }
    pub fn sector_mut(&mut self, handle: Handle<Sector>) -> &mut Sector {
        return &mut self.sectors[handle.0];
    }
    pub fn side(&self, handle: Handle<Side>) -> &Side {
        return &self.sides[handle.0];
    }
    pub fn line(&self, handle: Handle<Line>) -> &Line {
        return &self.lines[handle.0];
    }
    pub fn line_mut(&mut self, handle: Handle<Line>) -> &mut Line {
        return &mut self.lines[handle.0];
    }
    pub fn subsector(&self, handle: Handle<Subsector>) -> &Subsector {
        return &self.subsectors[handle.0];
    }

    pub fn iter_lines(&self) -> slice::Iter<Line> {
        return self.lines.iter();
    }
    pub fn iter_sectors(&self) -> slice::Iter<Sector> {
        return self.sectors.iter();
    }
    pub fn iter_vertices(&self) -> slice::Iter<Vertex> {
        return self.vertices.iter();
    }

    pub fn num_lines(&self) -> usize {
        return self.lines.len();
    }
    pub fn num_sectors(&self) -> usize {
        return self.sectors.len();
    }
    pub fn num_sides(&self) -> usize {
        return self.sides.len();
    }
    pub fn num_vertices(&self) -> usize {
        return self.vertices.len();
    }

    pub fn bbox(&self) -> BBox {
        let mut bbox = BBox::empty();
        for v in self.vertices.iter() {
            bbox.add_point(v.x, v.y);
        }
        return bbox;
    }

    /// Rebuild the blockmap from the current lines, replacing whatever was there.
    pub fn generate_blockmap(&mut self) {
        self.blockmap = Blockmap::generate(self);
    }

    /// The vertical gap through a two-sided line, using the sectors' heights as they are right
    /// now.  A one-sided line has no opening at all.
    pub fn line_opening(&self, line: &Line) -> Opening {
        let (front, back) = match (line.front_sector, line.back_sector) {
            (Some(f), Some(b)) => (&self.sectors[f.0], &self.sectors[b.0]),
            _ => { return Opening::closed(); }
        };

        let opentop = front.ceilingheight.min(back.ceilingheight);
        let (openbottom, lowfloor) =
            if front.floorheight > back.floorheight {
                (front.floorheight, back.floorheight)
            }
            else {
                (back.floorheight, front.floorheight)
            };

        return Opening {
            top: opentop,
            bottom: openbottom,
            range: opentop.wrapping_sub(openbottom),
            lowfloor,
        };
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Opening {
    pub top: Fixed,
    pub bottom: Fixed,
    pub range: Fixed,
    pub lowfloor: Fixed,
}

impl Opening {
    fn closed() -> Opening {
        Opening{ top: 0, bottom: 0, range: 0, lowfloor: 0 }
    }
}

pub struct Handle<T>(usize, PhantomData<fn() -> T>);

impl<T> Handle<T> {
    pub fn index(self) -> usize {
        return self.0;
    }
}

// Implemented by hand because the auto-generated impls assume T must also implement the trait,
// but we don't actually own a T.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        return Handle(self.0, PhantomData);
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Handle<T>) -> bool {
        return self.0 == other.0;
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl<T> From<usize> for Handle<T> {
    fn from(index: usize) -> Self {
        return Handle(index, PhantomData);
    }
}

bitflags! {
    pub struct LineFlags: u16 {
        const BLOCKING = 0x0001;
        const BLOCK_MONSTERS = 0x0002;
        const TWO_SIDED = 0x0004;
        const DONT_PEG_TOP = 0x0008;
        const DONT_PEG_BOTTOM = 0x0010;
        const SECRET = 0x0020;
        const SOUND_BLOCK = 0x0040;
        const DONT_DRAW = 0x0080;
        const MAPPED = 0x0100;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlopeType {
    Horizontal,
    Vertical,
    Positive,
    Negative,
}

#[derive(Clone, Debug)]
pub struct Sector {
    pub floorheight: Fixed,
    pub ceilingheight: Fixed,
    pub lightlevel: i16,
    pub special: i16,
    pub tag: i16,
}

#[derive(Clone, Debug)]
pub struct Side {
    pub sector: Handle<Sector>,
}

#[derive(Clone, Debug)]
pub struct Line {
    pub v1: Handle<Vertex>,
    pub v2: Handle<Vertex>,
    pub dx: Fixed,
    pub dy: Fixed,
    pub flags: LineFlags,
    pub special: i16,
    pub tag: i16,
    pub front_side: Option<Handle<Side>>,
    pub back_side: Option<Handle<Side>>,
    pub front_sector: Option<Handle<Sector>>,
    pub back_sector: Option<Handle<Sector>>,
    pub bbox: BBox,
    pub slopetype: SlopeType,
}

impl Line {
    pub fn is_one_sided(&self) -> bool {
        return self.back_sector.is_none() || self.front_sector.is_none();
    }
}
