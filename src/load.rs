//! Turning bare map lumps into a `Level` the playsim can run on, and placing the map's things.

use archive::wad::{BareWAD, MapFormat, MapName, WADMapEntryBlock};
use blockmap::Blockmap;
use bsp::{Node, NodeChild};
use errors::{ErrorKind, Result};
use fixed::{Fixed, to_fixed};
use geom::BBox;
use info::Family;
use map::{Handle, Level, LineFlags, Side};
use mobj::MobjFlags;
use parse::map::{BareBinaryLine, BareBinaryMap, BareBinaryThing, BareMap, NF_SUBSECTOR, parse_doom_map};
use reject::Reject;
use rules::Skill;
use tables::{ANG45, Angle};
use world::{ONFLOORZ, World};

bitflags! {
    /// Flags on a placed thing in the THINGS lump.
    pub struct ThingFlags: u16 {
        const EASY = 0x0001;
        const NORMAL = 0x0002;
        const HARD = 0x0004;
        const AMBUSH = 0x0008;
        const NOT_SINGLE = 0x0010;
        const NOT_DEATHMATCH = 0x0020;
        const NOT_COOP = 0x0040;
        const FRIEND = 0x0080;
    }
}

/// A thing as placed on the map, before anything is spawned for it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MapThing {
    pub x: Fixed,
    pub y: Fixed,
    pub angle: Angle,
    pub doomednum: i16,
    pub flags: ThingFlags,
}

pub struct LoadedMap {
    pub name: MapName,
    pub format: MapFormat,
    pub level: Level,
    pub things: Vec<MapThing>,
}

/// Parse and build one map out of a WAD.
pub fn load_map(wad: &BareWAD, block: &WADMapEntryBlock) -> Result<LoadedMap> {
    let (level, things) = match parse_doom_map(wad, block)? {
        BareMap::Doom(ref bare) => (build_level(bare)?, map_things(bare)),
        BareMap::Hexen(ref bare) => (build_level(bare)?, map_things(bare)),
    };
    info!("loaded {} ({:?}): {} lines, {} sectors, {} things",
        block.name, block.format, level.num_lines(), level.num_sectors(), things.len());
    Ok(LoadedMap{ name: block.name, format: block.format, level, things })
}

fn side_index(raw: i16) -> Option<usize> {
    if raw == -1 {
        None
    }
    else {
        Some(raw as u16 as usize)
    }
}

fn bare_bbox(raw: &[i16; 4]) -> BBox {
    BBox {
        top: to_fixed(raw[0] as i32),
        bottom: to_fixed(raw[1] as i32),
        left: to_fixed(raw[2] as i32),
        right: to_fixed(raw[3] as i32),
    }
}

/// Resolve bare lumps into a `Level`.  Every cross-reference is checked; a missing BLOCKMAP is
/// generated, and a missing REJECT means everything can see everything.
pub fn build_level<'a, L: BareBinaryLine, T: BareBinaryThing>(bare: &BareBinaryMap<'a, L, T>) -> Result<Level> {
    let mut level = Level::new();

    for bare_vertex in bare.vertices.iter() {
        level.add_vertex(to_fixed(bare_vertex.x as i32), to_fixed(bare_vertex.y as i32));
    }
    for bare_sector in bare.sectors.iter() {
        let handle = level.add_sector(to_fixed(bare_sector.floor_height as i32), to_fixed(bare_sector.ceiling_height as i32));
        let sector = level.sector_mut(handle);
        sector.lightlevel = bare_sector.light;
        sector.special = bare_sector.sector_type;
        sector.tag = bare_sector.sector_tag;
    }
    for (i, bare_side) in bare.sides.iter().enumerate() {
        let sector = bare_side.sector as u16 as usize;
        if sector >= bare.sectors.len() {
            warn!("side {} points at sector {}, which doesn't exist", i, sector);
            return Err(ErrorKind::BadReference("sector", sector).into());
        }
        level.add_side(sector.into());
    }

    let mut sided_but_not_flagged = 0;
    for bare_line in bare.lines.iter() {
        let (v0, v1) = bare_line.vertex_indices();
        let (v0, v1) = (v0 as u16 as usize, v1 as u16 as usize);
        for &v in [v0, v1].iter() {
            if v >= bare.vertices.len() {
                return Err(ErrorKind::BadReference("vertex", v).into());
            }
        }
        let (front, back) = bare_line.side_indices();
        let (front, back) = (side_index(front), side_index(back));
        for &side in front.iter().chain(back.iter()) {
            if side >= bare.sides.len() {
                return Err(ErrorKind::BadReference("side", side).into());
            }
        }

        let handle = level.add_line(v0.into(), v1.into(), front.map(Handle::from), back.map(Handle::from));
        let line = level.line_mut(handle);
        line.flags = LineFlags::from_bits_truncate(bare_line.flags() as u16);
        line.special = bare_line.special();
        line.tag = bare_line.tag();
        if back.is_some() && !line.flags.contains(LineFlags::TWO_SIDED) {
            sided_but_not_flagged += 1;
        }
    }
    if sided_but_not_flagged > 0 {
        warn!("{} lines have a back side but no two-sided flag", sided_but_not_flagged);
    }

    if bare.subsectors.is_empty() {
        if bare.sectors.len() > 1 {
            warn!("map has no BSP; every point will be found in the first sector");
        }
        if !bare.sectors.is_empty() {
            level.add_subsector(0.into());
        }
    }
    for (i, bare_subsector) in bare.subsectors.iter().enumerate() {
        let seg_index = bare_subsector.firstseg as usize;
        let seg = bare.segs.get(seg_index).ok_or(ErrorKind::BadReference("seg", seg_index))?;
        let line_index = seg.line as usize;
        if line_index >= level.num_lines() {
            return Err(ErrorKind::BadReference("line", line_index).into());
        }
        let line = level.line(line_index.into());
        let side: Option<Handle<Side>> = if seg.side == 0 { line.front_side } else { line.back_side };
        let side = side.ok_or(ErrorKind::BadReference("seg side", i))?;
        let sector = level.side(side).sector;
        level.add_subsector(sector);
    }

    let numsubsectors = bare.subsectors.len().max(1);
    let numnodes = bare.nodes.len();
    for bare_node in bare.nodes.iter() {
        let mut children = [NodeChild::Subsector(0); 2];
        for (child, &raw) in children.iter_mut().zip(bare_node.children.iter()) {
            *child =
                if raw & NF_SUBSECTOR != 0 {
                    let index = (raw & !NF_SUBSECTOR) as usize;
                    if index >= numsubsectors {
                        return Err(ErrorKind::BadReference("subsector", index).into());
                    }
                    NodeChild::Subsector(index)
                }
                else {
                    let index = raw as usize;
                    if index >= numnodes {
                        return Err(ErrorKind::BadReference("node", index).into());
                    }
                    NodeChild::Node(index)
                };
        }
        level.add_node(Node{
            x: to_fixed(bare_node.x as i32),
            y: to_fixed(bare_node.y as i32),
            dx: to_fixed(bare_node.dx as i32),
            dy: to_fixed(bare_node.dy as i32),
            bbox: [bare_bbox(&bare_node.bbox[0]), bare_bbox(&bare_node.bbox[1])],
            children,
        });
    }

    match bare.blockmap {
        Some(ref bare_blockmap) => {
            let mut cells = Vec::with_capacity(bare_blockmap.cells.len());
            for cell in bare_blockmap.cells.iter() {
                let mut lines = Vec::with_capacity(cell.len());
                for &line in cell.iter() {
                    let line = line as usize;
                    if line >= level.num_lines() {
                        return Err(ErrorKind::BadReference("line", line).into());
                    }
                    lines.push(line.into());
                }
                cells.push(lines);
            }
            level.blockmap = Blockmap::from_cells(
                to_fixed(bare_blockmap.orgx as i32), to_fixed(bare_blockmap.orgy as i32),
                bare_blockmap.width as i32, bare_blockmap.height as i32, cells);
        }
        None => {
            debug!("no BLOCKMAP lump; generating one");
            level.generate_blockmap();
        }
    }

    level.reject = match bare.reject {
        Some(data) => Reject::from_lump(data, level.num_sectors()),
        None => Reject::all_visible(level.num_sectors()),
    };

    Ok(level)
}

fn map_things<'a, L: BareBinaryLine, T: BareBinaryThing>(bare: &BareBinaryMap<'a, L, T>) -> Vec<MapThing> {
    bare.things.iter().map(|thing| {
        let (x, y) = thing.coords();
        MapThing{
            x: to_fixed(x as i32),
            y: to_fixed(y as i32),
            angle: Angle(ANG45.0.wrapping_mul((thing.angle() / 45) as u32)),
            doomednum: thing.doomednum(),
            flags: ThingFlags::from_bits_truncate(thing.flags()),
        }
    }).collect()
}

impl World {
    /// Spawn everything the current skill and game mode call for.  Player starts 1 through 4 give
    /// bodies to players that exist; deathmatch starts are left alone.  Returns how many things
    /// were spawned.
    pub fn spawn_map_things(&mut self, things: &[MapThing]) -> usize {
        let family = if self.config.ruleset.is_heretic() { Family::Heretic } else { Family::Doom };
        let skill_bit = match self.config.skill {
            Skill::Baby | Skill::Easy => ThingFlags::EASY,
            Skill::Medium => ThingFlags::NORMAL,
            Skill::Hard | Skill::Nightmare => ThingFlags::HARD,
        };

        let mut spawned = 0;
        for thing in things.iter() {
            if thing.doomednum >= 1 && thing.doomednum <= 4 {
                let index = (thing.doomednum - 1) as usize;
                if index < self.players.len() && self.spawn_player(index, thing.x, thing.y, thing.angle).is_some() {
                    spawned += 1;
                }
                continue;
            }

            if !thing.flags.contains(skill_bit) {
                continue;
            }
            if !self.config.multiplayer && thing.flags.contains(ThingFlags::NOT_SINGLE) {
                continue;
            }
            if self.config.is_deathmatch() && thing.flags.contains(ThingFlags::NOT_DEATHMATCH) {
                continue;
            }
            if self.config.multiplayer && !self.config.is_deathmatch() && thing.flags.contains(ThingFlags::NOT_COOP) {
                continue;
            }

            let kind = match self.info.type_for_doomednum(family, thing.doomednum as i32) {
                Some(kind) => kind,
                None => {
                    trace!("no thing type {} in this game", thing.doomednum);
                    continue;
                }
            };

            let id = self.spawn_mobj(thing.x, thing.y, ONFLOORZ, kind);
            if let Some(mo) = self.mobjs.get_mut(id) {
                mo.angle = thing.angle;
                if thing.flags.contains(ThingFlags::AMBUSH) {
                    mo.flags |= MobjFlags::AMBUSH;
                }
                if thing.flags.contains(ThingFlags::FRIEND) && self.config.policy().mbf_features {
                    mo.flags |= MobjFlags::FRIEND;
                }
            }
            spawned += 1;
        }
        debug!("spawned {} of {} map things", spawned, things.len());
        return spawned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use info::MobjType;
    use parse::map::{BareBlockmap, BareDoomLine, BareDoomMap, BareDoomThing, BareSector, BareSide, BareVertex};
    use rules::GameConfig;

    fn square() -> BareDoomMap<'static> {
        let corners = [(-128, -128), (-128, 128), (128, 128), (128, -128)];
        BareDoomMap{
            vertices: corners.iter().map(|&(x, y)| BareVertex{ x, y }).collect(),
            sectors: vec![BareSector{
                floor_height: 0,
                ceiling_height: 128,
                floor_texture: "FLOOR4_8",
                ceiling_texture: "CEIL3_5",
                light: 192,
                sector_type: 9,
                sector_tag: 3,
            }],
            sides: vec![BareSide{
                x_offset: 0,
                y_offset: 0,
                upper_texture: "-",
                lower_texture: "-",
                middle_texture: "STARTAN3",
                sector: 0,
            }],
            lines: (0 .. 4).map(|i| BareDoomLine{
                v0: i,
                v1: (i + 1) % 4,
                flags: 1,
                special: 0,
                sector_tag: 0,
                front_sidedef: 0,
                back_sidedef: -1,
            }).collect(),
            things: vec![
                BareDoomThing{ x: 0, y: 0, angle: 90, doomednum: 1, flags: 7 },
                BareDoomThing{ x: 64, y: 0, angle: 180, doomednum: 3001, flags: 4 | 8 },
                BareDoomThing{ x: -64, y: 0, angle: 0, doomednum: 3004, flags: 1 },
                BareDoomThing{ x: -64, y: 64, angle: 0, doomednum: 2011, flags: 7 | 16 },
            ],
            segs: Vec::new(),
            subsectors: Vec::new(),
            nodes: Vec::new(),
            blockmap: None,
            reject: None,
        }
    }

    #[test]
    fn builds_a_room() {
        let level = build_level(&square()).unwrap();
        assert_eq!(level.num_lines(), 4);
        assert_eq!(level.num_sectors(), 1);
        let sector = level.sector(0.into());
        assert_eq!(sector.ceilingheight, to_fixed(128));
        assert_eq!(sector.special, 9);
        assert_eq!(sector.tag, 3);
        assert!(level.line(0.into()).flags.contains(LineFlags::BLOCKING));
        assert!(level.blockmap.num_cells() > 0);
        assert_eq!(level.reject.numsectors(), 1);
        assert_eq!(level.point_in_subsector(0, 0), 0.into());
    }

    #[test]
    fn bad_references_are_errors() {
        let mut bare = square();
        bare.sides[0].sector = 5;
        assert!(build_level(&bare).is_err());

        let mut bare = square();
        bare.lines[2].v1 = 40;
        assert!(build_level(&bare).is_err());

        let mut bare = square();
        bare.lines[1].back_sidedef = 2;
        assert!(build_level(&bare).is_err());

        let mut bare = square();
        bare.blockmap = Some(BareBlockmap{ orgx: -128, orgy: -128, width: 1, height: 1, cells: vec![vec![9]] });
        assert!(build_level(&bare).is_err());
    }

    #[test]
    fn uses_the_blockmap_lump_when_present() {
        let mut bare = square();
        bare.blockmap = Some(BareBlockmap{ orgx: -136, orgy: -136, width: 1, height: 1, cells: vec![vec![0, 1, 2, 3]] });
        let level = build_level(&bare).unwrap();
        assert_eq!(level.blockmap.orgx, to_fixed(-136));
        assert_eq!(level.blockmap.lines_in(0, 0).len(), 4);
    }

    #[test]
    fn things_follow_skill_and_mode() {
        let bare = square();
        let things = map_things(&bare);
        assert_eq!(things[0].angle, Angle(0x4000_0000));
        assert!(things[1].flags.contains(ThingFlags::AMBUSH));

        let level = build_level(&bare).unwrap();
        let mut config = GameConfig::default();
        config.skill = Skill::Hard;
        let mut world = World::new(level, config);
        let p = world.add_player();
        // The player, and the imp; the zombieman is easy-only and the medikit multiplayer-only
        assert_eq!(world.spawn_map_things(&things), 2);
        let body = world.players[p].mo.unwrap();
        assert_eq!(world.mobj(body).unwrap().angle, Angle(0x4000_0000));
        let imp = world.mobjs.iter().find(|&(_, mo)| mo.kind == MobjType::Troop).map(|(_, mo)| mo.flags);
        assert!(imp.unwrap().contains(MobjFlags::AMBUSH));
    }
}
