//! One running simulation: the level, everything in it, and the tables it's playing by.
//!
//! Nothing here is global.  Two worlds can run side by side without stepping on each other, and
//! every trace borrows its scratch space from the world it runs in.

use std::fmt;

use fixed::Fixed;
use info::{InfoTables, MobjType, SpriteNum, StateNum};
use intercept::TraceScratch;
use map::{Handle, Level, Line, Sector};
use mobj::{ExtraFlags, Mobj, MobjArena, MobjFlags, MobjId};
use player::{Artifact, Player, PowerType};
use random::DoomRandom;
use rules::{DehackedLimits, GameConfig, Ruleset};
use tables::Angle;
use weapons::{WeaponInfo, WeaponTables, WeaponType};

/// Spawn on the floor of whatever sector the point is in
pub const ONFLOORZ: Fixed = ::std::i32::MIN;
/// Spawn hanging from the ceiling
pub const ONCEILINGZ: Fixed = ::std::i32::MAX;

/// Zero-tic states are followed immediately; a table that loops through nothing but those is
/// broken, and this is how many hops it takes to notice.
const MAX_STATE_CYCLE: usize = 1000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sound {
    ItemUp,
    WpnUp,
    GetPow,
    KeyUp,
    ArtiUp,
    Slop,
    GFrag,
    Punch,
    SawHit,
    SawFull,
    Pistol,
    Telept,
}

/// Things that happened during a call that the caller may want to react to: play a sound, update
/// a HUD, end the level.  Queued on the world and drained by whoever runs the tic loop.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Sound { origin: Option<MobjId>, sound: Sound },
    Pickup { player: usize, sprite: SpriteNum },
    Killed { target: MobjId, source: Option<MobjId> },
    Obituary(String),
    ArtifactUsed { player: usize, artifact: Artifact },
    /// Something teleported away on its own, like a fleeing sorcerer
    Teleported(MobjId),
    Morphed { mobj: MobjId, into: MobjType },
    /// A hitscan shot hit a line with a special; the caller decides what that triggers
    LineShot { line: Handle<Line>, by: MobjId },
    ExitLevel,
}

pub struct World {
    pub level: Level,
    pub mobjs: MobjArena,
    pub players: Vec<Player>,
    pub config: GameConfig,
    pub limits: DehackedLimits,
    pub info: InfoTables,
    pub weapons: WeaponTables,
    pub rng: DoomRandom,
    pub events: Vec<GameEvent>,

    /// What the last aim found, if anything
    pub linetarget: Option<MobjId>,
    /// Slope the last aim settled on
    pub aim_slope: Fixed,
    /// Slope the player's last bullet aim settled on, used by every bullet fired after it
    pub bulletslope: Fixed,

    pub leveltime: i32,
    /// The player who last triggered a special line, for voodoo dolls to blame
    pub spechit_player: Option<usize>,
    pub consoleplayer: usize,

    pub(crate) scratch: TraceScratch,
}

impl World {
    pub fn new(level: Level, config: GameConfig) -> World {
        let limits = DehackedLimits::for_ruleset(config.ruleset);
        let mut info = InfoTables::classic();
        let weapons = WeaponTables::classic(&mut info);
        let scratch = TraceScratch::new(config.max_intercepts);
        World {
            level,
            mobjs: MobjArena::new(),
            players: Vec::new(),
            config,
            limits,
            info,
            weapons,
            rng: DoomRandom::new(),
            events: Vec::new(),
            linetarget: None,
            aim_slope: 0,
            bulletslope: 0,
            leveltime: 0,
            spechit_player: None,
            consoleplayer: 0,
            scratch,
        }
    }

    /// Add a player to the game, without a body yet.
    pub fn add_player(&mut self) -> usize {
        let mut player = Player::new(self.limits.max_ammo, self.limits.initial_bullets, self.limits.favorite_weapons);
        player.originalweaponswitch = self.config.original_weapon_switch;
        player.autoaim = self.config.autoaim;
        self.players.push(player);
        return self.players.len() - 1;
    }

    /// Give a player a body at the given spot.
    pub fn spawn_player(&mut self, index: usize, x: Fixed, y: Fixed, angle: Angle) -> Option<MobjId> {
        if index >= self.players.len() {
            self.soft_error(format_args!("spawning nonexistent player {}", index));
            return None;
        }
        let id = self.spawn_mobj(x, y, ONFLOORZ, MobjType::Player);
        if let Some(mo) = self.mobjs.get_mut(id) {
            mo.player = Some(index);
            mo.angle = angle;
            mo.health = self.players[index].health;
        }
        self.players[index].mo = Some(id);
        return Some(id);
    }

    pub fn spawn_mobj(&mut self, x: Fixed, y: Fixed, z: Fixed, kind: MobjType) -> MobjId {
        let (spawnstate, mobj) = {
            let info = self.info.info(kind);
            let subsector = self.level.point_in_subsector(x, y);
            let sector = self.level.point_in_sector(x, y);
            let (floorz, ceilingz) = {
                let sector = self.level.sector(sector);
                (sector.floorheight, sector.ceilingheight)
            };
            let z =
                if z == ONFLOORZ { floorz }
                else if z == ONCEILINGZ { ceilingz - info.height }
                else { z };

            let mobj = Mobj {
                x, y, z,
                momx: 0, momy: 0, momz: 0,
                angle: Angle(0),
                floorz,
                ceilingz,
                radius: info.radius,
                height: info.height,
                subsector,
                kind,
                sprite: SpriteNum::TNT1,
                frame: 0,
                state: StateNum::NULL,
                tics: -1,
                flags: info.flags,
                flags2: info.flags2,
                flags3: info.flags3,
                eflags: if z == floorz { ExtraFlags::ONGROUND } else { ExtraFlags::empty() },
                health: info.spawnhealth,
                reactiontime: info.reactiontime,
                threshold: 0,
                movecount: 0,
                target: None,
                tracer: None,
                lastenemy: None,
                player: None,
                dropped_ammo_count: 0,
                special1: 0,
                special2: 0,
            };
            (info.spawnstate, mobj)
        };

        let linked = !mobj.flags.contains(MobjFlags::NOBLOCKMAP);
        let id = self.mobjs.insert(mobj);
        if linked {
            self.level.blockmap.link_thing(id, x, y);
        }

        // Spawning never runs actions, so a spawn state is taken as-is even if it's zero tics
        if let Some(state) = self.info.state(spawnstate).cloned() {
            if let Some(mo) = self.mobjs.get_mut(id) {
                mo.state = spawnstate;
                mo.tics = state.tics;
                mo.sprite = state.sprite;
                mo.frame = state.frame;
            }
        }
        else {
            self.soft_error(format_args!("{:?} has spawn state {:?}, which doesn't exist", kind, spawnstate));
        }
        trace!("spawned {:?} as {:?}", kind, id);
        return id;
    }

    pub fn remove_mobj(&mut self, id: MobjId) {
        if let Some(mo) = self.mobjs.remove(id) {
            if !mo.flags.contains(MobjFlags::NOBLOCKMAP) {
                self.level.blockmap.unlink_thing(id, mo.x, mo.y);
            }
            trace!("removed {:?} ({:?})", id, mo.kind);
        }
    }

    pub fn mobj(&self, id: MobjId) -> Option<&Mobj> {
        self.mobjs.get(id)
    }

    pub fn mobj_mut(&mut self, id: MobjId) -> Option<&mut Mobj> {
        self.mobjs.get_mut(id)
    }

    /// The sector a thing is standing in, going by the subsector it was last linked into.
    pub fn sector_of(&self, mo: &Mobj) -> Option<Handle<Sector>> {
        self.level.subsectors.get(mo.subsector.index()).map(|ss| ss.sector)
    }

    /// Move a thing, relinking it into the blockmap and recomputing what it's standing in.
    pub fn set_position(&mut self, id: MobjId, x: Fixed, y: Fixed) -> bool {
        let (oldx, oldy, linked) = match self.mobjs.get(id) {
            Some(mo) => (mo.x, mo.y, !mo.flags.contains(MobjFlags::NOBLOCKMAP)),
            None => { return false; }
        };
        if linked {
            self.level.blockmap.unlink_thing(id, oldx, oldy);
        }

        let subsector = self.level.point_in_subsector(x, y);
        let sector = self.level.point_in_sector(x, y);
        let (floorz, ceilingz) = {
            let sector = self.level.sector(sector);
            (sector.floorheight, sector.ceilingheight)
        };
        if let Some(mo) = self.mobjs.get_mut(id) {
            mo.x = x;
            mo.y = y;
            mo.subsector = subsector;
            mo.floorz = floorz;
            mo.ceilingz = ceilingz;
        }

        if linked {
            self.level.blockmap.link_thing(id, x, y);
        }
        return true;
    }

    /// Switch a thing to a new state, following any zero-tic states along the way.  Returns false
    /// if the thing was removed (by reaching the null state) or the state table is broken.
    pub fn set_mobj_state(&mut self, id: MobjId, state: StateNum) -> bool {
        let mut state = state;
        for _ in 0..MAX_STATE_CYCLE {
            if state == StateNum::NULL {
                if let Some(mo) = self.mobjs.get_mut(id) {
                    mo.state = StateNum::NULL;
                }
                self.remove_mobj(id);
                return false;
            }

            let def = match self.info.state(state) {
                Some(def) => def.clone(),
                None => {
                    self.soft_error(format_args!("state {:?} is out of range for {:?}", state, id));
                    return false;
                }
            };
            match self.mobjs.get_mut(id) {
                Some(mo) => {
                    mo.state = state;
                    mo.tics = def.tics;
                    mo.sprite = def.sprite;
                    mo.frame = def.frame;
                }
                None => { return false; }
            }

            if def.tics != 0 {
                return true;
            }
            state = def.next;
        }

        self.soft_error(format_args!("state {:?} cycles through zero-tic states forever", state));
        return false;
    }

    /// The live weapon table entry for what a player would be using, which depends on the game
    /// and on whether the Tome of Power is active.
    pub fn weapon_info(&self, player: usize, weapon: WeaponType) -> Option<&WeaponInfo> {
        let powered = self.players.get(player).map_or(false, |p| p.power(PowerType::WeaponLevel2) > 0);
        let table = match self.config.ruleset {
            Ruleset::Heretic if powered => &self.weapons.heretic_powered,
            Ruleset::Heretic | Ruleset::Hexen => &self.weapons.heretic,
            _ => &self.weapons.doom,
        };
        table.get(weapon.index())
    }

    /// Which player, if any, a thing is the real body of.  Voodoo dolls don't count.
    pub fn player_of(&self, id: MobjId) -> Option<usize> {
        let index = self.mobjs.get(id)?.player?;
        match self.players.get(index) {
            Some(player) if player.mo == Some(id) => Some(index),
            _ => None,
        }
    }

    /// A thing that claims to be a player but isn't that player's body.
    pub fn is_voodoo_doll(&self, id: MobjId) -> bool {
        match self.mobjs.get(id).and_then(|mo| mo.player) {
            Some(index) => self.players.get(index).map_or(true, |p| p.mo != Some(id)),
            None => false,
        }
    }

    pub fn start_sound(&mut self, origin: Option<MobjId>, sound: Sound) {
        self.events.push(GameEvent::Sound{ origin, sound });
    }

    /// Hand over everything that's happened since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        ::std::mem::replace(&mut self.events, Vec::new())
    }

    /// Bad table data or a bad argument.  Logged and skipped, unless the config asks for a hard
    /// stop.
    pub fn soft_error(&self, args: fmt::Arguments) {
        if self.config.strict_tables {
            panic!("{}", args);
        }
        warn!("{}", args);
    }

    pub fn p_random(&mut self) -> i32 {
        self.rng.p_random()
    }

    pub fn p_signed_random(&mut self) -> i32 {
        self.rng.p_signed_random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed::to_fixed;

    fn box_world() -> World {
        let mut level = Level::new();
        let sector = level.add_sector(0, to_fixed(128));
        let side = level.add_side(sector);
        let a = level.add_vertex(to_fixed(-256), to_fixed(-256));
        let b = level.add_vertex(to_fixed(-256), to_fixed(256));
        let c = level.add_vertex(to_fixed(256), to_fixed(256));
        let d = level.add_vertex(to_fixed(256), to_fixed(-256));
        level.add_line(a, b, Some(side), None);
        level.add_line(b, c, Some(side), None);
        level.add_line(c, d, Some(side), None);
        level.add_line(d, a, Some(side), None);
        level.add_subsector(sector);
        level.generate_blockmap();
        World::new(level, GameConfig::default())
    }

    #[test]
    fn spawned_things_are_linked_and_findable() {
        let mut world = box_world();
        let id = world.spawn_mobj(to_fixed(10), to_fixed(20), ONFLOORZ, MobjType::Troop);
        let (bx, by) = (world.level.blockmap.block_x(to_fixed(10)), world.level.blockmap.block_y(to_fixed(20)));
        assert!(world.level.blockmap.things_in(bx, by).contains(&id));
        let mo = world.mobj(id).unwrap();
        assert_eq!(mo.z, 0);
        assert_eq!(mo.health, 60);
        assert_eq!(mo.state, world.info.info(MobjType::Troop).spawnstate);

        world.remove_mobj(id);
        assert!(world.mobj(id).is_none());
        assert!(!world.level.blockmap.things_in(bx, by).contains(&id));
    }

    #[test]
    fn moving_relinks() {
        let mut world = box_world();
        let id = world.spawn_mobj(to_fixed(-200), to_fixed(-200), ONFLOORZ, MobjType::Troop);
        assert!(world.set_position(id, to_fixed(200), to_fixed(200)));
        let bm = &world.level.blockmap;
        assert!(!bm.things_in(bm.block_x(to_fixed(-200)), bm.block_y(to_fixed(-200))).contains(&id));
        assert!(bm.things_in(bm.block_x(to_fixed(200)), bm.block_y(to_fixed(200))).contains(&id));
    }

    #[test]
    fn null_state_removes() {
        let mut world = box_world();
        let id = world.spawn_mobj(0, 0, ONFLOORZ, MobjType::Puff);
        assert!(!world.set_mobj_state(id, StateNum::NULL));
        assert!(world.mobj(id).is_none());
    }

    #[test]
    fn bad_state_is_a_soft_error() {
        let mut world = box_world();
        let id = world.spawn_mobj(0, 0, ONFLOORZ, MobjType::Troop);
        assert!(!world.set_mobj_state(id, StateNum(60000)));
        assert!(world.mobj(id).is_some());
    }

    #[test]
    #[should_panic]
    fn strict_tables_turn_soft_errors_hard() {
        let mut world = box_world();
        world.config.strict_tables = true;
        let id = world.spawn_mobj(0, 0, ONFLOORZ, MobjType::Troop);
        world.set_mobj_state(id, StateNum(60000));
    }

    #[test]
    fn voodoo_dolls_are_not_the_player() {
        let mut world = box_world();
        let p = world.add_player();
        let body = world.spawn_player(p, 0, 0, Angle(0)).unwrap();
        let doll = world.spawn_mobj(to_fixed(64), 0, ONFLOORZ, MobjType::Player);
        world.mobj_mut(doll).unwrap().player = Some(p);
        assert_eq!(world.player_of(body), Some(p));
        assert_eq!(world.player_of(doll), None);
        assert!(world.is_voodoo_doll(doll));
        assert!(!world.is_voodoo_doll(body));
    }
}
