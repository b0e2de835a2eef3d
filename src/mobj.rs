//! Map objects: monsters, players, items, projectiles, effects.  They live in an arena on the
//! world and refer to each other by generation-checked handles, so a reference to something that
//! has since been removed just stops resolving.

use std::fmt;

use bsp::Subsector;
use fixed::Fixed;
use info::{MobjType, SpriteNum, StateNum};
use map::Handle;
use tables::Angle;

bitflags! {
    pub struct MobjFlags: u32 {
        /// Call the touch handler when something runs into this
        const SPECIAL = 0x1;
        const SOLID = 0x2;
        const SHOOTABLE = 0x4;
        const NOSECTOR = 0x8;
        const NOBLOCKMAP = 0x10;
        const AMBUSH = 0x20;
        const JUSTHIT = 0x40;
        const JUSTATTACKED = 0x80;
        const SPAWNCEILING = 0x100;
        const NOGRAVITY = 0x200;
        const DROPOFF = 0x400;
        const PICKUP = 0x800;
        const NOCLIP = 0x1000;
        const SLIDE = 0x2000;
        const FLOAT = 0x4000;
        const TELEPORT = 0x8000;
        const MISSILE = 0x10000;
        /// Dropped by a dying monster or player rather than placed on the map
        const DROPPED = 0x20000;
        const SHADOW = 0x40000;
        const NOBLOOD = 0x80000;
        const CORPSE = 0x100000;
        const INFLOAT = 0x200000;
        const COUNTKILL = 0x400000;
        const COUNTITEM = 0x800000;
        const SKULLFLY = 0x1000000;
        const NOTDMATCH = 0x2000000;
        const TRANSLATION = 0xC000000;
        const TOUCHY = 0x10000000;
        const BOUNCES = 0x20000000;
        const FRIEND = 0x40000000;
        const TRANSLUCENT = 0x80000000;
    }
}

bitflags! {
    pub struct MobjFlags2: u32 {
        const LOGRAV = 0x1;
        const WINDTHRUST = 0x2;
        const FLOORBOUNCE = 0x4;
        const THRUGHOST = 0x8;
        const FLY = 0x10;
        const FOOTCLIP = 0x20;
        const SPAWNFLOAT = 0x40;
        const NOTELEPORT = 0x80;
        /// Missile passes through things it hits
        const RIP = 0x100;
        const PUSHABLE = 0x200;
        const SLIDE = 0x400;
        const ONMOBJ = 0x800;
        const PASSMOBJ = 0x1000;
        const CANNOTPUSH = 0x2000;
        const FEETARECLIPPED = 0x4000;
        const BOSS = 0x8000;
        const FIREDAMAGE = 0x10000;
        const NODMGTHRUST = 0x20000;
        const TELESTOMP = 0x40000;
        const FLOATBOB = 0x80000;
        const DONTDRAW = 0x100000;
    }
}

bitflags! {
    pub struct MobjFlags3: u32 {
        const SHORTMRANGE = 0x1;
        /// Damage from this doesn't make the victim retaliate
        const DMGIGNORED = 0x2;
        const NORADIUSDMG = 0x4;
        const FORCERADIUSDMG = 0x8;
        const HIGHERMPROB = 0x10;
        const RANGEHALF = 0x20;
        /// Retaliates even while chasing something else
        const NOTHRESHOLD = 0x40;
        const LONGMELEE = 0x80;
        const MAP07BOSS1 = 0x100;
        const MAP07BOSS2 = 0x200;
        const E1M8BOSS = 0x400;
        const E2M8BOSS = 0x800;
        const E3M8BOSS = 0x1000;
        const E4M6BOSS = 0x2000;
        const E4M8BOSS = 0x4000;
        const FULLVOLSOUNDS = 0x8000;
        const INVULNERABLE = 0x0800_0000;
        const DORMANT = 0x1000_0000;
        const ICEDAMAGE = 0x2000_0000;
        const REFLECTIVE = 0x4000_0000;
    }
}

bitflags! {
    /// Engine bookkeeping bits, never set by mod data.
    pub struct ExtraFlags: u32 {
        const ONGROUND = 0x1;
        const JUSTHITFLOOR = 0x2;
        const UNDERWATER = 0x4;
        const TOUCHWATER = 0x8;
        const FALLING = 0x100;
        const PLAYER_DAMAGED_BARREL = 0x800;
        const ICECORPSE = 0x8000;
    }
}

/// Generation-checked reference to a map object.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct MobjId {
    index: u32,
    generation: u32,
}

impl MobjId {
    pub fn new(index: usize, generation: u32) -> MobjId {
        MobjId{ index: index as u32, generation }
    }

    pub fn index(self) -> usize {
        self.index as usize
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for MobjId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MobjId({}#{})", self.index, self.generation)
    }
}

#[derive(Clone, Debug)]
pub struct Mobj {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub momx: Fixed,
    pub momy: Fixed,
    pub momz: Fixed,
    pub angle: Angle,

    pub floorz: Fixed,
    pub ceilingz: Fixed,
    pub radius: Fixed,
    pub height: Fixed,
    pub subsector: Handle<Subsector>,

    pub kind: MobjType,
    pub sprite: SpriteNum,
    pub frame: u32,
    pub state: StateNum,
    pub tics: i32,

    pub flags: MobjFlags,
    pub flags2: MobjFlags2,
    pub flags3: MobjFlags3,
    pub eflags: ExtraFlags,

    pub health: i32,
    pub reactiontime: i32,
    pub threshold: i32,
    pub movecount: i32,

    pub target: Option<MobjId>,
    pub tracer: Option<MobjId>,
    pub lastenemy: Option<MobjId>,
    /// Index into the world's players.  A voodoo doll has this set but isn't that player's `mo`.
    pub player: Option<usize>,

    /// Ammo carried by a dropped weapon, in the `TST_*` encoding from the ammo module
    pub dropped_ammo_count: u16,
    pub special1: i32,
    pub special2: i32,
}

impl Mobj {
    pub fn is_friend(&self) -> bool {
        self.flags.contains(MobjFlags::FRIEND)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// Both on the same side: both friendly or both hostile.
pub fn same_friend(a: &Mobj, b: &Mobj) -> bool {
    a.is_friend() == b.is_friend()
}

/// Both friendly.
pub fn both_friend(a: &Mobj, b: &Mobj) -> bool {
    a.is_friend() && b.is_friend()
}

enum Slot {
    Occupied(u32, Mobj),
    Vacant(u32),
}

/// Arena of map objects.  Removing one bumps its slot's generation, invalidating every outstanding
/// `MobjId` for it, which makes removal O(1) with no need to hunt down references.
pub struct MobjArena {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
}

impl MobjArena {
    pub fn new() -> MobjArena {
        MobjArena{ slots: Vec::new(), free: Vec::new(), live: 0 }
    }

    pub fn insert(&mut self, mobj: Mobj) -> MobjId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let generation = match self.slots[index] {
                Slot::Vacant(generation) => generation,
                Slot::Occupied(generation, _) => generation.wrapping_add(1),
            };
            self.slots[index] = Slot::Occupied(generation, mobj);
            return MobjId::new(index, generation);
        }
        self.slots.push(Slot::Occupied(0, mobj));
        return MobjId::new(self.slots.len() - 1, 0);
    }

    pub fn remove(&mut self, id: MobjId) -> Option<Mobj> {
        let index = id.index();
        let generation = match self.slots.get(index) {
            Some(&Slot::Occupied(generation, _)) if generation == id.generation => generation,
            _ => { return None; }
        };
        let old = ::std::mem::replace(&mut self.slots[index], Slot::Vacant(generation.wrapping_add(1)));
        self.free.push(index);
        self.live -= 1;
        match old {
            Slot::Occupied(_, mobj) => Some(mobj),
            Slot::Vacant(_) => None,
        }
    }

    pub fn get(&self, id: MobjId) -> Option<&Mobj> {
        match self.slots.get(id.index()) {
            Some(&Slot::Occupied(generation, ref mobj)) if generation == id.generation => Some(mobj),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: MobjId) -> Option<&mut Mobj> {
        match self.slots.get_mut(id.index()) {
            Some(&mut Slot::Occupied(generation, ref mut mobj)) if generation == id.generation => Some(mobj),
            _ => None,
        }
    }

    pub fn contains(&self, id: MobjId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item=(MobjId, &Mobj)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match *slot {
            Slot::Occupied(generation, ref mobj) => Some((MobjId::new(i, generation), mobj)),
            Slot::Vacant(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use info::{MobjType, SpriteNum, StateNum};

    fn dummy() -> Mobj {
        Mobj {
            x: 0, y: 0, z: 0, momx: 0, momy: 0, momz: 0, angle: Angle(0),
            floorz: 0, ceilingz: 0, radius: 0, height: 0, subsector: 0.into(),
            kind: MobjType::Barrel, sprite: SpriteNum::BAR1, frame: 0, state: StateNum::NULL, tics: -1,
            flags: MobjFlags::empty(), flags2: MobjFlags2::empty(), flags3: MobjFlags3::empty(),
            eflags: ExtraFlags::empty(),
            health: 20, reactiontime: 0, threshold: 0, movecount: 0,
            target: None, tracer: None, lastenemy: None, player: None,
            dropped_ammo_count: 0, special1: 0, special2: 0,
        }
    }

    #[test]
    fn stale_handles_stop_resolving() {
        let mut arena = MobjArena::new();
        let a = arena.insert(dummy());
        assert!(arena.contains(a));
        assert!(arena.remove(a).is_some());
        assert!(!arena.contains(a));
        assert!(arena.remove(a).is_none());

        // The slot gets reused, but the old handle still doesn't see the new occupant
        let b = arena.insert(dummy());
        assert_eq!(a.index(), b.index());
        assert!(arena.get(a).is_none());
        assert!(arena.get(b).is_some());
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn friendship() {
        let mut a = dummy();
        let mut b = dummy();
        assert!(same_friend(&a, &b));
        assert!(!both_friend(&a, &b));
        a.flags |= MobjFlags::FRIEND;
        assert!(!same_friend(&a, &b));
        b.flags |= MobjFlags::FRIEND;
        assert!(both_friend(&a, &b));
    }
}
