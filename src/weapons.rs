//! Weapon and ammo definitions.  Doom and Heretic share the same nine weapon slots and the same
//! ammo slots, just with different names; the Heretic names are aliases below.

use info::{InfoTables, SpriteNum, State, StateNum};

pub const NUMWEAPONS: usize = 9;
pub const NUMAMMO: usize = 6;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WeaponType {
    Fist,
    Pistol,
    Shotgun,
    Chaingun,
    Missile,
    Plasma,
    Bfg,
    Chainsaw,
    SuperShotgun,
}

pub const ALL_WEAPONS: [WeaponType; NUMWEAPONS] = [
    WeaponType::Fist,
    WeaponType::Pistol,
    WeaponType::Shotgun,
    WeaponType::Chaingun,
    WeaponType::Missile,
    WeaponType::Plasma,
    WeaponType::Bfg,
    WeaponType::Chainsaw,
    WeaponType::SuperShotgun,
];

pub const STAFF: WeaponType = WeaponType::Fist;
pub const GOLDWAND: WeaponType = WeaponType::Pistol;
pub const CROSSBOW: WeaponType = WeaponType::Shotgun;
pub const BLASTER: WeaponType = WeaponType::Chaingun;
pub const SKULLROD: WeaponType = WeaponType::Missile;
pub const PHOENIXROD: WeaponType = WeaponType::Plasma;
pub const MACE: WeaponType = WeaponType::Bfg;
pub const GAUNTLETS: WeaponType = WeaponType::Chainsaw;
pub const BEAK: WeaponType = WeaponType::SuperShotgun;

impl WeaponType {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<WeaponType> {
        ALL_WEAPONS.get(index).cloned()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AmmoType {
    Clip,
    Shell,
    Cell,
    Missile,
    PhoenixRod,
    Mace,
    /// Weapons that don't use ammo at all
    NoAmmo,
}

pub const ALL_AMMO: [AmmoType; NUMAMMO] = [
    AmmoType::Clip,
    AmmoType::Shell,
    AmmoType::Cell,
    AmmoType::Missile,
    AmmoType::PhoenixRod,
    AmmoType::Mace,
];

pub const AM_GOLDWAND: AmmoType = AmmoType::Clip;
pub const AM_CROSSBOW: AmmoType = AmmoType::Shell;
pub const AM_BLASTER: AmmoType = AmmoType::Cell;
pub const AM_SKULLROD: AmmoType = AmmoType::Missile;
pub const AM_PHOENIXROD: AmmoType = AmmoType::PhoenixRod;
pub const AM_MACE: AmmoType = AmmoType::Mace;

impl AmmoType {
    /// Slot in the per-player ammo arrays, or None for `NoAmmo`.
    pub fn index(self) -> Option<usize> {
        match self {
            AmmoType::NoAmmo => None,
            other => Some(other as usize),
        }
    }
}

/// Encoding of `Mobj::dropped_ammo_count`: a dropped weapon either came from a weapon with no
/// ammo type, or carries a count, where an empty clip must stay distinct from "no ammo type".
pub const TST_NOAMMO: u16 = 0;
pub const TST_AMMO_0: u16 = 0xFFFF;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DroppedAmmo {
    /// Nothing recorded; a dropped weapon gives the usual single clip
    NoAmmoType,
    Count(u16),
}

impl DroppedAmmo {
    pub fn encode(self) -> u16 {
        match self {
            DroppedAmmo::NoAmmoType => TST_NOAMMO,
            DroppedAmmo::Count(0) => TST_AMMO_0,
            DroppedAmmo::Count(n) => n.min(TST_AMMO_0 - 1),
        }
    }

    pub fn decode(raw: u16) -> DroppedAmmo {
        match raw {
            TST_NOAMMO => DroppedAmmo::NoAmmoType,
            TST_AMMO_0 => DroppedAmmo::Count(0),
            n => DroppedAmmo::Count(n),
        }
    }
}

bitflags! {
    pub struct WeaponFlags: u32 {
        /// Hits don't push the victim
        const NO_THRUST = 0x1;
        const NOISE_ALERT_SILENT = 0x2;
        const NOISE_ALERT_BRUTAL = 0x4;
        const NO_AUTOFIRE = 0x8;
        /// Friendly monsters back off from a player holding this
        const FLEE_MELEE = 0x10;
        /// Picking up ammo for something better switches away from this
        const AUTOSWITCH_FROM = 0x20;
        /// Picking up ammo never switches to this
        const NO_AUTOSWITCH_TO = 0x40;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeaponInfo {
    pub ammo: AmmoType,
    pub ammo_per_shot: i32,
    pub upstate: StateNum,
    pub downstate: StateNum,
    pub readystate: StateNum,
    pub atkstate: StateNum,
    pub flashstate: StateNum,
    pub flags: WeaponFlags,
}

/// Ammo that comes with a weapon picked up off the map, by weapon slot.
pub const WEAPON_AMMO_PICKUP: [i32; NUMWEAPONS] = [0, 20, 8, 20, 2, 40, 40, 0, 8];

/// With the original switching rules, a Heretic player holding the staff or gauntlets switches to
/// this when picking up the given ammo.
pub const HERETIC_AMMO_CHANGE: [WeaponType; NUMAMMO] = [GOLDWAND, CROSSBOW, BLASTER, SKULLROD, PHOENIXROD, MACE];

/// All three weapon tables.  Mod data may rewrite any of these at any time.
#[derive(Clone, Debug)]
pub struct WeaponTables {
    pub doom: Vec<WeaponInfo>,
    pub heretic: Vec<WeaponInfo>,
    /// Heretic with the Tome of Power active
    pub heretic_powered: Vec<WeaponInfo>,
}

struct WeaponDef {
    sprite: SpriteNum,
    ammo: AmmoType,
    ammo_per_shot: i32,
    flags: WeaponFlags,
}

fn def(sprite: SpriteNum, ammo: AmmoType, ammo_per_shot: i32, flags: WeaponFlags) -> WeaponDef {
    WeaponDef{ sprite, ammo, ammo_per_shot, flags }
}

fn build(info: &mut InfoTables, defs: &[WeaponDef]) -> Vec<WeaponInfo> {
    defs.iter().map(|d| {
        let mut push = |frame: u32, tics: i32, next: Option<StateNum>| {
            let state = StateNum(info.num_states() as u16);
            let def = State{ sprite: d.sprite, frame, tics, next: next.unwrap_or(state) };
            info.set_state(state, def);
            state
        };
        let upstate = push(0, 1, None);
        let downstate = push(0, 1, None);
        let readystate = push(0, 1, None);
        let atk3 = push(3, 4, Some(readystate));
        let atk2 = push(2, 4, Some(atk3));
        let atkstate = push(1, 4, Some(atk2));
        let flashstate = push(4, 4, Some(StateNum::NULL));
        WeaponInfo {
            ammo: d.ammo,
            ammo_per_shot: d.ammo_per_shot,
            upstate,
            downstate,
            readystate,
            atkstate,
            flashstate,
            flags: d.flags,
        }
    }).collect()
}

impl WeaponTables {
    /// Stock weapons, with their overlay states appended to `info`.
    pub fn classic(info: &mut InfoTables) -> WeaponTables {
        use self::AmmoType::*;
        let none = WeaponFlags::empty();
        let melee = WeaponFlags::FLEE_MELEE | WeaponFlags::AUTOSWITCH_FROM | WeaponFlags::NO_AUTOSWITCH_TO;
        let saw = WeaponFlags::NO_THRUST | WeaponFlags::FLEE_MELEE | WeaponFlags::NO_AUTOSWITCH_TO;

        let doom = build(info, &[
            def(SpriteNum::PUNG, NoAmmo, 0, melee),
            def(SpriteNum::PISG, Clip, 1, WeaponFlags::AUTOSWITCH_FROM),
            def(SpriteNum::SHTG, Shell, 1, none),
            def(SpriteNum::CHGG, Clip, 1, none),
            def(SpriteNum::MISG, Missile, 1, WeaponFlags::NO_AUTOFIRE),
            def(SpriteNum::PLSG, Cell, 1, none),
            def(SpriteNum::BFGG, Cell, 40, WeaponFlags::NO_AUTOFIRE),
            def(SpriteNum::SAWG, NoAmmo, 0, saw),
            def(SpriteNum::SHT2, Shell, 2, none),
        ]);
        let heretic = build(info, &[
            def(SpriteNum::STFF, NoAmmo, 0, melee),
            def(SpriteNum::GWND, AM_GOLDWAND, 1, WeaponFlags::AUTOSWITCH_FROM),
            def(SpriteNum::CRBW, AM_CROSSBOW, 1, none),
            def(SpriteNum::BLSR, AM_BLASTER, 1, none),
            def(SpriteNum::HROD, AM_SKULLROD, 1, none),
            def(SpriteNum::PHNX, AM_PHOENIXROD, 1, WeaponFlags::NO_AUTOFIRE),
            def(SpriteNum::MACE, AM_MACE, 1, none),
            def(SpriteNum::GAUN, NoAmmo, 0, saw),
            def(SpriteNum::BEAK, NoAmmo, 0, melee),
        ]);
        let heretic_powered = build(info, &[
            def(SpriteNum::STFF, NoAmmo, 0, melee),
            def(SpriteNum::GWND, AM_GOLDWAND, 1, WeaponFlags::AUTOSWITCH_FROM),
            def(SpriteNum::CRBW, AM_CROSSBOW, 1, none),
            def(SpriteNum::BLSR, AM_BLASTER, 5, none),
            def(SpriteNum::HROD, AM_SKULLROD, 5, none),
            def(SpriteNum::PHNX, AM_PHOENIXROD, 1, WeaponFlags::NO_AUTOFIRE),
            def(SpriteNum::MACE, AM_MACE, 5, none),
            def(SpriteNum::GAUN, NoAmmo, 0, saw),
            def(SpriteNum::BEAK, NoAmmo, 0, melee),
        ]);

        WeaponTables{ doom, heretic, heretic_powered }
    }
}
