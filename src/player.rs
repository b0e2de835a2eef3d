//! Per-player state: inventory, powers, counters, and the bits of HUD feedback the resolver sets.

use fixed::{Fixed, FRACUNIT};
use info::StateNum;
use mobj::MobjId;
use tables::Angle;
use weapons::{NUMAMMO, NUMWEAPONS, WeaponType};

pub const MAXPLAYERS: usize = 32;
pub const TICRATE: i32 = 35;

pub const MAXHEALTH: i32 = 100;
pub const MAXCHICKENHEALTH: i32 = 30;

pub const INVULNTICS: i32 = 30 * TICRATE;
pub const INVISTICS: i32 = 60 * TICRATE;
pub const INFRATICS: i32 = 120 * TICRATE;
pub const IRONTICS: i32 = 60 * TICRATE;
pub const WPNLEV2TICS: i32 = 40 * TICRATE;
pub const FLIGHTTICS: i32 = 60 * TICRATE;
pub const CHICKENTICS: i32 = 40 * TICRATE;
/// Powers with more than this many tics left aren't topped up again
pub const BLINKTHRESHOLD: i32 = 4 * 32;

pub const BONUSADD: i32 = 6;
/// How long the HUD flashes the relevant counter after a pickup
pub const PICKUP_FLASH_TICS: i32 = 10;
pub const MAXARTECONT: i32 = 16;

pub const NUMPOWERS: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PowerType {
    Invulnerability,
    Strength,
    Invisibility,
    IronFeet,
    AllMap,
    Infrared,
    WeaponLevel2,
    Flight,
}

impl PowerType {
    pub fn index(self) -> usize {
        self as usize
    }

    /// How long a fresh pickup lasts, or `None` for powers that just get switched on.
    pub fn duration(self) -> Option<i32> {
        match self {
            PowerType::Invulnerability => Some(INVULNTICS),
            PowerType::Invisibility => Some(INVISTICS),
            PowerType::Infrared => Some(INFRATICS),
            PowerType::IronFeet => Some(IRONTICS),
            PowerType::WeaponLevel2 => Some(WPNLEV2TICS),
            PowerType::Flight => Some(FLIGHTTICS),
            PowerType::Strength | PowerType::AllMap => None,
        }
    }
}

bitflags! {
    pub struct KeyCards: u8 {
        const BLUE_CARD = 0x01;
        const YELLOW_CARD = 0x02;
        const RED_CARD = 0x04;
        const BLUE_SKULL = 0x08;
        const YELLOW_SKULL = 0x10;
        const RED_SKULL = 0x20;
    }
}

bitflags! {
    pub struct Cheats: u8 {
        const NOCLIP = 0x1;
        const GODMODE = 0x2;
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Live,
    Dead,
    Reborn,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerClass {
    Fighter,
    Cleric,
    Mage,
    Pig,
}

impl PlayerClass {
    /// Armor every member of the class gets for free.
    pub fn auto_armor_save(self) -> Fixed {
        match self {
            PlayerClass::Fighter => 15 * FRACUNIT,
            PlayerClass::Cleric => 10 * FRACUNIT,
            PlayerClass::Mage => 5 * FRACUNIT,
            PlayerClass::Pig => 0,
        }
    }

    /// How much each armor slot is worth, and how much a hit wears it down.
    pub fn armor_increment(self, slot: usize) -> Fixed {
        let table = match self {
            PlayerClass::Fighter => [25, 20, 15, 5],
            PlayerClass::Cleric => [10, 25, 5, 20],
            PlayerClass::Mage => [5, 15, 10, 25],
            PlayerClass::Pig => [0, 0, 0, 0],
        };
        table.get(slot).map_or(0, |&n| n * FRACUNIT)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Artifact {
    Invulnerability,
    Invisibility,
    Health,
    SuperHealth,
    TomeOfPower,
    Torch,
    FireBomb,
    Egg,
    Fly,
    Teleport,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InventorySlot {
    pub artifact: Artifact,
    pub count: i32,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub mo: Option<MobjId>,
    pub playerstate: PlayerState,
    pub pclass: Option<PlayerClass>,
    pub cheats: Cheats,
    pub team: u8,

    pub health: i32,
    pub armorpoints: i32,
    /// 0 none, 1 green (or silver), 2 blue (or enchanted)
    pub armortype: i32,
    pub hexen_armor: [Fixed; 4],
    pub powers: [i32; NUMPOWERS],
    pub cards: KeyCards,
    pub backpack: bool,
    pub frags: [i32; MAXPLAYERS],

    pub readyweapon: WeaponType,
    pub pendingweapon: Option<WeaponType>,
    pub weaponowned: [bool; NUMWEAPONS],
    /// Weapons already taken off this map while they persist for other players
    pub weapons_taken: [bool; NUMWEAPONS],
    pub ammo: [i32; NUMAMMO],
    pub maxammo: [i32; NUMAMMO],
    pub favoriteweapon: [u8; NUMWEAPONS],
    pub originalweaponswitch: bool,

    pub inventory: Vec<InventorySlot>,
    pub inv_ptr: usize,

    pub message: Option<String>,
    /// Priority of the message shown this tic; lower-priority ones are dropped
    pub msglevel: u8,

    pub damagecount: i32,
    pub bonuscount: i32,
    pub attacker: Option<MobjId>,
    pub killcount: i32,
    pub itemcount: i32,
    pub secretcount: i32,

    pub health_pickup: i32,
    pub armor_pickup: i32,
    pub ammo_pickup: i32,
    pub weapon_pickup: i32,
    pub key_pickup: i32,

    pub chicken_tics: i32,
    pub flyheight: Fixed,
    pub autoaim: bool,
    /// Free-look pitch, used for aiming when autoaim is off
    pub aiming: Angle,
    pub refire: i32,
    /// Special of the sector the player is standing in
    pub specialsector: i16,
    /// Current weapon overlay state, advanced by the caller's tic loop
    pub psprite: Option<StateNum>,
}

impl Player {
    /// A fresh player, as at the start of a game.
    pub fn new(maxammo: [i32; NUMAMMO], initial_bullets: i32, favorites: [u8; NUMWEAPONS]) -> Player {
        let mut ammo = [0; NUMAMMO];
        ammo[0] = initial_bullets;
        let mut weaponowned = [false; NUMWEAPONS];
        weaponowned[WeaponType::Fist.index()] = true;
        weaponowned[WeaponType::Pistol.index()] = true;

        Player {
            mo: None,
            playerstate: PlayerState::Live,
            pclass: None,
            cheats: Cheats::empty(),
            team: 0,

            health: MAXHEALTH,
            armorpoints: 0,
            armortype: 0,
            hexen_armor: [0; 4],
            powers: [0; NUMPOWERS],
            cards: KeyCards::empty(),
            backpack: false,
            frags: [0; MAXPLAYERS],

            readyweapon: WeaponType::Pistol,
            pendingweapon: None,
            weaponowned,
            weapons_taken: [false; NUMWEAPONS],
            ammo,
            maxammo,
            favoriteweapon: favorites,
            originalweaponswitch: true,

            inventory: Vec::new(),
            inv_ptr: 0,

            message: None,
            msglevel: 0,

            damagecount: 0,
            bonuscount: 0,
            attacker: None,
            killcount: 0,
            itemcount: 0,
            secretcount: 0,

            health_pickup: 0,
            armor_pickup: 0,
            ammo_pickup: 0,
            weapon_pickup: 0,
            key_pickup: 0,

            chicken_tics: 0,
            flyheight: 0,
            autoaim: true,
            aiming: Angle(0),
            refire: 0,
            specialsector: 0,
            psprite: None,
        }
    }

    pub fn power(&self, power: PowerType) -> i32 {
        self.powers[power.index()]
    }

    pub fn set_power(&mut self, power: PowerType, tics: i32) {
        self.powers[power.index()] = tics;
    }

    pub fn owns(&self, weapon: WeaponType) -> bool {
        self.weaponowned[weapon.index()]
    }

    pub fn is_god(&self) -> bool {
        self.cheats.contains(Cheats::GODMODE)
    }

    pub fn is_chicken(&self) -> bool {
        self.chicken_tics > 0
    }

    /// Start of a new tic: forget what was said last tic so anything can be shown again.
    pub fn begin_tic(&mut self) {
        self.msglevel = 0;
    }

    pub fn artifact_count(&self, artifact: Artifact) -> i32 {
        self.inventory.iter()
            .find(|slot| slot.artifact == artifact)
            .map_or(0, |slot| slot.count)
    }

    /// Use up `count` of an artifact, dropping the slot when it runs out.
    pub fn take_artifact(&mut self, artifact: Artifact, count: i32) -> bool {
        let index = match self.inventory.iter().position(|slot| slot.artifact == artifact) {
            Some(index) => index,
            None => { return false; }
        };
        if self.inventory[index].count < count {
            return false;
        }
        self.inventory[index].count -= count;
        if self.inventory[index].count == 0 {
            self.inventory.remove(index);
            if self.inv_ptr > index || self.inv_ptr >= self.inventory.len() {
                self.inv_ptr = self.inv_ptr.saturating_sub(1);
            }
        }
        return true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new([200, 50, 300, 50, 0, 0], 50, [1, 4, 5, 6, 8, 7, 2, 3, 5])
    }

    #[test]
    fn starts_with_fist_and_pistol() {
        let p = player();
        assert!(p.owns(WeaponType::Fist));
        assert!(p.owns(WeaponType::Pistol));
        assert!(!p.owns(WeaponType::Shotgun));
        assert_eq!(p.ammo[0], 50);
        assert_eq!(p.health, MAXHEALTH);
    }

    #[test]
    fn taking_the_last_artifact_drops_the_slot() {
        let mut p = player();
        p.inventory.push(InventorySlot{ artifact: Artifact::Health, count: 2 });
        p.inventory.push(InventorySlot{ artifact: Artifact::Teleport, count: 1 });
        p.inv_ptr = 1;
        assert!(p.take_artifact(Artifact::Teleport, 1));
        assert_eq!(p.inventory.len(), 1);
        assert_eq!(p.inv_ptr, 0);
        assert!(!p.take_artifact(Artifact::Health, 3));
        assert!(p.take_artifact(Artifact::Health, 2));
        assert!(p.inventory.is_empty());
        assert_eq!(p.artifact_count(Artifact::Health), 0);
    }

    #[test]
    fn hexen_armor_tables() {
        assert_eq!(PlayerClass::Fighter.auto_armor_save(), 15 * FRACUNIT);
        assert_eq!(PlayerClass::Mage.armor_increment(3), 25 * FRACUNIT);
        assert_eq!(PlayerClass::Cleric.armor_increment(9), 0);
    }
}
