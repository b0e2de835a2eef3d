//! Static thing definitions: what each kind of map object looks like, how tough it is, and which
//! animation states it moves through.  The tables live on the world and can be rewritten by mod
//! data at any time, so nothing outside this module should hold on to a `MobjInfo` or `State`.

use fixed::{Fixed, FRACUNIT};
use mobj::{MobjFlags, MobjFlags2, MobjFlags3};

/// Sprite names.  Pickups are identified by these, so the variants double as item identities.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpriteNum {
    TNT1,
    PLAY, POSS, SPOS, VILE, CPOS, TROO, SARG, HEAD, BOSS, BOS2, FATT, SKEL, SKUL, SPID, BSPI,
    CYBR, PAIN, SSWV, BAR1, BEXP, PUFF, BLUD, POL5, MISL, PLSS, BFS1,

    // Doom pickups
    CLIP, SHOT, MGUN, SGN2, LAUN, PLAS, BFUG, CSAW,
    ARM1, ARM2, BON1, BON2, SOUL, MEGA,
    BKEY, YKEY, RKEY, BSKU, YSKU, RSKU,
    STIM, MEDI, PINV, PSTR, PINS, SUIT, PMAP, PVIS,
    AMMO, ROCK, BROK, CELL, CELP, SHEL, SBOX, BPAK,

    // Heretic
    CHKN, PPOD, MNTR, FX07, FX01, FX02, LICH, SRCR, SOR2, WZRD, FX18, FX04, FX09, FX00, FX22,
    ACLO,
    WBOW, WBLS, WSKL, WPHX, WMCE, WGNT,
    PTN1, PTN2, SOAR, INVU, PWBK, INVS, EGGC, SPHL, TRCH, FBMB, ATLP,
    AMG1, AMG2, AMM1, AMM2, AMC1, AMC2, AMB1, AMB2, AMS1, AMS2, AMP1, AMP2,
    BAGH, SHLD, SHD2, SPMP, AKYY, BKYY, CKYY,

    // Weapon overlays
    PUNG, PISG, SHTG, CHGG, MISG, PLSG, BFGG, SAWG, SHT2,
    STFF, GWND, CRBW, BLSR, HROD, PHNX, MACE, GAUN, BEAK,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MobjType {
    Player,
    Possessed,
    ShotGuy,
    Vile,
    ChainGuy,
    Troop,
    Sergeant,
    Shadows,
    Head,
    Bruiser,
    Knight,
    Fatso,
    Undead,
    Skull,
    Spider,
    Baby,
    Cyborg,
    Pain,
    WolfSS,
    Barrel,
    Puff,
    Blood,
    Rocket,
    Plasma,
    BfgShot,

    Clip,
    Shotgun,
    Chaingun,
    SuperShotgun,
    RocketLauncher,
    PlasmaGun,
    Bfg9000,
    Chainsaw,
    GreenArmor,
    BlueArmor,
    HealthBonus,
    ArmorBonus,
    Soulsphere,
    Megasphere,
    BlueCard,
    YellowCard,
    RedCard,
    BlueSkull,
    YellowSkull,
    RedSkull,
    Stimpack,
    Medikit,
    Invulnerability,
    Berserk,
    Invisibility,
    RadSuit,
    AllMap,
    Infrared,
    ClipBox,
    RocketAmmo,
    RocketBox,
    Cell,
    CellPack,
    Shells,
    ShellBox,
    Backpack,

    ChicPlayer,
    Chicken,
    Pod,
    Minotaur,
    Whirlwind,
    EggFx,
    MaceFx4,
    HHead,
    Sorcerer1,
    Sorcerer2,
    Wizard,
    Ripper,
    BlasterFx1,
    PhoenixFx1,
    PhoenixFx2,
    HornRodFx2,
    RainPlr1,
    RainPlr2,
    RainPlr3,
    RainPlr4,

    WCrossbow,
    WBlaster,
    WSkullRod,
    WPhoenixRod,
    WMace,
    WGauntlets,
    ArtiHealth,
    ArtiFly,
    ArtiInvulnerability,
    ArtiTomeOfPower,
    ArtiInvisibility,
    ArtiEgg,
    ArtiSuperHealth,
    ArtiTorch,
    ArtiFireBomb,
    ArtiTeleport,
    AmmoGoldWandWimpy,
    AmmoGoldWandHefty,
    AmmoMaceWimpy,
    AmmoMaceHefty,
    AmmoCrossbowWimpy,
    AmmoCrossbowHefty,
    AmmoBlasterWimpy,
    AmmoBlasterHefty,
    AmmoSkullRodWimpy,
    AmmoSkullRodHefty,
    AmmoPhoenixRodWimpy,
    AmmoPhoenixRodHefty,
    BagOfHolding,
    SilverShield,
    EnchantedShield,
    HealingPotion,
    SuperMap,
    KeyGreen,
    KeyBlue,
    KeyYellow,
}

use self::MobjType::*;

pub const ALL_MOBJ_TYPES: &'static [MobjType] = &[
    Player, Possessed, ShotGuy, Vile, ChainGuy, Troop, Sergeant, Shadows, Head, Bruiser, Knight,
    Fatso, Undead, Skull, Spider, Baby, Cyborg, Pain, WolfSS, Barrel, Puff, Blood, Rocket, Plasma,
    BfgShot,
    Clip, Shotgun, Chaingun, SuperShotgun, RocketLauncher, PlasmaGun, Bfg9000, Chainsaw, GreenArmor,
    BlueArmor, HealthBonus, ArmorBonus, Soulsphere, Megasphere, BlueCard, YellowCard, RedCard,
    BlueSkull, YellowSkull, RedSkull, Stimpack, Medikit, Invulnerability, Berserk, Invisibility,
    RadSuit, AllMap, Infrared, ClipBox, RocketAmmo, RocketBox, Cell, CellPack, Shells, ShellBox,
    Backpack,
    ChicPlayer, Chicken, Pod, Minotaur, Whirlwind, EggFx, MaceFx4, HHead, Sorcerer1, Sorcerer2,
    Wizard, Ripper, BlasterFx1, PhoenixFx1, PhoenixFx2, HornRodFx2, RainPlr1, RainPlr2, RainPlr3,
    RainPlr4,
    WCrossbow, WBlaster, WSkullRod, WPhoenixRod, WMace, WGauntlets, ArtiHealth, ArtiFly,
    ArtiInvulnerability, ArtiTomeOfPower, ArtiInvisibility, ArtiEgg, ArtiSuperHealth, ArtiTorch,
    ArtiFireBomb, ArtiTeleport, AmmoGoldWandWimpy, AmmoGoldWandHefty, AmmoMaceWimpy, AmmoMaceHefty,
    AmmoCrossbowWimpy, AmmoCrossbowHefty, AmmoBlasterWimpy, AmmoBlasterHefty, AmmoSkullRodWimpy,
    AmmoSkullRodHefty, AmmoPhoenixRodWimpy, AmmoPhoenixRodHefty, BagOfHolding, SilverShield,
    EnchantedShield, HealingPotion, SuperMap, KeyGreen, KeyBlue, KeyYellow,
];

/// Which game's editor numbers a thing belongs to; Doom and Heretic reuse the same numbers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Family {
    Doom,
    Heretic,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateNum(pub u16);

impl StateNum {
    /// Entering the null state removes the object.
    pub const NULL: StateNum = StateNum(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct State {
    pub sprite: SpriteNum,
    pub frame: u32,
    /// -1 means forever
    pub tics: i32,
    pub next: StateNum,
}

/// Monsters in the same nonzero group never retaliate against each other.
pub const INFIGHT_DEFAULT: u8 = 0;

#[derive(Clone, Debug, PartialEq)]
pub struct MobjInfo {
    pub doomednum: i32,
    pub family: Family,
    pub spawnstate: StateNum,
    pub seestate: StateNum,
    pub painstate: StateNum,
    pub deathstate: StateNum,
    pub xdeathstate: StateNum,
    pub spawnhealth: i32,
    pub reactiontime: i32,
    pub painchance: i32,
    pub radius: Fixed,
    pub height: Fixed,
    pub mass: i32,
    pub damage: i32,
    pub flags: MobjFlags,
    pub flags2: MobjFlags2,
    pub flags3: MobjFlags3,
    pub infight_group: u8,
    /// What a dying one of these leaves behind
    pub dropitem: Option<MobjType>,
}

enum Shape {
    Monster { death: u32, xdeath: u32 },
    Pickup,
    Missile,
    Effect(u32, i32),
}

struct Template {
    family: Family,
    doomednum: i32,
    sprite: SpriteNum,
    shape: Shape,
    health: i32,
    radius: i32,
    height: i32,
    mass: i32,
    painchance: i32,
    damage: i32,
    flags: MobjFlags,
    flags2: MobjFlags2,
    flags3: MobjFlags3,
    dropitem: Option<MobjType>,
}

impl Template {
    fn flags2(mut self, flags2: MobjFlags2) -> Template {
        self.flags2 |= flags2;
        self
    }

    fn flags3(mut self, flags3: MobjFlags3) -> Template {
        self.flags3 |= flags3;
        self
    }

    fn more(mut self, flags: MobjFlags) -> Template {
        self.flags |= flags;
        self
    }

    fn drops(mut self, item: MobjType) -> Template {
        self.dropitem = Some(item);
        self
    }

    fn heretic(mut self) -> Template {
        self.family = Family::Heretic;
        self
    }
}

fn monster(doomednum: i32, sprite: SpriteNum, health: i32, radius: i32, height: i32, mass: i32, painchance: i32) -> Template {
    Template {
        family: Family::Doom,
        doomednum,
        sprite,
        shape: Shape::Monster{ death: 5, xdeath: 9 },
        health,
        radius,
        height,
        mass,
        painchance,
        damage: 0,
        flags: MobjFlags::SOLID | MobjFlags::SHOOTABLE | MobjFlags::COUNTKILL,
        flags2: MobjFlags2::empty(),
        flags3: MobjFlags3::empty(),
        dropitem: None,
    }
}

fn pickup(doomednum: i32, sprite: SpriteNum) -> Template {
    Template {
        family: Family::Doom,
        doomednum,
        sprite,
        shape: Shape::Pickup,
        health: 1000,
        radius: 20,
        height: 16,
        mass: 100,
        painchance: 0,
        damage: 0,
        flags: MobjFlags::SPECIAL,
        flags2: MobjFlags2::empty(),
        flags3: MobjFlags3::empty(),
        dropitem: None,
    }
}

fn missile(sprite: SpriteNum, radius: i32, height: i32, damage: i32) -> Template {
    Template {
        family: Family::Doom,
        doomednum: -1,
        sprite,
        shape: Shape::Missile,
        health: 1000,
        radius,
        height,
        mass: 100,
        painchance: 0,
        damage,
        flags: MobjFlags::NOBLOCKMAP | MobjFlags::MISSILE | MobjFlags::DROPOFF | MobjFlags::NOGRAVITY,
        flags2: MobjFlags2::empty(),
        flags3: MobjFlags3::empty(),
        dropitem: None,
    }
}

fn effect(sprite: SpriteNum, frames: u32, tics: i32) -> Template {
    Template {
        family: Family::Doom,
        doomednum: -1,
        sprite,
        shape: Shape::Effect(frames, tics),
        health: 1000,
        radius: 20,
        height: 16,
        mass: 100,
        painchance: 0,
        damage: 0,
        flags: MobjFlags::NOBLOCKMAP | MobjFlags::NOGRAVITY,
        flags2: MobjFlags2::empty(),
        flags3: MobjFlags3::empty(),
        dropitem: None,
    }
}

fn template(kind: MobjType) -> Template {
    use self::SpriteNum::*;
    let player_flags = MobjFlags::SOLID | MobjFlags::SHOOTABLE | MobjFlags::DROPOFF | MobjFlags::PICKUP | MobjFlags::NOTDMATCH;
    let floater = MobjFlags::FLOAT | MobjFlags::NOGRAVITY;
    let count = MobjFlags::COUNTITEM;
    let artifact = MobjFlags::SPECIAL | MobjFlags::COUNTITEM;
    match kind {
        Player => {
            let mut t = monster(-1, PLAY, 100, 16, 56, 100, 255);
            t.flags = player_flags;
            t.shape = Shape::Monster{ death: 7, xdeath: 9 };
            t
        }
        Possessed => monster(3004, POSS, 20, 20, 56, 100, 200).drops(Clip),
        ShotGuy => monster(9, SPOS, 30, 20, 56, 100, 170).drops(Shotgun),
        Vile => monster(64, VILE, 700, 20, 56, 500, 10).flags3(MobjFlags3::DMGIGNORED | MobjFlags3::NOTHRESHOLD),
        ChainGuy => monster(65, CPOS, 70, 20, 56, 100, 170).drops(Chaingun),
        Troop => monster(3001, TROO, 60, 20, 56, 100, 200),
        Sergeant => monster(3002, SARG, 150, 30, 56, 400, 180),
        Shadows => monster(58, SARG, 150, 30, 56, 400, 180).more(MobjFlags::SHADOW),
        Head => monster(3005, HEAD, 400, 31, 56, 400, 128).more(floater),
        Bruiser => monster(3003, BOSS, 1000, 24, 64, 1000, 50),
        Knight => monster(69, BOS2, 500, 24, 64, 1000, 50),
        Fatso => monster(67, FATT, 600, 48, 64, 1000, 80),
        Undead => monster(66, SKEL, 300, 20, 56, 500, 100),
        Skull => {
            let mut t = monster(3006, SKUL, 100, 16, 56, 50, 256);
            t.flags = MobjFlags::SOLID | MobjFlags::SHOOTABLE | floater;
            t
        }
        Spider => monster(7, SPID, 3000, 128, 100, 1000, 40),
        Baby => monster(68, BSPI, 500, 64, 64, 600, 128),
        Cyborg => monster(16, CYBR, 4000, 40, 110, 1000, 20),
        Pain => monster(71, PAIN, 400, 31, 56, 400, 128).more(floater),
        WolfSS => monster(84, SSWV, 50, 20, 56, 100, 170).drops(Clip),
        Barrel => {
            let mut t = monster(2035, BAR1, 20, 10, 42, 100, 0);
            t.flags = MobjFlags::SOLID | MobjFlags::SHOOTABLE | MobjFlags::NOBLOOD;
            t.shape = Shape::Monster{ death: 5, xdeath: 0 };
            t
        }
        Puff => effect(PUFF, 4, 4),
        Blood => {
            let mut t = effect(BLUD, 3, 8);
            t.flags = MobjFlags::NOBLOCKMAP;
            t
        }
        Rocket => missile(MISL, 11, 8, 20),
        Plasma => missile(PLSS, 13, 8, 5),
        BfgShot => missile(BFS1, 13, 8, 100),

        Clip => pickup(2007, CLIP),
        Shotgun => pickup(2001, SHOT),
        Chaingun => pickup(2002, MGUN),
        SuperShotgun => pickup(82, SGN2),
        RocketLauncher => pickup(2003, LAUN),
        PlasmaGun => pickup(2004, PLAS),
        Bfg9000 => pickup(2006, BFUG),
        Chainsaw => pickup(2005, CSAW),
        GreenArmor => pickup(2018, ARM1),
        BlueArmor => pickup(2019, ARM2),
        HealthBonus => pickup(2014, BON1).more(count),
        ArmorBonus => pickup(2015, BON2).more(count),
        Soulsphere => pickup(2013, SOUL).more(count),
        Megasphere => pickup(83, MEGA).more(count),
        BlueCard => pickup(5, BKEY).more(MobjFlags::NOTDMATCH),
        YellowCard => pickup(6, YKEY).more(MobjFlags::NOTDMATCH),
        RedCard => pickup(13, RKEY).more(MobjFlags::NOTDMATCH),
        BlueSkull => pickup(40, BSKU).more(MobjFlags::NOTDMATCH),
        YellowSkull => pickup(39, YSKU).more(MobjFlags::NOTDMATCH),
        RedSkull => pickup(38, RSKU).more(MobjFlags::NOTDMATCH),
        Stimpack => pickup(2011, STIM),
        Medikit => pickup(2012, MEDI),
        Invulnerability => pickup(2022, PINV).more(count),
        Berserk => pickup(2023, PSTR).more(count),
        Invisibility => pickup(2024, PINS).more(count),
        RadSuit => pickup(2025, SUIT),
        AllMap => pickup(2026, PMAP).more(count),
        Infrared => pickup(2045, PVIS).more(count),
        ClipBox => pickup(2048, AMMO),
        RocketAmmo => pickup(2010, ROCK),
        RocketBox => pickup(2046, BROK),
        Cell => pickup(2047, CELL),
        CellPack => pickup(17, CELP),
        Shells => pickup(2008, SHEL),
        ShellBox => pickup(2049, SBOX),
        Backpack => pickup(8, BPAK),

        ChicPlayer => {
            let mut t = monster(-1, CHKN, 100, 16, 24, 100, 255).heretic();
            t.flags = player_flags;
            t
        }
        Chicken => monster(-1, CHKN, 10, 9, 22, 40, 200).heretic(),
        Pod => {
            let mut t = monster(2035, PPOD, 45, 16, 54, 100, 255).heretic();
            t.flags = MobjFlags::SOLID | MobjFlags::SHOOTABLE | MobjFlags::NOBLOOD | MobjFlags::DROPOFF;
            t.shape = Shape::Monster{ death: 5, xdeath: 0 };
            t
        }
        Minotaur => monster(9, MNTR, 3000, 28, 100, 800, 25).heretic().flags2(MobjFlags2::BOSS),
        Whirlwind => missile(FX07, 16, 74, 1).heretic(),
        EggFx => missile(FX01, 8, 8, 1).heretic(),
        MaceFx4 => missile(FX02, 8, 6, 18).heretic(),
        HHead => monster(6, LICH, 700, 40, 72, 325, 32).heretic(),
        Sorcerer1 => monster(7, SRCR, 2000, 28, 100, 800, 56).heretic().flags2(MobjFlags2::BOSS),
        Sorcerer2 => monster(-1, SOR2, 3500, 16, 70, 300, 32).heretic().flags2(MobjFlags2::BOSS),
        Wizard => monster(15, WZRD, 180, 16, 68, 100, 64).heretic().more(floater),
        Ripper => missile(FX18, 8, 6, 1).heretic().flags2(MobjFlags2::RIP),
        BlasterFx1 => missile(ACLO, 12, 8, 2).heretic(),
        PhoenixFx1 => missile(FX04, 11, 8, 20).heretic().flags2(MobjFlags2::FIREDAMAGE),
        PhoenixFx2 => missile(FX09, 6, 8, 2).heretic().flags2(MobjFlags2::FIREDAMAGE),
        HornRodFx2 => missile(FX00, 12, 8, 10).heretic(),
        RainPlr1 | RainPlr2 | RainPlr3 | RainPlr4 => missile(FX22, 5, 12, 5).heretic(),

        WCrossbow => pickup(2001, WBOW).heretic(),
        WBlaster => pickup(53, WBLS).heretic(),
        WSkullRod => pickup(2004, WSKL).heretic(),
        WPhoenixRod => pickup(2003, WPHX).heretic(),
        WMace => pickup(2002, WMCE).heretic(),
        WGauntlets => pickup(2005, WGNT).heretic(),
        ArtiHealth => pickup(82, PTN2).heretic().more(artifact).flags2(MobjFlags2::FLOATBOB),
        ArtiFly => pickup(83, SOAR).heretic().more(artifact).flags2(MobjFlags2::FLOATBOB),
        ArtiInvulnerability => pickup(84, INVU).heretic().more(artifact).flags2(MobjFlags2::FLOATBOB),
        ArtiTomeOfPower => pickup(86, PWBK).heretic().more(artifact).flags2(MobjFlags2::FLOATBOB),
        ArtiInvisibility => pickup(75, INVS).heretic().more(artifact).flags2(MobjFlags2::FLOATBOB),
        ArtiEgg => pickup(30, EGGC).heretic().more(artifact).flags2(MobjFlags2::FLOATBOB),
        ArtiSuperHealth => pickup(32, SPHL).heretic().more(artifact).flags2(MobjFlags2::FLOATBOB),
        ArtiTorch => pickup(33, TRCH).heretic().more(artifact).flags2(MobjFlags2::FLOATBOB),
        ArtiFireBomb => pickup(34, FBMB).heretic().more(artifact).flags2(MobjFlags2::FLOATBOB),
        ArtiTeleport => pickup(36, ATLP).heretic().more(artifact).flags2(MobjFlags2::FLOATBOB),
        // Heretic ammo pickups carry their amount as spawn health
        AmmoGoldWandWimpy => heretic_ammo(10, AMG1, 10),
        AmmoGoldWandHefty => heretic_ammo(12, AMG2, 50),
        AmmoMaceWimpy => heretic_ammo(13, AMM1, 20),
        AmmoMaceHefty => heretic_ammo(16, AMM2, 100),
        AmmoCrossbowWimpy => heretic_ammo(18, AMC1, 5),
        AmmoCrossbowHefty => heretic_ammo(19, AMC2, 20),
        AmmoBlasterWimpy => heretic_ammo(54, AMB1, 10),
        AmmoBlasterHefty => heretic_ammo(55, AMB2, 25),
        AmmoSkullRodWimpy => heretic_ammo(20, AMS1, 20),
        AmmoSkullRodHefty => heretic_ammo(21, AMS2, 100),
        AmmoPhoenixRodWimpy => heretic_ammo(22, AMP1, 1),
        AmmoPhoenixRodHefty => heretic_ammo(23, AMP2, 10),
        BagOfHolding => pickup(8, BAGH).heretic().more(count),
        SilverShield => pickup(85, SHLD).heretic(),
        EnchantedShield => pickup(31, SHD2).heretic(),
        HealingPotion => pickup(81, PTN1).heretic(),
        SuperMap => pickup(35, SPMP).heretic().more(count),
        KeyGreen => pickup(73, AKYY).heretic().more(MobjFlags::NOTDMATCH),
        KeyBlue => pickup(79, BKYY).heretic().more(MobjFlags::NOTDMATCH),
        KeyYellow => pickup(80, CKYY).heretic().more(MobjFlags::NOTDMATCH),
    }
}

fn heretic_ammo(doomednum: i32, sprite: SpriteNum, amount: i32) -> Template {
    let mut t = pickup(doomednum, sprite).heretic();
    t.health = amount;
    t
}

enum SeqEnd {
    Loop,
    Hold,
    Vanish,
    Goto(StateNum),
}

struct StateBuilder {
    states: Vec<State>,
}

impl StateBuilder {
    /// A run of consecutive frames, each `tics` long.
    fn sequence(&mut self, sprite: SpriteNum, first_frame: u32, frames: u32, tics: i32, end: SeqEnd) -> StateNum {
        let first = self.states.len() as u16;
        for f in 0..frames {
            let last = f + 1 == frames;
            let (tics, next) =
                if !last {
                    (tics, StateNum(first + f as u16 + 1))
                }
                else {
                    match end {
                        SeqEnd::Loop => (tics, StateNum(first)),
                        SeqEnd::Hold => (-1, StateNum(first + f as u16)),
                        SeqEnd::Vanish => (tics, StateNum::NULL),
                        SeqEnd::Goto(state) => (tics, state),
                    }
                };
            self.states.push(State{ sprite, frame: first_frame + f, tics, next });
        }
        StateNum(first)
    }
}

/// The live thing and state tables.
#[derive(Clone, Debug)]
pub struct InfoTables {
    states: Vec<State>,
    mobjinfo: Vec<MobjInfo>,
    /// What a corpse turns into when it's blown apart
    pub gibs_state: StateNum,
    /// Artifact picked up in deathmatch, waiting to come back
    pub dormant_artifact_state: StateNum,
    /// Artifact picked up for good
    pub dead_artifact_state: StateNum,
    /// Other picked-up specials that respawn
    pub hide_special_state: StateNum,
}

impl InfoTables {
    /// Stock definitions for every known thing.
    pub fn classic() -> InfoTables {
        let mut builder = StateBuilder{ states: Vec::new() };
        builder.states.push(State{ sprite: SpriteNum::TNT1, frame: 0, tics: -1, next: StateNum::NULL });

        let gibs_state = builder.sequence(SpriteNum::POL5, 0, 1, -1, SeqEnd::Hold);
        let dormant_artifact_state = builder.sequence(SpriteNum::ACLO, 4, 1, -1, SeqEnd::Hold);
        let dead_artifact_state = builder.sequence(SpriteNum::ACLO, 0, 4, 3, SeqEnd::Vanish);
        let hide_special_state = builder.sequence(SpriteNum::ACLO, 4, 1, -1, SeqEnd::Hold);

        let mut mobjinfo = Vec::with_capacity(ALL_MOBJ_TYPES.len());
        for &kind in ALL_MOBJ_TYPES.iter() {
            let t = template(kind);
            let mut info = MobjInfo {
                doomednum: t.doomednum,
                family: t.family,
                spawnstate: StateNum::NULL,
                seestate: StateNum::NULL,
                painstate: StateNum::NULL,
                deathstate: StateNum::NULL,
                xdeathstate: StateNum::NULL,
                spawnhealth: t.health,
                reactiontime: 8,
                painchance: t.painchance,
                radius: t.radius * FRACUNIT,
                height: t.height * FRACUNIT,
                mass: t.mass,
                damage: t.damage,
                flags: t.flags,
                flags2: t.flags2,
                flags3: t.flags3,
                infight_group: INFIGHT_DEFAULT,
                dropitem: t.dropitem,
            };
            match t.shape {
                Shape::Monster{ death, xdeath } => {
                    info.spawnstate = builder.sequence(t.sprite, 0, 2, 10, SeqEnd::Loop);
                    info.seestate = builder.sequence(t.sprite, 0, 4, 4, SeqEnd::Loop);
                    info.painstate = builder.sequence(t.sprite, 6, 1, 3, SeqEnd::Goto(info.seestate));
                    info.deathstate = builder.sequence(t.sprite, 7, death, 5, SeqEnd::Hold);
                    if xdeath > 0 {
                        info.xdeathstate = builder.sequence(t.sprite, 7 + death, xdeath, 5, SeqEnd::Hold);
                    }
                }
                Shape::Pickup => {
                    info.spawnstate = builder.sequence(t.sprite, 0, 1, -1, SeqEnd::Hold);
                }
                Shape::Missile => {
                    info.spawnstate = builder.sequence(t.sprite, 0, 2, 4, SeqEnd::Loop);
                    info.deathstate = builder.sequence(t.sprite, 2, 3, 6, SeqEnd::Vanish);
                }
                Shape::Effect(frames, tics) => {
                    info.spawnstate = builder.sequence(t.sprite, 0, frames, tics, SeqEnd::Vanish);
                }
            }
            mobjinfo.push(info);
        }

        InfoTables {
            states: builder.states,
            mobjinfo,
            gibs_state,
            dormant_artifact_state,
            dead_artifact_state,
            hide_special_state,
        }
    }

    pub fn info(&self, kind: MobjType) -> &MobjInfo {
        &self.mobjinfo[kind as usize]
    }

    pub fn info_mut(&mut self, kind: MobjType) -> &mut MobjInfo {
        &mut self.mobjinfo[kind as usize]
    }

    pub fn state(&self, state: StateNum) -> Option<&State> {
        self.states.get(state.index())
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Replace a state, or append one if `state` is one past the end.
    pub fn set_state(&mut self, state: StateNum, def: State) -> bool {
        let index = state.index();
        if index < self.states.len() {
            self.states[index] = def;
            return true;
        }
        if index == self.states.len() {
            self.states.push(def);
            return true;
        }
        return false;
    }

    /// Look up a thing by the number a map uses for it.
    pub fn type_for_doomednum(&self, family: Family, doomednum: i32) -> Option<MobjType> {
        ALL_MOBJ_TYPES.iter()
            .find(|&&kind| {
                let info = self.info(kind);
                info.doomednum == doomednum && info.family == family
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_spawn_state() {
        let tables = InfoTables::classic();
        for &kind in ALL_MOBJ_TYPES.iter() {
            let info = tables.info(kind);
            assert_ne!(info.spawnstate, StateNum::NULL, "{:?}", kind);
            assert!(tables.state(info.spawnstate).is_some());
        }
    }

    #[test]
    fn table_order_matches_enum() {
        for (i, &kind) in ALL_MOBJ_TYPES.iter().enumerate() {
            assert_eq!(kind as usize, i);
        }
    }

    #[test]
    fn death_sequences_end_in_a_held_frame() {
        let tables = InfoTables::classic();
        let mut state = tables.info(MobjType::Possessed).deathstate;
        for _ in 0..20 {
            let def = tables.state(state).unwrap();
            if def.tics == -1 {
                assert_eq!(def.sprite, SpriteNum::POSS);
                return;
            }
            state = def.next;
        }
        panic!("death sequence never settled");
    }

    #[test]
    fn families_disambiguate_editor_numbers() {
        let tables = InfoTables::classic();
        assert_eq!(tables.type_for_doomednum(Family::Doom, 2035), Some(MobjType::Barrel));
        assert_eq!(tables.type_for_doomednum(Family::Heretic, 2035), Some(MobjType::Pod));
        assert_eq!(tables.type_for_doomednum(Family::Doom, 9), Some(MobjType::ShotGuy));
        assert_eq!(tables.type_for_doomednum(Family::Heretic, 9), Some(MobjType::Minotaur));
        assert_eq!(tables.type_for_doomednum(Family::Doom, 12345), None);
    }
}
