//! Game configuration and the per-ruleset behavior tables.
//!
//! Every historical variant of the game is one `Ruleset`; everything that differs between them is
//! either a constant in `RulesetPolicy` or a question asked of the ruleset directly, so the
//! resolver never has to guess which of two conflicting behaviors wins.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ron;

use errors::{ErrorKind, Result, ResultExt};
use fixed::{Fixed, FRACUNIT};
use intercept::DEFAULT_MAX_INTERCEPTS;
use weapons::{NUMAMMO, NUMWEAPONS};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ruleset {
    Vanilla,
    Boom,
    Mbf,
    Mbf21,
    Heretic,
    Hexen,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ArmorAbsorb {
    /// Green saves a third, blue saves half
    Doom,
    /// Silver saves half, enchanted saves three quarters
    Heretic,
    /// Per-slot armor points, scaled by class
    Hexen,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkillAmmoBonus {
    Double,
    Half,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RulesetPolicy {
    /// Knockback per point of damage, before dividing by mass
    pub thrust_factor: Fixed,
    pub armor: ArmorAbsorb,
    /// Extreme death when health drops below `-(spawnhealth >> xdeath_shift)`
    pub xdeath_shift: u32,
    pub skill_ammo: SkillAmmoBonus,
    /// Friends, deferred JUSTHIT, and friend-aware enemy memory
    pub mbf_features: bool,
    /// Infighting groups and per-monster retaliation flags
    pub mbf21_features: bool,
    /// Morph ovum, whirlwinds, artifacts, and the rest of the Heretic extras
    pub heretic_specials: bool,
    pub hexen_specials: bool,
    /// Invulnerability, invisibility and the rest are refused while already well stocked
    pub refuse_blinking_powers: bool,
}

impl Ruleset {
    pub fn policy(self) -> RulesetPolicy {
        let doom = RulesetPolicy {
            thrust_factor: 100 * (FRACUNIT >> 3),
            armor: ArmorAbsorb::Doom,
            xdeath_shift: 0,
            skill_ammo: SkillAmmoBonus::Double,
            mbf_features: false,
            mbf21_features: false,
            heretic_specials: false,
            hexen_specials: false,
            refuse_blinking_powers: false,
        };
        match self {
            Ruleset::Vanilla | Ruleset::Boom => doom,
            Ruleset::Mbf => RulesetPolicy{ mbf_features: true, ..doom },
            Ruleset::Mbf21 => RulesetPolicy{ mbf_features: true, mbf21_features: true, ..doom },
            Ruleset::Heretic => RulesetPolicy {
                thrust_factor: 150 * (FRACUNIT >> 3),
                armor: ArmorAbsorb::Heretic,
                xdeath_shift: 1,
                skill_ammo: SkillAmmoBonus::Half,
                heretic_specials: true,
                refuse_blinking_powers: true,
                ..doom
            },
            Ruleset::Hexen => RulesetPolicy {
                armor: ArmorAbsorb::Hexen,
                xdeath_shift: 1,
                skill_ammo: SkillAmmoBonus::Half,
                hexen_specials: true,
                refuse_blinking_powers: true,
                ..doom
            },
        }
    }

    pub fn is_heretic(self) -> bool {
        self == Ruleset::Heretic
    }

    /// Doom proper and its descendants, as opposed to the Raven games.
    pub fn is_doom(self) -> bool {
        match self {
            Ruleset::Heretic | Ruleset::Hexen => false,
            _ => true,
        }
    }
}

/// How picking up ammo while out decides on a new weapon.  Exactly one applies at a time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AutoswitchPolicy {
    /// Per-weapon AUTOSWITCH_FROM / NO_AUTOSWITCH_TO flags
    Mbf21Flags,
    /// The player's own weapon preference order
    Favorite,
    /// Heretic: staff or gauntlets switch to the weapon for the ammo
    HereticTable,
    /// Doom's hardcoded choices
    FixedPriority,
}

/// Picks the single autoswitch policy in effect.  MBF21 flags win over everything, then the
/// player's preference list, then the game's own table.
pub fn autoswitch_policy(ruleset: Ruleset, originalweaponswitch: bool) -> AutoswitchPolicy {
    if ruleset == Ruleset::Mbf21 {
        AutoswitchPolicy::Mbf21Flags
    }
    else if !originalweaponswitch {
        AutoswitchPolicy::Favorite
    }
    else if ruleset.is_heretic() {
        AutoswitchPolicy::HereticTable
    }
    else {
        AutoswitchPolicy::FixedPriority
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    Baby,
    Easy,
    Medium,
    Hard,
    Nightmare,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Shareware,
    Registered,
    Retail,
    Commercial,
    Chex,
}

/// How a voodoo doll's damage and pickups are routed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VoodooMode {
    /// The doll takes damage itself and passes it on to its player
    Vanilla,
    /// Like vanilla, but the doll is killed off rather than letting it kill after a respawn
    Multispawn,
    /// Redirect to the player who caused it, or who last triggered a special line
    Target,
    Auto,
}

/// Who gets to see which messages.  Higher shows more.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShowMessages {
    Off,
    Minimal,
    Play,
    Verbose,
    Debug,
    Dev,
}

impl ShowMessages {
    /// Lowest message level still shown.
    pub fn threshold(self) -> u8 {
        match self {
            ShowMessages::Dev | ShowMessages::Debug => 0,
            ShowMessages::Verbose => 10,
            ShowMessages::Play => 20,
            ShowMessages::Minimal => 30,
            ShowMessages::Off => 60,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub ruleset: Ruleset,
    pub gamemode: GameMode,
    pub skill: Skill,
    pub multiplayer: bool,
    /// 0 is cooperative, 1 classic deathmatch, 2 altdeath, 3 weapons stay
    pub deathmatch: u8,
    pub teamplay: bool,
    pub teamdamage: bool,
    /// Map-placed weapons stay put in multiplayer and each player may take each one once
    pub weaponstay: bool,
    pub frags_weapon_falling: bool,
    pub voodoo_mode: VoodooMode,
    pub monster_infighting: bool,
    pub rocket_jump: bool,
    pub solid_corpse: bool,
    /// Invulnerability and god mode block everything, including telefrags
    pub invul_god: bool,
    pub show_messages: ShowMessages,
    /// New players start with the original weapon switching instead of their preference list
    pub original_weapon_switch: bool,
    pub autoaim: bool,
    pub fraglimit: i32,
    pub max_intercepts: usize,
    /// Panic on bad table data instead of logging and carrying on
    pub strict_tables: bool,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            ruleset: Ruleset::Vanilla,
            gamemode: GameMode::Commercial,
            skill: Skill::Medium,
            multiplayer: false,
            deathmatch: 0,
            teamplay: false,
            teamdamage: false,
            weaponstay: false,
            frags_weapon_falling: false,
            voodoo_mode: VoodooMode::Vanilla,
            monster_infighting: true,
            rocket_jump: false,
            solid_corpse: false,
            invul_god: false,
            show_messages: ShowMessages::Play,
            original_weapon_switch: true,
            autoaim: true,
            fraglimit: 0,
            max_intercepts: DEFAULT_MAX_INTERCEPTS,
            strict_tables: false,
        }
    }
}

impl GameConfig {
    pub fn from_ron(text: &str) -> Result<GameConfig> {
        let config: GameConfig = ron::from_str(text)
            .map_err(|err| ErrorKind::InvalidConfig(err.to_string()))?;
        config.validate()?;
        return Ok(config);
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<GameConfig> {
        let path = path.as_ref();
        let mut text = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut text))
            .chain_err(|| format!("couldn't read config {}", path.display()))?;
        return GameConfig::from_ron(&text);
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_intercepts == 0 {
            bail!(ErrorKind::InvalidConfig("max_intercepts must be at least 1".to_owned()));
        }
        if self.deathmatch > 3 {
            bail!(ErrorKind::InvalidConfig(format!("unknown deathmatch mode {}", self.deathmatch)));
        }
        if self.ruleset == Ruleset::Mbf21 && self.voodoo_mode == VoodooMode::Multispawn {
            debug!("multispawn voodoo dolls under MBF21 behave like vanilla ones");
        }
        return Ok(());
    }

    pub fn policy(&self) -> RulesetPolicy {
        self.ruleset.policy()
    }

    pub fn is_deathmatch(&self) -> bool {
        self.deathmatch != 0
    }

    /// Weapons picked up off the map stay for other players.
    pub fn weapons_persist(&self) -> bool {
        self.weaponstay || self.deathmatch == 1 || self.deathmatch == 3
    }
}

/// Limits that mod data is allowed to change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DehackedLimits {
    pub max_health: i32,
    pub max_armor: i32,
    pub green_armor_class: i32,
    pub blue_armor_class: i32,
    pub max_soul_health: i32,
    pub soul_health: i32,
    pub mega_health: i32,
    pub initial_bullets: i32,
    pub max_ammo: [i32; NUMAMMO],
    /// Ammo in one clip, which is what a map-placed clip or a dropped weapon gives
    pub clip_ammo: [i32; NUMAMMO],
    /// Each player's default preference order, higher is more preferred
    pub favorite_weapons: [u8; NUMWEAPONS],
}

impl Default for DehackedLimits {
    fn default() -> DehackedLimits {
        DehackedLimits {
            max_health: 100,
            max_armor: 200,
            green_armor_class: 1,
            blue_armor_class: 2,
            max_soul_health: 200,
            soul_health: 100,
            mega_health: 200,
            initial_bullets: 50,
            max_ammo: [200, 50, 300, 50, 0, 0],
            clip_ammo: [10, 4, 20, 1, 0, 0],
            favorite_weapons: [1, 4, 5, 6, 8, 7, 2, 3, 5],
        }
    }
}

impl DehackedLimits {
    /// Heretic's ammo counts.
    pub fn heretic() -> DehackedLimits {
        DehackedLimits {
            max_ammo: [100, 50, 200, 200, 20, 150],
            clip_ammo: [10, 5, 10, 20, 1, 20],
            initial_bullets: 50,
            ..DehackedLimits::default()
        }
    }

    pub fn for_ruleset(ruleset: Ruleset) -> DehackedLimits {
        if ruleset.is_doom() {
            DehackedLimits::default()
        }
        else {
            DehackedLimits::heretic()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autoswitch_precedence() {
        assert_eq!(autoswitch_policy(Ruleset::Mbf21, false), AutoswitchPolicy::Mbf21Flags);
        assert_eq!(autoswitch_policy(Ruleset::Mbf21, true), AutoswitchPolicy::Mbf21Flags);
        assert_eq!(autoswitch_policy(Ruleset::Heretic, false), AutoswitchPolicy::Favorite);
        assert_eq!(autoswitch_policy(Ruleset::Heretic, true), AutoswitchPolicy::HereticTable);
        assert_eq!(autoswitch_policy(Ruleset::Vanilla, false), AutoswitchPolicy::Favorite);
        assert_eq!(autoswitch_policy(Ruleset::Boom, true), AutoswitchPolicy::FixedPriority);
    }

    #[test]
    fn thrust_constants() {
        assert_eq!(Ruleset::Vanilla.policy().thrust_factor, 100 * (FRACUNIT >> 3));
        assert_eq!(Ruleset::Heretic.policy().thrust_factor, 150 * (FRACUNIT >> 3));
        assert!(Ruleset::Mbf21.policy().mbf_features);
        assert!(!Ruleset::Boom.policy().mbf_features);
    }

    #[test]
    fn config_from_ron_fills_defaults() {
        let config = GameConfig::from_ron("(ruleset: Heretic, skill: Nightmare, multiplayer: true)").unwrap();
        assert_eq!(config.ruleset, Ruleset::Heretic);
        assert_eq!(config.skill, Skill::Nightmare);
        assert!(config.multiplayer);
        assert_eq!(config.max_intercepts, DEFAULT_MAX_INTERCEPTS);
        assert_eq!(config.voodoo_mode, VoodooMode::Vanilla);
    }

    #[test]
    fn config_rejects_nonsense() {
        assert!(GameConfig::from_ron("(max_intercepts: 0)").is_err());
        assert!(GameConfig::from_ron("(deathmatch: 9)").is_err());
        assert!(GameConfig::from_ron("(ruleset: Quake)").is_err());
    }

    #[test]
    fn message_thresholds() {
        assert_eq!(ShowMessages::Play.threshold(), 20);
        assert_eq!(ShowMessages::Off.threshold(), 60);
        assert!(ShowMessages::Verbose > ShowMessages::Minimal);
    }
}
