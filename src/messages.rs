//! Text shown to players: pickup messages, obituaries, and the priority filter between them.
//!
//! Message levels run 0 to 64.  Roughly: under 10 is debug chatter, 10s are verbose, 20s normal
//! play, 30s the minimum worth seeing, 40s major events, 50s god mode, and 60 and up is shown even
//! with messages turned off.

use info::MobjType;
use player::Player;
use rules::ShowMessages;
use weapons::WeaponType;

pub const GOTARMOR: &str = "Picked up the armor.";
pub const GOTMEGA: &str = "Picked up the MegaArmor!";
pub const GOTHTHBONUS: &str = "Picked up a health bonus.";
pub const GOTARMBONUS: &str = "Picked up an armor bonus.";
pub const GOTSUPER: &str = "Supercharge!";
pub const GOTMSPHERE: &str = "MegaSphere!";
pub const GOTBLUECARD: &str = "Picked up a blue keycard.";
pub const GOTYELWCARD: &str = "Picked up a yellow keycard.";
pub const GOTREDCARD: &str = "Picked up a red keycard.";
pub const GOTBLUESKUL: &str = "Picked up a blue skull key.";
pub const GOTYELWSKUL: &str = "Picked up a yellow skull key.";
pub const GOTREDSKULL: &str = "Picked up a red skull key.";
pub const GOTSTIM: &str = "Picked up a stimpack.";
pub const GOTMEDINEED: &str = "Picked up a medikit that you REALLY need!";
pub const GOTMEDIKIT: &str = "Picked up a medikit.";
pub const GOTINVUL: &str = "Invulnerability!";
pub const GOTBERSERK: &str = "Berserk!";
pub const GOTINVIS: &str = "Partial Invisibility";
pub const GOTSUIT: &str = "Radiation Shielding Suit";
pub const GOTMAP: &str = "Computer Area Map";
pub const GOTVISOR: &str = "Light Amplification Visor";
pub const GOTCLIP: &str = "Picked up a clip.";
pub const GOTCLIPBOX: &str = "Picked up a box of bullets.";
pub const GOTROCKET: &str = "Picked up a rocket.";
pub const GOTROCKBOX: &str = "Picked up a box of rockets.";
pub const GOTCELL: &str = "Picked up an energy cell.";
pub const GOTCELLBOX: &str = "Picked up an energy cell pack.";
pub const GOTSHELLS: &str = "Picked up 4 shotgun shells.";
pub const GOTSHELLBOX: &str = "Picked up a box of shotgun shells.";
pub const GOTBACKPACK: &str = "Picked up a backpack full of ammo!";
pub const GOTBFG9000: &str = "You got the BFG9000!  Oh, yes.";
pub const GOTCHAINGUN: &str = "You got the chaingun!";
pub const GOTCHAINSAW: &str = "A chainsaw!  Find some meat!";
pub const GOTLAUNCHER: &str = "You got the rocket launcher!";
pub const GOTPLASMA: &str = "You got the plasma gun!";
pub const GOTSHOTGUN: &str = "You got the shotgun!";
pub const GOTSHOTGUN2: &str = "You got the super shotgun!";

pub const TXT_ARTIHEALTH: &str = "QUARTZ FLASK";
pub const TXT_ARTIFLY: &str = "WINGS OF WRATH";
pub const TXT_ARTIINVULNERABILITY: &str = "RING OF INVINCIBILITY";
pub const TXT_ARTITOMEOFPOWER: &str = "TOME OF POWER";
pub const TXT_ARTIINVISIBILITY: &str = "SHADOWSPHERE";
pub const TXT_ARTIEGG: &str = "MORPH OVUM";
pub const TXT_ARTISUPERHEALTH: &str = "MYSTIC URN";
pub const TXT_ARTITORCH: &str = "TORCH";
pub const TXT_ARTIFIREBOMB: &str = "TIME BOMB OF THE ANCIENTS";
pub const TXT_ARTITELEPORT: &str = "CHAOS DEVICE";
pub const TXT_AMMOGOLDWAND1: &str = "WAND CRYSTAL";
pub const TXT_AMMOGOLDWAND2: &str = "CRYSTAL GEODE";
pub const TXT_AMMOMACE1: &str = "MACE SPHERES";
pub const TXT_AMMOMACE2: &str = "PILE OF MACE SPHERES";
pub const TXT_AMMOCROSSBOW1: &str = "ETHEREAL ARROWS";
pub const TXT_AMMOCROSSBOW2: &str = "QUIVER OF ETHEREAL ARROWS";
pub const TXT_AMMOBLASTER1: &str = "CLAW ORB";
pub const TXT_AMMOBLASTER2: &str = "ENERGY ORB";
pub const TXT_AMMOSKULLROD1: &str = "LESSER RUNES";
pub const TXT_AMMOSKULLROD2: &str = "GREATER RUNES";
pub const TXT_AMMOPHOENIXROD1: &str = "FLAME ORB";
pub const TXT_AMMOPHOENIXROD2: &str = "INFERNO ORB";
pub const TXT_ITEMBAGOFHOLDING: &str = "BAG OF HOLDING";
pub const TXT_WPNMACE: &str = "FIREMACE";
pub const TXT_WPNCROSSBOW: &str = "ETHEREAL CROSSBOW";
pub const TXT_WPNBLASTER: &str = "DRAGON CLAW";
pub const TXT_WPNSKULLROD: &str = "HELLSTAFF";
pub const TXT_WPNPHOENIXROD: &str = "PHOENIX ROD";
pub const TXT_WPNGAUNTLETS: &str = "GAUNTLETS OF THE NECROMANCER";

/// Show `message` to the player if the display threshold allows it and nothing more important has
/// been said this tic.
pub fn set_message(player: &mut Player, message: &str, msglevel: u8, show: ShowMessages) {
    if msglevel < show.threshold() {
        return;
    }
    if player.msglevel > msglevel {
        return;
    }
    player.msglevel = msglevel;
    player.message = Some(message.to_owned());
}

pub fn player_name(index: usize) -> String {
    format!("Player {}", index + 1)
}

/// What killed a player, as far as the obituary cares.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cause {
    Suicide,
    Telefrag { killer: usize },
    Weapon { killer: usize, weapon: WeaponType, gibbed: bool },
    /// Barrel set off by another player
    BarrelFrag { killer: usize },
    Monster(MobjType),
    /// Standing in a damaging sector, keyed by its special
    Environment(i16),
}

pub fn obituary(victim: usize, cause: Cause) -> String {
    let name = player_name(victim);
    match cause {
        Cause::Suicide => format!("{} suicides", name),
        Cause::Telefrag{ killer } => format!("{} was telefragged by {}", name, player_name(killer)),
        Cause::Weapon{ killer, weapon, gibbed } => {
            let killer = player_name(killer);
            match weapon {
                WeaponType::Fist => format!("{} was punched to death by {}", name, killer),
                WeaponType::Pistol => format!("{} was gunned by {}", name, killer),
                WeaponType::Shotgun => format!("{} was shot down by {}", name, killer),
                WeaponType::Chaingun => format!("{} was machine-gunned by {}", name, killer),
                WeaponType::Missile if gibbed => format!("{} was gibbed by {}'s rocket", name, killer),
                WeaponType::Missile => format!("{} was hit by {}'s rocket", name, killer),
                WeaponType::Plasma => format!("{} was plasmaed by {}", name, killer),
                WeaponType::Bfg => format!("{} was BFGed by {}", name, killer),
                WeaponType::Chainsaw => format!("{} was divided up into little pieces by {}'s chainsaw", name, killer),
                WeaponType::SuperShotgun => format!("{} ate 2 loads of {}'s buckshot", name, killer),
            }
        }
        Cause::BarrelFrag{ killer } => format!("{} was barrel-fragged by {}", name, player_name(killer)),
        Cause::Monster(kind) => {
            let what = match kind {
                MobjType::Possessed => "was killed by a Zombieman",
                MobjType::ShotGuy => "was shot by a Sargent",
                MobjType::Vile => "was incinerated by an Archvile",
                MobjType::Fatso => "couldn't evade the Mancubus fireball",
                MobjType::ChainGuy => "was killed by a Chaingunner",
                MobjType::Troop => "was fried by an Imp",
                MobjType::Sergeant => "was eaten by a Demon",
                MobjType::Shadows => "was eaten by a Spectre",
                MobjType::Head => "was fried by a Caco-demon",
                MobjType::Bruiser => "was slain by a Baron of Hell",
                MobjType::Undead => "was smashed by a Revenant",
                MobjType::Knight => "was slain by a Hell-Knight",
                MobjType::Skull => "was killed by a Lost Soul",
                MobjType::Spider => "was killed by the Spider Mastermind",
                MobjType::Baby => "was killed by an Arachnotron",
                MobjType::Cyborg => "was crushed by the Cyber-demon",
                MobjType::Pain => "was killed by a Pain Elemental",
                MobjType::WolfSS => "was killed by a WolfSS",
                MobjType::Barrel => "was barrel-fragged",
                _ => "died",
            };
            format!("{} {}", name, what)
        }
        Cause::Environment(special) => {
            let what = match special {
                5 => "melted",
                7 => "was killed by the nukage",
                4 | 16 => "was killed by super hellslime",
                _ => "was killed",
            };
            format!("{} {}", name, what)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new([200, 50, 300, 50, 0, 0], 50, [0; 9])
    }

    #[test]
    fn higher_priority_wins_within_a_tic() {
        let mut p = player();
        set_message(&mut p, GOTARMOR, 28, ShowMessages::Play);
        set_message(&mut p, GOTCLIP, 20, ShowMessages::Play);
        assert_eq!(p.message.as_ref().map(|s| s.as_str()), Some(GOTARMOR));
        set_message(&mut p, GOTBLUECARD, 45, ShowMessages::Play);
        assert_eq!(p.message.as_ref().map(|s| s.as_str()), Some(GOTBLUECARD));

        p.begin_tic();
        set_message(&mut p, GOTCLIP, 20, ShowMessages::Play);
        assert_eq!(p.message.as_ref().map(|s| s.as_str()), Some(GOTCLIP));
    }

    #[test]
    fn threshold_filters() {
        let mut p = player();
        set_message(&mut p, GOTCLIP, 20, ShowMessages::Minimal);
        assert!(p.message.is_none());
        set_message(&mut p, GOTSTIM, 20, ShowMessages::Verbose);
        assert!(p.message.is_some());
        let mut p = player();
        set_message(&mut p, "mandatory", 60, ShowMessages::Off);
        assert!(p.message.is_some());
    }

    #[test]
    fn obituaries() {
        assert_eq!(obituary(0, Cause::Suicide), "Player 1 suicides");
        assert_eq!(
            obituary(1, Cause::Weapon{ killer: 0, weapon: WeaponType::Missile, gibbed: true }),
            "Player 2 was gibbed by Player 1's rocket");
        assert_eq!(obituary(0, Cause::Environment(7)), "Player 1 was killed by the nukage");
    }
}
