//! Game presets selectable from the command line.

use chase::prelude::{GameConfig, HunterConfig, UNLIMITED_LIVES};
use colored::Colorize;

/// One of the five classic game variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Normal,
    Aggressive,
    Endless,
    Crazy,
    Developer,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Normal,
        Preset::Aggressive,
        Preset::Endless,
        Preset::Crazy,
        Preset::Developer,
    ];

    /// Look a preset up by its number (1 to 5).
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn number(self) -> u8 {
        match self {
            Preset::Normal => 1,
            Preset::Aggressive => 2,
            Preset::Endless => 3,
            Preset::Crazy => 4,
            Preset::Developer => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Normal => "normal",
            Preset::Aggressive => "aggressive",
            Preset::Endless => "endless",
            Preset::Crazy => "crazy",
            Preset::Developer => "developer",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Normal => "3 lives, the four named hunters",
            Preset::Aggressive => "100 lives, 12 extra hunters, 15 s attack window",
            Preset::Endless => "the board never runs out",
            Preset::Crazy => "unlimited lives, 31 extra seekers, 28 extra hunters, endless",
            Preset::Developer => "unlimited lives, endless, blinky only, 127 extra seekers",
        }
    }

    /// Overlay this preset on a loaded configuration.
    pub fn apply(self, config: &mut GameConfig) {
        match self {
            Preset::Normal => {}
            Preset::Aggressive => {
                config.seeker_lives = 100;
                config.extra_hunters = 12;
                config.attack_duration = 15_000;
            }
            Preset::Endless => {
                config.endless = true;
            }
            Preset::Crazy => {
                config.seeker_lives = UNLIMITED_LIVES;
                config.extra_seekers = 31;
                config.extra_hunters = 28;
                config.endless = true;
            }
            Preset::Developer => {
                config.seeker_lives = UNLIMITED_LIVES;
                config.endless = true;
                config.hunters = vec![HunterConfig::new("blinky", 'R', 100)];
                config.extra_seekers = 127;
            }
        }
    }
}

/// `chase presets`
pub fn run() -> anyhow::Result<()> {
    println!("{}", "Presets:".bold());
    for preset in Preset::ALL {
        println!(
            "  {} {:<11} {}",
            format!("{}.", preset.number()).blue(),
            preset.name().cyan(),
            preset.description()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chase::prelude::{Legend, Lives};

    #[test]
    fn numbers_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_number(preset.number()), Some(preset));
        }
        assert_eq!(Preset::from_number(0), None);
        assert_eq!(Preset::from_number(6), None);
    }

    #[test]
    fn normal_keeps_the_loaded_config() {
        let mut config = GameConfig {
            seeker_lives: 9,
            ..Default::default()
        };
        Preset::Normal.apply(&mut config);
        assert_eq!(config.seeker_lives, 9);
        assert!(!config.endless);
    }

    #[test]
    fn aggressive() {
        let mut config = GameConfig::default();
        Preset::Aggressive.apply(&mut config);
        assert_eq!(config.lives(), Lives::Limited(100));
        assert_eq!(config.extra_hunters, 12);
        assert_eq!(config.attack_duration, 15_000);
        assert!(!config.endless);
    }

    #[test]
    fn crazy_and_developer_are_endless_and_invulnerable() {
        for preset in [Preset::Crazy, Preset::Developer] {
            let mut config = GameConfig::default();
            preset.apply(&mut config);
            assert!(config.endless);
            assert!(config.lives().is_unlimited());
        }
    }

    #[test]
    fn developer_keeps_one_hunter() {
        let mut config = GameConfig::default();
        Preset::Developer.apply(&mut config);
        assert_eq!(config.hunters.len(), 1);
        assert_eq!(config.hunters[0].symbol, 'R');
        assert_eq!(config.extra_seekers, 127);
        assert_eq!(config.extra_hunters, 0);
    }

    #[test]
    fn every_preset_validates() {
        for preset in Preset::ALL {
            let mut config = GameConfig::default();
            preset.apply(&mut config);
            assert!(config.validate(&Legend::default()).is_ok(), "{}", preset.name());
        }
    }
}
