//! Upgrade pool and stack/tag bookkeeping

use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::combat::{EVOLVE_CANNON_STACKS, EVOLVE_RANGE_STACKS, SYNERGY_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpgradeKind {
    FireRate,
    SideGuns,
    BigBullet,
    Cannon,
    RangeBoost,
    VoltShot,
    HealthUp,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 7] = [
        UpgradeKind::FireRate,
        UpgradeKind::SideGuns,
        UpgradeKind::BigBullet,
        UpgradeKind::Cannon,
        UpgradeKind::RangeBoost,
        UpgradeKind::VoltShot,
        UpgradeKind::HealthUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKind::FireRate => "FIRE_RATE",
            UpgradeKind::SideGuns => "SIDE_GUNS",
            UpgradeKind::BigBullet => "BIG_BULLET",
            UpgradeKind::Cannon => "CANNON",
            UpgradeKind::RangeBoost => "RANGE_BOOST",
            UpgradeKind::VoltShot => "VOLT_SHOT",
            UpgradeKind::HealthUp => "HEALTH_UP",
        }
    }

    /// Parse an upgrade name; unknown names yield `None`
    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
    }

    /// The pool entry for this upgrade
    pub fn option(self) -> &'static UpgradeOption {
        // Pool order matches `ALL`
        &UPGRADE_POOL[self as usize]
    }
}

/// Synergy family an upgrade belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UpgradeTag {
    Kinetic,
    Energy,
    Blast,
    Vitality,
}

impl UpgradeTag {
    pub fn label(&self) -> &'static str {
        match self {
            UpgradeTag::Kinetic => "KINETIC",
            UpgradeTag::Energy => "ENERGY",
            UpgradeTag::Blast => "BLAST",
            UpgradeTag::Vitality => "VITALITY",
        }
    }
}

/// An upgrade card as offered to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpgradeOption {
    pub kind: UpgradeKind,
    pub tag: UpgradeTag,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const UPGRADE_POOL: [UpgradeOption; 7] = [
    UpgradeOption {
        kind: UpgradeKind::FireRate,
        tag: UpgradeTag::Kinetic,
        title: "Core Overclock",
        description: "Fire noticeably faster",
        icon: "⚡",
    },
    UpgradeOption {
        kind: UpgradeKind::SideGuns,
        tag: UpgradeTag::Kinetic,
        title: "Side Mounts",
        description: "Add a pair of flanking gun ports",
        icon: "⚔️",
    },
    UpgradeOption {
        kind: UpgradeKind::BigBullet,
        tag: UpgradeTag::Blast,
        title: "Titan Warhead",
        description: "Bigger, harder-hitting rounds",
        icon: "💥",
    },
    UpgradeOption {
        kind: UpgradeKind::Cannon,
        tag: UpgradeTag::Blast,
        title: "Heavy Cannon",
        description: "High-yield kinetic shells",
        icon: "🚀",
    },
    UpgradeOption {
        kind: UpgradeKind::RangeBoost,
        tag: UpgradeTag::Energy,
        title: "Refraction Lens",
        description: "Steadier shots with more energy headroom",
        icon: "🔍",
    },
    UpgradeOption {
        kind: UpgradeKind::VoltShot,
        tag: UpgradeTag::Energy,
        title: "High-Voltage Coil",
        description: "Hits arc to nearby enemies",
        icon: "💡",
    },
    UpgradeOption {
        kind: UpgradeKind::HealthUp,
        tag: UpgradeTag::Vitality,
        title: "Heart Container",
        description: "One more heart, fully refilled",
        icon: "❤️",
    },
];

/// Stack counts per upgrade and per tag for the current run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeBook {
    stacks: BTreeMap<UpgradeKind, u32>,
    tags: BTreeMap<UpgradeTag, u32>,
}

impl UpgradeBook {
    /// Count one application of `option`
    pub fn record(&mut self, option: &UpgradeOption) {
        *self.stacks.entry(option.kind).or_default() += 1;
        *self.tags.entry(option.tag).or_default() += 1;
    }

    pub fn stacks(&self, kind: UpgradeKind) -> u32 {
        self.stacks.get(&kind).copied().unwrap_or(0)
    }

    pub fn tag_count(&self, tag: UpgradeTag) -> u32 {
        self.tags.get(&tag).copied().unwrap_or(0)
    }

    pub fn energy_synergy(&self) -> bool {
        self.tag_count(UpgradeTag::Energy) >= SYNERGY_THRESHOLD
    }

    pub fn blast_synergy(&self) -> bool {
        self.tag_count(UpgradeTag::Blast) >= SYNERGY_THRESHOLD
    }

    /// Stack thresholds for the black-hole evolution are met
    pub fn evolution_ready(&self) -> bool {
        self.stacks(UpgradeKind::Cannon) >= EVOLVE_CANNON_STACKS
            && self.stacks(UpgradeKind::RangeBoost) >= EVOLVE_RANGE_STACKS
    }

    /// Draw up to `n` distinct options from the pool
    pub fn roll_offer(&self, rng: &mut Pcg32, n: usize) -> Vec<UpgradeOption> {
        UPGRADE_POOL.choose_multiple(rng, n).copied().collect()
    }
}
