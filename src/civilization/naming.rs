//! Name tables for civilizations, cities and belief systems

use rand::seq::SliceRandom;
use rand::Rng;

use crate::civilization::traits::{Trait, TraitSet};
use crate::core::types::SimRng;
use crate::world::TerrainKind;

const CIV_PREFIXES: &[&str] = &[
    "Glorious ", "Ancient ", "Mighty ", "Sacred ", "Golden ", "Silver ", "Eternal ", "Rising ", "",
];

const CIV_NOUNS: &[&str] = &[
    "Empire", "Kingdom", "Republic", "Tribes", "Federation", "Realm", "Dominion", "Alliance",
    "States", "Confederation",
];

const CIV_NAMES: &[&str] = &[
    "Zephyr", "Aetheria", "Lumina", "Solara", "Terran", "Aquila", "Drakon", "Orion", "Lyra",
    "Nimbus", "Zenith", "Nexus", "Nova",
];

const BELIEF_PREFIXES: &[&str] = &[
    "Church of", "Cult of", "Order of", "Way of", "Faith of", "Followers of", "Ideology of",
    "Believers in",
];

const BELIEF_SUBJECTS: &[&str] = &[
    "Eternal Light", "Cosmic Balance", "Divine Wisdom", "Blessed Harmony", "Sacred Knowledge",
    "Mighty Mountains", "Flowing Water", "Golden Sun", "Silver Moon", "Whispered Secrets",
    "Endless Cycles", "Unbounded Nature",
];

const CITY_PREFIXES: &[&str] = &["New ", "Fort ", "Port ", "Mount ", ""];

const CITY_SUFFIXES: &[&str] = &[
    "City", "Town", "Village", "Settlement", "Station", "Post", "Camp", "Heights", "Point",
];

fn pick<'a>(rng: &mut SimRng, table: &[&'a str]) -> &'a str {
    table.choose(rng).copied().unwrap_or_default()
}

fn terrain_prefixes(terrain: TerrainKind) -> &'static [&'static str] {
    match terrain {
        TerrainKind::Water => &["Bay ", "Harbor ", "Port "],
        TerrainKind::Plains => &["Green ", "Plains ", "Field "],
        TerrainKind::Mountain => &["Mount ", "Peak ", "High "],
        TerrainKind::Forest => &["Forest ", "Wood ", "Green "],
        TerrainKind::Desert => &["Dune ", "Desert ", "Sand "],
    }
}

fn trait_prefixes(t: Trait) -> Option<&'static [&'static str]> {
    match t {
        Trait::Religious => Some(&["Holy ", "Sacred ", "Temple ", "Shrine "]),
        Trait::Aggressive => Some(&["Fort ", "Guard ", "Battle ", "Warrior "]),
        Trait::TechSavvy => Some(&["New ", "Tech ", "Innovation ", "Academy "]),
        Trait::Trading => Some(&["Market ", "Trade ", "Commerce ", "Exchange "]),
        Trait::Peaceful => Some(&["Harmony ", "Peace ", "Garden ", "Serene "]),
        Trait::Weird => Some(&["Strange ", "Mystic ", "Void ", "Ethereal "]),
        Trait::Expansionist | Trait::Isolationist => None,
    }
}

pub fn civilization_name(rng: &mut SimRng) -> String {
    match rng.gen_range(0..3) {
        0 => format!("{}{}", pick(rng, CIV_PREFIXES), pick(rng, CIV_NOUNS)),
        1 => format!("{} {}", pick(rng, CIV_NAMES), pick(rng, CIV_NOUNS)),
        _ => pick(rng, CIV_NAMES).to_string(),
    }
}

pub fn belief_name(rng: &mut SimRng) -> String {
    format!("{} {}", pick(rng, BELIEF_PREFIXES), pick(rng, BELIEF_SUBJECTS))
}

/// Name a new city from the founder's traits, the local terrain and its name
pub fn city_name(
    rng: &mut SimRng,
    traits: &TraitSet,
    terrain: Option<TerrainKind>,
    civ_name: &str,
    city_count: usize,
) -> String {
    if rng.gen::<f64>() < 0.3 {
        if let Some(words) = traits.iter().find_map(trait_prefixes) {
            return format!("{}{}", pick(rng, words), pick(rng, CITY_SUFFIXES));
        }
    }

    let prefix = match terrain {
        Some(kind) if rng.gen::<f64>() < 0.5 => pick(rng, terrain_prefixes(kind)),
        _ => pick(rng, CITY_PREFIXES),
    };

    if civ_name.contains(' ') && rng.gen::<f64>() < 0.3 {
        let parts: Vec<&str> = civ_name.split_whitespace().collect();
        return format!("{}{} {}", prefix, pick(rng, &parts), pick(rng, CITY_SUFFIXES));
    }

    if rng.gen::<f64>() < 0.2 {
        let letter = (b'A' + (city_count % 26) as u8) as char;
        return format!("{}{}-{}", prefix, letter, rng.gen_range(1..=9));
    }

    format!("{}{}", prefix, pick(rng, CITY_SUFFIXES))
}
