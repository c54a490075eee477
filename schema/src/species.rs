use crate::pokemon_types::PokemonType;
use crate::stats::Stat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_attack: u32,
    pub sp_defense: u32,
    pub speed: u32,
}

impl BaseStats {
    /// The six values in stat-block order (HP, Atk, Def, SpA, SpD, Spe).
    pub fn as_array(&self) -> [u32; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }

    pub fn get(&self, stat: Stat) -> u32 {
        self.as_array().get(stat.index()).copied().unwrap_or(0)
    }
}

/// One learnset entry: the move becomes available at `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnsetEntry {
    pub level: u32,
    pub move_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: String,
    pub display_name: String,
    pub national_number: u32,
    pub types: Vec<PokemonType>,
    pub base_stats: BaseStats,
    pub base_exp: u32,
    #[serde(default)]
    pub learnset: Vec<LearnsetEntry>,
}

impl SpeciesData {
    /// The last `limit` moves learned at or below `level`, oldest first.
    pub fn moves_known_at(&self, level: u32, limit: usize) -> Vec<String> {
        let mut learned: Vec<&LearnsetEntry> =
            self.learnset.iter().filter(|entry| entry.level <= level).collect();
        learned.sort_by_key(|entry| entry.level);

        let mut known: Vec<String> = Vec::new();
        for entry in learned {
            if known.contains(&entry.move_id) {
                continue;
            }
            if known.len() == limit {
                known.remove(0);
            }
            known.push(entry.move_id.clone());
        }
        known
    }
}
