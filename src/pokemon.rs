use crate::battle::rng::BattleRng;
use crate::errors::ResourceResult;
use crate::resources::ResourceStore;
use schema::{BaseStats, MoveData, Nature, Stat, StatusCondition};
use serde::{Deserialize, Serialize};

/// Most moves a participant can know.
pub const MOVE_LIMIT: usize = 4;

/// A move a participant knows, with its remaining PP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub move_id: String,
    pub pp: u32,
    pub pp_ups: u32,
}

impl MoveInstance {
    /// A fully restored move slot.
    pub fn new(data: &MoveData) -> Self {
        Self {
            move_id: data.id.clone(),
            pp: max_pp(data.pp, 0),
            pp_ups: 0,
        }
    }

    /// Use the move (decrease PP)
    pub fn use_pp(&mut self) -> bool {
        if self.pp > 0 {
            self.pp -= 1;
            true
        } else {
            false
        }
    }
}

/// Max PP of a move after `pp_ups` PP Ups (each adds a fifth of the base).
pub fn max_pp(base_pp: u32, pp_ups: u32) -> u32 {
    base_pp + base_pp * pp_ups.min(3) / 5
}

/// One creature taking part in a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonInst {
    pub species: String,                 // Key for looking up species data (e.g., "Pidgey")
    pub name: String,                    // Species display name if no nickname
    pub level: u32,
    pub nature: Nature,
    pub ivs: [u32; 6],                   // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub evs: [u32; 6],                   // HP, ATK, DEF, SP.ATK, SP.DEF, SPD
    pub stats: [u32; 6],                 // Computed at creation time
    current_hp: f32,
    pub status: StatusCondition,
    pub asleep_rounds: u32,
    pub moves: Vec<MoveInstance>,        // Up to MOVE_LIMIT moves
    pub experience: u32,
    pub fainted: bool,
}

impl PokemonInst {
    pub fn stat(&self, stat: Stat) -> u32 {
        self.stats.get(stat.index()).copied().unwrap_or(0)
    }

    pub fn max_hp(&self) -> u32 {
        self.stats[0]
    }

    pub fn current_hp(&self) -> f32 {
        self.current_hp
    }

    /// Sets current HP, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: f32) {
        self.current_hp = hp.clamp(0.0, self.max_hp() as f32);
    }

    pub fn set_hp_to_max(&mut self) {
        self.current_hp = self.max_hp() as f32;
    }

    /// Raw access for the HP animation, which only ever moves between two
    /// valid HP values.
    pub fn hp_mut(&mut self) -> &mut f32 {
        &mut self.current_hp
    }

    /// True once HP has reached zero, before or after the faint tag is set.
    pub fn is_down(&self) -> bool {
        self.current_hp <= 0.0
    }

    pub fn is_fainted(&self) -> bool {
        self.fainted
    }

    pub fn has_usable_moves(&self) -> bool {
        self.moves.iter().any(|slot| slot.pp > 0)
    }
}

/// Computes the six stats from base stats, level, IVs, EVs and nature.
pub fn calculate_stats(
    base_stats: &BaseStats,
    level: u32,
    ivs: &[u32; 6],
    evs: &[u32; 6],
    nature: Nature,
) -> [u32; 6] {
    let base = base_stats.as_array();
    let mut stats = [0u32; 6];

    for i in 0..6 {
        stats[i] = ((2 * base[i] + ivs[i] + evs[i] / 4) * level) / 100 + 5;
    }
    stats[0] += level + 5;

    if !nature.is_neutral() {
        let up = nature.increased_stat().index();
        let down = nature.decreased_stat().index();
        stats[up] = stats[up] * 11 / 10;
        stats[down] = stats[down] * 9 / 10;
    }

    stats
}

/// Struct-with-defaults builder for participants.
///
/// # Example
/// ```
/// use pokemon_battle_sim::{PokemonBuilder, ResourceStore};
///
/// let store = ResourceStore::builtin();
/// let pidgey = PokemonBuilder::new("Pidgey", 3)
///     .with_moves(&["Tackle", "SandAttack"])
///     .build(&store)
///     .unwrap();
/// assert_eq!(pidgey.moves.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PokemonBuilder {
    species: String,
    level: u32,
    nature: Nature,
    ivs: [u32; 6],
    evs: [u32; 6],
    moves: Option<Vec<String>>,
    nickname: Option<String>,
    status: StatusCondition,
    asleep_rounds: u32,
    current_hp: Option<f32>,
}

impl PokemonBuilder {
    /// Neutral nature, IVs of 15, no EVs and the learnset's moves by default.
    pub fn new(species: &str, level: u32) -> Self {
        Self {
            species: species.to_string(),
            level,
            nature: Nature::Hardy,
            ivs: [15; 6],
            evs: [0; 6],
            moves: None,
            nickname: None,
            status: StatusCondition::Normal,
            asleep_rounds: 0,
            current_hp: None,
        }
    }

    pub fn with_nature(mut self, nature: Nature) -> Self {
        self.nature = nature;
        self
    }

    pub fn with_ivs(mut self, ivs: [u32; 6]) -> Self {
        self.ivs = ivs;
        self
    }

    pub fn with_evs(mut self, evs: [u32; 6]) -> Self {
        self.evs = evs;
        self
    }

    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = Some(moves.iter().map(|id| id.to_string()).collect());
        self
    }

    pub fn with_nickname(mut self, nickname: &str) -> Self {
        self.nickname = Some(nickname.to_string());
        self
    }

    /// Sets the status condition; `Sleep` also takes its remaining rounds.
    pub fn with_status(mut self, status: StatusCondition, rounds: u32) -> Self {
        self.status = status;
        self.asleep_rounds = rounds;
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: f32) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self, store: &ResourceStore) -> ResourceResult<PokemonInst> {
        let species = store.species(&self.species)?;
        let move_ids = self
            .moves
            .unwrap_or_else(|| species.moves_known_at(self.level, MOVE_LIMIT));

        let mut moves = Vec::with_capacity(MOVE_LIMIT);
        for move_id in move_ids.iter().take(MOVE_LIMIT) {
            moves.push(MoveInstance::new(store.move_data(move_id)?.as_ref()));
        }

        let stats = calculate_stats(&species.base_stats, self.level, &self.ivs, &self.evs, self.nature);
        let mut pokemon = PokemonInst {
            species: species.id.clone(),
            name: self.nickname.unwrap_or_else(|| species.display_name.clone()),
            level: self.level,
            nature: self.nature,
            ivs: self.ivs,
            evs: self.evs,
            stats,
            current_hp: 0.0,
            status: self.status,
            asleep_rounds: self.asleep_rounds,
            moves,
            experience: 0,
            fainted: false,
        };

        match self.current_hp {
            Some(hp) => pokemon.set_hp(hp),
            None => pokemon.set_hp_to_max(),
        }
        Ok(pokemon)
    }
}

/// Generates a wild participant: random nature and IVs, no EVs, and the
/// last four moves the species learns at or below `level`.
pub fn generate_pokemon(
    store: &ResourceStore,
    species: &str,
    level: u32,
    rng: &mut dyn BattleRng,
) -> ResourceResult<PokemonInst> {
    let nature_index = rng.range(0, 24, "nature");
    let nature = Nature::from_repr(nature_index as u8).unwrap_or_default();

    let mut ivs = [0u32; 6];
    for iv in ivs.iter_mut() {
        *iv = rng.range(0, 31, "individual value") as u32;
    }

    PokemonBuilder::new(species, level)
        .with_nature(nature)
        .with_ivs(ivs)
        .build(store)
}
