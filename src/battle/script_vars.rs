//! Named variables mirrored out of the battle before any hook runs.
//!
//! Roster snapshots live under `playerTeam[i].<field>` / `opponentTeam[i].<field>`;
//! `user.<field>` and `target.<field>` resolve through per-action pointers,
//! and `move.<field>` describes the move being resolved.

use crate::battle::state::Side;
use crate::battle::stats::StageMode;
use crate::battle::world::BattleWorld;
use crate::pokemon::MOVE_LIMIT;
use schema::{MoveData, Stat};
use serde_json::{json, Value};
use std::collections::BTreeMap;

const USER_POINTER: &str = "user";
const TARGET_POINTER: &str = "target";
const MOVE_PREFIX: &str = "move";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptVariables {
    values: BTreeMap<String, Value>,
    user: Option<String>,
    target: Option<String>,
}

impl ScriptVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks a variable up, following the `user` / `target` pointers.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(self.resolve(name).as_ref())
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        let key = self.resolve(name).into_owned();
        self.values.insert(key, value);
    }

    /// The roster prefix `user` currently points at.
    pub fn user_pointer(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn target_pointer(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn resolve<'a>(&self, name: &'a str) -> std::borrow::Cow<'a, str> {
        let Some((head, field)) = name.split_once('.') else {
            return name.into();
        };
        let pointer = match head {
            USER_POINTER => self.user.as_deref(),
            TARGET_POINTER => self.target.as_deref(),
            _ => None,
        };
        match pointer {
            Some(prefix) => format!("{}.{}", prefix, field).into(),
            None => name.into(),
        }
    }

    pub(crate) fn set_pointers(&mut self, user: String, target: String) {
        self.user = Some(user);
        self.target = Some(target);
    }

    /// Rewrites every roster snapshot from the current battle state.
    pub(crate) fn sync_roster(&mut self, world: &BattleWorld) {
        for side in Side::BOTH {
            for (index, &id) in world.roster(side).iter().enumerate() {
                let prefix = format!("{}[{}]", side.team_variable(), index);
                let pokemon = world.participant(id);
                let mut put = |field: &str, value: Value| {
                    self.values.insert(format!("{}.{}", prefix, field), value);
                };

                put("species", json!(pokemon.species));
                put("displayName", json!(pokemon.name));
                put("nature", json!(<&'static str>::from(pokemon.nature)));
                put("level", json!(pokemon.level));
                put("hp", json!(pokemon.max_hp()));
                put("currentHP", json!(pokemon.current_hp()));
                put("status", json!(pokemon.status as i32));
                put("asleepRounds", json!(pokemon.asleep_rounds));
                put("fainted", json!(pokemon.is_fainted()));
                for (field, stat) in [
                    ("attack", Stat::Attack),
                    ("defense", Stat::Defense),
                    ("specialAttack", Stat::SpecialAttack),
                    ("specialDefense", Stat::SpecialDefense),
                    ("speed", Stat::Speed),
                ] {
                    put(field, json!(world.effective_stat(id, stat, StageMode::All)));
                }

                put("moveCount", json!(pokemon.moves.len()));
                for slot in 0..MOVE_LIMIT {
                    let instance = pokemon.moves.get(slot);
                    put(
                        &format!("move{}", slot),
                        instance.map_or(Value::Null, |instance| json!(instance.move_id)),
                    );
                    put(
                        &format!("pp{}", slot),
                        instance.map_or(json!(-1), |instance| json!(instance.pp)),
                    );
                }

                if let Some(species) = world.species_of(id) {
                    put("typeCount", json!(species.types.len()));
                    for (slot, pokemon_type) in species.types.iter().enumerate() {
                        put(&format!("type{}", slot), json!(pokemon_type.to_string()));
                    }
                    put("baseExp", json!(species.base_exp));
                }
            }
        }
    }

    /// Describes the move being resolved, or clears the fields between moves.
    pub(crate) fn sync_move(&mut self, move_data: Option<&MoveData>) {
        let prefix = format!("{}.", MOVE_PREFIX);
        self.values.retain(|name, _| !name.starts_with(&prefix));
        let Some(data) = move_data else {
            return;
        };

        let mut put = |field: &str, value: Value| {
            self.values.insert(format!("{}{}", prefix, field), value);
        };
        put("id", json!(data.id));
        put("displayName", json!(data.display_name));
        put("type", json!(data.move_type.to_string()));
        put("category", json!(format!("{:?}", data.category)));
        put("power", json!(data.power));
        put("accuracy", json!(data.accuracy));
        put("functionCode", json!(data.function_code));
        put("functionParameter", json!(data.function_parameter));
        put("effectRate", json!(data.effect_rate));
        put("priority", json!(data.priority));
    }
}
