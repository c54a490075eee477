use crate::pokemon_types::PokemonType;
use crate::stats::Stat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// Who a move is aimed at when it is committed for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MoveTarget {
    #[default]
    Opponent,
    User,
    AllOpponents,
    Field,
}

/// Static reference data for one move, loaded once and shared by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: String,
    pub display_name: String,
    pub move_type: PokemonType,
    pub category: MoveCategory,
    #[serde(default)]
    pub power: u32,
    /// 0 means the move never misses.
    #[serde(default)]
    pub accuracy: u32,
    pub pp: u32,
    /// Selects the mechanical effect, see [`MoveFunction`].
    #[serde(default)]
    pub function_code: i32,
    #[serde(default)]
    pub function_parameter: i32,
    #[serde(default)]
    pub effect_rate: u32,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub target: MoveTarget,
    #[serde(default)]
    pub flags: String,
    #[serde(default)]
    pub description: String,
}

/// Mechanical effect selected by a move's function code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveFunction {
    Damage,
    LowerStat { stat: Stat, stages: i32 },
    RaiseStat { stat: Stat, stages: i32 },
    DamageWithRecoil { rate: f64 },
    FixedDamage { amount: u32 },
    TargetCurrentHp,
    OnUseHook,
    Unknown { code: i32, parameter: i32 },
}

impl MoveData {
    /// Decodes the function code/parameter pair.
    pub fn function(&self) -> MoveFunction {
        let code = self.function_code;
        let parameter = self.function_parameter;
        let unknown = MoveFunction::Unknown { code, parameter };

        match code {
            0 => MoveFunction::Damage,
            -3..=-1 => match Stat::from_id(parameter) {
                Some(stat) => MoveFunction::LowerStat { stat, stages: -code },
                None => unknown,
            },
            1..=3 => match Stat::from_id(parameter) {
                Some(stat) => MoveFunction::RaiseStat { stat, stages: code },
                None => unknown,
            },
            6 => MoveFunction::DamageWithRecoil {
                rate: f64::from(parameter) / 100.0,
            },
            8 => MoveFunction::FixedDamage {
                amount: parameter.max(0) as u32,
            },
            9 => MoveFunction::TargetCurrentHp,
            99 => MoveFunction::OnUseHook,
            _ => unknown,
        }
    }

    pub fn has_flag(&self, flag: char) -> bool {
        self.flags.contains(flag)
    }
}
