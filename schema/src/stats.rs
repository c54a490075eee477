use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// Index into a participant's stat stages.
///
/// The first six double as indices into the computed stat block; accuracy and
/// evasion only exist as stages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCount, FromRepr,
)]
#[repr(u8)]
pub enum Stat {
    Hp = 0,
    Attack = 1,
    Defense = 2,
    SpecialAttack = 3,
    SpecialDefense = 4,
    Speed = 5,
    Accuracy = 6,
    Evasion = 7,
}

impl Stat {
    /// Uppercase name used in battle narration.
    pub fn display_name(self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Attack => "ATTACK",
            Stat::Defense => "DEFENSE",
            Stat::SpecialAttack => "SP.ATK",
            Stat::SpecialDefense => "SP.DEF",
            Stat::Speed => "SPEED",
            Stat::Accuracy => "ACCURACY",
            Stat::Evasion => "EVASION",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Looks a stat up by the numeric id move data uses as a function parameter.
    pub fn from_id(id: i32) -> Option<Stat> {
        u8::try_from(id).ok().and_then(Stat::from_repr)
    }
}

/// Stats a nature can raise or lower, in nature-table order.
pub const NATURE_STAT_ORDER: [Stat; 5] = [
    Stat::Attack,
    Stat::Defense,
    Stat::Speed,
    Stat::SpecialAttack,
    Stat::SpecialDefense,
];

/// The 25 natures. Nature `n` raises `NATURE_STAT_ORDER[n / 5]` and lowers
/// `NATURE_STAT_ORDER[n % 5]`; the five where both coincide are neutral.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumCount,
    EnumString,
    IntoStaticStr,
    FromRepr,
)]
#[repr(u8)]
pub enum Nature {
    #[default]
    Hardy,
    Lonely,
    Brave,
    Adamant,
    Naughty,
    Bold,
    Docile,
    Relaxed,
    Impish,
    Lax,
    Timid,
    Hasty,
    Serious,
    Jolly,
    Naive,
    Modest,
    Mild,
    Quiet,
    Bashful,
    Rash,
    Calm,
    Gentle,
    Sassy,
    Careful,
    Quirky,
}

impl Nature {
    pub fn increased_stat(self) -> Stat {
        NATURE_STAT_ORDER[self as usize / 5]
    }

    pub fn decreased_stat(self) -> Stat {
        NATURE_STAT_ORDER[self as usize % 5]
    }

    pub fn is_neutral(self) -> bool {
        self.increased_stat() == self.decreased_stat()
    }
}

/// Major status condition. The numeric value is what script variables expose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter, IntoStaticStr,
)]
#[repr(u8)]
pub enum StatusCondition {
    #[default]
    Normal = 0,
    Burn = 1,
    Freeze = 2,
    Paralysis = 3,
    Poison = 4,
    Toxic = 5,
    Sleep = 6,
}

impl StatusCondition {
    /// Name of the participant flag carrying this condition's hooks.
    pub fn flag_id(self) -> Option<&'static str> {
        match self {
            StatusCondition::Normal => None,
            other => Some(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_nature_table_matches_standard_names() {
        assert_eq!(Nature::Lonely.increased_stat(), Stat::Attack);
        assert_eq!(Nature::Lonely.decreased_stat(), Stat::Defense);
        assert_eq!(Nature::Brave.decreased_stat(), Stat::Speed);
        assert_eq!(Nature::Modest.increased_stat(), Stat::SpecialAttack);
        assert_eq!(Nature::Modest.decreased_stat(), Stat::Attack);
        assert_eq!(Nature::Calm.increased_stat(), Stat::SpecialDefense);
        assert_eq!(Nature::Jolly.increased_stat(), Stat::Speed);
        assert_eq!(Nature::Jolly.decreased_stat(), Stat::SpecialAttack);
    }

    #[test]
    fn test_five_neutral_natures() {
        let neutral: Vec<Nature> = Nature::iter().filter(|n| n.is_neutral()).collect();
        assert_eq!(
            neutral,
            vec![Nature::Hardy, Nature::Docile, Nature::Serious, Nature::Bashful, Nature::Quirky]
        );
    }

    #[test]
    fn test_stat_ids() {
        assert_eq!(Stat::from_id(6), Some(Stat::Accuracy));
        assert_eq!(Stat::from_id(8), None);
        assert_eq!(Stat::from_id(-1), None);
        assert_eq!(Stat::SpecialDefense.display_name(), "SP.DEF");
    }

    #[test]
    fn test_status_flag_ids() {
        assert_eq!(StatusCondition::Normal.flag_id(), None);
        assert_eq!(StatusCondition::Toxic.flag_id(), Some("Toxic"));
    }
}
