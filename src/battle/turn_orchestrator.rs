use crate::battle::state::BoundMove;
use crate::battle::stats::StageMode;
use crate::battle::world::BattleWorld;
use ordered_float::OrderedFloat;
use schema::Stat;

#[derive(Debug, Clone, Copy)]
struct ActionPriority {
    move_priority: i32,
    speed: OrderedFloat<f64>, // Stage-adjusted, paralysis included
}

fn calculate_action_priority(world: &BattleWorld, action: &BoundMove) -> ActionPriority {
    ActionPriority {
        move_priority: action.move_data.priority,
        speed: OrderedFloat(world.effective_stat(action.user, Stat::Speed, StageMode::All)),
    }
}

/// Orders the turn's actions: shuffled first, then stable-sorted by move
/// priority and effective Speed, both descending. Ties keep the shuffled
/// order, so they resolve randomly.
pub fn determine_action_order(world: &mut BattleWorld, actions: Vec<BoundMove>) -> Vec<BoundMove> {
    let mut order: Vec<usize> = (0..actions.len()).collect();
    world.rng.shuffle(&mut order);

    let priorities: Vec<ActionPriority> = actions
        .iter()
        .map(|action| calculate_action_priority(world, action))
        .collect();

    // Vec::sort_by is stable.
    order.sort_by(|&a, &b| {
        let (a, b) = (&priorities[a], &priorities[b]);
        b.move_priority
            .cmp(&a.move_priority)
            .then_with(|| b.speed.cmp(&a.speed))
    });

    let mut slots: Vec<Option<BoundMove>> = actions.into_iter().map(Some).collect();
    let sorted: Vec<BoundMove> = order.into_iter().filter_map(|index| slots[index].take()).collect();

    tracing::debug!(
        order = ?sorted.iter().map(|action| (action.user.index(), action.move_id())).collect::<Vec<_>>(),
        "turn order"
    );
    sorted
}
