/// Deferred effect of one cell on the shared world.
///
/// Produced by interaction workers while the population is read-only and
/// applied afterwards on the coordinator thread in caster order.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionCommand {
    Stab {
        attacker_idx: usize,
        target_idx: usize,
        damage: f32,
    },
    EatFood {
        eater_idx: usize,
        food_idx: usize,
    },
}

impl InteractionCommand {
    /// Index of the cell that issued the command.
    #[must_use]
    pub fn caster(&self) -> usize {
        match self {
            Self::Stab { attacker_idx, .. } => *attacker_idx,
            Self::EatFood { eater_idx, .. } => *eater_idx,
        }
    }
}
