//! Gold, cash, the shop hand and the running statistics of an attempt.

use bank_heist_core::{
    Placeable, HEALTH_UP_AMOUNT, HEALTH_UP_COOLDOWN_TICKS, STARTING_CASH, STARTING_GOLD,
};

/// Cumulative statistics reported on the summary screens.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Statistics {
    /// Enemies killed.
    pub kills: u32,
    /// Turrets deployed.
    pub turrets_placed: u32,
    /// Traps laid.
    pub traps_placed: u32,
    /// Cash spent in the shop.
    pub money_spent: u32,
    /// Gold stolen by enemies.
    pub damage_taken: f32,
}

#[derive(Clone, Debug)]
pub(crate) struct Economy {
    pub(crate) gold: f32,
    pub(crate) cash: u32,
    pub(crate) heal_cooldown: u32,
    pub(crate) hand: Option<Placeable>,
}

impl Default for Economy {
    fn default() -> Self {
        Self {
            gold: STARTING_GOLD,
            cash: STARTING_CASH,
            heal_cooldown: 0,
            hand: None,
        }
    }
}

impl Economy {
    /// Deducts `price` when affordable and records the spend.
    pub(crate) fn try_spend(&mut self, price: u32, statistics: &mut Statistics) -> bool {
        if self.cash < price {
            return false;
        }
        self.cash -= price;
        statistics.money_spent = statistics.money_spent.saturating_add(price);
        true
    }

    pub(crate) fn heal(&mut self) {
        self.gold = (self.gold + HEALTH_UP_AMOUNT).min(STARTING_GOLD);
        self.heal_cooldown = HEALTH_UP_COOLDOWN_TICKS;
    }

    pub(crate) fn expire_cooldown(&mut self) {
        self.heal_cooldown = self.heal_cooldown.saturating_sub(1);
    }
}
