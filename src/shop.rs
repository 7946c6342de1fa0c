//! Between-run shop
//!
//! Banked coins buy an extra life or the upgraded weapon for the next run.

use serde::{Deserialize, Serialize};

use crate::error::PurchaseError;
use crate::sim::{Player, Weapon, WeaponKind, World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopItem {
    ExtraLife,
    WeaponUpgrade,
}

impl ShopItem {
    pub fn cost(self, world: &World) -> u64 {
        match self {
            ShopItem::ExtraLife => world.tuning.extra_life_cost,
            ShopItem::WeaponUpgrade => world.tuning.weapon_upgrade_cost,
        }
    }
}

/// Buy `item` for `player`, deducting from `coins` only on success
pub fn purchase(
    item: ShopItem,
    coins: &mut u64,
    player: &mut Player,
    world: &World,
) -> Result<(), PurchaseError> {
    let owned = match item {
        ShopItem::ExtraLife => player.health >= world.tuning.max_player_health,
        ShopItem::WeaponUpgrade => player.weapon.kind() == WeaponKind::Upgrade,
    };
    if owned {
        return Err(PurchaseError::AlreadyOwned(item));
    }

    let cost = item.cost(world);
    if *coins < cost {
        return Err(PurchaseError::InsufficientCoins {
            cost,
            coins: *coins,
        });
    }
    *coins -= cost;

    match item {
        ShopItem::ExtraLife => player.health += 1,
        ShopItem::WeaponUpgrade => {
            player.weapon = Weapon::new(WeaponKind::Upgrade, player.body.bounds(), world);
        }
    }
    log::info!("Purchased {:?} for {} coins, {} left", item, cost, coins);
    Ok(())
}
