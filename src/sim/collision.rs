//! Collision dispatch
//!
//! Collisions are resolved once per tick after every entity has moved. Which
//! pairs interact and what happens is decided by a single policy table over
//! (actor, victim kind); [`RESOLUTION_ORDER`] fixes the order in which the
//! pairs are checked, so the outcome of a tick never depends on container
//! iteration quirks.
//!
//! Each actor reacts to at most one victim per pair per tick: the first
//! victim in its collection that both overlaps and has a non-ignored policy.

use super::entity::Body;
use super::projectile::Shooter;
use super::rect::Rect;
use super::sprite::{Mask, SpriteCatalog};
use super::state::{GameEvent, GamePhase, GameState};

/// The entity doing the colliding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Player,
    Enemy,
}

/// What an actor collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Victim {
    Obstacle,
    Enemy,
    Projectile(Shooter),
    PowerUp,
}

/// Collection a victim is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VictimGroup {
    Obstacles,
    Enemies,
    Projectiles,
    PowerUps,
}

/// What happens when an actor touches a victim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Ignore,
    /// Player loses health (unless invincible)
    DamagePlayer,
    /// Enemy and projectile are both destroyed; the shooter is rewarded
    KillBoth,
    /// Power-up is consumed and its effect applied
    CollectPowerUp,
}

/// Pairs checked each tick, in order
pub const RESOLUTION_ORDER: [(Actor, VictimGroup); 5] = [
    (Actor::Player, VictimGroup::Obstacles),
    (Actor::Player, VictimGroup::Enemies),
    (Actor::Player, VictimGroup::Projectiles),
    (Actor::Enemy, VictimGroup::Projectiles),
    (Actor::Player, VictimGroup::PowerUps),
];

/// The collision policy table
pub fn policy(actor: Actor, victim: Victim) -> Resolution {
    match (actor, victim) {
        (Actor::Player, Victim::Obstacle) => Resolution::DamagePlayer,
        (Actor::Player, Victim::Enemy) => Resolution::DamagePlayer,
        (Actor::Player, Victim::Projectile(Shooter::Enemy)) => Resolution::DamagePlayer,
        (Actor::Player, Victim::Projectile(Shooter::Player)) => Resolution::Ignore,
        (Actor::Player, Victim::PowerUp) => Resolution::CollectPowerUp,
        (Actor::Enemy, Victim::Projectile(Shooter::Player)) => Resolution::KillBoth,
        (Actor::Enemy, _) => Resolution::Ignore,
    }
}

/// One side of an overlap test: box plus optional opacity
#[derive(Debug, Clone, Copy)]
pub struct Shape<'a> {
    pub rect: Rect,
    pub mask: Option<&'a Mask>,
    pub mirrored: bool,
}

impl<'a> Shape<'a> {
    /// Shape of a body using its own bounds
    pub fn of(body: &Body, sprites: &'a SpriteCatalog, pixel_perfect: bool) -> Self {
        Self::with_rect(body, body.bounds(), sprites, pixel_perfect)
    }

    /// Shape of a body with an explicit collision rect (e.g. shrunk player)
    pub fn with_rect(
        body: &Body,
        rect: Rect,
        sprites: &'a SpriteCatalog,
        pixel_perfect: bool,
    ) -> Self {
        let mask = if pixel_perfect {
            body.frame(sprites).mask.as_ref()
        } else {
            None
        };
        Self {
            rect,
            mask,
            mirrored: body.mirrored,
        }
    }

    fn solid_at(&self, x: f32, y: f32) -> bool {
        match self.mask {
            Some(mask) => mask.sample(
                (x - self.rect.left()) / self.rect.width(),
                (y - self.rect.top()) / self.rect.height(),
                self.mirrored,
            ),
            None => true,
        }
    }
}

/// Box overlap, refined per pixel when either side carries a mask
pub fn overlaps(a: &Shape, b: &Shape) -> bool {
    let Some(overlap) = a.rect.intersection(&b.rect) else {
        return false;
    };
    if a.mask.is_none() && b.mask.is_none() {
        return true;
    }

    // Sample pixel centres inside the overlap region
    let mut y = overlap.top().floor() + 0.5;
    while y < overlap.bottom() {
        if y >= overlap.top() {
            let mut x = overlap.left().floor() + 0.5;
            while x < overlap.right() {
                if x >= overlap.left() && a.solid_at(x, y) && b.solid_at(x, y) {
                    return true;
                }
                x += 1.0;
            }
        }
        y += 1.0;
    }
    false
}

/// Index and resolution of the first relevant victim overlapping `actor`
fn first_hit<'a>(
    actor: Actor,
    shape: &Shape,
    victims: impl Iterator<Item = (&'a Body, Victim)>,
    sprites: &SpriteCatalog,
    pixel_perfect: bool,
) -> Option<(usize, Resolution)> {
    victims.enumerate().find_map(|(i, (body, victim))| {
        let resolution = policy(actor, victim);
        if resolution == Resolution::Ignore {
            return None;
        }
        overlaps(shape, &Shape::of(body, sprites, pixel_perfect)).then_some((i, resolution))
    })
}

/// Resolve every collision for this tick
pub fn resolve_collisions(state: &mut GameState) {
    for (actor, group) in RESOLUTION_ORDER {
        if state.phase != GamePhase::Playing {
            return;
        }
        match actor {
            Actor::Player => resolve_player(state, group),
            Actor::Enemy => resolve_enemies(state, group),
        }
    }
}

fn resolve_player(state: &mut GameState, group: VictimGroup) {
    let sprites = &state.world.sprites;
    let pixel_perfect = state.world.tuning.pixel_perfect_collisions;
    let player = &state.player;
    let shape = Shape::with_rect(&player.body, player.hitbox(), sprites, pixel_perfect);

    let hit = match group {
        VictimGroup::Obstacles => first_hit(
            Actor::Player,
            &shape,
            state.obstacles.iter().map(|o| (&o.body, Victim::Obstacle)),
            sprites,
            pixel_perfect,
        ),
        VictimGroup::Enemies => first_hit(
            Actor::Player,
            &shape,
            state.enemies.iter().map(|e| (&e.body, Victim::Enemy)),
            sprites,
            pixel_perfect,
        ),
        VictimGroup::Projectiles => first_hit(
            Actor::Player,
            &shape,
            state
                .projectiles
                .iter()
                .map(|p| (&p.body, Victim::Projectile(p.shooter))),
            sprites,
            pixel_perfect,
        ),
        VictimGroup::PowerUps => first_hit(
            Actor::Player,
            &shape,
            state.power_ups.iter().map(|p| (&p.body, Victim::PowerUp)),
            sprites,
            pixel_perfect,
        ),
    };

    match hit {
        Some((_, Resolution::DamagePlayer)) => damage_player(state),
        Some((index, Resolution::CollectPowerUp)) => {
            let power_up = state.power_ups.remove(index);
            let kind = power_up.apply(&mut state.player, &mut state.effects, &state.world);
            state.events.push(GameEvent::PowerUpCollected { kind });
        }
        Some((_, Resolution::KillBoth | Resolution::Ignore)) | None => {}
    }
}

fn resolve_enemies(state: &mut GameState, group: VictimGroup) {
    if group != VictimGroup::Projectiles {
        return;
    }
    let pixel_perfect = state.world.tuning.pixel_perfect_collisions;

    let mut i = 0;
    while i < state.enemies.len() {
        let sprites = &state.world.sprites;
        let shape = Shape::of(&state.enemies[i].body, sprites, pixel_perfect);
        let hit = first_hit(
            Actor::Enemy,
            &shape,
            state
                .projectiles
                .iter()
                .map(|p| (&p.body, Victim::Projectile(p.shooter))),
            sprites,
            pixel_perfect,
        );
        if let Some((j, Resolution::KillBoth)) = hit {
            state.projectiles.remove(j);
            let enemy = state.enemies.remove(i);
            // A hit is never refunded; the kill itself earns one shot
            state.player.weapon.refund();
            state.coins += state.world.tuning.coins_per_kill;
            state.kills += 1;
            state.events.push(GameEvent::EnemyKilled { kind: enemy.kind() });
            log::debug!("{:?} destroyed, {} kills", enemy.kind(), state.kills);
            continue;
        }
        i += 1;
    }
}

/// Apply one hit to the player: lose health, then either end the run or
/// clear the screen for a fresh start
fn damage_player(state: &mut GameState) {
    if state.player.is_invincible() {
        return;
    }
    let health = state.player.take_hit();
    state.events.push(GameEvent::PlayerHit { health });
    if health == 0 {
        state.game_over();
    } else {
        log::info!("Player hit, {} health left", health);
        state.grace_reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{Enemy, EnemyKind};
    use crate::sim::obstacle::{Obstacle, ObstacleKind};
    use crate::sim::powerup::{PowerUp, PowerUpKind};
    use crate::sim::projectile::Projectile;
    use crate::sim::sprite::StripId;
    use glam::Vec2;

    fn player_shot(state: &GameState, pos: Vec2) -> Projectile {
        Projectile::new(
            pos,
            Vec2::new(12.0, 0.0),
            StripId::BulletDefault,
            Shooter::Player,
            &state.world.sprites,
        )
    }

    fn enemy_shot(state: &GameState, pos: Vec2) -> Projectile {
        Projectile::new(
            pos,
            Vec2::new(0.0, 7.0),
            StripId::BulletEnemy,
            Shooter::Enemy,
            &state.world.sprites,
        )
    }

    #[test]
    fn test_policy_table() {
        use Resolution::*;
        assert_eq!(policy(Actor::Player, Victim::Obstacle), DamagePlayer);
        assert_eq!(policy(Actor::Player, Victim::Enemy), DamagePlayer);
        assert_eq!(
            policy(Actor::Player, Victim::Projectile(Shooter::Enemy)),
            DamagePlayer
        );
        assert_eq!(policy(Actor::Player, Victim::Projectile(Shooter::Player)), Ignore);
        assert_eq!(policy(Actor::Player, Victim::PowerUp), CollectPowerUp);
        assert_eq!(policy(Actor::Enemy, Victim::Projectile(Shooter::Player)), KillBoth);
        assert_eq!(policy(Actor::Enemy, Victim::Projectile(Shooter::Enemy)), Ignore);
    }

    #[test]
    fn test_kill_rewards_one_shot() {
        let mut state = GameState::new(1);
        state.player.weapon.ammo = 1;
        let robot = Enemy::new(EnemyKind::Robot, Vec2::new(600.0, 520.0), &state.world);
        state.enemies.push(robot);
        let shot = player_shot(&state, Vec2::new(610.0, 550.0));
        state.projectiles.push(shot);

        resolve_collisions(&mut state);

        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.player.weapon.ammo, 2);
        assert_eq!(state.coins, 5);
        assert_eq!(
            state.events,
            vec![GameEvent::EnemyKilled {
                kind: EnemyKind::Robot
            }]
        );
    }

    #[test]
    fn test_kill_reward_saturates() {
        let mut state = GameState::new(1);
        let robot = Enemy::new(EnemyKind::Robot, Vec2::new(600.0, 520.0), &state.world);
        state.enemies.push(robot);
        let shot = player_shot(&state, Vec2::new(610.0, 550.0));
        state.projectiles.push(shot);
        resolve_collisions(&mut state);
        assert_eq!(state.player.weapon.ammo, state.player.weapon.max_ammo);
    }

    #[test]
    fn test_one_projectile_kills_one_enemy() {
        let mut state = GameState::new(1);
        for x in [600.0, 610.0] {
            let drone = Enemy::new(EnemyKind::Drone, Vec2::new(x, 150.0), &state.world);
            state.enemies.push(drone);
        }
        let shot = player_shot(&state, Vec2::new(620.0, 160.0));
        state.projectiles.push(shot);

        resolve_collisions(&mut state);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].body.pos.x, 610.0);
        assert_eq!(state.kills, 1);
    }

    #[test]
    fn test_enemy_absorbs_one_shot_per_tick() {
        let mut state = GameState::new(1);
        let robot = Enemy::new(EnemyKind::Robot, Vec2::new(600.0, 520.0), &state.world);
        state.enemies.push(robot);
        for x in [610.0, 630.0] {
            let shot = player_shot(&state, Vec2::new(x, 550.0));
            state.projectiles.push(shot);
        }

        resolve_collisions(&mut state);

        assert!(state.enemies.is_empty());
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.projectiles[0].body.pos.x, 630.0);
        assert_eq!(state.kills, 1);
    }

    #[test]
    fn test_one_power_up_per_tick() {
        let mut state = GameState::new(1);
        for (kind, x) in [
            (PowerUpKind::Freeze, 110.0),
            (PowerUpKind::Invincibility, 115.0),
        ] {
            let power_up = PowerUp::new(kind, Vec2::new(x, 540.0), &state.world);
            state.power_ups.push(power_up);
        }

        resolve_collisions(&mut state);
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.power_ups[0].kind(), PowerUpKind::Invincibility);
        assert!(state.effects.frozen());
        assert!(!state.player.is_invincible());

        resolve_collisions(&mut state);
        assert!(state.power_ups.is_empty());
        assert!(state.player.is_invincible());
    }

    #[test]
    fn test_own_shot_does_not_shield_enemy_shot() {
        let mut state = GameState::new(1);
        state.player.health = 2;
        let own = player_shot(&state, Vec2::new(110.0, 550.0));
        state.projectiles.push(own);
        let incoming = enemy_shot(&state, Vec2::new(120.0, 560.0));
        state.projectiles.push(incoming);

        resolve_collisions(&mut state);

        assert_eq!(state.player.health, 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.events, vec![GameEvent::PlayerHit { health: 1 }]);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_enemy_shot_kills_last_life() {
        let mut state = GameState::new(1);
        let shot = enemy_shot(&state, Vec2::new(120.0, 560.0));
        state.projectiles.push(shot);

        resolve_collisions(&mut state);

        assert_eq!(state.player.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events[0], GameEvent::PlayerHit { health: 0 });
        assert!(matches!(state.events[1], GameEvent::GameOver { .. }));
    }

    #[test]
    fn test_enemy_shots_pass_through_enemies() {
        let mut state = GameState::new(1);
        let robot = Enemy::new(EnemyKind::Robot, Vec2::new(600.0, 520.0), &state.world);
        state.enemies.push(robot);
        let shot = enemy_shot(&state, Vec2::new(610.0, 550.0));
        state.projectiles.push(shot);
        resolve_collisions(&mut state);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_fatal_hit_ends_run_once() {
        let mut state = GameState::new(1);
        let car = Obstacle::new(ObstacleKind::Car, Vec2::new(80.0, 550.0), &state.world);
        state.obstacles.push(car);
        let robot = Enemy::new(EnemyKind::Robot, Vec2::new(110.0, 520.0), &state.world);
        state.enemies.push(robot);

        resolve_collisions(&mut state);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.player.health, 0);
        let game_overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
    }

    #[test]
    fn test_non_fatal_hit_clears_hazards() {
        let mut state = GameState::new(1);
        state.player.health = 2;
        state.player.weapon.ammo = 0;
        let car = Obstacle::new(ObstacleKind::Car, Vec2::new(80.0, 550.0), &state.world);
        state.obstacles.push(car);
        let far_car = Obstacle::new(ObstacleKind::Car, Vec2::new(900.0, 550.0), &state.world);
        state.obstacles.push(far_car);
        let in_flight = player_shot(&state, Vec2::new(700.0, 300.0));
        state.projectiles.push(in_flight);
        let power_up = PowerUp::new(PowerUpKind::Freeze, Vec2::new(900.0, 0.0), &state.world);
        state.power_ups.push(power_up);

        resolve_collisions(&mut state);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.health, 1);
        assert!(state.obstacles.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.power_ups.len(), 1);
        // The cleared shot counts as a miss
        assert_eq!(state.player.weapon.ammo, 1);
    }

    #[test]
    fn test_two_hits_from_two_health() {
        let mut state = GameState::new(1);
        state.player.health = 2;
        for _ in 0..2 {
            let car = Obstacle::new(ObstacleKind::Car, Vec2::new(80.0, 550.0), &state.world);
            state.obstacles.push(car);
            resolve_collisions(&mut state);
        }
        assert_eq!(state.player.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            state.events[..2],
            [
                GameEvent::PlayerHit { health: 1 },
                GameEvent::PlayerHit { health: 0 }
            ]
        );
    }

    #[test]
    fn test_kill_resolves_before_pickup() {
        let mut state = GameState::new(1);
        let robot = Enemy::new(EnemyKind::Robot, Vec2::new(600.0, 520.0), &state.world);
        state.enemies.push(robot);
        let shot = player_shot(&state, Vec2::new(610.0, 550.0));
        state.projectiles.push(shot);
        let power_up = PowerUp::new(PowerUpKind::Shrink, Vec2::new(110.0, 540.0), &state.world);
        state.power_ups.push(power_up);

        resolve_collisions(&mut state);

        assert!(matches!(state.events[0], GameEvent::EnemyKilled { .. }));
        assert!(matches!(state.events[1], GameEvent::PowerUpCollected { .. }));
    }

    #[test]
    fn test_invincible_player_is_unharmed() {
        let mut state = GameState::new(1);
        let world = state.world.clone();
        state.player.make_invincible(&world);
        let car = Obstacle::new(ObstacleKind::Car, Vec2::new(80.0, 550.0), &state.world);
        state.obstacles.push(car);
        let shot = enemy_shot(&state, Vec2::new(110.0, 530.0));
        state.projectiles.push(shot);

        resolve_collisions(&mut state);

        assert_eq!(state.player.health, 1);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_collect_power_up() {
        let mut state = GameState::new(1);
        let power_up = PowerUp::new(PowerUpKind::Freeze, Vec2::new(110.0, 540.0), &state.world);
        state.power_ups.push(power_up);
        resolve_collisions(&mut state);
        assert!(state.power_ups.is_empty());
        assert!(state.effects.frozen());
        assert_eq!(
            state.events,
            vec![GameEvent::PowerUpCollected {
                kind: PowerUpKind::Freeze
            }]
        );
    }

    #[test]
    fn test_own_shots_do_not_hurt_player() {
        let mut state = GameState::new(1);
        let shot = player_shot(&state, Vec2::new(110.0, 550.0));
        state.projectiles.push(shot);
        resolve_collisions(&mut state);
        assert_eq!(state.player.health, 1);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_shrunk_player_dodges_high_hazard() {
        let mut state = GameState::new(1);
        state.player.scale = 0.25;
        // Hits the top of the full-size box only
        let shot = enemy_shot(&state, Vec2::new(120.0, 525.0));
        state.projectiles.push(shot);
        resolve_collisions(&mut state);
        assert_eq!(state.player.health, 1);
    }

    #[test]
    fn test_pixel_masks_refine_box_overlap() {
        // Left half solid
        let left = Mask::from_alpha(2, 1, &[255, 0], 127);
        let a = Shape {
            rect: Rect::from_xywh(0.0, 0.0, 10.0, 10.0),
            mask: Some(&left),
            mirrored: false,
        };
        let right_side = Shape {
            rect: Rect::from_xywh(6.0, 0.0, 10.0, 10.0),
            mask: None,
            mirrored: false,
        };
        assert!(!overlaps(&a, &right_side));
        let left_side = Shape {
            rect: Rect::from_xywh(-6.0, 0.0, 10.0, 10.0),
            mask: None,
            mirrored: false,
        };
        assert!(overlaps(&a, &left_side));
        let mirrored = Shape { mirrored: true, ..a };
        assert!(overlaps(&mirrored, &right_side));
    }
}
