//! Movement system: walks enemies along the path and lets the ones at the
//! end attack the base.

use hecs::World;

use kingdom_core::enums::EnemyPhase;
use kingdom_core::events::SimEvent;

use crate::agents::{EnemyAgent, Position};
use crate::economy::EconomyLedger;
use crate::path::PathModel;
use crate::systems::TickContext;

pub fn run(
    world: &mut World,
    path: &PathModel,
    ledger: &mut EconomyLedger,
    ctx: &TickContext,
    events: &mut Vec<SimEvent>,
) {
    for (_entity, (pos, enemy)) in world.query_mut::<(&mut Position, &mut EnemyAgent)>() {
        if enemy.phase == EnemyPhase::Removed {
            continue;
        }

        if enemy.advance(path, ctx.dt) {
            events.push(SimEvent::EnemyReachedEnd { enemy_id: enemy.id });
        }
        pos.0 = path.point_at(enemy.progress).position;

        for _ in 0..enemy.attacks_due(ctx.dt) {
            if ledger.health().is_depleted() {
                break;
            }
            let health_remaining = ledger.damage_base(enemy.attack_damage);
            events.push(SimEvent::BaseAttacked {
                enemy_id: enemy.id,
                damage: enemy.attack_damage,
                health_remaining,
            });
        }
    }
}
