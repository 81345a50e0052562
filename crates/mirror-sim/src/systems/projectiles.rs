//! Projectile integration: ageing, movement and wall bounces.

use hecs::World;

use mirror_core::components::{Body, Projectile};
use mirror_core::config::ArenaConfig;
use mirror_core::types::{Position, Velocity};

/// Move every live projectile one tick. Projectiles past their lifetime are
/// marked dead for cleanup.
pub fn run(world: &mut World, arena: &ArenaConfig) {
    for (_entity, (projectile, pos, vel, body)) in
        world.query_mut::<(&mut Projectile, &mut Position, &mut Velocity, &Body)>()
    {
        if !projectile.alive {
            continue;
        }
        if projectile.age_ticks >= projectile.lifetime_ticks {
            projectile.alive = false;
            continue;
        }
        projectile.age_ticks += 1;

        pos.x += vel.x;
        pos.y += vel.y;
        bounce(&mut pos.x, &mut vel.x, body.radius, arena.width);
        bounce(&mut pos.y, &mut vel.y, body.radius, arena.height);
    }
}

/// Reflect one axis off the arena edges.
fn bounce(p: &mut f64, v: &mut f64, r: f64, limit: f64) {
    if *p - r < 0.0 {
        *p = r;
        *v = v.abs();
    } else if *p + r > limit {
        *p = limit - r;
        *v = -v.abs();
    }
}
