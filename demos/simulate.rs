use glam::DVec2;
use orbital_barge::{
    ActorTag, Collision, Contact, EntityId, OrbitEvent, RigidbodyConfig, Simulation,
    SimulationConfig, UpdateMethod,
};
use std::io::{self, StdoutLock, Write};
use tracing_subscriber::EnvFilter;

const SIMULATION_TICKS: u64 = 3_000;
const REPORT_EVERY: u64 = 250;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut sim = Simulation::new(SimulationConfig::default())?;

    let barge = sim.spawn_circular(DVec2::new(5000.0, 0.0), 50.0)?;
    let enemy = sim.spawn_circular(DVec2::new(0.0, -4000.0), 5.0)?;
    let debris = sim.spawn_with_driver(
        &RigidbodyConfig {
            method: UpdateMethod::Forces,
            ..Default::default()
        },
        DVec2::new(-3000.0, 0.0),
        DVec2::new(0.0, -560.0),
        1.0,
    )?;

    describe(&sim);

    let mut lock = io::stdout().lock();
    eprintln!("Simulating {SIMULATION_TICKS} ticks...");
    for t in 0..SIMULATION_TICKS {
        match t {
            // The enemy tries to knock the barge out of its orbit.
            500 => sim.add_enemy_force(barge, -150.0)?,
            900 => sim.add_enemy_force(barge, 60.0)?,
            // The player rams the enemy.
            1200 => sim.collision_enter(enemy, &player_push(DVec2::new(0.0, 1.0)))?,
            // A bad landing.
            2000 => sim.collision_enter(barge, &planet_impact())?,
            _ => {}
        }

        sim.tick();

        for (id, event) in sim.drain_events() {
            print_event(&mut lock, id, event)?;
        }
        if t % REPORT_EVERY == 0 {
            writeln!(&mut lock, "=== Tick {t} (t={:.2}) ===", sim.time())?;
            print_all_entities(&mut lock, &sim, &[barge, enemy, debris])?;
        }
    }

    Ok(())
}

fn player_push(normal: DVec2) -> Collision {
    Collision::new(
        ActorTag::Player,
        vec![Contact {
            normal_impulse: 20.0,
            normal,
            actor: ActorTag::Player,
        }],
    )
}

fn planet_impact() -> Collision {
    Collision::new(
        ActorTag::Planet,
        vec![Contact {
            normal_impulse: 100.0,
            normal: DVec2::new(1.0, 0.0),
            actor: ActorTag::Planet,
        }],
    )
}

fn describe(sim: &Simulation) {
    println!("{sim}");
    let central = &sim.config().central_body;
    println!(
        "Central body: mu = {}, radius limits = [{}, {}]",
        central.mu, central.minimum_orbital_radius, central.maximum_orbital_radius
    );
}

fn print_event(lock: &mut StdoutLock, id: EntityId, event: OrbitEvent) -> io::Result<()> {
    let what = match event {
        OrbitEvent::MinRadiusBreached => "dipped below the minimum orbital radius",
        OrbitEvent::MaxRadiusBreached => "rose above the maximum orbital radius",
        OrbitEvent::MissionFailed => "hit the planet. Mission failed!",
    };
    writeln!(lock, "[entity {id}] {what}")
}

fn print_all_entities(
    lock: &mut StdoutLock,
    sim: &Simulation,
    ids: &[EntityId],
) -> Result<(), Box<dyn std::error::Error>> {
    for &id in ids {
        let entity = sim.get(id)?;
        let stats = entity.body.orbital_stats();
        writeln!(
            lock,
            "{id} ({:?}): pos {:.1}, vel {:.1}, a = {:.1}, e = {:.4}, rp = {:.1}, ra = {:.1}, heading {:.1} deg",
            entity.driver.method(),
            stats.position,
            stats.velocity,
            stats.semi_major_axis,
            stats.eccentricity,
            stats.periapsis,
            stats.apoapsis,
            entity.body.prograde_rotation(),
        )?;
    }
    Ok(())
}
