use core::fmt;
use std::collections::HashMap;

use glam::DVec2;

use crate::{
    Collision, ConfigError, OrbitEvent, OrbitalBody, OrbitalRigidbody, PointMassBody,
    RigidBody2D, RigidbodyConfig, SimulationConfig, SimulationError,
};

/// The ID of an entity in a [`Simulation`].
pub type EntityId = u64;

/// An orbital body together with its driver and rigid body.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// The orbit the entity follows.
    pub body: OrbitalBody,
    /// The settings reconciling the orbit with the rigid body.
    pub driver: OrbitalRigidbody,
    /// The entity's rigid body.
    pub rigidbody: PointMassBody,
}

/// A fixed-step loop over a set of orbiting entities.
///
/// Every entity orbits the same central body, described by the
/// simulation's [`SimulationConfig`].
///
/// # Example
/// ```
/// use glam::DVec2;
/// use orbital_barge::{Simulation, SimulationConfig};
///
/// let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
/// let id = sim.spawn_circular(DVec2::new(5000.0, 0.0), 10.0).unwrap();
///
/// for _ in 0..100 {
///     sim.tick();
/// }
///
/// let entity = sim.get(id).unwrap();
/// assert!((entity.body.position().length() - 5000.0).abs() < 1e-6);
/// assert!(sim.drain_events().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Simulation {
    config: SimulationConfig,

    entities: HashMap<EntityId, Entity>,

    /// The next ID to assign to an entity.
    next_id: EntityId,

    /// The time elapsed in the simulation, in seconds.
    time: f64,

    events: Vec<(EntityId, OrbitEvent)>,
}

impl Simulation {
    /// Creates an empty simulation.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        Ok(Self {
            config,
            entities: HashMap::new(),
            next_id: 0,
            time: 0.0,
            events: Vec::new(),
        })
    }

    /// Gets the configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Gets the time elapsed in the simulation, in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Adds an entity at the given state, driven with the default driver settings.
    pub fn spawn(
        &mut self,
        position: DVec2,
        velocity: DVec2,
        mass: f64,
    ) -> Result<EntityId, SimulationError> {
        let body = OrbitalBody::new(&self.config.central_body, self.time, position, velocity);
        let driver = OrbitalRigidbody::new(&self.config.rigidbody);
        self.insert(body, driver, mass)
    }

    /// Adds an entity on a counter-clockwise circular orbit through the given position.
    pub fn spawn_circular(
        &mut self,
        position: DVec2,
        mass: f64,
    ) -> Result<EntityId, SimulationError> {
        let body = OrbitalBody::new_circular(&self.config.central_body, self.time, position);
        let driver = OrbitalRigidbody::new(&self.config.rigidbody);
        self.insert(body, driver, mass)
    }

    /// Adds an entity at the given state, with its own driver settings.
    pub fn spawn_with_driver(
        &mut self,
        driver: &RigidbodyConfig,
        position: DVec2,
        velocity: DVec2,
        mass: f64,
    ) -> Result<EntityId, SimulationError> {
        driver.validate()?;

        let body = OrbitalBody::new(&self.config.central_body, self.time, position, velocity);
        self.insert(body, OrbitalRigidbody::new(driver), mass)
    }

    fn insert(
        &mut self,
        mut body: OrbitalBody,
        driver: OrbitalRigidbody,
        mass: f64,
    ) -> Result<EntityId, SimulationError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(ConfigError::InvalidMass(mass).into());
        }

        let mut rigidbody = PointMassBody::new(body.position(), body.velocity(), mass);
        driver.awake(&mut rigidbody);
        driver.start(self.time, &mut body, &mut rigidbody);

        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        tracing::info!(
            id,
            method = ?driver.method(),
            periapsis = body.orbital_elements().get_periapsis(),
            apoapsis = body.orbital_elements().get_apoapsis(),
            "Spawned entity"
        );

        self.entities.insert(
            id,
            Entity {
                body,
                driver,
                rigidbody,
            },
        );
        Ok(id)
    }

    /// Removes an entity from the simulation.
    pub fn remove(&mut self, id: EntityId) -> Result<Entity, SimulationError> {
        self.entities
            .remove(&id)
            .ok_or(SimulationError::EntityNotFound(id))
    }

    /// Gets an entity.
    pub fn get(&self, id: EntityId) -> Result<&Entity, SimulationError> {
        self.entities
            .get(&id)
            .ok_or(SimulationError::EntityNotFound(id))
    }

    /// Gets an entity mutably.
    pub fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity, SimulationError> {
        self.entities
            .get_mut(&id)
            .ok_or(SimulationError::EntityNotFound(id))
    }

    /// Iterates over the entities, in no particular order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(id, entity)| (*id, entity))
    }

    /// Gets the number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if there are no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Advances the simulation by one time step.
    ///
    /// Each entity's driver runs at the current time, then its rigid body
    /// is integrated over the step.
    pub fn tick(&mut self) {
        let dt = self.config.time_step;

        for (id, entity) in self.entities.iter_mut() {
            entity
                .driver
                .fixed_update(self.time, &mut entity.body, &mut entity.rigidbody);
            entity.rigidbody.integrate(dt);

            self.events
                .extend(entity.body.take_events().into_iter().map(|e| (*id, e)));
        }

        self.time += dt;
    }

    /// Advances the simulation by multiple time steps.
    pub fn warp(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Reports the start of a collision to an entity.
    pub fn collision_enter(
        &mut self,
        id: EntityId,
        collision: &Collision,
    ) -> Result<(), SimulationError> {
        let time = self.time;
        let entity = self.get_mut(id)?;
        entity
            .driver
            .on_collision_enter(time, collision, &mut entity.body, &mut entity.rigidbody);
        self.collect_events(id);
        Ok(())
    }

    /// Reports a continuing collision to an entity.
    pub fn collision_stay(
        &mut self,
        id: EntityId,
        collision: &Collision,
    ) -> Result<(), SimulationError> {
        let time = self.time;
        let entity = self.get_mut(id)?;
        entity
            .driver
            .on_collision_stay(time, collision, &mut entity.body, &mut entity.rigidbody);
        self.collect_events(id);
        Ok(())
    }

    /// Pushes an entity along its direction of motion.
    pub fn add_enemy_force(&mut self, id: EntityId, magnitude: f64) -> Result<(), SimulationError> {
        let time = self.time;
        let entity = self.get_mut(id)?;
        entity
            .driver
            .add_enemy_force(time, magnitude, &mut entity.body, &mut entity.rigidbody);
        self.collect_events(id);
        Ok(())
    }

    fn collect_events(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get_mut(&id) {
            self.events
                .extend(entity.body.take_events().into_iter().map(|e| (id, e)));
        }
    }

    /// Takes the events raised since the last call, tagged with the
    /// entity that raised them.
    ///
    /// Events of one entity are in the order they were raised.
    pub fn drain_events(&mut self) -> Vec<(EntityId, OrbitEvent)> {
        std::mem::take(&mut self.events)
    }

    /// Gets the mass of an entity's rigid body.
    pub fn mass(&self, id: EntityId) -> Result<f64, SimulationError> {
        self.get(id).map(|entity| entity.rigidbody.mass())
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Simulation with {} entities, t={}",
            self.entities.len(),
            self.time
        )
    }
}
