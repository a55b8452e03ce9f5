//! Arena state
//!
//! Everything one session mutates lives here. Observers only ever get `&Arena`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::boundary::{Boundary, build_boundary};
use super::events::GameOverReason;
use super::population::Population;
use crate::config::ArenaConfig;
use crate::error::ConfigResult;

/// One simulation session
#[derive(Debug, Clone)]
pub struct Arena {
    /// Validated parameters
    pub config: ArenaConfig,
    /// Current ring (rebuilt every tick while rotating)
    pub boundary: Boundary,
    /// Live entities and counters
    pub population: Population,
    /// Session RNG, seeded from `config.seed`
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set once the session has ended
    pub outcome: Option<GameOverReason>,
}

impl Arena {
    /// Validate `config`, build the ring and seed predators and prey
    pub fn new(config: ArenaConfig) -> ConfigResult<Self> {
        config.validate()?;

        let boundary = build_boundary(
            config.center,
            config.boundary_radius(),
            config.side_count,
            config.gap_width,
            config.gap_center,
            0.0,
            config.wall_thickness,
        );
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let mut population = Population::new(&config);

        for _ in 0..config.predator_count {
            population.spawn_predator(None, &mut rng);
        }
        for _ in 0..config.initial_prey {
            population.spawn_prey(None, &mut rng);
        }

        log::info!(
            "Arena ready: radius {:.1}, {} walls ({} gap slots), {} predator(s), {} prey, seed {}",
            boundary.radius,
            boundary.segments.len(),
            boundary.gap_segment_count(),
            config.predator_count,
            config.initial_prey,
            config.seed
        );

        Ok(Self {
            config,
            boundary,
            population,
            rng,
            time_ticks: 0,
            outcome: None,
        })
    }

    /// True once a terminal state was reached
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Largest predator radius (the session is won when it reaches the ring)
    pub fn largest_predator_radius(&self) -> f32 {
        self.population
            .predators()
            .map(|p| p.radius)
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_new_arena_seeds_population() {
        let config = ArenaConfig {
            initial_prey: 25,
            predator_count: 2,
            ..Default::default()
        };
        let arena = Arena::new(config).unwrap();
        assert_eq!(arena.population.prey_count(), 25);
        assert_eq!(arena.population.predator_count(), 2);
        assert_eq!(arena.time_ticks, 0);
        assert!(!arena.is_over());
        assert!((arena.largest_predator_radius() - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_config_never_builds() {
        let config = ArenaConfig {
            side_count: 1,
            ..Default::default()
        };
        assert!(matches!(
            Arena::new(config),
            Err(ConfigError::SideCount { .. })
        ));
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = Arena::new(ArenaConfig::default()).unwrap();
        let b = Arena::new(ArenaConfig::default()).unwrap();
        assert_eq!(a.population.entities(), b.population.entities());
    }
}
