//! Building the cast of a game from a map and a configuration.

use crate::agent::AgentSpec;
use crate::config::GameConfig;
use crate::controller::Controller;
use chase_core::error::{ChaseError, Result};
use chase_core::grid::{CharGrid, GridService};
use chase_core::legend::Legend;
use chase_core::types::Role;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::info;

/// Spawn parameters for every agent of a game.
///
/// The main seeker spawns on the seeker symbol, each named hunter on its own
/// symbol. Extra seekers share the seeker spawn; extra generic hunters spawn
/// on random point cells.
pub fn build<R: Rng + ?Sized>(
    grid: &dyn GridService,
    legend: &Legend,
    config: &GameConfig,
    rng: &mut R,
) -> Result<Vec<AgentSpec>> {
    let seeker_spawn = grid
        .positions_of(legend.seeker)
        .first()
        .copied()
        .ok_or_else(|| ChaseError::MissingSpawn {
            role: "seeker".to_string(),
            symbol: legend.seeker,
        })?;

    let mut specs = vec![AgentSpec::seeker(
        "seeker",
        legend.seeker,
        seeker_spawn,
        config.seeker_speed_ms,
    )];

    for hunter in &config.hunters {
        let spawn = grid
            .positions_of(hunter.symbol)
            .first()
            .copied()
            .ok_or_else(|| ChaseError::MissingSpawn {
                role: hunter.name.clone(),
                symbol: hunter.symbol,
            })?;
        specs.push(AgentSpec::hunter(
            hunter.name.as_str(),
            Role::Hunter,
            hunter.symbol,
            spawn,
            hunter.speed_ms,
            config.hunter_slowdown,
            config.blink_period_ms,
        ));
    }

    if config.extra_hunters > 0 {
        let points = grid.positions_of(legend.point);
        for n in 1..=config.extra_hunters {
            let spawn = *points.choose(rng).ok_or_else(|| ChaseError::MissingSpawn {
                role: "generic hunter".to_string(),
                symbol: legend.point,
            })?;
            specs.push(AgentSpec::hunter(
                format!("generic-{n}"),
                Role::GenericHunter,
                legend.generic_hunter,
                spawn,
                config.generic_hunter_speed.sample(rng),
                config.hunter_slowdown,
                config.blink_period_ms,
            ));
        }
    }

    for n in 1..=config.extra_seekers {
        specs.push(AgentSpec::seeker(
            format!("seeker-{n}"),
            legend.seeker,
            seeker_spawn,
            config.extra_seeker_speed.sample(rng),
        ));
    }

    Ok(specs)
}

/// Create a controller for `grid` with its full cast attached. Agents are
/// not launched until [`Controller::start`].
pub async fn new_game(grid: CharGrid, config: GameConfig) -> Result<Arc<Controller>> {
    let legend = grid.legend().clone();
    config.validate(&legend)?;
    let specs = {
        let mut rng = rand::thread_rng();
        build(&grid, &legend, &config, &mut rng)?
    };

    let controller = Controller::new(Box::new(grid), legend, config)?;
    for spec in specs {
        controller.attach_extra_entity(spec).await;
    }
    info!(
        agents = controller.agents().await.len(),
        points = controller.total_points().await,
        "Game ready"
    );
    Ok(controller)
}
