//! Request handling, independent of the transport.

use std::sync::Arc;

use tracing::{debug, info};

use castle_core::prelude::*;

use crate::optimizer::{
    food_budget, production_rate, ArmyOptimizer, NoRecommendation, TRADE_DISTANCE,
};
use crate::protocol::{Request, Response, SolveRequest, SolveResponse};

/// Solves requests against one shared catalog.
pub struct SolverService {
    catalog: Arc<Catalog>,
    optimizer: Arc<dyn ArmyOptimizer>,
    options: SolverOptions,
    search: SearchConfig,
}

impl SolverService {
    /// A service with default solver settings and no army optimizer.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            optimizer: Arc::new(NoRecommendation),
            options: SolverOptions::default(),
            search: SearchConfig::default(),
        }
    }

    /// Plug in an army optimizer.
    pub fn with_optimizer(mut self, optimizer: Arc<dyn ArmyOptimizer>) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Override the strategy search grid.
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    /// Override the solver options.
    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// The catalog requests are solved against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Serve one request. Failures become `error` responses.
    pub fn handle(&self, request: &Request) -> Response {
        debug!("Handling {} request", request.name());
        match request {
            Request::Ping => Response::pong(),
            Request::Solve(body) => match self.solve(body) {
                Ok(solution) => Response::Solution(solution),
                Err(e) => Response::error(e.to_string()),
            },
            Request::NextAction(body) => match self.solve(body) {
                Ok(solution) => Response::next_action(solution.next_action),
                Err(e) => Response::error(e.to_string()),
            },
        }
    }

    /// Run the strategy search for a request.
    pub fn solve(&self, request: &SolveRequest) -> Result<SolveResponse> {
        let config = request.to_config();
        let initial = config.initial_state(&self.catalog)?;
        let targets = config.targets(&self.catalog)?;

        let solver = Solver::new(&self.catalog, &targets, &self.options);
        let outcome = solver.search(&initial, &self.search);
        let schedule = outcome.best;

        let units_recommendation = if schedule.buildings.is_empty() {
            info!("No building upgrades left; asking for an army recommendation");
            self.optimizer.solve(
                food_budget(&self.catalog, &initial.levels),
                production_rate(&self.catalog, &initial.levels),
                TRADE_DISTANCE,
            )
        } else {
            None
        };

        let strategy = schedule.strategy.unwrap_or_default().to_string();
        info!(
            "Solved: {} actions, {}s, strategy {}",
            schedule.action_count(),
            schedule.total_time_seconds,
            strategy
        );

        Ok(SolveResponse {
            total_time_seconds: schedule.total_time_seconds,
            strategy,
            timeline: schedule.timeline(),
            next_action: schedule.next_action(),
            completed: schedule.completed,
            unmet_targets: schedule.unmet_targets,
            units_recommendation,
        })
    }
}
