use log::info;

/// Per-plan counters and timing accumulators, logged at the end of each
/// plan call.
#[derive(Clone, Debug, Default)]
pub struct Stats {
    pub iterations: u32,
    pub samples_rejected: u32,
    pub nodes_created: u32,
    pub subplan_calls: u32,
    pub subplan_failures: u32,
    pub goal_connections: u32,
    pub recursive_escapes: u32,
    pub rewire_visits: u32,

    pub stat_time_nn_query: f64,
    pub stat_time_subplan: f64,
    pub stat_time_all: f64,
}

impl Stats {
    pub fn reset(&mut self) {
        *self = Stats::default();
    }

    pub fn print_stats(&self) {
        info!("iterations: {}", self.iterations);
        info!(
            "samples rejected: {}/{}",
            self.samples_rejected, self.iterations
        );
        info!("nodes created: {}", self.nodes_created);
        info!(
            "subplan calls: {} ({} infeasible)",
            self.subplan_calls, self.subplan_failures
        );
        info!("goal connections: {}", self.goal_connections);
        info!("recursive escapes: {}", self.recursive_escapes);
        info!("rewire visits: {}", self.rewire_visits);

        if self.stat_time_all > 0. {
            info!(
                "stat_time_nn_query: {} ms / {}%",
                self.stat_time_nn_query,
                self.stat_time_nn_query / self.stat_time_all * 100.
            );
            info!(
                "stat_time_subplan: {} ms / {}%",
                self.stat_time_subplan,
                self.stat_time_subplan / self.stat_time_all * 100.
            );
            info!("stat_time_all: {} ms", self.stat_time_all);
        }
    }
}
