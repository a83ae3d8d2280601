//! Recursively feasible graph dynamic planner.
//!
//! Samples states, attaches them to the planning graph through a black box
//! sub-planner, and only commits to a trajectory whose every node has a
//! witnessed escape route. When a new node cannot reach a goal, the roles
//! of graph and goal set are swapped and a return traversal runs from the
//! stranded node back into the graph, which is what makes repeated
//! replanning safe.

use std::collections::{HashSet, VecDeque};

use anyhow::Result;
use log::{debug, info, warn};

use crate::clock::RunClock;
use crate::cost::CostFunctor;
use crate::graph::node::{Node, NodeArena, NodeId};
use crate::graph::searchable_set::SearchableSet;
use crate::instrumentation::Timer;
use crate::log_throttle;
use crate::params::PlannerParams;
use crate::planner::Planner;
use crate::space::StateSpace;
use crate::states::States;
use crate::stats::Stats;
use crate::subplanner::SubPlanner;
use crate::trajectory::Trajectory;

pub struct GraphDynamicPlanner<SS: StateSpace> {
    space: SS,
    subplanner: Box<dyn SubPlanner<SS::S>>,
    cost: Box<dyn CostFunctor<SS::S>>,
    clock: Box<dyn RunClock>,
    params: PlannerParams,
    stats: Stats,
}

impl<SS: StateSpace> GraphDynamicPlanner<SS> {
    pub fn new(
        space: SS,
        subplanner: Box<dyn SubPlanner<SS::S>>,
        cost: Box<dyn CostFunctor<SS::S>>,
        clock: Box<dyn RunClock>,
        params: PlannerParams,
    ) -> Result<Self> {
        params.validate()?;
        Ok(GraphDynamicPlanner {
            space,
            subplanner,
            cost,
            clock,
            params,
            stats: Stats::default(),
        })
    }

    pub fn params(&self) -> &PlannerParams {
        &self.params
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// One traversal of the sample/attach/connect loop. Outbound
    /// traversals expand from the start toward the goal set and extract a
    /// trajectory on success; return traversals only witness viability for
    /// their root and report back with an empty trajectory.
    fn recursive_plan(
        &mut self,
        arena: &mut NodeArena<SS::S>,
        graph: &mut SearchableSet,
        goals: &mut SearchableSet,
        outbound: bool,
        deadline: f64,
    ) -> Trajectory<SS::S> {
        while self.clock.now() < deadline {
            self.stats.iterations += 1;

            let sample = self.space.sample();
            let sample_vals = sample.get_vals();

            let timer = Timer::default();
            let neighbors = graph.knn_search(&sample_vals, self.params.num_neighbors);
            self.stats.stat_time_nn_query += timer.dur_ms();

            let sample_id = match self.attach_sample(arena, graph, &sample, &sample_vals, &neighbors)
            {
                Some(id) => id,
                None => {
                    self.stats.samples_rejected += 1;
                    continue;
                }
            };

            match self.connect_to_goal(arena, goals, sample_id, &sample_vals) {
                Some(child) => {
                    let reattach = match arena[child].best_parent {
                        None => true,
                        Some(parent) => {
                            arena[parent].cost_to_come > arena[sample_id].cost_to_come
                        }
                    };
                    if reattach {
                        self.update_descendants(arena, sample_id, goals.initial_node());
                    }
                    mark_viable_chain(arena, sample_id);
                    self.stats.goal_connections += 1;

                    if outbound {
                        return self.extract_trajectory(
                            arena,
                            graph.initial_node(),
                            goals.initial_node(),
                        );
                    }
                    //the outbound caller extracts once its own connection lands
                    return Trajectory::empty();
                }
                None if outbound => {
                    //no goal in reach, witness an escape route for the new
                    //node by planning back into the graph built so far
                    debug!("recursive escape from a stranded sample");
                    self.stats.recursive_escapes += 1;
                    let mut escape_graph = SearchableSet::new(sample_id, sample_vals);
                    let _ = self.recursive_plan(arena, &mut escape_graph, graph, false, deadline);
                }
                None => {}
            }
        }

        if outbound {
            let start_id = graph.initial_node();
            if arena[start_id].best_parent.is_some() {
                info!("deadline reached, extracting viable loop anchored at the start");
                return self.extract_trajectory(arena, start_id, start_id);
            }
            warn!("deadline reached, no viable loops available");
        }
        Trajectory::empty()
    }

    /// Try the neighbors nearest-first and hang the sample off the first
    /// one the sub-planner can reach it from. Neighbors within tolerance
    /// of the sample are skipped so duplicate vertices never enter the
    /// graph.
    fn attach_sample(
        &mut self,
        arena: &mut NodeArena<SS::S>,
        graph: &mut SearchableSet,
        sample: &SS::S,
        sample_vals: &[f64],
        neighbors: &[NodeId],
    ) -> Option<NodeId> {
        for &neighbor in neighbors {
            if arena[neighbor].state.approx_eq(sample) {
                continue;
            }

            let from = arena[neighbor].state.clone();
            let neighbor_time = arena[neighbor].time;

            let timer = Timer::default();
            let sub = self.subplanner.sub_plan(&from, sample, neighbor_time);
            self.stats.stat_time_subplan += timer.dur_ms();
            self.stats.subplan_calls += 1;
            if sub.is_empty() {
                self.stats.subplan_failures += 1;
                continue;
            }

            let time = neighbor_time + sub.duration();
            let cost_to_come = arena[neighbor].cost_to_come + self.cost.evaluate(&sub);
            let sample_id = arena.alloc(Node::sampled(sample.clone(), time, cost_to_come, neighbor));
            arena[neighbor].children.push((sample_id, sub));
            graph.insert(sample_id, sample_vals.to_vec());
            self.stats.nodes_created += 1;
            return Some(sample_id);
        }
        None
    }

    ///first viable goal within the search radius the sub-planner can reach
    fn connect_to_goal(
        &mut self,
        arena: &mut NodeArena<SS::S>,
        goals: &SearchableSet,
        sample_id: NodeId,
        sample_vals: &[f64],
    ) -> Option<NodeId> {
        let near_goals = goals.radius_search(sample_vals, self.params.search_radius);
        for goal in near_goals {
            if !arena[goal].is_viable {
                continue;
            }

            let from = arena[sample_id].state.clone();
            let to = arena[goal].state.clone();
            let start_time = arena[sample_id].time;

            let timer = Timer::default();
            let sub = self.subplanner.sub_plan(&from, &to, start_time);
            self.stats.stat_time_subplan += timer.dur_ms();
            self.stats.subplan_calls += 1;
            if sub.is_empty() {
                self.stats.subplan_failures += 1;
                continue;
            }

            arena[sample_id].children.push((goal, sub));
            return Some(goal);
        }
        None
    }

    /// Breadth-first refresh of arrival times and costs below `node`.
    /// A child is pulled onto the chain through the visited node when it
    /// has no parent yet, when the visited node already is its parent
    /// (times must refresh even without a cost improvement), or when the
    /// visited node's cost-to-come beats its current parent's.
    ///
    /// `anchor` is the terminal node of the current traversal. Its subtree
    /// is never expanded, which also breaks the cycle a loop through the
    /// anchor introduces into the child relation.
    fn update_descendants(
        &mut self,
        arena: &mut NodeArena<SS::S>,
        node: NodeId,
        anchor: NodeId,
    ) {
        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        queue.push_back(node);
        visited.insert(node);

        while let Some(current) = queue.pop_front() {
            if current == anchor {
                continue;
            }
            self.stats.rewire_visits += 1;

            let current_time = arena[current].time;
            let current_cost = arena[current].cost_to_come;

            for ii in 0..arena[current].children.len() {
                let child = arena[current].children[ii].0;
                arena[current].children[ii].1.reset_first_time(current_time);
                let edge_duration = arena[current].children[ii].1.duration();
                let edge_cost = self.cost.evaluate(&arena[current].children[ii].1);

                let reattach = match arena[child].best_parent {
                    None => true,
                    Some(parent) if parent == current => true,
                    Some(parent) => arena[parent].cost_to_come > current_cost,
                };
                if reattach {
                    let child_node = &mut arena[child];
                    child_node.best_parent = Some(current);
                    child_node.time = current_time + edge_duration;
                    child_node.cost_to_come = current_cost + edge_cost;
                }

                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }
    }

    /// Walk the best parent chain up from `goal`, prepending the edge into
    /// each node, until `start` closes the walk with at least one edge
    /// accumulated (so a loop anchored at the start returns the full
    /// cycle). A broken chain ends the walk early with whatever has been
    /// gathered.
    fn extract_trajectory(
        &self,
        arena: &NodeArena<SS::S>,
        start: NodeId,
        goal: NodeId,
    ) -> Trajectory<SS::S> {
        let mut pieces: VecDeque<Trajectory<SS::S>> = VecDeque::new();
        let mut node = goal;

        loop {
            if node == start && !pieces.is_empty() {
                break;
            }
            let parent = match arena[node].best_parent {
                Some(parent) => parent,
                None => {
                    log_throttle!(
                        1.0,
                        error,
                        "node without a best parent during extraction, trajectory is partial"
                    );
                    break;
                }
            };
            match arena[parent]
                .children
                .iter()
                .find(|(child, _)| *child == node)
            {
                Some((_, edge)) => pieces.push_front(edge.clone()),
                None => {
                    log_throttle!(
                        1.0,
                        error,
                        "missing edge to child during extraction, trajectory is partial"
                    );
                    break;
                }
            }
            node = parent;

            if pieces.len() > arena.len() {
                log_throttle!(
                    1.0,
                    error,
                    "best parent chain longer than the graph during extraction, aborting"
                );
                break;
            }
        }

        Trajectory::concatenate(pieces)
    }
}

///mark the chain from `from` to the nearest already viable ancestor
fn mark_viable_chain<S: States>(arena: &mut NodeArena<S>, from: NodeId) {
    let mut current = Some(from);
    let mut steps = 0;
    while let Some(id) = current {
        if arena[id].is_viable {
            break;
        }
        arena[id].is_viable = true;
        current = arena[id].best_parent;

        steps += 1;
        if steps > arena.len() {
            break;
        }
    }
}

impl<SS: StateSpace> Planner<SS::S> for GraphDynamicPlanner<SS> {
    /// Returns a recursively feasible trajectory from `start` to `goal`,
    /// or a viable loop anchored at `start` when the deadline arrives
    /// first, or an empty trajectory when neither exists yet.
    fn plan(&mut self, start: &SS::S, goal: &SS::S, start_time: f64) -> Trajectory<SS::S> {
        self.stats.reset();
        let timer = Timer::default();

        let mut arena = NodeArena::new();
        let start_id = arena.alloc(Node::root(start.clone(), start_time));
        let goal_id = arena.alloc(Node::terminal(goal.clone()));

        let mut graph = SearchableSet::new(start_id, start.get_vals());
        let mut goals = SearchableSet::new(goal_id, goal.get_vals());

        let deadline = self.clock.now() + self.params.max_runtime;
        let traj = self.recursive_plan(&mut arena, &mut graph, &mut goals, true, deadline);

        self.stats.stat_time_all = timer.dur_ms();
        self.stats.print_stats();
        traj
    }
}
