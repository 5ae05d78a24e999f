use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use instant::{Duration, Instant};
use log::{debug, trace};
use rayon::prelude::*;

use crate::arc::{self, ArcConsistencyResult};
use crate::assignment::Assignment;
use crate::crossword::Crossword;
use crate::domains::Domains;
use crate::{VariableId, WordId};

/// Knobs for the solve pipeline.
///
/// # Examples
///
/// ```
/// use crossword_csp::SolverConfig;
///
/// let config = SolverConfig::new()
///     .with_maintain_arc_consistency(true)
///     .with_parallel(false);
/// assert!(config.arc_consistency);
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Run AC-3 over every arc before search starts.
    pub arc_consistency: bool,

    /// After each tentative binding, propagate its consequences through the domains (and undo
    /// them on backtrack) instead of searching over the fixed pre-search domains.
    pub maintain_arc_consistency: bool,

    /// Try the candidates that rule out the fewest crossing words first. When disabled,
    /// candidates are tried in dictionary order.
    pub least_constraining_value: bool,

    /// Explore the candidates of the first chosen variable on the rayon thread pool, stopping at
    /// the first branch that succeeds. Which solution wins is then not deterministic.
    pub parallel: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            arc_consistency: true,
            maintain_arc_consistency: false,
            least_constraining_value: true,
            parallel: false,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arc_consistency(mut self, enabled: bool) -> Self {
        self.arc_consistency = enabled;
        self
    }

    pub fn with_maintain_arc_consistency(mut self, enabled: bool) -> Self {
        self.maintain_arc_consistency = enabled;
        self
    }

    pub fn with_least_constraining_value(mut self, enabled: bool) -> Self {
        self.least_constraining_value = enabled;
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }
}

/// A struct tracking statistics about the solve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Search nodes entered, i.e. times a variable was selected for branching.
    pub states: u64,
    /// Tentative bindings that were undone.
    pub backtracks: u64,
    /// `revise` calls that removed at least one word.
    pub revisions: u64,
    pub duration: Duration,
}

impl Statistics {
    fn absorb(&mut self, other: &Statistics) {
        self.states += other.states;
        self.backtracks += other.backtracks;
        self.revisions += other.revisions;
    }
}

/// A struct representing the results of a successful solve.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

/// Why a solve found nothing. None of these are errors: each is a proof that the puzzle has no
/// fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No dictionary word has the variable's length.
    NodeConsistency { variable_id: VariableId },
    /// Arc consistency wiped out the variable's domain.
    ArcConsistency { variable_id: VariableId },
    /// Search tried everything.
    Exhausted,
}

#[derive(Debug)]
pub struct FillFailure {
    pub reason: FailureReason,
    pub statistics: Statistics,
}

/// Choose the next variable to branch on: the unassigned variable with the fewest remaining
/// candidates, breaking ties by the highest number of crossings and then by lowest id. Returns
/// `None` once everything is assigned.
pub fn select_unassigned_variable(
    crossword: &Crossword,
    domains: &Domains,
    assignment: &Assignment,
) -> Option<VariableId> {
    crossword
        .variable_ids()
        .filter(|&variable_id| !assignment.is_assigned(variable_id))
        .min_by_key(|&variable_id| {
            (domains.size(variable_id), Reverse(crossword.degree(variable_id)))
        })
}

/// How many words in crossing domains each candidate of `variable_id` would rule out: for every
/// neighbor, the words whose letter on the shared cell differs from the candidate's.
pub fn elimination_counts(
    crossword: &Crossword,
    domains: &Domains,
    variable_id: VariableId,
) -> Vec<(WordId, usize)> {
    // Letter histograms of each neighbor's domain at the crossing cell, so that each candidate
    // can be costed without rescanning the neighbor domains.
    let histograms: Vec<(usize, usize, HashMap<char, usize>)> = crossword
        .crossings(variable_id)
        .iter()
        .map(|crossing| {
            let mut counts: HashMap<char, usize> = HashMap::new();
            for word_id in domains.word_ids(crossing.other_variable_id) {
                if let Some(glyph) = crossword.word(word_id).char_at(crossing.other_cell) {
                    *counts.entry(glyph).or_insert(0) += 1;
                }
            }
            (crossing.cell, domains.size(crossing.other_variable_id), counts)
        })
        .collect();

    domains
        .word_ids(variable_id)
        .map(|word_id| {
            let word = crossword.word(word_id);
            let eliminated = histograms
                .iter()
                .map(|(cell, total, counts)| match word.char_at(*cell) {
                    Some(glyph) => total - counts.get(&glyph).copied().unwrap_or(0),
                    None => *total,
                })
                .sum();
            (word_id, eliminated)
        })
        .collect()
}

/// The candidates of `variable_id` in the order search should try them. With least-constraining
/// value ordering this is ascending by `elimination_counts`, ties kept in dictionary order.
pub fn order_domain_values(
    crossword: &Crossword,
    domains: &Domains,
    variable_id: VariableId,
    least_constraining_value: bool,
) -> Vec<WordId> {
    if !least_constraining_value {
        return domains.word_ids(variable_id).collect();
    }

    let mut costed = elimination_counts(crossword, domains, variable_id);
    costed.sort_by_key(|&(_, eliminated)| eliminated);
    costed.into_iter().map(|(word_id, _)| word_id).collect()
}

/// Live state of one depth-first search. Parallel branches each get their own copy of the
/// domains and the assignment.
struct Search<'a> {
    crossword: &'a Crossword,
    config: &'a SolverConfig,
    domains: &'a mut Domains,
    statistics: Statistics,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Search<'a> {
    fn cancelled(&self) -> bool {
        self.cancel.map(|flag| flag.load(Ordering::Relaxed)).unwrap_or(false)
    }

    /// Extend `assignment` to a complete consistent one, or leave it as it was and return false.
    fn backtrack(&mut self, assignment: &mut Assignment) -> bool {
        if self.cancelled() {
            return false;
        }

        let variable_id =
            match select_unassigned_variable(self.crossword, self.domains, assignment) {
                Some(variable_id) => variable_id,
                None => return assignment.is_complete(self.crossword),
            };
        self.statistics.states += 1;

        let candidates = order_domain_values(
            self.crossword,
            self.domains,
            variable_id,
            self.config.least_constraining_value,
        );

        trace!(
            target: "solver",
            "Branching on {} with {} candidates at depth {}",
            self.crossword.variable(variable_id),
            candidates.len(),
            assignment.len()
        );

        candidates
            .into_iter()
            .any(|word_id| self.try_candidate(assignment, variable_id, word_id))
    }

    /// Bind `variable_id` to `word_id` and search below it. On failure the binding and every
    /// domain change made under it are undone.
    fn try_candidate(
        &mut self,
        assignment: &mut Assignment,
        variable_id: VariableId,
        word_id: WordId,
    ) -> bool {
        if !assignment.is_consistent_with(self.crossword, variable_id, word_id) {
            return false;
        }

        assignment.assign(variable_id, word_id);
        let checkpoint = self.domains.checkpoint();

        if self.propagate_choice(assignment, variable_id, word_id) && self.backtrack(assignment) {
            return true;
        }

        self.domains.rollback(checkpoint);
        assignment.unassign(variable_id);
        self.statistics.backtracks += 1;

        trace!(
            target: "solver",
            "Backtracked {} = {:?}",
            self.crossword.variable(variable_id),
            self.crossword.word(word_id)
        );

        false
    }

    /// With maintained arc consistency enabled, shrink the chosen variable's domain to the chosen
    /// word, drop the word from every other open slot, and run AC-3 from the affected arcs.
    /// Returns false if some domain ran dry.
    fn propagate_choice(
        &mut self,
        assignment: &Assignment,
        variable_id: VariableId,
        word_id: WordId,
    ) -> bool {
        if !self.config.maintain_arc_consistency {
            return true;
        }

        let crossword = self.crossword;
        self.domains.restrict_to(variable_id, word_id);

        let mut arcs: Vec<(VariableId, VariableId)> =
            crossword.neighbors(variable_id).map(|z| (z, variable_id)).collect();

        for other_id in crossword.variable_ids() {
            if other_id == variable_id || assignment.is_assigned(other_id) {
                continue;
            }
            if self.domains.remove(other_id, word_id) {
                if self.domains.is_empty(other_id) {
                    return false;
                }
                arcs.extend(crossword.neighbors(other_id).map(|z| (z, other_id)));
            }
        }

        match arc::propagate(crossword, self.domains, Some(arcs)) {
            Ok(success) => {
                self.statistics.revisions += success.revisions as u64;
                true
            }
            Err(failure) => {
                self.statistics.revisions += failure.revisions as u64;
                false
            }
        }
    }
}

/// Owns the domain store for one puzzle and runs the solve pipeline over it: build initial
/// domains, enforce node consistency, run arc consistency, and search.
///
/// # Examples
///
/// ```
/// use crossword_csp::{Crossword, Direction, Overlap, Solver, SolverConfig, Variable};
///
/// let crossword = Crossword::new(
///     vec![
///         Variable::new(0, 0, Direction::Across, 3),
///         Variable::new(0, 0, Direction::Down, 3),
///     ],
///     [(0, 1, Overlap::new(0, 0))],
///     ["CAT", "COW", "DOG"],
/// )
/// .unwrap();
///
/// let mut solver = Solver::new(&crossword, SolverConfig::default());
/// let fill = solver.solve().expect("puzzle has a fill");
/// assert!(fill.assignment.is_complete(&crossword));
/// ```
#[derive(Debug)]
pub struct Solver<'a> {
    crossword: &'a Crossword,
    config: SolverConfig,
    domains: Domains,
}

impl<'a> Solver<'a> {
    /// Build the initial domain store, with the full dictionary for every variable.
    pub fn new(crossword: &'a Crossword, config: SolverConfig) -> Solver<'a> {
        Solver { crossword, config, domains: Domains::new(crossword) }
    }

    pub fn crossword(&self) -> &'a Crossword {
        self.crossword
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The current domain store, e.g. to inspect what AC-3 left behind.
    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn enforce_node_consistency(&mut self) -> usize {
        self.domains.enforce_node_consistency(self.crossword)
    }

    /// Make `x` arc consistent with `y`. Removals are permanent, as with `ac3`.
    pub fn revise(&mut self, x: VariableId, y: VariableId) -> bool {
        let revised = arc::revise(self.crossword, &mut self.domains, x, y);
        self.domains.commit();
        revised
    }

    /// Run AC-3 from the given arcs, or from every arc if `None`. Removals are permanent.
    pub fn ac3(&mut self, arcs: Option<Vec<(VariableId, VariableId)>>) -> ArcConsistencyResult {
        let result = arc::propagate(self.crossword, &mut self.domains, arcs);
        self.domains.commit();
        result
    }

    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<VariableId> {
        select_unassigned_variable(self.crossword, &self.domains, assignment)
    }

    pub fn order_domain_values(&self, variable_id: VariableId) -> Vec<WordId> {
        order_domain_values(
            self.crossword,
            &self.domains,
            variable_id,
            self.config.least_constraining_value,
        )
    }

    /// Search for a complete extension of `assignment` using the current domains. On success
    /// `assignment` holds the fill; on failure it is left unchanged. Domains are restored to their
    /// state before the call either way.
    pub fn backtrack(&mut self, assignment: &mut Assignment) -> (bool, Statistics) {
        let checkpoint = self.domains.checkpoint();
        let mut search = Search {
            crossword: self.crossword,
            config: &self.config,
            domains: &mut self.domains,
            statistics: Statistics::default(),
            cancel: None,
        };
        let solved = search.backtrack(assignment);
        let statistics = search.statistics;
        self.domains.rollback(checkpoint);
        (solved, statistics)
    }

    /// Fan the candidates of the first variable out over the rayon pool. The first branch to
    /// succeed raises a flag that makes the others give up.
    fn backtrack_parallel(&self, statistics: &mut Statistics) -> Option<Assignment> {
        let crossword = self.crossword;
        let config = &self.config;
        let root_domains = &self.domains;
        let root = Assignment::new(crossword);

        let variable_id = match select_unassigned_variable(crossword, root_domains, &root) {
            Some(variable_id) => variable_id,
            None => return Some(root).filter(|a| a.is_complete(crossword)),
        };
        statistics.states += 1;

        let candidates =
            order_domain_values(crossword, root_domains, variable_id, config.least_constraining_value);
        let found = AtomicBool::new(false);

        let branches: Vec<(Option<Assignment>, Statistics)> = candidates
            .par_iter()
            .map(|&word_id| {
                let mut domains = root_domains.clone();
                let mut assignment = root.clone();
                let mut search = Search {
                    crossword,
                    config,
                    domains: &mut domains,
                    statistics: Statistics::default(),
                    cancel: Some(&found),
                };

                let solved = search.try_candidate(&mut assignment, variable_id, word_id);
                if solved {
                    found.store(true, Ordering::Relaxed);
                }
                (if solved { Some(assignment) } else { None }, search.statistics)
            })
            .collect();

        let mut solution = None;
        for (assignment, branch_statistics) in branches {
            statistics.absorb(&branch_statistics);
            if solution.is_none() {
                solution = assignment;
            }
        }
        solution
    }

    /// Run the whole pipeline. A puzzle without a fill is reported as `Err(FillFailure)` carrying
    /// the reason; this is an ordinary outcome, not a malfunction.
    pub fn solve(&mut self) -> Result<FillSuccess, FillFailure> {
        let start = Instant::now();
        let mut statistics = Statistics::default();

        let fail = |reason: FailureReason,
                    mut statistics: Statistics|
         -> Result<FillSuccess, FillFailure> {
            statistics.duration = start.elapsed();
            debug!(target: "solver", "No solution ({:?}): {:?}", reason, statistics);
            Err(FillFailure { reason, statistics })
        };

        self.enforce_node_consistency();
        if let Some(variable_id) = self.domains.first_empty() {
            return fail(FailureReason::NodeConsistency { variable_id }, statistics);
        }

        if self.config.arc_consistency {
            match self.ac3(None) {
                Ok(success) => {
                    statistics.revisions += success.revisions as u64;
                    debug!(
                        target: "solver",
                        "Arc consistency done after {} revisions ({} words removed)",
                        success.revisions,
                        success.removals
                    );
                }
                Err(failure) => {
                    statistics.revisions += failure.revisions as u64;
                    return fail(
                        FailureReason::ArcConsistency { variable_id: failure.emptied_variable_id },
                        statistics,
                    );
                }
            }
        }

        let solution = if self.config.parallel {
            self.backtrack_parallel(&mut statistics)
        } else {
            let mut assignment = Assignment::new(self.crossword);
            let (solved, search_statistics) = self.backtrack(&mut assignment);
            statistics.absorb(&search_statistics);
            if solved {
                Some(assignment)
            } else {
                None
            }
        };

        match solution {
            Some(assignment) => {
                statistics.duration = start.elapsed();
                debug!(target: "solver", "Solved: {:?}", statistics);
                Ok(FillSuccess { statistics, assignment })
            }
            None => fail(FailureReason::Exhausted, statistics),
        }
    }
}

/// Search for a valid fill for the given puzzle.
pub fn find_fill(
    crossword: &Crossword,
    config: &SolverConfig,
) -> Result<FillSuccess, FillFailure> {
    Solver::new(crossword, config.clone()).solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::validate;
    use crate::crossword::{Overlap, Variable};
    use crate::Direction::{Across, Down};

    fn words(crossword: &Crossword, ids: &[WordId]) -> Vec<String> {
        ids.iter().map(|&id| crossword.word(id).string.clone()).collect()
    }

    /// x: across length 3, y: down length 4, x[0] == y[0]
    fn lcv_crossword(dictionary: &[&str]) -> Crossword {
        Crossword::new(
            vec![Variable::new(0, 0, Across, 3), Variable::new(0, 0, Down, 4)],
            [(0, 1, Overlap::new(0, 0))],
            dictionary.iter().copied(),
        )
        .unwrap()
    }

    #[test]
    fn test_least_constraining_value_tries_cheaper_word_first() {
        // "cat" rules out only "dune"; "dog" rules out "cake", "cone" and "cute".
        let crossword = lcv_crossword(&["cat", "dog", "cake", "cone", "cute", "dune"]);
        let mut solver = Solver::new(&crossword, SolverConfig::default());
        solver.enforce_node_consistency();

        let counts: Vec<(String, usize)> = elimination_counts(&crossword, solver.domains(), 0)
            .into_iter()
            .map(|(id, count)| (crossword.word(id).string.clone(), count))
            .collect();
        assert_eq!(counts, vec![("cat".to_string(), 1), ("dog".to_string(), 3)]);

        assert_eq!(words(&crossword, &solver.order_domain_values(0)), vec!["cat", "dog"]);
    }

    #[test]
    fn test_least_constraining_value_overrides_dictionary_order() {
        // "cat" rules out three words, "dog" only one.
        let crossword = lcv_crossword(&["cat", "dog", "dune", "dime", "doze", "cake"]);
        let mut solver = Solver::new(&crossword, SolverConfig::default());
        solver.enforce_node_consistency();

        assert_eq!(words(&crossword, &solver.order_domain_values(0)), vec!["dog", "cat"]);

        let mut solver = Solver::new(
            &crossword,
            SolverConfig::default().with_least_constraining_value(false),
        );
        solver.enforce_node_consistency();
        assert_eq!(words(&crossword, &solver.order_domain_values(0)), vec!["cat", "dog"]);
    }

    #[test]
    fn test_minimum_remaining_values_beats_degree() {
        // 0: length 4 (five words, two crossings), 1: length 3 (two words, one crossing),
        // 2: length 6 (three words, one crossing)
        let crossword = Crossword::new(
            vec![
                Variable::new(0, 0, Across, 4),
                Variable::new(0, 0, Down, 3),
                Variable::new(0, 3, Down, 6),
            ],
            [(0, 1, Overlap::new(0, 0)), (0, 2, Overlap::new(3, 0))],
            [
                "able", "acid", "aged", "also", "area", "cat", "dog", "abacus", "absent",
                "accept",
            ],
        )
        .unwrap();
        let mut solver = Solver::new(&crossword, SolverConfig::default());
        solver.enforce_node_consistency();
        assert_eq!(solver.domains().size(0), 5);
        assert_eq!(solver.domains().size(1), 2);

        let assignment = Assignment::new(&crossword);

        assert_eq!(solver.select_unassigned_variable(&assignment), Some(1));
    }

    #[test]
    fn test_degree_breaks_domain_size_ties() {
        // 0 and 2 cross only 1; 1 crosses both, so it wins the tie.
        let crossword = Crossword::new(
            vec![
                Variable::new(0, 0, Across, 3),
                Variable::new(0, 2, Down, 3),
                Variable::new(2, 0, Across, 3),
            ],
            [(0, 1, Overlap::new(2, 0)), (2, 1, Overlap::new(2, 2))],
            ["cat", "dog", "cow"],
        )
        .unwrap();
        let mut solver = Solver::new(&crossword, SolverConfig::default());
        solver.enforce_node_consistency();
        let mut assignment = Assignment::new(&crossword);

        assert_eq!(solver.select_unassigned_variable(&assignment), Some(1));

        assignment.assign(1, crossword.word_id("cat").unwrap());
        assert_eq!(solver.select_unassigned_variable(&assignment), Some(0));

        assignment.assign(0, crossword.word_id("dog").unwrap());
        assignment.assign(2, crossword.word_id("cow").unwrap());
        assert_eq!(solver.select_unassigned_variable(&assignment), None);
    }

    #[test]
    fn test_mismatched_crossing_has_no_solution() {
        let crossword = Crossword::new(
            vec![Variable::new(0, 0, Across, 3), Variable::new(0, 1, Down, 3)],
            [(0, 1, Overlap::new(1, 0))],
            ["cat", "car", "dog"],
        )
        .unwrap();

        for config in [
            SolverConfig::default(),
            SolverConfig::default().with_arc_consistency(false),
            SolverConfig::default().with_maintain_arc_consistency(true),
        ] {
            let failure = find_fill(&crossword, &config).unwrap_err();
            assert!(matches!(
                failure.reason,
                FailureReason::ArcConsistency { .. } | FailureReason::Exhausted
            ));
        }

        let failure = find_fill(&crossword, &SolverConfig::default()).unwrap_err();
        assert_eq!(failure.reason, FailureReason::ArcConsistency { variable_id: 0 });

        let failure =
            find_fill(&crossword, &SolverConfig::default().with_arc_consistency(false)).unwrap_err();
        assert_eq!(failure.reason, FailureReason::Exhausted);
    }

    #[test]
    fn test_isolated_variable_is_solved() {
        let crossword =
            Crossword::new(vec![Variable::new(0, 0, Across, 3)], [], ["cat", "dog", "car"])
                .unwrap();

        let fill = find_fill(&crossword, &SolverConfig::default()).unwrap();

        assert!(fill.assignment.is_complete(&crossword));
        assert!(validate(&crossword, &fill.assignment.to_words(&crossword)).is_ok());
    }

    #[test]
    fn test_missing_length_fails_at_node_consistency() {
        let crossword = Crossword::new(
            vec![Variable::new(0, 0, Across, 3), Variable::new(1, 0, Across, 5)],
            [],
            ["cat", "dog"],
        )
        .unwrap();

        let failure = find_fill(&crossword, &SolverConfig::default()).unwrap_err();

        assert_eq!(failure.reason, FailureReason::NodeConsistency { variable_id: 1 });
    }

    #[test]
    fn test_empty_puzzle_is_solved_with_empty_assignment() {
        let crossword = Crossword::new(vec![], [], Vec::<String>::new()).unwrap();

        let fill = find_fill(&crossword, &SolverConfig::default()).unwrap();

        assert!(fill.assignment.is_empty());
        assert!(fill.assignment.is_complete(&crossword));
    }

    #[test]
    fn test_words_are_not_reused() {
        // Two parallel slots and one word that fits both.
        let crossword = Crossword::new(
            vec![Variable::new(0, 0, Across, 3), Variable::new(2, 0, Across, 3)],
            [],
            ["cat"],
        )
        .unwrap();

        for config in [
            SolverConfig::default(),
            SolverConfig::default().with_maintain_arc_consistency(true),
            SolverConfig::default().with_parallel(true),
        ] {
            let failure = find_fill(&crossword, &config).unwrap_err();
            assert_eq!(failure.reason, FailureReason::Exhausted);
        }
    }

    /// BEAR
    /// U..A
    /// SALT
    fn ring() -> Crossword {
        Crossword::new(
            vec![
                Variable::new(0, 0, Across, 4),
                Variable::new(2, 0, Across, 4),
                Variable::new(0, 0, Down, 3),
                Variable::new(0, 3, Down, 3),
            ],
            [
                (0, 2, Overlap::new(0, 0)),
                (0, 3, Overlap::new(3, 0)),
                (1, 2, Overlap::new(0, 2)),
                (1, 3, Overlap::new(3, 2)),
            ],
            ["BEAR", "SALT", "BOAT", "BUS", "RAT", "BAT"],
        )
        .unwrap()
    }

    #[test]
    fn test_ring_is_solved_under_every_config() {
        let crossword = ring();

        for config in [
            SolverConfig::default(),
            SolverConfig::default().with_arc_consistency(false),
            SolverConfig::default().with_least_constraining_value(false),
            SolverConfig::default().with_maintain_arc_consistency(true),
            SolverConfig::default().with_parallel(true),
            SolverConfig::default().with_parallel(true).with_maintain_arc_consistency(true),
        ] {
            let fill = find_fill(&crossword, &config)
                .unwrap_or_else(|failure| panic!("{:?} failed: {:?}", config, failure));
            let words = fill.assignment.to_words(&crossword);

            assert_eq!(validate(&crossword, &words), Ok(()), "{:?}", config);
            assert_eq!(words, vec![Some("BEAR"), Some("SALT"), Some("BUS"), Some("RAT")]);
        }
    }

    #[test]
    fn test_maintained_arc_consistency_is_undone_after_search() {
        let crossword = ring();
        let mut solver = Solver::new(
            &crossword,
            SolverConfig::default()
                .with_arc_consistency(false)
                .with_maintain_arc_consistency(true),
        );

        let fill = solver.solve().unwrap();

        assert_eq!(fill.assignment.word(&crossword, 0), Some("BEAR"));
        assert_eq!(
            solver.domains().words(&crossword, 0).collect::<Vec<_>>(),
            vec!["BEAR", "BOAT", "SALT"]
        );
        assert_eq!(
            solver.domains().words(&crossword, 2).collect::<Vec<_>>(),
            vec!["BAT", "BUS", "RAT"]
        );
    }

    #[test]
    fn test_arc_consistency_alone_can_settle_the_grid() {
        let crossword = ring();
        let mut solver = Solver::new(&crossword, SolverConfig::default());
        solver.enforce_node_consistency();

        assert!(solver.ac3(None).is_ok());

        for (variable_id, expected) in ["BEAR", "SALT", "BUS", "RAT"].iter().enumerate() {
            assert_eq!(
                solver.domains().words(&crossword, variable_id).collect::<Vec<_>>(),
                vec![*expected]
            );
        }
    }

    #[test]
    fn test_statistics_are_reported() {
        let crossword = ring();

        let fill =
            find_fill(&crossword, &SolverConfig::default().with_arc_consistency(false)).unwrap();

        assert!(fill.statistics.states >= 4);
        assert_eq!(fill.statistics.revisions, 0);
    }

    /// x: across length 3, y: down length 3, x[1] == y[0], with a one-letter word in the
    /// dictionary that is too short to reach x's crossing cell.
    fn short_word_crossword() -> Crossword {
        Crossword::new(
            vec![Variable::new(0, 0, Across, 3), Variable::new(0, 1, Down, 3)],
            [(0, 1, Overlap::new(1, 0))],
            ["a", "cat", "ant"],
        )
        .unwrap()
    }

    #[test]
    fn test_ac3_before_node_consistency_drops_short_words() {
        let crossword = short_word_crossword();
        let mut solver = Solver::new(&crossword, SolverConfig::default());

        assert!(solver.ac3(None).is_ok());

        assert_eq!(solver.domains().words(&crossword, 0).collect::<Vec<_>>(), vec!["cat"]);
        assert_eq!(solver.domains().words(&crossword, 1).collect::<Vec<_>>(), vec!["a", "ant"]);
    }

    #[test]
    fn test_order_domain_values_before_node_consistency() {
        let crossword = short_word_crossword();
        let solver = Solver::new(&crossword, SolverConfig::default());

        // "a" and "ant" put no letter or an unmatched one on the crossing, ruling out all three
        // words of y; "cat" rules out only "cat".
        assert_eq!(words(&crossword, &solver.order_domain_values(0)), vec!["cat", "a", "ant"]);
    }

    #[test]
    fn test_revise_removals_are_permanent() {
        let crossword = short_word_crossword();
        let mut solver = Solver::new(&crossword, SolverConfig::default());

        assert!(solver.revise(0, 1));

        assert_eq!(solver.domains().checkpoint(), 0);
        assert_eq!(solver.domains().words(&crossword, 0).collect::<Vec<_>>(), vec!["cat"]);
    }
}
