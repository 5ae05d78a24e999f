use std::collections::{HashSet, VecDeque};

use log::{debug, trace};

use crate::crossword::Crossword;
use crate::domains::Domains;
use crate::{VariableId, WordId};

/// Data structure used in `propagate` to track which arcs still need revising. Arcs come out in
/// the order they went in; an arc that is already waiting is not queued a second time.
#[derive(Debug)]
struct ArcQueue {
    queue: VecDeque<(VariableId, VariableId)>,
    queued: HashSet<(VariableId, VariableId)>,
}

impl ArcQueue {
    fn new() -> ArcQueue {
        ArcQueue { queue: VecDeque::new(), queued: HashSet::new() }
    }

    fn with_initial_queue<Items>(items: Items) -> ArcQueue
    where
        Items: IntoIterator<Item = (VariableId, VariableId)>,
    {
        let mut queue = ArcQueue::new();
        for (x, y) in items {
            queue.enqueue(x, y);
        }
        queue
    }

    fn pop_front(&mut self) -> Option<(VariableId, VariableId)> {
        let arc = self.queue.pop_front()?;
        self.queued.remove(&arc);
        Some(arc)
    }

    fn enqueue(&mut self, x: VariableId, y: VariableId) {
        if self.queued.insert((x, y)) {
            self.queue.push_back((x, y));
        }
    }
}

/// Results from a call to `propagate`. Either way the domains are left at the point propagation
/// reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many `revise` calls actually removed something.
    pub revisions: usize,
    /// How many words were removed across all domains.
    pub removals: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    /// The variable whose domain was wiped out.
    pub emptied_variable_id: VariableId,
    pub revisions: usize,
    pub removals: usize,
}

pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Make `x` arc consistent with `y`: drop every word from `x`'s domain whose letter at the
/// crossing doesn't appear at the matching position of any word left in `y`'s domain. Returns
/// whether anything was removed. Variables that don't cross never constrain each other.
pub fn revise(crossword: &Crossword, domains: &mut Domains, x: VariableId, y: VariableId) -> bool {
    revise_counting(crossword, domains, x, y) > 0
}

fn revise_counting(
    crossword: &Crossword,
    domains: &mut Domains,
    x: VariableId,
    y: VariableId,
) -> usize {
    let overlap = match crossword.overlap(x, y) {
        Some(overlap) => overlap,
        None => return 0,
    };

    // Letters that some remaining word of `y` places on the shared cell.
    let supported: HashSet<char> = domains
        .word_ids(y)
        .filter_map(|word_id| crossword.word(word_id).char_at(overlap.second))
        .collect();

    // A word too short to reach the crossing has no letter there, so nothing supports it.
    let unsupported: Vec<WordId> = domains
        .word_ids(x)
        .filter(|&word_id| match crossword.word(word_id).char_at(overlap.first) {
            Some(glyph) => !supported.contains(&glyph),
            None => true,
        })
        .collect();

    for &word_id in &unsupported {
        domains.remove(x, word_id);
    }

    if !unsupported.is_empty() {
        trace!(
            target: "solver",
            "Revised {} against {}: removed {} words, {} left",
            x,
            y,
            unsupported.len(),
            domains.size(x)
        );
    }

    unsupported.len()
}

/// Every ordered pair of distinct variables, which is the starting worklist when no arcs are
/// given.
pub fn all_arcs(crossword: &Crossword) -> Vec<(VariableId, VariableId)> {
    crossword
        .variable_ids()
        .flat_map(|x| crossword.variable_ids().filter(move |&y| y != x).map(move |y| (x, y)))
        .collect()
}

/// AC-3. Revise arcs from a FIFO worklist until nothing changes. Whenever `x` shrinks, every arc
/// `(z, x)` for the other neighbors `z` of `x` is queued again, since their support may have been
/// in the words just removed. Stops early, reporting the variable, as soon as a domain becomes
/// empty.
///
/// `arcs` seeds the worklist; `None` means every ordered pair of distinct variables.
pub fn propagate(
    crossword: &Crossword,
    domains: &mut Domains,
    arcs: Option<Vec<(VariableId, VariableId)>>,
) -> ArcConsistencyResult {
    let mut queue = ArcQueue::with_initial_queue(arcs.unwrap_or_else(|| all_arcs(crossword)));
    let mut revisions = 0;
    let mut removals = 0;

    while let Some((x, y)) = queue.pop_front() {
        let removed = revise_counting(crossword, domains, x, y);
        if removed == 0 {
            continue;
        }

        revisions += 1;
        removals += removed;

        if domains.is_empty(x) {
            debug!(
                target: "solver",
                "Arc consistency emptied the domain of {} after {} revisions",
                crossword.variable(x),
                revisions
            );
            return Err(ArcConsistencyFailure { emptied_variable_id: x, revisions, removals });
        }

        for z in crossword.neighbors(x) {
            if z != y {
                queue.enqueue(z, x);
            }
        }
    }

    Ok(ArcConsistencySuccess { revisions, removals })
}
