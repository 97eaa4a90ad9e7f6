//! Incremental grid pathfinding.
//!
//! Searches are queued as tasks and advanced by `Navigator::process`, which
//! spends a fixed node-expansion budget per call. A long search therefore
//! spreads over several ticks instead of stalling one. Each task's callback
//! fires exactly once, on the `process` call that finishes it, unless the
//! task was cancelled first.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::coords::MatrixPosition;
use crate::grid::CollisionGrid;

/// Cost of an orthogonal step; diagonals cost `DIAGONAL_COST`
const STRAIGHT_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;

/// Expansion order. Orthogonal moves come first so ties prefer them.
const NEIGHBORS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

pub type TaskId = u64;

/// Path from start to goal, both included
pub type Path = Vec<MatrixPosition>;

type PathCallback = Box<dyn FnOnce(TaskId, Option<Path>)>;

#[derive(Debug, Clone)]
pub struct PathRequest {
    pub from: MatrixPosition,
    pub to: MatrixPosition,
    pub grid: Rc<CollisionGrid>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
struct ScoredNode {
    position: MatrixPosition,
    f_score: u32,
    h_score: u32,
    /// Insertion order, the final tie-break
    seq: u64,
}

// BinaryHeap is a max-heap, so we reverse the ordering for min-heap behavior
impl Ord for ScoredNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .cmp(&self.f_score)
            .then_with(|| other.h_score.cmp(&self.h_score))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ScoredNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Octile distance
fn heuristic(from: MatrixPosition, to: MatrixPosition) -> u32 {
    let dx = (from.x - to.x).unsigned_abs();
    let dy = (from.y - to.y).unsigned_abs();
    STRAIGHT_COST * dx.max(dy) + (DIAGONAL_COST - STRAIGHT_COST) * dx.min(dy)
}

enum SearchStep {
    Pending,
    Done(Option<Path>),
}

/// Resumable A* over a collision grid
struct Search {
    grid: Rc<CollisionGrid>,
    goal: MatrixPosition,
    open: BinaryHeap<ScoredNode>,
    closed: HashSet<MatrixPosition>,
    g_score: HashMap<MatrixPosition, u32>,
    came_from: HashMap<MatrixPosition, MatrixPosition>,
    seq: u64,
}

impl Search {
    fn new(request: PathRequest) -> Self {
        let mut search = Self {
            grid: request.grid,
            goal: request.to,
            open: BinaryHeap::new(),
            closed: HashSet::new(),
            g_score: HashMap::new(),
            came_from: HashMap::new(),
            seq: 0,
        };

        // An empty open set finishes the search with no path on the first step
        let valid = search.grid.in_bounds(request.from)
            && search.grid.in_bounds(request.to)
            && !search.grid.is_blocked(request.to);
        if valid {
            let h = heuristic(request.from, request.to);
            search.g_score.insert(request.from, 0);
            search.push(request.from, h, h);
        }

        search
    }

    fn push(&mut self, position: MatrixPosition, f_score: u32, h_score: u32) {
        self.open.push(ScoredNode {
            position,
            f_score,
            h_score,
            seq: self.seq,
        });
        self.seq += 1;
    }

    fn can_enter(&self, from: MatrixPosition, dx: i32, dy: i32) -> bool {
        let to = from.offset(dx, dy);
        if self.grid.is_blocked(to) {
            return false;
        }
        // No squeezing diagonally between two blocked corners
        if dx != 0 && dy != 0 {
            return !self.grid.get(from.x + dx, from.y) && !self.grid.get(from.x, from.y + dy);
        }
        true
    }

    /// Expand up to `budget` nodes, decrementing it as it goes
    fn step(&mut self, budget: &mut usize) -> SearchStep {
        while *budget > 0 {
            let Some(current) = self.open.pop() else {
                return SearchStep::Done(None);
            };
            if !self.closed.insert(current.position) {
                continue;
            }
            *budget -= 1;

            if current.position == self.goal {
                return SearchStep::Done(Some(self.reconstruct_path()));
            }

            let current_g = self
                .g_score
                .get(&current.position)
                .copied()
                .unwrap_or(u32::MAX);

            for (dx, dy) in NEIGHBORS {
                if !self.can_enter(current.position, dx, dy) {
                    continue;
                }
                let neighbor = current.position.offset(dx, dy);
                if self.closed.contains(&neighbor) {
                    continue;
                }

                let cost = if dx != 0 && dy != 0 {
                    DIAGONAL_COST
                } else {
                    STRAIGHT_COST
                };
                let tentative_g = current_g.saturating_add(cost);
                let neighbor_g = self.g_score.get(&neighbor).copied().unwrap_or(u32::MAX);

                if tentative_g < neighbor_g {
                    let h = heuristic(neighbor, self.goal);
                    self.came_from.insert(neighbor, current.position);
                    self.g_score.insert(neighbor, tentative_g);
                    self.push(neighbor, tentative_g + h, h);
                }
            }
        }

        SearchStep::Pending
    }

    fn reconstruct_path(&self) -> Path {
        let mut current = self.goal;
        let mut path = vec![current];

        while let Some(&prev) = self.came_from.get(&current) {
            path.push(prev);
            current = prev;
        }

        path.reverse();
        path
    }
}

struct PathTask {
    id: TaskId,
    search: Search,
    callback: PathCallback,
}

/// Queue of pending path searches
pub struct Navigator {
    tasks: VecDeque<PathTask>,
    next_id: TaskId,
    /// Node expansions allowed per `process` call
    budget: usize,
}

impl Navigator {
    pub fn new(budget: usize) -> Self {
        Self {
            tasks: VecDeque::new(),
            next_id: 1,
            budget: budget.max(1),
        }
    }

    /// Queue a search. The callback receives the task id and the path (start
    /// included), or `None` for the path when the target cannot be reached.
    /// It never runs inside this call.
    pub fn create_task(
        &mut self,
        request: PathRequest,
        callback: impl FnOnce(TaskId, Option<Path>) + 'static,
    ) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;

        self.tasks.push_back(PathTask {
            id,
            search: Search::new(request),
            callback: Box::new(callback),
        });

        id
    }

    /// Drop a task. Its callback will not run. Unknown or finished ids are
    /// ignored.
    pub fn cancel_task(&mut self, id: TaskId) {
        self.tasks.retain(|task| task.id != id);
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Advance queued searches in submission order until the budget runs out
    pub fn process(&mut self) {
        puffin::profile_function!();

        let mut budget = self.budget;
        while budget > 0 {
            let Some(task) = self.tasks.front_mut() else {
                break;
            };
            match task.search.step(&mut budget) {
                SearchStep::Pending => break,
                SearchStep::Done(path) => {
                    if let Some(task) = self.tasks.pop_front() {
                        (task.callback)(task.id, path);
                    }
                }
            }
        }
    }
}

/// Run a search to completion on the spot
pub fn find_path(grid: Rc<CollisionGrid>, from: MatrixPosition, to: MatrixPosition) -> Option<Path> {
    let mut search = Search::new(PathRequest { from, to, grid });
    let mut budget = usize::MAX;
    match search.step(&mut budget) {
        SearchStep::Done(path) => path,
        SearchStep::Pending => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn p(x: i32, y: i32) -> MatrixPosition {
        MatrixPosition::new(x, y)
    }

    fn grid(rows: &[&str]) -> Rc<CollisionGrid> {
        Rc::new(CollisionGrid::from_rows(rows))
    }

    #[test]
    fn test_straight_path_includes_start_and_goal() {
        let g = grid(&["....."]);
        let path = find_path(g, p(0, 0), p(4, 0)).unwrap();
        assert_eq!(path, vec![p(0, 0), p(1, 0), p(2, 0), p(3, 0), p(4, 0)]);
    }

    #[test]
    fn test_start_equals_goal() {
        let g = grid(&["..."]);
        assert_eq!(find_path(g, p(1, 0), p(1, 0)), Some(vec![p(1, 0)]));
    }

    #[test]
    fn test_diagonal_is_preferred_over_staircase() {
        let g = grid(&["....", "....", "....", "...."]);
        let path = find_path(g, p(0, 0), p(3, 3)).unwrap();
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_path_goes_around_wall() {
        let g = grid(&[
            ".....", //
            ".###.", //
            ".....",
        ]);
        let path = find_path(Rc::clone(&g), p(0, 1), p(4, 1)).unwrap();
        assert_eq!(path.first(), Some(&p(0, 1)));
        assert_eq!(path.last(), Some(&p(4, 1)));
        assert!(path.iter().all(|step| !g.is_blocked(*step)));
    }

    #[test]
    fn test_no_corner_cutting() {
        let g = grid(&[
            ".#", //
            "#.",
        ]);
        assert_eq!(find_path(g, p(0, 0), p(1, 1)), None);
    }

    #[test]
    fn test_unreachable_returns_none() {
        let g = grid(&[
            "..#..", //
            "..#..", //
            "..#..",
        ]);
        assert_eq!(find_path(g, p(0, 0), p(4, 2)), None);
    }

    #[test]
    fn test_blocked_or_outside_goal_returns_none() {
        let g = grid(&["..#"]);
        assert_eq!(find_path(Rc::clone(&g), p(0, 0), p(2, 0)), None);
        assert_eq!(find_path(g, p(0, 0), p(9, 9)), None);
    }

    #[test]
    fn test_identical_requests_give_identical_paths() {
        let rows = [
            "..........",
            "..#####...",
            "......#...",
            "..#...#...",
            "..#.......",
        ];
        let a = find_path(grid(&rows), p(0, 0), p(9, 4));
        let b = find_path(grid(&rows), p(0, 0), p(9, 4));
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn test_callback_runs_once_on_a_later_process() {
        let mut navigator = Navigator::new(1000);
        let calls = Rc::new(Cell::new(0));
        let result = Rc::new(RefCell::new(None));

        let c = Rc::clone(&calls);
        let r = Rc::clone(&result);
        let request = PathRequest {
            from: p(0, 0),
            to: p(3, 0),
            grid: grid(&["...."]),
        };
        let id = navigator.create_task(request, move |_, path| {
            c.set(c.get() + 1);
            *r.borrow_mut() = path;
        });

        assert_eq!(calls.get(), 0);
        assert!(navigator.is_pending(id));

        navigator.process();
        navigator.process();
        assert_eq!(calls.get(), 1);
        assert_eq!(result.borrow().as_ref().map(|path| path.len()), Some(4));
        assert!(!navigator.is_pending(id));
    }

    #[test]
    fn test_search_is_spread_across_calls() {
        let mut navigator = Navigator::new(2);
        let done = Rc::new(Cell::new(false));
        let d = Rc::clone(&done);
        let request = PathRequest {
            from: p(0, 0),
            to: p(9, 0),
            grid: grid(&[".........."]),
        };
        navigator.create_task(request, move |_, path| d.set(path.is_some()));

        navigator.process();
        assert!(!done.get());

        for _ in 0..20 {
            navigator.process();
        }
        assert!(done.get());
        assert_eq!(navigator.pending_count(), 0);
    }

    #[test]
    fn test_failed_search_reports_none() {
        let mut navigator = Navigator::new(100);
        let result = Rc::new(RefCell::new(Some(Vec::new())));
        let r = Rc::clone(&result);
        let request = PathRequest {
            from: p(0, 0),
            to: p(2, 0),
            grid: grid(&[".#."]),
        };
        navigator.create_task(request, move |_, path| *r.borrow_mut() = path);
        navigator.process();
        assert_eq!(*result.borrow(), None);
    }

    #[test]
    fn test_cancelled_task_never_calls_back() {
        let mut navigator = Navigator::new(1);
        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        let request = PathRequest {
            from: p(0, 0),
            to: p(5, 0),
            grid: grid(&["......"]),
        };
        let id = navigator.create_task(request, move |_, _| f.set(true));

        navigator.process();
        navigator.cancel_task(id);
        for _ in 0..20 {
            navigator.process();
        }

        assert!(!fired.get());
        // cancelling again is harmless
        navigator.cancel_task(id);
    }

    #[test]
    fn test_tasks_run_in_submission_order() {
        let mut navigator = Navigator::new(10_000);
        let order = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let o = Rc::clone(&order);
            let request = PathRequest {
                from: p(0, 0),
                to: p(2, 0),
                grid: grid(&["..."]),
            };
            navigator.create_task(request, move |_, _| o.borrow_mut().push(i));
        }
        navigator.process();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }
}
