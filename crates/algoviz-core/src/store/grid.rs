//! The node grid used by the pathfinding visualizer.
//!
//! Nodes live in a row-major arena. Predecessor links are arena indices,
//! so a path is reconstructed by walking indices back from the end node.

use algoviz_types::{AlgorithmKind, GridView, NodeView, StoreView};

use crate::config::{ConfigError, PathfindingConfig};
use crate::error::ControlError;
use crate::store::StateStore;

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridNode {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
    /// Obstacle.
    pub is_wall: bool,
    /// Settled by the search.
    pub is_visited: bool,
    /// On the reconstructed path.
    pub is_path: bool,
    /// Tentative distance from start; `None` is infinity.
    pub distance: Option<u32>,
    /// Arena index of the predecessor on the best known path.
    pub previous: Option<usize>,
}

impl GridNode {
    const fn empty(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            is_wall: false,
            is_visited: false,
            is_path: false,
            distance: None,
            previous: None,
        }
    }

    fn clear_search(&mut self) {
        self.is_visited = false;
        self.is_path = false;
        self.distance = None;
        self.previous = None;
    }
}

/// Row-major node grid with fixed start and end nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridStore {
    rows: usize,
    cols: usize,
    start: usize,
    end: usize,
    nodes: Vec<GridNode>,
}

impl GridStore {
    /// Build an empty grid from validated pathfinding settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the grid is empty, start or end
    /// lie outside it, or they coincide.
    pub fn new(config: &PathfindingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let overflow = || ConfigError::Invalid {
            reason: format!("{}x{} grid is too large", config.rows, config.cols),
        };
        let start = flat_index(config.start.row, config.start.col, config.cols).ok_or_else(overflow)?;
        let end = flat_index(config.end.row, config.end.col, config.cols).ok_or_else(overflow)?;
        config.rows.checked_mul(config.cols).ok_or_else(overflow)?;

        let nodes = (0..config.rows)
            .flat_map(|row| (0..config.cols).map(move |col| GridNode::empty(row, col)))
            .collect();
        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            start,
            end,
            nodes,
        })
    }

    /// Number of rows.
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the grid has no nodes. Never true for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arena index of the start node.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Arena index of the end node.
    pub const fn end(&self) -> usize {
        self.end
    }

    /// The node at an arena index.
    pub fn node(&self, index: usize) -> Option<&GridNode> {
        self.nodes.get(index)
    }

    /// Arena index for `(row, col)`.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::CellOutOfBounds`] outside the grid.
    pub fn index_of(&self, row: usize, col: usize) -> Result<usize, ControlError> {
        let out_of_bounds = ControlError::CellOutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        };
        if row >= self.rows || col >= self.cols {
            return Err(out_of_bounds);
        }
        flat_index(row, col, self.cols).ok_or(out_of_bounds)
    }

    /// Whether the node is an obstacle.
    pub fn is_wall(&self, index: usize) -> bool {
        self.nodes.get(index).is_some_and(|n| n.is_wall)
    }

    /// Whether the node has been settled.
    pub fn is_visited(&self, index: usize) -> bool {
        self.nodes.get(index).is_some_and(|n| n.is_visited)
    }

    /// Tentative distance of the node.
    pub fn distance(&self, index: usize) -> Option<u32> {
        self.nodes.get(index).and_then(|n| n.distance)
    }

    /// Mark a node settled.
    pub fn mark_visited(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.is_visited = true;
        }
    }

    /// Non-wall orthogonal neighbours, in up, down, left, right order.
    pub fn neighbors(&self, index: usize) -> Vec<usize> {
        let Some(node) = self.nodes.get(index) else {
            return Vec::new();
        };
        let (row, col) = (node.row, node.col);
        [
            row.checked_sub(1).map(|r| (r, col)),
            row.checked_add(1).map(|r| (r, col)),
            col.checked_sub(1).map(|c| (row, c)),
            col.checked_add(1).map(|c| (row, c)),
        ]
        .into_iter()
        .flatten()
        .filter_map(|(r, c)| self.index_of(r, c).ok())
        .filter(|&i| !self.is_wall(i))
        .collect()
    }

    /// Offer `to` a path through `from` one step longer than `from`'s.
    ///
    /// Returns `true` if it improved `to`'s distance.
    pub fn relax(&mut self, from: usize, to: usize) -> bool {
        let Some(candidate) = self.distance(from).and_then(|d| d.checked_add(1)) else {
            return false;
        };
        let Some(node) = self.nodes.get_mut(to) else {
            return false;
        };
        if node.distance.is_some_and(|current| current <= candidate) {
            return false;
        }
        node.distance = Some(candidate);
        node.previous = Some(from);
        true
    }

    /// Mark the shortest path by walking predecessors back from the end.
    ///
    /// Returns the path length in edges, or `None` if the end was not
    /// reached.
    pub fn mark_path(&mut self) -> Option<usize> {
        let path = self.path_indices()?;
        for &index in &path {
            if let Some(node) = self.nodes.get_mut(index) {
                node.is_path = true;
            }
        }
        Some(path.len().saturating_sub(1))
    }

    /// Length in edges of the marked or reachable path, if any.
    pub fn path_length(&self) -> Option<usize> {
        self.path_indices().map(|p| p.len().saturating_sub(1))
    }

    /// Arena indices from end back to start, or `None` if unreachable.
    fn path_indices(&self) -> Option<Vec<usize>> {
        self.distance(self.end)?;
        let mut path = vec![self.end];
        let mut current = self.end;
        // A chain longer than the arena would be a cycle.
        while current != self.start && path.len() <= self.nodes.len() {
            current = self.nodes.get(current)?.previous?;
            path.push(current);
        }
        (current == self.start).then_some(path)
    }

    /// Flip the wall state of a cell. Returns the new state.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::CellOutOfBounds`] outside the grid, or
    /// [`ControlError::ProtectedCell`] for the start or end node.
    pub fn toggle_wall(&mut self, row: usize, col: usize) -> Result<bool, ControlError> {
        let index = self.editable_index(row, col)?;
        let wall = !self.is_wall(index);
        self.write_wall(index, wall);
        Ok(wall)
    }

    /// Set the wall state of a cell.
    ///
    /// # Errors
    ///
    /// Same as [`GridStore::toggle_wall`].
    pub fn set_wall(&mut self, row: usize, col: usize, wall: bool) -> Result<(), ControlError> {
        let index = self.editable_index(row, col)?;
        self.write_wall(index, wall);
        Ok(())
    }

    /// Remove every wall along with any visited, path, distance and
    /// predecessor state.
    pub fn clear_walls(&mut self) {
        for node in &mut self.nodes {
            node.is_wall = false;
            node.clear_search();
        }
    }

    /// Reset visited, path, distance and predecessor state. Walls stay.
    pub fn clear_path(&mut self) {
        for node in &mut self.nodes {
            node.clear_search();
        }
    }

    /// Number of wall cells.
    pub fn wall_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_wall).count()
    }

    fn editable_index(&self, row: usize, col: usize) -> Result<usize, ControlError> {
        let index = self.index_of(row, col)?;
        if index == self.start || index == self.end {
            return Err(ControlError::ProtectedCell { row, col });
        }
        Ok(index)
    }

    fn write_wall(&mut self, index: usize, wall: bool) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.is_wall = wall;
            if wall {
                node.clear_search();
            }
        }
    }
}

fn flat_index(row: usize, col: usize, cols: usize) -> Option<usize> {
    row.checked_mul(cols)?.checked_add(col)
}

impl StateStore for GridStore {
    fn input_size(&self) -> usize {
        self.nodes.len()
    }

    fn view(&self) -> StoreView {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| NodeView {
                row: node.row,
                col: node.col,
                is_start: index == self.start,
                is_end: index == self.end,
                is_wall: node.is_wall,
                is_visited: node.is_visited,
                is_path: node.is_path,
                distance: node.distance,
            })
            .collect();
        StoreView::Grid(GridView {
            rows: self.rows,
            cols: self.cols,
            nodes,
        })
    }

    fn prepare(&mut self, _algorithm: AlgorithmKind) -> Result<(), ControlError> {
        self.clear_path();
        if let Some(start) = self.nodes.get_mut(self.start) {
            start.distance = Some(0);
        }
        Ok(())
    }

    fn regenerate(&mut self) {
        self.clear_walls();
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Cell;

    use super::*;

    fn grid() -> GridStore {
        GridStore::new(&PathfindingConfig::default()).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn default_grid_layout() {
        let grid = grid();
        assert_eq!(grid.len(), 375);
        assert_eq!(grid.index_of(7, 5).ok(), Some(grid.start()));
        assert_eq!(grid.index_of(7, 20).ok(), Some(grid.end()));
        let StoreView::Grid(view) = grid.view() else {
            panic!("grid store must project a grid");
        };
        assert_eq!(view.nodes.iter().filter(|n| n.is_start).count(), 1);
        assert_eq!(view.nodes.iter().filter(|n| n.is_end).count(), 1);
    }

    #[test]
    fn start_and_end_are_protected() {
        let mut grid = grid();
        assert_eq!(
            grid.toggle_wall(7, 5),
            Err(ControlError::ProtectedCell { row: 7, col: 5 })
        );
        assert_eq!(
            grid.set_wall(7, 20, true),
            Err(ControlError::ProtectedCell { row: 7, col: 20 })
        );
        assert_eq!(grid.wall_count(), 0);
    }

    #[test]
    fn out_of_bounds_cells_are_rejected() {
        let mut grid = grid();
        assert!(matches!(
            grid.toggle_wall(15, 0),
            Err(ControlError::CellOutOfBounds { rows: 15, cols: 25, .. })
        ));
    }

    #[test]
    fn toggle_flips_and_clear_walls_is_idempotent() {
        let mut grid = grid();
        assert_eq!(grid.toggle_wall(3, 3), Ok(true));
        assert_eq!(grid.toggle_wall(3, 4), Ok(true));
        assert_eq!(grid.toggle_wall(3, 4), Ok(false));
        assert_eq!(grid.wall_count(), 1);

        grid.clear_walls();
        let once = grid.clone();
        grid.clear_walls();
        assert_eq!(grid, once);
        assert_eq!(grid.wall_count(), 0);
    }

    #[test]
    fn neighbors_skip_walls_and_edges() {
        let mut grid = grid();
        let corner = grid.index_of(0, 0).unwrap_or_default();
        let below = grid.index_of(1, 0).unwrap_or_default();
        let right = grid.index_of(0, 1).unwrap_or_default();
        assert_eq!(grid.neighbors(corner), vec![below, right]);

        assert!(grid.set_wall(1, 0, true).is_ok());
        assert_eq!(grid.neighbors(corner), vec![right]);
    }

    #[test]
    fn relax_keeps_shorter_distance() {
        let mut grid = grid();
        assert!(grid.prepare(AlgorithmKind::Dijkstra).is_ok());
        let start = grid.start();
        let next = grid.index_of(7, 6).unwrap_or_default();
        assert!(grid.relax(start, next));
        assert!(!grid.relax(start, next));
        assert_eq!(grid.distance(next), Some(1));
        assert_eq!(grid.node(next).and_then(|n| n.previous), Some(start));
    }

    #[test]
    fn clear_path_keeps_walls() {
        let mut grid = grid();
        assert!(grid.set_wall(2, 2, true).is_ok());
        assert!(grid.prepare(AlgorithmKind::Dijkstra).is_ok());
        grid.mark_visited(grid.start());
        grid.clear_path();
        assert!(!grid.is_visited(grid.start()));
        assert_eq!(grid.distance(grid.start()), None);
        assert_eq!(grid.wall_count(), 1);
    }

    #[test]
    fn unreached_end_has_no_path() {
        let mut grid = grid();
        assert!(grid.prepare(AlgorithmKind::Dijkstra).is_ok());
        assert_eq!(grid.mark_path(), None);
    }

    #[test]
    fn rejects_coincident_endpoints() {
        let config = PathfindingConfig {
            end: Cell { row: 7, col: 5 },
            ..PathfindingConfig::default()
        };
        assert!(GridStore::new(&config).is_err());
    }

    #[test]
    fn clear_walls_drops_search_markers() {
        let mut grid = grid();
        assert!(grid.prepare(AlgorithmKind::Dijkstra).is_ok());
        let start = grid.start();
        let next = grid.index_of(7, 6).unwrap_or_default();
        assert!(grid.relax(start, next));
        grid.mark_visited(next);
        assert!(grid.set_wall(0, 0, true).is_ok());

        grid.clear_walls();
        assert_eq!(grid.wall_count(), 0);
        assert!(!grid.is_visited(next));
        assert_eq!(grid.distance(next), None);
        assert_eq!(grid.node(next).and_then(|n| n.previous), None);
        assert_eq!(grid.distance(start), None);
    }
}
