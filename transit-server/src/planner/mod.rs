//! Station-to-station route finding.
//!
//! Adjacency is implied by shared trips: a station's neighbours are the
//! stations one stop position later on any trip that visits it. Search is a
//! breadth-first walk over that implicit graph, either scanning the schedule
//! on demand or reading a precomputed [`AdjacencyIndex`].

mod adjacency;
mod bfs;
mod neighbors;
mod path;


pub use adjacency::AdjacencyIndex;
pub use bfs::{PathError, PathFinder, find_path};
pub use neighbors::{NeighborSource, ScanNeighbors, find_neighbors, successor};
pub use path::{Path, PathStop};
