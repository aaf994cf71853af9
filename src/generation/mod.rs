//! Core dungeon generation steps
//!
//! Each step works on a [`Grid`] in place and draws from an injected
//! random source:
//!
//! 1. [`place_rooms`] proposes non-overlapping rooms
//! 2. [`carve_rooms`] opens them, one region per room
//! 3. A [`Connectivity`] strategy joins everything up: either
//!    [`fill_maze`] + [`connect_regions`] + [`remove_dead_ends`], or
//!    [`connect_rooms_with_net`] over a Delaunay net of room centres

mod connector;
mod delaunay;
mod maze;
mod rooms;
mod strategy;
mod trim;
mod union_find;

pub use connector::{connect_regions, find_connectors, ConnectionReport, Connector};
pub use delaunay::{
    carve_corridor, connect_rooms_with_net, net_from_points, net_from_triangles, room_net,
    triangulate,
};
pub use maze::{fill_maze, grow_maze};
pub use rooms::{place_rooms, RoomPolicy, RoomSampling, MAX_ROOM_EXTENT, MIN_ROOM_SPAN};
pub use strategy::{
    Connectivity, ConnectionSummary, DelaunayConnectivity, MazeConnectivity, Stage, Stages,
};
pub use trim::{is_dead_end, remove_dead_ends};
pub use union_find::UnionFind;

use crate::grid::Grid;
use crate::room::Room;

/// Carve every room into `grid` with a fresh region id each
///
/// Returns the region ids in room order.
pub fn carve_rooms(grid: &mut Grid, rooms: &[Room]) -> Vec<u32> {
    rooms
        .iter()
        .map(|room| {
            let region = grid.new_region();
            grid.carve_room(room, region);
            region
        })
        .collect()
}
