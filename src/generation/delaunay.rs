//! Delaunay connectivity net
//!
//! An alternative to maze filling: triangulate the room centres with an
//! incremental Bowyer-Watson pass inside a large outer triangle, keep every
//! edge that does not touch an outer vertex, and carve one straight or
//! L-shaped corridor per remaining edge.
//!
//! # Algorithm
//!
//! 1. Start from the outer triangle alone
//! 2. Insert the points in random order. For each point, collect the
//!    triangles whose circumcircle strictly contains it (the cavity)
//! 3. Edges owned by exactly one cavity triangle form the cavity boundary;
//!    the cavity triangles are removed and each boundary edge is joined to
//!    the new point
//! 4. The net is every remaining edge with no outer vertex
//!
//! The cavity is grown outward from the triangle covering the point, so it
//! stays connected even when rounding makes near-cocircular tests disagree.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use glam::IVec2;
use rand::Rng;

use crate::error::{DungeonError, Result};
use crate::geometry::{Line, Point, Triangle};
use crate::grid::Grid;
use crate::room::Room;

/// Bowyer-Watson triangulation of `points` inside `outer`
///
/// Repeated points are inserted once. The returned triangles include those
/// sharing a vertex with `outer`.
///
/// # Errors
///
/// Returns `DegenerateGeometry` if a point does not lie strictly inside
/// `outer`, or if rounding leaves a point with no cavity or a collinear
/// replacement triangle.
pub fn triangulate<R: Rng + ?Sized>(
    points: &[Point],
    outer: Triangle,
    rng: &mut R,
) -> Result<Vec<Triangle>> {
    let mut seen = HashSet::new();
    let mut pending: Vec<Point> = points.iter().copied().filter(|p| seen.insert(*p)).collect();

    if let Some(stray) = pending.iter().find(|p| !outer.contains(**p)) {
        return Err(DungeonError::DegenerateGeometry(format!(
            "point ({}, {}) lies outside the outer triangle",
            stray.x, stray.y
        )));
    }

    let mut triangles = vec![outer];

    while !pending.is_empty() {
        let point = pending.swap_remove(rng.gen_range(0..pending.len()));
        let cavity = cavity(&triangles, point);
        if cavity.is_empty() {
            return Err(DungeonError::DegenerateGeometry(format!(
                "no circumcircle contains ({}, {})",
                point.x, point.y
            )));
        }

        let mut owners: HashMap<Line, usize> = HashMap::new();
        for &i in &cavity {
            for edge in triangles[i].edges() {
                *owners.entry(edge).or_insert(0) += 1;
            }
        }

        let mut rebuilt = Vec::with_capacity(cavity.len() + 2);
        for &i in &cavity {
            for edge in triangles[i].edges() {
                if owners[&edge] == 1 {
                    rebuilt.push(Triangle::new(edge.a(), edge.b(), point)?);
                }
            }
        }

        let mut index = 0;
        triangles.retain(|_| {
            let keep = cavity.binary_search(&index).is_err();
            index += 1;
            keep
        });
        triangles.extend(rebuilt);
    }

    Ok(triangles)
}

/// Indices (ascending) of the triangles whose circumcircle contains `point`,
/// reached through shared edges from the triangles covering it
fn cavity(triangles: &[Triangle], point: Point) -> Vec<usize> {
    let mut by_edge: HashMap<Line, Vec<usize>> = HashMap::new();
    for (i, tri) in triangles.iter().enumerate() {
        for edge in tri.edges() {
            by_edge.entry(edge).or_default().push(i);
        }
    }

    let mut in_cavity = vec![false; triangles.len()];
    let mut stack: Vec<usize> = Vec::new();
    for (i, tri) in triangles.iter().enumerate() {
        if tri.covers(point) && tri.in_circumcircle(point) {
            in_cavity[i] = true;
            stack.push(i);
        }
    }
    // A point on a shared edge can round outside both neighbours
    if stack.is_empty() {
        for (i, tri) in triangles.iter().enumerate() {
            if tri.in_circumcircle(point) {
                in_cavity[i] = true;
                stack.push(i);
            }
        }
    }

    while let Some(i) = stack.pop() {
        for edge in triangles[i].edges() {
            for &j in &by_edge[&edge] {
                if !in_cavity[j] && triangles[j].in_circumcircle(point) {
                    in_cavity[j] = true;
                    stack.push(j);
                }
            }
        }
    }

    (0..triangles.len()).filter(|&i| in_cavity[i]).collect()
}

/// Deduplicated edges of `triangles` that touch no vertex of `outer`
pub fn net_from_triangles(triangles: &[Triangle], outer: &Triangle) -> HashSet<Line> {
    triangles
        .iter()
        .flat_map(|tri| tri.edges())
        .filter(|edge| !outer.has_vertex(edge.a()) && !outer.has_vertex(edge.b()))
        .collect()
}

/// Triangulate `points` and reduce the result to its connectivity net
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use rust_maze_dungeon::generation::net_from_points;
/// use rust_maze_dungeon::geometry::{Point, Triangle};
///
/// let points = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(2.0, 4.0)];
/// let outer = Triangle::new(
///     Point::new(-100.0, -100.0),
///     Point::new(500.0, -100.0),
///     Point::new(-100.0, 500.0),
/// )
/// .unwrap();
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let net = net_from_points(&points, outer, &mut rng).unwrap();
/// assert_eq!(net.len(), 3);
/// ```
pub fn net_from_points<R: Rng + ?Sized>(
    points: &[Point],
    outer: Triangle,
    rng: &mut R,
) -> Result<HashSet<Line>> {
    let triangles = triangulate(points, outer, rng)?;
    Ok(net_from_triangles(&triangles, &outer))
}

/// Room-index pairs `(i, j)` with `i < j` joined by the net over room centres
///
/// The pairs are sorted so carving order does not depend on hash order.
/// Rooms sharing a centre are linked to the first room with that centre.
pub fn room_net<R: Rng + ?Sized>(
    rooms: &[Room],
    width: usize,
    height: usize,
    rng: &mut R,
) -> Result<Vec<(usize, usize)>> {
    let start = Instant::now();
    let mut links = Vec::new();
    let mut index: HashMap<Point, usize> = HashMap::with_capacity(rooms.len());
    let mut centres = Vec::with_capacity(rooms.len());

    for (i, room) in rooms.iter().enumerate() {
        let centre = room.centre();
        match index.get(&centre) {
            Some(&first) => links.push((first, i)),
            None => {
                index.insert(centre, i);
                centres.push(centre);
            }
        }
    }

    if centres.len() >= 2 {
        let outer = Triangle::enclosing(width as f64, height as f64)?;
        let triangles = triangulate(&centres, outer, rng)?;
        let net = net_from_triangles(&triangles, &outer);

        log::debug!(
            "[delaunay] {} triangles, {} net edges over {} rooms",
            triangles.len(),
            net.len(),
            rooms.len()
        );

        links.extend(net.iter().filter_map(|line| {
            let a = *index.get(&line.a())?;
            let b = *index.get(&line.b())?;
            Some((a.min(b), a.max(b)))
        }));
    }

    links.sort_unstable();
    links.dedup();

    log::debug!("[delaunay] {} room links in {:?}", links.len(), start.elapsed());

    Ok(links)
}

/// Carve a corridor between two rooms, labelling new cells `region`
///
/// In order of preference: a vertical corridor at a random shared column,
/// a horizontal corridor at a random shared row, or an L-shaped corridor
/// turning at a random column of `a` and a random row of `b`. Only wall
/// cells are carved, so room labels are left alone.
///
/// Returns the number of cells carved.
pub fn carve_corridor<R: Rng + ?Sized>(
    grid: &mut Grid,
    a: &Room,
    b: &Room,
    region: u32,
    rng: &mut R,
) -> usize {
    let (from, to) = (a.centre_cell(), b.centre_cell());

    if let Some((lo, hi)) = a.x_overlap(b) {
        let x = rng.gen_range(lo..hi);
        carve_vertical(grid, x, from.y, to.y, region)
    } else if let Some((lo, hi)) = a.y_overlap(b) {
        let y = rng.gen_range(lo..hi);
        carve_horizontal(grid, y, from.x, to.x, region)
    } else {
        let x = rng.gen_range(a.x1()..a.x2());
        let y = rng.gen_range(b.y1()..b.y2());
        carve_vertical(grid, x, from.y, y, region) + carve_horizontal(grid, y, x, to.x, region)
    }
}

fn carve_vertical(grid: &mut Grid, x: i32, y0: i32, y1: i32, region: u32) -> usize {
    (y0.min(y1)..=y0.max(y1))
        .map(|y| carve_if_wall(grid, IVec2::new(x, y), region))
        .filter(|&carved| carved)
        .count()
}

fn carve_horizontal(grid: &mut Grid, y: i32, x0: i32, x1: i32, region: u32) -> usize {
    (x0.min(x1)..=x0.max(x1))
        .map(|x| carve_if_wall(grid, IVec2::new(x, y), region))
        .filter(|&carved| carved)
        .count()
}

fn carve_if_wall(grid: &mut Grid, pos: IVec2, region: u32) -> bool {
    if grid.in_bounds(pos) && grid.is_wall(pos) {
        grid.carve(pos, region);
        true
    } else {
        false
    }
}

/// Join `rooms` (already carved into `grid`) with one corridor per net edge
///
/// Every corridor gets a fresh region id. Returns the room links carved.
pub fn connect_rooms_with_net<R: Rng + ?Sized>(
    grid: &mut Grid,
    rooms: &[Room],
    rng: &mut R,
) -> Result<Vec<(usize, usize)>> {
    let start = Instant::now();
    let links = room_net(rooms, grid.width(), grid.height(), rng)?;

    let mut carved = 0;
    for &(i, j) in &links {
        let region = grid.new_region();
        carved += carve_corridor(grid, &rooms[i], &rooms[j], region, rng);
    }

    log::debug!(
        "[corridors] {} corridors, {} cells carved in {:?}",
        links.len(),
        carved,
        start.elapsed()
    );

    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::rooms::{place_rooms, RoomPolicy};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn outer() -> Triangle {
        Triangle::new(
            Point::new(-100.0, -100.0),
            Point::new(500.0, -100.0),
            Point::new(-100.0, 500.0),
        )
        .unwrap()
    }

    #[test]
    fn test_three_points_form_one_triangle() {
        let (a, b, c) = (Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(2.0, 4.0));
        let outer = outer();

        for seed in 0..6 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let net = net_from_points(&[a, b, c], outer, &mut rng).unwrap();

            let expected: HashSet<Line> =
                [Line::new(a, b), Line::new(b, c), Line::new(c, a)].into_iter().collect();
            assert_eq!(net, expected);
            for edge in &net {
                for v in outer.vertices() {
                    assert!(!edge.touches(v));
                }
            }
        }
    }

    #[test]
    fn test_collinear_points_give_a_path() {
        let (a, b, c) = (Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(4.0, 0.0));
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let net = net_from_points(&[a, b, c], outer(), &mut rng).unwrap();

        assert_eq!(net.len(), 2);
        assert!(net.contains(&Line::new(a, b)));
        assert!(net.contains(&Line::new(b, c)));
    }

    #[test]
    fn test_repeated_points_are_inserted_once() {
        let points = [
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(3.0, 1.0),
            Point::new(2.0, 3.0),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let net = net_from_points(&points, outer(), &mut rng).unwrap();
        assert_eq!(net.len(), 3);
    }

    #[test]
    fn test_point_outside_outer_triangle_is_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let result = triangulate(&[Point::new(1000.0, 1000.0)], outer(), &mut rng);
        assert!(matches!(result, Err(DungeonError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_triangulation_is_delaunay() {
        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let points: Vec<Point> = (0..40)
                .map(|_| Point::new(rng.gen_range(0.0..60.0), rng.gen_range(0.0..40.0)))
                .collect();

            let triangles = triangulate(&points, outer(), &mut rng).unwrap();

            for tri in &triangles {
                let circle = tri.circumcircle();
                for &p in &points {
                    if tri.has_vertex(p) {
                        continue;
                    }
                    let d2 = circle.center.distance_squared(p);
                    assert!(
                        d2 >= circle.radius_squared * (1.0 - 1e-9),
                        "seed {}: ({}, {}) inside circumcircle",
                        seed,
                        p.x,
                        p.y
                    );
                }
            }
        }
    }

    #[test]
    fn test_lattice_centres_triangulate() {
        // Cocircular quadruples everywhere
        let points: Vec<Point> = (0..6)
            .flat_map(|y| {
                (0..6).map(move |x| Point::new(x as f64 * 4.0 + 2.5, y as f64 * 4.0 + 2.5))
            })
            .collect();
        let outer = Triangle::enclosing(30.0, 30.0).unwrap();

        for seed in 0..4 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let net = net_from_points(&points, outer, &mut rng).unwrap();
            // A triangulated 6x6 lattice has at least its 60 grid edges
            assert!(net.len() >= 60, "seed {}: only {} edges", seed, net.len());
        }
    }

    #[test]
    fn test_room_net_pairs_are_sorted() {
        let rooms = vec![
            Room::new(1, 1, 4, 4).unwrap(),
            Room::new(10, 1, 13, 4).unwrap(),
            Room::new(5, 10, 8, 13).unwrap(),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let links = room_net(&rooms, 15, 15, &mut rng).unwrap();
        assert_eq!(links, vec![(0, 1), (0, 2), (1, 2)]);

        assert!(room_net(&rooms[..1], 15, 15, &mut rng).unwrap().is_empty());
        assert!(room_net(&[], 15, 15, &mut rng).unwrap().is_empty());
    }

    fn carve_pair(a: Room, b: Room, seed: u64) -> (Grid, usize) {
        let mut grid = Grid::new(21, 21);
        let ra = grid.new_region();
        let rb = grid.new_region();
        grid.carve_room(&a, ra);
        grid.carve_room(&b, rb);

        let region = grid.new_region();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let carved = carve_corridor(&mut grid, &a, &b, region, &mut rng);

        for cell in a.cells() {
            assert_eq!(grid.get(cell), Some(ra));
        }
        for cell in b.cells() {
            assert_eq!(grid.get(cell), Some(rb));
        }
        (grid, carved)
    }

    #[test]
    fn test_vertical_corridor_for_shared_columns() {
        let a = Room::new(2, 1, 7, 4).unwrap();
        let b = Room::new(5, 12, 10, 16).unwrap();
        let (grid, carved) = carve_pair(a, b, 1);

        // Rows 4..=11 between the rooms
        assert_eq!(carved, 8);
        assert!(grid.is_connected());
    }

    #[test]
    fn test_horizontal_corridor_for_shared_rows() {
        let a = Room::new(1, 2, 4, 8).unwrap();
        let b = Room::new(14, 6, 18, 12).unwrap();
        let (grid, carved) = carve_pair(a, b, 2);

        assert_eq!(carved, 10);
        assert!(grid.is_connected());
    }

    #[test]
    fn test_l_shaped_corridor_for_diagonal_rooms() {
        let a = Room::new(1, 1, 4, 4).unwrap();
        let b = Room::new(12, 12, 16, 16).unwrap();
        for seed in 0..10 {
            let (grid, carved) = carve_pair(a, b, seed);
            assert!(carved > 0);
            assert!(grid.is_connected(), "seed {} left rooms apart", seed);
        }
    }

    #[test]
    fn test_net_connects_placed_rooms() {
        for seed in 0..12 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut grid = Grid::new(61, 41);
            let rooms = place_rooms(61, 41, &RoomPolicy::scattered(), &mut rng);
            for room in &rooms {
                let region = grid.new_region();
                grid.carve_room(room, region);
            }

            let links = connect_rooms_with_net(&mut grid, &rooms, &mut rng).unwrap();

            assert!(rooms.len() < 2 || !links.is_empty());
            assert!(grid.is_connected(), "seed {} left rooms apart", seed);
        }
    }
}
