//! Room placement by rejection sampling
//!
//! Random rectangles are proposed and rejected until they satisfy the
//! policy's span, aspect-ratio, area and spacing constraints. Both
//! placement styles are expressed through one [`RoomPolicy`]:
//!
//! - **Scattered**: a fixed number of slots, each retried a bounded number
//!   of times, with free corner coordinates and a random area ceiling that
//!   biases towards small rooms.
//! - **Aligned**: a single attempt budget, origins on odd coordinates and
//!   odd side lengths so rooms line up with the maze's 2-cell stride.
//!
//! Placement never fails: when sampling keeps getting rejected, fewer
//! rooms are returned.

use std::time::Instant;

use rand::Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DungeonError, Result};
use crate::room::Room;

/// Smallest accepted room width or height
pub const MIN_ROOM_SPAN: i32 = 2;

/// Upper bound on `max_room_size` and `padding`
pub const MAX_ROOM_EXTENT: i32 = 1 << 16;

/// How candidate rooms are budgeted
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomSampling {
    /// Try to fill `slots` rooms, giving each up to `attempts_per_slot` candidates
    PerSlot {
        slots: usize,
        attempts_per_slot: usize,
    },
    /// Propose `attempts` candidates in total, keeping every one that fits
    Budget { attempts: usize },
}

/// Constraints applied to every candidate room
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomPolicy {
    pub sampling: RoomSampling,
    /// Odd origins and odd side lengths
    pub aligned: bool,
    /// Size scale for aligned rooms: sides are `int(r² * max_room_size) * 2 + 3`
    pub max_room_size: i32,
    /// Minimum width and height in cells
    pub min_span: i32,
    /// Lowest accepted width / height ratio
    pub min_aspect: f64,
    /// Highest accepted width / height ratio
    pub max_aspect: f64,
    /// Reject rooms larger than `r^bias * width * height` for a fresh random `r`
    pub area_bias: Option<i32>,
    /// Cells each room is grown by before the overlap test
    pub padding: i32,
}

impl RoomPolicy {
    /// Fixed-count sampling: 20 slots, 100 attempts each, free placement
    pub fn scattered() -> Self {
        Self {
            sampling: RoomSampling::PerSlot {
                slots: 20,
                attempts_per_slot: 100,
            },
            aligned: false,
            max_room_size: 0,
            min_span: 4,
            min_aspect: 0.2,
            max_aspect: 5.0,
            area_bias: Some(4),
            padding: 0,
        }
    }

    /// Attempt-bounded sampling aligned to the maze grid
    ///
    /// Rooms separated by a single wall cell are treated as intersecting so
    /// a corridor always has room to run between them.
    pub fn aligned(attempts: usize) -> Self {
        Self {
            sampling: RoomSampling::Budget { attempts },
            aligned: true,
            max_room_size: 4,
            min_span: 3,
            min_aspect: 0.1,
            max_aspect: 10.0,
            area_bias: None,
            padding: 1,
        }
    }

    /// Upper bound on the number of candidates proposed
    pub fn total_attempts(&self) -> usize {
        match self.sampling {
            RoomSampling::PerSlot {
                slots,
                attempts_per_slot,
            } => slots.saturating_mul(attempts_per_slot),
            RoomSampling::Budget { attempts } => attempts,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.min_aspect > 0.0 && self.min_aspect <= self.max_aspect) {
            return Err(DungeonError::InvalidConfig(format!(
                "room aspect bounds must satisfy 0 < min <= max (got {}..{})",
                self.min_aspect, self.max_aspect
            )));
        }
        // A one-cell-wide room has dead-end cells the trimmer would fill
        if self.min_span < MIN_ROOM_SPAN {
            return Err(DungeonError::InvalidConfig(format!(
                "minimum room span must be >= {} (got {})",
                MIN_ROOM_SPAN, self.min_span
            )));
        }
        if self.aligned && !(0..=MAX_ROOM_EXTENT).contains(&self.max_room_size) {
            return Err(DungeonError::InvalidConfig(format!(
                "max room size must be in 0..={} (got {})",
                MAX_ROOM_EXTENT, self.max_room_size
            )));
        }
        if !(0..=MAX_ROOM_EXTENT).contains(&self.padding) {
            return Err(DungeonError::InvalidConfig(format!(
                "room padding must be in 0..={} (got {})",
                MAX_ROOM_EXTENT, self.padding
            )));
        }
        Ok(())
    }
}

impl Default for RoomPolicy {
    fn default() -> Self {
        Self::aligned(200)
    }
}

/// Place non-overlapping rooms inside a `width` x `height` grid
///
/// The outer ring of the grid is never covered by a room.
///
/// # Arguments
///
/// * `width`, `height` - Grid dimensions in cells
/// * `policy` - Sampling budget and acceptance constraints
/// * `rng` - Random source
///
/// # Returns
///
/// Accepted rooms in acceptance order (possibly empty)
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use rust_maze_dungeon::generation::{place_rooms, RoomPolicy};
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let rooms = place_rooms(41, 31, &RoomPolicy::aligned(200), &mut rng);
/// for (i, a) in rooms.iter().enumerate() {
///     for b in &rooms[i + 1..] {
///         assert!(!a.intersects(b));
///     }
/// }
/// ```
pub fn place_rooms<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    policy: &RoomPolicy,
    rng: &mut R,
) -> Vec<Room> {
    let start = Instant::now();
    let mut rooms = Vec::new();

    if width < 3 || height < 3 {
        return rooms;
    }

    match policy.sampling {
        RoomSampling::PerSlot {
            slots,
            attempts_per_slot,
        } => {
            for _ in 0..slots {
                for _ in 0..attempts_per_slot {
                    if let Some(room) = try_candidate(width, height, policy, &rooms, rng) {
                        rooms.push(room);
                        break;
                    }
                }
            }
        }
        RoomSampling::Budget { attempts } => {
            for _ in 0..attempts {
                if let Some(room) = try_candidate(width, height, policy, &rooms, rng) {
                    rooms.push(room);
                }
            }
        }
    }

    if rooms.is_empty() {
        log::warn!(
            "[rooms] no room fitted in {}x{} after {} attempts",
            width,
            height,
            policy.total_attempts()
        );
    }
    log::debug!(
        "[rooms] placed {} rooms (budget {}) in {:?}",
        rooms.len(),
        policy.total_attempts(),
        start.elapsed()
    );

    rooms
}

/// Propose one candidate and run it through every rejection test
fn try_candidate<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    policy: &RoomPolicy,
    accepted: &[Room],
    rng: &mut R,
) -> Option<Room> {
    let room = if policy.aligned {
        sample_aligned(width, height, policy.max_room_size, rng)
    } else {
        sample_free(width, height, rng)
    }?;

    if room.width() < policy.min_span || room.height() < policy.min_span {
        return None;
    }

    let ratio = room.width() as f64 / room.height() as f64;
    if ratio < policy.min_aspect || ratio > policy.max_aspect {
        return None;
    }

    // Keep the outer ring solid
    if room.x1() < 1
        || room.y1() < 1
        || room.x2() > width as i32 - 1
        || room.y2() > height as i32 - 1
    {
        return None;
    }

    if let Some(bias) = policy.area_bias {
        let r: f64 = rng.gen();
        if room.area() as f64 > r.powi(bias) * (width * height) as f64 {
            return None;
        }
    }

    if accepted
        .iter()
        .any(|other| room.intersects_padded(other, policy.padding))
    {
        return None;
    }

    Some(room)
}

/// Two random corners anywhere inside the wall ring
fn sample_free<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Option<Room> {
    let (w, h) = (width as i32, height as i32);
    let x1 = rng.gen_range(1..w);
    let x2 = rng.gen_range(1..w);
    let y1 = rng.gen_range(1..h);
    let y2 = rng.gen_range(1..h);
    Room::new(x1, y1, x2, y2).ok()
}

/// Odd origin `2k + 1` with odd side lengths
fn sample_aligned<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    max_room_size: i32,
    rng: &mut R,
) -> Option<Room> {
    let mut side = || {
        let r: f64 = rng.gen();
        ((r * r * max_room_size as f64) as i32).saturating_mul(2).saturating_add(3)
    };
    let room_width = side();
    let room_height = side();

    let x1 = rng.gen_range(0..(width as i32 - 1) / 2) * 2 + 1;
    let y1 = rng.gen_range(0..(height as i32 - 1) / 2) * 2 + 1;
    Room::new(x1, y1, x1.saturating_add(room_width), y1.saturating_add(room_height)).ok()
}
