//! Geometry command encoding for vector tiles.
//!
//! Geometries are a stream of command integers followed by zigzag encoded
//! parameter pairs, each relative to the previous cursor position.

use super::TileError;

const CMD_MOVE_TO: u32 = 1;
const CMD_LINE_TO: u32 = 2;
const CMD_CLOSE_PATH: u32 = 7;

#[inline]
fn command(id: u32, count: u32) -> u32 {
    (id & 0x7) | (count << 3)
}

#[inline]
pub(crate) fn zigzag(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

#[inline]
pub(crate) fn unzigzag(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Encodes a single point.
pub fn point(x: i32, y: i32) -> Vec<u32> {
    vec![command(CMD_MOVE_TO, 1), zigzag(x), zigzag(y)]
}

/// Encodes a single closed ring as a polygon.
///
/// `ring` lists the vertices without repeating the first one. The caller
/// is responsible for the winding order (clockwise in tile space for an
/// exterior ring).
pub fn polygon(ring: &[(i32, i32)]) -> Vec<u32> {
    let mut geometry = Vec::with_capacity(ring.len() * 2 + 3);
    let (mut cx, mut cy) = (0i32, 0i32);

    for (i, &(x, y)) in ring.iter().enumerate() {
        if i == 0 {
            geometry.push(command(CMD_MOVE_TO, 1));
        } else if i == 1 {
            geometry.push(command(CMD_LINE_TO, ring.len() as u32 - 1));
        }
        geometry.push(zigzag(x - cx));
        geometry.push(zigzag(y - cy));
        cx = x;
        cy = y;
    }

    if !ring.is_empty() {
        geometry.push(command(CMD_CLOSE_PATH, 1));
    }
    geometry
}

/// Decodes the positions of a point or multipoint geometry.
pub fn decode_points(geometry: &[u32]) -> Result<Vec<(i32, i32)>, TileError> {
    let mut points = Vec::new();
    let (mut cx, mut cy) = (0i32, 0i32);
    let mut i = 0;

    while i < geometry.len() {
        let id = geometry[i] & 0x7;
        let count = (geometry[i] >> 3) as usize;
        i += 1;

        if id != CMD_MOVE_TO {
            return Err(malformed(format!("unexpected command {} in point geometry", id)));
        }
        if i + count * 2 > geometry.len() {
            return Err(malformed("point geometry truncated".to_string()));
        }
        for _ in 0..count {
            cx = cx
                .checked_add(unzigzag(geometry[i]))
                .ok_or_else(|| malformed("point x coordinate overflows".to_string()))?;
            cy = cy
                .checked_add(unzigzag(geometry[i + 1]))
                .ok_or_else(|| malformed("point y coordinate overflows".to_string()))?;
            points.push((cx, cy));
            i += 2;
        }
    }

    Ok(points)
}

fn malformed(reason: String) -> TileError {
    TileError::Malformed {
        layer: String::new(),
        reason,
    }
}
