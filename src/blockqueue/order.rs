//! Orders in which image buckets are handed out to the render
//! threads. Every order is a permutation of all bucket coordinates of
//! an *nbw* by *nbh* grid.

// std
use std::str::FromStr;
// others
use strum_macros::{Display, EnumIter, EnumString};
// lumen
use crate::core::rng::Rng;
use crate::core::sampling::shuffle;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum BucketOrderType {
    Row,
    Column,
    Diagonal,
    Spiral,
    Hilbert,
    Morton,
    Random,
}

/// A bucket order plus an optional reversal of the whole sequence.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BucketOrder {
    pub order: BucketOrderType,
    pub inverted: bool,
}

impl BucketOrder {
    pub fn new(order: BucketOrderType, inverted: bool) -> Self {
        BucketOrder { order, inverted }
    }
    /// Parse names like `"spiral"` or `"reverse hilbert"`. Unknown
    /// names fall back to the hilbert order.
    pub fn from_name(name: &str) -> BucketOrder {
        let name: String = name.trim().to_lowercase();
        let mut inverted: bool = false;
        let mut base: &str = &name;
        for prefix in &["inverse ", "invert ", "reverse "] {
            if let Some(rest) = name.strip_prefix(prefix) {
                inverted = true;
                base = rest.trim();
                break;
            }
        }
        match BucketOrderType::from_str(base) {
            Ok(order) => BucketOrder::new(order, inverted),
            Err(_) => {
                log::warn!("unrecognized bucket ordering \"{}\" - using hilbert", name);
                BucketOrder::new(BucketOrderType::Hilbert, inverted)
            }
        }
    }
    pub fn get_bucket_sequence(&self, nbw: u32, nbh: u32) -> Vec<(u32, u32)> {
        let mut coords: Vec<(u32, u32)> = match self.order {
            BucketOrderType::Row => row_order(nbw, nbh),
            BucketOrderType::Column => column_order(nbw, nbh),
            BucketOrderType::Diagonal => diagonal_order(nbw, nbh),
            BucketOrderType::Spiral => spiral_order(nbw, nbh),
            BucketOrderType::Hilbert => hilbert_order(nbw, nbh),
            BucketOrderType::Morton => morton_order(nbw, nbh),
            BucketOrderType::Random => random_order(nbw, nbh),
        };
        if self.inverted {
            coords.reverse();
        }
        coords
    }
}

/// Rows top to bottom, alternating direction.
fn row_order(nbw: u32, nbh: u32) -> Vec<(u32, u32)> {
    (0..nbw * nbh)
        .map(|i| {
            let by: u32 = i / nbw;
            let mut bx: u32 = i % nbw;
            if by & 1 == 1 {
                bx = nbw - 1 - bx;
            }
            (bx, by)
        })
        .collect()
}

fn column_order(nbw: u32, nbh: u32) -> Vec<(u32, u32)> {
    (0..nbw * nbh)
        .map(|i| {
            let bx: u32 = i / nbh;
            let mut by: u32 = i % nbh;
            if bx & 1 == 1 {
                by = nbh - 1 - by;
            }
            (bx, by)
        })
        .collect()
}

/// Anti-diagonals starting in the top left corner.
fn diagonal_order(nbw: u32, nbh: u32) -> Vec<(u32, u32)> {
    let mut coords: Vec<(u32, u32)> = Vec::with_capacity((nbw * nbh) as usize);
    for sum in 0..(nbw + nbh).saturating_sub(1) {
        for bx in (0..=sum).rev() {
            let by: u32 = sum - bx;
            if bx < nbw && by < nbh {
                coords.push((bx, by));
            }
        }
    }
    coords
}

/// Outward spiral around the image center.
fn spiral_order(nbw: u32, nbh: u32) -> Vec<(u32, u32)> {
    let total: usize = (nbw * nbh) as usize;
    let mut coords: Vec<(u32, u32)> = Vec::with_capacity(total);
    let mut x: i64 = (nbw as i64 - 1) / 2;
    let mut y: i64 = (nbh as i64 - 1) / 2;
    let (mut dx, mut dy): (i64, i64) = (1, 0);
    let mut leg: i64 = 1;
    let push = |x: i64, y: i64, coords: &mut Vec<(u32, u32)>| {
        if x >= 0 && y >= 0 && x < nbw as i64 && y < nbh as i64 {
            coords.push((x as u32, y as u32));
        }
    };
    push(x, y, &mut coords);
    // legs grow by one every second turn: 1, 1, 2, 2, 3, 3, ...
    while coords.len() < total {
        for _ in 0..2 {
            for _ in 0..leg {
                x += dx;
                y += dy;
                push(x, y, &mut coords);
            }
            let turned = (-dy, dx);
            dx = turned.0;
            dy = turned.1;
        }
        leg += 1;
    }
    coords
}

/// Position *d* along a Hilbert curve filling a *n* by *n* square,
/// *n* a power of two.
fn hilbert_d2xy(n: u32, d: u32) -> (u32, u32) {
    let (mut x, mut y): (u32, u32) = (0, 0);
    let mut t: u32 = d;
    let mut s: u32 = 1;
    while s < n {
        let rx: u32 = 1 & (t / 2);
        let ry: u32 = 1 & (t ^ rx);
        if ry == 0 {
            if rx == 1 {
                x = s - 1 - x;
                y = s - 1 - y;
            }
            std::mem::swap(&mut x, &mut y);
        }
        x += s * rx;
        y += s * ry;
        t /= 4;
        s *= 2;
    }
    (x, y)
}

fn hilbert_order(nbw: u32, nbh: u32) -> Vec<(u32, u32)> {
    let n: u32 = nbw.max(nbh).max(1).next_power_of_two();
    (0..n * n)
        .map(|d| hilbert_d2xy(n, d))
        .filter(|&(x, y)| x < nbw && y < nbh)
        .collect()
}

fn morton_order(nbw: u32, nbh: u32) -> Vec<(u32, u32)> {
    let mut coords: Vec<(u32, u32)> = (0..nbw * nbh).map(|i| (i % nbw, i / nbw)).collect();
    coords.sort_by(|a, b| morton2(*a).cmp(&morton2(*b)));
    coords
}

fn random_order(nbw: u32, nbh: u32) -> Vec<(u32, u32)> {
    let mut coords: Vec<(u32, u32)> = row_order(nbw, nbh);
    let count: usize = coords.len();
    let mut rng: Rng = Rng::default();
    shuffle(&mut coords[..], count, 1, &mut rng);
    coords
}

// see github/tray_rust/src/sampler/morton.rs

/// Insert a 0 bit between each of the low 16 bits of x
fn part1_by1(mut x: u32) -> u32 {
    // x = ---- ---- ---- ---- fedc ba98 7654 3210
    x &= 0x0000_ffff;
    // x = ---- ---- fedc ba98 ---- ---- 7654 3210
    x = (x ^ (x << 8)) & 0x00ff_00ff;
    // x = ---- fedc ---- ba98 ---- 7654 ---- 3210
    x = (x ^ (x << 4)) & 0x0f0f_0f0f;
    // x = --fe --dc --ba --98 --76 --54 --32 --10
    x = (x ^ (x << 2)) & 0x3333_3333;
    // x = -f-e -d-c -b-a -9-8 -7-6 -5-4 -3-2 -1-0
    (x ^ (x << 1)) & 0x5555_5555
}

/// Compute the Morton code for the `(x, y)` position.
fn morton2(p: (u32, u32)) -> u32 {
    (part1_by1(p.1) << 1) + part1_by1(p.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn is_permutation(coords: &[(u32, u32)], nbw: u32, nbh: u32) -> bool {
        let mut seen = vec![false; (nbw * nbh) as usize];
        for &(x, y) in coords {
            if x >= nbw || y >= nbh {
                return false;
            }
            let k = (y * nbw + x) as usize;
            if seen[k] {
                return false;
            }
            seen[k] = true;
        }
        seen.iter().all(|s| *s)
    }

    #[test]
    fn every_order_visits_each_bucket_once() {
        for order in BucketOrderType::iter() {
            for &(nbw, nbh) in &[(1, 1), (4, 4), (5, 3), (2, 7), (13, 9)] {
                let coords = BucketOrder::new(order, false).get_bucket_sequence(nbw, nbh);
                assert!(
                    is_permutation(&coords, nbw, nbh),
                    "{} order broken for {}x{}",
                    order,
                    nbw,
                    nbh
                );
            }
        }
    }

    #[test]
    fn rows_alternate_direction() {
        let coords = row_order(3, 2);
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1)]);
    }

    #[test]
    fn spiral_starts_in_the_center() {
        let coords = spiral_order(5, 5);
        assert_eq!(coords[0], (2, 2));
        assert_eq!(coords[1], (3, 2));
    }

    #[test]
    fn hilbert_steps_are_adjacent_on_square_grids() {
        let coords = hilbert_order(8, 8);
        for pair in coords.windows(2) {
            let dx = (pair[0].0 as i64 - pair[1].0 as i64).abs();
            let dy = (pair[0].1 as i64 - pair[1].1 as i64).abs();
            assert_eq!(dx + dy, 1);
        }
    }

    #[test]
    fn names_and_prefixes() {
        assert_eq!(
            BucketOrder::from_name("spiral"),
            BucketOrder::new(BucketOrderType::Spiral, false)
        );
        assert_eq!(
            BucketOrder::from_name("reverse column"),
            BucketOrder::new(BucketOrderType::Column, true)
        );
        assert_eq!(
            BucketOrder::from_name("zigzag"),
            BucketOrder::new(BucketOrderType::Hilbert, false)
        );
        let forward = BucketOrder::from_name("diagonal").get_bucket_sequence(4, 3);
        let mut backward = BucketOrder::from_name("inverse diagonal").get_bucket_sequence(4, 3);
        backward.reverse();
        assert_eq!(forward, backward);
    }
}
