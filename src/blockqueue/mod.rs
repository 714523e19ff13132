//! Hands out the tiles of an image to the render threads. The tile
//! list is fixed at creation, ordered along a Morton curve so that
//! consecutive tiles are spatially close; threads claim tiles by
//! bumping an atomic counter.

// std
use std::sync::atomic::{AtomicUsize, Ordering};

/// A rectangle of pixels, `[x0, x1) x [y0, y1)`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Tile {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Tile {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Tile { x0, y0, x1, y1 }
    }
    pub fn area(&self) -> usize {
        (self.x1 - self.x0) as usize * (self.y1 - self.y0) as usize
    }
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
    /// The pixels of this tile in scanline order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let (x0, x1) = (self.x0, self.x1);
        (self.y0..self.y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

pub struct BlockQueue {
    tiles: Vec<Tile>,
    next: AtomicUsize,
}

impl BlockQueue {
    /// Splits an image of size `img` into tiles of size `dim`. Tiles
    /// along the right and bottom edges are clipped to the image.
    pub fn new(img: (u32, u32), dim: (u32, u32)) -> BlockQueue {
        let dim = (dim.0.max(1), dim.1.max(1));
        let num_blocks = (
            (img.0 + dim.0 - 1) / dim.0,
            (img.1 + dim.1 - 1) / dim.1,
        );
        let mut blocks: Vec<(u32, u32)> = (0..num_blocks.0 * num_blocks.1)
            .map(|i| (i % num_blocks.0, i / num_blocks.0))
            .collect();
        blocks.sort_by_key(|b| morton2(*b));
        let tiles: Vec<Tile> = blocks
            .into_iter()
            .map(|(bx, by)| {
                Tile::new(
                    bx * dim.0,
                    by * dim.1,
                    ((bx + 1) * dim.0).min(img.0),
                    ((by + 1) * dim.1).min(img.1),
                )
            })
            .collect();
        if tiles.is_empty() {
            log::warn!("block queue for image {:?} is empty", img);
        }
        BlockQueue {
            tiles,
            next: AtomicUsize::new(0),
        }
    }
    pub fn iter(&self) -> BlockQueueIterator {
        BlockQueueIterator { queue: self }
    }
    /// Claims the next tile, with its index in the queue.
    pub fn next(&self) -> Option<(usize, Tile)> {
        let i = self.next.fetch_add(1, Ordering::AcqRel);
        self.tiles.get(i).map(|t| (i, *t))
    }
    pub fn len(&self) -> usize {
        self.tiles.len()
    }
    /// `true` once every tile has been claimed.
    pub fn is_empty(&self) -> bool {
        self.next.load(Ordering::Acquire) >= self.tiles.len()
    }
}

pub struct BlockQueueIterator<'a> {
    queue: &'a BlockQueue,
}

impl<'a> Iterator for BlockQueueIterator<'a> {
    type Item = (usize, Tile);
    fn next(&mut self) -> Option<(usize, Tile)> {
        self.queue.next()
    }
}

/// Spreads the low 16 bits of `x` over the even bit positions.
fn part1_by1(mut x: u32) -> u32 {
    x &= 0x0000_ffff;
    x = (x ^ (x << 8)) & 0x00ff_00ff;
    x = (x ^ (x << 4)) & 0x0f0f_0f0f;
    x = (x ^ (x << 2)) & 0x3333_3333;
    (x ^ (x << 1)) & 0x5555_5555
}

fn morton2(p: (u32, u32)) -> u32 {
    (part1_by1(p.1) << 1) + part1_by1(p.0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tiles_cover_uneven_image_once() {
        let queue = BlockQueue::new((37, 21), (8, 8));
        assert_eq!(queue.len(), 5 * 3);
        let mut hits = vec![0; 37 * 21];
        for (_, tile) in queue.iter() {
            for (x, y) in tile.pixels() {
                hits[(y * 37 + x) as usize] += 1;
            }
        }
        assert!(hits.iter().all(|h| *h == 1));
        assert!(queue.is_empty());
        assert!(queue.next().is_none());
    }

    #[test]
    fn morton_order_starts_at_origin() {
        let queue = BlockQueue::new((32, 32), (8, 8));
        let first: Vec<Tile> = queue.iter().take(4).map(|(_, t)| t).collect();
        assert_eq!(first[0], Tile::new(0, 0, 8, 8));
        assert_eq!(first[1], Tile::new(8, 0, 16, 8));
        assert_eq!(first[2], Tile::new(0, 8, 8, 16));
        assert_eq!(first[3], Tile::new(8, 8, 16, 16));
    }

    #[test]
    fn queue_is_shared_between_threads() {
        let queue = BlockQueue::new((64, 64), (8, 8));
        let claimed: usize = crossbeam::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|_| queue.iter().count()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        })
        .unwrap();
        assert_eq!(claimed, 64);
    }
}
