//! Greedy shelf packing of word footprints into a rectangle.
//!
//! Items are attempted most important first. Each shelf is a horizontal row
//! whose height is fixed by the first item placed on it; later items join the
//! first shelf that still has room for them or open a new shelf below the
//! last one. Once every item has been attempted, the block of shelves is
//! centered vertically in the container and every shelf horizontally.
//!
//! ```text
//!   ┌──────────────────────────┐
//!   │                          │
//!   │    ┌──────┬───┬────┐     │  shelf 0
//!   │    └──────┴───┴────┘     │
//!   │       ┌────┬─────┐       │  shelf 1
//!   │       └────┴─────┘       │
//!   │                          │
//!   └──────────────────────────┘
//! ```

use std::cmp::Ordering;

use log::trace;

use wordstream_core::geometry::{Bounds, Point, Size};

/// One footprint to pack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackItem {
    /// Higher priorities are attempted first.
    pub priority: f64,
    pub size: Size,
}

impl PackItem {
    pub fn new(priority: f64, size: Size) -> Self {
        Self { priority, size }
    }
}

/// Result of [`pack`]: item indices partitioned into placed and rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Packing {
    /// Placed items with their final bounds, in attempt order.
    pub placed: Vec<(usize, Bounds)>,
    /// Items that did not fit, in attempt order.
    pub rejected: Vec<usize>,
}

impl Packing {
    /// Returns the bounds assigned to item `index`, if it was placed.
    pub fn bounds_of(&self, index: usize) -> Option<Bounds> {
        self.placed
            .iter()
            .find(|(placed, _)| *placed == index)
            .map(|(_, bounds)| *bounds)
    }
}

#[derive(Debug)]
struct Shelf {
    top: f32,
    height: f32,
    used_width: f32,
    members: Vec<(usize, Size)>,
}

impl Shelf {
    fn accepts(&self, size: Size, container_width: f32) -> bool {
        size.height() <= self.height && self.used_width + size.width() <= container_width
    }
}

/// Packs `items` into `container` without overlap.
///
/// Items are attempted in descending priority; equal priorities keep their
/// order in `items`. An item is rejected when it is wider or taller than the
/// container, when its size is not finite, or when neither an existing shelf
/// nor the remaining vertical space can hold it. When no remaining item could
/// fit anywhere, the rest are rejected without being attempted.
///
/// # Examples
///
/// ```
/// # use wordstream::layout::{PackItem, pack};
/// # use wordstream::geometry::{Bounds, Point, Size};
/// let container = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 20.0));
/// let items = [
///     PackItem::new(1.0, Size::new(60.0, 10.0)),
///     PackItem::new(5.0, Size::new(60.0, 10.0)),
///     PackItem::new(3.0, Size::new(60.0, 10.0)),
/// ];
///
/// let packing = pack(container, &items);
/// assert_eq!(packing.placed.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![1, 2]);
/// assert_eq!(packing.rejected, vec![0]);
/// ```
pub fn pack(container: Bounds, items: &[PackItem]) -> Packing {
    let container_width = container.width();
    let container_height = container.height();

    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| compare_priority(items[b].priority, items[a].priority));

    // Smallest dimensions among the items not yet attempted.
    let mut min_width_after = vec![f32::INFINITY; order.len() + 1];
    let mut min_height_after = vec![f32::INFINITY; order.len() + 1];
    for k in (0..order.len()).rev() {
        let size = items[order[k]].size;
        let (width, height) = if is_packable(size) {
            (size.width(), size.height())
        } else {
            (f32::INFINITY, f32::INFINITY)
        };
        min_width_after[k] = min_width_after[k + 1].min(width);
        min_height_after[k] = min_height_after[k + 1].min(height);
    }

    let mut packing = Packing::default();
    let mut shelves: Vec<Shelf> = Vec::new();
    let mut used_height = 0.0_f32;

    for (k, &index) in order.iter().enumerate() {
        let size = items[index].size;
        let remaining = container_height - used_height;

        if min_height_after[k] > remaining
            && shelves.iter().all(|shelf| {
                shelf.height < min_height_after[k]
                    || container_width - shelf.used_width < min_width_after[k]
            })
        {
            trace!(attempted = k, remaining = order.len() - k; "Cell exhausted");
            packing.rejected.extend_from_slice(&order[k..]);
            break;
        }

        if !is_packable(size)
            || size.width() > container_width
            || size.height() > container_height
        {
            packing.rejected.push(index);
            continue;
        }

        if let Some(shelf) = shelves
            .iter_mut()
            .find(|shelf| shelf.accepts(size, container_width))
        {
            shelf.used_width += size.width();
            shelf.members.push((index, size));
        } else if size.height() <= remaining {
            shelves.push(Shelf {
                top: used_height,
                height: size.height(),
                used_width: size.width(),
                members: vec![(index, size)],
            });
            used_height += size.height();
        } else {
            packing.rejected.push(index);
        }
    }

    let block_top = container.min_y() + (container_height - used_height) / 2.0;
    let mut placed: Vec<(usize, Bounds)> = Vec::with_capacity(items.len());
    for shelf in &shelves {
        let mut x = container.min_x() + (container_width - shelf.used_width) / 2.0;
        for &(index, size) in &shelf.members {
            let y = block_top + shelf.top + (shelf.height - size.height()) / 2.0;
            placed.push((index, Bounds::new_from_top_left(Point::new(x, y), size)));
            x += size.width();
        }
    }

    // Report placements in attempt order.
    let rank: Vec<usize> = {
        let mut rank = vec![0; items.len()];
        for (position, &index) in order.iter().enumerate() {
            rank[index] = position;
        }
        rank
    };
    placed.sort_by_key(|(index, _)| rank[*index]);
    packing.placed = placed;

    packing
}

/// Orders priorities with NaN below every number so it is attempted last.
fn compare_priority(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.total_cmp(&b),
    }
}

fn is_packable(size: Size) -> bool {
    size.width().is_finite()
        && size.height().is_finite()
        && size.width() >= 0.0
        && size.height() >= 0.0
}
