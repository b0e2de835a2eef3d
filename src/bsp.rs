use fixed::{Fixed, FRACBITS, fixed_mul};
use geom::BBox;
use map::{Handle, Level, Sector};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeChild {
    Node(usize),
    Subsector(usize),
}

/// An internal BSP node: a partition line and what's on either side of it.  Child 0 is the front
/// (right-hand) side.
#[derive(Clone, Debug)]
pub struct Node {
    pub x: Fixed,
    pub y: Fixed,
    pub dx: Fixed,
    pub dy: Fixed,
    pub bbox: [BBox; 2],
    pub children: [NodeChild; 2],
}

#[derive(Clone, Debug)]
pub struct Subsector {
    pub sector: Handle<Sector>,
}

impl Node {
    /// The classic node side test, which only uses the integer part of the partition's
    /// direction in the cross product.
    pub fn point_on_side(&self, x: Fixed, y: Fixed) -> usize {
        if self.dx == 0 {
            if x <= self.x {
                return (self.dy > 0) as usize;
            }
            return (self.dy < 0) as usize;
        }
        if self.dy == 0 {
            if y <= self.y {
                return (self.dx < 0) as usize;
            }
            return (self.dx > 0) as usize;
        }

        let dx = x.wrapping_sub(self.x);
        let dy = y.wrapping_sub(self.y);

        // Quick decision from the sign bits alone
        if (self.dy ^ self.dx ^ dx ^ dy) < 0 {
            if (self.dy ^ dx) < 0 {
                return 1;
            }
            return 0;
        }

        let left = fixed_mul(self.dy >> FRACBITS, dx);
        let right = fixed_mul(dy, self.dx >> FRACBITS);
        if right < left {
            return 0;
        }
        return 1;
    }
}

impl Level {
    /// Walk the BSP from the root to the subsector containing a point.  A level without nodes is
    /// a single subsector.
    pub fn point_in_subsector(&self, x: Fixed, y: Fixed) -> Handle<Subsector> {
        if self.nodes.is_empty() {
            return 0.into();
        }

        let mut child = NodeChild::Node(self.nodes.len() - 1);
        // A well-formed tree can't be deeper than it has nodes
        for _ in 0 ..= self.nodes.len() {
            match child {
                NodeChild::Subsector(index) => {
                    return index.into();
                }
                NodeChild::Node(index) => {
                    let node = match self.nodes.get(index) {
                        Some(node) => node,
                        None => { break; }
                    };
                    child = node.children[node.point_on_side(x, y)];
                }
            }
        }

        warn!("BSP walk for ({}, {}) didn't reach a subsector; the node tree is malformed", x >> FRACBITS, y >> FRACBITS);
        return 0.into();
    }

    pub fn point_in_sector(&self, x: Fixed, y: Fixed) -> Handle<Sector> {
        let ss = self.point_in_subsector(x, y);
        match self.subsectors.get(ss.index()) {
            Some(subsector) => subsector.sector,
            None => 0.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixed::to_fixed;

    /// Two subsectors split by the line x = 64, partition pointing north.
    fn split_level() -> Level {
        let mut level = Level::new();
        let west = level.add_sector(0, to_fixed(128));
        let east = level.add_sector(to_fixed(16), to_fixed(128));
        level.add_subsector(east);
        level.add_subsector(west);
        level.add_node(Node {
            x: to_fixed(64),
            y: 0,
            dx: 0,
            dy: to_fixed(128),
            bbox: [BBox::empty(), BBox::empty()],
            children: [NodeChild::Subsector(0), NodeChild::Subsector(1)],
        });
        level
    }

    #[test]
    fn finds_each_side() {
        let level = split_level();
        assert_eq!(level.point_in_subsector(to_fixed(100), to_fixed(10)).index(), 0);
        assert_eq!(level.point_in_subsector(to_fixed(10), to_fixed(10)).index(), 1);
        assert_eq!(level.point_in_sector(to_fixed(100), to_fixed(10)).index(), 1);
    }

    #[test]
    fn no_nodes_means_one_subsector() {
        let mut level = Level::new();
        let sector = level.add_sector(0, to_fixed(64));
        level.add_subsector(sector);
        assert_eq!(level.point_in_subsector(to_fixed(-5000), to_fixed(5000)).index(), 0);
    }

    #[test]
    fn diagonal_partition_uses_cross_product() {
        let node = Node {
            x: 0,
            y: 0,
            dx: to_fixed(64),
            dy: to_fixed(64),
            bbox: [BBox::empty(), BBox::empty()],
            children: [NodeChild::Subsector(0), NodeChild::Subsector(1)],
        };
        assert_eq!(node.point_on_side(to_fixed(10), to_fixed(1)), 0);
        assert_eq!(node.point_on_side(to_fixed(1), to_fixed(10)), 1);
    }
}
