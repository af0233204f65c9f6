use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::utils::letters::standard_tile_supply;

/// Most tiles a rack can hold
pub const RACK_CAPACITY: usize = 8;

/// Undealt tiles. Only ever shrinks, and only through `draw`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TileBag {
    tiles: Vec<char>,
}

impl TileBag {
    /// A full bag with the standard 100-tile distribution
    pub fn standard() -> Self {
        Self {
            tiles: standard_tile_supply(),
        }
    }

    pub fn from_tiles(tiles: impl IntoIterator<Item = char>) -> Self {
        Self {
            tiles: tiles.into_iter().map(|ch| ch.to_ascii_uppercase()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Remove up to `n` uniformly random tiles. A bag with fewer than `n`
    /// tiles hands out what it has; running dry is part of the end game.
    pub fn draw(&mut self, n: usize, rng: &mut impl Rng) -> Vec<char> {
        let count = n.min(self.tiles.len());
        (0..count)
            .map(|_| {
                let idx = rng.random_range(0..self.tiles.len());
                self.tiles.swap_remove(idx)
            })
            .collect()
    }
}

/// A player's hand, in slot order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rack {
    tiles: Vec<char>,
}

impl Rack {
    /// Build a rack from explicit tiles, keeping at most `RACK_CAPACITY`.
    pub fn from_tiles(tiles: impl IntoIterator<Item = char>) -> Self {
        Self {
            tiles: tiles
                .into_iter()
                .take(RACK_CAPACITY)
                .map(|ch| ch.to_ascii_uppercase())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[char] {
        &self.tiles
    }

    /// Tile in slot `index`, if that slot is occupied
    pub fn get(&self, index: usize) -> Option<char> {
        self.tiles.get(index).copied()
    }

    pub fn missing(&self) -> usize {
        RACK_CAPACITY.saturating_sub(self.tiles.len())
    }

    /// Drop the given slots, keeping the order of the rest. Unknown or
    /// repeated indices are ignored.
    pub(crate) fn remove_indices(&mut self, indices: &[usize]) {
        let mut slot = 0;
        self.tiles.retain(|_| {
            let keep = !indices.contains(&slot);
            slot += 1;
            keep
        });
    }

    /// Top the rack back up to capacity from the bag.
    pub(crate) fn refill(&mut self, bag: &mut TileBag, rng: &mut impl Rng) -> usize {
        let drawn = bag.draw(self.missing(), rng);
        let count = drawn.len();
        self.tiles.extend(drawn);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_standard_bag_size() {
        assert_eq!(TileBag::standard().len(), 100);
    }

    #[test]
    fn test_draw_removes_tiles() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bag = TileBag::standard();
        let drawn = bag.draw(8, &mut rng);
        assert_eq!(drawn.len(), 8);
        assert_eq!(bag.len(), 92);
    }

    #[test]
    fn test_draw_from_short_bag_returns_fewer() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut bag = TileBag::from_tiles(['a', 'b']);
        let mut drawn = bag.draw(5, &mut rng);
        drawn.sort_unstable();
        assert_eq!(drawn, vec!['A', 'B']);
        assert!(bag.is_empty());
        assert!(bag.draw(3, &mut rng).is_empty());
    }

    #[test]
    fn test_draw_is_reproducible_with_seed() {
        let mut first = TileBag::standard();
        let mut second = TileBag::standard();
        let a = first.draw(10, &mut StdRng::seed_from_u64(42));
        let b = second.draw(10, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rack_capacity() {
        let rack = Rack::from_tiles("abcdefghij".chars());
        assert_eq!(rack.len(), RACK_CAPACITY);
        assert_eq!(rack.get(0), Some('A'));
        assert_eq!(rack.get(8), None);
        assert_eq!(rack.missing(), 0);
    }

    #[test]
    fn test_remove_indices_keeps_order() {
        let mut rack = Rack::from_tiles("abcde".chars());
        rack.remove_indices(&[3, 0]);
        assert_eq!(rack.tiles(), &['B', 'C', 'E']);
    }

    #[test]
    fn test_refill_tops_up_to_capacity() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut bag = TileBag::from_tiles("xyz".chars());
        let mut rack = Rack::from_tiles("abcdef".chars());
        assert_eq!(rack.refill(&mut bag, &mut rng), 2);
        assert_eq!(rack.len(), RACK_CAPACITY);
        assert_eq!(bag.len(), 1);
    }
}
