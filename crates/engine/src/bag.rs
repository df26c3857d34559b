//! Tile supply: the shuffled bag plus the discard lid that refills it.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{Color, Tile, ALL_COLORS, TILES_PER_COLOR, TILE_COLORS};

/// Bag of undrawn tiles. The front of `tiles` is drawn first.
///
/// Tiles leaving play at the end of a round (floor lines, the spare tiles of a
/// completed pattern line) go into the lid. A refill shuffles the lid and puts
/// it behind whatever is still in the bag, so the 100-tile total is conserved.
#[derive(Clone, Debug, Default)]
pub struct TileBag {
    tiles: Vec<Color>,
    lid: Vec<Color>,
}

impl TileBag {
    /// Full 100-tile set (20 of each color), shuffled.
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut bag = TileBag {
            tiles: Vec::with_capacity(TILE_COLORS * TILES_PER_COLOR),
            lid: full_set(),
        };
        bag.refill(rng);
        bag
    }

    /// Bag with an exact draw order and an empty lid.
    pub fn from_order(colors: Vec<Color>) -> Self {
        TileBag {
            tiles: colors,
            lid: Vec::new(),
        }
    }

    /// Repopulate the bag from the lid: the lid is shuffled and appended.
    pub fn refill(&mut self, rng: &mut impl Rng) {
        let mut fresh = std::mem::take(&mut self.lid);
        fresh.shuffle(rng);
        tracing::debug!(
            remaining = self.tiles.len(),
            added = fresh.len(),
            "refilling tile bag"
        );
        self.tiles.extend(fresh);
    }

    /// Remove up to `n` tiles from the front, refilling first if the bag is
    /// short. Returns fewer than `n` only when bag and lid are both exhausted.
    pub fn draw(&mut self, n: usize, rng: &mut impl Rng) -> Vec<Tile> {
        if self.tiles.len() < n {
            self.refill(rng);
        }
        let take = n.min(self.tiles.len());
        self.tiles.drain(..take).map(Tile::new).collect()
    }

    /// Put tiles into the lid.
    pub fn discard(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.lid.extend(tiles.into_iter().map(|t| t.color));
    }

    pub fn discard_colors(&mut self, color: Color, count: usize) {
        self.lid.extend(std::iter::repeat(color).take(count));
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn lid_len(&self) -> usize {
        self.lid.len()
    }

    /// Tiles remaining in the bag, in draw order.
    pub fn tiles(&self) -> &[Color] {
        &self.tiles
    }

    /// Per-color counts of bag plus lid.
    pub fn color_counts(&self) -> [usize; TILE_COLORS] {
        let mut counts = [0; TILE_COLORS];
        for color in self.tiles.iter().chain(self.lid.iter()) {
            counts[color.index()] += 1;
        }
        counts
    }
}

fn full_set() -> Vec<Color> {
    ALL_COLORS
        .iter()
        .flat_map(|&color| std::iter::repeat(color).take(TILES_PER_COLOR))
        .collect()
}
