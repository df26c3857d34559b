//! Factories and the center pool: the shared drafting surface.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bag::TileBag;
use crate::error::GameError;
use crate::types::{Color, FactoryId, Tile, FACTORY_CAPACITY};

/// Source of tiles for drafting
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum DraftSource {
    Factory(FactoryId),
    Center,
}

impl DraftSource {
    pub fn from_factory_id(factory_id: Option<FactoryId>) -> Self {
        match factory_id {
            Some(id) => DraftSource::Factory(id),
            None => DraftSource::Center,
        }
    }

    pub fn factory_id(self) -> Option<FactoryId> {
        match self {
            DraftSource::Factory(id) => Some(id),
            DraftSource::Center => None,
        }
    }
}

impl fmt::Display for DraftSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftSource::Factory(id) => write!(f, "factory {id}"),
            DraftSource::Center => f.write_str("the center"),
        }
    }
}

/// A single factory display (holds up to 4 tiles)
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Factory {
    pub id: FactoryId,
    pub tiles: Vec<Tile>,
}

impl Factory {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn has_color(&self, color: Color) -> bool {
        self.tiles.iter().any(|t| t.color == color)
    }
}

/// Tiles drafted by the current player and not yet placed, plus what the
/// source looked like beforehand so the draft can be undone.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selection {
    pub source: DraftSource,
    pub color: Color,
    pub tiles: Vec<Tile>,
    factory_before: Option<Vec<Tile>>,
    center_before: Vec<Tile>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Number of factories for a given player count
pub fn factory_count_for(num_players: usize) -> usize {
    if num_players == 2 {
        5
    } else {
        7
    }
}

/// All factories plus the center pool
#[derive(Clone, Debug, Default)]
pub struct DraftPool {
    factories: Vec<Factory>,
    center: Vec<Tile>,
}

impl DraftPool {
    pub fn new(num_factories: usize) -> Self {
        DraftPool {
            factories: (0..num_factories)
                .map(|i| Factory {
                    id: i as FactoryId,
                    tiles: Vec::with_capacity(FACTORY_CAPACITY),
                })
                .collect(),
            center: Vec::new(),
        }
    }

    pub fn factories(&self) -> &[Factory] {
        &self.factories
    }

    pub fn factory(&self, id: FactoryId) -> Option<&Factory> {
        self.factories.get(id as usize)
    }

    pub fn center(&self) -> &[Tile] {
        &self.center
    }

    /// Stock every factory with 4 tiles from the bag and clear the center.
    /// Anything left on the table goes back to the lid first.
    pub fn fill_all(&mut self, bag: &mut TileBag, rng: &mut impl Rng) {
        bag.discard(self.center.drain(..));
        for factory in &mut self.factories {
            bag.discard(factory.tiles.drain(..));
            factory.tiles = bag.draw(FACTORY_CAPACITY, rng);
        }
    }

    /// Take every tile of `color` from `source`.
    ///
    /// Drafting from a factory empties it and moves the other colors to the
    /// center. Drafting from the center leaves the other colors in place.
    /// Fails without touching anything if the factory does not exist or holds
    /// no tile of that color.
    pub fn select(&mut self, color: Color, source: DraftSource) -> Result<Selection, GameError> {
        let center_before = self.center.clone();
        match source {
            DraftSource::Factory(id) => {
                let factory = self
                    .factories
                    .get_mut(id as usize)
                    .ok_or(GameError::FactoryNotFound(id))?;
                if !factory.has_color(color) {
                    return Err(GameError::ColorNotAvailable {
                        color,
                        from: source,
                    });
                }

                let factory_before = std::mem::take(&mut factory.tiles);
                let (taken, leftover): (Vec<Tile>, Vec<Tile>) = factory_before
                    .iter()
                    .copied()
                    .partition(|t| t.color == color);
                self.center.extend(leftover.into_iter().map(Tile::released));

                Ok(Selection {
                    source,
                    color,
                    tiles: taken.into_iter().map(Tile::selected).collect(),
                    factory_before: Some(factory_before),
                    center_before,
                })
            }
            DraftSource::Center => {
                if !self.center.iter().any(|t| t.color == color) {
                    return Err(GameError::ColorNotAvailable {
                        color,
                        from: source,
                    });
                }

                let (taken, rest): (Vec<Tile>, Vec<Tile>) = std::mem::take(&mut self.center)
                    .into_iter()
                    .partition(|t| t.color == color);
                self.center = rest;

                Ok(Selection {
                    source,
                    color,
                    tiles: taken.into_iter().map(Tile::selected).collect(),
                    factory_before: None,
                    center_before,
                })
            }
        }
    }

    /// Undo a `select`: the source factory and the center go back to exactly
    /// how they were.
    pub fn restore(&mut self, selection: Selection) {
        if let (DraftSource::Factory(id), Some(tiles)) =
            (selection.source, selection.factory_before)
        {
            if let Some(factory) = self.factories.get_mut(id as usize) {
                factory.tiles = tiles;
            }
        }
        self.center = selection.center_before;
    }

    /// Clear the `selected` flag on every center tile.
    pub fn release_center(&mut self) {
        for tile in &mut self.center {
            tile.selected = false;
        }
    }

    /// True once every factory and the center are empty.
    pub fn is_exhausted(&self) -> bool {
        self.center.is_empty() && self.factories.iter().all(Factory::is_empty)
    }

    /// Colors currently available at a source, without duplicates.
    pub fn colors_at(&self, source: DraftSource) -> Vec<Color> {
        let tiles: &[Tile] = match source {
            DraftSource::Factory(id) => match self.factory(id) {
                Some(factory) => &factory.tiles,
                None => return Vec::new(),
            },
            DraftSource::Center => &self.center,
        };
        let mut colors: Vec<Color> = tiles.iter().map(|t| t.color).collect();
        colors.sort();
        colors.dedup();
        colors
    }

    pub fn tile_count(&self) -> usize {
        self.center.len() + self.factories.iter().map(|f| f.tiles.len()).sum::<usize>()
    }

    #[cfg(test)]
    pub(crate) fn set_factory(&mut self, id: FactoryId, colors: &[Color]) {
        self.factories[id as usize].tiles = colors.iter().copied().map(Tile::new).collect();
    }

    #[cfg(test)]
    pub(crate) fn set_center(&mut self, colors: &[Color]) {
        self.center = colors.iter().copied().map(Tile::new).collect();
    }
}
