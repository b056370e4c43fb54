//! RNG module - seeded symbol draws
//!
//! Every random decision on the board (the initial deal, refills after a
//! clear, reshuffles) goes through [`SymbolRng`], so a seed fully determines a
//! game given the same sequence of player inputs.
//!
//! The generator is PCG32 from `rand_pcg`: small, fast, and stable across
//! platforms, which is what deterministic replays need.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::error::BoardError;
use crate::types::{Symbol, MIN_SYMBOLS};

/// The finite set of symbols a board is dealt from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
}

impl SymbolSet {
    /// Build a set from explicit symbols.
    ///
    /// Fails with [`BoardError::TooFewSymbols`] below three symbols, since the
    /// deal excludes up to two neighbours per cell and must always have a
    /// candidate left.
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Result<Self, BoardError> {
        let mut out: Vec<Symbol> = Vec::new();
        for symbol in symbols {
            if out.contains(&symbol) {
                return Err(BoardError::DuplicateSymbol {
                    symbol: symbol.as_char(),
                });
            }
            out.push(symbol);
        }
        if out.len() < MIN_SYMBOLS {
            return Err(BoardError::TooFewSymbols { count: out.len() });
        }
        Ok(Self { symbols: out })
    }

    /// Symbols `0..count`.
    pub fn with_count(count: u8) -> Result<Self, BoardError> {
        Self::new((0..count).map(Symbol))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }
}

/// Seeded generator for symbol draws.
#[derive(Debug, Clone)]
pub struct SymbolRng {
    rng: Pcg32,
    seed: u64,
}

impl SymbolRng {
    /// Create a generator from a fixed seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a generator from a random seed.
    ///
    /// The chosen seed is kept so the game can be replayed.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this generator was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Draw uniformly from the whole set.
    pub fn draw(&mut self, set: &SymbolSet) -> Symbol {
        let idx = self.rng.random_range(0..set.len());
        set.symbols[idx]
    }

    /// Draw uniformly from the set minus `excluded`.
    ///
    /// Falls back to an unrestricted draw if the exclusions cover the whole
    /// set, which a valid [`SymbolSet`] with at most two exclusions never hits.
    pub fn draw_excluding(&mut self, set: &SymbolSet, excluded: &[Symbol]) -> Symbol {
        let available = set.iter().filter(|s| !excluded.contains(s)).count();
        if available == 0 {
            return self.draw(set);
        }

        let pick = self.rng.random_range(0..available);
        set.iter()
            .filter(|s| !excluded.contains(s))
            .nth(pick)
            .unwrap_or(set.symbols[0])
    }
}
