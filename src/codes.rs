//! Characters of level encodings and the colors they stand for.

use std::collections::BTreeMap;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use strum::VariantArray;

use crate::color::Color;

/// The character standing for an empty cell in level encodings.
pub const EMPTY_CODE: char = '0';

/// The one-to-one mapping between the characters of a level encoding and flow [`Color`]s.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ColorCodes {
    by_code: BTreeMap<char, Color>,
}

impl ColorCodes {
    /// Establish codes for every anchor character in `encoding`.
    ///
    /// Characters naming a color natively keep that color. Whatever is left over draws an unused color from `rng`;
    /// once the palette runs dry the remaining characters stay unmapped.
    pub fn from_encoding<R: Rng + ?Sized>(encoding: &str, rng: &mut R) -> Self {
        let mut codes = Self::default();
        let anchor_chars = encoding.chars()
            .filter(|ch| *ch != EMPTY_CODE)
            .unique()
            .collect_vec();

        for ch in anchor_chars.iter().copied() {
            if let Some(color) = Color::from_code(ch) {
                if !codes.is_used(color) {
                    codes.assign(ch, color);
                }
            }
        }

        for ch in anchor_chars {
            if codes.color_of(ch).is_some() {
                continue;
            }

            match codes.random_unused(rng) {
                Some(color) => codes.assign(ch, color),
                None => break,
            }
        }

        codes
    }

    /// The color `code` stands for.
    pub fn color_of(&self, code: char) -> Option<Color> {
        self.by_code.get(&code).copied()
    }

    /// The character standing for `color`.
    pub fn code_of(&self, color: Color) -> Option<char> {
        self.by_code.iter()
            .find(|(_, mapped)| **mapped == color)
            .map(|(code, _)| *code)
    }

    /// Whether some character already stands for `color`.
    pub fn is_used(&self, color: Color) -> bool {
        self.by_code.values().any(|mapped| *mapped == color)
    }

    /// Pick a color no character stands for yet.
    pub fn random_unused<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Color> {
        Color::VARIANTS.iter()
            .copied()
            .filter(|color| !self.is_used(*color))
            .collect_vec()
            .choose(rng)
            .copied()
    }

    /// Let `code` stand for `color`, dropping any previous mapping of either.
    pub fn assign(&mut self, code: char, color: Color) {
        self.release(color);
        self.by_code.insert(code, color);
    }

    /// Forget whichever character stands for `color`.
    pub fn release(&mut self, color: Color) {
        self.by_code.retain(|_, mapped| *mapped != color);
    }

    /// Number of mapped characters.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// Whether no character is mapped.
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}
