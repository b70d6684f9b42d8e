//! Full deck generation.

use crate::attributes::{CardAttributes, Color, Number, Shading, Symbol};

/// All 81 cards of the game, in nested vocabulary order
/// (number, symbol, shading, color).
pub fn full_deck() -> Vec<CardAttributes> {
    let mut deck = Vec::with_capacity(81);
    for number in Number::ALL {
        for symbol in Symbol::ALL {
            for shading in Shading::ALL {
                for color in Color::ALL {
                    deck.push(CardAttributes::new(number, symbol, shading, color));
                }
            }
        }
    }
    deck
}
