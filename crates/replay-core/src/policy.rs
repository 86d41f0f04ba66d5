//! Which plies belong to the side under test.

use shakmaty::Color;

/// Parity offset of the tested side: White moves on even plies, Black on odd.
pub fn offset_for(tested: Color) -> usize {
    match tested {
        Color::White => 0,
        Color::Black => 1,
    }
}

/// True when the ply at `ply` was played by the side with parity `offset`.
pub fn is_tested_ply(ply: usize, offset: usize) -> bool {
    ply % 2 == offset
}
