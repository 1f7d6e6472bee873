//! Colour palette, tuned for a dark terminal background.

use crate::screen::Color;

// -- Backgrounds --

/// Default terminal background (reset).
pub const BG: Color = Color::DEFAULT;
/// Cells whose cache the player can reach.
pub const BG_REACH: Color = Color::from_rgb(40, 42, 54);
/// The player's own cell.
pub const BG_PLAYER: Color = Color::from_rgb(60, 64, 90);

// -- Foregrounds --

/// Empty cells and secondary text.
pub const FG_DIM: Color = Color::from_rgb(98, 100, 106);
pub const FG_EMPH: Color = Color::from_rgb(248, 248, 242);

/// Player '@'.
pub const PLAYER_FG: Color = Color::from_rgb(100, 160, 255);

pub const RED: Color = Color::from_rgb(255, 85, 85);
pub const GREEN: Color = Color::from_rgb(80, 200, 80);
pub const YELLOW: Color = Color::from_rgb(220, 200, 60);
pub const MAGENTA: Color = Color::from_rgb(210, 100, 210);
pub const CYAN: Color = Color::from_rgb(80, 210, 210);
pub const ORANGE: Color = Color::from_rgb(220, 140, 50);

/// Label colour for a token: each doubling gets the next hue.
pub fn token_color(value: u32) -> Color {
    match value.checked_ilog2() {
        None => FG_DIM,
        Some(0) => GREEN,
        Some(1) => CYAN,
        Some(2) => YELLOW,
        Some(3) => ORANGE,
        Some(4) => RED,
        Some(_) => MAGENTA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_colors_step_with_doubling() {
        assert_eq!(token_color(0), FG_DIM);
        assert_eq!(token_color(1), GREEN);
        assert_eq!(token_color(2), CYAN);
        assert_eq!(token_color(3), CYAN);
        assert_eq!(token_color(4), YELLOW);
        assert_eq!(token_color(1024), MAGENTA);
    }
}
