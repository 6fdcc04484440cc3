//! Accent color assignment for new accounts.
//!
//! Superusers always receive [`Color::NEUTRAL`]. Everyone else gets a
//! uniformly random entry from the full palette, Silver included.

use rand::Rng;

use crate::entities::Color;

/// Pick the accent color for an account that has none yet.
pub fn assign_color(is_superuser: bool) -> Color {
    assign_color_with(is_superuser, &mut rand::thread_rng())
}

/// Same as [`assign_color`] but drawing from the given generator.
pub fn assign_color_with<R: Rng + ?Sized>(is_superuser: bool, rng: &mut R) -> Color {
    if is_superuser {
        return Color::NEUTRAL;
    }

    Color::PALETTE[rng.gen_range(0..Color::PALETTE.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_superuser_always_gets_silver() {
        for _ in 0..1000 {
            assert_eq!(assign_color(true), Color::Silver);
        }
    }

    #[test]
    fn test_regular_accounts_draw_from_whole_palette() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut seen: HashMap<Color, u32> = HashMap::new();

        for _ in 0..4800 {
            *seen.entry(assign_color_with(false, &mut rng)).or_default() += 1;
        }

        assert_eq!(seen.len(), Color::PALETTE.len());
        assert!(seen.contains_key(&Color::Silver));
        // 300 expected per color; a uniform draw stays well inside this band
        for (color, count) in &seen {
            assert!(
                (150..=450).contains(count),
                "{} drawn {count} times",
                color.name()
            );
        }
    }

    #[test]
    fn test_assigned_color_is_always_in_palette() {
        for _ in 0..200 {
            assert!(Color::PALETTE.contains(&assign_color(false)));
        }
    }
}
