//! Property tests for palette matching and pair allocation.

use proptest::prelude::*;
use vista_term::color::Rgb;
use vista_theme::{ColorSettings, Palette, RoleRegistry, TermCaps};

proptest! {
    #[test]
    fn exact_entry_color_matches_that_color(id in any::<u8>()) {
        let palette = Palette::xterm();
        let rgb = palette.get(id).unwrap().rgb;
        let matched = palette.match_color(rgb);
        prop_assert_eq!(palette.get(matched).unwrap().rgb, rgb);
        // Ties resolve to the earliest entry.
        prop_assert!(matched <= id);
    }

    #[test]
    fn match_is_never_worse_than_any_entry(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let palette = Palette::xterm();
        let target = Rgb::new(r, g, b).to_lab();
        let best = palette.get(palette.match_color(Rgb::new(r, g, b))).unwrap();
        let best_delta = best.lab.delta_e(target);
        for entry in palette.entries() {
            prop_assert!(best_delta <= entry.lab.delta_e(target));
        }
    }

    #[test]
    fn parse_accepts_every_long_hex(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let palette = Palette::xterm();
        let rgb = Rgb::new(r, g, b);
        prop_assert_eq!(palette.parse_color(&rgb.to_hex()), Ok(rgb));
    }

    #[test]
    fn pairs_stay_within_capability(
        pairs in 1u16..400,
        requests in proptest::collection::vec((any::<u8>(), any::<u8>()), 0..64),
    ) {
        let palette = Palette::xterm();
        let caps = TermCaps { colors: 256, color_pairs: pairs };
        let mut registry = RoleRegistry::new(&palette, caps, ColorSettings::default());
        for (fg, bg) in requests {
            let pair = registry.pair_for_indices(fg, bg);
            prop_assert!(pair.0 < pairs.max(64));
            prop_assert!(registry.pair_colors(pair).is_some());
        }
    }
}
