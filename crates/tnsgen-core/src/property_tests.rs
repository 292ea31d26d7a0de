//! Property-based tests for the generate → pack → serialize pipeline
//!
//! Uses proptest to verify the structural invariants across randomly chosen
//! shapes, format sequences, and seeds.

#[cfg(test)]
mod tests {
    use crate::format::ModeFormat;
    use crate::generate::{generate, GenConfig};
    use crate::io::{read_tns, write_tns};
    use crate::pack::{pack, ModeIndex};
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::io::Cursor;

    fn format_strategy() -> impl Strategy<Value = ModeFormat> {
        prop::sample::select(vec![
            ModeFormat::Dense,
            ModeFormat::Sparse,
            ModeFormat::Compressed,
            ModeFormat::Singleton,
        ])
    }

    // Shape/format pairs of matching length, 1-4 modes with small extents.
    fn tensor_spec_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<ModeFormat>)> {
        prop::collection::vec((2usize..6, format_strategy()), 1..=4)
            .prop_map(|modes| modes.into_iter().unzip())
    }

    fn config(seed: u64) -> GenConfig {
        GenConfig {
            seed,
            ..GenConfig::default()
        }
    }

    proptest! {
        #[test]
        fn prop_generated_coordinates_unique_and_in_bounds(
            (shape, formats) in tensor_spec_strategy(),
            seed in any::<u64>(),
        ) {
            let tensor = generate("T", &shape, &formats, &config(seed)).unwrap();
            let mut seen = HashSet::new();
            for (index, _) in tensor.entries() {
                prop_assert!(seen.insert(index.to_vec()));
                for (&coord, &extent) in index.iter().zip(&shape) {
                    prop_assert!(coord < extent);
                }
            }
        }

        #[test]
        fn prop_singleton_prefixes_never_repeat(
            (shape, mut formats) in tensor_spec_strategy(),
            seed in any::<u64>(),
        ) {
            let last = formats.len() - 1;
            formats[last] = ModeFormat::Singleton;
            let tensor = generate("T", &shape, &formats, &config(seed)).unwrap();

            let mut prefixes = HashSet::new();
            for (index, _) in tensor.entries() {
                prop_assert!(prefixes.insert(index[..last].to_vec()));
            }
        }

        #[test]
        fn prop_generation_is_deterministic(
            (shape, formats) in tensor_spec_strategy(),
            seed in any::<u64>(),
        ) {
            let a = generate("T", &shape, &formats, &config(seed)).unwrap();
            let b = generate("T", &shape, &formats, &config(seed)).unwrap();
            prop_assert_eq!(a.indices(), b.indices());
            prop_assert_eq!(a.values(), b.values());
        }

        #[test]
        fn prop_packed_positions_are_monotone(
            (shape, formats) in tensor_spec_strategy(),
            seed in any::<u64>(),
        ) {
            let tensor = generate("T", &shape, &formats, &config(seed)).unwrap();
            let packed = pack(&tensor).unwrap();

            for level in 0..packed.rank() {
                if let ModeIndex::Compressed { pos, idx } = packed.mode_index(level) {
                    prop_assert!(pos.windows(2).all(|w| w[0] <= w[1]));
                    prop_assert_eq!(*pos.last().unwrap(), idx.len());
                }
            }
        }

        #[test]
        fn prop_pack_preserves_nonzero_set(
            (shape, formats) in tensor_spec_strategy(),
            seed in any::<u64>(),
        ) {
            let tensor = generate("T", &shape, &formats, &config(seed)).unwrap();
            let packed = pack(&tensor).unwrap();

            let original: HashSet<(Vec<usize>, u64)> = tensor
                .entries()
                .map(|(index, value)| (index.to_vec(), value.to_bits()))
                .collect();
            let unpacked: HashSet<(Vec<usize>, u64)> = packed
                .entries()
                .unwrap()
                .into_iter()
                .map(|(index, value)| (index, value.to_bits()))
                .collect();
            prop_assert_eq!(original, unpacked);
        }

        #[test]
        fn prop_serialization_roundtrip(
            (shape, formats) in tensor_spec_strategy(),
            seed in any::<u64>(),
        ) {
            let tensor = generate("T", &shape, &formats, &config(seed)).unwrap();
            let packed = pack(&tensor).unwrap();

            let mut buffer = Vec::new();
            write_tns(&packed, &mut buffer).unwrap();
            let back = read_tns::<f64>(Cursor::new(buffer)).unwrap();

            prop_assert_eq!(back.shape(), tensor.shape());
            prop_assert_eq!(back.formats(), tensor.formats());

            let original: HashSet<(Vec<usize>, u64)> = tensor
                .entries()
                .map(|(index, value)| (index.to_vec(), value.to_bits()))
                .collect();
            let reread: HashSet<(Vec<usize>, u64)> = back
                .entries()
                .map(|(index, value)| (index.to_vec(), value.to_bits()))
                .collect();
            prop_assert_eq!(original, reread);
        }
    }
}
