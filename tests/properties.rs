//! Property-based tests for the generator and the battery.

use lfsr_battery::analysis::{
    block_frequency, monobit, psi_squared, serial, serial_statistics, SerialMode, Statrs,
    SpecialFunctions,
};
use lfsr_battery::generator::{generate, Lfsr};
use lfsr_battery::{BitSequence, RandomnessError};
use proptest::prelude::*;

fn bit_sequence(max_len: usize) -> impl Strategy<Value = BitSequence> {
    prop::collection::vec(any::<bool>(), 1..max_len)
        .prop_map(|bits| bits.into_iter().collect::<BitSequence>())
}

/// Register width, a distinct tap set within it, and a seed that fits.
fn lfsr_params() -> impl Strategy<Value = (u64, Vec<u32>, u32)> {
    (1u32..=12).prop_flat_map(|nbits| {
        (
            0u64..(1u64 << nbits),
            prop::collection::btree_set(1u32..=nbits, 0..=nbits as usize),
            Just(nbits),
        )
            .prop_map(|(seed, taps, nbits)| (seed, taps.into_iter().rev().collect(), nbits))
    })
}

proptest! {
    #[test]
    fn prop_generator_deterministic((seed, taps, nbits) in lfsr_params()) {
        let first: Vec<_> = generate(seed, &taps, nbits).unwrap().collect();
        let second: Vec<_> = generate(seed, &taps, nbits).unwrap().collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_generator_bounded_and_closes((seed, taps, nbits) in lfsr_params()) {
        let mut steps = generate(seed, &taps, nbits).unwrap();
        let trace: Vec<_> = steps.by_ref().collect();

        prop_assert!(!trace.is_empty());
        prop_assert!(trace.len() as u64 <= 1u64 << nbits);
        prop_assert!(trace.iter().all(|s| s.state < 1u64 << nbits && s.bit <= 1));

        if steps.is_closed() {
            prop_assert_eq!(trace.last().map(|s| s.state), Some(seed));
            prop_assert!(trace[..trace.len() - 1].iter().all(|s| s.state != seed));
        }
        // With tap 1 the step map is a bijection, so every seed recurs
        if taps.contains(&1) {
            prop_assert!(steps.is_closed());
        }
    }

    #[test]
    fn prop_generate_matches_steps((seed, taps, nbits) in lfsr_params()) {
        prop_assume!(taps.contains(&1));
        let lfsr = Lfsr::new(seed, &taps, nbits).unwrap();
        let bits = lfsr.generate().unwrap();
        let from_steps: BitSequence = lfsr.steps().map(|s| s.bit == 1).collect();
        prop_assert_eq!(bits.len() as u64, lfsr.period().unwrap());
        prop_assert_eq!(bits, from_steps);
    }

    #[test]
    fn prop_monobit_symmetric_under_complement(bits in bit_sequence(512)) {
        let complement: BitSequence = bits.iter().map(|b| !b).collect();
        prop_assert_eq!(monobit(&bits).unwrap(), monobit(&complement).unwrap());
    }

    #[test]
    fn prop_single_block_is_monobit(bits in bit_sequence(2048)) {
        let a = block_frequency(&bits, bits.len()).unwrap();
        let b = monobit(&bits).unwrap();
        prop_assert!((a - b).abs() < 1e-9, "{} vs {}", a, b);
    }

    #[test]
    fn prop_psi_squared_one_is_monobit_statistic(bits in bit_sequence(2048)) {
        let n = bits.len() as f64;
        let s = bits.ones() as f64 - bits.zeros() as f64;
        let psi = psi_squared(&bits, 1).unwrap();
        prop_assert!((psi - s * s / n).abs() < 1e-9);

        // Q(1/2, psi/2) == erfc(|S| / sqrt(2n))
        let p = Statrs.gamma_q(0.5, psi / 2.0);
        prop_assert!((p - monobit(&bits).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn prop_serial_invariant_under_rotation(bits in bit_sequence(1024), shift in 0usize..1024, m in 2u32..=6) {
        let raw = bits.bits();
        let k = shift % raw.len();
        let rotated: BitSequence = raw[k..].iter().chain(&raw[..k]).map(|&b| b == 1).collect();
        prop_assert_eq!(
            serial_statistics(&bits, m).unwrap(),
            serial_statistics(&rotated, m).unwrap()
        );
    }

    #[test]
    fn prop_serial_first_difference_non_negative(bits in bit_sequence(1024), m in 2u32..=8) {
        let stats = serial_statistics(&bits, m).unwrap();
        prop_assert!(stats.delta1 >= 0.0);
        prop_assert!(stats.delta2 >= 0.0);
        prop_assert!(stats.psi_squared.iter().all(|&psi| psi >= 0.0));
    }

    #[test]
    fn prop_parse_display_identity(bits in bit_sequence(256)) {
        let text = bits.to_string();
        prop_assert_eq!(text.parse::<BitSequence>().unwrap(), bits);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10_000))]

    #[test]
    fn prop_p_values_in_unit_interval(
        bits in bit_sequence(2048),
        block_size in 1usize..256,
        m in 2u32..=8,
        both in any::<bool>(),
    ) {
        let p = monobit(&bits).unwrap();
        prop_assert!((0.0..=1.0).contains(&p), "monobit {}", p);

        match block_frequency(&bits, block_size) {
            Ok(p) => prop_assert!((0.0..=1.0).contains(&p), "block frequency {}", p),
            Err(e) => {
                prop_assert!(bits.len() < block_size);
                prop_assert!(matches!(e, RandomnessError::InvalidParameter(_)));
            }
        }

        let mode = if both { SerialMode::Both } else { SerialMode::First };
        let p = serial(&bits, m, mode).unwrap();
        prop_assert!((0.0..=1.0).contains(&p), "serial {}", p);
    }
}
