//! Golden-output regression tests.
//!
//! Expected values were computed independently at 30 significant digits
//! and pin the exact generator trace and the p-values derived from it.

use lfsr_battery::analysis::{
    block_frequency, monobit, serial, serial_statistics, SerialMode,
};
use lfsr_battery::{BitSequence, Lfsr};

const REFERENCE_CYCLE: &str = "1010111110000000010001000010010001110001010111000011000100111010000001110111001111110101010110100101001001011110100110000101000101101111001010100001111011111110011001110010011011011000001101110101100101100011111011001";

fn reference_cycle() -> BitSequence {
    Lfsr::new(0b1001_1011, &[8, 7, 6, 1], 8)
        .unwrap()
        .generate()
        .unwrap()
}

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}

#[test]
fn reference_cycle_trace() {
    let bits = reference_cycle();
    assert_eq!(bits.len(), 217);
    assert_eq!(bits.to_string(), REFERENCE_CYCLE);
}

#[test]
fn reference_cycle_monobit() {
    assert_close(monobit(&reference_cycle()).unwrap(), 0.945_877_638_528_642_2, 1e-12);
}

#[test]
fn reference_cycle_block_frequency() {
    let bits = reference_cycle();
    // 217 bits at M = 128 leaves a single block
    assert_close(block_frequency(&bits, 128).unwrap(), 0.288_844_366_346_484_87, 1e-10);
    assert_close(block_frequency(&bits, 8).unwrap(), 0.574_461_987_928_673_0, 1e-10);
}

#[test]
fn block_frequency_golden() {
    let bits: BitSequence = "000000001111111100000000111111110000000011111111"
        .parse()
        .unwrap();
    // chi^2 = 48 over 6 blocks: Q(3, 24) = 313 e^-24
    let p = block_frequency(&bits, 8).unwrap();
    let expected = 1.181_617_112_359_357_6e-8;
    assert!((p - expected).abs() / expected < 1e-7, "got {p}");
    assert_eq!(p, block_frequency(&bits, 8).unwrap());
}

#[test]
fn reference_cycle_serial() {
    let bits = reference_cycle();

    let m2 = serial_statistics(&bits, 2).unwrap();
    assert_close(m2.delta1, 0.009_216_589_861_751_152, 1e-15);
    assert_close(m2.delta2, 0.004_608_294_930_875_576, 1e-15);
    assert_close(m2.p_value1, 0.995_402_306_968_397_7, 1e-10);
    assert_close(m2.p_value2, 0.945_877_638_528_642_2, 1e-10);

    let m3 = serial_statistics(&bits, 3).unwrap();
    assert_close(m3.delta1, 0.018_433_179_723_502_304, 1e-15);
    assert_close(m3.p_value1, 0.999_957_787_305_271_0, 1e-10);
    assert_close(m3.p_value2, 0.995_402_306_968_397_7, 1e-10);

    let m4 = serial_statistics(&bits, 4).unwrap();
    assert_close(m4.delta1, 0.258_064_516_129_032_26, 1e-13);
    assert_close(m4.delta2, 0.239_631_336_405_529_95, 1e-13);
    assert_close(m4.p_value1, 0.999_989_580_456_960_9, 1e-10);
    assert_close(m4.p_value2, 0.993_370_494_378_221_4, 1e-10);

    assert_close(
        serial(&bits, 4, SerialMode::Both).unwrap(),
        0.993_370_494_378_221_4,
        1e-10,
    );
}

#[test]
fn reference_cycle_serial_default_length() {
    // 2^16 buckets for 217 bits: every window is unique, so the deltas are
    // exactly 2^15 and 2^14 and the p-values sit near 0.5
    let stats = serial_statistics(&reference_cycle(), 16).unwrap();
    assert_eq!(stats.delta1, 32768.0);
    assert_eq!(stats.delta2, 16384.0);
    assert_close(stats.p_value1, 0.498_961_087_459_223_9, 1e-6);
    assert_close(stats.p_value2, 0.498_530_755_296_721_2, 1e-6);
}

#[test]
fn alternating_sequence() {
    let bits: BitSequence = "01".repeat(64).parse().unwrap();

    assert_eq!(monobit(&bits).unwrap(), 1.0);
    assert!(serial(&bits, 3, SerialMode::First).unwrap() < 1e-50);
    assert!(serial(&bits, 3, SerialMode::Both).unwrap() < 1e-50);

    // Every one-bit block deviates by exactly 1/2, so chi^2 = n regardless
    // of balance: block size one is not the monobit test
    assert_close(block_frequency(&bits, 1).unwrap(), 0.483_376_012_496_173_5, 1e-10);
}

#[test]
fn constant_sequences_fail_monobit() {
    for len in [32, 100, 1000] {
        let zeros: BitSequence = "0".repeat(len).parse().unwrap();
        let ones: BitSequence = "1".repeat(len).parse().unwrap();
        assert!(monobit(&zeros).unwrap() < 1e-6);
        assert!(monobit(&ones).unwrap() < 1e-6);
    }
    let zeros: BitSequence = "0".repeat(32).parse().unwrap();
    assert_close(monobit(&zeros).unwrap(), 1.541_725_790_028_002e-8, 1e-15);
}
