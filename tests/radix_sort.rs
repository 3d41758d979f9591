//! Integration tests for the radix sort

use stream_compaction::constants::SORT_MSB;
use stream_compaction::harness::{bench_rng, gen_array, BenchConfig};
use stream_compaction::{library, reference, Device, DeviceConfig, RadixSort, ScanError};

fn test_device() -> Device {
    Device::new(DeviceConfig::default().with_threads(4).with_block_size(32)).unwrap()
}

#[test]
fn test_scenario_with_tags() {
    let device = test_device();
    let sorter = RadixSort::new(&device);
    let keys = [5u32, 1, 4, 1, 3, 2];
    let tags = ['a', 'b', 'c', 'd', 'e', 'f'];

    let (sorted, tags) = sorter.sort_by_key(6, &keys, &tags, 3).unwrap();
    assert_eq!(sorted, vec![1, 1, 2, 3, 4, 5]);
    // The two 1s keep their input order
    assert_eq!(tags, vec!['b', 'd', 'f', 'e', 'c', 'a']);
}

#[test]
fn test_empty_input() {
    let device = test_device();
    let sorter = RadixSort::new(&device);
    assert!(sorter.sort::<i32>(0, &[], SORT_MSB).unwrap().is_empty());
    let (keys, values) = sorter.sort_by_key::<u32, u8>(0, &[], &[], 7).unwrap();
    assert!(keys.is_empty() && values.is_empty());
}

#[test]
fn test_generated_arrays_match_library_sort() {
    let device = test_device();
    let sorter = RadixSort::new(&device);
    let mut rng = bench_rng();

    for (size, bound) in [(256usize, 200), (1 << 12, 2000), (1000, 1 << 30)] {
        let input = gen_array(&BenchConfig::new(size, bound), &mut rng);
        for n in [size, size - 3] {
            let expected = library::sort(n, &input).unwrap();
            let sorted = sorter.sort(n, &input, SORT_MSB).unwrap();
            assert_eq!(sorted, expected, "sort differs for n = {}", n);
            assert_eq!(reference::sort(n, &input).unwrap(), expected);
        }
    }
}

#[test]
fn test_narrow_msb_sorts_small_keys() {
    let device = test_device();
    let sorter = RadixSort::new(&device);
    let input: Vec<u16> = (0..100).map(|i| (i * 37 % 64) as u16).collect();
    let sorted = sorter.sort(100, &input, 5).unwrap();
    let mut expected = input.clone();
    expected.sort();
    assert_eq!(sorted, expected);
}

#[test]
fn test_bits_above_msb_are_ignored() {
    let device = test_device();
    let sorter = RadixSort::new(&device);
    // 16 + 1 and 1 compare equal on bits 0..=3, so input order is kept
    let sorted = sorter.sort(4, &[17u32, 2, 1, 0], 3).unwrap();
    assert_eq!(sorted, vec![0, 17, 1, 2]);
}

#[test]
fn test_precondition_violations() {
    let device = test_device();
    let sorter = RadixSort::new(&device);

    assert_eq!(
        sorter.sort(3, &[1i64, 2, -3], 62),
        Err(ScanError::NegativeKey { index: 2 })
    );
    assert_eq!(
        sorter.sort(1, &[1u8], 8),
        Err(ScanError::BitOutOfRange { msb: 8, key_bits: 8 })
    );
    assert_eq!(
        sorter.sort(5, &[1u32], 31),
        Err(ScanError::LengthMismatch {
            requested: 5,
            available: 1
        })
    );
    assert_eq!(
        sorter.sort_by_key(2, &[1u32, 2], &[0u8], 31),
        Err(ScanError::LengthMismatch {
            requested: 2,
            available: 1
        })
    );
}

#[test]
fn test_pass_count_follows_msb() {
    let device = test_device();
    let sorter = RadixSort::new(&device);
    sorter.sort(8, &[7u32, 6, 5, 4, 3, 2, 1, 0], 2).unwrap();

    // Per bit: extract, 2 * log2(8) sweep levels, addresses, scatter
    let per_bit = 1 + 2 * 3 + 1 + 1;
    assert_eq!(device.stats().launches, 3 * per_bit);
    assert_eq!(device.memory_in_use(), 0);
}

#[test]
fn test_failed_allocation_releases_earlier_buffers() {
    let keys = [7u32, 6, 5, 4, 3, 2, 1, 0];
    // Two key buffers and three usize scratch buffers of 8 cells each
    let needed = 2 * 8 * std::mem::size_of::<u32>() + 3 * 8 * std::mem::size_of::<usize>();

    for budget in (0..needed).step_by(4) {
        let device = Device::new(
            DeviceConfig::default()
                .with_threads(1)
                .with_memory_budget(budget),
        )
        .unwrap();
        let err = RadixSort::new(&device).sort(8, &keys, 2).unwrap_err();
        assert!(
            matches!(err, ScanError::OutOfDeviceMemory { .. }),
            "budget {} gave {:?}",
            budget,
            err
        );
        assert_eq!(device.memory_in_use(), 0, "budget {} leaked", budget);
        assert_eq!(device.stats().launches, 0);
    }

    let device = Device::new(
        DeviceConfig::default()
            .with_threads(1)
            .with_memory_budget(needed),
    )
    .unwrap();
    let sorted = RadixSort::new(&device).sort(8, &keys, 2).unwrap();
    assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(device.memory().peak(), needed);
    assert_eq!(device.memory_in_use(), 0);
}

#[test]
fn test_payload_allocation_failure_releases_keys() {
    let keys = [3u32, 1, 2, 0];
    let values = [0u64, 1, 2, 3];
    // Room for both key buffers only
    let device = Device::new(
        DeviceConfig::default()
            .with_threads(1)
            .with_memory_budget(2 * 4 * std::mem::size_of::<u32>()),
    )
    .unwrap();
    let err = RadixSort::new(&device)
        .sort_by_key(4, &keys, &values, 1)
        .unwrap_err();
    assert!(matches!(err, ScanError::OutOfDeviceMemory { .. }));
    assert_eq!(device.memory_in_use(), 0);
}
