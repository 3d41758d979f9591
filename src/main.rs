//! Console benchmark for the scan, compaction and radix sort implementations
//!
//! Usage: `stream_compaction [size]` (default 2^20). Device settings come from
//! the `STREAM_COMPACTION_*` environment variables; set `RUST_LOG=debug` to
//! see per-operation logs.

use std::error::Error;

use stream_compaction::constants::*;
use stream_compaction::harness::*;
use stream_compaction::{
    averaged, compact_with_scan, create_scanner, library, reference, timed, Device, RadixSort,
    ScanKind,
};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let size = match std::env::args().nth(1) {
        Some(arg) => match arg.parse::<usize>() {
            Ok(size) if size > BENCH_NPOT_OFFSET => size,
            _ => {
                print_usage();
                return Ok(());
            }
        },
        None => BENCH_SIZE,
    };

    let device = Device::from_env()?;
    println!(
        "stream_compaction {} on {} workers, block size {}",
        stream_compaction::VERSION,
        device.n_threads(),
        device.block_size()
    );

    let config = BenchConfig::new(size, SCAN_VALUE_BOUND);
    let mut rng = bench_rng();

    run_scan_tests(&device, &config, &mut rng)?;
    run_compaction_tests(&device, &config.with_bound(COMPACT_VALUE_BOUND), &mut rng)?;
    run_sort_tests(&device, &config, &mut rng)?;

    Ok(())
}

fn print_usage() {
    println!("Usage: stream_compaction [size]");
    println!();
    println!("  size  - array length, larger than {}", BENCH_NPOT_OFFSET);
}

fn print_banner(title: &str) {
    let rule = "*".repeat(title.len() + 6);
    println!();
    println!("{}", rule);
    println!("** {} **", title);
    println!("{}", rule);
}

fn run_scan_tests(
    device: &Device,
    config: &BenchConfig,
    rng: &mut impl rand::Rng,
) -> Result<(), Box<dyn Error>> {
    print_banner("SCAN TESTS");

    let a = gen_array(config, rng);
    print_array(&a, true);

    let size = config.size;
    let npot = config.non_power_of_two();

    // Reference results for both lengths
    print_desc("reference scan, power-of-two");
    let expected = averaged(BENCH_ITERATIONS, || reference::exclusive_scan(size, &a))?;
    print_array(&expected.result, true);
    print_elapsed(expected.millis());

    print_desc("reference scan, non-power-of-two");
    let expected_npot = averaged(BENCH_ITERATIONS, || reference::exclusive_scan(npot, &a))?;
    print_array(&expected_npot.result, true);
    print_cmp_result(npot, &expected.result, &expected_npot.result);
    print_elapsed(expected_npot.millis());

    for kind in ScanKind::ALL.into_iter().skip(1) {
        let scanner = create_scanner::<i32>(kind, device);

        print_desc(&format!("{} scan, power-of-two", scanner.name()));
        let out = timed(|| scanner.scan(size, &a))?;
        print_array(&out.result, true);
        print_cmp_result(size, &expected.result, &out.result);
        print_elapsed(out.millis());

        print_desc(&format!("{} scan, non-power-of-two", scanner.name()));
        let out = timed(|| scanner.scan(npot, &a))?;
        print_array(&out.result, true);
        print_cmp_result(npot, &expected.result, &out.result);
        print_elapsed(out.millis());
    }

    Ok(())
}

fn run_compaction_tests(
    device: &Device,
    config: &BenchConfig,
    rng: &mut impl rand::Rng,
) -> Result<(), Box<dyn Error>> {
    print_banner("STREAM COMPACTION TESTS");

    let a = gen_array(config, rng);
    print_array(&a, true);

    let size = config.size;
    let npot = config.non_power_of_two();

    print_desc("reference compact without scan, power-of-two");
    let expected = averaged(BENCH_ITERATIONS, || reference::compact_without_scan(size, &a))?;
    print_array(expected.result.kept(), true);
    print_elapsed(expected.millis());

    print_desc("reference compact without scan, non-power-of-two");
    let expected_npot = averaged(BENCH_ITERATIONS, || reference::compact_without_scan(npot, &a))?;
    print_array(expected_npot.result.kept(), true);
    print_cmp_len_result(
        expected_npot.result.count,
        expected_npot.result.count,
        &expected.result.output,
        &expected_npot.result.output,
    );
    print_elapsed(expected_npot.millis());

    print_desc("reference compact with scan");
    let out = averaged(BENCH_ITERATIONS, || reference::compact_with_scan(size, &a))?;
    print_array(out.result.kept(), true);
    print_cmp_len_result(
        out.result.count,
        expected.result.count,
        &expected.result.output,
        &out.result.output,
    );
    print_elapsed(out.millis());

    print_desc("work-efficient compact, power-of-two");
    let out = timed(|| compact_with_scan(device, size, &a))?;
    print_array(out.result.kept(), true);
    print_cmp_len_result(
        out.result.count,
        expected.result.count,
        &expected.result.output,
        &out.result.output,
    );
    print_elapsed(out.millis());

    print_desc("work-efficient compact, non-power-of-two");
    let out = timed(|| compact_with_scan(device, npot, &a))?;
    print_array(out.result.kept(), true);
    print_cmp_len_result(
        out.result.count,
        expected_npot.result.count,
        &expected_npot.result.output,
        &out.result.output,
    );
    print_elapsed(out.millis());

    Ok(())
}

fn run_sort_tests(
    device: &Device,
    config: &BenchConfig,
    rng: &mut impl rand::Rng,
) -> Result<(), Box<dyn Error>> {
    print_banner("RADIX SORT TESTS");

    let sorter = RadixSort::new(device);
    let runs = [
        ("power-of-two", config.size, SORT_VALUE_BOUND),
        ("non-power-of-two", config.non_power_of_two(), SORT_NPOT_VALUE_BOUND),
    ];

    for (label, n, bound) in runs {
        let a = gen_array(&config.with_bound(bound), rng);
        print_desc(&format!("array to be sorted, {}", label));
        print_array(&a[..n], true);

        print_desc(&format!("radix sort, {}", label));
        let out = timed(|| sorter.sort(n, &a, SORT_MSB))?;
        print_array(&out.result, true);
        print_elapsed(out.millis());

        print_desc(&format!("library sort, {}", label));
        let expected = timed(|| library::sort(n, &a))?;
        print_array(&expected.result, true);
        print_cmp_result(n, &expected.result, &out.result);
        print_elapsed(expected.millis());
    }

    Ok(())
}
