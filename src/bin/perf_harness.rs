use std::env;
use std::hint::black_box;
use std::process;
use std::time::Instant;

use simd_basics::{add_iter, add_scalar, add_scalar_into, add_simd, add_simd_into};

const DEFAULT_SEED: u64 = 0x1234_5678_9ABC_DEF0;

#[derive(Clone, Copy)]
enum Bench {
    AddScalar,
    AddScalarInto,
    AddIter,
    AddSimd,
    AddSimdInto,
}

#[derive(Clone, Copy)]
struct Config {
    bench: Bench,
    len: usize,
    iters: usize,
    seed: u64,
    verify: bool,
    report: bool,
}

type AddFn = fn(&[i32], &[i32]) -> Vec<i32>;
type AddIntoFn = fn(&[i32], &[i32], &mut [i32]);

fn main() {
    let config = match parse_args() {
        Ok(result) => result,
        Err(err) => {
            eprintln!("error: {err}");
            print_usage(&program_name());
            process::exit(2);
        }
    };

    if config.verify {
        verify_bench(config.bench);
    }

    run_bench(config);
}

fn parse_args() -> Result<Config, String> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "perf_harness".to_string());

    let mut bench = None;
    let mut len = None;
    let mut iters = None;
    let mut seed = DEFAULT_SEED;
    let mut verify = false;
    let mut report = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--bench" => {
                let name = args.next().ok_or("--bench requires a value")?;
                let parsed = parse_bench(&name).ok_or_else(|| format!("unknown bench: {name}"))?;
                bench = Some(parsed);
            }
            "--len" => {
                let value = args.next().ok_or("--len requires a value")?;
                len = Some(parse_usize(&value, "--len")?);
            }
            "--iters" => {
                let value = args.next().ok_or("--iters requires a value")?;
                iters = Some(parse_usize(&value, "--iters")?);
            }
            "--seed" => {
                let value = args.next().ok_or("--seed requires a value")?;
                seed = parse_u64(&value, "--seed")?;
            }
            "--verify" => verify = true,
            "--report" => report = true,
            "--no-report" => report = false,
            "--list" => {
                list_benches();
                process::exit(0);
            }
            "-h" | "--help" => {
                print_usage(&program);
                process::exit(0);
            }
            _ => return Err(format!("unknown argument: {arg}")),
        }
    }

    let bench = bench.ok_or("missing --bench")?;
    let len = len.unwrap_or(1_000_000);
    let iters = iters.unwrap_or(100);

    Ok(Config {
        bench,
        len,
        iters,
        seed,
        verify,
        report,
    })
}

fn program_name() -> String {
    env::args()
        .next()
        .unwrap_or_else(|| "perf_harness".to_string())
}

fn print_usage(program: &str) {
    eprintln!(
        "\
Usage:
  {program} --bench <name> [--len N] [--iters N] [--seed N] [--verify]
  {program} --list

Options:
  --bench <name>   Benchmark to run (see --list)
  --len N          Input length in elements (default: 1000000)
  --iters N        Iterations (default: 100)
  --seed N         RNG seed (default: 0x123456789ABCDEF0)
  --verify         Run a quick correctness check before benchmarking
  --report         Print throughput summary after the run
  --no-report      Disable throughput summary
  --list           Show available benches
"
    );
}

fn list_benches() {
    println!("add_scalar");
    println!("add_scalar_into");
    println!("add_iter");
    println!("add_simd");
    println!("add_simd_into");
}

fn parse_bench(name: &str) -> Option<Bench> {
    match name {
        "add_scalar" => Some(Bench::AddScalar),
        "add_scalar_into" => Some(Bench::AddScalarInto),
        "add_iter" => Some(Bench::AddIter),
        "add_simd" => Some(Bench::AddSimd),
        "add_simd_into" => Some(Bench::AddSimdInto),
        _ => None,
    }
}

impl Bench {
    fn name(self) -> &'static str {
        match self {
            Bench::AddScalar => "add_scalar",
            Bench::AddScalarInto => "add_scalar_into",
            Bench::AddIter => "add_iter",
            Bench::AddSimd => "add_simd",
            Bench::AddSimdInto => "add_simd_into",
        }
    }
}

fn parse_usize(value: &str, flag: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("{flag} expects a non-negative integer"))
}

fn parse_u64(value: &str, flag: &str) -> Result<u64, String> {
    value
        .parse::<u64>()
        .map_err(|_| format!("{flag} expects a non-negative integer"))
}

#[inline]
fn next_u64(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    *state = x;
    x.wrapping_mul(0x2545_F491_4F6C_DD1D)
}

fn make_i32_input(len: usize, seed: u64) -> Vec<i32> {
    let mut state = seed;
    let mut values = Vec::with_capacity(len);
    for _ in 0..len {
        values.push(next_u64(&mut state) as u32 as i32);
    }
    values
}

fn run_bench(config: Config) {
    let stats = bench_stats(&config);
    let start = Instant::now();
    match config.bench {
        Bench::AddScalar => bench_add(config, add_scalar),
        Bench::AddIter => bench_add(config, add_iter),
        Bench::AddSimd => bench_add(config, add_simd),
        Bench::AddScalarInto => bench_add_into(config, add_scalar_into),
        Bench::AddSimdInto => bench_add_into(config, add_simd_into),
    }
    let elapsed = start.elapsed();
    if config.report {
        print_report(config.bench, &config, stats, elapsed);
    }
}

struct BenchStats {
    work_items: u128,
    bytes: u128,
    unit: &'static str,
}

fn bench_stats(config: &Config) -> BenchStats {
    let work_items = (config.len as u128) * (config.iters as u128);
    // Two 4-byte reads and one 4-byte write per element.
    BenchStats {
        work_items,
        bytes: work_items * 12,
        unit: "elem",
    }
}

fn print_report(bench: Bench, config: &Config, stats: BenchStats, elapsed: std::time::Duration) {
    let elapsed_s = elapsed.as_secs_f64();
    let items_per_s = stats.work_items as f64 / elapsed_s;
    let bytes_per_s = stats.bytes as f64 / elapsed_s;
    let ns_per_item = (elapsed_s * 1.0e9) / stats.work_items as f64;

    let lines = [
        format!(
            "bench={} len={} iters={}",
            bench.name(),
            config.len,
            config.iters
        ),
        format!(
            "elapsed_s={:.6} ns_per_item={:.3} throughput={}",
            elapsed_s,
            ns_per_item,
            format_rate(items_per_s, stats.unit)
        ),
        format!("work_items={} unit={}", stats.work_items, stats.unit),
        format!(
            "bytes={} byte_throughput={}",
            stats.bytes,
            format_rate(bytes_per_s, "B")
        ),
    ];

    println!("{}", lines.join("\n"));
}

fn format_rate(rate: f64, unit: &str) -> String {
    let (value, prefix) = if rate >= 1.0e12 {
        (rate / 1.0e12, "T")
    } else if rate >= 1.0e9 {
        (rate / 1.0e9, "G")
    } else if rate >= 1.0e6 {
        (rate / 1.0e6, "M")
    } else if rate >= 1.0e3 {
        (rate / 1.0e3, "K")
    } else {
        (rate, "")
    };
    format!("{value:.3} {prefix}{unit}/s")
}

fn verify_bench(bench: Bench) {
    let a = [1, 2, 3, 4, 5, 6, 7, 8, 9];
    let b = [9, 8, 7, 6, 5, 4, 3, 2, 1];
    let expected = vec![10i32; 9];

    match bench {
        Bench::AddScalar => assert_eq!(add_scalar(&a, &b), expected),
        Bench::AddIter => assert_eq!(add_iter(&a, &b), expected),
        Bench::AddSimd => assert_eq!(add_simd(&a, &b), expected),
        Bench::AddScalarInto => {
            let mut out = [0i32; 9];
            add_scalar_into(&a, &b, &mut out);
            assert_eq!(out.to_vec(), expected);
        }
        Bench::AddSimdInto => {
            let mut out = [0i32; 9];
            add_simd_into(&a, &b, &mut out);
            assert_eq!(out.to_vec(), expected);
        }
    }
}

fn bench_add(config: Config, func: AddFn) {
    let a = make_i32_input(config.len, config.seed);
    let b = make_i32_input(config.len, config.seed ^ 0x9E37_79B9_7F4A_7C15);
    let mut acc = 0i64;
    for _ in 0..config.iters {
        let out = func(black_box(&a), black_box(&b));
        acc ^= out.last().copied().unwrap_or(0) as i64;
        black_box(&out);
    }
    black_box(acc);
}

fn bench_add_into(config: Config, func: AddIntoFn) {
    let a = make_i32_input(config.len, config.seed);
    let b = make_i32_input(config.len, config.seed ^ 0x9E37_79B9_7F4A_7C15);
    let mut out = vec![0i32; config.len];
    let mut acc = 0i64;
    for _ in 0..config.iters {
        func(black_box(&a), black_box(&b), black_box(out.as_mut_slice()));
        acc ^= out.last().copied().unwrap_or(0) as i64;
    }
    black_box(acc);
}
