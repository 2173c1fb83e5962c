//! The tutorial demo: add two sequences and print one element.
//!
//! The length is deliberately not a multiple of any lane count so the
//! vectorized path has to take its scalar remainder loop.

use simd_basics::add_simd;

const N: i32 = 1003;

fn main() {
    let a: Vec<i32> = (0..N).collect();
    let b: Vec<i32> = (0..N).collect();

    let c = add_simd(&a, &b);

    println!("c[21] = {}", c[21]);
}
