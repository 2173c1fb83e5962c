//! Elementwise addition of two integer arrays.
//!
//! The simplest data-parallel loop there is: `c[i] = a[i] + b[i]`. One
//! addition per element, no dependency between iterations, which makes it the
//! canonical first example of SIMD execution. This module implements the same
//! operation several ways, from the plain indexed loop to an explicit
//! fixed-width vector loop.
//!
//! # Strategies
//!
//! | Function | Strategy | Best For |
//! |----------|----------|----------|
//! | [`add_scalar`] | Indexed loop, one element per iteration | Clarity, tiny inputs |
//! | [`add_iter`] | Iterator zip the compiler autovectorizes | Idiomatic code |
//! | [`add_simd`] | Explicit vector loop + scalar remainder | Guaranteed vector code |
//!
//! # Why the remainder loop
//!
//! A vector load always reads a full register's worth of elements (4 `i32`
//! lanes with NEON, 8 with AVX2). If the array length is not a multiple of
//! the lane count, loading the final partial chunk would read past the end of
//! the allocation. The fix is to split the index range at the largest
//! multiple of the lane count ([`vector_split_point`]): full vectors below
//! the split point, one element at a time above it. Both vectorized kernels
//! here follow that shape.
//!
//! Additions are wrapping. Hardware vector addition wraps on overflow, so the
//! scalar variants use [`i32::wrapping_add`] to stay bit-for-bit identical on
//! every input.
//!
//! # References
//!
//! - [SIMD chapter](https://en.algorithmica.org/hpc/simd/)

/// `i32` lanes processed per iteration by the vectorized kernels.
#[cfg(target_arch = "aarch64")]
pub const SIMD_LANES: usize = 4;
/// `i32` lanes processed per iteration by the vectorized kernels.
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub const SIMD_LANES: usize = 8;
/// `i32` lanes processed per iteration by the vectorized kernels.
#[cfg(not(any(target_arch = "aarch64", target_arch = "x86", target_arch = "x86_64")))]
pub const SIMD_LANES: usize = 1;

#[inline]
fn check_lens(a: &[i32], b: &[i32]) {
    assert_eq!(a.len(), b.len(), "input slices must have equal length");
}

/// Rounds `len` down to the largest multiple of `lanes` not exceeding it.
///
/// `lanes` must be a power of two, which turns the rounding into a single
/// bitmask: `len & !(lanes - 1)`. Indices below the returned split point can
/// be processed in full vectors; the remainder above it must be handled one
/// element at a time.
#[inline]
pub fn vector_split_point(len: usize, lanes: usize) -> usize {
    debug_assert!(lanes.is_power_of_two());
    len & !(lanes - 1)
}

/// Baseline scalar addition, one element per iteration.
pub fn add_scalar(a: &[i32], b: &[i32]) -> Vec<i32> {
    check_lens(a, b);
    let mut out = Vec::with_capacity(a.len());
    for i in 0..a.len() {
        out.push(a[i].wrapping_add(b[i]));
    }
    out
}

/// Scalar addition into a caller-provided buffer.
pub fn add_scalar_into(a: &[i32], b: &[i32], out: &mut [i32]) {
    check_lens(a, b);
    assert_eq!(out.len(), a.len(), "output slice must match input length");
    for i in 0..a.len() {
        out[i] = a[i].wrapping_add(b[i]);
    }
}

/// Iterator formulation of the same loop.
///
/// The bounds checks fold away under `zip`, leaving a loop the compiler
/// autovectorizes on its own. Useful as the "what the optimizer already
/// does" comparison point for [`add_simd`].
pub fn add_iter(a: &[i32], b: &[i32]) -> Vec<i32> {
    check_lens(a, b);
    a.iter().zip(b).map(|(&x, &y)| x.wrapping_add(y)).collect()
}

/// Runtime detection for AVX2 support.
pub fn avx2_available() -> bool {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        std::arch::is_x86_feature_detected!("avx2")
    }

    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
    {
        false
    }
}

/// Runtime availability of an explicit vector kernel (AVX2 on x86, NEON on aarch64).
pub fn simd_available() -> bool {
    #[cfg(target_arch = "aarch64")]
    {
        true
    }

    #[cfg(not(target_arch = "aarch64"))]
    {
        avx2_available()
    }
}

/// Explicitly vectorized addition with runtime dispatch.
///
/// Uses NEON on aarch64 and AVX2 on x86 when available, falling back to the
/// scalar loop otherwise. Identical output to [`add_scalar`] for every
/// length, including lengths that are not a multiple of the lane count.
pub fn add_simd(a: &[i32], b: &[i32]) -> Vec<i32> {
    check_lens(a, b);
    let mut out = vec![0i32; a.len()];
    add_simd_into(a, b, &mut out);
    out
}

/// Vectorized addition into a caller-provided buffer.
pub fn add_simd_into(a: &[i32], b: &[i32], out: &mut [i32]) {
    check_lens(a, b);
    assert_eq!(out.len(), a.len(), "output slice must match input length");

    #[cfg(target_arch = "aarch64")]
    {
        // SAFETY: aarch64 guarantees NEON availability; lengths checked above.
        unsafe { aarch64_neon::add_neon(a, b, out) }
    }

    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if avx2_available() {
            // SAFETY: guarded by AVX2 runtime detection; lengths checked above.
            unsafe { x86_avx2::add_avx2(a, b, out) }
        } else {
            add_scalar_into(a, b, out);
        }
    }

    #[cfg(not(any(target_arch = "aarch64", target_arch = "x86", target_arch = "x86_64")))]
    add_scalar_into(a, b, out);
}

#[cfg(target_arch = "aarch64")]
mod aarch64_neon {
    use std::arch::aarch64::*;

    use super::vector_split_point;

    const LANES: usize = 4;

    #[target_feature(enable = "neon")]
    pub unsafe fn add_neon(a: &[i32], b: &[i32], out: &mut [i32]) {
        unsafe {
            let n = a.len();
            let split = vector_split_point(n, LANES);
            let pa = a.as_ptr();
            let pb = b.as_ptr();
            let pc = out.as_mut_ptr();

            let mut i = 0;
            while i < split {
                let va = vld1q_s32(pa.add(i));
                let vb = vld1q_s32(pb.add(i));
                vst1q_s32(pc.add(i), vaddq_s32(va, vb));
                i += LANES;
            }

            // Fewer than LANES elements remain past the split point.
            while i < n {
                *pc.add(i) = (*pa.add(i)).wrapping_add(*pb.add(i));
                i += 1;
            }
        }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86_avx2 {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    use super::vector_split_point;

    const LANES: usize = 8;

    #[target_feature(enable = "avx2")]
    pub unsafe fn add_avx2(a: &[i32], b: &[i32], out: &mut [i32]) {
        unsafe {
            let n = a.len();
            let split = vector_split_point(n, LANES);
            let pa = a.as_ptr();
            let pb = b.as_ptr();
            let pc = out.as_mut_ptr();

            let mut i = 0;
            while i < split {
                let va = _mm256_loadu_si256(pa.add(i) as *const __m256i);
                let vb = _mm256_loadu_si256(pb.add(i) as *const __m256i);
                _mm256_storeu_si256(pc.add(i) as *mut __m256i, _mm256_add_epi32(va, vb));
                i += LANES;
            }

            // Fewer than LANES elements remain past the split point.
            while i < n {
                *pc.add(i) = (*pa.add(i)).wrapping_add(*pb.add(i));
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::TestRunner;

    fn run_equivalence_cases(cases: u32, max_len: usize) {
        let mut runner = TestRunner::new(ProptestConfig {
            cases,
            ..ProptestConfig::default()
        });
        let strat = proptest::collection::vec(any::<(i32, i32)>(), 0..=max_len);

        runner
            .run(&strat, |pairs: Vec<(i32, i32)>| {
                let (a, b): (Vec<i32>, Vec<i32>) = pairs.into_iter().unzip();

                let scalar = add_scalar(&a, &b);
                prop_assert_eq!(scalar.len(), a.len());
                for i in 0..a.len() {
                    prop_assert_eq!(scalar[i], a[i].wrapping_add(b[i]));
                }

                let mut scalar_into = vec![0i32; a.len()];
                add_scalar_into(&a, &b, &mut scalar_into);
                prop_assert_eq!(&scalar, &scalar_into);

                let iter = add_iter(&a, &b);
                prop_assert_eq!(&scalar, &iter);

                let simd = add_simd(&a, &b);
                prop_assert_eq!(&scalar, &simd);

                let mut simd_into = vec![0i32; a.len()];
                add_simd_into(&a, &b, &mut simd_into);
                prop_assert_eq!(&scalar, &simd_into);

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn prop_add_equivalence_fast() {
        run_equivalence_cases(256, 2048);
    }

    #[test]
    #[ignore]
    fn prop_add_equivalence_deep() {
        run_equivalence_cases(4096, 16384);
    }

    proptest! {
        /// Split point is a multiple of the lane count.
        #[test]
        fn split_point_multiple(len in 0usize..1_000_000, shift in 0u32..7) {
            let lanes = 1usize << shift;
            prop_assert_eq!(vector_split_point(len, lanes) % lanes, 0);
        }

        /// Split point never exceeds the length.
        #[test]
        fn split_point_bounded(len in 0usize..1_000_000, shift in 0u32..7) {
            let lanes = 1usize << shift;
            prop_assert!(vector_split_point(len, lanes) <= len);
        }

        /// Split point is the largest such multiple: one more lane overshoots.
        #[test]
        fn split_point_largest(len in 0usize..1_000_000, shift in 0u32..7) {
            let lanes = 1usize << shift;
            let split = vector_split_point(len, lanes);
            prop_assert!(len - split < lanes);
        }
    }

    #[test]
    fn split_point_known_cases() {
        let cases = [
            (0, 4, 0),
            (3, 4, 0),
            (4, 4, 4),
            (5, 4, 4),
            (8, 4, 8),
            (21, 8, 16),
            (1000, 8, 1000),
            (1003, 4, 1000),
            (1003, 8, 1000),
        ];

        for (len, lanes, expected) in cases {
            assert_eq!(
                vector_split_point(len, lanes),
                expected,
                "len={len} lanes={lanes}"
            );
        }
    }

    #[test]
    fn add_scalar_basic() {
        let a = [1, 2, 3, 4, 5];
        let b = [10, 20, 30, 40, 50];
        assert_eq!(add_scalar(&a, &b), vec![11, 22, 33, 44, 55]);
    }

    #[test]
    fn add_empty() {
        let a: [i32; 0] = [];
        let b: [i32; 0] = [];
        assert!(add_scalar(&a, &b).is_empty());
        assert!(add_iter(&a, &b).is_empty());
        assert!(add_simd(&a, &b).is_empty());
    }

    #[test]
    fn add_shorter_than_one_vector() {
        let a = [7, -3, 11];
        let b = [1, 3, -11];
        let expected = vec![8, 0, 0];
        assert_eq!(add_scalar(&a, &b), expected);
        assert_eq!(add_simd(&a, &b), expected);
    }

    #[test]
    fn add_around_lane_boundary() {
        for len in [
            SIMD_LANES.saturating_sub(1),
            SIMD_LANES,
            SIMD_LANES + 1,
            4 * SIMD_LANES - 1,
            4 * SIMD_LANES,
            4 * SIMD_LANES + 1,
        ] {
            let a: Vec<i32> = (0..len as i32).collect();
            let b: Vec<i32> = (0..len as i32).map(|v| v * 3).collect();
            assert_eq!(add_simd(&a, &b), add_scalar(&a, &b), "len={len}");
        }
    }

    #[test]
    fn add_wraps_on_overflow() {
        let a = [i32::MAX, i32::MIN];
        let b = [1, -1];
        let expected = vec![i32::MIN, i32::MAX];
        assert_eq!(add_scalar(&a, &b), expected);
        assert_eq!(add_iter(&a, &b), expected);
        assert_eq!(add_simd(&a, &b), expected);
    }

    #[test]
    fn sequential_inputs_double() {
        let a: Vec<i32> = (0..1003).collect();
        let c = add_simd(&a, &a);
        assert_eq!(c[21], 42);
        assert_eq!(c[1002], 2004);
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn mismatched_lengths_panic() {
        let a = [1, 2, 3];
        let b = [1, 2];
        add_scalar(&a, &b);
    }
}
