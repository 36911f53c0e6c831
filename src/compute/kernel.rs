//! kernel.rs
//! Elementwise series operations used by the evaluator.
//!
//! **Optimization:** Lanes of four are processed with `wide::f64x4`; the tail
//! is handled scalar.
use wide::f64x4;

#[inline(always)]
fn lane(s: &[f64]) -> f64x4 {
    f64x4::from([s[0], s[1], s[2], s[3]])
}

/// `dest[i] += src[i]` over the common length.
pub fn add_assign(dest: &mut [f64], src: &[f64]) {
    let len = dest.len().min(src.len());
    let (dest, src) = (&mut dest[..len], &src[..len]);

    let mut d_chunks = dest.chunks_exact_mut(4);
    let mut s_chunks = src.chunks_exact(4);
    for (d, s) in (&mut d_chunks).zip(&mut s_chunks) {
        d.copy_from_slice(&(lane(d) + lane(s)).to_array());
    }
    for (d, s) in d_chunks.into_remainder().iter_mut().zip(s_chunks.remainder()) {
        *d += s;
    }
}

/// `dest[i] *= factors[i]` over the common length.
pub fn mul_assign(dest: &mut [f64], factors: &[f64]) {
    let len = dest.len().min(factors.len());
    let (dest, factors) = (&mut dest[..len], &factors[..len]);

    let mut d_chunks = dest.chunks_exact_mut(4);
    let mut f_chunks = factors.chunks_exact(4);
    for (d, f) in (&mut d_chunks).zip(&mut f_chunks) {
        d.copy_from_slice(&(lane(d) * lane(f)).to_array());
    }
    for (d, f) in d_chunks.into_remainder().iter_mut().zip(f_chunks.remainder()) {
        *d *= f;
    }
}

/// Elementwise sum of equally long series. Empty input gives `len` zeros.
pub fn sum_series<'a>(series: impl IntoIterator<Item = &'a [f64]>, len: usize) -> Vec<f64> {
    let mut out = vec![0.0; len];
    for s in series {
        add_assign(&mut out, s);
    }
    out
}
