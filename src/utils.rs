//! Common helpers shared across the crate: the global thread pool, polars
//! schema construction from parallel arrays, chromosome label normalization
//! and the z-score to -log10(p) conversion.

use once_cell::sync::Lazy;
use polars::prelude::*;
use rayon::{
    ThreadPool,
    ThreadPoolBuilder,
};
use statrs::distribution::{
    ContinuousCDF,
    Normal,
};

use crate::data_structs::typedef::{
    ChrType,
    CHR_MAX,
    CHR_MIN,
};

pub static THREAD_POOL: Lazy<ThreadPool> = Lazy::new(|| {
    let num_threads: Option<usize> = std::env::var("GWAS_NUM_THREADS")
        .ok()
        .and_then(|str| str.parse::<usize>().ok());
    ThreadPoolBuilder::new()
        .num_threads(num_threads.unwrap_or(0))
        .build()
        .expect("Failed to create thread pool")
});

static STD_NORMAL: Lazy<Normal> =
    Lazy::new(|| Normal::new(0.0, 1.0).expect("Failed to create standard normal"));

pub fn n_threads() -> usize {
    THREAD_POOL.current_num_threads()
}

/// Creates a schema from separate arrays of names and data types.
pub(crate) fn schema_from_arrays(
    names: &[&str],
    dtypes: &[DataType],
) -> Schema {
    Schema::from_iter(
        names
            .iter()
            .map(|n| PlSmallStr::from(*n))
            .zip(dtypes.iter().cloned()),
    )
}

#[macro_export]
macro_rules! plsmallstr {
    ($string: expr) => {
        PlSmallStr::from($string)
    };
}

#[macro_export]
macro_rules! with_field_fn {
    ($method: ident, $field_name: ident, $field_type: ty) => {
        pub fn $method(
            mut self,
            value: $field_type,
        ) -> Self {
            self.$field_name = value;
            self
        }
    };
}

/// Converts a z-score into -log10 of the two-sided p-value.
///
/// `2 * (1 - CDF(|z|))` under the standard normal. For large |z| the tail
/// probability underflows to zero and the result is infinite; callers are
/// expected to count and report such rows instead of failing.
pub fn log_pvalue_from_z(z: f64) -> f64 {
    let p = 2.0 * (1.0 - STD_NORMAL.cdf(z.abs()));
    -p.log10()
}

/// Normalizes a chromosome label to its numeric store encoding.
///
/// Strips a leading `chr` prefix case-insensitively and maps `X` to 23 and
/// `Y` to 24. Returns `None` for labels outside the [1, 24] domain
/// (e.g. `MT`, scaffolds).
pub fn normalize_chrom(label: &str) -> Option<ChrType> {
    let stripped = label.trim();
    // get() keeps non-ASCII labels on the drop path instead of panicking
    // on a char boundary
    let stripped = match stripped.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("chr") => &stripped[3..],
        _ => stripped,
    };
    let chr = match stripped {
        "X" | "x" => CHR_MAX - 1,
        "Y" | "y" => CHR_MAX,
        other => other.parse::<ChrType>().ok()?,
    };
    (CHR_MIN..=CHR_MAX).contains(&chr).then_some(chr)
}
