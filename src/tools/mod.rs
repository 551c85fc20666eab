//! Analytical tools: the locus-breaker clumping algorithm and the derived
//! column post-processing shared by every extraction strategy.

pub mod locus;
pub mod postprocess;

#[cfg(test)]
mod tests;

pub use locus::{
    locus_breaker,
    LocusBreakerConfig,
};
pub use postprocess::process;
