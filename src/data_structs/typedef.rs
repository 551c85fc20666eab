pub type ChrType = u8;
pub type PosType = u32;
pub type EffectType = f32;
pub type TraitId = String;

/// Chromosome domain of the variant store. 23 = X, 24 = Y by convention.
pub const CHR_MIN: ChrType = 1;
pub const CHR_MAX: ChrType = 24;

/// Upper bound for the position dimension.
pub const POS_MAX: PosType = 3_000_000_000;
