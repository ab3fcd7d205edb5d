pub mod dignities;
pub mod signs;
pub mod strength;

pub use dignities::{DignityPoints, DignityState, DignityTable};
pub use signs::ZodiacSign;
pub use strength::{StrengthAnalyzer, StrengthBreakdown};
