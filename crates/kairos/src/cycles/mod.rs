pub mod lunar;
pub mod retrograde;
pub mod void;

pub use lunar::{illumination, lunar_phase, phase_angle, phase_or_fallback, CyclicalPhase, LunarPhase};
pub use retrograde::{impacted_bodies, is_retrograde, retrograde_bodies};
pub use void::{VoidCalculator, VoidWindow};
