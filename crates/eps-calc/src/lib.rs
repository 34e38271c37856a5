//! # EPS Calculation Engine
//!
//! 切割尺寸、擺放方向、排數分配與計價

pub mod calculator;
pub mod composition;
pub mod dimensioning;
pub mod layout_selector;
pub mod orientation;
pub mod partitioner;
pub mod pricing_engine;

// Re-export 主要類型
pub use calculator::EpsCalculator;
pub use composition::{composition_count, Compositions};
pub use dimensioning::DimensioningCalculator;
pub use layout_selector::{LayoutEvaluation, LayoutSelector};
pub use orientation::OrientationEnumerator;
pub use partitioner::{ProductionPartitioner, SearchOutcome};
pub use pricing_engine::{PriceBreakdown, PricingEngine};

use eps_core::{CalculationResult, ManufacturingSettings, PricingSettings, ProductSpec, Result};

/// 單次計算入口
pub fn calculate(
    spec: &ProductSpec,
    manufacturing: &ManufacturingSettings,
    pricing: &PricingSettings,
) -> Result<CalculationResult> {
    calculator::run(spec, manufacturing, pricing)
}
