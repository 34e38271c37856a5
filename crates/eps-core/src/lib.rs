//! # EPS Core
//!
//! 核心資料模型與類型定義

pub mod layout;
pub mod numeric;
pub mod plan;
pub mod product;
pub mod request;
pub mod result;
pub mod settings;

// Re-export 主要類型
pub use layout::{AxisRole, CutDimensions, LayoutSelection, OrientationCandidate, Rotation, TableSlot};
pub use numeric::NumericField;
pub use plan::{ComponentPlan, PlanningMode, ProductionPlan};
pub use product::{
    AuxiliaryPart, AuxiliaryPartInput, OperationType, ProductInput, ProductSpec, BOX_COMPONENT,
    DEFAULT_DENSITY,
};
pub use request::{CalculationRequest, ResolvedRequest};
pub use result::{
    CalcWarning, CalculationDetails, CalculationResult, CutDimensionSummary, LayoutSummary,
    OrientationSummary, PricingDetails, PricingResult, WarningSeverity,
};
pub use settings::{
    ManufacturingSettings, PartialManufacturingSettings, PartialPricingSettings, PricingSettings,
};

/// EPS 計算錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum EpsError {
    #[error("無效的輸入: {0}")]
    InvalidInput(String),

    #[error("找不到可行的擺放方向: {0}")]
    InfeasibleLayout(String),

    #[error("搜尋空間超出上限: 組合數 {attempted} 超過限制 {limit}")]
    SearchSpaceExceeded { limit: u64, attempted: u128 },

    #[error("無法滿足生產需求: {0}")]
    InfeasibleProduction(String),

    #[error("配置錯誤: {0}")]
    Configuration(String),

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EpsError {
    /// 錯誤類別標籤（供外部呈現層分辨）
    pub fn kind(&self) -> &'static str {
        match self {
            EpsError::InvalidInput(_) => "invalid_input",
            EpsError::InfeasibleLayout(_) => "infeasible_layout",
            EpsError::SearchSpaceExceeded { .. } => "search_space_exceeded",
            EpsError::InfeasibleProduction(_) => "infeasible_production",
            EpsError::Configuration(_) => "configuration",
            EpsError::Serialization(_) => "serialization",
        }
    }
}

pub type Result<T> = std::result::Result<T, EpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_and_message() {
        let error = EpsError::SearchSpaceExceeded {
            limit: 900_000,
            attempted: 2_000_000,
        };

        assert_eq!(error.kind(), "search_space_exceeded");
        assert!(error.to_string().contains("900000"));
        assert!(error.to_string().contains("2000000"));
    }
}
