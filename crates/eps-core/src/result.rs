//! 計算結果模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::layout::{AxisRole, Rotation};
use crate::plan::PlanningMode;

/// 價格明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingDetails {
    /// 每塊原料價
    pub raw_block_price: Decimal,

    /// 每塊含利潤價
    pub profit_block_price: Decimal,

    /// 總運費
    pub total_shipping_cost: Decimal,

    /// 總加工費
    pub total_processing_cost: Decimal,

    /// 是否套用大量折扣
    pub is_discounted: bool,
}

/// 價格結果（金額已四捨五入至兩位小數）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    /// 含稅總價
    pub total_price: Decimal,

    /// 單價
    pub unit_price: Decimal,

    pub details: PricingDetails,
}

/// 方向摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationSummary {
    pub axis_role: AxisRole,
    pub h_eff: f64,
}

/// 切割尺寸摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutDimensionSummary {
    pub footprint: (f64, f64),
    pub box_height: f64,
    pub part_heights: BTreeMap<String, f64>,
}

/// 擺放摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub rows_per_layer: u32,
    pub rotation: Rotation,
    pub table_axes: (f64, f64),
}

/// 計算診斷明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationDetails {
    pub block_dimensions: [f64; 3],
    pub orientation: OrientationSummary,
    pub cut_dimensions: CutDimensionSummary,
    pub layout: LayoutSummary,
    pub per_row_yield: BTreeMap<String, u64>,
    pub row_allocation: BTreeMap<String, u32>,
}

/// 警告嚴重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    Info,
    Warning,
}

/// 計算警告（不影響結果的提示）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcWarning {
    /// 相關元件（無特定元件時為 None）
    pub component: Option<String>,
    pub message: String,
    pub severity: WarningSeverity,
}

impl CalcWarning {
    pub fn info(component: Option<String>, message: String) -> Self {
        Self {
            component,
            message,
            severity: WarningSeverity::Info,
        }
    }

    pub fn warning(component: Option<String>, message: String) -> Self {
        Self {
            component,
            message,
            severity: WarningSeverity::Warning,
        }
    }
}

/// 完整計算結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// 計劃模式
    pub mode: PlanningMode,

    /// 需要的塊數（模擬模式固定為 1）
    pub blocks_needed: u64,

    /// 每塊產量
    pub per_block: BTreeMap<String, u64>,

    /// 需求數量（僅訂單模式）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<BTreeMap<String, u64>>,

    /// 超出需求的數量
    pub excess: BTreeMap<String, i64>,

    /// 總產量
    pub total_produced: BTreeMap<String, u64>,

    pub pricing: PricingResult,

    pub details: CalculationDetails,

    /// 警告
    #[serde(default)]
    pub warnings: Vec<CalcWarning>,
}

impl CalculationResult {
    /// 添加警告
    pub fn add_warning(&mut self, warning: CalcWarning) {
        self.warnings.push(warning);
    }
}
