//! 生產計劃模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 計劃模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningMode {
    /// 訂單模式：滿足指定數量的最少塊數
    Order,
    /// 模擬模式：以預設目標數量計算，結果以單塊表示
    Simulation,
}

/// 單一元件的計劃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentPlan {
    /// 元件名稱
    pub name: String,

    /// 分配排數
    pub rows: u32,

    /// 每排產量
    pub per_row_yield: u64,

    /// 每塊產量
    pub per_block: u64,

    /// 需求數量（模擬模式為模擬目標）
    pub required: u64,

    /// 總產量
    pub total_produced: u64,

    /// 超出需求的數量（模擬模式等於總產量）
    pub excess: i64,
}

/// 生產計劃（分區搜尋結果）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlan {
    /// 計劃模式
    pub mode: PlanningMode,

    /// 每層排數
    pub rows_per_layer: u32,

    /// 需要的塊數
    pub blocks_needed: u64,

    /// 元件計劃（主體在前）
    pub components: Vec<ComponentPlan>,
}

impl ProductionPlan {
    /// 分配排數總和
    pub fn allocated_rows(&self) -> u32 {
        self.components.iter().map(|c| c.rows).sum()
    }

    /// 查詢元件計劃
    pub fn component(&self, name: &str) -> Option<&ComponentPlan> {
        self.components.iter().find(|c| c.name == name)
    }

    /// 所有元件總產量（飽和加總）
    pub fn total_units(&self) -> u64 {
        self.components
            .iter()
            .map(|c| c.total_produced)
            .fold(0, u64::saturating_add)
    }

    /// 主體總產量
    pub fn box_units(&self) -> u64 {
        self.component(crate::BOX_COMPONENT)
            .map(|c| c.total_produced)
            .unwrap_or(0)
    }

    pub fn is_order(&self) -> bool {
        self.mode == PlanningMode::Order
    }

    pub fn row_allocation(&self) -> BTreeMap<String, u32> {
        self.components.iter().map(|c| (c.name.clone(), c.rows)).collect()
    }

    pub fn per_row_yield(&self) -> BTreeMap<String, u64> {
        self.components
            .iter()
            .map(|c| (c.name.clone(), c.per_row_yield))
            .collect()
    }

    pub fn per_block(&self) -> BTreeMap<String, u64> {
        self.components
            .iter()
            .map(|c| (c.name.clone(), c.per_block))
            .collect()
    }

    pub fn total_produced(&self) -> BTreeMap<String, u64> {
        self.components
            .iter()
            .map(|c| (c.name.clone(), c.total_produced))
            .collect()
    }

    pub fn required(&self) -> BTreeMap<String, u64> {
        self.components
            .iter()
            .map(|c| (c.name.clone(), c.required))
            .collect()
    }

    pub fn excess(&self) -> BTreeMap<String, i64> {
        self.components.iter().map(|c| (c.name.clone(), c.excess)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, rows: u32, per_row_yield: u64, blocks: u64, required: u64) -> ComponentPlan {
        let per_block = rows as u64 * per_row_yield;
        let total_produced = per_block * blocks;
        ComponentPlan {
            name: name.to_string(),
            rows,
            per_row_yield,
            per_block,
            required,
            total_produced,
            excess: total_produced as i64 - required as i64,
        }
    }

    #[test]
    fn test_plan_aggregates() {
        let plan = ProductionPlan {
            mode: PlanningMode::Order,
            rows_per_layer: 9,
            blocks_needed: 10,
            components: vec![
                component("Box", 8, 6, 10, 450),
                component("Lid", 1, 90, 10, 450),
            ],
        };

        assert_eq!(plan.allocated_rows(), 9);
        assert_eq!(plan.box_units(), 480);
        assert_eq!(plan.total_units(), 480 + 900);
        assert_eq!(plan.excess()["Lid"], 450);
        assert_eq!(plan.row_allocation()["Box"], 8);
        assert!(plan.is_order());
    }

    #[test]
    fn test_total_units_saturates() {
        let mut huge = component("Box", 1, 1, 1, 0);
        huge.total_produced = u64::MAX;
        let mut lid = huge.clone();
        lid.name = "Lid".to_string();

        let plan = ProductionPlan {
            mode: PlanningMode::Simulation,
            rows_per_layer: 2,
            blocks_needed: 1,
            components: vec![huge, lid],
        };

        assert_eq!(plan.total_units(), u64::MAX);
    }
}
