//! 切割尺寸與擺放方向模型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 含餘量的切割尺寸（cm）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutDimensions {
    /// 寬度方向切割尺寸
    pub cut_x: f64,

    /// 長度方向切割尺寸
    pub cut_y: f64,

    /// 主體切片高度
    pub box_height: f64,

    /// 配件切片高度（依請求順序）
    pub part_heights: Vec<(String, f64)>,

    /// 長軸可用長度
    pub effective_z: f64,
}

impl CutDimensions {
    /// 底面尺寸 `(cut_x, cut_y)`
    pub fn footprint(&self) -> (f64, f64) {
        (self.cut_x, self.cut_y)
    }

    /// 查詢元件切片高度（主體或配件）
    pub fn height_of(&self, component: &str) -> Option<f64> {
        if component == crate::BOX_COMPONENT {
            return Some(self.box_height);
        }
        self.part_heights
            .iter()
            .find(|(name, _)| name == component)
            .map(|(_, height)| *height)
    }
}

/// 塊材長軸的擺放角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisRole {
    /// 長軸直立（作為切片高度）
    Height,
    /// 長軸平放，承載產品寬度
    TableX,
    /// 長軸平放，承載產品長度
    TableY,
}

impl AxisRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisRole::Height => "height",
            AxisRole::TableX => "table_x",
            AxisRole::TableY => "table_y",
        }
    }
}

impl fmt::Display for AxisRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 切割台上的軸位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableSlot {
    First,
    Second,
}

/// 擺放方向候選
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrientationCandidate {
    /// 切割台底面 `(T1, T2)`
    pub table: (f64, f64),

    /// 有效高度（未用於底面的軸）
    pub h_eff: f64,

    /// 長軸角色
    pub axis_role: AxisRole,

    /// 長軸位於切割台的哪一邊（直立時為 None）
    pub constrained_slot: Option<TableSlot>,
}

impl OrientationCandidate {
    /// 長軸直立的候選
    pub fn vertical(block_x: f64, block_y: f64, effective_z: f64) -> Self {
        Self {
            table: (block_x, block_y),
            h_eff: effective_z,
            axis_role: AxisRole::Height,
            constrained_slot: None,
        }
    }

    /// 長軸平放的候選
    pub fn lying(table: (f64, f64), h_eff: f64, axis_role: AxisRole, slot: TableSlot) -> Self {
        Self {
            table,
            h_eff,
            axis_role,
            constrained_slot: Some(slot),
        }
    }

    /// 檢查分配到切割台兩邊的尺寸是否符合軸承限制
    ///
    /// 長軸所在的一邊，以及任何長度等於有效長軸的一邊，
    /// 分配到的尺寸都必須達到軸承限制。
    pub fn admits(
        &self,
        along_first: f64,
        along_second: f64,
        bearing_limit: f64,
        effective_z: f64,
    ) -> bool {
        let first_bound =
            self.constrained_slot == Some(TableSlot::First) || self.table.0 == effective_z;
        let second_bound =
            self.constrained_slot == Some(TableSlot::Second) || self.table.1 == effective_z;

        (!first_bound || along_first >= bearing_limit)
            && (!second_bound || along_second >= bearing_limit)
    }
}

/// 底面旋轉方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rotation {
    /// T1 對應 cut_x
    Normal,
    /// T1 對應 cut_y
    Rotated,
    /// 無有效擺放
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Rotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::Normal => "Normal",
            Rotation::Rotated => "Rotated",
            Rotation::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 擺放選擇結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSelection {
    /// 選中的方向
    pub candidate: OrientationCandidate,

    /// 每層可切排數
    pub rows_per_layer: u32,

    /// 底面旋轉
    pub rotation: Rotation,

    /// 使用的切割台軸
    pub table_axes: (f64, f64),

    /// 評分（產量 × 權重 + 排數）
    pub score: u64,
}

impl LayoutSelection {
    /// 無可行擺放時的退化結果
    pub fn degenerate(candidate: OrientationCandidate) -> Self {
        let table_axes = candidate.table;
        Self {
            candidate,
            rows_per_layer: 0,
            rotation: Rotation::NotApplicable,
            table_axes,
            score: 0,
        }
    }

    /// 是否為退化結果
    pub fn is_degenerate(&self) -> bool {
        self.rows_per_layer == 0
    }

    pub fn h_eff(&self) -> f64 {
        self.candidate.h_eff
    }
}
