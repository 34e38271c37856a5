//! 擺放選擇
//!
//! 對每個方向候選評估兩種底面旋轉，取排數較多者，
//! 再以「產量 × 權重 + 排數」評分選出最佳方向。

use eps_core::{
    CutDimensions, EpsError, LayoutSelection, ManufacturingSettings, OrientationCandidate, Result,
    Rotation,
};

use serde::Serialize;

use crate::dimensioning::tiles;

/// 單一候選的評估結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutEvaluation {
    /// 每層排數
    pub rows: u32,

    /// 底面旋轉
    pub rotation: Rotation,

    /// 每排主體件數
    pub box_per_layer: u64,

    /// 每塊主體件數（僅主體時）
    pub total_boxes: u64,

    /// 評分
    pub score: u64,
}

/// 擺放選擇器
pub struct LayoutSelector;

impl LayoutSelector {
    /// 評估單一方向候選，排數為 0 時回傳 None
    ///
    /// 排數超出 `u32` 範圍時回傳 [`EpsError::InfeasibleLayout`]。
    pub fn evaluate(
        candidate: &OrientationCandidate,
        dims: &CutDimensions,
        settings: &ManufacturingSettings,
    ) -> Result<Option<LayoutEvaluation>> {
        let (t1, t2) = candidate.table;
        let bearing = settings.bearing_limit;
        let ez = dims.effective_z;

        // 旋轉 A：T1 ↦ cut_x, T2 ↦ cut_y
        let normal = if candidate.admits(dims.cut_x, dims.cut_y, bearing, ez) {
            tiles(t1, dims.cut_x).saturating_mul(tiles(t2, dims.cut_y))
        } else {
            0
        };

        // 旋轉 B：T1 ↦ cut_y, T2 ↦ cut_x
        let rotated = if candidate.admits(dims.cut_y, dims.cut_x, bearing, ez) {
            tiles(t1, dims.cut_y).saturating_mul(tiles(t2, dims.cut_x))
        } else {
            0
        };

        let rows = normal.max(rotated);
        if rows == 0 {
            return Ok(None);
        }
        let rows = u32::try_from(rows).map_err(|_| {
            EpsError::InfeasibleLayout(format!(
                "底面 {} × {} cm 在切割台 {:?} 上的排數 {} 超出上限",
                dims.cut_x, dims.cut_y, candidate.table, rows
            ))
        })?;

        let rotation = if normal >= rotated {
            Rotation::Normal
        } else {
            Rotation::Rotated
        };

        let box_per_layer = tiles(candidate.h_eff, dims.box_height);
        let total_boxes = u64::from(rows).saturating_mul(box_per_layer);
        let score = total_boxes
            .saturating_mul(settings.scoring_weight_qty)
            .saturating_add(u64::from(rows));

        Ok(Some(LayoutEvaluation {
            rows,
            rotation,
            box_per_layer,
            total_boxes,
            score,
        }))
    }

    /// 選出評分最高的方向（同分取先列舉者）
    ///
    /// 沒有任何候選可擺放時回傳退化結果（0 排）。
    pub fn select(
        candidates: &[OrientationCandidate],
        dims: &CutDimensions,
        settings: &ManufacturingSettings,
    ) -> Result<LayoutSelection> {
        let mut best: Option<LayoutSelection> = None;

        for candidate in candidates {
            let Some(evaluation) = Self::evaluate(candidate, dims, settings)? else {
                tracing::debug!("方向 {} {:?} 無法擺放，略過", candidate.axis_role, candidate.table);
                continue;
            };

            tracing::debug!(
                "方向 {} {:?}: {} 排, 旋轉 {}, 每排 {} 件, 評分 {}",
                candidate.axis_role,
                candidate.table,
                evaluation.rows,
                evaluation.rotation,
                evaluation.box_per_layer,
                evaluation.score
            );

            let is_better = best
                .as_ref()
                .map_or(true, |current| evaluation.score > current.score);

            if is_better {
                best = Some(LayoutSelection {
                    candidate: candidate.clone(),
                    rows_per_layer: evaluation.rows,
                    rotation: evaluation.rotation,
                    table_axes: candidate.table,
                    score: evaluation.score,
                });
            }
        }

        Ok(best.unwrap_or_else(|| {
            let fallback = candidates.first().cloned().unwrap_or_else(|| {
                OrientationCandidate::vertical(settings.block_x, settings.block_y, dims.effective_z)
            });
            LayoutSelection::degenerate(fallback)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensioning::DimensioningCalculator;
    use crate::orientation::OrientationEnumerator;
    use eps_core::{AxisRole, ProductSpec, TableSlot};

    fn select_for(spec: &ProductSpec, settings: &ManufacturingSettings) -> LayoutSelection {
        let dims = DimensioningCalculator::calculate(spec, settings);
        let candidates = OrientationEnumerator::enumerate(&dims, settings);
        LayoutSelector::select(&candidates, &dims, settings).unwrap()
    }

    #[test]
    fn test_small_cube_uses_vertical_layout() {
        let settings = ManufacturingSettings::default();
        let selection = select_for(&ProductSpec::new(30.0, 30.0, 30.0, 1.0), &settings);

        // 32.5 × 32.5 底面：floor(103/32.5)=3, floor(122/32.5)=3
        assert_eq!(selection.rows_per_layer, 9);
        assert_eq!(selection.candidate.axis_role, AxisRole::Height);
        assert_eq!(selection.rotation, Rotation::Normal);
        // 每排 floor(199/30.2)=6 件
        assert_eq!(selection.score, 54 * 1000 + 9);
    }

    #[test]
    fn test_wide_product_lays_long_axis_on_table() {
        let settings = ManufacturingSettings::default();
        // 切割尺寸 54.5 × 54.5 × 50.2
        let selection = select_for(&ProductSpec::new(50.0, 50.0, 50.0, 2.0), &settings);

        // 直立: 1 × 2 排 × 3 件 = 6；平放 (199,122): 3 × 2 排 × 2 件 = 12
        assert_eq!(selection.candidate.axis_role, AxisRole::TableX);
        assert_eq!(selection.table_axes, (199.0, 122.0));
        assert_eq!(selection.rows_per_layer, 6);
    }

    #[test]
    fn test_rotation_chosen_when_better() {
        let settings = ManufacturingSettings::default();
        let dims = CutDimensions {
            cut_x: 60.0,
            cut_y: 30.0,
            box_height: 10.0,
            part_heights: Vec::new(),
            effective_z: 199.0,
        };
        let candidate = OrientationCandidate::vertical(50.0, 120.0, 199.0);

        // A: floor(50/60)=0；B: floor(50/30)=1 × floor(120/60)=2
        let evaluation = LayoutSelector::evaluate(&candidate, &dims, &settings).unwrap().unwrap();
        assert_eq!(evaluation.rows, 2);
        assert_eq!(evaluation.rotation, Rotation::Rotated);
    }

    #[test]
    fn test_bearing_rule_blocks_rotation() {
        let settings = ManufacturingSettings::default();
        let dims = CutDimensions {
            cut_x: 50.0,
            cut_y: 20.0,
            box_height: 10.0,
            part_heights: Vec::new(),
            effective_z: 199.0,
        };
        let candidate =
            OrientationCandidate::lying((199.0, 122.0), 103.0, AxisRole::TableX, TableSlot::First);

        // 旋轉 B 會把 20cm 放在長軸上，違反 44cm 限制
        let evaluation = LayoutSelector::evaluate(&candidate, &dims, &settings).unwrap().unwrap();
        assert_eq!(evaluation.rotation, Rotation::Normal);
        assert_eq!(evaluation.rows, 3 * 6);
    }

    #[test]
    fn test_tie_keeps_first_candidate() {
        let settings = ManufacturingSettings::default().with_bearing_limit(0.0);
        let dims = CutDimensions {
            cut_x: 10.0,
            cut_y: 10.0,
            box_height: 10.0,
            part_heights: Vec::new(),
            effective_z: 100.0,
        };
        let first = OrientationCandidate::vertical(100.0, 100.0, 100.0);
        let second = OrientationCandidate::lying((100.0, 100.0), 100.0, AxisRole::TableX, TableSlot::First);

        let selection = LayoutSelector::select(&[first.clone(), second], &dims, &settings).unwrap();
        assert_eq!(selection.candidate, first);
    }

    #[test]
    fn test_oversized_product_degenerates() {
        let settings = ManufacturingSettings::default();
        let selection = select_for(&ProductSpec::new(150.0, 150.0, 30.0, 1.0), &settings);

        assert!(selection.is_degenerate());
        assert_eq!(selection.rotation, Rotation::NotApplicable);
    }

    #[test]
    fn test_bearing_applies_to_block_axis_equal_to_effective_z() {
        // 有效長軸 106 - 3 = 103，與 block_x 相同
        let settings = ManufacturingSettings::default().with_block_dimensions(103.0, 122.0, 106.0);
        let selection = select_for(&ProductSpec::new(30.0, 30.0, 30.0, 1.0), &settings);

        // 32.5cm 不足 44cm，不可放在長度 103 的一邊
        assert!(selection.is_degenerate());
    }

    #[test]
    fn test_bearing_satisfied_on_block_axis_equal_to_effective_z() {
        let settings = ManufacturingSettings::default().with_block_dimensions(103.0, 122.0, 106.0);
        // cut_x = 45 + 2 + 0.5 = 47.5 ≥ 44
        let selection = select_for(&ProductSpec::new(30.0, 45.0, 30.0, 1.0), &settings);

        assert_eq!(selection.candidate.axis_role, AxisRole::Height);
        assert_eq!(selection.rotation, Rotation::Normal);
        assert_eq!(selection.rows_per_layer, 2 * 3);
    }

    #[test]
    fn test_row_count_beyond_u32_is_error() {
        let settings = ManufacturingSettings::default();
        let dims = CutDimensions {
            cut_x: 1e-6,
            cut_y: 1e-6,
            box_height: 10.0,
            part_heights: Vec::new(),
            effective_z: 199.0,
        };
        let candidate = OrientationCandidate::vertical(103.0, 122.0, 199.0);

        let error = LayoutSelector::evaluate(&candidate, &dims, &settings).unwrap_err();
        assert!(matches!(error, EpsError::InfeasibleLayout(_)));
        assert!(LayoutSelector::select(&[candidate], &dims, &settings).is_err());
    }
}
