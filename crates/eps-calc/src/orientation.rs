//! 擺放方向列舉
//!
//! 塊材長軸只有在沿長軸的產品尺寸達到軸承限制時才可平放在切割台上。

use eps_core::{AxisRole, CutDimensions, ManufacturingSettings, OrientationCandidate, TableSlot};

/// 擺放方向列舉器
pub struct OrientationEnumerator;

impl OrientationEnumerator {
    /// 列舉所有物理上可行的方向
    ///
    /// 順序固定：直立 → 長軸承載寬度（兩個）→ 長軸承載長度（兩個）。
    /// 擺放選擇時同分取先列舉者，因此順序即為決勝規則。
    pub fn enumerate(
        dims: &CutDimensions,
        settings: &ManufacturingSettings,
    ) -> Vec<OrientationCandidate> {
        let (bx, by) = (settings.block_x, settings.block_y);
        let ez = dims.effective_z;

        let mut candidates = vec![OrientationCandidate::vertical(bx, by, ez)];

        if dims.cut_x >= settings.bearing_limit {
            candidates.push(OrientationCandidate::lying((ez, by), bx, AxisRole::TableX, TableSlot::First));
            candidates.push(OrientationCandidate::lying((ez, bx), by, AxisRole::TableX, TableSlot::First));
        }

        if dims.cut_y >= settings.bearing_limit {
            candidates.push(OrientationCandidate::lying((bx, ez), by, AxisRole::TableY, TableSlot::Second));
            candidates.push(OrientationCandidate::lying((by, ez), bx, AxisRole::TableY, TableSlot::Second));
        }

        tracing::debug!(
            "方向候選 {} 個 (cut_x={}, cut_y={}, 軸承限制={})",
            candidates.len(),
            dims.cut_x,
            dims.cut_y,
            settings.bearing_limit
        );

        candidates
    }
}
