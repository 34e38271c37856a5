//! 切割尺寸計算

use eps_core::{CutDimensions, ManufacturingSettings, ProductSpec};

/// 切割尺寸計算器
pub struct DimensioningCalculator;

impl DimensioningCalculator {
    /// 由產品尺寸與生產參數推導含餘量的切割尺寸
    ///
    /// - 底面：產品尺寸 + 2 × 壁厚 + 平面餘量
    /// - 高度與配件厚度：加上切片餘量
    pub fn calculate(spec: &ProductSpec, settings: &ManufacturingSettings) -> CutDimensions {
        let walls = 2.0 * spec.wall_thickness;

        let part_heights = spec
            .auxiliary_parts
            .iter()
            .map(|part| (part.name.clone(), part.thickness_cm + settings.cut_allowance_z))
            .collect();

        CutDimensions {
            cut_x: spec.en + walls + settings.cut_allowance_xy,
            cut_y: spec.boy + walls + settings.cut_allowance_xy,
            box_height: spec.yukseklik + settings.cut_allowance_z,
            part_heights,
            effective_z: settings.effective_z(),
        }
    }
}

/// 一段長度可容納的件數（向下取整）
pub(crate) fn tiles(length: f64, size: f64) -> u64 {
    if !(size > 0.0) || !(length > 0.0) {
        return 0;
    }
    (length / size).floor() as u64
}
