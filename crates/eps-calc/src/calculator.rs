//! EPS 主計算器

use eps_core::{
    CalcWarning, CalculationDetails, CalculationRequest, CalculationResult, CutDimensionSummary,
    CutDimensions, EpsError, LayoutSelection, LayoutSummary, ManufacturingSettings,
    OrientationSummary, PricingSettings, ProductSpec, ProductionPlan, Result,
};
use rayon::prelude::*;

use crate::dimensioning::DimensioningCalculator;
use crate::layout_selector::LayoutSelector;
use crate::orientation::OrientationEnumerator;
use crate::partitioner::ProductionPartitioner;
use crate::pricing_engine::PricingEngine;

/// EPS 計算器
///
/// 持有系統層級的生產與價格參數；每次計算都不修改內部狀態，
/// 相同輸入必得相同輸出。
#[derive(Debug, Clone, Default)]
pub struct EpsCalculator {
    /// 生產參數
    manufacturing: ManufacturingSettings,

    /// 價格參數
    pricing: PricingSettings,
}

impl EpsCalculator {
    /// 創建新的計算器
    pub fn new(manufacturing: ManufacturingSettings, pricing: PricingSettings) -> Self {
        Self {
            manufacturing,
            pricing,
        }
    }

    /// 建構器模式：替換生產參數
    pub fn with_manufacturing(mut self, manufacturing: ManufacturingSettings) -> Self {
        self.manufacturing = manufacturing;
        self
    }

    /// 建構器模式：替換價格參數
    pub fn with_pricing(mut self, pricing: PricingSettings) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn manufacturing(&self) -> &ManufacturingSettings {
        &self.manufacturing
    }

    pub fn pricing(&self) -> &PricingSettings {
        &self.pricing
    }

    /// 主計算入口
    pub fn calculate(&self, spec: &ProductSpec) -> Result<CalculationResult> {
        run(spec, &self.manufacturing, &self.pricing)
    }

    /// 套用請求內的配置覆寫後計算
    pub fn calculate_request(&self, request: CalculationRequest) -> Result<CalculationResult> {
        let resolved = request.resolve(&self.manufacturing, &self.pricing)?;
        run(&resolved.product, &resolved.manufacturing, &resolved.pricing)
    }

    /// JSON 請求 → JSON 結果
    pub fn calculate_json(&self, json: &str) -> Result<String> {
        let request = CalculationRequest::from_json(json)?;
        let result = self.calculate_request(request)?;
        Ok(serde_json::to_string(&result)?)
    }

    /// 批次計算（並行），結果順序與輸入一致
    pub fn calculate_batch(&self, requests: Vec<CalculationRequest>) -> Vec<Result<CalculationResult>> {
        tracing::info!("開始批次計算：{} 筆請求", requests.len());

        requests
            .into_par_iter()
            .map(|request| self.calculate_request(request))
            .collect()
    }
}

/// 以指定配置執行完整計算
pub(crate) fn run(
    spec: &ProductSpec,
    manufacturing: &ManufacturingSettings,
    pricing: &PricingSettings,
) -> Result<CalculationResult> {
    tracing::info!(
        "開始 EPS 計算：{}×{}×{} cm，配件 {} 個",
        spec.boy,
        spec.en,
        spec.yukseklik,
        spec.auxiliary_parts.len()
    );

    spec.validate()?;
    manufacturing.validate()?;
    pricing.validate()?;

    // Step 1: 切割尺寸
    tracing::debug!("Step 1: 切割尺寸");
    let dims = DimensioningCalculator::calculate(spec, manufacturing);
    tracing::debug!(
        "底面 {:?}, 主體高度 {}, 有效高度 {}",
        dims.footprint(),
        dims.box_height,
        dims.effective_z
    );

    // Step 2: 方向列舉
    tracing::debug!("Step 2: 方向列舉");
    let candidates = OrientationEnumerator::enumerate(&dims, manufacturing);

    // Step 3: 擺放選擇
    tracing::debug!("Step 3: 擺放選擇");
    let selection = LayoutSelector::select(&candidates, &dims, manufacturing)?;
    if selection.is_degenerate() {
        return Err(EpsError::InfeasibleLayout(format!(
            "底面 {} × {} cm 無法放入 {} × {} × {} cm 塊材的任何方向",
            dims.cut_x, dims.cut_y, manufacturing.block_x, manufacturing.block_y, dims.effective_z
        )));
    }

    // Step 4: 排數分配
    tracing::debug!("Step 4: 排數分配");
    let plan = ProductionPartitioner::plan(spec, &dims, &selection, manufacturing)?;

    // Step 5: 計價
    tracing::debug!("Step 5: 計價");
    let pricing_result = PricingEngine::price(&plan, spec, pricing)?;

    let mut result = CalculationResult {
        mode: plan.mode,
        blocks_needed: plan.blocks_needed,
        per_block: plan.per_block(),
        required: plan.is_order().then(|| plan.required()),
        excess: plan.excess(),
        total_produced: plan.total_produced(),
        pricing: pricing_result,
        details: build_details(manufacturing, &dims, &selection, &plan),
        warnings: Vec::new(),
    };

    collect_warnings(&mut result, &plan);

    tracing::info!(
        "EPS 計算完成：{} 塊，含稅總價 {}",
        result.blocks_needed,
        result.pricing.total_price
    );

    Ok(result)
}

fn build_details(
    manufacturing: &ManufacturingSettings,
    dims: &CutDimensions,
    selection: &LayoutSelection,
    plan: &ProductionPlan,
) -> CalculationDetails {
    CalculationDetails {
        block_dimensions: manufacturing.block_dimensions(),
        orientation: OrientationSummary {
            axis_role: selection.candidate.axis_role,
            h_eff: selection.h_eff(),
        },
        cut_dimensions: CutDimensionSummary {
            footprint: dims.footprint(),
            box_height: dims.box_height,
            part_heights: dims.part_heights.iter().cloned().collect(),
        },
        layout: LayoutSummary {
            rows_per_layer: selection.rows_per_layer,
            rotation: selection.rotation,
            table_axes: selection.table_axes,
        },
        per_row_yield: plan.per_row_yield(),
        row_allocation: plan.row_allocation(),
    }
}

fn collect_warnings(result: &mut CalculationResult, plan: &ProductionPlan) {
    if !plan.is_order() {
        let target = plan.components.first().map_or(0, |c| c.required);
        result.add_warning(CalcWarning::info(
            None,
            format!("未指定訂單數量，以預設目標 {} 件模擬單塊產出", target),
        ));
    }

    for component in plan.components.iter().filter(|c| c.rows == 0) {
        result.add_warning(CalcWarning::warning(
            Some(component.name.clone()),
            "未分配任何排數，本次不生產此元件".to_string(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eps_core::{AuxiliaryPart, AxisRole, PlanningMode, WarningSeverity};

    #[test]
    fn test_simulation_result_shape() {
        let calculator = EpsCalculator::default();
        let result = calculator
            .calculate(&ProductSpec::new(30.0, 30.0, 30.0, 1.0))
            .unwrap();

        assert_eq!(result.mode, PlanningMode::Simulation);
        assert_eq!(result.blocks_needed, 1);
        assert_eq!(result.per_block["Box"], 54);
        assert!(result.required.is_none());
        assert_eq!(result.details.orientation.axis_role, AxisRole::Height);
        assert_eq!(result.details.layout.rows_per_layer, 9);
        assert_eq!(result.details.row_allocation["Box"], 9);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].severity, WarningSeverity::Info);
    }

    #[test]
    fn test_invalid_input_aborts_before_search() {
        let calculator = EpsCalculator::default();
        let error = calculator
            .calculate(&ProductSpec::new(0.0, 30.0, 30.0, 1.0))
            .unwrap_err();

        assert_eq!(error.kind(), "invalid_input");
    }

    #[test]
    fn test_oversized_footprint_is_infeasible_layout() {
        let calculator = EpsCalculator::default();
        let error = calculator
            .calculate(&ProductSpec::new(150.0, 150.0, 30.0, 1.0))
            .unwrap_err();

        assert!(matches!(error, EpsError::InfeasibleLayout(_)));
    }

    #[test]
    fn test_zero_count_part_gets_warning() {
        let calculator = EpsCalculator::default();
        let spec = ProductSpec::new(30.0, 30.0, 30.0, 1.0)
            .with_auxiliary_part(AuxiliaryPart::new("Spare Lid", 0, 2.0))
            .with_requested_quantity(100);

        let result = calculator.calculate(&spec).unwrap();

        assert_eq!(result.details.row_allocation["Spare Lid"], 0);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.component.as_deref() == Some("Spare Lid")));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let calculator = EpsCalculator::default()
            .with_manufacturing(ManufacturingSettings::default().with_block_dimensions(0.0, 122.0, 202.0));

        let error = calculator
            .calculate(&ProductSpec::new(30.0, 30.0, 30.0, 1.0))
            .unwrap_err();

        assert_eq!(error.kind(), "configuration");
    }

    #[test]
    fn test_near_zero_heights_do_not_overflow_totals() {
        let calculator = EpsCalculator::default()
            .with_manufacturing(ManufacturingSettings::default().with_cut_allowances(0.5, 0.0));
        let spec = ProductSpec::new(30.0, 30.0, 1e-20, 1.0)
            .with_auxiliary_part(AuxiliaryPart::new("Lid", 1, 1e-20));

        let result = calculator.calculate(&spec).unwrap();

        assert_eq!(result.blocks_needed, 1);
        assert_eq!(result.per_block["Box"], u64::MAX);
    }

    #[test]
    fn test_pricing_overflow_is_configuration_error() {
        let error = EpsCalculator::default()
            .calculate_json(
                r#"{"boy":30,"en":30,"yukseklik":30,"wall_thickness":1,"pricing":{"base_price_usd_per_m3":"1e27"}}"#,
            )
            .unwrap_err();

        assert_eq!(error.kind(), "configuration");
    }
}
