//! 生產排數分配
//!
//! 在選定擺放的每層排數內，列舉主體與各配件的排數分配，
//! 找出滿足需求所需塊數最少的分配。

use eps_core::{
    ComponentPlan, CutDimensions, EpsError, LayoutSelection, ManufacturingSettings, PlanningMode,
    ProductSpec, ProductionPlan, Result,
};

use serde::Serialize;

use crate::composition::Compositions;
use crate::dimensioning::tiles;

/// 搜尋結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// 各元件排數（主體在前）
    pub allocation: Vec<u32>,

    /// 所需塊數
    pub blocks_needed: u64,

    /// 已評估的組合數
    pub evaluated: u64,
}

/// 生產排數分配器
pub struct ProductionPartitioner;

impl ProductionPartitioner {
    /// 計算生產計劃
    pub fn plan(
        spec: &ProductSpec,
        dims: &CutDimensions,
        selection: &LayoutSelection,
        settings: &ManufacturingSettings,
    ) -> Result<ProductionPlan> {
        let rows_per_layer = selection.rows_per_layer;
        let h_eff = selection.h_eff();
        let names = spec.component_names();

        // 每排產量：有效高度可切出的片數
        let per_row_yield: Vec<u64> = names
            .iter()
            .map(|name| dims.height_of(name).map_or(0, |height| tiles(h_eff, height)))
            .collect();

        let (mode, target) = match spec.requested_quantity {
            Some(qty) if qty > 0 => (PlanningMode::Order, qty),
            _ => (PlanningMode::Simulation, settings.default_order_qty),
        };

        let required: Vec<u64> = std::iter::once(target)
            .chain(
                spec.auxiliary_parts
                    .iter()
                    .map(|part| target.saturating_mul(part.count)),
            )
            .collect();

        tracing::debug!(
            "排數分配: {} 排, {} 個元件, 模式 {:?}, 目標 {}",
            rows_per_layer,
            names.len(),
            mode,
            target
        );

        let compositions = Compositions::bounded(rows_per_layer, names.len(), settings.max_loop_limit)?;

        let outcome = Self::search(compositions, &per_row_yield, &required).ok_or_else(|| {
            EpsError::InfeasibleProduction(Self::describe_infeasibility(
                &names,
                &per_row_yield,
                &required,
                rows_per_layer,
                h_eff,
            ))
        })?;

        tracing::debug!(
            "評估 {} 個組合，最佳分配 {:?}，需要 {} 塊",
            outcome.evaluated,
            outcome.allocation,
            outcome.blocks_needed
        );

        let blocks_needed = match mode {
            PlanningMode::Order => outcome.blocks_needed,
            PlanningMode::Simulation => 1,
        };

        let components = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let rows = outcome.allocation[i];
                let per_block = u64::from(rows).saturating_mul(per_row_yield[i]);
                let total_produced = per_block.saturating_mul(blocks_needed);
                let excess = match mode {
                    PlanningMode::Order => signed(total_produced) - signed(required[i]),
                    PlanningMode::Simulation => signed(total_produced),
                };

                ComponentPlan {
                    name,
                    rows,
                    per_row_yield: per_row_yield[i],
                    per_block,
                    required: required[i],
                    total_produced,
                    excess,
                }
            })
            .collect();

        Ok(ProductionPlan {
            mode,
            rows_per_layer,
            blocks_needed,
            components,
        })
    }

    /// 在所有組合中找出所需塊數最少者
    ///
    /// 同塊數時保留最先出現的組合。沒有可行組合時回傳 None。
    pub fn search<I>(compositions: I, per_row_yield: &[u64], required: &[u64]) -> Option<SearchOutcome>
    where
        I: IntoIterator<Item = Vec<u32>>,
    {
        let mut best: Option<SearchOutcome> = None;
        let mut evaluated: u64 = 0;

        for allocation in compositions {
            evaluated += 1;

            let produced: Vec<u64> = allocation
                .iter()
                .zip(per_row_yield)
                .map(|(rows, per_row)| u64::from(*rows).saturating_mul(*per_row))
                .collect();

            // 完全沒有產出
            if produced.iter().all(|units| *units == 0) {
                continue;
            }

            let Some(blocks_needed) = Self::blocks_for(&produced, required) else {
                continue;
            };

            let is_better = best
                .as_ref()
                .map_or(true, |current| blocks_needed < current.blocks_needed);

            if is_better {
                best = Some(SearchOutcome {
                    allocation,
                    blocks_needed,
                    evaluated: 0,
                });
            }
        }

        best.map(|outcome| SearchOutcome {
            evaluated,
            ..outcome
        })
    }

    /// 以每塊產量滿足需求所需的塊數；有需求的元件產量為 0 時回傳 None
    fn blocks_for(produced: &[u64], required: &[u64]) -> Option<u64> {
        let mut blocks: u64 = 0;
        for (units, req) in produced.iter().zip(required) {
            if *req == 0 {
                continue;
            }
            if *units == 0 {
                return None;
            }
            blocks = blocks.max(req.div_ceil(*units));
        }
        Some(blocks)
    }

    fn describe_infeasibility(
        names: &[String],
        per_row_yield: &[u64],
        required: &[u64],
        rows_per_layer: u32,
        h_eff: f64,
    ) -> String {
        let blocked: Vec<&str> = names
            .iter()
            .zip(per_row_yield.iter().zip(required))
            .filter(|(_, (per_row, req))| **per_row == 0 && **req > 0)
            .map(|(name, _)| name.as_str())
            .collect();

        if !blocked.is_empty() {
            return format!(
                "元件 {} 的切片高度超過有效高度 {} cm",
                blocked.join(", "),
                h_eff
            );
        }

        let demanded = required.iter().filter(|req| **req > 0).count();
        format!(
            "每層僅 {} 排，不足以同時生產 {} 個有需求的元件",
            rows_per_layer, demanded
        )
    }
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensioning::DimensioningCalculator;
    use crate::layout_selector::LayoutSelector;
    use crate::orientation::OrientationEnumerator;
    use eps_core::AuxiliaryPart;

    fn plan_for(spec: &ProductSpec, settings: &ManufacturingSettings) -> Result<ProductionPlan> {
        let dims = DimensioningCalculator::calculate(spec, settings);
        let candidates = OrientationEnumerator::enumerate(&dims, settings);
        let selection = LayoutSelector::select(&candidates, &dims, settings)?;
        ProductionPartitioner::plan(spec, &dims, &selection, settings)
    }

    fn capped_cube() -> ProductSpec {
        ProductSpec::new(30.0, 30.0, 30.0, 1.0)
            .with_auxiliary_part(AuxiliaryPart::new("Ust Kapak", 1, 2.0))
            .with_auxiliary_part(AuxiliaryPart::new("Alt Kapak", 1, 2.0))
    }

    #[test]
    fn test_order_with_two_lids() {
        let settings = ManufacturingSettings::default();
        let plan = plan_for(&capped_cube().with_requested_quantity(500), &settings).unwrap();

        // 9 排：主體每排 6 件，蓋子每排 floor(199/2.2)=90 片
        // (7,1,1) → max(ceil(500/42), ceil(500/90), ceil(500/90)) = 12
        assert_eq!(plan.mode, PlanningMode::Order);
        assert_eq!(plan.blocks_needed, 12);
        assert_eq!(plan.allocated_rows(), 9);
        assert_eq!(plan.component("Box").unwrap().rows, 7);
        assert_eq!(plan.component("Box").unwrap().total_produced, 504);
        assert_eq!(plan.component("Ust Kapak").unwrap().total_produced, 1080);
        assert!(plan.components.iter().all(|c| c.excess >= 0));
    }

    #[test]
    fn test_simulation_forces_single_block() {
        let settings = ManufacturingSettings::default();
        let plan = plan_for(&ProductSpec::new(30.0, 30.0, 30.0, 1.0), &settings).unwrap();

        assert_eq!(plan.mode, PlanningMode::Simulation);
        assert_eq!(plan.blocks_needed, 1);
        assert_eq!(plan.component("Box").unwrap().per_block, 54);
        assert_eq!(plan.component("Box").unwrap().excess, 54);
        assert_eq!(plan.component("Box").unwrap().required, 1000);
    }

    #[test]
    fn test_search_first_match_wins_on_ties() {
        // 三排時 (1,2) 與 (2,1) 同為 1 塊，保留先出現的 (1,2)
        let outcome =
            ProductionPartitioner::search(Compositions::new(3, 2), &[10, 10], &[10, 10]).unwrap();

        assert_eq!(outcome.allocation, vec![1, 2]);
        assert_eq!(outcome.blocks_needed, 1);
        assert_eq!(outcome.evaluated, 4);
    }

    #[test]
    fn test_search_skips_zero_requirement_components() {
        // 第二個元件沒有需求，可以分到 0 排
        let outcome =
            ProductionPartitioner::search(Compositions::new(2, 2), &[5, 5], &[20, 0]).unwrap();

        assert_eq!(outcome.allocation, vec![2, 0]);
        assert_eq!(outcome.blocks_needed, 2);
    }

    #[test]
    fn test_part_thicker_than_block_is_infeasible() {
        let settings = ManufacturingSettings::default();
        let spec = ProductSpec::new(30.0, 30.0, 30.0, 1.0)
            .with_auxiliary_part(AuxiliaryPart::new("Slab", 1, 250.0))
            .with_requested_quantity(10);

        let error = plan_for(&spec, &settings).unwrap_err();
        match error {
            EpsError::InfeasibleProduction(message) => assert!(message.contains("Slab")),
            other => panic!("預期 InfeasibleProduction，實際 {:?}", other),
        }
    }

    #[test]
    fn test_too_few_rows_is_infeasible() {
        // 產品佔滿整個切割台，只有 1 排，無法同時切主體與蓋子
        let settings = ManufacturingSettings::default();
        let spec = ProductSpec::new(100.0, 90.0, 180.0, 1.0)
            .with_auxiliary_part(AuxiliaryPart::new("Lid", 1, 2.0))
            .with_requested_quantity(5);

        assert!(matches!(
            plan_for(&spec, &settings),
            Err(EpsError::InfeasibleProduction(_))
        ));
    }

    #[test]
    fn test_search_space_limit_enforced() {
        let settings = ManufacturingSettings::default().with_max_loop_limit(10);
        let spec = capped_cube().with_requested_quantity(100);

        // 9 排 3 元件 = 55 組合 > 10
        assert!(matches!(
            plan_for(&spec, &settings),
            Err(EpsError::SearchSpaceExceeded { limit: 10, attempted: 55 })
        ));
    }

    #[test]
    fn test_part_count_scales_requirement() {
        let settings = ManufacturingSettings::default();
        let spec = ProductSpec::new(30.0, 30.0, 30.0, 1.0)
            .with_auxiliary_part(AuxiliaryPart::new("Divider", 4, 1.0))
            .with_requested_quantity(100);

        let plan = plan_for(&spec, &settings).unwrap();
        let divider = plan.component("Divider").unwrap();

        assert_eq!(divider.required, 400);
        assert!(divider.total_produced >= 400);
        assert!(plan.component("Box").unwrap().total_produced >= 100);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn allocation_sums_to_rows_per_layer(
                boy in 10.0f64..60.0,
                en in 10.0f64..60.0,
                yukseklik in 5.0f64..80.0,
                lids in 0usize..3,
                quantity in 1u64..5_000,
            ) {
                let settings = ManufacturingSettings::default();
                let mut spec = ProductSpec::new(boy, en, yukseklik, 1.0).with_requested_quantity(quantity);
                for i in 0..lids {
                    spec = spec.with_auxiliary_part(AuxiliaryPart::new(format!("Lid {}", i), 1, 2.0));
                }

                if let Ok(plan) = plan_for(&spec, &settings) {
                    prop_assert_eq!(plan.allocated_rows(), plan.rows_per_layer);
                    for component in &plan.components {
                        prop_assert!(component.total_produced >= component.required);
                    }
                }
            }

            #[test]
            fn more_demand_never_needs_fewer_blocks(
                yields in proptest::collection::vec(1u64..200, 1..4),
                rows in 3u32..10,
                base in 1u64..2_000,
                extra in 0u64..2_000,
            ) {
                let parts = yields.len();
                let smaller = vec![base; parts];
                let larger = vec![base + extra; parts];

                let low = ProductionPartitioner::search(Compositions::new(rows, parts), &yields, &smaller);
                let high = ProductionPartitioner::search(Compositions::new(rows, parts), &yields, &larger);

                if let (Some(low), Some(high)) = (low, high) {
                    prop_assert!(high.blocks_needed >= low.blocks_needed);
                }
            }
        }
    }
}
