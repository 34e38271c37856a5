//! 計價引擎
//!
//! 所有中間值以 `Decimal` 全精度計算，僅在輸出時四捨五入至兩位小數。

use eps_core::numeric::to_decimal;
use eps_core::{
    EpsError, OperationType, PricingDetails, PricingResult, PricingSettings, ProductSpec,
    ProductionPlan, Result, DEFAULT_DENSITY,
};
use rust_decimal::{Decimal, RoundingStrategy};

/// 純切割作業係數
pub const CUT_OPERATION_MULTIPLIER: Decimal = Decimal::from_parts(80, 0, 0, false, 2);

/// 大量折扣門檻（塊數）
pub const HIGH_VOLUME_BLOCK_THRESHOLD: u64 = 10;

/// 金額輸出小數位數
const MONEY_DP: u32 = 2;

/// 全精度價格拆解
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub raw_block_price: Decimal,
    pub profit_block_price: Decimal,
    pub base_per_block: Decimal,
    pub op_multiplier: Decimal,
    pub discount_multiplier: Decimal,
    pub block_total_ex_vat: Decimal,
    pub total_shipping_cost: Decimal,
    pub total_processing_cost: Decimal,
    pub total_ex_vat: Decimal,
    pub total_inc_vat: Decimal,
    pub unit_divisor: u64,
    pub unit_price: Decimal,
    pub is_discounted: bool,
}

/// 計價引擎
pub struct PricingEngine;

impl PricingEngine {
    /// 作業類型對應的成本係數
    pub fn operation_multiplier(operation_type: OperationType, settings: &PricingSettings) -> Decimal {
        match operation_type {
            OperationType::Cut => CUT_OPERATION_MULTIPLIER,
            OperationType::CutSlice => settings.op_cost_slice_multiplier,
            OperationType::CutPaste => settings.op_cost_paste_multiplier,
        }
    }

    /// 是否達到大量折扣門檻
    pub fn is_high_volume(blocks_needed: u64) -> bool {
        blocks_needed >= HIGH_VOLUME_BLOCK_THRESHOLD
    }

    /// 計算全精度價格拆解
    ///
    /// 任一中間值超出 `Decimal` 範圍時回傳 [`EpsError::Configuration`]。
    pub fn breakdown(
        plan: &ProductionPlan,
        spec: &ProductSpec,
        settings: &PricingSettings,
    ) -> Result<PriceBreakdown> {
        let blocks = Decimal::from(plan.blocks_needed);
        let density = to_decimal(spec.density_or_default())
            .unwrap_or_else(|| Decimal::from(DEFAULT_DENSITY as u64));

        // 原料價：體積 × 密度 × 美元基價 → 當地貨幣
        let effective_usd = checked(settings.usd_rate.checked_add(settings.usd_spread), "有效匯率")?;
        let raw_block_usd = checked(
            settings
                .block_volume_m3
                .checked_mul(density)
                .and_then(|v| v.checked_mul(settings.base_price_usd_per_m3)),
            "原料價",
        )?;
        let raw_block_price = checked(
            raw_block_usd
                .checked_mul(effective_usd)
                .and_then(|v| v.checked_mul(settings.exchange_risk_percent)),
            "原料價",
        )?;
        let profit_block_price = checked(
            raw_block_price.checked_mul(settings.profit_multiplier),
            "利潤價",
        )?;
        let base_per_block = checked(
            profit_block_price.checked_add(settings.shipping_cost_per_block),
            "每塊單價",
        )?;

        let op_multiplier = Self::operation_multiplier(spec.operation_type, settings);
        let is_discounted = Self::is_high_volume(plan.blocks_needed);
        let discount_multiplier = if is_discounted {
            Decimal::ONE - settings.discount_rate_high_vol
        } else {
            Decimal::ONE
        };

        // 折扣只作用在塊材部分，加工費不打折
        let block_total_ex_vat = checked(
            blocks
                .checked_mul(base_per_block)
                .and_then(|v| v.checked_mul(op_multiplier))
                .and_then(|v| v.checked_mul(discount_multiplier)),
            "塊材總價",
        )?;
        let total_processing_cost = checked(
            Decimal::from(plan.total_units()).checked_mul(settings.processing_cost_per_item),
            "加工費",
        )?;
        let total_ex_vat = checked(
            block_total_ex_vat.checked_add(total_processing_cost),
            "未稅總價",
        )?;
        let total_inc_vat = checked(total_ex_vat.checked_mul(settings.vat_multiplier), "含稅總價")?;
        let total_shipping_cost = checked(
            blocks.checked_mul(settings.shipping_cost_per_block),
            "運費",
        )?;

        let unit_divisor = match spec.requested_quantity {
            Some(qty) if plan.is_order() && qty > 0 => qty,
            _ => plan.box_units().max(1),
        };
        let unit_price = checked(
            total_inc_vat.checked_div(Decimal::from(unit_divisor)),
            "單價",
        )?;

        Ok(PriceBreakdown {
            raw_block_price,
            profit_block_price,
            base_per_block,
            op_multiplier,
            discount_multiplier,
            block_total_ex_vat,
            total_shipping_cost,
            total_processing_cost,
            total_ex_vat,
            total_inc_vat,
            unit_divisor,
            unit_price,
            is_discounted,
        })
    }

    /// 計算輸出用價格（兩位小數）
    pub fn price(
        plan: &ProductionPlan,
        spec: &ProductSpec,
        settings: &PricingSettings,
    ) -> Result<PricingResult> {
        let breakdown = Self::breakdown(plan, spec, settings)?;

        tracing::debug!(
            "計價: {} 塊, 作業係數 {}, 折扣 {}, 含稅總價 {}",
            plan.blocks_needed,
            breakdown.op_multiplier,
            breakdown.is_discounted,
            breakdown.total_inc_vat
        );

        Ok(PricingResult {
            total_price: round_money(breakdown.total_inc_vat),
            unit_price: round_money(breakdown.unit_price),
            details: PricingDetails {
                raw_block_price: round_money(breakdown.raw_block_price),
                profit_block_price: round_money(breakdown.profit_block_price),
                total_shipping_cost: round_money(breakdown.total_shipping_cost),
                total_processing_cost: round_money(breakdown.total_processing_cost),
                is_discounted: breakdown.is_discounted,
            },
        })
    }
}

fn checked(value: Option<Decimal>, stage: &str) -> Result<Decimal> {
    value.ok_or_else(|| {
        EpsError::Configuration(format!("{}計算溢位，請檢查價格參數", stage))
    })
}

/// 金額四捨五入（中點遠離零）
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointAwayFromZero)
}
