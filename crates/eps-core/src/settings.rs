//! 生產與價格配置模型
//!
//! 系統預設值與使用者覆寫值以 [`PartialManufacturingSettings`] /
//! [`PartialPricingSettings`] 表示，透過 `merge` 產生完整配置：
//! 使用者值優先，其次系統值，最後為文件化常數。

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::NumericField;
use crate::{EpsError, Result};

/// 生產參數（每次計算內不可變）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManufacturingSettings {
    /// 塊材 X 邊長（cm）
    pub block_x: f64,

    /// 塊材 Y 邊長（cm）
    pub block_y: f64,

    /// 塊材 Z 邊長（cm，長軸）
    pub block_z: f64,

    /// Z 軸機台公差，`block_z - tolerance_axis_202` 為可用高度
    pub tolerance_axis_202: f64,

    /// 長軸平放於切割台時，沿長軸的產品尺寸下限（軸承限制）
    pub bearing_limit: f64,

    /// 熱線切割平面餘量（加在底面尺寸）
    pub cut_allowance_xy: f64,

    /// 切片餘量（加在高度與配件厚度）
    pub cut_allowance_z: f64,

    /// 未指定訂單時的模擬目標數量
    pub default_order_qty: u64,

    /// 組合搜尋上限
    pub max_loop_limit: u64,

    /// 擺放評分中產量的權重（相對於排數）
    pub scoring_weight_qty: u64,
}

impl ManufacturingSettings {
    pub const DEFAULT_BLOCK_X: f64 = 103.0;
    pub const DEFAULT_BLOCK_Y: f64 = 122.0;
    pub const DEFAULT_BLOCK_Z: f64 = 202.0;
    pub const DEFAULT_TOLERANCE_AXIS_202: f64 = 3.0;
    pub const DEFAULT_BEARING_LIMIT: f64 = 44.0;
    pub const DEFAULT_CUT_ALLOWANCE_XY: f64 = 0.5;
    pub const DEFAULT_CUT_ALLOWANCE_Z: f64 = 0.2;
    pub const DEFAULT_ORDER_QTY: u64 = 1000;
    pub const DEFAULT_MAX_LOOP_LIMIT: u64 = 900_000;
    pub const DEFAULT_SCORING_WEIGHT_QTY: u64 = 1000;

    /// 可用高度（長軸扣除公差）
    pub fn effective_z(&self) -> f64 {
        self.block_z - self.tolerance_axis_202
    }

    /// 塊材外形尺寸 `[x, y, z]`
    pub fn block_dimensions(&self) -> [f64; 3] {
        [self.block_x, self.block_y, self.block_z]
    }

    /// 建構器模式：設置塊材尺寸
    pub fn with_block_dimensions(mut self, x: f64, y: f64, z: f64) -> Self {
        self.block_x = x;
        self.block_y = y;
        self.block_z = z;
        self
    }

    /// 建構器模式：設置長軸公差
    pub fn with_tolerance_axis_202(mut self, tolerance: f64) -> Self {
        self.tolerance_axis_202 = tolerance;
        self
    }

    /// 建構器模式：設置軸承限制
    pub fn with_bearing_limit(mut self, limit: f64) -> Self {
        self.bearing_limit = limit;
        self
    }

    /// 建構器模式：設置切割餘量
    pub fn with_cut_allowances(mut self, xy: f64, z: f64) -> Self {
        self.cut_allowance_xy = xy;
        self.cut_allowance_z = z;
        self
    }

    /// 建構器模式：設置模擬目標數量
    pub fn with_default_order_qty(mut self, qty: u64) -> Self {
        self.default_order_qty = qty;
        self
    }

    /// 建構器模式：設置搜尋上限
    pub fn with_max_loop_limit(mut self, limit: u64) -> Self {
        self.max_loop_limit = limit;
        self
    }

    /// 建構器模式：設置評分權重
    pub fn with_scoring_weight_qty(mut self, weight: u64) -> Self {
        self.scoring_weight_qty = weight;
        self
    }

    /// 檢查配置是否可用於計算
    pub fn validate(&self) -> Result<()> {
        let blocks = [
            ("block_x", self.block_x),
            ("block_y", self.block_y),
            ("block_z", self.block_z),
        ];
        for (name, value) in blocks {
            if !(value > 0.0) {
                return Err(EpsError::Configuration(format!(
                    "{} 必須為正數，目前為 {}",
                    name, value
                )));
            }
        }

        if !(self.effective_z() > 0.0) {
            return Err(EpsError::Configuration(format!(
                "公差 {} 不可大於等於塊材長軸 {}",
                self.tolerance_axis_202, self.block_z
            )));
        }

        let non_negative = [
            ("tolerance_axis_202", self.tolerance_axis_202),
            ("bearing_limit", self.bearing_limit),
            ("cut_allowance_xy", self.cut_allowance_xy),
            ("cut_allowance_z", self.cut_allowance_z),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(EpsError::Configuration(format!(
                    "{} 不可為負數，目前為 {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

impl Default for ManufacturingSettings {
    fn default() -> Self {
        Self {
            block_x: Self::DEFAULT_BLOCK_X,
            block_y: Self::DEFAULT_BLOCK_Y,
            block_z: Self::DEFAULT_BLOCK_Z,
            tolerance_axis_202: Self::DEFAULT_TOLERANCE_AXIS_202,
            bearing_limit: Self::DEFAULT_BEARING_LIMIT,
            cut_allowance_xy: Self::DEFAULT_CUT_ALLOWANCE_XY,
            cut_allowance_z: Self::DEFAULT_CUT_ALLOWANCE_Z,
            default_order_qty: Self::DEFAULT_ORDER_QTY,
            max_loop_limit: Self::DEFAULT_MAX_LOOP_LIMIT,
            scoring_weight_qty: Self::DEFAULT_SCORING_WEIGHT_QTY,
        }
    }
}

/// 價格參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// 單塊體積（m³）
    pub block_volume_m3: Decimal,

    /// 每 m³ 每單位密度的美元基價
    pub base_price_usd_per_m3: Decimal,

    /// 美元匯率（可由外部匯率來源覆寫）
    pub usd_rate: Decimal,

    /// 匯率固定價差
    pub usd_spread: Decimal,

    /// 匯率風險係數
    pub exchange_risk_percent: Decimal,

    /// 利潤倍數
    pub profit_multiplier: Decimal,

    /// 大量（10 塊以上）折扣率
    pub discount_rate_high_vol: Decimal,

    /// 切割＋切片作業係數
    pub op_cost_slice_multiplier: Decimal,

    /// 切割＋黏合作業係數
    pub op_cost_paste_multiplier: Decimal,

    /// 含稅倍數
    pub vat_multiplier: Decimal,

    /// 每塊運費
    pub shipping_cost_per_block: Decimal,

    /// 每件加工費
    pub processing_cost_per_item: Decimal,
}

impl PricingSettings {
    pub const DEFAULT_BLOCK_VOLUME_M3: Decimal = Decimal::from_parts(255, 0, 0, false, 2);
    pub const DEFAULT_BASE_PRICE_USD_PER_M3: Decimal = Decimal::from_parts(235, 0, 0, false, 2);
    pub const DEFAULT_USD_RATE: Decimal = Decimal::from_parts(32, 0, 0, false, 0);
    pub const DEFAULT_USD_SPREAD: Decimal = Decimal::from_parts(30, 0, 0, false, 2);
    pub const DEFAULT_EXCHANGE_RISK_PERCENT: Decimal = Decimal::ONE;
    pub const DEFAULT_PROFIT_MULTIPLIER: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
    pub const DEFAULT_DISCOUNT_RATE_HIGH_VOL: Decimal = Decimal::from_parts(625, 0, 0, false, 4);
    pub const DEFAULT_OP_COST_SLICE_MULTIPLIER: Decimal = Decimal::from_parts(85, 0, 0, false, 2);
    pub const DEFAULT_OP_COST_PASTE_MULTIPLIER: Decimal = Decimal::ONE;
    pub const DEFAULT_VAT_MULTIPLIER: Decimal = Decimal::from_parts(120, 0, 0, false, 2);
    pub const DEFAULT_SHIPPING_COST_PER_BLOCK: Decimal = Decimal::from_parts(400, 0, 0, false, 0);
    pub const DEFAULT_PROCESSING_COST_PER_ITEM: Decimal = Decimal::ZERO;

    /// 建構器模式：設置美元匯率（匯率來源在計算前呼叫）
    pub fn with_usd_rate(mut self, rate: Decimal) -> Self {
        self.usd_rate = rate;
        self
    }

    /// 建構器模式：設置利潤倍數
    pub fn with_profit_multiplier(mut self, multiplier: Decimal) -> Self {
        self.profit_multiplier = multiplier;
        self
    }

    /// 建構器模式：設置大量折扣率
    pub fn with_discount_rate_high_vol(mut self, rate: Decimal) -> Self {
        self.discount_rate_high_vol = rate;
        self
    }

    /// 建構器模式：設置每立方公尺美元基價
    pub fn with_base_price_usd_per_m3(mut self, price: Decimal) -> Self {
        self.base_price_usd_per_m3 = price;
        self
    }

    /// 建構器模式：設置每塊運費
    pub fn with_shipping_cost_per_block(mut self, cost: Decimal) -> Self {
        self.shipping_cost_per_block = cost;
        self
    }

    /// 建構器模式：設置每件加工費
    pub fn with_processing_cost_per_item(mut self, cost: Decimal) -> Self {
        self.processing_cost_per_item = cost;
        self
    }

    /// 有效匯率（含價差），超出 `Decimal` 範圍時飽和
    pub fn effective_usd(&self) -> Decimal {
        self.usd_rate.saturating_add(self.usd_spread)
    }

    /// 檢查配置是否可用於計算
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("block_volume_m3", self.block_volume_m3),
            ("base_price_usd_per_m3", self.base_price_usd_per_m3),
            ("usd_rate", self.usd_rate),
            ("exchange_risk_percent", self.exchange_risk_percent),
            ("profit_multiplier", self.profit_multiplier),
            ("op_cost_slice_multiplier", self.op_cost_slice_multiplier),
            ("op_cost_paste_multiplier", self.op_cost_paste_multiplier),
            ("vat_multiplier", self.vat_multiplier),
            ("shipping_cost_per_block", self.shipping_cost_per_block),
            ("processing_cost_per_item", self.processing_cost_per_item),
        ];
        for (name, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(EpsError::Configuration(format!(
                    "{} 不可為負數，目前為 {}",
                    name, value
                )));
            }
        }

        if self.discount_rate_high_vol < Decimal::ZERO || self.discount_rate_high_vol > Decimal::ONE {
            return Err(EpsError::Configuration(format!(
                "discount_rate_high_vol 必須介於 0 與 1 之間，目前為 {}",
                self.discount_rate_high_vol
            )));
        }

        Ok(())
    }
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            block_volume_m3: Self::DEFAULT_BLOCK_VOLUME_M3,
            base_price_usd_per_m3: Self::DEFAULT_BASE_PRICE_USD_PER_M3,
            usd_rate: Self::DEFAULT_USD_RATE,
            usd_spread: Self::DEFAULT_USD_SPREAD,
            exchange_risk_percent: Self::DEFAULT_EXCHANGE_RISK_PERCENT,
            profit_multiplier: Self::DEFAULT_PROFIT_MULTIPLIER,
            discount_rate_high_vol: Self::DEFAULT_DISCOUNT_RATE_HIGH_VOL,
            op_cost_slice_multiplier: Self::DEFAULT_OP_COST_SLICE_MULTIPLIER,
            op_cost_paste_multiplier: Self::DEFAULT_OP_COST_PASTE_MULTIPLIER,
            vat_multiplier: Self::DEFAULT_VAT_MULTIPLIER,
            shipping_cost_per_block: Self::DEFAULT_SHIPPING_COST_PER_BLOCK,
            processing_cost_per_item: Self::DEFAULT_PROCESSING_COST_PER_ITEM,
        }
    }
}

/// 部分生產參數（系統預設或使用者覆寫）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialManufacturingSettings {
    pub block_x: Option<NumericField>,
    pub block_y: Option<NumericField>,
    pub block_z: Option<NumericField>,
    pub tolerance_axis_202: Option<NumericField>,
    #[serde(alias = "bearing_limit_44")]
    pub bearing_limit: Option<NumericField>,
    pub cut_allowance_xy: Option<NumericField>,
    pub cut_allowance_z: Option<NumericField>,
    pub default_order_qty: Option<NumericField>,
    pub max_loop_limit: Option<NumericField>,
    pub scoring_weight_qty: Option<NumericField>,
}

impl PartialManufacturingSettings {
    /// 合併系統值與使用者值為完整配置
    ///
    /// 每個欄位依序取：使用者值 → 系統值 → 預設常數。
    /// 空白或無法解析的值視為未提供。
    pub fn merge(system: &Self, user: &Self) -> ManufacturingSettings {
        type M = ManufacturingSettings;
        ManufacturingSettings {
            block_x: pick_f64("block_x", &user.block_x, &system.block_x, M::DEFAULT_BLOCK_X),
            block_y: pick_f64("block_y", &user.block_y, &system.block_y, M::DEFAULT_BLOCK_Y),
            block_z: pick_f64("block_z", &user.block_z, &system.block_z, M::DEFAULT_BLOCK_Z),
            tolerance_axis_202: pick_f64(
                "tolerance_axis_202",
                &user.tolerance_axis_202,
                &system.tolerance_axis_202,
                M::DEFAULT_TOLERANCE_AXIS_202,
            ),
            bearing_limit: pick_f64(
                "bearing_limit",
                &user.bearing_limit,
                &system.bearing_limit,
                M::DEFAULT_BEARING_LIMIT,
            ),
            cut_allowance_xy: pick_f64(
                "cut_allowance_xy",
                &user.cut_allowance_xy,
                &system.cut_allowance_xy,
                M::DEFAULT_CUT_ALLOWANCE_XY,
            ),
            cut_allowance_z: pick_f64(
                "cut_allowance_z",
                &user.cut_allowance_z,
                &system.cut_allowance_z,
                M::DEFAULT_CUT_ALLOWANCE_Z,
            ),
            default_order_qty: pick_count(
                "default_order_qty",
                &user.default_order_qty,
                &system.default_order_qty,
                M::DEFAULT_ORDER_QTY,
            ),
            max_loop_limit: pick_count(
                "max_loop_limit",
                &user.max_loop_limit,
                &system.max_loop_limit,
                M::DEFAULT_MAX_LOOP_LIMIT,
            ),
            scoring_weight_qty: pick_count(
                "scoring_weight_qty",
                &user.scoring_weight_qty,
                &system.scoring_weight_qty,
                M::DEFAULT_SCORING_WEIGHT_QTY,
            ),
        }
    }

    /// 是否沒有任何欄位
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&ManufacturingSettings> for PartialManufacturingSettings {
    fn from(settings: &ManufacturingSettings) -> Self {
        Self {
            block_x: Some(settings.block_x.into()),
            block_y: Some(settings.block_y.into()),
            block_z: Some(settings.block_z.into()),
            tolerance_axis_202: Some(settings.tolerance_axis_202.into()),
            bearing_limit: Some(settings.bearing_limit.into()),
            cut_allowance_xy: Some(settings.cut_allowance_xy.into()),
            cut_allowance_z: Some(settings.cut_allowance_z.into()),
            default_order_qty: Some(settings.default_order_qty.into()),
            max_loop_limit: Some(settings.max_loop_limit.into()),
            scoring_weight_qty: Some(settings.scoring_weight_qty.into()),
        }
    }
}

/// 部分價格參數（系統預設或使用者覆寫）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialPricingSettings {
    pub block_volume_m3: Option<NumericField>,
    pub base_price_usd_per_m3: Option<NumericField>,
    pub usd_rate: Option<NumericField>,
    #[serde(alias = "usd_spread_tl")]
    pub usd_spread: Option<NumericField>,
    pub exchange_risk_percent: Option<NumericField>,
    pub profit_multiplier: Option<NumericField>,
    pub discount_rate_high_vol: Option<NumericField>,
    pub op_cost_slice_multiplier: Option<NumericField>,
    pub op_cost_paste_multiplier: Option<NumericField>,
    pub vat_multiplier: Option<NumericField>,
    pub shipping_cost_per_block: Option<NumericField>,
    pub processing_cost_per_item: Option<NumericField>,
}

impl PartialPricingSettings {
    /// 合併系統值與使用者值為完整配置
    pub fn merge(system: &Self, user: &Self) -> PricingSettings {
        type P = PricingSettings;
        PricingSettings {
            block_volume_m3: pick_decimal(
                "block_volume_m3",
                &user.block_volume_m3,
                &system.block_volume_m3,
                P::DEFAULT_BLOCK_VOLUME_M3,
            ),
            base_price_usd_per_m3: pick_decimal(
                "base_price_usd_per_m3",
                &user.base_price_usd_per_m3,
                &system.base_price_usd_per_m3,
                P::DEFAULT_BASE_PRICE_USD_PER_M3,
            ),
            usd_rate: pick_decimal("usd_rate", &user.usd_rate, &system.usd_rate, P::DEFAULT_USD_RATE),
            usd_spread: pick_decimal(
                "usd_spread",
                &user.usd_spread,
                &system.usd_spread,
                P::DEFAULT_USD_SPREAD,
            ),
            exchange_risk_percent: pick_decimal(
                "exchange_risk_percent",
                &user.exchange_risk_percent,
                &system.exchange_risk_percent,
                P::DEFAULT_EXCHANGE_RISK_PERCENT,
            ),
            profit_multiplier: pick_decimal(
                "profit_multiplier",
                &user.profit_multiplier,
                &system.profit_multiplier,
                P::DEFAULT_PROFIT_MULTIPLIER,
            ),
            discount_rate_high_vol: pick_decimal(
                "discount_rate_high_vol",
                &user.discount_rate_high_vol,
                &system.discount_rate_high_vol,
                P::DEFAULT_DISCOUNT_RATE_HIGH_VOL,
            ),
            op_cost_slice_multiplier: pick_decimal(
                "op_cost_slice_multiplier",
                &user.op_cost_slice_multiplier,
                &system.op_cost_slice_multiplier,
                P::DEFAULT_OP_COST_SLICE_MULTIPLIER,
            ),
            op_cost_paste_multiplier: pick_decimal(
                "op_cost_paste_multiplier",
                &user.op_cost_paste_multiplier,
                &system.op_cost_paste_multiplier,
                P::DEFAULT_OP_COST_PASTE_MULTIPLIER,
            ),
            vat_multiplier: pick_decimal(
                "vat_multiplier",
                &user.vat_multiplier,
                &system.vat_multiplier,
                P::DEFAULT_VAT_MULTIPLIER,
            ),
            shipping_cost_per_block: pick_decimal(
                "shipping_cost_per_block",
                &user.shipping_cost_per_block,
                &system.shipping_cost_per_block,
                P::DEFAULT_SHIPPING_COST_PER_BLOCK,
            ),
            processing_cost_per_item: pick_decimal(
                "processing_cost_per_item",
                &user.processing_cost_per_item,
                &system.processing_cost_per_item,
                P::DEFAULT_PROCESSING_COST_PER_ITEM,
            ),
        }
    }

    /// 是否沒有任何欄位
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&PricingSettings> for PartialPricingSettings {
    fn from(settings: &PricingSettings) -> Self {
        let text = |value: Decimal| Some(NumericField::Text(value.to_string()));
        Self {
            block_volume_m3: text(settings.block_volume_m3),
            base_price_usd_per_m3: text(settings.base_price_usd_per_m3),
            usd_rate: text(settings.usd_rate),
            usd_spread: text(settings.usd_spread),
            exchange_risk_percent: text(settings.exchange_risk_percent),
            profit_multiplier: text(settings.profit_multiplier),
            discount_rate_high_vol: text(settings.discount_rate_high_vol),
            op_cost_slice_multiplier: text(settings.op_cost_slice_multiplier),
            op_cost_paste_multiplier: text(settings.op_cost_paste_multiplier),
            vat_multiplier: text(settings.vat_multiplier),
            shipping_cost_per_block: text(settings.shipping_cost_per_block),
            processing_cost_per_item: text(settings.processing_cost_per_item),
        }
    }
}

fn pick_f64(
    name: &str,
    user: &Option<NumericField>,
    system: &Option<NumericField>,
    fallback: f64,
) -> f64 {
    resolve(name, user, system, NumericField::parse).unwrap_or(fallback)
}

fn pick_count(
    name: &str,
    user: &Option<NumericField>,
    system: &Option<NumericField>,
    fallback: u64,
) -> u64 {
    resolve(name, user, system, NumericField::parse_count).unwrap_or(fallback)
}

fn pick_decimal(
    name: &str,
    user: &Option<NumericField>,
    system: &Option<NumericField>,
    fallback: Decimal,
) -> Decimal {
    resolve(name, user, system, NumericField::parse_decimal).unwrap_or(fallback)
}

fn resolve<T>(
    name: &str,
    user: &Option<NumericField>,
    system: &Option<NumericField>,
    parse: impl Fn(&NumericField) -> Option<T>,
) -> Option<T> {
    for (source, field) in [("user", user), ("system", system)] {
        if let Some(field) = field {
            match parse(field) {
                Some(value) => return Some(value),
                None => tracing::warn!("忽略無效的{}配置 {}: {:?}", source, name, field),
            }
        }
    }
    None
}
