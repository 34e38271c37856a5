//! 計算請求封包

use serde::{Deserialize, Serialize};

use crate::product::{ProductInput, ProductSpec};
use crate::settings::{
    ManufacturingSettings, PartialManufacturingSettings, PartialPricingSettings, PricingSettings,
};
use crate::Result;

/// 計算請求：產品輸入加上本次請求的配置覆寫
///
/// JSON 形式與產品欄位同層，例如：
/// ```json
/// { "boy": 30, "en": 30, "yukseklik": 30, "wall_thickness": 1,
///   "pricing": { "usd_rate": "34,10" } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationRequest {
    #[serde(flatten)]
    pub product: ProductInput,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturing: Option<PartialManufacturingSettings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PartialPricingSettings>,
}

/// 解析後的請求
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub product: ProductSpec,
    pub manufacturing: ManufacturingSettings,
    pub pricing: PricingSettings,
}

impl CalculationRequest {
    /// 創建請求
    pub fn new(product: ProductInput) -> Self {
        Self {
            product,
            manufacturing: None,
            pricing: None,
        }
    }

    /// 從 JSON 解析
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 將請求覆寫套用在已解析的系統配置上，並驗證產品輸入
    pub fn resolve(
        self,
        manufacturing: &ManufacturingSettings,
        pricing: &PricingSettings,
    ) -> Result<ResolvedRequest> {
        let manufacturing = match &self.manufacturing {
            Some(patch) => PartialManufacturingSettings::merge(
                &PartialManufacturingSettings::from(manufacturing),
                patch,
            ),
            None => manufacturing.clone(),
        };
        let pricing = match &self.pricing {
            Some(patch) => {
                PartialPricingSettings::merge(&PartialPricingSettings::from(pricing), patch)
            }
            None => pricing.clone(),
        };

        Ok(ResolvedRequest {
            product: self.product.into_spec()?,
            manufacturing,
            pricing,
        })
    }
}
