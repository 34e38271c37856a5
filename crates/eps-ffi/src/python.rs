//! Python 綁定實現
//!
//! 輸入與輸出皆為 JSON 字串，格式與 `CalculationRequest` / `CalculationResult` 相同。

use eps_calc::EpsCalculator;
use eps_core::numeric::to_decimal;
use eps_core::{
    EpsError, ManufacturingSettings, PartialManufacturingSettings, PartialPricingSettings,
    PricingSettings,
};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

/// 系統配置覆寫（建構計算器時使用）
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsOverrides {
    manufacturing: Option<PartialManufacturingSettings>,
    pricing: Option<PartialPricingSettings>,
}

impl SettingsOverrides {
    fn into_settings(self) -> (ManufacturingSettings, PricingSettings) {
        let manufacturing = match self.manufacturing {
            Some(patch) => PartialManufacturingSettings::merge(
                &PartialManufacturingSettings::from(&ManufacturingSettings::default()),
                &patch,
            ),
            None => ManufacturingSettings::default(),
        };
        let pricing = match self.pricing {
            Some(patch) => PartialPricingSettings::merge(
                &PartialPricingSettings::from(&PricingSettings::default()),
                &patch,
            ),
            None => PricingSettings::default(),
        };
        (manufacturing, pricing)
    }
}

fn to_py_err(error: EpsError) -> PyErr {
    PyValueError::new_err(format!("[{}] {}", error.kind(), error))
}

/// Python EPS 計算器
#[pyclass(name = "EpsCalculator")]
pub struct PyEpsCalculator {
    inner: EpsCalculator,
}

#[pymethods]
impl PyEpsCalculator {
    /// `settings_json` 為可選的系統配置覆寫：
    /// `{"manufacturing": {...}, "pricing": {...}}`
    #[new]
    #[pyo3(signature = (settings_json=None))]
    fn new(settings_json: Option<&str>) -> PyResult<Self> {
        let overrides = match settings_json {
            Some(json) => serde_json::from_str::<SettingsOverrides>(json)
                .map_err(|e| to_py_err(EpsError::from(e)))?,
            None => SettingsOverrides::default(),
        };
        let (manufacturing, pricing) = overrides.into_settings();

        Ok(Self {
            inner: EpsCalculator::new(manufacturing, pricing),
        })
    }

    /// 執行計算，回傳 JSON 結果
    fn calculate(&self, request_json: &str) -> PyResult<String> {
        self.inner.calculate_json(request_json).map_err(to_py_err)
    }

    /// 批次計算，每筆回傳 JSON 結果或錯誤訊息
    fn calculate_batch(&self, requests_json: Vec<String>) -> Vec<(bool, String)> {
        requests_json
            .iter()
            .map(|json| match self.inner.calculate_json(json) {
                Ok(result) => (true, result),
                Err(error) => (false, format!("[{}] {}", error.kind(), error)),
            })
            .collect()
    }

    /// 設置即時美元匯率（由外部匯率來源提供）
    fn set_usd_rate(&mut self, rate: f64) -> PyResult<()> {
        let rate = to_decimal(rate)
            .filter(|value| !value.is_sign_negative())
            .ok_or_else(|| PyValueError::new_err(format!("無效的匯率: {}", rate)))?;

        let pricing = self.inner.pricing().clone().with_usd_rate(rate);
        self.inner = self.inner.clone().with_pricing(pricing);
        Ok(())
    }

    /// 目前使用的美元匯率
    #[getter]
    fn usd_rate(&self) -> f64 {
        self.inner.pricing().usd_rate.to_f64().unwrap_or_default()
    }
}
