//! 產品規格模型

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::numeric::NumericField;
use crate::{EpsError, Result};

/// 主體元件名稱
pub const BOX_COMPONENT: &str = "Box";

/// 未提供密度時使用的預設 DNS
pub const DEFAULT_DENSITY: f64 = 16.0;

/// 作業類型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    /// 僅切割
    #[default]
    Cut,
    /// 切割＋切片
    CutSlice,
    /// 切割＋黏合
    CutPaste,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Cut => "cut",
            OperationType::CutSlice => "cut_slice",
            OperationType::CutPaste => "cut_paste",
        }
    }
}

impl FromStr for OperationType {
    type Err = EpsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "cut" => Ok(OperationType::Cut),
            "cut_slice" => Ok(OperationType::CutSlice),
            "cut_paste" => Ok(OperationType::CutPaste),
            other => Err(EpsError::InvalidInput(format!(
                "未知的作業類型: {}，必須為 'cut'、'cut_slice' 或 'cut_paste'",
                other
            ))),
        }
    }
}

/// 配件（上蓋、底蓋、隔板等平板件）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryPart {
    /// 名稱（同一請求內唯一）
    pub name: String,

    /// 每個成品使用的數量
    pub count: u64,

    /// 厚度（cm）
    pub thickness_cm: f64,
}

impl AuxiliaryPart {
    /// 創建新的配件
    pub fn new(name: impl Into<String>, count: u64, thickness_cm: f64) -> Self {
        Self {
            name: name.into(),
            count,
            thickness_cm,
        }
    }
}

/// 產品規格（已驗證的計算請求）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSpec {
    /// 長度（cm）
    pub boy: f64,

    /// 寬度（cm）
    pub en: f64,

    /// 高度（cm）
    pub yukseklik: f64,

    /// 壁厚（cm）
    pub wall_thickness: f64,

    /// 密度（DNS）
    pub density: Option<f64>,

    /// 配件（依請求順序）
    pub auxiliary_parts: Vec<AuxiliaryPart>,

    /// 訂單數量；None 表示模擬模式
    pub requested_quantity: Option<u64>,

    /// 作業類型
    pub operation_type: OperationType,
}

impl ProductSpec {
    /// 創建新的產品規格
    pub fn new(boy: f64, en: f64, yukseklik: f64, wall_thickness: f64) -> Self {
        Self {
            boy,
            en,
            yukseklik,
            wall_thickness,
            density: None,
            auxiliary_parts: Vec::new(),
            requested_quantity: None,
            operation_type: OperationType::Cut,
        }
    }

    /// 建構器模式：設置密度
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }

    /// 建構器模式：添加配件
    pub fn with_auxiliary_part(mut self, part: AuxiliaryPart) -> Self {
        self.auxiliary_parts.push(part);
        self
    }

    /// 建構器模式：設置訂單數量
    pub fn with_requested_quantity(mut self, quantity: u64) -> Self {
        self.requested_quantity = Some(quantity);
        self
    }

    /// 建構器模式：設置作業類型
    pub fn with_operation_type(mut self, operation_type: OperationType) -> Self {
        self.operation_type = operation_type;
        self
    }

    /// 是否為訂單模式（指定數量且大於 0）
    pub fn is_order(&self) -> bool {
        matches!(self.requested_quantity, Some(qty) if qty > 0)
    }

    /// 計價用密度（未提供或非正數時使用 [`DEFAULT_DENSITY`]）
    pub fn density_or_default(&self) -> f64 {
        self.density
            .filter(|dns| *dns > 0.0)
            .unwrap_or(DEFAULT_DENSITY)
    }

    /// 元件名稱：主體在前，其後依序為配件
    pub fn component_names(&self) -> Vec<String> {
        std::iter::once(BOX_COMPONENT.to_string())
            .chain(self.auxiliary_parts.iter().map(|p| p.name.clone()))
            .collect()
    }

    /// 驗證規格
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("boy", self.boy),
            ("en", self.en),
            ("yukseklik", self.yukseklik),
        ];
        for (name, value) in required {
            if !(value.is_finite() && value > 0.0) {
                return Err(EpsError::InvalidInput(format!(
                    "{} 必須為正數，目前為 {}",
                    name, value
                )));
            }
        }

        if !(self.wall_thickness.is_finite() && self.wall_thickness >= 0.0) {
            return Err(EpsError::InvalidInput(format!(
                "wall_thickness 不可為負數，目前為 {}",
                self.wall_thickness
            )));
        }

        let mut names = HashSet::new();
        names.insert(BOX_COMPONENT);
        for part in &self.auxiliary_parts {
            if part.name.trim().is_empty() {
                return Err(EpsError::InvalidInput("配件名稱不可為空".to_string()));
            }
            if !names.insert(part.name.as_str()) {
                return Err(EpsError::InvalidInput(format!(
                    "配件名稱重複: {}",
                    part.name
                )));
            }
            if !(part.thickness_cm.is_finite() && part.thickness_cm > 0.0) {
                return Err(EpsError::InvalidInput(format!(
                    "配件 {} 的厚度必須為正數，目前為 {}",
                    part.name, part.thickness_cm
                )));
            }
        }

        Ok(())
    }
}

/// 配件原始輸入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuxiliaryPartInput {
    pub name: String,
    pub count: Option<NumericField>,
    pub thickness_cm: Option<NumericField>,
}

/// 產品原始輸入（表單或 JSON，數值欄位寬鬆解析）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductInput {
    pub boy: Option<NumericField>,
    pub en: Option<NumericField>,
    pub yukseklik: Option<NumericField>,
    pub wall_thickness: Option<NumericField>,

    #[serde(alias = "dns")]
    pub density: Option<NumericField>,

    #[serde(alias = "extra_parts")]
    pub auxiliary_parts: Vec<AuxiliaryPartInput>,

    #[serde(alias = "req_boxes")]
    pub requested_quantity: Option<NumericField>,

    pub operation_type: Option<String>,
}

impl ProductInput {
    /// 轉換並驗證為 [`ProductSpec`]
    ///
    /// 空白或無效數值以 0 代替，之後由驗證規則拒絕必要尺寸。
    pub fn into_spec(self) -> Result<ProductSpec> {
        let value = |field: &Option<NumericField>| field.as_ref().map_or(0.0, NumericField::value);

        let operation_type = match self.operation_type.as_deref() {
            None | Some("") => OperationType::Cut,
            Some(raw) => raw.parse()?,
        };

        let auxiliary_parts = self
            .auxiliary_parts
            .iter()
            .map(|part| -> Result<AuxiliaryPart> {
                let name = part.name.trim().to_string();
                let label = format!("配件 {} 的數量", name);
                let count = parse_count_field(&label, &part.count)?.unwrap_or(0);
                Ok(AuxiliaryPart {
                    name,
                    count,
                    thickness_cm: value(&part.thickness_cm),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let requested_quantity =
            parse_count_field("req_boxes", &self.requested_quantity)?.filter(|qty| *qty > 0);

        let spec = ProductSpec {
            boy: value(&self.boy),
            en: value(&self.en),
            yukseklik: value(&self.yukseklik),
            wall_thickness: value(&self.wall_thickness),
            density: self
                .density
                .as_ref()
                .and_then(NumericField::parse)
                .filter(|dns| *dns > 0.0),
            auxiliary_parts,
            requested_quantity,
            operation_type,
        };

        spec.validate()?;
        Ok(spec)
    }
}

/// 解析數量欄位；數值超出 `u64` 範圍時回傳 [`EpsError::InvalidInput`]
fn parse_count_field(name: &str, field: &Option<NumericField>) -> Result<Option<u64>> {
    match field {
        Some(field) if field.exceeds_count_range() => Err(EpsError::InvalidInput(format!(
            "{} 超出可表示範圍: {:?}",
            name, field
        ))),
        Some(field) => Ok(field.parse_count()),
        None => Ok(None),
    }
}
