//! # EPS 報價範例
//!
//! 這個範例展示完整的報價流程：
//! - 產品：30 × 30 × 30 cm 保冷箱，壁厚 1 cm
//! - 配件：上蓋、底蓋
//! - 先以模擬模式看單塊產出，再以 500 件訂單計算塊數與報價
//!
//! 執行：`RUST_LOG=eps_calc=debug cargo run --example foam_quote`

use anyhow::{Context, Result};
use eps::{
    logging, AuxiliaryPart, CalculationRequest, CalculationResult, EpsCalculator,
    ManufacturingSettings, PricingSettings, ProductSpec,
};
use rust_decimal::Decimal;

fn main() -> Result<()> {
    logging::init();

    println!("===== EPS 報價範例 =====\n");

    // 步驟 1: 系統配置（匯率由外部來源提供）
    println!("[1] 系統配置");
    let manufacturing = ManufacturingSettings::default();
    let pricing = PricingSettings::default().with_usd_rate(Decimal::new(3410, 2));
    println!(
        "    塊材 {:?} cm，有效長軸 {} cm",
        manufacturing.block_dimensions(),
        manufacturing.effective_z()
    );
    println!("    有效匯率 {}\n", pricing.effective_usd());

    let calculator = EpsCalculator::new(manufacturing, pricing);

    // 步驟 2: 模擬模式
    println!("[2] 模擬模式（未指定數量）");
    let spec = ProductSpec::new(30.0, 30.0, 30.0, 1.0)
        .with_auxiliary_part(AuxiliaryPart::new("Ust Kapak", 1, 2.0))
        .with_auxiliary_part(AuxiliaryPart::new("Alt Kapak", 1, 2.0));
    let simulation = calculator
        .calculate(&spec)
        .context("模擬計算失敗")?;
    print_result(&simulation);

    // 步驟 3: 訂單模式
    println!("[3] 訂單模式（500 件）");
    let order = calculator
        .calculate(&spec.clone().with_requested_quantity(500))
        .context("訂單計算失敗")?;
    print_result(&order);

    // 步驟 4: JSON 請求（含本次請求的價格覆寫）
    println!("[4] JSON 請求");
    let request = CalculationRequest::from_json(
        r#"{
            "boy": "41,6", "en": 41.4, "yukseklik": 25, "wall_thickness": 1,
            "operation_type": "cut_slice",
            "req_boxes": 120,
            "pricing": { "profit_multiplier": "2,5" }
        }"#,
    )?;
    let result = calculator.calculate_request(request)?;
    print_result(&result);

    Ok(())
}

fn print_result(result: &CalculationResult) {
    let details = &result.details;

    println!(
        "    方向: {} (有效高度 {} cm)",
        details.orientation.axis_role, details.orientation.h_eff
    );
    println!(
        "    擺放: 每層 {} 排, 旋轉 {}, 切割台 {:?}",
        details.layout.rows_per_layer, details.layout.rotation, details.layout.table_axes
    );
    println!("    排數分配: {:?}", details.row_allocation);
    println!("    每塊產量: {:?}", result.per_block);
    println!("    需要塊數: {}", result.blocks_needed);
    if let Some(required) = &result.required {
        println!("    需求: {:?}", required);
    }
    println!("    超出: {:?}", result.excess);

    let pricing = &result.pricing;
    println!("    原料價/塊: {}", pricing.details.raw_block_price);
    println!("    含利潤/塊: {}", pricing.details.profit_block_price);
    println!("    運費: {}", pricing.details.total_shipping_cost);
    println!("    加工費: {}", pricing.details.total_processing_cost);
    println!("    大量折扣: {}", pricing.details.is_discounted);
    println!("    含稅總價: {}", pricing.total_price);
    println!("    單價: {}", pricing.unit_price);

    for warning in &result.warnings {
        println!("    [{:?}] {}", warning.severity, warning.message);
    }
    println!();
}
