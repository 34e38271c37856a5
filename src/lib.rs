//! # EPS
//!
//! EPS 泡棉塊材切割排版、生產分配與報價引擎
//!
//! ```no_run
//! use eps::{EpsCalculator, ProductSpec};
//!
//! let calculator = EpsCalculator::default();
//! let result = calculator.calculate(&ProductSpec::new(30.0, 30.0, 30.0, 1.0))?;
//! println!("每塊主體 {} 件", result.per_block["Box"]);
//! # Ok::<(), eps::EpsError>(())
//! ```

pub mod logging;

pub use eps_calc::{calculate, EpsCalculator, PricingEngine, ProductionPartitioner};
pub use eps_core::*;
