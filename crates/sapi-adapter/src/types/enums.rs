/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a liquidity pool operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LiquidityOperation {
    Add,
    Remove,
}

impl LiquidityOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            LiquidityOperation::Add => "ADD",
            LiquidityOperation::Remove => "REMOVE",
        }
    }
}

impl fmt::Display for LiquidityOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How liquidity is withdrawn from a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RemoveLiquidityType {
    /// Withdraw into a single asset
    Single,
    /// Withdraw proportionally into every pool asset
    Combination,
}

impl RemoveLiquidityType {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoveLiquidityType::Single => "SINGLE",
            RemoveLiquidityType::Combination => "COMBINATION",
        }
    }
}

impl fmt::Display for RemoveLiquidityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
