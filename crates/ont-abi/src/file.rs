//! Contract ABI definition files.
//!
//! ```json
//! {"hash": "...", "entrypoint": "Main",
//!  "functions": [{"name": "hello", "parameters": [{"name": "msg", "type": "String"}],
//!                 "returntype": "String"}],
//!  "events": []}
//! ```

use serde::{Deserialize, Serialize};

use ont_script::Address;

use crate::value::{AbiType, AbiValue};
use crate::AbiError;

/// A function or event parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// A contract function signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiFunction {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<AbiParameter>,
    #[serde(rename = "returntype", default = "void")]
    pub return_type: String,
}

/// An event the contract may emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiEvent {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<AbiParameter>,
    #[serde(rename = "returntype", default = "void")]
    pub return_type: String,
}

/// A parsed ABI definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiFile {
    pub hash: String,
    #[serde(default)]
    pub entrypoint: String,
    #[serde(default)]
    pub functions: Vec<AbiFunction>,
    #[serde(default)]
    pub events: Vec<AbiEvent>,
}

fn void() -> String {
    "Void".to_string()
}

impl AbiFile {
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Option<&AbiFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn event(&self, name: &str) -> Option<&AbiEvent> {
        self.events.iter().find(|e| e.name == name)
    }

    /// The contract address published in `hash` (byte-reversed hex,
    /// optionally `0x`-prefixed).
    pub fn contract_address(&self) -> Result<Address, AbiError> {
        Ok(Address::from_hex_reversed(&self.hash)?)
    }
}

impl AbiFunction {
    /// Declared parameter shapes, in order.
    pub fn parameter_shapes(&self) -> Result<Vec<AbiType>, AbiError> {
        self.parameters
            .iter()
            .map(|p| AbiType::from_name(&p.type_name))
            .collect()
    }

    /// Declared return shape; `None` for `Void`.
    pub fn return_shape(&self) -> Result<Option<AbiType>, AbiError> {
        match self.return_type.as_str() {
            "Void" | "" => Ok(None),
            name => AbiType::from_name(name).map(Some),
        }
    }

    /// Check that `args` match the declared parameters in count and shape.
    pub fn check_arguments(&self, args: &[AbiValue]) -> Result<(), AbiError> {
        let shapes = self.parameter_shapes()?;
        if shapes.len() != args.len() {
            return Err(AbiError::ArgumentMismatch(format!(
                "{} takes {} arguments, got {}",
                self.name,
                shapes.len(),
                args.len()
            )));
        }
        for ((shape, arg), param) in shapes.iter().zip(args).zip(&self.parameters) {
            if !shape.accepts(arg) {
                return Err(AbiError::ArgumentMismatch(format!(
                    "{}: parameter {} expects {}, got {}",
                    self.name,
                    param.name,
                    shape,
                    arg.shape()
                )));
            }
        }
        Ok(())
    }
}
