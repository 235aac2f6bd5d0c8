//! NeoVM invocation scripts.
//!
//! An invocation evaluates `[function, [args...]]` onto the stack and
//! calls the contract:
//!
//! ```text
//! push(arg_n) .. push(arg_1)  PUSH<n>  PACK  push(function)  APPCALL  <contract>
//! ```
//!
//! Leaves become pushes, arrays are packed recursively, and maps and
//! structs are pushed as their serialized stack item so the contract can
//! deserialize them whole.

use num_bigint::BigInt;

use ont_abi::{encode, AbiValue, MAX_DEPTH};
use ont_script::opcodes::{OP_APPCALL, OP_PACK};
use ont_script::{Address, Script};

use crate::TransactionError;

/// Compile a call to `function` on `contract` with `args`.
///
/// # Returns
/// The script, or `InvalidTransaction` for an empty function name or a
/// parameter nested deeper than `MAX_DEPTH`.
pub fn build_invoke_script(
    contract: &Address,
    function: &str,
    args: &[AbiValue],
) -> Result<Script, TransactionError> {
    if function.is_empty() {
        return Err(TransactionError::InvalidTransaction(
            "function name is empty".to_string(),
        ));
    }
    if let Some(deep) = args.iter().find(|a| a.depth() > MAX_DEPTH) {
        return Err(TransactionError::InvalidTransaction(format!(
            "parameter nests {} levels, limit is {MAX_DEPTH}",
            deep.depth()
        )));
    }

    let mut script = Script::new();
    push_list(&mut script, args)?;
    script.append_push_data(function.as_bytes())?;
    script.append_opcode(OP_APPCALL);
    script.append_raw(contract.as_bytes());
    Ok(script)
}

fn push_list(script: &mut Script, items: &[AbiValue]) -> Result<(), TransactionError> {
    for item in items.iter().rev() {
        push_value(script, item)?;
    }
    script.append_int(&BigInt::from(items.len()))?;
    script.append_opcode(OP_PACK);
    Ok(())
}

fn push_value(script: &mut Script, value: &AbiValue) -> Result<(), TransactionError> {
    match value {
        AbiValue::Bool(b) => script.append_bool(*b),
        AbiValue::Int(n) => script.append_int(n)?,
        AbiValue::ByteArray(bytes) => script.append_push_data(bytes)?,
        AbiValue::String(s) => script.append_push_data(s.as_bytes())?,
        AbiValue::Address(addr) => script.append_push_data(addr.as_bytes())?,
        AbiValue::Array(items) => push_list(script, items)?,
        AbiValue::Map(_) | AbiValue::Struct(_) => script.append_push_data(&encode(value)?)?,
    }
    Ok(())
}
