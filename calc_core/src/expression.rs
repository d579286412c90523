//! # Formula Evaluation
//!
//! Thin wrapper around `evalexpr` for the engine's algebraic formulas.
//! Formulas reference input keys as free variables and support arithmetic
//! with proper operator precedence plus a small set of math helpers.
//!
//! Free variables absent from the scope evaluate as `0.0` rather than
//! erroring, which keeps partially-filled widget forms computing.

use evalexpr::{ContextWithMutableFunctions, ContextWithMutableVariables, Function, Value};
use std::collections::BTreeMap;

use crate::errors::{CalcError, CalcResult};

/// Evaluate an algebraic formula against a numeric scope.
///
/// # Example
/// ```rust
/// use std::collections::BTreeMap;
/// use calc_core::expression::evaluate;
///
/// let mut scope = BTreeMap::new();
/// scope.insert("amount".to_string(), 1000.0);
/// scope.insert("rate".to_string(), 5.0);
///
/// let interest = evaluate("amount * rate / 100", &scope).unwrap();
/// assert_eq!(interest, 50.0);
/// ```
pub fn evaluate(formula: &str, scope: &BTreeMap<String, f64>) -> CalcResult<f64> {
    let tree = evalexpr::build_operator_tree(formula)
        .map_err(|e| CalcError::formula_failed(formula, e.to_string()))?;

    let mut context = evalexpr::HashMapContext::new();
    for (name, value) in scope {
        context
            .set_value(name.clone(), Value::from(*value))
            .map_err(|e| {
                CalcError::formula_failed(formula, format!("Failed to set variable {name}: {e}"))
            })?;
    }

    // Unresolved free variables read as zero
    for name in tree.iter_variable_identifiers() {
        if !scope.contains_key(name) {
            context
                .set_value(name.to_string(), Value::from(0.0))
                .map_err(|e| {
                    CalcError::formula_failed(
                        formula,
                        format!("Failed to zero-fill variable {name}: {e}"),
                    )
                })?;
        }
    }

    register_helper_functions(&mut context, formula)?;

    let result = tree
        .eval_with_context(&context)
        .map_err(|e| CalcError::formula_failed(formula, e.to_string()))?;

    value_to_f64(result, formula)
}

/// Register math helpers available inside formulas.
fn register_helper_functions(
    context: &mut evalexpr::HashMapContext,
    formula: &str,
) -> CalcResult<()> {
    fn to_f64(value: &Value) -> Result<f64, evalexpr::EvalexprError> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            _ => Err(evalexpr::EvalexprError::expected_number(value.clone())),
        }
    }

    let register = |context: &mut evalexpr::HashMapContext,
                    name: &str,
                    function: Function|
     -> CalcResult<()> {
        context
            .set_function(name.to_string(), function)
            .map_err(|e| {
                CalcError::formula_failed(formula, format!("Failed to register {name}: {e}"))
            })
    };

    register(
        context,
        "sqrt",
        Function::new(|args| {
            let value = to_f64(args)?;
            Ok(Value::Float(value.sqrt()))
        }),
    )?;

    register(
        context,
        "abs",
        Function::new(|args| {
            let value = to_f64(args)?;
            Ok(Value::Float(value.abs()))
        }),
    )?;

    register(
        context,
        "min",
        Function::new(|args| {
            let tuple = args.as_fixed_len_tuple(2)?;
            let a = to_f64(&tuple[0])?;
            let b = to_f64(&tuple[1])?;
            Ok(Value::Float(a.min(b)))
        }),
    )?;

    register(
        context,
        "max",
        Function::new(|args| {
            let tuple = args.as_fixed_len_tuple(2)?;
            let a = to_f64(&tuple[0])?;
            let b = to_f64(&tuple[1])?;
            Ok(Value::Float(a.max(b)))
        }),
    )?;

    register(
        context,
        "round",
        Function::new(|args| {
            let tuple = args.as_fixed_len_tuple(2)?;
            let value = to_f64(&tuple[0])?;
            let decimals = tuple[1].as_int()? as i32;
            let factor = 10f64.powi(decimals);
            Ok(Value::Float((value * factor).round() / factor))
        }),
    )?;

    register(
        context,
        "clamp",
        Function::new(|args| {
            let tuple = args.as_fixed_len_tuple(3)?;
            let value = to_f64(&tuple[0])?;
            let min = to_f64(&tuple[1])?;
            let max = to_f64(&tuple[2])?;
            Ok(Value::Float(value.max(min).min(max)))
        }),
    )?;

    Ok(())
}

/// Convert an evalexpr Value to f64.
fn value_to_f64(value: Value, formula: &str) -> CalcResult<f64> {
    match value {
        Value::Float(f) => Ok(f),
        Value::Int(i) => Ok(i as f64),
        Value::Boolean(b) => Ok(if b { 1.0 } else { 0.0 }),
        _ => Err(CalcError::formula_failed(
            formula,
            "Expression did not evaluate to a number",
        )),
    }
}
