//! jq pre-processing of input schemas.
use anyhow::{Context, Result, anyhow};
use jaq_core::{Compiler, Ctx, RcIter, compile::Undefined, load};
use jaq_json::Val;
use serde_json::Value;

/// Run `filter_src` over `input`; each jq output becomes one document.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader.load(&arena, program).map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let it = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in it {
        let val = item.map_err(|e| anyhow!("jq error: {e:?}"))?;
        let text = val.to_string();
        let value = serde_json::from_str::<Value>(&text).with_context(|| format!("jq produced invalid JSON: {text}"))?;
        out.push(value);
    }
    Ok(out)
}

/// Select a sub-document by JSON pointer (`/definitions/order`).
pub fn select_pointer(input: Value, pointer: &str) -> Result<Value> {
    if pointer.is_empty() || pointer == "/" {
        return Ok(input);
    }
    input
        .pointer(pointer)
        .cloned()
        .ok_or_else(|| anyhow!("JSON pointer {pointer} selects nothing"))
}

fn format_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> anyhow::Error {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    anyhow!(s)
}

fn format_undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> anyhow::Error {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    anyhow!(s)
}
