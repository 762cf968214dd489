//! Reader for the ISCAS-89 `.bench` format (§6.1), parsing statements
//! directly into a [`NetworkBuilder`].
//!
//! Gates must appear after their dependencies, DFFs included: unlike a
//! reader that resolves every statement name in a second pass over
//! abstract signals, `NetworkBuilder` requires each fanin's `NodeId`
//! to already exist when a gate is added, so a DFF whose data input is only
//! produced later in the file is not supported. Write support and the
//! LUT/MUX/MAJ extensions are dropped: they have no counterpart in the
//! fixed gate alphabet of [`crate::circuit::PrimType`] (see DESIGN.md).

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

use crate::circuit::{NetworkBuilder, PrimType, TpgNetwork};
use crate::error::{DruidError, Result};
use crate::ids::NodeId;

fn parse_statements(r: impl Read) -> Result<(Vec<String>, Vec<String>, Vec<Vec<String>>)> {
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    let mut statements = Vec::new();
    for line in BufReader::new(r).lines() {
        let line = line.map_err(|e| DruidError::Parse(e.to_string()))?;
        let t = line.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        if !t.contains('=') {
            let parts: Vec<&str> = t
                .split(['(', ')'])
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect();
            if parts.len() != 2 {
                return Err(DruidError::Parse(format!("malformed line: {t}")));
            }
            match parts[0] {
                "INPUT" | "PINPUT" => inputs.push(parts[1].to_string()),
                "OUTPUT" | "POUTPUT" => outputs.push(parts[1].to_string()),
                other => return Err(DruidError::Parse(format!("unknown keyword {other}"))),
            }
        } else {
            let parts: Vec<String> = t
                .split(['=', '(', ',', ')'])
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect();
            if parts.len() < 2 {
                return Err(DruidError::Parse(format!("malformed statement: {t}")));
            }
            statements.push(parts);
        }
    }
    Ok((inputs, outputs, statements))
}

fn resolve(names: &HashMap<String, NodeId>, name: &str) -> Result<NodeId> {
    names
        .get(name)
        .copied()
        .ok_or_else(|| DruidError::MalformedNetwork(format!("{name} used before it is defined")))
}

/// Parse a `.bench` network into a `TpgNetwork`.
///
/// ```text
///     INPUT(i0)
///     INPUT(i1)
///     x0 = AND(i0, i1)
///     x1 = NAND(x0, i1)
///     x2 = gnd
///     OUTPUT(x0)
/// ```
pub fn read_bench(r: impl Read) -> Result<TpgNetwork> {
    let (inputs, outputs, statements) = parse_statements(r)?;

    let mut b = NetworkBuilder::new();
    let mut names: HashMap<String, NodeId> = HashMap::new();
    for name in &inputs {
        let id = b.add_input();
        if names.insert(name.clone(), id).is_some() {
            return Err(DruidError::MalformedNetwork(format!("{name} defined twice")));
        }
    }

    for s in &statements {
        let name = &s[0];
        let gate = s[1].to_uppercase();
        let deps = &s[2..];

        let id = match gate.as_str() {
            "VDD" => b.add_gate(PrimType::C1, &[])?,
            "VSS" | "GND" => b.add_gate(PrimType::C0, &[])?,
            "DFF" => {
                if deps.len() != 1 {
                    return Err(DruidError::MalformedNetwork(format!("{name}: DFF takes one input")));
                }
                let d = resolve(&names, &deps[0])?;
                b.add_dff(d)?
            }
            "BUF" | "BUFF" => b.add_gate(PrimType::Buff, &[resolve(&names, &deps[0])?])?,
            "NOT" | "INV" => b.add_gate(PrimType::Not, &[resolve(&names, &deps[0])?])?,
            "AND" | "NAND" | "OR" | "NOR" | "XOR" | "XNOR" => {
                let fanins: Vec<NodeId> = deps.iter().map(|d| resolve(&names, d)).collect::<Result<_>>()?;
                let prim = match gate.as_str() {
                    "AND" => PrimType::And,
                    "NAND" => PrimType::Nand,
                    "OR" => PrimType::Or,
                    "NOR" => PrimType::Nor,
                    "XOR" => PrimType::Xor,
                    _ => PrimType::Xnor,
                };
                b.add_gate(prim, &fanins)?
            }
            other => {
                // a bare alias line, e.g. `x0 = gnd`, rather than a gate keyword
                if deps.is_empty() {
                    resolve(&names, &s[1])?
                } else {
                    return Err(DruidError::MalformedNetwork(format!("unknown gate type {other}")));
                }
            }
        };
        if names.insert(name.clone(), id).is_some() {
            return Err(DruidError::MalformedNetwork(format!("{name} defined twice")));
        }
    }

    for name in &outputs {
        let src = resolve(&names, name)?;
        b.add_output(src)?;
    }

    b.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and2_combinational() {
        let text = "INPUT(a)\nINPUT(b)\nx = AND(a, b)\nOUTPUT(x)\n";
        let net = read_bench(text.as_bytes()).unwrap();
        assert_eq!(net.nb_inputs(), 2);
        assert_eq!(net.nb_outputs(), 1);
    }

    #[test]
    fn test_dff_splits_inputs_from_state() {
        let text = "INPUT(a)\nq = DFF(a)\nOUTPUT(q)\n";
        let net = read_bench(text.as_bytes()).unwrap();
        assert_eq!(net.nb_inputs(), 1);
        assert_eq!(net.nb_dffs(), 1);
        assert_eq!(net.nb_outputs(), 1);
    }

    #[test]
    fn test_unknown_gate_rejected() {
        let text = "INPUT(a)\nx = FROB(a)\nOUTPUT(x)\n";
        assert!(read_bench(text.as_bytes()).is_err());
    }

    #[test]
    fn test_forward_reference_rejected() {
        let text = "INPUT(a)\nx = AND(a, q)\nq = DFF(a)\nOUTPUT(x)\n";
        assert!(read_bench(text.as_bytes()).is_err());
    }

    #[test]
    fn test_constant_gate() {
        let text = "INPUT(a)\ng = gnd\nx = AND(a, g)\nOUTPUT(x)\n";
        let net = read_bench(text.as_bytes()).unwrap();
        assert_eq!(net.nb_inputs(), 1);
    }
}
