//! Shared helpers for the integration tests: compiling through the library
//! and a small interpreter for the subset of Jasmin the compiler emits.
#![allow(dead_code)]

use ast::typed;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

pub const CLASS: &str = "Test";

/// Guards against generated code that never terminates.
const STEP_LIMIT: usize = 5_000_000;

pub fn check(source: &str) -> Result<typed::Program, notc::semantics::Error> {
    let tokens = notc::lex::tokenize(source).expect("lexes");
    let ast = notc::parse::parse(tokens).expect("parses");
    notc::semantics::check(&ast)
}

pub fn compile(source: &str) -> String {
    notc::compile_source(source, CLASS).unwrap_or_else(|e| panic!("{e}\n{source}"))
}

pub fn run(module: &str, input: &[&str]) -> Result<Vec<String>, String> {
    let module = Module::parse(module);
    let mut machine = Machine {
        module: &module,
        input: input.iter().map(|s| s.to_string()).collect(),
        output: Vec::new(),
        steps: 0,
    };
    machine.call("main()V", Vec::new())?;
    Ok(machine.output)
}

/// Compiles and runs `source`, returning every printed line.
pub fn run_source(source: &str) -> Vec<String> {
    run_with_input(source, &[])
}

pub fn run_with_input(source: &str, input: &[&str]) -> Vec<String> {
    let module = compile(source);
    run(&module, input).unwrap_or_else(|e| panic!("{e}\n{module}"))
}

/// Instruction lines (labels included) of the method `spec`, e.g. `main()V`.
pub fn method_body(module: &str, spec: &str) -> Vec<String> {
    let module = Module::parse(module);
    let method = module
        .methods
        .get(spec)
        .unwrap_or_else(|| panic!("no method {spec}"));
    method.lines.clone()
}

pub fn method_limits(module: &str, spec: &str) -> (usize, usize) {
    let module = Module::parse(module);
    let method = &module.methods[spec];
    (method.limit_locals, method.limit_stack)
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i32),
    Double(f64),
    Str(Rc<str>),
}

impl Value {
    const fn size(&self) -> usize {
        match self {
            Self::Double(_) => 2,
            _ => 1,
        }
    }

    fn int(&self) -> Result<i32, String> {
        match self {
            Self::Int(i) => Ok(*i),
            other => Err(format!("expected int, found {other:?}")),
        }
    }

    fn double(&self) -> Result<f64, String> {
        match self {
            Self::Double(d) => Ok(*d),
            other => Err(format!("expected double, found {other:?}")),
        }
    }
}

#[derive(Default)]
struct MethodBody {
    limit_locals: usize,
    limit_stack: usize,
    code: Vec<String>,
    labels: HashMap<String, usize>,
    lines: Vec<String>,
}

struct Module {
    methods: HashMap<String, MethodBody>,
}

impl Module {
    fn parse(text: &str) -> Self {
        let mut methods = HashMap::new();
        let mut lines = text.lines();
        while let Some(line) = lines.next() {
            let Some(header) = line.trim().strip_prefix(".method ") else {
                continue;
            };
            let spec = header.split_whitespace().last().unwrap_or_default().to_owned();
            let mut body = MethodBody::default();
            for line in lines.by_ref() {
                let line = line.trim();
                if line == ".end method" {
                    break;
                } else if let Some(n) = line.strip_prefix(".limit locals ") {
                    body.limit_locals = n.parse().expect("locals limit");
                } else if let Some(n) = line.strip_prefix(".limit stack ") {
                    body.limit_stack = n.parse().expect("stack limit");
                } else if line.is_empty() {
                } else if let Some(label) = line.strip_suffix(':') {
                    body.labels.insert(label.to_owned(), body.code.len());
                    body.lines.push(line.to_owned());
                } else {
                    body.code.push(line.to_owned());
                    body.lines.push(line.to_owned());
                }
            }
            methods.insert(spec, body);
        }
        Self { methods }
    }
}

struct Machine<'m> {
    module: &'m Module,
    input: VecDeque<String>,
    output: Vec<String>,
    steps: usize,
}

fn arg_count(spec: &str) -> Result<usize, String> {
    let params = spec
        .split_once('(')
        .and_then(|(_, rest)| rest.split_once(')'))
        .map(|(params, _)| params)
        .ok_or_else(|| format!("bad descriptor {spec}"))?;
    let mut count = 0;
    let mut chars = params.chars();
    while let Some(c) = chars.next() {
        if c == 'L' {
            for c in chars.by_ref() {
                if c == ';' {
                    break;
                }
            }
        }
        count += 1;
    }
    Ok(count)
}

fn unescape(literal: &str) -> Result<String, String> {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| format!("bad string literal {literal}"))?;
    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(match chars.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some(c) => c,
                None => return Err("dangling escape".into()),
            });
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

impl Machine<'_> {
    fn read(&mut self) -> Result<String, String> {
        self.input.pop_front().ok_or_else(|| "input exhausted".to_owned())
    }

    fn call(&mut self, spec: &str, args: Vec<Value>) -> Result<Option<Value>, String> {
        match spec {
            "printInt(I)V" => {
                self.output.push(args[0].int()?.to_string());
                return Ok(None);
            }
            "printDouble(D)V" => {
                self.output.push(format!("{:?}", args[0].double()?));
                return Ok(None);
            }
            "printString(Ljava/lang/String;)V" => {
                match &args[0] {
                    Value::Str(s) => self.output.push(s.to_string()),
                    other => return Err(format!("printString got {other:?}")),
                }
                return Ok(None);
            }
            "readInt()I" => {
                let line = self.read()?;
                return line.trim().parse().map(|i| Some(Value::Int(i))).map_err(|e| format!("{e}"));
            }
            "readDouble()D" => {
                let line = self.read()?;
                return line
                    .trim()
                    .parse()
                    .map(|d| Some(Value::Double(d)))
                    .map_err(|e| format!("{e}"));
            }
            "readString()Ljava/lang/String;" => {
                let line = self.read()?;
                return Ok(Some(Value::Str(line.into())));
            }
            _ => {}
        }

        let module = self.module;
        let method = module
            .methods
            .get(spec)
            .ok_or_else(|| format!("no method {spec}"))?;
        let mut locals: Vec<Option<Value>> = vec![None; method.limit_locals];
        let mut next = 0;
        for arg in args {
            let size = arg.size();
            if next + size > method.limit_locals {
                return Err(format!("{spec}: parameters exceed .limit locals"));
            }
            locals[next] = Some(arg);
            next += size;
        }

        let mut stack: Vec<Value> = Vec::new();
        let mut pc = 0;
        loop {
            self.steps += 1;
            if self.steps > STEP_LIMIT {
                return Err("step limit exceeded".into());
            }
            let line = method
                .code
                .get(pc)
                .ok_or_else(|| format!("{spec}: fell off the end of the method"))?;
            pc += 1;
            let (op, arg) = line.split_once(' ').unwrap_or((line.as_str(), ""));
            let mut pop = || stack.pop().ok_or_else(|| format!("{spec}: {line}: stack underflow"));

            let mut jump = None;
            let push = match op {
                "iconst_m1" => Some(Value::Int(-1)),
                "bipush" | "sipush" => Some(Value::Int(arg.parse().map_err(|e| format!("{e}"))?)),
                "ldc" if arg.starts_with('"') => Some(Value::Str(unescape(arg)?.into())),
                "ldc" => Some(Value::Int(arg.parse().map_err(|e| format!("{e}"))?)),
                "ldc2_w" => Some(Value::Double(arg.parse().map_err(|e| format!("{e}"))?)),
                "dconst_0" => Some(Value::Double(0.0)),
                "dconst_1" => Some(Value::Double(1.0)),
                op if op.starts_with("iconst_") => {
                    Some(Value::Int(op["iconst_".len()..].parse().map_err(|e| format!("{e}"))?))
                }
                "iload" | "dload" | "aload" => {
                    let slot: usize = arg.parse().map_err(|e| format!("{e}"))?;
                    let value = locals
                        .get(slot)
                        .cloned()
                        .flatten()
                        .ok_or_else(|| format!("{spec}: {line}: uninitialized local"))?;
                    Some(value)
                }
                "istore" | "dstore" | "astore" => {
                    let slot: usize = arg.parse().map_err(|e| format!("{e}"))?;
                    let value = pop()?;
                    if slot + value.size() > method.limit_locals {
                        return Err(format!("{spec}: {line}: slot outside .limit locals"));
                    }
                    locals[slot] = Some(value);
                    None
                }
                "iadd" | "isub" | "imul" | "idiv" | "irem" | "iand" | "ior" => {
                    let b = pop()?.int()?;
                    let a = pop()?.int()?;
                    if (op == "idiv" || op == "irem") && b == 0 {
                        return Err("ArithmeticException: / by zero".into());
                    }
                    Some(Value::Int(match op {
                        "iadd" => a.wrapping_add(b),
                        "isub" => a.wrapping_sub(b),
                        "imul" => a.wrapping_mul(b),
                        "idiv" => a.wrapping_div(b),
                        "irem" => a.wrapping_rem(b),
                        "iand" => a & b,
                        _ => a | b,
                    }))
                }
                "dadd" | "dsub" | "dmul" | "ddiv" | "drem" => {
                    let b = pop()?.double()?;
                    let a = pop()?.double()?;
                    Some(Value::Double(match op {
                        "dadd" => a + b,
                        "dsub" => a - b,
                        "dmul" => a * b,
                        "ddiv" => a / b,
                        _ => a % b,
                    }))
                }
                "ineg" => Some(Value::Int(pop()?.int()?.wrapping_neg())),
                "dneg" => Some(Value::Double(-pop()?.double()?)),
                "i2d" => Some(Value::Double(f64::from(pop()?.int()?))),
                "dcmpg" | "dcmpl" => {
                    let b = pop()?.double()?;
                    let a = pop()?.double()?;
                    let result = match a.partial_cmp(&b) {
                        Some(ordering) => ordering as i32,
                        None if op == "dcmpg" => 1,
                        None => -1,
                    };
                    Some(Value::Int(result))
                }
                op if op.starts_with("if_icmp") => {
                    let b = pop()?.int()?;
                    let a = pop()?.int()?;
                    if compare(&op["if_icmp".len()..], a, b)? {
                        jump = Some(arg);
                    }
                    None
                }
                op if op.starts_with("if") => {
                    let a = pop()?.int()?;
                    if compare(&op["if".len()..], a, 0)? {
                        jump = Some(arg);
                    }
                    None
                }
                "goto" => {
                    jump = Some(arg);
                    None
                }
                "dup" => {
                    let top = pop()?;
                    stack.push(top.clone());
                    Some(top)
                }
                "dup2" => {
                    let top = pop()?;
                    if top.size() != 2 {
                        return Err(format!("{spec}: dup2 on single word"));
                    }
                    stack.push(top.clone());
                    Some(top)
                }
                "pop" | "pop2" => {
                    let top = pop()?;
                    let expected = if op == "pop" { 1 } else { 2 };
                    if top.size() != expected {
                        return Err(format!("{spec}: {op} on {top:?}"));
                    }
                    None
                }
                "invokestatic" => {
                    let (_, callee) = arg
                        .split_once('/')
                        .ok_or_else(|| format!("bad call target {arg}"))?;
                    let count = arg_count(callee)?;
                    if stack.len() < count {
                        return Err(format!("{spec}: not enough arguments for {callee}"));
                    }
                    let args = stack.split_off(stack.len() - count);
                    self.call(callee, args)?
                }
                "ireturn" | "dreturn" | "areturn" => return pop().map(Some),
                "return" => return Ok(None),
                other => return Err(format!("{spec}: unsupported instruction {other}")),
            };

            if let Some(value) = push {
                stack.push(value);
            }
            let words: usize = stack.iter().map(Value::size).sum();
            if words > method.limit_stack {
                return Err(format!(
                    "{spec}: {line}: {words} words exceed .limit stack {}",
                    method.limit_stack
                ));
            }
            if let Some(label) = jump {
                pc = *method
                    .labels
                    .get(label)
                    .ok_or_else(|| format!("{spec}: unknown label {label}"))?;
            }
        }
    }
}

fn compare(cond: &str, a: i32, b: i32) -> Result<bool, String> {
    Ok(match cond {
        "eq" => a == b,
        "ne" => a != b,
        "lt" => a < b,
        "gt" => a > b,
        "le" => a <= b,
        "ge" => a >= b,
        other => return Err(format!("unknown condition {other}")),
    })
}
