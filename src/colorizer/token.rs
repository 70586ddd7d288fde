//! Value tokenizer
//!
//! Walks a [`Value`] depth-first and flattens it into an ordered sequence of
//! typed text tokens. Each token carries the type tag its color is later
//! resolved from; structural delimiters (braces, brackets) are tokens of
//! their own. Primitive tokens carry one trailing separator space so the
//! concatenated sequence reads like the value's plain textual form.

use super::value::Value;

/// One atomic unit of rendered text plus its type tag and, once resolved,
/// its foreground/background palette indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub tag: String,
    pub fg: u8,
    pub bg: u8,
}

impl Token {
    fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
            fg: 0,
            bg: 0,
        }
    }
}

fn nil_token() -> Token {
    Token::new("<nil> ", "nil")
}

/// Removes exactly one trailing separator space from the last token, if any.
fn trim_last(tokens: &mut [Token]) {
    if let Some(last) = tokens.last_mut() {
        if let Some(stripped) = last.text.strip_suffix(' ') {
            last.text = stripped.to_string();
        }
    }
}

/// Flatten `value` into its token sequence.
///
/// Pure and total: every [`Value`] produces a sequence. The final token
/// keeps its trailing separator; the type-driven colorizer entry point is
/// responsible for the outermost right-trim.
pub fn tokenize(value: &Value) -> Vec<Token> {
    match value {
        Value::Nil => vec![nil_token()],

        Value::Str(_)
        | Value::Bool(_)
        | Value::I8(_)
        | Value::I16(_)
        | Value::I32(_)
        | Value::I64(_)
        | Value::U8(_)
        | Value::U16(_)
        | Value::U32(_)
        | Value::U64(_)
        | Value::F32(_)
        | Value::F64(_) => vec![Token::new(format!("{} ", value), value.kind())],

        Value::Struct { fields, .. } => {
            let mut tokens = vec![Token::new("{", "struct")];
            for (_, field) in fields {
                tokens.extend(tokenize(field));
            }
            trim_last(&mut tokens);
            tokens.push(Token::new("} ", "struct"));
            tokens
        }

        Value::Ptr(None) => vec![nil_token()],
        Value::Ptr(Some(inner)) => {
            let mut tokens = vec![Token::new("&{", "ptr")];
            match inner.as_ref() {
                Value::Struct { fields, .. } => {
                    for (_, field) in fields {
                        tokens.extend(tokenize(field));
                    }
                }
                // Non-record pointees are walked directly; the walk must not
                // fail for any value.
                other => tokens.extend(tokenize(other)),
            }
            trim_last(&mut tokens);
            tokens.push(Token::new("} ", "ptr"));
            tokens
        }

        Value::Func(None) => vec![nil_token()],
        // Non-nil functions render as nothing. Fixed policy.
        Value::Func(Some(_)) => Vec::new(),

        Value::Chan(None) => vec![nil_token()],
        Value::Chan(Some(repr)) => vec![Token::new(repr.clone(), "chan")],

        Value::Iface {
            decl: Some(_),
            inner,
        } => {
            // Named contract types stay opaque.
            let shown = inner
                .as_deref()
                .map(Value::to_string)
                .unwrap_or_else(|| "<nil>".to_string());
            vec![Token::new(format!("<{}>", shown), "interface")]
        }
        Value::Iface {
            decl: None,
            inner: None,
        } => vec![nil_token()],
        // The empty-interface wrapper is discarded; the boxed value is
        // tokenized in place.
        Value::Iface {
            decl: None,
            inner: Some(inner),
        } => tokenize(inner),

        Value::Slice { elem, items: None } => vec![Token::new("[] ", elem.clone())],
        Value::Slice {
            elem,
            items: Some(items),
        } => {
            let mut tokens = vec![Token::new("[", elem.clone())];
            for item in items {
                let mut sub = tokenize(item);
                for tok in &mut sub {
                    tok.tag = elem.clone();
                    if tok.text.ends_with('{') {
                        tok.text = "{".to_string();
                    }
                }
                tokens.extend(sub);
            }
            trim_last(&mut tokens);
            tokens.push(Token::new("]", elem.clone()));
            tokens
        }

        Value::Map(pairs) => {
            let mut tokens = Vec::new();
            match pairs {
                None => tokens.push(nil_token()),
                Some(pairs) => {
                    tokens.push(Token::new("map[", "map"));
                    for (key, val) in pairs {
                        tokens.extend(tokenize(key));
                        trim_last(&mut tokens);
                        tokens.push(Token::new(":", "map"));
                        tokens.extend(tokenize(val));
                    }
                    trim_last(&mut tokens);
                }
            }
            // The closing token is appended in both branches. The asymmetry
            // against the opening token is fixed observable output.
            tokens.push(Token::new("] ", "map"));
            tokens
        }
    }
}
