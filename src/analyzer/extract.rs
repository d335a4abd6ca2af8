//! Pull a JSON document out of free-form model output.
//!
//! Models wrap answers in prose or code fences often enough that a single
//! `serde_json::from_str` is not enough. Each strategy below gets one shot,
//! in order, and the first one that parses wins.

use serde_json::Value;

type Strategy = fn(&str) -> Option<String>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("raw", raw),
    ("json fence", json_fence),
    ("any fence", any_fence),
    ("bracket span", bracket_span),
];

/// Parse the first JSON value any strategy can find in `content`.
pub fn extract_json(content: &str) -> Result<Value, String> {
    let mut last_error = String::from("response was empty");

    for (name, strategy) in STRATEGIES {
        let Some(candidate) = strategy(content) else {
            continue;
        };
        match serde_json::from_str::<Value>(&candidate) {
            Ok(value) => {
                log::debug!("Parsed model output with '{}' strategy", name);
                return Ok(value);
            }
            Err(e) => last_error = format!("{} strategy: {}", name, e),
        }
    }

    Err(format!("no JSON found in response ({})", last_error))
}

fn raw(content: &str) -> Option<String> {
    let trimmed = content.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn json_fence(content: &str) -> Option<String> {
    fenced_blocks(content)
        .into_iter()
        .find(|(lang, _)| lang.eq_ignore_ascii_case("json"))
        .map(|(_, body)| body)
}

fn any_fence(content: &str) -> Option<String> {
    fenced_blocks(content).into_iter().next().map(|(_, body)| body)
}

/// Outermost `[...]` or `{...}` span, whichever opens first.
fn bracket_span(content: &str) -> Option<String> {
    let start = content.find(['[', '{'])?;
    let close = if content[start..].starts_with('[') { ']' } else { '}' };
    let end = content.rfind(close)?;
    (end > start).then(|| content[start..=end].to_string())
}

enum FenceState {
    Outside,
    Inside { lang: String, body: Vec<String> },
}

/// Every ``` block as (info string, body). Unterminated blocks are dropped.
fn fenced_blocks(content: &str) -> Vec<(String, String)> {
    let mut blocks = Vec::new();
    let mut state = FenceState::Outside;

    for line in content.lines() {
        let trimmed = line.trim();
        state = match state {
            FenceState::Outside => match trimmed.strip_prefix("```") {
                Some(info) => FenceState::Inside {
                    lang: info.trim().to_string(),
                    body: Vec::new(),
                },
                None => FenceState::Outside,
            },
            FenceState::Inside { lang, mut body } => {
                if trimmed.starts_with("```") {
                    blocks.push((lang, body.join("\n").trim().to_string()));
                    FenceState::Outside
                } else {
                    body.push(line.to_string());
                    FenceState::Inside { lang, body }
                }
            }
        };
    }

    blocks
}
