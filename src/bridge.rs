//! Form bridge - locating a form in rendered content and submitting it
//!
//! The controller never touches markup directly; this seam serializes a form
//! out of fetched HTML and later submits the (possibly edited) fields to the
//! form's own action.

use std::thread;

use anyhow::Context;
use serde_json::Value;

use crate::model::{FormField, FormSnapshot};

/// Outcome of an asynchronous submission
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Arbitrary success payload, optionally carrying a `message` string
    Success { payload: Value },
    /// Transport or server failure; surfacing is the transport layer's job
    Failure { error: String },
}

pub type SubmitCallback = Box<dyn FnOnce(SubmitOutcome) + Send>;

/// Serializes and submits forms found in panel content
pub trait FormBridge {
    /// Locate and serialize the first form in rendered content, if any
    fn extract(&self, html: &str) -> Option<FormSnapshot>;
    /// Submit the fields to the form's own action/method
    fn submit(&self, form: FormSnapshot, done: SubmitCallback);
}

/// Default bridge: a minimal form scanner plus a blocking HTTP submission
pub struct HttpFormBridge {
    client: reqwest::blocking::Client,
}

impl HttpFormBridge {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }

    fn post_form(
        client: &reqwest::blocking::Client,
        form: &FormSnapshot,
    ) -> anyhow::Result<Value> {
        let method = reqwest::Method::from_bytes(form.method.to_ascii_uppercase().as_bytes())
            .with_context(|| format!("invalid form method {:?}", form.method))?;
        let pairs: Vec<(&str, &str)> = form
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();

        let response = client
            .request(method, &form.action)
            .form(&pairs)
            .send()
            .with_context(|| format!("submission to {} failed", form.action))?
            .error_for_status()
            .with_context(|| format!("submission to {} rejected", form.action))?;

        // Non-JSON success bodies are valid; treat them as an empty payload
        Ok(response.json::<Value>().unwrap_or(Value::Null))
    }
}

impl Default for HttpFormBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl FormBridge for HttpFormBridge {
    fn extract(&self, html: &str) -> Option<FormSnapshot> {
        scan_form(html)
    }

    fn submit(&self, form: FormSnapshot, done: SubmitCallback) {
        let client = self.client.clone();
        thread::spawn(move || {
            let outcome = match Self::post_form(&client, &form) {
                Ok(payload) => SubmitOutcome::Success { payload },
                Err(e) => SubmitOutcome::Failure {
                    error: format!("{e:#}"),
                },
            };
            done(outcome);
        });
    }
}

// ============================================================================
// Form scanning
// ============================================================================
//
// A deliberately small serializer for server-rendered fragments: first form
// only, named controls only. Anything fancier belongs to a host-provided
// bridge.

/// Serialize the first `<form>` in an HTML fragment
pub fn scan_form(html: &str) -> Option<FormSnapshot> {
    let lower = html.to_ascii_lowercase();
    let open = find_tag(&lower, "form", 0)?;
    let tag = &html[open.0..open.1];
    let body_start = open.1;
    let body_end = lower[body_start..]
        .find("</form")
        .map(|i| body_start + i)
        .unwrap_or(html.len());
    let body = &html[body_start..body_end];
    let body_lower = &lower[body_start..body_end];

    let mut form = FormSnapshot::new(
        attr_value(tag, "action").unwrap_or_default(),
        attr_value(tag, "method")
            .map(|m| m.to_ascii_lowercase())
            .unwrap_or_else(|| "post".to_string()),
    );
    scan_fields(body, body_lower, &mut form.fields);
    Some(form)
}

fn scan_fields(body: &str, body_lower: &str, fields: &mut Vec<FormField>) {
    let mut at = 0;
    while let Some((start, end)) = next_tag(body_lower, at) {
        let tag = &body[start..end];
        let name = tag_name(&body_lower[start..end]);
        at = end;
        match name {
            "input" => {
                let Some(field_name) = attr_value(tag, "name") else {
                    continue;
                };
                let kind = attr_value(tag, "type")
                    .map(|t| t.to_ascii_lowercase())
                    .unwrap_or_else(|| "text".to_string());
                match kind.as_str() {
                    "submit" | "button" | "reset" | "image" => {}
                    "checkbox" | "radio" => {
                        if has_attr(tag, "checked") {
                            let value = attr_value(tag, "value").unwrap_or_else(|| "on".into());
                            fields.push(FormField::new(field_name, value));
                        }
                    }
                    _ => {
                        fields.push(FormField::new(
                            field_name,
                            attr_value(tag, "value").unwrap_or_default(),
                        ));
                    }
                }
            }
            "textarea" => {
                let Some(field_name) = attr_value(tag, "name") else {
                    continue;
                };
                let close = body_lower[end..].find("</textarea").map(|i| end + i);
                let value = close.map(|c| body[end..c].to_string()).unwrap_or_default();
                if let Some(c) = close {
                    at = c;
                }
                fields.push(FormField::new(field_name, value));
            }
            "select" => {
                let Some(field_name) = attr_value(tag, "name") else {
                    continue;
                };
                let close = body_lower[end..]
                    .find("</select")
                    .map(|i| end + i)
                    .unwrap_or(body.len());
                if let Some(value) = selected_option(&body[end..close], &body_lower[end..close]) {
                    fields.push(FormField::new(field_name, value));
                }
                at = close;
            }
            _ => {}
        }
    }
}

/// Value of the selected option, falling back to the first option
fn selected_option(body: &str, body_lower: &str) -> Option<String> {
    let mut first = None;
    let mut at = 0;
    while let Some((start, end)) = find_tag(body_lower, "option", at) {
        let tag = &body[start..end];
        let text_end = body_lower[end..]
            .find('<')
            .map(|i| end + i)
            .unwrap_or(body.len());
        let value = attr_value(tag, "value").unwrap_or_else(|| body[end..text_end].trim().into());
        if has_attr(tag, "selected") {
            return Some(value);
        }
        if first.is_none() {
            first = Some(value);
        }
        at = end;
    }
    first
}

/// Next `<tag ...>` occurrence, returning the span of the opening tag
fn find_tag(lower: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let needle = format!("<{tag}");
    let mut at = from;
    loop {
        let start = at + lower[at..].find(&needle)?;
        let boundary = lower.as_bytes().get(start + needle.len());
        // Reject prefixes like <formation
        if boundary.is_none_or(|b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/') {
            let end = start + lower[start..].find('>').map(|i| i + 1)?;
            return Some((start, end));
        }
        at = start + needle.len();
    }
}

/// Next tag of any name at or after `from`
fn next_tag(lower: &str, from: usize) -> Option<(usize, usize)> {
    let mut at = from;
    loop {
        let start = at + lower[at..].find('<')?;
        // Skip closing tags and comments
        match lower.as_bytes().get(start + 1) {
            Some(b) if b.is_ascii_alphabetic() => {
                let end = start + lower[start..].find('>').map(|i| i + 1)?;
                return Some((start, end));
            }
            _ => at = start + 1,
        }
    }
}

fn tag_name(lower_tag: &str) -> &str {
    let inner = lower_tag.trim_start_matches('<');
    let end = inner
        .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
        .unwrap_or(inner.len());
    &inner[..end]
}

/// Parse `name="value"` pairs out of an opening tag
fn parse_attrs(tag: &str) -> Vec<(String, Option<String>)> {
    let inner = tag.trim_start_matches('<').trim_end_matches('>').trim_end_matches('/');
    let mut attrs = Vec::new();
    let mut chars = inner.char_indices().peekable();

    // Skip the tag name
    for (_, c) in chars.by_ref() {
        if c.is_ascii_whitespace() {
            break;
        }
    }

    while let Some(&(start, c)) = chars.peek() {
        if c.is_ascii_whitespace() {
            chars.next();
            continue;
        }
        // Attribute name
        let mut name_end = start;
        while let Some(&(i, c)) = chars.peek() {
            if c.is_ascii_whitespace() || c == '=' {
                break;
            }
            name_end = i + c.len_utf8();
            chars.next();
        }
        let name = inner[start..name_end].to_ascii_lowercase();
        if name.is_empty() {
            chars.next();
            continue;
        }
        // Optional value
        while matches!(chars.peek(), Some(&(_, c)) if c.is_ascii_whitespace()) {
            chars.next();
        }
        if matches!(chars.peek(), Some(&(_, '='))) {
            chars.next();
            while matches!(chars.peek(), Some(&(_, c)) if c.is_ascii_whitespace()) {
                chars.next();
            }
            let value = match chars.peek() {
                Some(&(vstart, quote)) if quote == '"' || quote == '\'' => {
                    chars.next();
                    let vstart = vstart + 1;
                    let mut vend = vstart;
                    for (i, c) in chars.by_ref() {
                        if c == quote {
                            break;
                        }
                        vend = i + c.len_utf8();
                    }
                    inner[vstart..vend].to_string()
                }
                Some(&(vstart, _)) => {
                    let mut vend = vstart;
                    while let Some(&(i, c)) = chars.peek() {
                        if c.is_ascii_whitespace() {
                            break;
                        }
                        vend = i + c.len_utf8();
                        chars.next();
                    }
                    inner[vstart..vend].to_string()
                }
                None => String::new(),
            };
            attrs.push((name, Some(value)));
        } else {
            attrs.push((name, None));
        }
    }
    attrs
}

fn attr_value(tag: &str, name: &str) -> Option<String> {
    parse_attrs(tag)
        .into_iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.unwrap_or_default())
}

fn has_attr(tag: &str, name: &str) -> bool {
    parse_attrs(tag).iter().any(|(n, _)| n == name)
}
