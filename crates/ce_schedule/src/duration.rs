// SPDX-License-Identifier: Apache-2.0

use crate::error::ScheduleError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Default slack added to every phase and to the outer workflow total,
/// per spec's `deadline_margin` (seconds).
pub const DEFAULT_DEADLINE_MARGIN: u64 = 300;

static DURATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)([dhms])").expect("static regex is valid"));

/// Parses a human duration of the form `<n>d<n>h<n>m<n>s` (any subset,
/// in that order) or the literal `"0"`, into whole seconds. Grammar
/// extends the distilled spec's s/m/h-only parser with a `d` (day)
/// component.
pub fn parse_duration(input: &str) -> Result<u64, ScheduleError> {
    if input == "0" {
        return Ok(0);
    }
    let mut total: u64 = 0;
    let mut matched_any = false;
    for cap in DURATION_RE.captures_iter(input) {
        matched_any = true;
        let value: u64 = cap[1]
            .parse()
            .map_err(|_| ScheduleError::InvalidDuration(input.to_string()))?;
        let unit_seconds = match &cap[2] {
            "d" => 86_400,
            "h" => 3_600,
            "m" => 60,
            "s" => 1,
            _ => return Err(ScheduleError::InvalidDuration(input.to_string())),
        };
        total += value * unit_seconds;
    }
    if !matched_any {
        return Err(ScheduleError::InvalidDuration(input.to_string()));
    }
    Ok(total)
}

/// Canonical emission: largest unit first, omitting zero components,
/// `"0"` for a zero duration. This is the single place a `u64` second
/// count becomes a string anywhere in the workspace.
pub fn format_duration(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    const UNITS: [(u64, char); 4] = [(86_400, 'd'), (3_600, 'h'), (60, 'm'), (1, 's')];
    let mut out = String::new();
    for (unit_value, symbol) in UNITS {
        if value >= unit_value {
            let count = value / unit_value;
            out.push_str(&count.to_string());
            out.push(symbol);
            value %= unit_value;
        }
    }
    out
}

/// Truncates `s` to at most `max_length` characters, eliding the
/// middle with `suffix` when it's longer. Mirrors the log-trimming
/// rule applied to inspection and task output.
pub fn limit_string_length(s: &str, max_length: usize, suffix: &str) -> String {
    if suffix.len() >= max_length {
        return suffix.to_string();
    }
    if s.len() > max_length {
        let half = (max_length - suffix.len()) / 2;
        let head: String = s.chars().take(half).collect();
        let tail: String = s
            .chars()
            .rev()
            .take(half)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("{head}{suffix}{tail}")
    } else {
        s.to_string()
    }
}

/// DNS-1123-label sanitization: lowercases, strips everything but
/// `[a-z0-9-]`, collapses repeated hyphens, trims leading/trailing
/// hyphens, and falls back to `"default-name"` if nothing survives.
/// Truncated to 63 characters, the label length limit Kubernetes
/// enforces.
pub fn sanitize_k8s_name(name: &str) -> String {
    let lowered = name.to_ascii_lowercase().replace(' ', "");
    let mut collapsed = String::with_capacity(lowered.len());
    let mut last_was_hyphen = false;
    for c in lowered.chars() {
        let keep = c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-';
        if !keep {
            continue;
        }
        if c == '-' {
            if last_was_hyphen {
                continue;
            }
            last_was_hyphen = true;
        } else {
            last_was_hyphen = false;
        }
        collapsed.push(c);
    }
    let trimmed = collapsed.trim_matches('-');
    let sanitized = if trimmed.is_empty() { "default-name" } else { trimmed };
    sanitized.chars().take(63).collect()
}
