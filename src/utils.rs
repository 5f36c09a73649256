/// Formats an optional f64 to 4 decimal places, or returns "—" if None or non-finite.
pub fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.4}"),
        _ => "—".to_owned(),
    }
}

/// Formats a test statistic or p-value with three decimals ("0.910", "inf").
pub fn fmt_stat(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.3}")
    } else {
        format!("{v}")
    }
}

/// Formats a 0..=1 rate as a percentage with one decimal ("33.3%").
pub fn fmt_pct(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Formats a number without a trailing ".0" when it is integral.
pub fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// Truncates to at most `max_chars` characters, appending " [truncated...]" when cut.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_owned()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head} [truncated...]")
    }
}
