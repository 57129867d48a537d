//! Text cleanup applied to everything scraped before it reaches the CSV.

use chrono::NaiveDate;
use url::Url;

use crate::error::{Result, ScrapeError};

const BIRTH_DATE_FORMATS: &[&str] = &["%b %d, %Y", "%d/%m/%Y", "%d.%m.%Y"];

/// Drops control characters, collapses whitespace runs and trims.
pub fn clean_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = true;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else if !ch.is_control() {
            out.push(ch);
            prev_space = false;
        }
    }
    out.truncate(out.trim_end().len());
    out
}

/// Cleans `s` and folds it to printable ASCII (`Ødegaard` -> `Odegaard`).
pub fn transliterate(s: &str) -> String {
    let folded = deunicode::deunicode(&clean_text(s));
    let ascii: String = folded
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect();
    clean_text(&ascii)
}

/// Parses a Transfermarkt market value (`€12.50m`, `€900k`, `€1.20bn`) into
/// whole currency units. An empty cell or a dash means "no value".
pub fn parse_market_value(raw: &str) -> Result<Option<u64>> {
    let value = clean_text(raw).to_lowercase();
    let value: String = value
        .chars()
        .filter(|c| !matches!(c, '€' | '$' | '£' | ',' | ' '))
        .collect();
    let value = value.trim_start_matches("eur");
    if value.is_empty() || value == "-" || value == "?" {
        return Ok(None);
    }

    let (number, multiplier) = if let Some(n) = value.strip_suffix("bn") {
        (n, 1e9)
    } else if let Some(n) = value.strip_suffix('m') {
        (n, 1e6)
    } else if let Some(n) = value.strip_suffix("th.").or_else(|| value.strip_suffix("th")) {
        (n, 1e3)
    } else if let Some(n) = value.strip_suffix('k') {
        (n, 1e3)
    } else {
        (value, 1.0)
    };

    let format_error = || ScrapeError::Format {
        what: "market value",
        value: raw.to_string(),
    };
    // plain decimals only, no exponents or inf/NaN
    if !number.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(format_error());
    }
    let number: f64 = number.parse().map_err(|_| format_error())?;
    let units = (number * multiplier).round();
    if units >= u64::MAX as f64 {
        return Err(format_error());
    }
    Ok(Some(units as u64))
}

/// Splits `"Sep 5, 2001 (23)"` into a date and an age. Either half may be
/// missing or unparseable independently.
pub fn parse_birth_date_age(raw: &str) -> (Option<NaiveDate>, Option<u32>) {
    let raw = clean_text(raw);
    let (date_part, age_part) = match raw.split_once('(') {
        Some((date, rest)) => (date.trim(), rest.split(')').next()),
        None => (raw.as_str(), None),
    };

    let date = BIRTH_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok());
    let age = age_part.and_then(|a| a.trim().parse().ok());
    (date, age)
}

/// `https://www.transfermarkt.com/premier-league/startseite/...` -> `Premier League`
pub fn league_name(clubs_url: &str) -> Option<String> {
    let url = Url::parse(clubs_url).ok()?;
    let slug = url.path_segments()?.next().filter(|s| !s.is_empty())?;
    Some(title_case(&slug.replace('-', " ")))
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Club fixture list for `season`, derived from the club's overview URL.
pub fn schedule_url(club_url: &str, season: i32) -> String {
    let base = club_url.replace("startseite", "spielplan");
    let base = match base.find("/saison_id/") {
        Some(idx) => &base[..idx],
        None => base.trim_end_matches('/'),
    };
    format!("{base}/saison_id/{season}")
}
