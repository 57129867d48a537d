//! Transfermarkt page structure. Everything that knows about the site's
//! markup lives here, one function per extracted field.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{Result, ScrapeError};
use crate::models::{Club, ClubLink, Profile, SquadEntry};
use crate::normalize::{clean_text, schedule_url};

fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css))
}

fn text_of(el: ElementRef) -> String {
    clean_text(&el.text().collect::<String>())
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

fn resolve(base: &Url, href: &str) -> Result<String> {
    Ok(base.join(href)?.to_string())
}

/// Club links from a league overview page, in page order, at most `limit`.
pub fn parse_league(html: &str, page_url: &str, limit: usize) -> Result<Vec<ClubLink>> {
    let doc = Html::parse_document(html);
    let base = Url::parse(page_url)?;
    let cell_sel = selector("td.hauptlink.no-border-links")?;
    let link_sel = selector("a[href]")?;

    let cells: Vec<ElementRef> = doc.select(&cell_sel).collect();
    if cells.is_empty() {
        return Err(ScrapeError::parse(page_url, "club table"));
    }

    let mut clubs = Vec::new();
    for cell in cells {
        if clubs.len() >= limit {
            break;
        }
        let Some(href) = cell.select(&link_sel).find_map(|a| a.value().attr("href")) else {
            continue;
        };
        clubs.push(ClubLink {
            name: text_of(cell),
            url: resolve(&base, href)?,
        });
    }
    Ok(clubs)
}

/// Club name and squad from a club overview page.
pub fn parse_club(html: &str, club_url: &str, season: i32) -> Result<Club> {
    let doc = Html::parse_document(html);
    let base = Url::parse(club_url)?;
    let h1_sel = selector("h1")?;
    let table_sel = selector("table.items")?;
    let row_sel = selector("tr.odd, tr.even")?;

    let name = doc
        .select(&h1_sel)
        .next()
        .map(text_of)
        .and_then(non_empty)
        .ok_or_else(|| ScrapeError::parse(club_url, "club name"))?;
    let table = doc
        .select(&table_sel)
        .next()
        .ok_or_else(|| ScrapeError::parse(club_url, "squad table"))?;

    let mut seen = HashSet::new();
    let mut squad = Vec::new();
    for row in table.select(&row_sel) {
        match parse_squad_row(row, &base)? {
            Some(entry) if seen.insert(entry.profile_url.clone()) => squad.push(entry),
            Some(entry) => log::debug!("duplicate squad row for {}", entry.profile_url),
            None => log::debug!("squad row without a profile link in {club_url}"),
        }
    }

    Ok(Club {
        name,
        url: club_url.to_string(),
        schedule_url: schedule_url(club_url, season),
        squad,
    })
}

/// One squad table row. `None` when the row has no link to a player profile.
pub fn parse_squad_row(row: ElementRef, base: &Url) -> Result<Option<SquadEntry>> {
    let Some(href) = squad_profile_href(row)? else {
        return Ok(None);
    };

    Ok(Some(SquadEntry {
        profile_url: resolve(base, href)?,
        name: squad_name(row)?,
        number: squad_number(row)?,
        position: squad_position(row)?,
        nationality: squad_nationality(row)?,
        market_value: squad_market_value(row)?,
        birth: squad_birth(row)?,
    }))
}

fn squad_profile_href<'a>(row: ElementRef<'a>) -> Result<Option<&'a str>> {
    let sel = selector("td.hauptlink a[href]")?;
    Ok(row
        .select(&sel)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains("/profil/")))
}

fn squad_name(row: ElementRef) -> Result<Option<String>> {
    let sel = selector("td.hauptlink a[href]")?;
    Ok(row.select(&sel).map(text_of).find(|s| !s.is_empty()))
}

fn squad_number(row: ElementRef) -> Result<Option<String>> {
    let sel = selector("div.rn_nummer")?;
    Ok(row
        .select(&sel)
        .next()
        .map(text_of)
        .filter(|n| n != "-")
        .and_then(non_empty))
}

fn squad_position(row: ElementRef) -> Result<Option<String>> {
    let sel = selector("table.inline-table tr:last-child td")?;
    Ok(row.select(&sel).last().map(text_of).and_then(non_empty))
}

fn squad_nationality(row: ElementRef) -> Result<Option<String>> {
    let sel = selector("img.flaggenrahmen")?;
    Ok(row
        .select(&sel)
        .find_map(|img| img.value().attr("title"))
        .map(clean_text)
        .and_then(non_empty))
}

fn squad_market_value(row: ElementRef) -> Result<Option<String>> {
    let sel = selector("td.rechts.hauptlink")?;
    Ok(row.select(&sel).next().map(text_of).and_then(non_empty))
}

fn squad_birth(row: ElementRef) -> Result<Option<String>> {
    let sel = selector("td.zentriert")?;
    Ok(row
        .select(&sel)
        .map(text_of)
        .find(|s| s.ends_with(')') && s.contains('(')))
}

/// Fields from a player profile page. Missing fields stay `None`.
pub fn parse_profile(html: &str) -> Result<Profile> {
    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let birth = match info_field(root, "Date of birth/Age")? {
        Some(v) => Some(v),
        None => info_field(root, "Date of birth")?,
    };

    Ok(Profile {
        name: profile_name(root)?,
        number: profile_number(root)?,
        nationality: profile_nationality(root)?,
        position: profile_position(root)?,
        market_value: profile_market_value(root)?,
        birth: birth.map(text_of).and_then(non_empty),
    })
}

fn profile_name(root: ElementRef) -> Result<Option<String>> {
    let sel = selector("h1.data-header__headline-wrapper")?;
    let Some(h1) = root.select(&sel).next() else {
        return Ok(None);
    };
    let text = text_of(h1);
    let name = match text.split_once(' ') {
        Some((first, rest)) if first.starts_with('#') => rest.to_string(),
        _ => text,
    };
    Ok(non_empty(name))
}

fn profile_number(root: ElementRef) -> Result<Option<String>> {
    let sel = selector("span.data-header__shirt-number")?;
    Ok(root
        .select(&sel)
        .next()
        .map(|el| text_of(el).trim_start_matches('#').to_string())
        .and_then(non_empty))
}

fn profile_market_value(root: ElementRef) -> Result<Option<String>> {
    let sel = selector("a.data-header__market-value-wrapper")?;
    Ok(root
        .select(&sel)
        .next()
        .map(|el| {
            let text = text_of(el);
            match text.find("Last update") {
                Some(idx) => text[..idx].trim().to_string(),
                None => text,
            }
        })
        .and_then(non_empty))
}

fn profile_nationality(root: ElementRef) -> Result<Option<String>> {
    let Some(value) = info_field(root, "Citizenship")? else {
        return Ok(None);
    };
    let flag_sel = selector("img[title]")?;
    let from_flag = value
        .select(&flag_sel)
        .find_map(|img| img.value().attr("title"))
        .map(clean_text)
        .and_then(non_empty);
    Ok(from_flag.or_else(|| non_empty(text_of(value))))
}

fn profile_position(root: ElementRef) -> Result<Option<String>> {
    let Some(value) = info_field(root, "Position")? else {
        return Ok(None);
    };
    let text = text_of(value);
    let detailed = match text.rsplit_once(" - ") {
        Some((_, detail)) => detail.trim().to_string(),
        None => text,
    };
    Ok(non_empty(detailed))
}

/// The value element that follows a `label:` span in the profile info table.
fn info_field<'a>(root: ElementRef<'a>, label: &str) -> Result<Option<ElementRef<'a>>> {
    let sel = selector("span.info-table__content--regular")?;
    Ok(root
        .select(&sel)
        .find(|el| text_of(*el).trim_end_matches(':').eq_ignore_ascii_case(label))
        .and_then(|el| el.next_siblings().find_map(ElementRef::wrap)))
}
