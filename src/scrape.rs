use std::thread;

use anyhow::Context;

use crate::archiver;
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::PageSource;
use crate::models::{Club, Player, Profile, SquadEntry, SwosPosition};
use crate::normalize::{clean_text, parse_birth_date_age, parse_market_value};
use crate::parser;
use crate::progress::Progress;

/// Scrapes the whole league, then writes the CSV. Nothing is written unless
/// every league and club page was scraped.
pub fn scrape_to_csv<S: PageSource, P: Progress>(
    source: &S,
    config: &Config,
    progress: &mut P,
) -> anyhow::Result<()> {
    let players = Scraper::new(source, progress)
        .run(config)
        .with_context(|| format!("Scraping {} failed", config.clubs_url))?;

    archiver::save_to_csv(&players, &config.output)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    log::info!("Data saved to {}", config.output.display());
    Ok(())
}

pub struct Scraper<'a, S: PageSource, P: Progress> {
    source: &'a S,
    progress: &'a mut P,
}

impl<'a, S: PageSource, P: Progress> Scraper<'a, S, P> {
    pub fn new(source: &'a S, progress: &'a mut P) -> Self {
        Self { source, progress }
    }

    /// Scrapes the league and returns players in club order, then squad order.
    pub fn run(&mut self, config: &Config) -> Result<Vec<Player>> {
        let result = self.scrape_league(config);
        self.progress.finish();
        result
    }

    fn scrape_league(&mut self, config: &Config) -> Result<Vec<Player>> {
        log::info!("Scraping league: {}", config.league_name);
        let html = self.source.fetch_html(&config.clubs_url)?;
        let clubs = parser::parse_league(&html, &config.clubs_url, config.number_of_clubs)?;
        if clubs.len() < config.number_of_clubs {
            log::info!(
                "{} clubs requested, league page lists {}",
                config.number_of_clubs,
                clubs.len()
            );
        }
        self.progress.begin(clubs.len());

        let mut players = Vec::new();
        for (index, link) in clubs.iter().enumerate() {
            if index > 0 && !config.delay.is_zero() {
                thread::sleep(config.delay);
            }
            self.progress.interrupt();
            log::info!("Scraping {} - {}", link.name, link.url);
            let html = self.source.fetch_html(&link.url)?;
            let club = parser::parse_club(&html, &link.url, config.season)?;
            self.progress.club_started(index, &club.name, club.squad.len());

            for (done, entry) in club.squad.iter().enumerate() {
                let profile = if config.fetch_profiles {
                    self.fetch_profile(&entry.profile_url)
                } else {
                    Profile::default()
                };
                players.push(build_player(&club, entry, profile));
                self.progress.player_done(done + 1);
            }
            log::debug!(
                "{}: {}",
                club.name,
                club.player_urls().collect::<Vec<_>>().join(", ")
            );
        }

        self.progress.interrupt();
        log::info!("Scraped {} players from {} clubs", players.len(), clubs.len());
        Ok(players)
    }

    /// Profile page fields; on failure the squad row is all we have.
    fn fetch_profile(&mut self, url: &str) -> Profile {
        let parsed = self
            .source
            .fetch_html(url)
            .and_then(|html| parser::parse_profile(&html));
        match parsed {
            Ok(profile) => profile,
            Err(e) => {
                self.progress.interrupt();
                log::warn!("Falling back to squad data for {url}: {e}");
                Profile::default()
            }
        }
    }
}

/// Merges profile and squad data, preferring the profile page.
pub fn build_player(club: &Club, entry: &SquadEntry, profile: Profile) -> Player {
    let pick = |primary: Option<String>, fallback: &Option<String>| {
        primary
            .or_else(|| fallback.clone())
            .map(|s| clean_text(&s))
            .unwrap_or_default()
    };

    let position_tm = pick(profile.position, &entry.position);
    let market_value_tm = pick(profile.market_value, &entry.market_value);
    let birth = pick(profile.birth, &entry.birth);

    let market_value = match parse_market_value(&market_value_tm) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("{e}");
            None
        }
    };
    let (date_of_birth, age) = parse_birth_date_age(&birth);

    Player {
        club: club.name.clone(),
        club_url: club.url.clone(),
        schedule_url: club.schedule_url.clone(),
        number: pick(profile.number, &entry.number),
        name: pick(profile.name, &entry.name),
        profile_url: entry.profile_url.clone(),
        nationality: pick(profile.nationality, &entry.nationality),
        date_of_birth,
        age,
        position: SwosPosition::from_tm(&position_tm),
        position_tm,
        market_value_tm,
        market_value,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    use chrono::NaiveDate;
    use reqwest::StatusCode;

    use super::*;
    use crate::archiver::write_csv;
    use crate::error::ScrapeError;
    use crate::parser::fixtures::*;
    use crate::progress::NullProgress;

    /// Serves canned pages and records every request.
    #[derive(Default)]
    struct StaticPages {
        pages: HashMap<String, String>,
        requests: RefCell<Vec<String>>,
    }

    impl StaticPages {
        fn league() -> Self {
            let mut pages = HashMap::new();
            pages.insert(LEAGUE_URL.to_string(), LEAGUE_HTML.to_string());
            pages.insert(ARSENAL_URL.to_string(), ARSENAL_HTML.to_string());
            pages.insert(CHELSEA_URL.to_string(), CHELSEA_HTML.to_string());
            pages.insert(ODEGAARD_URL.to_string(), ODEGAARD_HTML.to_string());
            Self { pages, ..Default::default() }
        }
    }

    impl PageSource for StaticPages {
        fn fetch_html(&self, url: &str) -> Result<String> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            })
        }
    }

    fn config(clubs: usize) -> Config {
        Config {
            clubs_url: LEAGUE_URL.to_string(),
            league_name: "Premier League".to_string(),
            number_of_clubs: clubs,
            output: PathBuf::from("unused.csv"),
            season: 2024,
            timeout: Duration::from_secs(1),
            delay: Duration::ZERO,
            fetch_profiles: true,
            quiet: true,
        }
    }

    fn run(pages: &StaticPages, cfg: &Config) -> Result<Vec<Player>> {
        let mut progress = NullProgress;
        Scraper::new(pages, &mut progress).run(cfg)
    }

    #[test]
    fn one_club_yields_one_row_per_squad_entry() {
        let pages = StaticPages::league();
        let players = run(&pages, &config(1)).unwrap();
        let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["David Raya", "Martin Ødegaard", "Ethan Nwaneri"]);
        assert!(players.iter().all(|p| p.club == "Arsenal FC"));
    }

    #[test]
    fn zero_clubs_fetches_only_the_league_page() {
        let pages = StaticPages::league();
        let players = run(&pages, &config(0)).unwrap();
        assert!(players.is_empty());
        assert_eq!(*pages.requests.borrow(), vec![LEAGUE_URL.to_string()]);
    }

    #[test]
    fn more_clubs_than_listed_takes_all_available() {
        let pages = StaticPages::league();
        let players = run(&pages, &config(20)).unwrap();
        assert_eq!(players.len(), 4);
        assert_eq!(players[3].name, "Cole Palmer");
        assert_eq!(players[3].club, "Chelsea FC");
        assert_eq!(players[3].position, SwosPosition::RW);
    }

    #[test]
    fn profile_data_overrides_squad_data() {
        let pages = StaticPages::league();
        let players = run(&pages, &config(1)).unwrap();
        let odegaard = &players[1];
        assert_eq!(odegaard.profile_url, ODEGAARD_URL);
        assert_eq!(odegaard.market_value_tm, "€100.00m");
        assert_eq!(odegaard.market_value, Some(100_000_000));
        assert_eq!(odegaard.position, SwosPosition::M);
        assert_eq!(odegaard.date_of_birth, NaiveDate::from_ymd_opt(1998, 12, 17));
    }

    #[test]
    fn failed_profile_fetch_falls_back_to_squad_row() {
        let pages = StaticPages::league();
        let players = run(&pages, &config(1)).unwrap();
        let raya = &players[0];
        assert_eq!(raya.number, "1");
        assert_eq!(raya.nationality, "Spain");
        assert_eq!(raya.position, SwosPosition::G);
        assert_eq!(raya.market_value, Some(35_000_000));
        assert_eq!(raya.age, Some(29));

        let youth = &players[2];
        assert_eq!(youth.number, "");
        assert_eq!(youth.market_value, None);
        assert_eq!(youth.date_of_birth, None);
    }

    #[test]
    fn skip_profiles_never_requests_profile_pages() {
        let pages = StaticPages::league();
        let mut cfg = config(1);
        cfg.fetch_profiles = false;
        let players = run(&pages, &cfg).unwrap();
        assert_eq!(players.len(), 3);
        assert_eq!(players[1].market_value, Some(110_000_000));
        assert!(pages.requests.borrow().iter().all(|u| !u.contains("/profil/")));
    }

    #[test]
    fn league_fetch_failure_aborts() {
        let pages = StaticPages::default();
        let err = run(&pages, &config(1)).unwrap_err();
        assert!(matches!(err, ScrapeError::Status { .. }));
    }

    #[test]
    fn club_fetch_failure_aborts_the_run() {
        let mut pages = StaticPages::league();
        pages.pages.remove(CHELSEA_URL);
        let err = run(&pages, &config(2)).unwrap_err();
        assert!(matches!(err, ScrapeError::Status { ref url, .. } if url == CHELSEA_URL));
    }

    #[test]
    fn identical_pages_give_identical_csv() {
        let render = || {
            let pages = StaticPages::league();
            let players = run(&pages, &config(2)).unwrap();
            let mut buf = Vec::new();
            write_csv(&players, &mut buf).unwrap();
            buf
        };
        let first = render();
        assert_eq!(first, render());
        assert_eq!(String::from_utf8(first).unwrap().lines().count(), 1 + 4);
    }

    fn config_writing_to(dir: &tempfile::TempDir, clubs: usize) -> Config {
        Config {
            output: dir.path().join("Premier-League_players_data.csv"),
            ..config(clubs)
        }
    }

    #[test]
    fn league_fetch_failure_writes_no_csv() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_writing_to(&dir, 1);

        let res = scrape_to_csv(&StaticPages::default(), &cfg, &mut NullProgress);
        assert!(res.is_err());
        assert!(!cfg.output.exists());
    }

    #[test]
    fn club_fetch_failure_writes_no_csv() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_writing_to(&dir, 2);
        let mut pages = StaticPages::league();
        pages.pages.remove(CHELSEA_URL);

        let res = scrape_to_csv(&pages, &cfg, &mut NullProgress);
        assert!(res.is_err());
        assert!(!cfg.output.exists());
    }

    #[test]
    fn successful_run_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config_writing_to(&dir, 2);

        scrape_to_csv(&StaticPages::league(), &cfg, &mut NullProgress).unwrap();
        let csv = std::fs::read_to_string(&cfg.output).unwrap();
        assert_eq!(csv.lines().count(), 1 + 4);
        assert!(csv.is_ascii());
    }
}
