use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::{Player, PlayerRow};
use crate::normalize::transliterate;

impl From<&Player> for PlayerRow {
    fn from(p: &Player) -> Self {
        PlayerRow {
            club: transliterate(&p.club),
            club_url: p.club_url.clone(),
            schedule: p.schedule_url.clone(),
            number: transliterate(&p.number),
            name: transliterate(&p.name),
            profile_url: p.profile_url.clone(),
            nationality: transliterate(&p.nationality),
            date_of_birth: p.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string()),
            age: p.age,
            position_tm: transliterate(&p.position_tm),
            position_swos: p.position.to_string(),
            market_value_tm: transliterate(&p.market_value_tm),
            market_value: p.market_value,
        }
    }
}

/// Writes the header and one record per player, in the given order.
pub fn write_csv<W: Write>(players: &[Player], out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(out);
    // serialize() only emits headers alongside the first record
    if players.is_empty() {
        writer.write_record(HEADERS)?;
    }
    for player in players {
        writer.serialize(PlayerRow::from(player))?;
    }
    writer.flush()?;
    Ok(())
}

/// Creates or truncates `path` and writes the players as CSV.
pub fn save_to_csv(players: &[Player], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(players, file)
}

const HEADERS: &[&str] = &[
    "Club",
    "Club URL",
    "Schedule",
    "Player Number",
    "Player",
    "Player URL",
    "Nationality",
    "Date of Birth",
    "Age",
    "Position TM",
    "Position SWOS",
    "Market Value TM",
    "Market Value",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SwosPosition;
    use chrono::NaiveDate;

    const SCHEDULE_URL: &str =
        "https://www.transfermarkt.com/fc-arsenal/spielplan/verein/11/saison_id/2024";

    fn player(name: &str, club: &str) -> Player {
        Player {
            club: club.to_string(),
            club_url: "https://www.transfermarkt.com/fc-arsenal/startseite/verein/11".into(),
            schedule_url: SCHEDULE_URL.into(),
            number: "8".into(),
            name: name.to_string(),
            profile_url:
                "https://www.transfermarkt.com/martin-odegaard/profil/spieler/316264".into(),
            nationality: "Norway".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1998, 12, 17),
            age: Some(26),
            position_tm: "Attacking Midfield".into(),
            position: SwosPosition::M,
            market_value_tm: "€100.00m".into(),
            market_value: Some(100_000_000),
        }
    }

    fn render(players: &[Player]) -> String {
        let mut buf = Vec::new();
        write_csv(players, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_matches_declared_columns() {
        let out = render(&[player("Martin Ødegaard", "Arsenal FC")]);
        let header = out.lines().next().unwrap();
        assert_eq!(header, HEADERS.join(","));
    }

    #[test]
    fn empty_input_still_writes_header() {
        assert_eq!(render(&[]), format!("{}\n", HEADERS.join(",")));
    }

    #[test]
    fn rows_are_ascii_and_ordered() {
        let out = render(&[
            player("Martin Ødegaard", "Arsenal FC"),
            player("Gabriel Magalhães", "Arsenal FC"),
        ]);
        assert!(out.is_ascii());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(",Martin Odegaard,"));
        assert!(lines[2].contains(",Gabriel Magalhaes,"));
        assert!(lines[1].contains(",Norway,1998-12-17,26,Attacking Midfield,M,"));
        assert!(lines[1].ends_with("100.00m,100000000"));
    }

    #[test]
    fn missing_values_are_empty_cells() {
        let mut p = player("Ethan Nwaneri", "Arsenal FC");
        p.market_value = None;
        p.market_value_tm = String::new();
        p.date_of_birth = None;
        p.age = None;
        let out = render(&[p]);
        assert!(out.lines().nth(1).unwrap().ends_with(",,,Attacking Midfield,M,,"));
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.csv");
        std::fs::write(&path, "stale content that is longer than nothing\n".repeat(50)).unwrap();

        save_to_csv(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), format!("{}\n", HEADERS.join(",")));
    }
}
