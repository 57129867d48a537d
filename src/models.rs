use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Anchor to a club page found on the league overview.
#[derive(Debug, Clone, PartialEq)]
pub struct ClubLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Club {
    pub name: String,
    pub url: String,
    pub schedule_url: String,
    pub squad: Vec<SquadEntry>,
}

impl Club {
    pub fn player_urls(&self) -> impl Iterator<Item = &str> {
        self.squad.iter().map(|entry| entry.profile_url.as_str())
    }
}

/// One row of a club's squad table. Every field except the URL may be
/// missing on the site.
#[derive(Debug, Clone, Default)]
pub struct SquadEntry {
    pub profile_url: String,
    pub name: Option<String>,
    pub number: Option<String>,
    pub position: Option<String>,
    pub nationality: Option<String>,
    pub market_value: Option<String>,
    pub birth: Option<String>,
}

/// Fields read off a player profile page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    pub name: Option<String>,
    pub number: Option<String>,
    pub nationality: Option<String>,
    pub position: Option<String>,
    pub market_value: Option<String>,
    pub birth: Option<String>,
}

/// Position codes understood by SWOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwosPosition {
    G,
    RB,
    LB,
    D,
    RW,
    LW,
    M,
    A,
    Unknown,
}

impl SwosPosition {
    /// Maps a Transfermarkt position name (detailed or main) to SWOS.
    pub fn from_tm(position: &str) -> Self {
        match position.trim() {
            "Goalkeeper" => SwosPosition::G,
            "Right-Back" => SwosPosition::RB,
            "Left-Back" => SwosPosition::LB,
            "Centre-Back" | "Defender" => SwosPosition::D,
            "Right Winger" => SwosPosition::RW,
            "Left Winger" => SwosPosition::LW,
            "Defensive Midfield" | "Central Midfield" | "Attacking Midfield" | "Left Midfield"
            | "Right Midfield" | "Midfield" => SwosPosition::M,
            "Centre-Forward" | "Second Striker" | "Attack" => SwosPosition::A,
            _ => SwosPosition::Unknown,
        }
    }
}

impl fmt::Display for SwosPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            SwosPosition::G => "G",
            SwosPosition::RB => "RB",
            SwosPosition::LB => "LB",
            SwosPosition::D => "D",
            SwosPosition::RW => "RW",
            SwosPosition::LW => "LW",
            SwosPosition::M => "M",
            SwosPosition::A => "A",
            SwosPosition::Unknown => "Unknown",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub club: String,
    pub club_url: String,
    pub schedule_url: String,
    pub number: String,
    pub name: String,
    pub profile_url: String,
    pub nationality: String,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<u32>,
    pub position_tm: String,
    pub position: SwosPosition,
    pub market_value_tm: String,
    pub market_value: Option<u64>,
}

/// A CSV record. Field order here is the column order of the output file.
#[derive(Debug, Serialize)]
pub struct PlayerRow {
    #[serde(rename = "Club")]
    pub club: String,
    #[serde(rename = "Club URL")]
    pub club_url: String,
    #[serde(rename = "Schedule")]
    pub schedule: String,
    #[serde(rename = "Player Number")]
    pub number: String,
    #[serde(rename = "Player")]
    pub name: String,
    #[serde(rename = "Player URL")]
    pub profile_url: String,
    #[serde(rename = "Nationality")]
    pub nationality: String,
    #[serde(rename = "Date of Birth")]
    pub date_of_birth: Option<String>,
    #[serde(rename = "Age")]
    pub age: Option<u32>,
    #[serde(rename = "Position TM")]
    pub position_tm: String,
    #[serde(rename = "Position SWOS")]
    pub position_swos: String,
    #[serde(rename = "Market Value TM")]
    pub market_value_tm: String,
    #[serde(rename = "Market Value")]
    pub market_value: Option<u64>,
}
