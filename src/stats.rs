use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The six event counters tracked per pilot and per formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    Shots,
    Hits,
    Kills,
    Deaths,
    Takeoffs,
    Landings,
}

impl Counter {
    pub const ALL: [Counter; 6] = [
        Counter::Shots,
        Counter::Hits,
        Counter::Kills,
        Counter::Deaths,
        Counter::Takeoffs,
        Counter::Landings,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Counter::Shots => "Shots",
            Counter::Hits => "Hits",
            Counter::Kills => "Kills",
            Counter::Deaths => "Deaths",
            Counter::Takeoffs => "Takeoffs",
            Counter::Landings => "Landings",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Counter {
    type Err = String;

    /// Case-insensitive, accepts the full name or its first letter where
    /// that is unambiguous (S, H, K, D).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &s.to_lowercase()[..] {
            "shots" | "s" => Ok(Counter::Shots),
            "hits" | "h" => Ok(Counter::Hits),
            "kills" | "k" => Ok(Counter::Kills),
            "deaths" | "d" => Ok(Counter::Deaths),
            "takeoffs" => Ok(Counter::Takeoffs),
            "landings" => Ok(Counter::Landings),
            _ => Err(std::format!("Unknown counter: '{}'", s)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Counters {
    pub shots: u64,
    pub hits: u64,
    pub kills: u64,
    pub deaths: u64,
    pub takeoffs: u64,
    pub landings: u64,
}

impl Counters {
    pub fn get(&self, counter: Counter) -> u64 {
        match counter {
            Counter::Shots => self.shots,
            Counter::Hits => self.hits,
            Counter::Kills => self.kills,
            Counter::Deaths => self.deaths,
            Counter::Takeoffs => self.takeoffs,
            Counter::Landings => self.landings,
        }
    }

    pub fn increment(&mut self, counter: Counter) {
        let slot = match counter {
            Counter::Shots => &mut self.shots,
            Counter::Hits => &mut self.hits,
            Counter::Kills => &mut self.kills,
            Counter::Deaths => &mut self.deaths,
            Counter::Takeoffs => &mut self.takeoffs,
            Counter::Landings => &mut self.landings,
        };
        *slot = slot.saturating_add(1);
    }

    /// Kills per death. With no deaths this is just the kills, same as the
    /// KDA convention used in match journals.
    pub fn kd_ratio(&self) -> f64 {
        if self.deaths == 0 {
            self.kills as f64
        } else {
            self.kills as f64 / self.deaths as f64
        }
    }

    /// Hits per shot, or None when nothing was fired.
    pub fn accuracy(&self) -> Option<f64> {
        if self.shots == 0 {
            None
        } else {
            Some(self.hits as f64 / self.shots as f64)
        }
    }
}

/// Name -> counters. Keys are pilot or formation names, including
/// [`UNKNOWN`](crate::UNKNOWN).
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsTable {
    entries: BTreeMap<String, Counters>,
}

impl StatsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup-or-insert: returns the counters for `name`, creating a zeroed
    /// entry first if it is absent.
    pub fn entry(&mut self, name: &str) -> &mut Counters {
        self.entries
            .entry(name.to_string())
            .or_insert_with(Counters::default)
    }

    pub fn increment(&mut self, name: &str, counter: Counter) {
        self.entry(name).increment(counter);
    }

    pub fn get(&self, name: &str) -> Option<&Counters> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Counters)> {
        self.entries.iter()
    }

    /// Sum of every entry's counters.
    pub fn totals(&self) -> Counters {
        let mut total = Counters::default();
        for c in self.entries.values() {
            total.shots = total.shots.saturating_add(c.shots);
            total.hits = total.hits.saturating_add(c.hits);
            total.kills = total.kills.saturating_add(c.kills);
            total.deaths = total.deaths.saturating_add(c.deaths);
            total.takeoffs = total.takeoffs.saturating_add(c.takeoffs);
            total.landings = total.landings.saturating_add(c.landings);
        }
        total
    }
}
