use crate::decoder::{decode_line, split_lines, Line};
use crate::stats::{Counter, StatsTable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Name used for pilots and formations that could not be resolved.
pub const UNKNOWN: &str = "Unknown";

/// Attributes picked up from definition lines for one object id.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ObjectRecord {
    pub pilot: Option<String>,
    pub group: Option<String>,
}

impl ObjectRecord {
    pub fn pilot(&self) -> &str {
        self.pilot.as_deref().unwrap_or(UNKNOWN)
    }
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Object id -> attributes. Records only ever gain attributes.
#[derive(Debug, Default)]
pub struct ObjectTable {
    objects: HashMap<String, ObjectRecord>,
    //returned for ids that were never defined
    unknown: ObjectRecord,
}

impl ObjectTable {
    /// Apply a definition line. Only `Pilot` and `Group` are kept; a line
    /// carrying neither leaves the table untouched.
    pub fn define(&mut self, id: &str, fields: &HashMap<String, String>) {
        let pilot = fields.get("Pilot");
        let group = fields.get("Group");
        if pilot.is_none() && group.is_none() {
            return;
        }
        let record = self.objects.entry(id.to_string()).or_default();
        if let Some(p) = pilot {
            record.pilot = Some(p.clone());
        }
        if let Some(g) = group {
            record.group = Some(g.clone());
        }
    }

    /// Never inserts; unseen ids resolve to the all-`Unknown` record.
    pub fn lookup(&self, id: &str) -> &ObjectRecord {
        self.objects.get(id).unwrap_or(&self.unknown)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// What an event line means for the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Shot,
    Hit,
    /// Kill credited to the actor; the victim comes from the target field.
    Kill,
    Takeoff,
    Landing,
    /// Ejection, crash or death of the acting object itself.
    Death,
}

impl EventKind {
    /// First substring match wins, checked in this order. Matching is on
    /// substrings, so `LandingGear` counts as a landing.
    pub fn classify(event: &str) -> Option<EventKind> {
        let event = event.to_lowercase();
        if event.contains("shot") {
            Some(EventKind::Shot)
        } else if event.contains("hit") {
            Some(EventKind::Hit)
        } else if event.contains("kill") {
            Some(EventKind::Kill)
        } else if event.contains("takeoff") {
            Some(EventKind::Takeoff)
        } else if event.contains("land") {
            Some(EventKind::Landing)
        } else if ["eject", "crash", "dead"].iter().any(|x| event.contains(x)) {
            Some(EventKind::Death)
        } else {
            None
        }
    }

    pub fn counter(&self) -> Counter {
        match self {
            EventKind::Shot => Counter::Shots,
            EventKind::Hit => Counter::Hits,
            EventKind::Kill => Counter::Kills,
            EventKind::Takeoff => Counter::Takeoffs,
            EventKind::Landing => Counter::Landings,
            EventKind::Death => Counter::Deaths,
        }
    }
}

/// Result of one parse.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcmiStats {
    pub metadata: BTreeMap<String, String>,
    pub pilots: StatsTable,
    pub formations: StatsTable,
}

/// Running state for one pass over an ACMI document.
#[derive(Debug, Default)]
pub struct Aggregator {
    metadata: BTreeMap<String, String>,
    objects: ObjectTable,
    pilots: StatsTable,
    formations: StatsTable,
    lines: usize,
    events: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and consume a single raw line.
    pub fn push_line(&mut self, raw: &str) {
        self.lines += 1;
        let line = decode_line(raw);
        log::trace!("line {}: {:?}", self.lines, line);
        self.push(line);
    }

    /// Consume one already decoded line.
    pub fn push(&mut self, line: Line) {
        match line {
            Line::Ignore => (),
            Line::Metadata { key, value } => {
                self.metadata.insert(key, value);
            }
            Line::Object { id, fields } => {
                if fields.contains_key("T") {
                    self.event(&id, &fields);
                } else {
                    self.objects.define(&id, &fields);
                }
            }
        }
    }

    pub fn objects(&self) -> &ObjectTable {
        &self.objects
    }

    fn credit(&mut self, id: &str, counter: Counter) {
        let record = self.objects.lookup(id);
        self.pilots.increment(record.pilot(), counter);
        self.formations.increment(record.group(), counter);
    }

    fn event(&mut self, id: &str, fields: &HashMap<String, String>) {
        self.events += 1;
        let event = fields.get("Event").map(|s| s.as_str()).unwrap_or("");
        let kind = match EventKind::classify(event) {
            Some(k) => k,
            None => {
                if !event.is_empty() {
                    log::debug!("Ignoring event '{}' from object {}", event, id);
                }
                return;
            }
        };
        self.credit(id, kind.counter());

        if kind == EventKind::Kill {
            let target = fields
                .get("PrimaryTarget")
                .filter(|t| !t.is_empty())
                .or_else(|| fields.get("Target"))
                .map(|s| s.as_str())
                .unwrap_or("");
            if !target.is_empty() && self.objects.contains(target) {
                self.credit(target, Counter::Deaths);
            } else {
                log::debug!("Kill by {} has no known target ('{}')", id, target);
            }
        }
    }

    pub fn finish(self) -> AcmiStats {
        log::info!(
            "Read {} lines: {} objects, {} events, {} pilots, {} formations",
            self.lines,
            self.objects.len(),
            self.events,
            self.pilots.len(),
            self.formations.len()
        );
        AcmiStats {
            metadata: self.metadata,
            pilots: self.pilots,
            formations: self.formations,
        }
    }
}

/// Parse a whole ACMI document into pilot and formation statistics.
/// Malformed lines degrade to defaults; this never fails.
pub fn parse(text: &str) -> AcmiStats {
    let mut agg = Aggregator::new();
    for line in split_lines(text) {
        agg.push_line(line);
    }
    agg.finish()
}

/// Like [`parse`], for raw bytes that may not be valid UTF-8.
pub fn parse_bytes(bytes: &[u8]) -> AcmiStats {
    parse(&String::from_utf8_lossy(bytes))
}
