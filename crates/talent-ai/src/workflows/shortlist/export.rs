use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::domain::{CandidateId, EntityId, Recommendation, ScoredCandidate};
use super::source::{ScoreSourceError, ScoringEngine};

const MAX_SCORE: u8 = 100;

/// Scored candidates loaded from a CSV export of the scoring store, grouped by entity.
#[derive(Debug, Clone, Default)]
pub struct ScoreExport {
    by_entity: BTreeMap<EntityId, Vec<ScoredCandidate>>,
}

impl ScoreExport {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ScoreSourceError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScoreSourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut by_entity: BTreeMap<EntityId, Vec<ScoredCandidate>> = BTreeMap::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|position| position.line()).unwrap_or(0);
            let row: ScoreRow = record.deserialize(Some(&headers))?;
            let (entity_id, candidate) = row
                .into_candidate()
                .map_err(|reason| ScoreSourceError::InvalidRow { line, reason })?;
            by_entity.entry(entity_id).or_default().push(candidate);
        }

        Ok(Self { by_entity })
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityId> {
        self.by_entity.keys()
    }

    pub fn len(&self) -> usize {
        self.by_entity.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_entity.is_empty()
    }
}

impl ScoringEngine for ScoreExport {
    fn scored_candidates(
        &self,
        entity_id: &EntityId,
    ) -> Result<Vec<ScoredCandidate>, ScoreSourceError> {
        Ok(self.by_entity.get(entity_id).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    entity_id: String,
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    composite_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    price_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    delivery_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    skills_match_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    experience_score: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    recommendation: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    ranking_analysis: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    strengths: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    weaknesses: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    ranked_at: Option<String>,
    created_at: String,
}

impl ScoreRow {
    fn into_candidate(self) -> Result<(EntityId, ScoredCandidate), String> {
        if self.entity_id.is_empty() || self.id.is_empty() {
            return Err("entity_id and id are required".to_string());
        }

        let recommendation = self
            .recommendation
            .as_deref()
            .map(|raw| {
                Recommendation::from_label(raw).ok_or_else(|| format!("unknown recommendation '{raw}'"))
            })
            .transpose()?;
        let ranked_at = self
            .ranked_at
            .as_deref()
            .map(|raw| parse_timestamp(raw).ok_or_else(|| format!("invalid ranked_at '{raw}'")))
            .transpose()?;
        let created_at = parse_timestamp(&self.created_at)
            .ok_or_else(|| format!("invalid created_at '{}'", self.created_at))?;

        let candidate = ScoredCandidate {
            id: CandidateId(self.id),
            composite_score: parse_score("composite_score", self.composite_score.as_deref())?,
            price_score: parse_score("price_score", self.price_score.as_deref())?,
            delivery_score: parse_score("delivery_score", self.delivery_score.as_deref())?,
            skills_match_score: parse_score(
                "skills_match_score",
                self.skills_match_score.as_deref(),
            )?,
            experience_score: parse_score("experience_score", self.experience_score.as_deref())?,
            recommendation,
            ranking_analysis: self.ranking_analysis,
            strengths: split_list(self.strengths.as_deref()),
            weaknesses: split_list(self.weaknesses.as_deref()),
            ranked_at,
            created_at,
        };

        Ok((EntityId(self.entity_id), candidate))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_score(column: &str, raw: Option<&str>) -> Result<Option<u8>, String> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    match raw.parse::<u8>() {
        Ok(score) if score <= MAX_SCORE => Ok(Some(score)),
        _ => Err(format!("{column} must be an integer between 0 and {MAX_SCORE}, got '{raw}'")),
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(';')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
