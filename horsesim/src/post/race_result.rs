use crate::core::horse::Horse;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;

/// RankedHorse is a horse annotated with its race time and finish position in one round.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RankedHorse {
    #[serde(flatten)]
    pub horse: Horse,
    pub race_time: f64,
    pub finish_position: u32,
}

/// RoundResult contains all information about a finished round that is required for
/// post-processing the results.
///
/// * `round` - Round number (1-based)
/// * `distance` - (m) Round distance
/// * `results` - Finishers sorted by ascending race time
/// * `completed_at` - Local wall-clock time of completion, e.g. 14:03:12
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RoundResult {
    pub round: u32,
    pub distance: u32,
    pub results: Vec<RankedHorse>,
    pub completed_at: String,
}

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    round: u32,
    distance: u32,
    finish_position: u32,
    horse_id: u32,
    name: &'a str,
    condition: u32,
    race_time: f64,
    completed_at: &'a str,
}

impl RoundResult {
    pub fn winner(&self) -> Option<&RankedHorse> {
        self.results.first()
    }

    /// format_table returns the finishing order as a human-readable table.
    pub fn format_table(&self) -> anyhow::Result<String> {
        let mut content = String::new();
        writeln!(
            &mut content,
            "RESULT: Round {} ({}m), completed at {}",
            self.round, self.distance, self.completed_at
        )?;
        writeln!(&mut content, "pos, id, {:20}, cond, time", "name")?;

        for ranked in self.results.iter() {
            writeln!(
                &mut content,
                "{:3}, {:2}, {:20}, {:4}, {:7.2}s",
                ranked.finish_position,
                ranked.horse.id,
                ranked.horse.name,
                ranked.horse.condition,
                ranked.race_time
            )?;
        }

        Ok(content)
    }
}

/// print_round_results prints the finishing order of every round to the console output.
pub fn print_round_results(results: &[RoundResult]) -> anyhow::Result<()> {
    for result in results.iter() {
        println!("{}", result.format_table()?);
    }
    Ok(())
}

/// write_results_csv writes one row per finisher and round to a CSV file. Returns the path to the
/// written file.
pub fn write_results_csv(results: &[RoundResult], path: &Path) -> anyhow::Result<String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create output directory {:?}!", parent))?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .context(format!("Failed to open result file {:?}!", path))?;

    for result in results.iter() {
        for ranked in result.results.iter() {
            writer.serialize(ResultRow {
                round: result.round,
                distance: result.distance,
                finish_position: ranked.finish_position,
                horse_id: ranked.horse.id,
                name: &ranked.horse.name,
                condition: ranked.horse.condition,
                race_time: ranked.race_time,
                completed_at: &result.completed_at,
            })?;
        }
    }
    writer.flush()?;

    Ok(path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> RoundResult {
        let ranked = |id: u32, name: &str, time: f64, pos: u32| RankedHorse {
            horse: Horse::new(id, name, "#FF6B6B", 80),
            race_time: time,
            finish_position: pos,
        };
        RoundResult {
            round: 2,
            distance: 1400,
            results: vec![
                ranked(4, "Joan Clarke", 70.12, 1),
                ranked(9, "Fire Blaze", 74.5, 2),
            ],
            completed_at: "12:00:00".to_owned(),
        }
    }

    #[test]
    fn winner_is_first_finisher() {
        let result = sample_result();
        assert_eq!(result.winner().map(|w| w.horse.id), Some(4));

        let empty = RoundResult {
            results: Vec::new(),
            ..sample_result()
        };
        assert!(empty.winner().is_none());
    }

    #[test]
    fn table_lists_every_finisher() {
        let table = sample_result().format_table().unwrap();
        assert!(table.starts_with("RESULT: Round 2 (1400m)"));
        assert!(table.contains("Joan Clarke"));
        assert!(table.contains("74.50s"));
    }

    #[test]
    fn csv_has_one_row_per_finisher() {
        let path = std::env::temp_dir().join("horsesim_csv_test").join("results.csv");
        write_results_csv(&[sample_result()], &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "round");
        assert_eq!(&headers[4], "name");
        assert_eq!(reader.records().count(), 2);
    }

    #[test]
    fn ranked_horse_serializes_flat() {
        let json = serde_json::to_value(&sample_result().results[0]).unwrap();
        assert_eq!(json["name"], "Joan Clarke");
        assert_eq!(json["finish_position"], 1);
    }
}
