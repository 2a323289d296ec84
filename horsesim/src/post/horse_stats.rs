use crate::core::horse::Horse;
use crate::post::race_result::RoundResult;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

/// HorseStats accumulates the cumulative statistics of one horse over several rounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HorseStats {
    pub horse_id: u32,
    pub name: String,
    pub total_races: u32,
    pub wins: u32,
}

impl HorseStats {
    /// get_win_rate returns the share of won rounds in percent.
    pub fn get_win_rate(&self) -> f64 {
        if self.total_races == 0 {
            0.0
        } else {
            self.wins as f64 / self.total_races as f64 * 100.0
        }
    }
}

/// StatsTable collects HorseStats by horse id. Tables of independent sessions can be merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
    stats: BTreeMap<u32, HorseStats>,
}

impl StatsTable {
    pub fn new() -> StatsTable {
        StatsTable::default()
    }

    pub fn record_results(&mut self, results: &[RoundResult]) {
        for result in results.iter() {
            for ranked in result.results.iter() {
                let entry = self
                    .stats
                    .entry(ranked.horse.id)
                    .or_insert_with(|| HorseStats {
                        horse_id: ranked.horse.id,
                        name: ranked.horse.name.to_owned(),
                        ..HorseStats::default()
                    });
                entry.total_races += 1;
                if ranked.finish_position == 1 {
                    entry.wins += 1;
                }
            }
        }
    }

    pub fn merge(mut self, other: StatsTable) -> StatsTable {
        for (horse_id, other_stats) in other.stats.into_iter() {
            let entry = self.stats.entry(horse_id).or_insert_with(|| HorseStats {
                horse_id,
                name: other_stats.name.to_owned(),
                ..HorseStats::default()
            });
            entry.total_races += other_stats.total_races;
            entry.wins += other_stats.wins;
        }
        self
    }

    pub fn get(&self, horse_id: u32) -> Option<&HorseStats> {
        self.stats.get(&horse_id)
    }

    /// apply_to writes the cumulative statistics into the given horses.
    pub fn apply_to(&self, horses: &mut [Horse]) {
        for horse in horses.iter_mut() {
            if let Some(stats) = self.stats.get(&horse.id) {
                horse.total_races = stats.total_races;
                horse.wins = stats.wins;
                horse.win_rate = stats.get_win_rate();
            }
        }
    }
}

/// format_horse_stats returns the statistics carried by the given horses as a table, best win rate
/// first.
pub fn format_horse_stats(horses: &[Horse]) -> anyhow::Result<String> {
    let mut sorted: Vec<&Horse> = horses.iter().collect();
    sorted.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate).then(a.id.cmp(&b.id)));

    let mut content = String::new();
    writeln!(&mut content, "RESULT: Horse statistics")?;
    writeln!(&mut content, "id, {:20}, cond, races, wins, win rate", "name")?;
    for horse in sorted {
        writeln!(
            &mut content,
            "{:2}, {:20}, {:4}, {:5}, {:4}, {:7.2}%",
            horse.id, horse.name, horse.condition, horse.total_races, horse.wins, horse.win_rate
        )?;
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::race_result::RankedHorse;
    use approx::assert_relative_eq;

    fn result(order: &[u32]) -> RoundResult {
        RoundResult {
            round: 1,
            distance: 1200,
            results: order
                .iter()
                .enumerate()
                .map(|(i, &id)| RankedHorse {
                    horse: Horse::new(id, &format!("horse {}", id), "#FF6B6B", 50),
                    race_time: 60.0 + i as f64,
                    finish_position: i as u32 + 1,
                })
                .collect(),
            completed_at: "12:00:00".to_owned(),
        }
    }

    #[test]
    fn wins_and_races_are_counted() {
        let mut table = StatsTable::new();
        table.record_results(&[result(&[1, 2, 3]), result(&[2, 1]), result(&[1, 3])]);

        let stats = table.get(1).unwrap();
        assert_eq!(stats.total_races, 3);
        assert_eq!(stats.wins, 2);
        assert_relative_eq!(stats.get_win_rate(), 200.0 / 3.0, max_relative = 1e-12);
        assert_eq!(table.get(3).unwrap().wins, 0);
    }

    #[test]
    fn merged_tables_add_up() {
        let mut a = StatsTable::new();
        a.record_results(&[result(&[1, 2])]);
        let mut b = StatsTable::new();
        b.record_results(&[result(&[2, 1]), result(&[4])]);

        let merged = a.merge(b);
        assert_eq!(merged.get(1).unwrap().total_races, 2);
        assert_eq!(merged.get(2).unwrap().wins, 1);
        assert_eq!(merged.get(4).unwrap().wins, 1);
    }

    #[test]
    fn stats_are_applied_to_horses() {
        let mut table = StatsTable::new();
        table.record_results(&[result(&[1, 2])]);

        let mut horses = vec![
            Horse::new(1, "horse 1", "#FF6B6B", 50),
            Horse::new(2, "horse 2", "#FF6B6B", 50),
            Horse::new(3, "horse 3", "#FF6B6B", 50),
        ];
        table.apply_to(&mut horses);
        assert_eq!(horses[0].wins, 1);
        assert_relative_eq!(horses[0].win_rate, 100.0);
        assert_eq!(horses[1].total_races, 1);
        assert_eq!(horses[2].total_races, 0);
    }

    #[test]
    fn table_is_printed_from_the_updated_horses() {
        let mut table = StatsTable::new();
        table.record_results(&[result(&[2, 1]), result(&[2, 3])]);

        let mut horses = vec![
            Horse::new(1, "horse 1", "#FF6B6B", 50),
            Horse::new(2, "horse 2", "#FF6B6B", 50),
            Horse::new(3, "horse 3", "#FF6B6B", 50),
        ];
        table.apply_to(&mut horses);

        let content = format_horse_stats(&horses).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].starts_with(" 2, horse 2"));
        assert!(lines[2].ends_with(" 100.00%"));
        assert!(lines[2].contains(",     2,    2,"));
        assert!(lines[3].starts_with(" 1, horse 1"));
        assert!(lines[4].starts_with(" 3, horse 3"));
    }
}
