use crate::core::horse::Horse;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// (m) Distances of the six rounds of a race program
pub const RACE_DISTANCES: [u32; 6] = [1200, 1400, 1600, 1800, 2000, 2200];
pub const HORSES_PER_ROUND: usize = 10;
pub const ROSTER_SIZE: usize = 20;

/// LaneEntry assigns a horse to a lane (1-based) of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneEntry {
    pub lane: u32,
    pub horse: Horse,
}

/// * `round` - Round number (1-based), equals the position in the program
/// * `distance` - (m) Round distance
/// * `horses` - Participating horses with their lanes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceRound {
    pub round: u32,
    pub distance: u32,
    pub horses: Vec<LaneEntry>,
}

impl RaceRound {
    pub fn get_horses(&self) -> Vec<Horse> {
        self.horses.iter().map(|entry| entry.horse.to_owned()).collect()
    }
}

/// RaceProgram is the ordered sequence of rounds of one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaceProgram {
    rounds: Vec<RaceRound>,
}

impl RaceProgram {
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&RaceRound> {
        self.rounds.get(idx)
    }

    pub fn rounds(&self) -> &[RaceRound] {
        &self.rounds
    }
}

/// generate_program creates one round per distance. For every round the full roster is shuffled
/// uniformly (Fisher-Yates) and the first `horses_per_round` horses are selected. Lanes are
/// assigned in selection order.
pub fn generate_program<R: Rng + ?Sized>(
    roster: &[Horse],
    distances: &[u32],
    horses_per_round: usize,
    rng: &mut R,
) -> RaceProgram {
    let mut rounds = Vec::with_capacity(distances.len());

    for (i, &distance) in distances.iter().enumerate() {
        let mut shuffled: Vec<&Horse> = roster.iter().collect();
        shuffled.shuffle(rng);

        let horses = shuffled
            .into_iter()
            .take(horses_per_round)
            .enumerate()
            .map(|(lane_idx, horse)| LaneEntry {
                lane: lane_idx as u32 + 1,
                horse: horse.to_owned(),
            })
            .collect();

        rounds.push(RaceRound {
            round: i as u32 + 1,
            distance,
            horses,
        });
    }

    RaceProgram { rounds }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::roster::generate_roster;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn program_shape() {
        let mut rng = StdRng::seed_from_u64(21);
        let roster = generate_roster(ROSTER_SIZE, &mut rng);
        let program = generate_program(&roster, &RACE_DISTANCES, HORSES_PER_ROUND, &mut rng);

        assert_eq!(program.len(), 6);
        for (i, round) in program.rounds().iter().enumerate() {
            assert_eq!(round.round, i as u32 + 1);
            assert_eq!(round.distance, RACE_DISTANCES[i]);
            assert_eq!(round.horses.len(), HORSES_PER_ROUND);

            let lanes: Vec<u32> = round.horses.iter().map(|e| e.lane).collect();
            assert_eq!(lanes, (1..=10).collect::<Vec<u32>>());

            let ids: HashSet<u32> = round.horses.iter().map(|e| e.horse.id).collect();
            assert_eq!(ids.len(), HORSES_PER_ROUND);
            assert!(ids.iter().all(|id| (1..=20).contains(id)));
        }
    }

    #[test]
    fn small_roster_takes_every_horse() {
        let mut rng = StdRng::seed_from_u64(4);
        let roster = generate_roster(4, &mut rng);
        let program = generate_program(&roster, &RACE_DISTANCES, HORSES_PER_ROUND, &mut rng);
        assert!(program.rounds().iter().all(|r| r.horses.len() == 4));
    }

    #[test]
    fn empty_roster_gives_empty_rounds() {
        let mut rng = StdRng::seed_from_u64(4);
        let program = generate_program(&[], &RACE_DISTANCES, HORSES_PER_ROUND, &mut rng);
        assert_eq!(program.len(), 6);
        assert!(program.rounds().iter().all(|r| r.horses.is_empty()));
    }

    #[test]
    fn shuffle_varies_selection_between_rounds() {
        let mut rng = StdRng::seed_from_u64(8);
        let roster = generate_roster(ROSTER_SIZE, &mut rng);
        let program = generate_program(&roster, &RACE_DISTANCES, HORSES_PER_ROUND, &mut rng);

        let selections: HashSet<Vec<u32>> = program
            .rounds()
            .iter()
            .map(|r| r.horses.iter().map(|e| e.horse.id).collect())
            .collect();
        assert!(selections.len() > 1);
    }
}
