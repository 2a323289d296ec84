use crate::core::horse::{Horse, CONDITION_MAX, CONDITION_MIN};
use rand::Rng;

pub const POOL_SIZE: usize = 20;

const HORSE_NAMES: [&str; POOL_SIZE] = [
    "Ada Lovelace",
    "Grace Hopper",
    "Margaret Hamilton",
    "Joan Clarke",
    "Lightning Bolt",
    "Thunder Strike",
    "Storm Chaser",
    "Wind Runner",
    "Fire Blaze",
    "Star Dancer",
    "Moon Walker",
    "Sun Rider",
    "Ocean Wave",
    "Mountain Peak",
    "Desert Wind",
    "Forest Spirit",
    "Golden Arrow",
    "Silver Bullet",
    "Bronze Medal",
    "Diamond Dust",
];

const HORSE_COLORS: [&str; POOL_SIZE] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FECA57", "#FF9FF3", "#54A0FF", "#5F27CD",
    "#00D2D3", "#FF9F43", "#10AC84", "#EE5A24", "#0ABDE3", "#C44569", "#FF6348", "#1DD1A1",
    "#FF3838", "#2F3542", "#40407A", "#706FD3",
];

/// horse_names returns the fixed pool of display names.
pub fn horse_names() -> &'static [&'static str] {
    &HORSE_NAMES
}

/// generate_roster creates `count` horses with sequential ids starting at 1 and a condition
/// sampled uniformly from [1, 100].
///
/// Names and colors are taken positionally from fixed pools of 20 entries. Beyond that the pools
/// are cycled: colors repeat, names of the k-th repetition get the suffix `k + 1` (e.g.
/// `Ada Lovelace 2`) so that names stay unique.
pub fn generate_roster<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Horse> {
    let mut horses = Vec::with_capacity(count);

    for i in 0..count {
        let cycle = i / POOL_SIZE;
        let name = if cycle == 0 {
            HORSE_NAMES[i].to_owned()
        } else {
            format!("{} {}", HORSE_NAMES[i % POOL_SIZE], cycle + 1)
        };

        horses.push(Horse::new(
            i as u32 + 1,
            &name,
            HORSE_COLORS[i % POOL_SIZE],
            rng.gen_range(CONDITION_MIN..=CONDITION_MAX),
        ));
    }

    horses
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn empty_roster() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_roster(0, &mut rng).is_empty());
    }

    #[test]
    fn full_roster_uses_pools_positionally() {
        let mut rng = StdRng::seed_from_u64(7);
        let horses = generate_roster(POOL_SIZE, &mut rng);

        assert_eq!(horses[0].name, "Ada Lovelace");
        assert_eq!(horses[0].color, "#FF6B6B");
        assert_eq!(horses[19].name, "Diamond Dust");
        assert_eq!(horses[19].color, "#706FD3");
        assert!(horses
            .iter()
            .all(|h| h.total_races == 0 && h.wins == 0 && h.win_rate == 0.0));
    }

    #[test]
    fn exhausted_pools_are_cycled_with_unique_names() {
        let mut rng = StdRng::seed_from_u64(3);
        let horses = generate_roster(45, &mut rng);

        assert_eq!(horses.len(), 45);
        assert_eq!(horses[20].name, "Ada Lovelace 2");
        assert_eq!(horses[20].color, horses[0].color);
        assert_eq!(horses[43].name, "Joan Clarke 3");
        assert_eq!(horses[44].id, 45);

        let names: HashSet<_> = horses.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names.len(), 45);
    }

    #[test]
    fn name_pool_is_exposed() {
        assert_eq!(horse_names().len(), POOL_SIZE);
        assert_eq!(horse_names()[1], "Grace Hopper");
    }

    proptest! {
        #[test]
        fn roster_shape_holds_for_pool_sized_counts(count in 0usize..=POOL_SIZE, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let horses = generate_roster(count, &mut rng);

            prop_assert_eq!(horses.len(), count);
            for (i, horse) in horses.iter().enumerate() {
                prop_assert_eq!(horse.id, i as u32 + 1);
                prop_assert!((1..=100).contains(&horse.condition));
            }

            let names: HashSet<_> = horses.iter().map(|h| h.name.clone()).collect();
            let colors: HashSet<_> = horses.iter().map(|h| h.color.clone()).collect();
            prop_assert_eq!(names.len(), count);
            prop_assert_eq!(colors.len(), count);
        }
    }
}
