use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use coviscope::core::{Observation, SeriesValue, align};
use proptest::prelude::*;

const CODES: [&str; 5] = ["US", "IN", "CN", "NL", "ZZ"];

fn observation_strategy() -> impl Strategy<Value = Observation> {
    (0usize..CODES.len(), 0u32..40, -1_000i32..1_000).prop_map(|(code, offset, value)| {
        let base = NaiveDate::from_ymd_opt(2021, 1, 1).expect("valid base date");
        Observation::new(
            CODES[code],
            base + chrono::Days::new(u64::from(offset)),
            f64::from(value),
        )
    })
}

fn last_wins_contract(observations: &[Observation]) -> HashMap<(String, NaiveDate), f64> {
    let mut cells = HashMap::new();
    for observation in observations {
        cells.insert(
            (observation.entity.clone(), observation.timestamp),
            observation.value,
        );
    }
    cells
}

proptest! {
    #[test]
    fn axis_contains_every_input_date_once_in_order(
        observations in prop::collection::vec(observation_strategy(), 0..120)
    ) {
        let matrix = align(&observations);
        let expected: Vec<NaiveDate> = observations
            .iter()
            .map(|o| o.timestamp)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        prop_assert_eq!(matrix.timestamps(), expected.as_slice());
        for pair in matrix.timestamps().windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn matrix_is_rectangular_and_matches_last_wins_cells(
        observations in prop::collection::vec(observation_strategy(), 0..120)
    ) {
        let matrix = align(&observations);
        let cells = last_wins_contract(&observations);

        prop_assert_eq!(matrix.values().len(), matrix.entities().len());
        prop_assert_eq!(matrix.labels().len(), matrix.entities().len());
        for (entity_index, entity) in matrix.entities().iter().enumerate() {
            let series = matrix.series(entity_index).expect("series exists");
            prop_assert_eq!(series.len(), matrix.timestamps().len());
            for (slot, date) in matrix.timestamps().iter().enumerate() {
                let expected = cells
                    .get(&(entity.clone(), *date))
                    .copied()
                    .map_or(SeriesValue::Gap, SeriesValue::Value);
                prop_assert_eq!(series[slot], expected);
            }
        }
    }

    #[test]
    fn entities_keep_first_seen_order_and_alignment_is_deterministic(
        observations in prop::collection::vec(observation_strategy(), 0..80)
    ) {
        let mut first_seen: Vec<String> = Vec::new();
        for observation in &observations {
            if !first_seen.contains(&observation.entity) {
                first_seen.push(observation.entity.clone());
            }
        }

        let first = align(&observations);
        let second = align(&observations);

        prop_assert_eq!(first.entities(), first_seen.as_slice());
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_string(&first).expect("serialize"),
            serde_json::to_string(&second).expect("serialize")
        );
    }
}
