//! List state for the data set page.

use mlnano_models::DataSetRecord;

/// A storage key resolved to something the view can display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub key: String,
    pub url: String,
}

/// Newest-known-first: initial load order, then live arrivals in front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    pub data_sets: Vec<DataSetRecord>,
}

/// Everything the page dispatches. Only the first two touch the list.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    SetDataSets(Vec<DataSetRecord>),
    AddDataSet(DataSetRecord),
    ImageResolved(ResolvedImage),
}

pub fn reduce(mut state: ListState, action: StoreAction) -> ListState {
    match action {
        StoreAction::SetDataSets(data_sets) => {
            state.data_sets = data_sets;
        }
        StoreAction::AddDataSet(data_set) => {
            state.data_sets.insert(0, data_set);
        }
        StoreAction::ImageResolved(_) => {}
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mlnano_models::S3Object;

    fn record(id: &str) -> DataSetRecord {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        DataSetRecord {
            id: id.to_string(),
            name: format!("set-{id}"),
            description: None,
            file: S3Object {
                bucket: "b".into(),
                region: "r".into(),
                key: format!("key-{id}"),
            },
            created_at: at,
            updated_at: at,
        }
    }

    fn ids(state: &ListState) -> Vec<&str> {
        state.data_sets.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_set_replaces_everything() {
        let state = ListState {
            data_sets: vec![record("old")],
        };
        let state = reduce(
            state,
            StoreAction::SetDataSets(vec![record("a"), record("b")]),
        );
        assert_eq!(ids(&state), vec!["a", "b"]);
    }

    #[test]
    fn test_add_prepends() {
        let state = reduce(
            ListState::default(),
            StoreAction::SetDataSets(vec![record("a")]),
        );
        let state = reduce(state, StoreAction::AddDataSet(record("b")));
        assert_eq!(ids(&state), vec!["b", "a"]);
    }

    #[test]
    fn test_image_action_leaves_list_alone() {
        let before = reduce(
            ListState::default(),
            StoreAction::SetDataSets(vec![record("a")]),
        );
        let after = reduce(
            before.clone(),
            StoreAction::ImageResolved(ResolvedImage {
                key: "key-a".into(),
                url: "https://x/key-a".into(),
            }),
        );
        assert_eq!(before, after);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let state = reduce(
            ListState::default(),
            StoreAction::SetDataSets(vec![record("a")]),
        );
        let state = reduce(state, StoreAction::AddDataSet(record("a")));
        assert_eq!(ids(&state), vec!["a", "a"]);
    }

    #[test]
    fn test_action_sequences_match_direct_computation() {
        let sequences: Vec<Vec<StoreAction>> = vec![
            vec![],
            vec![StoreAction::AddDataSet(record("x"))],
            vec![
                StoreAction::AddDataSet(record("1")),
                StoreAction::SetDataSets(vec![record("a"), record("b")]),
                StoreAction::AddDataSet(record("c")),
                StoreAction::AddDataSet(record("d")),
            ],
            vec![
                StoreAction::SetDataSets(vec![record("a")]),
                StoreAction::AddDataSet(record("b")),
                StoreAction::SetDataSets(vec![]),
                StoreAction::AddDataSet(record("c")),
            ],
        ];

        for actions in sequences {
            let mut expected: Vec<String> = Vec::new();
            for action in &actions {
                match action {
                    StoreAction::SetDataSets(all) => {
                        expected = all.iter().map(|r| r.id.clone()).collect();
                    }
                    StoreAction::AddDataSet(one) => {
                        let mut next = vec![one.id.clone()];
                        next.extend(expected);
                        expected = next;
                    }
                    StoreAction::ImageResolved(_) => {}
                }
            }

            let state = actions.into_iter().fold(ListState::default(), reduce);
            assert_eq!(ids(&state), expected);
        }
    }
}
