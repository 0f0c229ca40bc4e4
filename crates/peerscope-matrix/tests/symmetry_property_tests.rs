use peerscope_matrix::{classify, project, symmetrize, Classification, Palette, SKIP_TEXT};
use peerscope_model::{PeeringDataset, Region, Role};
use proptest::prelude::*;
use serde_json::{json, Value};

type Leaf = (String, String, Region, Role, String, Value);

fn entity_id() -> impl Strategy<Value = String> {
    // A small id space so that forward and reverse observations collide often.
    prop::sample::select(vec!["174", "1299", "3356", "6939", "64512"]).prop_map(str::to_string)
}

fn leaf() -> impl Strategy<Value = Leaf> {
    (
        entity_id(),
        entity_id(),
        prop::sample::select(Region::ALL.to_vec()),
        prop::sample::select(Role::ALL.to_vec()),
        prop::sample::select(vec!["Ipv4", "Ipv6"]).prop_map(str::to_string),
        (0u32..1000).prop_map(|n| json!({ "route": n })),
    )
}

fn dataset() -> impl Strategy<Value = PeeringDataset> {
    (
        proptest::collection::vec(leaf(), 0..24),
        proptest::collection::vec((entity_id(), entity_id()), 0..4),
    )
        .prop_map(|(leaves, bare_edges)| {
            let mut dataset = PeeringDataset::new();
            for (local, peer, region, role, family, value) in leaves {
                dataset.insert(&local, &peer, region, role, &family, value);
            }
            // Edges with no regions under them.
            for (local, peer) in bare_edges {
                dataset.entity_mut(&local).peer_mut(&peer);
            }
            dataset
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn every_leaf_has_its_mirror(input in dataset()) {
        let mirrored = symmetrize(&input);
        for (a, b, region, role, family, value) in input.leaves() {
            let expected = input
                .leaf(b, a, region, role.mirrored(), family)
                .unwrap_or(value);
            prop_assert_eq!(mirrored.leaf(b, a, region, role.mirrored(), family), Some(expected));
        }
    }

    #[test]
    fn mirroring_never_removes_or_changes_data(input in dataset()) {
        let mirrored = symmetrize(&input);
        for (a, b, region, role, family, value) in input.leaves() {
            prop_assert_eq!(mirrored.leaf(a, b, region, role, family), Some(value));
        }
        for (id, entity) in &input.entities {
            let out = mirrored.entity(id);
            prop_assert!(out.is_some());
            for (peer, record) in &entity.peers {
                let out_record = mirrored.peer_record(id, peer);
                prop_assert!(out_record.is_some());
                for region in record.location_peerings.keys() {
                    prop_assert!(out_record.unwrap().region(*region).is_some());
                }
            }
        }
    }

    #[test]
    fn mirroring_only_adds_implied_leaves(input in dataset()) {
        let mirrored = symmetrize(&input);
        for (a, b, region, role, family, _) in mirrored.leaves() {
            let observed = input.leaf(a, b, region, role, family).is_some();
            let implied = input.leaf(b, a, region, role.mirrored(), family).is_some();
            prop_assert!(observed || implied);
        }
    }

    #[test]
    fn every_peer_becomes_an_entity_with_a_reverse_edge(input in dataset()) {
        let mirrored = symmetrize(&input);
        for (id, entity) in &mirrored.entities {
            for peer in entity.peers.keys() {
                prop_assert!(mirrored.has_edge(peer, id));
            }
        }
    }

    #[test]
    fn symmetric_input_is_a_fixed_point(input in dataset()) {
        let once = symmetrize(&input);
        let twice = symmetrize(&once);
        prop_assert_eq!(&twice, &once);
    }

    #[test]
    fn role_inversion_is_an_involution(role in prop::sample::select(Role::ALL.to_vec())) {
        prop_assert_eq!(role.mirrored().mirrored(), role);
    }

    #[test]
    fn projection_classifies_every_observed_cell(input in dataset()) {
        let mirrored = symmetrize(&input);
        let focus = ["174", "1299", "3356", "6939", "64512"];
        let view = project(&mirrored, &focus, &Region::ALL);
        let palette = Palette::default();

        for table in &view.tables {
            for (row, row_id) in focus.iter().enumerate() {
                for (index, region) in Region::ALL.iter().enumerate() {
                    let (text, fill, colour) = table.bundle.cell(index + 1, row).unwrap();

                    if *row_id == table.focus_id {
                        prop_assert_eq!(text, SKIP_TEXT);
                        prop_assert_eq!(fill, palette.skip_fill.as_str());
                        continue;
                    }

                    let roles = mirrored
                        .peer_record(&table.focus_id, row_id)
                        .and_then(|edge| edge.region(*region))
                        .map(|record| record.roles())
                        .unwrap_or_default();
                    if roles.is_empty() {
                        prop_assert_eq!(text, "");
                        prop_assert_eq!(fill, palette.no_data.fill.as_str());
                        continue;
                    }

                    let class = classify(&roles);
                    prop_assert_eq!(
                        class == Classification::Peer,
                        roles.len() == 1 && roles.contains(&Role::Peer)
                    );
                    prop_assert_eq!(
                        class == Classification::NoData,
                        roles.len() == 1 && roles.contains(&Role::NoneFound)
                    );
                    let expected = palette.colours(class);
                    prop_assert_eq!(fill, expected.fill.as_str());
                    prop_assert_eq!(colour, expected.text.as_str());
                }
            }
        }
    }
}
