//! Projection of a (symmetric) peering dataset into one relationship table
//! per focus entity.
//!
//! Tables are column-major: column 0 holds the row labels, then one column per
//! configured region. Every table has the same row order and header row, so a
//! renderer can switch focus by swapping cell contents only.

use std::collections::BTreeSet;

use peerscope_model::{PeerRecord, PeeringDataset, Region, Role};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{CellColours, ConfigError, FocusEntity, MatrixConfig, Palette};

/// Text shown in the cells of an entity against itself.
pub const SKIP_TEXT: &str = "-";
/// Heading of the row-label column.
pub const LABEL_HEADING: &str = "ASN";

/// Bucketing of the set of roles found for one pair in one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Peer,
    NoData,
    NonPeer,
}

/// Exactly `{Peer}` is a peering, exactly `{NoneFound}` carries no
/// information, anything else (including mixed sets) is a non-peer relation.
pub fn classify(roles: &BTreeSet<Role>) -> Classification {
    let mut iter = roles.iter();
    match (iter.next(), iter.next()) {
        (Some(Role::Peer), None) => Classification::Peer,
        (Some(Role::NoneFound), None) => Classification::NoData,
        _ => Classification::NonPeer,
    }
}

/// Role labels sorted by role name, joined with `", "`. A lone `NoneFound`
/// renders as its empty label; in a mixed set it shows by name so the text
/// matches the non-peer colours.
pub fn role_text(roles: &BTreeSet<Role>) -> String {
    let mut sorted: Vec<Role> = roles.iter().copied().collect();
    if sorted == [Role::NoneFound] {
        return Role::NoneFound.label().to_string();
    }
    sorted.sort_by_key(|role| role.name());
    sorted
        .iter()
        .map(|role| match role.label() {
            "" => role.name(),
            label => label,
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl Palette {
    pub fn colours(&self, class: Classification) -> &CellColours {
        match class {
            Classification::Peer => &self.peer,
            Classification::NoData => &self.no_data,
            Classification::NonPeer => &self.non_peer,
        }
    }
}

/// Column-major display strings with parallel fill and text colours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableBundle {
    pub values: Vec<Vec<String>>,
    pub fill_colours: Vec<Vec<String>>,
    pub text_colours: Vec<Vec<String>>,
}

impl TableBundle {
    /// Empty text and no-data colours everywhere.
    fn blank(columns: usize, rows: usize, palette: &Palette) -> Self {
        Self {
            values: vec![vec![String::new(); rows]; columns],
            fill_colours: vec![vec![palette.no_data.fill.clone(); rows]; columns],
            text_colours: vec![vec![palette.no_data.text.clone(); rows]; columns],
        }
    }

    pub fn column_count(&self) -> usize {
        self.values.len()
    }

    pub fn row_count(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }

    /// `(text, fill, text colour)` of one cell.
    pub fn cell(&self, column: usize, row: usize) -> Option<(&str, &str, &str)> {
        Some((
            self.values.get(column)?.get(row)?.as_str(),
            self.fill_colours.get(column)?.get(row)?.as_str(),
            self.text_colours.get(column)?.get(row)?.as_str(),
        ))
    }

    fn set_text(&mut self, column: usize, row: usize, text: String) {
        self.values[column][row] = text;
    }

    fn set_colours(&mut self, column: usize, row: usize, colours: &CellColours) {
        self.fill_colours[column][row] = colours.fill.clone();
        self.text_colours[column][row] = colours.text.clone();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusTable {
    pub focus_id: String,
    /// e.g. `Peerings found for AS174 (Cogent)`.
    pub subtitle: String,
    pub bundle: TableBundle,
}

/// Header row plus one table per focus entity, in focus order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixView {
    pub header: Vec<String>,
    pub tables: Vec<FocusTable>,
}

impl MatrixView {
    pub fn get(&self, focus_id: &str) -> Option<&TableBundle> {
        self.tables
            .iter()
            .find(|table| table.focus_id == focus_id)
            .map(|table| &table.bundle)
    }

    /// The table shown before any selection is made.
    pub fn default_focus(&self) -> Option<&FocusTable> {
        self.tables.first()
    }
}

#[derive(Debug, Clone)]
pub struct MatrixProjector {
    config: MatrixConfig,
}

impl MatrixProjector {
    pub fn new(config: MatrixConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MatrixConfig {
        &self.config
    }

    pub fn header(&self) -> Vec<String> {
        std::iter::once(LABEL_HEADING.to_string())
            .chain(self.config.regions.iter().map(|region| region.label().to_string()))
            .collect()
    }

    pub fn project(&self, dataset: &PeeringDataset) -> MatrixView {
        let tables: Vec<FocusTable> = self
            .config
            .focus
            .par_iter()
            .map(|focus| self.focus_table(dataset, focus))
            .collect();
        debug!(
            tables = tables.len(),
            rows = self.config.focus.len(),
            regions = self.config.regions.len(),
            "projected peering matrix"
        );
        MatrixView {
            header: self.header(),
            tables,
        }
    }

    fn focus_table(&self, dataset: &PeeringDataset, focus: &FocusEntity) -> FocusTable {
        let palette = &self.config.palette;
        let rows = &self.config.focus;
        let mut bundle = TableBundle::blank(self.config.regions.len() + 1, rows.len(), palette);

        if dataset.entity(&focus.id).is_none() {
            warn!(focus = %focus.id, "no peering data recorded for focus entity");
        }

        for (row, row_entity) in rows.iter().enumerate() {
            bundle.set_text(0, row, row_entity.label());

            if row_entity.id == focus.id {
                for column in 1..bundle.column_count() {
                    bundle.set_text(column, row, SKIP_TEXT.to_string());
                    bundle.fill_colours[column][row] = palette.skip_fill.clone();
                }
                continue;
            }

            let Some(edge) = dataset.peer_record(&focus.id, &row_entity.id) else {
                continue;
            };
            self.fill_row(&mut bundle, row, edge);
        }

        FocusTable {
            focus_id: focus.id.clone(),
            subtitle: match &focus.name {
                Some(name) => format!("Peerings found for AS{} ({})", focus.id, name),
                None => format!("Peerings found for AS{}", focus.id),
            },
            bundle,
        }
    }

    fn fill_row(&self, bundle: &mut TableBundle, row: usize, edge: &PeerRecord) {
        for (index, region) in self.config.regions.iter().enumerate() {
            let column = index + 1;
            let roles = match edge.region(*region) {
                Some(record) => record.roles(),
                None => continue,
            };
            // A region with no roles under it says nothing about the pair.
            if roles.is_empty() {
                continue;
            }
            let class = classify(&roles);
            bundle.set_text(column, row, role_text(&roles));
            bundle.set_colours(column, row, self.config.palette.colours(class));
        }
    }
}

/// Projects `dataset` for unnamed focus entities with the default palette.
pub fn project<S: AsRef<str>>(
    dataset: &PeeringDataset,
    focus_ids: &[S],
    region_order: &[Region],
) -> MatrixView {
    let projector = MatrixProjector {
        config: MatrixConfig {
            focus: focus_ids
                .iter()
                .map(|id| FocusEntity::new(id.as_ref(), None))
                .collect(),
            regions: region_order.to_vec(),
            palette: Palette::default(),
        },
    };
    projector.project(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symmetrize::symmetrize;
    use serde_json::json;

    fn roles(list: &[Role]) -> BTreeSet<Role> {
        list.iter().copied().collect()
    }

    fn scenario() -> PeeringDataset {
        let mut dataset = PeeringDataset::new();
        dataset.insert("1", "2", Region::Europe, Role::Customer, "v4", json!("203.0.113.0/24"));
        symmetrize(&dataset)
    }

    #[test]
    fn classification_policy() {
        assert_eq!(classify(&roles(&[Role::Peer])), Classification::Peer);
        assert_eq!(classify(&roles(&[Role::NoneFound])), Classification::NoData);
        assert_eq!(classify(&roles(&[Role::Customer])), Classification::NonPeer);
        assert_eq!(classify(&roles(&[Role::Upstream])), Classification::NonPeer);
        assert_eq!(classify(&roles(&[Role::PaidPeer])), Classification::NonPeer);
        assert_eq!(classify(&roles(&[Role::Peer, Role::PaidPeer])), Classification::NonPeer);
        assert_eq!(classify(&roles(&[Role::Peer, Role::NoneFound])), Classification::NonPeer);
    }

    #[test]
    fn role_text_sorts_by_name() {
        assert_eq!(role_text(&roles(&[Role::Upstream, Role::Customer])), "Customer, Upstream");
        assert_eq!(role_text(&roles(&[Role::Peer, Role::PaidPeer])), "Paid Peer, Peer");
        assert_eq!(role_text(&roles(&[Role::NoneFound])), "");
        assert_eq!(role_text(&roles(&[Role::Peer, Role::NoneFound])), "NoneFound, Peer");
    }

    #[test]
    fn mixed_none_found_cell_shows_both_roles() {
        let mut dataset = PeeringDataset::new();
        dataset.insert("1", "2", Region::Europe, Role::Peer, "Ipv4", json!("a"));
        dataset.insert("1", "2", Region::Europe, Role::NoneFound, "Ipv6", json!("b"));
        let view = project(&dataset, &["1", "2"], &[Region::Europe]);
        let palette = Palette::default();
        assert_eq!(
            view.get("1").unwrap().cell(1, 1),
            Some((
                "NoneFound, Peer",
                palette.non_peer.fill.as_str(),
                palette.non_peer.text.as_str()
            ))
        );
    }

    #[test]
    fn scenario_focus_tables() {
        let view = project(&scenario(), &["1", "2"], &[Region::Europe, Region::AsiaPac]);
        let palette = Palette::default();
        assert_eq!(view.header, vec!["ASN", "Europe", "Asia Pac"]);
        assert_eq!(view.tables.len(), 2);

        let one = view.get("1").unwrap();
        assert_eq!(one.values[0], vec!["1", "2"]);
        assert_eq!(
            one.cell(1, 1),
            Some(("Customer", palette.non_peer.fill.as_str(), palette.non_peer.text.as_str()))
        );
        assert_eq!(
            one.cell(2, 1),
            Some(("", palette.no_data.fill.as_str(), palette.no_data.text.as_str()))
        );

        let two = view.get("2").unwrap();
        assert_eq!(two.values[0], vec!["1", "2"]);
        assert_eq!(two.cell(1, 0).unwrap().0, "Upstream");
        assert_eq!(two.cell(1, 0).unwrap().1, palette.non_peer.fill);
    }

    #[test]
    fn diagonal_cells_are_skipped() {
        let view = project(&scenario(), &["1", "2"], &Region::ALL);
        let palette = Palette::default();
        for (row, table) in view.tables.iter().enumerate() {
            for column in 1..table.bundle.column_count() {
                let (text, fill, colour) = table.bundle.cell(column, row).unwrap();
                assert_eq!(text, SKIP_TEXT);
                assert_eq!(fill, palette.skip_fill);
                assert_eq!(colour, palette.no_data.text);
            }
        }
    }

    #[test]
    fn peer_and_none_found_colours() {
        let mut dataset = PeeringDataset::new();
        dataset.insert("10", "20", Region::Africa, Role::Peer, "Ipv4", json!(null));
        dataset.insert("10", "20", Region::SouthAmerica, Role::NoneFound, "Ipv6", json!(null));

        let projector = MatrixProjector::new(MatrixConfig::for_ids(["10", "20"])).unwrap();
        let view = projector.project(&dataset);
        let palette = &projector.config().palette;
        let table = view.get("10").unwrap();

        let africa = 1 + Region::ALL.iter().position(|r| *r == Region::Africa).unwrap();
        let south = 1 + Region::ALL.iter().position(|r| *r == Region::SouthAmerica).unwrap();
        assert_eq!(
            table.cell(africa, 1),
            Some(("Peer", palette.peer.fill.as_str(), palette.peer.text.as_str()))
        );
        assert_eq!(
            table.cell(south, 1),
            Some(("", palette.no_data.fill.as_str(), palette.no_data.text.as_str()))
        );

        // No reverse edge in an unsymmetrized dataset: the row stays blank.
        let reverse = view.get("20").unwrap();
        for column in 1..reverse.column_count() {
            assert_eq!(reverse.cell(column, 0).unwrap().0, "");
        }
    }

    #[test]
    fn named_entities_label_rows_and_subtitles() {
        let config = MatrixConfig {
            focus: vec![
                FocusEntity::new("174", Some("Cogent")),
                FocusEntity::new("64512", None),
            ],
            ..MatrixConfig::default()
        };
        let projector = MatrixProjector::new(config).unwrap();
        let view = projector.project(&PeeringDataset::new());
        assert_eq!(view.tables[0].bundle.values[0], vec!["174 (Cogent)", "64512"]);
        assert_eq!(view.tables[0].subtitle, "Peerings found for AS174 (Cogent)");
        assert_eq!(view.tables[1].subtitle, "Peerings found for AS64512");
        assert_eq!(view.default_focus().unwrap().focus_id, "174");
        assert_eq!(view.header.len(), Region::ALL.len() + 1);
        assert_eq!(view.header[2], "Asia Pac");
    }

    #[test]
    fn region_without_roles_is_blank() {
        let doc = json!({ "1": { "peers": { "2": { "location_peerings": { "Europe": {} } } } } });
        let dataset = PeeringDataset::from_value(&doc).unwrap();
        let view = project(&dataset, &["1", "2"], &[Region::Europe]);
        let palette = Palette::default();
        assert_eq!(
            view.get("1").unwrap().cell(1, 1),
            Some(("", palette.no_data.fill.as_str(), palette.no_data.text.as_str()))
        );
    }

    #[test]
    fn all_bundles_share_shape_and_labels() {
        let view = project(&scenario(), &["2", "1", "99"], &Region::ALL);
        let labels = &view.tables[0].bundle.values[0];
        for table in &view.tables {
            let bundle = &table.bundle;
            assert_eq!(bundle.column_count(), Region::ALL.len() + 1);
            assert_eq!(bundle.row_count(), 3);
            assert_eq!(bundle.fill_colours.len(), bundle.values.len());
            assert_eq!(bundle.text_colours.len(), bundle.values.len());
            assert_eq!(&bundle.values[0], labels);
        }
    }
}
