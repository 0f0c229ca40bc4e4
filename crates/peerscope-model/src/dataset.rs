//! The nested peering dataset and its validated decoder.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::tags::{Region, Role};
use crate::ModelError;

/// Top-level key the collector wraps its dataset in.
pub const DEFAULT_WRAPPER_KEY: &str = "peering_data";

/// Numeric AS-like identifier, kept as the string key it is stored under.
pub type EntityId = String;

/// Address family label (e.g. `Ipv4`) → opaque leaf value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoleRecord {
    pub peerings_by_ver: BTreeMap<String, Value>,
}

impl RoleRecord {
    /// Inserts `leaf` under `family` unless the family is already present.
    /// Returns whether anything was inserted.
    pub fn insert_if_absent(&mut self, family: &str, leaf: &Value) -> bool {
        if self.peerings_by_ver.contains_key(family) {
            return false;
        }
        self.peerings_by_ver.insert(family.to_string(), leaf.clone());
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionRecord {
    pub peerings_in_loc: BTreeMap<Role, RoleRecord>,
}

impl RegionRecord {
    pub fn role_mut(&mut self, role: Role) -> &mut RoleRecord {
        self.peerings_in_loc.entry(role).or_default()
    }

    /// Distinct roles observed in this region.
    pub fn roles(&self) -> BTreeSet<Role> {
        self.peerings_in_loc.keys().copied().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeerRecord {
    pub location_peerings: BTreeMap<Region, RegionRecord>,
}

impl PeerRecord {
    pub fn region(&self, region: Region) -> Option<&RegionRecord> {
        self.location_peerings.get(&region)
    }

    pub fn region_mut(&mut self, region: Region) -> &mut RegionRecord {
        self.location_peerings.entry(region).or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityRecord {
    pub peers: BTreeMap<EntityId, PeerRecord>,
}

impl EntityRecord {
    pub fn peer_mut(&mut self, peer: &str) -> &mut PeerRecord {
        self.peers.entry(peer.to_string()).or_default()
    }
}

/// Entity id → everything recorded about that entity's peers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PeeringDataset {
    pub entities: BTreeMap<EntityId, EntityRecord>,
}

impl PeeringDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a whole document: `{ <wrapper_key>: <dataset> }`.
    pub fn from_document(document: &Value, wrapper_key: &str) -> Result<Self, ModelError> {
        let inner = document
            .as_object()
            .and_then(|obj| obj.get(wrapper_key))
            .ok_or_else(|| ModelError::MissingWrapper {
                key: wrapper_key.to_string(),
            })?;
        decode_dataset(inner, wrapper_key)
    }

    /// Decodes an unwrapped dataset (the shape written for mirrored output).
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        decode_dataset(value, "")
    }

    pub fn from_json_str(text: &str, wrapper_key: &str) -> Result<Self, ModelError> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_document(&document, wrapper_key)
    }

    pub fn to_value(&self) -> Value {
        // Every key is a string or a unit enum variant, so this cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entity(&self, id: &str) -> Option<&EntityRecord> {
        self.entities.get(id)
    }

    /// Get-or-insert an empty entity record.
    pub fn entity_mut(&mut self, id: &str) -> &mut EntityRecord {
        self.entities.entry(id.to_string()).or_default()
    }

    /// The record for the directed edge `local → peer`, if observed.
    pub fn peer_record(&self, local: &str, peer: &str) -> Option<&PeerRecord> {
        self.entity(local).and_then(|entity| entity.peers.get(peer))
    }

    pub fn has_edge(&self, local: &str, peer: &str) -> bool {
        self.peer_record(local, peer).is_some()
    }

    /// Number of directed `local → peer` edges.
    pub fn edge_count(&self) -> usize {
        self.entities.values().map(|entity| entity.peers.len()).sum()
    }

    pub fn leaf(
        &self,
        local: &str,
        peer: &str,
        region: Region,
        role: Role,
        family: &str,
    ) -> Option<&Value> {
        self.peer_record(local, peer)?
            .region(region)?
            .peerings_in_loc
            .get(&role)?
            .peerings_by_ver
            .get(family)
    }

    /// Sets a leaf, creating intermediate levels as needed. Returns the value
    /// previously stored there.
    pub fn insert(
        &mut self,
        local: &str,
        peer: &str,
        region: Region,
        role: Role,
        family: &str,
        leaf: Value,
    ) -> Option<Value> {
        self.entity_mut(local)
            .peer_mut(peer)
            .region_mut(region)
            .role_mut(role)
            .peerings_by_ver
            .insert(family.to_string(), leaf)
    }

    /// Every `(local, peer, region, role, family, leaf)` tuple in the dataset.
    pub fn leaves(&self) -> impl Iterator<Item = (&str, &str, Region, Role, &str, &Value)> {
        self.entities.iter().flat_map(|(local, entity)| {
            entity.peers.iter().flat_map(move |(peer, peer_rec)| {
                peer_rec
                    .location_peerings
                    .iter()
                    .flat_map(move |(region, region_rec)| {
                        region_rec
                            .peerings_in_loc
                            .iter()
                            .flat_map(move |(role, role_rec)| {
                                role_rec.peerings_by_ver.iter().map(move |(family, leaf)| {
                                    (
                                        local.as_str(),
                                        peer.as_str(),
                                        *region,
                                        *role,
                                        family.as_str(),
                                        leaf,
                                    )
                                })
                            })
                    })
            })
        })
    }
}

// ============================================================================
// Decoder
// ============================================================================

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}/{key}")
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ModelError> {
    value.as_object().ok_or_else(|| ModelError::MalformedDataset {
        path: path.to_string(),
        message: format!("expected an object, found {}", kind_of(value)),
    })
}

/// A missing level means "empty"; a present one must be an object.
fn optional_level<'a>(
    record: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<(&'a Map<String, Value>, String)>, ModelError> {
    match record.get(key) {
        None => Ok(None),
        Some(value) => {
            let path = join(path, key);
            let obj = expect_object(value, &path)?;
            Ok(Some((obj, path)))
        }
    }
}

fn decode_dataset(value: &Value, path: &str) -> Result<PeeringDataset, ModelError> {
    let mut dataset = PeeringDataset::new();
    for (local, entity) in expect_object(value, path)? {
        let entity_path = join(path, local);
        let record = decode_entity(expect_object(entity, &entity_path)?, &entity_path)?;
        dataset.entities.insert(local.clone(), record);
    }
    Ok(dataset)
}

fn decode_entity(obj: &Map<String, Value>, path: &str) -> Result<EntityRecord, ModelError> {
    let mut record = EntityRecord::default();
    let Some((peers, peers_path)) = optional_level(obj, "peers", path)? else {
        return Ok(record);
    };
    for (peer, value) in peers {
        let peer_path = join(&peers_path, peer);
        let peer_rec = decode_peer(expect_object(value, &peer_path)?, &peer_path)?;
        record.peers.insert(peer.clone(), peer_rec);
    }
    Ok(record)
}

fn decode_peer(obj: &Map<String, Value>, path: &str) -> Result<PeerRecord, ModelError> {
    let mut record = PeerRecord::default();
    let Some((locations, loc_path)) = optional_level(obj, "location_peerings", path)? else {
        return Ok(record);
    };
    for (name, value) in locations {
        let region_path = join(&loc_path, name);
        let region = Region::parse(name).ok_or_else(|| ModelError::UnknownRegion {
            path: region_path.clone(),
            name: name.clone(),
        })?;
        let region_rec = decode_region(expect_object(value, &region_path)?, &region_path)?;
        // Same as roles: a name and its label merge, the first family wins.
        let entry = record.region_mut(region);
        for (role, role_rec) in region_rec.peerings_in_loc {
            let target = entry.role_mut(role);
            for (family, leaf) in role_rec.peerings_by_ver {
                target.peerings_by_ver.entry(family).or_insert(leaf);
            }
        }
    }
    Ok(record)
}

fn decode_region(obj: &Map<String, Value>, path: &str) -> Result<RegionRecord, ModelError> {
    let mut record = RegionRecord::default();
    let Some((roles, roles_path)) = optional_level(obj, "peerings_in_loc", path)? else {
        return Ok(record);
    };
    for (name, value) in roles {
        let role_path = join(&roles_path, name);
        let role = Role::parse(name).ok_or_else(|| ModelError::UnknownRole {
            path: role_path.clone(),
            name: name.clone(),
        })?;
        let role_rec = decode_role(expect_object(value, &role_path)?, &role_path)?;
        // A name and its label may both appear; keep every family from both.
        let entry = record.role_mut(role);
        for (family, leaf) in role_rec.peerings_by_ver {
            entry.peerings_by_ver.entry(family).or_insert(leaf);
        }
    }
    Ok(record)
}

fn decode_role(obj: &Map<String, Value>, path: &str) -> Result<RoleRecord, ModelError> {
    let mut record = RoleRecord::default();
    if let Some((families, _)) = optional_level(obj, "peerings_by_ver", path)? {
        for (family, leaf) in families {
            record.peerings_by_ver.insert(family.clone(), leaf.clone());
        }
    }
    Ok(record)
}
