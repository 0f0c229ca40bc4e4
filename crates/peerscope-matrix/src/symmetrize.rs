//! Mirroring of one-sided peering observations.
//!
//! Many peerings are only visible from one side (e.g. through the communities
//! one network tags its routes with). For every observed edge `a → b` the
//! implied reverse edge `b → a` is added, with Customer/Upstream swapped.
//! Nothing already present is replaced: a reverse observation made directly
//! always wins over a mirrored one, so conflicting claims stay visible.

use peerscope_model::PeeringDataset;
use serde::Serialize;
use tracing::debug;

/// What a mirroring pass inserted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MirrorStats {
    pub entities_added: usize,
    pub edges_added: usize,
    pub leaves_added: usize,
}

impl MirrorStats {
    pub fn is_empty(&self) -> bool {
        self.entities_added == 0 && self.edges_added == 0 && self.leaves_added == 0
    }
}

/// Returns a symmetric copy of `dataset`.
pub fn symmetrize(dataset: &PeeringDataset) -> PeeringDataset {
    let (mirrored, stats) = symmetrize_with_stats(dataset);
    debug!(
        entities_added = stats.entities_added,
        edges_added = stats.edges_added,
        leaves_added = stats.leaves_added,
        "mirrored peering dataset"
    );
    mirrored
}

pub fn symmetrize_with_stats(dataset: &PeeringDataset) -> (PeeringDataset, MirrorStats) {
    let mut mirrored = dataset.clone();
    let mut stats = MirrorStats::default();

    // Read edges from the borrowed input only, never from what has been
    // inserted into `mirrored` during this pass.
    for (local_id, entity) in &dataset.entities {
        for (peer_id, peer) in &entity.peers {
            if mirrored.entity(peer_id).is_none() {
                stats.entities_added += 1;
            }
            if !mirrored.has_edge(peer_id, local_id) {
                stats.edges_added += 1;
            }
            let reverse = mirrored.entity_mut(peer_id).peer_mut(local_id);

            for (region, region_rec) in &peer.location_peerings {
                let reverse_region = reverse.region_mut(*region);
                for (role, role_rec) in &region_rec.peerings_in_loc {
                    let reverse_role = reverse_region.role_mut(role.mirrored());
                    for (family, leaf) in &role_rec.peerings_by_ver {
                        if reverse_role.insert_if_absent(family, leaf) {
                            stats.leaves_added += 1;
                        }
                    }
                }
            }
        }
    }

    (mirrored, stats)
}
