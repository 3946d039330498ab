//! Per-run metric tables, as produced by the upstream analysis.
//!
//! Each table resolves field names from the registry to a value. Deserializing
//! the underlying run artifacts is the caller's job; these types only derive
//! `serde` so the caller can do it.

use serde::{Deserialize, Serialize};

use crate::cdf::Cdf;
use crate::errors::Result;
use crate::field::Category;
use crate::meta::Metadata;

/// Name-based access to a metric table, for section building.
pub trait MetricTable {
    fn category(&self) -> Category;

    /// Instant value of `field`, if this table carries it.
    fn instant(&self, _field: &str) -> Option<f64> {
        None
    }

    /// Distribution of `field`, if this table carries it.
    fn distribution(&self, _field: &str) -> Option<&Cdf> {
        None
    }
}

/// Instant values describing a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub hosts: u32,
    pub log_objects: u64,
    pub slots: u64,
    pub blocks_forged: u64,
    pub tx_submitted: u64,
    pub duration_s: f64,
    pub target_tps: f64,
}

impl MetricTable for Summary {
    fn category(&self) -> Category {
        Category::Summary
    }

    fn instant(&self, field: &str) -> Option<f64> {
        Some(match field {
            "hosts" => f64::from(self.hosts),
            "log_objects" => self.log_objects as f64,
            "slots" => self.slots as f64,
            "blocks_forged" => self.blocks_forged as f64,
            "tx_submitted" => self.tx_submitted as f64,
            "duration_s" => self.duration_s,
            "target_tps" => self.target_tps,
            _ => return None,
        })
    }
}

/// Machine performance distributions, pooled over the cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachPerf {
    pub cpu_process: Cdf,
    pub cpu_gc: Cdf,
    pub cpu_mutator: Cdf,
    pub rss: Cdf,
    pub heap: Cdf,
    pub alloc_rate: Cdf,
    pub net_read: Cdf,
    pub net_write: Cdf,
    pub fs_read: Cdf,
    pub fs_write: Cdf,
    pub slot_start: Cdf,
    pub leadership: Cdf,
    pub forge: Cdf,
    pub block_gap: Cdf,
}

impl MetricTable for MachPerf {
    fn category(&self) -> Category {
        Category::MachPerf
    }

    fn distribution(&self, field: &str) -> Option<&Cdf> {
        Some(match field {
            "cpu_process" => &self.cpu_process,
            "cpu_gc" => &self.cpu_gc,
            "cpu_mutator" => &self.cpu_mutator,
            "rss" => &self.rss,
            "heap" => &self.heap,
            "alloc_rate" => &self.alloc_rate,
            "net_read" => &self.net_read,
            "net_write" => &self.net_write,
            "fs_read" => &self.fs_read,
            "fs_write" => &self.fs_write,
            "slot_start" => &self.slot_start,
            "leadership" => &self.leadership,
            "forge" => &self.forge,
            "block_gap" => &self.block_gap,
            _ => return None,
        })
    }
}

impl MachPerf {
    /// Field-wise [`Cdf::merge`].
    pub fn merge(&self, other: &MachPerf) -> Result<MachPerf> {
        Ok(MachPerf {
            cpu_process: self.cpu_process.merge_named("cpu_process", &other.cpu_process)?,
            cpu_gc: self.cpu_gc.merge_named("cpu_gc", &other.cpu_gc)?,
            cpu_mutator: self.cpu_mutator.merge_named("cpu_mutator", &other.cpu_mutator)?,
            rss: self.rss.merge_named("rss", &other.rss)?,
            heap: self.heap.merge_named("heap", &other.heap)?,
            alloc_rate: self.alloc_rate.merge_named("alloc_rate", &other.alloc_rate)?,
            net_read: self.net_read.merge_named("net_read", &other.net_read)?,
            net_write: self.net_write.merge_named("net_write", &other.net_write)?,
            fs_read: self.fs_read.merge_named("fs_read", &other.fs_read)?,
            fs_write: self.fs_write.merge_named("fs_write", &other.fs_write)?,
            slot_start: self.slot_start.merge_named("slot_start", &other.slot_start)?,
            leadership: self.leadership.merge_named("leadership", &other.leadership)?,
            forge: self.forge.merge_named("forge", &other.forge)?,
            block_gap: self.block_gap.merge_named("block_gap", &other.block_gap)?,
        })
    }
}

/// Block propagation distributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockProp {
    pub notice: Cdf,
    pub request: Cdf,
    pub fetched: Cdf,
    pub adopted: Cdf,
    pub announced: Cdf,
    pub sent: Cdf,
    pub prop_0_50: Cdf,
    pub prop_0_80: Cdf,
    pub prop_0_90: Cdf,
    pub prop_0_96: Cdf,
    pub prop_1_00: Cdf,
    pub block_size: Cdf,
}

impl MetricTable for BlockProp {
    fn category(&self) -> Category {
        Category::BlockProp
    }

    fn distribution(&self, field: &str) -> Option<&Cdf> {
        Some(match field {
            "notice" => &self.notice,
            "request" => &self.request,
            "fetched" => &self.fetched,
            "adopted" => &self.adopted,
            "announced" => &self.announced,
            "sent" => &self.sent,
            "prop_0_50" => &self.prop_0_50,
            "prop_0_80" => &self.prop_0_80,
            "prop_0_90" => &self.prop_0_90,
            "prop_0_96" => &self.prop_0_96,
            "prop_1_00" => &self.prop_1_00,
            "block_size" => &self.block_size,
            _ => return None,
        })
    }
}

impl BlockProp {
    /// Field-wise [`Cdf::merge`].
    pub fn merge(&self, other: &BlockProp) -> Result<BlockProp> {
        Ok(BlockProp {
            notice: self.notice.merge_named("notice", &other.notice)?,
            request: self.request.merge_named("request", &other.request)?,
            fetched: self.fetched.merge_named("fetched", &other.fetched)?,
            adopted: self.adopted.merge_named("adopted", &other.adopted)?,
            announced: self.announced.merge_named("announced", &other.announced)?,
            sent: self.sent.merge_named("sent", &other.sent)?,
            prop_0_50: self.prop_0_50.merge_named("prop_0_50", &other.prop_0_50)?,
            prop_0_80: self.prop_0_80.merge_named("prop_0_80", &other.prop_0_80)?,
            prop_0_90: self.prop_0_90.merge_named("prop_0_90", &other.prop_0_90)?,
            prop_0_96: self.prop_0_96.merge_named("prop_0_96", &other.prop_0_96)?,
            prop_1_00: self.prop_1_00.merge_named("prop_1_00", &other.prop_1_00)?,
            block_size: self.block_size.merge_named("block_size", &other.block_size)?,
        })
    }
}

/// Everything the report needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunData {
    pub meta: Metadata,
    pub summary: Summary,
    pub machperf: MachPerf,
    pub blockprop: BlockProp,
}

impl RunData {
    pub fn table(&self, category: Category) -> &dyn MetricTable {
        match category {
            Category::Summary => &self.summary,
            Category::MachPerf => &self.machperf,
            Category::BlockProp => &self.blockprop,
        }
    }

    pub fn tag(&self) -> &str {
        &self.meta.tag
    }
}

#[cfg(any(test, feature = "test-fixtures"))]
#[doc(hidden)]
pub mod fixtures {
    //! Run builders shared by unit and integration tests.

    use super::*;
    use crate::meta::{GeneratorProfile, Manifest};
    use chrono::{TimeZone, Utc};

    pub fn cdf(n: u64, c: f64) -> Cdf {
        Cdf::from_pairs(n, c, c / 10.0, &[(0.5, c), (0.9, c * 1.5)], c / 2.0, c * 2.0).unwrap()
    }

    pub fn machperf(scale: f64) -> MachPerf {
        MachPerf {
            cpu_process: cdf(100, 12.0 * scale),
            cpu_gc: cdf(100, 2.0 * scale),
            cpu_mutator: cdf(100, 10.0 * scale),
            rss: cdf(100, 8000.0 * scale),
            heap: cdf(100, 7000.0 * scale),
            alloc_rate: cdf(100, 300.0 * scale),
            net_read: cdf(100, 40.0 * scale),
            net_write: cdf(100, 41.0 * scale),
            fs_read: cdf(100, 1.0 * scale),
            fs_write: cdf(100, 5.0 * scale),
            slot_start: cdf(100, 0.01 * scale),
            leadership: cdf(100, 0.02 * scale),
            forge: cdf(100, 0.1 * scale),
            block_gap: cdf(100, 20.0 * scale),
        }
    }

    pub fn blockprop(scale: f64) -> BlockProp {
        BlockProp {
            notice: cdf(50, 0.3 * scale),
            request: cdf(50, 0.01 * scale),
            fetched: cdf(50, 0.2 * scale),
            adopted: cdf(50, 0.05 * scale),
            announced: cdf(50, 0.01 * scale),
            sent: cdf(50, 0.02 * scale),
            prop_0_50: cdf(50, 0.8 * scale),
            prop_0_80: cdf(50, 1.1 * scale),
            prop_0_90: cdf(50, 1.3 * scale),
            prop_0_96: cdf(50, 1.6 * scale),
            prop_1_00: cdf(50, 2.4 * scale),
            block_size: cdf(50, 64000.0 * scale),
        }
    }

    pub fn run(tag: &str, version: &str, script: Option<&str>, scale: f64) -> RunData {
        RunData {
            meta: Metadata {
                tag: tag.to_string(),
                batch: "nightly".to_string(),
                profile: "ci-bench".to_string(),
                era: "conway".to_string(),
                timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
                manifest: Manifest {
                    name: "cardano-node".to_string(),
                    branch: "master".to_string(),
                    revision: "0123abcd".to_string(),
                    version: version.to_string(),
                },
                generator: GeneratorProfile {
                    tps: 12.0,
                    tx_count: 10_000,
                    inputs_per_tx: 2,
                    outputs_per_tx: 2,
                    plutus_script: script.map(str::to_string),
                },
            },
            summary: Summary {
                hosts: 52,
                log_objects: 1_234_567,
                slots: 3600,
                blocks_forged: 180,
                tx_submitted: 10_000,
                duration_s: 3600.0,
                target_tps: 12.0,
            },
            machperf: machperf(scale),
            blockprop: blockprop(scale),
        }
    }
}
