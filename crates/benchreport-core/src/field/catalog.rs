use super::{Category, Field, FieldGroup, FieldSpec};
use crate::cdf::Stat;

const SUMMARY: &[Category] = &[Category::Summary];
const MACHPERF: &[Category] = &[Category::MachPerf];
const BLOCKPROP: &[Category] = &[Category::BlockProp];

fn run(name: &str, label: &str, desc: &str) -> FieldSpec {
    FieldSpec::new(name, label, desc)
        .group(FieldGroup::Run)
        .applies_to(SUMMARY)
}

fn resource(name: &str, label: &str, desc: &str, unit: &str) -> FieldSpec {
    FieldSpec::new(name, label, desc)
        .unit(unit)
        .group(FieldGroup::Resource)
        .applies_to(MACHPERF)
}

fn forging(name: &str, label: &str, desc: &str, unit: &str) -> FieldSpec {
    FieldSpec::new(name, label, desc)
        .unit(unit)
        .precision(3)
        .group(FieldGroup::Forging)
        .applies_to(MACHPERF)
}

fn peer(name: &str, label: &str, desc: &str) -> FieldSpec {
    FieldSpec::new(name, label, desc)
        .unit("s")
        .precision(3)
        .group(FieldGroup::PeerPropagation)
        .applies_to(BLOCKPROP)
}

fn adoption(name: &str, label: &str, share: &str) -> FieldSpec {
    FieldSpec::new(
        name,
        label,
        format!("Time until a block is adopted by {} of the cluster", share),
    )
    .unit("s")
    .precision(3)
    .group(FieldGroup::EndToEnd)
    .applies_to(BLOCKPROP)
}

pub(super) fn standard_fields() -> Vec<Field> {
    vec![
        // Summary
        run("hosts", "Machines", "Number of cluster machines in the run")
            .width(4)
            .instant(),
        run("log_objects", "Log objects", "Total log objects analysed")
            .width(10)
            .instant(),
        run("slots", "Slots", "Slots covered by the analysis window")
            .width(6)
            .instant(),
        run("blocks_forged", "Blocks", "Blocks forged during the run")
            .width(6)
            .instant(),
        run("tx_submitted", "Tx submitted", "Transactions submitted by the generator")
            .width(8)
            .instant(),
        run("duration_s", "Duration", "Wall-clock run duration")
            .unit("s")
            .width(6)
            .instant(),
        run("target_tps", "Target TPS", "Generator target transactions per second")
            .precision(1)
            .width(5)
            .instant(),
        // Resource usage
        resource("cpu_process", "CPU process", "Process CPU usage, share of one core", "%")
            .precision(1)
            .width(5)
            .distributional(),
        resource("cpu_gc", "CPU GC", "CPU spent in garbage collection", "%")
            .precision(1)
            .width(5)
            .distributional(),
        resource("cpu_mutator", "CPU mutator", "CPU spent in the mutator", "%")
            .precision(1)
            .width(5)
            .distributional(),
        resource("rss", "RSS", "Resident set size", "MB")
            .width(6)
            .distributional(),
        resource("heap", "Heap", "Runtime heap size", "MB")
            .width(6)
            .distributional(),
        resource("alloc_rate", "Alloc rate", "Allocation rate", "MB/s")
            .width(6)
            .distributional(),
        resource("net_read", "Net read", "Network read rate", "kB/s")
            .width(6)
            .distributional(),
        resource("net_write", "Net write", "Network write rate", "kB/s")
            .width(6)
            .distributional(),
        resource("fs_read", "FS read", "Filesystem read rate", "kB/s")
            .width(6)
            .distributional(),
        resource("fs_write", "FS write", "Filesystem write rate", "kB/s")
            .width(6)
            .distributional(),
        // Forging
        forging(
            "slot_start",
            "Slot start",
            "Delay from slot start to leadership check start",
            "s",
        )
        .width(5)
        .distributional(),
        forging("leadership", "Leadership check", "Leadership check duration", "s")
            .width(5)
            .distributional(),
        forging("forge", "Forge", "Block forging time after a won leadership check", "s")
            .width(5)
            .distributional(),
        forging("block_gap", "Block gap", "Slots between consecutive forged blocks", "slots")
            .precision(1)
            .width(5)
            .distributional(),
        // Peer propagation
        peer("notice", "Noticed", "Header first noticed by a peer after forging")
            .width(5)
            .distributional(),
        peer("request", "Requested", "Block fetch requested after the header was noticed")
            .width(5)
            .distributional(),
        peer("fetched", "Fetched", "Block body fetched after the request")
            .width(5)
            .distributional(),
        peer("adopted", "Adopted", "Block adopted into the peer's chain after fetch")
            .width(5)
            .distributional(),
        peer("announced", "Announced", "Block announced onward after adoption")
            .width(5)
            .distributional(),
        peer("sent", "Sent", "Block sent onward after announcement")
            .width(5)
            .distributional(),
        // End-to-end propagation
        adoption("prop_0_50", "Adoption 0.50", "half").width(5).distributional(),
        adoption("prop_0_80", "Adoption 0.80", "80 percent").width(5).distributional(),
        adoption("prop_0_90", "Adoption 0.90", "90 percent").width(5).distributional(),
        adoption("prop_0_96", "Adoption 0.96", "96 percent").width(5).distributional(),
        adoption("prop_1_00", "Adoption 1.00", "all").width(5).distributional(),
        FieldSpec::new("block_size", "Largest block", "Size of the largest forged block")
            .unit("bytes")
            .group(FieldGroup::EndToEnd)
            .applies_to(BLOCKPROP)
            .width(7)
            .distributional()
            .with_stat(Stat::High),
    ]
}
