//! End-to-end report generation over the public API.

use std::collections::BTreeMap;

use benchreport_core::{
    render::Table, Assembler, Category, FieldSelector, MetricDef, MetricDictionary, OutputFormat,
    PlaceholderEngine, Renderer, ReportError, ReportGenerator, ReportIdentity, SectionSpec,
    TemplateSet,
};
use benchreport_core::data::fixtures::run;
use chrono::{TimeZone, Utc};

fn identity() -> ReportIdentity {
    ReportIdentity::new("perf-team", "0.4.0").at(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Row labels of the table carrying `caption` in an org rendering.
fn org_labels(text: &str, caption: &str) -> Vec<String> {
    let start = text
        .find(&format!("#+CAPTION: {}\n", caption))
        .expect("caption present");
    text[start..]
        .lines()
        .skip(4)
        .take_while(|l| l.starts_with('|'))
        .map(|l| l.trim_matches('|').split('|').next().unwrap_or("").trim().to_string())
        .collect()
}

/// Row labels of the table carrying `caption` in a LaTeX rendering.
fn latex_labels(text: &str, caption: &str) -> Vec<String> {
    let start = text
        .find(&format!("\\caption{{{}}}\n", caption))
        .expect("caption present");
    text[start..]
        .lines()
        .skip_while(|l| *l != "\\hline")
        .skip(3)
        .take_while(|l| *l != "\\hline")
        .map(|l| l.split(" & ").next().unwrap_or("").to_string())
        .collect()
}

#[test]
fn report_has_matching_row_labels_across_formats() {
    init_tracing();
    let base = run("base", "10.2.0", Some("Loop"), 1.0);
    let comps = vec![
        run("prev", "10.1.1", Some("Loop"), 1.1),
        run("older", "10.1.0", Some("Loop"), 0.9),
    ];

    let out = ReportGenerator::standard()
        .generate(&identity(), &base, &comps, &[OutputFormat::Org, OutputFormat::Latex])
        .unwrap();
    let (org, latex) = (&out[0].text, &out[1].text);

    for caption in ["Resource Usage", "Forging", "Peer propagation", "End-to-end propagation"] {
        let o = org_labels(org, caption);
        let l = latex_labels(latex, caption);
        assert!(!o.is_empty(), "{caption}");
        assert_eq!(o, l, "{caption}");
    }
}

#[test]
fn org_labels_match_section_declaration() {
    let generator = ReportGenerator::standard();
    let base = run("base", "10.2.0", Some("Loop"), 1.0);
    let comps = vec![run("prev", "10.1.1", Some("Loop"), 1.0)];

    let out = generator
        .generate(&identity(), &base, &comps, &[OutputFormat::Org])
        .unwrap();

    let sections = benchreport_core::analysis_sections();
    let spec = &sections[1];
    let declared: Vec<String> = spec
        .fields(generator.registry())
        .iter()
        .map(|f| f.short_label().to_string())
        .collect();
    assert_eq!(org_labels(&out[0].text, "Forging"), declared);
}

#[test]
fn repeated_generation_is_byte_identical() {
    let base = run("base", "10.2.0", Some("Loop"), 1.0);
    let comps = vec![run("prev", "10.1.1", Some("Loop"), 1.3)];
    let generator = ReportGenerator::standard();

    let first = generator
        .generate(&identity(), &base, &comps, &OutputFormat::ALL)
        .unwrap();
    let second = generator
        .generate(&identity(), &base, &comps, &OutputFormat::ALL)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn zero_comparison_runs_produce_nothing() {
    let base = run("base", "10.2.0", Some("Loop"), 1.0);
    let err = ReportGenerator::standard()
        .generate(&identity(), &base, &[], &OutputFormat::ALL)
        .unwrap_err();
    assert!(matches!(err, ReportError::EmptyRunSet { .. }));
}

#[test]
fn template_errors_surface_verbatim() {
    let base = run("base", "10.2.0", Some("Loop"), 1.0);
    let comps = vec![run("prev", "10.1.1", Some("Loop"), 1.0)];
    let generator = ReportGenerator::standard().with_templates(
        TemplateSet::default().with_source(OutputFormat::Text, "Report {{ report.title"),
    );

    let err = generator
        .generate(&identity(), &base, &comps, &[OutputFormat::Text])
        .unwrap_err();
    match err {
        ReportError::TemplateError { format, message } => {
            assert_eq!(format, "text");
            assert_eq!(message, "unterminated tag at byte 7");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn undocumented_metric_fails_generation() {
    let base = run("base", "10.2.0", Some("Loop"), 1.0);
    let comps = vec![run("prev", "10.1.1", Some("Loop"), 1.0)];
    let generator = ReportGenerator::standard();
    let mut entries = BTreeMap::new();
    for key in ["hosts", "rss"] {
        entries.insert(
            key.to_string(),
            MetricDef {
                short_desc: key.to_string(),
                description: String::new(),
                unit: String::new(),
                precision: 0,
                kind: "instant".to_string(),
            },
        );
    }
    let generator = ReportGenerator::new(
        generator.registry().clone(),
        MetricDictionary::new(entries),
        PlaceholderEngine,
    );

    let err = generator
        .generate(&identity(), &base, &comps, &[OutputFormat::Org])
        .unwrap_err();
    assert_eq!(err.kind(), "MissingMetricDefinition");
}

#[test]
fn empty_selector_renders_empty_table() {
    let generator = ReportGenerator::standard();
    let base = run("base", "10.2.0", Some("Loop"), 1.0);
    let comps = vec![run("prev", "10.1.1", Some("Loop"), 1.0)];
    let empty = SectionSpec::new("Nothing", "nothing", Category::MachPerf, FieldSelector::none());

    let context = Assembler::new(generator.registry(), generator.dictionary())
        .assemble(
            &identity(),
            &base,
            &comps,
            &benchreport_core::summary_section(),
            std::slice::from_ref(&empty),
        )
        .unwrap();
    let set = empty
        .build_runs(generator.registry(), &[&base, &comps[0]])
        .unwrap();
    assert!(Table::transpose(&set).unwrap().rows.is_empty());

    let out = Renderer::new(PlaceholderEngine)
        .render(OutputFormat::Text, "{{ tables.nothing }}", &context, &[set])
        .unwrap();
    assert_eq!(out.text, "Nothing\n=======\nMetric  Average (base)  Average (prev)\n");
}
