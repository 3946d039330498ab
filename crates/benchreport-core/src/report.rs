//! Report generation: assemble once, render each requested format.

use crate::context::{Assembler, ChartKeys, ReportIdentity};
use crate::data::RunData;
use crate::dictionary::MetricDictionary;
use crate::errors::Result;
use crate::field::FieldRegistry;
use crate::render::{OutputFormat, PlaceholderEngine, Rendered, Renderer, TemplateEngine, TemplateSet};
use crate::section::{analysis_sections, check_layout, summary_section, SectionSet, SectionSpec};

/// Owns the catalogs and layout of a report and drives the pipeline.
#[derive(Debug, Clone)]
pub struct ReportGenerator<E = PlaceholderEngine> {
    registry: FieldRegistry,
    dictionary: MetricDictionary,
    renderer: Renderer<E>,
    summary: SectionSpec,
    analyses: Vec<SectionSpec>,
    chart_keys: ChartKeys,
    templates: TemplateSet,
}

impl ReportGenerator<PlaceholderEngine> {
    /// Built-in registry, a dictionary derived from it and the default layout.
    pub fn standard() -> Self {
        let registry = FieldRegistry::standard();
        let dictionary = MetricDictionary::from_registry(&registry);
        Self::new(registry, dictionary, PlaceholderEngine)
    }
}

impl<E: TemplateEngine> ReportGenerator<E> {
    pub fn new(registry: FieldRegistry, dictionary: MetricDictionary, engine: E) -> Self {
        Self {
            registry,
            dictionary,
            renderer: Renderer::new(engine),
            summary: summary_section(),
            analyses: analysis_sections(),
            chart_keys: ChartKeys::default(),
            templates: TemplateSet::default(),
        }
    }

    pub fn with_sections(mut self, summary: SectionSpec, analyses: Vec<SectionSpec>) -> Self {
        self.summary = summary;
        self.analyses = analyses;
        self
    }

    pub fn with_chart_keys(mut self, chart_keys: ChartKeys) -> Self {
        self.chart_keys = chart_keys;
        self
    }

    pub fn with_templates(mut self, templates: TemplateSet) -> Self {
        self.templates = templates;
        self
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn dictionary(&self) -> &MetricDictionary {
        &self.dictionary
    }

    /// Render `base` against `comparisons` in every requested format.
    ///
    /// Formats render in the order given. The first failure aborts the whole
    /// batch and nothing is returned for formats that already succeeded.
    /// Section layouts with clashing `data_ref` or `target_file` values are
    /// rejected before any run data is read.
    pub fn generate(
        &self,
        identity: &ReportIdentity,
        base: &RunData,
        comparisons: &[RunData],
        formats: &[OutputFormat],
    ) -> Result<Vec<Rendered>> {
        check_layout(std::iter::once(&self.summary).chain(&self.analyses))?;

        let context = Assembler::new(&self.registry, &self.dictionary)
            .with_chart_keys(self.chart_keys.clone())
            .assemble(identity, base, comparisons, &self.summary, &self.analyses)?;

        let runs: Vec<&RunData> = std::iter::once(base).chain(comparisons).collect();
        let sections = std::iter::once(&self.summary)
            .chain(&self.analyses)
            .map(|spec| spec.build_runs(&self.registry, &runs))
            .collect::<Result<Vec<SectionSet>>>()?;

        formats
            .iter()
            .map(|&format| {
                self.renderer
                    .render(format, self.templates.get(format), &context, &sections)
            })
            .collect()
    }
}
