//! Persona-driven analysis across documents.

use std::path::Path;

use rayon::prelude::*;

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::model::{AnalysisResult, DocumentSection, SkippedDocument};
use crate::parser::{DocumentSource, PdfDocument};
use crate::structure::StructureExtractor;

use super::content::SectionAssembler;
use super::embed::Embedder;
use super::ranker::RelevanceRanker;

/// Extracts sections from every document and ranks them for a persona.
///
/// Per-document work runs in parallel when the config allows it; the
/// ranking itself is a single step over all collected sections.
#[derive(Debug, Clone)]
pub struct PersonaAnalyzer<E> {
    embedder: E,
    assembler: SectionAssembler,
}

type Extracted = std::result::Result<Vec<DocumentSection>, SkippedDocument>;

impl<E: Embedder> PersonaAnalyzer<E> {
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            assembler: SectionAssembler::new(),
        }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Analyze PDF files.
    ///
    /// Files that cannot be opened are skipped and reported in
    /// [`AnalysisResult::skipped_documents`].
    pub fn analyze_paths<P: AsRef<Path> + Sync>(
        &self,
        paths: &[P],
        config: &AnalysisConfig,
    ) -> Result<AnalysisResult> {
        check_request(config, paths.len())?;

        let extractor = StructureExtractor::new(config.structure.clone());
        let names: Vec<String> = paths.iter().map(|p| file_name(p.as_ref())).collect();

        let extract = |(path, name): (&P, &String)| -> Extracted {
            let path = path.as_ref();
            match PdfDocument::open(path) {
                Ok(doc) => Ok(self.document_sections(name, &doc, &extractor)),
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    Err(SkippedDocument {
                        document: name.clone(),
                        reason: e.to_string(),
                    })
                }
            }
        };

        let extracted: Vec<Extracted> = if config.parallel {
            paths.par_iter().zip(names.par_iter()).map(extract).collect()
        } else {
            paths.iter().zip(names.iter()).map(extract).collect()
        };

        self.finish(&names, extracted, config)
    }

    /// Analyze already opened documents, given with their file names.
    pub fn analyze_sources<S, D>(&self, docs: &[(S, D)], config: &AnalysisConfig) -> Result<AnalysisResult>
    where
        S: AsRef<str> + Sync,
        D: DocumentSource + Sync,
    {
        check_request(config, docs.len())?;

        let extractor = StructureExtractor::new(config.structure.clone());
        let names: Vec<String> = docs.iter().map(|(name, _)| name.as_ref().to_string()).collect();

        let extract =
            |(name, doc): &(S, D)| -> Extracted { Ok(self.document_sections(name.as_ref(), doc, &extractor)) };

        let extracted: Vec<Extracted> = if config.parallel {
            docs.par_iter().map(extract).collect()
        } else {
            docs.iter().map(extract).collect()
        };

        self.finish(&names, extracted, config)
    }

    /// Sections of one document: every heading paired with its body text.
    pub fn document_sections<D: DocumentSource + ?Sized>(
        &self,
        document_name: &str,
        doc: &D,
        extractor: &StructureExtractor,
    ) -> Vec<DocumentSection> {
        let page_count = doc.page_count();
        let mut page_texts: Vec<Option<String>> = vec![None; page_count];

        let sections: Vec<_> = extractor
            .headings(doc)
            .iter()
            .filter(|h| h.page_number >= 1 && h.page_number <= page_count)
            .map(|heading| {
                let index = heading.page_number - 1;
                let text = page_texts[index].get_or_insert_with(|| doc.page_text(index));
                self.assembler.section(document_name, heading, text)
            })
            .collect();

        log::info!("{}: {} sections", document_name, sections.len());
        sections
    }

    fn finish(
        &self,
        names: &[String],
        extracted: Vec<Extracted>,
        config: &AnalysisConfig,
    ) -> Result<AnalysisResult> {
        let mut sections = Vec::new();
        let mut skipped = Vec::new();
        for outcome in extracted {
            match outcome {
                Ok(found) => sections.extend(found),
                Err(skip) => skipped.push(skip),
            }
        }

        let ranker = RelevanceRanker::new(&self.embedder)
            .with_top_k(config.top_k)
            .with_threshold(config.relevance_threshold);
        let ranked = ranker.rank(&config.query(), sections)?;
        log::info!(
            "Ranked {} sections with {} ({} documents skipped)",
            ranked.len(),
            self.embedder.name(),
            skipped.len()
        );

        let mut result =
            AnalysisResult::from_ranked(names, &config.persona, &config.job_to_be_done, &ranked);
        result.skipped_documents = skipped;
        Ok(result)
    }
}

fn check_request(config: &AnalysisConfig, document_count: usize) -> Result<()> {
    config.validate()?;
    if document_count == 0 {
        return Err(Error::Configuration(
            "at least one document is required".to_string(),
        ));
    }
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
