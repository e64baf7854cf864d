//! Page orchestration: from a document source to a [`CandidateSet`].
//!
//! Each page is normalized, searched for alignment and ruling-line
//! candidates, and assembled into feature vectors. Per-page batches are
//! folded in page-number order; the `parallel` feature processes pages
//! concurrently and merges them back in the same order.

use std::collections::BTreeMap;

use tablescout_core::{
    Candidate, CandidateSet, ConfigError, ExtractResult, ExtractWarning, FontStats, GroundTruth,
    LayoutSettings, LineSettings, PageElements, PageRef, RulingFeatures, TextAlignmentFeatures,
    detect_rectangles, label_candidates,
};

use crate::alignment::{AlignmentDetector, LayoutParser, TextBlockParser};
use crate::assembler::FeatureAssembler;
use crate::error::ExtractError;
use crate::source::{DocumentSource, Normalizer, RawPage, ScaleNormalizer};

/// Settings for a full extraction run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ExtractSettings {
    /// Ruling-line geometry settings.
    pub lines: LineSettings,
    /// Text layout settings.
    pub layout: LayoutSettings,
    /// Factor applied to all page geometry during normalization. Default: 1.0.
    pub scale: f64,
}

impl Default for ExtractSettings {
    fn default() -> Self {
        Self {
            lines: LineSettings::default(),
            layout: LayoutSettings::default(),
            scale: 1.0,
        }
    }
}

impl ExtractSettings {
    /// Validate every nested setting and the scale.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lines.validate()?;
        self.layout.validate()?;
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        Ok(())
    }
}

/// Normalized content retained for one page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CachedPage {
    pub page: PageRef,
    pub elements: PageElements,
    pub font_stats: FontStats,
}

/// Normalized pages of an extraction run, keyed by page number.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageCache {
    pages: BTreeMap<usize, CachedPage>,
}

impl PageCache {
    pub fn get(&self, page_number: usize) -> Option<&CachedPage> {
        self.pages.get(&page_number)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Cached pages in page-number order.
    pub fn iter(&self) -> impl Iterator<Item = &CachedPage> {
        self.pages.values()
    }

    fn insert(&mut self, cached: CachedPage) {
        self.pages.insert(cached.page.number, cached);
    }
}

/// Everything an extraction run produces.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extraction {
    pub candidates: CandidateSet,
    pub pages: PageCache,
}

impl Extraction {
    /// Label the candidates against `ground_truth` with the default threshold.
    pub fn labels(&self, ground_truth: &GroundTruth) -> Vec<u8> {
        label_candidates(&self.candidates, ground_truth)
    }
}

/// Output of processing a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBatch {
    pub candidates: Vec<Candidate>,
    pub cached: CachedPage,
    pub warnings: Vec<ExtractWarning>,
}

/// Drives candidate extraction over the pages of a document.
///
/// # Example
///
/// ```
/// use tablescout::{CandidateExtractor, ExtractSettings, RawPage, Segment};
///
/// let page = RawPage::new(200.0, 200.0).with_segments(vec![
///     Segment::new(0.0, 0.0, 100.0, 0.0),
///     Segment::new(0.0, 100.0, 100.0, 100.0),
///     Segment::new(0.0, 0.0, 0.0, 100.0),
///     Segment::new(100.0, 0.0, 100.0, 100.0),
/// ]);
/// let extractor = CandidateExtractor::new(ExtractSettings::default()).unwrap();
/// let result = extractor.extract(&vec![page]).unwrap();
/// assert_eq!(result.value.candidates.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CandidateExtractor<N = ScaleNormalizer, P = TextBlockParser> {
    settings: ExtractSettings,
    normalizer: N,
    detector: AlignmentDetector<P>,
    assembler: FeatureAssembler,
}

impl CandidateExtractor {
    /// Extractor with the built-in normalizer and layout parser.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Config`] if `settings` fail validation.
    pub fn new(settings: ExtractSettings) -> Result<Self, ExtractError> {
        settings.validate()?;
        let parser = TextBlockParser::new(settings.layout.clone());
        Ok(Self::from_parts(settings, ScaleNormalizer, parser))
    }
}

impl<N, P: LayoutParser> CandidateExtractor<N, P> {
    fn from_parts(settings: ExtractSettings, normalizer: N, parser: P) -> Self {
        let assembler = FeatureAssembler::new(
            TextAlignmentFeatures::new(settings.layout.align_tolerance),
            RulingFeatures::new(settings.lines.clone()),
        );
        let detector = AlignmentDetector::new(parser, assembler.alignment_width());
        Self {
            settings,
            normalizer,
            detector,
            assembler,
        }
    }

    /// Replace the layout parser.
    pub fn with_parser<Q: LayoutParser>(self, parser: Q) -> CandidateExtractor<N, Q> {
        CandidateExtractor::from_parts(self.settings, self.normalizer, parser)
    }

    /// Replace the page normalizer.
    pub fn with_normalizer<M>(self, normalizer: M) -> CandidateExtractor<M, P> {
        CandidateExtractor {
            settings: self.settings,
            normalizer,
            detector: self.detector,
            assembler: self.assembler,
        }
    }

    pub fn settings(&self) -> &ExtractSettings {
        &self.settings
    }

    /// Process one raw page as page `page_number` (1-indexed).
    ///
    /// A failing layout parser only drops the alignment candidates and adds
    /// a warning to the batch.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::FeatureRowMismatch`] or
    /// [`ExtractError::FeatureWidthMismatch`] if feature rows and boxes
    /// disagree.
    pub fn process_page<R>(&self, page_number: usize, raw: &R) -> Result<PageBatch, ExtractError>
    where
        N: Normalizer<R>,
    {
        let (elements, font_stats) = self.normalizer.normalize(raw, self.settings.scale);
        let page = PageRef::new(page_number, elements.width, elements.height);

        let outcome = self.detector.detect(page_number, &elements, &font_stats);
        let warnings: Vec<ExtractWarning> = outcome
            .failure()
            .map(|failure| failure.to_warning(page_number))
            .into_iter()
            .collect();
        let (alignment_boxes, alignment_rows) = outcome.into_parts();
        let line_boxes = detect_rectangles(&elements.segments, &self.settings.lines);

        tracing::debug!(
            "Page {}: {} alignment candidates, {} line candidates",
            page_number,
            alignment_boxes.len(),
            line_boxes.len()
        );

        let candidates = self.assembler.assemble(
            page,
            &alignment_boxes,
            alignment_rows,
            &line_boxes,
            &elements,
            &font_stats,
        )?;

        Ok(PageBatch {
            candidates,
            cached: CachedPage {
                page,
                elements,
                font_stats,
            },
            warnings,
        })
    }

    /// Extract candidates from every page of `source`, in page order.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`ExtractError`]; no partial result is
    /// returned.
    pub fn extract<S>(&self, source: &S) -> Result<ExtractResult<Extraction>, ExtractError>
    where
        S: DocumentSource + ?Sized,
        N: Normalizer<S::Page>,
    {
        let batches = (0..source.page_count()).map(|index| {
            let raw = source.page(index)?;
            self.process_page(index + 1, &raw)
        });
        fold_batches(batches)
    }

    /// Like [`extract`](Self::extract), with pages processed concurrently
    /// on the rayon thread pool. The result is identical to sequential
    /// extraction.
    #[cfg(feature = "parallel")]
    pub fn extract_parallel<S>(&self, source: &S) -> Result<ExtractResult<Extraction>, ExtractError>
    where
        S: DocumentSource + Sync + ?Sized,
        N: Normalizer<S::Page> + Sync,
        P: Sync,
    {
        use rayon::prelude::*;

        let batches: Vec<Result<PageBatch, ExtractError>> = (0..source.page_count())
            .into_par_iter()
            .map(|index| {
                let raw = source.page(index)?;
                self.process_page(index + 1, &raw)
            })
            .collect();
        fold_batches(batches)
    }
}

/// Fold per-page batches, in the order given, into one result.
fn fold_batches<I>(batches: I) -> Result<ExtractResult<Extraction>, ExtractError>
where
    I: IntoIterator<Item = Result<PageBatch, ExtractError>>,
{
    let mut pages = PageCache::default();
    let mut warnings = Vec::new();
    let candidates = batches
        .into_iter()
        .try_fold(CandidateSet::new(), |set, batch| {
            let batch = batch?;
            warnings.extend(batch.warnings);
            pages.insert(batch.cached);
            Ok::<_, ExtractError>(set.with_page(batch.candidates))
        })?;

    tracing::info!(
        "Extracted {} candidates from {} pages ({} warnings)",
        candidates.len(),
        pages.len(),
        warnings.len()
    );

    Ok(ExtractResult::with_warnings(
        Extraction { candidates, pages },
        warnings,
    ))
}

/// Extract candidates from raw pages with default settings.
pub fn extract_candidates<S>(source: &S) -> Result<ExtractResult<Extraction>, ExtractError>
where
    S: DocumentSource<Page = RawPage> + ?Sized,
{
    CandidateExtractor::new(ExtractSettings::default())?.extract(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablescout_core::{BBox, ExtractWarningCode, LayoutError, Segment};

    use crate::alignment::ParsedLayout;

    fn square(x0: f64, top: f64, x1: f64, bottom: f64) -> Vec<Segment> {
        vec![
            Segment::new(x0, top, x1, top),
            Segment::new(x0, bottom, x1, bottom),
            Segment::new(x0, top, x0, bottom),
            Segment::new(x1, top, x1, bottom),
        ]
    }

    #[test]
    fn settings_validation() {
        assert!(ExtractSettings::default().validate().is_ok());
        let bad_scale = ExtractSettings {
            scale: 0.0,
            ..ExtractSettings::default()
        };
        assert_eq!(bad_scale.validate(), Err(ConfigError::InvalidScale(0.0)));
        let mut bad_tolerance = ExtractSettings::default();
        bad_tolerance.lines.snap_tolerance = -1.0;
        assert!(matches!(
            CandidateExtractor::new(bad_tolerance),
            Err(ExtractError::Config(ConfigError::InvalidTolerance { .. }))
        ));
    }

    #[test]
    fn process_page_tags_page_ref() {
        let extractor = CandidateExtractor::new(ExtractSettings::default()).unwrap();
        let raw = RawPage::new(300.0, 400.0).with_segments(square(10.0, 10.0, 110.0, 60.0));
        let batch = extractor.process_page(7, &raw).unwrap();
        assert_eq!(batch.candidates.len(), 1);
        assert_eq!(batch.candidates[0].page, PageRef::new(7, 300.0, 400.0));
        assert_eq!(batch.candidates[0].bbox, BBox::new(10.0, 10.0, 110.0, 60.0));
        assert_eq!(batch.cached.page.number, 7);
        // no text on the page
        assert_eq!(batch.warnings.len(), 1);
    }

    #[test]
    fn scale_applies_to_candidates() {
        let settings = ExtractSettings {
            scale: 2.0,
            ..ExtractSettings::default()
        };
        let extractor = CandidateExtractor::new(settings).unwrap();
        let raw = RawPage::new(100.0, 100.0).with_segments(square(0.0, 0.0, 50.0, 50.0));
        let batch = extractor.process_page(1, &raw).unwrap();
        assert_eq!(batch.candidates[0].to_tuple(), (1, 200.0, 200.0, 0.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn custom_parser_warning_is_recorded() {
        let failing = |_: &PageElements, _: &FontStats| -> Result<ParsedLayout, LayoutError> {
            Err(LayoutError::Unsupported("rotated page".to_string()))
        };
        let extractor = CandidateExtractor::new(ExtractSettings::default())
            .unwrap()
            .with_parser(failing);
        let pages = vec![
            RawPage::new(200.0, 200.0).with_segments(square(0.0, 0.0, 100.0, 100.0)),
            RawPage::new(200.0, 200.0),
        ];
        let result = extractor.extract(&pages).unwrap();
        assert_eq!(result.value.candidates.len(), 1);
        assert_eq!(result.warnings.len(), 2);
        assert!(
            result
                .warnings
                .iter()
                .all(|w| w.code == ExtractWarningCode::LayoutParserFailed)
        );
        assert_eq!(result.warnings[1].page, Some(2));
        assert_eq!(result.value.pages.len(), 2);
    }

    #[test]
    fn empty_document() {
        let result = extract_candidates(&Vec::<RawPage>::new()).unwrap();
        assert!(result.value.candidates.is_empty());
        assert!(result.value.pages.is_empty());
        assert!(result.is_clean());
    }

    #[test]
    fn page_cache_keeps_normalized_pages() {
        let pages = vec![RawPage::new(100.0, 100.0), RawPage::new(50.0, 80.0)];
        let result = extract_candidates(&pages).unwrap();
        let cache = &result.value.pages;
        assert_eq!(cache.get(2).map(|c| c.elements.height), Some(80.0));
        assert!(cache.get(3).is_none());
        let numbers: Vec<usize> = cache.iter().map(|c| c.page.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }
}
