//! Candidate table regions and their accumulated collection.

use crate::geometry::BBox;

/// Identity and dimensions of the page a candidate was found on.
///
/// Dimensions travel with every candidate so ground truth recorded at a
/// different resolution can be rescaled without the page itself.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageRef {
    /// Page number (1-indexed).
    pub number: usize,
    /// Page width.
    pub width: f64,
    /// Page height.
    pub height: f64,
}

impl PageRef {
    pub fn new(number: usize, width: f64, height: f64) -> Self {
        Self {
            number,
            width,
            height,
        }
    }
}

/// Which detector proposed a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CandidateSource {
    /// A table-like text block from the layout parser.
    Alignment,
    /// A rectangle reconstructed from ruling lines.
    Lines,
}

/// A candidate table region with its feature vector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    /// Page the region lies on.
    pub page: PageRef,
    /// Region in the page's coordinate space.
    pub bbox: BBox,
    /// Detector that proposed the region.
    pub source: CandidateSource,
    /// Alignment features followed by line features.
    pub features: Vec<f64>,
}

impl Candidate {
    /// The candidate as `(page_number, page_width, page_height, y0, x0, y1, x1)`.
    pub fn to_tuple(&self) -> (usize, f64, f64, f64, f64, f64, f64) {
        let (y0, x0, y1, x1) = self.bbox.to_yx();
        (
            self.page.number,
            self.page.width,
            self.page.height,
            y0,
            x0,
            y1,
            x1,
        )
    }
}

/// Immutable, ordered collection of candidates across pages.
///
/// Pages appear in page-number order; within a page, alignment candidates
/// come before line candidates.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one page's candidates, returning the grown set.
    pub fn with_page(mut self, page_candidates: Vec<Candidate>) -> Self {
        self.candidates.extend(page_candidates);
        self
    }

    /// All candidates in order.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Consume the set, returning the candidates.
    pub fn into_candidates(self) -> Vec<Candidate> {
        self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Candidate regions as tuples, in order.
    pub fn boxes(&self) -> Vec<(usize, f64, f64, f64, f64, f64, f64)> {
        self.candidates.iter().map(Candidate::to_tuple).collect()
    }

    /// Feature matrix; row *i* belongs to candidate *i*.
    pub fn feature_matrix(&self) -> Vec<Vec<f64>> {
        self.candidates.iter().map(|c| c.features.clone()).collect()
    }

    /// Candidates found on `page_number`.
    pub fn on_page(&self, page_number: usize) -> impl Iterator<Item = &Candidate> {
        self.candidates
            .iter()
            .filter(move |c| c.page.number == page_number)
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
