pub mod builder;
pub mod record;
pub mod relocate;
pub mod scoring;

use crate::config::LocatorConfig;
use crate::dom::tree::DomTree;
use crate::error::LocatorError;
use crate::locator::record::LocatorRecord;
use crate::locator::relocate::{Candidate, Located, Relocator};
use crate::signals::classes::ClassFilter;
use crate::signals::extractor::{NodeSignals, SignalExtractor};
use crate::xpath::synthesizer::PathSynthesizer;

/// Entry point to the engine: describe an element, find it again.
///
/// Holds only configuration; every call is a pure function of the tree
/// passed to it.
#[derive(Debug, Clone)]
pub struct Locator {
    config: LocatorConfig,
    classes: ClassFilter,
}

impl Default for Locator {
    fn default() -> Self {
        Self {
            config: LocatorConfig::default(),
            classes: ClassFilter::default(),
        }
    }
}

impl Locator {
    pub fn new(config: LocatorConfig) -> Result<Self, LocatorError> {
        let classes = ClassFilter::new(&config.classes)?;
        Ok(Self { config, classes })
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    pub fn class_filter(&self) -> &ClassFilter {
        &self.classes
    }

    fn extractor(&self) -> SignalExtractor<'_> {
        SignalExtractor {
            attributes: &self.config.attributes,
            near_text: &self.config.near_text,
            classes: &self.classes,
        }
    }

    pub fn extract_signals<T: DomTree>(&self, tree: &T, node: T::Node) -> NodeSignals {
        self.extractor().extract(tree, node)
    }

    /// A verified structural path for `node`, or `None` when no stable path
    /// exists.
    pub fn generate_xpath<T: DomTree>(&self, tree: &T, node: T::Node) -> Option<String> {
        let extractor = self.extractor();
        PathSynthesizer { signals: &extractor }.generate(tree, node)
    }

    pub fn generate_locator<T: DomTree>(&self, tree: &T, node: T::Node) -> LocatorRecord {
        builder::build_record(&self.extractor(), tree, node)
    }

    /// Single-best relocation. `Ok(None)` means not found; `Err` only for
    /// records of an unsupported version.
    pub fn locate_node<T: DomTree>(
        &self,
        tree: &T,
        record: &LocatorRecord,
    ) -> Result<Option<Located<T::Node>>, LocatorError> {
        record.validate()?;
        let extractor = self.extractor();
        let relocator = Relocator {
            signals: &extractor,
            weights: &self.config.weights,
        };
        Ok(relocator.locate(tree, record))
    }

    /// Ranked candidates, best first, at most `limit`.
    pub fn locate_all_nodes<T: DomTree>(
        &self,
        tree: &T,
        record: &LocatorRecord,
        limit: usize,
    ) -> Result<Vec<Candidate<T::Node>>, LocatorError> {
        record.validate()?;
        let extractor = self.extractor();
        let relocator = Relocator {
            signals: &extractor,
            weights: &self.config.weights,
        };
        Ok(relocator.locate_all(tree, record, limit))
    }
}
