//! Deep-link index chunks.
//!
//! The viewer restores the expanded state of the tree from a URL without
//! walking the whole tree. Every href is mapped to its [`Position`]; the
//! map is sorted by href and split into chunks (`navtreeindex0.js`,
//! `navtreeindex1.js`, ...). `NAVTREEINDEX` lists the first key of every
//! chunk so the viewer can pick the one chunk to load.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::href::Href;
use crate::node::{NavIndex, NavTree, Position};

/// Number of entries per chunk used by the generator.
pub const DEFAULT_CHUNK_SIZE: usize = 250;

/// One `navtreeindexN.js` map, sorted by href.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IndexChunk {
    entries: Vec<(String, Position)>,
}

impl IndexChunk {
    /// Create a chunk from entries, sorting them by href.
    ///
    /// When an href appears twice, the first occurrence wins.
    #[must_use]
    pub fn new(entries: Vec<(String, Position)>) -> Self {
        let mut map = BTreeMap::new();
        for (href, position) in entries {
            map.entry(href).or_insert(position);
        }
        Self {
            entries: map.into_iter().collect(),
        }
    }

    /// Entries sorted by href.
    #[must_use]
    pub fn entries(&self) -> &[(String, Position)] {
        &self.entries
    }

    /// Smallest href in the chunk.
    #[must_use]
    pub fn first_key(&self) -> Option<&str> {
        self.entries.first().map(|(href, _)| href.as_str())
    }

    /// Position stored for `href`.
    #[must_use]
    pub fn get(&self, href: &str) -> Option<&Position> {
        self.entries
            .binary_search_by(|(key, _)| key.as_str().cmp(href))
            .ok()
            .map(|i| &self.entries[i].1)
    }
}

/// Result of [`IndexChunks::locate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Located {
    /// Chunk the entry was found in.
    pub chunk: usize,
    /// Key that matched (the href itself, or its page when only the page
    /// is indexed).
    pub key: String,
    /// Position of the matched node.
    pub position: Position,
}

/// All index chunks of one navigation tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IndexChunks {
    chunks: Vec<IndexChunk>,
}

impl IndexChunks {
    /// Build chunks for every linked node of `tree`.
    ///
    /// A `chunk_size` of 0 is treated as 1.
    #[must_use]
    pub fn build(tree: &NavTree, chunk_size: usize) -> Self {
        let mut map: BTreeMap<&str, Position> = BTreeMap::new();
        for entry in tree.walk() {
            if let Some(href) = entry.node.href.as_deref() {
                map.entry(href).or_insert(entry.position);
            }
        }

        let entries: Vec<(String, Position)> = map
            .into_iter()
            .map(|(href, position)| (href.to_owned(), position))
            .collect();
        let chunks = entries
            .chunks(chunk_size.max(1))
            .map(|chunk| IndexChunk {
                entries: chunk.to_vec(),
            })
            .collect();

        Self { chunks }
    }

    /// Reassemble chunks read back from `navtreeindexN.js` files.
    ///
    /// Empty chunks carry no first key to search by and are dropped.
    #[must_use]
    pub fn from_chunks(chunks: Vec<IndexChunk>) -> Self {
        Self {
            chunks: chunks.into_iter().filter(|c| !c.entries.is_empty()).collect(),
        }
    }

    /// Chunks in file order.
    #[must_use]
    pub fn chunks(&self) -> &[IndexChunk] {
        &self.chunks
    }

    /// Total number of indexed hrefs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.iter().map(|c| c.entries.len()).sum()
    }

    /// True when no href is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `NAVTREEINDEX` array implied by these chunks.
    #[must_use]
    pub fn nav_index(&self) -> NavIndex {
        NavIndex::new(
            self.chunks
                .iter()
                .filter_map(IndexChunk::first_key)
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Find the node for a deep link.
    ///
    /// Picks the chunk whose first key is the greatest one not above
    /// `href`, then looks `href` up in it. Anchors that are not indexed
    /// fall back to their page.
    #[must_use]
    pub fn locate(&self, href: &str) -> Option<Located> {
        self.lookup(href).or_else(|| {
            let page = Href::parse(href).page;
            (page != href).then(|| self.lookup(page)).flatten()
        })
    }

    fn lookup(&self, href: &str) -> Option<Located> {
        let chunk = self.chunk_for(href)?;
        let position = self.chunks[chunk].get(href)?;
        Some(Located {
            chunk,
            key: href.to_owned(),
            position: position.clone(),
        })
    }

    fn chunk_for(&self, href: &str) -> Option<usize> {
        let after = self
            .chunks
            .partition_point(|chunk| chunk.first_key().is_some_and(|key| key <= href));
        after.checked_sub(1)
    }
}
