//! The parsed, indexed model of one Flagpole file.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use text_size::TextSize;

use crate::base::{DocumentUri, LineIndex, Position};
use crate::core::{append_to_map, sort_map_by_keys};
use crate::flags::{Feature, FlagpoleDoc, RolloutState, SegmentDef};
use crate::transform::reduce_feature_rollout;

use super::error::FlagpoleError;
use super::scanner::feature_key_offsets;

/// A Flagpole document parsed from raw text, with every feature and
/// segment grouped the ways the tree surfaces need them.
///
/// All indexes are built once at parse time from a single pass over the
/// document, then explicitly key-sorted for deterministic display order.
#[derive(Debug)]
pub struct FlagpoleFile {
    pub uri: DocumentUri,
    /// The typed document content, in document order.
    pub doc: FlagpoleDoc,

    /// Every feature, grouped by the created_at value.
    pub features_by_created_at: IndexMap<SmolStr, Vec<Arc<Feature>>>,

    /// Every feature, grouped by the enabled value (as `"true"`/`"false"`).
    pub features_by_enabled: IndexMap<SmolStr, Vec<Arc<Feature>>>,

    /// Every feature, grouped by name. Quick way to look up a feature.
    pub features_by_name: IndexMap<SmolStr, Vec<Arc<Feature>>>,

    /// Every feature, grouped by the owner value.
    pub features_by_owner: IndexMap<SmolStr, Vec<Arc<Feature>>>,

    /// Every feature, grouped by rollout state. Always carries all three
    /// buckets, even when empty, so consumers see every rollout category.
    pub features_by_rollout: IndexMap<SmolStr, Vec<Arc<Feature>>>,

    /// Every segment, with its current rollout percentage included.
    pub all_segments_by_name: IndexMap<SmolStr, Vec<SegmentDef>>,

    /// Unique segment definitions, ignoring `rollout`, by name.
    pub unique_segments_by_name: IndexMap<SmolStr, Vec<SegmentDef>>,

    line_index: LineIndex,
    key_offsets: IndexMap<SmolStr, TextSize>,
}

impl FlagpoleFile {
    /// Parse raw YAML text into a fully indexed file model.
    pub fn parse(uri: DocumentUri, raw_text: &str) -> Result<FlagpoleFile, FlagpoleError> {
        let doc: FlagpoleDoc = serde_yaml::from_str(raw_text)?;
        let mut file = FlagpoleFile {
            uri,
            doc,
            features_by_created_at: IndexMap::new(),
            features_by_enabled: IndexMap::new(),
            features_by_name: IndexMap::new(),
            features_by_owner: IndexMap::new(),
            features_by_rollout: RolloutState::ALL
                .iter()
                .map(|state| (SmolStr::new_static(state.as_str()), Vec::new()))
                .collect(),
            all_segments_by_name: IndexMap::new(),
            unique_segments_by_name: IndexMap::new(),
            line_index: LineIndex::new(raw_text),
            key_offsets: feature_key_offsets(raw_text),
        };
        file.prepare_tree_maps();
        Ok(file)
    }

    fn prepare_tree_maps(&mut self) {
        let mut seen_fingerprints: FxHashSet<String> = FxHashSet::default();

        for (name, definition) in self.doc.options.clone() {
            let rollout =
                reduce_feature_rollout(definition.segments.iter().map(SegmentDef::rollout_state));

            for segment in &definition.segments {
                let segment_name = SmolStr::new(&segment.name);
                append_to_map(&mut self.all_segments_by_name, segment_name.clone(), segment.clone());

                // One representative per distinct (name, conditions) shape;
                // rollout differences collapse.
                if seen_fingerprints.insert(segment.fingerprint()) {
                    append_to_map(
                        &mut self.unique_segments_by_name,
                        segment_name,
                        SegmentDef {
                            name: segment.name.clone(),
                            rollout: None,
                            conditions: segment.conditions.clone(),
                        },
                    );
                }
            }

            let feature = Arc::new(Feature {
                name: SmolStr::new(&name),
                definition,
                rollout,
            });
            let definition = &feature.definition;

            append_to_map(
                &mut self.features_by_created_at,
                SmolStr::new(&definition.created_at),
                Arc::clone(&feature),
            );
            append_to_map(
                &mut self.features_by_enabled,
                SmolStr::new_static(if definition.is_enabled() { "true" } else { "false" }),
                Arc::clone(&feature),
            );
            append_to_map(
                &mut self.features_by_name,
                feature.name.clone(),
                Arc::clone(&feature),
            );
            append_to_map(
                &mut self.features_by_owner,
                SmolStr::new(definition.owner_label()),
                Arc::clone(&feature),
            );
            append_to_map(
                &mut self.features_by_rollout,
                SmolStr::new_static(rollout.as_str()),
                feature,
            );
        }

        sort_map_by_keys(&mut self.features_by_created_at);
        sort_map_by_keys(&mut self.features_by_enabled);
        sort_map_by_keys(&mut self.features_by_name);
        sort_map_by_keys(&mut self.features_by_owner);
        sort_map_by_keys(&mut self.all_segments_by_name);
        sort_map_by_keys(&mut self.unique_segments_by_name);
    }

    /// The line/column position of a feature's key token.
    ///
    /// `None` when the feature's key was not found in the source text
    /// (unexpected document shape), never an error.
    pub fn find_position(&self, feature: &Feature) -> Option<Position> {
        let offset = self.key_offsets.get(&feature.name)?;
        Some(self.line_index.position_at(*offset))
    }

    /// The feature whose key token appears last at or before
    /// `cursor_offset`. Maps an arbitrary cursor position back to the
    /// enclosing feature.
    pub fn nearest_feature_from(&self, cursor_offset: TextSize) -> Option<&Feature> {
        let mut nearest: Option<(&SmolStr, TextSize)> = None;
        for (name, offset) in &self.key_offsets {
            let cursor_is_after_this_feature = *offset <= cursor_offset;
            let this_feature_is_later_than_nearest =
                nearest.map_or(true, |(_, nearest_offset)| *offset > nearest_offset);
            if cursor_is_after_this_feature && this_feature_is_later_than_nearest {
                nearest = Some((name, *offset));
            }
        }
        let (name, _) = nearest?;
        self.features_by_name
            .get(name)
            .and_then(|features| features.first())
            .map(|feature| feature.as_ref())
    }
}
