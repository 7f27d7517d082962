//! The decoded element model: nodes, ways, relations and the file header.
//!
//! Values of these types own all of their data. The block-local string table
//! they were decoded from can be discarded (or overwritten by the next block)
//! as soon as the element has been produced.

use crate::{pbf, Error};

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

/// Features this decoder understands. A file whose header requires anything
/// else is rejected before any element is emitted.
pub const CAPABILITIES: [&str; 2] = ["OsmSchema-V0.6", "DenseNodes"];

/// Tags of a single element. Duplicate keys within one element are malformed;
/// the last occurrence wins.
pub type Tags = HashMap<String, String>;

/// A single OSM node with its position in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: i64,
    /// Latitude in degrees. Well-formed files keep this within [-90, 90];
    /// the decoder does not clamp.
    pub lat: f64,
    /// Longitude in degrees. Well-formed files keep this within [-180, 180];
    /// the decoder does not clamp.
    pub lon: f64,
    pub tags: Tags,
    pub info: Option<Info>,
}

/// A single OSM way, an ordered path through nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Way {
    pub id: i64,
    pub tags: Tags,
    /// Referenced node IDs in file order. The order encodes the way's geometry.
    pub node_ids: Vec<i64>,
    pub info: Option<Info>,
}

/// A single OSM relation, an ordered collection of member references.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub id: i64,
    pub tags: Tags,
    /// Members in file order.
    pub members: Vec<Member>,
    pub info: Option<Info>,
}

/// One member reference of a [`Relation`].
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: i64,
    pub member_type: MemberType,
    /// The member's role within the relation. May be empty.
    pub role: String,
}

/// The kind of element a [`Member`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    Node,
    Way,
    Relation,
}

impl MemberType {
    /// Maps the wire-format member type value. Unknown values are rejected
    /// rather than silently defaulting to [`MemberType::Node`].
    pub fn from_wire(value: i32) -> Result<Self, Error> {
        match value {
            v if v == pbf::relation::MemberType::Node as i32 => Ok(MemberType::Node),
            v if v == pbf::relation::MemberType::Way as i32 => Ok(MemberType::Way),
            v if v == pbf::relation::MemberType::Relation as i32 => Ok(MemberType::Relation),
            other => Err(Error::MalformedRelation(other)),
        }
    }
}

/// Optional per-element metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    /// Schema default is -1, meaning "unknown version".
    pub version: i32,
    pub timestamp: Option<SystemTime>,
    pub changeset: Option<i64>,
    pub uid: Option<i32>,
    pub user: Option<String>,
    /// Defaults to `true` when the file carries no visibility information.
    pub visible: bool,
}

/// One decoded OSM element.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Node(Node),
    Way(Way),
    Relation(Relation),
}

impl Element {
    /// The element's ID, independent of its kind.
    pub fn id(&self) -> i64 {
        match self {
            Element::Node(node) => node.id,
            Element::Way(way) => way.id,
            Element::Relation(relation) => relation.id,
        }
    }

    /// The element's tags, independent of its kind.
    pub fn tags(&self) -> &Tags {
        match self {
            Element::Node(node) => &node.tags,
            Element::Way(way) => &way.tags,
            Element::Relation(relation) => &relation.tags,
        }
    }
}

/// A geographic bounding box in degrees, from the file header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// The decoded `OSMHeader` block of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub bounding_box: Option<BoundingBox>,
    pub required_features: Vec<String>,
    pub optional_features: Vec<String>,
    pub writing_program: Option<String>,
    pub source: Option<String>,
    pub osmosis_replication_timestamp: Option<SystemTime>,
    pub osmosis_replication_sequence_number: Option<i64>,
    pub osmosis_replication_base_url: Option<String>,
}

/// Interprets a raw `OSMHeader` block.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFeature`] when the block requires a feature
/// outside [`CAPABILITIES`].
pub fn read_header(block: pbf::HeaderBlock) -> Result<Header, Error> {
    for feature in &block.required_features {
        if !CAPABILITIES.contains(&feature.as_str()) {
            return Err(Error::UnsupportedFeature(feature.clone()));
        }
    }

    let bounding_box = block.bbox.map(|bbox| BoundingBox {
        left: 1e-9 * bbox.left as f64,
        right: 1e-9 * bbox.right as f64,
        top: 1e-9 * bbox.top as f64,
        bottom: 1e-9 * bbox.bottom as f64,
    });

    Ok(Header {
        bounding_box,
        required_features: block.required_features,
        optional_features: block.optional_features,
        writing_program: block.writingprogram,
        source: block.source,
        osmosis_replication_timestamp: block.osmosis_replication_timestamp.map(epoch_seconds),
        osmosis_replication_sequence_number: block.osmosis_replication_sequence_number,
        osmosis_replication_base_url: block.osmosis_replication_base_url,
    })
}

fn epoch_seconds(seconds: i64) -> SystemTime {
    if seconds >= 0 {
        SystemTime::UNIX_EPOCH + Duration::from_secs(seconds as u64)
    } else {
        SystemTime::UNIX_EPOCH - Duration::from_secs(seconds.unsigned_abs())
    }
}

/// Converts a timestamp in milliseconds since the Unix epoch, as produced by
/// [`util::normalize_timestamp`](crate::util::normalize_timestamp), to a
/// [`SystemTime`].
pub fn epoch_millis(millis: i64) -> SystemTime {
    if millis >= 0 {
        SystemTime::UNIX_EPOCH + Duration::from_millis(millis as u64)
    } else {
        SystemTime::UNIX_EPOCH - Duration::from_millis(millis.unsigned_abs())
    }
}
