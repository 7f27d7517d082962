//! Materialization of primitive blocks into owned [`Element`]s.

use crate::dense::DenseNodeReader;
use crate::element::{epoch_millis, Element, Info, Member, MemberType, Node, Relation, Tags, Way};
use crate::util::{normalize_coord, normalize_timestamp};
use crate::{pbf, DeltaValueReader, Error};

use std::str;

/// Decodes one `OSMData` primitive block into owned elements.
///
/// Groups are visited in file order; within each group sparse nodes come
/// first, then dense nodes, ways and relations. The returned elements carry
/// no references into the block, so the block (and its string table) can be
/// dropped or reused immediately.
///
/// # Errors
///
/// Will return `Err` on out-of-bounds or non-UTF-8 string table references,
/// unknown relation member types, and inconsistent parallel arrays.
pub fn decode_primitive_block(block: &pbf::PrimitiveBlock) -> Result<Vec<Element>, Error> {
    let mut elements = Vec::new();

    for group in &block.primitivegroup {
        for node in &group.nodes {
            elements.push(Element::Node(decode_node(node, block)?));
        }

        if let Some(dense_nodes) = &group.dense {
            decode_dense_nodes(dense_nodes, block, &mut elements)?;
        }

        for way in &group.ways {
            elements.push(Element::Way(decode_way(way, block)?));
        }

        for relation in &group.relations {
            elements.push(Element::Relation(decode_relation(relation, block)?));
        }
    }

    Ok(elements)
}

/// Looks up a string table entry, enforcing bounds and UTF-8.
fn lookup(string_table: &pbf::StringTable, index: usize) -> Result<&str, Error> {
    let bytes = string_table.s.get(index).ok_or(Error::MalformedStringIndex(index))?;
    str::from_utf8(bytes).map_err(|_err| Error::InvalidUtf8(index))
}

/// Converts a signed string table index as used by dense tags and member roles.
fn string_index(index: i32) -> Result<usize, Error> {
    usize::try_from(index).map_err(|_err| Error::LogicError(format!("string table index {index} is invalid")))
}

fn collect_tags(string_table: &pbf::StringTable, keys: &[u32], vals: &[u32]) -> Result<Tags, Error> {
    let mut tags = Tags::with_capacity(keys.len());

    for (key_idx, val_idx) in keys.iter().zip(vals.iter()) {
        let key = lookup(string_table, *key_idx as usize)?;
        let value = lookup(string_table, *val_idx as usize)?;
        tags.insert(key.to_string(), value.to_string());
    }

    Ok(tags)
}

fn decode_info(info: &pbf::Info, block: &pbf::PrimitiveBlock) -> Result<Info, Error> {
    let user = match info.user_sid {
        Some(user_sid) => Some(lookup(&block.stringtable, user_sid as usize)?.to_string()),
        None => None,
    };

    Ok(Info {
        version: info.version(),
        timestamp: info
            .timestamp
            .map(|timestamp| epoch_millis(normalize_timestamp(timestamp, block))),
        changeset: info.changeset,
        uid: info.uid,
        user,
        visible: info.visible(),
    })
}

fn decode_node(node: &pbf::Node, block: &pbf::PrimitiveBlock) -> Result<Node, Error> {
    let (lat, lon) = normalize_coord(node.lat, node.lon, block);
    let info = node.info.as_ref().map(|info| decode_info(info, block)).transpose()?;

    Ok(Node {
        id: node.id,
        lat: 1e-9 * lat as f64,
        lon: 1e-9 * lon as f64,
        tags: collect_tags(&block.stringtable, &node.keys, &node.vals)?,
        info,
    })
}

fn decode_dense_nodes(
    dense_nodes: &pbf::DenseNodes,
    block: &pbf::PrimitiveBlock,
    elements: &mut Vec<Element>,
) -> Result<(), Error> {
    for node in DenseNodeReader::new(dense_nodes)? {
        let node = node?;
        let (lat, lon) = normalize_coord(node.lat, node.lon, block);

        let mut tags = Tags::new();
        for pair in node.key_value_indices.chunks(2) {
            match *pair {
                [key_idx, val_idx] => {
                    let key = lookup(&block.stringtable, string_index(key_idx)?)?;
                    let value = lookup(&block.stringtable, string_index(val_idx)?)?;
                    tags.insert(key.to_string(), value.to_string());
                }
                [key_idx] => {
                    return Err(Error::LogicError(format!("dense node tag key {key_idx} has no value")));
                }
                _ => unreachable!(),
            }
        }

        let info = node.info.as_ref().map(|info| decode_info(info, block)).transpose()?;

        elements.push(Element::Node(Node {
            id: node.id,
            lat: 1e-9 * lat as f64,
            lon: 1e-9 * lon as f64,
            tags,
            info,
        }));
    }

    Ok(())
}

fn decode_way(way: &pbf::Way, block: &pbf::PrimitiveBlock) -> Result<Way, Error> {
    let info = way.info.as_ref().map(|info| decode_info(info, block)).transpose()?;

    Ok(Way {
        id: way.id,
        tags: collect_tags(&block.stringtable, &way.keys, &way.vals)?,
        node_ids: DeltaValueReader::new(&way.refs).collect(),
        info,
    })
}

fn decode_relation(relation: &pbf::Relation, block: &pbf::PrimitiveBlock) -> Result<Relation, Error> {
    let mut members = Vec::with_capacity(relation.memids.len());

    for (index, id) in DeltaValueReader::new(&relation.memids).enumerate() {
        let type_value = relation.types.get(index).ok_or_else(|| {
            Error::LogicError(format!("relation {} member {index} has no member type", relation.id))
        })?;
        let role_sid = relation.roles_sid.get(index).ok_or_else(|| {
            Error::LogicError(format!("relation {} member {index} has no role", relation.id))
        })?;

        members.push(Member {
            id,
            member_type: MemberType::from_wire(*type_value)?,
            role: lookup(&block.stringtable, string_index(*role_sid)?)?.to_string(),
        });
    }

    let info = relation.info.as_ref().map(|info| decode_info(info, block)).transpose()?;

    Ok(Relation {
        id: relation.id,
        tags: collect_tags(&block.stringtable, &relation.keys, &relation.vals)?,
        members,
        info,
    })
}
