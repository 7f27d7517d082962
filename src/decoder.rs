//! The multithreaded decoding pipeline.
//!
//! One reader thread frames blobs off the input stream and deals them
//! round-robin to N worker threads over rendezvous channels; each worker
//! decompresses and decodes whole primitive blocks; a serializer thread
//! collects the decoded batches in the same round-robin order and feeds a
//! bounded element channel that consumers drain through [`Decoder::decode`].
//!
//! The rendezvous handoffs give natural backpressure, and the matching
//! dispatch/collect order guarantees that elements come out in file order no
//! matter how many workers run.

use crossbeam_channel::{bounded, Receiver, Sender};
use log::debug;

use crate::decode::decode_primitive_block;
use crate::element::{read_header, Element, Header};
use crate::{read_blob, Block, BlockParser, BlockType, Error, RawBlock};

use std::io::Read;
use std::thread;

/// Default capacity of the element channel, roughly one primitive block's
/// worth of elements.
const DEFAULT_BUFFER_SIZE: usize = 8000;

/// A streaming OSM PBF decoder.
///
/// # Examples
///
/// ```no_run
/// use osm_pbf_decoder::{Decoder, Element};
///
/// use std::fs::File;
///
/// let file = File::open("some.osm.pbf").unwrap();
///
/// let mut decoder = Decoder::new(file);
/// decoder.start(4).unwrap();
///
/// let (mut nodes, mut ways, mut relations) = (0u64, 0u64, 0u64);
/// while let Some(result) = decoder.decode() {
///     match result.unwrap() {
///         Element::Node(_) => nodes += 1,
///         Element::Way(_) => ways += 1,
///         Element::Relation(_) => relations += 1,
///     }
/// }
///
/// println!("nodes: {nodes}, ways: {ways}, relations: {relations}");
/// ```
pub struct Decoder<R> {
    reader: Option<R>,
    buffer_size: usize,
    header: Option<Header>,
    elements: Option<Receiver<Result<Element, Error>>>,
}

impl<R: Read> Decoder<R> {
    /// Creates a new decoder over `reader`. Nothing is read until
    /// [`start`](Decoder::start) is called.
    pub fn new(reader: R) -> Self {
        Decoder {
            reader: Some(reader),
            buffer_size: DEFAULT_BUFFER_SIZE,
            header: None,
            elements: None,
        }
    }

    /// Sets the capacity of the element channel between the pipeline and
    /// consumers. Smaller values tighten backpressure, larger values smooth
    /// out bursts. Only effective before [`start`](Decoder::start).
    pub fn set_buffer_size(&mut self, buffer_size: usize) {
        self.buffer_size = buffer_size.max(1);
    }

    /// The decoded `OSMHeader` block, available once
    /// [`start`](Decoder::start) has succeeded.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Pulls the next decoded element.
    ///
    /// Returns `None` once the whole file has been decoded (or before the
    /// decoder has been started). After a decode error has been returned once,
    /// all subsequent calls return `None`.
    ///
    /// Any number of consumer threads may call this concurrently through a
    /// shared reference; every element is delivered to exactly one of them,
    /// in file order.
    pub fn decode(&self) -> Option<Result<Element, Error>> {
        let elements = self.elements.as_ref()?;
        elements.recv().ok()
    }
}

impl<R: Read + Send + 'static> Decoder<R> {
    /// Reads and validates the file's `OSMHeader` block, then spawns the
    /// decoding pipeline with `workers` worker threads (at least one).
    ///
    /// On error nothing is spawned and the decoder stays unusable.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the first block is not a valid, supported
    /// `OSMHeader` block, or when called twice.
    pub fn start(&mut self, workers: usize) -> Result<(), Error> {
        let mut reader = match self.reader.take() {
            Some(reader) => reader,
            None => return Err(Error::LogicError("decoder already started".to_string())),
        };

        let first_block = match read_blob(&mut reader) {
            Some(result) => result?,
            None => return Err(Error::MissingHeader),
        };

        if first_block.r#type != BlockType::Header {
            return Err(Error::MissingHeader);
        }

        let mut parser = BlockParser::default();
        let header = match parser.parse_block(first_block)? {
            Block::Header(header_block) => read_header(header_block)?,
            _ => return Err(Error::MissingHeader),
        };
        self.header = Some(header);

        let workers = workers.max(1);
        debug!("starting {workers} decode workers");

        let mut blob_senders = Vec::with_capacity(workers);
        let mut decoded_receivers = Vec::with_capacity(workers);

        for _ in 0..workers {
            let (blob_sender, blob_receiver) = bounded::<Result<RawBlock, Error>>(0);
            let (decoded_sender, decoded_receiver) = bounded::<Result<Vec<Element>, Error>>(0);
            blob_senders.push(blob_sender);
            decoded_receivers.push(decoded_receiver);

            thread::spawn(move || run_worker(blob_receiver, decoded_sender));
        }

        let (element_sender, element_receiver) = bounded(self.buffer_size);

        thread::spawn(move || run_reader(reader, blob_senders));
        thread::spawn(move || run_serializer(decoded_receivers, element_sender));

        self.elements = Some(element_receiver);
        Ok(())
    }
}

/// Frames blobs off the stream and deals `OSMData` blocks round-robin to the
/// workers. A framing error is delivered in stream position to the worker
/// whose turn it is, and ends the stream.
fn run_reader<R: Read>(mut reader: R, blob_senders: Vec<Sender<Result<RawBlock, Error>>>) {
    let mut next_worker = 0;

    while let Some(result) = read_blob(&mut reader) {
        match result {
            Ok(raw_block) => match raw_block.r#type {
                BlockType::Primitive => {
                    if blob_senders[next_worker].send(Ok(raw_block)).is_err() {
                        return; // pipeline is shutting down
                    }
                    next_worker = (next_worker + 1) % blob_senders.len();
                }
                BlockType::Header | BlockType::Unknown => debug!("skipping non-data block"),
            },
            Err(error) => {
                let _ = blob_senders[next_worker].send(Err(error));
                return;
            }
        }
    }

    // Dropping the senders closes every worker input.
}

/// Decompresses and decodes blobs until the input closes. After forwarding an
/// error the worker stops decoding.
fn run_worker(blobs: Receiver<Result<RawBlock, Error>>, decoded: Sender<Result<Vec<Element>, Error>>) {
    let mut parser = BlockParser::default();

    for received in blobs.iter() {
        let result = received.and_then(|raw_block| {
            parser.parse_block(raw_block).and_then(|block| match block {
                Block::Primitive(primitive_block) => decode_primitive_block(&primitive_block),
                _ => Ok(Vec::new()),
            })
        });

        let failed = result.is_err();
        if decoded.send(result).is_err() || failed {
            return;
        }
    }
}

/// Collects decoded batches in the same round-robin order the reader
/// dispatched them and streams single elements to the consumers. The first
/// error is forwarded and closes the stream.
fn run_serializer(
    decoded_receivers: Vec<Receiver<Result<Vec<Element>, Error>>>,
    elements: Sender<Result<Element, Error>>,
) {
    for receiver in decoded_receivers.iter().cycle() {
        match receiver.recv() {
            Ok(Ok(decoded)) => {
                for element in decoded {
                    if elements.send(Ok(element)).is_err() {
                        return; // all consumers are gone
                    }
                }
            }
            Ok(Err(error)) => {
                let _ = elements.send(Err(error));
                return;
            }
            // The worker whose turn it is has exited: the reader hit EOF and
            // every earlier batch has already been delivered.
            Err(_) => return,
        }
    }
}

#[cfg(test)]
mod decoder_tests {
    use super::*;
    use crate::pbf;
    use prost::Message;

    fn file_block(block_type: &str, payload: &[u8]) -> Vec<u8> {
        let blob = pbf::Blob {
            raw_size: Some(payload.len() as i32),
            data: Some(pbf::blob::Data::Raw(payload.to_vec())),
        }
        .encode_to_vec();

        let blob_header = pbf::BlobHeader {
            r#type: block_type.to_string(),
            indexdata: None,
            datasize: blob.len() as i32,
        }
        .encode_to_vec();

        let mut out = (blob_header.len() as u32).to_be_bytes().to_vec();
        out.extend_from_slice(&blob_header);
        out.extend_from_slice(&blob);
        out
    }

    fn header_payload() -> Vec<u8> {
        pbf::HeaderBlock {
            bbox: None,
            required_features: vec!["OsmSchema-V0.6".to_string(), "DenseNodes".to_string()],
            optional_features: vec![],
            writingprogram: None,
            source: None,
            osmosis_replication_timestamp: None,
            osmosis_replication_sequence_number: None,
            osmosis_replication_base_url: None,
        }
        .encode_to_vec()
    }

    #[test]
    fn decode_before_start_is_eof() {
        let decoder = Decoder::new(std::io::empty());
        assert!(decoder.decode().is_none());
    }

    #[test]
    fn empty_stream_has_no_header() {
        let mut decoder = Decoder::new(std::io::empty());
        assert!(matches!(decoder.start(1), Err(Error::MissingHeader)));
    }

    #[test]
    fn first_block_must_be_a_header() {
        let data = file_block("OSMData", &pbf::PrimitiveBlock::default().encode_to_vec());
        let mut decoder = Decoder::new(std::io::Cursor::new(data));
        assert!(matches!(decoder.start(1), Err(Error::MissingHeader)));
    }

    #[test]
    fn starting_twice_fails() {
        let data = file_block("OSMHeader", &header_payload());
        let mut decoder = Decoder::new(std::io::Cursor::new(data));
        decoder.start(1).unwrap();
        assert!(matches!(decoder.start(1), Err(Error::LogicError(_))));
    }

    #[test]
    fn header_only_file_is_a_clean_eof() {
        let data = file_block("OSMHeader", &header_payload());
        let mut decoder = Decoder::new(std::io::Cursor::new(data));
        decoder.start(2).unwrap();

        assert!(decoder.header().is_some());
        assert!(decoder.decode().is_none());
    }

    #[test]
    fn unsupported_feature_stops_start() {
        let payload = pbf::HeaderBlock {
            bbox: None,
            required_features: vec!["HistoricalInformation".to_string()],
            optional_features: vec![],
            writingprogram: None,
            source: None,
            osmosis_replication_timestamp: None,
            osmosis_replication_sequence_number: None,
            osmosis_replication_base_url: None,
        }
        .encode_to_vec();

        let data = file_block("OSMHeader", &payload);
        let mut decoder = Decoder::new(std::io::Cursor::new(data));
        match decoder.start(1) {
            Err(Error::UnsupportedFeature(feature)) => assert_eq!(feature, "HistoricalInformation"),
            _ => panic!("expected an UnsupportedFeature error"),
        }
    }
}
